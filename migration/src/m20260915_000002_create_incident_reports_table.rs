use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IncidentReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncidentReports::IncidentId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // 基本情報
                    .col(
                        ColumnDef::new(IncidentReports::IncidentDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::IncidentTime)
                            .time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::Location)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::WeatherCondition)
                            .string_len(100)
                            .not_null(),
                    )
                    // 関係者
                    .col(
                        ColumnDef::new(IncidentReports::HtplShiftInCharge)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::ContractorSupervisor)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::IncidentReportedBy)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::ReportPreparedBy)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::CreatedBy)
                            .string_len(100)
                            .null(),
                    )
                    // 詳細
                    .col(
                        ColumnDef::new(IncidentReports::IncidentTitle)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::IncidentSummary)
                            .text()
                            .not_null(),
                    )
                    // 種別フラグと件数
                    .col(flag(IncidentReports::TypeInjury))
                    .col(count(IncidentReports::CountInjury))
                    .col(flag(IncidentReports::TypePropertyDamage))
                    .col(count(IncidentReports::CountPropertyDamage))
                    .col(flag(IncidentReports::TypeFire))
                    .col(count(IncidentReports::CountFire))
                    .col(flag(IncidentReports::TypeNearMiss))
                    .col(count(IncidentReports::CountNearMiss))
                    .col(flag(IncidentReports::TypeEnvironment))
                    .col(count(IncidentReports::CountEnvironment))
                    .col(flag(IncidentReports::TypeFatality))
                    .col(count(IncidentReports::CountFatality))
                    .col(flag(IncidentReports::TypeOther))
                    .col(count(IncidentReports::CountOther))
                    // JSONテキスト列
                    .col(
                        ColumnDef::new(IncidentReports::InjuredHtplEmployees)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::InjuredContractWorkers)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::InjuredVisitors)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::UploadedFiles)
                            .text()
                            .null(),
                    )
                    // 教育情報
                    .col(
                        ColumnDef::new(IncidentReports::TrainingTypeRequired)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::TrainingDescription)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::TrainingUpdatedBy)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::TrainingUpdatedOn)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(IncidentReports::CreatedOn)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_incident_reports_incident_date")
                    .table(IncidentReports::Table)
                    .col(IncidentReports::IncidentDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IncidentReports::Table).to_owned())
            .await
    }
}

fn flag(col: IncidentReports) -> ColumnDef {
    ColumnDef::new(col)
        .boolean()
        .not_null()
        .default(false)
        .to_owned()
}

fn count(col: IncidentReports) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .default(0)
        .to_owned()
}

#[derive(DeriveIden, Clone, Copy)]
enum IncidentReports {
    Table,
    IncidentId,
    IncidentDate,
    IncidentTime,
    Location,
    WeatherCondition,
    HtplShiftInCharge,
    ContractorSupervisor,
    IncidentReportedBy,
    ReportPreparedBy,
    CreatedBy,
    IncidentTitle,
    IncidentSummary,
    TypeInjury,
    CountInjury,
    TypePropertyDamage,
    CountPropertyDamage,
    TypeFire,
    CountFire,
    TypeNearMiss,
    CountNearMiss,
    TypeEnvironment,
    CountEnvironment,
    TypeFatality,
    CountFatality,
    TypeOther,
    CountOther,
    InjuredHtplEmployees,
    InjuredContractWorkers,
    InjuredVisitors,
    UploadedFiles,
    TrainingTypeRequired,
    TrainingDescription,
    TrainingUpdatedBy,
    TrainingUpdatedOn,
    Status,
    CreatedOn,
}
