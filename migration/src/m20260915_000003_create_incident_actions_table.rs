use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // incident_actionsテーブル（インシデントごとに1件のみ）
        manager
            .create_table(
                Table::create()
                    .table(IncidentActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncidentActions::ActionId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IncidentActions::IncidentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentActions::CftMembers)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentActions::PastIncident)
                            .string_len(10)
                            .null(),
                    )
                    .col(text(IncidentActions::PastIncidentDetails))
                    .col(text(IncidentActions::IncidentSummary))
                    .col(text(IncidentActions::Chronology))
                    .col(text(IncidentActions::Attachments))
                    .col(text(IncidentActions::Facts))
                    .col(text(IncidentActions::Evidence))
                    .col(text(IncidentActions::DriverStatement))
                    .col(text(IncidentActions::SupervisorStatement))
                    .col(text(IncidentActions::ManCauses))
                    .col(text(IncidentActions::MachineCauses))
                    .col(text(IncidentActions::MethodCauses))
                    .col(text(IncidentActions::MotherNatureCauses))
                    .col(text(IncidentActions::ProbableCause))
                    .col(text(IncidentActions::WhyAnalysis))
                    .col(text(IncidentActions::ActualRootCause))
                    .col(text(IncidentActions::CorrectiveAction))
                    .col(text(IncidentActions::PreventiveAction))
                    .col(text(IncidentActions::Actions))
                    .col(
                        ColumnDef::new(IncidentActions::PreparedBy)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentActions::PreparedByUserId)
                            .string_len(50)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentActions::CreatedOn)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_actions_incident")
                            .from(IncidentActions::Table, IncidentActions::IncidentId)
                            .to(IncidentReports::Table, IncidentReports::IncidentId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 二重登録はストレージ側の一意制約で防ぐ
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_incident_actions_incident_id")
                    .table(IncidentActions::Table)
                    .col(IncidentActions::IncidentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IncidentActions::Table).to_owned())
            .await
    }
}

fn text(col: IncidentActions) -> ColumnDef {
    ColumnDef::new(col).text().null().to_owned()
}

#[derive(DeriveIden, Clone, Copy)]
enum IncidentActions {
    Table,
    ActionId,
    IncidentId,
    CftMembers,
    PastIncident,
    PastIncidentDetails,
    IncidentSummary,
    Chronology,
    Attachments,
    Facts,
    Evidence,
    DriverStatement,
    SupervisorStatement,
    ManCauses,
    MachineCauses,
    MethodCauses,
    MotherNatureCauses,
    ProbableCause,
    WhyAnalysis,
    ActualRootCause,
    CorrectiveAction,
    PreventiveAction,
    Actions,
    PreparedBy,
    PreparedByUserId,
    CreatedOn,
}

#[derive(DeriveIden)]
enum IncidentReports {
    Table,
    IncidentId,
}
