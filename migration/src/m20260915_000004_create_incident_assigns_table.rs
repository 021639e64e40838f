use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IncidentAssigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncidentAssigns::AssignId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IncidentAssigns::IncidentId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IncidentAssigns::Action).text().null())
                    .col(
                        ColumnDef::new(IncidentAssigns::Status)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentAssigns::AssignUser)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentAssigns::DocReff)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(IncidentAssigns::TargetDate).date().null())
                    .col(
                        ColumnDef::new(IncidentAssigns::ResponsibleId)
                            .string_len(50)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentAssigns::AttachmentsAssign)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentAssigns::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(IncidentAssigns::DelMark)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(IncidentAssigns::CreatedOn)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(IncidentAssigns::CreatedBy)
                            .string_len(100)
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_assigns_incident")
                            .from(IncidentAssigns::Table, IncidentAssigns::IncidentId)
                            .to(IncidentReports::Table, IncidentReports::IncidentId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_incident_assigns_incident_id")
                    .table(IncidentAssigns::Table)
                    .col(IncidentAssigns::IncidentId)
                    .to_owned(),
            )
            .await?;

        // 担当者ごとの一覧取得で使用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_incident_assigns_responsible_id")
                    .table(IncidentAssigns::Table)
                    .col(IncidentAssigns::ResponsibleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IncidentAssigns::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum IncidentAssigns {
    Table,
    AssignId,
    IncidentId,
    Action,
    Status,
    AssignUser,
    DocReff,
    TargetDate,
    ResponsibleId,
    AttachmentsAssign,
    IsActive,
    DelMark,
    CreatedOn,
    CreatedBy,
}

#[derive(DeriveIden)]
enum IncidentReports {
    Table,
    IncidentId,
}
