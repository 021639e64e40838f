use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // インシデント添付ファイル
        manager
            .create_table(
                Table::create()
                    .table(IncidentFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncidentFiles::FileId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IncidentFiles::IncidentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentFiles::FileName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentFiles::ContentType)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentFiles::FileSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IncidentFiles::FileData).blob().not_null())
                    .col(
                        ColumnDef::new(IncidentFiles::UploadedOn)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(IncidentFiles::UploadedBy)
                            .string_len(100)
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_files_incident")
                            .from(IncidentFiles::Table, IncidentFiles::IncidentId)
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
                    .name("idx_incident_files_incident_id")
                    .table(IncidentFiles::Table)
                    .col(IncidentFiles::IncidentId)
                    .to_owned(),
            )
            .await?;

        // 是正措置（アサイン）添付ファイル - アサインIDで紐付ける
        manager
            .create_table(
                Table::create()
                    .table(IncidentAssignFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncidentAssignFiles::FileId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IncidentAssignFiles::AssignId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentAssignFiles::FileName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentAssignFiles::ContentType)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IncidentAssignFiles::FileSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentAssignFiles::FileData)
                            .blob()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentAssignFiles::UploadedOn)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(IncidentAssignFiles::UploadedBy)
                            .string_len(100)
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_assign_files_assign")
                            .from(IncidentAssignFiles::Table, IncidentAssignFiles::AssignId)
                            .to(IncidentAssigns::Table, IncidentAssigns::AssignId)
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
                    .name("idx_incident_assign_files_assign_id")
                    .table(IncidentAssignFiles::Table)
                    .col(IncidentAssignFiles::AssignId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IncidentAssignFiles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(IncidentFiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum IncidentFiles {
    Table,
    FileId,
    IncidentId,
    FileName,
    ContentType,
    FileSize,
    FileData,
    UploadedOn,
    UploadedBy,
}

#[derive(DeriveIden)]
enum IncidentAssignFiles {
    Table,
    FileId,
    AssignId,
    FileName,
    ContentType,
    FileSize,
    FileData,
    UploadedOn,
    UploadedBy,
}

#[derive(DeriveIden)]
enum IncidentReports {
    Table,
    IncidentId,
}

#[derive(DeriveIden)]
enum IncidentAssigns {
    Table,
    AssignId,
}
