use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // role_masterテーブル作成（ロールIDは固定値で参照されるため自動採番しない）
        manager
            .create_table(
                Table::create()
                    .table(RoleMaster::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoleMaster::RoleId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RoleMaster::RoleName)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserMaster::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserMaster::UserId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserMaster::UserName)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UserMaster::PasswordHash)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserMaster::RoleId).integer().not_null())
                    .col(
                        ColumnDef::new(UserMaster::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(UserMaster::DelMark)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserMaster::CreatedOn)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_master_role")
                            .from(UserMaster::Table, UserMaster::RoleId)
                            .to(RoleMaster::Table, RoleMaster::RoleId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ロール指定のユーザー一覧で使用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_master_role_id")
                    .table(UserMaster::Table)
                    .col(UserMaster::RoleId)
                    .to_owned(),
            )
            .await?;

        // 初期データ投入
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(RoleMaster::Table)
                    .columns([RoleMaster::RoleId, RoleMaster::RoleName])
                    .values_panic([1.into(), "Administrator".into()])
                    .values_panic([2.into(), "Safety Officer".into()])
                    .values_panic([3.into(), "Action Owner".into()])
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserMaster::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RoleMaster::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RoleMaster {
    Table,
    RoleId,
    RoleName,
}

#[derive(DeriveIden)]
enum UserMaster {
    Table,
    UserId,
    UserName,
    PasswordHash,
    RoleId,
    IsActive,
    DelMark,
    CreatedOn,
}
