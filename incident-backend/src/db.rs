// src/db.rs
use crate::config::DatabaseConfig;
use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::info;

pub type DbPool = DatabaseConnection;

pub async fn create_db_pool(config: &DatabaseConfig) -> Result<DbPool, DbErr> {
    let mut opt = ConnectOptions::new(config.url.clone());

    // 接続オプションを設定
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(30 * 60))
        .sqlx_logging(false);

    Database::connect(opt).await
}

/// 未適用のマイグレーションを実行
pub async fn run_migrations(db: &DbPool) -> Result<(), DbErr> {
    let pending = Migrator::get_pending_migrations(db).await?;
    info!(pending = pending.len(), "Applying database migrations");
    Migrator::up(db, None).await
}

/// 接続プールを閉じる
pub async fn close_db_pool(db: DbPool) -> Result<(), DbErr> {
    db.close().await
}
