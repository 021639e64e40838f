// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// マスタ関連マイグレーション
mod m20260915_000001_create_role_and_user_master;

// インシデント関連マイグレーション
mod m20260915_000002_create_incident_reports_table;
mod m20260915_000003_create_incident_actions_table;
mod m20260915_000004_create_incident_assigns_table;

// 添付ファイル関連マイグレーション
mod m20260915_000005_create_incident_file_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. マスタテーブル（依存関係なし）
            Box::new(m20260915_000001_create_role_and_user_master::Migration),
            // 2. インシデント本体
            Box::new(m20260915_000002_create_incident_reports_table::Migration),
            // 3. インシデントに依存するテーブル
            Box::new(m20260915_000003_create_incident_actions_table::Migration),
            Box::new(m20260915_000004_create_incident_assigns_table::Migration),
            // 4. 添付ファイル（incident_reports / incident_assigns に依存）
            Box::new(m20260915_000005_create_incident_file_tables::Migration),
        ]
    }
}
