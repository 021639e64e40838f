// tests/common/app_helper.rs

use axum::Router;
use incident_backend::{
    api::{app_router, AppState},
    config::AppConfig,
    utils::email::{EmailConfig, EmailProvider, EmailService},
};
use std::sync::Arc;

use crate::common;

pub const NOTIFY_RECIPIENT: &str = "safety-team@example.com";

/// テスト用アプリ一式
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub db: common::db::TestDatabase,
}

impl TestApp {
    /// oneshot 用にルーターを複製
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn email(&self) -> &EmailService {
        &self.state.email_service
    }
}

fn development_email(recipients: Vec<String>) -> Arc<EmailService> {
    Arc::new(
        EmailService::new(EmailConfig {
            provider: EmailProvider::Development,
            notify_recipients: recipients,
            ..EmailConfig::default()
        })
        .expect("email service"),
    )
}

/// 標準構成のアプリ（開発モードのメール、スタブの位置情報API）
pub async fn setup_app() -> TestApp {
    setup_app_with_recipients(vec![NOTIFY_RECIPIENT.to_string()]).await
}

/// 通知先を指定してアプリを構築（空にすると送信が失敗する）
pub async fn setup_app_with_recipients(recipients: Vec<String>) -> TestApp {
    common::init_test_env();

    let db = common::db::TestDatabase::new().await;

    let mut config = AppConfig::for_testing();
    config.geo.base_url = common::geo_stub::start_geo_stub().await;

    let state = AppState::new(
        db.connection.clone(),
        config,
        development_email(recipients),
    )
    .expect("app state");

    TestApp {
        router: app_router(state.clone()),
        state,
        db,
    }
}
