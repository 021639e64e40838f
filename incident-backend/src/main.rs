// src/main.rs
use incident_backend::api::{app_router, AppState};
use incident_backend::config::AppConfig;
use incident_backend::db::{close_db_pool, create_db_pool, run_migrations};
use incident_backend::utils::email::EmailService;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env があれば読み込む
    dotenvy::dotenv().ok();

    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "incident_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Incident Backend server...");

    // 設定を読み込む
    let app_config = AppConfig::from_env()?;
    tracing::info!(
        environment = %app_config.environment,
        directory_role_id = app_config.directory_role_id,
        "Configuration loaded"
    );

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config.database).await?;
    tracing::info!("Database pool created successfully.");

    if app_config.run_migrations {
        run_migrations(&db_pool).await?;
    }

    let email_service = Arc::new(EmailService::from_env(app_config.is_production())?);
    let server_addr = app_config.server_addr();

    let app_state = AppState::new(db_pool.clone(), app_config, email_service)?;
    let app = app_router(app_state);

    // サーバーの起動
    let listener = TcpListener::bind(&server_addr).await?;
    tracing::info!("Router configured. Server listening on {}", server_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, closing database pool");
    close_db_pool(db_pool).await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
