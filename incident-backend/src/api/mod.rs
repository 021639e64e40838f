// src/api/mod.rs
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::logging::{inject_request_context, logging_middleware};
use crate::middleware::cors::cors_layer;
use crate::repository::user_repository::UserRepository;
use crate::service::{
    attachment_service::AttachmentService, auth_service::AuthService,
    geo_location_service::GeoLocationService, incident_action_service::IncidentActionService,
    incident_service::IncidentService, user_service::UserService,
};
use crate::utils::email::EmailService;
use crate::utils::password::PasswordManager;
use axum::extract::DefaultBodyLimit;
use axum::{middleware as axum_middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod handlers;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub incident_service: Arc<IncidentService>,
    pub incident_action_service: Arc<IncidentActionService>,
    pub attachment_service: Arc<AttachmentService>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub email_service: Arc<EmailService>,
    pub db: DbPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: DbPool, config: AppConfig, email_service: Arc<EmailService>) -> AppResult<Self> {
        let password_manager = PasswordManager::new(config.password.clone()).map_err(|e| {
            AppError::InternalServerError(format!("Failed to initialise password manager: {}", e))
        })?;
        let geo_service = GeoLocationService::new(&config.geo)?;
        let user_repo = Arc::new(UserRepository::new(db.clone()));

        Ok(Self {
            incident_service: Arc::new(IncidentService::new(db.clone(), email_service.clone())),
            incident_action_service: Arc::new(IncidentActionService::new(db.clone())),
            attachment_service: Arc::new(AttachmentService::new(db.clone())),
            auth_service: Arc::new(AuthService::new(
                user_repo.clone(),
                Arc::new(password_manager),
                Arc::new(geo_service),
            )),
            user_service: Arc::new(UserService::new(user_repo)),
            email_service,
            db,
            config: Arc::new(config),
        })
    }
}

/// `/api` 配下の全ルートとミドルウェアを組み立てる
pub fn app_router(app_state: AppState) -> Router {
    let config = app_state.config.clone();

    let api = Router::new()
        .merge(handlers::incident_handler::incident_router(app_state.clone()))
        .merge(handlers::incident_action_handler::incident_action_router(
            app_state.clone(),
        ))
        .merge(handlers::attachment_handler::attachment_router(
            app_state.clone(),
        ))
        .merge(handlers::auth_handler::auth_router(app_state.clone()))
        .merge(handlers::user_handler::user_router(app_state.clone()))
        .merge(handlers::system_handler::system_router(app_state));

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(config.upload_body_limit))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .layer(axum_middleware::from_fn(inject_request_context))
}
