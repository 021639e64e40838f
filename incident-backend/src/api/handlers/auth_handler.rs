// src/api/handlers/auth_handler.rs
use super::json_rejection;
use crate::api::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::ClientIp;
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    routing::post,
    Router,
};
use tracing::info;

/// ログイン
pub async fn login_handler(
    State(app_state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(request) = payload.map_err(json_rejection)?;

    info!(
        username = %request.username.trim(),
        client_ip = client_ip.as_deref().unwrap_or("-"),
        "Login attempt"
    );

    let response = app_state.auth_service.login(request, client_ip).await?;
    Ok(Json(response))
}

pub fn auth_router(app_state: AppState) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .with_state(app_state)
}
