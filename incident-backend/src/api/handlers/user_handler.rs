// src/api/handlers/user_handler.rs
use crate::api::dto::user_dto::DirectoryUser;
use crate::api::AppState;
use crate::error::AppResult;
use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};
use tracing::info;

/// ディレクトリ用ロールのユーザー一覧
pub async fn list_directory_users_handler(
    State(app_state): State<AppState>,
) -> AppResult<Json<Vec<DirectoryUser>>> {
    let role_id = app_state.config.directory_role_id;
    let users = app_state.user_service.list_directory(role_id).await?;

    info!(role_id = role_id, count = users.len(), "Directory users listed");
    Ok(Json(users))
}

pub fn user_router(app_state: AppState) -> Router {
    Router::new()
        .route("/users/role3", get(list_directory_users_handler))
        .with_state(app_state)
}
