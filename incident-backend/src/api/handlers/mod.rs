// src/api/handlers/mod.rs
pub mod attachment_handler;
pub mod auth_handler;
pub mod incident_action_handler;
pub mod incident_handler;
pub mod system_handler;
pub mod user_handler;

use crate::error::AppError;
use axum::extract::rejection::{JsonRejection, QueryRejection};

// axum 標準の拒否レスポンスを統一エラー形式に変換
pub(crate) fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
}

pub(crate) fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::ValidationError(format!("Invalid query string: {}", rejection.body_text()))
}
