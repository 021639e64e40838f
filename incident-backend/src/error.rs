// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Multiple validation errors")]
    ValidationErrors(Vec<String>),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 業務ルール上の重複（同一インシデントへの再登録など）
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::DbErr(db_err) => {
                tracing::error!(error = ?db_err, "Database error");

                let status = match db_err {
                    DbErr::RecordNotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };

                let (message, details) = match &db_err {
                    DbErr::RecordNotFound(entity) => (
                        "The requested resource was not found".to_string(),
                        Some(json!({ "entity": entity })),
                    ),
                    DbErr::Exec(_) => (
                        "A database operation failed".to_string(),
                        Some(json!({ "operation": "exec" })),
                    ),
                    DbErr::Query(_) => (
                        "A database query failed".to_string(),
                        Some(json!({ "operation": "query" })),
                    ),
                    _ => ("A database error occurred".to_string(), None),
                };

                (
                    status,
                    ErrorResponse::new(message, db_err.to_string(), "database_error")
                        .with_details(details),
                )
            }
            AppError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(message.clone(), message, "not_found"),
            ),
            AppError::ValidationError(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(message.clone(), message, "validation_error"),
            ),
            AppError::ValidationErrors(errors) => {
                let mut field_errors = HashMap::new();
                for error in &errors {
                    if let Some((field, message)) = error.split_once(": ") {
                        field_errors
                            .entry(field.to_string())
                            .or_insert_with(Vec::new)
                            .push(message.to_string());
                    }
                }
                let errors_array: Vec<serde_json::Value> =
                    errors.iter().map(|e| json!({"message": e})).collect();
                let mut response = ErrorResponse::new(
                    "Validation failed".to_string(),
                    "Validation failed".to_string(),
                    "validation_errors",
                );
                response.validation_errors = Some(field_errors);
                response.errors = Some(errors_array);
                (StatusCode::BAD_REQUEST, response)
            }
            AppError::MissingFields(fields) => {
                let mut response = ErrorResponse::new(
                    format!("Missing required fields: {}", fields.join(", ")),
                    "Missing required fields".to_string(),
                    "missing_fields",
                );
                response.missing_fields = Some(fields);
                (StatusCode::BAD_REQUEST, response)
            }
            AppError::ValidationFailure(errors) => {
                let field_errors: HashMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map_or_else(|| "Invalid value".to_string(), |m| m.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();
                let errors_array: Vec<serde_json::Value> = field_errors
                    .iter()
                    .flat_map(|(field, messages)| {
                        messages
                            .iter()
                            .map(move |msg| json!({"message": format!("{}: {}", field, msg)}))
                    })
                    .collect();
                let mut response = ErrorResponse::new(
                    "Validation failed".to_string(),
                    "Validation failed".to_string(),
                    "validation_errors",
                );
                response.validation_errors = Some(field_errors);
                response.errors = Some(errors_array);
                (StatusCode::BAD_REQUEST, response)
            }
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(message.clone(), message, "bad_request"),
            ),
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new(message.clone(), message, "unauthorized"),
            ),
            AppError::Duplicate(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(message.clone(), message, "duplicate"),
            ),
            AppError::InternalServerError(message) => {
                tracing::error!(error = %message, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "An internal server error occurred".to_string(),
                        message,
                        "internal_server_error",
                    ),
                )
            }
            AppError::ExternalServiceError(message) => {
                tracing::error!(error = %message, "External service error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "External service error".to_string(),
                        message,
                        "external_service_error",
                    ),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 書き込み時の制約違反を業務エラーへ変換
    ///
    /// 一意制約違反は `Duplicate`、外部キー違反は `NotFound`、それ以外はDBエラーのまま。
    pub fn from_write_error(err: DbErr, duplicate: &str, missing_parent: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::warn!(detail = %detail, "Unique constraint violation");
                AppError::Duplicate(duplicate.to_string())
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                tracing::warn!(detail = %detail, "Foreign key constraint violation");
                AppError::NotFound(missing_parent.to_string())
            }
            _ => AppError::DbErr(err),
        }
    }
}

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
    pub error_type: String,
}

impl ErrorResponse {
    fn new(message: String, error: String, error_type: &str) -> Self {
        Self {
            success: false,
            message,
            error,
            details: None,
            validation_errors: None,
            errors: None,
            missing_fields: None,
            error_type: error_type.to_string(),
        }
    }

    fn with_details(mut self, details: Option<serde_json::Value>) -> Self {
        self.details = details;
        self
    }
}
