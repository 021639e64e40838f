// src/extractors/id_path.rs

use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// パスの末尾セグメントからパラメータ名を推測する
fn id_param_name(path: &str) -> &'static str {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.iter().rev().nth(1).copied() {
        Some("file") | Some("assign-file") => "permitId",
        Some("assign") => "assignId",
        _ => "id",
    }
}

/// 整数IDのパスパラメータ
///
/// 整数として解釈できない値は 400 を返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedId(pub i32);

impl<S> FromRequestParts<S> for ValidatedId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                let param_name = id_param_name(parts.uri.path());
                AppError::BadRequest(format!("Missing path parameter '{}': {}", param_name, e))
            })?;

        let id = raw.trim().parse::<i32>().map_err(|_| {
            let param_name = id_param_name(parts.uri.path());
            AppError::ValidationError(format!(
                "Invalid {} '{}': must be an integer",
                param_name, raw
            ))
        })?;

        Ok(ValidatedId(id))
    }
}
