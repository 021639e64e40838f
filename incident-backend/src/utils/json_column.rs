// src/utils/json_column.rs

//! JSONテキスト列のエンコード／デコード

use crate::error::{AppError, AppResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

/// 値をJSONテキストへエンコード
pub fn encode<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string(value)
        .map_err(|e| AppError::InternalServerError(format!("Failed to encode JSON column: {}", e)))
}

/// JSONテキストをデコード
///
/// NULL・空文字・JSONの `null` は既定値（空配列）になる。
/// 解析できないテキストも既定値として扱い、WARN を記録する。
pub fn decode_or_default<T>(raw: Option<&str>, column: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return T::default();
    };

    match serde_json::from_str::<Option<T>>(text) {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            warn!(column = column, error = %e, "Undecodable JSON column, using empty value");
            T::default()
        }
    }
}
