// src/api/dto/auth_dto.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

// --- リクエストDTO ---

/// ログインリクエスト
#[derive(Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(custom(function = not_blank, message = "Username is required"))]
    pub username: String,

    #[serde(default)]
    #[validate(custom(function = not_blank, message = "Password is required"))]
    pub password: String,
}

// パスワードはログに出さない
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub user_id: i32,
    pub username: String,
    pub role: String,
}

/// 呼び出し元IPの位置情報（取得できなかった項目は null）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoginLocation {
    pub ip: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: LoginUser,
    pub location: LoginLocation,
}

pub const LOGIN_SUCCESS_MESSAGE: &str = "success login";
