// src/service/auth_service.rs
use crate::api::dto::auth_dto::{LoginRequest, LoginResponse, LoginUser, LOGIN_SUCCESS_MESSAGE};
use crate::error::{AppError, AppResult};
use crate::repository::user_repository::UserRepository;
use crate::service::geo_location_service::GeoLocationService;
use crate::utils::password::PasswordManager;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// 認証サービス
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    password_manager: Arc<PasswordManager>,
    geo_service: Arc<GeoLocationService>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        password_manager: Arc<PasswordManager>,
        geo_service: Arc<GeoLocationService>,
    ) -> Self {
        Self {
            user_repo,
            password_manager,
            geo_service,
        }
    }

    /// ログイン
    ///
    /// ユーザー不在・パスワード不一致・無効ユーザー・解析できないハッシュは
    /// すべて同じ 401 を返す。
    pub async fn login(
        &self,
        request: LoginRequest,
        client_ip: Option<String>,
    ) -> AppResult<LoginResponse> {
        request.validate()?;

        let username = request.username.trim();

        let Some((user, role)) = self.user_repo.find_login_candidate(username).await? else {
            self.password_manager.verify_dummy(&request.password);
            warn!(username = %username, "Login failed: user not found or inactive");
            return Err(invalid_credentials());
        };

        match self
            .password_manager
            .verify_password(&request.password, &user.password_hash)
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(user_id = user.user_id, "Login failed: wrong password");
                return Err(invalid_credentials());
            }
            Err(e) => {
                warn!(user_id = user.user_id, error = %e, "Login failed: stored hash unusable");
                return Err(invalid_credentials());
            }
        }

        let ip = self.geo_service.resolve_client_ip(client_ip.as_deref());
        let location = self.geo_service.lookup(&ip).await?;

        info!(
            user_id = user.user_id,
            client_ip = %ip,
            city = location.city.as_deref().unwrap_or("-"),
            "User logged in"
        );

        Ok(LoginResponse {
            message: LOGIN_SUCCESS_MESSAGE.to_string(),
            user: LoginUser {
                user_id: user.user_id,
                username: user.user_name,
                role: role.map(|r| r.role_name).unwrap_or_default(),
            },
            location,
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
}
