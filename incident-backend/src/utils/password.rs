// src/utils/password.rs

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::env;
use thiserror::Error;

/// パスワード関連のエラー
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingError(#[from] argon2::password_hash::Error),

    #[error("Argon2 parameter error: {0}")]
    Argon2Error(#[from] argon2::Error),

    #[error("Password must not be empty")]
    EmptyPassword,
}

/// Argon2 設定
#[derive(Debug, Clone)]
pub struct Argon2Config {
    /// メモリコスト（KB）
    pub memory_cost: u32,
    /// 時間コスト（反復回数）
    pub time_cost: u32,
    /// 並列度
    pub parallelism: u32,
    /// 出力長
    pub output_length: usize,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64MB
            time_cost: 3,
            parallelism: 4,
            output_length: 32,
        }
    }
}

impl Argon2Config {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            memory_cost: env_or("ARGON2_MEMORY_COST", defaults.memory_cost),
            time_cost: env_or("ARGON2_TIME_COST", defaults.time_cost),
            parallelism: env_or("ARGON2_PARALLELISM", defaults.parallelism),
            output_length: env_or("ARGON2_OUTPUT_LENGTH", defaults.output_length),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// パスワードハッシュマネージャー
pub struct PasswordManager {
    argon2: Argon2<'static>,
    // 該当ユーザーがいないときの照合用（同じパラメータ）
    dummy_hash: String,
}

impl PasswordManager {
    pub fn new(argon2_config: Argon2Config) -> Result<Self, PasswordError> {
        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            argon2::Params::new(
                argon2_config.memory_cost,
                argon2_config.time_cost,
                argon2_config.parallelism,
                Some(argon2_config.output_length),
            )
            .map_err(PasswordError::Argon2Error)?,
        );

        let dummy_password = SaltString::generate(&mut OsRng);
        let dummy_hash = argon2
            .hash_password(
                dummy_password.as_str().as_bytes(),
                &SaltString::generate(&mut OsRng),
            )
            .map_err(PasswordError::HashingError)?
            .to_string();

        Ok(Self { argon2, dummy_hash })
    }

    pub fn new_default() -> Result<Self, PasswordError> {
        Self::new(Argon2Config::default())
    }

    /// パスワードをハッシュ化（PHC文字列）
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::EmptyPassword);
        }

        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(PasswordError::HashingError)?;

        Ok(password_hash.to_string())
    }

    /// パスワードを検証
    ///
    /// パラメータはハッシュ文字列側のものが使われるため、設定変更前のハッシュも検証できる。
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(PasswordError::HashingError)?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::HashingError(e)),
        }
    }

    /// ダミーのハッシュと照合（ユーザー不在時も同じ計算量をかける）
    pub fn verify_dummy(&self, password: &str) -> bool {
        matches!(self.verify_password(password, &self.dummy_hash), Ok(true))
    }
}
