// src/api/dto/user_dto.rs

use crate::domain::user_model;
use serde::{Deserialize, Serialize};

/// ディレクトリ一覧の1ユーザー
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    pub user_id: i32,
    pub user_name: String,
}

impl From<user_model::Model> for DirectoryUser {
    fn from(model: user_model::Model) -> Self {
        Self {
            user_id: model.user_id,
            user_name: model.user_name,
        }
    }
}
