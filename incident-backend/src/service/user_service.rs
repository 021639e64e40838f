// src/service/user_service.rs
use crate::api::dto::user_dto::DirectoryUser;
use crate::error::AppResult;
use crate::repository::user_repository::UserRepository;
use std::sync::Arc;

pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// ロールに属する有効なユーザーの一覧
    pub async fn list_directory(&self, role_id: i32) -> AppResult<Vec<DirectoryUser>> {
        let users = self.user_repo.find_active_by_role(role_id).await?;
        Ok(users.into_iter().map(DirectoryUser::from).collect())
    }
}
