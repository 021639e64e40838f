// src/repository/user_repository.rs

use crate::domain::role_model::{self, Entity as RoleEntity};
use crate::domain::user_model::{self, Entity as UserEntity};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, QueryFilter, QueryOrder};

#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DbConn,
}

impl UserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// ログイン対象のユーザーをロール付きで検索
    ///
    /// 無効化・削除済みのユーザーは対象外。
    pub async fn find_login_candidate(
        &self,
        user_name: &str,
    ) -> Result<Option<(user_model::Model, Option<role_model::Model>)>, DbErr> {
        UserEntity::find()
            .find_also_related(RoleEntity)
            .filter(user_model::Column::UserName.eq(user_name))
            .filter(user_model::Column::IsActive.eq(true))
            .filter(user_model::Column::DelMark.eq(false))
            .one(&self.db)
            .await
    }

    /// ロールに属する有効なユーザー（user_id 昇順）
    pub async fn find_active_by_role(&self, role_id: i32) -> Result<Vec<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::RoleId.eq(role_id))
            .filter(user_model::Column::IsActive.eq(true))
            .filter(user_model::Column::DelMark.eq(false))
            .order_by_asc(user_model::Column::UserId)
            .all(&self.db)
            .await
    }
}
