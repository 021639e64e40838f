// src/repository/incident_action_repository.rs

use crate::domain::incident_action_model::{
    self, ActiveModel as ActionActiveModel, Entity as ActionEntity,
};
use crate::domain::incident_assign_model::{
    self, ActiveModel as AssignActiveModel, Entity as AssignEntity,
};
use sea_orm::entity::*;
use sea_orm::{ConnectionTrait, DbConn, DbErr, QueryFilter, QueryOrder};

#[derive(Debug, Clone)]
pub struct IncidentActionRepository {
    db: DbConn,
}

impl IncidentActionRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// インシデントの原因分析（最大1件）
    pub async fn find_by_incident(
        &self,
        incident_id: i32,
    ) -> Result<Option<incident_action_model::Model>, DbErr> {
        ActionEntity::find()
            .filter(incident_action_model::Column::IncidentId.eq(incident_id))
            .one(&self.db)
            .await
    }

    /// 削除されていない担当割り当て（assign_id 昇順）
    pub async fn find_assignments(
        &self,
        incident_id: i32,
    ) -> Result<Vec<incident_assign_model::Model>, DbErr> {
        AssignEntity::find()
            .filter(incident_assign_model::Column::IncidentId.eq(incident_id))
            .filter(incident_assign_model::Column::DelMark.eq(false))
            .order_by_asc(incident_assign_model::Column::AssignId)
            .all(&self.db)
            .await
    }

    // --- トランザクション内で使う書き込み ---

    /// 原因分析を登録（incident_id の一意制約違反はそのまま返す）
    pub async fn insert_analysis<C>(
        conn: &C,
        analysis: ActionActiveModel,
    ) -> Result<incident_action_model::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        analysis.insert(conn).await
    }

    /// 担当割り当てを順に登録
    pub async fn insert_assignments<C>(
        conn: &C,
        assignments: Vec<AssignActiveModel>,
    ) -> Result<Vec<incident_assign_model::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut inserted = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            inserted.push(assignment.insert(conn).await?);
        }
        Ok(inserted)
    }
}
