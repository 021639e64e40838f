// src/repository/incident_repository.rs

use crate::domain::incident_assign_model;
use crate::domain::incident_report_model::{
    self, ActiveModel as IncidentActiveModel, Entity as IncidentEntity,
};
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{DbConn, DbErr, QueryFilter, QueryOrder};

/// 教育情報の更新内容（None の列は変更しない）
#[derive(Debug, Clone)]
pub struct TrainingColumns<'a> {
    pub training_type_required: Option<&'a str>,
    pub training_description: Option<&'a str>,
    pub updated_by: &'a str,
    pub updated_on: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct IncidentRepository {
    db: DbConn,
}

impl IncidentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// インシデントを登録
    pub async fn create(
        &self,
        incident: IncidentActiveModel,
    ) -> Result<incident_report_model::Model, DbErr> {
        incident.insert(&self.db).await
    }

    /// 全インシデント（新しい順）
    pub async fn find_all(&self) -> Result<Vec<incident_report_model::Model>, DbErr> {
        IncidentEntity::find()
            .order_by_desc(incident_report_model::Column::IncidentId)
            .all(&self.db)
            .await
    }

    pub async fn find_by_id(
        &self,
        incident_id: i32,
    ) -> Result<Option<incident_report_model::Model>, DbErr> {
        IncidentEntity::find_by_id(incident_id).one(&self.db).await
    }

    /// 教育情報を更新し、影響行数を返す
    pub async fn update_training(
        &self,
        incident_id: i32,
        columns: TrainingColumns<'_>,
    ) -> Result<u64, DbErr> {
        let mut update = IncidentEntity::update_many()
            .col_expr(
                incident_report_model::Column::TrainingUpdatedBy,
                Expr::value(columns.updated_by),
            )
            .col_expr(
                incident_report_model::Column::TrainingUpdatedOn,
                Expr::value(columns.updated_on),
            );

        if let Some(training_type) = columns.training_type_required {
            update = update.col_expr(
                incident_report_model::Column::TrainingTypeRequired,
                Expr::value(training_type),
            );
        }

        if let Some(description) = columns.training_description {
            update = update.col_expr(
                incident_report_model::Column::TrainingDescription,
                Expr::value(description),
            );
        }

        let result = update
            .filter(incident_report_model::Column::IncidentId.eq(incident_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// 有効な担当割り当てを持つインシデント（担当者ID指定、新しい順）
    pub async fn find_by_responsible(
        &self,
        responsible_id: &str,
    ) -> Result<Vec<incident_report_model::Model>, DbErr> {
        let assigned = Query::select()
            .column(incident_assign_model::Column::IncidentId)
            .from(incident_assign_model::Entity)
            .and_where(incident_assign_model::Column::ResponsibleId.eq(responsible_id))
            .and_where(incident_assign_model::Column::DelMark.eq(false))
            .to_owned();

        IncidentEntity::find()
            .filter(incident_report_model::Column::IncidentId.in_subquery(assigned))
            .order_by_desc(incident_report_model::Column::IncidentId)
            .all(&self.db)
            .await
    }
}
