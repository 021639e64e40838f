// src/domain/incident_assign_model.rs

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 是正措置の担当割り当て
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incident_assigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub assign_id: i32,

    pub incident_id: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub action: Option<String>,
    #[sea_orm(nullable)]
    pub status: Option<String>,
    #[sea_orm(nullable)]
    pub assign_user: Option<String>,
    #[sea_orm(nullable)]
    pub doc_reff: Option<String>,
    #[sea_orm(nullable)]
    pub target_date: Option<NaiveDate>,
    #[sea_orm(nullable)]
    pub responsible_id: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub attachments_assign: Option<String>,

    pub is_active: bool,
    pub del_mark: bool,
    pub created_on: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub created_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::incident_report_model::Entity",
        from = "Column::IncidentId",
        to = "super::incident_report_model::Column::IncidentId",
        on_delete = "Cascade"
    )]
    Incident,

    #[sea_orm(has_many = "super::incident_assign_file_model::Entity")]
    Files,
}

impl Related<super::incident_report_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incident.def()
    }
}

impl Related<super::incident_assign_file_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
