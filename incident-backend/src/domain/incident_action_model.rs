// src/domain/incident_action_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 原因分析（インシデントごとに1件）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incident_actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub action_id: i32,

    #[sea_orm(unique)]
    pub incident_id: i32,

    #[sea_orm(nullable)]
    pub cft_members: Option<String>,
    #[sea_orm(nullable)]
    pub past_incident: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub past_incident_details: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub incident_summary: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub chronology: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub attachments: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub facts: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub evidence: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub driver_statement: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub supervisor_statement: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub man_causes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub machine_causes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub method_causes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub mother_nature_causes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub probable_cause: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub why_analysis: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub actual_root_cause: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub corrective_action: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub preventive_action: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub actions: Option<String>,

    #[sea_orm(nullable)]
    pub prepared_by: Option<String>,
    #[sea_orm(nullable)]
    pub prepared_by_user_id: Option<String>,

    pub created_on: DateTime<Utc>,
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
}

impl Related<super::incident_report_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incident.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
