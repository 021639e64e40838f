// src/domain/incident_report_model.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STATUS: &str = "active";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incident_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub incident_id: i32,

    pub incident_date: NaiveDate,
    pub incident_time: NaiveTime,
    pub location: String,
    pub weather_condition: String,

    pub htpl_shift_in_charge: String,
    #[sea_orm(nullable)]
    pub contractor_supervisor: Option<String>,
    pub incident_reported_by: String,
    pub report_prepared_by: String,
    #[sea_orm(nullable)]
    pub created_by: Option<String>,

    pub incident_title: String,
    #[sea_orm(column_type = "Text")]
    pub incident_summary: String,

    pub type_injury: bool,
    pub count_injury: i32,
    pub type_property_damage: bool,
    pub count_property_damage: i32,
    pub type_fire: bool,
    pub count_fire: i32,
    pub type_near_miss: bool,
    pub count_near_miss: i32,
    pub type_environment: bool,
    pub count_environment: i32,
    pub type_fatality: bool,
    pub count_fatality: i32,
    pub type_other: bool,
    pub count_other: i32,

    // JSONテキスト列（utils::json_column 経由で読み書き）
    #[sea_orm(column_type = "Text", nullable)]
    pub injured_htpl_employees: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub injured_contract_workers: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub injured_visitors: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub uploaded_files: Option<String>,

    #[sea_orm(nullable)]
    pub training_type_required: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub training_description: Option<String>,
    #[sea_orm(nullable)]
    pub training_updated_by: Option<String>,
    #[sea_orm(nullable)]
    pub training_updated_on: Option<DateTime<Utc>>,

    pub status: String,
    pub created_on: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::incident_action_model::Entity")]
    Action,

    #[sea_orm(has_many = "super::incident_assign_model::Entity")]
    Assigns,

    #[sea_orm(has_many = "super::incident_file_model::Entity")]
    Files,
}

impl Related<super::incident_action_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Action.def()
    }
}

impl Related<super::incident_assign_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assigns.def()
    }
}

impl Related<super::incident_file_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
