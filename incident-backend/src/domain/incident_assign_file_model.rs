// src/domain/incident_assign_file_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 担当割り当てに紐づく添付ファイル
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incident_assign_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub file_id: i32,
    pub assign_id: i32,
    pub file_name: String,
    #[sea_orm(nullable)]
    pub content_type: Option<String>,
    pub file_size: i64,
    #[serde(skip)]
    pub file_data: Vec<u8>,
    pub uploaded_on: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub uploaded_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::incident_assign_model::Entity",
        from = "Column::AssignId",
        to = "super::incident_assign_model::Column::AssignId",
        on_delete = "Cascade"
    )]
    Assign,
}

impl Related<super::incident_assign_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assign.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
