// src/api/dto/incident_action_dto.rs

use super::incident_dto::{IncidentResponse, INVALID_DATE_MESSAGE};
use crate::domain::composite::{
    deserialize_optional_i32_from_string, deserialize_optional_string_or_number, ActionItem,
    JsonArray,
};
use crate::domain::{incident_action_model, incident_assign_model};
use crate::error::{AppError, AppResult};
use crate::utils::datetime::parse_target_date;
use crate::utils::json_column;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// 担当割り当て列の最大長
const ASSIGN_TEXT_MAX: usize = 100;
const RESPONSIBLE_ID_MAX: usize = 50;

/// 原因分析と是正措置の登録リクエスト
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentActionRequest {
    #[serde(default, deserialize_with = "deserialize_optional_i32_from_string")]
    pub id: Option<i32>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub cft_members: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string_or_number")]
    #[validate(length(max = 10, message = "must be at most 10 characters"))]
    pub past_incident: Option<String>,
    pub past_incident_details: Option<String>,
    pub incident_summary: Option<String>,
    pub chronology: Option<JsonArray>,
    pub attachments: Option<JsonArray>,
    pub facts: Option<String>,
    pub evidence: Option<String>,
    pub driver_statement: Option<String>,
    pub supervisor_statement: Option<String>,
    pub man_causes: Option<JsonArray>,
    pub machine_causes: Option<JsonArray>,
    pub method_causes: Option<JsonArray>,
    pub mother_nature_causes: Option<JsonArray>,
    pub probable_cause: Option<String>,
    pub why_analysis: Option<JsonArray>,
    pub actual_root_cause: Option<String>,
    pub corrective_action: Option<String>,
    pub preventive_action: Option<String>,
    pub actions: Option<JsonArray>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub prepared_by: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string_or_number")]
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub prepared_by_user_id: Option<String>,
}

/// 担当割り当て1行分
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub action: Option<String>,
    pub status: Option<String>,
    pub assign_user: Option<String>,
    pub doc_reff: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub responsible_id: Option<String>,
    pub attachments_assign: Option<JsonArray>,
    pub created_by: Option<String>,
}

/// 書き込み前に検証済みの登録内容
#[derive(Debug, Clone)]
pub struct ValidatedIncidentAction {
    pub incident_id: i32,
    pub analysis: CreateIncidentActionRequest,
    pub assignments: Vec<NewAssignment>,
}

impl CreateIncidentActionRequest {
    /// 書き込み前の検証（インシデントID・列の長さ・目標日の形式）
    pub fn into_validated(self) -> AppResult<ValidatedIncidentAction> {
        let incident_id = self
            .id
            .ok_or_else(|| AppError::MissingFields(vec!["id".to_string()]))?;
        self.validate()?;

        let prepared_by = non_blank(self.prepared_by.as_deref());

        let mut errors = Vec::new();
        let mut assignments = Vec::new();

        for (index, value) in self.actions.iter().flatten().enumerate() {
            let item = ActionItem::from_value(value);
            let target_date = match non_blank(item.target_date.as_deref()) {
                Some(raw) => match parse_target_date(&raw) {
                    Some(date) => Some(date),
                    None => {
                        errors.push(format!("actions[{}].targetDate: {}", index, INVALID_DATE_MESSAGE));
                        None
                    }
                },
                None => None,
            };

            let attachments_assign = match item.attachments_assign {
                None => None,
                Some(serde_json::Value::Array(files)) => Some(files),
                Some(_) => {
                    errors.push(format!("actions[{}].attachmentsAssign: must be an array", index));
                    None
                }
            };

            let assignment = NewAssignment {
                action: non_blank(item.action.as_deref()),
                status: non_blank(item.status.as_deref()),
                assign_user: non_blank(item.responsibility.as_deref()),
                doc_reff: non_blank(item.doc_ref.as_deref()),
                target_date,
                responsible_id: non_blank(item.responsible_id.as_deref()),
                attachments_assign,
                created_by: prepared_by.clone(),
            };
            assignment.check_lengths(index, &mut errors);
            assignments.push(assignment);
        }

        match errors.len() {
            0 => Ok(ValidatedIncidentAction {
                incident_id,
                analysis: self,
                assignments,
            }),
            1 => Err(AppError::ValidationError(errors.remove(0))),
            _ => Err(AppError::ValidationErrors(errors)),
        }
    }
}

impl NewAssignment {
    fn check_lengths(&self, index: usize, errors: &mut Vec<String>) {
        let columns = [
            ("status", self.status.as_deref(), ASSIGN_TEXT_MAX),
            ("responsibility", self.assign_user.as_deref(), ASSIGN_TEXT_MAX),
            ("docRef", self.doc_reff.as_deref(), ASSIGN_TEXT_MAX),
            ("responsibleId", self.responsible_id.as_deref(), RESPONSIBLE_ID_MAX),
        ];

        for (key, value, max) in columns {
            if value.is_some_and(|v| v.chars().count() > max) {
                errors.push(format!(
                    "actions[{}].{}: must be at most {} characters",
                    index, key, max
                ));
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentActionResponse {
    pub message: String,
    pub incident_id: i32,
    pub assignments_created: usize,
}

// --- 照会 ---

#[derive(Debug, Deserialize)]
pub struct AssignDetailsQuery {
    #[serde(rename = "incidentId")]
    pub incident_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignUserQuery {
    #[serde(rename = "assignUserId")]
    pub assign_user_id: Option<String>,
}

impl AssignDetailsQuery {
    pub fn incident_id(&self) -> AppResult<i32> {
        let raw = self
            .incident_id
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::BadRequest("incidentId is required".to_string()))?;

        raw.parse::<i32>().map_err(|_| {
            AppError::ValidationError(format!("incidentId must be an integer, got '{}'", raw))
        })
    }
}

impl AssignUserQuery {
    pub fn responsible_id(&self) -> AppResult<String> {
        non_blank(self.assign_user_id.as_deref())
            .ok_or_else(|| AppError::BadRequest("assignUserId is required".to_string()))
    }
}

/// 原因分析（JSON列はデコード済み）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncidentActionResponse {
    pub action_id: i32,
    pub incident_id: i32,
    pub cft_members: Option<String>,
    pub past_incident: Option<String>,
    pub past_incident_details: Option<String>,
    pub incident_summary: Option<String>,
    pub chronology: JsonArray,
    pub attachments: JsonArray,
    pub facts: Option<String>,
    pub evidence: Option<String>,
    pub driver_statement: Option<String>,
    pub supervisor_statement: Option<String>,
    pub man_causes: JsonArray,
    pub machine_causes: JsonArray,
    pub method_causes: JsonArray,
    pub mother_nature_causes: JsonArray,
    pub probable_cause: Option<String>,
    pub why_analysis: JsonArray,
    pub actual_root_cause: Option<String>,
    pub corrective_action: Option<String>,
    pub preventive_action: Option<String>,
    pub actions: JsonArray,
    pub prepared_by: Option<String>,
    pub prepared_by_user_id: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl From<incident_action_model::Model> for IncidentActionResponse {
    fn from(m: incident_action_model::Model) -> Self {
        Self {
            chronology: json_column::decode_or_default(m.chronology.as_deref(), "chronology"),
            attachments: json_column::decode_or_default(m.attachments.as_deref(), "attachments"),
            man_causes: json_column::decode_or_default(m.man_causes.as_deref(), "man_causes"),
            machine_causes: json_column::decode_or_default(
                m.machine_causes.as_deref(),
                "machine_causes",
            ),
            method_causes: json_column::decode_or_default(
                m.method_causes.as_deref(),
                "method_causes",
            ),
            mother_nature_causes: json_column::decode_or_default(
                m.mother_nature_causes.as_deref(),
                "mother_nature_causes",
            ),
            why_analysis: json_column::decode_or_default(m.why_analysis.as_deref(), "why_analysis"),
            actions: json_column::decode_or_default(m.actions.as_deref(), "actions"),
            action_id: m.action_id,
            incident_id: m.incident_id,
            cft_members: m.cft_members,
            past_incident: m.past_incident,
            past_incident_details: m.past_incident_details,
            incident_summary: m.incident_summary,
            facts: m.facts,
            evidence: m.evidence,
            driver_statement: m.driver_statement,
            supervisor_statement: m.supervisor_statement,
            probable_cause: m.probable_cause,
            actual_root_cause: m.actual_root_cause,
            corrective_action: m.corrective_action,
            preventive_action: m.preventive_action,
            prepared_by: m.prepared_by,
            prepared_by_user_id: m.prepared_by_user_id,
            created_on: m.created_on,
        }
    }
}

/// 担当割り当て
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentResponse {
    pub assign_id: i32,
    pub incident_id: i32,
    pub action: Option<String>,
    pub status: Option<String>,
    pub assign_user: Option<String>,
    pub doc_reff: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub responsible_id: Option<String>,
    pub attachments_assign: JsonArray,
    pub is_active: bool,
    pub created_on: DateTime<Utc>,
    pub created_by: Option<String>,
}

impl From<incident_assign_model::Model> for AssignmentResponse {
    fn from(m: incident_assign_model::Model) -> Self {
        Self {
            attachments_assign: json_column::decode_or_default(
                m.attachments_assign.as_deref(),
                "attachments_assign",
            ),
            assign_id: m.assign_id,
            incident_id: m.incident_id,
            action: m.action,
            status: m.status,
            assign_user: m.assign_user,
            doc_reff: m.doc_reff,
            target_date: m.target_date,
            responsible_id: m.responsible_id,
            is_active: m.is_active,
            created_on: m.created_on,
            created_by: m.created_by,
        }
    }
}

/// インシデント・原因分析・担当割り当ての複合レスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignDetailsResponse {
    #[serde(flatten)]
    pub incident: IncidentResponse,
    pub analysis: Option<IncidentActionResponse>,
    pub actions: Vec<AssignmentResponse>,
}
