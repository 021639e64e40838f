// src/service/incident_action_service.rs

use crate::api::dto::incident_action_dto::{
    AssignDetailsResponse, AssignmentResponse, CreateIncidentActionRequest,
    CreateIncidentActionResponse, IncidentActionResponse, NewAssignment, ValidatedIncidentAction,
};
use crate::api::dto::incident_dto::IncidentResponse;
use crate::db::DbPool;
use crate::domain::incident_action_model::ActiveModel as ActionActiveModel;
use crate::domain::incident_assign_model::ActiveModel as AssignActiveModel;
use crate::error::{AppError, AppResult};
use crate::repository::incident_action_repository::IncidentActionRepository;
use crate::repository::incident_repository::IncidentRepository;
use crate::service::incident_service::not_found;
use crate::utils::json_column;
use crate::utils::transaction::TransactionManager;
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

pub const DUPLICATE_ANALYSIS_MESSAGE: &str = "IncidentAction already Assigned for this IncidentID.";

pub struct IncidentActionService {
    db: DbPool,
    incident_repo: Arc<IncidentRepository>,
    action_repo: Arc<IncidentActionRepository>,
}

impl IncidentActionService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            incident_repo: Arc::new(IncidentRepository::new(db_pool.clone())),
            action_repo: Arc::new(IncidentActionRepository::new(db_pool.clone())),
            db: db_pool,
        }
    }

    /// 原因分析と担当割り当てを1トランザクションで登録
    pub async fn create_actions(
        &self,
        validated: ValidatedIncidentAction,
    ) -> AppResult<CreateIncidentActionResponse> {
        let incident_id = validated.incident_id;
        let now = Utc::now();

        let analysis = analysis_active_model(incident_id, &validated.analysis, now)?;
        let assignments = validated
            .assignments
            .iter()
            .map(|assignment| assignment_active_model(incident_id, assignment, now))
            .collect::<AppResult<Vec<_>>>()?;

        let missing_incident = format!("Incident {} not found", incident_id);

        let assignments_created = self
            .db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    IncidentActionRepository::insert_analysis(txn, analysis)
                        .await
                        .map_err(|e| {
                            AppError::from_write_error(e, DUPLICATE_ANALYSIS_MESSAGE, &missing_incident)
                        })?;

                    let inserted = IncidentActionRepository::insert_assignments(txn, assignments)
                        .await
                        .map_err(|e| {
                            AppError::from_write_error(e, DUPLICATE_ANALYSIS_MESSAGE, &missing_incident)
                        })?;

                    Ok(inserted.len())
                })
            })
            .await?;

        info!(
            incident_id = incident_id,
            assignments_created = assignments_created,
            "Incident action analysis saved"
        );

        Ok(CreateIncidentActionResponse {
            message: "IncidentActions and Actions saved successfully".to_string(),
            incident_id,
            assignments_created,
        })
    }

    /// インシデント・原因分析・担当割り当てをまとめて取得
    pub async fn get_assign_details(&self, incident_id: i32) -> AppResult<AssignDetailsResponse> {
        let incident = self
            .incident_repo
            .find_by_id(incident_id)
            .await?
            .ok_or_else(|| not_found(incident_id))?;

        let analysis = self.action_repo.find_by_incident(incident_id).await?;
        let assignments = self.action_repo.find_assignments(incident_id).await?;

        Ok(AssignDetailsResponse {
            incident: IncidentResponse::from(incident),
            analysis: analysis.map(IncidentActionResponse::from),
            actions: assignments
                .into_iter()
                .map(AssignmentResponse::from)
                .collect(),
        })
    }
}

// 空配列は "[]" として保存し、未指定は NULL のまま
fn encode_optional<T: Serialize>(value: &Option<T>) -> AppResult<Option<String>> {
    value.as_ref().map(json_column::encode).transpose()
}

fn analysis_active_model(
    incident_id: i32,
    r: &CreateIncidentActionRequest,
    now: DateTime<Utc>,
) -> AppResult<ActionActiveModel> {
    Ok(ActionActiveModel {
        incident_id: Set(incident_id),
        cft_members: Set(r.cft_members.clone()),
        past_incident: Set(r.past_incident.clone()),
        past_incident_details: Set(r.past_incident_details.clone()),
        incident_summary: Set(r.incident_summary.clone()),
        chronology: Set(encode_optional(&r.chronology)?),
        attachments: Set(encode_optional(&r.attachments)?),
        facts: Set(r.facts.clone()),
        evidence: Set(r.evidence.clone()),
        driver_statement: Set(r.driver_statement.clone()),
        supervisor_statement: Set(r.supervisor_statement.clone()),
        man_causes: Set(encode_optional(&r.man_causes)?),
        machine_causes: Set(encode_optional(&r.machine_causes)?),
        method_causes: Set(encode_optional(&r.method_causes)?),
        mother_nature_causes: Set(encode_optional(&r.mother_nature_causes)?),
        probable_cause: Set(r.probable_cause.clone()),
        why_analysis: Set(encode_optional(&r.why_analysis)?),
        actual_root_cause: Set(r.actual_root_cause.clone()),
        corrective_action: Set(r.corrective_action.clone()),
        preventive_action: Set(r.preventive_action.clone()),
        actions: Set(encode_optional(&r.actions)?),
        prepared_by: Set(r.prepared_by.clone()),
        prepared_by_user_id: Set(r.prepared_by_user_id.clone()),
        created_on: Set(now),
        ..Default::default()
    })
}

fn assignment_active_model(
    incident_id: i32,
    a: &NewAssignment,
    now: DateTime<Utc>,
) -> AppResult<AssignActiveModel> {
    Ok(AssignActiveModel {
        incident_id: Set(incident_id),
        action: Set(a.action.clone()),
        status: Set(a.status.clone()),
        assign_user: Set(a.assign_user.clone()),
        doc_reff: Set(a.doc_reff.clone()),
        target_date: Set(a.target_date),
        responsible_id: Set(a.responsible_id.clone()),
        attachments_assign: Set(encode_optional(&a.attachments_assign)?),
        is_active: Set(true),
        del_mark: Set(false),
        created_on: Set(now),
        created_by: Set(a.created_by.clone()),
        ..Default::default()
    })
}
