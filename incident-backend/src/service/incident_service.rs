// src/service/incident_service.rs

use crate::api::dto::incident_dto::{
    IncidentResponse, NewIncident, TrainingUpdate, UpdateTrainingResponse,
};
use crate::db::DbPool;
use crate::domain::incident_report_model::ActiveModel as IncidentActiveModel;
use crate::error::{AppError, AppResult};
use crate::repository::incident_repository::{IncidentRepository, TrainingColumns};
use crate::utils::email::{EmailService, TrainingUpdateNotice};
use crate::utils::json_column;
use chrono::{DateTime, Utc};
use sea_orm::Set;
use std::sync::Arc;
use tracing::{info, warn};

pub struct IncidentService {
    incident_repo: Arc<IncidentRepository>,
    email_service: Arc<EmailService>,
}

impl IncidentService {
    pub fn new(db_pool: DbPool, email_service: Arc<EmailService>) -> Self {
        Self {
            incident_repo: Arc::new(IncidentRepository::new(db_pool)),
            email_service,
        }
    }

    /// インシデントを登録し、採番されたIDを返す
    pub async fn create_incident(&self, incident: NewIncident) -> AppResult<(i32, DateTime<Utc>)> {
        let now = Utc::now();
        let model = self.incident_repo.create(to_active_model(incident, now)?).await?;

        info!(incident_id = model.incident_id, "Incident report created");
        Ok((model.incident_id, model.created_on))
    }

    pub async fn list_incidents(&self) -> AppResult<Vec<IncidentResponse>> {
        let incidents = self.incident_repo.find_all().await?;
        Ok(incidents.into_iter().map(IncidentResponse::from).collect())
    }

    pub async fn get_incident(&self, incident_id: i32) -> AppResult<IncidentResponse> {
        self.incident_repo
            .find_by_id(incident_id)
            .await?
            .map(IncidentResponse::from)
            .ok_or_else(|| not_found(incident_id))
    }

    /// 教育情報を更新し、通知メールを送信
    ///
    /// 更新後のメール送信失敗はエラーにせず `email_sent: false` で返す。
    pub async fn update_training(
        &self,
        incident_id: i32,
        update: TrainingUpdate,
    ) -> AppResult<UpdateTrainingResponse> {
        let updated_on = Utc::now();

        let affected = self
            .incident_repo
            .update_training(
                incident_id,
                TrainingColumns {
                    training_type_required: update.training_type_required.as_deref(),
                    training_description: update.training_description.as_deref(),
                    updated_by: &update.updated_by,
                    updated_on,
                },
            )
            .await?;

        if affected == 0 {
            return Err(not_found(incident_id));
        }

        info!(
            incident_id = incident_id,
            updated_by = %update.updated_by,
            "Training information updated"
        );

        let notice = TrainingUpdateNotice {
            incident_id,
            training_type_required: update.training_type_required.as_deref(),
            training_description: update.training_description.as_deref(),
            updated_by: &update.updated_by,
            updated_on,
        };

        let email_sent = match self
            .email_service
            .send_training_update_notification(&notice)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    incident_id = incident_id,
                    error = %e,
                    "Training update saved but notification email failed"
                );
                false
            }
        };

        Ok(UpdateTrainingResponse {
            message: if email_sent {
                "Training information updated and notification sent".to_string()
            } else {
                "Training information updated but notification email could not be sent"
                    .to_string()
            },
            incident_id,
            email_sent,
        })
    }

    /// 担当者に割り当てのあるインシデント
    pub async fn list_for_responsible(&self, responsible_id: &str) -> AppResult<Vec<IncidentResponse>> {
        let incidents = self.incident_repo.find_by_responsible(responsible_id).await?;
        Ok(incidents.into_iter().map(IncidentResponse::from).collect())
    }
}

pub(crate) fn not_found(incident_id: i32) -> AppError {
    AppError::NotFound(format!("Incident {} not found", incident_id))
}

fn to_active_model(incident: NewIncident, now: DateTime<Utc>) -> AppResult<IncidentActiveModel> {
    let types = &incident.types;

    Ok(IncidentActiveModel {
        incident_date: Set(incident.incident_date),
        incident_time: Set(incident.incident_time),
        location: Set(incident.location),
        weather_condition: Set(incident.weather_condition),
        htpl_shift_in_charge: Set(incident.htpl_shift_in_charge),
        contractor_supervisor: Set(incident.contractor_supervisor),
        incident_reported_by: Set(incident.incident_reported_by),
        report_prepared_by: Set(incident.report_prepared_by),
        created_by: Set(incident.created_by),
        incident_title: Set(incident.incident_title),
        incident_summary: Set(incident.incident_summary),
        type_injury: Set(types.injury.reported),
        count_injury: Set(types.injury.count),
        type_property_damage: Set(types.property_damage.reported),
        count_property_damage: Set(types.property_damage.count),
        type_fire: Set(types.fire.reported),
        count_fire: Set(types.fire.count),
        type_near_miss: Set(types.near_miss.reported),
        count_near_miss: Set(types.near_miss.count),
        type_environment: Set(types.environment.reported),
        count_environment: Set(types.environment.count),
        type_fatality: Set(types.fatality.reported),
        count_fatality: Set(types.fatality.count),
        type_other: Set(types.other.reported),
        count_other: Set(types.other.count),
        injured_htpl_employees: Set(Some(json_column::encode(&incident.injured_htpl_employees)?)),
        injured_contract_workers: Set(Some(json_column::encode(
            &incident.injured_contract_workers,
        )?)),
        injured_visitors: Set(Some(json_column::encode(&incident.injured_visitors)?)),
        uploaded_files: Set(Some(json_column::encode(&incident.uploaded_files)?)),
        training_type_required: Set(None),
        training_description: Set(None),
        training_updated_by: Set(None),
        training_updated_on: Set(None),
        status: Set(incident.status),
        created_on: Set(now),
        ..Default::default()
    })
}
