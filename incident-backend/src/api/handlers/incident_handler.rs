// src/api/handlers/incident_handler.rs
use super::json_rejection;
use crate::api::dto::incident_dto::{
    CreateIncidentPayload, CreateIncidentResponse, IncidentResponse, UpdateTrainingRequest,
    UpdateTrainingResponse,
};
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::ValidatedId;
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::Value;
use tracing::info;

/// インシデント登録（型付き形式・旧フォーム形式の両方を受け付ける）
pub async fn create_incident_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = payload.map_err(json_rejection)?;

    let payload = CreateIncidentPayload::from_json(body)?;
    let is_legacy = payload.is_legacy();
    let incident = payload.into_new_incident()?;

    info!(
        legacy_shape = is_legacy,
        title = %incident.incident_title,
        "Incident submission received"
    );

    let (incident_id, timestamp) = app_state.incident_service.create_incident(incident).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateIncidentResponse {
            message: "Incident report submitted successfully".to_string(),
            incident_id,
            timestamp,
        }),
    ))
}

/// インシデント一覧（新しい順）
pub async fn list_incidents_handler(
    State(app_state): State<AppState>,
) -> AppResult<Json<Vec<IncidentResponse>>> {
    let incidents = app_state.incident_service.list_incidents().await?;

    info!(count = incidents.len(), "Incidents listed");
    Ok(Json(incidents))
}

pub async fn get_incident_handler(
    State(app_state): State<AppState>,
    ValidatedId(incident_id): ValidatedId,
) -> AppResult<Json<IncidentResponse>> {
    let incident = app_state.incident_service.get_incident(incident_id).await?;
    Ok(Json(incident))
}

/// 教育情報の更新と通知
pub async fn update_training_handler(
    State(app_state): State<AppState>,
    ValidatedId(incident_id): ValidatedId,
    payload: Result<Json<UpdateTrainingRequest>, JsonRejection>,
) -> AppResult<Json<UpdateTrainingResponse>> {
    let Json(request) = payload.map_err(json_rejection)?;
    let update = request.into_update()?;

    let response = app_state
        .incident_service
        .update_training(incident_id, update)
        .await?;

    info!(
        incident_id = incident_id,
        email_sent = response.email_sent,
        "Training update handled"
    );
    Ok(Json(response))
}

pub fn incident_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/incidents",
            get(list_incidents_handler).post(create_incident_handler),
        )
        .route(
            "/incident/{id}",
            get(get_incident_handler).put(update_training_handler),
        )
        .with_state(app_state)
}
