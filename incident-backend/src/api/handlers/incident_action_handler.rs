// src/api/handlers/incident_action_handler.rs
use super::{json_rejection, query_rejection};
use crate::api::dto::incident_action_dto::{
    AssignDetailsQuery, AssignDetailsResponse, AssignUserQuery, CreateIncidentActionRequest,
    CreateIncidentActionResponse,
};
use crate::api::dto::incident_dto::IncidentResponse;
use crate::api::AppState;
use crate::error::AppResult;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tracing::info;

/// 原因分析と是正措置の登録
pub async fn create_incident_actions_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<CreateIncidentActionRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreateIncidentActionResponse>)> {
    let Json(request) = payload.map_err(json_rejection)?;
    let validated = request.into_validated()?;

    info!(
        incident_id = validated.incident_id,
        action_count = validated.assignments.len(),
        "Incident action submission received"
    );

    let response = app_state
        .incident_action_service
        .create_actions(validated)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// インシデント・原因分析・担当割り当ての複合取得
pub async fn get_assign_details_handler(
    State(app_state): State<AppState>,
    query: Result<Query<AssignDetailsQuery>, QueryRejection>,
) -> AppResult<Json<AssignDetailsResponse>> {
    let Query(query) = query.map_err(query_rejection)?;
    let incident_id = query.incident_id()?;

    let details = app_state
        .incident_action_service
        .get_assign_details(incident_id)
        .await?;

    info!(
        incident_id = incident_id,
        has_analysis = details.analysis.is_some(),
        assignment_count = details.actions.len(),
        "Assignment details retrieved"
    );
    Ok(Json(details))
}

/// 担当者に割り当てのあるインシデント一覧
pub async fn list_incidents_for_assignee_handler(
    State(app_state): State<AppState>,
    query: Result<Query<AssignUserQuery>, QueryRejection>,
) -> AppResult<Json<Vec<IncidentResponse>>> {
    let Query(query) = query.map_err(query_rejection)?;
    let responsible_id = query.responsible_id()?;

    let incidents = app_state
        .incident_service
        .list_for_responsible(&responsible_id)
        .await?;

    info!(
        responsible_id = %responsible_id,
        count = incidents.len(),
        "Incidents listed for assignee"
    );
    Ok(Json(incidents))
}

pub fn incident_action_router(app_state: AppState) -> Router {
    Router::new()
        .route("/incident-actions", post(create_incident_actions_handler))
        .route(
            "/incident/assign-user/details",
            get(get_assign_details_handler),
        )
        .route(
            "/incidents/assign-user",
            get(list_incidents_for_assignee_handler),
        )
        .with_state(app_state)
}
