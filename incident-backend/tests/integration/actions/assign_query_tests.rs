// tests/integration/actions/assign_query_tests.rs

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::common::{app_helper, request, test_data};

async fn create_incident_with_actions(app: &app_helper::TestApp, responsible_ids: &[i32]) -> i64 {
    let res = app
        .app()
        .oneshot(request::json_request(
            "POST",
            "/api/incidents",
            &test_data::typed_incident_payload(),
        ))
        .await
        .unwrap();
    let incident_id = request::read_json(res).await["incidentId"].as_i64().unwrap();

    if !responsible_ids.is_empty() {
        let res = app
            .app()
            .oneshot(request::json_request(
                "POST",
                "/api/incident-actions",
                &test_data::incident_action_payload(incident_id as i32, responsible_ids),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    incident_id
}

#[tokio::test]
async fn test_assign_details_without_analysis() {
    // Arrange
    let app = app_helper::setup_app().await;
    let incident_id = create_incident_with_actions(&app, &[]).await;

    // Act
    let res = app
        .app()
        .oneshot(request::get(&format!(
            "/api/incident/assign-user/details?incidentId={}",
            incident_id
        )))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::OK);
    let body = request::read_json(res).await;
    // インシデント本体の項目はトップレベルに展開される
    assert_eq!(body["incident_id"], incident_id);
    assert_eq!(body["location"], "Boiler House");
    assert!(body["analysis"].is_null());
    assert_eq!(body["actions"], json!([]));
}

#[tokio::test]
async fn test_assign_details_query_errors() {
    // Arrange
    let app = app_helper::setup_app().await;

    // Act
    let missing = app
        .app()
        .oneshot(request::get("/api/incident/assign-user/details"))
        .await
        .unwrap();
    let invalid = app
        .app()
        .oneshot(request::get("/api/incident/assign-user/details?incidentId=abc"))
        .await
        .unwrap();
    let unknown = app
        .app()
        .oneshot(request::get("/api/incident/assign-user/details?incidentId=555"))
        .await
        .unwrap();

    // Assert
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        request::read_json(missing).await["message"],
        "incidentId is required"
    );
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_incidents_for_assignee() {
    // Arrange
    let app = app_helper::setup_app().await;
    let first = create_incident_with_actions(&app, &[17, 18]).await;
    let second = create_incident_with_actions(&app, &[17]).await;
    let _unrelated = create_incident_with_actions(&app, &[30]).await;

    // Act
    let res = app
        .app()
        .oneshot(request::get("/api/incidents/assign-user?assignUserId=17"))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::OK);
    let body = request::read_json(res).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|incident| incident["incident_id"].as_i64().unwrap())
        .collect();
    // 複数の割り当てがあっても1件として返る
    assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn test_incidents_for_assignee_without_matches() {
    // Arrange
    let app = app_helper::setup_app().await;
    create_incident_with_actions(&app, &[17]).await;

    // Act
    let none = app
        .app()
        .oneshot(request::get("/api/incidents/assign-user?assignUserId=99"))
        .await
        .unwrap();
    let missing = app
        .app()
        .oneshot(request::get("/api/incidents/assign-user"))
        .await
        .unwrap();

    // Assert
    assert_eq!(none.status(), StatusCode::OK);
    assert_eq!(request::read_json(none).await, json!([]));
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
}
