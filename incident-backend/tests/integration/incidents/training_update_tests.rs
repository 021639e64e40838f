// tests/integration/incidents/training_update_tests.rs

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::common::{app_helper, request, test_data};

async fn create_incident(app: &app_helper::TestApp) -> i64 {
    let res = app
        .app()
        .oneshot(request::json_request(
            "POST",
            "/api/incidents",
            &test_data::typed_incident_payload(),
        ))
        .await
        .unwrap();
    request::read_json(res).await["incidentId"].as_i64().unwrap()
}

async fn fetch_incident(app: &app_helper::TestApp, incident_id: i64) -> Value {
    let res = app
        .app()
        .oneshot(request::get(&format!("/api/incident/{}", incident_id)))
        .await
        .unwrap();
    request::read_json(res).await
}

#[tokio::test]
async fn test_update_training_saves_and_notifies() {
    // Arrange
    let app = app_helper::setup_app().await;
    let incident_id = create_incident(&app).await;

    // Act
    let res = app
        .app()
        .oneshot(request::json_request(
            "PUT",
            &format!("/api/incident/{}", incident_id),
            &json!({
                "trainingTypeRequired": "Confined space",
                "trainingDescription": "Refresher for all fitters",
                "updatedBy": "A. Sharma"
            }),
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::OK);
    let body = request::read_json(res).await;
    assert_eq!(body["incidentId"], incident_id);
    assert_eq!(body["emailSent"], true);

    let incident = fetch_incident(&app, incident_id).await;
    assert_eq!(incident["training_type_required"], "Confined space");
    assert_eq!(incident["training_description"], "Refresher for all fitters");
    assert_eq!(incident["training_updated_by"], "A. Sharma");
    assert!(incident["training_updated_on"].is_string());

    let sent = app.email().sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].subject,
        format!("Training Information Updated - Incident #{}", incident_id)
    );
    assert_eq!(sent[0].to_emails, vec![app_helper::NOTIFY_RECIPIENT.to_string()]);
    assert!(sent[0].text_body.contains("Confined space"));
    assert!(sent[0].text_body.contains("A. Sharma"));
}

#[tokio::test]
async fn test_update_training_keeps_omitted_fields() {
    // Arrange
    let app = app_helper::setup_app().await;
    let incident_id = create_incident(&app).await;
    let uri = format!("/api/incident/{}", incident_id);

    app.app()
        .oneshot(request::json_request(
            "PUT",
            &uri,
            &json!({"training_type_required": "Hot work", "training_description": "Permit refresher"}),
        ))
        .await
        .unwrap();

    // Act
    let res = app
        .app()
        .oneshot(request::json_request(
            "PUT",
            &uri,
            &json!({"training_description": "Updated refresher"}),
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::OK);
    let incident = fetch_incident(&app, incident_id).await;
    assert_eq!(incident["training_type_required"], "Hot work");
    assert_eq!(incident["training_description"], "Updated refresher");
    // 更新者の指定がなければ既定値
    assert_eq!(incident["training_updated_by"], "System");
    assert_eq!(app.email().sent_messages().len(), 2);
}

#[tokio::test]
async fn test_update_training_unknown_incident_sends_nothing() {
    // Arrange
    let app = app_helper::setup_app().await;

    // Act
    let res = app
        .app()
        .oneshot(request::json_request(
            "PUT",
            "/api/incident/4242",
            &json!({"trainingTypeRequired": "Hot work"}),
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(app.email().sent_messages().is_empty());
}

#[tokio::test]
async fn test_update_training_requires_a_field() {
    // Arrange
    let app = app_helper::setup_app().await;
    let incident_id = create_incident(&app).await;

    // Act
    let res = app
        .app()
        .oneshot(request::json_request(
            "PUT",
            &format!("/api/incident/{}", incident_id),
            &json!({"updatedBy": "A. Sharma", "trainingDescription": "  "}),
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(app.email().sent_messages().is_empty());
}

#[tokio::test]
async fn test_update_training_succeeds_when_email_fails() {
    // Arrange: 通知先なしでは送信に失敗する
    let app = app_helper::setup_app_with_recipients(Vec::new()).await;
    let incident_id = create_incident(&app).await;

    // Act
    let res = app
        .app()
        .oneshot(request::json_request(
            "PUT",
            &format!("/api/incident/{}", incident_id),
            &json!({"trainingTypeRequired": "Working at height"}),
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::OK);
    let body = request::read_json(res).await;
    assert_eq!(body["emailSent"], false);

    let incident = fetch_incident(&app, incident_id).await;
    assert_eq!(incident["training_type_required"], "Working at height");
}
