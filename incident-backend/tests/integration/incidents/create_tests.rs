// tests/integration/incidents/create_tests.rs

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::common::{app_helper, request, test_data};

async fn create_incident(app: &app_helper::TestApp, payload: &Value) -> i32 {
    let res = app
        .app()
        .oneshot(request::json_request("POST", "/api/incidents", payload))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = request::read_json(res).await;
    body["incidentId"].as_i64().unwrap() as i32
}

#[tokio::test]
async fn test_create_typed_incident_and_fetch_it() {
    // Arrange
    let app = app_helper::setup_app().await;

    // Act
    let res = app
        .app()
        .oneshot(request::json_request(
            "POST",
            "/api/incidents",
            &test_data::typed_incident_payload(),
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = request::read_json(res).await;
    assert_eq!(body["message"], "Incident report submitted successfully");
    assert!(body["timestamp"].is_string());
    let incident_id = body["incidentId"].as_i64().unwrap();

    let res = app
        .app()
        .oneshot(request::get(&format!("/api/incident/{}", incident_id)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let incident = request::read_json(res).await;
    assert_eq!(incident["incident_id"], incident_id);
    assert_eq!(incident["incident_date"], "2024-02-10");
    assert_eq!(incident["incident_time"], "14:30:00");
    assert_eq!(incident["type_injury"], true);
    assert_eq!(incident["count_injury"], 2);
    assert_eq!(incident["type_near_miss"], true);
    assert_eq!(incident["count_near_miss"], 1);
    assert_eq!(incident["type_fire"], false);
    assert_eq!(incident["count_fire"], 0);
    assert_eq!(incident["status"], "active");

    // 未知のキーも保持されている
    assert_eq!(
        incident["injured_htpl_employees"][0]["employeeCode"],
        "HT-1182"
    );
    assert_eq!(incident["uploaded_files"][0]["storedName"], "1718000000-scene.jpg");
    assert_eq!(incident["injured_visitors"], json!([]));
    assert!(incident["training_type_required"].is_null());
}

#[tokio::test]
async fn test_create_legacy_incident_counts_each_named_type() {
    // Arrange
    let app = app_helper::setup_app().await;

    // Act
    let incident_id = create_incident(&app, &test_data::legacy_incident_payload()).await;

    // Assert
    let res = app
        .app()
        .oneshot(request::get(&format!("/api/incident/{}", incident_id)))
        .await
        .unwrap();
    let incident = request::read_json(res).await;

    assert_eq!(incident["incident_date"], "2024-03-05");
    assert_eq!(incident["incident_time"], "08:15:00");
    assert_eq!(incident["weather_condition"], "Rainy");
    assert_eq!(incident["count_injury"], 1);
    assert_eq!(incident["count_near_miss"], 1);
    // 未知の種別は「その他」
    assert_eq!(incident["type_other"], true);
    assert_eq!(incident["count_other"], 1);
    assert_eq!(incident["injured_htpl_employees"][0]["name"], "Arun");
    assert_eq!(incident["injured_visitors"][0]["name"], "Guest");
}

#[tokio::test]
async fn test_create_legacy_incident_with_count_map() {
    // Arrange
    let app = app_helper::setup_app().await;
    let mut payload = test_data::legacy_incident_payload();
    payload["typeOfIncident"] = json!({"Fire": "3", "Property Damage": 2, "Environment": true});

    // Act
    let incident_id = create_incident(&app, &payload).await;

    // Assert
    let res = app
        .app()
        .oneshot(request::get(&format!("/api/incident/{}", incident_id)))
        .await
        .unwrap();
    let incident = request::read_json(res).await;

    assert_eq!(incident["count_fire"], 3);
    assert_eq!(incident["count_property_damage"], 2);
    assert_eq!(incident["type_environment"], true);
    assert_eq!(incident["type_injury"], false);
}

#[tokio::test]
async fn test_create_incident_reports_all_missing_fields() {
    // Arrange
    let app = app_helper::setup_app().await;
    let mut payload = test_data::typed_incident_payload();
    let object = payload.as_object_mut().unwrap();
    object.remove("location");
    object.insert("incident_title".to_string(), json!("   "));

    // Act
    let res = app
        .app()
        .oneshot(request::json_request("POST", "/api/incidents", &payload))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = request::read_json(res).await;
    assert_eq!(body["error_type"], "missing_fields");
    assert_eq!(body["missing_fields"], json!(["location", "incident_title"]));
}

#[tokio::test]
async fn test_create_incident_rejects_invalid_time() {
    // Arrange
    let app = app_helper::setup_app().await;
    let mut payload = test_data::typed_incident_payload();
    payload["incident_time"] = json!("25:61");

    // Act
    let res = app
        .app()
        .oneshot(request::json_request("POST", "/api/incidents", &payload))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = request::read_json(res).await;
    assert_eq!(
        body["message"],
        "Invalid time format. Please use HH:MM:SS format (24-hour)"
    );

    // 何も保存されていない
    let res = app
        .app()
        .oneshot(request::get("/api/incidents"))
        .await
        .unwrap();
    assert_eq!(request::read_json(res).await, json!([]));
}

#[tokio::test]
async fn test_create_incident_rejects_negative_count() {
    // Arrange
    let app = app_helper::setup_app().await;
    let mut payload = test_data::typed_incident_payload();
    payload["count_fire"] = json!(-1);

    // Act
    let res = app
        .app()
        .oneshot(request::json_request("POST", "/api/incidents", &payload))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_incident_rejects_malformed_json() {
    // Arrange
    let app = app_helper::setup_app().await;

    // Act
    let malformed = app
        .app()
        .oneshot(request::raw_json_request("POST", "/api/incidents", "{\"location\":"))
        .await
        .unwrap();
    let not_object = app
        .app()
        .oneshot(request::raw_json_request("POST", "/api/incidents", "[1, 2]"))
        .await
        .unwrap();

    // Assert
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    assert_eq!(not_object.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_incidents_newest_first() {
    // Arrange
    let app = app_helper::setup_app().await;
    let first = create_incident(&app, &test_data::typed_incident_payload()).await;
    let second = create_incident(&app, &test_data::legacy_incident_payload()).await;

    // Act
    let res = app
        .app()
        .oneshot(request::get("/api/incidents"))
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
    assert_eq!(ids, vec![second as i64, first as i64]);
}

#[tokio::test]
async fn test_get_incident_not_found_and_invalid_id() {
    // Arrange
    let app = app_helper::setup_app().await;

    // Act
    let missing = app
        .app()
        .oneshot(request::get("/api/incident/9999"))
        .await
        .unwrap();
    let invalid = app
        .app()
        .oneshot(request::get("/api/incident/abc"))
        .await
        .unwrap();

    // Assert
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body = request::read_json(missing).await;
    assert_eq!(body["message"], "Incident 9999 not found");

    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_array_members_come_back_exactly_as_sent() {
    // Arrange
    let app = app_helper::setup_app().await;
    let mut payload = test_data::typed_incident_payload();
    payload["injured_htpl_employees"] = json!([
        {"name": null, "designation": "Fitter"},
        {"name": "Ravi", "designation": 3}
    ]);
    payload["injured_visitors"] = json!(["Walk-in visitor", null]);
    payload["uploaded_files"] = json!([{"originalName": "a.jpg", "size": "48213"}]);

    // Act
    let incident_id = create_incident(&app, &payload).await;

    // Assert
    let res = app
        .app()
        .oneshot(request::get(&format!("/api/incident/{}", incident_id)))
        .await
        .unwrap();
    let incident = request::read_json(res).await;
    assert_eq!(incident["injured_htpl_employees"], payload["injured_htpl_employees"]);
    assert_eq!(incident["injured_visitors"], payload["injured_visitors"]);
    assert_eq!(incident["uploaded_files"], payload["uploaded_files"]);
}

#[tokio::test]
async fn test_overlong_field_is_rejected_before_insert() {
    // Arrange
    let app = app_helper::setup_app().await;
    let mut payload = test_data::typed_incident_payload();
    payload["weather_condition"] = json!("w".repeat(101));

    // Act
    let res = app
        .app()
        .oneshot(request::json_request("POST", "/api/incidents", &payload))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = request::read_json(res).await;
    assert_eq!(body["error_type"], "validation_errors");
    assert_eq!(
        body["validation_errors"]["weather_condition"][0],
        "must be at most 100 characters"
    );

    let res = app.app().oneshot(request::get("/api/incidents")).await.unwrap();
    assert_eq!(request::read_json(res).await, json!([]));
}
