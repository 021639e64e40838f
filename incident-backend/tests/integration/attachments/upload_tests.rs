// tests/integration/attachments/upload_tests.rs

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::common::{
    app_helper,
    request::{self, Part},
    test_data,
};

pub async fn create_incident(app: &app_helper::TestApp) -> i64 {
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

/// 担当割り当てを1件作ってそのIDを返す
pub async fn create_assignment(app: &app_helper::TestApp) -> i64 {
    let incident_id = create_incident(app).await;
    app.app()
        .oneshot(request::json_request(
            "POST",
            "/api/incident-actions",
            &test_data::incident_action_payload(incident_id as i32, &[17]),
        ))
        .await
        .unwrap();

    let res = app
        .app()
        .oneshot(request::get(&format!(
            "/api/incident/assign-user/details?incidentId={}",
            incident_id
        )))
        .await
        .unwrap();
    request::read_json(res).await["actions"][0]["assign_id"]
        .as_i64()
        .unwrap()
}

#[tokio::test]
async fn test_upload_multiple_incident_files() {
    // Arrange
    let app = app_helper::setup_app().await;
    let incident_id = create_incident(&app).await.to_string();

    // Act
    let res = app
        .app()
        .oneshot(request::multipart_request(
            "/api/incident/upload-files",
            &[
                Part::File {
                    field: "files",
                    file_name: "scene.jpg",
                    content_type: Some("image/jpeg"),
                    data: b"\xFF\xD8\xFFjpeg-bytes",
                },
                Part::File {
                    field: "files",
                    file_name: "statement.pdf",
                    content_type: None,
                    data: b"%PDF-1.4 statement",
                },
                Part::Text("incidentId", &incident_id),
                Part::Text("uploadedBy", "S. Iyer"),
            ],
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = request::read_json(res).await;
    assert_eq!(body["message"], "2 file(s) uploaded successfully");

    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["fileName"], "scene.jpg");
    assert_eq!(files[0]["contentType"], "image/jpeg");
    assert_eq!(files[0]["fileSize"], 13);
    // Content-Type がなければ拡張子から推測
    assert_eq!(files[1]["contentType"], "application/pdf");
    assert!(files[0].get("uploadedBy").is_none());

    let res = app
        .app()
        .oneshot(request::get(&format!("/api/incident/{}/files", incident_id)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listing = request::read_json(res).await;
    assert_eq!(listing["total"], 2);
    assert_eq!(listing["files"][0]["uploadedBy"], "S. Iyer");
    assert!(listing["files"][0]["uploadedOn"].is_string());
}

#[tokio::test]
async fn test_upload_assignment_files() {
    // Arrange
    let app = app_helper::setup_app().await;
    let assign_id = create_assignment(&app).await.to_string();

    // Act
    let res = app
        .app()
        .oneshot(request::multipart_request(
            "/api/incident/assign/upload-files",
            &[
                Part::Text("assignId", &assign_id),
                Part::File {
                    field: "files[]",
                    file_name: "closure-report.txt",
                    content_type: Some("text/plain"),
                    data: b"closed",
                },
            ],
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .app()
        .oneshot(request::get(&format!(
            "/api/incident/assign/{}/files",
            assign_id
        )))
        .await
        .unwrap();
    let listing = request::read_json(res).await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["files"][0]["fileName"], "closure-report.txt");
}

#[tokio::test]
async fn test_upload_without_files_is_rejected() {
    // Arrange
    let app = app_helper::setup_app().await;
    let incident_id = create_incident(&app).await.to_string();

    // Act: ファイル未選択の空パートのみ
    let res = app
        .app()
        .oneshot(request::multipart_request(
            "/api/incident/upload-files",
            &[
                Part::Text("incidentId", &incident_id),
                Part::File {
                    field: "files",
                    file_name: "",
                    content_type: None,
                    data: b"",
                },
            ],
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(request::read_json(res).await["message"], "No files uploaded");
}

#[tokio::test]
async fn test_upload_owner_id_errors() {
    // Arrange
    let app = app_helper::setup_app().await;
    let file = Part::File {
        field: "files",
        file_name: "scene.jpg",
        content_type: Some("image/jpeg"),
        data: b"jpeg",
    };

    // Act
    let missing = app
        .app()
        .oneshot(request::multipart_request(
            "/api/incident/upload-files",
            std::slice::from_ref(&file),
        ))
        .await
        .unwrap();
    let unknown = app
        .app()
        .oneshot(request::multipart_request(
            "/api/incident/upload-files",
            &[Part::Text("incidentId", "9090"), file],
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        request::read_json(missing).await["message"],
        "incidentId is required"
    );
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        request::read_json(unknown).await["message"],
        "Incident 9090 not found"
    );
}

#[tokio::test]
async fn test_list_files_for_owner_without_files() {
    // Arrange
    let app = app_helper::setup_app().await;

    // Act
    let res = app
        .app()
        .oneshot(request::get("/api/incident/31337/files"))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        request::read_json(res).await,
        json!({"files": [], "total": 0})
    );
}

#[tokio::test]
async fn test_long_second_file_name_stores_nothing() {
    // Arrange
    let app = app_helper::setup_app().await;
    let incident_id = create_incident(&app).await.to_string();
    let long_name = format!("{}.pdf", "site-plan-".repeat(30));

    // Act
    let res = app
        .app()
        .oneshot(request::multipart_request(
            "/api/incident/upload-files",
            &[
                Part::Text("incidentId", &incident_id),
                Part::File {
                    field: "files",
                    file_name: "scene.jpg",
                    content_type: Some("image/jpeg"),
                    data: b"jpeg-bytes",
                },
                Part::File {
                    field: "files",
                    file_name: &long_name,
                    content_type: Some("application/pdf"),
                    data: b"%PDF-1.4",
                },
            ],
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = request::read_json(res).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("files[1].fileName"));

    let res = app
        .app()
        .oneshot(request::get(&format!("/api/incident/{}/files", incident_id)))
        .await
        .unwrap();
    assert_eq!(request::read_json(res).await["total"], 0);
}
