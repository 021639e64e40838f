// tests/integration/attachments/download_tests.rs

use axum::http::{header, StatusCode};
use tower::ServiceExt;

use super::upload_tests::{create_assignment, create_incident};
use crate::common::{
    app_helper,
    request::{self, Part},
};

async fn upload(
    app: &app_helper::TestApp,
    uri: &str,
    owner: (&str, &str),
    parts: &[(&str, &[u8])],
) -> Vec<i64> {
    let mut form: Vec<Part<'_>> = parts
        .iter()
        .map(|&(file_name, data)| Part::File {
            field: "files",
            file_name,
            content_type: None,
            data,
        })
        .collect();
    form.push(Part::Text(owner.0, owner.1));

    let res = app
        .app()
        .oneshot(request::multipart_request(uri, &form))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    request::read_json(res).await["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|file| file["fileId"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_download_first_file_by_default() {
    // Arrange
    let app = app_helper::setup_app().await;
    let incident_id = create_incident(&app).await.to_string();
    upload(
        &app,
        "/api/incident/upload-files",
        ("incidentId", incident_id.as_str()),
        &[("first.txt", &b"first body"[..]), ("second.txt", &b"second body"[..])],
    )
    .await;

    // Act
    let res = app
        .app()
        .oneshot(request::get(&format!("/api/incident/file/{}", incident_id)))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"first.txt\""
    );
    assert!(res.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(request::read_bytes(res).await, b"first body");
}

#[tokio::test]
async fn test_download_specific_file_id() {
    // Arrange
    let app = app_helper::setup_app().await;
    let incident_id = create_incident(&app).await.to_string();
    let ids = upload(
        &app,
        "/api/incident/upload-files",
        ("incidentId", incident_id.as_str()),
        &[("first.txt", &b"first body"[..]), ("second.txt", &b"second body"[..])],
    )
    .await;

    // Act
    let res = app
        .app()
        .oneshot(request::get(&format!(
            "/api/incident/file/{}?fileId={}",
            incident_id, ids[1]
        )))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(request::read_bytes(res).await, b"second body");
}

#[tokio::test]
async fn test_download_file_id_of_another_owner_is_not_found() {
    // Arrange
    let app = app_helper::setup_app().await;
    let first = create_incident(&app).await.to_string();
    let second = create_incident(&app).await.to_string();
    let ids = upload(
        &app,
        "/api/incident/upload-files",
        ("incidentId", first.as_str()),
        &[("mine.txt", &b"mine"[..])],
    )
    .await;

    // Act
    let res = app
        .app()
        .oneshot(request::get(&format!(
            "/api/incident/file/{}?fileId={}",
            second, ids[0]
        )))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        request::read_json(res).await["message"],
        format!("No file found for incident {}", second)
    );
}

#[tokio::test]
async fn test_download_assignment_file_sets_disposition() {
    // Arrange
    let app = app_helper::setup_app().await;
    let assign_id = create_assignment(&app).await.to_string();
    upload(
        &app,
        "/api/incident/assign/upload-files",
        ("assignId", assign_id.as_str()),
        &[("site plan.bin", &b"\x00\x01\x02"[..])],
    )
    .await;

    // Act
    let res = app
        .app()
        .oneshot(request::get(&format!(
            "/api/incident/assign-file/{}",
            assign_id
        )))
        .await
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"site plan.bin\""
    );
    assert_eq!(request::read_bytes(res).await, vec![0u8, 1, 2]);
}

#[tokio::test]
async fn test_download_query_errors() {
    // Arrange
    let app = app_helper::setup_app().await;

    // Act
    let empty = app
        .app()
        .oneshot(request::get("/api/incident/assign-file/404"))
        .await
        .unwrap();
    let bad_file_id = app
        .app()
        .oneshot(request::get("/api/incident/file/1?fileId=abc"))
        .await
        .unwrap();

    // Assert
    assert_eq!(empty.status(), StatusCode::NOT_FOUND);
    assert_eq!(bad_file_id.status(), StatusCode::BAD_REQUEST);
}
