// tests/unit/transaction_tests.rs

use incident_backend::api::dto::incident_action_dto::{
    CreateIncidentActionRequest, NewAssignment, ValidatedIncidentAction,
};
use incident_backend::error::AppError;
use incident_backend::repository::attachment_repository::{
    AttachmentKind, AttachmentRepository, NewAttachment,
};
use incident_backend::repository::incident_action_repository::IncidentActionRepository;
use incident_backend::service::attachment_service::AttachmentService;
use incident_backend::service::incident_action_service::IncidentActionService;

use super::repository_tests::seed_incident;
use crate::common::{self, db::TestDatabase};

fn assignment(action: &str, status: String) -> NewAssignment {
    NewAssignment {
        action: Some(action.to_string()),
        status: Some(status),
        assign_user: Some("R. Pillai".to_string()),
        doc_reff: None,
        target_date: None,
        responsible_id: Some("17".to_string()),
        attachments_assign: None,
        created_by: Some("S. Iyer".to_string()),
    }
}

#[tokio::test]
async fn test_failed_second_file_rolls_back_first() {
    common::init_test_env();
    let db = TestDatabase::new().await;
    let incident_id = seed_incident(&db).await;
    let service = AttachmentService::new(db.connection.clone());

    // 2件目だけ列の長さを超える
    let files = vec![
        NewAttachment {
            file_name: "scene.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: b"jpeg-bytes".to_vec(),
        },
        NewAttachment {
            file_name: "n".repeat(300),
            content_type: "text/plain".to_string(),
            data: b"text".to_vec(),
        },
    ];

    let result = service
        .upload_files(AttachmentKind::Incident, incident_id, files, None)
        .await;

    assert!(matches!(result, Err(AppError::DbErr(_))));
    let stored = AttachmentRepository::new(db.connection.clone())
        .list(AttachmentKind::Incident, incident_id)
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_failed_second_assignment_rolls_back_analysis() {
    common::init_test_env();
    let db = TestDatabase::new().await;
    let incident_id = seed_incident(&db).await;
    let service = IncidentActionService::new(db.connection.clone());

    let validated = ValidatedIncidentAction {
        incident_id,
        analysis: CreateIncidentActionRequest {
            id: Some(incident_id),
            prepared_by: Some("S. Iyer".to_string()),
            ..Default::default()
        },
        assignments: vec![
            assignment("Fix guard", "Open".to_string()),
            assignment("Retrain crew", "S".repeat(101)),
        ],
    };

    let result = service.create_actions(validated).await;

    assert!(matches!(result, Err(AppError::DbErr(_))));
    let repo = IncidentActionRepository::new(db.connection.clone());
    assert!(repo.find_by_incident(incident_id).await.unwrap().is_none());
    assert!(repo.find_assignments(incident_id).await.unwrap().is_empty());
}
