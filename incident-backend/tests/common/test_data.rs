// tests/common/test_data.rs

use chrono::Utc;
use incident_backend::domain::user_model;
use incident_backend::utils::password::{Argon2Config, PasswordManager};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::{json, Value};

pub const TEST_PASSWORD: &str = "Sup3rvisor!";

// === ユーザー関連のテストデータ ===

fn password_manager() -> PasswordManager {
    PasswordManager::new(Argon2Config {
        memory_cost: 8192,
        time_cost: 1,
        parallelism: 1,
        output_length: 32,
    })
    .unwrap()
}

/// ハッシュ文字列を指定してユーザーを登録
pub async fn insert_user_with_hash(
    db: &DatabaseConnection,
    user_name: &str,
    password_hash: &str,
    role_id: i32,
    is_active: bool,
) -> user_model::Model {
    user_model::ActiveModel {
        user_name: Set(user_name.to_string()),
        password_hash: Set(password_hash.to_string()),
        role_id: Set(role_id),
        is_active: Set(is_active),
        del_mark: Set(false),
        created_on: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// 有効なユーザーを登録（パスワードは TEST_PASSWORD）
pub async fn insert_user(
    db: &DatabaseConnection,
    user_name: &str,
    role_id: i32,
) -> user_model::Model {
    let hash = password_manager().hash_password(TEST_PASSWORD).unwrap();
    insert_user_with_hash(db, user_name, &hash, role_id, true).await
}

pub async fn insert_inactive_user(db: &DatabaseConnection, user_name: &str) -> user_model::Model {
    let hash = password_manager().hash_password(TEST_PASSWORD).unwrap();
    insert_user_with_hash(db, user_name, &hash, 2, false).await
}

/// 論理削除済みのユーザー
pub async fn insert_deleted_user(
    db: &DatabaseConnection,
    user_name: &str,
    role_id: i32,
) -> user_model::Model {
    let user = insert_user(db, user_name, role_id).await;
    let mut active: user_model::ActiveModel = user.into();
    active.del_mark = Set(true);
    active.update(db).await.unwrap()
}

// === インシデント関連のテストデータ ===

/// 型付き形式（snake_case）の作成リクエスト
pub fn typed_incident_payload() -> Value {
    json!({
        "incident_date": "2024-02-10",
        "incident_time": "14:30",
        "location": "Boiler House",
        "weather_condition": "Clear",
        "htpl_shift_in_charge": "A. Sharma",
        "contractor_supervisor": "K. Patel",
        "incident_reported_by": "R. Singh",
        "report_prepared_by": "S. Iyer",
        "created_by": "S. Iyer",
        "incident_title": "Steam leak near valve",
        "incident_summary": "Minor steam leak observed at flange joint",
        "type_injury": true,
        "count_injury": "2",
        "type_near_miss": true,
        "count_near_miss": 1,
        "injured_htpl_employees": [
            {"name": "Ravi Kumar", "designation": "Fitter", "employeeCode": "HT-1182"}
        ],
        "uploaded_files": [
            {"originalName": "scene.jpg", "storedName": "1718000000-scene.jpg", "size": 48213}
        ]
    })
}

/// 旧フォーム形式（camelCase）の作成リクエスト
pub fn legacy_incident_payload() -> Value {
    json!({
        "incidentDate": "2024-03-05T00:00:00.000Z",
        "incidentTime": "1900-01-01T08:15:00.000Z",
        "location": "Coal Yard",
        "weather": "Rainy",
        "htplShiftInCharge": "M. Rao",
        "incidentReportedBy": "D. Das",
        "reportPreparedBy": "D. Das",
        "incidentTitle": "Conveyor belt slip",
        "incidentSummary": "Worker slipped near conveyor",
        "typeOfIncident": ["Injury", "Near Miss", "Spill"],
        "injuredPersonDetails": {
            "employees": [{"name": "Arun", "department": "Operations"}],
            "contractWorkers": [],
            "visitors": [{"name": "Guest"}]
        }
    })
}

/// 是正措置の登録リクエスト
pub fn incident_action_payload(incident_id: i32, responsible_ids: &[i32]) -> Value {
    let actions: Vec<Value> = responsible_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            json!({
                "action": format!("Corrective action {}", i + 1),
                "status": "Open",
                "responsibility": "Maintenance",
                "docRef": format!("DOC-{}", i + 1),
                "targetDate": "2024-12-31",
                "responsibleId": id,
                "attachmentsAssign": [{"fileName": "checklist.pdf"}]
            })
        })
        .collect();

    json!({
        "id": incident_id.to_string(),
        "pastIncident": "No",
        "chronology": [{"date": "2024-02-10", "time": "14:30", "description": "Leak detected"}],
        "manCauses": ["Operator fatigue"],
        "machineCauses": [{"cause": "Worn gasket"}],
        "motherNatureCauses": [],
        "methodCauses": [],
        "whyAnalysis": [{"why": "Gasket not replaced", "level": 1}],
        "preparedBy": "S. Iyer",
        "preparedByUserId": 4,
        "actions": actions
    })
}
