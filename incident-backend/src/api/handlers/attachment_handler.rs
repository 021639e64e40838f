// src/api/handlers/attachment_handler.rs

use super::query_rejection;
use crate::api::dto::attachment_dto::{
    AttachmentListResponse, AttachmentUploadResponse, FileDownloadQuery,
};
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::extractors::ValidatedId;
use crate::repository::attachment_repository::{AttachmentKind, NewAttachment};
use axum::body::Body;
use axum::{
    extract::{rejection::QueryRejection, Json, Multipart, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::{debug, info};

const FILES_FIELD: &str = "files";
const UPLOADED_BY_FIELD: &str = "uploadedBy";

// 保存先の列の最大長
const FILE_NAME_MAX: usize = 255;
const CONTENT_TYPE_MAX: usize = 100;
const UPLOADED_BY_MAX: usize = 100;

/// multipart の解析結果
struct UploadForm {
    owner_id: Option<String>,
    uploaded_by: Option<String>,
    files: Vec<NewAttachment>,
}

async fn read_upload_form(kind: AttachmentKind, mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm {
        owner_id: None,
        uploaded_by: None,
        files: Vec::new(),
    };

    // multipartデータを処理（所有者IDはファイルの後に来ることもある）
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart data: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == FILES_FIELD || name == "files[]" {
            let file_name = field.file_name().unwrap_or("").trim().to_string();

            // Content-Typeを取得（なければ拡張子から推測）
            let content_type = field
                .content_type()
                .map(|ct| ct.to_string())
                .filter(|ct| !ct.trim().is_empty())
                .or_else(|| {
                    mime_guess::from_path(&file_name)
                        .first()
                        .map(|mime| mime.to_string())
                })
                .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

            // ファイル未選択のまま送信された空パートは無視
            if file_name.is_empty() && data.is_empty() {
                debug!("Skipping empty file part");
                continue;
            }

            form.files.push(NewAttachment {
                file_name: if file_name.is_empty() {
                    "unnamed".to_string()
                } else {
                    file_name
                },
                content_type,
                data: data.to_vec(),
            });
        } else if name == kind.owner_field() {
            form.owner_id = Some(read_text(field).await?);
        } else if name == UPLOADED_BY_FIELD {
            form.uploaded_by = Some(read_text(field).await?);
        } else {
            debug!(field = %name, "Ignoring unknown multipart field");
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map(|text| text.trim().to_string())
        .map_err(|e| AppError::BadRequest(format!("Failed to read form field: {}", e)))
}

/// 保存前に列の長さを検証（1件でも超えたら何も書き込まない）
fn check_lengths(form: &UploadForm) -> AppResult<()> {
    let mut errors = Vec::new();

    for (index, file) in form.files.iter().enumerate() {
        if file.file_name.chars().count() > FILE_NAME_MAX {
            errors.push(format!(
                "files[{}].fileName: must be at most {} characters",
                index, FILE_NAME_MAX
            ));
        }
        if file.content_type.chars().count() > CONTENT_TYPE_MAX {
            errors.push(format!(
                "files[{}].contentType: must be at most {} characters",
                index, CONTENT_TYPE_MAX
            ));
        }
    }

    if form
        .uploaded_by
        .as_deref()
        .is_some_and(|v| v.chars().count() > UPLOADED_BY_MAX)
    {
        errors.push(format!(
            "{}: must be at most {} characters",
            UPLOADED_BY_FIELD, UPLOADED_BY_MAX
        ));
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(AppError::ValidationError(errors.remove(0))),
        _ => Err(AppError::ValidationErrors(errors)),
    }
}

fn parse_owner_id(kind: AttachmentKind, raw: Option<&str>) -> AppResult<i32> {
    let field = kind.owner_field();
    let raw = raw
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", field)))?;

    raw.parse::<i32>().map_err(|_| {
        AppError::ValidationError(format!("{} must be an integer, got '{}'", field, raw))
    })
}

async fn upload(
    app_state: AppState,
    kind: AttachmentKind,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<AttachmentUploadResponse>)> {
    let form = read_upload_form(kind, multipart).await?;
    let owner_id = parse_owner_id(kind, form.owner_id.as_deref())?;

    if form.files.is_empty() {
        return Err(AppError::BadRequest("No files uploaded".to_string()));
    }
    check_lengths(&form)?;

    info!(
        owner = kind.owner_label(),
        owner_id = owner_id,
        file_count = form.files.len(),
        "Starting file upload"
    );

    let uploaded_by = form.uploaded_by.filter(|v| !v.is_empty());
    let files = app_state
        .attachment_service
        .upload_files(kind, owner_id, form.files, uploaded_by)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AttachmentUploadResponse {
            message: format!("{} file(s) uploaded successfully", files.len()),
            files,
        }),
    ))
}

/// インシデントへのファイルアップロード
pub async fn upload_incident_files_handler(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    upload(app_state, AttachmentKind::Incident, multipart).await
}

/// 担当割り当てへのファイルアップロード
pub async fn upload_assign_files_handler(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    upload(app_state, AttachmentKind::Assignment, multipart).await
}

async fn list(
    app_state: AppState,
    kind: AttachmentKind,
    owner_id: i32,
) -> AppResult<Json<AttachmentListResponse>> {
    let files = app_state.attachment_service.list_files(kind, owner_id).await?;

    info!(
        owner = kind.owner_label(),
        owner_id = owner_id,
        file_count = files.len(),
        "Attachments listed"
    );

    Ok(Json(AttachmentListResponse {
        total: files.len(),
        files,
    }))
}

pub async fn list_incident_files_handler(
    State(app_state): State<AppState>,
    ValidatedId(incident_id): ValidatedId,
) -> AppResult<Json<AttachmentListResponse>> {
    list(app_state, AttachmentKind::Incident, incident_id).await
}

pub async fn list_assign_files_handler(
    State(app_state): State<AppState>,
    ValidatedId(assign_id): ValidatedId,
) -> AppResult<Json<AttachmentListResponse>> {
    list(app_state, AttachmentKind::Assignment, assign_id).await
}

async fn download(
    app_state: AppState,
    kind: AttachmentKind,
    owner_id: i32,
    query: Result<Query<FileDownloadQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(query) = query.map_err(query_rejection)?;

    let file = app_state
        .attachment_service
        .download_file(kind, owner_id, query.file_id)
        .await?;

    let content_type = HeaderValue::from_str(&file.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, content_disposition(&file.file_name)),
        ],
        Body::from(file.data),
    )
        .into_response())
}

/// インシデントのファイルをダウンロード
pub async fn download_incident_file_handler(
    State(app_state): State<AppState>,
    ValidatedId(permit_id): ValidatedId,
    query: Result<Query<FileDownloadQuery>, QueryRejection>,
) -> AppResult<Response> {
    download(app_state, AttachmentKind::Incident, permit_id, query).await
}

/// 担当割り当てのファイルをダウンロード
pub async fn download_assign_file_handler(
    State(app_state): State<AppState>,
    ValidatedId(assign_id): ValidatedId,
    query: Result<Query<FileDownloadQuery>, QueryRejection>,
) -> AppResult<Response> {
    download(app_state, AttachmentKind::Assignment, assign_id, query).await
}

/// `attachment; filename="..."`（引用符・制御文字は置換）
fn content_disposition(file_name: &str) -> HeaderValue {
    let safe: String = file_name
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();

    HeaderValue::from_bytes(format!("attachment; filename=\"{}\"", safe).as_bytes())
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

pub fn attachment_router(app_state: AppState) -> Router {
    Router::new()
        .route("/incident/upload-files", post(upload_incident_files_handler))
        .route(
            "/incident/assign/upload-files",
            post(upload_assign_files_handler),
        )
        .route("/incident/{id}/files", get(list_incident_files_handler))
        .route(
            "/incident/assign/{assign_id}/files",
            get(list_assign_files_handler),
        )
        .route(
            "/incident/file/{permit_id}",
            get(download_incident_file_handler),
        )
        .route(
            "/incident/assign-file/{permit_id}",
            get(download_assign_file_handler),
        )
        .with_state(app_state)
}
