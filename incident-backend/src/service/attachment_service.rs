// src/service/attachment_service.rs

use crate::api::dto::attachment_dto::{AttachmentDto, FileContent};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::repository::attachment_repository::{
    AttachmentKind, AttachmentRepository, NewAttachment,
};
use crate::utils::transaction::TransactionManager;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub struct AttachmentService {
    db: DbPool,
    attachment_repo: Arc<AttachmentRepository>,
}

impl AttachmentService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            attachment_repo: Arc::new(AttachmentRepository::new(db_pool.clone())),
            db: db_pool,
        }
    }

    /// ファイルをまとめて保存（全件成功か全件失敗）
    pub async fn upload_files(
        &self,
        kind: AttachmentKind,
        owner_id: i32,
        files: Vec<NewAttachment>,
        uploaded_by: Option<String>,
    ) -> AppResult<Vec<AttachmentDto>> {
        if files.is_empty() {
            return Err(AppError::BadRequest("No files uploaded".to_string()));
        }

        let file_count = files.len();
        let total_bytes: usize = files.iter().map(|f| f.data.len()).sum();
        let missing_owner = format!("{} {} not found", kind.owner_label(), owner_id);

        let stored = self
            .db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    AttachmentRepository::insert_files(
                        txn,
                        kind,
                        owner_id,
                        files,
                        uploaded_by,
                        Utc::now(),
                    )
                    .await
                    .map_err(|e| AppError::from_write_error(e, "File already stored", &missing_owner))
                })
            })
            .await?;

        info!(
            owner = kind.owner_label(),
            owner_id = owner_id,
            file_count = file_count,
            total_bytes = total_bytes,
            "Files uploaded"
        );

        Ok(stored
            .into_iter()
            .map(|meta| {
                let mut dto = AttachmentDto::from(meta);
                dto.uploaded_on = None;
                dto.uploaded_by = None;
                dto
            })
            .collect())
    }

    pub async fn list_files(
        &self,
        kind: AttachmentKind,
        owner_id: i32,
    ) -> AppResult<Vec<AttachmentDto>> {
        let files = self.attachment_repo.list(kind, owner_id).await?;
        Ok(files.into_iter().map(AttachmentDto::from).collect())
    }

    /// ダウンロード対象を取得（file_id 未指定なら最初のファイル）
    pub async fn download_file(
        &self,
        kind: AttachmentKind,
        owner_id: i32,
        file_id: Option<i32>,
    ) -> AppResult<FileContent> {
        let file = self
            .attachment_repo
            .find_file(kind, owner_id, file_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No file found for {} {}",
                    kind.owner_label().to_lowercase(),
                    owner_id
                ))
            })?;

        info!(
            owner = kind.owner_label(),
            owner_id = owner_id,
            file_id = file.file_id,
            "File downloaded"
        );

        Ok(FileContent {
            content_type: file
                .content_type
                .filter(|ct| !ct.trim().is_empty())
                .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string()),
            file_name: file.file_name,
            data: file.file_data,
        })
    }
}
