// src/api/dto/attachment_dto.rs

use crate::repository::attachment_repository::AttachmentMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Request DTOs ---

#[derive(Debug, Default, Deserialize)]
pub struct FileDownloadQuery {
    #[serde(
        rename = "fileId",
        default,
        deserialize_with = "crate::domain::composite::deserialize_optional_i32_from_string"
    )]
    pub file_id: Option<i32>,
}

// --- Response DTOs ---

/// 添付ファイル情報（バイナリは含まない）
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDto {
    pub file_id: i32,
    pub file_name: String,
    pub content_type: String,
    pub file_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
}

impl From<AttachmentMetadata> for AttachmentDto {
    fn from(meta: AttachmentMetadata) -> Self {
        Self {
            file_id: meta.file_id,
            file_name: meta.file_name,
            content_type: meta
                .content_type
                .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string()),
            file_size: meta.file_size,
            uploaded_on: Some(meta.uploaded_on),
            uploaded_by: meta.uploaded_by,
        }
    }
}

/// アップロード成功時のレスポンス
#[derive(Serialize, Deserialize, Debug)]
pub struct AttachmentUploadResponse {
    pub message: String,
    pub files: Vec<AttachmentDto>,
}

/// 添付ファイル一覧のレスポンス
#[derive(Serialize, Deserialize, Debug)]
pub struct AttachmentListResponse {
    pub files: Vec<AttachmentDto>,
    pub total: usize,
}

/// ダウンロード用のファイル内容
#[derive(Debug, Clone)]
pub struct FileContent {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
