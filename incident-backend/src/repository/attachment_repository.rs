// src/repository/attachment_repository.rs

use crate::domain::{incident_assign_file_model, incident_file_model};
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::{
    ConnectionTrait, DbConn, DbErr, FromQueryResult, QueryFilter, QueryOrder, QuerySelect,
};

/// 添付ファイルの所有者の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Incident,
    Assignment,
}

impl AttachmentKind {
    /// multipart で所有者IDを運ぶフィールド名
    pub fn owner_field(self) -> &'static str {
        match self {
            Self::Incident => "incidentId",
            Self::Assignment => "assignId",
        }
    }

    pub fn owner_label(self) -> &'static str {
        match self {
            Self::Incident => "Incident",
            Self::Assignment => "Assignment",
        }
    }
}

/// 保存前の1ファイル分
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl NewAttachment {
    pub fn file_size(&self) -> i64 {
        i64::try_from(self.data.len()).unwrap_or(i64::MAX)
    }
}

/// バイナリを含まないファイル情報
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct AttachmentMetadata {
    pub file_id: i32,
    pub file_name: String,
    pub content_type: Option<String>,
    pub file_size: i64,
    pub uploaded_on: DateTime<Utc>,
    pub uploaded_by: Option<String>,
}

/// ダウンロード対象のファイル
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_id: i32,
    pub file_name: String,
    pub content_type: Option<String>,
    pub file_data: Vec<u8>,
}

impl From<incident_file_model::Model> for StoredFile {
    fn from(m: incident_file_model::Model) -> Self {
        Self {
            file_id: m.file_id,
            file_name: m.file_name,
            content_type: m.content_type,
            file_data: m.file_data,
        }
    }
}

impl From<incident_assign_file_model::Model> for StoredFile {
    fn from(m: incident_assign_file_model::Model) -> Self {
        Self {
            file_id: m.file_id,
            file_name: m.file_name,
            content_type: m.content_type,
            file_data: m.file_data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttachmentRepository {
    db: DbConn,
}

impl AttachmentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 所有者のファイル一覧（file_id 昇順、バイナリなし）
    pub async fn list(
        &self,
        kind: AttachmentKind,
        owner_id: i32,
    ) -> Result<Vec<AttachmentMetadata>, DbErr> {
        match kind {
            AttachmentKind::Incident => {
                use incident_file_model::{Column, Entity};
                Entity::find()
                    .select_only()
                    .columns([
                        Column::FileId,
                        Column::FileName,
                        Column::ContentType,
                        Column::FileSize,
                        Column::UploadedOn,
                        Column::UploadedBy,
                    ])
                    .filter(Column::IncidentId.eq(owner_id))
                    .order_by_asc(Column::FileId)
                    .into_model::<AttachmentMetadata>()
                    .all(&self.db)
                    .await
            }
            AttachmentKind::Assignment => {
                use incident_assign_file_model::{Column, Entity};
                Entity::find()
                    .select_only()
                    .columns([
                        Column::FileId,
                        Column::FileName,
                        Column::ContentType,
                        Column::FileSize,
                        Column::UploadedOn,
                        Column::UploadedBy,
                    ])
                    .filter(Column::AssignId.eq(owner_id))
                    .order_by_asc(Column::FileId)
                    .into_model::<AttachmentMetadata>()
                    .all(&self.db)
                    .await
            }
        }
    }

    /// ファイルを1件取得
    ///
    /// `file_id` 未指定の場合は所有者の最初のファイル（最小の file_id）。
    pub async fn find_file(
        &self,
        kind: AttachmentKind,
        owner_id: i32,
        file_id: Option<i32>,
    ) -> Result<Option<StoredFile>, DbErr> {
        match kind {
            AttachmentKind::Incident => {
                use incident_file_model::{Column, Entity};
                let mut query = Entity::find().filter(Column::IncidentId.eq(owner_id));
                if let Some(file_id) = file_id {
                    query = query.filter(Column::FileId.eq(file_id));
                }
                let found = query.order_by_asc(Column::FileId).one(&self.db).await?;
                Ok(found.map(StoredFile::from))
            }
            AttachmentKind::Assignment => {
                use incident_assign_file_model::{Column, Entity};
                let mut query = Entity::find().filter(Column::AssignId.eq(owner_id));
                if let Some(file_id) = file_id {
                    query = query.filter(Column::FileId.eq(file_id));
                }
                let found = query.order_by_asc(Column::FileId).one(&self.db).await?;
                Ok(found.map(StoredFile::from))
            }
        }
    }

    /// ファイルをまとめて登録（トランザクション内で呼ぶ）
    ///
    /// 所有者が存在しない場合は外部キー制約違反がそのまま返る。
    pub async fn insert_files<C>(
        conn: &C,
        kind: AttachmentKind,
        owner_id: i32,
        files: Vec<NewAttachment>,
        uploaded_by: Option<String>,
        uploaded_on: DateTime<Utc>,
    ) -> Result<Vec<AttachmentMetadata>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut stored = Vec::with_capacity(files.len());

        for file in files {
            let file_size = file.file_size();
            let metadata = match kind {
                AttachmentKind::Incident => {
                    let model = incident_file_model::ActiveModel {
                        incident_id: Set(owner_id),
                        file_name: Set(file.file_name),
                        content_type: Set(Some(file.content_type)),
                        file_size: Set(file_size),
                        file_data: Set(file.data),
                        uploaded_on: Set(uploaded_on),
                        uploaded_by: Set(uploaded_by.clone()),
                        ..Default::default()
                    }
                    .insert(conn)
                    .await?;

                    AttachmentMetadata {
                        file_id: model.file_id,
                        file_name: model.file_name,
                        content_type: model.content_type,
                        file_size: model.file_size,
                        uploaded_on: model.uploaded_on,
                        uploaded_by: model.uploaded_by,
                    }
                }
                AttachmentKind::Assignment => {
                    let model = incident_assign_file_model::ActiveModel {
                        assign_id: Set(owner_id),
                        file_name: Set(file.file_name),
                        content_type: Set(Some(file.content_type)),
                        file_size: Set(file_size),
                        file_data: Set(file.data),
                        uploaded_on: Set(uploaded_on),
                        uploaded_by: Set(uploaded_by.clone()),
                        ..Default::default()
                    }
                    .insert(conn)
                    .await?;

                    AttachmentMetadata {
                        file_id: model.file_id,
                        file_name: model.file_name,
                        content_type: model.content_type,
                        file_size: model.file_size,
                        uploaded_on: model.uploaded_on,
                        uploaded_by: model.uploaded_by,
                    }
                }
            };
            stored.push(metadata);
        }

        Ok(stored)
    }
}
