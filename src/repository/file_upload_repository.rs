use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::FileUpload,
    error::{AppError, Result},
    repository::FileUploadRepository,
};

#[derive(FromRow)]
struct FileUploadRow {
    id: String,
    couple_id: String,
    vendor_id: String,
    upload_date: NaiveDateTime,
    file_name: String,
    file_size: i64,
    storage_path: String,
}

pub struct SqliteFileUploadRepository {
    pool: SqlitePool,
}

impl SqliteFileUploadRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_upload(row: FileUploadRow) -> Result<FileUpload> {
        Ok(FileUpload {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            couple_id: Uuid::parse_str(&row.couple_id).map_err(|e| AppError::Database(e.to_string()))?,
            vendor_id: Uuid::parse_str(&row.vendor_id).map_err(|e| AppError::Database(e.to_string()))?,
            upload_date: DateTime::from_naive_utc_and_offset(row.upload_date, Utc),
            file_name: row.file_name,
            file_size: row.file_size,
            storage_path: row.storage_path,
        })
    }
}

#[async_trait]
impl FileUploadRepository for SqliteFileUploadRepository {
    async fn create(&self, upload: FileUpload) -> Result<FileUpload> {
        sqlx::query(
            r#"
            INSERT INTO file_uploads (
                id, couple_id, vendor_id, upload_date, file_name, file_size, storage_path
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(upload.id.to_string())
        .bind(upload.couple_id.to_string())
        .bind(upload.vendor_id.to_string())
        .bind(upload.upload_date.naive_utc())
        .bind(&upload.file_name)
        .bind(upload.file_size)
        .bind(&upload.storage_path)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(upload.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created upload".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileUpload>> {
        let row = sqlx::query_as::<_, FileUploadRow>(
            r#"
            SELECT id, couple_id, vendor_id, upload_date, file_name, file_size, storage_path
            FROM file_uploads
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_upload).transpose()
    }

    async fn list_by_couple(&self, couple_id: Uuid) -> Result<Vec<FileUpload>> {
        let rows = sqlx::query_as::<_, FileUploadRow>(
            r#"
            SELECT id, couple_id, vendor_id, upload_date, file_name, file_size, storage_path
            FROM file_uploads
            WHERE couple_id = ?
            ORDER BY upload_date DESC
            "#
        )
        .bind(couple_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_upload).collect()
    }

    async fn upload_dates(&self, couple_id: Uuid) -> Result<Vec<DateTime<Utc>>> {
        let dates: Vec<NaiveDateTime> = sqlx::query_scalar(
            "SELECT upload_date FROM file_uploads WHERE couple_id = ?"
        )
        .bind(couple_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(dates
            .into_iter()
            .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
            .collect())
    }
}
