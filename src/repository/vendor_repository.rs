use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateVendorRequest, Vendor},
    error::{AppError, Result},
    repository::VendorRepository,
};

#[derive(FromRow)]
struct VendorRow {
    id: String,
    business_name: String,
    email: String,
    service_type: String,
    stripe_account_id: Option<String>,
    created_at: NaiveDateTime,
}

pub struct SqliteVendorRepository {
    pool: SqlitePool,
}

impl SqliteVendorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_vendor(row: VendorRow) -> Result<Vendor> {
        Ok(Vendor {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            business_name: row.business_name,
            email: row.email,
            service_type: row.service_type,
            stripe_account_id: row.stripe_account_id,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl VendorRepository for SqliteVendorRepository {
    async fn create(&self, vendor: CreateVendorRequest) -> Result<Vendor> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO vendors (id, business_name, email, service_type, stripe_account_id, created_at)
            VALUES (?, ?, ?, ?, NULL, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&vendor.business_name)
        .bind(&vendor.email)
        .bind(&vendor.service_type)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Email already exists".to_string())
            }
            other => AppError::Database(other.to_string()),
        })?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created vendor".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vendor>> {
        let row = sqlx::query_as::<_, VendorRow>(
            r#"
            SELECT id, business_name, email, service_type, stripe_account_id, created_at
            FROM vendors
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_vendor).transpose()
    }

    async fn set_stripe_account(&self, id: Uuid, stripe_account_id: &str) -> Result<Vendor> {
        let result = sqlx::query("UPDATE vendors SET stripe_account_id = ? WHERE id = ?")
            .bind(stripe_account_id)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vendor not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated vendor".to_string())
        })
    }
}
