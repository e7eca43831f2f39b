use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Couple, CreateCoupleRequest},
    error::{AppError, Result},
    repository::CoupleRepository,
};

#[derive(FromRow)]
struct CoupleRow {
    id: String,
    email: String,
    partner_one_name: String,
    partner_two_name: String,
    created_at: NaiveDateTime,
}

pub struct SqliteCoupleRepository {
    pool: SqlitePool,
}

impl SqliteCoupleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_couple(row: CoupleRow) -> Result<Couple> {
        Ok(Couple {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            email: row.email,
            partner_one_name: row.partner_one_name,
            partner_two_name: row.partner_two_name,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl CoupleRepository for SqliteCoupleRepository {
    async fn create(&self, couple: CreateCoupleRequest) -> Result<Couple> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO couples (id, email, partner_one_name, partner_two_name, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&couple.email)
        .bind(&couple.partner_one_name)
        .bind(&couple.partner_two_name)
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
            AppError::Database("Failed to retrieve created couple".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Couple>> {
        let row = sqlx::query_as::<_, CoupleRow>(
            r#"
            SELECT id, email, partner_one_name, partner_two_name, created_at
            FROM couples
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_couple).transpose()
    }
}
