use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CoupleSubscription, SubscriptionStatus},
    error::{AppError, Result},
    repository::SubscriptionRepository,
};

#[derive(FromRow)]
struct SubscriptionRow {
    couple_id: String,
    payment_status: String,
    free_period_expiry: Option<NaiveDateTime>,
    stripe_customer_id: Option<String>,
    stripe_subscription_id: Option<String>,
    updated_at: NaiveDateTime,
}

pub struct SqliteSubscriptionRepository {
    pool: SqlitePool,
}

impl SqliteSubscriptionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_subscription(row: SubscriptionRow) -> Result<CoupleSubscription> {
        Ok(CoupleSubscription {
            couple_id: Uuid::parse_str(&row.couple_id).map_err(|e| AppError::Database(e.to_string()))?,
            payment_status: SubscriptionStatus::from_str(&row.payment_status).ok_or_else(|| {
                AppError::Database(format!("Invalid subscription status: {}", row.payment_status))
            })?,
            free_period_expiry: row.free_period_expiry.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            stripe_customer_id: row.stripe_customer_id,
            stripe_subscription_id: row.stripe_subscription_id,
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl SubscriptionRepository for SqliteSubscriptionRepository {
    async fn find_by_couple(&self, couple_id: Uuid) -> Result<Option<CoupleSubscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT couple_id, payment_status, free_period_expiry,
                   stripe_customer_id, stripe_subscription_id, updated_at
            FROM couple_subscriptions
            WHERE couple_id = ?
            "#
        )
        .bind(couple_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_subscription).transpose()
    }

    async fn find_by_customer(&self, stripe_customer_id: &str) -> Result<Option<CoupleSubscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT couple_id, payment_status, free_period_expiry,
                   stripe_customer_id, stripe_subscription_id, updated_at
            FROM couple_subscriptions
            WHERE stripe_customer_id = ?
            "#
        )
        .bind(stripe_customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_subscription).transpose()
    }

    async fn upsert(&self, subscription: CoupleSubscription) -> Result<CoupleSubscription> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO couple_subscriptions (
                couple_id, payment_status, free_period_expiry,
                stripe_customer_id, stripe_subscription_id, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(couple_id) DO UPDATE SET
                payment_status = excluded.payment_status,
                free_period_expiry = excluded.free_period_expiry,
                stripe_customer_id = excluded.stripe_customer_id,
                stripe_subscription_id = excluded.stripe_subscription_id,
                updated_at = excluded.updated_at
            "#
        )
        .bind(subscription.couple_id.to_string())
        .bind(subscription.payment_status.as_str())
        .bind(subscription.free_period_expiry.map(|dt| dt.naive_utc()))
        .bind(&subscription.stripe_customer_id)
        .bind(&subscription.stripe_subscription_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Stripe customer is linked to another couple".to_string())
            }
            other => AppError::Database(other.to_string()),
        })?;

        self.find_by_couple(subscription.couple_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve subscription".to_string())
        })
    }

    async fn update_status(&self, couple_id: Uuid, status: SubscriptionStatus) -> Result<CoupleSubscription> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE couple_subscriptions
            SET payment_status = ?, updated_at = ?
            WHERE couple_id = ?
            "#
        )
        .bind(status.as_str())
        .bind(now)
        .bind(couple_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Subscription not found".to_string()));
        }

        self.find_by_couple(couple_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated subscription".to_string())
        })
    }

    async fn set_free_period_expiry(&self, couple_id: Uuid, expiry: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE couple_subscriptions
            SET free_period_expiry = ?
            WHERE couple_id = ?
            "#
        )
        .bind(expiry.naive_utc())
        .bind(couple_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
