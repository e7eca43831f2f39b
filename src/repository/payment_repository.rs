use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{BookingTip, Payment, PaymentStatus, PayoutBalance, PayoutType},
    error::{AppError, Result},
    repository::PaymentRepository,
};

#[derive(FromRow)]
struct PaymentRow {
    id: String,
    booking_id: String,
    amount: i64,
    tip: i64,
    status: String,
    payment_type: String,
    vendor_id: String,
    couple_id: String,
    stripe_transfer_id: Option<String>,
    created_at: NaiveDateTime,
}

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: PaymentRow) -> Result<Payment> {
        Ok(Payment {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            booking_id: Uuid::parse_str(&row.booking_id).map_err(|e| AppError::Database(e.to_string()))?,
            amount: row.amount,
            tip: row.tip,
            status: PaymentStatus::from_str(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid payment status: {}", row.status)))?,
            payment_type: PayoutType::parse(&row.payment_type)
                .map_err(|_| AppError::Database(format!("Invalid payment type: {}", row.payment_type)))?,
            vendor_id: Uuid::parse_str(&row.vendor_id).map_err(|e| AppError::Database(e.to_string()))?,
            couple_id: Uuid::parse_str(&row.couple_id).map_err(|e| AppError::Database(e.to_string()))?,
            stripe_transfer_id: row.stripe_transfer_id,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn claim_balance(&self, booking_id: Uuid, payout_type: PayoutType, idempotency_key: &str) -> Result<()> {
        let balance = payout_type.balance();

        sqlx::query(
            r#"
            INSERT INTO payout_claims (booking_id, balance, payout_type, idempotency_key, claimed_at)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(booking_id.to_string())
        .bind(balance.as_str())
        .bind(payout_type.as_str())
        .bind(idempotency_key)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(format!(
                "{} balance already paid or in flight for booking {}",
                balance.as_str(),
                booking_id
            )),
            other => AppError::Database(other.to_string()),
        })?;

        Ok(())
    }

    async fn release_claim(&self, booking_id: Uuid, balance: PayoutBalance) -> Result<()> {
        sqlx::query("DELETE FROM payout_claims WHERE booking_id = ? AND balance = ?")
            .bind(booking_id.to_string())
            .bind(balance.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn append(&self, payment: Payment, tip: Option<BookingTip>) -> Result<Payment> {
        let mut tx = self.pool.begin().await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, booking_id, amount, tip, status, payment_type, balance,
                vendor_id, couple_id, stripe_transfer_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(payment.id.to_string())
        .bind(payment.booking_id.to_string())
        .bind(payment.amount)
        .bind(payment.tip)
        .bind(payment.status.as_str())
        .bind(payment.payment_type.as_str())
        .bind(payment.payment_type.balance().as_str())
        .bind(payment.vendor_id.to_string())
        .bind(payment.couple_id.to_string())
        .bind(&payment.stripe_transfer_id)
        .bind(payment.created_at.naive_utc())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(tip) = tip {
            let result = sqlx::query(
                r#"
                UPDATE bookings
                SET tip_amount = ?,
                    vendor_payout_amount = ?,
                    updated_at = ?
                WHERE id = ?
                "#
            )
            .bind(tip.tip_amount)
            .bind(tip.vendor_payout_amount)
            .bind(Utc::now().naive_utc())
            .bind(payment.booking_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

            if result.rows_affected() == 0 {
                return Err(AppError::NotFound("Booking not found".to_string()));
            }
        }

        tx.commit().await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(payment.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve appended payment".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, booking_id, amount, tip, status, payment_type,
                   vendor_id, couple_id, stripe_transfer_id, created_at
            FROM payments
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_payment).transpose()
    }

    async fn list_by_booking(&self, booking_id: Uuid) -> Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, booking_id, amount, tip, status, payment_type,
                   vendor_id, couple_id, stripe_transfer_id, created_at
            FROM payments
            WHERE booking_id = ?
            ORDER BY created_at ASC
            "#
        )
        .bind(booking_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_payment)
            .collect()
    }
}
