use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Booking, PaymentModel, PaymentSplit},
    error::{AppError, Result},
    repository::BookingRepository,
};

const BOOKING_COLUMNS: &str = r#"
    id, couple_id, vendor_id, service_type, event_date, payment_model,
    total_amount, deposit_amount, final_amount,
    vendor_deposit_share, platform_deposit_share,
    vendor_final_share, platform_final_share,
    platform_fee, vendor_total_earnings, platform_total_earnings,
    tip_amount, vendor_payout_amount, created_at, updated_at
"#;

#[derive(FromRow)]
struct BookingRow {
    id: String,
    couple_id: String,
    vendor_id: String,
    service_type: String,
    event_date: Option<NaiveDate>,
    payment_model: String,
    total_amount: i64,
    deposit_amount: i64,
    final_amount: i64,
    vendor_deposit_share: i64,
    platform_deposit_share: i64,
    vendor_final_share: i64,
    platform_final_share: i64,
    platform_fee: i64,
    vendor_total_earnings: i64,
    platform_total_earnings: i64,
    tip_amount: i64,
    vendor_payout_amount: Option<i64>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteBookingRepository {
    pool: SqlitePool,
}

impl SqliteBookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn parse_uuid(s: &str) -> Result<Uuid> {
        Uuid::parse_str(s).map_err(|e| AppError::Database(e.to_string()))
    }

    fn row_to_booking(row: BookingRow) -> Result<Booking> {
        let payment_model = PaymentModel::from_str(&row.payment_model).ok_or_else(|| {
            AppError::Database(format!("Invalid payment model: {}", row.payment_model))
        })?;

        Ok(Booking {
            id: Self::parse_uuid(&row.id)?,
            couple_id: Self::parse_uuid(&row.couple_id)?,
            vendor_id: Self::parse_uuid(&row.vendor_id)?,
            service_type: row.service_type,
            event_date: row.event_date,
            payment_model,
            split: PaymentSplit {
                total_amount: row.total_amount,
                deposit_amount: row.deposit_amount,
                final_amount: row.final_amount,
                vendor_deposit_share: row.vendor_deposit_share,
                platform_deposit_share: row.platform_deposit_share,
                vendor_final_share: row.vendor_final_share,
                platform_final_share: row.platform_final_share,
                platform_fee: row.platform_fee,
                vendor_total_earnings: row.vendor_total_earnings,
                platform_total_earnings: row.platform_total_earnings,
            },
            tip_amount: row.tip_amount,
            vendor_payout_amount: row.vendor_payout_amount,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    async fn list_where(&self, column: &str, id: Uuid) -> Result<Vec<Booking>> {
        let sql = format!(
            "SELECT {} FROM bookings WHERE {} = ? ORDER BY created_at DESC",
            BOOKING_COLUMNS, column
        );
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_booking).collect()
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn create(&self, booking: Booking) -> Result<Booking> {
        let split = &booking.split;
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, couple_id, vendor_id, service_type, event_date, payment_model,
                total_amount, deposit_amount, final_amount,
                vendor_deposit_share, platform_deposit_share,
                vendor_final_share, platform_final_share,
                platform_fee, vendor_total_earnings, platform_total_earnings,
                tip_amount, vendor_payout_amount, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(booking.id.to_string())
        .bind(booking.couple_id.to_string())
        .bind(booking.vendor_id.to_string())
        .bind(&booking.service_type)
        .bind(booking.event_date)
        .bind(booking.payment_model.as_str())
        .bind(split.total_amount)
        .bind(split.deposit_amount)
        .bind(split.final_amount)
        .bind(split.vendor_deposit_share)
        .bind(split.platform_deposit_share)
        .bind(split.vendor_final_share)
        .bind(split.platform_final_share)
        .bind(split.platform_fee)
        .bind(split.vendor_total_earnings)
        .bind(split.platform_total_earnings)
        .bind(booking.tip_amount)
        .bind(booking.vendor_payout_amount)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(booking.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created booking".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>> {
        let sql = format!("SELECT {} FROM bookings WHERE id = ?", BOOKING_COLUMNS);
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_booking).transpose()
    }

    async fn list_by_couple(&self, couple_id: Uuid) -> Result<Vec<Booking>> {
        self.list_where("couple_id", couple_id).await
    }

    async fn list_by_vendor(&self, vendor_id: Uuid) -> Result<Vec<Booking>> {
        self.list_where("vendor_id", vendor_id).await
    }
}
