#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use vowline::{
    analytics::{EventDispatcher, TracingSink},
    domain::*,
    error::{AppError, Result},
    payments::{TransferGateway, TransferRequest},
    repository::PaymentRepository,
    service::ServiceContext,
};

/// Single-connection in-memory database so every query sees the same data.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok(pool)
}

pub fn temp_uploads_dir() -> PathBuf {
    std::env::temp_dir().join(format!("vowline-test-{}", Uuid::new_v4()))
}

pub fn test_context(pool: SqlitePool) -> ServiceContext {
    test_context_in(pool, &temp_uploads_dir())
}

pub fn test_context_in(pool: SqlitePool, uploads_dir: &Path) -> ServiceContext {
    let analytics = Arc::new(EventDispatcher::new(Arc::new(TracingSink)));
    ServiceContext::new(pool, analytics, uploads_dir.to_string_lossy().into_owned())
}

pub async fn create_couple(context: &ServiceContext) -> anyhow::Result<Couple> {
    let couple = context.account_service.create_couple(CreateCoupleRequest {
        email: format!("{}@example.com", Uuid::new_v4()),
        partner_one_name: "Ana".to_string(),
        partner_two_name: "Sam".to_string(),
    }).await?;
    Ok(couple)
}

pub async fn create_vendor(context: &ServiceContext, connected: bool) -> anyhow::Result<Vendor> {
    let vendor = context.account_service.create_vendor(CreateVendorRequest {
        business_name: "Golden Hour Photo".to_string(),
        email: format!("{}@vendors.example.com", Uuid::new_v4()),
        service_type: "photography".to_string(),
    }).await?;

    if connected {
        let vendor = context.account_service.connect_vendor_account(vendor.id, ConnectAccountRequest {
            stripe_account_id: "acct_1TestVendor".to_string(),
        }).await?;
        return Ok(vendor);
    }
    Ok(vendor)
}

pub async fn create_booking(
    context: &ServiceContext,
    couple: &Couple,
    vendor: &Vendor,
    total_amount: i64,
) -> anyhow::Result<Booking> {
    let booking = context.booking_service.create_booking(CreateBookingRequest {
        couple_id: couple.id,
        vendor_id: vendor.id,
        service_type: vendor.service_type.clone(),
        event_date: None,
        total_amount,
    }).await?;
    Ok(booking)
}

/// Records every transfer it is asked to make.
#[derive(Default)]
pub struct FakeTransferGateway {
    pub requests: Mutex<Vec<TransferRequest>>,
    pub fail_with: Option<String>,
    /// Simulated provider latency, so concurrent payouts overlap.
    pub latency: Option<Duration>,
}

impl FakeTransferGateway {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn slow(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<TransferRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransferGateway for FakeTransferGateway {
    async fn create_transfer(&self, request: TransferRequest) -> Result<String> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.requests.lock().unwrap().push(request);
        match &self.fail_with {
            Some(message) => Err(AppError::TransferFailed(message.clone())),
            None => Ok(format!("tr_{}", self.requests.lock().unwrap().len())),
        }
    }
}

/// Ledger that refuses every append but claims and reads through to the real one.
pub struct BrokenLedger {
    pub inner: Arc<dyn PaymentRepository>,
}

#[async_trait]
impl PaymentRepository for BrokenLedger {
    async fn claim_balance(&self, booking_id: Uuid, payout_type: PayoutType, idempotency_key: &str) -> Result<()> {
        self.inner.claim_balance(booking_id, payout_type, idempotency_key).await
    }

    async fn release_claim(&self, booking_id: Uuid, balance: PayoutBalance) -> Result<()> {
        self.inner.release_claim(booking_id, balance).await
    }

    async fn append(&self, _payment: Payment, _tip: Option<BookingTip>) -> Result<Payment> {
        Err(AppError::Database("disk I/O error".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        self.inner.find_by_id(id).await
    }

    async fn list_by_booking(&self, booking_id: Uuid) -> Result<Vec<Payment>> {
        self.inner.list_by_booking(booking_id).await
    }
}
