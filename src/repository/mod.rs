use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod booking_repository;
pub mod couple_repository;
pub mod file_upload_repository;
pub mod payment_repository;
pub mod subscription_repository;
pub mod vendor_repository;

pub use booking_repository::SqliteBookingRepository;
pub use couple_repository::SqliteCoupleRepository;
pub use file_upload_repository::SqliteFileUploadRepository;
pub use payment_repository::SqlitePaymentRepository;
pub use subscription_repository::SqliteSubscriptionRepository;
pub use vendor_repository::SqliteVendorRepository;

#[async_trait]
pub trait CoupleRepository: Send + Sync {
    async fn create(&self, couple: CreateCoupleRequest) -> Result<Couple>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Couple>>;
}

#[async_trait]
pub trait VendorRepository: Send + Sync {
    async fn create(&self, vendor: CreateVendorRequest) -> Result<Vendor>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vendor>>;
    async fn set_stripe_account(&self, id: Uuid, stripe_account_id: &str) -> Result<Vendor>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: Booking) -> Result<Booking>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>>;
    async fn list_by_couple(&self, couple_id: Uuid) -> Result<Vec<Booking>>;
    async fn list_by_vendor(&self, vendor_id: Uuid) -> Result<Vec<Booking>>;
}

/// Payout ledger. Rows are appended, never updated or deleted.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Reserves `payout_type`'s balance of a booking. `Conflict` if it is
    /// already claimed.
    async fn claim_balance(&self, booking_id: Uuid, payout_type: PayoutType, idempotency_key: &str) -> Result<()>;
    async fn release_claim(&self, booking_id: Uuid, balance: PayoutBalance) -> Result<()>;
    /// Appends `payment` and, when given, writes `tip` to its booking in the
    /// same transaction. Share columns are never touched.
    async fn append(&self, payment: Payment, tip: Option<BookingTip>) -> Result<Payment>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>>;
    async fn list_by_booking(&self, booking_id: Uuid) -> Result<Vec<Payment>>;
}

#[async_trait]
pub trait FileUploadRepository: Send + Sync {
    async fn create(&self, upload: FileUpload) -> Result<FileUpload>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileUpload>>;
    async fn list_by_couple(&self, couple_id: Uuid) -> Result<Vec<FileUpload>>;
    async fn upload_dates(&self, couple_id: Uuid) -> Result<Vec<DateTime<Utc>>>;
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find_by_couple(&self, couple_id: Uuid) -> Result<Option<CoupleSubscription>>;
    async fn find_by_customer(&self, stripe_customer_id: &str) -> Result<Option<CoupleSubscription>>;
    async fn upsert(&self, subscription: CoupleSubscription) -> Result<CoupleSubscription>;
    async fn update_status(&self, couple_id: Uuid, status: SubscriptionStatus) -> Result<CoupleSubscription>;
    async fn set_free_period_expiry(&self, couple_id: Uuid, expiry: DateTime<Utc>) -> Result<()>;
}
