pub mod account_service;
pub mod booking_service;
pub mod gallery_service;
pub mod payout_processor;
pub mod subscription_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::analytics::EventDispatcher;
use crate::billing::LegacySplitCalculator;
use crate::email::EmailSender;
use crate::payments::TransferGateway;
use crate::repository::*;
use account_service::AccountService;
use booking_service::BookingService;
use gallery_service::GalleryService;
use payout_processor::PayoutProcessor;
use subscription_service::SubscriptionService;

pub struct ServiceContext {
    pub couple_repo: Arc<dyn CoupleRepository>,
    pub vendor_repo: Arc<dyn VendorRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub upload_repo: Arc<dyn FileUploadRepository>,
    pub subscription_repo: Arc<dyn SubscriptionRepository>,
    pub account_service: Arc<AccountService>,
    pub booking_service: Arc<BookingService>,
    pub gallery_service: Arc<GalleryService>,
    pub subscription_service: Arc<SubscriptionService>,
    /// Present only when a transfer gateway is configured.
    pub payout_processor: Option<Arc<PayoutProcessor>>,
    pub analytics: Arc<EventDispatcher>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        db_pool: SqlitePool,
        analytics: Arc<EventDispatcher>,
        uploads_dir: String,
    ) -> Self {
        let couple_repo: Arc<dyn CoupleRepository> = Arc::new(SqliteCoupleRepository::new(db_pool.clone()));
        let vendor_repo: Arc<dyn VendorRepository> = Arc::new(SqliteVendorRepository::new(db_pool.clone()));
        let booking_repo: Arc<dyn BookingRepository> = Arc::new(SqliteBookingRepository::new(db_pool.clone()));
        let payment_repo: Arc<dyn PaymentRepository> = Arc::new(SqlitePaymentRepository::new(db_pool.clone()));
        let upload_repo: Arc<dyn FileUploadRepository> = Arc::new(SqliteFileUploadRepository::new(db_pool.clone()));
        let subscription_repo: Arc<dyn SubscriptionRepository> = Arc::new(SqliteSubscriptionRepository::new(db_pool.clone()));

        let account_service = Arc::new(AccountService::new(couple_repo.clone(), vendor_repo.clone()));
        let booking_service = Arc::new(BookingService::new(
            booking_repo.clone(),
            couple_repo.clone(),
            vendor_repo.clone(),
            Arc::new(LegacySplitCalculator),
            analytics.clone(),
        ));
        let gallery_service = Arc::new(GalleryService::new(
            upload_repo.clone(),
            couple_repo.clone(),
            vendor_repo.clone(),
            subscription_repo.clone(),
            uploads_dir,
        ));
        let subscription_service = Arc::new(SubscriptionService::new(
            subscription_repo.clone(),
            couple_repo.clone(),
            analytics.clone(),
        ));

        Self {
            couple_repo,
            vendor_repo,
            booking_repo,
            payment_repo,
            upload_repo,
            subscription_repo,
            account_service,
            booking_service,
            gallery_service,
            subscription_service,
            payout_processor: None,
            analytics,
            db_pool,
        }
    }

    /// Enables vendor payouts through `gateway`.
    pub fn with_payouts(
        mut self,
        gateway: Arc<dyn TransferGateway>,
        mailer: Option<Arc<dyn EmailSender>>,
    ) -> Self {
        self.payout_processor = Some(Arc::new(PayoutProcessor::new(
            self.booking_repo.clone(),
            self.vendor_repo.clone(),
            self.payment_repo.clone(),
            gateway,
            mailer,
            self.analytics.clone(),
        )));
        self
    }
}
