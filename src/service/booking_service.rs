use std::sync::Arc;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    analytics::{AnalyticsEvent, EventDispatcher},
    billing::SplitCalculator,
    domain::*,
    error::{AppError, Result},
    repository::{BookingRepository, CoupleRepository, VendorRepository},
};

pub struct BookingService {
    booking_repo: Arc<dyn BookingRepository>,
    couple_repo: Arc<dyn CoupleRepository>,
    vendor_repo: Arc<dyn VendorRepository>,
    calculator: Arc<dyn SplitCalculator>,
    analytics: Arc<EventDispatcher>,
}

impl BookingService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        couple_repo: Arc<dyn CoupleRepository>,
        vendor_repo: Arc<dyn VendorRepository>,
        calculator: Arc<dyn SplitCalculator>,
        analytics: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            booking_repo,
            couple_repo,
            vendor_repo,
            calculator,
            analytics,
        }
    }

    /// Preview of the split a booking of `total_amount` would get.
    pub fn quote(&self, total_amount: i64) -> Result<PaymentSplit> {
        self.calculator.compute(total_amount)
    }

    /// Confirms a booking. Shares are computed here, once, and stored with it.
    pub async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking> {
        request.validate()?;

        let split = self.calculator.compute(request.total_amount)?;

        if self.couple_repo.find_by_id(request.couple_id).await?.is_none() {
            return Err(AppError::NotFound("Couple not found".to_string()));
        }
        if self.vendor_repo.find_by_id(request.vendor_id).await?.is_none() {
            return Err(AppError::NotFound("Vendor not found".to_string()));
        }

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            couple_id: request.couple_id,
            vendor_id: request.vendor_id,
            service_type: request.service_type,
            event_date: request.event_date,
            payment_model: self.calculator.payment_model(),
            split,
            tip_amount: 0,
            vendor_payout_amount: None,
            created_at: now,
            updated_at: now,
        };

        let booking = self.booking_repo.create(booking).await?;
        tracing::info!(
            "Booking {} created: total {} cents, deposit {}, final {}",
            booking.id,
            booking.split.total_amount,
            booking.split.deposit_amount,
            booking.split.final_amount
        );

        self.analytics
            .track(AnalyticsEvent::new(
                format!("booking_created:{}", booking.id),
                "booking_created",
                json!({
                    "booking_id": booking.id,
                    "vendor_id": booking.vendor_id,
                    "service_type": booking.service_type,
                    "total_amount": booking.split.total_amount,
                }),
            ))
            .await;

        Ok(booking)
    }

    pub async fn get_booking(&self, id: Uuid) -> Result<Booking> {
        self.booking_repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }

    pub async fn list_for_couple(&self, couple_id: Uuid) -> Result<Vec<Booking>> {
        self.booking_repo.list_by_couple(couple_id).await
    }

    pub async fn list_for_vendor(&self, vendor_id: Uuid) -> Result<Vec<Booking>> {
        self.booking_repo.list_by_vendor(vendor_id).await
    }
}
