use std::collections::HashMap;
use std::sync::Arc;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    analytics::{AnalyticsEvent, EventDispatcher},
    billing::{compute_transfer_amount, idempotency_key},
    domain::*,
    email::{payout_notification, EmailSender},
    error::{AppError, Result},
    payments::{TransferGateway, TransferRequest},
    repository::{BookingRepository, PaymentRepository, VendorRepository},
};

/// Sends vendor payouts and records them on the ledger.
///
/// Each balance of a booking (deposit, final) is claimed in the database
/// before its transfer is sent, so it is paid at most once even under
/// concurrent requests. If the transfer fails the claim is released and
/// nothing is written. The ledger row and the booking's tip are written in one
/// transaction; if that fails after the transfer the error is
/// `LedgerWriteFailed`, the claim stays, and an operator reconciles the
/// transfer.
pub struct PayoutProcessor {
    booking_repo: Arc<dyn BookingRepository>,
    vendor_repo: Arc<dyn VendorRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn TransferGateway>,
    mailer: Option<Arc<dyn EmailSender>>,
    analytics: Arc<EventDispatcher>,
}

impl PayoutProcessor {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        vendor_repo: Arc<dyn VendorRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn TransferGateway>,
        mailer: Option<Arc<dyn EmailSender>>,
        analytics: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            booking_repo,
            vendor_repo,
            payment_repo,
            gateway,
            mailer,
            analytics,
        }
    }

    pub async fn process(&self, request: PayoutRequest) -> Result<PayoutReceipt> {
        let booking = self.booking_repo.find_by_id(request.booking_id).await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        let transfer = compute_transfer_amount(&booking, &request.payout_type, request.tip_amount)?;

        let vendor = self.vendor_repo.find_by_id(booking.vendor_id).await?
            .ok_or_else(|| AppError::NotFound("Vendor not found".to_string()))?;
        let destination = vendor.stripe_account_id.clone()
            .ok_or_else(|| AppError::VendorNotOnboarded(vendor.id.to_string()))?;

        let key = idempotency_key(booking.id, transfer.payout_type);
        self.payment_repo
            .claim_balance(booking.id, transfer.payout_type, &key)
            .await?;

        let mut metadata = HashMap::new();
        metadata.insert("booking_id".to_string(), booking.id.to_string());
        metadata.insert("vendor_id".to_string(), vendor.id.to_string());
        metadata.insert("payment_type".to_string(), transfer.payout_type.as_str().to_string());
        metadata.insert("tip_amount".to_string(), transfer.tip.to_string());

        let sent = self.gateway
            .create_transfer(TransferRequest {
                amount: transfer.amount,
                destination,
                description: transfer.description.clone(),
                metadata,
                idempotency_key: key,
            })
            .await;

        let transfer_id = match sent {
            Ok(id) => id,
            Err(e) => {
                let balance = transfer.payout_type.balance();
                if let Err(release) = self.payment_repo.release_claim(booking.id, balance).await {
                    tracing::error!(
                        booking_id = %booking.id,
                        "Failed to release {} claim after failed transfer: {}",
                        balance.as_str(),
                        release
                    );
                }
                return Err(match e {
                    AppError::TransferFailed(msg) => AppError::TransferFailed(msg),
                    other => AppError::TransferFailed(other.to_string()),
                });
            }
        };

        let payment = Payment {
            id: Uuid::new_v4(),
            booking_id: booking.id,
            amount: transfer.base_amount(),
            tip: transfer.tip,
            status: PaymentStatus::Succeeded,
            payment_type: transfer.payout_type,
            vendor_id: vendor.id,
            couple_id: booking.couple_id,
            stripe_transfer_id: Some(transfer_id.clone()),
            created_at: Utc::now(),
        };

        let tip = (transfer.payout_type == PayoutType::FinalWithTip).then(|| BookingTip {
            tip_amount: transfer.tip,
            vendor_payout_amount: booking.split.vendor_total_earnings + transfer.tip,
        });

        let payment = self.payment_repo.append(payment, tip).await
            .map_err(|e| self.ledger_failure(&booking, &transfer_id, e))?;

        tracing::info!(
            booking_id = %booking.id,
            transfer_id = %transfer_id,
            "Payout {} sent: {} cents (tip {})",
            transfer.payout_type.as_str(),
            transfer.amount,
            transfer.tip
        );

        let receipt = PayoutReceipt {
            transfer_id,
            transfer_amount: transfer.amount,
            payment,
        };

        self.analytics
            .track(AnalyticsEvent::new(
                format!("payout_sent:{}:{}", booking.id, transfer.payout_type.as_str()),
                "payout_sent",
                json!({
                    "booking_id": booking.id,
                    "vendor_id": vendor.id,
                    "payment_type": transfer.payout_type.as_str(),
                    "amount": transfer.amount,
                    "tip": transfer.tip,
                }),
            ))
            .await;

        if let Some(mailer) = &self.mailer {
            if let Err(e) = mailer.send(payout_notification(&vendor, &booking, &receipt)).await {
                tracing::warn!("Failed to send payout email to vendor {}: {}", vendor.id, e);
            }
        }

        Ok(receipt)
    }

    pub async fn ledger_for_booking(&self, booking_id: Uuid) -> Result<Vec<Payment>> {
        self.payment_repo.list_by_booking(booking_id).await
    }

    fn ledger_failure(&self, booking: &Booking, transfer_id: &str, error: AppError) -> AppError {
        tracing::error!(
            booking_id = %booking.id,
            transfer_id = %transfer_id,
            "Transfer succeeded but payout could not be recorded: {}",
            error
        );
        AppError::LedgerWriteFailed {
            transfer_id: transfer_id.to_string(),
            message: error.to_string(),
        }
    }
}
