//! How much a vendor payout sends, per payout type.

use uuid::Uuid;

use crate::{
    domain::{Booking, PayoutType},
    error::{AppError, Result},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferAmount {
    pub payout_type: PayoutType,
    /// Total to transfer, tip included.
    pub amount: i64,
    /// Portion of `amount` that is tip. Zero unless the payout type carries a tip.
    pub tip: i64,
    pub description: String,
}

impl TransferAmount {
    /// The amount recorded on the ledger row, tip excluded.
    pub fn base_amount(&self) -> i64 {
        self.amount - self.tip
    }
}

/// Computes the transfer for `payout_type` from the shares stored on `booking`.
///
/// Only `final_with_tip` adds the tip; other payout types ignore it. A payout
/// that would move nothing (e.g. the deposit of a legacy booking) is refused
/// with `NoAmountToTransfer` so no empty transfer reaches the provider.
pub fn compute_transfer_amount(
    booking: &Booking,
    payout_type: &str,
    tip_amount: i64,
) -> Result<TransferAmount> {
    let payout_type = PayoutType::parse(payout_type)?;

    if tip_amount < 0 {
        return Err(AppError::InvalidAmount(format!(
            "tip must be non-negative, got {}",
            tip_amount
        )));
    }

    let (amount, tip, description) = match payout_type {
        PayoutType::Deposit => (
            booking.split.vendor_deposit_share,
            0,
            format!("Deposit payout for booking {}", booking.id),
        ),
        PayoutType::Final => (
            booking.split.vendor_final_share,
            0,
            format!("Final payout for booking {}", booking.id),
        ),
        PayoutType::FinalWithTip => {
            let amount = booking
                .split
                .vendor_final_share
                .checked_add(tip_amount)
                .ok_or_else(|| AppError::InvalidAmount("tip overflows payout".to_string()))?;
            (
                amount,
                tip_amount,
                format!("Final payout with tip for booking {}", booking.id),
            )
        }
    };

    if amount <= 0 {
        return Err(AppError::NoAmountToTransfer(payout_type.as_str().to_string()));
    }

    Ok(TransferAmount {
        payout_type,
        amount,
        tip,
        description,
    })
}

/// Key sent with the transfer so a retried payout cannot transfer twice.
pub fn idempotency_key(booking_id: Uuid, payout_type: PayoutType) -> String {
    format!("payout-{}-{}", booking_id, payout_type.as_str())
}
