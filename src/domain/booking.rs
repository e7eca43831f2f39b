use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Flat platform fee in cents ($150.00), added to platform earnings on every booking.
pub const PLATFORM_FEE_CENTS: i64 = 15_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentModel {
    /// Platform keeps the whole deposit, vendor gets the whole final payment.
    Legacy,
    /// Rows written by the newer allocation policy. Read-only here.
    Split,
}

impl PaymentModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentModel::Legacy => "legacy",
            PaymentModel::Split => "split",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "legacy" => Some(PaymentModel::Legacy),
            "split" => Some(PaymentModel::Split),
            _ => None,
        }
    }
}

/// Deposit/final allocation of a booking total, all amounts in cents.
///
/// `deposit_amount + final_amount == total_amount` always holds, and the four
/// shares partition the total exactly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct PaymentSplit {
    pub total_amount: i64,
    pub deposit_amount: i64,
    pub final_amount: i64,
    pub vendor_deposit_share: i64,
    pub platform_deposit_share: i64,
    pub vendor_final_share: i64,
    pub platform_final_share: i64,
    pub platform_fee: i64,
    pub vendor_total_earnings: i64,
    pub platform_total_earnings: i64,
}

impl PaymentSplit {
    pub fn shares_total(&self) -> i64 {
        self.vendor_deposit_share
            + self.platform_deposit_share
            + self.vendor_final_share
            + self.platform_final_share
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub couple_id: Uuid,
    pub vendor_id: Uuid,
    pub service_type: String,
    pub event_date: Option<NaiveDate>,
    pub payment_model: PaymentModel,
    /// Computed once at confirmation and never recomputed.
    #[serde(flatten)]
    pub split: PaymentSplit,
    pub tip_amount: i64,
    /// Set by the final-with-tip payout: vendor earnings plus tip.
    pub vendor_payout_amount: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub couple_id: Uuid,
    pub vendor_id: Uuid,
    #[validate(length(min = 1, max = 64))]
    pub service_type: String,
    pub event_date: Option<NaiveDate>,
    /// Booking total in cents.
    pub total_amount: i64,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct QuoteQuery {
    /// Booking total in cents.
    pub total_amount: i64,
}
