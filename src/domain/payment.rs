use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Ledger row for one vendor payout. Rows are appended, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    /// Base payout in cents, excluding the tip.
    pub amount: i64,
    pub tip: i64,
    pub status: PaymentStatus,
    pub payment_type: PayoutType,
    pub vendor_id: Uuid,
    pub couple_id: Uuid,
    pub stripe_transfer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Succeeded,
    Failed,
    Pending,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Pending => "pending",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "succeeded" => Some(PaymentStatus::Succeeded),
            "failed" => Some(PaymentStatus::Failed),
            "pending" => Some(PaymentStatus::Pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PayoutType {
    Deposit,
    Final,
    FinalWithTip,
}

impl PayoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutType::Deposit => "deposit",
            PayoutType::Final => "final",
            PayoutType::FinalWithTip => "final_with_tip",
        }
    }

    /// The balance this payout settles. Final and final-with-tip share one.
    pub fn balance(&self) -> PayoutBalance {
        match self {
            PayoutType::Deposit => PayoutBalance::Deposit,
            PayoutType::Final | PayoutType::FinalWithTip => PayoutBalance::Final,
        }
    }

    /// Parses the wire name, rejecting anything else with `InvalidPayoutType`.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "deposit" => Ok(PayoutType::Deposit),
            "final" => Ok(PayoutType::Final),
            "final_with_tip" => Ok(PayoutType::FinalWithTip),
            other => Err(AppError::InvalidPayoutType(other.to_string())),
        }
    }
}

/// A booking balance that can be paid out at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayoutBalance {
    Deposit,
    Final,
}

impl PayoutBalance {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutBalance::Deposit => "deposit",
            PayoutBalance::Final => "final",
        }
    }
}

/// Tip written to the booking together with its final-with-tip ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingTip {
    pub tip_amount: i64,
    pub vendor_payout_amount: i64,
}

/// A payout to perform. Consumed once; never stored as such.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayoutRequest {
    pub booking_id: Uuid,
    /// One of `deposit`, `final`, `final_with_tip`.
    pub payout_type: String,
    #[serde(default)]
    pub tip_amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayoutReceipt {
    pub transfer_id: String,
    /// What was actually sent: base amount plus tip.
    pub transfer_amount: i64,
    pub payment: Payment,
}
