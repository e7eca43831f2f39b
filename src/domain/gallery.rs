use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Length of the free gallery access window.
pub const FREE_PERIOD_DAYS: i64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileUpload {
    pub id: Uuid,
    pub couple_id: Uuid,
    pub vendor_id: Uuid,
    pub upload_date: DateTime<Utc>,
    pub file_name: String,
    pub file_size: i64,
    /// Relative path under the uploads directory.
    pub storage_path: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Cancelled,
    None,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SubscriptionStatus::Active),
            "past_due" => Some(SubscriptionStatus::PastDue),
            "cancelled" => Some(SubscriptionStatus::Cancelled),
            "none" => Some(SubscriptionStatus::None),
            _ => None,
        }
    }
}

/// Gallery subscription of a couple. At most one per couple.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CoupleSubscription {
    pub couple_id: Uuid,
    pub payment_status: SubscriptionStatus,
    pub free_period_expiry: Option<DateTime<Utc>>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Billing events from the payment provider that move a subscription's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionEvent {
    InvoicePaymentSucceeded,
    InvoicePaymentFailed,
    SubscriptionDeleted,
}

impl SubscriptionEvent {
    pub fn resulting_status(&self) -> SubscriptionStatus {
        match self {
            SubscriptionEvent::InvoicePaymentSucceeded => SubscriptionStatus::Active,
            SubscriptionEvent::InvoicePaymentFailed => SubscriptionStatus::PastDue,
            SubscriptionEvent::SubscriptionDeleted => SubscriptionStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    Subscription,
    FreePeriod,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct GalleryAccess {
    pub active: bool,
    pub free_days_remaining: i64,
    pub period_end: DateTime<Utc>,
    pub reason: AccessReason,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LinkSubscriptionRequest {
    pub stripe_customer_id: String,
    pub stripe_subscription_id: Option<String>,
}
