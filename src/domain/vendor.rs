use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Vendor {
    pub id: Uuid,
    pub business_name: String,
    pub email: String,
    /// photography, videography, dj, coordination, ...
    pub service_type: String,
    /// Stripe Connect account that receives payouts. `None` until onboarding completes.
    pub stripe_account_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, max = 200))]
    pub business_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 64))]
    pub service_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ConnectAccountRequest {
    #[validate(length(min = 1, max = 255))]
    pub stripe_account_id: String,
}
