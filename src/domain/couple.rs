use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Couple {
    pub id: Uuid,
    pub email: String,
    pub partner_one_name: String,
    pub partner_two_name: String,
    /// Account creation; start of the free gallery period when nothing has been uploaded yet.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCoupleRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub partner_one_name: String,
    #[validate(length(min = 1, max = 100))]
    pub partner_two_name: String,
}
