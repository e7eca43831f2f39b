pub mod stripe_client;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;

pub use stripe_client::StripeClient;

/// Payouts are always sent in US dollars.
pub const PAYOUT_CURRENCY: &str = "usd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Cents, tip included.
    pub amount: i64,
    /// Connected account of the vendor.
    pub destination: String,
    pub description: String,
    pub metadata: HashMap<String, String>,
    /// Same key for the same (booking, payout type) so a retry cannot pay twice.
    pub idempotency_key: String,
}

/// Moves money from the platform balance to a vendor's connected account.
#[async_trait]
pub trait TransferGateway: Send + Sync {
    /// Returns the provider's transfer id.
    async fn create_transfer(&self, request: TransferRequest) -> Result<String>;
}
