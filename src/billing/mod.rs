pub mod payout;
pub mod split;

pub use payout::{compute_transfer_amount, idempotency_key, TransferAmount};
pub use split::{compute_legacy_split, LegacySplitCalculator, SplitCalculator};
