//! Deposit/final allocation of a booking total.

use crate::{
    domain::{PaymentModel, PaymentSplit, PLATFORM_FEE_CENTS},
    error::{AppError, Result},
};

/// Allocation policy applied when a booking is confirmed.
pub trait SplitCalculator: Send + Sync {
    fn payment_model(&self) -> PaymentModel;
    fn compute(&self, total_amount: i64) -> Result<PaymentSplit>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LegacySplitCalculator;

impl SplitCalculator for LegacySplitCalculator {
    fn payment_model(&self) -> PaymentModel {
        PaymentModel::Legacy
    }

    fn compute(&self, total_amount: i64) -> Result<PaymentSplit> {
        compute_legacy_split(total_amount)
    }
}

/// Splits `total_amount` cents into a deposit and a final payment under the
/// legacy model: the platform keeps the deposit plus the flat fee, the vendor
/// gets the final payment.
///
/// The deposit is half the total rounded half-up (`2501 -> 1251`); the final
/// payment is whatever remains, so the two always add back up to the total.
pub fn compute_legacy_split(total_amount: i64) -> Result<PaymentSplit> {
    if total_amount < 0 {
        return Err(AppError::InvalidAmount(format!(
            "total amount must be non-negative, got {}",
            total_amount
        )));
    }

    let deposit_amount = total_amount / 2 + total_amount % 2;
    let final_amount = total_amount - deposit_amount;

    Ok(PaymentSplit {
        total_amount,
        deposit_amount,
        final_amount,
        vendor_deposit_share: 0,
        platform_deposit_share: deposit_amount,
        vendor_final_share: final_amount,
        platform_final_share: 0,
        platform_fee: PLATFORM_FEE_CENTS,
        vendor_total_earnings: final_amount,
        platform_total_earnings: deposit_amount + PLATFORM_FEE_CENTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_balanced(split: &PaymentSplit) {
        assert_eq!(split.deposit_amount + split.final_amount, split.total_amount);
        assert_eq!(split.shares_total(), split.total_amount);
        assert_eq!(
            split.vendor_total_earnings + (split.platform_total_earnings - split.platform_fee),
            split.total_amount
        );
    }

    #[test]
    fn test_even_total() {
        let split = compute_legacy_split(250_000).unwrap();
        assert_eq!(split.deposit_amount, 125_000);
        assert_eq!(split.final_amount, 125_000);
        assert_eq!(split.vendor_total_earnings, 125_000);
        assert_eq!(split.platform_total_earnings, 140_000);
        assert_eq!(split.vendor_deposit_share, 0);
        assert_eq!(split.platform_final_share, 0);
        assert_balanced(&split);
    }

    #[test]
    fn test_odd_cent_rounds_deposit_up() {
        let split = compute_legacy_split(2501).unwrap();
        assert_eq!(split.deposit_amount, 1251);
        assert_eq!(split.final_amount, 1250);

        let split = compute_legacy_split(100_001).unwrap();
        assert_eq!(split.deposit_amount, 50_001);
        assert_eq!(split.final_amount, 50_000);
        assert_balanced(&split);

        assert_eq!(compute_legacy_split(2500).unwrap().deposit_amount, 1250);
        assert_eq!(compute_legacy_split(1).unwrap().deposit_amount, 1);
    }

    #[test]
    fn test_zero_total_still_carries_fee() {
        let split = compute_legacy_split(0).unwrap();
        assert_eq!(split.shares_total(), 0);
        assert_eq!(split.deposit_amount, 0);
        assert_eq!(split.vendor_total_earnings, 0);
        assert_eq!(split.platform_fee, 15_000);
        assert_eq!(split.platform_total_earnings, 15_000);
    }

    #[test]
    fn test_negative_total_rejected() {
        assert!(matches!(compute_legacy_split(-1), Err(AppError::InvalidAmount(_))));
    }

    #[test]
    fn test_largest_total_does_not_overflow() {
        assert_balanced(&compute_legacy_split(i64::MAX).unwrap());
    }

    #[test]
    fn test_shares_always_sum_to_total() {
        let samples = (0..2_000).chain([99_999, 100_001, 123_457, 9_999_999, 1_000_000_001]);
        for total in samples {
            assert_balanced(&compute_legacy_split(total).unwrap());
        }
    }

    #[test]
    fn test_calculator_reports_legacy_model() {
        let calculator = LegacySplitCalculator;
        assert_eq!(calculator.payment_model(), PaymentModel::Legacy);
        assert_eq!(calculator.compute(5000).unwrap(), compute_legacy_split(5000).unwrap());
    }
}
