use chrono::{DateTime, Duration, Utc};

use crate::domain::{AccessReason, CoupleSubscription, GalleryAccess, SubscriptionStatus, FREE_PERIOD_DAYS};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Decides whether a couple can currently use their gallery.
///
/// The free period starts at the earliest upload (or at account creation when
/// nothing was uploaded) and lasts 15 days. Remaining days are rounded up, so
/// any time left counts as a day; at the exact end of the period nothing is
/// left and free access is over. An active subscription grants access
/// regardless of the free period.
pub fn is_access_active(
    upload_dates: &[DateTime<Utc>],
    account_created_at: DateTime<Utc>,
    subscription: Option<&CoupleSubscription>,
    now: DateTime<Utc>,
) -> GalleryAccess {
    let period_start = upload_dates
        .iter()
        .min()
        .copied()
        .unwrap_or(account_created_at);
    let period_end = period_start + Duration::days(FREE_PERIOD_DAYS);

    let free_days_remaining = days_remaining(now, period_end);
    let free_access_active = free_days_remaining > 0;

    let has_subscription = subscription
        .map(|s| s.payment_status == SubscriptionStatus::Active)
        .unwrap_or(false);

    let reason = if has_subscription {
        AccessReason::Subscription
    } else if free_access_active {
        AccessReason::FreePeriod
    } else {
        AccessReason::Expired
    };

    GalleryAccess {
        active: free_access_active || has_subscription,
        free_days_remaining,
        period_end,
        reason,
    }
}

fn days_remaining(now: DateTime<Utc>, period_end: DateTime<Utc>) -> i64 {
    let millis = (period_end - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn subscription(status: SubscriptionStatus) -> CoupleSubscription {
        CoupleSubscription {
            couple_id: Uuid::new_v4(),
            payment_status: status,
            free_period_expiry: None,
            stripe_customer_id: Some("cus_test".to_string()),
            stripe_subscription_id: None,
            updated_at: t0(),
        }
    }

    #[test]
    fn test_expires_exactly_at_period_end() {
        let access = is_access_active(&[], t0(), None, t0() + Duration::days(15));
        assert!(!access.active);
        assert_eq!(access.free_days_remaining, 0);
        assert_eq!(access.reason, AccessReason::Expired);
        assert_eq!(access.period_end, t0() + Duration::days(15));
    }

    #[test]
    fn test_last_hour_counts_as_a_day() {
        let now = t0() + Duration::days(14) + Duration::hours(23);
        let access = is_access_active(&[], t0(), None, now);
        assert!(access.active);
        assert_eq!(access.free_days_remaining, 1);
        assert_eq!(access.reason, AccessReason::FreePeriod);
    }

    #[test]
    fn test_full_period_at_start() {
        let access = is_access_active(&[], t0(), None, t0());
        assert_eq!(access.free_days_remaining, 15);
        assert!(access.active);
    }

    #[test]
    fn test_earliest_upload_starts_period() {
        let created = t0() - Duration::days(60);
        let uploads = [t0() + Duration::days(3), t0(), t0() + Duration::days(1)];
        let access = is_access_active(&uploads, created, None, t0() + Duration::days(10));
        assert_eq!(access.period_end, t0() + Duration::days(15));
        assert_eq!(access.free_days_remaining, 5);
        assert!(access.active);
    }

    #[test]
    fn test_subscription_overrides_expired_period() {
        let sub = subscription(SubscriptionStatus::Active);
        let access = is_access_active(&[t0()], t0(), Some(&sub), t0() + Duration::days(100));
        assert!(access.active);
        assert_eq!(access.free_days_remaining, 0);
        assert_eq!(access.reason, AccessReason::Subscription);
    }

    #[test]
    fn test_inactive_subscription_does_not_grant_access() {
        let now = t0() + Duration::days(30);
        for status in [SubscriptionStatus::PastDue, SubscriptionStatus::Cancelled, SubscriptionStatus::None] {
            let sub = subscription(status);
            let access = is_access_active(&[], t0(), Some(&sub), now);
            assert!(!access.active, "{:?} should not grant access", status);
        }
    }
}
