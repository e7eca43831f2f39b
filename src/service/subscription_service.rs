use std::sync::Arc;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    analytics::{AnalyticsEvent, EventDispatcher},
    domain::*,
    error::{AppError, Result},
    repository::{CoupleRepository, SubscriptionRepository},
};

pub struct SubscriptionService {
    subscription_repo: Arc<dyn SubscriptionRepository>,
    couple_repo: Arc<dyn CoupleRepository>,
    analytics: Arc<EventDispatcher>,
}

impl SubscriptionService {
    pub fn new(
        subscription_repo: Arc<dyn SubscriptionRepository>,
        couple_repo: Arc<dyn CoupleRepository>,
        analytics: Arc<EventDispatcher>,
    ) -> Self {
        Self { subscription_repo, couple_repo, analytics }
    }

    pub async fn get(&self, couple_id: Uuid) -> Result<Option<CoupleSubscription>> {
        self.subscription_repo.find_by_couple(couple_id).await
    }

    /// Ties a couple to their Stripe customer so billing webhooks can find them.
    /// Status stays as it was (or `none`) until the first invoice event.
    pub async fn link_customer(&self, couple_id: Uuid, request: LinkSubscriptionRequest) -> Result<CoupleSubscription> {
        if self.couple_repo.find_by_id(couple_id).await?.is_none() {
            return Err(AppError::NotFound("Couple not found".to_string()));
        }

        let existing = self.subscription_repo.find_by_couple(couple_id).await?;
        let subscription = CoupleSubscription {
            couple_id,
            payment_status: existing.as_ref()
                .map(|s| s.payment_status)
                .unwrap_or(SubscriptionStatus::None),
            free_period_expiry: existing.as_ref().and_then(|s| s.free_period_expiry),
            stripe_customer_id: Some(request.stripe_customer_id),
            stripe_subscription_id: request.stripe_subscription_id
                .or_else(|| existing.and_then(|s| s.stripe_subscription_id)),
            updated_at: Utc::now(),
        };

        self.subscription_repo.upsert(subscription).await
    }

    /// Applies a billing webhook to the subscription of `stripe_customer_id`.
    /// Events for customers we do not know are logged and ignored.
    /// `event_id` is the provider's id for the webhook; a redelivered event
    /// is applied again but tracked once.
    pub async fn apply_event(
        &self,
        stripe_customer_id: &str,
        event: SubscriptionEvent,
        event_id: &str,
    ) -> Result<Option<CoupleSubscription>> {
        let Some(subscription) = self.subscription_repo.find_by_customer(stripe_customer_id).await? else {
            tracing::warn!("Subscription event {:?} for unknown customer {}", event, stripe_customer_id);
            return Ok(None);
        };

        let status = event.resulting_status();
        let updated = self.subscription_repo
            .update_status(subscription.couple_id, status)
            .await?;

        tracing::info!(
            "Subscription for couple {} is now {}",
            updated.couple_id,
            status.as_str()
        );

        self.analytics
            .track(AnalyticsEvent::new(
                format!("subscription_status:{}", event_id),
                "subscription_status_changed",
                json!({
                    "couple_id": updated.couple_id,
                    "event_id": event_id,
                    "from": subscription.payment_status.as_str(),
                    "to": status.as_str(),
                }),
            ))
            .await;

        Ok(Some(updated))
    }
}
