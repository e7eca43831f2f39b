use async_trait::async_trait;
use std::sync::Arc;
use stripe::{
    Client, CreateTransfer, Currency, Event, EventObject, EventType, RequestStrategy,
    Transfer, Webhook, WebhookError,
};

use crate::{
    domain::SubscriptionEvent,
    error::{AppError, Result},
    payments::{TransferGateway, TransferRequest},
    service::subscription_service::SubscriptionService,
};

pub struct StripeClient {
    client: Client,
    webhook_secret: String,
    subscription_service: Arc<SubscriptionService>,
}

impl StripeClient {
    pub fn new(
        api_key: String,
        webhook_secret: String,
        subscription_service: Arc<SubscriptionService>,
    ) -> Self {
        let client = Client::new(api_key);
        Self {
            client,
            webhook_secret,
            subscription_service,
        }
    }

    pub async fn handle_webhook(
        &self,
        payload: &str,
        stripe_signature: &str,
    ) -> Result<()> {
        // Verify webhook signature and construct event
        let event = Webhook::construct_event(
            payload,
            stripe_signature,
            &self.webhook_secret,
        )
        .map_err(|e| match e {
            WebhookError::BadSignature => AppError::BadRequest("Invalid signature".to_string()),
            _ => AppError::External(format!("Webhook error: {}", e)),
        })?;

        match subscription_event(&event) {
            Some((customer_id, subscription_event)) => {
                self.subscription_service
                    .apply_event(&customer_id, subscription_event, event.id.as_str())
                    .await?;
            }
            None => {
                tracing::debug!("Unhandled webhook event type: {:?}", event.type_);
            }
        }

        Ok(())
    }
}

/// Maps the billing events we care about to the customer they concern.
fn subscription_event(event: &Event) -> Option<(String, SubscriptionEvent)> {
    let kind = billing_event_kind(&event.type_)?;

    match customer_of(&event.data.object) {
        Some(id) => Some((id, kind)),
        None => {
            tracing::warn!("Webhook {:?} carried no customer id", event.type_);
            None
        }
    }
}

fn billing_event_kind(event_type: &EventType) -> Option<SubscriptionEvent> {
    match event_type {
        EventType::InvoicePaymentSucceeded => Some(SubscriptionEvent::InvoicePaymentSucceeded),
        EventType::InvoicePaymentFailed => Some(SubscriptionEvent::InvoicePaymentFailed),
        EventType::CustomerSubscriptionDeleted => Some(SubscriptionEvent::SubscriptionDeleted),
        _ => None,
    }
}

fn customer_of(object: &EventObject) -> Option<String> {
    match object {
        EventObject::Invoice(invoice) => invoice.customer.as_ref().map(|c| c.id().to_string()),
        EventObject::Subscription(subscription) => Some(subscription.customer.id().to_string()),
        _ => None,
    }
}

#[async_trait]
impl TransferGateway for StripeClient {
    async fn create_transfer(&self, request: TransferRequest) -> Result<String> {
        let mut params = CreateTransfer::new(Currency::USD, request.destination.clone());
        params.amount = Some(request.amount);
        params.description = Some(&request.description);
        params.metadata = Some(request.metadata.clone());

        let client = self
            .client
            .clone()
            .with_strategy(RequestStrategy::Idempotent(request.idempotency_key.clone()));

        let transfer = Transfer::create(&client, params)
            .await
            .map_err(|e| AppError::TransferFailed(format!("Stripe error: {}", e)))?;

        tracing::info!(
            transfer_id = %transfer.id,
            destination = %request.destination,
            amount = request.amount,
            "Stripe transfer created"
        );

        Ok(transfer.id.to_string())
    }
}
