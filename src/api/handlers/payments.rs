use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};

use crate::{
    api::state::AppState,
    error::{AppError, Result},
};

/// Stripe billing webhooks (invoice paid/failed, subscription deleted).
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: String,
) -> Result<StatusCode> {
    let stripe_client = state.stripe_client.as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Stripe is not configured".to_string()))?;

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing Stripe-Signature header".to_string()))?;

    stripe_client.handle_webhook(&payload, signature).await?;
    Ok(StatusCode::OK)
}
