use axum::{extract::State, Json};

use crate::{
    api::state::AppState,
    domain::{PayoutReceipt, PayoutRequest},
    error::{AppError, Result},
};

#[utoipa::path(
    post, path = "/api/payouts", tag = "Payouts",
    request_body = PayoutRequest,
    responses(
        (status = 200, body = PayoutReceipt),
        (status = 400, description = "Invalid payout type or amount"),
        (status = 409, description = "Nothing to transfer, vendor not onboarded, or already paid"),
        (status = 502, description = "Transfer rejected by the payment provider"),
        (status = 503, description = "Payouts are not configured")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<PayoutRequest>,
) -> Result<Json<PayoutReceipt>> {
    let processor = state.service_context.payout_processor.as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Payouts are not configured".to_string()))?;

    let receipt = processor.process(request).await?;
    Ok(Json(receipt))
}
