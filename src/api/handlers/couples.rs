use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Booking, Couple, CoupleSubscription, CreateCoupleRequest, LinkSubscriptionRequest},
    error::Result,
};

#[utoipa::path(
    post, path = "/api/couples", tag = "Couples",
    request_body = CreateCoupleRequest,
    responses((status = 201, body = Couple), (status = 409, description = "Email already exists"))
)]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateCoupleRequest>,
) -> Result<(StatusCode, Json<Couple>)> {
    let couple = state.service_context.account_service.create_couple(request).await?;
    Ok((StatusCode::CREATED, Json(couple)))
}

#[utoipa::path(
    get, path = "/api/couples/{id}/bookings", tag = "Couples",
    params(("id" = Uuid, Path, description = "Couple id")),
    responses((status = 200, body = [Booking]))
)]
pub async fn bookings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Booking>>> {
    let bookings = state.service_context.booking_service.list_for_couple(id).await?;
    Ok(Json(bookings))
}

#[utoipa::path(
    put, path = "/api/couples/{id}/subscription", tag = "Couples",
    params(("id" = Uuid, Path, description = "Couple id")),
    request_body = LinkSubscriptionRequest,
    responses((status = 200, body = CoupleSubscription))
)]
pub async fn link_subscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<LinkSubscriptionRequest>,
) -> Result<Json<CoupleSubscription>> {
    let subscription = state.service_context.subscription_service
        .link_customer(id, request)
        .await?;
    Ok(Json(subscription))
}
