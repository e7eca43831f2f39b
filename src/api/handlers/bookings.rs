use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Booking, CreateBookingRequest, Payment, PaymentSplit, QuoteQuery},
    error::Result,
};

#[utoipa::path(
    post, path = "/api/bookings", tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, body = Booking),
        (status = 400, description = "Negative total amount"),
        (status = 404, description = "Couple or vendor not found")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>)> {
    let booking = state.service_context.booking_service.create_booking(request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[utoipa::path(
    get, path = "/api/bookings/quote", tag = "Bookings",
    params(QuoteQuery),
    responses((status = 200, body = PaymentSplit))
)]
pub async fn quote(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<PaymentSplit>> {
    let split = state.service_context.booking_service.quote(query.total_amount)?;
    Ok(Json(split))
}

#[utoipa::path(
    get, path = "/api/bookings/{id}", tag = "Bookings",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses((status = 200, body = Booking), (status = 404, description = "Booking not found"))
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>> {
    let booking = state.service_context.booking_service.get_booking(id).await?;
    Ok(Json(booking))
}

#[utoipa::path(
    get, path = "/api/bookings/{id}/payments", tag = "Bookings",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses((status = 200, body = [Payment]))
)]
pub async fn payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>> {
    let payments = state.service_context.payment_repo.list_by_booking(id).await?;
    Ok(Json(payments))
}
