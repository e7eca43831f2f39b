use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Booking, ConnectAccountRequest, CreateVendorRequest, Vendor},
    error::Result,
};

#[utoipa::path(
    post, path = "/api/vendors", tag = "Vendors",
    request_body = CreateVendorRequest,
    responses((status = 201, body = Vendor))
)]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateVendorRequest>,
) -> Result<(StatusCode, Json<Vendor>)> {
    let vendor = state.service_context.account_service.create_vendor(request).await?;
    Ok((StatusCode::CREATED, Json(vendor)))
}

#[utoipa::path(
    get, path = "/api/vendors/{id}", tag = "Vendors",
    params(("id" = Uuid, Path, description = "Vendor id")),
    responses((status = 200, body = Vendor), (status = 404, description = "Vendor not found"))
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vendor>> {
    let vendor = state.service_context.account_service.get_vendor(id).await?;
    Ok(Json(vendor))
}

#[utoipa::path(
    put, path = "/api/vendors/{id}/connected-account", tag = "Vendors",
    params(("id" = Uuid, Path, description = "Vendor id")),
    request_body = ConnectAccountRequest,
    responses((status = 200, body = Vendor))
)]
pub async fn connect_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ConnectAccountRequest>,
) -> Result<Json<Vendor>> {
    let vendor = state.service_context.account_service
        .connect_vendor_account(id, request)
        .await?;
    Ok(Json(vendor))
}

#[utoipa::path(
    get, path = "/api/vendors/{id}/bookings", tag = "Vendors",
    params(("id" = Uuid, Path, description = "Vendor id")),
    responses((status = 200, body = [Booking]))
)]
pub async fn bookings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Booking>>> {
    let bookings = state.service_context.booking_service.list_for_vendor(id).await?;
    Ok(Json(bookings))
}
