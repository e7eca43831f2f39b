mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use vowline::{api::create_app, config::Settings, service::ServiceContext};

fn app(context: ServiceContext) -> Router {
    create_app(Arc::new(context), None, Arc::new(Settings::default()))
}

async fn send(app: &Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() -> anyhow::Result<()> {
    let app = app(common::test_context(common::test_pool().await?));

    let (status, body) = send(&app, get("/health")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    Ok(())
}

#[tokio::test]
async fn test_quote_rounds_deposit_up() -> anyhow::Result<()> {
    let app = app(common::test_context(common::test_pool().await?));

    let (status, body) = send(&app, get("/api/bookings/quote?total_amount=2501")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deposit_amount"], 1251);
    assert_eq!(body["final_amount"], 1250);
    assert_eq!(body["platform_fee"], 15_000);

    let (status, body) = send(&app, get("/api/bookings/quote?total_amount=-5")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_booking_lifecycle_over_http() -> anyhow::Result<()> {
    let app = app(common::test_context(common::test_pool().await?));

    let (status, couple) = send(&app, post_json("/api/couples", json!({
        "email": "ana.sam@example.com",
        "partner_one_name": "Ana",
        "partner_two_name": "Sam"
    }))).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, vendor) = send(&app, post_json("/api/vendors", json!({
        "business_name": "Spin Doctors DJ",
        "email": "book@spindoctors.example.com",
        "service_type": "dj"
    }))).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, booking) = send(&app, post_json("/api/bookings", json!({
        "couple_id": couple["id"],
        "vendor_id": vendor["id"],
        "service_type": "dj",
        "event_date": "2027-06-12",
        "total_amount": 250000
    }))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["payment_model"], "legacy");
    assert_eq!(booking["vendor_final_share"], 125_000);
    assert_eq!(booking["platform_deposit_share"], 125_000);

    let uri = format!("/api/bookings/{}", booking["id"].as_str().unwrap());
    let (status, fetched) = send(&app, get(&uri)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["total_amount"], 250_000);

    let uri = format!("/api/couples/{}/bookings", couple["id"].as_str().unwrap());
    let (status, listed) = send(&app, get(&uri)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let uri = format!("/api/bookings/{}/payments", booking["id"].as_str().unwrap());
    let (status, payments) = send(&app, get(&uri)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payments, json!([]));

    Ok(())
}

#[tokio::test]
async fn test_unknown_booking_is_404() -> anyhow::Result<()> {
    let app = app(common::test_context(common::test_pool().await?));

    let uri = format!("/api/bookings/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, get(&uri)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Booking not found");

    Ok(())
}

#[tokio::test]
async fn test_payouts_unavailable_without_gateway() -> anyhow::Result<()> {
    let app = app(common::test_context(common::test_pool().await?));

    let (status, _) = send(&app, post_json("/api/payouts", json!({
        "booking_id": uuid::Uuid::new_v4(),
        "payout_type": "final"
    }))).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}

#[tokio::test]
async fn test_payout_over_http() -> anyhow::Result<()> {
    let gateway = Arc::new(common::FakeTransferGateway::default());
    let context = common::test_context(common::test_pool().await?);
    let couple = common::create_couple(&context).await?;
    let vendor = common::create_vendor(&context, true).await?;
    let booking = common::create_booking(&context, &couple, &vendor, 60_000).await?;
    let app = app(context.with_payouts(gateway, None));

    let (status, _) = send(&app, post_json("/api/payouts", json!({
        "booking_id": booking.id,
        "payout_type": "refund"
    }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, post_json("/api/payouts", json!({
        "booking_id": booking.id,
        "payout_type": "deposit"
    }))).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, receipt) = send(&app, post_json("/api/payouts", json!({
        "booking_id": booking.id,
        "payout_type": "final_with_tip",
        "tip_amount": 2500
    }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["transfer_amount"], 32_500);
    assert_eq!(receipt["payment"]["tip"], 2_500);
    assert_eq!(receipt["payment"]["amount"], 30_000);

    Ok(())
}

#[tokio::test]
async fn test_gallery_access_for_new_couple() -> anyhow::Result<()> {
    let context = common::test_context(common::test_pool().await?);
    let couple = common::create_couple(&context).await?;
    let app = app(context);

    let uri = format!("/api/gallery/{}/access", couple.id);
    let (status, access) = send(&app, get(&uri)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(access["active"], true);
    assert_eq!(access["reason"], "free_period");

    Ok(())
}

#[tokio::test]
async fn test_truncated_upload_is_rejected() -> anyhow::Result<()> {
    let context = common::test_context(common::test_pool().await?);
    let couple = common::create_couple(&context).await?;
    let app = app(context);

    // Unknown field whose body never reaches the closing boundary
    let body = "--XBOUNDARY\r\n\
                Content-Disposition: form-data; name=\"caption\"\r\n\r\n\
                our first dance";
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/gallery/{}/files", couple.id))
        .header("content-type", "multipart/form-data; boundary=XBOUNDARY")
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    Ok(())
}
