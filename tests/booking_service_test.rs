mod common;

use vowline::{
    domain::{CreateBookingRequest, PaymentModel},
    error::AppError,
};
use uuid::Uuid;

#[tokio::test]
async fn test_booking_stores_legacy_split() -> anyhow::Result<()> {
    let context = common::test_context(common::test_pool().await?);
    let couple = common::create_couple(&context).await?;
    let vendor = common::create_vendor(&context, false).await?;

    let booking = common::create_booking(&context, &couple, &vendor, 250_000).await?;
    assert_eq!(booking.payment_model, PaymentModel::Legacy);
    assert_eq!(booking.split.deposit_amount, 125_000);
    assert_eq!(booking.split.final_amount, 125_000);
    assert_eq!(booking.split.vendor_deposit_share, 0);
    assert_eq!(booking.split.vendor_final_share, 125_000);
    assert_eq!(booking.split.platform_total_earnings, 140_000);
    assert_eq!(booking.tip_amount, 0);

    // Round-trips through storage unchanged
    let stored = context.booking_service.get_booking(booking.id).await?;
    assert_eq!(stored.split, booking.split);

    let for_couple = context.booking_service.list_for_couple(couple.id).await?;
    assert_eq!(for_couple.len(), 1);
    let for_vendor = context.booking_service.list_for_vendor(vendor.id).await?;
    assert_eq!(for_vendor[0].id, booking.id);

    Ok(())
}

#[tokio::test]
async fn test_odd_cent_booking_balances() -> anyhow::Result<()> {
    let context = common::test_context(common::test_pool().await?);
    let couple = common::create_couple(&context).await?;
    let vendor = common::create_vendor(&context, false).await?;

    let booking = common::create_booking(&context, &couple, &vendor, 100_001).await?;
    assert_eq!(booking.split.deposit_amount + booking.split.final_amount, 100_001);
    assert_eq!(booking.split.shares_total(), 100_001);

    Ok(())
}

#[tokio::test]
async fn test_negative_total_is_rejected() -> anyhow::Result<()> {
    let context = common::test_context(common::test_pool().await?);
    let couple = common::create_couple(&context).await?;
    let vendor = common::create_vendor(&context, false).await?;

    let result = context.booking_service.create_booking(CreateBookingRequest {
        couple_id: couple.id,
        vendor_id: vendor.id,
        service_type: "dj".to_string(),
        event_date: None,
        total_amount: -100,
    }).await;
    assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    assert!(context.booking_service.list_for_couple(couple.id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_unknown_vendor_is_rejected() -> anyhow::Result<()> {
    let context = common::test_context(common::test_pool().await?);
    let couple = common::create_couple(&context).await?;

    let result = context.booking_service.create_booking(CreateBookingRequest {
        couple_id: couple.id,
        vendor_id: Uuid::new_v4(),
        service_type: "dj".to_string(),
        event_date: None,
        total_amount: 10_000,
    }).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
