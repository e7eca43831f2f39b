use utoipa::OpenApi;

use crate::{
    api::handlers::{bookings, couples, gallery, payouts, root, vendors},
    domain::{
        AccessReason, Booking, ConnectAccountRequest, Couple, CoupleSubscription,
        CreateBookingRequest, CreateCoupleRequest, CreateVendorRequest, FileUpload,
        GalleryAccess, LinkSubscriptionRequest, Payment, PaymentModel, PaymentSplit,
        PaymentStatus, PayoutReceipt, PayoutRequest, PayoutType, SubscriptionStatus, Vendor,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        root::health_check,
        couples::create,
        couples::bookings,
        couples::link_subscription,
        vendors::create,
        vendors::get,
        vendors::connect_account,
        vendors::bookings,
        bookings::create,
        bookings::quote,
        bookings::get,
        bookings::payments,
        payouts::create,
        gallery::upload,
        gallery::list,
        gallery::access,
        gallery::download,
    ),
    components(schemas(
        AccessReason,
        Booking,
        ConnectAccountRequest,
        Couple,
        CoupleSubscription,
        CreateBookingRequest,
        CreateCoupleRequest,
        CreateVendorRequest,
        FileUpload,
        GalleryAccess,
        LinkSubscriptionRequest,
        Payment,
        PaymentModel,
        PaymentSplit,
        PaymentStatus,
        PayoutReceipt,
        PayoutRequest,
        PayoutType,
        SubscriptionStatus,
        Vendor,
    )),
    tags(
        (name = "Bookings", description = "Booking confirmation and payment splits"),
        (name = "Payouts", description = "Vendor payouts"),
        (name = "Gallery", description = "Delivered media and access"),
        (name = "Couples"),
        (name = "Vendors"),
        (name = "Health"),
    )
)]
pub struct ApiDoc;
