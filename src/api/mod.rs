pub mod doc;
pub mod handlers;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    Router,
    routing::{get, post, put},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Settings,
    gallery::storage::MAX_FILE_SIZE,
    payments::StripeClient,
    service::ServiceContext,
};
use doc::ApiDoc;
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    stripe_client: Option<Arc<StripeClient>>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, stripe_client, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // API routes
        .nest("/api", api_routes())
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/couples", couple_routes())
        .nest("/vendors", vendor_routes())
        .nest("/bookings", booking_routes())
        .nest("/payouts", payout_routes())
        .nest("/gallery", gallery_routes())
        .nest("/payments", payment_routes())
}

fn couple_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::couples::create))
        .route("/:id/bookings", get(handlers::couples::bookings))
        .route("/:id/subscription", put(handlers::couples::link_subscription))
}

fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::vendors::create))
        .route("/:id", get(handlers::vendors::get))
        .route("/:id/connected-account", put(handlers::vendors::connect_account))
        .route("/:id/bookings", get(handlers::vendors::bookings))
}

fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::bookings::create))
        .route("/quote", get(handlers::bookings::quote))
        .route("/:id", get(handlers::bookings::get))
        .route("/:id/payments", get(handlers::bookings::payments))
}

fn payout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::payouts::create))
}

fn gallery_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:couple_id/files",
            post(handlers::gallery::upload)
                .layer(DefaultBodyLimit::max(MAX_FILE_SIZE))
                .get(handlers::gallery::list),
        )
        .route("/:couple_id/access", get(handlers::gallery::access))
        .route("/:couple_id/files/:file_id/download", get(handlers::gallery::download))
}

fn payment_routes() -> Router<AppState> {
    // Public webhook endpoint, verified by signature
    Router::new()
        .route("/webhook/stripe", post(handlers::payments::stripe_webhook))
}
