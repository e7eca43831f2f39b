use std::{sync::Arc, time::Duration};
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vowline::{
    analytics::{EventDispatcher, TracingSink},
    api,
    config::Settings,
    email::{EmailSender, SmtpEmailSender},
    payments::{StripeClient, TransferGateway},
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vowline=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting Vowline server on {}:{}", settings.server.host, settings.server.port);

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    // One analytics session per server process
    let analytics = Arc::new(EventDispatcher::new(Arc::new(TracingSink)));

    let mut service_context = ServiceContext::new(
        db_pool.clone(),
        analytics.clone(),
        settings.server.uploads_dir.clone(),
    );

    let mailer: Option<Arc<dyn EmailSender>> = match &settings.email {
        Some(email_config) => match SmtpEmailSender::new(email_config) {
            Ok(sender) => {
                tracing::info!("Payout e-mails enabled via {}", email_config.smtp_host);
                Some(Arc::new(sender))
            }
            Err(e) => {
                tracing::warn!("E-mail disabled: {}", e);
                None
            }
        },
        None => None,
    };

    // Initialize Stripe client if configured
    let stripe_client = if settings.stripe.enabled {
        if let (Some(api_key), Some(webhook_secret)) = (
            settings.stripe.secret_key.clone(),
            settings.stripe.webhook_secret.clone(),
        ) {
            tracing::info!("Stripe payouts and billing webhooks enabled");
            Some(Arc::new(StripeClient::new(
                api_key,
                webhook_secret,
                service_context.subscription_service.clone(),
            )))
        } else {
            tracing::warn!("Stripe enabled but missing configuration");
            None
        }
    } else {
        tracing::info!("Stripe disabled; payouts unavailable");
        None
    };

    if let Some(client) = &stripe_client {
        let gateway: Arc<dyn TransferGateway> = client.clone();
        service_context = service_context.with_payouts(gateway, mailer);
    }

    // Periodic analytics flush
    let flush_interval = Duration::from_secs(settings.analytics.flush_interval_secs.max(1));
    let flusher = {
        let analytics = analytics.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(flush_interval);
            loop {
                ticker.tick().await;
                if let Err(e) = analytics.flush().await {
                    tracing::warn!("Analytics flush failed: {}", e);
                }
            }
        })
    };

    let app = api::create_app(
        Arc::new(service_context),
        stripe_client,
        Arc::new(settings.clone()),
    );

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on http://{}:{}", settings.server.host, settings.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    flusher.abort();
    match analytics.teardown().await {
        Ok(flushed) => tracing::info!("Analytics session closed, {} events flushed", flushed),
        Err(e) => tracing::warn!("Analytics teardown failed: {}", e),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
