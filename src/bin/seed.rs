use clap::Parser;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::FirstName;
use fake::Fake;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

use vowline::{
    analytics::{EventDispatcher, TracingSink},
    domain::{ConnectAccountRequest, CreateBookingRequest, CreateCoupleRequest, CreateVendorRequest},
    service::ServiceContext,
};

const SERVICE_TYPES: &[&str] = &["photography", "videography", "dj", "coordination"];

/// Fill a development database with couples, vendors and bookings.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// SQLite database URL
    #[arg(long, default_value = "sqlite://vowline.db?mode=rwc")]
    database_url: String,

    /// Number of couples to create
    #[arg(long, default_value_t = 5)]
    couples: usize,

    /// Number of vendors to create (one per service type, cycling)
    #[arg(long, default_value_t = 4)]
    vendors: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    println!("🌱 Starting database seeding...");

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let analytics = Arc::new(EventDispatcher::new(Arc::new(TracingSink)));
    let context = ServiceContext::new(db_pool.clone(), analytics.clone(), "uploads".to_string());

    println!("📸 Creating vendors...");
    let mut vendors = Vec::new();
    for i in 0..args.vendors {
        let service_type = SERVICE_TYPES[i % SERVICE_TYPES.len()];
        let business_name: String = CompanyName().fake();
        let vendor = context.account_service.create_vendor(CreateVendorRequest {
            business_name: format!("{} {}", business_name, service_type),
            email: SafeEmail().fake(),
            service_type: service_type.to_string(),
        }).await?;

        // Every other vendor has finished Connect onboarding
        let vendor = if i % 2 == 0 {
            context.account_service.connect_vendor_account(vendor.id, ConnectAccountRequest {
                stripe_account_id: format!("acct_seed{:04}", i),
            }).await?
        } else {
            vendor
        };
        vendors.push(vendor);
    }
    println!("  ✅ Created {} vendors", vendors.len());

    println!("💍 Creating couples and bookings...");
    let mut bookings = 0;
    for i in 0..args.couples {
        let partner_one: String = FirstName().fake();
        let partner_two: String = FirstName().fake();
        let couple = context.account_service.create_couple(CreateCoupleRequest {
            email: SafeEmail().fake(),
            partner_one_name: partner_one,
            partner_two_name: partner_two,
        }).await?;

        for vendor in vendors.iter().skip(i % 2).step_by(2) {
            // $1,500.00 to $4,999.99
            let total_amount: i64 = (150_000..500_000).fake();
            context.booking_service.create_booking(CreateBookingRequest {
                couple_id: couple.id,
                vendor_id: vendor.id,
                service_type: vendor.service_type.clone(),
                event_date: None,
                total_amount,
            }).await?;
            bookings += 1;
        }
    }
    println!("  ✅ Created {} couples with {} bookings", args.couples, bookings);

    analytics.teardown().await?;
    println!("🎉 Seeding complete!");
    Ok(())
}
