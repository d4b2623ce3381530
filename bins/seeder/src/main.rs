//! Database seeder for Kredit development and testing.
//!
//! Registers a demo consumer and assigns a limit for every tenor. Safe to
//! run repeatedly: existing rows are left alone.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDate;
use kredit_core::consumer::{EligibilityRules, NewConsumer};
use kredit_core::{CreditError, CreditService};
use kredit_shared::AppConfig;
use rust_decimal::Decimal;

/// NIK of the demo consumer.
const DEMO_NIK: &str = "1234567890123456";

/// Limits granted to the demo consumer, per tenor in months.
const DEMO_LIMITS: [(i64, i64); 4] = [(1, 100_000), (2, 200_000), (3, 500_000), (6, 700_000)];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = kredit_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let service = kredit_db::credit_service(&db, EligibilityRules::new(config.credit.minimum_income));

    println!("Seeding demo consumer...");
    let consumer = seed_demo_consumer(&service).await?;

    println!("Seeding credit limits...");
    seed_limits(&service, consumer).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_demo_consumer(
    service: &CreditService,
) -> anyhow::Result<kredit_shared::types::ConsumerId> {
    match service.get_consumer_by_nik(DEMO_NIK).await {
        Ok(existing) => {
            println!("  Demo consumer already exists, skipping...");
            return Ok(existing.id);
        }
        Err(CreditError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let consumer = service
        .register_consumer(NewConsumer {
            nik: DEMO_NIK.to_string(),
            full_name: "Budi Santoso".to_string(),
            legal_name: "Budi Santoso".to_string(),
            place_of_birth: Some("Jakarta".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17),
            salary: Decimal::from(8_500_000),
            ktp_photo: Some("ktp/1234567890123456.jpg".to_string()),
            selfie_photo: Some("selfie/1234567890123456.jpg".to_string()),
        })
        .await?;
    println!("  Created demo consumer #{}", consumer.id);
    Ok(consumer.id)
}

async fn seed_limits(
    service: &CreditService,
    consumer_id: kredit_shared::types::ConsumerId,
) -> anyhow::Result<()> {
    let mut inserted = 0;
    for (tenor, amount) in DEMO_LIMITS {
        match service
            .assign_limit(consumer_id, tenor, Decimal::from(amount))
            .await
        {
            Ok(_) => inserted += 1,
            Err(CreditError::Conflict(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    println!("  Inserted {inserted} credit limits");
    Ok(())
}
