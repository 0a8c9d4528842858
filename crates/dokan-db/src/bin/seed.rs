//! # Seed Data Generator
//!
//! Loads demo products and discount codes for local development.
//!
//! ## Usage
//! ```bash
//! cargo run -p dokan-db --bin seed
//!
//! # Specify database path
//! cargo run -p dokan-db --bin seed -- --db ./data/dokan.db
//! ```
//!
//! ## Generated Data
//! - Products across a few clothing and handicraft lines, every fourth on sale
//! - Discount codes covering each admin-visible status:
//!   `WELCOME10` (active, all products), `EID25` (active, restricted),
//!   `FLASH50` (exhausted after one use), `NEWYEAR` (expired),
//!   `PUJA15` (upcoming), `PAUSED5` (inactive)

use chrono::{Duration, Utc};
use dokan_core::{NewDiscountCode, ProductPrice, ProductStatus};
use dokan_db::{Database, DbConfig};
use std::env;

/// (id, name, regular price in taka)
const PRODUCTS: &[(&str, &str, i64)] = &[
    ("panjabi-cotton", "Cotton Panjabi", 1_450),
    ("panjabi-silk", "Silk Panjabi", 3_200),
    ("saree-jamdani", "Jamdani Saree", 8_500),
    ("saree-tant", "Tant Saree", 1_900),
    ("kurti-printed", "Printed Kurti", 950),
    ("lungi-check", "Check Lungi", 480),
    ("gamchha", "Handloom Gamchha", 220),
    ("nakshi-kantha", "Nakshi Kantha", 4_200),
    ("shital-pati", "Shital Pati Mat", 1_650),
    ("jute-bag", "Jute Tote Bag", 350),
    ("terracotta-set", "Terracotta Tea Set", 1_250),
    ("brass-lamp", "Brass Pradip", 780),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./dokan_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Dokan Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./dokan_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Dokan Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Loading products...");
    for (idx, (id, name, taka)) in PRODUCTS.iter().enumerate() {
        let on_sale = idx % 4 == 0;
        let price = ProductPrice {
            product_id: id.to_string(),
            name: name.to_string(),
            regular_price_poisha: taka * 100,
            // 15% off, rounded down to a whole taka
            sale_price_poisha: on_sale.then(|| (taka * 85 / 100) * 100),
            status: if on_sale {
                ProductStatus::Sale
            } else {
                ProductStatus::Regular
            },
        };

        if let Err(e) = db.products().upsert(&price).await {
            eprintln!("Failed to insert {}: {}", id, e);
            continue;
        }
        println!("  {:<16} {}", id, price.effective_price());
    }

    println!();
    println!("Loading discount codes...");
    let now = Utc::now();
    let codes = [
        demo_code("WELCOME10", "Welcome offer", 10, 1_000, now - Duration::days(7), now + Duration::days(90), &[], true),
        demo_code("EID25", "Eid collection", 25, 200, now - Duration::days(1), now + Duration::days(14), &["panjabi-cotton", "panjabi-silk", "saree-jamdani"], true),
        demo_code("FLASH50", "Flash sale", 50, 1, now - Duration::days(1), now + Duration::days(1), &[], true),
        demo_code("NEWYEAR", "Pohela Boishakh", 20, 500, now - Duration::days(60), now - Duration::days(30), &[], true),
        demo_code("PUJA15", "Puja special", 15, 300, now + Duration::days(20), now + Duration::days(40), &[], true),
        demo_code("PAUSED5", "Paused promo", 5, 100, now - Duration::days(1), now + Duration::days(30), &[], false),
    ];

    for new in &codes {
        match db.discounts().create(new).await {
            Ok(created) => println!("  {:<10} {:>3}% {:?}", created.code, created.percentage_off, created.status(now)),
            Err(e) => eprintln!("Failed to insert {}: {}", new.code, e),
        }
    }

    // Use up FLASH50 so the exhausted state is visible
    if let Some(flash) = db.discounts().find_by_code("FLASH50").await? {
        db.discounts().increment_usage(&flash.id).await?;
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn demo_code(
    code: &str,
    name: &str,
    percentage_off: u8,
    max_usage_count: i64,
    start_date: chrono::DateTime<Utc>,
    end_date: chrono::DateTime<Utc>,
    products: &[&str],
    is_active: bool,
) -> NewDiscountCode {
    NewDiscountCode {
        code: code.to_string(),
        name: name.to_string(),
        percentage_off,
        max_usage_count,
        start_date,
        end_date,
        applicable_product_ids: products.iter().map(|p| p.to_string()).collect(),
        is_active,
    }
}
