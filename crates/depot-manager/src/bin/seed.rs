//! # Seed Data Generator
//!
//! Populates an empty inventory with demo warehouses for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./default_database (or $DEPOT_DB_PATH)
//! cargo run -p depot-manager --bin seed
//!
//! # Specify database path
//! cargo run -p depot-manager --bin seed -- --db ./data/depot.db
//! ```
//!
//! ## Generated Data
//! - `Main_Warehouse` with a handful of hardware items
//! - `Overflow_Lot`, created as a copy of the first (same items, quantity 0)

use std::env;

use depot_manager::telemetry::init_tracing;
use depot_manager::{InventoryManager, ManagerConfig, Outcome, Session};

/// Demo items: (name, quantity, other)
const ITEMS: &[(&str, &str, &str)] = &[
    ("Hex Bolt", "120", "M8 x 40, zinc"),
    ("Lock Nut", "300", "M8 nylon insert"),
    ("Washer", "450", ""),
    ("Hinge", "24", "Stainless, 90 mm"),
    ("Pallet", "8", "Euro 1200 x 800"),
    ("Tie Strap", "-5", "Backordered"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut config = ManagerConfig::load()?;

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Depot Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $DEPOT_DB_PATH or ./default_database)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Depot Seed Data Generator");
    println!("=========================");
    println!("Database: {}", config.database_path.display());
    println!();

    let manager = InventoryManager::open(&config).await?;
    println!("✓ Connected to database");

    let existing = manager.list_warehouses().await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} warehouses", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut session = Session::new();

    expect_applied(manager.create_warehouse(&mut session, "Main Warehouse", false).await?)?;
    for (name, quantity, other) in ITEMS {
        expect_applied(manager.add_item(&mut session, name, quantity, other).await?)?;
    }
    println!("✓ Created Main_Warehouse with {} items", ITEMS.len());

    expect_applied(manager.create_warehouse(&mut session, "Overflow Lot", true).await?)?;
    println!("✓ Created Overflow_Lot (copy, all quantities 0)");

    let snapshot = manager.get_snapshot(&mut session).await?;
    println!();
    println!("Warehouses: {:?}", snapshot.known_warehouses);
    println!("✓ Seed complete!");

    Ok(())
}

fn expect_applied(outcome: Outcome) -> Result<(), Box<dyn std::error::Error>> {
    match outcome.rejection() {
        Some(rejection) => Err(rejection.message().into()),
        None => Ok(()),
    }
}
