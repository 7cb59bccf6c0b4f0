//! # Seed Data Generator
//!
//! Populates a development database with a branch, a customer, a small
//! catalog and two roles.
//!
//! ## Usage
//! ```bash
//! cargo run -p caja-db --bin seed
//!
//! # Specify database path, disable VAT on the branch
//! cargo run -p caja-db --bin seed -- --db ./data/caja.db --no-vat
//! ```
//!
//! ## Generated Data
//! - Branch "Sucursal Centro" (VAT enabled unless `--no-vat`)
//! - Customer "Cliente de Mostrador"
//! - One product per catalog entry below
//! - Role "Administrador" holding every product-update permission, with user admin@caja.local
//! - Role "Cajero" holding none, with user cajero@caja.local

use std::env;

use caja_core::permission::{
    SystemPage, UPDATE_PRODUCT_COMMISSIONS, UPDATE_PRODUCT_PRICE, UPDATE_PRODUCT_PURCHASE_DATA,
    UPDATE_PRODUCT_STOCK,
};
use caja_core::NewProduct;
use caja_db::{Database, DbConfig};
use rust_decimal::Decimal;

/// (name, list price cents, purchase price cents, stock, user commission %)
const CATALOG: &[(&str, i64, i64, i64, i64)] = &[
    ("Café molido 500g", 650, 410, 40, 10),
    ("Azúcar 1kg", 125, 90, 120, 5),
    ("Arroz 2kg", 310, 220, 80, 5),
    ("Aceite vegetal 1L", 399, 280, 60, 8),
    ("Frijoles rojos 1kg", 215, 150, 90, 5),
    ("Leche entera 1L", 135, 98, 150, 4),
    ("Pan de caja", 275, 180, 35, 6),
    ("Huevos docena", 330, 240, 50, 5),
    ("Jabón de baño", 95, 55, 200, 12),
    ("Detergente 1kg", 450, 300, 45, 10),
];

const PRODUCT_PERMISSIONS: &[&str] = &[
    UPDATE_PRODUCT_PRICE,
    UPDATE_PRODUCT_COMMISSIONS,
    UPDATE_PRODUCT_PURCHASE_DATA,
    UPDATE_PRODUCT_STOCK,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./caja_dev.db");
    let mut vat_enabled = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--no-vat" => vat_enabled = false,
            "--help" | "-h" => {
                println!("Caja Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./caja_dev.db)");
                println!("      --no-vat       Seed the branch with VAT disabled");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Caja Seed Data Generator");
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

    let branch = db.branches().insert("Sucursal Centro", vat_enabled).await?;
    println!("✓ Branch #{} (VAT {})", branch.id, if vat_enabled { "on" } else { "off" });

    let customer = db
        .customers()
        .insert("Cliente de Mostrador", Some("mostrador@caja.local"), None)
        .await?;
    println!("✓ Customer #{}", customer.id);

    for (name, price, cost, stock, commission) in CATALOG {
        let product = NewProduct {
            branch_id: Some(branch.id),
            name: name.to_string(),
            list_price: Decimal::new(*price, 2),
            purchase_price: Some(Decimal::new(*cost, 2)),
            purchased_by: Some("Distribuidora Central".to_string()),
            stock: Decimal::from(*stock),
            user_commission_percent: Some(Decimal::from(*commission)),
            branch_commission_percent: Some(Decimal::from(100 - *commission)),
        };

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", name, e);
        }
    }
    println!("✓ {} products", db.products().count().await?);

    let admin = db.roles().insert_role("Administrador").await?;
    let cashier = db.roles().insert_role("Cajero").await?;
    for name in PRODUCT_PERMISSIONS {
        let permission = db.roles().insert_permission(SystemPage::Products, name).await?;
        db.roles().grant_permission(admin, permission).await?;
    }
    let admin_user = db
        .roles()
        .insert_user("Administrador", "admin@caja.local", admin)
        .await?;
    let cashier_user = db
        .roles()
        .insert_user("Cajero", "cajero@caja.local", cashier)
        .await?;
    println!("✓ Role #{} Administrador (user #{})", admin, admin_user);
    println!("✓ Role #{} Cajero (user #{})", cashier, cashier_user);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
