//! Seeds a development database with a starter price matrix, a small
//! stationery catalog, and a walk-in customer.
//!
//! ```text
//! cargo run --bin seed -- [path/to/copypoint.db]
//! ```
//!
//! Safe to re-run: products are skipped when their SKU already exists
//! and matrix prices are upserted.

use chrono::Utc;
use tracing::{info, warn};

use copypoint_core::{
    ColorMode, Customer, PaperSize, PaperType, PriceRequest, Product, ProductKind, Sidedness,
    VatCondition,
};
use copypoint_db::{Database, DbConfig, DbError};

/// Starter matrix: plain-paper combinations priced, specialty stock
/// left for the operator to configure.
const MATRIX_SEED: &[(PaperSize, PaperType, ColorMode, Sidedness, i64)] = &[
    (PaperSize::A4, PaperType::Plain80g, ColorMode::Mono, Sidedness::Simplex, 50),
    (PaperSize::A4, PaperType::Plain80g, ColorMode::Mono, Sidedness::Duplex, 90),
    (PaperSize::A4, PaperType::Plain80g, ColorMode::Color, Sidedness::Simplex, 200),
    (PaperSize::A4, PaperType::Plain80g, ColorMode::Color, Sidedness::Duplex, 380),
    (PaperSize::A3, PaperType::Plain80g, ColorMode::Mono, Sidedness::Simplex, 100),
    (PaperSize::A3, PaperType::Plain80g, ColorMode::Color, Sidedness::Simplex, 400),
    (PaperSize::Oficio, PaperType::Plain80g, ColorMode::Mono, Sidedness::Simplex, 60),
];

const PRODUCT_SEED: &[(&str, &str, i64, i64)] = &[
    ("NB-A5", "Notebook A5 rayado", 1000, 24),
    ("NB-A4", "Notebook A4 cuadriculado", 1500, 18),
    ("PEN-BLK", "Boligrafo negro", 200, 120),
    ("PEN-BLU", "Boligrafo azul", 200, 120),
    ("RESMA-A4", "Resma A4 80g x500", 4500, 10),
    ("FOLDER-A4", "Carpeta A4 3 solapas", 800, 30),
];

#[tokio::main]
async fn main() -> Result<(), DbError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "copypoint.db".to_string());
    info!(path, "Seeding development database");

    let db = Database::new(DbConfig::new(&path)).await?;

    seed_matrix(&db).await?;
    seed_products(&db).await?;
    seed_customer(&db).await?;

    info!("Seed complete");
    db.close().await;
    Ok(())
}

async fn seed_matrix(db: &Database) -> Result<(), DbError> {
    let matrix = db.price_matrix();
    for &(size, paper, color, sidedness, price_cents) in MATRIX_SEED {
        let request = PriceRequest::new(size, paper, color, sidedness);
        matrix.set_price(&request, price_cents).await?;
    }
    info!(entries = MATRIX_SEED.len(), "Price matrix seeded");
    Ok(())
}

async fn seed_products(db: &Database) -> Result<(), DbError> {
    let products = db.products();
    let mut inserted = 0;

    for &(sku, name, base_cost_cents, stock) in PRODUCT_SEED {
        if products.find_by_code(sku).await?.is_some() {
            continue;
        }
        products
            .insert(Product {
                id: 0,
                category_id: None,
                barcode: None,
                sku: sku.to_string(),
                name: name.to_string(),
                kind: ProductKind::Physical,
                base_cost_cents,
                stock,
                is_active: true,
            })
            .await?;
        inserted += 1;
    }

    if inserted == 0 {
        warn!("No products inserted, catalog already seeded");
    } else {
        info!(inserted, "Products seeded");
    }
    Ok(())
}

async fn seed_customer(db: &Database) -> Result<(), DbError> {
    let customers = db.customers();
    if !customers.list().await?.is_empty() {
        return Ok(());
    }

    customers
        .insert(Customer {
            id: 0,
            legal_name: "Consumidor Final".to_string(),
            tax_id: None,
            vat_condition: VatCondition::FinalConsumer,
            email: None,
            address: None,
            created_at: Utc::now(),
        })
        .await?;

    info!("Walk-in customer seeded");
    Ok(())
}
