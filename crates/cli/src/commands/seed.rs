//! Seed the database with sample catalog data.
//!
//! Intended for local development. Running it twice inserts the catalog
//! twice, so use a fresh database.

use rust_decimal::Decimal;
use thiserror::Error;

use boutique_storefront::db::products::{NewProduct, ProductRepository};

use super::CommandError;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Insert failed.
    #[error("database error: {0}")]
    Database(#[from] boutique_storefront::db::RepositoryError),
}

fn sample_catalog() -> Vec<NewProduct> {
    let clothing_sizes = || vec!["S".to_owned(), "M".to_owned(), "L".to_owned(), "XL".to_owned()];

    vec![
        NewProduct {
            name: "Linen Shirt".to_owned(),
            description: "A lightweight linen shirt for warm days.".to_owned(),
            category: "shirts".to_owned(),
            price: Decimal::new(4999, 2),
            sizes: clothing_sizes(),
            images: vec!["/uploads/linen-shirt.jpg".to_owned()],
            featured: true,
            in_stock: true,
        },
        NewProduct {
            name: "Denim Jacket".to_owned(),
            description: "Classic denim jacket with a relaxed fit.".to_owned(),
            category: "jackets".to_owned(),
            price: Decimal::new(12900, 2),
            sizes: clothing_sizes(),
            images: vec!["/uploads/denim-jacket.jpg".to_owned()],
            featured: true,
            in_stock: true,
        },
        NewProduct {
            name: "Wool Scarf".to_owned(),
            description: "Soft merino wool scarf, one size.".to_owned(),
            category: "accessories".to_owned(),
            price: Decimal::new(3450, 2),
            sizes: Vec::new(),
            images: vec!["/uploads/wool-scarf.jpg".to_owned()],
            featured: false,
            in_stock: true,
        },
        NewProduct {
            name: "Canvas Tote".to_owned(),
            description: "Everyday canvas tote bag.".to_owned(),
            category: "accessories".to_owned(),
            price: Decimal::new(1999, 2),
            sizes: Vec::new(),
            images: vec!["/uploads/canvas-tote.jpg".to_owned()],
            featured: false,
            in_stock: true,
        },
        NewProduct {
            name: "Chino Trousers".to_owned(),
            description: "Slim-fit chinos in stone beige.".to_owned(),
            category: "trousers".to_owned(),
            price: Decimal::new(7900, 2),
            sizes: clothing_sizes(),
            images: vec!["/uploads/chino-trousers.jpg".to_owned()],
            featured: false,
            in_stock: true,
        },
        NewProduct {
            name: "Rain Parka".to_owned(),
            description: "Waterproof shell parka, currently out of stock.".to_owned(),
            category: "jackets".to_owned(),
            price: Decimal::new(15900, 2),
            sizes: clothing_sizes(),
            images: vec!["/uploads/rain-parka.jpg".to_owned()],
            featured: false,
            in_stock: false,
        },
    ]
}

/// Insert the sample catalog.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    let pool = super::connect().await?;
    let products = ProductRepository::new(&pool);

    let catalog = sample_catalog();
    let count = catalog.len();

    for new in &catalog {
        let product = products.create(new).await?;
        tracing::info!("Seeded product: {} ({})", product.name, product.id);
    }

    tracing::info!("Seeding complete: {count} products");
    pool.close().await;
    Ok(())
}
