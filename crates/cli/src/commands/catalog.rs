//! Catalog listing commands.

use std::io::{self, Write};

use herreria_core::{Category, FeaturedProduct, Product};
use tracing::info;

use super::open_catalog;
use crate::error::CliError;

/// Print the products of `category`, newest first.
///
/// An empty listing can also mean the store could not be read; the site logs
/// say which.
///
/// # Errors
///
/// Returns an error if the store cannot be configured or stdout fails.
pub async fn list_products(category: Category) -> Result<(), CliError> {
    let catalog = open_catalog()?;
    let products = catalog.list_by_category(category).await;
    info!(category = %category, count = products.len(), "Listed products");

    let mut stdout = io::stdout().lock();
    for product in &products {
        writeln!(stdout, "{}", product_line(product))?;
    }
    Ok(())
}

/// Print featured products in display order.
///
/// # Errors
///
/// Returns an error if the store cannot be configured or stdout fails.
pub async fn list_featured() -> Result<(), CliError> {
    let catalog = open_catalog()?;
    let featured = catalog.list_featured().await;
    info!(count = featured.len(), "Listed featured products");

    let mut stdout = io::stdout().lock();
    for product in &featured {
        writeln!(stdout, "{}", featured_line(product))?;
    }
    Ok(())
}

fn product_line(product: &Product) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        product.id,
        product.created_at.format("%Y-%m-%d %H:%M"),
        product.subcategory,
        product.name,
        product.price.as_deref().unwrap_or("-"),
    )
}

fn featured_line(product: &FeaturedProduct) -> String {
    format!(
        "{:>4}\t{}\t{}\t{}\t{}",
        product.order,
        product.id,
        product.category.slug(),
        product.name,
        product.price.as_deref().unwrap_or("-"),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use herreria_core::{FeaturedProductId, ProductId};

    use super::*;

    #[test]
    fn test_product_line() {
        let product = Product {
            id: ProductId::new("p1"),
            name: "Reja colonial".to_string(),
            image: "https://img.example/reja.jpg".to_string(),
            category: Category::Rejas,
            subcategory: "Ventanas".to_string(),
            price: None,
            description: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        };
        assert_eq!(
            product_line(&product),
            "p1\t2024-05-01 09:30\tVentanas\tReja colonial\t-"
        );
    }

    #[test]
    fn test_featured_line() {
        let product = FeaturedProduct {
            id: FeaturedProductId::new("f1"),
            name: "Portón corredizo".to_string(),
            image: "https://img.example/porton.jpg".to_string(),
            category: Category::Portones,
            price: Some("$ 350.000".to_string()),
            description: None,
            order: 2,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        };
        assert_eq!(
            featured_line(&product),
            "   2\tf1\tportones\tPortón corredizo\t$ 350.000"
        );
    }
}
