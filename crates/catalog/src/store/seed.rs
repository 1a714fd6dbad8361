//! Sample products loaded at startup.

use common::protocol::Product;
use uuid::Uuid;

/// The fixed sample set, each record with a freshly generated id.
pub fn sample_products() -> Vec<Product> {
    [
        (
            "Laptop",
            "High-performance laptop with 16GB RAM and 512GB SSD",
            1299.99,
            "electronics",
            true,
        ),
        (
            "Smartphone",
            "Latest model smartphone with 128GB storage and 5G connectivity",
            899.99,
            "electronics",
            true,
        ),
        (
            "Coffee Maker",
            "Programmable coffee maker with built-in timer and auto-shutoff",
            79.99,
            "kitchen",
            false,
        ),
        (
            "Desk Chair",
            "Ergonomic office chair with lumbar support and adjustable height",
            249.99,
            "furniture",
            true,
        ),
        (
            "Headphones",
            "Wireless noise-cancelling headphones with 30-hour battery life",
            199.99,
            "electronics",
            true,
        ),
    ]
    .into_iter()
    .map(|(name, description, price, category, in_stock)| Product {
        id: Uuid::new_v4(),
        name: name.into(),
        description: description.into(),
        price,
        category: category.into(),
        in_stock,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let products = sample_products();
        let ids: HashSet<Uuid> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), products.len());
    }

    #[test]
    fn seed_passes_validation() {
        use crate::validate::{validate_product, Mode};
        for p in sample_products() {
            let value = serde_json::to_value(&p).unwrap();
            assert!(validate_product(&value, Mode::Full).is_empty(), "{}", p.name);
        }
    }
}
