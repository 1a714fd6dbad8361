//! In-memory product collection.
//!
//! # Lifecycle
//!
//! 1. At startup the store is seeded with [`seed::sample_products`].
//! 2. The collection lives only in process memory, wrapped in an `Arc<RwLock<_>>`.
//! 3. Every operation holds the lock for one synchronous read or mutation and
//!    hands back owned clones, so no caller keeps a reference into the store.
//!
//! # Invariants
//!
//! - Every stored product has a unique `id`.
//! - Only validated payloads reach [`ProductStore::create`] and
//!   [`ProductStore::update_by_id`]; the store normalizes but does not validate.

pub mod seed;

use std::collections::BTreeMap;
use std::sync::Arc;

use common::protocol::{NewProduct, Product, ProductPatch, ProductStats};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors produced by the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No product carries the requested id.
    #[error("Product with ID {0} not found")]
    NotFound(Uuid),
}

/// Thread-safe, insertion-ordered collection of products.
///
/// Cloning is cheap and every clone shares the same collection.
#[derive(Clone, Debug, Default)]
pub struct ProductStore {
    inner: Arc<RwLock<Vec<Product>>>,
}

impl ProductStore {
    /// Create a store holding `products` in the given order.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(products)),
        }
    }

    /// Create a store holding the fixed sample set.
    pub fn seeded() -> Self {
        Self::with_products(seed::sample_products())
    }

    /// Number of stored products.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// All products in insertion order, optionally restricted to one category.
    ///
    /// The category comparison ignores case.
    pub async fn list(&self, category: Option<&str>) -> Vec<Product> {
        let products = self.inner.read().await;
        match category {
            Some(wanted) => {
                let wanted = wanted.to_lowercase();
                products
                    .iter()
                    .filter(|p| p.category.to_lowercase() == wanted)
                    .cloned()
                    .collect()
            }
            None => products.clone(),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<Product> {
        self.inner.read().await.iter().find(|p| p.id == id).cloned()
    }

    /// Products whose name contains `term`, ignoring case.
    ///
    /// Callers must reject an empty term; here it matches everything.
    pub async fn search(&self, term: &str) -> Vec<Product> {
        let term = term.to_lowercase();
        self.inner
            .read()
            .await
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&term))
            .cloned()
            .collect()
    }

    /// Aggregate counts and mean price over the whole collection.
    pub async fn stats(&self) -> ProductStats {
        let products = self.inner.read().await;

        let mut category_stats = BTreeMap::new();
        for p in products.iter() {
            *category_stats.entry(p.category.clone()).or_insert(0) += 1;
        }

        let total_products = products.len();
        let in_stock_count = products.iter().filter(|p| p.in_stock).count();
        let average_price = (total_products > 0)
            .then(|| products.iter().map(|p| p.price).sum::<f64>() / total_products as f64);

        ProductStats {
            total_products,
            in_stock_count,
            out_of_stock_count: total_products - in_stock_count,
            category_stats,
            average_price,
        }
    }

    /// Normalize `fields`, assign a fresh id, and append the new product.
    pub async fn create(&self, fields: NewProduct) -> Product {
        let mut products = self.inner.write().await;

        let mut id = Uuid::new_v4();
        while products.iter().any(|p| p.id == id) {
            id = Uuid::new_v4();
        }

        let product = Product {
            id,
            name: normalize_text(&fields.name),
            description: normalize_text(&fields.description),
            price: fields.price,
            category: normalize_category(&fields.category),
            in_stock: fields.in_stock,
        };
        products.push(product.clone());
        product
    }

    /// Overwrite only the fields present in `patch`; the id never changes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no product has `id`.
    pub async fn update_by_id(&self, id: Uuid, patch: ProductPatch) -> Result<Product, StoreError> {
        let mut products = self.inner.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if let Some(name) = patch.name {
            product.name = normalize_text(&name);
        }
        if let Some(description) = patch.description {
            product.description = normalize_text(&description);
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(category) = patch.category {
            product.category = normalize_category(&category);
        }
        if let Some(in_stock) = patch.in_stock {
            product.in_stock = in_stock;
        }

        Ok(product.clone())
    }

    /// Remove and return the product with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no product has `id`.
    pub async fn delete_by_id(&self, id: Uuid) -> Result<Product, StoreError> {
        let mut products = self.inner.write().await;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(products.remove(index))
    }
}

fn normalize_text(s: &str) -> String {
    s.trim().to_owned()
}

fn normalize_category(s: &str) -> String {
    s.trim().to_lowercase()
}
