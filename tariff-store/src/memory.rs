//! In-process catalog and ledger used as a test double, behind the `memory` feature.
//!
//! The whole check-and-insert happens under one mutex, which plays the role of the unique
//! constraint. It only guards a single process, so the service binary always runs on the
//! PostgreSQL store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tariff_catalog::{Country, Discount, Product};
use tariff_core::validation::{validate_discount_id, validate_percent};
use tariff_core::{CoreError, CoreResult, DiscountLedger, ProductCatalog};

use crate::seed::SEED_PRODUCTS;

#[derive(Default)]
pub struct InMemoryStore {
    products: Mutex<HashMap<String, Product>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store loaded with the fixed starting catalog.
    pub fn seeded() -> Self {
        Self::with_products(SEED_PRODUCTS.iter().map(|p| p.to_product()))
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|product| (product.id.clone(), product))
            .collect();
        Self {
            products: Mutex::new(products),
        }
    }

    fn lock(&self) -> CoreResult<MutexGuard<'_, HashMap<String, Product>>> {
        self.products
            .lock()
            .map_err(|_| CoreError::storage("in-memory store mutex poisoned"))
    }
}

#[async_trait]
impl ProductCatalog for InMemoryStore {
    async fn list_by_country(&self, country: Country) -> CoreResult<Vec<Product>> {
        let products = self.lock()?;
        Ok(products
            .values()
            .filter(|product| product.country == country)
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: &str) -> CoreResult<Product> {
        self.lock()?
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl DiscountLedger for InMemoryStore {
    async fn apply_discount(
        &self,
        product_id: &str,
        discount_id: &str,
        percent: f64,
    ) -> CoreResult<Product> {
        validate_percent(percent)?;
        validate_discount_id(discount_id)?;

        let mut products = self.lock()?;
        let product = products
            .get_mut(product_id)
            .ok_or_else(|| CoreError::NotFound(product_id.to_string()))?;

        if !product.has_discount(discount_id) {
            product.discounts.push(Discount {
                discount_id: discount_id.to_string(),
                percent,
            });
        }

        Ok(product.clone())
    }
}
