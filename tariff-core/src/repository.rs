use async_trait::async_trait;
use tariff_catalog::{Country, Product};

use crate::CoreResult;

/// Read path over products and their recorded discounts.
///
/// Implementations take no locks; a read-committed view is enough.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Products sold in `country`, each with its discounts attached. Order is unspecified.
    async fn list_by_country(&self, country: Country) -> CoreResult<Vec<Product>>;

    /// Fails with `CoreError::NotFound` for an unknown id.
    async fn get_product(&self, id: &str) -> CoreResult<Product>;
}

/// Write path for discount facts.
#[async_trait]
pub trait DiscountLedger: Send + Sync {
    /// Record `(product_id, discount_id)` exactly once and return the product with its
    /// current discounts.
    ///
    /// A repeated `discount_id` is a successful no-op: the percent first recorded is kept and
    /// `percent` is discarded. Writes to the same product are serialized; writes to
    /// different products are independent.
    ///
    /// Fails with `CoreError::ValidationError` for a percent outside (0, 100) or a blank
    /// `discount_id`, before any storage access.
    async fn apply_discount(
        &self,
        product_id: &str,
        discount_id: &str,
        percent: f64,
    ) -> CoreResult<Product>;
}
