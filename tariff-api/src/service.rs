use std::sync::Arc;
use tariff_catalog::{Country, PricedProduct};
use tariff_core::{CoreError, CoreResult, DiscountLedger, ProductCatalog};

/// Talks to the catalog and ledger, and prices what comes back.
/// Holds no state of its own.
#[derive(Clone)]
pub struct ProductService {
    catalog: Arc<dyn ProductCatalog>,
    ledger: Arc<dyn DiscountLedger>,
}

impl ProductService {
    pub fn new(catalog: Arc<dyn ProductCatalog>, ledger: Arc<dyn DiscountLedger>) -> Self {
        Self { catalog, ledger }
    }

    pub async fn products_for_country(&self, country: Option<&str>) -> CoreResult<Vec<PricedProduct>> {
        let country = country
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| CoreError::ValidationError("country query parameter is required".to_string()))?;

        // Unsupported countries never reach storage
        let country: Country = country.parse()?;

        let products = self.catalog.list_by_country(country).await?;
        Ok(products.into_iter().map(|p| p.priced()).collect())
    }

    pub async fn product(&self, id: &str) -> CoreResult<PricedProduct> {
        Ok(self.catalog.get_product(id).await?.priced())
    }

    pub async fn apply_discount(
        &self,
        product_id: &str,
        discount_id: &str,
        percent: f64,
    ) -> CoreResult<PricedProduct> {
        // Percent and discount id are checked by the ledger before it touches storage
        let product = self
            .ledger
            .apply_discount(product_id, discount_id, percent)
            .await?;
        Ok(product.priced())
    }
}
