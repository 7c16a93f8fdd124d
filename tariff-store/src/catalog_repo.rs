use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use std::collections::HashMap;
use tariff_catalog::{Country, Discount, Product};
use tariff_core::{CoreError, CoreResult, ProductCatalog};

pub struct StoreProductCatalog {
    pool: PgPool,
}

impl StoreProductCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: String,
    pub name: String,
    pub base_price: f64,
    pub country: String,
}

#[derive(sqlx::FromRow)]
pub(crate) struct DiscountRow {
    pub product_id: String,
    pub discount_id: String,
    pub percent: f64,
}

impl ProductRow {
    pub fn into_product(self, discounts: Vec<Discount>) -> CoreResult<Product> {
        // The column is constrained to supported countries, so this only fails on a schema drift
        let country: Country = self.country.parse().map_err(CoreError::storage)?;
        Ok(Product {
            id: self.id,
            name: self.name,
            base_price: self.base_price,
            country,
            discounts,
        })
    }
}

impl From<DiscountRow> for Discount {
    fn from(row: DiscountRow) -> Self {
        Discount {
            discount_id: row.discount_id,
            percent: row.percent,
        }
    }
}

pub(crate) const PRODUCT_COLUMNS: &str = "id, name, base_price, country";

/// Discounts of one product in insertion order.
pub(crate) async fn fetch_discounts<'e, E>(
    executor: E,
    product_id: &str,
) -> Result<Vec<Discount>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let rows: Vec<DiscountRow> = sqlx::query_as(
        "SELECT product_id, discount_id, percent FROM discounts WHERE product_id = $1 ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Discount::from).collect())
}

#[async_trait]
impl ProductCatalog for StoreProductCatalog {
    async fn list_by_country(&self, country: Country) -> CoreResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE country = $1 ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .bind(country.name())
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::storage)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // One round trip for the discounts of every listed product
        let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
        let discount_rows: Vec<DiscountRow> = sqlx::query_as(
            "SELECT product_id, discount_id, percent FROM discounts WHERE product_id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::storage)?;

        let mut by_product: HashMap<String, Vec<Discount>> = HashMap::new();
        for row in discount_rows {
            by_product
                .entry(row.product_id.clone())
                .or_default()
                .push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let discounts = by_product.remove(&row.id).unwrap_or_default();
                row.into_product(discounts)
            })
            .collect()
    }

    async fn get_product(&self, id: &str) -> CoreResult<Product> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::storage)?;

        let row = row.ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        let discounts = fetch_discounts(&self.pool, id)
            .await
            .map_err(CoreError::storage)?;

        row.into_product(discounts)
    }
}
