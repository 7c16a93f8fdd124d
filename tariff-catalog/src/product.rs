use serde::{Deserialize, Serialize};

use crate::pricing::final_price;
use crate::vat::Country;

/// A discount recorded against a product.
///
/// `discount_id` is the caller's idempotency token; it is unique per product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub discount_id: String,
    pub percent: f64,
}

/// Core product structure, with the discounts currently recorded for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub base_price: f64,
    pub country: Country,
    pub discounts: Vec<Discount>,
}

/// Product view returned to clients. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricedProduct {
    pub id: String,
    pub name: String,
    pub base_price: f64,
    pub country: Country,
    pub discounts: Vec<Discount>,
    pub final_price: f64,
}

impl Product {
    pub fn has_discount(&self, discount_id: &str) -> bool {
        self.discounts.iter().any(|d| d.discount_id == discount_id)
    }

    /// Price the product with the VAT rate of its own country.
    pub fn priced(self) -> PricedProduct {
        let final_price = final_price(self.base_price, &self.discounts, self.country.vat_percent());
        PricedProduct {
            id: self.id,
            name: self.name,
            base_price: self.base_price,
            country: self.country,
            discounts: self.discounts,
            final_price,
        }
    }
}
