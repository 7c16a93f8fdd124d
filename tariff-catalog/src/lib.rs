pub mod product;
pub mod pricing;
pub mod vat;

pub use product::{Discount, PricedProduct, Product};
pub use pricing::{final_price, total_discount_percent, MAX_TOTAL_DISCOUNT};
pub use vat::{vat_for, Country, VatError};
