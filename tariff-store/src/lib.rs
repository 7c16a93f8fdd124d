pub mod app_config;
pub mod database;
pub mod catalog_repo;
pub mod discount_repo;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod seed;

pub use database::DbClient;
pub use catalog_repo::StoreProductCatalog;
pub use discount_repo::StoreDiscountLedger;
#[cfg(any(test, feature = "memory"))]
pub use memory::InMemoryStore;
