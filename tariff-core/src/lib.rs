pub mod repository;
pub mod validation;

pub use repository::{DiscountLedger, ProductCatalog};

use tariff_catalog::VatError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Unsupported country: {0}")]
    UnsupportedCountry(String),
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Timed out waiting for the lock on product {0}")]
    LockTimeout(String),
    #[error("Storage failure: {0}")]
    StorageError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CoreError {
    pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        CoreError::StorageError(err.into())
    }
}

impl From<VatError> for CoreError {
    fn from(err: VatError) -> Self {
        match err {
            VatError::UnsupportedCountry(country) => CoreError::UnsupportedCountry(country),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
