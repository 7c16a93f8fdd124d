use std::sync::Arc;
use tariff_store::DbClient;

use crate::service::ProductService;

#[derive(Clone)]
pub struct AppState {
    pub service: ProductService,
    /// `None` skips the database ping in `/health`; router tests run without a database
    pub db: Option<Arc<DbClient>>,
}
