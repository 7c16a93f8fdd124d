//! PostgreSQL discount ledger.
//!
//! Each application runs in its own transaction that holds `FOR UPDATE` on the product row,
//! so writers to one product are serialized and writers to different products never wait on
//! each other. The `(product_id, discount_id)` unique constraint decides whether a discount
//! is new; the row lock only keeps identical requests from racing on the insert.
//!
//! | Database condition | SQLSTATE | Result |
//! |--------------------|----------|--------|
//! | Product row missing | – | `CoreError::NotFound`, transaction rolled back |
//! | Duplicate `(product_id, discount_id)` | – (`ON CONFLICT DO NOTHING`) | success, first percent kept |
//! | Lock wait exceeded `lock_timeout` | `55P03` | `CoreError::LockTimeout` |
//! | Anything else | * | `CoreError::StorageError`, transaction rolled back |

use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use tariff_catalog::Product;
use tariff_core::validation::{validate_discount_id, validate_percent};
use tariff_core::{CoreError, CoreResult, DiscountLedger};
use tracing::{debug, info, instrument, warn};

use crate::catalog_repo::{fetch_discounts, ProductRow, PRODUCT_COLUMNS};

const LOCK_NOT_AVAILABLE: &str = "55P03";

pub struct StoreDiscountLedger {
    pool: PgPool,
    lock_timeout: Option<Duration>,
}

impl StoreDiscountLedger {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            lock_timeout: None,
        }
    }

    /// Bound the wait for a product's row lock. Without it a writer queues until the holder
    /// commits.
    pub fn with_lock_timeout(mut self, lock_timeout: Option<Duration>) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }
}

#[async_trait]
impl DiscountLedger for StoreDiscountLedger {
    #[instrument(skip(self))]
    async fn apply_discount(
        &self,
        product_id: &str,
        discount_id: &str,
        percent: f64,
    ) -> CoreResult<Product> {
        validate_percent(percent)?;
        validate_discount_id(discount_id)?;

        // Dropping `tx` on any early return rolls it back
        let mut tx = self.pool.begin().await.map_err(CoreError::storage)?;

        if let Some(timeout) = self.lock_timeout {
            // SET does not accept bind parameters
            sqlx::query(&format!("SET LOCAL lock_timeout = '{}ms'", timeout.as_millis()))
                .execute(&mut *tx)
                .await
                .map_err(CoreError::storage)?;
        }

        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE id = $1 FOR UPDATE",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error(e, product_id))?;

        let Some(row) = row else {
            tx.rollback().await.map_err(CoreError::storage)?;
            return Err(CoreError::NotFound(product_id.to_string()));
        };

        let inserted = sqlx::query(
            r#"
            INSERT INTO discounts (product_id, discount_id, percent)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id, discount_id) DO NOTHING
            "#,
        )
        .bind(product_id)
        .bind(discount_id)
        .bind(percent)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error(e, product_id))?
        .rows_affected();

        if inserted == 0 {
            debug!("Discount already recorded, keeping the first percent");
        }

        let discounts = fetch_discounts(&mut *tx, product_id)
            .await
            .map_err(|e| map_sqlx_error(e, product_id))?;

        tx.commit().await.map_err(CoreError::storage)?;

        if inserted > 0 {
            info!("Discount recorded");
        }

        row.into_product(discounts)
    }
}

fn map_sqlx_error(err: sqlx::Error, product_id: &str) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(LOCK_NOT_AVAILABLE) {
            warn!(product_id, "Gave up waiting for product row lock");
            return CoreError::LockTimeout(product_id.to_string());
        }
    }
    CoreError::storage(err)
}
