use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use tariff_catalog::PricedProduct;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CountryQuery {
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyDiscountRequest {
    pub discount_id: String,
    pub percent: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}/discount", put(apply_discount))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /products?country=Sweden
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CountryQuery>,
) -> Result<Json<Vec<PricedProduct>>, AppError> {
    let products = state
        .service
        .products_for_country(query.country.as_deref())
        .await?;
    Ok(Json(products))
}

/// GET /products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<PricedProduct>, AppError> {
    Ok(Json(state.service.product(&product_id).await?))
}

/// PUT /products/:id/discount
/// Idempotent per `discountId`: repeating a request returns the same view
pub async fn apply_discount(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    payload: Result<Json<ApplyDiscountRequest>, JsonRejection>,
) -> Result<Json<PricedProduct>, AppError> {
    let Json(req) = payload.map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;

    info!(
        product_id = %product_id,
        discount_id = %req.discount_id,
        percent = req.percent,
        "Applying discount"
    );

    let product = state
        .service
        .apply_discount(&product_id, &req.discount_id, req.percent)
        .await?;
    Ok(Json(product))
}
