use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tariff_api::{app, AppState, ProductService};
use tariff_catalog::Product;
use tariff_core::{CoreResult, DiscountLedger};
use tariff_store::InMemoryStore;
use tower::ServiceExt;

/// Ledger that stalls before delegating, standing in for a write stuck behind a row lock.
struct StalledLedger {
    inner: Arc<InMemoryStore>,
    delay: Duration,
}

#[async_trait]
impl DiscountLedger for StalledLedger {
    async fn apply_discount(&self, product_id: &str, discount_id: &str, percent: f64) -> CoreResult<Product> {
        tokio::time::sleep(self.delay).await;
        self.inner.apply_discount(product_id, discount_id, percent).await
    }
}

fn test_app() -> Router {
    let store = Arc::new(InMemoryStore::seeded());
    let state = AppState {
        service: ProductService::new(store.clone(), store),
        db: None,
    };
    app(state, Duration::from_secs(5))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_list_products_by_country() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/products?country=sweden", None).await;

    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 2);
    for product in products {
        assert_eq!(product["country"], "Sweden");
        let base = product["basePrice"].as_f64().unwrap();
        let final_price = product["finalPrice"].as_f64().unwrap();
        assert!((final_price - base * 1.25).abs() < 0.001);
        assert_eq!(product["discounts"], json!([]));
    }
}

#[tokio::test]
async fn test_list_products_requires_supported_country() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/products", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, Method::GET, "/products?country=Norway", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Norway"));
}

#[tokio::test]
async fn test_get_product() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/products/sku-germany-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "sku-germany-1");

    let (status, _) = send(&app, Method::GET, "/products/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_apply_discount_is_idempotent() {
    let app = test_app();
    let uri = "/products/sku-france-1/discount";

    let (status, first) = send(&app, Method::PUT, uri, Some(json!({"discountId": "A", "percent": 10}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = send(&app, Method::PUT, uri, Some(json!({"discountId": "A", "percent": 50}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(second["discounts"], json!([{"discountId": "A", "percent": 10.0}]));

    // 89.00 * 0.9 * 1.2
    let final_price = second["finalPrice"].as_f64().unwrap();
    assert!((final_price - 96.12).abs() < 0.001);
}

#[tokio::test]
async fn test_distinct_discounts_combine() {
    let app = test_app();
    let uri = "/products/sku-germany-2/discount";

    send(&app, Method::PUT, uri, Some(json!({"discountId": "A", "percent": 10}))).await;
    let (status, body) = send(&app, Method::PUT, uri, Some(json!({"discountId": "B", "percent": 5}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["discounts"].as_array().unwrap().len(), 2);
    let final_price = body["finalPrice"].as_f64().unwrap();
    assert!((final_price - 129.50 * 0.85 * 1.19).abs() < 0.001);
}

#[tokio::test]
async fn test_apply_discount_rejects_bad_input() {
    let app = test_app();
    let uri = "/products/sku-sweden-1/discount";

    for percent in [0.0, 100.0, -5.0] {
        let (status, _) = send(&app, Method::PUT, uri, Some(json!({"discountId": "X", "percent": percent}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "percent {}", percent);
    }

    let (status, _) = send(&app, Method::PUT, uri, Some(json!({"percent": 10}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PUT, uri, Some(json!({"discountId": "", "percent": 10}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for (id, percent) in [("LOW", 0.01), ("HIGH", 99.99)] {
        let (status, _) = send(&app, Method::PUT, uri, Some(json!({"discountId": id, "percent": percent}))).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_apply_discount_unknown_product() {
    let app = test_app();
    let (status, _) = send(
        &app,
        Method::PUT,
        "/products/unknown/discount",
        Some(json!({"discountId": "A", "percent": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_discount_requests() {
    let app = test_app();

    let calls = (0..20).map(|i| {
        let app = app.clone();
        tokio::spawn(async move {
            send(
                &app,
                Method::PUT,
                "/products/sku-sweden-2/discount",
                Some(json!({"discountId": "K", "percent": 1 + i})),
            )
            .await
        })
    });

    for joined in futures_util::future::join_all(calls).await {
        let (status, body) = joined.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["discounts"].as_array().unwrap().len(), 1);
    }

    let (_, body) = send(&app, Method::GET, "/products/sku-sweden-2", None).await;
    let discounts = body["discounts"].as_array().unwrap();
    assert_eq!(discounts.len(), 1);
    assert_eq!(discounts[0]["discountId"], "K");
}

#[tokio::test]
async fn test_health_without_database() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_slow_discount_times_out_with_service_unavailable() {
    let store = Arc::new(InMemoryStore::seeded());
    let ledger = Arc::new(StalledLedger {
        inner: store.clone(),
        delay: Duration::from_millis(500),
    });
    let state = AppState {
        service: ProductService::new(store.clone(), ledger),
        db: None,
    };
    let app = app(state, Duration::from_millis(50));

    let (status, _) = send(
        &app,
        Method::PUT,
        "/products/sku-france-2/discount",
        Some(json!({"discountId": "SLOW", "percent": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // The handler future was dropped before it reached the store
    tokio::time::sleep(Duration::from_millis(600)).await;
    let (status, body) = send(&app, Method::GET, "/products/sku-france-2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["discounts"], json!([]));
}
