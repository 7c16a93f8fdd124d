use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tariff_api::{app, AppState, ProductService};
use tariff_store::app_config::Config;
use tariff_store::{DbClient, StoreDiscountLedger, StoreProductCatalog};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tariff_api=debug,tariff_store=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Tariff API on port {}", config.server.port);

    let db = DbClient::new(&config.database)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    if config.database.seed_on_startup {
        db.seed_if_empty().await.context("Failed to seed product catalog")?;
    }

    let catalog = Arc::new(StoreProductCatalog::new(db.pool.clone()));
    let ledger = Arc::new(
        StoreDiscountLedger::new(db.pool.clone())
            .with_lock_timeout(config.database.lock_timeout()),
    );

    let app_state = AppState {
        service: ProductService::new(catalog, ledger),
        db: Some(Arc::new(db)),
    };

    let app = app(app_state, config.server.request_timeout());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
