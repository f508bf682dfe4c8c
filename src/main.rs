use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use dropwatch::config::AppConfig;
use dropwatch::extractor::PriceExtractor;
use dropwatch::fetcher::{Fetcher, HttpFetcher};
use dropwatch::monitor::Monitor;
use dropwatch::notifier::notifier_from_config;
use dropwatch::product_manager::ProductManager;
use dropwatch::store::JsonPriceStore;
use dropwatch::web::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dropwatch=debug".parse()?),
        )
        .init();

    info!("Starting Dropwatch...");

    let config = AppConfig::from_env()?;

    let store = Arc::new(JsonPriceStore::new(&config.store.path));
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(config.fetcher.clone())?);
    let extractor = Arc::new(PriceExtractor::new());
    let notifier = notifier_from_config(&config.notifications.telegram)?;

    let product_manager = Arc::new(ProductManager::new(
        store.clone(),
        fetcher.clone(),
        extractor.clone(),
        notifier.clone(),
        config.notifications.currency_symbol.clone(),
    ));

    let monitor = Monitor::new(store, fetcher, extractor, notifier, &config);
    tokio::spawn(monitor.run());

    let state = AppState {
        product_manager,
        config: config.clone(),
    };
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
