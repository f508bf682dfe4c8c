use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::extractor::PriceExtractor;
use crate::fetcher::Fetcher;
use crate::models::TrackedProduct;
use crate::notifier::{added_message, Notifier};
use crate::store::JsonPriceStore;
use crate::{AppError, Result};

/// Registration surface for the dashboard: add, remove, list. Adding a
/// product performs one immediate scrape outside the sweep.
pub struct ProductManager {
    store: Arc<JsonPriceStore>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<PriceExtractor>,
    notifier: Arc<dyn Notifier>,
    currency_symbol: String,
}

impl ProductManager {
    pub fn new(
        store: Arc<JsonPriceStore>,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<PriceExtractor>,
        notifier: Arc<dyn Notifier>,
        currency_symbol: String,
    ) -> Self {
        Self {
            store,
            fetcher,
            extractor,
            notifier,
            currency_symbol,
        }
    }

    /// Register a url for tracking. The product is persisted whether or not
    /// the initial scrape succeeds; the "new product" notice is sent only
    /// when a price was actually observed.
    pub async fn add_product(&self, url: &str) -> Result<TrackedProduct> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::Validation("product url is required".to_string()));
        }
        if url::Url::parse(url).is_err() {
            warn!(url = %url, "registering url that does not parse, fetches will likely fail");
        }

        let mut product = TrackedProduct::new(url);

        match self.fetcher.fetch(url).await {
            Ok(page) => {
                let extraction = self.extractor.extract(&page);
                match extraction.price {
                    Some(price) => {
                        product.record_observation(price, extraction.name.as_deref(), Utc::now());
                    }
                    None => {
                        // Keep whatever name we did get; price history starts empty
                        if let Some(name) = extraction.name {
                            product.name = name;
                        }
                        debug!(product = %product.id, "no price on initial scrape");
                    }
                }
            }
            Err(e) => {
                warn!(product = %product.id, url = %url, "initial fetch failed: {}", e);
            }
        }

        let mut products = self.store.load_all().await;
        products.push(product.clone());
        self.store.save_all(&products).await?;

        info!(product = %product.id, name = %product.name, "tracking new product");

        if let Some(price) = product.current_price {
            let message = added_message(&product, price, &self.currency_symbol);
            if let Err(e) = self.notifier.notify(&message).await {
                warn!(product = %product.id, "new product notification failed: {}", e);
            }
        }

        Ok(product)
    }

    /// Remove a product by id and persist. Removing an unknown id is a
    /// no-op, not an error.
    pub async fn remove_product(&self, id: &str) -> Result<()> {
        let mut products = self.store.load_all().await;
        let before = products.len();
        products.retain(|p| p.id != id);

        if products.len() == before {
            debug!(product = %id, "remove requested for unknown product id");
        } else {
            info!(product = %id, "product removed");
        }

        self.store.save_all(&products).await?;
        Ok(())
    }

    /// Fresh snapshot of the tracked collection.
    pub async fn list_products(&self) -> Vec<TrackedProduct> {
        self.store.load_all().await
    }
}
