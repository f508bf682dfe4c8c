use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::extractor::PriceExtractor;
use crate::fetcher::Fetcher;
use crate::notifier::{drop_message, Notifier};
use crate::store::JsonPriceStore;
use crate::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweepSummary {
    pub products_checked: usize,
    pub prices_observed: usize,
    pub fetch_failures: usize,
    pub extraction_failures: usize,
    pub drops_detected: usize,
    pub notifications_sent: usize,
}

/// Runs the repeating sweep over every tracked product: fetch, extract,
/// update the record, notify on drops, and persist the whole collection once
/// per sweep.
pub struct Monitor {
    store: Arc<JsonPriceStore>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<PriceExtractor>,
    notifier: Arc<dyn Notifier>,
    check_interval: Duration,
    currency_symbol: String,
}

impl Monitor {
    pub fn new(
        store: Arc<JsonPriceStore>,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<PriceExtractor>,
        notifier: Arc<dyn Notifier>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            extractor,
            notifier,
            check_interval: Duration::from_secs(config.monitor.check_interval_secs),
            currency_symbol: config.notifications.currency_symbol.clone(),
        }
    }

    /// Run sweeps forever at the configured interval. The first sweep starts
    /// immediately. A failed sweep is logged and retried on the next tick.
    pub async fn run(self) {
        info!(
            interval_secs = self.check_interval.as_secs(),
            "price monitor started"
        );

        let mut ticker = tokio::time::interval(self.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.sweep().await {
                Ok(summary) => info!(
                    checked = summary.products_checked,
                    observed = summary.prices_observed,
                    drops = summary.drops_detected,
                    notified = summary.notifications_sent,
                    fetch_failures = summary.fetch_failures,
                    extraction_failures = summary.extraction_failures,
                    "sweep complete"
                ),
                Err(e) => error!("sweep failed to persist price history: {}", e),
            }
        }
    }

    /// One full pass over the tracked products. A failure on one product
    /// never affects the others, and a failed observation never overwrites a
    /// valid prior one. Persists the collection in a single write at the end;
    /// that write is the only error this returns.
    pub async fn sweep(&self) -> Result<SweepSummary> {
        let mut products = self.store.load_all().await;
        let mut summary = SweepSummary {
            products_checked: products.len(),
            ..SweepSummary::default()
        };

        for product in &mut products {
            let page = match self.fetcher.fetch(&product.url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(product = %product.id, url = %product.url, "fetch failed, keeping previous observation: {}", e);
                    summary.fetch_failures += 1;
                    continue;
                }
            };

            let extraction = self.extractor.extract(&page);
            let Some(price) = extraction.price else {
                debug!(product = %product.id, "no price extracted, keeping previous observation");
                summary.extraction_failures += 1;
                continue;
            };

            summary.prices_observed += 1;

            if let Some(drop) = product.record_observation(price, extraction.name.as_deref(), Utc::now()) {
                summary.drops_detected += 1;
                info!(
                    product = %product.id,
                    old = %drop.old_price,
                    new = %drop.new_price,
                    "price drop detected"
                );

                let message = drop_message(product, &drop, &self.currency_symbol);
                match self.notifier.notify(&message).await {
                    Ok(()) => summary.notifications_sent += 1,
                    Err(e) => warn!(product = %product.id, "drop notification failed: {}", e),
                }
            }
        }

        self.store.save_all(&products).await?;
        Ok(summary)
    }
}
