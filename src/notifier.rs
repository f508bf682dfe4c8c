use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::TelegramConfig;
use crate::models::{PriceDrop, TrackedProduct};
use crate::{AppError, Result};

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Capability for delivering a human-readable message to the configured
/// recipient. Side effect only; callers log and swallow failures.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<()>;
}

/// Delivers messages through the Telegram Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Result<Self> {
        Self::with_api_base(TELEGRAM_API_BASE.to_string(), bot_token, chat_id)
    }

    pub fn with_api_base(api_base: String, bot_token: String, chat_id: String) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(NOTIFY_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_base,
            bot_token,
            chat_id,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let payload = json!({
            "chat_id": self.chat_id,
            "text": message,
            "parse_mode": "Markdown",
        });

        let response = self.client.post(&url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Notification(format!(
                "telegram responded with {}",
                response.status()
            )));
        }

        debug!("telegram message delivered");
        Ok(())
    }
}

/// Stand-in used when credentials are absent: notifications are silently
/// disabled, everything else runs unaffected.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _message: &str) -> Result<()> {
        debug!("notifications disabled, message discarded");
        Ok(())
    }
}

/// Build the notifier matching the configuration: Telegram when both
/// credentials are present, otherwise a no-op.
pub fn notifier_from_config(config: &TelegramConfig) -> Result<Arc<dyn Notifier>> {
    match (&config.bot_token, &config.chat_id) {
        (Some(token), Some(chat_id)) if !token.is_empty() && !chat_id.is_empty() => Ok(Arc::new(
            TelegramNotifier::new(token.clone(), chat_id.clone())?,
        )),
        _ => {
            info!("telegram credentials absent, notifications disabled");
            Ok(Arc::new(NoopNotifier))
        }
    }
}

pub fn drop_message(product: &TrackedProduct, drop: &PriceDrop, symbol: &str) -> String {
    format!(
        "🚨 *PRICE DROP ALERT!* 🚨\n\n{name} dropped from {sym}{old:.2} to {sym}{new:.2} \
         (saving {sym}{saved:.2}).\n\n[View Product]({url})",
        name = product.name,
        sym = symbol,
        old = drop.old_price,
        new = drop.new_price,
        saved = drop.saved,
        url = product.url,
    )
}

pub fn added_message(product: &TrackedProduct, price: Decimal, symbol: &str) -> String {
    format!(
        "✅ *NEW PRODUCT ADDED!* ✅\n\nTracking *{name}* at {sym}{price:.2}.\n[View Product]({url})",
        name = product.name,
        sym = symbol,
        price = price,
        url = product.url,
    )
}
