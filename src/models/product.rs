use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{generate_id, UNKNOWN_NAME};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackedProduct {
    pub id: String,
    pub url: String,
    pub name: String,

    // Price history
    pub current_price: Option<Decimal>,
    pub lowest_price: Option<Decimal>,

    /// Set on every successful price observation, never on failure.
    pub last_checked: Option<DateTime<Utc>>,
}

/// Outcome of an observation that undercut the previous price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDrop {
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub saved: Decimal,
}

impl TrackedProduct {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            url: url.into(),
            name: UNKNOWN_NAME.to_string(),
            current_price: None,
            lowest_price: None,
            last_checked: None,
        }
    }

    /// Apply a successful price observation to the record.
    ///
    /// Overwrites the display name when one was extracted, advances
    /// `current_price`/`last_checked`, and lowers `lowest_price` when the
    /// observation undercuts it. Returns the drop details when the new price
    /// is strictly below the immediately preceding `current_price`: never on
    /// the first observation, and regardless of where the price sits relative
    /// to `lowest_price`.
    pub fn record_observation(
        &mut self,
        price: Decimal,
        name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<PriceDrop> {
        let old_price = self.current_price;

        if let Some(name) = name {
            self.name = name.to_string();
        }
        self.current_price = Some(price);
        self.last_checked = Some(now);

        match self.lowest_price {
            Some(lowest) if price >= lowest => {}
            _ => self.lowest_price = Some(price),
        }

        match old_price {
            Some(old) if price < old => Some(PriceDrop {
                old_price: old,
                new_price: price,
                saved: old - price,
            }),
            _ => None,
        }
    }
}
