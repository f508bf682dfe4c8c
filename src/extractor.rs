use regex::Regex;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use std::str::FromStr;
use tracing::debug;

/// Fields pulled out of a fetched product page. Either side may be absent
/// independently of the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub price: Option<Decimal>,
    pub name: Option<String>,
}

// Bot walls serve this instead of product markup.
const BLOCK_INDICATOR: &str = "captcha";

const NAME_SELECTOR: &str = "span#productTitle";

// Checked in order; the first selector with a match supplies the price text.
const PRICE_SELECTORS: &[&str] = &[
    "span.a-offscreen",
    "span#priceblock_ourprice",
    "span#priceblock_dealprice",
    "span.a-price-whole",
];

// Stripped before numeric parsing, along with thousands separators.
const CURRENCY_CHARS: &[char] = &['₹', '$', '€', '£', '¥'];

pub struct PriceExtractor {
    name_selector: Selector,
    price_selectors: Vec<Selector>,
    amount_regex: Regex,
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceExtractor {
    pub fn new() -> Self {
        PriceExtractor {
            name_selector: Selector::parse(NAME_SELECTOR).unwrap(),
            price_selectors: PRICE_SELECTORS
                .iter()
                .map(|s| Selector::parse(s).unwrap())
                .collect(),
            amount_regex: Regex::new(r"\d+(?:\.\d+)?").unwrap(),
        }
    }

    /// Derive a price and display name from page content. Never fails: any
    /// ambiguity yields `None` for the affected field instead of a guess, and
    /// a block indicator short-circuits both fields without touching the
    /// markup.
    pub fn extract(&self, page: &str) -> Extraction {
        if page.to_lowercase().contains(BLOCK_INDICATOR) {
            debug!("block indicator in page content, skipping extraction");
            return Extraction::default();
        }

        let document = Html::parse_document(page);

        let name = document
            .select(&self.name_selector)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty());

        let price = self
            .price_selectors
            .iter()
            .find_map(|selector| document.select(selector).next())
            .and_then(|element| self.parse_amount(&element_text(element)));

        Extraction { price, name }
    }

    /// Normalize a price string (currency symbols, thousands separators) and
    /// parse the leading numeric token. Unparseable text reads as `None`.
    fn parse_amount(&self, text: &str) -> Option<Decimal> {
        let cleaned: String = text
            .chars()
            .filter(|c| !CURRENCY_CHARS.contains(c) && *c != ',' && !c.is_whitespace())
            .collect();

        let matched = self.amount_regex.find(&cleaned)?;
        Decimal::from_str(matched.as_str()).ok()
    }
}

fn element_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
