//! Feed configuration: the instrument universe and how long to run.

use crate::error::{ConfigError, Result};
use anyhow::Context;
use market::{DeliveryMonth, ProductConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Static configuration of the synthetic feed.
///
/// Every product is listed for every month, so the universe has
/// `products.len() * months.len()` instruments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Exchange prefix of every symbol.
    pub exchange: String,
    pub products: Vec<ProductConfig>,
    pub months: Vec<DeliveryMonth>,
    /// Number of simulated seconds to generate.
    pub duration_secs: u32,
    /// Seed of the random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            exchange: "SHFE".to_string(),
            products: vec![
                ProductConfig::new("cu", 10.0, 35000.0),
                ProductConfig::new("au", 0.02, 380.22),
                ProductConfig::new("rb", 1.0, 3400.0),
            ],
            months: vec![
                DeliveryMonth::new("2201", 0.0),
                DeliveryMonth::new("2202", 100.0),
                DeliveryMonth::new("2203", 200.0),
                DeliveryMonth::new("2204", 320.0),
                DeliveryMonth::new("2205", 460.0),
                DeliveryMonth::new("2206", 650.0),
                DeliveryMonth::new("2207", 750.0),
                DeliveryMonth::new("2208", 850.0),
                DeliveryMonth::new("2209", 960.0),
                DeliveryMonth::new("2210", 1100.0),
            ],
            duration_secs: 99,
            seed: None,
        }
    }
}

impl FeedConfig {
    /// Loads a JSON configuration file. Missing fields take their default value.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open feed config {:?}", path))?;
        let reader = std::io::BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse feed config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_duration(mut self, duration_secs: u32) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    /// Number of instruments this configuration lists.
    pub fn instrument_count(&self) -> usize {
        self.products.len() * self.months.len()
    }

    /// Checks the invariants the generator relies on.
    ///
    /// Empty product or month lists are valid: they describe an empty universe.
    pub fn validate(&self) -> Result<()> {
        if self.exchange.trim().is_empty() {
            return Err(ConfigError::EmptyExchange);
        }

        let mut seen = HashSet::new();
        for product in &self.products {
            if !(product.price_tick.is_finite() && product.price_tick > 0.0) {
                return Err(ConfigError::InvalidPriceTick {
                    product: product.product_id.clone(),
                    tick: product.price_tick,
                });
            }
            if !product.base_price.is_finite() {
                return Err(ConfigError::InvalidBasePrice(product.product_id.clone()));
            }
            if !seen.insert(product.product_id.as_str()) {
                return Err(ConfigError::DuplicateProduct(product.product_id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for month in &self.months {
            if !month.price_adjust.is_finite() {
                return Err(ConfigError::InvalidPriceAdjust(month.code.clone()));
            }
            if !seen.insert(month.code.as_str()) {
                return Err(ConfigError::DuplicateMonth(month.code.clone()));
            }
        }

        Ok(())
    }
}
