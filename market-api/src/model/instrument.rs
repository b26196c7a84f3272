//! Defines the static instrument configuration and the per-symbol running state.
//!
//! A tradable instrument is a product (e.g. `cu`) combined with a delivery month
//! (e.g. `2201`). Its symbol carries the exchange prefix: `SHFE.cu2201`.

use serde::{Deserialize, Serialize};

/// Static description of a product: its tick size and reference price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Product code, e.g. "cu".
    pub product_id: String,
    /// Minimum price increment. Must be strictly positive.
    pub price_tick: f64,
    /// Reference price every month of this product starts around.
    pub base_price: f64,
}

impl ProductConfig {
    pub fn new(product_id: impl Into<String>, price_tick: f64, base_price: f64) -> Self {
        Self {
            product_id: product_id.into(),
            price_tick,
            base_price,
        }
    }
}

/// A delivery month code and the weight used to spread its initial price
/// away from the product's base price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMonth {
    /// Contract expiry code, e.g. "2201".
    pub code: String,
    /// Price curve weight. Zero keeps the month on the base price.
    pub price_adjust: f64,
}

impl DeliveryMonth {
    pub fn new(code: impl Into<String>, price_adjust: f64) -> Self {
        Self {
            code: code.into(),
            price_adjust,
        }
    }
}

/// Formats the symbol of an instrument: `"{exchange}.{product}{month}"`.
pub fn symbol(exchange: &str, product_id: &str, month: &str) -> String {
    format!("{}.{}{}", exchange, product_id, month)
}

/// Running state of one instrument.
///
/// Created once from the configuration and then mutated in place once per
/// simulated second. Accumulators are never reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentState {
    /// Full symbol including exchange prefix.
    pub symbol: String,
    pub product_id: String,
    /// Symbol without the exchange prefix, e.g. "cu2201".
    pub instrument_id: String,
    /// Delivery month code.
    pub delivery_date: String,
    pub price_tick: f64,

    pub last_price: f64,
    /// Cumulative traded volume (lots).
    pub trade_volume: u64,
    /// Cumulative realised profit.
    pub close_profit: f64,
    /// Cumulative mark-to-market profit.
    pub position_profit: i64,
    /// Net position in lots. Resampled every tick.
    pub net_position: i32,
    /// Whether the own quote was valid over the last sample (0 or 1).
    pub valid_length: u8,
    pub valid_length_temp: f64,
    /// Accrued commission.
    pub commission: f64,
}

impl InstrumentState {
    /// Creates the state of a freshly listed instrument with zeroed accumulators.
    pub fn new(
        exchange: &str,
        product: &ProductConfig,
        month: &DeliveryMonth,
        last_price: f64,
    ) -> Self {
        Self {
            symbol: symbol(exchange, &product.product_id, &month.code),
            product_id: product.product_id.clone(),
            instrument_id: format!("{}{}", product.product_id, month.code),
            delivery_date: month.code.clone(),
            price_tick: product.price_tick,
            last_price,
            trade_volume: 0,
            close_profit: 0.0,
            position_profit: 0,
            net_position: 0,
            valid_length: 0,
            valid_length_temp: 0.0,
            commission: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_zeroed() {
        let product = ProductConfig::new("cu", 10.0, 35000.0);
        let month = DeliveryMonth::new("2201", 0.0);
        let state = InstrumentState::new("SHFE", &product, &month, 35010.0);

        assert_eq!(state.symbol, "SHFE.cu2201");
        assert_eq!(state.instrument_id, "cu2201");
        assert_eq!(state.delivery_date, "2201");
        assert_eq!(state.last_price, 35010.0);
        assert_eq!(state.trade_volume, 0);
        assert_eq!(state.close_profit, 0.0);
        assert_eq!(state.position_profit, 0);
        assert_eq!(state.commission, 0.0);
    }
}
