//! Tick rows.
//!
//! A `TickRow` is a point-in-time projection of an instrument's running state
//! plus its level-1 quote book, emitted once per instrument per simulated second.
//! Sinks receive rows as generic `Row` objects keyed by field name.

use crate::error::TableError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A table row: field name -> value.
pub type Row = serde_json::Map<String, Value>;

/// One sample of one instrument.
///
/// Field names serialize exactly as the columns of [`Schema::ticks`](crate::Schema::ticks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRow {
    // Identity
    pub symbol: String,
    pub instrument_id: String,
    pub product_id: String,
    pub product_id_upper: String,
    pub delivery_date: String,
    pub price_tick: f64,

    // Timing
    /// Wall-clock sampling time.
    pub datetime: DateTime<Utc>,
    /// `datetime` in Unix milliseconds.
    pub timestamp: i64,
    /// Seconds elapsed since generation started.
    pub offset: u32,
    /// Seconds since the previous sample of the same instrument.
    pub span: u32,

    // Market level 1
    pub last_price: f64,
    pub bid_price1: f64,
    pub ask_price1: f64,
    pub bid_volume1: u32,
    pub ask_volume1: u32,

    // Own resting quote
    pub offer_bid_price1: f64,
    pub offer_ask_price1: f64,
    pub offer_bid_volume1: u32,
    pub offer_ask_volume1: u32,

    // Accounting
    pub close_profit: f64,
    pub position_profit: i64,
    pub trade_volume: u64,
    pub net_position: i32,
    pub commission: f64,

    // Quote validity
    pub valid_length: u8,
    pub valid_length_temp: f64,
    #[serde(rename = "valid_length-0.1")]
    pub valid_length_minus_tenth: f64,

    pub is_market: u8,

    /// Market level 1 with our own resting size taken out.
    pub market_bid_price1: f64,
    pub market_bid_volume1: u32,
    pub market_ask_price1: f64,
    pub market_ask_volume1: u32,
}

impl TickRow {
    /// Converts the row into the generic field map consumed by table sinks.
    pub fn to_row(&self) -> Result<Row, TableError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(TableError::NotAnObject(other.to_string())),
        }
    }
}

/// Converts a batch of ticks into sink rows.
pub fn to_rows(ticks: &[TickRow]) -> Result<Vec<Row>, TableError> {
    ticks.iter().map(TickRow::to_row).collect()
}
