//! Table schemas.
//!
//! A schema is an ordered list of field names and their column types. Field
//! names are opaque keys: `valid_length-0.1` is a name, not an expression.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column type of a hosted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Float,
    /// RFC 3339 timestamp string.
    Datetime,
}

impl FieldType {
    /// Returns true if `value` can be stored in a column of this type.
    ///
    /// `null` is accepted by every type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (FieldType::String, Value::String(_)) => true,
            (FieldType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (FieldType::Float, Value::Number(_)) => true,
            (FieldType::Datetime, Value::String(s)) => {
                chrono::DateTime::parse_from_rfc3339(s).is_ok()
            }
            _ => false,
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column (builder pattern).
    pub fn with(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(Field {
            name: name.into(),
            field_type,
        });
        self
    }

    /// The schema of the tick table served to clients.
    pub fn ticks() -> Self {
        Self::new()
            .with("symbol", FieldType::String)
            .with("instrument_id", FieldType::String)
            .with("product_id", FieldType::String)
            .with("product_id_upper", FieldType::String)
            .with("delivery_date", FieldType::String)
            .with("price_tick", FieldType::Float)
            .with("datetime", FieldType::Datetime)
            .with("timestamp", FieldType::Integer)
            .with("offset", FieldType::Float)
            .with("last_price", FieldType::Float)
            .with("bid_price1", FieldType::Float)
            .with("ask_price1", FieldType::Float)
            .with("bid_volume1", FieldType::Float)
            .with("ask_volume1", FieldType::Float)
            .with("offer_bid_price1", FieldType::Float)
            .with("offer_ask_price1", FieldType::Float)
            .with("offer_bid_volume1", FieldType::Float)
            .with("offer_ask_volume1", FieldType::Float)
            .with("close_profit", FieldType::Float)
            .with("position_profit", FieldType::Float)
            .with("trade_volume", FieldType::Float)
            .with("net_position", FieldType::Float)
            .with("valid_length", FieldType::Float)
            .with("valid_length_temp", FieldType::Float)
            .with("valid_length-0.1", FieldType::Float)
            .with("commission", FieldType::Float)
            .with("span", FieldType::Float)
            .with("is_market", FieldType::Integer)
            .with("market_bid_price1", FieldType::Float)
            .with("market_bid_volume1", FieldType::Float)
            .with("market_ask_price1", FieldType::Float)
            .with("market_ask_volume1", FieldType::Float)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.field_type)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
