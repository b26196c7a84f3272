//! Shared data model for the synthetic tick feed and the table server.
//!
//! ## Modules
//! - `model`: instrument configuration and state, tick rows, table schemas.
//! - `traits`: the producer (`TickSource`) and ingestion (`TableSink`) seams.
//! - `error`: errors raised by table sinks.

pub mod error;
pub mod model;
pub mod traits;

pub use error::TableError;
pub use model::instrument::{DeliveryMonth, InstrumentState, ProductConfig};
pub use model::schema::{FieldType, Schema};
pub use model::tick::{to_rows, Row, TickRow};
pub use traits::table_sink::TableSink;
pub use traits::tick_source::TickSource;

pub mod prelude {
    pub use crate::model::schema::{FieldType, Schema};
    pub use crate::model::tick::{Row, TickRow};
    pub use crate::traits::table_sink::TableSink;
    pub use crate::traits::tick_source::TickSource;
}
