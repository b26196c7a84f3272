//! # Tick Feed
//!
//! Synthetic futures tick data for a fixed universe of products and delivery months.
//!
//! ## Modules
//! - `config`: the static universe description and run length.
//! - `universe`: builds the per-symbol running state.
//! - `generator`: advances simulated time and emits one `TickRow` per instrument per second.

pub mod config;
pub mod error;
pub mod generator;
pub mod universe;

pub use config::FeedConfig;
pub use error::ConfigError;
pub use generator::TickGenerator;
pub use universe::Universe;
