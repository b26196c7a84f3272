//! Data models shared between the feed and the table server.
//!
//! # Submodules
//! - [`instrument`]: static product/month configuration and per-symbol running state.
//! - [`tick`]: the flat per-second `TickRow` and the generic `Row` handed to sinks.
//! - [`schema`]: the typed field list a hosted table is created with.

pub mod instrument;
pub mod schema;
pub mod tick;
