//! # Table Server
//!
//! Hosts the synthetic tick table in memory and streams it to browser clients.
//!
//! ## Modules
//! - `table`: named, schema-checked, append-only tables with update broadcast.
//! - `feed`: producer and ingest tasks joining a `TickSource` to a table.
//! - `ws`: the websocket request/response protocol.
//! - `server`: axum routes and static file serving.
//! - `args`: command-line arguments.

pub mod args;
pub mod feed;
pub mod server;
pub mod table;
pub mod ws;

pub use args::Args;
pub use server::{router, serve, AppState};
pub use table::TableManager;
