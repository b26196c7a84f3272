//! HTTP surface: websocket endpoint, health check, table listing and static files.

use crate::table::TableManager;
use crate::ws::handle_socket;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use log::info;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

// App State to share with routes
#[derive(Clone)]
pub struct AppState {
    pub tables: TableManager,
}

impl AppState {
    pub fn new(tables: TableManager) -> Self {
        Self { tables }
    }
}

/// Builds the router. Any path not matched by a route is served from `static_dir`,
/// with `index.html` for directories.
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/tables", get(list_tables))
        .route("/websocket", get(ws_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `app` on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    info!("Table Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn list_tables(State(state): State<AppState>) -> impl IntoResponse {
    let tables: Vec<serde_json::Value> = state
        .tables
        .names()
        .into_iter()
        .filter_map(|name| {
            let size = state.tables.size(&name).ok()?;
            Some(serde_json::json!({"name": name, "size": size}))
        })
        .collect();

    Json(serde_json::json!({"status": "OK", "tables": tables}))
}

// WebSocket Handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state.tables))
}
