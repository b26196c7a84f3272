use anyhow::Context;
use clap::Parser;
use log::info;
use market::{Schema, TableSink};
use table_server::feed::{channel, spawn_ingest, spawn_producer};
use table_server::{router, serve, AppState, Args, TableManager};
use tick_feed::TickGenerator;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("=== Table Server Starting ===");

    let args = Args::parse();
    let config = args.feed_config()?;

    // 1. Host the table
    let tables = TableManager::new();
    tables
        .create_table(&args.table, Schema::ticks())
        .context("Failed to host tick table")?;

    // 2. Start producer and ingest
    info!(
        "Feeding {} instruments for {} seconds into '{}'",
        config.instrument_count(),
        config.duration_secs,
        args.table
    );
    let (tx, rx) = channel();
    spawn_ingest(tables.clone(), args.table.clone(), rx);
    spawn_producer(TickGenerator::from_config(&config), args.interval(), tx);

    // 3. Serve
    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Open http://localhost:{} in a browser", args.port);

    let app = router(AppState::new(tables), &args.static_dir);
    serve(listener, app).await
}
