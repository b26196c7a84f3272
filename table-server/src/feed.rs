//! Producer and ingest tasks.
//!
//! The producer drives a `TickSource` and pushes per-second batches into a
//! bounded channel. The ingest task drains that channel into a `TableSink`.
//! A single channel between them keeps every instrument's ticks in order.

use log::{error, info, warn};
use market::{to_rows, TableSink, TickRow, TickSource};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};

/// Number of batches the producer may run ahead of ingestion.
pub const CHANNEL_CAPACITY: usize = 128;

pub type TickBatch = Vec<TickRow>;

/// Creates the producer -> ingest channel.
pub fn channel() -> (mpsc::Sender<TickBatch>, mpsc::Receiver<TickBatch>) {
    mpsc::channel(CHANNEL_CAPACITY)
}

/// Spawns the producer.
///
/// With a zero `interval` the whole run is generated up front on the blocking
/// pool and sent as one batch. Otherwise one simulated second is sent per `interval`, and apart from
/// channel backpressure the tick boundary is the only place the task waits.
pub fn spawn_producer<S>(
    mut source: S,
    interval: Duration,
    tx: mpsc::Sender<TickBatch>,
) -> JoinHandle<()>
where
    S: TickSource + Send + 'static,
{
    tokio::spawn(async move {
        if interval.is_zero() {
            let rows = match tokio::task::spawn_blocking(move || source.drain()).await {
                Ok(rows) => rows,
                Err(e) => {
                    error!("Producer: generation failed: {}", e);
                    return;
                }
            };
            info!("Producer: generated {} rows in one batch", rows.len());
            if tx.send(rows).await.is_err() {
                warn!("Producer: ingest channel closed");
            }
            return;
        }

        info!("Producer: streaming one second every {:?}", interval);
        let mut ticker = pacer(interval);
        let mut seconds = 0u64;
        while let Some(rows) = source.next_ticks() {
            ticker.tick().await;
            if tx.send(rows).await.is_err() {
                warn!("Producer: ingest channel closed after {} seconds", seconds);
                return;
            }
            seconds += 1;
        }
        info!("Producer: finished after {} seconds", seconds);
    })
}

/// A ticker that keeps `interval` between sends even after a stall.
fn pacer(interval: Duration) -> Interval {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Spawns the ingest task appending every received batch to `table`.
///
/// A sink error is fatal for ingestion: it is logged and the task stops.
pub fn spawn_ingest<T>(sink: T, table: String, mut rx: mpsc::Receiver<TickBatch>) -> JoinHandle<()>
where
    T: TableSink + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(ticks) = rx.recv().await {
            let result = to_rows(&ticks).and_then(|rows| sink.update(&table, rows));
            if let Err(e) = result {
                error!("Ingest: failed to update table '{}': {}", table, e);
                return;
            }
        }
        info!("Ingest: producer done, table '{}' complete", table);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableManager;
    use market::Schema;
    use rand::rngs::StdRng;
    use tick_feed::{FeedConfig, TickGenerator};

    fn generator(duration: u32) -> TickGenerator<StdRng> {
        let config = FeedConfig::default().with_duration(duration).with_seed(1);
        TickGenerator::from_config(&config)
    }

    fn manager() -> TableManager {
        let manager = TableManager::new();
        manager.create_table("report", Schema::ticks()).unwrap();
        manager
    }

    #[tokio::test]
    async fn test_batch_mode_ingests_everything() {
        let manager = manager();
        let (tx, rx) = channel();

        let producer = spawn_producer(generator(10), Duration::ZERO, tx);
        let ingest = spawn_ingest(manager.clone(), "report".into(), rx);
        producer.await.unwrap();
        ingest.await.unwrap();

        assert_eq!(manager.size("report").unwrap(), 300);
    }

    #[tokio::test]
    async fn test_streaming_mode_sends_one_second_per_batch() {
        let manager = manager();
        let mut sub = manager.subscribe("report").unwrap();
        let (tx, rx) = channel();

        let producer = spawn_producer(generator(3), Duration::from_millis(10), tx);
        let ingest = spawn_ingest(manager.clone(), "report".into(), rx);
        producer.await.unwrap();
        ingest.await.unwrap();

        for offset in 1..=3 {
            let batch = sub.updates.recv().await.unwrap();
            assert_eq!(batch.len(), 30);
            assert!(batch.iter().all(|r| r["offset"] == serde_json::json!(offset)));
        }
        assert_eq!(manager.size("report").unwrap(), 90);
    }

    /// Yields one second of ticks once `gate` opens.
    struct Gated {
        gate: std::sync::mpsc::Receiver<()>,
        rows: Option<Vec<TickRow>>,
    }

    impl TickSource for Gated {
        fn next_ticks(&mut self) -> Option<Vec<TickRow>> {
            let rows = self.rows.take()?;
            self.gate.recv_timeout(Duration::from_secs(5)).ok()?;
            Some(rows)
        }
    }

    #[tokio::test]
    async fn test_batch_generation_leaves_runtime_free() {
        let (open, gate) = std::sync::mpsc::channel();
        let source = Gated {
            gate,
            rows: generator(1).step(),
        };
        let (tx, mut rx) = channel();

        let producer = spawn_producer(source, Duration::ZERO, tx);
        // Lets the producer start; generation must not hold this thread.
        tokio::task::yield_now().await;
        open.send(()).unwrap();

        let batch = rx.recv().await.unwrap();
        assert_eq!(batch.len(), 30);
        producer.await.unwrap();
    }

    #[tokio::test]
    async fn test_pacer_delays_after_stall() {
        let ticker = pacer(Duration::from_millis(10));
        assert_eq!(ticker.missed_tick_behavior(), MissedTickBehavior::Delay);
        assert_eq!(ticker.period(), Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_ingest_stops_on_unknown_table() {
        let manager = TableManager::new();
        let (tx, rx) = channel();

        let ingest = spawn_ingest(manager, "missing".into(), rx);
        tx.send(generator(1).run()).await.unwrap();
        ingest.await.unwrap();

        // The receiver is gone once ingestion stopped.
        assert!(tx.send(Vec::new()).await.is_err());
    }
}
