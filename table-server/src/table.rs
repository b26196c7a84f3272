//! # Hosted Tables
//!
//! In-memory, append-only tables identified by name. Each table keeps every
//! row it has accepted and broadcasts every appended batch to its subscribers.
//!
//! Appends to one table are serialized by its write lock and broadcast while
//! the lock is held, so a subscriber that takes a snapshot under the read lock
//! sees every batch exactly once: either in the snapshot or as an update.

use log::{debug, info};
use market::error::Result;
use market::{Row, Schema, TableError, TableSink};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Number of batches a slow subscriber may fall behind before it lags.
pub const UPDATE_BUFFER: usize = 1024;

/// A batch of rows shared between all subscribers.
pub type Update = Arc<Vec<Row>>;

/// What a new subscriber starts from.
pub struct Subscription {
    /// Every row accepted so far.
    pub snapshot: Vec<Row>,
    /// Batches appended after the snapshot was taken.
    pub updates: broadcast::Receiver<Update>,
}

pub struct HostedTable {
    name: String,
    schema: Schema,
    rows: RwLock<Vec<Row>>,
    updates: broadcast::Sender<Update>,
}

impl HostedTable {
    fn new(name: &str, schema: Schema) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);
        Self {
            name: name.to_string(),
            schema,
            rows: RwLock::new(Vec::new()),
            updates,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn size(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Takes a snapshot and a receiver for everything appended after it.
    pub fn subscribe(&self) -> Subscription {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Subscription {
            snapshot: rows.clone(),
            updates: self.updates.subscribe(),
        }
    }

    /// Checks that `row` has exactly the schema's fields, with compatible values.
    fn check(&self, index: usize, row: &Row) -> Result<()> {
        let mismatch = |reason: String| TableError::SchemaMismatch {
            table: self.name.clone(),
            index,
            reason,
        };

        for field in self.schema.fields() {
            match row.get(&field.name) {
                None => return Err(mismatch(format!("missing field '{}'", field.name))),
                Some(value) if !field.field_type.accepts(value) => {
                    return Err(mismatch(format!(
                        "field '{}' expects {:?}, got {}",
                        field.name, field.field_type, value
                    )))
                }
                Some(_) => {}
            }
        }

        if row.len() != self.schema.len() {
            if let Some(extra) = row.keys().find(|k| self.schema.get(k).is_none()) {
                return Err(mismatch(format!("unknown field '{}'", extra)));
            }
        }

        Ok(())
    }

    fn append(&self, batch: Vec<Row>) -> Result<usize> {
        for (index, row) in batch.iter().enumerate() {
            self.check(index, row)?;
        }

        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        rows.extend(batch.iter().cloned());
        let size = rows.len();

        // No subscribers is fine: the rows are kept for the next snapshot.
        let _ = self.updates.send(Arc::new(batch));
        Ok(size)
    }
}

/// The set of hosted tables, shared between the ingest task and the web server.
#[derive(Clone, Default)]
pub struct TableManager {
    tables: Arc<RwLock<HashMap<String, Arc<HostedTable>>>>,
}

impl TableManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Result<Arc<HostedTable>> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| TableError::UnknownTable(name.to_string()))
    }

    /// Names of all hosted tables, sorted.
    pub fn names(&self) -> Vec<String> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn schema(&self, name: &str) -> Result<Schema> {
        Ok(self.get(name)?.schema().clone())
    }

    pub fn size(&self, name: &str) -> Result<usize> {
        Ok(self.get(name)?.size())
    }

    pub fn subscribe(&self, name: &str) -> Result<Subscription> {
        Ok(self.get(name)?.subscribe())
    }
}

impl TableSink for TableManager {
    fn create_table(&self, name: &str, schema: Schema) -> Result<()> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        if tables.contains_key(name) {
            return Err(TableError::AlreadyExists(name.to_string()));
        }

        info!("Hosting table '{}' with {} fields", name, schema.len());
        tables.insert(name.to_string(), Arc::new(HostedTable::new(name, schema)));
        Ok(())
    }

    fn update(&self, name: &str, rows: Vec<Row>) -> Result<usize> {
        let table = self.get(name)?;
        let count = rows.len();
        let size = table.append(rows)?;
        debug!("Table '{}': appended {} rows, size {}", name, count, size);
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market::FieldType;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new()
            .with("symbol", FieldType::String)
            .with("last_price", FieldType::Float)
            .with("timestamp", FieldType::Integer)
    }

    fn row(symbol: &str, price: f64) -> Row {
        match json!({"symbol": symbol, "last_price": price, "timestamp": 1}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn manager() -> TableManager {
        let manager = TableManager::new();
        manager.create_table("report", schema()).unwrap();
        manager
    }

    #[test]
    fn test_create_twice_fails() {
        let manager = manager();
        assert!(matches!(
            manager.create_table("report", schema()),
            Err(TableError::AlreadyExists(_))
        ));
        assert_eq!(manager.names(), vec!["report".to_string()]);
    }

    #[test]
    fn test_update_unknown_table() {
        let manager = TableManager::new();
        assert!(matches!(
            manager.update("nope", vec![]),
            Err(TableError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_update_appends_in_order() {
        let manager = manager();
        assert_eq!(manager.update("report", vec![row("a", 1.0)]).unwrap(), 1);
        assert_eq!(
            manager
                .update("report", vec![row("b", 2.0), row("c", 3.0)])
                .unwrap(),
            3
        );

        let snapshot = manager.subscribe("report").unwrap().snapshot;
        let symbols: Vec<&str> = snapshot
            .iter()
            .map(|r| r["symbol"].as_str().unwrap())
            .collect();
        assert_eq!(symbols, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rejects_missing_field() {
        let manager = manager();
        let mut bad = row("a", 1.0);
        bad.remove("timestamp");

        let err = manager.update("report", vec![row("ok", 1.0), bad]).unwrap_err();
        assert!(matches!(err, TableError::SchemaMismatch { index: 1, .. }));
        // Whole batch rejected.
        assert_eq!(manager.size("report").unwrap(), 0);
    }

    #[test]
    fn test_rejects_wrong_type_and_unknown_field() {
        let manager = manager();

        let mut wrong = row("a", 1.0);
        wrong.insert("last_price".into(), json!("high"));
        assert!(manager.update("report", vec![wrong]).is_err());

        let mut extra = row("a", 1.0);
        extra.insert("bogus".into(), json!(1));
        assert!(manager.update("report", vec![extra]).is_err());

        let mut null = row("a", 1.0);
        null.insert("last_price".into(), serde_json::Value::Null);
        assert!(manager.update("report", vec![null]).is_ok());
    }

    #[test]
    fn test_subscriber_sees_later_batches() {
        let manager = manager();
        manager.update("report", vec![row("a", 1.0)]).unwrap();

        let mut sub = manager.subscribe("report").unwrap();
        assert_eq!(sub.snapshot.len(), 1);

        manager.update("report", vec![row("b", 2.0)]).unwrap();
        let update = sub.updates.try_recv().unwrap();
        assert_eq!(update.len(), 1);
        assert_eq!(update[0]["symbol"], json!("b"));
        assert!(sub.updates.try_recv().is_err());
    }
}
