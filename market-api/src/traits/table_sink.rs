//! Defines the `TableSink` trait: the ingestion side of a hosted table.
//!
//! A sink is created once with a schema per table name, then receives batches
//! of rows. Distributing updates to connected consumers is the sink's job.

use crate::error::Result;
use crate::model::schema::Schema;
use crate::model::tick::Row;

pub trait TableSink {
    /// Hosts a new, empty table under `name`.
    fn create_table(&self, name: &str, schema: Schema) -> Result<()>;

    /// Appends `rows` to the table `name` and returns the new table size.
    ///
    /// A batch is all-or-nothing: if any row fails schema validation, nothing is appended.
    fn update(&self, name: &str, rows: Vec<Row>) -> Result<usize>;
}
