pub mod table_sink;
pub mod tick_source;
