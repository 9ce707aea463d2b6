pub mod csv_table;
pub mod metadata;

pub use csv_table::{CsvTableSink, GenerationRecord, TransmissionRecord};
pub use metadata::MetadataSink;
