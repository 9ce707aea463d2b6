pub mod revision_store;

pub use revision_store::{merge, CsvRevisionStore, RevisionStore, StoreError};
