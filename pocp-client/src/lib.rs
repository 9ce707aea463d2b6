pub mod domain;
pub mod store;

pub use domain::{OutageRevision, OutageRow};
pub use store::{CsvRevisionStore, RevisionStore};
