pub mod pipeline;
pub mod config;
pub mod sources;
pub mod sinks;
pub mod transform;
pub mod observability;

pub use pipeline::{Pipeline, PipelineError, Window};
