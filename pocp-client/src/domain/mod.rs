pub mod outage;
pub mod reconciled;

pub use outage::{normalize_gip, Category, OutageRevision, PlanningStatus};
pub use reconciled::{
    DirectConnectionOutage, GenerationOutage, OutageCore, OutageRow, TransmissionOutage,
};
