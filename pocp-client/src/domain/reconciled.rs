use time::{Duration, PrimitiveDateTime};

use crate::domain::PlanningStatus;

/// Fields shared by every category after the split. The `gip` code stays raw
/// until the status reconciler normalizes it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutageCore {
    pub id: u64,
    pub last_modified: PrimitiveDateTime,
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
    pub planning_status: PlanningStatus,
    pub outage_block: String,
    pub gip: String,
    pub owner: String,
    pub kind: String,
}

impl OutageCore {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration().as_seconds_f64() / 3600.0
    }
}

/// Access to the common fields from any per-category row type. The window
/// filter, resolver and reconciler are generic over this.
pub trait OutageRow {
    fn core(&self) -> &OutageCore;
    fn core_mut(&mut self) -> &mut OutageCore;
}

/// Transmission outage row. The MW remaining / MW Loss / MV remaining columns
/// of the mixed download schema do not apply here and are dropped at split.
#[derive(Debug, Clone, PartialEq)]
pub struct TransmissionOutage {
    pub core: OutageCore,
    pub nature: String,
}

/// Generation outage row. `nature` does not apply; `net_projected_mwh` is
/// derived at split time, and the mapping tables fill `generation_type` and
/// `island` after reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutage {
    pub core: OutageCore,
    pub mw_loss: Option<f64>,
    pub net_projected_mwh: Option<f64>,
    pub generation_type: Option<String>,
    pub island: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectConnectionOutage {
    pub core: OutageCore,
    pub nature: String,
}

impl OutageRow for TransmissionOutage {
    fn core(&self) -> &OutageCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OutageCore {
        &mut self.core
    }
}

impl OutageRow for GenerationOutage {
    fn core(&self) -> &OutageCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OutageCore {
        &mut self.core
    }
}

impl OutageRow for DirectConnectionOutage {
    fn core(&self) -> &OutageCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OutageCore {
        &mut self.core
    }
}
