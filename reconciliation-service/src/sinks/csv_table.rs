use std::{fs, path::PathBuf};

use pocp_client::domain::{GenerationOutage, PlanningStatus, TransmissionOutage};
use serde::Serialize;
use time::PrimitiveDateTime;

use crate::pipeline::PipelineError;

time::serde::format_description!(
    out_ts,
    PrimitiveDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second]"
);

/// Transmission output row: the fixed reconciled column set, keyed by
/// (id, Last Modified). Duration is derived at write time.
#[derive(Debug, Serialize)]
pub struct TransmissionRecord {
    pub id: u64,
    #[serde(rename = "Last Modified", with = "out_ts")]
    pub last_modified: PrimitiveDateTime,
    #[serde(rename = "Start", with = "out_ts")]
    pub start: PrimitiveDateTime,
    #[serde(rename = "End", with = "out_ts")]
    pub end: PrimitiveDateTime,
    #[serde(rename = "Outage Block")]
    pub outage_block: String,
    #[serde(rename = "GIP")]
    pub gip: String,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Nature")]
    pub nature: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Duration Hours")]
    pub duration_hours: f64,
    #[serde(rename = "Planning Status")]
    pub planning_status: PlanningStatus,
}

impl From<&TransmissionOutage> for TransmissionRecord {
    fn from(row: &TransmissionOutage) -> Self {
        Self {
            id: row.core.id,
            last_modified: row.core.last_modified,
            start: row.core.start,
            end: row.core.end,
            outage_block: row.core.outage_block.clone(),
            gip: row.core.gip.clone(),
            owner: row.core.owner.clone(),
            nature: row.nature.clone(),
            kind: row.core.kind.clone(),
            duration_hours: row.core.duration_hours(),
            planning_status: row.core.planning_status,
        }
    }
}

/// Generation output row. Missing values are written as zero/empty defaults;
/// the reconciler has already dropped rows without a valid MW loss.
#[derive(Debug, Serialize)]
pub struct GenerationRecord {
    pub id: u64,
    #[serde(rename = "Last Modified", with = "out_ts")]
    pub last_modified: PrimitiveDateTime,
    #[serde(rename = "Start", with = "out_ts")]
    pub start: PrimitiveDateTime,
    #[serde(rename = "End", with = "out_ts")]
    pub end: PrimitiveDateTime,
    #[serde(rename = "MW Loss")]
    pub mw_loss: f64,
    #[serde(rename = "Outage Block")]
    pub outage_block: String,
    #[serde(rename = "GIP")]
    pub gip: String,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Duration Hours")]
    pub duration_hours: f64,
    #[serde(rename = "Planning Status")]
    pub planning_status: PlanningStatus,
    #[serde(rename = "Generation type")]
    pub generation_type: String,
    #[serde(rename = "Island")]
    pub island: String,
}

impl From<&GenerationOutage> for GenerationRecord {
    fn from(row: &GenerationOutage) -> Self {
        Self {
            id: row.core.id,
            last_modified: row.core.last_modified,
            start: row.core.start,
            end: row.core.end,
            mw_loss: row.mw_loss.unwrap_or(0.0),
            outage_block: row.core.outage_block.clone(),
            gip: row.core.gip.clone(),
            owner: row.core.owner.clone(),
            kind: row.core.kind.clone(),
            duration_hours: row.core.duration_hours(),
            planning_status: row.core.planning_status,
            generation_type: row.generation_type.clone().unwrap_or_default(),
            island: row.island.clone().unwrap_or_default(),
        }
    }
}

/// Writes one reconciled table or snapshot view as CSV, atomically.
pub struct CsvTableSink {
    path: PathBuf,
}

impl CsvTableSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn write<T: Serialize>(&self, rows: &[T]) -> Result<(), PipelineError> {
        let tmp = self.path.with_extension("tmp");
        {
            let mut wtr = csv::Writer::from_path(&tmp).map_err(|e| {
                PipelineError::Sink(format!("failed to open {}: {e}", tmp.display()))
            })?;
            for row in rows {
                wtr.serialize(row).map_err(|e| {
                    PipelineError::Sink(format!("failed to write {}: {e}", self.path.display()))
                })?;
            }
            wtr.flush()
                .map_err(|e| PipelineError::Sink(format!("failed to flush: {e}")))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| {
            PipelineError::Sink(format!("failed to replace {}: {e}", self.path.display()))
        })?;

        metrics::counter!("output_rows_written_total").increment(rows.len() as u64);
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "table written");
        Ok(())
    }
}
