use serde::{Deserialize, Serialize};
use time::{Duration, PrimitiveDateTime};

// Store and output columns carry naive market-local wall-clock timestamps,
// e.g. "2026-03-14 08:30:00".
time::serde::format_description!(
    table_ts,
    PrimitiveDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second]"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Transmission,
    Generation,
    #[serde(rename = "Direct Connection")]
    DirectConnection,
}

impl Category {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Transmission" => Some(Self::Transmission),
            "Generation" => Some(Self::Generation),
            "Direct Connection" => Some(Self::DirectConnection),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanningStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

impl PlanningStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Confirmed" => Some(Self::Confirmed),
            "Tentative" => Some(Self::Tentative),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// One submitted or amended outage report, exactly as it appears in the
/// revision history.
///
/// `(id, last_modified)` identifies a revision instance; the same `id` recurs
/// across amendments. Field renames match the POCP table headers so the
/// history CSV round-trips through serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutageRevision {
    pub id: u64,
    #[serde(rename = "Start", with = "table_ts")]
    pub start: PrimitiveDateTime,
    #[serde(rename = "End", with = "table_ts")]
    pub end: PrimitiveDateTime,
    #[serde(rename = "Last Modified", with = "table_ts")]
    pub last_modified: PrimitiveDateTime,
    #[serde(rename = "Category")]
    pub category: Category,
    #[serde(rename = "Planning Status")]
    pub planning_status: PlanningStatus,
    #[serde(rename = "MW remaining")]
    pub mw_remaining: Option<f64>,
    #[serde(rename = "MW Loss")]
    pub mw_loss: Option<f64>,
    #[serde(rename = "MV remaining")]
    pub mv_remaining: Option<f64>,
    #[serde(rename = "Nature")]
    pub nature: String,
    #[serde(rename = "Outage Block")]
    pub outage_block: String,
    #[serde(rename = "GIP/GXPs")]
    pub gip_gxps: String,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Type")]
    pub kind: String,
}

impl OutageRevision {
    /// Derived, never stored. Negative when `end < start`; such rows are
    /// tolerated and flow through unchanged.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Normalize a raw `GIP/GXPs` site code: the first 3 characters are
/// significant, and the Excel `#N/A` artifact maps to `"NAP"`.
pub fn normalize_gip(raw: &str) -> String {
    let prefix: String = raw.chars().take(3).collect();
    if prefix == "#N/" {
        "NAP".to_string()
    } else {
        prefix
    }
}
