use std::cmp::Ordering;
use std::collections::{btree_map::Entry, BTreeMap};

use pocp_client::domain::{GenerationOutage, OutageRow};
use serde::Deserialize;

/// Whether the caller wants the full amendment history or the authoritative
/// current view. Production runs use `Current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    #[default]
    Current,
    History,
}

/// Collapse the amendment history to one row per outage id.
///
/// `Current`: per id, keep the revision with the maximum `last_modified`;
/// output ordered by id. A timestamp tie keeps the earliest-seen revision —
/// the comparison is strictly-greater, so later ties never displace it.
///
/// `History`: no collapsing; every revision, ordered by id then
/// `last_modified` ascending.
pub fn resolve_latest<T: OutageRow>(rows: Vec<T>, mode: ResolveMode) -> Vec<T> {
    match mode {
        ResolveMode::History => {
            let mut rows = rows;
            rows.sort_by_key(|r| (r.core().id, r.core().last_modified));
            rows
        }
        ResolveMode::Current => {
            let mut latest: BTreeMap<u64, T> = BTreeMap::new();
            for row in rows {
                match latest.entry(row.core().id) {
                    Entry::Vacant(slot) => {
                        slot.insert(row);
                    }
                    Entry::Occupied(mut slot) => {
                        if row.core().last_modified > slot.get().core().last_modified {
                            slot.insert(row);
                        }
                    }
                }
            }
            latest.into_values().collect()
        }
    }
}

/// Re-order resolved Generation rows by descending MW loss. Ordering only;
/// rows without an MW loss sink to the end.
pub fn sort_by_mw_loss_desc(rows: &mut [GenerationOutage]) {
    rows.sort_by(|a, b| b.mw_loss.partial_cmp(&a.mw_loss).unwrap_or(Ordering::Equal));
}
