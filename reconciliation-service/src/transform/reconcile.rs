use pocp_client::domain::{normalize_gip, GenerationOutage, OutageRow, PlanningStatus};

/// Merge the resolved rows into the final status view.
///
/// Confirmed rows are kept. Cancelled rows are kept only when the
/// cancellation was recorded strictly after the outage was due to begin
/// (`last_modified > start`); earlier cancellations are withdrawal noise and
/// are dropped. Tentative rows are kept as-is. The union is stably sorted by
/// the composite key (id, last_modified) and site codes are normalized.
pub fn reconcile<T: OutageRow>(resolved: Vec<T>) -> Vec<T> {
    let mut confirmed = Vec::new();
    let mut tentative = Vec::new();
    let mut late_cancelled = Vec::new();
    let mut dropped: u64 = 0;

    for row in resolved {
        match row.core().planning_status {
            PlanningStatus::Confirmed => confirmed.push(row),
            PlanningStatus::Tentative => tentative.push(row),
            PlanningStatus::Cancelled => {
                if row.core().last_modified > row.core().start {
                    late_cancelled.push(row);
                } else {
                    dropped += 1;
                }
            }
        }
    }

    if dropped > 0 {
        metrics::counter!("reconcile_stale_cancellations_dropped_total").increment(dropped);
    }

    let mut out = confirmed;
    out.append(&mut late_cancelled);
    out.append(&mut tentative);
    out.sort_by_key(|r| (r.core().id, r.core().last_modified));

    for row in &mut out {
        let core = row.core_mut();
        core.gip = normalize_gip(&core.gip);
    }

    out
}

/// Generation-only follow-up: rows whose MW loss is absent or negative never
/// reach the output table. Zero is a valid loss and is kept.
pub fn retain_valid_mw(rows: Vec<GenerationOutage>) -> Vec<GenerationOutage> {
    let before = rows.len();
    let out: Vec<GenerationOutage> = rows
        .into_iter()
        .filter(|r| r.mw_loss.is_some_and(|mw| mw >= 0.0))
        .collect();

    let dropped = (before - out.len()) as u64;
    if dropped > 0 {
        metrics::counter!("reconcile_invalid_mw_loss_dropped_total").increment(dropped);
    }
    out
}
