use std::collections::HashSet;

use pocp_client::domain::{OutageRow, PlanningStatus};
use time::{PrimitiveDateTime, Time};

/// Project the reconciled table to the outages active at `instant`: rows with
/// `start <= instant <= end`, Confirmed only, exact duplicates removed, and
/// one row per id (the last in the table's existing sort order). Read-only.
pub fn project_at<T: OutageRow + Clone + PartialEq>(
    table: &[T],
    instant: PrimitiveDateTime,
) -> Vec<T> {
    let mut active: Vec<T> = Vec::new();
    for row in table {
        let core = row.core();
        if core.start <= instant
            && core.end >= instant
            && core.planning_status == PlanningStatus::Confirmed
            && !active.contains(row)
        {
            active.push(row.clone());
        }
    }

    // Walk backwards keeping the last occurrence per id, then restore order.
    let mut seen: HashSet<u64> = HashSet::new();
    let mut out: Vec<T> = Vec::with_capacity(active.len());
    for row in active.into_iter().rev() {
        if seen.insert(row.core().id) {
            out.push(row);
        }
    }
    out.reverse();
    out
}

/// The "as of this precise instant" view.
pub fn project_now<T: OutageRow + Clone + PartialEq>(
    table: &[T],
    now: PrimitiveDateTime,
) -> Vec<T> {
    project_at(table, now)
}

/// The "as of today" view: the reference instant is midnight of the current
/// calendar day.
pub fn project_today<T: OutageRow + Clone + PartialEq>(
    table: &[T],
    now: PrimitiveDateTime,
) -> Vec<T> {
    project_at(table, now.replace_time(Time::MIDNIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::transmission;
    use time::macros::datetime;

    #[test]
    fn only_active_confirmed_rows_survive() {
        let active = transmission(
            1,
            datetime!(2026-02-01 00:00:00),
            datetime!(2026-02-20 00:00:00),
            datetime!(2026-01-01 09:00:00),
        );
        let mut tentative = active.clone();
        tentative.core.id = 2;
        tentative.core.planning_status = PlanningStatus::Tentative;
        let finished = transmission(
            3,
            datetime!(2026-01-01 00:00:00),
            datetime!(2026-01-05 00:00:00),
            datetime!(2025-12-01 09:00:00),
        );

        let out = project_at(
            &[active.clone(), tentative, finished],
            datetime!(2026-02-10 12:00:00),
        );
        assert_eq!(out, vec![active]);
    }

    #[test]
    fn interval_bounds_are_inclusive() {
        let row = transmission(
            1,
            datetime!(2026-02-01 00:00:00),
            datetime!(2026-02-20 00:00:00),
            datetime!(2026-01-01 09:00:00),
        );

        assert_eq!(project_at(&[row.clone()], datetime!(2026-02-01 00:00:00)).len(), 1);
        assert_eq!(project_at(&[row.clone()], datetime!(2026-02-20 00:00:00)).len(), 1);
        assert!(project_at(&[row], datetime!(2026-02-20 00:00:01)).is_empty());
    }

    #[test]
    fn exact_duplicates_collapse_and_last_per_id_wins() {
        let row = transmission(
            1,
            datetime!(2026-02-01 00:00:00),
            datetime!(2026-02-20 00:00:00),
            datetime!(2026-01-01 09:00:00),
        );
        let mut amended = row.clone();
        amended.nature = "amended".to_string();

        let out = project_at(
            &[row.clone(), row, amended.clone()],
            datetime!(2026-02-10 00:00:00),
        );
        assert_eq!(out, vec![amended]);
    }

    #[test]
    fn today_uses_midnight_of_the_current_day() {
        // Active only until 06:00 today: visible to `today`, gone by `now`.
        let early = transmission(
            1,
            datetime!(2026-02-09 00:00:00),
            datetime!(2026-02-10 06:00:00),
            datetime!(2026-01-01 09:00:00),
        );
        let now = datetime!(2026-02-10 15:00:00);

        assert_eq!(project_today(&[early.clone()], now).len(), 1);
        assert!(project_now(&[early], now).is_empty());
    }
}
