use pocp_client::domain::OutageRow;

use crate::pipeline::Window;

/// Keep the rows whose active interval overlaps the query window. Inclusive
/// at both ends: a row starting exactly at `window.end` (or ending exactly at
/// `window.start`) is retained.
pub fn filter_overlap<T: OutageRow>(rows: Vec<T>, window: &Window) -> Vec<T> {
    rows.into_iter()
        .filter(|r| r.core().start <= window.end && r.core().end >= window.start)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::transmission;
    use time::macros::datetime;

    fn window() -> Window {
        Window {
            start: datetime!(2026-01-01 00:00:00),
            end: datetime!(2026-06-30 00:00:00),
        }
    }

    #[test]
    fn row_starting_at_window_end_is_retained() {
        let rows = vec![transmission(
            1,
            datetime!(2026-06-30 00:00:00),
            datetime!(2026-07-02 00:00:00),
            datetime!(2026-05-01 09:00:00),
        )];
        assert_eq!(filter_overlap(rows, &window()).len(), 1);
    }

    #[test]
    fn row_ending_before_window_start_is_excluded() {
        let rows = vec![transmission(
            1,
            datetime!(2025-12-01 00:00:00),
            datetime!(2025-12-31 23:00:00),
            datetime!(2025-11-01 09:00:00),
        )];
        assert!(filter_overlap(rows, &window()).is_empty());
    }

    #[test]
    fn row_ending_at_window_start_is_retained() {
        let rows = vec![transmission(
            1,
            datetime!(2025-12-01 00:00:00),
            datetime!(2026-01-01 00:00:00),
            datetime!(2025-11-01 09:00:00),
        )];
        assert_eq!(filter_overlap(rows, &window()).len(), 1);
    }

    #[test]
    fn row_spanning_the_whole_window_is_retained() {
        let rows = vec![transmission(
            1,
            datetime!(2025-06-01 00:00:00),
            datetime!(2027-01-01 00:00:00),
            datetime!(2025-05-01 09:00:00),
        )];
        assert_eq!(filter_overlap(rows, &window()).len(), 1);
    }
}
