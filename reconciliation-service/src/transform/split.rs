use std::cmp::Ordering;

use pocp_client::domain::{
    Category, DirectConnectionOutage, GenerationOutage, OutageCore, OutageRevision,
    TransmissionOutage,
};

/// Per-category partitions of the revision history, with the category tag
/// dropped and category-specific pruning applied.
#[derive(Debug, Default)]
pub struct CategoryTables {
    pub transmission: Vec<TransmissionOutage>,
    pub generation: Vec<GenerationOutage>,
    pub direct: Vec<DirectConnectionOutage>,
}

fn core_of(rev: &OutageRevision) -> OutageCore {
    OutageCore {
        id: rev.id,
        last_modified: rev.last_modified,
        start: rev.start,
        end: rev.end,
        planning_status: rev.planning_status,
        outage_block: rev.outage_block.clone(),
        gip: rev.gip_gxps.clone(),
        owner: rev.owner.clone(),
        kind: rev.kind.clone(),
    }
}

/// Partition revisions by category.
///
/// Transmission loses the MW remaining / MW Loss / MV remaining columns,
/// Generation loses `nature` and gains `net_projected_mwh`
/// (duration in hours times MW loss), Direct Connection keeps the common
/// schema. The Generation partition is ordered by descending projected MWh;
/// the ordering is informational only, nothing downstream depends on it.
pub fn split(revisions: Vec<OutageRevision>) -> CategoryTables {
    let mut tables = CategoryTables::default();

    for rev in revisions {
        let core = core_of(&rev);
        match rev.category {
            Category::Transmission => tables.transmission.push(TransmissionOutage {
                core,
                nature: rev.nature,
            }),
            Category::Generation => {
                let net_projected_mwh =
                    rev.mw_loss.map(|mw| core.duration_hours() * mw);
                tables.generation.push(GenerationOutage {
                    core,
                    mw_loss: rev.mw_loss,
                    net_projected_mwh,
                    generation_type: None,
                    island: None,
                });
            }
            Category::DirectConnection => tables.direct.push(DirectConnectionOutage {
                core,
                nature: rev.nature,
            }),
        }
    }

    tables.generation.sort_by(|a, b| {
        b.net_projected_mwh
            .partial_cmp(&a.net_projected_mwh)
            .unwrap_or(Ordering::Equal)
    });

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::revision;
    use pocp_client::domain::PlanningStatus;
    use time::macros::datetime;

    #[test]
    fn split_partitions_by_category() {
        let mut t = revision(1, Category::Transmission);
        t.mw_loss = Some(10.0);
        let g = revision(2, Category::Generation);
        let d = revision(3, Category::DirectConnection);

        let tables = split(vec![t, g, d]);
        assert_eq!(tables.transmission.len(), 1);
        assert_eq!(tables.generation.len(), 1);
        assert_eq!(tables.direct.len(), 1);
        assert_eq!(tables.transmission[0].core.id, 1);
        assert_eq!(tables.direct[0].core.id, 3);
    }

    #[test]
    fn generation_net_projected_mwh_is_duration_times_mw_loss() {
        let mut g = revision(1, Category::Generation);
        g.start = datetime!(2026-02-01 00:00:00);
        g.end = datetime!(2026-02-01 12:00:00);
        g.mw_loss = Some(40.0);

        let tables = split(vec![g]);
        assert_eq!(tables.generation[0].net_projected_mwh, Some(480.0));
    }

    #[test]
    fn generation_without_mw_loss_has_no_projection() {
        let mut g = revision(1, Category::Generation);
        g.mw_loss = None;

        let tables = split(vec![g]);
        assert_eq!(tables.generation[0].net_projected_mwh, None);
    }

    #[test]
    fn generation_is_ordered_by_descending_projection() {
        let mut small = revision(1, Category::Generation);
        small.mw_loss = Some(1.0);
        let mut large = revision(2, Category::Generation);
        large.mw_loss = Some(100.0);

        let tables = split(vec![small, large]);
        let ids: Vec<u64> = tables.generation.iter().map(|g| g.core.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn split_copies_status_and_interval_into_core() {
        let mut t = revision(9, Category::Transmission);
        t.planning_status = PlanningStatus::Tentative;

        let tables = split(vec![t.clone()]);
        let row = &tables.transmission[0];
        assert_eq!(row.core.planning_status, PlanningStatus::Tentative);
        assert_eq!(row.core.start, t.start);
        assert_eq!(row.core.end, t.end);
        assert_eq!(row.nature, t.nature);
    }
}
