use std::{collections::HashMap, fs, path::Path};

use pocp_client::domain::GenerationOutage;

use crate::pipeline::PipelineError;

/// The two externally supplied translation tables, keyed by normalized GIP
/// code: generation-type label and island label. Applied to the reconciled
/// Generation table only.
pub struct GenerationMaps {
    generation_type: HashMap<String, String>,
    island: HashMap<String, String>,
}

fn load_map(path: &Path, table: &'static str) -> Result<HashMap<String, String>, PipelineError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| PipelineError::Source(format!("failed to read {table} map: {e}")))?;
    serde_json::from_str(&raw)
        .map_err(|e| PipelineError::Parse(format!("malformed {table} map: {e}")))
}

impl GenerationMaps {
    pub fn load(
        generation_type_path: &Path,
        island_path: &Path,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            generation_type: load_map(generation_type_path, "generation-type")?,
            island: load_map(island_path, "island")?,
        })
    }

    pub fn new(
        generation_type: HashMap<String, String>,
        island: HashMap<String, String>,
    ) -> Self {
        Self {
            generation_type,
            island,
        }
    }

    /// Fill `generation_type` and `island` on each row. A GIP code absent
    /// from either table is an error, not a silent blank.
    pub fn apply(&self, rows: &mut [GenerationOutage]) -> Result<(), PipelineError> {
        for row in rows.iter_mut() {
            let gip = &row.core.gip;
            let generation_type =
                self.generation_type
                    .get(gip)
                    .ok_or_else(|| PipelineError::MissingMapping {
                        table: "generation-type",
                        gip: gip.clone(),
                    })?;
            let island = self
                .island
                .get(gip)
                .ok_or_else(|| PipelineError::MissingMapping {
                    table: "island",
                    gip: gip.clone(),
                })?;
            row.generation_type = Some(generation_type.clone());
            row.island = Some(island.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::generation;
    use pocp_client::domain::PlanningStatus;

    fn maps() -> GenerationMaps {
        GenerationMaps::new(
            HashMap::from([("HLY".to_string(), "Thermal".to_string())]),
            HashMap::from([("HLY".to_string(), "NI".to_string())]),
        )
    }

    #[test]
    fn apply_fills_type_and_island() {
        let mut rows = vec![generation(1, Some(10.0), PlanningStatus::Confirmed)];
        rows[0].core.gip = "HLY".to_string();

        maps().apply(&mut rows).unwrap();
        assert_eq!(rows[0].generation_type.as_deref(), Some("Thermal"));
        assert_eq!(rows[0].island.as_deref(), Some("NI"));
    }

    #[test]
    fn unmapped_gip_is_an_error() {
        let mut rows = vec![generation(1, Some(10.0), PlanningStatus::Confirmed)];
        rows[0].core.gip = "XXX".to_string();

        let res = maps().apply(&mut rows);
        assert!(matches!(res, Err(PipelineError::MissingMapping { .. })));
    }
}
