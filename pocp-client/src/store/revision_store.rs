use std::{collections::HashSet, fs, path::PathBuf};

use time::PrimitiveDateTime;

use crate::domain::OutageRevision;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("history io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed history row: {0}")]
    Parse(String),
}

/// Append-only revision history. `load` at the start of a run, `persist` the
/// merged table at the end; rows are never deleted here.
pub trait RevisionStore {
    fn load(&self) -> Result<Vec<OutageRevision>, StoreError>;
    fn persist(&self, rows: &[OutageRevision]) -> Result<(), StoreError>;
}

fn ts_nanos(ts: PrimitiveDateTime) -> i128 {
    ts.assume_utc().unix_timestamp_nanos()
}

fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    let len = s.len() as u32;
    hasher.update(&len.to_le_bytes());
    hasher.update(s.as_bytes());
}

fn hash_opt_f64(hasher: &mut blake3::Hasher, v: Option<f64>) {
    match v {
        Some(x) => {
            hasher.update(&[1]);
            hasher.update(&x.to_bits().to_le_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
}

fn row_hash(rev: &OutageRevision) -> [u8; 32] {
    let mut h = blake3::Hasher::new();
    h.update(&rev.id.to_le_bytes());
    h.update(&ts_nanos(rev.start).to_le_bytes());
    h.update(&ts_nanos(rev.end).to_le_bytes());
    h.update(&ts_nanos(rev.last_modified).to_le_bytes());
    h.update(&[rev.category as u8, rev.planning_status as u8]);
    hash_opt_f64(&mut h, rev.mw_remaining);
    hash_opt_f64(&mut h, rev.mw_loss);
    hash_opt_f64(&mut h, rev.mv_remaining);
    hash_str(&mut h, &rev.nature);
    hash_str(&mut h, &rev.outage_block);
    hash_str(&mut h, &rev.gip_gxps);
    hash_str(&mut h, &rev.owner);
    hash_str(&mut h, &rev.kind);
    *h.finalize().as_bytes()
}

/// Concatenate the incoming download onto the existing history, removing exact
/// full-row duplicates. First occurrence wins and input order is preserved, so
/// re-merging an already merged table is a no-op.
pub fn merge(
    existing: Vec<OutageRevision>,
    incoming: Vec<OutageRevision>,
) -> Vec<OutageRevision> {
    let mut seen: HashSet<[u8; 32]> = HashSet::with_capacity(existing.len() + incoming.len());
    let mut out = Vec::with_capacity(existing.len() + incoming.len());
    for rev in existing.into_iter().chain(incoming) {
        if seen.insert(row_hash(&rev)) {
            out.push(rev);
        }
    }
    out
}

/// CSV-file-backed revision history.
pub struct CsvRevisionStore {
    path: PathBuf,
}

impl CsvRevisionStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl RevisionStore for CsvRevisionStore {
    fn load(&self) -> Result<Vec<OutageRevision>, StoreError> {
        // Missing file means first run: start from an empty history.
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut rdr = csv::Reader::from_path(&self.path).map_err(|e| match e.into_kind() {
            csv::ErrorKind::Io(io) => StoreError::Io(io),
            other => StoreError::Parse(format!("{other:?}")),
        })?;

        let mut rows = Vec::new();
        for result in rdr.deserialize::<OutageRevision>() {
            let rev = result.map_err(|e| StoreError::Parse(e.to_string()))?;
            rows.push(rev);
        }
        Ok(rows)
    }

    fn persist(&self, rows: &[OutageRevision]) -> Result<(), StoreError> {
        // Write-then-rename so a run killed mid-write cannot leave a truncated
        // history behind.
        let tmp = self.path.with_extension("tmp");
        {
            let mut wtr =
                csv::Writer::from_path(&tmp).map_err(|e| StoreError::Parse(e.to_string()))?;
            for rev in rows {
                wtr.serialize(rev)
                    .map_err(|e| StoreError::Parse(e.to_string()))?;
            }
            wtr.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, PlanningStatus};
    use time::macros::datetime;

    fn revision(id: u64, last_modified: PrimitiveDateTime) -> OutageRevision {
        OutageRevision {
            id,
            start: datetime!(2026-01-10 08:00:00),
            end: datetime!(2026-01-12 17:00:00),
            last_modified,
            category: Category::Generation,
            planning_status: PlanningStatus::Confirmed,
            mw_remaining: Some(120.0),
            mw_loss: Some(55.5),
            mv_remaining: None,
            nature: "Planned".to_string(),
            outage_block: "HLY G1".to_string(),
            gip_gxps: "HLY2201".to_string(),
            owner: "Genesis".to_string(),
            kind: "Station".to_string(),
        }
    }

    #[test]
    fn merge_removes_exact_duplicates() {
        let a = revision(1, datetime!(2026-01-01 09:00:00));
        let b = revision(1, datetime!(2026-01-05 09:00:00));

        let merged = merge(vec![a.clone(), b.clone()], vec![a.clone()]);
        assert_eq!(merged, vec![a, b]);
    }

    #[test]
    fn merge_keeps_distinct_rows_with_same_id() {
        let a = revision(7, datetime!(2026-01-01 09:00:00));
        let mut b = a.clone();
        b.mw_loss = Some(60.0);

        let merged = merge(vec![a], vec![b]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merge_is_idempotent() {
        let rows = vec![
            revision(1, datetime!(2026-01-01 09:00:00)),
            revision(2, datetime!(2026-01-02 09:00:00)),
        ];

        let once = merge(rows.clone(), Vec::new());
        let twice = merge(once.clone(), Vec::new());
        assert_eq!(once, twice);
        assert_eq!(once, rows);
    }

    #[test]
    fn csv_store_round_trips_rows() {
        let path = std::env::temp_dir().join(format!("pocp_history_{}.csv", std::process::id()));
        let store = CsvRevisionStore::new(&path);

        let rows = vec![
            revision(1, datetime!(2026-01-01 09:00:00)),
            revision(2, datetime!(2026-01-02 10:30:00)),
        ];
        store.persist(&rows).unwrap();
        let loaded = store.load().unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, rows);
    }

    #[test]
    fn load_of_missing_file_is_empty_history() {
        let store = CsvRevisionStore::new("/nonexistent/pocp_history.csv");
        assert!(store.load().unwrap().is_empty());
    }
}
