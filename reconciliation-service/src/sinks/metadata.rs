use std::{fs, path::PathBuf};

use serde::Serialize;
use time::{macros::format_description, PrimitiveDateTime};

use crate::pipeline::{PipelineError, Window};

#[derive(Debug, Serialize)]
struct RunMetadata {
    #[serde(rename = "updateTime")]
    update_time: String,
    #[serde(rename = "startTime")]
    start_time: String,
    #[serde(rename = "endTime")]
    end_time: String,
}

/// Run metadata record: when the run happened and the window it covered.
/// The window bounds keep the `dd/mm/yyyy` form downstream consumers expect.
pub struct MetadataSink {
    path: PathBuf,
}

impl MetadataSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn write(
        &self,
        update_time: PrimitiveDateTime,
        window: &Window,
    ) -> Result<(), PipelineError> {
        let ts_fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        let date_fmt = format_description!("[day]/[month]/[year]");

        let fmt_err = |e: time::error::Format| PipelineError::Sink(format!("bad timestamp: {e}"));
        let metadata = RunMetadata {
            update_time: update_time.format(&ts_fmt).map_err(fmt_err)?,
            start_time: window.start.date().format(&date_fmt).map_err(fmt_err)?,
            end_time: window.end.date().format(&date_fmt).map_err(fmt_err)?,
        };

        let body = serde_json::to_vec(&metadata)
            .map_err(|e| PipelineError::Sink(format!("failed to encode metadata: {e}")))?;
        fs::write(&self.path, body).map_err(|e| {
            PipelineError::Sink(format!("failed to write {}: {e}", self.path.display()))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn metadata_uses_the_legacy_field_formats() {
        let path = std::env::temp_dir().join(format!("pocp_meta_{}.json", std::process::id()));
        let window = Window {
            start: datetime!(2026-02-05 00:00:00),
            end: datetime!(2027-02-05 00:00:00),
        };

        MetadataSink::new(&path)
            .write(datetime!(2026-08-06 14:30:05), &window)
            .unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["updateTime"], "2026-08-06 14:30:05");
        assert_eq!(value["startTime"], "05/02/2026");
        assert_eq!(value["endTime"], "05/02/2027");
    }
}
