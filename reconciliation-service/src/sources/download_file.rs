use std::{fs::File, io::Read, path::PathBuf};

use csv::StringRecord;
use pocp_client::domain::{Category, OutageRevision, PlanningStatus};
use time::{Date, Month, PrimitiveDateTime, Time};

use crate::pipeline::{PipelineError, RevisionSource, Window};

/// Raw POCP download supplied by the fetch collaborator: one tab-delimited
/// table, timestamps in the site's `dd/mm/yy hh:mm` format.
///
/// Expected header columns (by name):
/// - id, Start, End, Last Modified, Category, Planning Status,
///   Outage Block, GIP/GXPs, Owner, Type (common schema)
/// - MW remaining, MW Loss, MV remaining, Nature (category-specific)
pub struct DownloadFileSource {
    path: PathBuf,
}

impl DownloadFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

/// `dd/mm/yy hh:mm`, two-digit 2000-based year. Malformed values are errors,
/// never coerced.
fn parse_download_ts(raw: &str) -> Result<PrimitiveDateTime, PipelineError> {
    let parts: Vec<&str> = raw
        .trim()
        .split(['/', ' ', ':'])
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 5 {
        return Err(PipelineError::Parse(format!("invalid timestamp '{raw}'")));
    }

    let num = |s: &str| -> Result<u8, PipelineError> {
        s.parse()
            .map_err(|_| PipelineError::Parse(format!("invalid timestamp '{raw}'")))
    };

    let (day, month, year, hour, minute) =
        (num(parts[0])?, num(parts[1])?, num(parts[2])?, num(parts[3])?, num(parts[4])?);

    let month = Month::try_from(month)
        .map_err(|e| PipelineError::Parse(format!("invalid timestamp '{raw}': {e}")))?;
    let date = Date::from_calendar_date(2000 + i32::from(year), month, day)
        .map_err(|e| PipelineError::Parse(format!("invalid timestamp '{raw}': {e}")))?;
    let time = Time::from_hms(hour, minute, 0)
        .map_err(|e| PipelineError::Parse(format!("invalid timestamp '{raw}': {e}")))?;
    Ok(PrimitiveDateTime::new(date, time))
}

fn parse_optional_f64(name: &str, raw: &str) -> Result<Option<f64>, PipelineError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|e| PipelineError::Parse(format!("invalid {name} '{raw}': {e}")))
}

fn record_to_revision(
    record: &StringRecord,
    headers: &StringRecord,
) -> Result<OutageRevision, PipelineError> {
    let get = |name: &str| -> Result<&str, PipelineError> {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|idx| record.get(idx))
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    };
    // The download schema mixes all three categories; these columns only
    // apply to some of them, so their absence is a different failure.
    let get_category = |name: &str| -> Result<&str, PipelineError> {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|idx| record.get(idx))
            .ok_or_else(|| {
                PipelineError::SchemaMismatch(format!("column '{name}' absent from download"))
            })
    };

    let id_str = get("id")?;
    let id: u64 = id_str
        .trim()
        .parse()
        .map_err(|e| PipelineError::Parse(format!("invalid id '{id_str}': {e}")))?;

    let start = parse_download_ts(get("Start")?)?;
    let end = parse_download_ts(get("End")?)?;
    let last_modified = parse_download_ts(get("Last Modified")?)?;

    let category_str = get("Category")?;
    let category = Category::parse(category_str)
        .ok_or_else(|| PipelineError::Parse(format!("unknown category '{category_str}'")))?;

    let status_str = get("Planning Status")?;
    let planning_status = PlanningStatus::parse(status_str)
        .ok_or_else(|| PipelineError::Parse(format!("unknown planning status '{status_str}'")))?;

    let mw_remaining = parse_optional_f64("MW remaining", get_category("MW remaining")?)?;
    let mw_loss = parse_optional_f64("MW Loss", get_category("MW Loss")?)?;
    let mv_remaining = parse_optional_f64("MV remaining", get_category("MV remaining")?)?;

    Ok(OutageRevision {
        id,
        start,
        end,
        last_modified,
        category,
        planning_status,
        mw_remaining,
        mw_loss,
        mv_remaining,
        nature: get_category("Nature")?.trim().to_string(),
        outage_block: get("Outage Block")?.trim().to_string(),
        gip_gxps: get("GIP/GXPs")?.trim().to_string(),
        owner: get("Owner")?.trim().to_string(),
        kind: get("Type")?.trim().to_string(),
    })
}

pub(crate) fn parse_download<R: Read>(reader: R) -> Result<Vec<OutageRevision>, PipelineError> {
    let mut rdr = csv::ReaderBuilder::new().delimiter(b'\t').from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| PipelineError::Source(format!("failed to read download headers: {e}")))?
        .clone();

    let mut revisions = Vec::new();
    for result in rdr.records() {
        let record = result
            .map_err(|e| PipelineError::Source(format!("failed to read download record: {e}")))?;

        let revision = match record_to_revision(&record, &headers) {
            Ok(r) => r,
            Err(e) => {
                metrics::counter!("pocp_download_parse_errors_total").increment(1);
                return Err(e);
            }
        };
        revisions.push(revision);
    }
    Ok(revisions)
}

#[async_trait::async_trait]
impl RevisionSource for DownloadFileSource {
    async fn fetch(&self, window: &Window) -> Result<Vec<OutageRevision>, PipelineError> {
        tracing::debug!(
            path = %self.path.display(),
            start = %window.start,
            end = %window.end,
            "reading POCP download"
        );
        let file = File::open(&self.path)
            .map_err(|e| PipelineError::Source(format!("failed to open download file: {e}")))?;
        parse_download(file)
    }
}
