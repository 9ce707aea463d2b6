use time::{Duration, OffsetDateTime, PrimitiveDateTime, Time};

use pocp_client::domain::OutageRevision;
use pocp_client::store::{merge, RevisionStore, StoreError};

use crate::config::OutputConfig;
use crate::sinks::{CsvTableSink, GenerationRecord, MetadataSink, TransmissionRecord};
use crate::transform::{
    filter_overlap, project_now, project_today, reconcile, resolve_latest, retain_valid_mw,
    sort_by_mw_loss_desc, split, GenerationMaps, ResolveMode,
};

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("no {table} mapping for gip '{gip}'")]
    MissingMapping { table: &'static str, gip: String },
    #[error("source error: {0}")]
    Source(String),
    #[error("sink error: {0}")]
    Sink(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Query window for the outage intervals. Bounds are inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
}

// Half a year either side of "now", like the production schedule has always
// used.
const HALF_WINDOW: Duration = Duration::hours(4380);

impl Window {
    /// Roughly ±6 months around `now`, truncated to date boundaries.
    pub fn default_around(now: PrimitiveDateTime) -> Self {
        Self {
            start: (now - HALF_WINDOW).replace_time(Time::MIDNIGHT),
            end: (now + HALF_WINDOW).replace_time(Time::MIDNIGHT),
        }
    }
}

/// Caller-supplied window bounds; either side falls back to the ±6 month
/// default when unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowOverride {
    pub start: Option<PrimitiveDateTime>,
    pub end: Option<PrimitiveDateTime>,
}

impl WindowOverride {
    pub fn resolve(&self, now: PrimitiveDateTime) -> Window {
        let default = Window::default_around(now);
        Window {
            start: self.start.unwrap_or(default.start),
            end: self.end.unwrap_or(default.end),
        }
    }
}

/// Injected wall clock. Timestamps are naive market-local wall-clock values;
/// the host is assumed to run on market time.
pub trait Clock {
    fn now(&self) -> PrimitiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> PrimitiveDateTime {
        let now = OffsetDateTime::now_utc();
        PrimitiveDateTime::new(now.date(), now.time())
    }
}

/// The download collaborator: supplies the raw revision table for a window.
/// Login, session and transport concerns all live behind this seam.
#[async_trait::async_trait]
pub trait RevisionSource: Send + Sync {
    async fn fetch(&self, window: &Window) -> Result<Vec<OutageRevision>, PipelineError>;
}

pub const METADATA_FILE: &str = "metadata.json";
pub const GENERATION_FILE: &str = "pocp_generation_year.csv";
pub const TRANSMISSION_FILE: &str = "pocp_transmission_year.csv";
pub const GENERATION_NOW_FILE: &str = "pocp_generation_now.csv";
pub const GENERATION_TODAY_FILE: &str = "pocp_generation_today.csv";
pub const TRANSMISSION_NOW_FILE: &str = "pocp_transmission_now.csv";
pub const TRANSMISSION_TODAY_FILE: &str = "pocp_transmission_today.csv";

/// One batch run: fetch, merge into the history, reconcile per category,
/// write the output tables and snapshot views.
pub struct Pipeline<F, S, C> {
    pub fetcher: F,
    pub store: S,
    pub clock: C,
    pub maps: GenerationMaps,
    pub mode: ResolveMode,
    pub window: WindowOverride,
    pub outputs: OutputConfig,
}

impl<F, S, C> Pipeline<F, S, C>
where
    F: RevisionSource,
    S: RevisionStore,
    C: Clock,
{
    pub async fn run(&self) -> Result<(), PipelineError> {
        let now = self.clock.now();
        let window = self.window.resolve(now);
        tracing::info!(start = %window.start, end = %window.end, "fetching POCP revisions");

        let incoming = self.fetcher.fetch(&window).await?;
        metrics::counter!("pocp_revisions_fetched_total").increment(incoming.len() as u64);

        let existing = self.store.load()?;
        let merged = merge(existing, incoming);
        self.store.persist(&merged)?;
        tracing::info!(rows = merged.len(), "revision history merged and persisted");

        self.process(merged, now, &window)
    }

    /// Recompute every output from the persisted history alone, without
    /// fetching. Used by the rebuild binary.
    pub fn rebuild(&self) -> Result<(), PipelineError> {
        let now = self.clock.now();
        let window = self.window.resolve(now);
        let history = self.store.load()?;
        tracing::info!(rows = history.len(), "rebuilding outputs from history");
        self.process(history, now, &window)
    }

    fn process(
        &self,
        revisions: Vec<OutageRevision>,
        now: PrimitiveDateTime,
        window: &Window,
    ) -> Result<(), PipelineError> {
        let tables = split(revisions);

        let transmission = reconcile(resolve_latest(
            filter_overlap(tables.transmission, window),
            self.mode,
        ));

        let mut generation = resolve_latest(filter_overlap(tables.generation, window), self.mode);
        if self.mode == ResolveMode::Current {
            sort_by_mw_loss_desc(&mut generation);
        }
        let mut generation = retain_valid_mw(reconcile(generation));
        self.maps.apply(&mut generation)?;

        let direct = resolve_latest(filter_overlap(tables.direct, window), self.mode);
        tracing::info!(
            transmission = transmission.len(),
            generation = generation.len(),
            direct = direct.len(),
            "outage tables resolved"
        );

        let dir = &self.outputs.dir;
        MetadataSink::new(dir.join(METADATA_FILE)).write(now, window)?;

        let t_records: Vec<TransmissionRecord> =
            transmission.iter().map(TransmissionRecord::from).collect();
        CsvTableSink::new(dir.join(TRANSMISSION_FILE)).write(&t_records)?;

        let g_records: Vec<GenerationRecord> =
            generation.iter().map(GenerationRecord::from).collect();
        CsvTableSink::new(dir.join(GENERATION_FILE)).write(&g_records)?;

        let t_now: Vec<TransmissionRecord> = project_now(&transmission, now)
            .iter()
            .map(TransmissionRecord::from)
            .collect();
        CsvTableSink::new(dir.join(TRANSMISSION_NOW_FILE)).write(&t_now)?;

        let t_today: Vec<TransmissionRecord> = project_today(&transmission, now)
            .iter()
            .map(TransmissionRecord::from)
            .collect();
        CsvTableSink::new(dir.join(TRANSMISSION_TODAY_FILE)).write(&t_today)?;

        let g_now: Vec<GenerationRecord> = project_now(&generation, now)
            .iter()
            .map(GenerationRecord::from)
            .collect();
        CsvTableSink::new(dir.join(GENERATION_NOW_FILE)).write(&g_now)?;

        let g_today: Vec<GenerationRecord> = project_today(&generation, now)
            .iter()
            .map(GenerationRecord::from)
            .collect();
        CsvTableSink::new(dir.join(GENERATION_TODAY_FILE)).write(&g_today)?;

        tracing::info!("run outputs written");
        Ok(())
    }
}
