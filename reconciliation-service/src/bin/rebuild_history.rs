use anyhow::Result;
use pocp_client::store::CsvRevisionStore;
use reconciliation_service::{
    config::AppConfig,
    observability,
    pipeline::{Pipeline, SystemClock},
    sources::DownloadFileSource,
    transform::GenerationMaps,
};

/// Recompute every output table from the persisted revision history, without
/// touching the download spool. Useful after editing the history or the
/// mapping tables (point POCP_CONFIG at the environment to rebuild).
fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    let maps = GenerationMaps::load(
        &cfg.mappings.generation_type_path,
        &cfg.mappings.island_path,
    )?;
    let window = cfg.window_override()?;

    let pipeline = Pipeline {
        fetcher: DownloadFileSource::new(&cfg.source.download_path),
        store: CsvRevisionStore::new(&cfg.store.history_path),
        clock: SystemClock,
        maps,
        mode: cfg.mode,
        window,
        outputs: cfg.outputs.clone(),
    };

    pipeline.rebuild()?;

    Ok(())
}
