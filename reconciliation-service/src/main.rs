use anyhow::Result;
use pocp_client::store::CsvRevisionStore;
use reconciliation_service::{
    config::AppConfig,
    observability,
    pipeline::{Pipeline, SystemClock},
    sources::DownloadFileSource,
    transform::GenerationMaps,
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
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

    pipeline.run().await?;

    Ok(())
}
