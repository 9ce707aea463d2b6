use serde::Deserialize;
use std::{fs, path::PathBuf};
use time::{macros::format_description, Date, PrimitiveDateTime, Time};

use crate::pipeline::{PipelineError, WindowOverride};
use crate::transform::ResolveMode;

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Where the download collaborator drops the raw tab-delimited table.
    pub download_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub history_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MappingConfig {
    pub generation_type_path: PathBuf,
    pub island_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

/// Optional query-window bounds as `dd/mm/yyyy` dates; either side defaults
/// to the ±6 month window when unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowConfig {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub store: StoreConfig,
    pub mappings: MappingConfig,
    pub outputs: OutputConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub mode: ResolveMode,
}

fn parse_dmy(raw: &str) -> Result<PrimitiveDateTime, PipelineError> {
    let fmt = format_description!("[day]/[month]/[year]");
    let date = Date::parse(raw.trim(), &fmt)
        .map_err(|e| PipelineError::Parse(format!("invalid window date '{raw}': {e}")))?;
    Ok(PrimitiveDateTime::new(date, Time::MIDNIGHT))
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("POCP_CONFIG").unwrap_or_else(|_| "pocp-config.toml".to_string());
        let contents = fs::read_to_string(&path)?;
        let cfg: AppConfig = toml::from_str(&contents)?;
        Ok(cfg)
    }

    pub fn window_override(&self) -> Result<WindowOverride, PipelineError> {
        Ok(WindowOverride {
            start: self.window.start.as_deref().map(parse_dmy).transpose()?,
            end: self.window.end.as_deref().map(parse_dmy).transpose()?,
        })
    }
}
