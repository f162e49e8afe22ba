use crate::analysis::loader::load_usage;
use crate::analysis::{aggregate, UsageAnalysis, UsageCounts, ZoneTables};
use crate::config::HeatmapConfig;
use crate::error::HmResult;
use crate::geometry::KeyLayout;
use std::path::PathBuf;
use tracing::info;

/// Where the inputs of one run live.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub layout: PathBuf,
    pub usage: PathBuf,
    /// Custom zone tables; the built-in Advantage tables when `None`.
    pub zones: Option<PathBuf>,
}

/// Validated inputs, ready to be analyzed any number of times.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub layout: KeyLayout,
    pub counts: UsageCounts,
    pub tables: ZoneTables,
}

/// Service: load and validate the layout, usage export and zone tables.
pub fn load_dataset(paths: &DataPaths, config: &HeatmapConfig) -> HmResult<Dataset> {
    info!("📂 Loading Layout: {}", paths.layout.display());
    let layout = KeyLayout::load_from_file(&paths.layout)?;

    info!("📊 Loading Usage: {}", paths.usage.display());
    let records = load_usage(&paths.usage, config.usage_columns())?;
    let counts = aggregate(records)?;

    let tables = match &paths.zones {
        Some(path) => {
            info!("🗺️  Loading Zones: {}", path.display());
            ZoneTables::load_from_file(path)?
        }
        None => ZoneTables::default(),
    };

    Ok(Dataset {
        layout,
        counts,
        tables,
    })
}

/// Service: run the analysis with the normalization and palette from `config`.
pub fn analyze(dataset: &Dataset, config: &HeatmapConfig) -> HmResult<UsageAnalysis> {
    let normalization = config.get_normalization()?;
    let palette = config.get_palette()?;

    Ok(UsageAnalysis::build(
        &dataset.layout,
        &dataset.counts,
        &dataset.tables,
        normalization,
        &palette,
    ))
}
