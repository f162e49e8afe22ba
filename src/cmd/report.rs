use crate::reports::{self, ReportFormat};
use clap::Args;
use keyheat::api::{self, DataPaths};
use keyheat::config::HeatmapConfig;
use keyheat::error::{HeatmapError, HmResult};

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub config: HeatmapConfig,

    /// Output format: text, table or json
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Number of keys in the top-keys table
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

impl ReportArgs {
    pub fn get_format(&self) -> HmResult<ReportFormat> {
        self.format.parse().map_err(|_| {
            HeatmapError::Config(format!(
                "unknown report format '{}' (expected text, table or json)",
                self.format
            ))
        })
    }
}

pub fn run(args: &ReportArgs, paths: &DataPaths, config: &HeatmapConfig) -> HmResult<()> {
    let format = args.get_format()?;
    let dataset = api::load_dataset(paths, config)?;
    let analysis = api::analyze(&dataset, config)?;

    reports::print_report(&analysis, &dataset.counts, &dataset.layout, format, args.top)
}
