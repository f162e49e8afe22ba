use super::report::ReportArgs;
use crate::reports;
use clap::Args;
use keyheat::api::{self, DataPaths};
use keyheat::config::HeatmapConfig;
use keyheat::error::HmResult;
use keyheat::render::render_svg;

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    #[arg(short, long, default_value = "advantage-heatmap.svg")]
    pub output: String,
}

pub fn run(args: &RenderArgs, paths: &DataPaths, config: &HeatmapConfig) -> HmResult<()> {
    let format = args.report.get_format()?;
    let cell_size = config.get_cell_size()?;

    let dataset = api::load_dataset(paths, config)?;
    let analysis = api::analyze(&dataset, config)?;

    render_svg(&analysis, &args.output, cell_size)?;

    reports::print_report(
        &analysis,
        &dataset.counts,
        &dataset.layout,
        format,
        args.report.top,
    )
}
