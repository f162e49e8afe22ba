use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use keyheat::api::DataPaths;
use keyheat::config::HeatmapConfig;
use keyheat::error::HmResult;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, short, long, default_value = "layout.json")]
    layout: String,

    #[arg(
        global = true,
        short,
        long,
        default_value = "whatpulse-keyboard-heatmap.csv"
    )]
    usage: String,

    #[arg(global = true, short, long)]
    zones: Option<String>,

    #[arg(global = true, short, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Draw the heatmap chart and print the zone report
    Render(cmd::render::RenderArgs),
    /// Print the zone report only
    Report(cmd::report::ReportArgs),
    /// Print the built-in zone tables as JSON
    Zones,
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

/// File config (if any) as the base, explicit CLI flags on top.
fn resolve_config(
    config_path: &Option<String>,
    cli_config: &HeatmapConfig,
    sub_matches: Option<&ArgMatches>,
) -> HmResult<HeatmapConfig> {
    let Some(path) = config_path else {
        return Ok(cli_config.clone());
    };

    info!("⚙️  Loading Config from: {}", path);
    let mut config = HeatmapConfig::load_from_file(path)?;
    if let Some(matches) = sub_matches {
        config.merge_from_cli(cli_config, matches);
    }
    Ok(config)
}

fn run(cli: &Cli, matches: &ArgMatches) -> HmResult<()> {
    let paths = DataPaths {
        layout: PathBuf::from(&cli.layout),
        usage: PathBuf::from(&cli.usage),
        zones: cli.zones.as_ref().map(PathBuf::from),
    };
    let sub_matches = matches.subcommand().map(|(_, m)| m);

    match &cli.command {
        Commands::Render(args) => {
            let config = resolve_config(&cli.config, &args.report.config, sub_matches)?;
            cmd::render::run(args, &paths, &config)
        }
        Commands::Report(args) => {
            let config = resolve_config(&cli.config, &args.config, sub_matches)?;
            cmd::report::run(args, &paths, &config)
        }
        Commands::Zones => cmd::zones::run(),
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_tracing(cli.debug);

    if let Err(e) = run(&cli, &matches) {
        error!("❌ {}", e);
        process::exit(1);
    }
}
