use clap::{CommandFactory, FromArgMatches, Parser};
use keyheat::analysis::{Normalization, Palette, PaletteKind, Rgb};
use keyheat::config::HeatmapConfig;
use keyheat::error::HeatmapError;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    config: HeatmapConfig,
}

fn parse(args: &[&str]) -> (HeatmapConfig, clap::ArgMatches) {
    let matches = TestCli::command()
        .try_get_matches_from(std::iter::once("test").chain(args.iter().copied()))
        .unwrap();
    let cli = TestCli::from_arg_matches(&matches).unwrap();
    (cli.config, matches)
}

#[test]
fn test_cli_defaults_match_default_impl() {
    let (cli, _) = parse(&[]);
    let def = HeatmapConfig::default();
    assert_eq!(cli.normalization, def.normalization);
    assert_eq!(cli.gamma, def.gamma);
    assert_eq!(cli.palette, def.palette);
    assert_eq!(cli.cell_size, def.cell_size);
    assert_eq!(cli.key_column, def.key_column);
    assert_eq!(cli.count_column, def.count_column);
    assert!(cli.palette_stops.is_none());
}

#[test]
fn test_default_resolves_to_gamma_power_and_whatpulse() {
    let config = HeatmapConfig::default();
    assert_eq!(
        config.get_normalization().unwrap(),
        Normalization::Power { gamma: 0.6 }
    );
    assert_eq!(
        config.get_palette().unwrap(),
        Palette::preset(PaletteKind::Whatpulse)
    );
}

#[test]
fn test_invalid_values_are_config_errors() {
    let config = HeatmapConfig {
        normalization: "cubic".to_string(),
        ..Default::default()
    };
    assert!(matches!(config.get_normalization(), Err(HeatmapError::Config(_))));

    let config = HeatmapConfig {
        gamma: -1.0,
        ..Default::default()
    };
    assert!(matches!(config.get_normalization(), Err(HeatmapError::Config(_))));

    let config = HeatmapConfig {
        palette: "rainbow".to_string(),
        ..Default::default()
    };
    assert!(matches!(config.get_palette(), Err(HeatmapError::Config(_))));

    let config = HeatmapConfig {
        cell_size: 0,
        ..Default::default()
    };
    assert!(config.get_cell_size().is_err());
}

#[test]
fn test_custom_stops_override_palette_name() {
    let config = HeatmapConfig {
        palette: "rainbow".to_string(),
        palette_stops: Some("#000000, #FFFFFF".to_string()),
        ..Default::default()
    };
    let palette = config.get_palette().unwrap();
    assert_eq!(palette.stops(), &[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]);
}

#[test]
fn test_file_config_is_partial_and_cli_overrides_win() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heatmap.json");
    std::fs::write(&path, r#"{ "normalization": "log", "cell_size": 24, "palette": "hot" }"#).unwrap();

    let mut config = HeatmapConfig::load_from_file(&path).unwrap();
    assert_eq!(config.cell_size, 24);
    assert_eq!(config.key_column, "Keyname");

    let (cli, matches) = parse(&["--palette", "whatpulse", "--gamma", "0.5"]);
    config.merge_from_cli(&cli, &matches);

    assert_eq!(config.palette, "whatpulse"); // typed on the command line
    assert_eq!(config.gamma, 0.5);
    assert_eq!(config.normalization, "log"); // CLI default does not clobber the file
    assert_eq!(config.cell_size, 24);
}
