use crate::analysis::loader::UsageColumns;
use crate::analysis::{Normalization, NormalizationKind, Palette, PaletteKind};
use crate::error::{HeatmapError, HmResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Intensity curve: power, log or linear
    #[arg(long, default_value = "power")]
    pub normalization: String,

    /// Exponent of the power curve (< 1 compresses the long tail)
    #[arg(long, default_value_t = 0.6)]
    pub gamma: f64,

    /// Built-in gradient: whatpulse or hot
    #[arg(long, default_value = "whatpulse")]
    pub palette: String,

    /// Custom gradient as comma separated #RRGGBB stops (overrides --palette)
    #[arg(long)]
    pub palette_stops: Option<String>,

    /// Pixels per layout unit in the rendered chart
    #[arg(long, default_value_t = 40)]
    pub cell_size: u32,

    #[arg(long, default_value = "Keyname")]
    pub key_column: String,

    #[arg(long, default_value = "Keycount")]
    pub count_column: String,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            normalization: "power".to_string(),
            gamma: 0.6,
            palette: "whatpulse".to_string(),
            palette_stops: None,
            cell_size: 40,
            key_column: "Keyname".to_string(),
            count_column: "Keycount".to_string(),
        }
    }
}

impl HeatmapConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> HmResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Copies every option the user typed on the command line over the
    /// values loaded from a config file.
    pub fn merge_from_cli(&mut self, cli: &HeatmapConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(normalization, "normalization");
        update_if_present!(gamma, "gamma");
        update_if_present!(palette, "palette");
        update_if_present!(palette_stops, "palette_stops");
        update_if_present!(cell_size, "cell_size");
        update_if_present!(key_column, "key_column");
        update_if_present!(count_column, "count_column");
    }

    pub fn get_normalization(&self) -> HmResult<Normalization> {
        let kind: NormalizationKind = self.normalization.parse().map_err(|_| {
            HeatmapError::Config(format!(
                "unknown normalization '{}' (expected power, log or linear)",
                self.normalization
            ))
        })?;
        Normalization::from_kind(kind, self.gamma)
    }

    pub fn get_palette(&self) -> HmResult<Palette> {
        if let Some(stops) = &self.palette_stops {
            let stops: Vec<&str> = stops.split(',').map(str::trim).collect();
            return Palette::from_hex_stops(&stops);
        }

        let kind: PaletteKind = self.palette.parse().map_err(|_| {
            HeatmapError::Config(format!(
                "unknown palette '{}' (expected whatpulse or hot)",
                self.palette
            ))
        })?;
        Ok(Palette::preset(kind))
    }

    pub fn get_cell_size(&self) -> HmResult<u32> {
        if self.cell_size == 0 {
            return Err(HeatmapError::Config("cell size must be at least 1".to_string()));
        }
        Ok(self.cell_size)
    }

    pub fn usage_columns(&self) -> UsageColumns<'_> {
        UsageColumns {
            key: &self.key_column,
            count: &self.count_column,
        }
    }
}
