pub mod intensity;
pub mod loader;
pub mod palette;
pub mod usage;
pub mod zones;

pub use self::intensity::{IntensityScale, Normalization, NormalizationKind};
pub use self::palette::{Palette, PaletteKind, Rgb};
pub use self::usage::{aggregate, UsageCounts, UsageRecord};
pub use self::zones::{classify, ZoneReport, ZoneResult, ZoneScheme, ZoneTables};

use crate::geometry::{Bounds, GridPos, KeyLayout};
use serde::Serialize;
use tracing::{debug, info, warn};

/// One colored cell of the heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatCell {
    pub key: String,
    pub pos: GridPos,
    pub count: u64,
    pub intensity: f64,
    pub color: Rgb,
}

/// Everything the render and report sinks consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageAnalysis {
    pub total_presses: u64,
    pub scale: IntensityScale,
    pub rows: ZoneReport,
    pub columns: ZoneReport,
    pub cells: Vec<HeatCell>,
    pub bounds: Option<Bounds>,
}

impl UsageAnalysis {
    pub fn build(
        layout: &KeyLayout,
        counts: &UsageCounts,
        tables: &ZoneTables,
        normalization: Normalization,
        palette: &Palette,
    ) -> Self {
        report_unplaced_keys(layout, counts);

        let scale = IntensityScale::from_counts(counts.values(), normalization);
        debug!(
            "Intensity scale: min={} max={} ({:?})",
            scale.min, scale.max, scale.normalization
        );

        let cells = layout
            .cells()
            .map(|(entry, pos)| {
                let count = counts.get(&entry.name);
                let intensity = scale.intensity(count);
                HeatCell {
                    key: entry.name.clone(),
                    pos,
                    count,
                    intensity,
                    color: palette.sample(intensity),
                }
            })
            .collect();

        let rows = classify(layout, counts, &tables.rows);
        let columns = classify(layout, counts, &tables.columns);

        info!(
            "Analyzed {} presses over {} keys ({} zones)",
            counts.total_presses(),
            layout.len(),
            rows.results.len() + columns.results.len()
        );

        Self {
            total_presses: counts.total_presses(),
            scale,
            rows,
            columns,
            cells,
            bounds: layout.bounds(),
        }
    }
}

fn report_unplaced_keys(layout: &KeyLayout, counts: &UsageCounts) {
    let mut unplaced: Vec<&str> = counts
        .iter()
        .map(|(k, _)| k)
        .filter(|k| layout.get(k).is_none())
        .collect();

    if unplaced.is_empty() {
        return;
    }

    unplaced.sort_unstable();
    warn!(
        "{} usage keys have no visible position in the layout and are left off the chart",
        unplaced.len()
    );
    debug!("Unplaced keys: {}", unplaced.join(", "));
}
