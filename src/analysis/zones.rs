use super::usage::UsageCounts;
use crate::error::HmResult;
use crate::geometry::{GridPos, KeyLayout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Inclusive integer range; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

impl Span {
    pub const fn new(min: Option<i32>, max: Option<i32>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: i32) -> bool {
        self.min.map_or(true, |m| v >= m) && self.max.map_or(true, |m| v <= m)
    }
}

/// Declarative test over a grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    XIn(Vec<i32>),
    YIn(Vec<i32>),
    X(Span),
    Y(Span),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn matches(&self, pos: GridPos) -> bool {
        match self {
            Self::XIn(set) => set.contains(&pos.x),
            Self::YIn(set) => set.contains(&pos.y),
            Self::X(span) => span.contains(pos.x),
            Self::Y(span) => span.contains(pos.y),
            Self::All(parts) => parts.iter().all(|p| p.matches(pos)),
            Self::Any(parts) => parts.iter().any(|p| p.matches(pos)),
            Self::Not(inner) => !inner.matches(pos),
        }
    }
}

/// Which coordinate of the matched cells places a zone's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(&self, pos: GridPos) -> i32 {
        match self {
            Self::X => pos.x,
            Self::Y => pos.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    pub name: String,
    pub rule: Predicate,
}

impl ZoneDefinition {
    pub fn new(name: impl Into<String>, rule: Predicate) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

/// An ordered table of zones sharing one anchor axis. Zones are evaluated
/// independently and may overlap or leave gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneScheme {
    pub title: String,
    /// Printed before each zone name in the text report.
    #[serde(default)]
    pub label_prefix: String,
    pub anchor: Axis,
    pub zones: Vec<ZoneDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTables {
    pub rows: ZoneScheme,
    pub columns: ZoneScheme,
}

fn rows_in(name: &str, ys: &[i32]) -> ZoneDefinition {
    ZoneDefinition::new(name, Predicate::YIn(ys.to_vec()))
}

fn x_eq(x: i32) -> Predicate {
    Predicate::XIn(vec![x])
}

impl ZoneScheme {
    /// Finger rows of a Kinesis Advantage grid.
    pub fn advantage_rows() -> Self {
        Self {
            title: "Row".to_string(),
            label_prefix: "Rows ".to_string(),
            anchor: Axis::Y,
            zones: vec![
                rows_in("7-8", &[7, 8]),
                rows_in("6", &[6]),
                rows_in("5", &[5]),
                rows_in("4", &[4]),
                rows_in("3", &[3]),
                rows_in("0-2", &[0, 1, 2]),
            ],
        }
    }

    /// Finger columns of a Kinesis Advantage grid. Thumb clusters sit at
    /// `y <= 2`; the index fingers also reach the inner column above them.
    pub fn advantage_columns() -> Self {
        use Predicate::*;
        let thumb_rows = Y(Span::new(None, Some(2)));
        let above_thumbs = Y(Span::new(Some(3), None));

        Self {
            title: "Column".to_string(),
            label_prefix: String::new(),
            anchor: Axis::X,
            zones: vec![
                ZoneDefinition::new("pinky", X(Span::new(None, Some(1)))),
                ZoneDefinition::new("ring", x_eq(2)),
                ZoneDefinition::new("middle", x_eq(3)),
                ZoneDefinition::new(
                    "index",
                    Any(vec![x_eq(4), All(vec![x_eq(5), above_thumbs.clone()])]),
                ),
                ZoneDefinition::new(
                    "thumb",
                    All(vec![thumb_rows.clone(), X(Span::new(Some(5), Some(7)))]),
                ),
                ZoneDefinition::new(
                    "thumb_r",
                    All(vec![thumb_rows, X(Span::new(Some(9), Some(11)))]),
                ),
                ZoneDefinition::new(
                    "index_r",
                    Any(vec![All(vec![x_eq(11), above_thumbs]), x_eq(12)]),
                ),
                ZoneDefinition::new("middle_r", x_eq(13)),
                ZoneDefinition::new("ring_r", x_eq(14)),
                ZoneDefinition::new("pinky_r", X(Span::new(Some(15), None))),
            ],
        }
    }
}

impl Default for ZoneTables {
    fn default() -> Self {
        Self {
            rows: ZoneScheme::advantage_rows(),
            columns: ZoneScheme::advantage_columns(),
        }
    }
}

impl ZoneTables {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> HmResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn to_json(&self) -> HmResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneResult {
    pub name: String,
    /// Can exceed the dataset total when split keys are counted more than once.
    pub total: u128,
    pub percentage: f64,
    /// Mean anchor coordinate of matched cells; 0.0 for an empty zone.
    pub anchor: f64,
    pub matched_positions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneReport {
    pub title: String,
    pub label_prefix: String,
    pub axis: Axis,
    pub results: Vec<ZoneResult>,
}

impl ZoneReport {
    pub fn get(&self, name: &str) -> Option<&ZoneResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneResult> + '_ {
        self.results.iter()
    }
}

/// Sums usage per zone. A key contributes its full count once for every one
/// of its cells that satisfies the zone, so a split key can count twice.
pub fn classify(layout: &KeyLayout, counts: &UsageCounts, scheme: &ZoneScheme) -> ZoneReport {
    let total_presses = counts.total_presses() as f64;

    let results = scheme
        .zones
        .iter()
        .map(|zone| {
            let mut total: u128 = 0;
            let mut coord_sum: i64 = 0;
            let mut matched: usize = 0;

            for (entry, pos) in layout.cells() {
                if zone.rule.matches(pos) {
                    total += u128::from(counts.get(&entry.name));
                    coord_sum += scheme.anchor.of(pos) as i64;
                    matched += 1;
                }
            }

            let anchor = if matched == 0 {
                0.0
            } else {
                coord_sum as f64 / matched as f64
            };

            ZoneResult {
                name: zone.name.clone(),
                total,
                percentage: total as f64 / total_presses * 100.0,
                anchor,
                matched_positions: matched,
            }
        })
        .collect();

    ZoneReport {
        title: scheme.title.clone(),
        label_prefix: scheme.label_prefix.clone(),
        axis: scheme.anchor,
        results,
    }
}
