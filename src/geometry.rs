use crate::error::{HeatmapError, HmResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// One physical cell on the layout grid (units of 1u key width).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Attributes of a layout entry as written in the layout file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawKeyAttrs {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub show: Option<bool>,
    pub split: Option<Vec<GridPos>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Placement {
    Single(GridPos),
    Split(Vec<GridPos>),
}

/// A visible logical key and the grid cells it occupies.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEntry {
    pub name: String,
    placement: Placement,
}

impl KeyEntry {
    pub fn single(name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            name: name.into(),
            placement: Placement::Single(GridPos::new(x, y)),
        }
    }

    /// Builds a key spanning several cells. An empty list has no cell to
    /// count against and is rejected.
    pub fn split(name: impl Into<String>, parts: Vec<GridPos>) -> HmResult<Self> {
        let name = name.into();
        if parts.is_empty() {
            return Err(HeatmapError::MissingLayoutAttribute {
                key: name,
                attribute: "split".to_string(),
            });
        }
        Ok(Self {
            name,
            placement: Placement::Split(parts),
        })
    }

    /// Validates raw attributes. Returns `Ok(None)` for hidden keys.
    pub fn from_raw(name: &str, raw: RawKeyAttrs) -> HmResult<Option<Self>> {
        if raw.show == Some(false) {
            return Ok(None);
        }

        if let Some(parts) = raw.split {
            return Self::split(name, parts).map(Some);
        }

        let missing = |attribute: &str| HeatmapError::MissingLayoutAttribute {
            key: name.to_string(),
            attribute: attribute.to_string(),
        };
        let x = raw.x.ok_or_else(|| missing("x"))?;
        let y = raw.y.ok_or_else(|| missing("y"))?;
        Ok(Some(Self::single(name, x, y)))
    }

    /// Cells this key occupies: the declared split list in order, or its own `(x, y)`.
    pub fn positions(&self) -> &[GridPos] {
        match &self.placement {
            Placement::Single(pos) => std::slice::from_ref(pos),
            Placement::Split(parts) => parts,
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self.placement, Placement::Split(_))
    }
}

/// Inclusive extent of all resolved cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }
}

/// The visible keys of a keyboard, in layout-file order.
#[derive(Debug, Clone, Default)]
pub struct KeyLayout {
    entries: Vec<KeyEntry>,
    hidden: usize,
}

impl KeyLayout {
    pub fn new(entries: Vec<KeyEntry>) -> Self {
        Self { entries, hidden: 0 }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> HmResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parses `{ "KeyName": { "x": .., "y": .., "show"?: .., "split"?: [..] } | null }`.
    pub fn from_json_str(content: &str) -> HmResult<Self> {
        let map: Map<String, Value> = serde_json::from_str(content)?;

        let mut entries = Vec::with_capacity(map.len());
        let mut hidden = 0;

        for (name, value) in map {
            let is_blank = match &value {
                Value::Null => true,
                Value::Object(obj) => obj.is_empty(),
                _ => false,
            };
            if is_blank {
                hidden += 1;
                continue;
            }

            let raw: RawKeyAttrs = serde_json::from_value(value)?;
            match KeyEntry::from_raw(&name, raw)? {
                Some(entry) => entries.push(entry),
                None => hidden += 1,
            }
        }

        debug!(
            "Layout parsed: {} visible keys, {} hidden or empty",
            entries.len(),
            hidden
        );

        Ok(Self { entries, hidden })
    }

    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&KeyEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries skipped because they were hidden, null or empty.
    pub fn hidden_count(&self) -> usize {
        self.hidden
    }

    /// Every resolved cell with its owning key.
    pub fn cells(&self) -> impl Iterator<Item = (&KeyEntry, GridPos)> + '_ {
        self.entries
            .iter()
            .flat_map(|e| e.positions().iter().map(move |&p| (e, p)))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.cells().map(|(_, p)| p).fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    min_x: p.x,
                    min_y: p.y,
                    max_x: p.x,
                    max_y: p.y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }
}
