use super::usage::UsageRecord;
use crate::error::{HeatmapError, HmResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Header names of the key and count columns in a usage export.
#[derive(Debug, Clone, Copy)]
pub struct UsageColumns<'a> {
    pub key: &'a str,
    pub count: &'a str,
}

impl Default for UsageColumns<'static> {
    fn default() -> Self {
        Self {
            key: "Keyname",
            count: "Keycount",
        }
    }
}

pub fn load_usage<P: AsRef<Path>>(path: P, columns: UsageColumns) -> HmResult<Vec<UsageRecord>> {
    let path = path.as_ref();
    debug!("Loading usage records from: {}", path.display());

    let file = File::open(path)?;
    let records = load_usage_from_reader(file, columns)?;

    debug!("   -> {} records read", records.len());
    Ok(records)
}

/// Reads a headered CSV export. Unlike the other loaders this one is strict:
/// any row without an integer count aborts the load.
pub fn load_usage_from_reader<R: Read>(
    reader: R,
    columns: UsageColumns,
) -> HmResult<Vec<UsageRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column_index = |name: &str| {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            HeatmapError::Config(format!(
                "usage file has no '{}' column (found: {})",
                name,
                headers.iter().collect::<Vec<_>>().join(", ")
            ))
        })
    };
    let key_idx = column_index(columns.key)?;
    let count_idx = column_index(columns.count)?;

    let mut records = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let row = idx + 1;
        let rec = result?;

        let key = rec.get(key_idx).unwrap_or("").to_string();
        if key.is_empty() {
            return Err(HeatmapError::MalformedRecord {
                row,
                key,
                reason: "missing key name".to_string(),
            });
        }

        let raw = match rec.get(count_idx) {
            Some(v) if !v.is_empty() => v,
            _ => {
                return Err(HeatmapError::MalformedRecord {
                    row,
                    key,
                    reason: "missing count".to_string(),
                })
            }
        };

        let count: i64 = raw.parse().map_err(|_| {
            let reason = if raw.parse::<u128>().is_ok() {
                format!("count '{}' is out of range", raw)
            } else {
                format!("count '{}' is not an integer", raw)
            };
            HeatmapError::MalformedRecord {
                row,
                key: key.clone(),
                reason,
            }
        })?;

        records.push(UsageRecord { key, count });
    }

    Ok(records)
}
