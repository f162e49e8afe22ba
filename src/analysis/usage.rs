use crate::error::{HeatmapError, HmResult};
use std::collections::HashMap;

/// One row of raw key telemetry. A key may appear in many records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRecord {
    pub key: String,
    pub count: i64,
}

impl UsageRecord {
    pub fn new(key: impl Into<String>, count: i64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

/// Press totals per key name. Only constructible through [`aggregate`],
/// so `total_presses()` is always non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageCounts {
    counts: HashMap<String, u64>,
    total: u64,
}

/// Sums records per key name. Records are numbered from 1 in error messages.
pub fn aggregate<I>(records: I) -> HmResult<UsageCounts>
where
    I: IntoIterator<Item = UsageRecord>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    let mut total: u64 = 0;

    for (idx, rec) in records.into_iter().enumerate() {
        let row = idx + 1;
        let malformed = |reason: String| HeatmapError::MalformedRecord {
            row,
            key: rec.key.clone(),
            reason,
        };

        let count = u64::try_from(rec.count)
            .map_err(|_| malformed(format!("negative count {}", rec.count)))?;

        total = total
            .checked_add(count)
            .ok_or_else(|| malformed("total press count overflows u64".to_string()))?;

        let slot = counts.entry(rec.key.clone()).or_insert(0);
        *slot += count;
    }

    if total == 0 {
        return Err(HeatmapError::EmptyDataset);
    }

    Ok(UsageCounts { counts, total })
}

impl UsageCounts {
    /// Presses for `key`; keys never seen count as zero.
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }

    pub fn total_presses(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.counts.values().copied()
    }

    /// Keys sorted by descending press count, ties broken by name.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys_are_summed() {
        let counts = aggregate(vec![
            UsageRecord::new("A", 10),
            UsageRecord::new("B", 5),
            UsageRecord::new("A", 3),
        ])
        .unwrap();

        assert_eq!(counts.get("A"), 13);
        assert_eq!(counts.get("B"), 5);
        assert_eq!(counts.total_presses(), 18);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_unknown_key_is_zero() {
        let counts = aggregate(vec![UsageRecord::new("A", 1)]).unwrap();
        assert_eq!(counts.get("Z"), 0);
        assert!(!counts.contains("Z"));
    }

    #[test]
    fn test_negative_count_is_rejected_with_row() {
        let err = aggregate(vec![UsageRecord::new("A", 1), UsageRecord::new("B", -2)])
            .unwrap_err();
        match err {
            HeatmapError::MalformedRecord { row, key, .. } => {
                assert_eq!(row, 2);
                assert_eq!(key, "B");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_total_is_empty_dataset() {
        assert!(matches!(
            aggregate(Vec::new()),
            Err(HeatmapError::EmptyDataset)
        ));
        assert!(matches!(
            aggregate(vec![UsageRecord::new("A", 0)]),
            Err(HeatmapError::EmptyDataset)
        ));
    }

    #[test]
    fn test_ranked_orders_by_count_then_name() {
        let counts = aggregate(vec![
            UsageRecord::new("B", 5),
            UsageRecord::new("A", 5),
            UsageRecord::new("C", 9),
        ])
        .unwrap();
        let names: Vec<&str> = counts.ranked().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }
}
