use crate::models::{CategoryCounts, RankedEntry};
use anyhow::{bail, Result};

/// Turn a key → count map into entries ordered by count descending,
/// ties broken by key ascending.
pub fn rank(counts: CategoryCounts, total_certified: u64) -> Result<Vec<RankedEntry>> {
    if total_certified == 0 {
        bail!("No certified applications found, cannot compute percentages");
    }

    let mut entries: Vec<RankedEntry> = counts
        .into_iter()
        .map(|(key, count)| RankedEntry {
            percentage: count as f64 / total_certified as f64 * 100.0,
            key,
            count,
        })
        .collect();

    // Stable sort keeps the alphabetical order among equal counts
    entries.sort_by(|a, b| a.key.cmp(&b.key));
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(entries)
}
