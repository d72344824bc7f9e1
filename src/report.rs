use crate::models::RankedEntry;
use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::path::Path;

/// Percentage with one decimal place and a trailing `%`
pub fn format_percentage(percentage: f64) -> String {
    format!("{:.1}%", percentage)
}

/// Write the header line followed by at most `max_rows` ranked entries.
///
/// Any existing file at `path` is truncated. Returns the number of data rows written.
pub fn write_report(
    path: &Path,
    entries: &[RankedEntry],
    header_text: &str,
    max_rows: usize,
) -> Result<usize> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to create report: {}", path.display()))?;

    writer.write_record(header_text.split(';'))?;

    let rows = entries.len().min(max_rows);
    for entry in &entries[..rows] {
        writer.write_record(&[
            entry.key.as_str(),
            entry.count.to_string().as_str(),
            format_percentage(entry.percentage).as_str(),
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(rows)
}
