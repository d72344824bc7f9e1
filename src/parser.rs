use crate::models::{strip_quotes, Aggregation, FieldPositions, Record};
use anyhow::{anyhow, bail, Result};
use tracing::debug;

pub const DELIMITER: char = ';';

/// Locate the four required columns by substring match on the header names.
pub fn resolve_fields(header: &[&str]) -> Result<FieldPositions> {
    let find = |label: &str, parts: &[&str]| {
        header
            .iter()
            .position(|name| parts.iter().all(|part| name.contains(part)))
            .ok_or_else(|| anyhow!("Header has no {} field (looked for {})", label, parts.join(" + ")))
    };

    Ok(FieldPositions {
        status: find("status", &["STATUS"])?,
        visa_class: find("visa class", &["VISA", "CLASS"])?,
        occupation: find("occupation", &["SOC", "NAME"])?,
        state: find("work state", &["WORK", "STATE"])?,
    })
}

pub fn parse_record<'a>(fields: &[&'a str], positions: &FieldPositions) -> Result<Record<'a>> {
    if fields.len() < positions.required_len() {
        bail!(
            "expected at least {} fields, found {}",
            positions.required_len(),
            fields.len()
        );
    }

    Ok(Record {
        status: fields[positions.status],
        visa_class: fields[positions.visa_class].split_whitespace().next(),
        occupation_code: strip_quotes(fields[positions.occupation]),
        state_code: fields[positions.state],
    })
}

/// Count certified applications per occupation and per work state.
///
/// The first line is the header. Blank lines are skipped; any other line
/// shorter than the header positions require aborts the whole pass.
pub fn aggregate(content: &str) -> Result<Aggregation> {
    let mut lines = content.lines();
    let header_line = lines
        .next()
        .ok_or_else(|| anyhow!("Input is empty, expected a header line"))?;
    let header: Vec<&str> = header_line.split(DELIMITER).collect();
    let positions = resolve_fields(&header)?;
    debug!(?positions, "resolved header fields");

    let mut aggregation = Aggregation::default();

    for (index, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        aggregation.lines_read += 1;

        let fields: Vec<&str> = line.split(DELIMITER).collect();
        // header is line 1
        let record = parse_record(&fields, &positions)
            .map_err(|e| anyhow!("Malformed record on line {}: {}", index + 2, e))?;

        if !record.is_certified() {
            continue;
        }

        aggregation.total_certified += 1;
        *aggregation
            .occupations
            .entry(record.occupation_code.to_string())
            .or_default() += 1;
        *aggregation
            .states
            .entry(record.state_code.to_string())
            .or_default() += 1;
    }

    Ok(aggregation)
}
