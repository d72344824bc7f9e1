use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Visa classes counted as H-1B family applications
pub const ACCEPTED_VISA_CLASSES: [&str; 4] = ["H1B", "H-1B", "H-1B1", "E-3"];

pub const CERTIFIED_STATUS: &str = "CERTIFIED";

pub const OCCUPATIONS_HEADER: &str = "TOP_OCCUPATIONS;NUMBER_CERTIFIED_APPLICATIONS;PERCENTAGE";
pub const STATES_HEADER: &str = "TOP_STATES;NUMBER_CERTIFIED_APPLICATIONS;PERCENTAGE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Maximum number of data rows in each report
    pub max_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_rows: 10 }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read config file: {}", file_path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", file_path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_rows == 0 {
            bail!("max_rows must be at least 1");
        }
        Ok(())
    }
}

/// Column indexes of the fields the aggregation needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPositions {
    pub status: usize,
    pub visa_class: usize,
    pub occupation: usize,
    pub state: usize,
}

impl FieldPositions {
    /// Minimum number of fields a data line must have
    pub fn required_len(&self) -> usize {
        [self.status, self.visa_class, self.occupation, self.state]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// One data line, borrowed from the input text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub status: &'a str,
    pub visa_class: Option<&'a str>,
    pub occupation_code: &'a str,
    pub state_code: &'a str,
}

impl Record<'_> {
    pub fn is_certified(&self) -> bool {
        self.status == CERTIFIED_STATUS
            && self
                .visa_class
                .is_some_and(|class| ACCEPTED_VISA_CLASSES.contains(&class))
            && !self.occupation_code.is_empty()
            && !self.state_code.is_empty()
    }
}

pub type CategoryCounts = HashMap<String, u64>;

/// Result of the single pass over the input
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub occupations: CategoryCounts,
    pub states: CategoryCounts,
    pub total_certified: u64,
    pub lines_read: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub key: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub lines_read: usize,
    pub total_certified: u64,
    pub distinct_occupations: usize,
    pub distinct_states: usize,
    pub occupation_rows: usize,
    pub state_rows: usize,
}

/// Unwraps a quoted occupation name.
///
/// Only the leading quote is checked; the last character is dropped
/// whatever it is.
pub fn strip_quotes(code: &str) -> &str {
    if code.chars().count() > 2 && code.starts_with('"') {
        let mut chars = code.chars();
        chars.next();
        chars.next_back();
        chars.as_str()
    } else {
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_wrapping_quotes() {
        assert_eq!(strip_quotes("\"15-1132\""), "15-1132");
    }

    #[test]
    fn short_values_are_kept() {
        assert_eq!(strip_quotes("AB"), "AB");
        assert_eq!(strip_quotes("\"\""), "\"\"");
        assert_eq!(strip_quotes("\"A"), "\"A");
    }

    #[test]
    fn trailing_character_dropped_without_check() {
        assert_eq!(strip_quotes("\"ANALYSTS"), "ANALYST");
    }

    #[test]
    fn unquoted_values_are_kept() {
        assert_eq!(strip_quotes("SOFTWARE DEVELOPERS\""), "SOFTWARE DEVELOPERS\"");
    }

    #[test]
    fn certified_requires_exact_status_and_class() {
        let mut record = Record {
            status: "CERTIFIED",
            visa_class: Some("H-1B"),
            occupation_code: "15-1132",
            state_code: "CA",
        };
        assert!(record.is_certified());

        record.status = "CERTIFIED-WITHDRAWN";
        assert!(!record.is_certified());

        record.status = "CERTIFIED";
        record.visa_class = Some("H-2A");
        assert!(!record.is_certified());

        record.visa_class = None;
        assert!(!record.is_certified());

        record.visa_class = Some("E-3");
        record.state_code = "";
        assert!(!record.is_certified());
    }

    #[test]
    fn required_len_covers_highest_position() {
        let positions = FieldPositions {
            status: 2,
            visa_class: 7,
            occupation: 0,
            state: 3,
        };
        assert_eq!(positions.required_len(), 8);
    }

    #[test]
    fn config_defaults_and_validation() {
        assert_eq!(Config::default().max_rows, 10);
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        let config: Config = toml::from_str("max_rows = 3").unwrap();
        assert_eq!(config.max_rows, 3);
        assert!(Config { max_rows: 0 }.validate().is_err());
        assert!(toml::from_str::<Config>("rows = 3").is_err());
    }
}
