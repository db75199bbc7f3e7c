//! Rendering and formatting options.
//!
//! This module contains the configuration types that control how tables
//! are produced and printed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RuletableError;
use crate::rules::LINE_BREAK;

/// How a finished table is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Aligned text table (default)
    #[default]
    Table,
    /// JSON array of row objects
    Json,
    /// Comma-separated values with a header line
    Csv,
}

impl OutputFormat {
    /// Names accepted on the command line
    pub const NAMES: [&'static str; 3] = ["table", "json", "csv"];
}

impl FromStr for OutputFormat {
    type Err = RuletableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(RuletableError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// Options for turning raw values into cell text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Separator placed between rules of a formatted rule list
    pub rule_separator: String,
    /// Fraction digits for fractional numbers in `value` columns
    /// (`None` keeps the default of two)
    pub precision: Option<u32>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            rule_separator: LINE_BREAK.to_string(),
            precision: None,
        }
    }
}

impl FormatOptions {
    /// Create default options (`<br />` between rules)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the rule separator
    pub fn rule_separator(mut self, separator: impl Into<String>) -> Self {
        self.rule_separator = separator.into();
        self
    }

    /// Builder: set the precision of `value` columns
    pub fn precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!(matches!(
            "yaml".parse::<OutputFormat>(),
            Err(RuletableError::UnknownFormat(name)) if name == "yaml"
        ));
    }

    #[test]
    fn test_output_format_round_trips_names() {
        for name in OutputFormat::NAMES {
            let format: OutputFormat = name.parse().unwrap();
            assert_eq!(format.to_string(), name);
        }
    }

    #[test]
    fn test_format_options_builder() {
        assert_eq!(FormatOptions::new().rule_separator, "<br />");
        assert_eq!(FormatOptions::new().rule_separator("\n").rule_separator, "\n");
        assert_eq!(FormatOptions::new().precision, None);
        assert_eq!(FormatOptions::new().precision(Some(4)).precision, Some(4));
    }
}
