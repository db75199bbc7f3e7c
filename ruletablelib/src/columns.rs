//! Column specifications over JSON rows.
//!
//! A column is written as `KEY=PATH[:FORMAT]`, for example
//! `derive=results.derive:derivability`. The path walks object keys and
//! array indices; `.` selects the whole row.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::RuletableError;
use crate::options::FormatOptions;
use crate::percent::{get_derivability, Derivability};
use crate::rules::format_rules_with;
use crate::table::ColumnMap;
use crate::value::{try_round, CellValue};

/// How the value found at a column's path is turned into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnFormat {
    /// The value itself (numbers get rounded)
    #[default]
    Value,
    /// Percentage of derivable rules in a `{can, cannot}` object
    Derivability,
    /// Rule list with bidirectional pairs merged
    Rules,
    /// Number of elements of an array, object or string
    Count,
}

impl FromStr for ColumnFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "value" | "raw" => Ok(ColumnFormat::Value),
            "derivability" | "derive" => Ok(ColumnFormat::Derivability),
            "rules" => Ok(ColumnFormat::Rules),
            "count" | "len" => Ok(ColumnFormat::Count),
            _ => Err(format!("Unknown column format: {}", s)),
        }
    }
}

impl fmt::Display for ColumnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnFormat::Value => "value",
            ColumnFormat::Derivability => "derivability",
            ColumnFormat::Rules => "rules",
            ColumnFormat::Count => "count",
        };
        f.write_str(name)
    }
}

/// One output column: key, where to find its value, and how to format it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Output column key
    pub key: String,
    /// Path segments into the row; empty means the whole row
    pub path: Vec<String>,
    /// Formatting applied to the value found
    pub format: ColumnFormat,
}

impl ColumnSpec {
    /// Create a spec from a dotted path
    pub fn new(
        key: impl Into<String>,
        path: &str,
        format: ColumnFormat,
    ) -> Result<Self, RuletableError> {
        let key = key.into();
        let path = parse_path(path).map_err(|message| RuletableError::InvalidColumnSpec {
            spec: format!("{}={}", key, path),
            message,
        })?;
        Ok(Self { key, path, format })
    }

    /// Find the value this column points at
    pub fn lookup<'v>(&self, row: &'v Value) -> Option<&'v Value> {
        self.path.iter().try_fold(row, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Produce the cell for a row.
    ///
    /// `value` columns are rounded here when the options carry a
    /// precision; otherwise rounding is left to [`reformat`](crate::table::reformat).
    pub fn extract(&self, row: &Value, options: &FormatOptions) -> CellValue {
        let found = self.lookup(row);
        match self.format {
            ColumnFormat::Value => {
                let cell = found.map_or(CellValue::Null, CellValue::from);
                match options.precision {
                    Some(_) => try_round(cell, options.precision),
                    None => cell,
                }
            }
            ColumnFormat::Derivability => {
                let record = found
                    .and_then(|v| serde_json::from_value::<Derivability<Value>>(v.clone()).ok());
                CellValue::Text(get_derivability(record.as_ref()))
            }
            ColumnFormat::Rules => {
                let rules: Option<Vec<String>> = found.and_then(Value::as_array).map(|items| {
                    items
                        .iter()
                        .map(|item| match item {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect()
                });
                CellValue::Text(format_rules_with(
                    rules.as_deref(),
                    &options.rule_separator,
                ))
            }
            ColumnFormat::Count => match found {
                Some(Value::Array(items)) => CellValue::from(items.len()),
                Some(Value::Object(map)) => CellValue::from(map.len()),
                Some(Value::String(s)) => CellValue::from(s.chars().count()),
                _ => CellValue::Null,
            },
        }
    }
}

fn parse_path(path: &str) -> Result<Vec<String>, String> {
    let path = path.trim();
    if path.is_empty() {
        return Err("empty path".to_string());
    }
    if path == "." {
        return Ok(Vec::new());
    }
    path.split('.')
        .map(|segment| {
            if segment.is_empty() {
                Err(format!("empty segment in path '{}'", path))
            } else {
                Ok(segment.to_string())
            }
        })
        .collect()
}

impl FromStr for ColumnSpec {
    type Err = RuletableError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = |message: String| RuletableError::InvalidColumnSpec {
            spec: spec.to_string(),
            message,
        };

        let (key, rest) = spec
            .split_once('=')
            .ok_or_else(|| invalid("expected KEY=PATH[:FORMAT]".to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(invalid("empty key".to_string()));
        }

        let (path, format) = match rest.rsplit_once(':') {
            Some((path, format)) => (path, format.trim().parse().map_err(invalid)?),
            None => (rest, ColumnFormat::Value),
        };
        let path = parse_path(path).map_err(invalid)?;

        Ok(ColumnSpec {
            key: key.to_string(),
            path,
            format,
        })
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            ".".to_string()
        } else {
            self.path.join(".")
        };
        write!(f, "{}={}:{}", self.key, path, self.format)
    }
}

/// Build a column map over JSON rows from textual specs.
pub fn json_column_map(specs: &[ColumnSpec], options: &FormatOptions) -> ColumnMap<'static, Value> {
    let mut columns = ColumnMap::new();
    for spec in specs {
        let extractor = spec.clone();
        let options = options.clone();
        columns.insert(spec.key.clone(), move |row: &Value| {
            extractor.extract(row, &options)
        });
    }
    columns
}
