//! Loading result rows and rule lists from disk.

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::RuletableError;
use crate::Result;

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| RuletableError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Read result rows from a JSON file.
///
/// The file holds an array of rows; a single top-level object is read as
/// one row.
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let text = read_text(path)?;
    let value: Value = serde_json::from_str(&text).map_err(|source| RuletableError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = match value {
        Value::Array(rows) => rows,
        row @ Value::Object(_) => vec![row],
        other => {
            return Err(RuletableError::InvalidInput(format!(
                "expected an array of rows in '{}', found {}",
                path.display(),
                json_kind(&other)
            )))
        }
    };
    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded rows");
    Ok(rows)
}

/// Read a rule list.
///
/// Accepts a JSON array of strings, or plain text with one rule per
/// non-blank line.
pub fn read_rules(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = read_text(path)?;

    let rules = if text.trim_start().starts_with('[') {
        serde_json::from_str(&text).map_err(|source| RuletableError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        parse_rule_lines(&text)
    };
    tracing::debug!(path = %path.display(), rules = rules.len(), "loaded rules");
    Ok(rules)
}

/// Split text into rules, one per non-blank line
pub fn parse_rule_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
