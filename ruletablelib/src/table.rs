//! Row reshaping and table-ready data structures.
//!
//! The data flow is:
//! 1. Source rows (any caller type, or JSON objects)
//! 2. ColumnMap (output key -> extractor, in display order)
//! 3. FormattedRow / ResultTable (rounded cells, ready for rendering)

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::value::{try_round, CellValue};

/// Boxed extractor pulling one cell out of a source row.
pub type Extractor<'f, R> = Box<dyn Fn(&R) -> CellValue + 'f>;

/// Ordered mapping from output column key to extractor.
///
/// Keys keep the order in which they were first added. Adding a key
/// again replaces its extractor without moving the column.
pub struct ColumnMap<'f, R> {
    columns: Vec<(String, Extractor<'f, R>)>,
}

impl<'f, R> ColumnMap<'f, R> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Builder: add a column
    pub fn column<F, V>(mut self, key: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&R) -> V + 'f,
        V: Into<CellValue>,
    {
        self.insert(key, extract);
        self
    }

    /// Add a column, or replace the extractor of an existing key
    pub fn insert<F, V>(&mut self, key: impl Into<String>, extract: F)
    where
        F: Fn(&R) -> V + 'f,
        V: Into<CellValue>,
    {
        let key = key.into();
        let extractor: Extractor<'f, R> = Box::new(move |row: &R| extract(row).into());
        match self.columns.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = extractor,
            None => self.columns.push((key, extractor)),
        }
    }

    /// Column keys in display order
    pub fn keys(&self) -> Vec<&str> {
        self.columns.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Reshape a single row, rounding each extracted value
    pub fn apply(&self, row: &R) -> FormattedRow {
        FormattedRow {
            cells: self
                .columns
                .iter()
                .map(|(key, extract)| (key.clone(), try_round(extract(row), None)))
                .collect(),
        }
    }
}

impl<R> Default for ColumnMap<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for ColumnMap<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnMap")
            .field("keys", &self.keys())
            .finish()
    }
}

/// A reshaped row: cells keyed by column, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattedRow {
    cells: Vec<(String, CellValue)>,
}

impl FormattedRow {
    /// Look up a cell by column key
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Serialized as a JSON object with keys in column order.
impl Serialize for FormattedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Reshape rows through a column map.
///
/// Produces one output row per input row, in input order. Every output
/// row has exactly the map's keys, in map order, and each value is the
/// extractor's result passed through [`try_round`] with the default
/// precision.
pub fn reformat<R>(columns: &ColumnMap<'_, R>, rows: &[R]) -> Vec<FormattedRow> {
    let table: Vec<FormattedRow> = rows.iter().map(|row| columns.apply(row)).collect();
    tracing::debug!(
        rows = table.len(),
        columns = columns.len(),
        "reshaped rows"
    );
    table
}

/// Table-ready data.
///
/// This is the final data structure before presentation. Renderers
/// iterate over headers and rows and only apply layout.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultTable {
    /// Optional caption (e.g., "Derivability vs. Herbie")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Column headers, one per column key
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<FormattedRow>,
}

impl ResultTable {
    /// Reshape `rows` and keep the column keys as headers
    pub fn from_rows<R>(columns: &ColumnMap<'_, R>, rows: &[R]) -> Self {
        ResultTable {
            title: None,
            headers: columns.keys().into_iter().map(str::to_string).collect(),
            rows: reformat(columns, rows),
        }
    }

    /// Builder: set the caption
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Cell text of every row, in header order
    pub fn cell_texts(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .map(|h| row.get(h).map(ToString::to_string).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}
