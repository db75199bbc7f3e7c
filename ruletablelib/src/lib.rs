//! # ruletablelib
//!
//! Formatting helpers for the evaluation tables of a rewrite-rule
//! inference tool.
//!
//! ## Overview
//!
//! Result tables compare inferred rulesets: how long inference took, how
//! many rules came out, and what share of another ruleset they can derive.
//! This library turns those raw numbers and rule lists into display text:
//!
//! - **Rounding**: fractional numbers become fixed-point text, integers stay numbers
//! - **Percentages**: ratios with a fixed number of decimals, `100%` for equal operands
//! - **Derivability**: share of derivable rules in a `{can, cannot}` record
//! - **Rule lists**: `a ==> b` and `b ==> a` collapse into one `a <=> b` line
//! - **Row reshaping**: source rows mapped to output columns through extractors
//!
//! All helpers are pure. Missing data shows up as `-`, never as an error.
//!
//! ## Example
//!
//! ```rust
//! use ruletablelib::{format_rules, get_derivability, reformat, try_round};
//! use ruletablelib::{CellValue, ColumnMap, Derivability};
//!
//! assert_eq!(try_round(2.345, None), CellValue::text("2.35"));
//! assert_eq!(format_rules(Some(&["a ==> b", "b ==> a"][..])), "a <=> b");
//!
//! let record = Derivability::new(vec!["x", "y"], vec!["z", "w"]);
//! assert_eq!(get_derivability(Some(&record)), "50.0%");
//!
//! struct Run {
//!     domain: &'static str,
//!     seconds: f64,
//! }
//!
//! let columns = ColumnMap::new()
//!     .column("Domain", |r: &Run| r.domain)
//!     .column("Time (s)", |r: &Run| r.seconds);
//! let rows = reformat(&columns, &[Run { domain: "bv4", seconds: 3.14159 }]);
//! assert_eq!(rows[0].get("Time (s)"), Some(&CellValue::text("3.14")));
//! ```

pub mod columns;
pub mod error;
pub mod input;
pub mod options;
pub mod percent;
pub mod rules;
pub mod table;
pub mod value;

pub use columns::{json_column_map, ColumnFormat, ColumnSpec};
pub use error::RuletableError;
pub use input::{parse_rule_lines, read_rows, read_rules};
pub use options::{FormatOptions, OutputFormat};
pub use percent::{get_derivability, to_percentage, Derivability, MISSING};
pub use rules::{format_rules, format_rules_with, merge_rules, PrettyRule, LINE_BREAK};
pub use table::{reformat, ColumnMap, Extractor, FormattedRow, ResultTable};
pub use value::{
    effective_precision, to_fixed, try_round, CellValue, DEFAULT_PRECISION, MAX_FIXED_DIGITS,
};

/// Result type for ruletablelib operations
pub type Result<T> = std::result::Result<T, RuletableError>;
