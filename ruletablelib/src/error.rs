//! Error types for ruletablelib
//!
//! The formatting helpers themselves never fail. Errors only come from
//! loading input files and parsing column specifications.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or describing table data
#[derive(Error, Debug)]
pub enum RuletableError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File contents are not valid JSON
    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Input parsed but does not have the expected shape
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Malformed `KEY=PATH[:FORMAT]` column specification
    #[error("invalid column spec '{spec}': {message}")]
    InvalidColumnSpec { spec: String, message: String },

    /// Unknown output format name
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
}
