//! Error types for the attendance library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, mutating or persisting attendance data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An existing workbook could not be parsed.
    #[error("failed to read workbook {path}: {message}")]
    WorkbookRead { path: PathBuf, message: String },

    #[error("failed to update workbook {path}: {message}")]
    WorkbookUpdate { path: PathBuf, message: String },

    #[error("failed to write workbook: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("roster CSV error: {0}")]
    Roster(#[from] csv::Error),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("student {0:?} has no roll number")]
    MissingRollNumber(String),

    #[error("invalid attendance status: {0:?}")]
    InvalidStatus(String),

    /// Input ended while a date's roster was still being marked.
    #[error("input ended before attendance for {0} was complete")]
    UnexpectedEof(String),
}

pub type Result<T> = std::result::Result<T, Error>;
