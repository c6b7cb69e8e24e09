//! Per-date attendance for a class roster, kept in an `.xlsx` workbook.
//!
//! [`AttendanceTable`] holds the sheet in memory, [`Session`] drives the
//! console prompts, and the workbook is written back with a "Detained" column
//! derived from this session's marks.

pub mod calendar;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod session;
pub mod table;
pub mod workbook;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{Status, Student, StudentRecord};
pub use session::Session;
pub use table::AttendanceTable;
