//! Typed error taxonomy for report builds.
//!
//! Every variant aborts the run before a report file is produced. The binary
//! is the only place these are printed; library code propagates them with `?`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Input file missing, unreadable, or permission denied.
    #[error("cannot read {}: {source}", .path.display())]
    DataAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input file readable but not well-formed CSV.
    #[error("{table} export is not valid CSV: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    /// An expected column is absent from an input table.
    #[error("{table} export is missing expected column `{column}`")]
    Schema {
        table: &'static str,
        column: &'static str,
    },

    /// A cell failed its declared per-column parse.
    #[error("{table} row {row}, column `{column}`: cannot parse `{value}`: {reason}")]
    Format {
        table: &'static str,
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },

    /// The final report write failed.
    #[error("cannot write report {}: {source}", .path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
