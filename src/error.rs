use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetricsError>;

/// Failure to interpret text a kernel pseudo-file actually contained.
///
/// Absent files and absent keys are not errors; readers report those as
/// `None` so callers can tell "unavailable" apart from "zero".
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("{}: {what}: expected a number, found `{token}`", .file.display())]
    Malformed {
        file: PathBuf,
        what: &'static str,
        token: String,
    },

    #[error("{}: cpu line has {got} counters, expected at least {need}", .file.display())]
    Truncated {
        file: PathBuf,
        need: usize,
        got: usize,
    },
}
