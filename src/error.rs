//! The uniform error type surfaced by the transformation and inference
//! drivers.
//!
//! Every failure leaving a driver carries the operation that failed and,
//! where one exists, the original cause (reachable through
//! [`std::error::Error::source`]). There is no partial-success state: a
//! driver either returns its full result or one of these.

use crate::preprocessing::PreprocessingError;
use std::fmt;
use std::path::PathBuf;

/// Error returned by the pipeline drivers.
#[derive(Debug)]
pub enum PipelineError {
    /// A column required by the schema is absent from the input table.
    MissingColumn { column: String },
    /// A cell that must hold a value is empty.
    MissingValue { column: String, row: usize },
    /// A cell could not be parsed as the declared column type.
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },
    /// CSV reading failed.
    Csv { path: PathBuf, source: csv::Error },
    /// File I/O failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Writing or reading a persisted artifact failed.
    Artifact {
        op: &'static str,
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A preprocessing step failed.
    Preprocessing {
        op: &'static str,
        source: PreprocessingError,
    },
    /// Produced data has an unexpected shape.
    ShapeMismatch {
        op: &'static str,
        expected: usize,
        got: usize,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MissingColumn { column } => {
                write!(f, "required column `{}` is missing from the input table", column)
            }
            PipelineError::MissingValue { column, row } => {
                write!(f, "column `{}` has no value at row {}", column, row)
            }
            PipelineError::InvalidValue { column, row, value } => {
                write!(
                    f,
                    "column `{}` row {}: `{}` is not a valid value for the declared type",
                    column, row, value
                )
            }
            PipelineError::Csv { path, source } => {
                write!(f, "failed to read CSV {}: {}", path.display(), source)
            }
            PipelineError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            PipelineError::Artifact { op, path, source } => {
                write!(f, "failed to {} artifact {}: {}", op, path.display(), source)
            }
            PipelineError::Preprocessing { op, source } => {
                write!(f, "{} failed: {}", op, source)
            }
            PipelineError::ShapeMismatch { op, expected, got } => {
                write!(f, "{}: expected {} rows, got {}", op, expected, got)
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Csv { source, .. } => Some(source),
            PipelineError::Io { source, .. } => Some(source),
            PipelineError::Artifact { source, .. } => Some(source.as_ref()),
            PipelineError::Preprocessing { source, .. } => Some(source),
            PipelineError::MissingColumn { .. }
            | PipelineError::MissingValue { .. }
            | PipelineError::InvalidValue { .. }
            | PipelineError::ShapeMismatch { .. } => None,
        }
    }
}
