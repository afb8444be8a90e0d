//! Error types for preprocessing operations.

use std::fmt;

/// Error type for preprocessing operations.
#[derive(Debug)]
pub enum PreprocessingError {
    /// Empty data provided where non-empty was required.
    EmptyData(String),
    /// Invalid hyperparameter or malformed input.
    InvalidParameter(String),
    /// Feature dimension mismatch between fit and transform.
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// A column the fitted plan was built for is absent from the table.
    MissingColumn(String),
    /// A category unseen at fit time, under the erroring unknown policy.
    UnknownCategory { column: usize, value: String },
    /// Serialization or deserialization error.
    SerializationError(String),
    /// I/O error during file operations.
    IoError(String),
    /// A failure wrapped with the column it occurred in.
    InColumn {
        name: String,
        index: usize,
        source: Box<PreprocessingError>,
    },
}

impl PreprocessingError {
    /// Wrap an error with the column it occurred in.
    pub fn in_column(name: impl Into<String>, index: usize, source: PreprocessingError) -> Self {
        PreprocessingError::InColumn {
            name: name.into(),
            index,
            source: Box::new(source),
        }
    }
}

impl fmt::Display for PreprocessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessingError::EmptyData(msg) => write!(f, "Empty data: {}", msg),
            PreprocessingError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PreprocessingError::FeatureMismatch {
                expected_features,
                got_features,
            } => write!(
                f,
                "Feature mismatch: expected {} features, got {}",
                expected_features, got_features
            ),
            PreprocessingError::MissingColumn(name) => {
                write!(f, "Missing column: `{}`", name)
            }
            PreprocessingError::UnknownCategory { column, value } => {
                write!(f, "Unknown category `{}` in column {}", value, column)
            }
            PreprocessingError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            PreprocessingError::IoError(msg) => write!(f, "I/O error: {}", msg),
            PreprocessingError::InColumn { name, index, source } => {
                write!(f, "column `{}` (index {}): {}", name, index, source)
            }
        }
    }
}

impl std::error::Error for PreprocessingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PreprocessingError::InColumn { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PreprocessingError {
    fn from(err: std::io::Error) -> Self {
        PreprocessingError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}
