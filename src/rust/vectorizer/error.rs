use std::io;

/// Represents the different types of errors that can occur while building features.
#[derive(Debug, thiserror::Error)]
pub enum VectorizerError {
    /// Aggregation was asked to reduce zero vectors
    #[error("Cannot aggregate an empty vector list")]
    EmptyInput,
    /// Vectors of inconsistent length met somewhere in the pipeline
    #[error("Dimension mismatch for {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },
    /// An aggregation strategy name outside of max/min/mean
    #[error("Unknown aggregation strategy '{0}' (expected one of: max, min, mean)")]
    UnknownStrategy(String),
    /// Error occurred due to invalid input parameters
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// A malformed line in an embedding file
    #[error("Parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl VectorizerError {
    pub(crate) fn dimension_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}
