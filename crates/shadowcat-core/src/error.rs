//! Error types for shadowcat

use thiserror::Error;

/// Main error type for parsing and constructing shadow-test data.
///
/// Every variant is raised synchronously at the point of parsing or
/// construction. Nothing is retried internally and no partially built value
/// is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShadowCatError {
    /// A required column name is absent from a table header.
    #[error("Column not found: {column}")]
    ColumnNotFound { column: String },

    /// Numeric text in a bound or attribute field could not be parsed.
    #[error("Invalid numeric value in column {column}: {value:?}")]
    NumericField { column: String, value: String },

    /// FilterAttr, FilterLogic and FilterData disagree on element count.
    #[error(
        "Filter arity mismatch: {attributes} attributes, {logics} logics, {datasets} datasets"
    )]
    FilterArityMismatch {
        attributes: usize,
        logics: usize,
        datasets: usize,
    },

    /// A filter logic token other than "Bounds" or "Set".
    #[error("Unknown filter logic {logic:?} for attribute {attribute}")]
    UnknownFilterLogic { attribute: String, logic: String },

    /// A solver status code outside the fixed wire table.
    #[error("Unknown solver status code: {0}")]
    UnknownSolverStatus(i32),

    /// Inconsistent configuration or structurally malformed input.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ShadowCatError {
    pub(crate) fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    pub(crate) fn numeric_field(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NumericField {
            column: column.into(),
            value: value.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Result type alias for shadowcat operations
pub type Result<T> = std::result::Result<T, ShadowCatError>;
