//! Error types for the toolkit

use thiserror::Error;

/// Toolkit error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Text rendering error
    #[error("formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// A referenced column does not exist in the frame
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// A column exists but holds the wrong kind of values
    #[error("column '{column}' is not {expected}")]
    ColumnType {
        /// Column name
        column: String,
        /// Expected kind ("numeric" or "text")
        expected: &'static str,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error (singular design, non-finite estimates)
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_not_found_names_the_column() {
        let e = Error::ColumnNotFound("tyr05_n".into());
        assert_eq!(e.to_string(), "column not found: tyr05_n");
    }

    #[test]
    fn column_type_message() {
        let e = Error::ColumnType { column: "code".into(), expected: "numeric" };
        assert_eq!(e.to_string(), "column 'code' is not numeric");
    }
}
