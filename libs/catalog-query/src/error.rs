//! Error types for query parsing

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, QueryError>;

/// Client-input validation failures.
///
/// Every variant describes something wrong with the request itself, so the
/// message is safe to echo back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("malformed {0} parameter")]
    Malformed(&'static str),

    #[error("parameter '{0}' must not appear more than once")]
    Repeated(&'static str),

    #[error("malformed filter '{0}', expected field:value")]
    FilterSyntax(String),

    #[error("malformed sort '{0}', expected field:direction")]
    SortSyntax(String),

    #[error("unknown sort direction '{0}', expected asc or desc")]
    SortDirection(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("invalid value '{value}' for integer field '{field}'")]
    FieldValue { field: &'static str, value: String },

    #[error("invalid escape sequence in '{0}'")]
    Escape(String),

    #[error("size {size} exceeds the maximum of {max}")]
    SizeTooLarge { size: usize, max: usize },

    #[error("from + size = {requested} exceeds the result window of {max}")]
    WindowTooLarge { requested: usize, max: usize },
}
