//! Error types for named-param.
//!
//! Parsing and resolution never fail; every variant here belongs to the
//! argument conversion, record binding, config and database layers.

use thiserror::Error;

/// The main error type for named-param operations.
#[derive(Debug, Error)]
pub enum NamedParamError {
    /// A flat name/value argument list had an odd number of entries.
    #[error(
        "Number of arguments passed to parameterized query is not correct: got {0}, expected an even number of arguments"
    )]
    OddArgumentCount(usize),

    /// A name slot in a flat argument list was not a string.
    #[error("Parameter representing a key needs to be a string (argument {position})")]
    NonStringKey { position: usize },

    /// A named parameter in the query had no bound value.
    #[error("No value bound for parameter ':{0}'")]
    MissingParameter(String),

    /// A value passed as a record did not serialize to named fields.
    #[error("Value cannot be bound as a record: {0}")]
    NotARecord(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NamedParamError {
    /// Create a non-string key error for the argument at `position`.
    pub fn non_string_key(position: usize) -> Self {
        Self::NonStringKey { position }
    }

    /// Create a missing parameter error.
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }
}

impl From<sqlx::Error> for NamedParamError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<toml::de::Error> for NamedParamError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result type alias for named-param operations.
pub type NamedParamResult<T> = Result<T, NamedParamError>;
