//! # named-param — Named parameters for positional SQL drivers
//!
//! Write `:name` placeholders; send the driver `?` markers and an argument
//! list in the right order.
//!
//! ## Quick Example
//!
//! ```rust
//! use named_param::prelude::*;
//!
//! let mut query = NamedQuery::new("SELECT * FROM table WHERE col1 = ':literal' AND col2 = :literal");
//! query.set_value("literal", "x");
//!
//! assert_eq!(query.sql(), "SELECT * FROM table WHERE col1 = ':literal' AND col2 = ?");
//! assert_eq!(query.parameters(), vec![Some(ParamValue::from("x"))]);
//! ```
//!
//! ## Layers
//!
//! | Module     | Role                                                    |
//! |------------|---------------------------------------------------------|
//! | `parser`   | Single-pass rewrite of `:name` to positional markers    |
//! | `registry` | Name → value map, and ordered resolution of occurrences |
//! | `query`    | A parsed query paired with its registry                 |
//! | `args`     | Map or flat `name, value, ...` caller arguments         |
//! | `engine`   | sqlx decorators: pool, connection, transaction, statement |

pub mod args;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod query;
pub mod registry;
pub mod value;

pub use args::Arguments;
pub use error::{NamedParamError, NamedParamResult};
pub use query::NamedQuery;
pub use value::ParamValue;

pub mod prelude {
    pub use crate::args::Arguments;
    pub use crate::config::{Config, ConfigBuilder};
    pub use crate::engine::{NamedConnection, NamedDb, NamedStatement, NamedTransaction, Row};
    pub use crate::error::*;
    pub use crate::parser::{ParsedQuery, PlaceholderStyle, parse, parse_with};
    pub use crate::query::NamedQuery;
    pub use crate::registry::{ParamRegistry, resolve};
    pub use crate::value::ParamValue;
    pub use crate::params;
}

/// Rewrite a named-parameter query to `?` markers.
///
/// # Example
///
/// ```
/// use named_param::parse;
///
/// let parsed = parse("SELECT * FROM table WHERE col1 IN (:something, :else)");
/// assert_eq!(parsed.sql(), "SELECT * FROM table WHERE col1 IN (?, ?)");
/// assert_eq!(parsed.occurrences(), ["something", "else"]);
/// ```
pub fn parse(input: &str) -> parser::ParsedQuery {
    parser::parse(input)
}
