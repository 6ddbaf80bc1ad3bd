//! Named parameter rewriter using nom.
//!
//! A single left-to-right pass splits the query into segments: quoted
//! literals, `:name` placeholders, and everything else. Placeholders are
//! replaced by the driver's positional marker and their names are logged in
//! textual order.
//!
//! ```text
//! SELECT * FROM t WHERE a = :foo AND b = ':foo' AND c = :bar
//!                           ─┬──         ──┬───         ─┬──
//!                            │             │             └── Param("bar") → ?
//!                            │             └── Literal, copied verbatim
//!                            └── Param("foo") → ?
//! ```

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_till1, take_while1},
    character::complete::{anychar, char},
    combinator::{map, opt, recognize},
    multi::many0_count,
    sequence::{pair, preceded, tuple},
};
use std::fmt;
use std::str::FromStr;

use crate::error::NamedParamError;
use crate::registry::{self, ParamRegistry};
use crate::value::ParamValue;

/// The positional marker emitted in place of each named parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `?` for every occurrence (SQLite, MySQL, ODBC).
    #[default]
    Question,
    /// `$1`, `$2`, ... by occurrence index (PostgreSQL).
    Numbered,
}

impl PlaceholderStyle {
    fn write_marker(self, out: &mut String, index: usize) {
        match self {
            PlaceholderStyle::Question => out.push('?'),
            PlaceholderStyle::Numbered => {
                out.push('$');
                out.push_str(&index.to_string());
            }
        }
    }
}

impl fmt::Display for PlaceholderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderStyle::Question => write!(f, "question"),
            PlaceholderStyle::Numbered => write!(f, "numbered"),
        }
    }
}

impl FromStr for PlaceholderStyle {
    type Err = NamedParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "question" | "?" => Ok(PlaceholderStyle::Question),
            "numbered" | "$" => Ok(PlaceholderStyle::Numbered),
            other => Err(NamedParamError::Config(format!(
                "Unknown placeholder style '{}'. Expected: question or numbered",
                other
            ))),
        }
    }
}

/// A query with its named parameters rewritten to positional markers.
///
/// The scan runs once; the result never changes afterwards and can be
/// resolved against any number of registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    sql: String,
    occurrences: Vec<String>,
}

impl ParsedQuery {
    /// The rewritten query text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameter names, one per positional marker, in textual order.
    pub fn occurrences(&self) -> &[String] {
        &self.occurrences
    }

    pub fn param_count(&self) -> usize {
        self.occurrences.len()
    }

    pub fn has_params(&self) -> bool {
        !self.occurrences.is_empty()
    }

    /// Distinct parameter names in order of first appearance.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in &self.occurrences {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// Build the ordered value list for this query from `registry`.
    pub fn resolve(&self, registry: &ParamRegistry) -> Vec<Option<ParamValue>> {
        registry::resolve(&self.occurrences, registry)
    }

    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.sql, self.occurrences)
    }
}

/// Rewrite `raw` with `?` markers.
pub fn parse(raw: &str) -> ParsedQuery {
    parse_with(raw, PlaceholderStyle::Question)
}

/// Rewrite `raw` with the given marker style.
pub fn parse_with(raw: &str, style: PlaceholderStyle) -> ParsedQuery {
    let mut sql = String::with_capacity(raw.len());
    let mut occurrences = Vec::new();
    let mut rest = raw;

    while !rest.is_empty() {
        match segment(rest) {
            Ok((remaining, Segment::Text(text))) => {
                sql.push_str(text);
                rest = remaining;
            }
            Ok((remaining, Segment::Param(name))) => {
                occurrences.push(name.to_string());
                style.write_marker(&mut sql, occurrences.len());
                rest = remaining;
            }
            Err(_) => {
                // every non-empty input starts some segment
                sql.push_str(rest);
                break;
            }
        }
    }

    ParsedQuery { sql, occurrences }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Param(&'a str),
}

fn segment(input: &str) -> IResult<&str, Segment<'_>> {
    alt((
        map(parse_quoted_literal, Segment::Text),
        map(parse_placeholder, Segment::Param),
        map(parse_plain_text, Segment::Text),
        map(parse_escaped_quote, Segment::Text),
        // A backslash that escapes nothing.
        map(recognize(char('\\')), Segment::Text),
        // A colon not followed by an identifier character.
        map(recognize(char(':')), Segment::Text),
    ))(input)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse `:name`, returning the name without the colon.
fn parse_placeholder(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(is_identifier_char))(input)
}

/// Parse a run of text that can contain neither a literal nor a placeholder.
fn parse_plain_text(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == '\'' || c == ':' || c == '\\')(input)
}

/// Parse `\'` outside a literal: an escaped quote that opens nothing.
fn parse_escaped_quote(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('\\'), char('\'')))(input)
}

/// Parse a single-quoted literal, quotes included.
///
/// `\'` does not close the literal. An unterminated literal runs to the end
/// of the input.
fn parse_quoted_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        char('\''),
        many0_count(alt((
            take_till1(|c: char| c == '\'' || c == '\\'),
            recognize(pair(char('\\'), anychar)),
            recognize(char('\\')),
        ))),
        opt(char('\'')),
    )))(input)
}
