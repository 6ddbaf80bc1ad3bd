//! A parsed query paired with the registry that feeds it.

use serde::Serialize;

use crate::error::NamedParamResult;
use crate::parser::{self, ParsedQuery, PlaceholderStyle};
use crate::registry::ParamRegistry;
use crate::value::ParamValue;

/// A named-parameter query ready to be bound and executed.
///
/// The query text is scanned once, on construction. Values can be set and
/// reset any number of times; each call to [`NamedQuery::parameters`] reflects
/// the registry as it is at that moment.
///
/// # Example
///
/// ```
/// use named_param::{NamedQuery, ParamValue};
///
/// let mut query = NamedQuery::new("SELECT * FROM t WHERE a = :foo AND b = :bar AND c = :foo");
/// query.set_value("foo", "something");
/// query.set_value("bar", "else");
///
/// assert_eq!(query.sql(), "SELECT * FROM t WHERE a = ? AND b = ? AND c = ?");
/// assert_eq!(
///     query.parameters(),
///     vec![
///         Some(ParamValue::from("something")),
///         Some(ParamValue::from("else")),
///         Some(ParamValue::from("something")),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NamedQuery {
    parsed: ParsedQuery,
    registry: ParamRegistry,
}

impl NamedQuery {
    pub fn new(raw: &str) -> Self {
        Self::with_style(raw, PlaceholderStyle::default())
    }

    pub fn with_style(raw: &str, style: PlaceholderStyle) -> Self {
        let parsed = parser::parse_with(raw, style);
        tracing::debug!(
            "Parsed named query: {} parameter occurrence(s) in {} bytes",
            parsed.param_count(),
            raw.len()
        );
        Self::from_parsed(parsed)
    }

    pub fn from_parsed(parsed: ParsedQuery) -> Self {
        Self {
            parsed,
            registry: ParamRegistry::new(),
        }
    }

    /// The query text with positional markers.
    pub fn sql(&self) -> &str {
        self.parsed.sql()
    }

    pub fn occurrences(&self) -> &[String] {
        self.parsed.occurrences()
    }

    pub fn parsed(&self) -> &ParsedQuery {
        &self.parsed
    }

    pub fn registry(&self) -> &ParamRegistry {
        &self.registry
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.registry.set_value(name, value);
    }

    pub fn set_values_from_map<K, V, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        self.registry.set_values_from_map(entries);
    }

    pub fn set_values_from_record<T: Serialize + ?Sized>(
        &mut self,
        record: &T,
    ) -> NamedParamResult<()> {
        self.registry.set_values_from_record(record)
    }

    /// Drop every bound value, keeping the parsed text.
    pub fn clear_values(&mut self) {
        self.registry.clear();
    }

    /// One value per positional marker; `None` where the name was never set.
    pub fn parameters(&self) -> Vec<Option<ParamValue>> {
        self.parsed.resolve(&self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct Case {
        name: &'static str,
        query: &'static str,
        params: Vec<(&'static str, ParamValue)>,
        expected: Vec<ParamValue>,
    }

    fn cases() -> Vec<Case> {
        vec![
            Case {
                name: "single string parameter",
                query: "SELECT * FROM table WHERE col1 = :foo",
                params: vec![("foo", "bar".into())],
                expected: vec!["bar".into()],
            },
            Case {
                name: "two string parameters",
                query: "SELECT * FROM table WHERE col1 = :foo AND col2 = :foo2",
                params: vec![("foo", "bar".into()), ("foo2", "bart".into())],
                expected: vec!["bar".into(), "bart".into()],
            },
            Case {
                name: "twice occurring parameter",
                query: "SELECT * FROM table WHERE col1 = :foo AND col2 = :foo",
                params: vec![("foo", "bar".into())],
                expected: vec!["bar".into(), "bar".into()],
            },
            Case {
                name: "parameter typing",
                query: "SELECT * FROM table WHERE col1 = :str AND col2 = :int AND col3 = :pi",
                params: vec![
                    ("str", "foo".into()),
                    ("int", 1.into()),
                    ("pi", 2.75.into()),
                ],
                expected: vec!["foo".into(), ParamValue::Int(1), ParamValue::Float(2.75)],
            },
            Case {
                name: "parameter ordering",
                query: "SELECT * FROM table WHERE col1 = :foo AND col2 = :bar AND col3 = :foo AND col4 = :foo AND col5 = :bar",
                params: vec![("foo", "something".into()), ("bar", "else".into())],
                expected: vec![
                    "something".into(),
                    "else".into(),
                    "something".into(),
                    "something".into(),
                    "else".into(),
                ],
            },
            Case {
                name: "parameter case sensitivity",
                query: "SELECT * FROM table WHERE col1 = :foo AND col2 = :FOO",
                params: vec![("foo", "baz".into()), ("FOO", "quux".into())],
                expected: vec!["baz".into(), "quux".into()],
            },
        ]
    }

    #[test]
    fn test_parameter_replacement_by_value() {
        for case in cases() {
            let mut query = NamedQuery::new(case.query);
            for (name, value) in &case.params {
                query.set_value(*name, value.clone());
            }
            let expected: Vec<_> = case.expected.into_iter().map(Some).collect();
            assert_eq!(query.parameters(), expected, "{}", case.name);
        }
    }

    #[test]
    fn test_parameter_replacement_by_map() {
        for case in cases() {
            let mut query = NamedQuery::new(case.query);
            let map: HashMap<&str, ParamValue> = case.params.into_iter().collect();
            query.set_values_from_map(map);
            let expected: Vec<_> = case.expected.into_iter().map(Some).collect();
            assert_eq!(query.parameters(), expected, "{}", case.name);
        }
    }

    #[derive(Serialize)]
    #[allow(non_snake_case)]
    struct SingleParameter {
        Foo: &'static str,
        Bar: &'static str,
        Baz: i64,
        #[serde(skip)]
        #[allow(dead_code)]
        unexported: &'static str,
        #[serde(skip)]
        #[allow(dead_code)]
        notExported: i64,
    }

    fn single() -> SingleParameter {
        SingleParameter {
            Foo: "foo",
            Bar: "bar",
            Baz: 15,
            unexported: "nothing",
            notExported: -1,
        }
    }

    #[test]
    fn test_record_replacement() {
        let mut query =
            NamedQuery::new("SELECT * FROM table WHERE col1 = :Foo AND col2 = :Bar AND col3 = :Baz");
        query.set_values_from_record(&single()).unwrap();
        assert_eq!(
            query.parameters(),
            vec![
                Some(ParamValue::from("foo")),
                Some(ParamValue::from("bar")),
                Some(ParamValue::Int(15)),
            ]
        );
    }

    #[test]
    fn test_recurring_record_replacement() {
        let mut query = NamedQuery::new(
            "SELECT * FROM table WHERE col1 = :Foo AND col2 = :Bar AND col3 = :Foo AND col4 = :Foo AND col5 = :Baz",
        );
        query.set_values_from_record(&single()).unwrap();
        assert_eq!(
            query.parameters(),
            vec![
                Some(ParamValue::from("foo")),
                Some(ParamValue::from("bar")),
                Some(ParamValue::from("foo")),
                Some(ParamValue::from("foo")),
                Some(ParamValue::Int(15)),
            ]
        );
    }

    #[test]
    fn test_skipped_record_fields_resolve_unset() {
        let mut query = NamedQuery::new(
            "SELECT * FROM table WHERE col1 = :unexported AND col2 = :notExported AND col3 = :Foo",
        );
        query.set_values_from_record(&single()).unwrap();
        assert_eq!(
            query.parameters(),
            vec![None, None, Some(ParamValue::from("foo"))]
        );
    }

    #[test]
    fn test_reuse_across_registries() {
        let mut query = NamedQuery::new("SELECT * FROM t WHERE id = :id");
        query.set_value("id", 1);
        assert_eq!(query.parameters(), vec![Some(ParamValue::Int(1))]);

        query.set_value("id", 2);
        assert_eq!(query.parameters(), vec![Some(ParamValue::Int(2))]);

        query.clear_values();
        assert_eq!(query.parameters(), vec![None]);
        assert_eq!(query.sql(), "SELECT * FROM t WHERE id = ?");
    }

    #[test]
    fn test_numbered_style() {
        let mut query = NamedQuery::with_style(
            "UPDATE t SET a = :a WHERE b = :b",
            PlaceholderStyle::Numbered,
        );
        query.set_values_from_map([("a", 1), ("b", 2)]);
        assert_eq!(query.sql(), "UPDATE t SET a = $1 WHERE b = $2");
        assert_eq!(
            query.parameters(),
            vec![Some(ParamValue::Int(1)), Some(ParamValue::Int(2))]
        );
    }
}
