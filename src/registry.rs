//! Parameter registry and output builder.
//!
//! The registry maps case-sensitive names to values. `resolve` walks an
//! occurrence log against it and yields one entry per positional marker;
//! `None` marks a name that was never set, which is distinct from a name
//! set to `ParamValue::Null`.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::{NamedParamError, NamedParamResult};
use crate::value::ParamValue;

/// Name to value mapping consulted when building the ordered value list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamRegistry {
    values: HashMap<String, ParamValue>,
}

impl ParamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any previous binding.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Merge every entry of `entries` into the registry.
    ///
    /// Names already bound but absent from `entries` keep their values.
    pub fn set_values_from_map<K, V, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        for (name, value) in entries {
            self.set_value(name, value);
        }
    }

    /// Bind every serialized field of `record` under its serialized name.
    ///
    /// `#[serde(rename = "...")]` binds a field under a different parameter
    /// name; `#[serde(skip)]` keeps a field out of the registry entirely, so
    /// it resolves as unset.
    pub fn set_values_from_record<T: Serialize + ?Sized>(
        &mut self,
        record: &T,
    ) -> NamedParamResult<()> {
        let fields = record_fields(record)?;
        self.set_values_from_map(fields);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParamRegistry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut registry = ParamRegistry::new();
        registry.set_values_from_map(iter);
        registry
    }
}

/// Serialize `record` into its named fields.
pub fn record_fields<T: Serialize + ?Sized>(
    record: &T,
) -> NamedParamResult<Vec<(String, ParamValue)>> {
    let value =
        serde_json::to_value(record).map_err(|e| NamedParamError::NotARecord(e.to_string()))?;
    match value {
        serde_json::Value::Object(fields) => Ok(fields
            .into_iter()
            .map(|(name, value)| (name, ParamValue::from_json(value)))
            .collect()),
        other => Err(NamedParamError::NotARecord(format!(
            "expected a struct or map, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a sequence",
        serde_json::Value::Object(_) => "a map",
    }
}

/// Resolve each occurrence against `registry`, in order.
pub fn resolve<S: AsRef<str>>(
    occurrences: &[S],
    registry: &ParamRegistry,
) -> Vec<Option<ParamValue>> {
    occurrences
        .iter()
        .map(|name| registry.get(name.as_ref()).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn some(values: &[ParamValue]) -> Vec<Option<ParamValue>> {
        values.iter().cloned().map(Some).collect()
    }

    #[test]
    fn test_set_value_overwrites() {
        let mut registry = ParamRegistry::new();
        registry.set_value("x", 1);
        registry.set_value("x", 2);
        assert_eq!(registry.get("x"), Some(&ParamValue::Int(2)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_map_merge_keeps_absent_names() {
        let mut registry = ParamRegistry::new();
        registry.set_values_from_map([("A", 1), ("C", 9)]);
        registry.set_values_from_map([("A", 2), ("B", 3)]);

        let values = resolve(&["A", "B", "C"], &registry);
        assert_eq!(
            values,
            some(&[ParamValue::Int(2), ParamValue::Int(3), ParamValue::Int(9)])
        );
    }

    #[test]
    fn test_resolve_preserves_order() {
        let registry: ParamRegistry = [("A", "x"), ("B", "y")].into_iter().collect();
        let values = resolve(&["A", "B", "A"], &registry);
        assert_eq!(values, some(&["x".into(), "y".into(), "x".into()]));
    }

    #[test]
    fn test_unset_is_distinct_from_null() {
        let mut registry = ParamRegistry::new();
        registry.set_value("job", ParamValue::Null);

        let values = resolve(&["job", "salary"], &registry);
        assert_eq!(values, vec![Some(ParamValue::Null), None]);
    }

    #[test]
    fn test_case_sensitive_lookup() {
        let mut registry = ParamRegistry::new();
        registry.set_value("foo", "baz");

        assert_eq!(
            resolve(&["foo", "FOO"], &registry),
            vec![Some(ParamValue::from("baz")), None]
        );

        registry.set_value("FOO", "quux");
        assert_eq!(
            resolve(&["foo", "FOO"], &registry),
            some(&["baz".into(), "quux".into()])
        );
    }

    #[test]
    fn test_resolve_reflects_registry_changes() {
        let occurrences = vec!["id".to_string()];
        let mut registry = ParamRegistry::new();
        assert_eq!(resolve(&occurrences, &registry), vec![None::<ParamValue>]);

        registry.set_value("id", 7);
        assert_eq!(resolve(&occurrences, &registry), some(&[ParamValue::Int(7)]));

        registry.set_value("id", 8);
        assert_eq!(resolve(&occurrences, &registry), some(&[ParamValue::Int(8)]));
    }

    #[derive(Serialize)]
    struct Employee {
        #[serde(rename = "lastname")]
        last_name: String,
        salary: i64,
        #[serde(skip)]
        #[allow(dead_code)]
        password: String,
        manager: Option<String>,
        tags: Vec<String>,
    }

    #[test]
    fn test_record_fields_use_serialized_names() {
        let employee = Employee {
            last_name: "Smith".into(),
            salary: 100000,
            password: "hunter2".into(),
            manager: None,
            tags: vec!["a".into(), "b".into()],
        };

        let mut registry = ParamRegistry::new();
        registry.set_values_from_record(&employee).unwrap();

        let values = resolve(
            &["lastname", "last_name", "salary", "password", "manager", "tags"],
            &registry,
        );
        assert_eq!(
            values,
            vec![
                Some(ParamValue::from("Smith")),
                None,
                Some(ParamValue::Int(100000)),
                None,
                Some(ParamValue::Null),
                Some(ParamValue::from(r#"["a","b"]"#)),
            ]
        );
    }

    #[test]
    fn test_record_from_map() {
        let mut map = HashMap::new();
        map.insert("id", 1);
        let mut registry = ParamRegistry::new();
        registry.set_values_from_record(&map).unwrap();
        assert_eq!(registry.get("id"), Some(&ParamValue::Int(1)));
    }

    #[test]
    fn test_non_record_is_rejected() {
        let mut registry = ParamRegistry::new();
        let err = registry.set_values_from_record(&42).unwrap_err();
        assert!(matches!(err, NamedParamError::NotARecord(_)));
        assert!(registry.is_empty());
    }
}
