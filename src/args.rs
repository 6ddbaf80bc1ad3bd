//! Caller-supplied arguments for the database decorators.
//!
//! Arguments come either as a name/value map or as a flat list alternating
//! name, value, name, value. Both are normalised into a map before the query
//! registry sees them.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::{NamedParamError, NamedParamResult};
use crate::registry::record_fields;
use crate::value::ParamValue;

/// Named arguments for a single query execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Arguments {
    /// No arguments at all.
    #[default]
    None,
    /// A ready name/value map, used as is.
    Map(HashMap<String, ParamValue>),
    /// `name, value, name, value, ...`
    List(Vec<ParamValue>),
}

impl Arguments {
    /// Arguments taken from the serialized fields of `record`.
    pub fn record<T: Serialize + ?Sized>(record: &T) -> NamedParamResult<Self> {
        Ok(Arguments::Map(record_fields(record)?.into_iter().collect()))
    }

    /// Normalise into a name/value map.
    ///
    /// Returns `Ok(None)` when there are no arguments. A flat list must have
    /// an even length with a string in every name slot; a lone value is
    /// always an arity error.
    pub fn into_map(self) -> NamedParamResult<Option<HashMap<String, ParamValue>>> {
        let list = match self {
            Arguments::None => return Ok(None),
            Arguments::Map(map) => return Ok(Some(map)),
            Arguments::List(list) if list.is_empty() => return Ok(None),
            Arguments::List(list) => list,
        };

        if list.len() % 2 != 0 {
            return Err(NamedParamError::OddArgumentCount(list.len()));
        }

        let mut map = HashMap::with_capacity(list.len() / 2);
        let mut iter = list.into_iter().enumerate();
        while let (Some((position, key)), Some((_, value))) = (iter.next(), iter.next()) {
            match key {
                ParamValue::String(name) => {
                    map.insert(name, value);
                }
                _ => return Err(NamedParamError::non_string_key(position)),
            }
        }
        Ok(Some(map))
    }
}

impl From<()> for Arguments {
    fn from(_: ()) -> Self {
        Arguments::None
    }
}

impl From<Vec<ParamValue>> for Arguments {
    fn from(list: Vec<ParamValue>) -> Self {
        Arguments::List(list)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> From<HashMap<K, V>> for Arguments {
    fn from(map: HashMap<K, V>) -> Self {
        Arguments::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Build a flat `name, value, ...` argument list.
///
/// ```
/// use named_param::{params, Arguments, ParamValue};
///
/// let args = params!["id", 1, "name", "John"];
/// assert_eq!(
///     args,
///     Arguments::List(vec!["id".into(), ParamValue::Int(1), "name".into(), "John".into()])
/// );
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Arguments::List(::std::vec::Vec::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Arguments::List(::std::vec![$($crate::ParamValue::from($value)),+])
    };
}
