//! Request parameter filtering.
//!
//! Namespace methods collect their arguments into [`Params`] right before
//! building a JSON body or a query string. Arguments left at [`Field::Unset`]
//! never reach the wire; [`Field::Null`] is sent as `null` in JSON bodies and
//! dropped from query strings.

use serde::Serialize;
use serde_json::{Map, Value};
use threeyd_core::Field;

/// Drop every entry that is [`Field::Unset`], keeping insertion order.
pub fn filter_unset<K, I>(entries: I) -> Map<String, Value>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Field<Value>)>,
{
    entries
        .into_iter()
        .filter_map(|(key, field)| match field {
            Field::Unset => None,
            Field::Null => Some((key.into(), Value::Null)),
            Field::Value(value) => Some((key.into(), value)),
        })
        .collect()
}

/// Ordered named arguments of one request.
///
/// ```rust
/// use threeyd::params::Params;
/// use threeyd_core::Field;
///
/// let body = Params::new()
///     .optional("country", Field::<String>::Null)
///     .optional("unit", Field::<String>::Unset)
///     .required("currency", "EUR")
///     .into_json()
///     .unwrap();
///
/// assert_eq!(body.to_string(), r#"{"country":null,"currency":"EUR"}"#);
/// ```
#[derive(Debug, Default)]
pub struct Params {
    entries: Vec<(&'static str, Field<Value>)>,
    error: Option<serde_json::Error>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument that is always sent.
    #[must_use]
    pub fn required<T: Serialize>(self, key: &'static str, value: T) -> Self {
        self.optional(key, Field::Value(value))
    }

    /// Add an argument that is only sent when not [`Field::Unset`].
    #[must_use]
    pub fn optional<T: Serialize>(mut self, key: &'static str, field: Field<T>) -> Self {
        let field = match field {
            Field::Unset => Field::Unset,
            Field::Null => Field::Null,
            Field::Value(value) => match serde_json::to_value(value) {
                Ok(value) => Field::Value(value),
                Err(e) => {
                    self.error.get_or_insert(e);
                    Field::Unset
                }
            },
        };
        self.entries.push((key, field));
        self
    }

    /// Build a JSON object from the set arguments.
    ///
    /// # Errors
    ///
    /// Returns the first serialization error of any argument.
    pub fn into_json(self) -> Result<Value, serde_json::Error> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(Value::Object(filter_unset(self.entries)))
    }

    /// Build query string pairs from the arguments that hold a value.
    ///
    /// # Errors
    ///
    /// Returns the first serialization error of any argument.
    pub fn into_query(self) -> Result<Vec<(String, String)>, serde_json::Error> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(filter_unset(self.entries)
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect())
    }
}
