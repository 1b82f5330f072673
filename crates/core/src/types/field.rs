//! Tri-state optional request fields.
//!
//! Many endpoints accept optional arguments where "not provided" and
//! "explicitly cleared" mean different things to the platform: an omitted key
//! leaves the stored value untouched, while `null` clears it. [`Field`] keeps
//! the two apart.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An optional request argument.
///
/// - [`Field::Unset`] - the argument was not provided; the key is left out of
///   the outbound payload entirely.
/// - [`Field::Null`] - the argument was explicitly cleared; sent as `null`.
/// - [`Field::Value`] - a concrete value.
///
/// ```rust
/// use threeyd_core::Field;
///
/// let unit: Field<&str> = Field::default();
/// assert!(unit.is_unset());
///
/// let country = Field::from_option(None::<String>);
/// assert_eq!(country, Field::Null);
///
/// let currency = Field::from("EUR");
/// assert_eq!(currency, Field::Value("EUR"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Field<T> {
    /// Not provided. Never sent.
    #[default]
    Unset,
    /// Explicitly cleared. Sent as `null`.
    Null,
    /// Sent as the contained value.
    Value(T),
}

impl<T> Field<T> {
    /// Treats `None` as an explicit `null` rather than as "not provided".
    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }

    /// Returns `true` when the field should be left out of the payload.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns `true` for an explicit `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts from `&Field<T>` to `Field<&T>`.
    #[must_use]
    pub const fn as_ref(&self) -> Field<&T> {
        match self {
            Self::Unset => Field::Unset,
            Self::Null => Field::Null,
            Self::Value(value) => Field::Value(value),
        }
    }

    /// Maps the contained value, keeping `Unset` and `Null` as they are.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Field<U> {
        match self {
            Self::Unset => Field::Unset,
            Self::Null => Field::Null,
            Self::Value(value) => Field::Value(f(value)),
        }
    }

    /// Returns the value if one is set.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Unset | Self::Null => None,
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

/// `Unset` serializes like `Null`; containers are expected to skip it with
/// `#[serde(skip_serializing_if = "Field::is_unset")]`.
impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unset | Self::Null => serializer.serialize_none(),
            Self::Value(value) => serializer.serialize_some(value),
        }
    }
}

/// A present `null` becomes `Null`; a missing key needs `#[serde(default)]`
/// to become `Unset`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from_option)
    }
}
