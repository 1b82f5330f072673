//! Newtype IDs for type-safe entity references.
//!
//! The platform identifies every resource with an integer. Use the
//! `define_id!` macro to create wrappers that prevent accidentally passing a
//! basket id where a line id is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use threeyd_core::define_id;
/// define_id!(BasketId);
/// define_id!(LineId);
///
/// let basket_id = BasketId::new(1);
/// let line_id = LineId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: BasketId = line_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Baskets and orders
define_id!(BasketId);
define_id!(LineId);
define_id!(QuoteId);
define_id!(OrderId);
define_id!(OrderLineId);

// Catalog
define_id!(CatalogItemId);
define_id!(ProductId);
define_id!(MaterialId);
define_id!(TechnologyId);
define_id!(PostProcessingId);
define_id!(ColorId);

// Suppliers
define_id!(PartnerId);
define_id!(PaymentMethodId);
define_id!(ShippingMethodId);
define_id!(PickupLocationId);

// Users
define_id!(UserId);
define_id!(AddressId);

// Part requirement forms
define_id!(FormId);
define_id!(FormFieldId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_bare_integer() {
        let id = BasketId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");

        let parsed: BasketId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_display_and_parse() {
        let id: AddressId = " 17 ".parse().unwrap();
        assert_eq!(id.as_i64(), 17);
        assert_eq!(id.to_string(), "17");
        assert!("abc".parse::<AddressId>().is_err());
    }

    #[test]
    fn test_id_conversions() {
        let id = UserId::from(7);
        let raw: i64 = id.into();
        assert_eq!(raw, 7);
    }
}
