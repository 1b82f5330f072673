//! Users, preferences and addresses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{AddressId, Field, UserId};

/// A user as listed by the organization panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationUser {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub default_address_id: Option<AddressId>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of a user creation. Only the id is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedUser {
    pub id: UserId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Regional preferences of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// 2-letter country code, ex. US, FR, GB
    #[serde(default)]
    pub country: Option<String>,
    /// 3-letter currency code, ex. USD, EUR
    #[serde(default)]
    pub currency: Option<String>,
    /// 2-letter language code, ex. en, de, fr, es
    #[serde(default)]
    pub language: Option<String>,
    /// mm or inch
    #[serde(default)]
    pub unit: Option<String>,
}

/// A partial preferences update. `Unset` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesUpdate {
    pub country: Field<String>,
    pub currency: Field<String>,
    pub language: Field<String>,
    pub unit: Field<String>,
}

impl From<Preferences> for PreferencesUpdate {
    /// Every field is sent; missing values are sent as `null`.
    fn from(preferences: Preferences) -> Self {
        Self {
            country: Field::from_option(preferences.country),
            currency: Field::from_option(preferences.currency),
            language: Field::from_option(preferences.language),
            unit: Field::from_option(preferences.unit),
        }
    }
}

/// A stored address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub vat_id: Option<String>,
}

/// Input for creating an address.
///
/// The first address created for a user becomes their default address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAddress {
    pub city: String,
    pub country: String,
    pub first_name: String,
    pub last_name: String,
    pub line1: String,
    pub phone_number: String,
    pub zip_code: String,
    pub company_name: Field<String>,
    pub department: Field<String>,
    pub line2: Field<String>,
    pub state: Field<String>,
    pub title: Field<String>,
    pub vat_id: Field<String>,
}

impl From<&Address> for NewAddress {
    /// Copies a stored address. Missing optional parts are sent as `null` so
    /// the copy matches the source exactly.
    fn from(address: &Address) -> Self {
        let required = |value: &Option<String>| value.clone().unwrap_or_default();
        let optional = |value: &Option<String>| Field::from_option(value.clone());
        Self {
            city: required(&address.city),
            country: required(&address.country),
            first_name: required(&address.first_name),
            last_name: required(&address.last_name),
            line1: required(&address.line1),
            phone_number: required(&address.phone_number),
            zip_code: required(&address.zip_code),
            company_name: optional(&address.company_name),
            department: optional(&address.department),
            line2: optional(&address.line2),
            state: optional(&address.state),
            title: optional(&address.title),
            vat_id: optional(&address.vat_id),
        }
    }
}

/// Input for creating a user in the organization panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Verify the user right away.
    pub is_active: bool,
}

impl NewUser {
    /// An active user with the given email and name.
    #[must_use]
    pub fn active(email: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            email: email.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            is_active: true,
        }
    }
}
