//! Quotes, payment and shipping methods.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{PartnerId, PaymentMethodId, QuoteId, ShippingMethodId};

/// The supplier a quote was issued by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePartner {
    pub id: PartnerId,
}

/// Quote totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotal {
    pub inclusive_tax: Decimal,
}

/// A quote as returned by the user panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: QuoteId,
    pub status: String,
    #[serde(default)]
    pub currency: Option<String>,
    pub partner: QuotePartner,
    pub total_price: QuoteTotal,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quote {
    /// Finalized quotes can be ordered without choosing addresses again.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.status == "finalized"
    }
}

/// A supplier's payment method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A supplier's shipping method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
