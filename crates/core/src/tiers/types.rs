//! Third-party (client and supplier) types.

use chrono::{DateTime, Utc};
use ohada_shared::types::ThirdPartyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Role of a third party toward the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThirdPartyKind {
    /// Customer, booked under 411.
    Client,
    /// Supplier, booked under 401.
    Supplier,
    /// Both customer and supplier.
    Both,
}

impl ThirdPartyKind {
    /// Default SYSCOHADA collective account.
    #[must_use]
    pub const fn default_account(self) -> &'static str {
        match self {
            Self::Client | Self::Both => "411",
            Self::Supplier => "401",
        }
    }

    /// Whether a party of this kind shows up in a filter for `other`.
    #[must_use]
    pub fn matches(self, other: Self) -> bool {
        self == other || self == Self::Both
    }
}

/// Relationship status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThirdPartyStatus {
    /// Regular business.
    #[default]
    Active,
    /// Dormant.
    Inactive,
    /// No new orders allowed.
    Blocked,
}

/// A client or supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThirdParty {
    /// ID.
    pub id: ThirdPartyId,
    /// Business code (e.g. `CLI001`).
    pub code: String,
    /// Company name.
    pub name: String,
    /// Role.
    pub kind: ThirdPartyKind,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Collective account (`411...` or `401...`).
    pub account_code: String,
    /// Payment terms in days.
    pub payment_terms_days: u32,
    /// Credit limit, `None` when unlimited.
    pub credit_limit: Option<Decimal>,
    /// Amount currently owed.
    pub outstanding: Decimal,
    /// Revenue (or purchases) over the trailing year.
    pub revenue: Decimal,
    /// Status.
    pub status: ThirdPartyStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a third party.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateThirdPartyInput {
    /// Business code.
    pub code: String,
    /// Company name.
    pub name: String,
    /// Role.
    pub kind: ThirdPartyKind,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Collective account, defaulted from `kind` when absent.
    #[serde(default)]
    pub account_code: Option<String>,
    /// Payment terms in days.
    #[serde(default = "default_payment_terms")]
    pub payment_terms_days: u32,
    /// Credit limit.
    #[serde(default)]
    pub credit_limit: Option<Decimal>,
}

fn default_payment_terms() -> u32 {
    30
}

/// Partial update of a third party. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateThirdPartyInput {
    /// Company name.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Payment terms in days.
    #[serde(default)]
    pub payment_terms_days: Option<u32>,
    /// Credit limit.
    #[serde(default)]
    pub credit_limit: Option<Decimal>,
    /// Amount currently owed.
    #[serde(default)]
    pub outstanding: Option<Decimal>,
    /// Trailing revenue.
    #[serde(default)]
    pub revenue: Option<Decimal>,
    /// Status.
    #[serde(default)]
    pub status: Option<ThirdPartyStatus>,
}

/// List filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThirdPartyFilter {
    /// Only this role (parties of kind `Both` always match).
    #[serde(default)]
    pub kind: Option<ThirdPartyKind>,
    /// Only this status.
    #[serde(default)]
    pub status: Option<ThirdPartyStatus>,
    /// Case-insensitive match on code or name.
    #[serde(default)]
    pub search: Option<String>,
}

impl ThirdPartyFilter {
    /// Whether `party` passes the filter.
    #[must_use]
    pub fn accepts(&self, party: &ThirdParty) -> bool {
        let kind_ok = self.kind.is_none_or(|k| party.kind.matches(k));
        let status_ok = self.status.is_none_or(|s| party.status == s);
        let search_ok = self.search.as_deref().is_none_or(|needle| {
            let needle = needle.to_lowercase();
            party.code.to_lowercase().contains(&needle) || party.name.to_lowercase().contains(&needle)
        });
        kind_ok && status_ok && search_ok
    }
}
