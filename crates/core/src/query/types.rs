//! Balance query key and result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::balance::{AccountClass, BalanceAccount, BalanceTotals, EquilibriumReport};

/// Parameters of a balance query. Also the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceQuery {
    /// First day of the period.
    pub date_from: NaiveDate,
    /// Last day of the period.
    pub date_to: NaiveDate,
    /// Restrict to one SYSCOHADA class.
    #[serde(default)]
    pub class: Option<AccountClass>,
    /// Deepest level kept; deeper accounts fold into their ancestor.
    #[serde(default)]
    pub max_level: Option<u8>,
    /// Keep accounts whose figures are all zero.
    #[serde(default)]
    pub include_zero: bool,
}

impl BalanceQuery {
    /// Query over a period with no filter, zero accounts hidden.
    #[must_use]
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from,
            date_to,
            class: None,
            max_level: None,
            include_zero: false,
        }
    }

    /// Restricts the query to one class.
    #[must_use]
    pub fn with_class(mut self, class: AccountClass) -> Self {
        self.class = Some(class);
        self
    }

    /// Limits the tree depth.
    #[must_use]
    pub fn with_max_level(mut self, level: u8) -> Self {
        self.max_level = Some(level);
        self
    }

    /// Keeps zero accounts.
    #[must_use]
    pub fn including_zero(mut self) -> Self {
        self.include_zero = true;
        self
    }
}

/// Result of a balance query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceData {
    /// Filtered account forest.
    pub accounts: Vec<BalanceAccount>,
    /// Leaf totals of `accounts`.
    pub totals: BalanceTotals,
    /// Equilibrium under the configured tolerance.
    pub equilibrium: EquilibriumReport,
    /// Whether the result came from the cache.
    pub cached: bool,
}
