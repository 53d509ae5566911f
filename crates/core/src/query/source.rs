//! Where balance figures come from.

use crate::balance::{BalanceAccount, BalanceError};

use super::types::BalanceQuery;

/// Provider of the account forest for a query.
pub trait BalanceSource: Send + Sync {
    /// Returns the accounts matching `query`.
    fn fetch(&self, query: &BalanceQuery) -> Result<Vec<BalanceAccount>, BalanceError>;
}

/// Source serving a fixed forest, filtered per query.
///
/// Figures are taken as-is for any date range.
#[derive(Debug, Clone, Default)]
pub struct StaticBalanceSource {
    forest: Vec<BalanceAccount>,
}

impl StaticBalanceSource {
    /// Wraps a forest.
    #[must_use]
    pub fn new(forest: Vec<BalanceAccount>) -> Self {
        Self { forest }
    }
}

impl BalanceSource for StaticBalanceSource {
    fn fetch(&self, query: &BalanceQuery) -> Result<Vec<BalanceAccount>, BalanceError> {
        Ok(self
            .forest
            .iter()
            .filter_map(|account| filter_account(account, query))
            .collect())
    }
}

fn filter_account(account: &BalanceAccount, query: &BalanceQuery) -> Option<BalanceAccount> {
    if query.class.is_some_and(|class| account.class() != Some(class)) {
        return None;
    }

    let mut kept = account.clone();
    if query.max_level.is_some_and(|max| account.level >= max) {
        kept.children.clear();
    } else {
        kept.children = account
            .children
            .iter()
            .filter_map(|child| filter_account(child, query))
            .collect();
    }

    if !query.include_zero && kept.children.is_empty() && kept.is_zero() {
        return None;
    }
    Some(kept)
}
