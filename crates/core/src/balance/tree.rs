//! Expand/collapse state for the account tree.
//!
//! The tree itself stays immutable; which nodes are open lives in an
//! `ExpandedSet` keyed by account code.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::types::BalanceAccount;

/// Set of expanded account codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedSet {
    codes: HashSet<String>,
}

impl ExpandedSet {
    /// Creates an empty set (everything collapsed).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the account is expanded.
    #[must_use]
    pub fn is_expanded(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Flips the state of one account. Returns the new state.
    pub fn toggle(&mut self, code: &str) -> bool {
        if self.codes.remove(code) {
            false
        } else {
            self.codes.insert(code.to_string());
            true
        }
    }

    /// Opens an account. Idempotent.
    pub fn expand(&mut self, code: &str) {
        self.codes.insert(code.to_string());
    }

    /// Closes an account. Idempotent.
    pub fn collapse(&mut self, code: &str) {
        self.codes.remove(code);
    }

    /// Opens every non-leaf account of the forest.
    pub fn expand_all(&mut self, forest: &[BalanceAccount]) {
        for account in forest {
            if !account.is_leaf() {
                self.codes.insert(account.code.clone());
                self.expand_all(&account.children);
            }
        }
    }

    /// Closes everything.
    pub fn collapse_all(&mut self) {
        self.codes.clear();
    }

    /// Number of expanded accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// True if nothing is expanded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// A row of the flattened tree as it would be displayed.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    /// Nesting depth starting at 0 for roots.
    pub depth: usize,
    /// The account shown on this row.
    pub account: &'a BalanceAccount,
    /// Whether the row is expanded (always false for leaves).
    pub expanded: bool,
}

/// Flattens the forest into display order, descending only into
/// expanded accounts.
#[must_use]
pub fn visible_rows<'a>(forest: &'a [BalanceAccount], expanded: &ExpandedSet) -> Vec<VisibleRow<'a>> {
    let mut rows = Vec::new();
    push_rows(forest, expanded, 0, &mut rows);
    rows
}

fn push_rows<'a>(
    accounts: &'a [BalanceAccount],
    expanded: &ExpandedSet,
    depth: usize,
    rows: &mut Vec<VisibleRow<'a>>,
) {
    for account in accounts {
        let open = !account.is_leaf() && expanded.is_expanded(&account.code);
        rows.push(VisibleRow {
            depth,
            account,
            expanded: open,
        });
        if open {
            push_rows(&account.children, expanded, depth + 1, rows);
        }
    }
}
