//! Balance aggregation service.

use std::collections::HashMap;

use super::error::BalanceError;
use super::types::{
    BalanceAccount, BalanceTotals, EquilibriumPolicy, EquilibriumReport, RollupMismatch,
};

/// Stateless service for aggregating account trees.
pub struct BalanceService;

impl BalanceService {
    /// Sums the six figures of every leaf in the forest.
    ///
    /// Parent figures are ignored: leaves are assumed to carry the final
    /// amounts. An account with an empty `children` list is a leaf.
    #[must_use]
    pub fn calculate_totals(forest: &[BalanceAccount]) -> BalanceTotals {
        let mut totals = BalanceTotals::default();
        Self::accumulate_leaves(forest, &mut totals);
        totals
    }

    fn accumulate_leaves(accounts: &[BalanceAccount], totals: &mut BalanceTotals) {
        for account in accounts {
            if account.is_leaf() {
                *totals += &account.figures();
            } else {
                Self::accumulate_leaves(&account.children, totals);
            }
        }
    }

    /// Closing debit versus closing credit under the given policy.
    #[must_use]
    pub fn is_balanced(totals: &BalanceTotals, policy: EquilibriumPolicy) -> bool {
        policy.accepts(totals.closing_difference())
    }

    /// Runs the opening, movement and closing checks.
    #[must_use]
    pub fn equilibrium(totals: &BalanceTotals, policy: EquilibriumPolicy) -> EquilibriumReport {
        let closing_balanced = policy.accepts(totals.closing_difference());
        EquilibriumReport {
            opening_balanced: policy.accepts(totals.opening_difference()),
            movements_balanced: policy.accepts(totals.movement_difference()),
            closing_balanced,
            difference: totals.closing_difference(),
            is_balanced: closing_balanced,
        }
    }

    /// Assembles a forest from a flat list linked by `parent` codes.
    ///
    /// Sibling order follows input order. Any `children` already present on
    /// the inputs are kept below the node.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::DuplicateCode` if two accounts share a code,
    /// `BalanceError::UnknownParent` if a parent code is missing, and
    /// `BalanceError::Cycle` if an account cannot be reached from a root.
    pub fn build_forest(flat: Vec<BalanceAccount>) -> Result<Vec<BalanceAccount>, BalanceError> {
        let mut index: HashMap<String, usize> = HashMap::with_capacity(flat.len());
        for (i, account) in flat.iter().enumerate() {
            if index.insert(account.code.clone(), i).is_some() {
                return Err(BalanceError::DuplicateCode(account.code.clone()));
            }
        }

        let mut roots = Vec::new();
        let mut children_of: HashMap<usize, Vec<usize>> = HashMap::new();
        for (i, account) in flat.iter().enumerate() {
            match &account.parent {
                None => roots.push(i),
                Some(parent) => {
                    let parent_idx =
                        *index
                            .get(parent)
                            .ok_or_else(|| BalanceError::UnknownParent {
                                code: account.code.clone(),
                                parent: parent.clone(),
                            })?;
                    children_of.entry(parent_idx).or_default().push(i);
                }
            }
        }

        let mut slots: Vec<Option<BalanceAccount>> = flat.into_iter().map(Some).collect();
        let forest: Vec<BalanceAccount> = roots
            .into_iter()
            .filter_map(|i| Self::assemble(i, &mut slots, &children_of))
            .collect();

        if let Some(orphan) = slots.into_iter().flatten().next() {
            return Err(BalanceError::Cycle(orphan.code));
        }

        Ok(forest)
    }

    fn assemble(
        idx: usize,
        slots: &mut [Option<BalanceAccount>],
        children_of: &HashMap<usize, Vec<usize>>,
    ) -> Option<BalanceAccount> {
        let mut node = slots[idx].take()?;
        if let Some(child_ids) = children_of.get(&idx) {
            for &child in child_ids {
                if let Some(assembled) = Self::assemble(child, slots, children_of) {
                    node.children.push(assembled);
                }
            }
        }
        Some(node)
    }

    /// Recomputes every parent's figures as the sum of its children.
    #[must_use]
    pub fn rollup(forest: Vec<BalanceAccount>) -> Vec<BalanceAccount> {
        forest.into_iter().map(Self::rollup_node).collect()
    }

    fn rollup_node(mut node: BalanceAccount) -> BalanceAccount {
        if node.is_leaf() {
            return node;
        }
        node.children = std::mem::take(&mut node.children)
            .into_iter()
            .map(Self::rollup_node)
            .collect();
        let sum: BalanceTotals = node.children.iter().map(BalanceAccount::figures).fold(
            BalanceTotals::default(),
            |mut acc, f| {
                acc += &f;
                acc
            },
        );
        node.set_figures(&sum);
        node
    }

    /// Lists every parent whose stored figures differ from the sum of its
    /// direct children, in depth-first order.
    #[must_use]
    pub fn verify_rollup(forest: &[BalanceAccount]) -> Vec<RollupMismatch> {
        let mut mismatches = Vec::new();
        Self::collect_mismatches(forest, &mut mismatches);
        mismatches
    }

    fn collect_mismatches(accounts: &[BalanceAccount], out: &mut Vec<RollupMismatch>) {
        for account in accounts {
            if account.is_leaf() {
                continue;
            }
            let figures: Vec<BalanceTotals> =
                account.children.iter().map(BalanceAccount::figures).collect();
            let expected: BalanceTotals = figures.iter().sum();
            let actual = account.figures();
            if expected != actual {
                out.push(RollupMismatch {
                    code: account.code.clone(),
                    expected,
                    actual,
                });
            }
            Self::collect_mismatches(&account.children, out);
        }
    }

    /// Counts every node of the forest.
    #[must_use]
    pub fn count_accounts(forest: &[BalanceAccount]) -> usize {
        forest
            .iter()
            .map(|a| 1 + Self::count_accounts(&a.children))
            .sum()
    }
}
