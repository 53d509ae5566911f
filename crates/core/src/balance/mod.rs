//! Account tree model and balance aggregation.
//!
//! - `types` - Account tree nodes, totals, SYSCOHADA classes
//! - `service` - Leaf aggregation, equilibrium checks, tree assembly and rollup
//! - `tree` - Expand/collapse state kept apart from the tree
//! - `error` - Balance error types

pub mod error;
pub mod service;
pub mod tree;
pub mod types;


pub use error::BalanceError;
pub use service::BalanceService;
pub use tree::{ExpandedSet, VisibleRow, visible_rows};
pub use types::{
    AccountClass, BalanceAccount, BalanceTotals, EquilibriumPolicy, EquilibriumReport,
    NormalSide, RollupMismatch,
};
