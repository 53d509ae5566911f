//! Budget tracking and variance analysis.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{
    ActualAmount, Budget, BudgetLine, BudgetLineWithActual, BudgetVsActualReport,
    BudgetVsActualSummary, CreateBudgetInput, CreateBudgetLineInput, UpdateBudgetInput,
    VarianceResult, VarianceStatus,
};
