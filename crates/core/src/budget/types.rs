//! Budget data types.

use chrono::{DateTime, Utc};
use ohada_shared::types::{BudgetId, BudgetLineId, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A budget for one fiscal year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Budget name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Fiscal year (calendar year of the exercise).
    pub fiscal_year: i32,
    /// Budget currency.
    pub currency: Currency,
    /// Whether the budget is locked (no modifications allowed).
    pub is_locked: bool,
    /// Budget lines.
    pub lines: Vec<BudgetLine>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Sum of all line amounts.
    #[must_use]
    pub fn total_budgeted(&self) -> Decimal {
        self.lines.iter().map(|l| l.amount).sum()
    }

    /// Finds the line for an account and month.
    #[must_use]
    pub fn line_for(&self, account_code: &str, period: u8) -> Option<&BudgetLine> {
        self.lines
            .iter()
            .find(|l| l.account_code == account_code && l.period == period)
    }
}

/// A budget line: one account over one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLine {
    /// Budget line ID.
    pub id: BudgetLineId,
    /// SYSCOHADA account code.
    pub account_code: String,
    /// Month of the fiscal year, `1..=12`.
    pub period: u8,
    /// Budgeted amount.
    pub amount: Decimal,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Actual amount booked on an account for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActualAmount {
    /// SYSCOHADA account code.
    pub account_code: String,
    /// Month of the fiscal year, `1..=12`.
    pub period: u8,
    /// Booked amount.
    pub amount: Decimal,
}

/// Budget line with calculated actual amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLineWithActual {
    /// Budget line ID.
    pub id: BudgetLineId,
    /// Account code.
    pub account_code: String,
    /// Month of the fiscal year.
    pub period: u8,
    /// Budgeted amount.
    pub budgeted: Decimal,
    /// Actual amount from ledger entries.
    pub actual: Decimal,
    /// Variance (budgeted - actual for expenses, actual - budgeted for revenue).
    pub variance: Decimal,
    /// Utilization percentage (actual / budgeted * 100).
    pub utilization_percent: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

/// Budget vs actual report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetVsActualReport {
    /// Budget ID.
    pub budget_id: BudgetId,
    /// Budget name.
    pub budget_name: String,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Budget lines with actual amounts.
    pub lines: Vec<BudgetLineWithActual>,
    /// Summary totals.
    pub summary: BudgetVsActualSummary,
}

/// Budget vs actual summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetVsActualSummary {
    /// Total budgeted amount.
    pub total_budgeted: Decimal,
    /// Total actual amount.
    pub total_actual: Decimal,
    /// Total variance.
    pub total_variance: Decimal,
    /// Overall utilization percentage.
    pub overall_utilization: Decimal,
}

/// Variance calculation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarianceResult {
    /// Budgeted amount.
    pub budgeted: Decimal,
    /// Actual amount.
    pub actual: Decimal,
    /// Variance amount.
    pub variance: Decimal,
    /// Variance percentage.
    pub variance_percent: Decimal,
    /// Utilization percentage.
    pub utilization_percent: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Favorable variance (under budget for expenses, over target for revenue).
    Favorable,
    /// Unfavorable variance (over budget for expenses, under target for revenue).
    Unfavorable,
    /// On budget (no variance).
    OnBudget,
}

/// Input for creating a new budget.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBudgetInput {
    /// Budget name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Currency.
    pub currency: Currency,
}

/// Partial update of a budget header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBudgetInput {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Input for creating a budget line.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBudgetLineInput {
    /// Account code.
    pub account_code: String,
    /// Month of the fiscal year, `1..=12`.
    pub period: u8,
    /// Budgeted amount.
    pub amount: Decimal,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}
