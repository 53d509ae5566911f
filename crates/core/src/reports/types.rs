//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balance::{AccountClass, BalanceTotals, EquilibriumReport};

/// One row of the trial balance (balance générale), a leaf account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub code: String,
    /// Account label.
    pub label: String,
    /// SYSCOHADA class, if the code carries one.
    pub class: Option<AccountClass>,
    /// The six figures of the account.
    pub figures: BalanceTotals,
}

/// Subtotal for one account class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSubtotal {
    /// Account class.
    pub class: AccountClass,
    /// Class label.
    pub label: String,
    /// Sum of the class's rows.
    pub totals: BalanceTotals,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Report type identifier.
    pub report_type: String,
    /// Currency code.
    pub currency: String,
    /// Leaf rows, ordered by account code.
    pub rows: Vec<TrialBalanceRow>,
    /// Subtotals per class, ordered by class digit.
    pub subtotals: Vec<ClassSubtotal>,
    /// Grand totals.
    pub totals: BalanceTotals,
    /// Equilibrium checks on the grand totals.
    pub equilibrium: EquilibriumReport,
}

/// A posted line in the general ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Accounting date.
    pub date: NaiveDate,
    /// Journal code (`AC`, `VT`, `BQ`, `OD`, ...).
    pub journal: String,
    /// Voucher reference (numéro de pièce).
    pub piece: String,
    /// Line label.
    pub label: String,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
}

/// Input for one account of the general ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAccountInput {
    /// Account code.
    pub code: String,
    /// Account label.
    pub label: String,
    /// Signed opening balance (debit positive).
    #[serde(default)]
    pub opening_balance: Decimal,
    /// Lines posted on the account.
    pub lines: Vec<LedgerLine>,
}

/// A ledger line with its running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The posted line.
    #[serde(flatten)]
    pub line: LedgerLine,
    /// Signed balance after this line (debit positive).
    pub running_balance: Decimal,
}

/// General ledger section for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAccountReport {
    /// Account code.
    pub code: String,
    /// Account label.
    pub label: String,
    /// Signed opening balance.
    pub opening_balance: Decimal,
    /// Rows within the range, in date order.
    pub rows: Vec<LedgerRow>,
    /// Sum of debits within the range.
    pub total_debit: Decimal,
    /// Sum of credits within the range.
    pub total_credit: Decimal,
    /// Signed closing balance.
    pub closing_balance: Decimal,
}

/// General ledger (grand livre) over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralLedger {
    /// Report type identifier.
    pub report_type: String,
    /// Range start (inclusive).
    pub period_start: NaiveDate,
    /// Range end (inclusive).
    pub period_end: NaiveDate,
    /// Per-account sections, ordered by account code.
    pub accounts: Vec<LedgerAccountReport>,
    /// Sum of all debits.
    pub total_debit: Decimal,
    /// Sum of all credits.
    pub total_credit: Decimal,
    /// Strict equality of total debit and total credit.
    pub is_balanced: bool,
}
