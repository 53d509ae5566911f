//! Report generation service.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    ClassSubtotal, GeneralLedger, LedgerAccountInput, LedgerAccountReport, LedgerRow,
    TrialBalanceReport, TrialBalanceRow,
};
use crate::balance::{AccountClass, BalanceAccount, BalanceService, BalanceTotals, EquilibriumPolicy};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a trial balance from an account forest.
    ///
    /// Rows are the leaves of the forest ordered by code; subtotals group
    /// them by SYSCOHADA class. Accounts without a class only count in the
    /// grand totals.
    #[must_use]
    pub fn generate_trial_balance(
        forest: &[BalanceAccount],
        currency: &str,
        policy: EquilibriumPolicy,
    ) -> TrialBalanceReport {
        let mut rows = Vec::new();
        Self::collect_rows(forest, &mut rows);
        rows.sort_by(|a, b| a.code.cmp(&b.code));

        let mut by_class: BTreeMap<AccountClass, BalanceTotals> = BTreeMap::new();
        for row in &rows {
            if let Some(class) = row.class {
                *by_class.entry(class).or_default() += &row.figures;
            }
        }
        let subtotals = by_class
            .into_iter()
            .map(|(class, totals)| ClassSubtotal {
                class,
                label: class.label().to_string(),
                totals,
            })
            .collect();

        let totals = BalanceService::calculate_totals(forest);
        let equilibrium = BalanceService::equilibrium(&totals, policy);

        TrialBalanceReport {
            report_type: "trial_balance".to_string(),
            currency: currency.to_string(),
            rows,
            subtotals,
            totals,
            equilibrium,
        }
    }

    fn collect_rows(accounts: &[BalanceAccount], rows: &mut Vec<TrialBalanceRow>) {
        for account in accounts {
            if account.is_leaf() {
                rows.push(TrialBalanceRow {
                    code: account.code.clone(),
                    label: account.label.clone(),
                    class: account.class(),
                    figures: account.figures(),
                });
            } else {
                Self::collect_rows(&account.children, rows);
            }
        }
    }

    /// Generates the general ledger for `[from, to]`.
    ///
    /// Lines dated before `from` are folded into the opening balance, lines
    /// after `to` are dropped. Lines are ordered by date, keeping input order
    /// for lines on the same day.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` if `from > to` and
    /// `ReportError::InvalidLine` if a line carries both or neither side.
    pub fn generate_general_ledger(
        accounts: Vec<LedgerAccountInput>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<GeneralLedger, ReportError> {
        if from > to {
            return Err(ReportError::InvalidDateRange {
                start: from,
                end: to,
            });
        }

        let mut sections = Vec::with_capacity(accounts.len());
        for account in accounts {
            sections.push(Self::ledger_section(account, from, to)?);
        }
        sections.sort_by(|a, b| a.code.cmp(&b.code));

        let total_debit: Decimal = sections.iter().map(|s| s.total_debit).sum();
        let total_credit: Decimal = sections.iter().map(|s| s.total_credit).sum();

        Ok(GeneralLedger {
            report_type: "general_ledger".to_string(),
            period_start: from,
            period_end: to,
            accounts: sections,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        })
    }

    /// Finds one account's section in a generated ledger.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::AccountNotFound` if the code is absent.
    pub fn ledger_account<'a>(
        ledger: &'a GeneralLedger,
        code: &str,
    ) -> Result<&'a LedgerAccountReport, ReportError> {
        ledger
            .accounts
            .iter()
            .find(|a| a.code == code)
            .ok_or_else(|| ReportError::AccountNotFound(code.to_string()))
    }

    fn ledger_section(
        account: LedgerAccountInput,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<LedgerAccountReport, ReportError> {
        let LedgerAccountInput {
            code,
            label,
            opening_balance,
            mut lines,
        } = account;

        for line in &lines {
            let has_debit = !line.debit.is_zero();
            let has_credit = !line.credit.is_zero();
            if has_debit == has_credit || line.debit < Decimal::ZERO || line.credit < Decimal::ZERO
            {
                return Err(ReportError::InvalidLine {
                    account: code,
                    piece: line.piece.clone(),
                });
            }
        }

        // stable: same-day lines keep their input order
        lines.sort_by_key(|l| l.date);

        let mut opening = opening_balance;
        let mut running = opening_balance;
        let mut rows = Vec::new();
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;

        for line in lines {
            if line.date < from {
                opening += line.debit - line.credit;
                running = opening;
                continue;
            }
            if line.date > to {
                continue;
            }
            running += line.debit - line.credit;
            total_debit += line.debit;
            total_credit += line.credit;
            rows.push(LedgerRow {
                line,
                running_balance: running,
            });
        }

        Ok(LedgerAccountReport {
            code,
            label,
            opening_balance: opening,
            rows,
            total_debit,
            total_credit,
            closing_balance: running,
        })
    }
}
