//! Budget service: budget CRUD, line validation and variance analysis.

use std::collections::HashMap;

use chrono::Utc;
use ohada_shared::types::{BudgetId, BudgetLineId};
use rust_decimal::Decimal;
use tracing::info;

use super::error::BudgetError;
use super::types::{
    ActualAmount, Budget, BudgetLine, BudgetLineWithActual, BudgetVsActualReport,
    BudgetVsActualSummary, CreateBudgetInput, CreateBudgetLineInput, UpdateBudgetInput,
    VarianceResult, VarianceStatus,
};
use crate::balance::AccountClass;
use crate::store::MemoryStore;

/// Budget service.
#[derive(Default)]
pub struct BudgetService {
    budgets: MemoryStore<BudgetId, Budget>,
}

impl BudgetService {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate variance between budgeted and actual amounts.
    ///
    /// For revenue accounts (class 7): variance = actual - budgeted, so
    /// beating the target is favorable.
    ///
    /// For every other account: variance = budgeted - actual, so staying
    /// under budget is favorable.
    #[must_use]
    pub fn calculate_variance(budgeted: Decimal, actual: Decimal, account_code: &str) -> VarianceResult {
        let is_revenue = AccountClass::from_code(account_code).is_some_and(AccountClass::is_revenue);
        let variance = if is_revenue {
            actual - budgeted
        } else {
            budgeted - actual
        };

        let status = match variance.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => VarianceStatus::Favorable,
            std::cmp::Ordering::Less => VarianceStatus::Unfavorable,
            std::cmp::Ordering::Equal => VarianceStatus::OnBudget,
        };

        VarianceResult {
            budgeted,
            actual,
            variance,
            variance_percent: ratio_percent(variance, budgeted),
            utilization_percent: ratio_percent(actual, budgeted),
            status,
        }
    }

    /// Validate budget line creation.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::BudgetLocked` if the budget is locked,
    /// `BudgetError::NegativeAmount` if the amount is negative,
    /// `BudgetError::InvalidPeriod` outside `1..=12` and
    /// `BudgetError::InvalidAccountCode` for a code without a class digit.
    pub fn validate_budget_line(budget: &Budget, input: &CreateBudgetLineInput) -> Result<(), BudgetError> {
        if budget.is_locked {
            return Err(BudgetError::BudgetLocked);
        }

        if input.amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount);
        }

        if !(1..=12).contains(&input.period) {
            return Err(BudgetError::InvalidPeriod(input.period));
        }

        if AccountClass::from_code(&input.account_code).is_none() {
            return Err(BudgetError::InvalidAccountCode(input.account_code.clone()));
        }

        if budget.line_for(&input.account_code, input.period).is_some() {
            return Err(BudgetError::DuplicateBudgetLine {
                account: input.account_code.clone(),
                period: input.period,
            });
        }

        Ok(())
    }

    /// Creates a budget.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for a blank name and `DuplicateName` if the fiscal
    /// year already has a budget with that name.
    pub fn create_budget(&self, input: CreateBudgetInput) -> Result<Budget, BudgetError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(BudgetError::EmptyName);
        }
        if self.name_taken(&name, input.fiscal_year, None) {
            return Err(BudgetError::DuplicateName(input.fiscal_year));
        }

        let now = Utc::now();
        let budget = Budget {
            id: BudgetId::new(),
            name,
            description: input.description,
            fiscal_year: input.fiscal_year,
            currency: input.currency,
            is_locked: false,
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        info!(budget_id = %budget.id, name = %budget.name, fiscal_year = budget.fiscal_year, "Budget created");
        self.budgets.insert(budget.id, budget.clone());
        Ok(budget)
    }

    /// Returns a budget.
    pub fn get_budget(&self, id: BudgetId) -> Result<Budget, BudgetError> {
        self.budgets.get(&id).ok_or(BudgetError::NotFound(id))
    }

    /// Lists budgets, optionally for one fiscal year, most recent year first.
    #[must_use]
    pub fn list_budgets(&self, fiscal_year: Option<i32>) -> Vec<Budget> {
        let mut budgets = self
            .budgets
            .filter(|b| fiscal_year.is_none_or(|year| b.fiscal_year == year));
        budgets.sort_by(|a, b| b.fiscal_year.cmp(&a.fiscal_year).then_with(|| a.name.cmp(&b.name)));
        budgets
    }

    /// Updates the budget header.
    ///
    /// # Errors
    ///
    /// Returns `BudgetLocked` on a locked budget, `EmptyName` or
    /// `DuplicateName` for an invalid new name.
    pub fn update_budget(&self, id: BudgetId, input: UpdateBudgetInput) -> Result<Budget, BudgetError> {
        let current = self.get_budget(id)?;
        let name = match input.name {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(BudgetError::EmptyName);
                }
                if self.name_taken(&name, current.fiscal_year, Some(id)) {
                    return Err(BudgetError::DuplicateName(current.fiscal_year));
                }
                Some(name)
            }
            None => None,
        };

        let budget = self
            .budgets
            .update(&id, |budget| {
                if budget.is_locked {
                    return Err(BudgetError::BudgetLocked);
                }
                if let Some(name) = name {
                    budget.name = name;
                }
                if input.description.is_some() {
                    budget.description = input.description;
                }
                budget.updated_at = Utc::now();
                Ok(budget.clone())
            })
            .ok_or(BudgetError::NotFound(id))??;

        info!(budget_id = %id, "Budget updated");
        Ok(budget)
    }

    /// Deletes a budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetLocked` if the budget is locked.
    pub fn delete_budget(&self, id: BudgetId) -> Result<(), BudgetError> {
        let budget = self.get_budget(id)?;
        if budget.is_locked {
            return Err(BudgetError::BudgetLocked);
        }
        self.budgets.remove(&id);
        info!(budget_id = %id, "Budget deleted");
        Ok(())
    }

    /// Adds a line to a budget.
    ///
    /// # Errors
    ///
    /// See [`Self::validate_budget_line`].
    pub fn add_line(&self, id: BudgetId, input: CreateBudgetLineInput) -> Result<BudgetLine, BudgetError> {
        self.budgets
            .update(&id, |budget| {
                Self::validate_budget_line(budget, &input)?;
                let line = BudgetLine {
                    id: BudgetLineId::new(),
                    account_code: input.account_code,
                    period: input.period,
                    amount: input.amount,
                    notes: input.notes,
                };
                budget.lines.push(line.clone());
                budget.updated_at = Utc::now();
                Ok(line)
            })
            .ok_or(BudgetError::NotFound(id))?
    }

    /// Removes a line from a budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetLocked` on a locked budget and `LineNotFound` for an
    /// unknown line.
    pub fn remove_line(&self, id: BudgetId, line_id: BudgetLineId) -> Result<(), BudgetError> {
        self.budgets
            .update(&id, |budget| {
                if budget.is_locked {
                    return Err(BudgetError::BudgetLocked);
                }
                let before = budget.lines.len();
                budget.lines.retain(|l| l.id != line_id);
                if budget.lines.len() == before {
                    return Err(BudgetError::LineNotFound(line_id));
                }
                budget.updated_at = Utc::now();
                Ok(())
            })
            .ok_or(BudgetError::NotFound(id))?
    }

    /// Locks a budget. Locking twice is a no-op.
    pub fn lock(&self, id: BudgetId) -> Result<Budget, BudgetError> {
        let budget = self
            .budgets
            .update(&id, |budget| {
                if !budget.is_locked {
                    budget.is_locked = true;
                    budget.updated_at = Utc::now();
                }
                budget.clone()
            })
            .ok_or(BudgetError::NotFound(id))?;
        info!(budget_id = %id, "Budget locked");
        Ok(budget)
    }

    /// Compares every budget line with the actual amounts booked on the same
    /// account and month. Actuals without a budget line are ignored.
    pub fn budget_vs_actual(
        &self,
        id: BudgetId,
        actuals: &[ActualAmount],
    ) -> Result<BudgetVsActualReport, BudgetError> {
        let budget = self.get_budget(id)?;

        let mut booked: HashMap<(&str, u8), Decimal> = HashMap::new();
        for actual in actuals {
            *booked
                .entry((actual.account_code.as_str(), actual.period))
                .or_default() += actual.amount;
        }

        let mut lines: Vec<BudgetLineWithActual> = budget
            .lines
            .iter()
            .map(|line| {
                let actual = booked
                    .get(&(line.account_code.as_str(), line.period))
                    .copied()
                    .unwrap_or_default();
                let result = Self::calculate_variance(line.amount, actual, &line.account_code);
                BudgetLineWithActual {
                    id: line.id,
                    account_code: line.account_code.clone(),
                    period: line.period,
                    budgeted: result.budgeted,
                    actual: result.actual,
                    variance: result.variance,
                    utilization_percent: result.utilization_percent,
                    status: result.status,
                }
            })
            .collect();
        lines.sort_by(|a, b| {
            a.account_code
                .cmp(&b.account_code)
                .then(a.period.cmp(&b.period))
        });

        let total_budgeted: Decimal = lines.iter().map(|l| l.budgeted).sum();
        let total_actual: Decimal = lines.iter().map(|l| l.actual).sum();
        let total_variance: Decimal = lines.iter().map(|l| l.variance).sum();

        Ok(BudgetVsActualReport {
            budget_id: budget.id,
            budget_name: budget.name,
            fiscal_year: budget.fiscal_year,
            lines,
            summary: BudgetVsActualSummary {
                total_budgeted,
                total_actual,
                total_variance,
                overall_utilization: ratio_percent(total_actual, total_budgeted),
            },
        })
    }

    fn name_taken(&self, name: &str, fiscal_year: i32, except: Option<BudgetId>) -> bool {
        self.budgets.any(|b| {
            b.fiscal_year == fiscal_year
                && b.name.eq_ignore_ascii_case(name)
                && Some(b.id) != except
        })
    }
}

/// `part / whole * 100` rounded to 2 places, `0` when `whole` is zero.
fn ratio_percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ohada_shared::types::Currency;
    use rust_decimal_macros::dec;

    fn budget_input(name: &str) -> CreateBudgetInput {
        CreateBudgetInput {
            name: name.to_string(),
            description: None,
            fiscal_year: 2025,
            currency: Currency::Xof,
        }
    }

    fn line(account: &str, period: u8, amount: Decimal) -> CreateBudgetLineInput {
        CreateBudgetLineInput {
            account_code: account.to_string(),
            period,
            amount,
            notes: None,
        }
    }

    #[test]
    fn test_expense_variance_favorable() {
        let result = BudgetService::calculate_variance(dec!(1000), dec!(800), "601100");

        assert_eq!(result.budgeted, dec!(1000));
        assert_eq!(result.actual, dec!(800));
        assert_eq!(result.variance, dec!(200));
        assert_eq!(result.variance_percent, dec!(20.00));
        assert_eq!(result.utilization_percent, dec!(80.00));
        assert_eq!(result.status, VarianceStatus::Favorable);
    }

    #[test]
    fn test_expense_variance_unfavorable() {
        let result = BudgetService::calculate_variance(dec!(1000), dec!(1200), "622000");

        assert_eq!(result.variance, dec!(-200));
        assert_eq!(result.variance_percent, dec!(-20.00));
        assert_eq!(result.utilization_percent, dec!(120.00));
        assert_eq!(result.status, VarianceStatus::Unfavorable);
    }

    #[test]
    fn test_revenue_variance_favorable() {
        let result = BudgetService::calculate_variance(dec!(1000), dec!(1200), "701100");

        assert_eq!(result.variance, dec!(200));
        assert_eq!(result.variance_percent, dec!(20.00));
        assert_eq!(result.status, VarianceStatus::Favorable);
    }

    #[test]
    fn test_revenue_variance_unfavorable() {
        let result = BudgetService::calculate_variance(dec!(1000), dec!(800), "706000");

        assert_eq!(result.variance, dec!(-200));
        assert_eq!(result.status, VarianceStatus::Unfavorable);
    }

    #[test]
    fn test_variance_on_budget() {
        let result = BudgetService::calculate_variance(dec!(1000), dec!(1000), "601100");

        assert_eq!(result.variance, dec!(0));
        assert_eq!(result.status, VarianceStatus::OnBudget);
    }

    #[test]
    fn test_zero_budget_utilization() {
        let result = BudgetService::calculate_variance(dec!(0), dec!(500), "601100");

        assert_eq!(result.utilization_percent, dec!(0));
        assert_eq!(result.variance_percent, dec!(0));
    }

    #[test]
    fn test_create_and_list_budgets() {
        let service = BudgetService::new();
        service.create_budget(budget_input("Budget d'exploitation")).unwrap();
        service
            .create_budget(CreateBudgetInput {
                fiscal_year: 2026,
                ..budget_input("Budget d'exploitation")
            })
            .unwrap();

        assert_eq!(service.list_budgets(None).len(), 2);
        assert_eq!(service.list_budgets(None)[0].fiscal_year, 2026);
        assert_eq!(service.list_budgets(Some(2025)).len(), 1);
    }

    #[test]
    fn test_create_rejects_blank_and_duplicate_names() {
        let service = BudgetService::new();
        assert!(matches!(
            service.create_budget(budget_input("  ")),
            Err(BudgetError::EmptyName)
        ));

        service.create_budget(budget_input("Investissements")).unwrap();
        assert!(matches!(
            service.create_budget(budget_input("investissements")),
            Err(BudgetError::DuplicateName(2025))
        ));
    }

    #[test]
    fn test_update_budget() {
        let service = BudgetService::new();
        let budget = service.create_budget(budget_input("Exploitation")).unwrap();
        let updated = service
            .update_budget(
                budget.id,
                UpdateBudgetInput {
                    name: Some("Exploitation révisé".to_string()),
                    description: Some("Révision de mi-année".to_string()),
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Exploitation révisé");
        assert_eq!(updated.description.as_deref(), Some("Révision de mi-année"));
        assert!(updated.updated_at >= budget.updated_at);
    }

    #[test]
    fn test_add_line_validation() {
        let service = BudgetService::new();
        let budget = service.create_budget(budget_input("Exploitation")).unwrap();

        service.add_line(budget.id, line("601100", 1, dec!(250000))).unwrap();
        assert!(matches!(
            service.add_line(budget.id, line("601100", 1, dec!(1))),
            Err(BudgetError::DuplicateBudgetLine { period: 1, .. })
        ));
        assert!(matches!(
            service.add_line(budget.id, line("601100", 13, dec!(1))),
            Err(BudgetError::InvalidPeriod(13))
        ));
        assert!(matches!(
            service.add_line(budget.id, line("601100", 2, dec!(-1))),
            Err(BudgetError::NegativeAmount)
        ));
        assert!(matches!(
            service.add_line(budget.id, line("X01", 2, dec!(1))),
            Err(BudgetError::InvalidAccountCode(_))
        ));
        assert!(matches!(
            service.add_line(BudgetId::new(), line("601100", 2, dec!(1))),
            Err(BudgetError::NotFound(_))
        ));

        assert_eq!(service.get_budget(budget.id).unwrap().total_budgeted(), dec!(250000));
    }

    #[test]
    fn test_locked_budget_is_read_only() {
        let service = BudgetService::new();
        let budget = service.create_budget(budget_input("Exploitation")).unwrap();
        let added = service.add_line(budget.id, line("601100", 1, dec!(100))).unwrap();

        let locked = service.lock(budget.id).unwrap();
        assert!(locked.is_locked);
        assert!(service.lock(budget.id).unwrap().is_locked);

        assert!(matches!(
            service.add_line(budget.id, line("601100", 2, dec!(100))),
            Err(BudgetError::BudgetLocked)
        ));
        assert!(matches!(
            service.remove_line(budget.id, added.id),
            Err(BudgetError::BudgetLocked)
        ));
        assert!(matches!(
            service.update_budget(budget.id, UpdateBudgetInput::default()),
            Err(BudgetError::BudgetLocked)
        ));
        assert!(matches!(
            service.delete_budget(budget.id),
            Err(BudgetError::BudgetLocked)
        ));
    }

    #[test]
    fn test_remove_line_and_delete() {
        let service = BudgetService::new();
        let budget = service.create_budget(budget_input("Exploitation")).unwrap();
        let added = service.add_line(budget.id, line("601100", 1, dec!(100))).unwrap();

        service.remove_line(budget.id, added.id).unwrap();
        assert!(matches!(
            service.remove_line(budget.id, added.id),
            Err(BudgetError::LineNotFound(_))
        ));

        service.delete_budget(budget.id).unwrap();
        assert!(matches!(
            service.get_budget(budget.id),
            Err(BudgetError::NotFound(_))
        ));
    }

    #[test]
    fn test_budget_vs_actual() {
        let service = BudgetService::new();
        let budget = service.create_budget(budget_input("Exploitation")).unwrap();
        service.add_line(budget.id, line("701100", 1, dec!(1000000))).unwrap();
        service.add_line(budget.id, line("601100", 1, dec!(400000))).unwrap();

        let actuals = vec![
            ActualAmount {
                account_code: "601100".to_string(),
                period: 1,
                amount: dec!(300000),
            },
            ActualAmount {
                account_code: "601100".to_string(),
                period: 1,
                amount: dec!(150000),
            },
            ActualAmount {
                account_code: "701100".to_string(),
                period: 1,
                amount: dec!(1200000),
            },
            ActualAmount {
                account_code: "621000".to_string(),
                period: 1,
                amount: dec!(999),
            },
        ];

        let report = service.budget_vs_actual(budget.id, &actuals).unwrap();
        assert_eq!(report.lines.len(), 2);

        let purchases = &report.lines[0];
        assert_eq!(purchases.account_code, "601100");
        assert_eq!(purchases.actual, dec!(450000));
        assert_eq!(purchases.variance, dec!(-50000));
        assert_eq!(purchases.status, VarianceStatus::Unfavorable);

        let sales = &report.lines[1];
        assert_eq!(sales.variance, dec!(200000));
        assert_eq!(sales.status, VarianceStatus::Favorable);

        assert_eq!(report.summary.total_budgeted, dec!(1400000));
        assert_eq!(report.summary.total_actual, dec!(1650000));
        assert_eq!(report.summary.total_variance, dec!(150000));
        assert_eq!(report.summary.overall_utilization, dec!(117.86));
    }
}
