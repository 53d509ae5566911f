//! Property-based tests for budget module.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::BudgetService;
use super::types::VarianceStatus;

fn arb_expense_code() -> impl Strategy<Value = String> {
    "6[0-9]{3}00"
}

fn arb_revenue_code() -> impl Strategy<Value = String> {
    "7[0-9]{3}00"
}

proptest! {
    /// For expense accounts: variance = budgeted - actual, favorable if variance > 0
    #[test]
    fn test_variance_calculation_expense(
        budgeted in 0i64..1_000_000_000,
        actual in 0i64..1_000_000_000,
        code in arb_expense_code(),
    ) {
        let budgeted = Decimal::from(budgeted);
        let actual = Decimal::from(actual);

        let result = BudgetService::calculate_variance(budgeted, actual, &code);

        prop_assert_eq!(result.variance, budgeted - actual);

        if result.variance > Decimal::ZERO {
            prop_assert_eq!(result.status, VarianceStatus::Favorable);
        } else if result.variance < Decimal::ZERO {
            prop_assert_eq!(result.status, VarianceStatus::Unfavorable);
        } else {
            prop_assert_eq!(result.status, VarianceStatus::OnBudget);
        }
    }

    /// For revenue accounts: variance = actual - budgeted, favorable if variance > 0
    #[test]
    fn test_variance_calculation_revenue(
        budgeted in 0i64..1_000_000_000,
        actual in 0i64..1_000_000_000,
        code in arb_revenue_code(),
    ) {
        let budgeted = Decimal::from(budgeted);
        let actual = Decimal::from(actual);

        let result = BudgetService::calculate_variance(budgeted, actual, &code);

        prop_assert_eq!(result.variance, actual - budgeted);

        if result.variance > Decimal::ZERO {
            prop_assert_eq!(result.status, VarianceStatus::Favorable);
        } else if result.variance < Decimal::ZERO {
            prop_assert_eq!(result.status, VarianceStatus::Unfavorable);
        } else {
            prop_assert_eq!(result.status, VarianceStatus::OnBudget);
        }
    }

    /// Utilization is actual / budgeted * 100 and 0 on a zero budget.
    #[test]
    fn test_utilization_percent(
        budgeted in 0i64..1_000_000,
        actual in 0i64..1_000_000,
    ) {
        let budgeted = Decimal::from(budgeted);
        let actual = Decimal::from(actual);

        let result = BudgetService::calculate_variance(budgeted, actual, "601100");

        if budgeted.is_zero() {
            prop_assert_eq!(result.utilization_percent, Decimal::ZERO);
        } else {
            let expected = (actual / budgeted * dec!(100)).round_dp(2);
            prop_assert_eq!(result.utilization_percent, expected);
        }
    }
}
