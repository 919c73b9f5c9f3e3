//! Budgets and the spending measured against them.

mod domain;
mod window;

use serde::Serialize;
use time::Date;

use crate::Expense;

pub use domain::{Budget, BudgetColumn, BudgetPeriod};
pub use window::{PeriodWindow, compute_period_window, spent_in_window};

/// A budget alongside how much has been spent in its current window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    /// The budget being tracked.
    pub budget: Budget,
    /// The window of the budget's period that contains "today".
    pub window: PeriodWindow,
    /// Total spent inside the window, rounded to cents.
    pub spent: f64,
}

impl BudgetStatus {
    /// Measure each budget against the expenses in its window around `today`.
    pub fn for_budgets(budgets: &[Budget], expenses: &[Expense], today: Date) -> Vec<Self> {
        budgets
            .iter()
            .map(|budget| {
                let window = compute_period_window(budget.period, today);

                Self {
                    budget: budget.clone(),
                    window,
                    spent: spent_in_window(expenses, window),
                }
            })
            .collect()
    }

    /// How much of the budget is left, negative when overspent.
    pub fn remaining(&self) -> f64 {
        ((self.budget.amount - self.spent) * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod budget_status_tests {
    use time::macros::date;

    use crate::{Budget, BudgetPeriod, Expense};

    use super::BudgetStatus;

    #[test]
    fn each_budget_uses_its_own_window() {
        let today = date!(2024 - 03 - 14);
        let budgets = vec![
            Budget::new(50.0, BudgetPeriod::Week),
            Budget::new(500.0, BudgetPeriod::Month),
        ];
        let expenses = vec![
            Expense::new(20.0, date!(2024 - 03 - 13), None, "this week"),
            Expense::new(30.0, date!(2024 - 03 - 05), None, "earlier this month"),
        ];

        let statuses = BudgetStatus::for_budgets(&budgets, &expenses, today);

        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].spent, 20.0);
        assert_eq!(statuses[1].spent, 50.0);
        assert_eq!(statuses[1].remaining(), 450.0);
    }

    #[test]
    fn overspending_gives_negative_remaining() {
        let budgets = vec![Budget::new(10.0, BudgetPeriod::Month)];
        let expenses = vec![Expense::new(12.5, date!(2024 - 03 - 10), None, "")];

        let statuses = BudgetStatus::for_budgets(&budgets, &expenses, date!(2024 - 03 - 14));

        assert_eq!(statuses[0].remaining(), -2.5);
    }
}
