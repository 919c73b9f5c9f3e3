//! Reshapes models into display-ready rows of strings.

use std::{collections::HashMap, sync::OnceLock};

use numfmt::{Formatter, Precision};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    BudgetStatus, Category, DatabaseId, Expense,
    category::{CategoryRow, ROOT_PARENT_ID},
};

/// The max number of graphemes to display in the comment column before
/// truncating and displaying ellipses.
const MAX_COMMENT_GRAPHEMES: usize = 32;

/// Amounts at or above this size are printed by numfmt in scientific notation.
const LARGE_AMOUNT: f64 = 1e12;

/// Format an amount of money rounded to the nearest cent, e.g. "$1,234.50".
///
/// Amounts of a trillion or more are written without thousands separators.
/// Infinite and NaN amounts are written as "inf", "-inf" and "NaN".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .expect("valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .expect("valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    if !number.is_finite() {
        return number.to_string();
    }

    let number = (number * 100.0).round() / 100.0;

    let formatted_string = if number <= -LARGE_AMOUNT {
        return format!("-${:.2}", number.abs());
    } else if number >= LARGE_AMOUNT {
        return format!("${number:.2}");
    } else if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "$0.00".to_owned();
    };

    // numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3" and
    // "12.00" as "12".
    match formatted_string.rfind('.') {
        None => format!("{formatted_string}.00"),
        Some(position) if formatted_string.len() - position == 2 => {
            format!("{formatted_string}0")
        }
        Some(_) => formatted_string,
    }
}

/// Shorten `comment` to at most [MAX_COMMENT_GRAPHEMES] graphemes, ending in "..." when cut.
pub fn truncate_comment(comment: &str) -> String {
    let comment_length = comment.graphemes(true).count();

    if comment_length <= MAX_COMMENT_GRAPHEMES {
        comment.to_owned()
    } else {
        let truncated: String = comment
            .graphemes(true)
            .take(MAX_COMMENT_GRAPHEMES - 3)
            .collect();

        truncated + "..."
    }
}

/// Map each category ID to its name.
pub fn category_names(categories: &[Category]) -> HashMap<DatabaseId, String> {
    categories
        .iter()
        .map(|category| (category.id, category.name.to_string()))
        .collect()
}

/// Flatten categories into `(id, name, parent id or 0)` rows for [crate::build_forest].
pub fn category_rows(categories: &[Category]) -> Vec<CategoryRow> {
    categories
        .iter()
        .map(|category| CategoryRow {
            id: category.id,
            name: category.name.to_string(),
            parent_id: category.parent.unwrap_or(ROOT_PARENT_ID),
        })
        .collect()
}

/// Format expenses as `[id, date, amount, category, comment]` rows.
///
/// Expenses without a category, or with a category missing from
/// `category_names`, get an empty category cell.
pub fn format_expense_rows(
    expenses: &[Expense],
    category_names: &HashMap<DatabaseId, String>,
) -> Vec<Vec<String>> {
    expenses
        .iter()
        .map(|expense| {
            let category = expense
                .category
                .and_then(|category_id| category_names.get(&category_id))
                .cloned()
                .unwrap_or_default();

            vec![
                expense.id.to_string(),
                expense.date.to_string(),
                format_currency(expense.amount),
                category,
                truncate_comment(&expense.comment),
            ]
        })
        .collect()
}

/// Format budget statuses as `[id, period, amount, spent, remaining]` rows.
pub fn format_budget_rows(statuses: &[BudgetStatus]) -> Vec<Vec<String>> {
    statuses
        .iter()
        .map(|status| {
            vec![
                status.budget.id.to_string(),
                status.budget.period.to_string(),
                format_currency(status.budget.amount),
                format_currency(status.spent),
                format_currency(status.remaining()),
            ]
        })
        .collect()
}

#[cfg(test)]
mod formatter_tests {
    use std::collections::HashMap;

    use time::macros::date;

    use crate::{
        Budget, BudgetPeriod, BudgetStatus, Category, CategoryName, Expense, PeriodWindow,
        category::CategoryRow,
    };

    use super::{
        category_names, category_rows, format_budget_rows, format_currency, format_expense_rows,
        truncate_comment,
    };

    #[test]
    fn formats_currency_with_two_decimals() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(12.3), "$12.30");
        assert_eq!(format_currency(12.0), "$12.00");
        assert_eq!(format_currency(7.25), "$7.25");
        assert_eq!(format_currency(-5.5), "-$5.50");
    }

    #[test]
    fn formats_currency_rounds_sub_cent_amounts() {
        assert_eq!(format_currency(0.004), "$0.00");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency(0.006), "$0.01");
        assert_eq!(format_currency(1.234), "$1.23");
        assert_eq!(format_currency(99.999), "$100.00");
        assert_eq!(format_currency(-99.999), "-$100.00");
    }

    #[test]
    fn formats_currency_without_scientific_notation() {
        assert_eq!(format_currency(1e15), "$1000000000000000.00");
        assert_eq!(format_currency(-2.5e12), "-$2500000000000.00");
        assert_eq!(format_currency(f64::INFINITY), "inf");
        assert_eq!(format_currency(f64::NAN), "NaN");
    }

    #[test]
    fn short_comment_is_unchanged() {
        assert_eq!(truncate_comment("coffee"), "coffee");
    }

    #[test]
    fn long_comment_is_truncated_on_graphemes() {
        let comment = "🍎".repeat(40);

        let truncated = truncate_comment(&comment);

        assert_eq!(truncated, format!("{}...", "🍎".repeat(29)));
    }

    #[test]
    fn category_rows_use_zero_for_roots() {
        let mut food = Category::new(CategoryName::new_unchecked("Food"), None);
        food.id = 1;
        let mut groceries = Category::new(CategoryName::new_unchecked("Groceries"), Some(1));
        groceries.id = 2;

        let rows = category_rows(&[food, groceries]);

        assert_eq!(
            rows,
            vec![
                CategoryRow {
                    id: 1,
                    name: "Food".to_owned(),
                    parent_id: 0
                },
                CategoryRow {
                    id: 2,
                    name: "Groceries".to_owned(),
                    parent_id: 1
                },
            ]
        );
    }

    #[test]
    fn expense_rows_look_up_category_names() {
        let mut food = Category::new(CategoryName::new_unchecked("Food"), None);
        food.id = 1;
        let names = category_names(&[food]);
        let mut known = Expense::new(3.5, date!(2024 - 05 - 01), Some(1), "bread");
        known.id = 10;
        let mut unknown = Expense::new(1.0, date!(2024 - 05 - 02), Some(99), "");
        unknown.id = 11;
        let mut uncategorised = Expense::new(2.0, date!(2024 - 05 - 03), None, "bus");
        uncategorised.id = 12;

        let rows = format_expense_rows(&[known, unknown, uncategorised], &names);

        assert_eq!(
            rows,
            vec![
                vec!["10", "2024-05-01", "$3.50", "Food", "bread"],
                vec!["11", "2024-05-02", "$1.00", "", ""],
                vec!["12", "2024-05-03", "$2.00", "", "bus"],
            ]
        );
    }

    #[test]
    fn expense_rows_with_no_names() {
        let expense = Expense::new(3.5, date!(2024 - 05 - 01), Some(1), "bread");

        let rows = format_expense_rows(&[expense], &HashMap::new());

        assert_eq!(rows[0][3], "");
    }

    #[test]
    fn budget_rows_show_spent_and_remaining() {
        let mut budget = Budget::new(100.0, BudgetPeriod::Week);
        budget.id = 3;
        let status = BudgetStatus {
            budget,
            window: PeriodWindow {
                start: date!(2024 - 03 - 11),
                end: date!(2024 - 03 - 18),
            },
            spent: 25.5,
        };

        let rows = format_budget_rows(&[status]);

        assert_eq!(rows, vec![vec!["3", "week", "$100.00", "$25.50", "$74.50"]]);
    }
}
