//! Date windows for budget periods and the spending inside them.

use serde::Serialize;
use time::{Date, Duration, Month};

use crate::{BudgetPeriod, Expense};

/// The dates a budget period covers relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    /// The first date of the window.
    pub start: Date,
    /// The date the window ends on.
    pub end: Date,
}

impl PeriodWindow {
    /// Whether `date` lies strictly between the start and the end of the window.
    ///
    /// Both bounds are exclusive, so expenses dated on the start or end date
    /// are not counted.
    pub fn contains(&self, date: Date) -> bool {
        self.start < date && date < self.end
    }
}

/// Compute the window of `period` that contains `today`.
///
/// - Day: `today` to the next day.
/// - Week: Monday of the current week to the Monday after.
/// - Month: the first to the last day of the current month.
/// - Year: 1 January to 1 January of the next year.
pub fn compute_period_window(period: BudgetPeriod, today: Date) -> PeriodWindow {
    match period {
        BudgetPeriod::Day => PeriodWindow {
            start: today,
            end: today + Duration::days(1),
        },
        BudgetPeriod::Week => {
            let start =
                today - Duration::days(today.weekday().number_days_from_monday() as i64);

            PeriodWindow {
                start,
                end: start + Duration::weeks(1),
            }
        }
        BudgetPeriod::Month => month_bounds(today.year(), today.month()),
        BudgetPeriod::Year => PeriodWindow {
            start: Date::from_calendar_date(today.year(), Month::January, 1)
                .expect("invalid year start date"),
            end: Date::from_calendar_date(today.year() + 1, Month::January, 1)
                .expect("invalid next year start date"),
        },
    }
}

/// Sum the amounts of the expenses dated inside `window`, rounded to cents.
pub fn spent_in_window(expenses: &[Expense], window: PeriodWindow) -> f64 {
    let total: f64 = expenses
        .iter()
        .filter(|expense| window.contains(expense.date))
        .map(|expense| expense.amount)
        .sum();

    (total * 100.0).round() / 100.0
}

fn month_bounds(year: i32, month: Month) -> PeriodWindow {
    let start = Date::from_calendar_date(year, month, 1).expect("invalid month start date");
    let end = Date::from_calendar_date(year, month, last_day_of_month(year, month))
        .expect("invalid month end date");

    PeriodWindow { start, end }
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if time::util::is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}
