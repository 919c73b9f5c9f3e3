//! Core budget domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Row, types::Value};
use serde::Serialize;

use crate::{
    DatabaseId, Error, UNASSIGNED_ID,
    repository::{Column, Entity},
};

/// The recurring period a budget applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetPeriod {
    /// Today.
    Day,
    /// The current week, starting on Monday.
    Week,
    /// The current calendar month.
    Month,
    /// The current calendar year. Only used for spending windows, budgets cannot be set for it.
    Year,
}

impl BudgetPeriod {
    /// The periods that budgets can be set for.
    pub const ALLOWED: [BudgetPeriod; 3] = [Self::Day, Self::Week, Self::Month];

    /// The label used for the period in the database and on the command line.
    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Whether a budget can be set for this period.
    pub fn is_allowed_for_budgets(self) -> bool {
        Self::ALLOWED.contains(&self)
    }
}

impl FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(Error::InvalidBudgetPeriod(s.to_owned())),
        }
    }
}

impl Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A spending ceiling for a recurring period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    /// The ID of the budget, [UNASSIGNED_ID] until it is stored.
    pub id: DatabaseId,
    /// The most that should be spent in one period.
    pub amount: f64,
    /// The period the amount applies to.
    pub period: BudgetPeriod,
}

impl Budget {
    /// Create a budget that has not been stored yet.
    pub fn new(amount: f64, period: BudgetPeriod) -> Self {
        Self {
            id: UNASSIGNED_ID,
            amount,
            period,
        }
    }
}

/// The columns of the budget table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetColumn {
    /// The budget amount.
    Amount,
    /// The period label.
    Period,
}

impl Column for BudgetColumn {
    fn name(self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Period => "period",
        }
    }
}

impl Entity for Budget {
    type Column = BudgetColumn;

    const TABLE: &'static str = "budget";

    const COLUMNS: &'static [BudgetColumn] = &[BudgetColumn::Amount, BudgetColumn::Period];

    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            period TEXT NOT NULL
        );";

    fn id(&self) -> DatabaseId {
        self.id
    }

    fn set_id(&mut self, id: DatabaseId) {
        self.id = id;
    }

    fn value(&self, column: BudgetColumn) -> Value {
        match column {
            BudgetColumn::Amount => Value::Real(self.amount),
            BudgetColumn::Period => Value::Text(self.period.label().to_owned()),
        }
    }

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let raw_period: String = row.get(2)?;
        let period = raw_period.parse().map_err(|error: Error| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?;

        Ok(Self {
            id: row.get(0)?,
            amount: row.get(1)?,
            period,
        })
    }
}
