//! The expense model.

use rusqlite::{Row, types::Value};
use serde::Serialize;
use time::Date;

use crate::{
    DatabaseId, UNASSIGNED_ID,
    repository::{Column, Entity},
};

/// Money spent on a given day, optionally filed under a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// The ID of the expense, [UNASSIGNED_ID] until it is stored.
    pub id: DatabaseId,
    /// How much was spent.
    pub amount: f64,
    /// The day the money was spent.
    pub date: Date,
    /// The ID of the category the expense is filed under.
    pub category: Option<DatabaseId>,
    /// Free-text note about the expense.
    pub comment: String,
}

impl Expense {
    /// Create an expense that has not been stored yet.
    pub fn new(amount: f64, date: Date, category: Option<DatabaseId>, comment: &str) -> Self {
        Self {
            id: UNASSIGNED_ID,
            amount,
            date,
            category,
            comment: comment.to_owned(),
        }
    }
}

/// The columns of the expense table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseColumn {
    /// The amount spent.
    Amount,
    /// The date of the expense, as `YYYY-MM-DD` text.
    Date,
    /// The ID of the category.
    Category,
    /// The comment.
    Comment,
}

impl Column for ExpenseColumn {
    fn name(self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Date => "date",
            Self::Category => "category",
            Self::Comment => "comment",
        }
    }
}

impl Entity for Expense {
    type Column = ExpenseColumn;

    const TABLE: &'static str = "expense";

    const COLUMNS: &'static [ExpenseColumn] = &[
        ExpenseColumn::Amount,
        ExpenseColumn::Date,
        ExpenseColumn::Category,
        ExpenseColumn::Comment,
    ];

    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            category INTEGER,
            comment TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);
        CREATE INDEX IF NOT EXISTS idx_expense_category ON expense(category);";

    fn id(&self) -> DatabaseId {
        self.id
    }

    fn set_id(&mut self, id: DatabaseId) {
        self.id = id;
    }

    fn value(&self, column: ExpenseColumn) -> Value {
        match column {
            ExpenseColumn::Amount => Value::Real(self.amount),
            ExpenseColumn::Date => Value::Text(self.date.to_string()),
            ExpenseColumn::Category => self.category.into(),
            ExpenseColumn::Comment => Value::Text(self.comment.clone()),
        }
    }

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            amount: row.get(1)?,
            date: row.get(2)?,
            category: row.get(3)?,
            comment: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod expense_tests {
    use rusqlite::types::Value;
    use time::macros::date;

    use crate::{Entity, UNASSIGNED_ID};

    use super::{Expense, ExpenseColumn};

    #[test]
    fn new_expense_is_unassigned() {
        let expense = Expense::new(9.99, date!(2024 - 02 - 29), None, "book");

        assert_eq!(expense.id, UNASSIGNED_ID);
    }

    #[test]
    fn date_is_stored_as_iso_text() {
        let expense = Expense::new(9.99, date!(2024 - 02 - 09), None, "book");

        assert_eq!(
            expense.value(ExpenseColumn::Date),
            Value::Text("2024-02-09".to_owned())
        );
    }

    #[test]
    fn missing_category_is_null() {
        let expense = Expense::new(9.99, date!(2024 - 02 - 09), None, "book");

        assert_eq!(expense.value(ExpenseColumn::Category), Value::Null);
    }
}
