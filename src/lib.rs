//! Bookkeeper is a small application for recording expenses, organising them
//! into a tree of categories and tracking spending against budgets.
//!
//! This library provides the domain models, the SQLite-backed repositories
//! that store them, and the [Bookkeeper] service that the command line front
//! end drives.

#![warn(missing_docs)]

mod bookkeeper;
mod budget;
mod category;
mod config;
mod database_id;
mod db;
mod expense;
mod formatter;
mod logging;
mod repository;
mod table;
mod timezone;

pub use bookkeeper::{Bookkeeper, DeleteCategoryResult, ExpenseChanges, SqliteBookkeeper};
pub use budget::{
    Budget, BudgetColumn, BudgetPeriod, BudgetStatus, PeriodWindow, compute_period_window,
    spent_in_window,
};
pub use category::{
    Category, CategoryColumn, CategoryName, CategoryNode, CategoryRow, ROOT_PARENT_ID,
    build_forest, create_from_tree, get_all_parents, get_parent, get_subcategories, render_forest,
};
pub use config::{AppConfig, DEFAULT_TIMEZONE, OutputFormat};
pub use database_id::{DatabaseId, UNASSIGNED_ID};
pub use db::initialize as initialize_db;
pub use expense::{Expense, ExpenseColumn};
pub use formatter::{
    category_names, category_rows, format_budget_rows, format_currency, format_expense_rows,
    truncate_comment,
};
pub use logging::{init_logging, level_for_verbosity};
pub use repository::{Column, Entity, Filter, MemoryRepository, Repository, SqliteRepository};
pub use table::render_table;
pub use timezone::{get_local_offset, today_in};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// Tried to add an item that already has an ID.
    ///
    /// Items are created with [UNASSIGNED_ID] and receive their ID from the
    /// repository they are added to.
    #[error("tried to add an item that already has the ID {0}")]
    IdAlreadyAssigned(DatabaseId),

    /// Tried to update an item that was never added to a repository.
    #[error("tried to update an item that has not been assigned an ID")]
    UnassignedId,

    /// Tried to update a row that does not exist.
    #[error("tried to update {table} {id}, which is not in the database")]
    UpdateMissing {
        /// The table the row was expected in.
        table: &'static str,
        /// The ID of the missing row.
        id: DatabaseId,
    },

    /// Tried to delete a row that does not exist.
    #[error("tried to delete {table} {id}, which is not in the database")]
    DeleteMissing {
        /// The table the row was expected in.
        table: &'static str,
        /// The ID of the missing row.
        id: DatabaseId,
    },

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The parent of a category does not refer to a valid category.
    #[error("the parent ID {0} does not refer to a valid category")]
    InvalidParent(DatabaseId),

    /// Following the parents of a category leads back to the category itself.
    #[error("category {0} would be its own ancestor")]
    CategoryCycle(DatabaseId),

    /// Two category rows share the same ID.
    #[error("the category ID {0} appears more than once")]
    DuplicateCategoryId(DatabaseId),

    /// A category row refers to a parent that is not in the row set.
    #[error("category {id} refers to the missing parent {parent_id}")]
    DanglingParent {
        /// The category with the dangling reference.
        id: DatabaseId,
        /// The parent ID that could not be found.
        parent_id: DatabaseId,
    },

    /// The category ID used for an expense did not match a valid category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(DatabaseId),

    /// A string could not be parsed as a budget period.
    #[error("\"{0}\" is not a budget period, expected one of day, week or month")]
    InvalidBudgetPeriod(String),

    /// The period is a valid window but cannot be used for a budget.
    #[error("budgets cannot be set for the period \"{0}\"")]
    UnsupportedBudgetPeriod(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
