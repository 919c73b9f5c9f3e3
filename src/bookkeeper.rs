//! The service that ties the repositories together.
//!
//! [Bookkeeper] validates user input, keeps references between categories
//! and expenses consistent, and produces the views the front end prints.

use std::path::Path;

use serde::Serialize;
use time::Date;

use crate::{
    Budget, BudgetPeriod, BudgetStatus, Category, CategoryName, CategoryNode, DatabaseId, Error,
    Expense,
    category::{CategoryColumn, build_forest, get_all_parents},
    expense::ExpenseColumn,
    formatter::{category_names, category_rows, format_expense_rows},
    repository::{Filter, Repository, SqliteRepository},
};

/// A [Bookkeeper] that stores everything in one SQLite file.
pub type SqliteBookkeeper =
    Bookkeeper<SqliteRepository<Category>, SqliteRepository<Expense>, SqliteRepository<Budget>>;

/// What happened to the rows that referred to a deleted category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteCategoryResult {
    /// The ID of the category that was deleted.
    pub deleted_category_id: DatabaseId,
    /// Child categories moved to the deleted category's parent (or to the top level).
    pub children_reparented: usize,
    /// Expenses that no longer have a category.
    pub expenses_uncategorised: usize,
}

/// Changes to apply to a stored expense. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    /// The new amount.
    pub amount: Option<f64>,
    /// The new date.
    pub date: Option<Date>,
    /// The new category, `Some(None)` removes the category.
    pub category: Option<Option<DatabaseId>>,
    /// The new comment.
    pub comment: Option<String>,
}

/// Records expenses, categories and budgets.
#[derive(Debug)]
pub struct Bookkeeper<C, E, B> {
    categories: C,
    expenses: E,
    budgets: B,
}

impl SqliteBookkeeper {
    /// Open (or create) the database at `db_path` and create any missing tables.
    ///
    /// # Errors
    /// This function will return an error if the database cannot be opened or
    /// if there is an SQL error.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, Error> {
        let db_path = db_path.as_ref();
        tracing::debug!("opening database at {db_path:?}");

        Ok(Self::new(
            SqliteRepository::new(db_path)?,
            SqliteRepository::new(db_path)?,
            SqliteRepository::new(db_path)?,
        ))
    }
}

impl<C, E, B> Bookkeeper<C, E, B>
where
    C: Repository<Category>,
    E: Repository<Expense>,
    B: Repository<Budget>,
{
    /// Create a bookkeeper from its three repositories.
    pub fn new(categories: C, expenses: E, budgets: B) -> Self {
        Self {
            categories,
            expenses,
            budgets,
        }
    }

    /// Create a category, optionally under `parent`.
    ///
    /// # Errors
    /// - [Error::EmptyCategoryName] if `name` is blank.
    /// - [Error::InvalidParent] if `parent` does not refer to a category.
    pub fn add_category(&self, name: &str, parent: Option<DatabaseId>) -> Result<Category, Error> {
        let name = CategoryName::new(name)?;

        if let Some(parent_id) = parent {
            self.require_category(parent_id, Error::InvalidParent(parent_id))?;
        }

        let mut category = Category::new(name, parent);
        self.categories.add(&mut category)?;
        tracing::info!("created category {} ({})", category.name, category.id);

        Ok(category)
    }

    /// Rename and/or move a category.
    ///
    /// `parent` of `Some(None)` moves the category to the top level.
    ///
    /// # Errors
    /// - [Error::UpdateMissing] if there is no category with `id`.
    /// - [Error::InvalidParent] if the new parent does not exist.
    /// - [Error::CategoryCycle] if the category would become its own ancestor.
    pub fn update_category(
        &self,
        id: DatabaseId,
        name: Option<&str>,
        parent: Option<Option<DatabaseId>>,
    ) -> Result<Category, Error> {
        let mut category = self.require_category(
            id,
            Error::UpdateMissing {
                table: "category",
                id,
            },
        )?;

        if let Some(name) = name {
            category.name = CategoryName::new(name)?;
        }

        if let Some(new_parent) = parent {
            if let Some(parent_id) = new_parent {
                self.check_can_move_under(id, parent_id)?;
            }

            category.parent = new_parent;
        }

        self.categories.update(&category)?;
        tracing::info!("updated category {} ({})", category.name, category.id);

        Ok(category)
    }

    /// Delete a category.
    ///
    /// Its children move up to its parent, and expenses filed under it lose
    /// their category.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissing] if there is no category with `id`.
    pub fn delete_category(&self, id: DatabaseId) -> Result<DeleteCategoryResult, Error> {
        let category = self.require_category(
            id,
            Error::DeleteMissing {
                table: "category",
                id,
            },
        )?;

        let children = self
            .categories
            .get_all(&Filter::all().with(CategoryColumn::Parent, id))?;

        for mut child in children.iter().cloned() {
            child.parent = category.parent;
            self.categories.update(&child)?;
        }

        let expenses = self
            .expenses
            .get_all(&Filter::all().with(ExpenseColumn::Category, id))?;

        for mut expense in expenses.iter().cloned() {
            expense.category = None;
            self.expenses.update(&expense)?;
        }

        self.categories.delete(id)?;
        tracing::info!(
            "deleted category {} ({}), moved {} children and uncategorised {} expenses",
            category.name,
            id,
            children.len(),
            expenses.len()
        );

        Ok(DeleteCategoryResult {
            deleted_category_id: id,
            children_reparented: children.len(),
            expenses_uncategorised: expenses.len(),
        })
    }

    /// Get all categories ordered by ID.
    pub fn categories(&self) -> Result<Vec<Category>, Error> {
        self.categories.get_all(&Filter::all())
    }

    /// Build the category tree.
    ///
    /// # Errors
    /// Returns an error if the stored categories refer to missing parents or
    /// contain a cycle.
    pub fn category_forest(&self) -> Result<Vec<CategoryNode>, Error> {
        build_forest(&category_rows(&self.categories()?))
    }

    /// Record an expense.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if `category` does not refer to a category.
    pub fn add_expense(
        &self,
        amount: f64,
        date: Date,
        category: Option<DatabaseId>,
        comment: &str,
    ) -> Result<Expense, Error> {
        if let Some(category_id) = category {
            self.require_category(category_id, Error::InvalidCategory(category_id))?;
        }

        let mut expense = Expense::new(amount, date, category, comment.trim());
        self.expenses.add(&mut expense)?;
        tracing::info!(
            "recorded expense {} of {} on {}",
            expense.id,
            expense.amount,
            expense.date
        );

        Ok(expense)
    }

    /// Apply `changes` to the expense with `id`.
    ///
    /// # Errors
    /// - [Error::UpdateMissing] if there is no expense with `id`.
    /// - [Error::InvalidCategory] if the new category does not exist.
    pub fn update_expense(
        &self,
        id: DatabaseId,
        changes: ExpenseChanges,
    ) -> Result<Expense, Error> {
        let mut expense = self.expenses.get(id)?.ok_or(Error::UpdateMissing {
            table: "expense",
            id,
        })?;

        if let Some(Some(category_id)) = changes.category {
            self.require_category(category_id, Error::InvalidCategory(category_id))?;
        }

        if let Some(amount) = changes.amount {
            expense.amount = amount;
        }

        if let Some(date) = changes.date {
            expense.date = date;
        }

        if let Some(category) = changes.category {
            expense.category = category;
        }

        if let Some(comment) = changes.comment {
            expense.comment = comment.trim().to_owned();
        }

        self.expenses.update(&expense)?;
        tracing::info!("updated expense {}", expense.id);

        Ok(expense)
    }

    /// Delete the expense with `id`.
    pub fn delete_expense(&self, id: DatabaseId) -> Result<(), Error> {
        self.expenses.delete(id)?;
        tracing::info!("deleted expense {id}");

        Ok(())
    }

    /// Get all expenses, most recent first.
    pub fn expenses(&self) -> Result<Vec<Expense>, Error> {
        let mut expenses = self.expenses.get_all(&Filter::all())?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        Ok(expenses)
    }

    /// Get all expenses as display rows, see [crate::format_expense_rows].
    pub fn expense_rows(&self) -> Result<Vec<Vec<String>>, Error> {
        let names = category_names(&self.categories()?);

        Ok(format_expense_rows(&self.expenses()?, &names))
    }

    /// Set a budget for `period`.
    ///
    /// # Errors
    /// Returns [Error::UnsupportedBudgetPeriod] for a period that budgets cannot be set for.
    pub fn add_budget(&self, amount: f64, period: BudgetPeriod) -> Result<Budget, Error> {
        check_budget_period(period)?;

        let mut budget = Budget::new(amount, period);
        self.budgets.add(&mut budget)?;
        tracing::info!("set {} budget {} to {}", budget.period, budget.id, budget.amount);

        Ok(budget)
    }

    /// Change the amount and/or period of the budget with `id`.
    ///
    /// # Errors
    /// - [Error::UpdateMissing] if there is no budget with `id`.
    /// - [Error::UnsupportedBudgetPeriod] for a period that budgets cannot be set for.
    pub fn update_budget(
        &self,
        id: DatabaseId,
        amount: Option<f64>,
        period: Option<BudgetPeriod>,
    ) -> Result<Budget, Error> {
        let mut budget = self.budgets.get(id)?.ok_or(Error::UpdateMissing {
            table: "budget",
            id,
        })?;

        if let Some(period) = period {
            check_budget_period(period)?;
            budget.period = period;
        }

        if let Some(amount) = amount {
            budget.amount = amount;
        }

        self.budgets.update(&budget)?;
        tracing::info!("updated budget {}", budget.id);

        Ok(budget)
    }

    /// Delete the budget with `id`.
    pub fn delete_budget(&self, id: DatabaseId) -> Result<(), Error> {
        self.budgets.delete(id)?;
        tracing::info!("deleted budget {id}");

        Ok(())
    }

    /// Get all budgets ordered by ID.
    pub fn budgets(&self) -> Result<Vec<Budget>, Error> {
        self.budgets.get_all(&Filter::all())
    }

    /// Measure every budget against the expenses in its window around `today`.
    pub fn budget_statuses(&self, today: Date) -> Result<Vec<BudgetStatus>, Error> {
        let expenses = self.expenses.get_all(&Filter::all())?;

        Ok(BudgetStatus::for_budgets(&self.budgets()?, &expenses, today))
    }

    fn require_category(&self, id: DatabaseId, missing: Error) -> Result<Category, Error> {
        match self.categories.get(id)? {
            Some(category) => Ok(category),
            None => {
                tracing::warn!("category {id} does not exist");
                Err(missing)
            }
        }
    }

    fn check_can_move_under(&self, id: DatabaseId, parent_id: DatabaseId) -> Result<(), Error> {
        if parent_id == id {
            return Err(Error::CategoryCycle(id));
        }

        let parent = self.require_category(parent_id, Error::InvalidParent(parent_id))?;

        if get_all_parents(&parent, &self.categories)?
            .iter()
            .any(|ancestor| ancestor.id == id)
        {
            tracing::warn!("moving category {id} under {parent_id} would create a cycle");
            return Err(Error::CategoryCycle(id));
        }

        Ok(())
    }
}

fn check_budget_period(period: BudgetPeriod) -> Result<(), Error> {
    if period.is_allowed_for_budgets() {
        Ok(())
    } else {
        tracing::warn!("rejected budget for the period {period}");
        Err(Error::UnsupportedBudgetPeriod(period.to_string()))
    }
}
