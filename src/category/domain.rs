//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Row, types::Value};
use serde::{Deserialize, Serialize};

use crate::{
    DatabaseId, Error, UNASSIGNED_ID,
    repository::{Column, Entity},
};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or just whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for expenses, e.g., 'Food' or 'Groceries' under 'Food'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category, [UNASSIGNED_ID] until it is stored.
    pub id: DatabaseId,
    /// The name of the category.
    pub name: CategoryName,
    /// The ID of the parent category, `None` for a top-level category.
    pub parent: Option<DatabaseId>,
}

impl Category {
    /// Create a category that has not been stored yet.
    pub fn new(name: CategoryName, parent: Option<DatabaseId>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name,
            parent,
        }
    }
}

/// The columns of the category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryColumn {
    /// The category name.
    Name,
    /// The ID of the parent category.
    Parent,
}

impl Column for CategoryColumn {
    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Parent => "parent",
        }
    }
}

impl Entity for Category {
    type Column = CategoryColumn;

    const TABLE: &'static str = "category";

    const COLUMNS: &'static [CategoryColumn] = &[CategoryColumn::Name, CategoryColumn::Parent];

    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            parent INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_category_parent ON category(parent);";

    fn id(&self) -> DatabaseId {
        self.id
    }

    fn set_id(&mut self, id: DatabaseId) {
        self.id = id;
    }

    fn value(&self, column: CategoryColumn) -> Value {
        match column {
            CategoryColumn::Name => Value::Text(self.name.to_string()),
            CategoryColumn::Parent => self.parent.into(),
        }
    }

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let id = row.get(0)?;
        let raw_name: String = row.get(1)?;
        let name = CategoryName::new_unchecked(&raw_name);
        let parent = row.get(2)?;

        Ok(Self { id, name, parent })
    }
}
