//! The persistence abstraction that maps entities to database rows.
//!
//! Each model implements [Entity], which spells out its table, typed columns
//! and row mapping. A [Repository] then provides the CRUD verbs for any
//! entity, either backed by SQLite ([SqliteRepository]) or kept in memory
//! ([MemoryRepository]).

mod memory;
mod sqlite;

use std::fmt::Debug;

use rusqlite::{Row, types::Value};

use crate::{DatabaseId, Error};

pub use memory::MemoryRepository;
pub use sqlite::SqliteRepository;

/// A column of an entity's table, excluding the `id` primary key.
pub trait Column: Copy + Debug + PartialEq + 'static {
    /// The column name as it appears in SQL.
    fn name(self) -> &'static str;
}

/// A model that can be stored in a [Repository].
///
/// The row layout is always `id` followed by [Entity::COLUMNS] in order.
pub trait Entity: Clone + Debug {
    /// The typed columns of the table.
    type Column: Column;

    /// The name of the table that stores this entity.
    const TABLE: &'static str;

    /// The non-ID columns in the order they were declared in [Entity::SCHEMA].
    const COLUMNS: &'static [Self::Column];

    /// The statement that creates the table if it does not exist yet.
    const SCHEMA: &'static str;

    /// The entity's ID, [crate::UNASSIGNED_ID] if it has not been stored.
    fn id(&self) -> DatabaseId;

    /// Overwrite the entity's ID.
    fn set_id(&mut self, id: DatabaseId);

    /// The SQL value stored in `column`.
    fn value(&self, column: Self::Column) -> Value;

    /// Convert a row (`id` followed by [Entity::COLUMNS]) into the entity.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type.
    fn map_row(row: &Row) -> Result<Self, rusqlite::Error>;
}

/// Column-equals-value conditions for [Repository::get_all].
///
/// All conditions must hold for an item to be selected. A [Value::Null]
/// condition selects items whose column is null.
#[derive(Debug, Clone)]
pub struct Filter<T: Entity> {
    conditions: Vec<(T::Column, Value)>,
}

impl<T: Entity> Filter<T> {
    /// A filter that selects every item.
    pub fn all() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Add the condition `column = value`.
    pub fn with(mut self, column: T::Column, value: impl Into<Value>) -> Self {
        self.conditions.push((column, value.into()));
        self
    }

    /// The conditions in the order they were added.
    pub fn conditions(&self) -> &[(T::Column, Value)] {
        &self.conditions
    }

    /// Whether `item` satisfies every condition.
    pub fn matches(&self, item: &T) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| item.value(*column) == *value)
    }
}

impl<T: Entity> Default for Filter<T> {
    fn default() -> Self {
        Self::all()
    }
}

/// Stores and retrieves entities of type `T`.
pub trait Repository<T: Entity> {
    /// Add `item` to the repository and write the assigned ID back into it.
    ///
    /// # Errors
    /// Returns [Error::IdAlreadyAssigned] if `item` already has an ID.
    fn add(&self, item: &mut T) -> Result<DatabaseId, Error>;

    /// Get the item with `id`, or `None` if there is no such item.
    fn get(&self, id: DatabaseId) -> Result<Option<T>, Error>;

    /// Get the items that match `filter`, ordered by ID.
    fn get_all(&self, filter: &Filter<T>) -> Result<Vec<T>, Error>;

    /// Overwrite the stored item that has the same ID as `item`.
    ///
    /// # Errors
    /// Returns [Error::UnassignedId] if `item` has no ID, or
    /// [Error::UpdateMissing] if no item has that ID.
    fn update(&self, item: &T) -> Result<(), Error>;

    /// Delete the item with `id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissing] if no item has that ID.
    fn delete(&self, id: DatabaseId) -> Result<(), Error>;
}
