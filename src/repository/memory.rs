//! Implements an in-memory repository.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

use crate::{
    DatabaseId, Error, UNASSIGNED_ID,
    repository::{Entity, Filter, Repository},
};

/// Keeps entities of type `T` in memory.
///
/// IDs are assigned from 1 upwards and are never reused.
#[derive(Debug)]
pub struct MemoryRepository<T> {
    items: RefCell<BTreeMap<DatabaseId, T>>,
    last_id: Cell<DatabaseId>,
}

impl<T> MemoryRepository<T> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            items: RefCell::new(BTreeMap::new()),
            last_id: Cell::new(UNASSIGNED_ID),
        }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> for MemoryRepository<T> {
    fn add(&self, item: &mut T) -> Result<DatabaseId, Error> {
        if item.id() != UNASSIGNED_ID {
            return Err(Error::IdAlreadyAssigned(item.id()));
        }

        let id = self.last_id.get() + 1;
        self.last_id.set(id);
        item.set_id(id);
        self.items.borrow_mut().insert(id, item.clone());

        Ok(id)
    }

    fn get(&self, id: DatabaseId) -> Result<Option<T>, Error> {
        Ok(self.items.borrow().get(&id).cloned())
    }

    fn get_all(&self, filter: &Filter<T>) -> Result<Vec<T>, Error> {
        Ok(self
            .items
            .borrow()
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect())
    }

    fn update(&self, item: &T) -> Result<(), Error> {
        if item.id() == UNASSIGNED_ID {
            return Err(Error::UnassignedId);
        }

        match self.items.borrow_mut().get_mut(&item.id()) {
            Some(stored) => {
                *stored = item.clone();
                Ok(())
            }
            None => Err(Error::UpdateMissing {
                table: T::TABLE,
                id: item.id(),
            }),
        }
    }

    fn delete(&self, id: DatabaseId) -> Result<(), Error> {
        match self.items.borrow_mut().remove(&id) {
            Some(_) => Ok(()),
            None => Err(Error::DeleteMissing {
                table: T::TABLE,
                id,
            }),
        }
    }
}
