//! Implements a SQLite backed repository.

use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
};

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{
    DatabaseId, Error, UNASSIGNED_ID,
    repository::{Column, Entity, Filter, Repository},
};

/// Stores entities of type `T` in a table of a SQLite database file.
///
/// Every operation opens its own connection to the file and closes it when
/// done, so several repositories can share one file.
#[derive(Debug, Clone)]
pub struct SqliteRepository<T> {
    db_path: PathBuf,
    entity: PhantomData<fn() -> T>,
}

impl<T: Entity> SqliteRepository<T> {
    /// Create a repository for the database at `db_path`.
    ///
    /// The file is created if needed and the entity's table is added to it if
    /// it does not exist yet.
    ///
    /// # Errors
    /// This function will return an error if the database cannot be opened or
    /// if there is an SQL error.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, Error> {
        let repository = Self {
            db_path: db_path.as_ref().to_path_buf(),
            entity: PhantomData,
        };

        repository.connect()?.execute_batch(T::SCHEMA)?;
        tracing::debug!("ensured table {} exists in {:?}", T::TABLE, repository.db_path);

        Ok(repository)
    }

    /// The path of the database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection, Error> {
        Connection::open(&self.db_path).map_err(Error::from)
    }

    fn select_clause() -> String {
        let columns = column_list::<T>();

        format!("SELECT id, {columns} FROM \"{}\"", T::TABLE)
    }
}

impl<T: Entity> Repository<T> for SqliteRepository<T> {
    fn add(&self, item: &mut T) -> Result<DatabaseId, Error> {
        if item.id() != UNASSIGNED_ID {
            return Err(Error::IdAlreadyAssigned(item.id()));
        }

        let placeholders = (1..=T::COLUMNS.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let statement = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({placeholders});",
            T::TABLE,
            column_list::<T>()
        );
        let values: Vec<Value> = T::COLUMNS.iter().map(|column| item.value(*column)).collect();

        let connection = self.connect()?;
        tracing::debug!("{statement} {values:?}");
        connection.execute(&statement, params_from_iter(values))?;

        let id = connection.last_insert_rowid();
        item.set_id(id);

        Ok(id)
    }

    fn get(&self, id: DatabaseId) -> Result<Option<T>, Error> {
        let statement = format!("{} WHERE id = :id;", Self::select_clause());
        tracing::debug!("{statement} id={id}");

        let result = self
            .connect()?
            .prepare(&statement)?
            .query_row(&[(":id", &id)], T::map_row);

        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn get_all(&self, filter: &Filter<T>) -> Result<Vec<T>, Error> {
        let mut statement = Self::select_clause();
        let mut values = Vec::new();

        for (index, (column, value)) in filter.conditions().iter().enumerate() {
            statement.push_str(if index == 0 { " WHERE " } else { " AND " });

            if *value == Value::Null {
                statement.push_str(&format!("{} IS NULL", column.name()));
            } else {
                values.push(value.clone());
                statement.push_str(&format!("{} = ?{}", column.name(), values.len()));
            }
        }

        statement.push_str(" ORDER BY id ASC;");
        tracing::debug!("{statement} {values:?}");

        self.connect()?
            .prepare(&statement)?
            .query_map(params_from_iter(values), T::map_row)?
            .map(|maybe_item| maybe_item.map_err(|error| error.into()))
            .collect()
    }

    fn update(&self, item: &T) -> Result<(), Error> {
        if item.id() == UNASSIGNED_ID {
            return Err(Error::UnassignedId);
        }

        let assignments = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{} = ?{}", column.name(), index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let statement = format!(
            "UPDATE \"{}\" SET {assignments} WHERE id = ?{};",
            T::TABLE,
            T::COLUMNS.len() + 1
        );
        let mut values: Vec<Value> = T::COLUMNS.iter().map(|column| item.value(*column)).collect();
        values.push(Value::Integer(item.id()));

        tracing::debug!("{statement} {values:?}");
        let rows_affected = self
            .connect()?
            .execute(&statement, params_from_iter(values))?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissing {
                table: T::TABLE,
                id: item.id(),
            });
        }

        Ok(())
    }

    fn delete(&self, id: DatabaseId) -> Result<(), Error> {
        let statement = format!("DELETE FROM \"{}\" WHERE id = ?1;", T::TABLE);
        tracing::debug!("{statement} id={id}");

        let rows_affected = self.connect()?.execute(&statement, [id])?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissing {
                table: T::TABLE,
                id,
            });
        }

        Ok(())
    }
}

fn column_list<T: Entity>() -> String {
    T::COLUMNS
        .iter()
        .map(|column| column.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod sqlite_repository_tests {
    use tempfile::TempDir;
    use time::macros::date;

    use crate::{
        Budget, BudgetPeriod, Category, CategoryName, Error, Expense, UNASSIGNED_ID,
        category::CategoryColumn,
        expense::ExpenseColumn,
        repository::{Filter, Repository},
    };

    use super::SqliteRepository;

    fn get_test_repository<T: crate::Entity>() -> (SqliteRepository<T>, TempDir) {
        let temp_dir = tempfile::tempdir().expect("Could not create temp dir");
        let repository = SqliteRepository::new(temp_dir.path().join("test.db"))
            .expect("Could not create repository");

        (repository, temp_dir)
    }

    #[test]
    fn add_assigns_id_and_get_returns_equal_item() {
        let (repository, _temp_dir) = get_test_repository::<Expense>();
        let mut expense = Expense::new(12.5, date!(2024 - 03 - 01), None, "lunch");

        let id = repository.add(&mut expense).expect("Could not add expense");

        assert!(id > 0);
        assert_eq!(expense.id, id);
        assert_eq!(repository.get(id), Ok(Some(expense)));
    }

    #[test]
    fn add_fails_when_id_already_assigned() {
        let (repository, _temp_dir) = get_test_repository::<Budget>();
        let mut budget = Budget::new(100.0, BudgetPeriod::Week);
        budget.id = 42;

        let result = repository.add(&mut budget);

        assert_eq!(result, Err(Error::IdAlreadyAssigned(42)));
    }

    #[test]
    fn get_missing_id_returns_none() {
        let (repository, _temp_dir) = get_test_repository::<Budget>();

        assert_eq!(repository.get(1234), Ok(None));
    }

    #[test]
    fn update_then_get_reflects_new_values() {
        let (repository, _temp_dir) = get_test_repository::<Expense>();
        let mut expense = Expense::new(3.0, date!(2024 - 03 - 01), Some(7), "coffee");
        repository.add(&mut expense).expect("Could not add expense");

        expense.amount = 4.25;
        expense.category = None;
        expense.comment = "two coffees".to_owned();
        repository.update(&expense).expect("Could not update expense");

        assert_eq!(repository.get(expense.id), Ok(Some(expense)));
    }

    #[test]
    fn update_unassigned_item_fails() {
        let (repository, _temp_dir) = get_test_repository::<Budget>();
        let budget = Budget::new(100.0, BudgetPeriod::Day);

        assert_eq!(repository.update(&budget), Err(Error::UnassignedId));
    }

    #[test]
    fn update_missing_item_fails() {
        let (repository, _temp_dir) = get_test_repository::<Budget>();
        let mut budget = Budget::new(100.0, BudgetPeriod::Day);
        budget.id = 99;

        assert_eq!(
            repository.update(&budget),
            Err(Error::UpdateMissing {
                table: "budget",
                id: 99
            })
        );
    }

    #[test]
    fn delete_then_get_returns_none() {
        let (repository, _temp_dir) = get_test_repository::<Category>();
        let mut category = Category::new(CategoryName::new_unchecked("Food"), None);
        let id = repository.add(&mut category).expect("Could not add category");

        repository.delete(id).expect("Could not delete category");

        assert_eq!(repository.get(id), Ok(None));
    }

    #[test]
    fn delete_missing_item_fails() {
        let (repository, _temp_dir) = get_test_repository::<Category>();

        assert_eq!(
            repository.delete(5),
            Err(Error::DeleteMissing {
                table: "category",
                id: 5
            })
        );
    }

    #[test]
    fn get_all_applies_filter() {
        let (repository, _temp_dir) = get_test_repository::<Category>();
        let mut food = Category::new(CategoryName::new_unchecked("Food"), None);
        repository.add(&mut food).unwrap();
        let mut groceries = Category::new(CategoryName::new_unchecked("Groceries"), Some(food.id));
        repository.add(&mut groceries).unwrap();
        let mut transport = Category::new(CategoryName::new_unchecked("Transport"), None);
        repository.add(&mut transport).unwrap();

        let roots = repository
            .get_all(&Filter::all().with(CategoryColumn::Parent, None::<i64>))
            .expect("Could not get root categories");
        let children = repository
            .get_all(&Filter::all().with(CategoryColumn::Parent, food.id))
            .expect("Could not get child categories");
        let everything = repository.get_all(&Filter::all()).unwrap();

        assert_eq!(roots, vec![food, transport]);
        assert_eq!(children, vec![groceries]);
        assert_eq!(everything.len(), 3);
    }

    #[test]
    fn get_all_filters_on_several_columns() {
        let (repository, _temp_dir) = get_test_repository::<Expense>();
        let mut lunch = Expense::new(10.0, date!(2024 - 03 - 01), Some(1), "lunch");
        let mut dinner = Expense::new(10.0, date!(2024 - 03 - 01), Some(2), "dinner");
        repository.add(&mut lunch).unwrap();
        repository.add(&mut dinner).unwrap();

        let selected = repository
            .get_all(
                &Filter::all()
                    .with(ExpenseColumn::Amount, 10.0)
                    .with(ExpenseColumn::Category, 2),
            )
            .unwrap();

        assert_eq!(selected, vec![dinner]);
    }

    #[test]
    fn repositories_share_one_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("shared.db");
        let categories = SqliteRepository::<Category>::new(&db_path).unwrap();
        let budgets = SqliteRepository::<Budget>::new(&db_path).unwrap();

        let mut category = Category::new(CategoryName::new_unchecked("Food"), None);
        let mut budget = Budget::new(50.0, BudgetPeriod::Month);
        categories.add(&mut category).unwrap();
        budgets.add(&mut budget).unwrap();

        assert_eq!(category.id, 1);
        assert_eq!(budget.id, 1);
        assert_ne!(category.id, UNASSIGNED_ID);
        assert_eq!(budgets.get_all(&Filter::all()), Ok(vec![budget]));
    }
}
