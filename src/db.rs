//! Sets up the application's database.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Budget, Category, Entity, Error, Expense};

/// Create the tables for every model in the database behind `connection`.
///
/// Tables that already exist are left untouched.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    transaction.execute_batch(Category::SCHEMA)?;
    transaction.execute_batch(Expense::SCHEMA)?;
    transaction.execute_batch(Budget::SCHEMA)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use super::initialize;

    fn table_names(connection: &Connection) -> Vec<String> {
        connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name;")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|name| name.unwrap())
            .collect()
    }

    #[test]
    fn initialize_creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        assert_eq!(table_names(&connection), vec!["budget", "category", "expense"]);
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
            .execute("INSERT INTO budget (amount, period) VALUES (10.0, 'day');", ())
            .unwrap();

        initialize(&connection).expect("Second initialization failed");

        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM budget;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
