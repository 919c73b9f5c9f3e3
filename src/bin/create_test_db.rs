use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::Duration;

use bookkeeper_rs::{
    BudgetPeriod, DEFAULT_TIMEZONE, SqliteBookkeeper, SqliteRepository, create_from_tree,
    initialize_db, today_in,
};

/// The demo category tree as (name, parent name) pairs, parents first.
const CATEGORY_TREE: [(&str, Option<&str>); 9] = [
    ("Food", None),
    ("Groceries", Some("Food")),
    ("Eating Out", Some("Food")),
    ("Coffee", Some("Eating Out")),
    ("Transport", None),
    ("Fuel", Some("Transport")),
    ("Public Transport", Some("Transport")),
    ("Home", None),
    ("Utilities", Some("Home")),
];

/// The demo expenses as (days before today, amount, category name, comment).
const EXPENSES: [(i64, f64, Option<&str>, &str); 10] = [
    (0, 4.5, Some("Coffee"), "flat white"),
    (0, 62.35, Some("Groceries"), "weekly shop"),
    (1, 18.0, Some("Eating Out"), "lunch with friends"),
    (2, 75.1, Some("Fuel"), ""),
    (3, 3.2, Some("Public Transport"), "bus to the city"),
    (6, 145.99, Some("Utilities"), "power bill"),
    (9, 54.8, Some("Groceries"), ""),
    (12, 12.0, None, "birthday card"),
    (20, 4.5, Some("Coffee"), ""),
    (35, 89.95, Some("Home"), "new kettle"),
];

/// A utility for creating a test database for the bookkeeper command line app.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    initialize_db(&conn)?;
    drop(conn);

    println!("Creating test categories...");
    let categories = create_from_tree(&CATEGORY_TREE, &SqliteRepository::new(output_path)?)?;

    let bookkeeper = SqliteBookkeeper::open(output_path)?;
    let today = today_in(DEFAULT_TIMEZONE)?;

    println!("Creating test expenses...");
    for (days_ago, amount, category_name, comment) in EXPENSES {
        let category = category_name.and_then(|name| {
            categories
                .iter()
                .find(|category| category.name.as_ref() == name)
                .map(|category| category.id)
        });
        let date = today.saturating_sub(Duration::days(days_ago));

        bookkeeper.add_expense(amount, date, category, comment)?;
    }

    println!("Creating test budgets...");
    bookkeeper.add_budget(20.0, BudgetPeriod::Day)?;
    bookkeeper.add_budget(250.0, BudgetPeriod::Week)?;
    bookkeeper.add_budget(1000.0, BudgetPeriod::Month)?;

    println!("Success!");

    Ok(())
}
