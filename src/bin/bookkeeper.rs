use std::{error::Error, path::PathBuf, process::exit};

use clap::{Parser, Subcommand};
use serde::Serialize;
use time::{Date, macros::format_description};

use bookkeeper_rs::{
    AppConfig, BudgetPeriod, DatabaseId, ExpenseChanges, OutputFormat, SqliteBookkeeper,
    format_budget_rows, init_logging, render_forest, render_table,
};

const EXPENSE_HEADERS: [&str; 5] = ["ID", "Date", "Amount", "Category", "Comment"];
const BUDGET_HEADERS: [&str; 5] = ["ID", "Period", "Amount", "Spent", "Remaining"];

/// Record expenses, organise them into categories and track spending against budgets.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "bookkeeper.db")]
    db_path: PathBuf,

    /// Canonical name of the timezone that decides what "today" is, e.g. "Pacific/Auckland".
    #[arg(long)]
    timezone: Option<String>,

    /// Print results as JSON instead of tables.
    #[arg(long)]
    json: bool,

    /// Log more details, repeat for even more (-vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the category tree.
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Record and edit expenses.
    #[command(subcommand)]
    Expense(ExpenseCommand),

    /// Set budgets and see how much of them is left.
    #[command(subcommand)]
    Budget(BudgetCommand),

    /// Show expenses, budgets and categories together.
    Overview,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// Create a category.
    Add {
        /// The name of the new category.
        name: String,

        /// The ID of the category to nest the new category under.
        #[arg(long)]
        parent: Option<DatabaseId>,
    },

    /// Rename a category or move it in the tree.
    Update {
        /// The ID of the category to change.
        id: DatabaseId,

        /// The new name.
        #[arg(long)]
        name: Option<String>,

        /// The ID of the new parent category.
        #[arg(long, conflicts_with = "root")]
        parent: Option<DatabaseId>,

        /// Move the category to the top level.
        #[arg(long)]
        root: bool,
    },

    /// Delete a category, moving its children up a level.
    Delete {
        /// The ID of the category to delete.
        id: DatabaseId,
    },

    /// Show the category tree.
    List,
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    /// Record an expense.
    Add {
        /// How much was spent.
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// The day the money was spent (YYYY-MM-DD), defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,

        /// The ID of the category to file the expense under.
        #[arg(long)]
        category: Option<DatabaseId>,

        /// A note about the expense.
        #[arg(long, default_value = "")]
        comment: String,
    },

    /// Change a recorded expense.
    Update {
        /// The ID of the expense to change.
        id: DatabaseId,

        /// The new amount.
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,

        /// The new date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,

        /// The ID of the new category.
        #[arg(long, conflicts_with = "uncategorised")]
        category: Option<DatabaseId>,

        /// Remove the expense from its category.
        #[arg(long)]
        uncategorised: bool,

        /// The new comment.
        #[arg(long)]
        comment: Option<String>,
    },

    /// Delete an expense.
    Delete {
        /// The ID of the expense to delete.
        id: DatabaseId,
    },

    /// List expenses, most recent first.
    List,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Set a budget for a period.
    Add {
        /// The most that should be spent in one period.
        amount: f64,

        /// One of day, week or month.
        period: BudgetPeriod,
    },

    /// Change a budget.
    Update {
        /// The ID of the budget to change.
        id: DatabaseId,

        /// The new amount.
        #[arg(long)]
        amount: Option<f64>,

        /// The new period: day, week or month.
        #[arg(long)]
        period: Option<BudgetPeriod>,
    },

    /// Delete a budget.
    Delete {
        /// The ID of the budget to delete.
        id: DatabaseId,
    },

    /// Show each budget with how much has been spent in its current period.
    List,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let output = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };
    let config = AppConfig::new(&args.db_path, args.timezone.as_deref(), output);

    if let Err(error) = run(args.command, &config) {
        print_error(error);
        exit(1);
    }
}

fn run(command: Command, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let bookkeeper = SqliteBookkeeper::open(&config.db_path)?;

    match command {
        Command::Category(command) => run_category_command(command, &bookkeeper, config),
        Command::Expense(command) => run_expense_command(command, &bookkeeper, config),
        Command::Budget(command) => run_budget_command(command, &bookkeeper, config),
        Command::Overview => show_overview(&bookkeeper, config),
    }
}

fn run_category_command(
    command: CategoryCommand,
    bookkeeper: &SqliteBookkeeper,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    match command {
        CategoryCommand::Add { name, parent } => {
            let category = bookkeeper.add_category(&name, parent)?;
            print_result(config, &category, || {
                format!("Created category {} [{}]", category.name, category.id)
            })
        }
        CategoryCommand::Update {
            id,
            name,
            parent,
            root,
        } => {
            let parent = if root { Some(None) } else { parent.map(Some) };
            let category = bookkeeper.update_category(id, name.as_deref(), parent)?;
            print_result(config, &category, || {
                format!("Updated category {} [{}]", category.name, category.id)
            })
        }
        CategoryCommand::Delete { id } => {
            let result = bookkeeper.delete_category(id)?;
            print_result(config, &result, || {
                format!(
                    "Deleted category {id}, moved {} subcategories up and uncategorised {} expenses",
                    result.children_reparented, result.expenses_uncategorised
                )
            })
        }
        CategoryCommand::List => show_categories(bookkeeper, config),
    }
}

fn run_expense_command(
    command: ExpenseCommand,
    bookkeeper: &SqliteBookkeeper,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    match command {
        ExpenseCommand::Add {
            amount,
            date,
            category,
            comment,
        } => {
            let date = match date {
                Some(date) => date,
                None => config.today()?,
            };
            let expense = bookkeeper.add_expense(amount, date, category, &comment)?;
            print_result(config, &expense, || {
                format!("Recorded expense {} on {}", expense.id, expense.date)
            })
        }
        ExpenseCommand::Update {
            id,
            amount,
            date,
            category,
            uncategorised,
            comment,
        } => {
            let changes = ExpenseChanges {
                amount,
                date,
                category: if uncategorised {
                    Some(None)
                } else {
                    category.map(Some)
                },
                comment,
            };
            let expense = bookkeeper.update_expense(id, changes)?;
            print_result(config, &expense, || format!("Updated expense {}", expense.id))
        }
        ExpenseCommand::Delete { id } => {
            bookkeeper.delete_expense(id)?;
            print_result(config, &id, || format!("Deleted expense {id}"))
        }
        ExpenseCommand::List => show_expenses(bookkeeper, config),
    }
}

fn run_budget_command(
    command: BudgetCommand,
    bookkeeper: &SqliteBookkeeper,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    match command {
        BudgetCommand::Add { amount, period } => {
            let budget = bookkeeper.add_budget(amount, period)?;
            print_result(config, &budget, || {
                format!("Set {} budget {} to {}", budget.period, budget.id, budget.amount)
            })
        }
        BudgetCommand::Update { id, amount, period } => {
            let budget = bookkeeper.update_budget(id, amount, period)?;
            print_result(config, &budget, || format!("Updated budget {}", budget.id))
        }
        BudgetCommand::Delete { id } => {
            bookkeeper.delete_budget(id)?;
            print_result(config, &id, || format!("Deleted budget {id}"))
        }
        BudgetCommand::List => show_budgets(bookkeeper, config),
    }
}

fn show_categories(
    bookkeeper: &SqliteBookkeeper,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    let forest = bookkeeper.category_forest()?;

    print_result(config, &forest, || {
        if forest.is_empty() {
            "No categories yet.".to_owned()
        } else {
            render_forest(&forest).trim_end().to_owned()
        }
    })
}

fn show_expenses(
    bookkeeper: &SqliteBookkeeper,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    match config.output {
        OutputFormat::Json => print_json(&bookkeeper.expenses()?),
        OutputFormat::Table => {
            print!(
                "{}",
                render_table(&EXPENSE_HEADERS, &bookkeeper.expense_rows()?)
            );
            Ok(())
        }
    }
}

fn show_budgets(
    bookkeeper: &SqliteBookkeeper,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    let statuses = bookkeeper.budget_statuses(config.today()?)?;

    print_result(config, &statuses, || {
        render_table(&BUDGET_HEADERS, &format_budget_rows(&statuses))
            .trim_end()
            .to_owned()
    })
}

fn show_overview(
    bookkeeper: &SqliteBookkeeper,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    match config.output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "expenses": bookkeeper.expenses()?,
            "budgets": bookkeeper.budget_statuses(config.today()?)?,
            "categories": bookkeeper.category_forest()?,
        })),
        OutputFormat::Table => {
            println!("Expenses");
            show_expenses(bookkeeper, config)?;
            println!("\nBudgets");
            show_budgets(bookkeeper, config)?;
            println!("\nCategories");
            show_categories(bookkeeper, config)
        }
    }
}

fn print_result<T: Serialize>(
    config: &AppConfig,
    value: &T,
    describe: impl FnOnce() -> String,
) -> Result<(), Box<dyn Error>> {
    match config.output {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => {
            println!("{}", describe());
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn parse_date(text: &str) -> Result<Date, String> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|error| format!("expected a date like 2024-03-14: {error}"))
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", capitalise_first_char(&error.to_string()))
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
