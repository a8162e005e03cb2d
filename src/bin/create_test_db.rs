use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;

use expense_tracker::{ExpenseFields, NewExpense, create_expense, initialize_db};

/// A utility for creating a test database for the expense tracker API.
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

    println!("Creating test expenses...");

    let now = OffsetDateTime::now_utc();
    let expenses = [
        ("Coffee", 4.5, "Food"),
        ("Groceries", 87.2, "Food"),
        ("Bus fare", 2.0, "Transport"),
        ("Rent", 1200.0, "Housing"),
    ];

    for (name, amount, category) in expenses {
        let new_expense = NewExpense {
            fields: ExpenseFields {
                name: name.to_owned(),
                amount,
                category: category.to_owned(),
            },
            created_at: now,
        };

        create_expense(&new_expense, &conn)?;
    }

    println!("Success!");

    Ok(())
}
