use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// The store identifier of an expense, the SQLite row ID.
pub type ExpenseId = i64;

/// A single expense, e.g., a coffee bought on the way to work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense, assigned by the database.
    pub id: ExpenseId,

    /// What the money was spent on.
    pub name: String,

    /// How much was spent.
    pub amount: f64,

    /// The category used to group the expense, e.g., 'Food'.
    pub category: String,

    /// When the expense was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Parse an expense ID from a request path segment.
///
/// A valid ID is a positive decimal integer that fits in an [ExpenseId].
/// Signs, whitespace and other characters are rejected.
///
/// # Errors
///
/// This function will return an [Error::InvalidExpenseId] if `raw_id` is not a valid ID.
pub fn parse_expense_id(raw_id: &str) -> Result<ExpenseId, Error> {
    let invalid = || Error::InvalidExpenseId(raw_id.to_owned());

    if raw_id.is_empty() || !raw_id.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }

    match raw_id.parse::<ExpenseId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid()),
    }
}

pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Map a row with the columns `id, name, amount, category, created_at` to an [Expense].
pub fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let amount = row.get(2)?;
    let category = row.get(3)?;
    let created_at = row.get(4)?;

    Ok(Expense {
        id,
        name,
        amount,
        category,
        created_at,
    })
}
