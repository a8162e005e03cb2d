//! Database queries for expenses.
//!
//! Each function runs a single statement, so every write is atomic for the
//! one expense it touches.

use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    Error,
    expense::{
        core::{Expense, ExpenseId, map_row_to_expense},
        validation::{ExpenseFields, NewExpense},
    },
};

/// Create an expense in the database.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn create_expense(new_expense: &NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let NewExpense { fields, created_at } = new_expense;

    connection
        .prepare(
            "INSERT INTO expense (name, amount, category, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, amount, category, created_at;",
        )?
        .query_row(
            params![fields.name, fields.amount, fields.category, created_at],
            map_row_to_expense,
        )
        .map_err(Error::from)
}

/// Retrieve all expenses in the database, oldest first.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare("SELECT id, name, amount, category, created_at FROM expense ORDER BY id ASC;")?
        .query_map([], map_row_to_expense)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Overwrite the name, amount and category of the expense with `id`.
///
/// Returns the updated expense, or `None` if there is no expense with `id`.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn update_expense(
    id: ExpenseId,
    fields: &ExpenseFields,
    connection: &Connection,
) -> Result<Option<Expense>, Error> {
    connection
        .prepare(
            "UPDATE expense
            SET \
                name = ?1, \
                amount = ?2, \
                category = ?3 \
            WHERE id = ?4
            RETURNING id, name, amount, category, created_at;",
        )?
        .query_row(
            params![fields.name, fields.amount, fields.category, id],
            map_row_to_expense,
        )
        .optional()
        .map_err(Error::from)
}

/// Delete the expense with `id` from the database.
///
/// Returns a snapshot of the deleted expense, or `None` if there is no expense with `id`.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<Option<Expense>, Error> {
    connection
        .prepare(
            "DELETE FROM expense WHERE id = :id
            RETURNING id, name, amount, category, created_at;",
        )?
        .query_row(&[(":id", &id)], map_row_to_expense)
        .optional()
        .map_err(Error::from)
}
