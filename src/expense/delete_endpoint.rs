//! Defines the endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    db::with_connection,
    expense::{
        core::{Expense, parse_expense_id},
        db::delete_expense,
    },
};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The confirmation sent after an expense is deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteExpenseResponse {
    /// Always "Expense deleted".
    pub message: String,
    /// The expense as it was just before it was deleted.
    pub deleted_expense: Expense,
}

/// A route handler for deleting an expense, responds with a snapshot of the deleted expense.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteExpenseResponse>, Error> {
    let expense_id = parse_expense_id(&raw_id)?;

    let deleted_expense = with_connection(state.db_connection, move |connection| {
        delete_expense(expense_id, connection)
    })
    .await?
    .ok_or(Error::NotFound)?;

    Ok(Json(DeleteExpenseResponse {
        message: "Expense deleted".to_owned(),
        deleted_expense,
    }))
}
