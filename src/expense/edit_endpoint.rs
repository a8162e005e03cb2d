//! Defines the endpoint for updating an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::with_connection,
    expense::{
        core::{Expense, parse_expense_id},
        db::update_expense,
        validation::{UpdateExpenseRequest, rejection_to_error},
    },
};

/// The state needed to edit an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating the name, amount and category of an expense,
/// responds with the updated expense.
///
/// The ID is checked before the body, and both are checked before the database is touched.
pub async fn edit_expense_endpoint(
    State(state): State<EditExpenseState>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateExpenseRequest>, JsonRejection>,
) -> Result<Json<Expense>, Error> {
    let expense_id = parse_expense_id(&raw_id)?;
    let Json(request) = body.map_err(rejection_to_error)?;
    let fields = request.validate()?;

    with_connection(state.db_connection, move |connection| {
        update_expense(expense_id, &fields, connection)
    })
    .await?
    .map(Json)
    .ok_or(Error::NotFound)
}
