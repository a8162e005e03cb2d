//! Defines the endpoint for listing all expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::with_connection,
    expense::{core::Expense, db::get_all_expenses},
};

/// The state needed to list expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every expense in the database.
pub async fn list_expenses_endpoint(
    State(state): State<ListExpensesState>,
) -> Result<Json<Vec<Expense>>, Error> {
    with_connection(state.db_connection, get_all_expenses)
        .await
        .map(Json)
}
