//! Defines the endpoint for creating an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    db::with_connection,
    expense::{
        db::create_expense,
        validation::{CreateExpenseRequest, rejection_to_error},
    },
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new expense, responds with the created expense.
///
/// A body that is not valid JSON is treated the same as a body with missing fields.
/// The creation time is always the time of the request.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    body: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(request) = body.map_err(rejection_to_error)?;
    let new_expense = request.validate(OffsetDateTime::now_utc())?;

    let expense = with_connection(state.db_connection, move |connection| {
        create_expense(&new_expense, connection)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(expense)).into_response())
}
