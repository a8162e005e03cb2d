//! A small REST API for tracking expenses.
//!
//! Expenses are stored in a SQLite database and exposed as JSON over HTTP:
//! create, list, update and delete, with field validation at the boundary.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod db;
pub mod endpoints;
mod expense;
mod logging;
mod routing;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use expense::{Expense, ExpenseFields, ExpenseId, NewExpense, create_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body was missing one of `name`, `amount` or `category`,
    /// one of them was empty, or the body could not be parsed at all.
    #[error("All fields are required (name, amount, category)")]
    MissingFields,

    /// The expense ID in the request path is not a valid store identifier.
    ///
    /// Callers should pass in the raw ID string that failed to parse.
    #[error("\"{0}\" is not a valid expense ID")]
    InvalidExpenseId(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the expense has not already been deleted.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    ///
    /// The error should only be logged on the server. The client only ever
    /// sees a generic internal server error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The request body is larger than [REQUEST_BODY_LIMIT] bytes.
    #[error("the request body is too large")]
    PayloadTooLarge,

    /// The request body was not sent with a JSON content type.
    #[error("expected a request with `Content-Type: application/json`")]
    UnsupportedMediaType,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The blocking task that ran a database query panicked or was cancelled.
    ///
    /// Callers should pass in the original error as a string.
    #[error("the database task failed: {0}")]
    DatabaseTaskError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

/// The JSON body sent to the client alongside an error status code.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorMessage {
    pub message: &'static str,
}

impl Error {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Error::MissingFields => (
                StatusCode::BAD_REQUEST,
                "All fields are required (name, amount, category)",
            ),
            Error::InvalidExpenseId(_) => (StatusCode::BAD_REQUEST, "Invalid expense ID"),
            Error::NotFound => (StatusCode::NOT_FOUND, "Expense not found"),
            Error::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "Request body is too large"),
            Error::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Expected request with `Content-Type: application/json`",
            ),
            Error::SqlError(_) | Error::DatabaseLockError | Error::DatabaseTaskError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Server errors are logged here and only here, the client gets a generic message.
        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (status, Json(ErrorMessage { message })).into_response()
    }
}
