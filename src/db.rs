/*! Sets up the application's database schema and runs queries off the async runtime. */

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, expense::create_expense_table};

/// Create the tables for the domain models if they do not already exist.
///
/// The tables are created inside a single exclusive transaction, so either
/// every table exists afterwards or none of the changes are applied.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Run `query` against the shared connection on tokio's blocking thread pool.
///
/// SQLite calls block, so they must not run on the async worker threads.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the connection mutex is poisoned,
/// [Error::DatabaseTaskError] if `query` panics, or the error returned by `query`.
pub(crate) async fn with_connection<T, F>(
    db_connection: Arc<Mutex<Connection>>,
    query: F,
) -> Result<T, Error>
where
    F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let connection = db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        query(&connection)
    })
    .await
    .map_err(|error| Error::DatabaseTaskError(error.to_string()))?
}
