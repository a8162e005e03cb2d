//! Expenses: the entity, its validation, its storage and the API routes that
//! create, list, update and delete it.

mod core;
mod create_endpoint;
mod db;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod validation;

pub use self::core::{Expense, ExpenseId, create_expense_table};
pub use create_endpoint::create_expense_endpoint;
pub use db::create_expense;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use validation::{ExpenseFields, NewExpense};
