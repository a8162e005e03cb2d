//! Request bodies for writing expenses and the checks applied to them before
//! anything touches the database.

use axum::{extract::rejection::JsonRejection, http::StatusCode};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::Error;

/// An amount as sent by the client, either a JSON number or a numeric string such as `"4.5"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// The amount as a number, or `None` if the text is not a number.
    fn to_number(&self) -> Option<f64> {
        match self {
            Amount::Number(number) => Some(*number),
            Amount::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// The JSON body for creating an expense.
///
/// Every field is optional at the parsing stage so that missing fields can be
/// reported with a single, consistent error by [CreateExpenseRequest::validate].
/// The creation time is always set by the server, a `createdAt` in the body is ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CreateExpenseRequest {
    pub name: Option<String>,
    pub amount: Option<Amount>,
    pub category: Option<String>,
}

/// The JSON body for updating an expense.
///
/// Only the mutable fields are accepted, anything else in the body is ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateExpenseRequest {
    pub name: Option<String>,
    pub amount: Option<Amount>,
    pub category: Option<String>,
}

/// The mutable fields of an expense after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFields {
    /// What the money was spent on.
    pub name: String,
    /// How much was spent, never zero.
    pub amount: f64,
    /// The user-defined category of the expense.
    pub category: String,
}

/// A validated expense that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The fields supplied by the client.
    pub fields: ExpenseFields,
    /// When the expense was created.
    pub created_at: OffsetDateTime,
}

impl CreateExpenseRequest {
    /// Check that all required fields are present and stamp the expense with `now`.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingFields] if any of `name`, `amount` or `category` is missing or empty.
    pub fn validate(self, now: OffsetDateTime) -> Result<NewExpense, Error> {
        let fields = validate_fields(self.name, self.amount, self.category)?;

        Ok(NewExpense {
            fields,
            created_at: now,
        })
    }
}

impl UpdateExpenseRequest {
    /// Check that all required fields are present.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingFields] if any of `name`, `amount` or `category` is missing or empty.
    pub fn validate(self) -> Result<ExpenseFields, Error> {
        validate_fields(self.name, self.amount, self.category)
    }
}

/// Map a rejected JSON body to the error reported to the client.
///
/// Oversized bodies and bodies without a JSON content type keep their own status codes,
/// every other rejection means the fields could not be read.
pub fn rejection_to_error(rejection: JsonRejection) -> Error {
    tracing::debug!("could not parse expense request: {rejection}");

    match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => Error::PayloadTooLarge,
        StatusCode::UNSUPPORTED_MEDIA_TYPE => Error::UnsupportedMediaType,
        _ => Error::MissingFields,
    }
}

/// An amount of zero is treated the same as a missing amount, as are `NaN`,
/// infinities and text that is not a number.
fn validate_fields(
    name: Option<String>,
    amount: Option<Amount>,
    category: Option<String>,
) -> Result<ExpenseFields, Error> {
    let name = name.filter(|name| !name.trim().is_empty());
    let amount = amount
        .and_then(|amount| amount.to_number())
        .filter(|amount| amount.is_finite() && *amount != 0.0);
    let category = category.filter(|category| !category.trim().is_empty());

    match (name, amount, category) {
        (Some(name), Some(amount), Some(category)) => Ok(ExpenseFields {
            name,
            amount,
            category,
        }),
        _ => Err(Error::MissingFields),
    }
}

#[cfg(test)]
mod validate_tests {
    use time::macros::datetime;

    use crate::Error;

    use super::{Amount, CreateExpenseRequest, ExpenseFields, UpdateExpenseRequest};

    fn coffee() -> CreateExpenseRequest {
        CreateExpenseRequest {
            name: Some("Coffee".to_owned()),
            amount: Some(Amount::Number(4.5)),
            category: Some("Food".to_owned()),
        }
    }

    #[test]
    fn valid_request_is_stamped_with_now() {
        let now = datetime!(2024-05-06 07:08:09 UTC);

        let new_expense = coffee().validate(now).expect("request should be valid");

        assert_eq!(
            new_expense.fields,
            ExpenseFields {
                name: "Coffee".to_owned(),
                amount: 4.5,
                category: "Food".to_owned(),
            }
        );
        assert_eq!(new_expense.created_at, now);
    }

    #[test]
    fn fails_for_every_combination_of_missing_fields() {
        let now = datetime!(2024-05-06 07:08:09 UTC);

        // Each bit marks whether name, amount and category are present.
        for mask in 0..7u8 {
            let request = CreateExpenseRequest {
                name: (mask & 1 != 0).then(|| "Coffee".to_owned()),
                amount: (mask & 2 != 0).then(|| Amount::Number(4.5)),
                category: (mask & 4 != 0).then(|| "Food".to_owned()),
            };

            assert_eq!(
                request.validate(now),
                Err(Error::MissingFields),
                "want missing fields error for mask {mask:03b}"
            );
        }
    }

    #[test]
    fn fails_on_blank_strings() {
        let request = UpdateExpenseRequest {
            name: Some(" \t".to_owned()),
            amount: Some(Amount::Number(1.0)),
            category: Some("Food".to_owned()),
        };

        assert_eq!(request.validate(), Err(Error::MissingFields));

        let request = UpdateExpenseRequest {
            name: Some("Coffee".to_owned()),
            amount: Some(Amount::Number(1.0)),
            category: Some(String::new()),
        };

        assert_eq!(request.validate(), Err(Error::MissingFields));
    }

    #[test]
    fn fails_on_zero_or_non_finite_amount() {
        for amount in [0.0, -0.0, f64::NAN, f64::INFINITY] {
            let request = UpdateExpenseRequest {
                name: Some("Coffee".to_owned()),
                amount: Some(Amount::Number(amount)),
                category: Some("Food".to_owned()),
            };

            assert_eq!(
                request.validate(),
                Err(Error::MissingFields),
                "want {amount} to be rejected"
            );
        }
    }

    #[test]
    fn negative_amount_is_allowed() {
        let request = UpdateExpenseRequest {
            name: Some("Refund".to_owned()),
            amount: Some(Amount::Number(-12.0)),
            category: Some("Food".to_owned()),
        };

        assert!(request.validate().is_ok());
    }

    #[test]
    fn numeric_text_amount_is_converted() {
        let request = UpdateExpenseRequest {
            name: Some("Coffee".to_owned()),
            amount: Some(Amount::Text(" 4.5 ".to_owned())),
            category: Some("Food".to_owned()),
        };

        assert_eq!(request.validate().map(|fields| fields.amount), Ok(4.5));
    }

    #[test]
    fn fails_on_non_numeric_or_zero_text_amount() {
        for text in ["lots", "", "0", "NaN"] {
            let request = UpdateExpenseRequest {
                name: Some("Coffee".to_owned()),
                amount: Some(Amount::Text(text.to_owned())),
                category: Some("Food".to_owned()),
            };

            assert_eq!(
                request.validate(),
                Err(Error::MissingFields),
                "want {text:?} to be rejected"
            );
        }
    }
}
