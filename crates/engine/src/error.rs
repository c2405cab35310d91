//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] returned when a transaction amount is rejected.
//! - [`MalformedFilterExpression`] returned when filter tokens do not pair up.
//! - [`UnknownFilterField`] returned when a filter names an unknown field.
//! - [`InvalidFilterValue`] returned when a filter value cannot be parsed.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`MalformedFilterExpression`]: EngineError::MalformedFilterExpression
//!  [`UnknownFilterField`]: EngineError::UnknownFilterField
//!  [`InvalidFilterValue`]: EngineError::InvalidFilterValue
use thiserror::Error;

/// Engine custom errors.
///
/// None of them is fatal: the [`Ledger`](crate::Ledger) is left unchanged and
/// stays usable after any of them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Malformed filter expression: expected field/value pairs, got {0} tokens")]
    MalformedFilterExpression(usize),
    #[error("Unknown filter field \"{0}\"")]
    UnknownFilterField(String),
    #[error("Invalid value \"{value}\" for filter field \"{field}\"")]
    InvalidFilterValue { field: String, value: String },
}

impl EngineError {
    pub(crate) fn invalid_value(field: &str, value: &str) -> Self {
        Self::InvalidFilterValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
