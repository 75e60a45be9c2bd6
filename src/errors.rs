use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum ChronologyError {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("missing field: {field}")]
    MissingField {
        field: &'static str,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("amount parse error: {0}")]
    Parse(#[from] rust_decimal::Error),
}

pub type Result<T> = std::result::Result<T, ChronologyError>;
