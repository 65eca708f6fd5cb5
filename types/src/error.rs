//! Errors raised while parsing values that cross the service boundary.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid wallet address: {0:?}")]
    InvalidAddress(String),

    #[error("unrecognized vote choice: {0:?}")]
    InvalidChoice(String),
}
