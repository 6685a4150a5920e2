//! Engine error types

use thiserror::Error;

use crate::types::AccountId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("Unknown validator: {0}")]
    UnknownValidator(AccountId),
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
