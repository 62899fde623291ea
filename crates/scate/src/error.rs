//! Error types for interval algebra operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScateError {
    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    #[error("Ordering violation: {0}")]
    OrderingViolation(String),

    #[error("Index out of range: {0}")]
    IndexOutOfRange(String),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),
}

pub type Result<T> = std::result::Result<T, ScateError>;
