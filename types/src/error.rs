//! Errors raised while validating data-model values.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("badges must have exactly one unit, got {0}")]
    InvalidTotal(u64),

    #[error("badges must have zero decimals, got {0}")]
    InvalidDecimals(u32),

    #[error("{field} is {len} bytes, limit is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}
