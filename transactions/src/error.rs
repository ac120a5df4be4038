use chainbadge_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("invalid asset request: {0}")]
    InvalidRequest(#[from] TypesError),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid validity window: first {first_valid}, last {last_valid}")]
    InvalidValidityWindow { first_valid: u64, last_valid: u64 },

    #[error("fee {fee} below minimum {min_fee}")]
    FeeTooLow { fee: u64, min_fee: u64 },

    #[error("invalid signature on transaction {tx_id}")]
    InvalidSignature { tx_id: String },

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("encoding error: {0}")]
    Encoding(String),
}
