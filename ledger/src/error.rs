use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("ledger returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("submission refused: {0}")]
    Refused(String),
}

impl LedgerError {
    /// Whether the error came from the transport rather than the ledger's answer.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
