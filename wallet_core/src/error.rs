use chainbadge_store::StoreError;
use thiserror::Error;

/// Failures reported by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("wallet returned no accounts")]
    NoAccounts,

    #[error("request rejected by the user")]
    Rejected,

    #[error("wallet is busy with another request")]
    Busy,

    #[error("wallet did not respond in time")]
    Timeout,

    #[error("wallet is not connected")]
    NotConnected,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Why a connection handshake failed.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("wallet returned no accounts")]
    NoAccounts,

    #[error("connection cancelled by the user")]
    Cancelled,

    #[error("connection refused: {0}")]
    Refused(ProviderError),

    #[error("failed to persist session: {0}")]
    Store(#[from] StoreError),
}

impl From<ProviderError> for ConnectionError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::NoAccounts => Self::NoAccounts,
            ProviderError::Rejected | ProviderError::Timeout => Self::Cancelled,
            other => Self::Refused(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no active wallet session")]
    NoSession,

    #[error("signature request cancelled")]
    Cancelled,

    #[error("wallet provider error: {0}")]
    Provider(ProviderError),
}

/// Keystore and local key handling errors.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("key error: {0}")]
    Key(String),

    #[error("keystore I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid keystore JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}
