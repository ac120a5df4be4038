//! Wallet core for ChainBadge.
//!
//! - [`WalletProvider`]: the capability set of an external wallet
//! - [`WalletSessionManager`]: the one process-wide wallet session
//! - [`AuthChallengeProtocol`]: prove wallet ownership by signing a challenge
//! - Argon2id encrypted keystore and a provider backed by it

pub mod auth;
pub mod error;
pub mod keystore;
pub mod local;
pub mod provider;
pub mod session;

pub use auth::{verify_signed_challenge, AuthChallengeProtocol, AuthState};
pub use error::{AuthError, ConnectionError, ProviderError, WalletError};
pub use keystore::{
    decrypt_keystore, encrypt_keystore, load_keystore, save_keystore, KeystoreFile,
};
pub use local::KeystoreWalletProvider;
pub use provider::WalletProvider;
pub use session::WalletSessionManager;
