//! Fundamental types for ChainBadge.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, keys, timestamps, network ids, and the badge issuance data model
//! (sessions, challenges, asset requests, badge records).

pub mod address;
pub mod asset;
pub mod badge;
pub mod challenge;
pub mod error;
pub mod keys;
pub mod network;
pub mod session;
pub mod time;

pub use address::WalletAddress;
pub use asset::{AssetCreationRequest, AssetId, BadgeMetadata};
pub use badge::{BadgeOrigin, BadgeRecord};
pub use challenge::{Challenge, SignedChallenge};
pub use error::TypesError;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::NetworkId;
pub use session::WalletSession;
pub use time::Timestamp;
