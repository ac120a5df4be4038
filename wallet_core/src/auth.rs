//! Challenge-response authentication.
//!
//! The wallet signs a challenge message off-chain; the result is verified
//! locally from the public key embedded in the signer's address. No network
//! call is made after the signature is obtained.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chainbadge_types::{Challenge, SignedChallenge};
use tracing::{info, warn};

use crate::error::{AuthError, ProviderError};
use crate::session::WalletSessionManager;

/// Default upper bound on waiting for the user to approve a signature.
pub const DEFAULT_SIGN_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    Idle,
    Requesting,
    Signed,
    Verified,
    Rejected,
    Failed,
}

pub struct AuthChallengeProtocol {
    session: Arc<WalletSessionManager>,
    sign_timeout: Duration,
    state: Mutex<AuthState>,
}

impl AuthChallengeProtocol {
    pub fn new(session: Arc<WalletSessionManager>) -> Self {
        Self::with_timeout(session, DEFAULT_SIGN_TIMEOUT)
    }

    pub fn with_timeout(session: Arc<WalletSessionManager>, sign_timeout: Duration) -> Self {
        Self {
            session,
            sign_timeout,
            state: Mutex::new(AuthState::Idle),
        }
    }

    pub fn state(&self) -> AuthState {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn set_state(&self, state: AuthState) {
        *self.state.lock().unwrap_or_else(|p| p.into_inner()) = state;
    }

    /// Ask the session's wallet to sign `challenge`.
    ///
    /// A decline or a timeout is `Cancelled`.
    pub async fn request_signature(
        &self,
        challenge: &Challenge,
    ) -> Result<SignedChallenge, AuthError> {
        let address = match self.session.current_session() {
            Some(session) if self.session.is_live_for(&session.address) => session.address,
            _ => return Err(AuthError::NoSession),
        };

        self.set_state(AuthState::Requesting);
        info!(address = %address, "requesting challenge signature");

        let signing = self
            .session
            .provider()
            .sign_data(challenge.message.as_bytes(), &address);
        let result = match tokio::time::timeout(self.sign_timeout, signing).await {
            Ok(Ok(signature)) => Ok(SignedChallenge::new(
                challenge.message.clone(),
                signature,
                address,
            )),
            Ok(Err(ProviderError::Rejected | ProviderError::Timeout)) | Err(_) => {
                Err(AuthError::Cancelled)
            }
            Ok(Err(ProviderError::NotConnected)) => Err(AuthError::NoSession),
            Ok(Err(e)) => Err(AuthError::Provider(e)),
        };

        match &result {
            Ok(_) => self.set_state(AuthState::Signed),
            Err(e) => {
                warn!(error = %e, "challenge signature not obtained");
                self.set_state(AuthState::Failed);
            }
        }
        result
    }

    /// Check `signed` offline. See [`verify_signed_challenge`].
    pub fn verify(signed: &SignedChallenge) -> bool {
        verify_signed_challenge(signed)
    }

    /// Request a signature on `challenge` and verify it.
    ///
    /// `Ok(false)` means the wallet produced a signature that does not
    /// verify for the session address.
    pub async fn authenticate(&self, challenge: &Challenge) -> Result<bool, AuthError> {
        let signed = self.request_signature(challenge).await?;
        let verified = Self::verify(&signed);
        if verified {
            info!(address = %signed.signer, "wallet ownership verified");
            self.set_state(AuthState::Verified);
        } else {
            warn!(address = %signed.signer, "challenge signature did not verify");
            self.set_state(AuthState::Rejected);
        }
        Ok(verified)
    }
}

/// Verify a signed challenge against the public key in its signer address.
///
/// Pure and offline. Any malformed input (bad address encoding or checksum,
/// wrong signature length, corrupt bytes) yields `false`.
pub fn verify_signed_challenge(signed: &SignedChallenge) -> bool {
    chainbadge_crypto::verify_data_signature(
        signed.message.as_bytes(),
        &signed.signature_bytes,
        signed.signer.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainbadge_crypto::{derive_address, keypair_from_seed, sign_data};
    use chainbadge_types::WalletAddress;

    fn signed(message: &str, seed: u8) -> SignedChallenge {
        let kp = keypair_from_seed(&[seed; 32]);
        let sig = sign_data(message.as_bytes(), &kp.private);
        SignedChallenge::new(message, sig.0.to_vec(), derive_address(&kp.public))
    }

    #[test]
    fn valid_signature_verifies() {
        assert!(verify_signed_challenge(&signed("auth-challenge", 1)));
    }

    #[test]
    fn tampered_message_fails() {
        let mut s = signed("auth-challenge", 1);
        s.message = "tampered".into();
        assert!(!verify_signed_challenge(&s));
    }

    #[test]
    fn other_signer_fails() {
        let mut s = signed("auth-challenge", 1);
        s.signer = signed("auth-challenge", 2).signer;
        assert!(!verify_signed_challenge(&s));
    }

    #[test]
    fn malformed_inputs_fail() {
        let mut s = signed("auth-challenge", 1);
        s.signature_bytes.pop();
        assert!(!verify_signed_challenge(&s));

        let mut s = signed("auth-challenge", 1);
        s.signer = WalletAddress::new("not-an-address");
        assert!(!verify_signed_challenge(&s));

        let mut s = signed("auth-challenge", 1);
        s.signature_bytes.clear();
        assert!(!verify_signed_challenge(&s));
    }

    #[test]
    fn raw_signature_without_domain_prefix_fails() {
        let kp = keypair_from_seed(&[3; 32]);
        let sig = chainbadge_crypto::sign_message(b"auth-challenge", &kp.private);
        let s = SignedChallenge::new("auth-challenge", sig.0.to_vec(), derive_address(&kp.public));
        assert!(!verify_signed_challenge(&s));
    }
}
