use std::sync::Arc;
use std::time::Duration;

use chainbadge_nullables::{NullSessionStore, NullWalletProvider, SignMode};
use chainbadge_types::Challenge;
use chainbadge_wallet_core::{AuthChallengeProtocol, AuthError, AuthState, WalletSessionManager};

async fn connected(provider: &Arc<NullWalletProvider>) -> Arc<WalletSessionManager> {
    let sessions = Arc::new(WalletSessionManager::new(
        provider.clone(),
        Arc::new(NullSessionStore::new()),
    ));
    sessions.connect().await.unwrap();
    sessions
}

#[tokio::test]
async fn sign_then_verify_and_tamper() {
    let provider = Arc::new(NullWalletProvider::new(7));
    let auth = AuthChallengeProtocol::new(connected(&provider).await);
    assert_eq!(auth.state(), AuthState::Idle);

    let signed = auth
        .request_signature(&Challenge::new("auth-challenge"))
        .await
        .unwrap();
    assert_eq!(auth.state(), AuthState::Signed);
    assert_eq!(&signed.signer, provider.address());
    assert!(AuthChallengeProtocol::verify(&signed));

    let mut tampered = signed.clone();
    tampered.message = "tampered".into();
    assert!(!AuthChallengeProtocol::verify(&tampered));
}

#[tokio::test]
async fn no_session_rejected_before_signing() {
    let provider = Arc::new(NullWalletProvider::new(7));
    let sessions = Arc::new(WalletSessionManager::new(
        provider.clone(),
        Arc::new(NullSessionStore::new()),
    ));
    let auth = AuthChallengeProtocol::new(sessions);

    assert!(matches!(
        auth.request_signature(&Challenge::default()).await,
        Err(AuthError::NoSession)
    ));
    assert_eq!(provider.sign_calls(), 0);
}

#[tokio::test]
async fn dropped_connection_rejected_before_signing() {
    let provider = Arc::new(NullWalletProvider::new(7));
    let auth = AuthChallengeProtocol::new(connected(&provider).await);
    provider.go_dormant();

    assert!(matches!(
        auth.request_signature(&Challenge::default()).await,
        Err(AuthError::NoSession)
    ));
    assert_eq!(provider.sign_calls(), 0);
}

#[tokio::test]
async fn decline_is_cancelled() {
    let provider = Arc::new(NullWalletProvider::new(7));
    let auth = AuthChallengeProtocol::new(connected(&provider).await);
    provider.set_sign_mode(SignMode::Reject);

    assert!(matches!(
        auth.request_signature(&Challenge::default()).await,
        Err(AuthError::Cancelled)
    ));
    assert_eq!(auth.state(), AuthState::Failed);
}

#[tokio::test]
async fn unanswered_request_times_out_as_cancelled() {
    let provider = Arc::new(NullWalletProvider::new(7));
    let sessions = connected(&provider).await;
    let auth = AuthChallengeProtocol::with_timeout(sessions, Duration::from_millis(20));
    provider.set_sign_mode(SignMode::Never);

    assert!(matches!(
        auth.request_signature(&Challenge::default()).await,
        Err(AuthError::Cancelled)
    ));
}

#[tokio::test]
async fn authenticate_reaches_verified() {
    let provider = Arc::new(NullWalletProvider::new(7));
    let auth = AuthChallengeProtocol::new(connected(&provider).await);

    assert!(auth.authenticate(&Challenge::default()).await.unwrap());
    assert_eq!(auth.state(), AuthState::Verified);
}

#[tokio::test]
async fn busy_wallet_is_a_provider_error() {
    let provider = Arc::new(NullWalletProvider::new(7));
    let auth = AuthChallengeProtocol::new(connected(&provider).await);
    provider.set_sign_mode(SignMode::Busy);

    assert!(matches!(
        auth.request_signature(&Challenge::default()).await,
        Err(AuthError::Provider(_))
    ));
}
