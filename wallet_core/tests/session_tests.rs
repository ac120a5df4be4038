use std::sync::Arc;
use std::time::Duration;

use chainbadge_nullables::{ConnectMode, NullSessionStore, NullWalletProvider};
use chainbadge_store::SessionStore;
use chainbadge_types::WalletAddress;
use chainbadge_wallet_core::{ConnectionError, WalletSessionManager};

fn manager(
    provider: &Arc<NullWalletProvider>,
    store: &Arc<NullSessionStore>,
) -> WalletSessionManager {
    WalletSessionManager::new(provider.clone(), store.clone())
}

#[tokio::test]
async fn connect_records_and_persists_first_account() {
    let provider = Arc::new(NullWalletProvider::new(1));
    let store = Arc::new(NullSessionStore::new());
    let sessions = manager(&provider, &store);

    let session = sessions.connect().await.unwrap();
    assert_eq!(&session.address, provider.address());
    assert!(session.is_active);
    assert_eq!(store.persisted().as_ref(), Some(provider.address()));
    assert_eq!(sessions.active_address().as_ref(), Some(provider.address()));
    assert!(sessions.is_session_for(provider.address()));
}

#[tokio::test]
async fn connect_without_accounts_fails() {
    let provider = Arc::new(NullWalletProvider::new(1));
    provider.set_connect_mode(ConnectMode::NoAccounts);
    let store = Arc::new(NullSessionStore::new());
    let sessions = manager(&provider, &store);

    assert!(matches!(
        sessions.connect().await,
        Err(ConnectionError::NoAccounts)
    ));
    assert!(sessions.current_session().is_none());
    assert!(store.persisted().is_none());
}

#[tokio::test]
async fn declined_handshake_is_cancelled() {
    let provider = Arc::new(NullWalletProvider::new(1));
    provider.set_connect_mode(ConnectMode::Reject);
    let store = Arc::new(NullSessionStore::new());

    assert!(matches!(
        manager(&provider, &store).connect().await,
        Err(ConnectionError::Cancelled)
    ));
}

#[tokio::test]
async fn persist_failure_surfaces_as_store_error() {
    let provider = Arc::new(NullWalletProvider::new(1));
    let store = Arc::new(NullSessionStore::new());
    store.fail_writes(true);

    assert!(matches!(
        manager(&provider, &store).connect().await,
        Err(ConnectionError::Store(_))
    ));
}

#[tokio::test]
async fn disconnect_twice_is_idempotent() {
    let provider = Arc::new(NullWalletProvider::new(1));
    let store = Arc::new(NullSessionStore::new());
    let sessions = manager(&provider, &store);
    sessions.connect().await.unwrap();

    sessions.disconnect().await;
    let after_first = (sessions.current_session(), store.persisted());
    sessions.disconnect().await;
    let after_second = (sessions.current_session(), store.persisted());

    assert_eq!(after_first, (None, None));
    assert_eq!(after_first, after_second);
    assert!(sessions.active_address().is_none());
}

#[tokio::test]
async fn disconnect_ignores_provider_and_store_failures() {
    let provider = Arc::new(NullWalletProvider::new(1));
    let store = Arc::new(NullSessionStore::new());
    let sessions = manager(&provider, &store);
    sessions.connect().await.unwrap();

    provider.set_fail_disconnect(true);
    store.fail_writes(true);
    sessions.disconnect().await;

    assert!(sessions.current_session().is_none());
    assert_eq!(provider.disconnect_calls(), 1);
}

#[tokio::test]
async fn active_address_rehydrates_without_trusting_it() {
    let provider = Arc::new(NullWalletProvider::new(1));
    let store = Arc::new(NullSessionStore::with_address(provider.address().clone()));
    let sessions = manager(&provider, &store);

    assert_eq!(sessions.active_address().as_ref(), Some(provider.address()));
    let session = sessions.current_session().unwrap();
    assert!(!session.is_active);
    assert!(!sessions.is_session_for(provider.address()));
    assert_eq!(provider.reconnect_calls(), 0);
}

#[tokio::test]
async fn liveness_resumes_rehydrated_session_once() {
    let provider = Arc::new(NullWalletProvider::new(1));
    let store = Arc::new(NullSessionStore::with_address(provider.address().clone()));
    let sessions = manager(&provider, &store);

    assert!(sessions.verify_liveness().await);
    assert_eq!(provider.reconnect_calls(), 1);
    assert!(sessions.is_session_for(provider.address()));

    // Live and connected: no further handshake.
    assert!(sessions.verify_liveness().await);
    assert_eq!(provider.reconnect_calls(), 1);
}

#[tokio::test]
async fn liveness_false_when_resume_fails() {
    let provider = Arc::new(NullWalletProvider::new(1));
    let store = Arc::new(NullSessionStore::new());
    let sessions = manager(&provider, &store);
    sessions.connect().await.unwrap();

    provider.go_dormant();
    provider.set_resumable(false);
    assert!(!sessions.verify_liveness().await);
    assert_eq!(provider.reconnect_calls(), 1);
    assert!(!sessions.is_session_for(provider.address()));
    // The persisted entry is advisory and survives.
    assert!(store.persisted().is_some());
}

#[tokio::test]
async fn liveness_false_without_any_session() {
    let provider = Arc::new(NullWalletProvider::new(1));
    let store = Arc::new(NullSessionStore::new());
    let sessions = manager(&provider, &store);

    assert!(!sessions.verify_liveness().await);
    assert_eq!(provider.reconnect_calls(), 0);
}

#[tokio::test]
async fn resumed_wallet_with_other_account_is_not_live() {
    let provider = Arc::new(NullWalletProvider::new(1));
    let stranger = WalletAddress::new("B".repeat(58));
    let store = Arc::new(NullSessionStore::with_address(stranger.clone()));
    let sessions = manager(&provider, &store);

    assert!(!sessions.verify_liveness().await);
    assert!(!sessions.is_session_for(&stranger));
}

#[tokio::test]
async fn provider_disconnect_event_clears_session() {
    let provider = Arc::new(NullWalletProvider::new(1));
    let store = Arc::new(NullSessionStore::new());
    let sessions = manager(&provider, &store);
    sessions.connect().await.unwrap();

    provider.emit_disconnect();
    for _ in 0..50 {
        if sessions.current_session().is_none() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(sessions.current_session().is_none());
    assert!(store.load_address().unwrap().is_none());
}

#[tokio::test]
async fn reconnect_after_event_restores_session() {
    let provider = Arc::new(NullWalletProvider::new(1));
    let store = Arc::new(NullSessionStore::new());
    let sessions = manager(&provider, &store);
    sessions.connect().await.unwrap();
    sessions.connect().await.unwrap();
    assert_eq!(provider.connect_calls(), 2);

    provider.emit_disconnect();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(sessions.current_session().is_none());

    sessions.connect().await.unwrap();
    assert!(sessions.is_session_for(provider.address()));
}

#[tokio::test]
async fn silent_drop_is_not_live_before_any_notice() {
    let provider = Arc::new(NullWalletProvider::new(1));
    let store = Arc::new(NullSessionStore::new());
    let sessions = manager(&provider, &store);
    sessions.connect().await.unwrap();
    assert!(sessions.is_live_for(provider.address()));

    provider.go_dormant();
    assert!(sessions.is_session_for(provider.address()));
    assert!(!sessions.is_live_for(provider.address()));
}
