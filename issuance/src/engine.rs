//! The issuance engine: one sign, submit, confirm cycle per transaction.

use std::sync::{Arc, Mutex};

use chainbadge_ledger::{Ledger, LedgerError, PendingStatus};
use chainbadge_transactions::{
    build_asset_create, build_asset_transfer, build_opt_in, SuggestedParams, Transaction,
    TransactionError, TxId,
};
use chainbadge_types::{
    AssetCreationRequest, AssetId, BadgeMetadata, BadgeRecord, Timestamp, WalletAddress,
};
use chainbadge_wallet_core::WalletSessionManager;
use rand::RngCore;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::IssuanceConfig;
use crate::confirm::{wait_for_confirmation, PendingTransaction};
use crate::error::IssuanceError;

/// Bytes of random note attached to every transaction.
const NOTE_NONCE_LEN: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssuanceState {
    Idle,
    Building,
    AwaitingSignature,
    Submitted,
    Polling,
    Confirmed,
    Failed,
    TimedOut,
}

/// Result of the optional transfer after a confirmed creation.
#[derive(Debug)]
pub enum TransferOutcome {
    Completed { tx_id: TxId },
    /// The creation stands; only the hand-over failed.
    Failed(IssuanceError),
}

/// A confirmed badge creation plus the fate of its transfer, if any.
#[derive(Debug)]
pub struct IssuanceReceipt {
    pub badge: BadgeRecord,
    pub tx_id: TxId,
    pub metadata: Option<BadgeMetadata>,
    pub transfer: Option<TransferOutcome>,
}

impl IssuanceReceipt {
    pub fn transfer_failed(&self) -> bool {
        matches!(self.transfer, Some(TransferOutcome::Failed(_)))
    }
}

pub struct AssetIssuanceEngine {
    sessions: Arc<WalletSessionManager>,
    ledger: Arc<dyn Ledger>,
    config: IssuanceConfig,
    signing_gate: tokio::sync::Mutex<()>,
    state: Mutex<IssuanceState>,
}

impl AssetIssuanceEngine {
    pub fn new(
        sessions: Arc<WalletSessionManager>,
        ledger: Arc<dyn Ledger>,
        config: IssuanceConfig,
    ) -> Self {
        Self {
            sessions,
            ledger,
            config,
            signing_gate: tokio::sync::Mutex::new(()),
            state: Mutex::new(IssuanceState::Idle),
        }
    }

    pub fn config(&self) -> &IssuanceConfig {
        &self.config
    }

    /// The state reached by the most recent cycle.
    pub fn state(&self) -> IssuanceState {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn set_state(&self, state: IssuanceState) {
        *self.state.lock().unwrap_or_else(|p| p.into_inner()) = state;
    }

    /// Create the asset described by `request`.
    pub async fn issue(&self, request: AssetCreationRequest) -> Result<BadgeRecord, IssuanceError> {
        let (_tx, mut cancel) = watch::channel(false);
        self.issue_cancellable(request, &mut cancel)
            .await
            .map(|(badge, _)| badge)
    }

    /// [`issue`](Self::issue), stopping confirmation polling once `cancel` is true.
    pub async fn issue_cancellable(
        &self,
        request: AssetCreationRequest,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<(BadgeRecord, TxId), IssuanceError> {
        self.failing(self.admit(&request).await)?;

        info!(creator = %request.creator, name = %request.name, "issuing badge asset");
        let (tx_id, status) = self
            .run_cycle(&request.creator, |params| build_asset_create(&request, params), cancel)
            .await?;

        let asset_id = status.asset_index.ok_or_else(|| {
            IssuanceError::Ledger(LedgerError::Decode(format!(
                "confirmed creation {tx_id} carries no asset id"
            )))
        })?;
        info!(asset_id, tx_id = %tx_id, "badge asset created");

        let badge = BadgeRecord::real(
            asset_id,
            request.name.clone(),
            request.unit_name.clone(),
            request.creator.clone(),
        )
        .with_url(request.metadata_url.clone());
        Ok((badge, tx_id))
    }

    /// Create a badge and hand it to `recipient` when that is not the creator.
    ///
    /// A failed transfer is reported in the receipt; the confirmed creation
    /// is never rolled back.
    pub async fn issue_and_transfer(
        &self,
        request: AssetCreationRequest,
        recipient: Option<WalletAddress>,
    ) -> Result<IssuanceReceipt, IssuanceError> {
        let (_tx, mut cancel) = watch::channel(false);
        let creator = request.creator.clone();
        let (badge, tx_id) = self.issue_cancellable(request, &mut cancel).await?;

        let transfer = match recipient {
            Some(recipient) if recipient != creator => {
                Some(match self.transfer(badge.asset_id, recipient).await {
                    Ok(tx_id) => TransferOutcome::Completed { tx_id },
                    Err(e) => {
                        warn!(asset_id = badge.asset_id, error = %e, "badge created but transfer failed");
                        TransferOutcome::Failed(e)
                    }
                })
            }
            _ => None,
        };

        Ok(IssuanceReceipt {
            badge,
            tx_id,
            metadata: None,
            transfer,
        })
    }

    /// Issue an event badge from the session's wallet.
    pub async fn issue_badge(
        &self,
        event: &str,
        badge_type: &str,
        recipient: Option<WalletAddress>,
    ) -> Result<IssuanceReceipt, IssuanceError> {
        let creator = self.failing(
            self.sessions
                .active_address()
                .ok_or(IssuanceError::SessionExpired),
        )?;
        let request = AssetCreationRequest::badge(event, badge_type, creator);
        let mut receipt = self.issue_and_transfer(request, recipient).await?;
        receipt.metadata = Some(BadgeMetadata::new(event, badge_type, Timestamp::now()));
        Ok(receipt)
    }

    /// Send one unit of `asset_id` from the session wallet to `recipient`.
    pub async fn transfer(
        &self,
        asset_id: AssetId,
        recipient: WalletAddress,
    ) -> Result<TxId, IssuanceError> {
        let sender = self.live_address().await?;
        info!(asset_id, from = %sender, to = %recipient, "transferring badge");
        let (_tx, mut cancel) = watch::channel(false);
        let (tx_id, _) = self
            .run_cycle(
                &sender,
                |params| build_asset_transfer(sender.clone(), recipient.clone(), asset_id, 1, params),
                &mut cancel,
            )
            .await?;
        Ok(tx_id)
    }

    /// Register the session wallet to hold `asset_id`.
    pub async fn opt_in(&self, asset_id: AssetId) -> Result<TxId, IssuanceError> {
        let account = self.live_address().await?;
        info!(asset_id, account = %account, "opting in to asset");
        let (_tx, mut cancel) = watch::channel(false);
        let (tx_id, _) = self
            .run_cycle(
                &account,
                |params| build_opt_in(account.clone(), asset_id, params),
                &mut cancel,
            )
            .await?;
        Ok(tx_id)
    }

    /// Opt in to `asset_id` and return it as a real badge record.
    pub async fn claim(&self, asset_id: AssetId) -> Result<BadgeRecord, IssuanceError> {
        self.opt_in(asset_id).await?;
        let info = self.ledger.asset_by_id(asset_id).await?;
        Ok(
            BadgeRecord::real(info.asset_id, info.name, info.unit_name, info.creator)
                .with_url(info.url),
        )
    }

    async fn live_address(&self) -> Result<WalletAddress, IssuanceError> {
        let address = self.failing(
            self.sessions
                .active_address()
                .ok_or(IssuanceError::SessionExpired),
        )?;
        self.failing(self.preflight(&address).await)?;
        Ok(address)
    }

    async fn admit(&self, request: &AssetCreationRequest) -> Result<(), IssuanceError> {
        self.preflight(&request.creator).await?;
        request
            .validate()
            .map_err(|e| IssuanceError::from(TransactionError::from(e)))
    }

    /// Record `Failed` for an exit taken before any cycle started.
    fn failing<T>(&self, result: Result<T, IssuanceError>) -> Result<T, IssuanceError> {
        if result.is_err() {
            self.set_state(IssuanceState::Failed);
        }
        result
    }

    async fn preflight(&self, address: &WalletAddress) -> Result<(), IssuanceError> {
        if !self.sessions.verify_liveness().await {
            warn!(address = %address, "no live wallet session");
            return Err(IssuanceError::SessionExpired);
        }
        if !self.sessions.is_session_for(address) {
            return Err(IssuanceError::InvalidRequest(format!(
                "{address} is not the connected wallet"
            )));
        }
        Ok(())
    }

    /// The session must still belong to `address` and the wallet must
    /// still be connected.
    fn ensure_session(&self, address: &WalletAddress) -> Result<(), IssuanceError> {
        if self.sessions.is_live_for(address) {
            Ok(())
        } else {
            warn!(address = %address, "wallet session ended mid-issuance");
            Err(IssuanceError::SessionExpired)
        }
    }

    async fn run_cycle<F>(
        &self,
        sender: &WalletAddress,
        build: F,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<(TxId, PendingStatus), IssuanceError>
    where
        F: FnOnce(&SuggestedParams) -> Result<Transaction, TransactionError>,
    {
        let result = self.cycle(sender, build, cancel).await;
        self.set_state(match &result {
            Ok(_) => IssuanceState::Confirmed,
            Err(IssuanceError::ConfirmationTimeout { .. }) => IssuanceState::TimedOut,
            Err(_) => IssuanceState::Failed,
        });
        result
    }

    async fn cycle<F>(
        &self,
        sender: &WalletAddress,
        build: F,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<(TxId, PendingStatus), IssuanceError>
    where
        F: FnOnce(&SuggestedParams) -> Result<Transaction, TransactionError>,
    {
        self.set_state(IssuanceState::Building);
        let params = self.ledger.network_params().await?;
        let txn = build(&params)?.with_note(note_nonce(), &params)?;
        let tx_id = txn.id()?;
        debug!(tx_id = %tx_id, fee = txn.header.fee, "transaction built");

        self.ensure_session(sender)?;
        let signed = self.sign(&txn).await?;

        self.ensure_session(sender)?;
        let tx_id = self.submit(&signed).await?;
        self.set_state(IssuanceState::Submitted);

        let submitted_at = match self.ledger.current_round().await {
            Ok(round) => round,
            Err(e) => {
                debug!(error = %e, "round lookup failed; using the build round");
                params.first_valid
            }
        };
        let mut pending = PendingTransaction::new(tx_id.clone(), submitted_at);

        self.set_state(IssuanceState::Polling);
        let status = wait_for_confirmation(
            self.ledger.as_ref(),
            &mut pending,
            self.config.max_confirmation_rounds,
            cancel,
        )
        .await?;
        Ok((tx_id, status))
    }

    async fn sign(&self, txn: &Transaction) -> Result<Vec<u8>, IssuanceError> {
        let _gate = self
            .signing_gate
            .try_lock()
            .map_err(|_| IssuanceError::ProviderBusy)?;
        self.set_state(IssuanceState::AwaitingSignature);

        let signing = self.sessions.provider().sign_transaction(txn);
        match tokio::time::timeout(self.config.signing_timeout, signing).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) => {
                warn!(error = %e, "wallet did not sign");
                Err(e.into())
            }
            Err(_) => {
                warn!(timeout = ?self.config.signing_timeout, "signature request timed out");
                Err(IssuanceError::SigningTimeout)
            }
        }
    }

    async fn submit(&self, signed: &[u8]) -> Result<TxId, IssuanceError> {
        let submission = self.ledger.submit_signed_transaction(signed);
        match tokio::time::timeout(self.config.submission_timeout, submission).await {
            Ok(Ok(tx_id)) => {
                info!(tx_id = %tx_id, "transaction submitted");
                Ok(tx_id)
            }
            Ok(Err(LedgerError::Refused(reason))) => {
                warn!(reason = %reason, "ledger refused transaction");
                Err(IssuanceError::Rejected { reason })
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => {
                warn!(timeout = ?self.config.submission_timeout, "submission timed out");
                Err(IssuanceError::SubmissionTimeout)
            }
        }
    }
}

fn note_nonce() -> Vec<u8> {
    let mut note = vec![0u8; NOTE_NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut note);
    note
}
