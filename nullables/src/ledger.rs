//! Nullable ledger: an in-memory chain that applies what it is sent.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chainbadge_ledger::{
    AccountInfo, AssetHolding, AssetInfo, Ledger, LedgerError, PendingStatus,
};
use chainbadge_transactions::{SignedTransaction, SuggestedParams, TxId, TxKind};
use chainbadge_types::{AssetId, WalletAddress};

/// First id handed out to assets created on the null ledger.
pub const FIRST_ASSET_ID: AssetId = 1_000;

struct Pending {
    signed: SignedTransaction,
    polls: u32,
    outcome: Option<PendingStatus>,
}

struct LedgerState {
    round: u64,
    min_fee: u64,
    confirm_on_poll: Option<u32>,
    pool_error: Option<String>,
    refuse_submissions: Option<String>,
    hang_submissions: bool,
    fail_holdings: bool,
    failing_assets: HashSet<AssetId>,
    balances: HashMap<WalletAddress, u64>,
    holdings: HashMap<WalletAddress, Vec<AssetHolding>>,
    assets: HashMap<AssetId, AssetInfo>,
    pending: HashMap<TxId, Pending>,
    submissions: Vec<TxId>,
    polls: u32,
    next_asset_id: AssetId,
}

/// A ledger that confirms transactions on a programmable poll.
///
/// Submitted transactions are decoded and checked (structure, fee,
/// signature). Once confirmed, creations mint an asset held by the
/// creator and transfers move holdings.
pub struct NullLedger {
    state: Mutex<LedgerState>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState {
                round: 100,
                min_fee: 1_000,
                confirm_on_poll: Some(1),
                pool_error: None,
                refuse_submissions: None,
                hang_submissions: false,
                fail_holdings: false,
                failing_assets: HashSet::new(),
                balances: HashMap::new(),
                holdings: HashMap::new(),
                assets: HashMap::new(),
                pending: HashMap::new(),
                submissions: Vec::new(),
                polls: 0,
                next_asset_id: FIRST_ASSET_ID,
            }),
        }
    }

    /// Confirm each transaction on its `n`-th status poll; `None` never confirms.
    pub fn confirm_on_poll(&self, n: Option<u32>) {
        self.state.lock().unwrap().confirm_on_poll = n;
    }

    /// Report `error` from the pool for every pending transaction.
    pub fn set_pool_error(&self, error: Option<&str>) {
        self.state.lock().unwrap().pool_error = error.map(str::to_string);
    }

    /// Refuse submissions outright with `reason`.
    pub fn refuse_submissions(&self, reason: Option<&str>) {
        self.state.lock().unwrap().refuse_submissions = reason.map(str::to_string);
    }

    /// Never answer submissions.
    pub fn hang_submissions(&self, hang: bool) {
        self.state.lock().unwrap().hang_submissions = hang;
    }

    pub fn fail_holdings(&self, fail: bool) {
        self.state.lock().unwrap().fail_holdings = fail;
    }

    /// Set the native balance of `owner`, in micro-units.
    pub fn set_balance(&self, owner: &WalletAddress, micro: u64) {
        self.state.lock().unwrap().balances.insert(owner.clone(), micro);
    }

    /// Make lookups of `asset_id` fail.
    pub fn fail_asset(&self, asset_id: AssetId) {
        self.state.lock().unwrap().failing_assets.insert(asset_id);
    }

    /// Seed an existing asset held by `owner`.
    pub fn add_asset(&self, owner: &WalletAddress, info: AssetInfo, amount: u64) {
        let mut state = self.state.lock().unwrap();
        state
            .holdings
            .entry(owner.clone())
            .or_default()
            .push(AssetHolding {
                asset_id: info.asset_id,
                amount,
            });
        state.assets.insert(info.asset_id, info);
    }

    /// Ids of every accepted submission, in order.
    pub fn submissions(&self) -> Vec<TxId> {
        self.state.lock().unwrap().submissions.clone()
    }

    /// Total status polls across all transactions.
    pub fn polls(&self) -> u32 {
        self.state.lock().unwrap().polls
    }

    pub fn round(&self) -> u64 {
        self.state.lock().unwrap().round
    }

    pub fn holding(&self, owner: &WalletAddress, asset_id: AssetId) -> Option<u64> {
        self.state
            .lock()
            .unwrap()
            .holdings
            .get(owner)?
            .iter()
            .find(|h| h.asset_id == asset_id)
            .map(|h| h.amount)
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerState {
    fn apply(&mut self, signed: &SignedTransaction) -> PendingStatus {
        let round = self.round;
        let sender = signed.txn.sender().clone();
        let mut asset_index = None;

        match &signed.txn.kind {
            TxKind::AssetCreate(fields) => {
                let asset_id = self.next_asset_id;
                self.next_asset_id += 1;
                self.assets.insert(
                    asset_id,
                    AssetInfo {
                        asset_id,
                        name: fields.asset_name.clone(),
                        unit_name: fields.unit_name.clone(),
                        url: fields.url.clone(),
                        total: fields.total,
                        decimals: fields.decimals,
                        creator: sender.clone(),
                    },
                );
                self.credit(&sender, asset_id, fields.total);
                asset_index = Some(asset_id);
            }
            TxKind::AssetTransfer(fields) => {
                if let Some(h) = self
                    .holdings
                    .get_mut(&sender)
                    .and_then(|hs| hs.iter_mut().find(|h| h.asset_id == fields.asset_id))
                {
                    h.amount = h.amount.saturating_sub(fields.amount);
                }
                self.credit(&fields.receiver, fields.asset_id, fields.amount);
            }
        }

        PendingStatus {
            confirmed_round: Some(round),
            asset_index,
            pool_error: String::new(),
        }
    }

    fn credit(&mut self, owner: &WalletAddress, asset_id: AssetId, amount: u64) {
        let holdings = self.holdings.entry(owner.clone()).or_default();
        match holdings.iter_mut().find(|h| h.asset_id == asset_id) {
            Some(h) => h.amount += amount,
            None => holdings.push(AssetHolding { asset_id, amount }),
        }
    }
}

#[async_trait]
impl Ledger for NullLedger {
    async fn network_params(&self) -> Result<SuggestedParams, LedgerError> {
        let state = self.state.lock().unwrap();
        Ok(SuggestedParams {
            fee: 0,
            min_fee: state.min_fee,
            first_valid: state.round,
            last_valid: state.round + 1_000,
            genesis_id: "null-v1".to_string(),
            genesis_hash: "bnVsbA==".to_string(),
            flat_fee: false,
        })
    }

    async fn account_info(&self, address: &WalletAddress) -> Result<AccountInfo, LedgerError> {
        let state = self.state.lock().unwrap();
        if state.fail_holdings {
            return Err(LedgerError::Http("account unavailable".into()));
        }
        Ok(AccountInfo {
            address: address.clone(),
            amount: state.balances.get(address).copied().unwrap_or_default(),
            holdings: state.holdings.get(address).cloned().unwrap_or_default(),
        })
    }

    async fn asset_by_id(&self, asset_id: AssetId) -> Result<AssetInfo, LedgerError> {
        let state = self.state.lock().unwrap();
        if state.failing_assets.contains(&asset_id) {
            return Err(LedgerError::Http(format!("asset {asset_id} unavailable")));
        }
        state
            .assets
            .get(&asset_id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(format!("/v2/assets/{asset_id}")))
    }

    async fn pending_transaction_status(
        &self,
        tx_id: &TxId,
    ) -> Result<PendingStatus, LedgerError> {
        let mut state = self.state.lock().unwrap();
        state.polls += 1;
        let confirm_on = state.confirm_on_poll;
        let pool_error = state.pool_error.clone();

        let Some(mut pending) = state.pending.remove(tx_id) else {
            return Err(LedgerError::NotFound(tx_id.to_string()));
        };
        pending.polls += 1;

        if pending.outcome.is_none() {
            if let Some(error) = pool_error {
                pending.outcome = Some(PendingStatus {
                    pool_error: error,
                    ..Default::default()
                });
            } else if confirm_on.is_some_and(|n| pending.polls >= n) {
                pending.outcome = Some(state.apply(&pending.signed));
            }
        }

        let status = pending.outcome.clone().unwrap_or_default();
        state.pending.insert(tx_id.clone(), pending);
        Ok(status)
    }

    async fn current_round(&self) -> Result<u64, LedgerError> {
        Ok(self.state.lock().unwrap().round)
    }

    async fn wait_for_round(&self, round: u64) -> Result<u64, LedgerError> {
        let mut state = self.state.lock().unwrap();
        state.round = state.round.max(round + 1);
        Ok(state.round)
    }

    async fn submit_signed_transaction(&self, bytes: &[u8]) -> Result<TxId, LedgerError> {
        let hang = self.state.lock().unwrap().hang_submissions;
        if hang {
            std::future::pending::<()>().await;
        }

        let signed = SignedTransaction::decode(bytes)
            .map_err(|e| LedgerError::Refused(format!("undecodable transaction: {e}")))?;
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = &state.refuse_submissions {
            return Err(LedgerError::Refused(reason.clone()));
        }
        chainbadge_transactions::validate_signed(&signed, state.min_fee)
            .map_err(|e| LedgerError::Refused(e.to_string()))?;

        let tx_id = signed
            .id()
            .map_err(|e| LedgerError::Refused(e.to_string()))?;
        state.submissions.push(tx_id.clone());
        state.pending.insert(
            tx_id.clone(),
            Pending {
                signed,
                polls: 0,
                outcome: None,
            },
        );
        Ok(tx_id)
    }
}
