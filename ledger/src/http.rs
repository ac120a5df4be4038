//! HTTP client for an algod-style v2 REST API.

use std::time::Duration;

use async_trait::async_trait;
use chainbadge_transactions::{SuggestedParams, TxId};
use chainbadge_types::{AssetId, NetworkId, WalletAddress};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::{AccountInfo, AssetHolding, AssetInfo, Ledger, LedgerError, PendingStatus};

/// Rounds a freshly built transaction stays valid for.
pub const VALIDITY_WINDOW: u64 = 1_000;

const TOKEN_HEADER: &str = "X-Algo-API-Token";

/// Talks to a ledger node over HTTP.
///
/// Wraps `reqwest::Client` with the node's base URL and an optional API
/// token, and maps each REST response into the [`Ledger`] types.
#[derive(Clone)]
pub struct HttpLedgerClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpLedgerClient {
    /// Create a client targeting `base_url` (e.g. `https://testnet-api.algonode.cloud`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LedgerError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
        })
    }

    /// Client for a network's public endpoint.
    pub fn for_network(network: NetworkId) -> Result<Self, LedgerError> {
        Self::new(network.default_ledger_url())
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.api_token {
            Some(token) => builder.header(TOKEN_HEADER, token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LedgerError> {
        debug!(path, "ledger GET");
        let response = self
            .request(reqwest::Method::GET, path)
            .send()
            .await
            .map_err(|e| LedgerError::Http(format!("request failed: {e}")))?;
        decode_response(path, response).await
    }
}

async fn decode_response<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<T, LedgerError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(LedgerError::NotFound(path.to_string()));
    }
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_default();
        return Err(LedgerError::Status {
            status: status.as_u16(),
            message,
        });
    }
    response
        .json()
        .await
        .map_err(|e| LedgerError::Decode(format!("{path}: {e}")))
}

#[async_trait]
impl Ledger for HttpLedgerClient {
    async fn network_params(&self) -> Result<SuggestedParams, LedgerError> {
        let resp: ParamsResponse = self.get_json("/v2/transactions/params").await?;
        Ok(resp.into_params())
    }

    async fn account_info(&self, address: &WalletAddress) -> Result<AccountInfo, LedgerError> {
        let resp: AccountResponse = self
            .get_json(&format!("/v2/accounts/{}", address.as_str()))
            .await?;
        Ok(resp.into_account(address))
    }

    async fn asset_by_id(&self, asset_id: AssetId) -> Result<AssetInfo, LedgerError> {
        let resp: AssetResponse = self.get_json(&format!("/v2/assets/{asset_id}")).await?;
        Ok(resp.into_info())
    }

    async fn pending_transaction_status(
        &self,
        tx_id: &TxId,
    ) -> Result<PendingStatus, LedgerError> {
        let resp: PendingResponse = self
            .get_json(&format!("/v2/transactions/pending/{}", tx_id.as_str()))
            .await?;
        Ok(PendingStatus {
            confirmed_round: resp.confirmed_round,
            asset_index: resp.asset_index,
            pool_error: resp.pool_error,
        })
    }

    async fn current_round(&self) -> Result<u64, LedgerError> {
        let resp: StatusResponse = self.get_json("/v2/status").await?;
        Ok(resp.last_round)
    }

    async fn wait_for_round(&self, round: u64) -> Result<u64, LedgerError> {
        let resp: StatusResponse = self
            .get_json(&format!("/v2/status/wait-for-block-after/{round}"))
            .await?;
        Ok(resp.last_round)
    }

    async fn submit_signed_transaction(&self, bytes: &[u8]) -> Result<TxId, LedgerError> {
        let path = "/v2/transactions";
        let response = self
            .request(reqwest::Method::POST, path)
            .header(reqwest::header::CONTENT_TYPE, "application/x-binary")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| LedgerError::Http(format!("request failed: {e}")))?;

        match decode_response::<SubmitResponse>(path, response).await {
            Ok(resp) => Ok(TxId::new(resp.tx_id)),
            // The node answers 400 when the pool refuses the transaction.
            Err(LedgerError::Status {
                status: 400,
                message,
            }) => Err(LedgerError::Refused(message)),
            Err(e) => Err(e),
        }
    }
}

// ── Response bodies ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ParamsResponse {
    fee: u64,
    min_fee: u64,
    last_round: u64,
    genesis_id: String,
    genesis_hash: String,
}

impl ParamsResponse {
    fn into_params(self) -> SuggestedParams {
        SuggestedParams {
            fee: self.fee,
            min_fee: self.min_fee,
            first_valid: self.last_round,
            last_valid: self.last_round.saturating_add(VALIDITY_WINDOW),
            genesis_id: self.genesis_id,
            genesis_hash: self.genesis_hash,
            flat_fee: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(default)]
    amount: u64,
    #[serde(default)]
    assets: Vec<HoldingBody>,
}

impl AccountResponse {
    fn into_account(self, address: &WalletAddress) -> AccountInfo {
        AccountInfo {
            address: address.clone(),
            amount: self.amount,
            holdings: self
                .assets
                .into_iter()
                .map(|a| AssetHolding {
                    asset_id: a.asset_id,
                    amount: a.amount,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct HoldingBody {
    asset_id: AssetId,
    amount: u64,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    index: AssetId,
    params: AssetParamsBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct AssetParamsBody {
    creator: String,
    #[serde(default)]
    decimals: u32,
    total: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    unit_name: String,
    #[serde(default)]
    url: String,
}

impl AssetResponse {
    fn into_info(self) -> AssetInfo {
        AssetInfo {
            asset_id: self.index,
            name: self.params.name,
            unit_name: self.params.unit_name,
            url: self.params.url,
            total: self.params.total,
            decimals: self.params.decimals,
            creator: WalletAddress::new(self.params.creator),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PendingResponse {
    #[serde(default)]
    confirmed_round: Option<u64>,
    #[serde(default)]
    asset_index: Option<AssetId>,
    #[serde(default)]
    pool_error: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct StatusResponse {
    last_round: u64,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_response_sets_validity_window() {
        let json = r#"{
            "consensus-version": "future",
            "fee": 0,
            "genesis-hash": "SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=",
            "genesis-id": "testnet-v1.0",
            "last-round": 4200,
            "min-fee": 1000
        }"#;
        let params = serde_json::from_str::<ParamsResponse>(json)
            .unwrap()
            .into_params();
        assert_eq!(params.first_valid, 4200);
        assert_eq!(params.last_valid, 4200 + VALIDITY_WINDOW);
        assert_eq!(params.min_fee, 1000);
        assert_eq!(params.genesis_id, "testnet-v1.0");
        assert!(!params.flat_fee);
    }

    #[test]
    fn account_without_assets_has_no_holdings() {
        let resp: AccountResponse =
            serde_json::from_str(r#"{"address": "X", "amount": 5}"#).unwrap();
        let account = resp.into_account(&WalletAddress::new("X"));
        assert_eq!(account.amount, 5);
        assert!(account.holdings.is_empty());
    }

    #[test]
    fn account_balance_and_holdings_parse() {
        let json = r#"{"address": "X", "amount": 2500000, "assets": [
            {"asset-id": 7, "amount": 1, "is-frozen": false},
            {"asset-id": 9, "amount": 0, "is-frozen": false}
        ]}"#;
        let account = serde_json::from_str::<AccountResponse>(json)
            .unwrap()
            .into_account(&WalletAddress::new("X"));
        assert_eq!(account.address, WalletAddress::new("X"));
        assert_eq!(account.amount, 2_500_000);
        assert_eq!(account.holdings.len(), 2);
        assert_eq!(account.holdings[0].asset_id, 7);
        assert_eq!(account.holdings[1].amount, 0);
    }

    #[test]
    fn account_missing_amount_reads_zero() {
        let resp: AccountResponse = serde_json::from_str(r#"{"assets": []}"#).unwrap();
        assert_eq!(resp.amount, 0);
    }

    #[test]
    fn asset_response_maps_params() {
        let json = r#"{"index": 7, "params": {
            "creator": "CREATOR", "decimals": 0, "total": 1,
            "name": "Conf2024 - Participant Badge", "unit-name": "BADGE",
            "url": "ipfs://placeholder"
        }}"#;
        let info = serde_json::from_str::<AssetResponse>(json)
            .unwrap()
            .into_info();
        assert_eq!(info.asset_id, 7);
        assert_eq!(info.unit_name, "BADGE");
        assert_eq!(info.creator, WalletAddress::new("CREATOR"));
    }

    #[test]
    fn pending_response_defaults() {
        let resp: PendingResponse = serde_json::from_str(r#"{"pool-error": ""}"#).unwrap();
        assert!(resp.confirmed_round.is_none());
        assert!(resp.asset_index.is_none());

        let resp: PendingResponse =
            serde_json::from_str(r#"{"confirmed-round": 12, "asset-index": 99, "pool-error": ""}"#)
                .unwrap();
        assert_eq!(resp.confirmed_round, Some(12));
        assert_eq!(resp.asset_index, Some(99));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = HttpLedgerClient::new("http://127.0.0.1:4001/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:4001");
    }

    #[tokio::test]
    async fn unreachable_node_is_transient() {
        let client = HttpLedgerClient::new("http://127.0.0.1:1").unwrap();
        let err = client.current_round().await.unwrap_err();
        assert!(err.is_transient(), "{err:?}");
    }
}
