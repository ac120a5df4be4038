//! ChainBadge command line client.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use chainbadge_claims::{claim_url, ClaimReconciliation};
use chainbadge_crypto::{derive_address, generate_keypair};
use chainbadge_issuance::{AssetIssuanceEngine, TransferOutcome};
use chainbadge_ledger::{HttpLedgerClient, Ledger};
use chainbadge_store_lmdb::LmdbEnvironment;
use chainbadge_types::{AssetId, BadgeRecord, Challenge, SignedChallenge, WalletAddress};
use chainbadge_utils::{format_micro_units, init_logging, short_address, LogFormat};
use chainbadge_wallet_core::{
    encrypt_keystore, save_keystore, verify_signed_challenge, AuthChallengeProtocol,
    KeystoreWalletProvider, WalletSessionManager,
};
use clap::Parser;

use crate::config::ClientConfig;

const PASSWORD_ENV: &str = "CHAINBADGE_PASSWORD";

#[derive(Parser)]
#[command(name = "chainbadge", about = "Event badge wallet and issuance client")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "CHAINBADGE_CONFIG")]
    config: Option<PathBuf>,

    /// Ledger node URL (defaults to the configured network's endpoint).
    #[arg(long, env = "CHAINBADGE_LEDGER_URL")]
    ledger_url: Option<String>,

    /// Directory for the session and simulated-claim database.
    #[arg(long, env = "CHAINBADGE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Encrypted wallet keystore file.
    #[arg(long, env = "CHAINBADGE_KEYSTORE")]
    keystore: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "CHAINBADGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "CHAINBADGE_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Generate a wallet key and write it to the keystore.
    Keygen {
        /// Overwrite an existing keystore.
        #[arg(long)]
        force: bool,
    },
    /// Connect the keystore wallet and remember the session.
    Connect,
    /// Show the remembered session and whether the wallet still answers.
    Status,
    /// End the session.
    Disconnect,
    /// Sign a challenge with the session wallet to prove ownership.
    Auth {
        /// Challenge text (defaults to the standard identity message).
        #[arg(long)]
        message: Option<String>,
    },
    /// Check a signed challenge offline.
    Verify {
        #[arg(long)]
        message: String,
        /// Hex-encoded signature.
        #[arg(long)]
        signature: String,
        /// Address that claims to have signed.
        #[arg(long)]
        signer: String,
    },
    /// Create an event badge from the session wallet.
    Issue {
        #[arg(long)]
        event: String,
        /// Badge type, e.g. "Participant" or "Speaker".
        #[arg(long, default_value = "Participant")]
        badge_type: String,
        /// Hand the badge to this address once created.
        #[arg(long)]
        recipient: Option<String>,
    },
    /// Opt in to a badge asset and show it.
    Claim {
        asset_id: AssetId,
    },
    /// List the badges an address holds, ledger and simulated.
    Badges {
        /// Owner address (defaults to the remembered session).
        #[arg(long)]
        owner: Option<String>,
    },
    /// Record a simulated badge claim without touching the ledger.
    SimulateClaim {
        #[arg(long)]
        event: String,
        #[arg(long, default_value = "Participant")]
        badge_type: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => ClientConfig::from_toml_file(path)?,
        None => ClientConfig::default(),
    };
    let config = ClientConfig {
        ledger_url: cli.ledger_url.or(file_config.ledger_url.clone()),
        data_dir: cli.data_dir.unwrap_or_else(|| file_config.data_dir.clone()),
        keystore_path: cli.keystore.unwrap_or_else(|| file_config.keystore_path.clone()),
        log_level: cli.log_level.unwrap_or_else(|| file_config.log_level.clone()),
        log_format: cli
            .log_format
            .unwrap_or_else(|| file_config.log_format.clone()),
        ..file_config
    };

    init_logging(LogFormat::parse(&config.log_format), &config.log_level);
    tracing::debug!(
        network = config.network.as_str(),
        ledger = config.ledger_url(),
        data_dir = %config.data_dir.display(),
        "configuration loaded"
    );

    match cli.command {
        Command::Keygen { force } => keygen(&config, force),
        Command::Verify {
            message,
            signature,
            signer,
        } => verify(&message, &signature, &signer),
        command => Client::open(&config)?.run(command).await,
    }
}

fn password() -> anyhow::Result<String> {
    std::env::var(PASSWORD_ENV).with_context(|| format!("{PASSWORD_ENV} is not set"))
}

fn keygen(config: &ClientConfig, force: bool) -> anyhow::Result<()> {
    if config.keystore_path.exists() && !force {
        bail!(
            "keystore {} already exists (use --force to replace it)",
            config.keystore_path.display()
        );
    }
    let password = password()?;
    let keypair = generate_keypair();
    let address = derive_address(&keypair.public);
    let keystore = encrypt_keystore(&keypair.private, &address, &password)?;
    save_keystore(&keystore, &config.keystore_path)?;
    tracing::info!(keystore = %config.keystore_path.display(), "wrote keystore");
    println!("{address}");
    Ok(())
}

fn verify(message: &str, signature: &str, signer: &str) -> anyhow::Result<()> {
    let signed = SignedChallenge::from_hex(message, signature, WalletAddress::new(signer))?;
    if !verify_signed_challenge(&signed) {
        bail!("signature does not verify for {signer}");
    }
    println!("verified: {signer}");
    Ok(())
}

fn print_badge(badge: &BadgeRecord) {
    let origin = if badge.is_real() { "ledger" } else { "simulated" };
    println!(
        "{:>20}  {:<9}  {}  (creator {})",
        badge.asset_id,
        origin,
        badge.name,
        short_address(badge.creator.as_str())
    );
}

/// Everything a wallet-backed command needs, opened once per invocation.
struct Client {
    config: ClientConfig,
    environment: LmdbEnvironment,
    ledger: Arc<dyn Ledger>,
}

impl Client {
    fn open(config: &ClientConfig) -> anyhow::Result<Self> {
        let environment = LmdbEnvironment::open_default(&config.data_dir)
            .with_context(|| format!("opening {}", config.data_dir.display()))?;
        let mut ledger = match &config.ledger_url {
            Some(url) => HttpLedgerClient::new(url)?,
            None => HttpLedgerClient::for_network(config.network)?,
        };
        if let Some(token) = &config.api_token {
            ledger = ledger.with_api_token(token.clone());
        }
        Ok(Self {
            config: config.clone(),
            environment,
            ledger: Arc::new(ledger),
        })
    }

    fn sessions(&self) -> anyhow::Result<Arc<WalletSessionManager>> {
        let provider = KeystoreWalletProvider::from_keystore(&self.config.keystore_path, &password()?)
            .with_context(|| format!("unlocking {}", self.config.keystore_path.display()))?;
        Ok(Arc::new(WalletSessionManager::new(
            Arc::new(provider),
            Arc::new(self.environment.session_store()),
        )))
    }

    fn claims(&self) -> ClaimReconciliation {
        ClaimReconciliation::new(
            Arc::clone(&self.ledger),
            Arc::new(self.environment.simulated_store()),
        )
    }

    fn engine(&self, sessions: Arc<WalletSessionManager>) -> AssetIssuanceEngine {
        AssetIssuanceEngine::new(sessions, Arc::clone(&self.ledger), self.config.issuance())
    }

    /// The remembered session address, without touching the wallet.
    fn remembered_address(&self) -> anyhow::Result<WalletAddress> {
        use chainbadge_store::SessionStore;
        self.environment
            .session_store()
            .load_address()?
            .context("no wallet session; run `chainbadge connect` first")
    }

    async fn run(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Connect => {
                let session = self.sessions()?.connect().await?;
                println!("connected: {}", session.address);
            }
            Command::Status => {
                let sessions = self.sessions()?;
                match sessions.active_address() {
                    None => println!("no session"),
                    Some(address) => {
                        let live = sessions.verify_liveness().await;
                        println!(
                            "session: {address}\nwallet:  {}",
                            if live { "reachable" } else { "unreachable" }
                        );
                        match self.ledger.account_info(&address).await {
                            Ok(account) => println!(
                                "balance: {}\nassets:  {}",
                                format_micro_units(account.amount),
                                account.holdings.len()
                            ),
                            Err(e) => {
                                tracing::warn!(error = %e, "balance lookup failed");
                                println!("balance: unavailable");
                            }
                        }
                    }
                }
            }
            Command::Disconnect => {
                self.sessions()?.disconnect().await;
                println!("disconnected");
            }
            Command::Auth { message } => {
                let sessions = self.sessions()?;
                if !sessions.verify_liveness().await {
                    bail!("wallet session is not live; run `chainbadge connect`");
                }
                let challenge = message.map(Challenge::new).unwrap_or_default();
                let auth = AuthChallengeProtocol::new(sessions);
                let signed = auth.request_signature(&challenge).await?;
                if !AuthChallengeProtocol::verify(&signed) {
                    bail!("wallet signature does not verify for {}", signed.signer);
                }
                println!(
                    "signer:    {}\nmessage:   {}\nsignature: {}",
                    signed.signer,
                    signed.message,
                    signed.signature_hex()
                );
            }
            Command::Issue {
                event,
                badge_type,
                recipient,
            } => {
                let engine = self.engine(self.sessions()?);
                let recipient = recipient.map(WalletAddress::new);
                let receipt = tokio::select! {
                    receipt = engine.issue_badge(&event, &badge_type, recipient) => receipt?,
                    _ = tokio::signal::ctrl_c() => bail!("interrupted; a submitted transaction may still confirm"),
                };
                print_badge(&receipt.badge);
                println!("tx: {}", receipt.tx_id);
                if let Some(base) = &self.config.claim_base_url {
                    println!("claim: {}", claim_url(base, &event, receipt.badge.asset_id));
                }
                match receipt.transfer {
                    Some(TransferOutcome::Completed { tx_id }) => println!("transferred: {tx_id}"),
                    Some(TransferOutcome::Failed(e)) => {
                        bail!("badge {} created but not transferred: {e}", receipt.badge.asset_id)
                    }
                    None => {}
                }
            }
            Command::Claim { asset_id } => {
                let engine = self.engine(self.sessions()?);
                let badge = engine.claim(asset_id).await?;
                print_badge(&badge);
            }
            Command::Badges { owner } => {
                let owner = match owner {
                    Some(owner) => WalletAddress::new(owner),
                    None => self.remembered_address()?,
                };
                let mut cursor = self.claims().list_owned_badges(&owner);
                let badges = cursor.drain().await;
                if let Some(e) = cursor.ledger_error() {
                    eprintln!("ledger unavailable ({e}); showing simulated badges only");
                }
                if let Some(e) = cursor.store_error() {
                    eprintln!("simulated badges unavailable ({e})");
                }
                if badges.is_empty() {
                    println!("no badges for {}", short_address(owner.as_str()));
                }
                for badge in &badges {
                    print_badge(badge);
                }
            }
            Command::SimulateClaim { event, badge_type } => {
                let owner = self.remembered_address()?;
                let badge = self.claims().simulate_claim(&owner, &event, &badge_type)?;
                print_badge(&badge);
            }
            Command::Keygen { force } => keygen(&self.config, force)?,
            Command::Verify {
                message,
                signature,
                signer,
            } => verify(&message, &signature, &signer)?,
        }
        Ok(())
    }
}
