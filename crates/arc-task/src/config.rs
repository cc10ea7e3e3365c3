/*
[INPUT]:  Optional YAML configuration file and ARC_TASK__* environment overrides
[OUTPUT]: Parsed application configuration with Arc Testnet defaults
[POS]:    Configuration layer - network, contracts, wallet and sync policy
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use arc_task_adapter::contract::{ARC_TESTNET_MARKETPLACE, ARC_TESTNET_USDC};
use arc_task_adapter::{Address, Contracts};
use serde::{Deserialize, Serialize};

use crate::sync::SyncPolicy;

/// Prefix for environment overrides, e.g. `ARC_TASK__NETWORK__RPC_URL`
pub const ENV_PREFIX: &str = "ARC_TASK";

/// Upper bound for `sync.confirmation_timeout_secs` (one day)
pub const MAX_CONFIRMATION_TIMEOUT_SECS: u64 = 86_400;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub contracts: ContractsConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub token: TokenConfig,
}

/// Ledger endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Block explorer used for transaction links
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,
}

/// Deployed contract addresses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContractsConfig {
    /// Todo list contract; todo commands are unavailable while unset
    #[serde(default)]
    pub todo_list: Option<Address>,
    #[serde(default = "default_marketplace")]
    pub marketplace: Address,
    #[serde(default = "default_token")]
    pub token: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletKind {
    /// Accounts exposed by the RPC endpoint (`eth_requestAccounts`)
    Rpc,
    /// Fixed address from `wallet.address`
    Address,
    /// Address derived from the private key in `wallet.private_key_env`
    PrivateKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WalletConfig {
    #[serde(default = "default_wallet_kind")]
    pub kind: WalletKind,
    #[serde(default)]
    pub address: Option<Address>,
    /// Environment variable holding a development private key
    #[serde(default = "default_private_key_env")]
    pub private_key_env: String,
}

/// Confirmation polling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SyncConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenConfig {
    #[serde(default = "default_token_symbol")]
    pub symbol: String,
    #[serde(default = "default_token_decimals")]
    pub decimals: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            chain_id: default_chain_id(),
            explorer_url: default_explorer_url(),
        }
    }
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            todo_list: None,
            marketplace: default_marketplace(),
            token: default_token(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            kind: default_wallet_kind(),
            address: None,
            private_key_env: default_private_key_env(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            symbol: default_token_symbol(),
            decimals: default_token_decimals(),
        }
    }
}

fn default_rpc_url() -> String {
    arc_task_adapter::http::DEFAULT_RPC_URL.to_string()
}

fn default_chain_id() -> u64 {
    1116
}

fn default_explorer_url() -> String {
    "https://testnet.arcscan.app".to_string()
}

fn default_marketplace() -> Address {
    ARC_TESTNET_MARKETPLACE
}

fn default_token() -> Address {
    ARC_TESTNET_USDC
}

fn default_wallet_kind() -> WalletKind {
    WalletKind::Rpc
}

fn default_private_key_env() -> String {
    "ARC_TASK_PRIVATE_KEY".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_confirmation_timeout_secs() -> u64 {
    60
}

fn default_token_symbol() -> String {
    "USDC".to_string()
}

fn default_token_decimals() -> u32 {
    arc_task_adapter::TOKEN_DECIMALS
}

impl AppConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Layered load: defaults, then the file (if present), then `ARC_TASK__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        let mut builder = config::Config::builder();
        if let Some(path) = path.as_ref() {
            builder = builder.add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Yaml)
                    .required(false),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("assemble configuration sources")?
            .try_deserialize()
            .context("deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sync.poll_interval_ms == 0 {
            bail!("sync.poll_interval_ms must be greater than zero");
        }
        if self.sync.confirmation_timeout_secs == 0 {
            bail!("sync.confirmation_timeout_secs must be greater than zero");
        }
        if self.sync.confirmation_timeout_secs > MAX_CONFIRMATION_TIMEOUT_SECS {
            bail!(
                "sync.confirmation_timeout_secs must not exceed {MAX_CONFIRMATION_TIMEOUT_SECS}"
            );
        }
        if self.wallet.kind == WalletKind::Address && self.wallet.address.is_none() {
            bail!("wallet.kind is `address` but wallet.address is not set");
        }
        if self.token.decimals > 18 {
            bail!("token.decimals must not exceed 18");
        }
        Ok(())
    }

    /// Address book for the ledger; the todo list falls back to the zero address
    pub fn contracts(&self) -> Contracts {
        Contracts {
            todo_list: self.contracts.todo_list.unwrap_or(Address::ZERO),
            marketplace: self.contracts.marketplace,
            token: self.contracts.token,
        }
    }

    pub fn sync_policy(&self) -> SyncPolicy {
        SyncPolicy {
            poll_interval: Duration::from_millis(self.sync.poll_interval_ms),
            timeout: Duration::from_secs(self.sync.confirmation_timeout_secs),
        }
    }

    /// Explorer link for a transaction hash
    pub fn explorer_tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.network.explorer_url.trim_end_matches('/'), hash)
    }
}

/// `<config dir>/arc-task/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("arc-task").join("config.yaml"))
}
