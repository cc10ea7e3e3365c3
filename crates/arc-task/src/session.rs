/*
[INPUT]:  AppConfig, simulation flag, shutdown token
[OUTPUT]: Ledger client + wallet pair and the App built on them
[POS]:    Composition root - picks the ledger backend and wallet connector
[UPDATE]: When adding backends, wallet kinds or demo seed data
*/

use std::sync::Arc;

use anyhow::{Context, Result};
use arc_task_adapter::contract::ContractCall;
use arc_task_adapter::sim::default_contracts;
use arc_task_adapter::{
    Address, ClientConfig, LedgerClient, LocalKeyWallet, MiningMode, Priority, RpcClient,
    RpcWallet, SimulatedLedger, StaticWallet, TokenAmount, Wallet, address,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::app::App;
use crate::app::effect::Executor;
use crate::app::state::{AppState, Screen};
use crate::config::{AppConfig, WalletKind};

/// First account of a default anvil/hardhat node
pub const DEV_ACCOUNT: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
/// Second default dev account; posts the sample marketplace tasks
pub const SAMPLE_POSTER: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
/// Third default dev account; takes tasks in the demo
pub const SAMPLE_WORKER: Address = address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

/// Ledger backend plus the wallet used to act on it
pub struct Session {
    client: LedgerClient,
    wallet: Arc<dyn Wallet>,
    rpc: Option<Arc<RpcClient>>,
    simulation: Option<Arc<SimulatedLedger>>,
}

impl Session {
    /// JSON-RPC backend with the wallet selected by `config.wallet`
    pub fn connect(config: &AppConfig) -> Result<Self> {
        let rpc = Arc::new(
            RpcClient::with_config(ClientConfig::default(), &config.network.rpc_url)
                .with_context(|| format!("create rpc client for {}", config.network.rpc_url))?,
        );
        let wallet: Arc<dyn Wallet> = match config.wallet.kind {
            WalletKind::Rpc => Arc::new(RpcWallet::new(rpc.clone())),
            WalletKind::Address => {
                let address = config
                    .wallet
                    .address
                    .context("wallet.address is required for the address wallet")?;
                Arc::new(StaticWallet::new(address))
            }
            WalletKind::PrivateKey => {
                let key = std::env::var(&config.wallet.private_key_env).with_context(|| {
                    format!("read private key from ${}", config.wallet.private_key_env)
                })?;
                Arc::new(LocalKeyWallet::new(&key).context("load development key")?)
            }
        };
        if config.contracts.todo_list.is_none() {
            warn!("contracts.todo_list is not configured; todo reads will target the zero address");
        }
        info!(
            rpc_url = %config.network.rpc_url,
            wallet = wallet.name(),
            "using json-rpc ledger"
        );

        Ok(Self {
            client: LedgerClient::new(rpc.clone(), config.contracts()),
            wallet,
            rpc: Some(rpc),
            simulation: None,
        })
    }

    /// In-process ledger seeded with sample data, acting as [`DEV_ACCOUNT`]
    pub async fn simulated(mining: MiningMode) -> Result<Self> {
        let sim = Arc::new(SimulatedLedger::new(default_contracts()));
        let client = LedgerClient::new(sim.clone(), *sim.contracts());
        seed(&sim, &client)
            .await
            .context("seed simulated ledger")?;
        sim.set_mining(mining).await;
        info!(account = %DEV_ACCOUNT, ?mining, "using simulated ledger");

        Ok(Self {
            client,
            wallet: Arc::new(StaticWallet::new(DEV_ACCOUNT)),
            rpc: None,
            simulation: Some(sim),
        })
    }

    pub fn client(&self) -> &LedgerClient {
        &self.client
    }

    pub fn wallet(&self) -> Arc<dyn Wallet> {
        self.wallet.clone()
    }

    pub fn simulation(&self) -> Option<&Arc<SimulatedLedger>> {
        self.simulation.as_ref()
    }

    /// Warn when the endpoint serves a different chain than configured
    pub async fn verify_chain(&self, expected: u64) {
        let Some(rpc) = &self.rpc else {
            return;
        };
        match rpc.chain_id().await {
            Ok(chain_id) if chain_id == expected => {
                info!(chain_id, "connected to expected chain");
            }
            Ok(chain_id) => {
                warn!(chain_id, expected, "rpc endpoint serves a different chain");
            }
            Err(err) => warn!(error = %err, "could not read chain id"),
        }
    }

    /// View-model driver acting through this session's wallet
    pub fn app(&self, config: &AppConfig, screen: Screen, shutdown: CancellationToken) -> App {
        self.app_for(self.wallet.clone(), config, screen, shutdown)
    }

    /// View-model driver sharing this ledger but acting through `wallet`
    pub fn app_for(
        &self,
        wallet: Arc<dyn Wallet>,
        config: &AppConfig,
        screen: Screen,
        shutdown: CancellationToken,
    ) -> App {
        let state = AppState::new(screen).with_token(&config.token.symbol, config.token.decimals);
        let executor = Executor::new(self.client.clone(), wallet, config.sync_policy(), shutdown);
        App::new(state, executor)
    }
}

fn usdc(whole: u128) -> TokenAmount {
    TokenAmount::from_units(whole * 10u128.pow(arc_task_adapter::TOKEN_DECIMALS))
}

async fn seed(sim: &SimulatedLedger, client: &LedgerClient) -> arc_task_adapter::Result<()> {
    sim.mint(DEV_ACCOUNT, usdc(1_000)).await;
    sim.mint(SAMPLE_POSTER, usdc(500)).await;
    sim.mint(SAMPLE_WORKER, usdc(10)).await;

    let todos = [
        ("Review escrow flow", "Walk through approve and post", Priority::High),
        ("Update README", "", Priority::Low),
    ];
    for (title, description, priority) in todos {
        let call = ContractCall::CreateTodo {
            title: title.to_string(),
            description: description.to_string(),
            priority,
        };
        client.submit(DEV_ACCOUNT, &call).await?;
    }

    let posts = [
        ("Translate landing page", "English to Spanish", usdc(25)),
        ("Fix flaky integration test", "tests/market.rs times out on CI", usdc(40)),
    ];
    for (title, description, bounty) in posts {
        let approve = ContractCall::ApproveSpend {
            spender: client.contracts().marketplace,
            amount: bounty,
        };
        client.submit(SAMPLE_POSTER, &approve).await?;
        let post = ContractCall::PostTask {
            title: title.to_string(),
            description: description.to_string(),
            bounty,
        };
        client.submit(SAMPLE_POSTER, &post).await?;
    }
    Ok(())
}
