/*
[INPUT]:  Effects emitted by the reducer, ledger client, wallet, sync policy
[OUTPUT]: Actions describing each effect's result
[POS]:    Effect layer - the only place the view-model touches the ledger
[UPDATE]: When adding effect kinds or changing how results are reported
*/

use std::sync::Arc;

use arc_task_adapter::{Address, ContractCall, LedgerClient, TokenAmount, TxHash, Wallet};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::app::event::Action;
use crate::app::state::{Failure, Screen};
use crate::sync::{SyncPolicy, wait_for_confirmation};

/// Side effects requested by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Connect,
    LoadTodo { account: Address },
    LoadMarket { account: Option<Address> },
    Submit {
        screen: Screen,
        from: Address,
        call: ContractCall,
    },
    /// Allowance grant to the marketplace for a bounty
    ApproveBounty { from: Address, amount: TokenAmount },
    AwaitConfirmation { screen: Screen, hash: TxHash },
}

/// Runs effects against the ledger and wallet
#[derive(Clone)]
pub struct Executor {
    client: LedgerClient,
    wallet: Arc<dyn Wallet>,
    policy: SyncPolicy,
    shutdown: CancellationToken,
}

impl Executor {
    pub fn new(
        client: LedgerClient,
        wallet: Arc<dyn Wallet>,
        policy: SyncPolicy,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            client,
            wallet,
            policy,
            shutdown,
        }
    }

    pub fn client(&self) -> &LedgerClient {
        &self.client
    }

    pub fn wallet_name(&self) -> &str {
        self.wallet.name()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Execute `effect` and describe its result as an action
    pub async fn perform(&self, effect: Effect) -> Action {
        debug!(?effect, "performing effect");
        match effect {
            Effect::Connect => match self.wallet.connect().await {
                Ok(account) => Action::Connected(account),
                Err(err) => {
                    warn!(wallet = self.wallet.name(), error = %err, "wallet connection failed");
                    Action::ConnectFailed(Failure::from(err))
                }
            },
            Effect::LoadTodo { account } => {
                let loaded = tokio::try_join!(
                    self.client.todo_tasks(account),
                    self.client.todo_stats(account)
                );
                match loaded {
                    Ok((tasks, stats)) => Action::TodoLoaded { tasks, stats },
                    Err(err) => load_failed(Screen::Todo, err),
                }
            }
            Effect::LoadMarket { account } => {
                let tasks = match self.client.market_tasks().await {
                    Ok(tasks) => tasks,
                    Err(err) => return load_failed(Screen::Market, err),
                };
                let balance = match account {
                    Some(account) => match self.client.token_balance(account).await {
                        Ok(balance) => Some(balance),
                        Err(err) => return load_failed(Screen::Market, err),
                    },
                    None => None,
                };
                Action::MarketLoaded { tasks, balance }
            }
            Effect::Submit { screen, from, call } => self.submit(screen, from, call).await,
            Effect::ApproveBounty { from, amount } => {
                let call = ContractCall::ApproveSpend {
                    spender: self.client.contracts().marketplace,
                    amount,
                };
                self.submit(Screen::Market, from, call).await
            }
            Effect::AwaitConfirmation { screen, hash } => {
                let confirmation =
                    wait_for_confirmation(&self.client, hash, self.policy, &self.shutdown).await;
                Action::TxSettled {
                    screen,
                    hash,
                    confirmation,
                }
            }
        }
    }

    async fn submit(&self, screen: Screen, from: Address, call: ContractCall) -> Action {
        match self.client.submit(from, &call).await {
            Ok(hash) => Action::TxSubmitted { screen, hash },
            Err(err) => {
                warn!(function = call.function_name(), error = %err, "submission refused");
                Action::TxRejected {
                    screen,
                    failure: Failure::from(err),
                }
            }
        }
    }

    /// Run `effect` on the runtime and report its result on `actions`
    pub fn spawn(&self, effect: Effect, actions: mpsc::UnboundedSender<Action>) -> JoinHandle<()> {
        let executor = self.clone();
        tokio::spawn(async move {
            let action = executor.perform(effect).await;
            if actions.send(action).is_err() {
                debug!("action channel closed; dropping effect result");
            }
        })
    }
}

fn load_failed(screen: Screen, err: arc_task_adapter::LedgerError) -> Action {
    warn!(screen = screen.title(), error = %err, "ledger read failed");
    Action::LoadFailed {
        screen,
        failure: Failure::from(err),
    }
}
