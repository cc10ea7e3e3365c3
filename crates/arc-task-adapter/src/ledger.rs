/*
[INPUT]:  Contract address book and a ledger backend (JSON-RPC node or simulation)
[OUTPUT]: Read / write / confirmation capabilities with typed results
[POS]:    Ledger boundary - the single seam between the client and the contracts
[UPDATE]: When adding ledger capabilities or typed convenience calls
*/

use std::sync::Arc;

use alloy_primitives::{Address, TxHash};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::contract::{ContractCall, Contracts, Query, QueryOutput};
use crate::http::Result;
use crate::types::{MarketTask, TaskStats, TodoTask, TokenAmount};

/// Confirmation state of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TxStatus {
    /// Not yet included in a block
    Pending,
    /// Included and executed successfully
    Confirmed { block: u64 },
    /// Included but reverted
    Failed { reason: String },
}

/// Trait for ledger backends
///
/// Implemented by the JSON-RPC client and by the in-process simulation.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Evaluate a read-only query against `contract`, as `caller` when given
    async fn read(&self, caller: Option<Address>, contract: Address, query: &Query)
    -> Result<QueryOutput>;

    /// Submit a state-changing call; fails before submission when the wallet refuses
    async fn submit(&self, from: Address, contract: Address, call: &ContractCall) -> Result<TxHash>;

    /// Current confirmation state of a submitted transaction
    async fn transaction_status(&self, hash: TxHash) -> Result<TxStatus>;
}

/// Typed access to the three contracts through any [`Ledger`]
#[derive(Clone)]
pub struct LedgerClient {
    ledger: Arc<dyn Ledger>,
    contracts: Contracts,
}

impl LedgerClient {
    pub fn new(ledger: Arc<dyn Ledger>, contracts: Contracts) -> Self {
        Self { ledger, contracts }
    }

    pub fn contracts(&self) -> &Contracts {
        &self.contracts
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    async fn query(&self, caller: Option<Address>, query: Query) -> Result<QueryOutput> {
        let contract = self.contracts.address(query.contract());
        debug!(
            contract = %query.contract(),
            function = query.function_name(),
            "ledger read"
        );
        self.ledger.read(caller, contract, &query).await
    }

    /// `getMyTasks()` as `account`
    pub async fn todo_tasks(&self, account: Address) -> Result<Vec<TodoTask>> {
        self.query(Some(account), Query::TodoTasks)
            .await?
            .into_todo_tasks()
    }

    /// `getStats()` as `account`
    pub async fn todo_stats(&self, account: Address) -> Result<TaskStats> {
        self.query(Some(account), Query::TodoStats)
            .await?
            .into_todo_stats()
    }

    /// `getAllTasks()`
    pub async fn market_tasks(&self) -> Result<Vec<MarketTask>> {
        self.query(None, Query::MarketTasks)
            .await?
            .into_market_tasks()
    }

    /// Token `balanceOf(account)`
    pub async fn token_balance(&self, account: Address) -> Result<TokenAmount> {
        self.query(None, Query::TokenBalance { account })
            .await?
            .into_amount()
    }

    /// Token allowance granted by `owner` to the marketplace
    pub async fn marketplace_allowance(&self, owner: Address) -> Result<TokenAmount> {
        let spender = self.contracts.marketplace;
        self.query(None, Query::TokenAllowance { owner, spender })
            .await?
            .into_amount()
    }

    /// Submit `call` to the contract it belongs to
    pub async fn submit(&self, from: Address, call: &ContractCall) -> Result<TxHash> {
        let contract = self.contracts.address(call.contract());
        debug!(
            contract = %call.contract(),
            function = call.function_name(),
            from = %from,
            "ledger submit"
        );
        self.ledger.submit(from, contract, call).await
    }

    pub async fn transaction_status(&self, hash: TxHash) -> Result<TxStatus> {
        self.ledger.transaction_status(hash).await
    }
}
