/*
[INPUT]:  Contract address book, mining policy, injected wallet/network faults
[OUTPUT]: In-process Ledger implementation with transaction receipts
[POS]:    Simulation layer - offline ledger for tests and the demo mode
[UPDATE]: When changing mining behavior or fault injection
*/

use std::collections::{HashMap, VecDeque};

use alloy_primitives::{Address, TxHash, address, keccak256};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::contract::{
    ARC_TESTNET_MARKETPLACE, ARC_TESTNET_USDC, ContractCall, Contracts, Query, QueryOutput,
};
use crate::http::{LedgerError, Result};
use crate::ledger::{Ledger, TxStatus};
use crate::sim::state::ContractState;
use crate::types::TokenAmount;

/// Timestamp of the simulated genesis block
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// When submitted transactions get included in a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningMode {
    /// Mined during submission
    Instant,
    /// Mined once its status has been polled this many times
    AfterPolls(u32),
    /// Mined only by [`SimulatedLedger::mine`]
    Manual,
}

#[derive(Debug, Clone)]
struct PendingTx {
    hash: TxHash,
    from: Address,
    to: Address,
    call: ContractCall,
    polls: u32,
}

#[derive(Debug)]
struct SimState {
    chain: ContractState,
    mining: MiningMode,
    nonce: u64,
    pending: VecDeque<PendingTx>,
    receipts: HashMap<TxHash, TxStatus>,
    submitted: Vec<(Address, ContractCall)>,
    reject_next: bool,
    offline: bool,
}

impl SimState {
    fn next_hash(&mut self) -> TxHash {
        self.nonce += 1;
        keccak256(self.nonce.to_be_bytes())
    }

    /// Include every pending transaction up to and including `until`
    fn mine_until(&mut self, until: Option<TxHash>) -> usize {
        let count = match until {
            Some(hash) => match self.pending.iter().position(|tx| tx.hash == hash) {
                Some(index) => index + 1,
                None => return 0,
            },
            None => self.pending.len(),
        };
        if count == 0 {
            return 0;
        }

        let block = self.chain.advance_block();
        let mined: Vec<PendingTx> = self.pending.drain(..count).collect();
        for tx in mined {
            let status = match self.chain.execute(tx.from, tx.to, &tx.call) {
                Ok(()) => TxStatus::Confirmed { block },
                Err(reason) => {
                    warn!(tx_hash = %tx.hash, function = tx.call.function_name(), %reason, "simulated transaction reverted");
                    TxStatus::Failed { reason }
                }
            };
            self.receipts.insert(tx.hash, status);
        }
        count
    }
}

/// In-process model of the todo list, marketplace and token contracts
///
/// Transactions are executed when mined, so a call that violates a guard
/// is accepted for submission and later reports [`TxStatus::Failed`], the
/// same way a node reports a reverted receipt.
#[derive(Debug)]
pub struct SimulatedLedger {
    contracts: Contracts,
    state: Mutex<SimState>,
}

/// Address book used by the simulated deployment
pub fn default_contracts() -> Contracts {
    Contracts {
        todo_list: address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
        marketplace: ARC_TESTNET_MARKETPLACE,
        token: ARC_TESTNET_USDC,
    }
}

impl SimulatedLedger {
    pub fn new(contracts: Contracts) -> Self {
        Self::with_mining(contracts, MiningMode::Instant)
    }

    pub fn with_mining(contracts: Contracts, mining: MiningMode) -> Self {
        Self {
            contracts,
            state: Mutex::new(SimState {
                chain: ContractState::new(contracts, GENESIS_TIMESTAMP),
                mining,
                nonce: 0,
                pending: VecDeque::new(),
                receipts: HashMap::new(),
                submitted: Vec::new(),
                reject_next: false,
                offline: false,
            }),
        }
    }

    pub fn contracts(&self) -> &Contracts {
        &self.contracts
    }

    /// Credit `amount` of the token to `account`
    pub async fn mint(&self, account: Address, amount: TokenAmount) {
        self.state.lock().await.chain.mint(account, amount);
        debug!(%account, %amount, "simulated mint");
    }

    pub async fn balance_of(&self, account: Address) -> TokenAmount {
        self.state.lock().await.chain.balance_of(account)
    }

    /// The next submission is refused as if the user declined the signing prompt
    pub async fn reject_next_signature(&self) {
        self.state.lock().await.reject_next = true;
    }

    /// Fail every request with a transport error while set
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    pub async fn set_mining(&self, mining: MiningMode) {
        self.state.lock().await.mining = mining;
    }

    /// Mine all pending transactions into one block; returns how many were included
    pub async fn mine(&self) -> usize {
        self.state.lock().await.mine_until(None)
    }

    pub async fn pending_count(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    /// Every call accepted for submission, in order
    pub async fn submitted_calls(&self) -> Vec<(Address, ContractCall)> {
        self.state.lock().await.submitted.clone()
    }
}

fn offline_error() -> LedgerError {
    LedgerError::InvalidResponse("simulated ledger is offline".to_string())
}

#[async_trait]
impl Ledger for SimulatedLedger {
    async fn read(
        &self,
        caller: Option<Address>,
        contract: Address,
        query: &Query,
    ) -> Result<QueryOutput> {
        let state = self.state.lock().await;
        if state.offline {
            return Err(offline_error());
        }
        state
            .chain
            .read(caller, contract, query)
            .map_err(|reason| LedgerError::Reverted { reason })
    }

    async fn submit(&self, from: Address, contract: Address, call: &ContractCall) -> Result<TxHash> {
        let mut state = self.state.lock().await;
        if state.offline {
            return Err(offline_error());
        }
        if std::mem::take(&mut state.reject_next) {
            info!(function = call.function_name(), "simulated wallet rejected signature");
            return Err(LedgerError::WalletRejected {
                message: "User rejected the request.".to_string(),
            });
        }

        let hash = state.next_hash();
        state.submitted.push((from, call.clone()));
        state.pending.push_back(PendingTx {
            hash,
            from,
            to: contract,
            call: call.clone(),
            polls: 0,
        });
        info!(
            function = call.function_name(),
            tx_hash = %hash,
            "transaction submitted"
        );

        if state.mining == MiningMode::Instant {
            state.mine_until(Some(hash));
        }
        Ok(hash)
    }

    async fn transaction_status(&self, hash: TxHash) -> Result<TxStatus> {
        let mut state = self.state.lock().await;
        if state.offline {
            return Err(offline_error());
        }
        if let Some(status) = state.receipts.get(&hash) {
            return Ok(status.clone());
        }

        let threshold = match state.mining {
            MiningMode::AfterPolls(n) => Some(n),
            MiningMode::Instant | MiningMode::Manual => None,
        };
        let Some(tx) = state.pending.iter_mut().find(|tx| tx.hash == hash) else {
            return Err(LedgerError::InvalidResponse(format!(
                "unknown transaction {hash}"
            )));
        };
        tx.polls += 1;
        if threshold.is_some_and(|n| tx.polls >= n) {
            state.mine_until(Some(hash));
        }
        Ok(state
            .receipts
            .get(&hash)
            .cloned()
            .unwrap_or(TxStatus::Pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::repeat_byte(0xa1)
    }

    #[tokio::test]
    async fn test_instant_mining_confirms_on_submit() {
        let sim = SimulatedLedger::new(default_contracts());
        let call = ContractCall::CreateTodo {
            title: "write docs".to_string(),
            description: String::new(),
            priority: Default::default(),
        };
        let hash = sim
            .submit(alice(), sim.contracts().todo_list, &call)
            .await
            .unwrap();
        assert_eq!(
            sim.transaction_status(hash).await.unwrap(),
            TxStatus::Confirmed { block: 1 }
        );
        assert_eq!(sim.pending_count().await, 0);
    }

    #[tokio::test]
    async fn test_after_polls_mining() {
        let sim = SimulatedLedger::with_mining(default_contracts(), MiningMode::AfterPolls(2));
        let call = ContractCall::TakeTask { id: 1 };
        let hash = sim
            .submit(alice(), sim.contracts().marketplace, &call)
            .await
            .unwrap();
        assert_eq!(sim.transaction_status(hash).await.unwrap(), TxStatus::Pending);
        // task 1 does not exist, so the mined transaction reverts
        assert!(matches!(
            sim.transaction_status(hash).await.unwrap(),
            TxStatus::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_rejected_signature_is_not_submitted() {
        let sim = SimulatedLedger::new(default_contracts());
        sim.reject_next_signature().await;
        let call = ContractCall::TakeTask { id: 1 };
        let err = sim
            .submit(alice(), sim.contracts().marketplace, &call)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::WalletRejected { .. }));
        assert!(sim.submitted_calls().await.is_empty());

        // only the next signature is refused
        assert!(sim.submit(alice(), sim.contracts().marketplace, &call).await.is_ok());
    }

    #[tokio::test]
    async fn test_offline_read_is_network_error() {
        let sim = SimulatedLedger::new(default_contracts());
        sim.set_offline(true).await;
        let err = sim
            .read(None, sim.contracts().marketplace, &Query::MarketTasks)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::http::ErrorKind::Network);
    }
}
