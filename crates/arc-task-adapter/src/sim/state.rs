/*
[INPUT]:  Decoded contract calls with their sender
[OUTPUT]: Mutated in-memory contract storage or a revert reason
[POS]:    Simulation layer - behavior of the todo, marketplace and token contracts
[UPDATE]: When the deployed contracts change semantics
*/

use std::collections::{BTreeMap, HashMap};

use alloy_primitives::Address;

use crate::contract::{Contract, ContractCall, Contracts, Query, QueryOutput};
use crate::lifecycle::{MarketAction, Settlement, TaskLifecycle, TodoAction, check_todo};
use crate::types::{MarketTask, TaskId, TaskStats, TaskStatus, TodoTask, TokenAmount};

/// Seconds added to the simulated clock per mined block
const BLOCK_TIME_SECS: u64 = 2;

#[derive(Debug, Clone)]
struct OwnedTodo {
    owner: Address,
    task: TodoTask,
}

/// Storage of the three simulated contracts
#[derive(Debug, Clone)]
pub(crate) struct ContractState {
    contracts: Contracts,
    pub(crate) block: u64,
    pub(crate) timestamp: u64,
    todo_next_id: TaskId,
    todos: BTreeMap<TaskId, OwnedTodo>,
    market_next_id: TaskId,
    market: BTreeMap<TaskId, MarketTask>,
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
}

impl ContractState {
    pub(crate) fn new(contracts: Contracts, genesis_timestamp: u64) -> Self {
        Self {
            contracts,
            block: 0,
            timestamp: genesis_timestamp,
            todo_next_id: 1,
            todos: BTreeMap::new(),
            market_next_id: 1,
            market: BTreeMap::new(),
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    pub(crate) fn advance_block(&mut self) -> u64 {
        self.block += 1;
        self.timestamp += BLOCK_TIME_SECS;
        self.block
    }

    pub(crate) fn mint(&mut self, account: Address, amount: TokenAmount) {
        *self.balances.entry(account).or_default() += amount.units();
    }

    pub(crate) fn balance_of(&self, account: Address) -> TokenAmount {
        TokenAmount::from_units(self.balances.get(&account).copied().unwrap_or_default())
    }

    fn allowance(&self, owner: Address, spender: Address) -> TokenAmount {
        TokenAmount::from_units(
            self.allowances
                .get(&(owner, spender))
                .copied()
                .unwrap_or_default(),
        )
    }

    fn contract_at(&self, address: Address) -> Option<Contract> {
        [Contract::TodoList, Contract::Marketplace, Contract::Token]
            .into_iter()
            .find(|contract| self.contracts.address(*contract) == address)
    }

    /// Evaluate a view function
    pub(crate) fn read(
        &self,
        caller: Option<Address>,
        to: Address,
        query: &Query,
    ) -> Result<QueryOutput, String> {
        self.expect_contract(to, query.contract())?;
        let caller = caller.unwrap_or(Address::ZERO);
        let output = match query {
            Query::TodoTasks => QueryOutput::TodoTasks(self.todos_of(caller)),
            Query::TodoStats => QueryOutput::TodoStats(TaskStats::from_tasks(&self.todos_of(caller))),
            Query::MarketTasks => QueryOutput::MarketTasks(self.market.values().cloned().collect()),
            Query::TokenBalance { account } => QueryOutput::Amount(self.balance_of(*account)),
            Query::TokenAllowance { owner, spender } => {
                QueryOutput::Amount(self.allowance(*owner, *spender))
            }
        };
        Ok(output)
    }

    /// Execute a transaction; on error nothing is changed
    pub(crate) fn execute(
        &mut self,
        from: Address,
        to: Address,
        call: &ContractCall,
    ) -> Result<(), String> {
        self.expect_contract(to, call.contract())?;
        match call {
            ContractCall::CreateTodo {
                title,
                description,
                priority,
            } => {
                if title.trim().is_empty() {
                    return Err("title required".to_string());
                }
                let id = self.todo_next_id;
                self.todo_next_id += 1;
                self.todos.insert(
                    id,
                    OwnedTodo {
                        owner: from,
                        task: TodoTask {
                            id,
                            title: title.clone(),
                            description: description.clone(),
                            completed: false,
                            created_at: self.timestamp,
                            priority: *priority,
                        },
                    },
                );
                Ok(())
            }
            ContractCall::CompleteTodo { id } => {
                let entry = self
                    .todos
                    .get_mut(id)
                    .ok_or_else(|| format!("task {id} does not exist"))?;
                check_todo(entry.task.completed, entry.owner == from, TodoAction::Complete)
                    .map_err(|e| e.to_string())?;
                entry.task.completed = true;
                Ok(())
            }
            ContractCall::DeleteTodo { id } => {
                let entry = self
                    .todos
                    .get(id)
                    .ok_or_else(|| format!("task {id} does not exist"))?;
                check_todo(entry.task.completed, entry.owner == from, TodoAction::Delete)
                    .map_err(|e| e.to_string())?;
                self.todos.remove(id);
                Ok(())
            }
            ContractCall::PostTask {
                title,
                description,
                bounty,
            } => self.post_task(from, title, description, *bounty),
            ContractCall::TakeTask { id } => self.market_transition(from, *id, MarketAction::Take),
            ContractCall::CompleteTask { id } => {
                self.market_transition(from, *id, MarketAction::Complete)
            }
            ContractCall::ApproveTask { id } => {
                self.market_transition(from, *id, MarketAction::Approve)
            }
            ContractCall::CancelTask { id } => {
                self.market_transition(from, *id, MarketAction::Cancel)
            }
            ContractCall::ApproveSpend { spender, amount } => {
                self.allowances.insert((from, *spender), amount.units());
                Ok(())
            }
        }
    }

    fn expect_contract(&self, to: Address, expected: Contract) -> Result<(), String> {
        match self.contract_at(to) {
            Some(contract) if contract == expected => Ok(()),
            Some(contract) => Err(format!(
                "function not found on {contract} contract at {to}"
            )),
            None => Err(format!("no contract deployed at {to}")),
        }
    }

    fn todos_of(&self, owner: Address) -> Vec<TodoTask> {
        self.todos
            .values()
            .filter(|entry| entry.owner == owner)
            .map(|entry| entry.task.clone())
            .collect()
    }

    fn post_task(
        &mut self,
        poster: Address,
        title: &str,
        description: &str,
        bounty: TokenAmount,
    ) -> Result<(), String> {
        if title.trim().is_empty() {
            return Err("title required".to_string());
        }
        if bounty.is_zero() {
            return Err("bounty must be greater than zero".to_string());
        }
        let marketplace = self.contracts.marketplace;
        let allowance = self.allowance(poster, marketplace);
        if allowance < bounty {
            return Err(format!(
                "ERC20: insufficient allowance ({} < {})",
                allowance, bounty
            ));
        }
        self.transfer(poster, marketplace, bounty)?;
        self.allowances
            .insert((poster, marketplace), allowance.units() - bounty.units());

        let id = self.market_next_id;
        self.market_next_id += 1;
        self.market.insert(
            id,
            MarketTask {
                id,
                poster,
                worker: None,
                title: title.to_string(),
                description: description.to_string(),
                bounty,
                status: TaskStatus::Open,
                created_at: self.timestamp,
            },
        );
        Ok(())
    }

    fn market_transition(
        &mut self,
        actor: Address,
        id: TaskId,
        action: MarketAction,
    ) -> Result<(), String> {
        let task = self
            .market
            .get(&id)
            .ok_or_else(|| format!("task {id} does not exist"))?;
        let mut lifecycle = TaskLifecycle::of(task);
        let transition = lifecycle.apply(actor, action).map_err(|e| e.to_string())?;

        let marketplace = self.contracts.marketplace;
        let (poster, bounty) = (task.poster, task.bounty);
        match transition.settlement {
            Settlement::None => {}
            Settlement::ReleaseToWorker => {
                let worker = transition
                    .worker
                    .ok_or_else(|| "approved task has no worker".to_string())?;
                self.transfer(marketplace, worker, bounty)?;
            }
            Settlement::RefundPoster => self.transfer(marketplace, poster, bounty)?,
        }

        if let Some(task) = self.market.get_mut(&id) {
            task.status = lifecycle.status();
            task.worker = lifecycle.worker();
        }
        Ok(())
    }

    fn transfer(&mut self, from: Address, to: Address, amount: TokenAmount) -> Result<(), String> {
        let balance = self.balance_of(from);
        let remaining = balance.checked_sub(amount).ok_or_else(|| {
            format!("ERC20: transfer amount exceeds balance ({} < {})", balance, amount)
        })?;
        self.balances.insert(from, remaining.units());
        *self.balances.entry(to).or_default() += amount.units();
        Ok(())
    }
}
