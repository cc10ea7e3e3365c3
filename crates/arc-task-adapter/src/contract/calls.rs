/*
[INPUT]:  Typed read queries and state-changing calls
[OUTPUT]: ABI calldata, decoded query outputs, function names for logging
[POS]:    Contract layer - mapping between domain requests and ABI bindings
[UPDATE]: When adding contract functions or changing record decoding
*/

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};

use super::abi::{IERC20, IMarketplace, ITodoList};
use super::Contract;
use crate::http::{LedgerError, Result};
use crate::lifecycle::MarketAction;
use crate::types::{MarketTask, Priority, TaskId, TaskStats, TaskStatus, TodoTask, TokenAmount};

/// Read-only contract query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    /// `getMyTasks()` evaluated as the calling account
    TodoTasks,
    /// `getStats()` evaluated as the calling account
    TodoStats,
    /// `getAllTasks()`
    MarketTasks,
    /// `balanceOf(account)`
    TokenBalance { account: Address },
    /// `allowance(owner, spender)`
    TokenAllowance { owner: Address, spender: Address },
}

/// Decoded result of a [`Query`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryOutput {
    TodoTasks(Vec<TodoTask>),
    TodoStats(TaskStats),
    MarketTasks(Vec<MarketTask>),
    Amount(TokenAmount),
}

/// State-changing contract call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum ContractCall {
    CreateTodo {
        title: String,
        description: String,
        priority: Priority,
    },
    CompleteTodo { id: TaskId },
    DeleteTodo { id: TaskId },
    PostTask {
        title: String,
        description: String,
        bounty: TokenAmount,
    },
    TakeTask { id: TaskId },
    CompleteTask { id: TaskId },
    ApproveTask { id: TaskId },
    CancelTask { id: TaskId },
    /// ERC-20 `approve(spender, amount)`
    ApproveSpend { spender: Address, amount: TokenAmount },
}

impl Query {
    pub fn contract(&self) -> Contract {
        match self {
            Query::TodoTasks | Query::TodoStats => Contract::TodoList,
            Query::MarketTasks => Contract::Marketplace,
            Query::TokenBalance { .. } | Query::TokenAllowance { .. } => Contract::Token,
        }
    }

    pub fn function_name(&self) -> &'static str {
        match self {
            Query::TodoTasks => "getMyTasks",
            Query::TodoStats => "getStats",
            Query::MarketTasks => "getAllTasks",
            Query::TokenBalance { .. } => "balanceOf",
            Query::TokenAllowance { .. } => "allowance",
        }
    }

    /// ABI calldata (selector + arguments)
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Query::TodoTasks => ITodoList::getMyTasksCall {}.abi_encode(),
            Query::TodoStats => ITodoList::getStatsCall {}.abi_encode(),
            Query::MarketTasks => IMarketplace::getAllTasksCall {}.abi_encode(),
            Query::TokenBalance { account } => IERC20::balanceOfCall { account: *account }.abi_encode(),
            Query::TokenAllowance { owner, spender } => IERC20::allowanceCall {
                owner: *owner,
                spender: *spender,
            }
            .abi_encode(),
        }
    }

    /// Decode `eth_call` return data for this query
    pub fn decode(&self, data: &[u8]) -> Result<QueryOutput> {
        let output = match self {
            Query::TodoTasks => {
                let tasks = ITodoList::getMyTasksCall::abi_decode_returns(data).map_err(abi_error)?;
                QueryOutput::TodoTasks(
                    tasks
                        .into_iter()
                        .map(todo_from_abi)
                        .collect::<Result<Vec<_>>>()?,
                )
            }
            Query::TodoStats => {
                let stats = ITodoList::getStatsCall::abi_decode_returns(data).map_err(abi_error)?;
                QueryOutput::TodoStats(TaskStats {
                    total: to_u64(stats.total, "total")?,
                    completed: to_u64(stats.completed, "completed")?,
                    pending: to_u64(stats.pending, "pending")?,
                })
            }
            Query::MarketTasks => {
                let tasks =
                    IMarketplace::getAllTasksCall::abi_decode_returns(data).map_err(abi_error)?;
                QueryOutput::MarketTasks(
                    tasks
                        .into_iter()
                        .map(market_from_abi)
                        .collect::<Result<Vec<_>>>()?,
                )
            }
            Query::TokenBalance { .. } => {
                let balance = IERC20::balanceOfCall::abi_decode_returns(data).map_err(abi_error)?;
                QueryOutput::Amount(TokenAmount::try_from(balance)?)
            }
            Query::TokenAllowance { .. } => {
                let allowance = IERC20::allowanceCall::abi_decode_returns(data).map_err(abi_error)?;
                QueryOutput::Amount(TokenAmount::try_from(allowance)?)
            }
        };
        Ok(output)
    }
}

impl QueryOutput {
    pub fn into_todo_tasks(self) -> Result<Vec<TodoTask>> {
        match self {
            QueryOutput::TodoTasks(tasks) => Ok(tasks),
            other => Err(unexpected("todo tasks", &other)),
        }
    }

    pub fn into_todo_stats(self) -> Result<TaskStats> {
        match self {
            QueryOutput::TodoStats(stats) => Ok(stats),
            other => Err(unexpected("todo stats", &other)),
        }
    }

    pub fn into_market_tasks(self) -> Result<Vec<MarketTask>> {
        match self {
            QueryOutput::MarketTasks(tasks) => Ok(tasks),
            other => Err(unexpected("marketplace tasks", &other)),
        }
    }

    pub fn into_amount(self) -> Result<TokenAmount> {
        match self {
            QueryOutput::Amount(amount) => Ok(amount),
            other => Err(unexpected("token amount", &other)),
        }
    }
}

impl ContractCall {
    /// Marketplace call for a lifecycle action
    pub fn market(action: MarketAction, id: TaskId) -> Self {
        match action {
            MarketAction::Take => ContractCall::TakeTask { id },
            MarketAction::Cancel => ContractCall::CancelTask { id },
            MarketAction::Complete => ContractCall::CompleteTask { id },
            MarketAction::Approve => ContractCall::ApproveTask { id },
        }
    }

    pub fn contract(&self) -> Contract {
        match self {
            ContractCall::CreateTodo { .. }
            | ContractCall::CompleteTodo { .. }
            | ContractCall::DeleteTodo { .. } => Contract::TodoList,
            ContractCall::PostTask { .. }
            | ContractCall::TakeTask { .. }
            | ContractCall::CompleteTask { .. }
            | ContractCall::ApproveTask { .. }
            | ContractCall::CancelTask { .. } => Contract::Marketplace,
            ContractCall::ApproveSpend { .. } => Contract::Token,
        }
    }

    pub fn function_name(&self) -> &'static str {
        match self {
            ContractCall::CreateTodo { .. } => "createTask",
            ContractCall::CompleteTodo { .. } => "completeTask",
            ContractCall::DeleteTodo { .. } => "deleteTask",
            ContractCall::PostTask { .. } => "postTask",
            ContractCall::TakeTask { .. } => "takeTask",
            ContractCall::CompleteTask { .. } => "completeTask",
            ContractCall::ApproveTask { .. } => "approveTask",
            ContractCall::CancelTask { .. } => "cancelTask",
            ContractCall::ApproveSpend { .. } => "approve",
        }
    }

    /// ABI calldata (selector + arguments)
    pub fn encode(&self) -> Vec<u8> {
        match self {
            ContractCall::CreateTodo {
                title,
                description,
                priority,
            } => ITodoList::createTaskCall {
                _title: title.clone(),
                _description: description.clone(),
                _priority: priority.code(),
            }
            .abi_encode(),
            ContractCall::CompleteTodo { id } => ITodoList::completeTaskCall {
                _taskId: U256::from(*id),
            }
            .abi_encode(),
            ContractCall::DeleteTodo { id } => ITodoList::deleteTaskCall {
                _taskId: U256::from(*id),
            }
            .abi_encode(),
            ContractCall::PostTask {
                title,
                description,
                bounty,
            } => IMarketplace::postTaskCall {
                _title: title.clone(),
                _description: description.clone(),
                _bounty: bounty.to_u256(),
            }
            .abi_encode(),
            ContractCall::TakeTask { id } => IMarketplace::takeTaskCall {
                _taskId: U256::from(*id),
            }
            .abi_encode(),
            ContractCall::CompleteTask { id } => IMarketplace::completeTaskCall {
                _taskId: U256::from(*id),
            }
            .abi_encode(),
            ContractCall::ApproveTask { id } => IMarketplace::approveTaskCall {
                _taskId: U256::from(*id),
            }
            .abi_encode(),
            ContractCall::CancelTask { id } => IMarketplace::cancelTaskCall {
                _taskId: U256::from(*id),
            }
            .abi_encode(),
            ContractCall::ApproveSpend { spender, amount } => IERC20::approveCall {
                spender: *spender,
                amount: amount.to_u256(),
            }
            .abi_encode(),
        }
    }
}

fn todo_from_abi(task: ITodoList::Task) -> Result<TodoTask> {
    Ok(TodoTask {
        id: to_u64(task.id, "id")?,
        title: task.title,
        description: task.description,
        completed: task.completed,
        created_at: to_u64(task.createdAt, "createdAt")?,
        priority: Priority::try_from(task.priority)?,
    })
}

fn market_from_abi(task: IMarketplace::Task) -> Result<MarketTask> {
    Ok(MarketTask {
        id: to_u64(task.id, "id")?,
        poster: task.poster,
        worker: (task.worker != Address::ZERO).then_some(task.worker),
        title: task.title,
        description: task.description,
        bounty: TokenAmount::try_from(task.bounty)?,
        status: TaskStatus::try_from(task.status)?,
        created_at: to_u64(task.createdAt, "createdAt")?,
    })
}

fn to_u64(value: U256, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| LedgerError::Decode(format!("{field} overflows u64: {value}")))
}

fn abi_error(err: alloy_sol_types::Error) -> LedgerError {
    LedgerError::Decode(format!("ABI decode failed: {err}"))
}

fn unexpected(expected: &str, got: &QueryOutput) -> LedgerError {
    LedgerError::InvalidResponse(format!("expected {expected}, got {got:?}"))
}
