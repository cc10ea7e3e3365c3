/*
[INPUT]:  Decoded contract records (todo tasks, marketplace tasks, stats)
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - read-through copies of ledger state
[UPDATE]: When contract record layouts change
*/

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::amount::TokenAmount;
use super::enums::{Priority, TaskStatus};

/// Ledger-assigned task identifier
pub type TaskId = u64;

/// Todo list entry owned by a single account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoTask {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// Unix seconds
    pub created_at: u64,
    pub priority: Priority,
}

impl TodoTask {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::try_from(self.created_at).ok()?, 0)
    }
}

/// Aggregate counts over the caller's own todo tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
}

impl TaskStats {
    /// Stats computed from a task list the way the todo contract does
    pub fn from_tasks(tasks: &[TodoTask]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count() as u64;
        let total = tasks.len() as u64;
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }

    /// `total == completed + pending`
    pub fn is_consistent(&self) -> bool {
        self.completed
            .checked_add(self.pending)
            .is_some_and(|sum| sum == self.total)
    }
}

/// Bounty task visible to every marketplace participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketTask {
    pub id: TaskId,
    pub poster: Address,
    /// Unset until the task is taken
    pub worker: Option<Address>,
    pub title: String,
    pub description: String,
    pub bounty: TokenAmount,
    pub status: TaskStatus,
    /// Unix seconds
    pub created_at: u64,
}

impl MarketTask {
    pub fn is_poster(&self, account: Address) -> bool {
        self.poster == account
    }

    pub fn is_worker(&self, account: Address) -> bool {
        self.worker == Some(account)
    }

    /// Poster or bound worker
    pub fn involves(&self, account: Address) -> bool {
        self.is_poster(account) || self.is_worker(account)
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::try_from(self.created_at).ok()?, 0)
    }
}

/// `0x1234...abcd` form used in listings
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: TaskId, completed: bool) -> TodoTask {
        TodoTask {
            id,
            title: format!("task {id}"),
            description: String::new(),
            completed,
            created_at: 1_700_000_000,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn test_stats_from_tasks() {
        let tasks = vec![todo(1, true), todo(2, false), todo(3, false)];
        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_inconsistent_stats_detected() {
        let stats = TaskStats {
            total: 4,
            completed: 1,
            pending: 2,
        };
        assert!(!stats.is_consistent());
    }

    #[test]
    fn test_short_address() {
        let address: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(short_address(&address), "0xf39F...2266");
    }

    #[test]
    fn test_created_at_utc() {
        let task = todo(1, false);
        let created = task.created_at_utc().unwrap();
        assert_eq!(created.timestamp(), 1_700_000_000);
    }
}
