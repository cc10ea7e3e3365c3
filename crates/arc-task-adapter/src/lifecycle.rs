/*
[INPUT]:  Task status, poster/worker bindings, acting account, requested action
[OUTPUT]: Validated transitions and the set of actions an account may take
[POS]:    Domain logic - task lifecycle guards shared by ledger models and view-model
[UPDATE]: When the marketplace or todo contracts change their transition rules
*/

use std::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{MarketTask, TaskStatus};

/// Actions that move a marketplace task between statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketAction {
    Take,
    Cancel,
    Complete,
    Approve,
}

impl MarketAction {
    pub const ALL: [MarketAction; 4] = [
        MarketAction::Take,
        MarketAction::Cancel,
        MarketAction::Complete,
        MarketAction::Approve,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MarketAction::Take => "take",
            MarketAction::Cancel => "cancel",
            MarketAction::Complete => "complete",
            MarketAction::Approve => "approve",
        }
    }
}

impl fmt::Display for MarketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Actions on an owned todo task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoAction {
    Complete,
    Delete,
}

/// Role an action requires of the acting account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Poster,
    NonPoster,
    Worker,
    Owner,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Poster => "the poster",
            Role::NonPoster => "an account other than the poster",
            Role::Worker => "the assigned worker",
            Role::Owner => "the owner",
        };
        f.write_str(label)
    }
}

/// Errors occurring during guarded transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("cannot {action} a task that is {status}")]
    InvalidState {
        status: TaskStatus,
        action: MarketAction,
    },
    #[error("only {required} may {action} this task")]
    WrongActor { required: Role, action: MarketAction },
    #[error("todo task is already completed")]
    AlreadyCompleted,
    #[error("only the owner may modify this todo task")]
    NotOwner,
}

/// Token movement attached to a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    None,
    /// Escrowed bounty goes to the worker
    ReleaseToWorker,
    /// Escrowed bounty goes back to the poster
    RefundPoster,
}

/// Outcome of an accepted transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub worker: Option<Address>,
    pub settlement: Settlement,
}

/// Guarded state machine for one marketplace task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLifecycle {
    status: TaskStatus,
    poster: Address,
    worker: Option<Address>,
}

impl TaskLifecycle {
    /// Fresh task as created by `postTask`
    pub fn open(poster: Address) -> Self {
        Self {
            status: TaskStatus::Open,
            poster,
            worker: None,
        }
    }

    pub fn of(task: &MarketTask) -> Self {
        Self {
            status: task.status,
            poster: task.poster,
            worker: task.worker,
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn worker(&self) -> Option<Address> {
        self.worker
    }

    /// Check the (status, actor) guard for `action` without changing state
    pub fn check(&self, actor: Address, action: MarketAction) -> Result<Transition, GuardError> {
        let from = self.status;
        let invalid_state = GuardError::InvalidState {
            status: from,
            action,
        };
        match (from, action) {
            (TaskStatus::Open, MarketAction::Take) => {
                if actor == self.poster {
                    return Err(GuardError::WrongActor {
                        required: Role::NonPoster,
                        action,
                    });
                }
                Ok(Transition {
                    from,
                    to: TaskStatus::InProgress,
                    worker: Some(actor),
                    settlement: Settlement::None,
                })
            }
            (TaskStatus::Open, MarketAction::Cancel) => {
                if actor != self.poster {
                    return Err(GuardError::WrongActor {
                        required: Role::Poster,
                        action,
                    });
                }
                Ok(Transition {
                    from,
                    to: TaskStatus::Cancelled,
                    worker: None,
                    settlement: Settlement::RefundPoster,
                })
            }
            (TaskStatus::InProgress, MarketAction::Complete) => {
                if self.worker != Some(actor) {
                    return Err(GuardError::WrongActor {
                        required: Role::Worker,
                        action,
                    });
                }
                Ok(Transition {
                    from,
                    to: TaskStatus::Completed,
                    worker: self.worker,
                    settlement: Settlement::None,
                })
            }
            (TaskStatus::Completed, MarketAction::Approve) => {
                if actor != self.poster {
                    return Err(GuardError::WrongActor {
                        required: Role::Poster,
                        action,
                    });
                }
                Ok(Transition {
                    from,
                    to: TaskStatus::Approved,
                    worker: self.worker,
                    settlement: Settlement::ReleaseToWorker,
                })
            }
            _ => Err(invalid_state),
        }
    }

    pub fn can_apply(&self, actor: Address, action: MarketAction) -> bool {
        self.check(actor, action).is_ok()
    }

    /// Perform a guarded transition
    pub fn apply(&mut self, actor: Address, action: MarketAction) -> Result<Transition, GuardError> {
        let transition = self.check(actor, action)?;
        self.status = transition.to;
        self.worker = transition.worker;
        Ok(transition)
    }

    /// Actions `actor` may perform right now, in display order
    pub fn allowed_actions(&self, actor: Address) -> Vec<MarketAction> {
        MarketAction::ALL
            .into_iter()
            .filter(|action| self.can_apply(actor, *action))
            .collect()
    }
}

/// Guard for todo actions: owner only, and completion happens once
pub fn check_todo(completed: bool, is_owner: bool, action: TodoAction) -> Result<(), GuardError> {
    if !is_owner {
        return Err(GuardError::NotOwner);
    }
    match action {
        TodoAction::Complete if completed => Err(GuardError::AlreadyCompleted),
        TodoAction::Complete | TodoAction::Delete => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poster() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn worker() -> Address {
        Address::repeat_byte(0xbb)
    }

    fn stranger() -> Address {
        Address::repeat_byte(0xcc)
    }

    #[test]
    fn test_initial_state() {
        let machine = TaskLifecycle::open(poster());
        assert_eq!(machine.status(), TaskStatus::Open);
        assert_eq!(machine.worker(), None);
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut machine = TaskLifecycle::open(poster());

        let taken = machine.apply(worker(), MarketAction::Take).unwrap();
        assert_eq!(taken.to, TaskStatus::InProgress);
        assert_eq!(machine.worker(), Some(worker()));

        machine.apply(worker(), MarketAction::Complete).unwrap();
        assert_eq!(machine.status(), TaskStatus::Completed);

        let approved = machine.apply(poster(), MarketAction::Approve).unwrap();
        assert_eq!(approved.settlement, Settlement::ReleaseToWorker);
        assert_eq!(machine.status(), TaskStatus::Approved);
        assert_eq!(machine.worker(), Some(worker()));
    }

    #[test]
    fn test_cancel_refunds_poster() {
        let mut machine = TaskLifecycle::open(poster());
        let cancelled = machine.apply(poster(), MarketAction::Cancel).unwrap();
        assert_eq!(cancelled.settlement, Settlement::RefundPoster);
        assert_eq!(machine.status(), TaskStatus::Cancelled);
        assert_eq!(machine.worker(), None);
    }

    #[test]
    fn test_poster_cannot_take_own_task() {
        let mut machine = TaskLifecycle::open(poster());
        let err = machine.apply(poster(), MarketAction::Take).unwrap_err();
        assert_eq!(
            err,
            GuardError::WrongActor {
                required: Role::NonPoster,
                action: MarketAction::Take
            }
        );
        assert_eq!(machine.status(), TaskStatus::Open);
    }

    #[test]
    fn test_only_worker_completes() {
        let mut machine = TaskLifecycle::open(poster());
        machine.apply(worker(), MarketAction::Take).unwrap();
        assert!(machine.apply(stranger(), MarketAction::Complete).is_err());
        assert!(machine.apply(poster(), MarketAction::Complete).is_err());
        assert_eq!(machine.status(), TaskStatus::InProgress);
    }

    #[test]
    fn test_terminal_states_absorb() {
        let mut approved = TaskLifecycle::open(poster());
        approved.apply(worker(), MarketAction::Take).unwrap();
        approved.apply(worker(), MarketAction::Complete).unwrap();
        approved.apply(poster(), MarketAction::Approve).unwrap();

        let mut cancelled = TaskLifecycle::open(poster());
        cancelled.apply(poster(), MarketAction::Cancel).unwrap();

        for machine in [approved, cancelled] {
            for actor in [poster(), worker(), stranger()] {
                assert!(machine.allowed_actions(actor).is_empty());
            }
        }
    }

    #[test]
    fn test_allowed_actions_by_role() {
        let machine = TaskLifecycle::open(poster());
        assert_eq!(machine.allowed_actions(poster()), vec![MarketAction::Cancel]);
        assert_eq!(machine.allowed_actions(worker()), vec![MarketAction::Take]);
    }

    #[test]
    fn test_todo_guard() {
        assert!(check_todo(false, true, TodoAction::Complete).is_ok());
        assert_eq!(
            check_todo(true, true, TodoAction::Complete),
            Err(GuardError::AlreadyCompleted)
        );
        assert!(check_todo(true, true, TodoAction::Delete).is_ok());
        assert_eq!(
            check_todo(false, false, TodoAction::Delete),
            Err(GuardError::NotOwner)
        );
    }
}
