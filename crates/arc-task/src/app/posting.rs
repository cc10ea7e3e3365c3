/*
[INPUT]:  Validated post draft, approval/post transaction hashes and outcomes
[OUTPUT]: Two-phase posting state and the next request to issue
[POS]:    View-model layer - approve-then-post state machine
[UPDATE]: When the posting sequence or its failure stages change
*/

use std::fmt;

use arc_task_adapter::{ContractCall, TokenAmount, TxHash};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::sync::Confirmation;

/// Inputs of a post, validated before the flow starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub bounty: TokenAmount,
}

impl PostDraft {
    fn post_call(&self) -> ContractCall {
        ContractCall::PostTask {
            title: self.title.clone(),
            description: self.description.clone(),
            bounty: self.bounty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStage {
    Approval,
    Posting,
}

impl fmt::Display for PostStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStage::Approval => f.write_str("bounty approval"),
            PostStage::Posting => f.write_str("task creation"),
        }
    }
}

/// `IDLE -> AWAITING_APPROVAL(tx) -> APPROVAL_CONFIRMED -> SUBMITTING_TASK(tx) -> DONE | FAILED`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PostFlow {
    #[default]
    Idle,
    /// Allowance grant being signed (`tx` unset) or confirmed
    AwaitingApproval { draft: PostDraft, tx: Option<TxHash> },
    /// Allowance confirmed; task creation is being signed
    ApprovalConfirmed { draft: PostDraft },
    SubmittingTask { draft: PostDraft, tx: TxHash },
    Done { title: String, tx: TxHash },
    Failed { stage: PostStage, reason: String },
}

/// What the reducer must do after feeding an outcome into the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostStep {
    /// Approval confirmed; issue this task-creation call
    SubmitTask(ContractCall),
    /// Flow reached `Done` or `Failed`
    Finished,
    /// Outcome does not belong to the current phase
    Ignored,
}

impl PostFlow {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PostFlow::AwaitingApproval { .. }
                | PostFlow::ApprovalConfirmed { .. }
                | PostFlow::SubmittingTask { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            PostFlow::Idle => "IDLE",
            PostFlow::AwaitingApproval { .. } => "AWAITING_APPROVAL",
            PostFlow::ApprovalConfirmed { .. } => "APPROVAL_CONFIRMED",
            PostFlow::SubmittingTask { .. } => "SUBMITTING_TASK",
            PostFlow::Done { .. } => "DONE",
            PostFlow::Failed { .. } => "FAILED",
        }
    }

    /// Stage a rejection or failure would be attributed to
    pub fn stage(&self) -> Option<PostStage> {
        match self {
            PostFlow::AwaitingApproval { .. } => Some(PostStage::Approval),
            PostFlow::ApprovalConfirmed { .. } | PostFlow::SubmittingTask { .. } => {
                Some(PostStage::Posting)
            }
            _ => None,
        }
    }

    /// Start a new flow; returns `false` while another one is active
    pub fn begin(&mut self, draft: PostDraft) -> bool {
        if self.is_active() {
            return false;
        }
        debug!(title = %draft.title, bounty = %draft.bounty, "post flow started");
        *self = PostFlow::AwaitingApproval { draft, tx: None };
        true
    }

    /// Record the hash of the transaction the current phase submitted
    pub fn submitted(&mut self, hash: TxHash) -> bool {
        match std::mem::take(self) {
            PostFlow::AwaitingApproval { draft, tx: None } => {
                *self = PostFlow::AwaitingApproval {
                    draft,
                    tx: Some(hash),
                };
                true
            }
            PostFlow::ApprovalConfirmed { draft } => {
                *self = PostFlow::SubmittingTask { draft, tx: hash };
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// The wallet refused to sign the current phase's transaction
    pub fn rejected(&mut self, reason: impl Into<String>) {
        if let Some(stage) = self.stage() {
            *self = PostFlow::Failed {
                stage,
                reason: reason.into(),
            };
        }
    }

    /// Feed a terminal confirmation outcome for `hash`
    pub fn settled(&mut self, hash: TxHash, outcome: &Confirmation) -> PostStep {
        match std::mem::take(self) {
            PostFlow::AwaitingApproval {
                draft,
                tx: Some(tx),
            } if tx == hash => {
                if outcome.is_confirmed() {
                    info!(tx_hash = %hash, "bounty approval confirmed");
                    let call = draft.post_call();
                    *self = PostFlow::ApprovalConfirmed { draft };
                    PostStep::SubmitTask(call)
                } else {
                    *self = PostFlow::Failed {
                        stage: PostStage::Approval,
                        reason: failure_reason(outcome),
                    };
                    PostStep::Finished
                }
            }
            PostFlow::SubmittingTask { draft, tx } if tx == hash => {
                *self = if outcome.is_confirmed() {
                    PostFlow::Done {
                        title: draft.title,
                        tx,
                    }
                } else {
                    PostFlow::Failed {
                        stage: PostStage::Posting,
                        reason: failure_reason(outcome),
                    }
                };
                PostStep::Finished
            }
            other => {
                *self = other;
                PostStep::Ignored
            }
        }
    }
}

fn failure_reason(outcome: &Confirmation) -> String {
    match outcome {
        Confirmation::Confirmed { block } => format!("confirmed in block {block}"),
        Confirmation::Failed { reason } => reason.clone(),
        Confirmation::TimedOut { waited_secs } => {
            format!("not confirmed after {waited_secs}s")
        }
        Confirmation::Interrupted => "confirmation interrupted".to_string(),
    }
}
