/*
[INPUT]:  Submitted transaction hash, polling policy, shutdown token
[OUTPUT]: Terminal confirmation outcome (confirmed / failed / timed out)
[POS]:    Synchronization layer - confirmation-first re-read policy
[UPDATE]: When changing polling cadence or outcome classification
*/

use std::time::Duration;

use arc_task_adapter::{LedgerClient, TxHash, TxStatus};
use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How confirmation is awaited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Terminal outcome of waiting on a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Confirmation {
    Confirmed { block: u64 },
    Failed { reason: String },
    /// Still pending when the confirmation timeout elapsed
    TimedOut { waited_secs: u64 },
    /// Polling stopped because the application is shutting down
    Interrupted,
}

impl Confirmation {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Confirmation::Confirmed { .. })
    }
}

/// Poll `hash` until the ledger reports a final status or `policy.timeout` elapses.
///
/// Read errors while polling are logged and retried until the deadline.
pub async fn wait_for_confirmation(
    client: &LedgerClient,
    hash: TxHash,
    policy: SyncPolicy,
    shutdown: &CancellationToken,
) -> Confirmation {
    let started = Instant::now();
    // unbounded when the timeout does not fit in an Instant
    let deadline = started.checked_add(policy.timeout);
    let mut polls = 0u32;

    loop {
        polls += 1;
        match client.transaction_status(hash).await {
            Ok(TxStatus::Confirmed { block }) => {
                info!(tx_hash = %hash, block, polls, "transaction confirmed");
                return Confirmation::Confirmed { block };
            }
            Ok(TxStatus::Failed { reason }) => {
                warn!(tx_hash = %hash, %reason, polls, "transaction failed");
                return Confirmation::Failed { reason };
            }
            Ok(TxStatus::Pending) => debug!(tx_hash = %hash, polls, "transaction pending"),
            Err(err) => warn!(tx_hash = %hash, error = %err, "receipt poll failed"),
        }

        let now = Instant::now();
        let pause = match deadline {
            Some(deadline) if now >= deadline => {
                let waited_secs = now.duration_since(started).as_secs();
                warn!(tx_hash = %hash, waited_secs, "confirmation timed out");
                return Confirmation::TimedOut { waited_secs };
            }
            Some(deadline) => policy.poll_interval.min(deadline - now),
            None => policy.poll_interval,
        };
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!(tx_hash = %hash, "confirmation polling interrupted");
                return Confirmation::Interrupted;
            }
            _ = sleep(pause) => {}
        }
    }
}
