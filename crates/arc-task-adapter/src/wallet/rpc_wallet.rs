/*
[INPUT]:  JSON-RPC endpoint backed by a wallet (injected provider bridge or dev node)
[OUTPUT]: Active account exposed by the endpoint
[POS]:    Wallet layer - RPC wallet implementation
[UPDATE]: When account discovery rules change
*/

use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::http::{LedgerError, Result, RpcClient};
use crate::wallet::Wallet;

/// Wallet that asks the RPC endpoint for its accounts
pub struct RpcWallet {
    client: Arc<RpcClient>,
}

impl RpcWallet {
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Wallet for RpcWallet {
    fn name(&self) -> &str {
        "rpc"
    }

    async fn connect(&self) -> Result<Address> {
        let accounts = match self.client.request_accounts().await {
            Ok(accounts) => accounts,
            Err(LedgerError::WalletRejected { message }) => {
                return Err(LedgerError::WalletRejected { message });
            }
            Err(err) => {
                // Plain nodes do not implement eth_requestAccounts
                warn!(error = %err, "eth_requestAccounts failed, falling back to eth_accounts");
                self.client.accounts().await?
            }
        };
        debug!(count = accounts.len(), "accounts exposed by endpoint");
        accounts.into_iter().next().ok_or(LedgerError::NotConnected)
    }
}
