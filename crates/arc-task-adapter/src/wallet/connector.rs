/*
[INPUT]:  Wallet implementation selected by configuration
[OUTPUT]: Connected account address or a classified rejection
[POS]:    Wallet layer - wallet abstraction
[UPDATE]: When adding new wallet types or changing connection semantics
*/

use std::sync::atomic::{AtomicBool, Ordering};

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::http::{LedgerError, Result};

/// Trait for wallet connectors
///
/// The trait is async to support external wallets that prompt the user.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Short description for logs and status lines
    fn name(&self) -> &str;

    /// Connect and return the active account
    async fn connect(&self) -> Result<Address>;
}

/// Wallet pinned to a configured address (also used in tests)
#[derive(Debug)]
pub struct StaticWallet {
    address: Address,
    reject: AtomicBool,
}

impl StaticWallet {
    /// Create a wallet that always connects as `address`
    pub fn new(address: Address) -> Self {
        Self {
            address,
            reject: AtomicBool::new(false),
        }
    }

    /// Make subsequent connection attempts fail as if the user refused
    pub fn set_rejecting(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl Wallet for StaticWallet {
    fn name(&self) -> &str {
        "static"
    }

    async fn connect(&self) -> Result<Address> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(LedgerError::WalletRejected {
                message: "connection refused".to_string(),
            });
        }
        Ok(self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ErrorKind;

    #[tokio::test]
    async fn test_static_wallet() {
        let address = Address::repeat_byte(0x42);
        let wallet = StaticWallet::new(address);
        assert_eq!(wallet.connect().await.unwrap(), address);

        wallet.set_rejecting(true);
        let err = wallet.connect().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WalletRejected);
    }
}
