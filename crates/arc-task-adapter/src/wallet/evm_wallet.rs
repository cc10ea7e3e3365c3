/*
[INPUT]:  EVM private key (hex string)
[OUTPUT]: Wallet address for development nodes with unlocked accounts
[POS]:    Wallet layer - local key wallet implementation
[UPDATE]: When key handling or address formatting changes
*/

use std::str::FromStr;

use alloy_primitives::Address;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::http::{LedgerError, Result};
use crate::wallet::Wallet;

/// Wallet whose account is derived from a local EVM private key
pub struct LocalKeyWallet {
    address: Address,
}

impl LocalKeyWallet {
    /// Create a wallet from a hex-encoded private key
    ///
    /// Supports both "0x"-prefixed and non-prefixed hex strings.
    pub fn new(private_key_hex: &str) -> Result<Self> {
        let private_key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());
        let signer = PrivateKeySigner::from_str(private_key_hex)
            .map_err(|e| LedgerError::Config(format!("Invalid EVM private key: {}", e)))?;

        Ok(Self {
            address: Signer::address(&signer),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl Wallet for LocalKeyWallet {
    fn name(&self) -> &str {
        "local key"
    }

    async fn connect(&self) -> Result<Address> {
        Ok(self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_key_wallet() {
        // A well-known test private key
        let pk = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let wallet = LocalKeyWallet::new(pk).unwrap();

        let address = wallet.connect().await.unwrap();
        assert_eq!(
            address.to_checksum(None),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_local_key_wallet_no_prefix() {
        let pk = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let wallet = LocalKeyWallet::new(pk).unwrap();
        assert_eq!(
            wallet.address().to_checksum(None),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_local_key_wallet_invalid_key() {
        assert!(matches!(
            LocalKeyWallet::new("0x1234"),
            Err(LedgerError::Config(_))
        ));
    }
}
