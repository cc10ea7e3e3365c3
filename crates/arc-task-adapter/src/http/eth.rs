/*
[INPUT]:  Contract queries/calls, sender accounts, transaction hashes
[OUTPUT]: eth_* JSON-RPC results and the Ledger implementation over them
[POS]:    HTTP layer - Ethereum JSON-RPC endpoints
[UPDATE]: When adding RPC methods or changing receipt interpretation
*/

use alloy_primitives::{Address, TxHash};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::contract::{ContractCall, Query, QueryOutput};
use crate::http::{LedgerError, Result, RpcClient};
use crate::ledger::{Ledger, TxStatus};

/// Subset of `eth_getTransactionReceipt` used for confirmation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: Option<String>,
    pub block_number: Option<String>,
    /// `0x1` success, `0x0` reverted
    pub status: Option<String>,
}

impl TransactionReceipt {
    /// Interpret the receipt; a receipt without a block is still pending
    pub fn tx_status(&self) -> Result<TxStatus> {
        let Some(block) = self.block_number.as_deref() else {
            return Ok(TxStatus::Pending);
        };
        let block = parse_quantity(block)?;
        match self.status.as_deref().map(parse_quantity).transpose()? {
            Some(0) => Ok(TxStatus::Failed {
                reason: "transaction reverted".to_string(),
            }),
            _ => Ok(TxStatus::Confirmed { block }),
        }
    }
}

impl RpcClient {
    /// `eth_chainId`
    pub async fn chain_id(&self) -> Result<u64> {
        let id: String = self.request("eth_chainId", json!([])).await?;
        parse_quantity(&id)
    }

    /// `eth_call` against the latest block
    pub async fn eth_call(
        &self,
        from: Option<Address>,
        to: Address,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        let mut tx = json!({
            "to": to,
            "data": encode_hex(data),
        });
        if let Some(from) = from {
            tx["from"] = json!(from);
        }
        let result: String = self.request("eth_call", json!([tx, "latest"])).await?;
        decode_hex(&result)
    }

    /// `eth_sendTransaction`; signing is performed by the wallet behind the endpoint
    pub async fn send_transaction(&self, from: Address, to: Address, data: &[u8]) -> Result<TxHash> {
        let tx = json!({
            "from": from,
            "to": to,
            "data": encode_hex(data),
        });
        let hash: String = self.request("eth_sendTransaction", json!([tx])).await?;
        hash.parse::<TxHash>()
            .map_err(|e| LedgerError::InvalidResponse(format!("invalid transaction hash {hash}: {e}")))
    }

    /// `eth_getTransactionReceipt`; `None` while the transaction is unknown or pending
    pub async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        self.request_optional("eth_getTransactionReceipt", json!([hash]))
            .await
    }

    /// `eth_requestAccounts` (prompts an injected wallet)
    pub async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.request("eth_requestAccounts", json!([])).await
    }

    /// `eth_accounts` (accounts already exposed by the endpoint)
    pub async fn accounts(&self) -> Result<Vec<Address>> {
        self.request("eth_accounts", json!([])).await
    }
}

#[async_trait]
impl Ledger for RpcClient {
    async fn read(
        &self,
        caller: Option<Address>,
        contract: Address,
        query: &Query,
    ) -> Result<QueryOutput> {
        let data = self.eth_call(caller, contract, &query.encode()).await?;
        query.decode(&data)
    }

    async fn submit(&self, from: Address, contract: Address, call: &ContractCall) -> Result<TxHash> {
        let hash = self.send_transaction(from, contract, &call.encode()).await?;
        info!(
            function = call.function_name(),
            tx_hash = %hash,
            "transaction submitted"
        );
        Ok(hash)
    }

    async fn transaction_status(&self, hash: TxHash) -> Result<TxStatus> {
        let status = match self.transaction_receipt(hash).await? {
            Some(receipt) => receipt.tx_status()?,
            None => TxStatus::Pending,
        };
        debug!(tx_hash = %hash, ?status, "transaction status");
        Ok(status)
    }
}

fn encode_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(|e| LedgerError::InvalidResponse(format!("invalid hex data: {e}")))
}

/// Parse a JSON-RPC hex quantity such as `0x1a`
pub(crate) fn parse_quantity(value: &str) -> Result<u64> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| LedgerError::InvalidResponse(format!("invalid quantity {value}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x1a").unwrap(), 26);
        assert_eq!(parse_quantity("0x").unwrap(), 0);
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn test_hex_roundtrip_prefix() {
        assert_eq!(encode_hex(&[0xde, 0xad]), "0xdead");
        assert_eq!(decode_hex("0xdead").unwrap(), vec![0xde, 0xad]);
        assert!(decode_hex("0xabc").is_err());
    }

    #[test]
    fn test_receipt_status() {
        let receipt = TransactionReceipt {
            transaction_hash: None,
            block_number: Some("0x10".to_string()),
            status: Some("0x1".to_string()),
        };
        assert_eq!(receipt.tx_status().unwrap(), TxStatus::Confirmed { block: 16 });

        let reverted = TransactionReceipt {
            status: Some("0x0".to_string()),
            ..receipt.clone()
        };
        assert!(matches!(reverted.tx_status().unwrap(), TxStatus::Failed { .. }));

        let pending = TransactionReceipt {
            block_number: None,
            ..receipt
        };
        assert_eq!(pending.tx_status().unwrap(), TxStatus::Pending);
    }
}
