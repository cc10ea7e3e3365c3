/*
[INPUT]:  RPC endpoint configuration and contract requests
[OUTPUT]: JSON-RPC responses and typed ledger results
[POS]:    HTTP layer - node communication
[UPDATE]: When adding RPC methods or changing client behavior
*/

pub mod client;
pub mod error;
pub mod eth;

pub use error::{ErrorKind, LedgerError, Result};

pub use client::{ClientConfig, DEFAULT_RPC_URL, RpcClient};
pub use eth::TransactionReceipt;
