/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public arc-task ledger adapter surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod contract;
pub mod http;
pub mod ledger;
pub mod lifecycle;
pub mod sim;
pub mod types;
pub mod wallet;

// Re-export commonly used types from http
pub use http::{ClientConfig, ErrorKind, LedgerError, Result, RpcClient};

pub use contract::{Contract, ContractCall, Contracts, Query, QueryOutput};
pub use ledger::{Ledger, LedgerClient, TxStatus};
pub use lifecycle::{GuardError, MarketAction, TaskLifecycle, TodoAction};
pub use sim::{MiningMode, SimulatedLedger};

// Re-export all types
pub use types::*;

pub use wallet::{LocalKeyWallet, RpcWallet, StaticWallet, Wallet};
