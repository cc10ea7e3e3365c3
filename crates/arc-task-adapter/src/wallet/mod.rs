/*
[INPUT]:  Wallet configuration (RPC wallet, fixed address, development key)
[OUTPUT]: Connected account addresses
[POS]:    Wallet layer - account selection for reads and submissions
[UPDATE]: When adding wallet kinds or changing connection behavior
*/

pub mod evm_wallet;
pub mod rpc_wallet;
pub mod connector;

pub use evm_wallet::LocalKeyWallet;
pub use rpc_wallet::RpcWallet;
pub use connector::{StaticWallet, Wallet};
