/*
[INPUT]:  Contract address book and test/demo scenario setup
[OUTPUT]: Offline ledger enforcing the same guards as the deployed contracts
[POS]:    Simulation layer - module wiring
[UPDATE]: When adding simulation capabilities
*/

pub mod ledger;
mod state;

pub use ledger::{GENESIS_TIMESTAMP, MiningMode, SimulatedLedger, default_contracts};
