/*
[INPUT]:  Contract record layouts and token scale
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions shared across the workspace
[UPDATE]: When contract schema changes or new types added
*/

pub mod amount;
pub mod enums;
pub mod models;

pub use amount::*;
pub use enums::*;
pub use models::*;

pub use alloy_primitives::{Address, TxHash, address};
