/*
[INPUT]:  Deployed contract addresses and typed requests
[OUTPUT]: Contract address book plus ABI-level call/query encoding
[POS]:    Contract layer - fixed call surfaces of the three contracts
[UPDATE]: When contracts are redeployed or gain new functions
*/

pub mod abi;
pub mod calls;

use std::fmt;

use alloy_primitives::{Address, address};
use serde::{Deserialize, Serialize};

pub use calls::{ContractCall, Query, QueryOutput};

/// Task marketplace deployed on Arc Testnet
pub const ARC_TESTNET_MARKETPLACE: Address = address!("0xB3d92eAA661d4FB61996cA5b0f011963bB7E9FC2");

/// USDC settlement token on Arc Testnet
pub const ARC_TESTNET_USDC: Address = address!("0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238");

/// Which of the fixed contracts a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contract {
    TodoList,
    Marketplace,
    Token,
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Contract::TodoList => "todo_list",
            Contract::Marketplace => "marketplace",
            Contract::Token => "token",
        };
        f.write_str(name)
    }
}

/// Address book of the deployed contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contracts {
    pub todo_list: Address,
    pub marketplace: Address,
    pub token: Address,
}

impl Contracts {
    pub fn address(&self, contract: Contract) -> Address {
        match contract {
            Contract::TodoList => self.todo_list,
            Contract::Marketplace => self.marketplace,
            Contract::Token => self.token,
        }
    }
}
