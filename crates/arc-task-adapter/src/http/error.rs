/*
[INPUT]:  Error sources (HTTP, JSON-RPC, ABI decoding, wallet, local validation)
[OUTPUT]: Structured error type with a user-facing classification
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or changing the error taxonomy
*/

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON-RPC error code used by EIP-1193 wallets when the user refuses a request
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC error code used by nodes for `execution reverted`
pub const EXECUTION_REVERTED_CODE: i64 = 3;

/// Main error type for the ledger adapter
#[derive(Error, Debug)]
pub enum LedgerError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Node returned a JSON-RPC error that has no more specific meaning
    #[error("RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    /// The wallet (or its user) refused to sign the request
    #[error("Request rejected by wallet: {message}")]
    WalletRejected { message: String },

    /// The ledger refused the call or transaction
    #[error("Rejected by ledger: {reason}")]
    Reverted { reason: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// ABI or value decoding failed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid response from node
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local input failed validation before reaching the ledger
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No wallet account is available for the request
    #[error("No wallet account connected")]
    NotConnected,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection timeout
    #[error("Connection timeout after {duration}s")]
    Timeout { duration: u64 },
}

/// Coarse classification used to pick user-facing feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Signing prompt refused by the wallet or its user
    WalletRejected,
    /// Transport or read failure against the ledger
    Network,
    /// Disallowed transition, insufficient balance/allowance, revert
    LedgerRejected,
    /// Local validation failure
    Invalid,
    /// Configuration or decoding problem
    Internal,
}

impl ErrorKind {
    /// Short user-facing hint for this kind of failure
    pub fn hint(self) -> &'static str {
        match self {
            ErrorKind::WalletRejected => "The signing request was rejected in the wallet.",
            ErrorKind::Network => "The ledger could not be reached. Check the RPC endpoint and retry.",
            ErrorKind::LedgerRejected => {
                "The ledger refused the request. The task may have changed since the last refresh."
            }
            ErrorKind::Invalid => "The request was not sent because the input is invalid.",
            ErrorKind::Internal => "Unexpected client error. See the log for details.",
        }
    }
}

impl LedgerError {
    /// Build an error from a JSON-RPC error object
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == USER_REJECTED_CODE {
            return LedgerError::WalletRejected { message };
        }
        let lowered = message.to_ascii_lowercase();
        if code == EXECUTION_REVERTED_CODE
            || lowered.contains("revert")
            || lowered.contains("insufficient")
        {
            return LedgerError::Reverted { reason: message };
        }
        if lowered.contains("user denied") || lowered.contains("user rejected") {
            return LedgerError::WalletRejected { message };
        }
        LedgerError::Rpc { code, message }
    }

    /// Classify the error for user feedback
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::WalletRejected { .. } => ErrorKind::WalletRejected,
            LedgerError::Http(_)
            | LedgerError::Rpc { .. }
            | LedgerError::InvalidResponse(_)
            | LedgerError::Timeout { .. } => ErrorKind::Network,
            LedgerError::Reverted { .. } => ErrorKind::LedgerRejected,
            LedgerError::InvalidInput(_) | LedgerError::NotConnected => ErrorKind::Invalid,
            LedgerError::Serialization(_)
            | LedgerError::UrlParse(_)
            | LedgerError::Decode(_)
            | LedgerError::Config(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
