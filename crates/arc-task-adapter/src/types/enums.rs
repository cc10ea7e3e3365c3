/*
[INPUT]:  Contract enum encodings (uint8 status / priority codes)
[OUTPUT]: Typed Rust enums with serialization and wire conversions
[POS]:    Data layer - enumerations shared by ledger and view-model
[UPDATE]: When the contracts add status or priority codes
*/

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::http::LedgerError;

/// Todo priority, stored on the ledger as `uint8`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn code(self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = LedgerError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Priority::Low),
            1 => Ok(Priority::Medium),
            2 => Ok(Priority::High),
            other => Err(LedgerError::Decode(format!("unknown priority code {other}"))),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(LedgerError::InvalidInput(format!("unknown priority: {other}"))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Marketplace task status, stored on the ledger as `uint8`.
///
/// Open -> InProgress -> Completed -> Approved, with Open -> Cancelled.
/// Approved and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Open,
    InProgress,
    Completed,
    Approved,
    Cancelled,
}

impl TaskStatus {
    pub fn code(self) -> u8 {
        match self {
            TaskStatus::Open => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
            TaskStatus::Approved => 3,
            TaskStatus::Cancelled => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::InProgress => "IN PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Approved => "APPROVED",
            TaskStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Approved | TaskStatus::Cancelled)
    }

    /// Whether a task in this status carries a bound worker
    pub fn has_worker(self) -> bool {
        matches!(
            self,
            TaskStatus::InProgress | TaskStatus::Completed | TaskStatus::Approved
        )
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = LedgerError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TaskStatus::Open),
            1 => Ok(TaskStatus::InProgress),
            2 => Ok(TaskStatus::Completed),
            3 => Ok(TaskStatus::Approved),
            4 => Ok(TaskStatus::Cancelled),
            other => Err(LedgerError::Decode(format!("unknown task status code {other}"))),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
