//! Patch record lifecycle and targeting mode.
//!
//! ```text
//! in_progress -> completed -> rolled_back
//! in_progress -> failed
//! ```
//!
//! `failed` and `rolled_back` are terminal.

use serde::{Deserialize, Serialize};

pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";
pub const STATUS_ROLLED_BACK: &str = "rolled_back";

/// All valid status strings (stored in DB).
pub const VALID_STATUSES: &[&str] = &[
    STATUS_IN_PROGRESS,
    STATUS_COMPLETED,
    STATUS_FAILED,
    STATUS_ROLLED_BACK,
];

pub const TARGET_SELECTED: &str = "selected";
pub const TARGET_ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchStatus {
    InProgress,
    Completed,
    Failed,
    RolledBack,
}

impl PatchStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_IN_PROGRESS => Ok(Self::InProgress),
            STATUS_COMPLETED => Ok(Self::Completed),
            STATUS_FAILED => Ok(Self::Failed),
            STATUS_ROLLED_BACK => Ok(Self::RolledBack),
            _ => Err(format!(
                "Invalid patch status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Completed => STATUS_COMPLETED,
            Self::Failed => STATUS_FAILED,
            Self::RolledBack => STATUS_ROLLED_BACK,
        }
    }

    pub fn can_transition_to(self, next: PatchStatus) -> bool {
        matches!(
            (self, next),
            (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Failed)
                | (Self::Completed, Self::RolledBack)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::RolledBack)
    }

    /// Final status of a finished run: `failed` only when every target failed.
    pub fn from_outcome(succeeded: usize) -> Self {
        if succeeded == 0 {
            Self::Failed
        } else {
            Self::Completed
        }
    }
}

/// Whether a patch targeted an explicit selection or every card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    Selected,
    All,
}

impl TargetMode {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            TARGET_SELECTED => Ok(Self::Selected),
            TARGET_ALL => Ok(Self::All),
            _ => Err(format!(
                "Invalid target mode '{s}'. Must be one of: {TARGET_SELECTED}, {TARGET_ALL}"
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selected => TARGET_SELECTED,
            Self::All => TARGET_ALL,
        }
    }
}
