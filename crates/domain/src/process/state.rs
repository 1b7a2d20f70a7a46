//! Process state machine.

use serde::{Deserialize, Serialize};

/// The state of a process in its lifecycle.
///
/// State transitions:
/// ```text
/// InProgress ──► Completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessStatus {
    /// Stock is reserved and outputs have not been reported yet.
    #[default]
    InProgress,

    /// Outputs were reconciled (terminal state).
    Completed,
}

impl ProcessStatus {
    /// Returns true if outputs can be finalized in this state.
    pub fn can_complete(&self) -> bool {
        matches!(self, ProcessStatus::InProgress)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessStatus::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::InProgress => "in-progress",
            ProcessStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
