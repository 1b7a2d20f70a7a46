//! Process lifecycle.

mod model;
mod new_process;
mod number;
mod state;

pub use model::Process;
pub use new_process::NewProcess;
pub use number::ProcessNumber;
pub use state::ProcessStatus;

use thiserror::Error;

/// Errors raised by the process lifecycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// No process has this id.
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    /// Another process already carries this process number.
    #[error("Process number already in use: {0}")]
    DuplicateProcessNumber(String),

    /// The process is not in a state that allows the action.
    #[error("Invalid state for process {process_id}: cannot {action} from {status}")]
    InvalidState {
        process_id: String,
        status: ProcessStatus,
        action: &'static str,
    },

    /// A count, weight or length was out of range.
    #[error("Invalid quantity for {field}: {value}")]
    InvalidQuantity { field: &'static str, value: String },
}
