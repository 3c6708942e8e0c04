use thiserror::Error;

/// Contract violations of the navigation state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrillDownError {
    #[error("history index {index} out of range (history has {len} entries)")]
    HistoryIndexOutOfRange { index: usize, len: usize },
}
