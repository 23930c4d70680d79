//! Error types surfaced to embedders.
//!
//! The simulation itself is total; these only cover rejected outer inputs
//! and settings loading.

use thiserror::Error;

/// Result type for simulation-facing operations.
pub type SimResult<T> = Result<T, SimError>;

/// Errors returned by the outer simulation surface.
#[derive(Debug, Error)]
pub enum SimError {
    /// A level-up choice arrived while no level-up was pending.
    #[error("no level-up is pending")]
    NotLevelingUp,

    /// Level-up choice index out of range.
    #[error("invalid level-up choice {index} (only {available} offered)")]
    InvalidChoice { index: usize, available: usize },

    /// Restart requested while the run is still alive.
    #[error("restart is only valid after game over")]
    RestartWhileRunning,

    /// Malformed settings JSON.
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// Settings file could not be read.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
