//! Error types for scheduler operations.

use thiserror::Error;

use crate::core::program::ProgramName;

/// Errors produced by scheduler components.
///
/// Capacity shortfalls are not errors: `add_process` reports them as
/// `Ok(false)`. Operations on processes that do not exist are no-ops.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    /// Thread count is not valid for a non-scaling program.
    #[error("invalid amount of threads for process {program}: {threads}")]
    InvalidThreads {
        /// Program the process was requested for.
        program: ProgramName,
        /// Requested thread count.
        threads: u32,
    },
    /// Snapshot references a program that is not owned.
    #[error("program not owned: {0}")]
    ProgramNotOwned(ProgramName),
    /// Snapshot content violates a process invariant.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
    /// Configuration failed validation.
    #[error("config error: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
