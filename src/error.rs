//! Error taxonomy shared across the crate.

use thiserror::Error;

/// Errors surfaced by the data model, acquisition and persistence layers.
///
/// Removal of an absent plot/series/variable is deliberately *not* an error:
/// deletion requests commonly race with absence, so those operations are
/// no-ops. `NotFound` is reserved for lookups where the caller needs the
/// entity to exist (e.g. binding a series to an unknown variable).
#[derive(Debug, Error)]
pub enum VarScopeError {
    /// A plot or variable name is already taken. The operation did not
    /// modify any state.
    #[error("name already in use: {0}")]
    NameConflict(String),

    /// A plot or variable with the given name does not exist.
    #[error("no such plot or variable: {0}")]
    NotFound(String),

    /// Buffer capacity must be at least one sample.
    #[error("invalid buffer capacity: {0}")]
    CapacityMisconfiguration(usize),

    /// The sampling period must be non-zero.
    #[error("invalid sample period: must be non-zero")]
    PeriodMisconfiguration,

    /// Reading a variable from the target failed. Recoverable; the variable
    /// is skipped for the current tick.
    #[error("target read failed at address {address:#x}")]
    TargetRead { address: u64 },

    /// Writing a value back to the target failed.
    #[error("target write failed at address {address:#x}")]
    TargetWrite { address: u64 },

    /// Project load/save failed (I/O or de/serialization).
    #[error("persistence error: {0}")]
    Persistence(String),
}
