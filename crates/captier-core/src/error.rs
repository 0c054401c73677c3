//! Error taxonomy for capacity evaluation and reconciliation.

use thiserror::Error;

/// Result type alias for captier operations.
pub type CapacityResult<T> = Result<T, CapacityError>;

/// Errors surfaced by the sources, the engine, and the reconciler.
///
/// None of these crash the process: transient failures abort the current
/// cycle and the periodic schedule is the retry mechanism.
#[derive(Debug, Error)]
pub enum CapacityError {
    /// A collaborator could not be reached (transport-level failure).
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The capacity source has no record of the subnet.
    #[error("subnet not found: {0}")]
    SubnetNotFound(String),

    /// A group record carries no launch template reference at all.
    #[error("group {0} has no launch template reference")]
    MissingTemplateReference(String),

    /// Looking up the config artifact failed.
    #[error("store lookup failed for {namespace}/{name}: {reason}")]
    StoreLookupFailed {
        namespace: String,
        name: String,
        reason: String,
    },

    /// Creating or updating the config artifact failed.
    #[error("store write failed for {namespace}/{name}: {reason}")]
    StoreWriteFailed {
        namespace: String,
        name: String,
        reason: String,
    },
}
