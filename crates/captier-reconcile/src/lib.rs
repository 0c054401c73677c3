//! captier-reconcile — idempotent publication of the priority listing.
//!
//! Per cycle and artifact identity the reconciler walks a fixed path:
//!
//! ```text
//! Lookup ──► NotFound ──► Create (or SkipCreate in skip-creation mode)
//!        └─► Found ─────► Update (full payload replace)
//! ```
//!
//! There are no retries here; a failed step surfaces its error and the
//! next scheduled cycle tries again.

pub mod reconciler;

pub use reconciler::{ReconcileOutcome, Reconciler};
