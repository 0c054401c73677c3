//! captier-core — domain model for capacity-based ASG tiering.
//!
//! Defines the types shared by the tiering engine and the reconciler:
//! auto-scaling group snapshots, subnets, the rendered config artifact,
//! and the traits behind which the cloud provider and the declarative
//! store live.
//!
//! This crate does no I/O. The traits in [`source`] and [`store`] are the
//! seams: `captier-providers` supplies real backends, tests supply fakes.

pub mod config;
pub mod error;
pub mod source;
pub mod store;
pub mod types;

pub use config::EvalConfig;
pub use error::{CapacityError, CapacityResult};
pub use source::{CapacitySource, GroupSource};
pub use store::ConfigStore;
pub use types::*;
