//! Cloud-provider source traits.
//!
//! The engine only ever sees these two traits; whether the data comes
//! from a provider API, a file snapshot, or an in-memory fixture is a
//! wiring decision made in the daemon.

use async_trait::async_trait;

use crate::error::CapacityResult;
use crate::types::{AutoScalingGroup, Subnet};

/// Lists the fleet of auto-scaling groups.
#[async_trait]
pub trait GroupSource: Send + Sync {
    /// Return the full set of groups visible to this source.
    ///
    /// Fails with [`CapacityError::SourceUnavailable`] on transport
    /// errors; there is no partial listing.
    ///
    /// [`CapacityError::SourceUnavailable`]: crate::CapacityError::SourceUnavailable
    async fn list_groups(&self) -> CapacityResult<Vec<AutoScalingGroup>>;
}

/// Looks up per-subnet free-address counts.
#[async_trait]
pub trait CapacitySource: Send + Sync {
    /// Describe a single subnet by id.
    async fn describe_subnet(&self, id: &str) -> CapacityResult<Subnet>;
}
