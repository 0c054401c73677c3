//! Declarative store trait.

use async_trait::async_trait;

use crate::error::CapacityResult;
use crate::types::ConfigArtifact;

/// Named, namespaced key-value objects read and replaced wholesale.
///
/// The reconciler assumes it is the only writer for a given
/// `(namespace, name)` identity within a cycle.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the artifact, or `None` if it does not exist.
    async fn get(&self, namespace: &str, name: &str) -> CapacityResult<Option<ConfigArtifact>>;

    /// Create a new artifact. The artifact must not already exist.
    async fn create(&self, artifact: &ConfigArtifact) -> CapacityResult<()>;

    /// Replace an existing artifact's payload in full.
    async fn update(&self, artifact: &ConfigArtifact) -> CapacityResult<()>;
}
