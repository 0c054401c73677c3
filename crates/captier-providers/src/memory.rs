//! In-memory inventory and store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use captier_core::{
    AutoScalingGroup, CapacityError, CapacityResult, CapacitySource, ConfigArtifact, ConfigStore,
    GroupSource, Subnet, SubnetId,
};

/// In-process group and subnet inventory.
#[derive(Default)]
pub struct MemoryInventory {
    groups: Mutex<Vec<AutoScalingGroup>>,
    subnets: Mutex<HashMap<SubnetId, u64>>,
}

impl MemoryInventory {
    /// Empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group to the fleet.
    pub fn insert_group(&self, group: AutoScalingGroup) {
        self.groups.lock().unwrap().push(group);
    }

    /// Set a subnet's free-address count.
    pub fn insert_subnet(&self, id: &str, available_addresses: u64) {
        self.subnets
            .lock()
            .unwrap()
            .insert(id.to_string(), available_addresses);
    }
}

#[async_trait]
impl GroupSource for MemoryInventory {
    async fn list_groups(&self) -> CapacityResult<Vec<AutoScalingGroup>> {
        Ok(self.groups.lock().unwrap().clone())
    }
}

#[async_trait]
impl CapacitySource for MemoryInventory {
    async fn describe_subnet(&self, id: &str) -> CapacityResult<Subnet> {
        self.subnets
            .lock()
            .unwrap()
            .get(id)
            .map(|free| Subnet {
                id: id.to_string(),
                available_addresses: *free,
            })
            .ok_or_else(|| CapacityError::SubnetNotFound(id.to_string()))
    }
}

/// In-process config store keyed by `(namespace, name)`.
#[derive(Default)]
pub struct MemoryStore {
    artifacts: Mutex<HashMap<(String, String), ConfigArtifact>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct read-back for assertions and dry-run reporting.
    pub fn artifact(&self, namespace: &str, name: &str) -> Option<ConfigArtifact> {
        self.artifacts
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, namespace: &str, name: &str) -> CapacityResult<Option<ConfigArtifact>> {
        Ok(self.artifact(namespace, name))
    }

    async fn create(&self, artifact: &ConfigArtifact) -> CapacityResult<()> {
        let key = (artifact.namespace.clone(), artifact.name.clone());
        let mut artifacts = self.artifacts.lock().unwrap();
        if artifacts.contains_key(&key) {
            return Err(CapacityError::StoreWriteFailed {
                namespace: artifact.namespace.clone(),
                name: artifact.name.clone(),
                reason: "already exists".to_string(),
            });
        }
        artifacts.insert(key, artifact.clone());
        Ok(())
    }

    async fn update(&self, artifact: &ConfigArtifact) -> CapacityResult<()> {
        let key = (artifact.namespace.clone(), artifact.name.clone());
        let mut artifacts = self.artifacts.lock().unwrap();
        if !artifacts.contains_key(&key) {
            return Err(CapacityError::StoreWriteFailed {
                namespace: artifact.namespace.clone(),
                name: artifact.name.clone(),
                reason: "does not exist".to_string(),
            });
        }
        artifacts.insert(key, artifact.clone());
        Ok(())
    }
}
