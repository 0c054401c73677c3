//! File-backed inventory and artifact store.
//!
//! The inventory is a TOML snapshot of the fleet:
//!
//! ```toml
//! [[groups]]
//! name = "prod-workers"
//! launch_template = "lt-workers"
//! subnet_ids = "subnet-a,subnet-b"
//!
//! [[groups]]
//! name = "prod-spot"
//! subnet_ids = "subnet-c"
//! [groups.mixed_instances]
//! launch_template_name = "lt-spot"
//!
//! [[subnets]]
//! id = "subnet-a"
//! available_addresses = 120
//! ```
//!
//! `subnet_ids` stays comma-joined to match the field shape providers
//! report. Artifacts land as pretty JSON at `<dir>/<namespace>/<name>.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use captier_core::{
    AutoScalingGroup, CapacityError, CapacityResult, CapacitySource, ConfigArtifact, ConfigStore,
    GroupSource, LaunchTemplateSpec, MixedInstancesPolicy, Subnet, SubnetId, TemplateRef,
};

// ── Inventory ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct InventoryDoc {
    #[serde(default)]
    groups: Vec<GroupEntry>,
    #[serde(default)]
    subnets: Vec<SubnetEntry>,
}

#[derive(Debug, Deserialize)]
struct GroupEntry {
    name: String,
    launch_template: Option<String>,
    mixed_instances: Option<MixedEntry>,
    #[serde(default)]
    subnet_ids: String,
}

#[derive(Debug, Deserialize)]
struct MixedEntry {
    launch_template_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubnetEntry {
    id: String,
    available_addresses: u64,
}

impl GroupEntry {
    fn into_group(self) -> AutoScalingGroup {
        let template = match (self.launch_template, self.mixed_instances) {
            (Some(name), _) => TemplateRef::Direct { name },
            (None, Some(mixed)) => TemplateRef::MixedInstances {
                policy: MixedInstancesPolicy {
                    launch_template: Some(LaunchTemplateSpec {
                        launch_template_name: mixed.launch_template_name,
                    }),
                },
            },
            (None, None) => TemplateRef::Absent,
        };
        AutoScalingGroup {
            subnet_ids: AutoScalingGroup::split_subnet_ids(&self.subnet_ids),
            name: self.name,
            template,
        }
    }
}

/// Fleet inventory parsed from a TOML snapshot.
pub struct FileInventory {
    groups: Vec<AutoScalingGroup>,
    subnets: HashMap<SubnetId, u64>,
}

impl FileInventory {
    /// Load a snapshot from disk.
    pub fn load(path: &Path) -> CapacityResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CapacityError::SourceUnavailable(format!("read {}: {e}", path.display()))
        })?;
        Self::parse(&text)
    }

    /// Parse a snapshot document.
    pub fn parse(text: &str) -> CapacityResult<Self> {
        let doc: InventoryDoc = toml::from_str(text)
            .map_err(|e| CapacityError::SourceUnavailable(format!("parse inventory: {e}")))?;
        debug!(
            groups = doc.groups.len(),
            subnets = doc.subnets.len(),
            "parsed inventory snapshot"
        );
        Ok(Self {
            groups: doc.groups.into_iter().map(GroupEntry::into_group).collect(),
            subnets: doc
                .subnets
                .into_iter()
                .map(|s| (s.id, s.available_addresses))
                .collect(),
        })
    }
}

#[async_trait]
impl GroupSource for FileInventory {
    async fn list_groups(&self) -> CapacityResult<Vec<AutoScalingGroup>> {
        Ok(self.groups.clone())
    }
}

#[async_trait]
impl CapacitySource for FileInventory {
    async fn describe_subnet(&self, id: &str) -> CapacityResult<Subnet> {
        self.subnets
            .get(id)
            .map(|free| Subnet {
                id: id.to_string(),
                available_addresses: *free,
            })
            .ok_or_else(|| CapacityError::SubnetNotFound(id.to_string()))
    }
}

// ── Artifact store ─────────────────────────────────────────────────

/// Directory-backed config store, one JSON file per artifact.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn artifact_path(&self, namespace: &str, name: &str) -> PathBuf {
        self.dir.join(namespace).join(format!("{name}.json"))
    }

    async fn write(&self, artifact: &ConfigArtifact) -> CapacityResult<()> {
        let path = self.artifact_path(&artifact.namespace, &artifact.name);
        let write_failed = |reason: String| CapacityError::StoreWriteFailed {
            namespace: artifact.namespace.clone(),
            name: artifact.name.clone(),
            reason,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_failed(e.to_string()))?;
        }
        let body = serde_json::to_vec_pretty(artifact).map_err(|e| write_failed(e.to_string()))?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| write_failed(e.to_string()))
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    async fn get(&self, namespace: &str, name: &str) -> CapacityResult<Option<ConfigArtifact>> {
        let path = self.artifact_path(namespace, name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CapacityError::StoreLookupFailed {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    reason: e.to_string(),
                });
            }
        };
        let artifact =
            serde_json::from_slice(&bytes).map_err(|e| CapacityError::StoreLookupFailed {
                namespace: namespace.to_string(),
                name: name.to_string(),
                reason: format!("corrupt artifact: {e}"),
            })?;
        Ok(Some(artifact))
    }

    async fn create(&self, artifact: &ConfigArtifact) -> CapacityResult<()> {
        if self.get(&artifact.namespace, &artifact.name).await?.is_some() {
            return Err(CapacityError::StoreWriteFailed {
                namespace: artifact.namespace.clone(),
                name: artifact.name.clone(),
                reason: "already exists".to_string(),
            });
        }
        self.write(artifact).await
    }

    async fn update(&self, artifact: &ConfigArtifact) -> CapacityResult<()> {
        if self.get(&artifact.namespace, &artifact.name).await?.is_none() {
            return Err(CapacityError::StoreWriteFailed {
                namespace: artifact.namespace.clone(),
                name: artifact.name.clone(),
                reason: "does not exist".to_string(),
            });
        }
        self.write(artifact).await
    }
}
