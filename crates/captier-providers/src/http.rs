//! HTTP JSON clients for an inventory/config API.
//!
//! Endpoints, relative to a configured base URL:
//!
//! ```text
//! GET  /v1/groups                      → [GroupRecord]
//! GET  /v1/subnets/{id}                → SubnetRecord
//! GET  /v1/configs/{namespace}/{name}  → ArtifactBody (404 = absent)
//! POST /v1/configs/{namespace}/{name}  → create
//! PUT  /v1/configs/{namespace}/{name}  → replace
//! ```
//!
//! Group records carry the provider's field shapes: a comma-joined
//! `vpc_zone_identifier` and either a direct `launch_template_name` or a
//! nested `mixed_instances_policy`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use captier_core::{
    AutoScalingGroup, CapacityError, CapacityResult, CapacitySource, ConfigArtifact, ConfigStore,
    GroupSource, LaunchTemplateSpec, MixedInstancesPolicy, Subnet, TemplateRef,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()
}

// ── Wire records ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GroupRecord {
    auto_scaling_group_name: String,
    launch_template_name: Option<String>,
    mixed_instances_policy: Option<MixedInstancesRecord>,
    #[serde(default)]
    vpc_zone_identifier: String,
}

#[derive(Debug, Deserialize)]
struct MixedInstancesRecord {
    launch_template: Option<LaunchTemplateRecord>,
}

#[derive(Debug, Deserialize)]
struct LaunchTemplateRecord {
    launch_template_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubnetRecord {
    subnet_id: String,
    available_ip_address_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ArtifactBody {
    #[serde(default)]
    data: HashMap<String, String>,
}

impl GroupRecord {
    fn into_group(self) -> AutoScalingGroup {
        let template = match (self.launch_template_name, self.mixed_instances_policy) {
            (Some(name), _) => TemplateRef::Direct { name },
            (None, Some(policy)) => TemplateRef::MixedInstances {
                policy: MixedInstancesPolicy {
                    launch_template: policy.launch_template.map(|lt| LaunchTemplateSpec {
                        launch_template_name: lt.launch_template_name,
                    }),
                },
            },
            (None, None) => TemplateRef::Absent,
        };
        AutoScalingGroup {
            name: self.auto_scaling_group_name,
            template,
            subnet_ids: AutoScalingGroup::split_subnet_ids(&self.vpc_zone_identifier),
        }
    }
}

// ── Inventory client ───────────────────────────────────────────────

/// Inventory API client.
pub struct HttpInventory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInventory {
    /// Client against the given base URL.
    pub fn new(base_url: &str) -> CapacityResult<Self> {
        let client =
            build_client().map_err(|e| CapacityError::SourceUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GroupSource for HttpInventory {
    async fn list_groups(&self) -> CapacityResult<Vec<AutoScalingGroup>> {
        let url = format!("{}/v1/groups", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CapacityError::SourceUnavailable(format!("list groups: {e}")))?;
        if !response.status().is_success() {
            return Err(CapacityError::SourceUnavailable(format!(
                "list groups: {}",
                response.status()
            )));
        }
        let records: Vec<GroupRecord> = response
            .json()
            .await
            .map_err(|e| CapacityError::SourceUnavailable(format!("decode groups: {e}")))?;
        debug!(count = records.len(), "listed groups");
        Ok(records.into_iter().map(GroupRecord::into_group).collect())
    }
}

#[async_trait]
impl CapacitySource for HttpInventory {
    async fn describe_subnet(&self, id: &str) -> CapacityResult<Subnet> {
        let url = format!("{}/v1/subnets/{id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CapacityError::SourceUnavailable(format!("describe {id}: {e}")))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CapacityError::SubnetNotFound(id.to_string()));
        }
        if !response.status().is_success() {
            return Err(CapacityError::SourceUnavailable(format!(
                "describe {id}: {}",
                response.status()
            )));
        }
        let record: SubnetRecord = response
            .json()
            .await
            .map_err(|e| CapacityError::SourceUnavailable(format!("decode {id}: {e}")))?;
        Ok(Subnet {
            id: record.subnet_id,
            available_addresses: record.available_ip_address_count,
        })
    }
}

// ── Config store client ────────────────────────────────────────────

/// Config API client.
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    /// Client against the given base URL.
    pub fn new(base_url: &str) -> CapacityResult<Self> {
        let client = build_client().map_err(|e| CapacityError::StoreLookupFailed {
            namespace: String::new(),
            name: String::new(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn config_url(&self, namespace: &str, name: &str) -> String {
        format!("{}/v1/configs/{namespace}/{name}", self.base_url)
    }

    async fn send_write(
        &self,
        request: reqwest::RequestBuilder,
        artifact: &ConfigArtifact,
    ) -> CapacityResult<()> {
        let write_failed = |reason: String| CapacityError::StoreWriteFailed {
            namespace: artifact.namespace.clone(),
            name: artifact.name.clone(),
            reason,
        };
        let body = ArtifactBody {
            data: artifact.data.clone(),
        };
        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| write_failed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(write_failed(response.status().to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for HttpStore {
    async fn get(&self, namespace: &str, name: &str) -> CapacityResult<Option<ConfigArtifact>> {
        let lookup_failed = |reason: String| CapacityError::StoreLookupFailed {
            namespace: namespace.to_string(),
            name: name.to_string(),
            reason,
        };
        let response = self
            .client
            .get(self.config_url(namespace, name))
            .send()
            .await
            .map_err(|e| lookup_failed(e.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(lookup_failed(response.status().to_string()));
        }
        let body: ArtifactBody = response
            .json()
            .await
            .map_err(|e| lookup_failed(e.to_string()))?;
        Ok(Some(ConfigArtifact::new(namespace, name, body.data)))
    }

    async fn create(&self, artifact: &ConfigArtifact) -> CapacityResult<()> {
        let request = self
            .client
            .post(self.config_url(&artifact.namespace, &artifact.name));
        self.send_write(request, artifact).await
    }

    async fn update(&self, artifact: &ConfigArtifact) -> CapacityResult<()> {
        let request = self
            .client
            .put(self.config_url(&artifact.namespace, &artifact.name));
        self.send_write(request, artifact).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_record_with_direct_template() {
        let record: GroupRecord = serde_json::from_str(
            r#"{
                "auto_scaling_group_name": "prod-workers",
                "launch_template_name": "lt-workers",
                "vpc_zone_identifier": "subnet-a,subnet-b"
            }"#,
        )
        .unwrap();
        let group = record.into_group();

        assert_eq!(group.name, "prod-workers");
        assert_eq!(
            group.template,
            TemplateRef::Direct {
                name: "lt-workers".to_string()
            }
        );
        assert_eq!(group.subnet_ids, vec!["subnet-a", "subnet-b"]);
    }

    #[test]
    fn group_record_with_mixed_instances_policy() {
        let record: GroupRecord = serde_json::from_str(
            r#"{
                "auto_scaling_group_name": "prod-spot",
                "mixed_instances_policy": {
                    "launch_template": { "launch_template_name": "lt-spot" }
                },
                "vpc_zone_identifier": "subnet-c"
            }"#,
        )
        .unwrap();
        let group = record.into_group();

        assert_eq!(
            group.template,
            TemplateRef::MixedInstances {
                policy: MixedInstancesPolicy {
                    launch_template: Some(LaunchTemplateSpec {
                        launch_template_name: Some("lt-spot".to_string()),
                    }),
                },
            }
        );
    }

    #[test]
    fn group_record_without_any_template_is_absent() {
        let record: GroupRecord = serde_json::from_str(
            r#"{ "auto_scaling_group_name": "broken" }"#,
        )
        .unwrap();
        let group = record.into_group();

        assert_eq!(group.template, TemplateRef::Absent);
        assert!(group.subnet_ids.is_empty());
    }

    #[test]
    fn base_url_is_trimmed() {
        let inv = HttpInventory::new("http://inventory.internal/").unwrap();
        assert_eq!(inv.base_url, "http://inventory.internal");
        let store = HttpStore::new("http://configs.internal///").unwrap();
        assert_eq!(store.config_url("ns", "cfg"), "http://configs.internal/v1/configs/ns/cfg");
    }
}
