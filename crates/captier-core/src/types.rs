//! Domain types for capacity evaluation.
//!
//! An [`AutoScalingGroup`] is an immutable snapshot taken at the start of
//! an evaluation cycle; subnets are looked up fresh every cycle because
//! free-address counts drift between runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Subnet identifier as reported by the cloud provider.
pub type SubnetId = String;

/// Payload key under which the rendered priority listing is stored.
pub const PRIORITIES_KEY: &str = "priorities";

/// Default artifact name consumed by the cluster autoscaler.
pub const PRIORITY_EXPANDER_NAME: &str = "cluster-autoscaler-priority-expander";

// ── Auto-scaling group ─────────────────────────────────────────────

/// Snapshot of one auto-scaling group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutoScalingGroup {
    /// Group name, unique within a region.
    pub name: String,
    /// How this group references its launch template.
    pub template: TemplateRef,
    /// Subnets the group spans, in provider order.
    pub subnet_ids: Vec<SubnetId>,
}

impl AutoScalingGroup {
    /// Split the provider's comma-joined subnet field into ids.
    ///
    /// Whitespace around entries is trimmed and empty entries dropped, so
    /// `""` and `"a,,b"` behave sensibly.
    pub fn split_subnet_ids(joined: &str) -> Vec<SubnetId> {
        joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Launch template reference carried by a group.
///
/// Providers report either a direct template name or one nested inside a
/// mixed-instances policy. Records with neither do occur; they are
/// malformed and must be handled, not dereferenced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateRef {
    /// Direct launch template name.
    Direct { name: String },
    /// Template reference nested in a mixed-instances policy.
    MixedInstances { policy: MixedInstancesPolicy },
    /// No template reference at all (malformed record).
    Absent,
}

/// Mixed-instances policy; only the launch template path matters here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MixedInstancesPolicy {
    pub launch_template: Option<LaunchTemplateSpec>,
}

/// Launch template specification inside a mixed-instances policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LaunchTemplateSpec {
    pub launch_template_name: Option<String>,
}

// ── Subnet ─────────────────────────────────────────────────────────

/// Point-in-time view of one subnet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subnet {
    pub id: SubnetId,
    /// Unassigned addresses currently available.
    pub available_addresses: u64,
}

// ── Config artifact ────────────────────────────────────────────────

/// Declarative-store object holding the rendered priority listing.
///
/// Identity is the `(namespace, name)` pair; the payload is replaced
/// wholesale on every reconcile, never merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigArtifact {
    pub namespace: String,
    pub name: String,
    pub data: HashMap<String, String>,
}

impl ConfigArtifact {
    /// Build an artifact holding the given payload.
    pub fn new(namespace: &str, name: &str, data: HashMap<String, String>) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_subnet_ids_handles_plain_list() {
        assert_eq!(
            AutoScalingGroup::split_subnet_ids("subnet-a,subnet-b,subnet-c"),
            vec!["subnet-a", "subnet-b", "subnet-c"]
        );
    }

    #[test]
    fn split_subnet_ids_trims_and_drops_empties() {
        assert_eq!(
            AutoScalingGroup::split_subnet_ids(" subnet-a, ,subnet-b,"),
            vec!["subnet-a", "subnet-b"]
        );
        assert!(AutoScalingGroup::split_subnet_ids("").is_empty());
        assert!(AutoScalingGroup::split_subnet_ids("  ").is_empty());
    }
}
