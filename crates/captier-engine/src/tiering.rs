//! Priority tiering engine.
//!
//! Orchestrates one evaluation cycle: list the fleet, filter by name and
//! template substring, score each surviving group, and bucket groups
//! into tiers keyed by exact score.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use captier_core::{CapacityResult, CapacitySource, EvalConfig, GroupSource};

use crate::capacity::aggregate_capacity;
use crate::listing::{PriorityListing, PriorityTier};
use crate::resolver::resolve_template;

/// Per-cycle observability counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalStats {
    /// Groups returned by the source.
    pub discovered: usize,
    /// Groups that passed both filters and were scored.
    pub scored: usize,
    /// Groups rejected by the name or template filter.
    pub rejected_by_filter: usize,
    /// Malformed groups without a template reference.
    pub missing_template: usize,
    /// Groups excluded because a subnet lookup failed.
    pub capacity_failures: usize,
}

/// Result of one evaluation cycle.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub listing: PriorityListing,
    pub stats: EvalStats,
}

/// Evaluates the fleet and produces the priority listing.
pub struct TieringEngine {
    groups: Arc<dyn GroupSource>,
    capacity: Arc<dyn CapacitySource>,
}

impl TieringEngine {
    /// Create an engine over the given sources.
    pub fn new(groups: Arc<dyn GroupSource>, capacity: Arc<dyn CapacitySource>) -> Self {
        Self { groups, capacity }
    }

    /// Run one evaluation cycle.
    ///
    /// A failed fleet listing aborts the cycle. Per-group failures
    /// (missing template reference, failed subnet lookup) exclude that
    /// group, emit a warning, and are tallied in [`EvalStats`]; every
    /// group that passes both filters and scores successfully appears in
    /// exactly one tier.
    pub async fn evaluate(&self, cfg: &EvalConfig) -> CapacityResult<Evaluation> {
        let groups = self.groups.list_groups().await?;

        let mut stats = EvalStats {
            discovered: groups.len(),
            ..EvalStats::default()
        };
        let mut buckets: BTreeMap<u64, Vec<String>> = BTreeMap::new();

        for group in &groups {
            if !cfg.matches_name(&group.name) {
                stats.rejected_by_filter += 1;
                continue;
            }

            let template = match resolve_template(group) {
                Ok(t) => t,
                Err(e) => {
                    warn!(group = %group.name, error = %e, "skipping malformed group");
                    stats.missing_template += 1;
                    continue;
                }
            };

            if !cfg.matches_template(template) {
                stats.rejected_by_filter += 1;
                continue;
            }

            let score = match aggregate_capacity(self.capacity.as_ref(), &group.subnet_ids).await {
                Ok(s) => s,
                Err(e) => {
                    warn!(
                        group = %group.name,
                        error = %e,
                        "subnet lookup failed, excluding group from this cycle"
                    );
                    stats.capacity_failures += 1;
                    continue;
                }
            };

            debug!(group = %group.name, template = %template, score, "scored group");
            buckets.entry(score).or_default().push(group.name.clone());
            stats.scored += 1;
        }

        // BTreeMap iterates ascending; reverse for highest-score-first.
        let tiers = buckets
            .into_iter()
            .rev()
            .map(|(score, mut names)| {
                names.sort();
                PriorityTier { score, names }
            })
            .collect();

        Ok(Evaluation {
            listing: PriorityListing {
                tiers,
                catch_all: cfg.include_catch_all,
            },
            stats,
        })
    }
}
