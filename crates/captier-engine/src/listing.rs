//! Priority listing — tiers and their rendered text form.
//!
//! The rendered text is the exact body the cluster autoscaler's priority
//! expander consumes:
//!
//! ```text
//! 10:
//!   - workers-large
//! 8:
//!   - workers-small
//! 1:
//!   - .*
//! ```

use std::collections::HashMap;

use captier_core::PRIORITIES_KEY;

/// Score assigned to the wildcard catch-all tier.
pub const CATCH_ALL_SCORE: u64 = 1;

/// Wildcard entry matched by the downstream consumer's own regex engine.
/// Opaque text at this layer.
pub const CATCH_ALL_PATTERN: &str = ".*";

/// One priority tier: all groups sharing an exact capacity score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTier {
    pub score: u64,
    /// Group names, sorted lexicographically for stable output.
    pub names: Vec<String>,
}

/// Ordered tier listing, highest score (most preferred) first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityListing {
    pub tiers: Vec<PriorityTier>,
    /// Append the wildcard tier at the lowest explicit priority. Kept as
    /// a marker rather than a tier so it never merges with a computed
    /// score-1 tier.
    pub catch_all: bool,
}

impl PriorityListing {
    /// Listing with no computed tiers.
    pub fn empty(catch_all: bool) -> Self {
        Self {
            tiers: Vec::new(),
            catch_all,
        }
    }

    /// True when no group made it into any tier.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Render the listing body.
    ///
    /// Deterministic: tiers are already sorted descending and names
    /// sorted within each tier, so identical inputs yield byte-identical
    /// text. An empty listing renders as an empty (still valid) body.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for tier in &self.tiers {
            out.push_str(&format!("{}:\n", tier.score));
            for name in &tier.names {
                out.push_str(&format!("  - {name}\n"));
            }
        }
        if self.catch_all {
            out.push_str(&format!("{CATCH_ALL_SCORE}:\n"));
            out.push_str(&format!("  - {CATCH_ALL_PATTERN}\n"));
        }
        out
    }

    /// Wrap the rendered body as an artifact payload.
    pub fn into_payload(self) -> HashMap<String, String> {
        let mut data = HashMap::new();
        data.insert(PRIORITIES_KEY.to_string(), self.render());
        data
    }
}
