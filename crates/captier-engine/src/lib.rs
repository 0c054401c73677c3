//! captier-engine — capacity evaluation and priority tiering.
//!
//! Turns a fleet of auto-scaling groups into a priority listing for the
//! cluster autoscaler:
//!
//! ```text
//! TieringEngine
//!   ├── GroupSource (list the fleet)
//!   ├── name/template substring filters
//!   ├── resolver (group → launch template name)
//!   ├── capacity (sum free addresses across the group's subnets)
//!   └── PriorityListing (tiers descending by score, rendered text)
//! ```
//!
//! Per-group failures (missing template reference, failed subnet lookup)
//! exclude that group from the cycle and are counted in [`EvalStats`];
//! only a failed fleet listing aborts the whole evaluation.

pub mod capacity;
pub mod listing;
pub mod resolver;
pub mod tiering;

pub use capacity::aggregate_capacity;
pub use listing::{PriorityListing, PriorityTier, CATCH_ALL_PATTERN, CATCH_ALL_SCORE};
pub use resolver::resolve_template;
pub use tiering::{EvalStats, Evaluation, TieringEngine};
