//! Evaluation configuration.
//!
//! Passed explicitly into the engine so evaluation is a pure function of
//! its inputs; the daemon owns mapping flags and environment variables
//! into this value.

/// Knobs for one evaluation cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvalConfig {
    /// Keep only groups whose name contains this substring. Empty keeps all.
    pub name_filter: String,
    /// Keep only groups whose launch template name contains this substring.
    /// Empty keeps all.
    pub template_filter: String,
    /// Append the wildcard catch-all tier at the lowest priority.
    pub include_catch_all: bool,
}

impl EvalConfig {
    /// True when the group name passes the name filter.
    pub fn matches_name(&self, name: &str) -> bool {
        name.contains(&self.name_filter)
    }

    /// True when the template name passes the template filter.
    pub fn matches_template(&self, template: &str) -> bool {
        template.contains(&self.template_filter)
    }
}
