//! Smart split configuration.

use serde::{Deserialize, Serialize};

/// Smart split thresholds.
///
/// # Example
/// ```toml
/// [smart_split]
/// enabled = true
/// min_group_size = 1
/// max_groups = 5
/// confidence_threshold = 0.7
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmartSplitConfig {
    /// When `false`, `--smart-split` falls back to manual split.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Groups with fewer files are folded into another group.
    #[serde(default = "default_min_group_size")]
    pub min_group_size: usize,

    /// Hard ceiling on the number of groups, `1..=10`.
    #[serde(default = "default_max_groups")]
    pub max_groups: usize,

    /// Groups scoring below this are flagged for review.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

impl Default for SmartSplitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_group_size: default_min_group_size(),
            max_groups: default_max_groups(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

impl SmartSplitConfig {
    pub(crate) fn collect_errors(&self, errors: &mut Vec<String>) {
        if self.min_group_size < 1 {
            errors.push("smart_split.min_group_size must be at least 1".to_string());
        }
        if !(1..=10).contains(&self.max_groups) {
            errors.push(format!(
                "smart_split.max_groups must be between 1 and 10 (got {})",
                self.max_groups
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            errors.push(format!(
                "smart_split.confidence_threshold must be between 0 and 1 (got {})",
                self.confidence_threshold
            ));
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_group_size() -> usize {
    1
}

fn default_max_groups() -> usize {
    5
}

fn default_confidence_threshold() -> f64 {
    0.7
}
