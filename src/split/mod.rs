//! Smart split: grouping staged files into logical commits.
//!
//! - [`grouping`] asks the LLM classifier for a partition and repairs it
//! - [`cache`] memoises classifications per content fingerprint
//! - [`reconstruct`] rebuilds a diff per group, synthesising one for new files
//! - [`editor`] applies user edits to a partition

pub mod cache;
pub mod editor;
pub mod grouping;
pub mod reconstruct;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use cache::{AnalysisCache, CacheStats, Clock, SystemClock};
pub use editor::{EditCommand, EditorState, GroupEditor};
pub use grouping::GroupingEngine;
pub use reconstruct::reconstruct_diff;

/// A set of files committed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileGroup {
    /// Unique within one partition.
    pub id: String,
    pub name: String,
    pub description: String,
    /// Repository-relative paths, disjoint from every other group.
    pub files: Vec<String>,
    /// Reconstructed diff; empty until [`reconstruct_diff`] runs.
    #[serde(default)]
    pub diff: String,
    /// Heuristic score in `[0, 1]`.
    pub confidence: f64,
}

impl FileGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            files,
            diff: String::new(),
            confidence: 1.0,
        }
    }

    pub fn is_low_confidence(&self, threshold: f64) -> bool {
        self.confidence < threshold
    }
}

/// Hands out `group-<n>` ids that do not collide with ids already taken.
#[derive(Debug, Default)]
pub struct GroupIdAllocator {
    taken: HashSet<String>,
}

impl GroupIdAllocator {
    pub fn with_taken<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            taken: ids.into_iter().map(str::to_string).collect(),
        }
    }

    /// Reserves `id` if free.
    pub fn claim(&mut self, id: &str) -> bool {
        self.taken.insert(id.to_string())
    }

    /// Lowest unused `group-<n>`, n starting at 1.
    pub fn next_id(&mut self) -> String {
        let mut n = 1;
        loop {
            let candidate = format!("group-{}", n);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Removes repeated paths, keeping the first occurrence.
pub fn dedup_paths(files: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    files
        .iter()
        .filter(|f| seen.insert(f.as_str()))
        .cloned()
        .collect()
}
