pub mod commit;
pub mod diff;
pub mod repository;

use serde::Serialize;

use crate::error::Result;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Git status collector.
///
/// Everything the commit flow reads from or writes to the repository goes
/// through this trait, so the orchestrator can run against a mock.
///
/// Paths are repository-relative and use `/` as separator.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait GitOperations {
    /// Whether the index differs from `HEAD`.
    fn has_staged_changes(&self) -> Result<bool>;

    /// Staged paths, in the order git reports them.
    fn staged_files(&self) -> Result<Vec<String>>;

    /// Unified diff of all staged changes.
    fn staged_diff(&self) -> Result<String>;

    /// Unified diff of the staged changes to a single path.
    ///
    /// Returns an empty string when git sees no textual change for the path.
    fn file_diff(&self, path: &str) -> Result<String>;

    /// Whether `git status` reports the path as untracked (`??`).
    fn is_untracked(&self, path: &str) -> Result<bool>;

    /// Current work tree content of a file, `None` if it is not a regular file.
    fn read_worktree_file(&self, path: &str) -> Result<Option<String>>;

    /// Files, insertions and deletions of the staged diff.
    fn diff_stats(&self) -> Result<DiffStats>;

    /// Commits everything that is staged. Returns the new `HEAD` hash.
    fn commit(&self, message: &str) -> Result<String>;

    /// Commits exactly `paths`, leaving other staged changes in the index.
    /// Returns the new `HEAD` hash.
    fn commit_paths(&self, paths: &[String], message: &str) -> Result<String>;

    /// Hash of `HEAD`.
    fn head_hash(&self) -> Result<String>;
}

/// Diff statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffStats {
    pub files_changed: Vec<String>,
    pub insertions: usize,
    pub deletions: usize,
}

/// Snapshot of the staging area at the start of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GitStatus {
    pub has_staged: bool,
    pub staged_files: Vec<String>,
    pub diff: String,
}

/// Reads the staged file list and combined diff in one go.
///
/// Neither is requested when nothing is staged.
pub fn collect_status(repo: &dyn GitOperations) -> Result<GitStatus> {
    if !repo.has_staged_changes()? {
        return Ok(GitStatus::default());
    }

    let staged_files = repo.staged_files()?;
    let diff = repo.staged_diff()?;
    Ok(GitStatus {
        has_staged: true,
        staged_files,
        diff: diff.trim().to_string(),
    })
}
