//! Per-group diff reconstruction.
//!
//! The staged diff of a file can come back empty even though the file is
//! part of the change: untracked files, or files deleted and restored with
//! identical content. For those a unified-diff-like block is synthesised
//! from the work tree content so the message generator still sees what the
//! file contains. The synthesised blocks are approximations and are not
//! meant to be applied as patches.
//!
//! The "recreated" case is detected only as "staged, but the diff is
//! empty"; other causes of an empty staged diff look the same.

use crate::constants::diff::{
    CONTENT_TRUNCATED_MARKER, PER_FILE_LIMIT, SYNTHESIZED_CONTENT_LIMIT, TOTAL_LIMIT,
    TOTAL_TRUNCATED_MARKER, TRUNCATED_MARKER,
};
use crate::git::GitOperations;
use crate::git::diff::{
    synthesize_new_file_diff, synthesize_recreated_file_diff, truncate_with_marker,
};

/// Builds the diff text for `files`.
///
/// Never fails: a file whose diff cannot be read is logged and left out.
/// Returns an empty string only when no file yields anything.
pub fn reconstruct_diff(repo: &dyn GitOperations, files: &[String]) -> String {
    let mut staged: Option<Vec<String>> = None;

    let parts: Vec<String> = files
        .iter()
        .filter_map(|file| file_contribution(repo, file, &mut staged))
        .collect();

    truncate_with_marker(&parts.join("\n"), TOTAL_LIMIT, TOTAL_TRUNCATED_MARKER)
}

fn file_contribution(
    repo: &dyn GitOperations,
    file: &str,
    staged: &mut Option<Vec<String>>,
) -> Option<String> {
    match repo.file_diff(file) {
        Ok(diff) if !diff.trim().is_empty() => {
            return Some(truncate_with_marker(&diff, PER_FILE_LIMIT, TRUNCATED_MARKER));
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!("Skipping {} in group diff: {}", file, e);
            return None;
        }
    }

    let content = match repo.read_worktree_file(file) {
        Ok(Some(content)) => content,
        Ok(None) => {
            tracing::debug!("{} has an empty diff and is not on disk", file);
            return None;
        }
        Err(e) => {
            tracing::warn!("Cannot read {}: {}", file, e);
            return None;
        }
    };
    let content = truncate_with_marker(&content, SYNTHESIZED_CONTENT_LIMIT, CONTENT_TRUNCATED_MARKER);

    if repo.is_untracked(file).unwrap_or_else(|e| {
        tracing::debug!("Status lookup failed for {}: {}", file, e);
        false
    }) {
        tracing::debug!("Synthesizing new-file diff for {}", file);
        return Some(synthesize_new_file_diff(file, &content));
    }

    if staged.is_none() {
        *staged = Some(repo.staged_files().unwrap_or_else(|e| {
            tracing::warn!("Cannot list staged files: {}", e);
            Vec::new()
        }));
    }
    let is_staged = staged
        .as_ref()
        .is_some_and(|list| list.iter().any(|s| s == file));

    if is_staged {
        tracing::debug!("Synthesizing recreated-file diff for {} (approximation)", file);
        return Some(synthesize_recreated_file_diff(file, &content));
    }

    None
}
