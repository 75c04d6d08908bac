use std::io::Write;
use std::path::{Path, PathBuf};

use git2::{Diff, DiffOptions, ErrorCode, Repository, Status};

use crate::error::{Result, WizardError};
use crate::git::{DiffStats, GitOperations};

/// [`GitOperations`] backed by libgit2 for reads and the git CLI for commits.
pub struct GitRepository {
    repo: Repository,
    workdir: PathBuf,
}

impl GitRepository {
    /// Discovers the repository containing `path` (the current directory
    /// when `None`).
    ///
    /// Fails with [`WizardError::NotARepository`] outside a repository or
    /// for bare repositories.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let start = path.unwrap_or_else(|| Path::new("."));
        let repo = Repository::discover(start).map_err(|e| match e.code() {
            ErrorCode::NotFound => WizardError::NotARepository,
            _ => WizardError::Git(e),
        })?;
        let workdir = repo
            .workdir()
            .ok_or(WizardError::NotARepository)?
            .to_path_buf();

        tracing::debug!("Opened repository at {}", workdir.display());
        Ok(Self { repo, workdir })
    }

    /// Work tree root.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn is_empty(&self) -> Result<bool> {
        match self.repo.head() {
            Ok(_) => Ok(false),
            Err(e) if e.code() == ErrorCode::UnbornBranch => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    /// `HEAD` tree against the index, optionally limited to one path.
    fn staged_git_diff(&self, pathspec: Option<&str>) -> Result<Diff<'_>> {
        let mut index = self.repo.index()?;
        // commits made through the CLI rewrite the index behind libgit2's back
        index.read(false)?;

        let mut opts = DiffOptions::new();
        if let Some(path) = pathspec {
            opts.pathspec(path).disable_pathspec_match(true);
        }

        let head_tree = if self.is_empty()? {
            None
        } else {
            Some(self.repo.head()?.peel_to_tree()?)
        };

        Ok(self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut opts))?)
    }

    fn diff_to_string(diff: &Diff) -> Result<String> {
        let mut output = Vec::new();
        diff.print(git2::DiffFormat::Patch, |_delta, _hunk, line| {
            let origin = line.origin();
            if matches!(origin, '+' | '-' | ' ') {
                let _ = output.write_all(&[origin as u8]);
            }
            let _ = output.write_all(line.content());
            true
        })?;
        Ok(String::from_utf8_lossy(&output).to_string())
    }
}

impl GitOperations for GitRepository {
    fn has_staged_changes(&self) -> Result<bool> {
        Ok(self.staged_git_diff(None)?.deltas().len() > 0)
    }

    fn staged_files(&self) -> Result<Vec<String>> {
        let diff = self.staged_git_diff(None)?;
        let files = diff
            .deltas()
            .filter_map(|delta| {
                delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        Ok(files)
    }

    fn staged_diff(&self) -> Result<String> {
        Self::diff_to_string(&self.staged_git_diff(None)?)
    }

    fn file_diff(&self, path: &str) -> Result<String> {
        Self::diff_to_string(&self.staged_git_diff(Some(path))?)
    }

    fn is_untracked(&self, path: &str) -> Result<bool> {
        match self.repo.status_file(Path::new(path)) {
            Ok(status) => Ok(status == Status::WT_NEW),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn read_worktree_file(&self, path: &str) -> Result<Option<String>> {
        let full_path = self.workdir.join(path);
        if !full_path.is_file() {
            return Ok(None);
        }
        let bytes = std::fs::read(&full_path)?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn diff_stats(&self) -> Result<DiffStats> {
        Ok(crate::git::diff::parse_diff_stats(&self.staged_diff()?))
    }

    fn commit(&self, message: &str) -> Result<String> {
        crate::git::commit::commit_changes(&self.workdir, message, &[])?;
        self.head_hash()
    }

    fn commit_paths(&self, paths: &[String], message: &str) -> Result<String> {
        if paths.is_empty() {
            return Err(WizardError::InvalidInput(
                "a scoped commit needs at least one path".to_string(),
            ));
        }
        crate::git::commit::commit_changes(&self.workdir, message, paths)?;
        self.head_hash()
    }

    fn head_hash(&self) -> Result<String> {
        crate::git::commit::rev_parse_head(&self.workdir)
    }
}
