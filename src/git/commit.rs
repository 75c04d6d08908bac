use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{Result, WizardError};

/// Locates the `git` executable.
fn git_binary() -> Result<PathBuf> {
    which::which("git")
        .map_err(|_| WizardError::GitCommand("git executable not found in PATH".to_string()))
}

/// Runs `git <args>` inside `workdir`.
///
/// Arguments are passed as a vector, never through a shell, so messages and
/// paths containing quotes or spaces reach git untouched.
fn run_git(workdir: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new(git_binary()?)
        .current_dir(workdir)
        .args(args)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let error_msg = if stderr.trim().is_empty() {
            // some git errors land on stdout
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(WizardError::GitCommand(error_msg));
    }

    Ok(output)
}

/// Builds the argument vector of a commit.
///
/// An empty `paths` commits the whole index. Otherwise the paths follow `--`
/// and git commits only those paths.
pub fn commit_args<'a>(message: &'a str, paths: &'a [String]) -> Vec<&'a str> {
    let mut args = vec!["commit", "-m", message];
    if !paths.is_empty() {
        args.push("--");
        args.extend(paths.iter().map(String::as_str));
    }
    args
}

/// Executes `git commit`, scoped to `paths` when non-empty.
///
/// The git CLI is used instead of git2 so hooks, signing and the user's git
/// config all apply.
pub fn commit_changes(workdir: &Path, message: &str, paths: &[String]) -> Result<()> {
    tracing::debug!("git commit ({} scoped paths)", paths.len());
    run_git(workdir, &commit_args(message, paths))?;
    Ok(())
}

/// `git rev-parse HEAD`
pub fn rev_parse_head(workdir: &Path) -> Result<String> {
    let output = run_git(workdir, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
