//! Commit command options
//!
//! Resolved once from CLI flags and the configuration snapshot, then passed
//! to `commands::commit::run()`.
//!
//! # Example
//! ```
//! use commit_wizard::cli::Cli;
//! use commit_wizard::commands::options::{CommitOptions, SplitMode};
//! use commit_wizard::config::AppConfig;
//!
//! let cli = Cli { smart_split: true, auto: true, ..Default::default() };
//! let options = CommitOptions::from_cli(&cli, &AppConfig::default());
//! assert_eq!(options.split, SplitMode::Smart);
//! assert!(options.yes && options.silent);
//! ```

use super::scope_state_machine::RunMode;
use crate::cli::Cli;
use crate::config::AppConfig;

/// How staged files are turned into commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Everything staged goes into one commit.
    Single,
    /// The user picks the files of each commit.
    Manual,
    /// The grouping engine proposes the commits.
    Smart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOptions {
    /// Only errors are printed
    pub silent: bool,

    /// Commit without asking
    pub yes: bool,

    /// Generate messages only
    pub dry_run: bool,

    pub split: SplitMode,

    /// `--smart-split` was asked for while `smart_split.enabled = false`
    pub smart_split_disabled: bool,

    pub verbose: bool,
}

impl CommitOptions {
    /// Resolves the effective options.
    ///
    /// `--auto` implies `--yes` and `--silent`. `--smart-split` wins over
    /// `--split` and `split_commits`, unless smart split is disabled in the
    /// configuration, in which case manual split is used instead.
    pub fn from_cli(cli: &Cli, config: &AppConfig) -> Self {
        let smart_split_disabled = cli.smart_split && !config.smart_split.enabled;

        let split = if cli.smart_split && config.smart_split.enabled {
            SplitMode::Smart
        } else if cli.smart_split || cli.split || config.split_commits {
            SplitMode::Manual
        } else {
            SplitMode::Single
        };

        Self {
            silent: cli.silent || cli.auto,
            yes: cli.yes || cli.auto,
            dry_run: cli.dry_run || config.dry_run,
            split,
            smart_split_disabled,
            verbose: cli.verbose,
        }
    }

    pub fn run_mode(&self) -> RunMode {
        if self.dry_run {
            RunMode::DryRun
        } else if self.yes {
            RunMode::Automatic
        } else {
            RunMode::Interactive
        }
    }
}
