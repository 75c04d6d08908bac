//! The seam between the commit flow and the terminal.
//!
//! The orchestrator hands plain data to a [`Presenter`] and gets back
//! closed enums; it never touches prompts directly.

use crate::error::{Result, WizardError};
use crate::llm::CommitSuggestion;
use crate::split::FileGroup;

use super::spinner::Spinner;

/// Answer to "commit these groups?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitChoice {
    Proceed,
    /// Adjust the groups, then ask again.
    Edit,
    /// Drop the groups and pick files by hand.
    Manual,
    Cancel,
}

/// Answer to a generated message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAction {
    Commit,
    Edit,
    /// Hand the message over for manual use and end the run.
    Copy,
    /// Stop here; later scopes are not processed.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Info,
    Success,
    Warning,
    Error,
}

/// Outcome of one commit attempt, as shown to the user.
#[derive(Debug)]
pub enum CommitReport<'a> {
    Committed { hash: &'a str, message: &'a str },
    Failed { error: &'a WizardError },
}

/// User interaction used by the commit flow.
pub trait Presenter {
    /// Lists the proposed groups; those below `confidence_threshold` are flagged.
    fn show_groups(&mut self, groups: &[FileGroup], confidence_threshold: f64);

    fn choose_split_mode(&mut self, groups: &[FileGroup]) -> Result<SplitChoice>;

    /// Lets the user reshape the groups. Must return a partition of the
    /// same files.
    fn edit_groups(&mut self, groups: Vec<FileGroup>) -> Result<Vec<FileGroup>>;

    /// Picks the next file subset in manual split mode.
    fn select_files(&mut self, files: &[String]) -> Result<Vec<String>>;

    fn review_message(&mut self, scope: &str, suggestion: &CommitSuggestion) -> Result<MessageAction>;

    /// Returns the edited message, or `None` if the user backed out.
    fn edit_message(&mut self, original: &str) -> Result<Option<String>>;

    /// Puts the message on the clipboard. `Ok(false)` when the clipboard
    /// was unavailable and the message was shown for manual copying instead.
    fn copy_message(&mut self, message: &str) -> Result<bool>;

    /// Asked between scopes; `false` stops the run.
    fn confirm_continue(&mut self, remaining: usize) -> Result<bool>;

    fn show_dry_run(&mut self, scope: &str, suggestion: &CommitSuggestion);

    fn show_commit_result(&mut self, scope: &str, report: CommitReport<'_>);

    fn notify(&mut self, level: Notice, message: &str);

    /// Spinner for a remote call; `None` when nothing should be drawn.
    fn progress(&mut self, message: &str) -> Option<Spinner>;
}
