//! Per-scope commit state machine
//!
//! One scope is the file set of a single commit: a smart-split group, a
//! manual selection, or everything staged. Transitions are pure; prompts,
//! LLM calls and git commands happen in `commands/commit.rs`.
//!
//! # State transition diagram
//! ```text
//! Generating ──> Presenting ──> Committing ──> Done(Committed | Failed)
//!     │              │
//!     │              ├──> Presenting (edit cancelled)
//!     │              ├──> Done(Copied)
//!     │              └──> Done(Cancelled)
//!     ├──> Committing            (automatic mode)
//!     ├──> Done(DryRun)          (dry-run mode)
//!     └──> Done(Failed)          (generation failed)
//! ```
//!
//! # Usage example
//! ```
//! use commit_wizard::commands::scope_state_machine::{
//!     RunMode, ScopeOutcome, ScopeState, UserAction,
//! };
//!
//! # fn main() -> commit_wizard::error::Result<()> {
//! let state = ScopeState::Generating
//!     .handle_generation(Ok("feat: add login".to_string()), RunMode::Interactive)?;
//! let state = state.handle_action(UserAction::Commit)?;
//! let state = state.handle_commit(Ok("abc1234".to_string()))?;
//! assert_eq!(
//!     state,
//!     ScopeState::Done(ScopeOutcome::Committed {
//!         hash: "abc1234".to_string(),
//!         message: "feat: add login".to_string(),
//!     })
//! );
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, WizardError};

/// How a run treats generated messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Show the message, never commit.
    DryRun,
    /// Commit the generated message without asking (`--yes`).
    Automatic,
    /// Ask the user for every scope.
    Interactive,
}

/// Terminal result of one scope.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeOutcome {
    Committed { hash: String, message: String },
    DryRun { message: String },
    /// The message was handed over for manual use; the run ends.
    Copied { message: String },
    /// The user cancelled; no further scope is processed.
    Cancelled,
    /// Generation or the commit itself failed.
    Failed { reason: String },
    /// No diff could be produced for the scope.
    Skipped,
}

impl ScopeOutcome {
    /// Whether the run should stop after this scope.
    pub fn ends_run(&self) -> bool {
        matches!(self, ScopeOutcome::Copied { .. } | ScopeOutcome::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScopeState {
    Generating,
    /// Waiting for the user to decide what to do with `message`.
    Presenting { message: String },
    Committing { message: String },
    Done(ScopeOutcome),
}

/// User decision while in [`ScopeState::Presenting`].
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Commit,
    /// Commit with a hand-edited message.
    Edit { new_message: String },
    /// The user backed out of the editor.
    EditCancelled,
    Copy,
    Cancel,
}

impl ScopeState {
    pub fn is_done(&self) -> bool {
        matches!(self, ScopeState::Done(_))
    }

    /// Consumes the result of `generate_with_retry`.
    ///
    /// A generation failure ends the scope as [`ScopeOutcome::Failed`]
    /// instead of failing the whole run.
    pub fn handle_generation(self, result: Result<String>, mode: RunMode) -> Result<Self> {
        match self {
            ScopeState::Generating => Ok(match result {
                Err(WizardError::UserCancelled) => ScopeState::Done(ScopeOutcome::Cancelled),
                Err(e) => ScopeState::Done(ScopeOutcome::Failed {
                    reason: e.to_string(),
                }),
                Ok(message) => match mode {
                    RunMode::DryRun => ScopeState::Done(ScopeOutcome::DryRun { message }),
                    RunMode::Automatic => ScopeState::Committing { message },
                    RunMode::Interactive => ScopeState::Presenting { message },
                },
            }),
            other => Err(WizardError::InvalidInput(format!(
                "handle_generation called in wrong state: {:?}",
                other
            ))),
        }
    }

    pub fn handle_action(self, action: UserAction) -> Result<Self> {
        match self {
            ScopeState::Presenting { message } => Ok(match action {
                UserAction::Commit => ScopeState::Committing { message },
                UserAction::Edit { new_message } => ScopeState::Committing {
                    message: new_message,
                },
                UserAction::EditCancelled => ScopeState::Presenting { message },
                UserAction::Copy => ScopeState::Done(ScopeOutcome::Copied { message }),
                UserAction::Cancel => ScopeState::Done(ScopeOutcome::Cancelled),
            }),
            other => Err(WizardError::InvalidInput(format!(
                "handle_action called in wrong state: {:?}",
                other
            ))),
        }
    }

    /// Consumes the result of the scoped commit (`Ok` carries the new hash).
    pub fn handle_commit(self, result: Result<String>) -> Result<Self> {
        match self {
            ScopeState::Committing { message } => Ok(ScopeState::Done(match result {
                Ok(hash) => ScopeOutcome::Committed { hash, message },
                Err(e) => ScopeOutcome::Failed {
                    reason: e.to_string(),
                },
            })),
            other => Err(WizardError::InvalidInput(format!(
                "handle_commit called in wrong state: {:?}",
                other
            ))),
        }
    }
}
