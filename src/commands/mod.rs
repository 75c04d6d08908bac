//! Command implementations.
//!
//! # Architecture
//! ```text
//! CLI (cli.rs) ─> options.rs ─> commit.rs ─┬─> split (grouping, reconstruction, cache)
//!                                          ├─> scope_state_machine.rs
//!                                          └─> ui::Presenter
//! ```

/// Commit flow: single commit, manual split and smart split.
pub mod commit;
/// Command options resolved from the CLI and configuration.
pub mod options;
/// Per-scope commit state machine.
pub mod scope_state_machine;

pub use commit::{RunOutcome, run, run_with_deps};
pub use options::{CommitOptions, SplitMode};
