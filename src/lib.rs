//! # commit-wizard
//!
//! Generates commit messages for staged changes with an OpenAI-compatible
//! model and can split the staging area into several focused commits.
//!
//! ## Features
//! - **Single commit**: one message for everything staged
//! - **Manual split**: pick the files of each commit, one message per pick
//! - **Smart split**: the model groups the staged files; groups can be
//!   reviewed and edited before anything is committed
//! - **Scoped commits**: each commit touches exactly its own files
//! - **Analysis cache**: repeated grouping of the same changes is free
//!
//! ## Quick start
//! ```bash
//! git add .
//! commit-wizard                 # single commit
//! commit-wizard --smart-split   # grouped commits
//! commit-wizard --split -n      # manual split, dry run
//! ```
//!
//! ## As a library
//! ```ignore
//! use commit_wizard::config::AppConfig;
//! use commit_wizard::git::{GitOperations, repository::GitRepository};
//! use commit_wizard::llm::{MessageGenerator, provider::create_provider};
//!
//! # async fn example() -> commit_wizard::error::Result<()> {
//! let config = AppConfig::default();
//! let repo = GitRepository::open(None)?;
//! let provider = create_provider(&config.openai)?;
//! let generator = MessageGenerator::new(provider, &config);
//!
//! let files = repo.staged_files()?;
//! let suggestion = generator
//!     .generate_with_retry(&repo.staged_diff()?, &files, None)
//!     .await?;
//! println!("{}", suggestion.message);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//! - [`git`] - staging area access and scoped commits
//! - [`llm`] - provider trait, prompts, message generation and retry
//! - [`split`] - grouping engine, diff reconstruction, cache, group editor
//! - [`commands`] - the commit flow
//! - [`config`] - configuration loading and validation
//! - [`error`] - error types
//! - [`ui`] - terminal presentation
//!
//! ## Configuration
//! - Linux: `~/.config/commit-wizard/config.toml`
//! - macOS: `~/Library/Application Support/commit-wizard/config.toml`
//! - Windows: `%APPDATA%\commit-wizard\config\config.toml`
//! - Project (optional): `<repo>/.commit-wizard.toml`
//!
//! ```toml
//! language = "en"
//! commit_style = "conventional"
//!
//! [openai]
//! model = "gpt-4o-mini"
//!
//! [smart_split]
//! max_groups = 4
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod git;
pub mod llm;
pub mod split;
pub mod ui;
