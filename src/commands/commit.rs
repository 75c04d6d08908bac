use std::io::IsTerminal;

use crate::commands::options::{CommitOptions, SplitMode};
use crate::commands::scope_state_machine::{ScopeOutcome, ScopeState, UserAction};
use crate::config::AppConfig;
use crate::constants::diff::TRUNCATED_MARKER;
use crate::error::{Result, WizardError};
use crate::git::diff::truncate_with_marker;
use crate::git::{GitOperations, collect_status, repository::GitRepository};
use crate::llm::provider::create_provider;
use crate::llm::{CommitSuggestion, MessageGenerator, ProgressReporter};
use crate::split::{AnalysisCache, FileGroup, GroupingEngine, reconstruct_diff};
use crate::ui::{
    CommitReport, MessageAction, Notice, Presenter, SplitChoice, TerminalPresenter,
    format_diff_stats,
};

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Nothing was staged; not an error.
    NothingStaged,
    /// The user cancelled before any scope was processed.
    Cancelled,
    /// Outcome of every processed scope, in order.
    Finished(Vec<ScopeOutcome>),
}

impl RunOutcome {
    /// Hashes of the commits created during the run.
    pub fn commit_hashes(&self) -> Vec<&str> {
        match self {
            RunOutcome::Finished(outcomes) => outcomes
                .iter()
                .filter_map(|o| match o {
                    ScopeOutcome::Committed { hash, .. } => Some(hash.as_str()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Which files a commit may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitScope {
    /// Everything staged.
    All,
    /// Exactly the scope's files.
    Paths,
}

/// A unit of work: one message, one commit.
struct Scope<'s> {
    label: String,
    files: &'s [String],
    diff: String,
    commit_scope: CommitScope,
}

/// Runs the commit command against the repository at `repo`.
pub async fn run(options: &CommitOptions, config: &AppConfig, repo: &GitRepository) -> Result<RunOutcome> {
    let colored = std::io::stdout().is_terminal();
    let provider = create_provider(&config.openai)?;

    let generator = MessageGenerator::new(provider.clone(), config);
    let engine = match options.split {
        SplitMode::Smart => Some(GroupingEngine::new(provider, config)),
        _ => None,
    };
    let mut presenter = TerminalPresenter::new(colored, options.silent);
    let mut cache = AnalysisCache::new(&config.cache);

    run_with_deps(
        options,
        config,
        repo as &dyn GitOperations,
        &generator,
        engine.as_ref(),
        &mut presenter,
        &mut cache,
    )
    .await
}

/// Runs the commit command with injected collaborators.
///
/// `engine` is only consulted in [`SplitMode::Smart`]; passing `None` there
/// is an [`WizardError::InvalidInput`].
pub async fn run_with_deps(
    options: &CommitOptions,
    config: &AppConfig,
    repo: &dyn GitOperations,
    generator: &MessageGenerator,
    engine: Option<&GroupingEngine>,
    presenter: &mut dyn Presenter,
    cache: &mut AnalysisCache,
) -> Result<RunOutcome> {
    let status = collect_status(repo)?;
    if !status.has_staged {
        let reason = WizardError::NoStagedChanges;
        presenter.notify(
            Notice::Warning,
            &format!("{}. {}", reason, reason.suggestion().unwrap_or_default()),
        );
        return Ok(RunOutcome::NothingStaged);
    }

    let mut stats = repo.diff_stats()?;
    if stats.files_changed.is_empty() {
        stats.files_changed = status.staged_files.clone();
    }
    presenter.notify(
        Notice::Info,
        &format!("Staged: {}", format_diff_stats(&stats, false)),
    );

    if options.smart_split_disabled {
        presenter.notify(
            Notice::Warning,
            "Smart split is disabled in the configuration; choosing files manually.",
        );
    }

    let mut flow = Flow {
        options,
        repo,
        generator,
        presenter,
    };

    let outcome = match options.split {
        SplitMode::Single => {
            let diff = truncate_with_marker(&status.diff, config.prompt.max_diff_size, TRUNCATED_MARKER);
            let scope = Scope {
                label: "staged changes".to_string(),
                files: &status.staged_files,
                diff,
                commit_scope: CommitScope::All,
            };
            let outcome = flow.process_scope(&scope, true).await?;
            RunOutcome::Finished(vec![outcome])
        }
        SplitMode::Manual => flow.run_manual(&status.staged_files).await?,
        SplitMode::Smart => {
            let engine = engine.ok_or_else(|| {
                WizardError::InvalidInput("smart split requires a grouping engine".to_string())
            })?;
            flow.run_smart(engine, config, &status.staged_files, &status.diff, cache)
                .await?
        }
    };

    let created = outcome.commit_hashes().len();
    if created > 0 {
        flow.presenter
            .notify(Notice::Success, &format!("{} commit(s) created.", created));
    }
    Ok(outcome)
}

struct Flow<'a> {
    options: &'a CommitOptions,
    repo: &'a dyn GitOperations,
    generator: &'a MessageGenerator,
    presenter: &'a mut dyn Presenter,
}

impl Flow<'_> {
    async fn run_smart(
        &mut self,
        engine: &GroupingEngine,
        config: &AppConfig,
        files: &[String],
        diff: &str,
        cache: &mut AnalysisCache,
    ) -> Result<RunOutcome> {
        let spinner = self
            .presenter
            .progress(&format!("Grouping {} file(s)...", files.len()));
        let grouped = engine.group(files, diff, cache).await;
        drop(spinner);

        let mut groups = grouped?;
        tracing::debug!("Grouping produced {} group(s)", groups.len());

        if !self.options.silent {
            self.presenter
                .notify(Notice::Success, &format!("{} group(s) identified:", groups.len()));
            self.presenter
                .show_groups(&groups, config.smart_split.confidence_threshold);
        }

        if !self.options.yes && !self.options.silent {
            loop {
                let choice = match self.presenter.choose_split_mode(&groups) {
                    Err(WizardError::UserCancelled) => SplitChoice::Cancel,
                    other => other?,
                };
                match choice {
                    SplitChoice::Proceed => break,
                    SplitChoice::Edit => {
                        groups = self.presenter.edit_groups(groups)?;
                        self.presenter
                            .show_groups(&groups, config.smart_split.confidence_threshold);
                    }
                    SplitChoice::Manual => return self.run_manual(files).await,
                    SplitChoice::Cancel => {
                        self.presenter.notify(Notice::Warning, "Cancelled by user.");
                        return Ok(RunOutcome::Cancelled);
                    }
                }
            }
        }

        let mut outcomes = Vec::with_capacity(groups.len());
        let total = groups.len();
        for (idx, group) in groups.iter().enumerate() {
            self.presenter.notify(
                Notice::Info,
                &format!("Processing group {}/{}: {}", idx + 1, total, group.name),
            );
            let outcome = self.process_group(group).await?;
            let stop = outcome.ends_run();
            outcomes.push(outcome);
            if stop {
                break;
            }

            let remaining = total - idx - 1;
            if remaining > 0 && !self.options.yes && !self.ask_continue(remaining)? {
                break;
            }
        }

        Ok(RunOutcome::Finished(outcomes))
    }

    async fn process_group(&mut self, group: &FileGroup) -> Result<ScopeOutcome> {
        let scope = Scope {
            label: group.name.clone(),
            files: &group.files,
            diff: reconstruct_diff(self.repo, &group.files),
            commit_scope: CommitScope::Paths,
        };
        self.process_scope(&scope, false).await
    }

    async fn run_manual(&mut self, files: &[String]) -> Result<RunOutcome> {
        let mut remaining: Vec<String> = files.to_vec();
        let mut outcomes = Vec::new();

        while !remaining.is_empty() {
            let selection = if self.options.yes {
                vec![remaining[0].clone()]
            } else {
                match self.presenter.select_files(&remaining) {
                    Ok(selection) => selection,
                    Err(WizardError::UserCancelled) => break,
                    Err(e) => return Err(e),
                }
            };
            if selection.is_empty() {
                self.presenter.notify(Notice::Warning, "No files selected.");
                break;
            }
            remaining.retain(|f| !selection.contains(f));

            let scope = Scope {
                label: selection.join(", "),
                files: &selection,
                diff: reconstruct_diff(self.repo, &selection),
                commit_scope: CommitScope::Paths,
            };
            let outcome = self.process_scope(&scope, false).await?;
            let stop = outcome.ends_run();
            outcomes.push(outcome);
            if stop {
                break;
            }

            if !remaining.is_empty() && !self.options.yes && !self.ask_continue(remaining.len())? {
                break;
            }
        }

        if outcomes.is_empty() {
            return Ok(RunOutcome::Cancelled);
        }
        Ok(RunOutcome::Finished(outcomes))
    }

    fn ask_continue(&mut self, remaining: usize) -> Result<bool> {
        match self.presenter.confirm_continue(remaining) {
            Err(WizardError::UserCancelled) => Ok(false),
            other => other,
        }
    }

    /// Generates, reviews and commits one scope.
    ///
    /// With `propagate_generation_error` a failed generation is returned as
    /// an error instead of a [`ScopeOutcome::Failed`].
    async fn process_scope(&mut self, scope: &Scope<'_>, propagate_generation_error: bool) -> Result<ScopeOutcome> {
        if scope.diff.trim().is_empty() {
            tracing::warn!("No diff for {}", scope.label);
            self.presenter.notify(
                Notice::Warning,
                &format!(
                    "No diff found for {} (new, deleted or unchanged files?); skipping.",
                    scope.label
                ),
            );
            return Ok(ScopeOutcome::Skipped);
        }

        let mode = self.options.run_mode();
        let generated = {
            let spinner = self
                .presenter
                .progress(&format!("Generating commit message for {}...", scope.label));
            let reporter = spinner.as_ref().map(|s| s as &dyn ProgressReporter);
            self.generator
                .generate_with_retry(&scope.diff, scope.files, reporter)
                .await
        };

        let suggestion = match generated {
            Ok(suggestion) => suggestion,
            Err(e) if propagate_generation_error && !matches!(e, WizardError::UserCancelled) => {
                return Err(e);
            }
            Err(e) => {
                let state = ScopeState::Generating.handle_generation(Err(e), mode)?;
                return Ok(self.finish_scope(scope, state, None));
            }
        };

        let mut state =
            ScopeState::Generating.handle_generation(Ok(suggestion.message.clone()), mode)?;

        loop {
            state = match state {
                ScopeState::Presenting { message } => {
                    let action = match self.presenter.review_message(&scope.label, &suggestion) {
                        Err(WizardError::UserCancelled) => MessageAction::Cancel,
                        other => other?,
                    };
                    let user_action = match action {
                        MessageAction::Commit => UserAction::Commit,
                        MessageAction::Edit => match self.presenter.edit_message(&message)? {
                            Some(new_message) => UserAction::Edit { new_message },
                            None => {
                                self.presenter.notify(Notice::Warning, "Edit cancelled.");
                                UserAction::EditCancelled
                            }
                        },
                        MessageAction::Copy => {
                            let copied = self.presenter.copy_message(&message)?;
                            tracing::debug!("Copy action for {}: clipboard={}", scope.label, copied);
                            UserAction::Copy
                        }
                        MessageAction::Cancel => UserAction::Cancel,
                    };
                    ScopeState::Presenting { message }.handle_action(user_action)?
                }
                ScopeState::Committing { message } => {
                    let result = match scope.commit_scope {
                        CommitScope::All => self.repo.commit(&message),
                        CommitScope::Paths => self.repo.commit_paths(scope.files, &message),
                    };
                    if let Err(e) = &result {
                        tracing::warn!("Commit for {} failed: {}", scope.label, e);
                        self.presenter
                            .show_commit_result(&scope.label, CommitReport::Failed { error: e });
                    }
                    ScopeState::Committing { message }.handle_commit(result)?
                }
                done @ ScopeState::Done(_) => return Ok(self.finish_scope(scope, done, Some(&suggestion))),
                ScopeState::Generating => {
                    return Err(WizardError::InvalidInput(
                        "scope returned to the generating state".to_string(),
                    ));
                }
            };
        }
    }

    fn finish_scope(
        &mut self,
        scope: &Scope<'_>,
        state: ScopeState,
        suggestion: Option<&CommitSuggestion>,
    ) -> ScopeOutcome {
        let ScopeState::Done(outcome) = state else {
            return ScopeOutcome::Skipped;
        };

        match &outcome {
            ScopeOutcome::Committed { hash, message } => {
                self.presenter.show_commit_result(
                    &scope.label,
                    CommitReport::Committed { hash, message },
                );
            }
            ScopeOutcome::DryRun { .. } => {
                if let Some(suggestion) = suggestion {
                    self.presenter.show_dry_run(&scope.label, suggestion);
                }
            }
            ScopeOutcome::Failed { reason } if suggestion.is_none() => {
                self.presenter.notify(
                    Notice::Error,
                    &format!("Could not generate a message for {}: {}", scope.label, reason),
                );
            }
            ScopeOutcome::Cancelled => {
                self.presenter.notify(Notice::Warning, "Cancelled by user.");
            }
            _ => {}
        }
        outcome
    }
}
