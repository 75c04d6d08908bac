use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::provider::base::clean_commit_response;
use super::prompt::build_commit_prompt;
use super::retry::RetryPolicy;
use super::{LLMProvider, ProgressReporter, SamplingParams};
use crate::config::AppConfig;
use crate::constants::commit::SUGGESTION_CONFIDENCE;
use crate::error::{Result, WizardError};

/// Conventional commit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Test,
    Chore,
    Build,
    Ci,
}

impl CommitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
            CommitType::Build => "build",
            CommitType::Ci => "ci",
        }
    }

    /// Maps a prefix keyword (and its long aliases) to a type.
    fn from_keyword(word: &str) -> Option<Self> {
        let kind = match word.to_lowercase().as_str() {
            "feat" | "feature" => CommitType::Feat,
            "fix" | "bugfix" => CommitType::Fix,
            "docs" | "documentation" => CommitType::Docs,
            "style" | "format" => CommitType::Style,
            "refactor" | "refactoring" => CommitType::Refactor,
            "test" | "testing" => CommitType::Test,
            "chore" | "maintenance" => CommitType::Chore,
            "build" => CommitType::Build,
            "ci" | "continuous-integration" => CommitType::Ci,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated commit message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitSuggestion {
    pub message: String,
    pub commit_type: CommitType,
    /// Heuristic score, not a probability.
    pub confidence: f64,
}

/// Reads the type from a `type(scope): ...` or `type: ...` prefix.
pub fn extract_commit_type(message: &str) -> Option<CommitType> {
    let first_line = message.trim_start().lines().next()?;
    let (head, _) = first_line.split_once(':')?;

    let word = match head.find('(') {
        Some(open) => {
            let scope = head[open + 1..].strip_suffix(')')?;
            if scope.is_empty() || scope.contains(')') {
                return None;
            }
            &head[..open]
        }
        None => head,
    };

    CommitType::from_keyword(word)
}

/// Guesses a type from file names and diff content.
///
/// Checked in order: test, docs, build, style, fix, feat, refactor;
/// anything else is a chore.
pub fn detect_commit_type(diff: &str, filenames: &[String]) -> CommitType {
    let diff = diff.to_lowercase();
    let files = filenames.join(" ").to_lowercase();
    let files_have = |needles: &[&str]| needles.iter().any(|n| files.contains(n));
    let diff_has = |needles: &[&str]| needles.iter().any(|n| diff.contains(n));

    if files_have(&["test", "spec"]) || diff.contains("test(") {
        CommitType::Test
    } else if files_have(&["readme", ".md", "docs"]) {
        CommitType::Docs
    } else if files_have(&[
        "package.json",
        "dockerfile",
        ".yml",
        ".yaml",
        "webpack",
        "tsconfig",
    ]) {
        CommitType::Build
    } else if files_have(&[".css", ".scss"]) || diff_has(&["style", "format"]) {
        CommitType::Style
    } else if diff_has(&["fix", "bug", "error", "issue"]) {
        CommitType::Fix
    } else if diff_has(&["add", "new", "create", "implement"]) {
        CommitType::Feat
    } else if diff_has(&["refactor", "restructure", "rename"]) {
        CommitType::Refactor
    } else {
        CommitType::Chore
    }
}

/// Turns diffs into commit suggestions through an [`LLMProvider`].
pub struct MessageGenerator {
    provider: Arc<dyn LLMProvider>,
    config: AppConfig,
    policy: RetryPolicy,
}

impl MessageGenerator {
    /// Retries `openai.retries + 1` times with the default delay unit.
    pub fn new(provider: Arc<dyn LLMProvider>, config: &AppConfig) -> Self {
        let policy = RetryPolicy {
            max_attempts: config.openai.max_attempts(),
            ..RetryPolicy::default()
        };
        Self {
            provider,
            config: config.clone(),
            policy,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    /// One generation attempt.
    pub async fn generate(&self, diff: &str, filenames: &[String]) -> Result<CommitSuggestion> {
        let prompt = build_commit_prompt(diff, filenames, &self.config);
        tracing::debug!(
            "Commit prompt for {} file(s): {} chars",
            filenames.len(),
            prompt.len()
        );

        let params = SamplingParams {
            temperature: self.config.openai.temperature,
            max_tokens: self.config.openai.max_tokens,
        };
        let raw = self.provider.send_prompt(&prompt, params).await?;

        let message = clean_commit_response(&raw);
        if message.is_empty() {
            return Err(WizardError::EmptyResponse(self.provider.name().to_string()));
        }

        let commit_type =
            extract_commit_type(&message).unwrap_or_else(|| detect_commit_type(diff, filenames));

        Ok(CommitSuggestion {
            message,
            commit_type,
            confidence: SUGGESTION_CONFIDENCE,
        })
    }

    /// [`generate`](Self::generate) under the retry policy.
    pub async fn generate_with_retry(
        &self,
        diff: &str,
        filenames: &[String],
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<CommitSuggestion> {
        let max = self.policy.max_attempts.max(1);
        self.policy
            .run(
                |_| self.generate(diff, filenames),
                |next, delay| {
                    tracing::debug!(
                        "Retrying commit message generation in {:?} (attempt {}/{})",
                        delay,
                        next + 1,
                        max
                    );
                    if let Some(p) = progress {
                        p.append_suffix(&format!("(retry {}/{})", next + 1, max));
                    }
                },
            )
            .await
    }
}
