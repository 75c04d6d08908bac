//! Top-level application configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WizardError};

use super::cache::CacheConfig;
use super::openai::OpenAIConfig;
use super::split::SmartSplitConfig;

/// Languages a commit message can be requested in.
pub const SUPPORTED_LANGUAGES: &[&str] = &["pt", "en", "es", "fr", "de", "it", "ja", "ko", "zh"];

/// Application configuration.
///
/// Effective configuration is merged from multiple sources (low to high):
/// 1. Rust defaults (`Default` + `serde(default)`)
/// 2. User-level config file (platform-specific config directory)
/// 3. Project-level `.commit-wizard.toml` at the repository root
/// 4. `COMMIT_WIZARD__*` environment variables
/// 5. `OPENAI_API_KEY`, `COMMIT_WIZARD_DRY_RUN`, `COMMIT_WIZARD_DEBUG`
///
/// # Configuration File Locations
/// - Linux: `~/.config/commit-wizard/config.toml`
/// - macOS: `~/Library/Application Support/commit-wizard/config.toml`
/// - Windows: `%APPDATA%\commit-wizard\config\config.toml`
///
/// # Example
/// ```toml
/// language = "en"
/// commit_style = "conventional"
///
/// [openai]
/// model = "gpt-4o"
/// temperature = 0.7
///
/// [smart_split]
/// max_groups = 4
///
/// [cache]
/// ttl = 30
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// OpenAI request settings.
    #[serde(default)]
    pub openai: OpenAIConfig,

    /// Language of generated commit messages (see [`SUPPORTED_LANGUAGES`]).
    #[serde(default = "default_language")]
    pub language: String,

    /// `conventional`, `simple` or `detailed`.
    ///
    /// Stored as text so an unknown value is reported together with every
    /// other violation by [`AppConfig::validate`].
    #[serde(default = "default_commit_style")]
    pub commit_style: String,

    /// Split into one commit per selection by default.
    #[serde(default)]
    pub split_commits: bool,

    /// Generate and show messages without committing.
    #[serde(default)]
    pub dry_run: bool,

    /// Prompt tuning.
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Smart split thresholds.
    #[serde(default)]
    pub smart_split: SmartSplitConfig,

    /// Grouping analysis cache.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Debug logging, set by `COMMIT_WIZARD_DEBUG=true`.
    #[serde(default)]
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai: OpenAIConfig::default(),
            language: default_language(),
            commit_style: default_commit_style(),
            split_commits: false,
            dry_run: false,
            prompt: PromptConfig::default(),
            smart_split: SmartSplitConfig::default(),
            cache: CacheConfig::default(),
            debug: false,
        }
    }
}

impl AppConfig {
    /// Validates the whole configuration.
    ///
    /// Every violation is collected; the error lists all of them at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        self.openai.collect_errors(&mut errors);

        if !SUPPORTED_LANGUAGES.contains(&self.language.as_str()) {
            errors.push(format!(
                "language '{}' is not supported (expected one of: {})",
                self.language,
                SUPPORTED_LANGUAGES.join(", ")
            ));
        }

        if let Err(e) = self.commit_style.parse::<CommitStyle>() {
            errors.push(e);
        }

        self.smart_split.collect_errors(&mut errors);
        self.cache.collect_errors(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(WizardError::InvalidConfig(errors))
        }
    }

    /// Parsed commit style, `Conventional` if the text is unknown.
    pub fn style(&self) -> CommitStyle {
        self.commit_style.parse().unwrap_or_default()
    }
}

/// Commit message convention style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitStyle {
    /// `type(scope): description`
    #[default]
    Conventional,
    /// Short imperative sentence.
    Simple,
    /// Summary line plus optional body.
    Detailed,
}

impl fmt::Display for CommitStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitStyle::Conventional => write!(f, "conventional"),
            CommitStyle::Simple => write!(f, "simple"),
            CommitStyle::Detailed => write!(f, "detailed"),
        }
    }
}

impl FromStr for CommitStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "conventional" => Ok(CommitStyle::Conventional),
            "simple" => Ok(CommitStyle::Simple),
            "detailed" => Ok(CommitStyle::Detailed),
            _ => Err(format!(
                "commit_style '{}' is not supported (expected conventional, simple or detailed)",
                s
            )),
        }
    }
}

/// Prompt configuration.
///
/// # Example
/// ```toml
/// [prompt]
/// custom_instructions = "Mention the ticket id when the branch has one"
/// max_diff_size = 8000
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromptConfig {
    /// Extra text appended to the commit prompt context.
    #[serde(default)]
    pub custom_instructions: String,

    /// Characters of the staged diff sent in single-commit mode.
    #[serde(default = "default_max_diff_size")]
    pub max_diff_size: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            custom_instructions: String::new(),
            max_diff_size: default_max_diff_size(),
        }
    }
}

fn default_language() -> String {
    "pt".to_string()
}

fn default_commit_style() -> String {
    "conventional".to_string()
}

fn default_max_diff_size() -> usize {
    8000
}
