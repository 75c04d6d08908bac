use thiserror::Error;

use crate::constants::exit;

pub type Result<T> = std::result::Result<T, WizardError>;

/// Why a smart-split classification produced no usable partition.
///
/// Kept apart from [`WizardError`] so the orchestrator can tell a failed
/// grouping (abort or fall back to manual split) from a fatal error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupingError {
    #[error("OpenAI API key not found")]
    MissingApiKey,

    #[error("classifier request failed: {0}")]
    Transport(String),

    #[error("classifier returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("classifier returned an empty response")]
    EmptyResponse,

    #[error("classifier response is malformed: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Git command failed: {0}")]
    GitCommand(String),

    #[error("Not inside a git repository")]
    NotARepository,

    #[error("No staged changes found")]
    NoStagedChanges,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration:\n{}", .0.iter().map(|e| format!("  • {e}")).collect::<Vec<_>>().join("\n"))]
    InvalidConfig(Vec<String>),

    #[error("OpenAI API key not found")]
    MissingApiKey,

    #[error("LLM provider error: {0}")]
    Llm(String),

    #[error("LLM API error ({status}): {message}")]
    LlmApi { status: u16, message: String },

    #[error("{0} returned an empty response")]
    EmptyResponse(String),

    #[error("LLM request timed out after {0} ms")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Smart split failed: {0}")]
    Grouping(#[from] GroupingError),

    #[error("failed after {attempts} attempts; last error: {last_error}")]
    MaxRetriesExceeded { attempts: usize, last_error: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration parsing error: {0}")]
    ConfigParse(#[from] config::ConfigError),

    #[error("Prompt error: {0}")]
    Prompt(inquire::InquireError),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

impl From<inquire::InquireError> for WizardError {
    fn from(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => WizardError::UserCancelled,
            other => WizardError::Prompt(other),
        }
    }
}

impl WizardError {
    /// Remediation hint shown under the error line.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            WizardError::NoStagedChanges => {
                Some("Stage files before proceeding: git add <file>")
            }
            WizardError::NotARepository => {
                Some("Run the command inside a directory with an initialized git repository")
            }
            WizardError::MissingApiKey | WizardError::Grouping(GroupingError::MissingApiKey) => {
                Some("Set the OPENAI_API_KEY environment variable")
            }
            WizardError::InvalidConfig(errors)
                if errors.iter().any(|e| e.contains("OPENAI_API_KEY")) =>
            {
                Some("Set the OPENAI_API_KEY environment variable")
            }
            WizardError::InvalidConfig(_) | WizardError::ConfigParse(_) => Some(
                "Check ~/.config/commit-wizard/config.toml and .commit-wizard.toml in the repository root",
            ),
            WizardError::Network(_) => {
                Some("Check your network connection, proxy settings, or openai.base_url")
            }
            WizardError::Timeout(_) => {
                Some("The API request timed out. Raise openai.timeout or try again later")
            }
            WizardError::LlmApi { status: 401, .. } => {
                Some("Check if your API key is valid and has not expired")
            }
            WizardError::LlmApi { status: 429, .. } => {
                Some("Rate limit exceeded. Wait a moment and try again")
            }
            WizardError::LlmApi { status, .. } if *status >= 500 => {
                Some("API service is temporarily unavailable. Try again in a few moments")
            }
            WizardError::Grouping(_) => {
                Some("Retry, or run with --split to choose files manually")
            }
            WizardError::GitCommand(msg) if msg.contains("not found") => {
                Some("Install git and make sure it is on your PATH")
            }
            _ => None,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            WizardError::UserCancelled | WizardError::NoStagedChanges => exit::SUCCESS,
            WizardError::NotARepository => exit::NOT_A_REPOSITORY,
            WizardError::InvalidConfig(_)
            | WizardError::Config(_)
            | WizardError::ConfigParse(_)
            | WizardError::MissingApiKey => exit::CONFIG,
            _ => exit::FAILURE,
        }
    }

    /// Whether another generation attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            WizardError::MissingApiKey
                | WizardError::InvalidConfig(_)
                | WizardError::UserCancelled
        )
    }
}
