//! Global constants.

/// Smart-split classification limits
pub mod grouping {
    /// Diff prefix length that participates in the cache fingerprint
    pub const FINGERPRINT_DIFF_PREFIX: usize = 1000;

    /// Above this combined diff size the classifier only sees file names
    pub const FALLBACK_PROMPT_THRESHOLD: usize = 6000;

    /// Diff excerpt length embedded in the context prompt
    pub const CONTEXT_DIFF_LIMIT: usize = 8000;

    pub const CLASSIFY_TEMPERATURE: f32 = 0.3;

    pub const CLASSIFY_MAX_TOKENS: u32 = 800;

    pub const DEFAULT_GROUP_NAME: &str = "Unnamed group";

    pub const DEFAULT_GROUP_DESCRIPTION: &str = "No description";

    pub const DEFAULT_GROUP_CONFIDENCE: f64 = 0.5;
}

/// Diff reconstruction limits
pub mod diff {
    /// Per-file cap on a real staged diff
    pub const PER_FILE_LIMIT: usize = 4000;

    /// Cap on the content of a synthesized hunk
    pub const SYNTHESIZED_CONTENT_LIMIT: usize = 2000;

    /// Cap on the concatenated group diff
    pub const TOTAL_LIMIT: usize = 8000;

    pub const TRUNCATED_MARKER: &str = "\n... (diff truncated)";

    pub const CONTENT_TRUNCATED_MARKER: &str = "\n... (content truncated)";

    pub const TOTAL_TRUNCATED_MARKER: &str = "\n... (total diff truncated)";
}

/// Commit message constants
pub mod commit {
    /// Longest accepted summary line when editing by hand
    pub const MAX_EDITED_MESSAGE_LENGTH: usize = 72;

    /// Confidence reported for a generated suggestion
    pub const SUGGESTION_CONFIDENCE: f64 = 0.8;

    /// Generation attempts when nothing else is configured
    pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

    /// Retry delay unit; attempt `i` waits `2^i` units
    pub const RETRY_DELAY_UNIT_MS: u64 = 1000;
}

/// Process exit statuses
pub mod exit {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const NOT_A_REPOSITORY: i32 = 2;
    pub const CONFIG: i32 = 3;
}

/// UI constants
pub mod ui {
    /// Preview length for raw LLM responses in logs
    pub const ERROR_PREVIEW_LENGTH: usize = 500;
}
