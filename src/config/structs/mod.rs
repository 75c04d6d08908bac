mod app;
mod cache;
mod openai;
mod split;

pub use app::{AppConfig, CommitStyle, PromptConfig, SUPPORTED_LANGUAGES};
pub use cache::CacheConfig;
pub use openai::OpenAIConfig;
pub use split::SmartSplitConfig;
