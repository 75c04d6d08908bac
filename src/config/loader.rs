// Configuration loading from files and environment variables.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use super::structs::AppConfig;
use crate::error::Result;

/// Project-level config file name, looked up at the repository root.
pub const PROJECT_CONFIG_FILE: &str = ".commit-wizard.toml";

/// Loads the application configuration.
///
/// Priority (high to low):
/// 1. `OPENAI_API_KEY`, `COMMIT_WIZARD_DRY_RUN=true`, `COMMIT_WIZARD_DEBUG=true`
/// 2. `COMMIT_WIZARD__*` variables, `__` separating nesting levels
///    - e.g. `COMMIT_WIZARD__OPENAI__MODEL=gpt-4o-mini`
///    - e.g. `COMMIT_WIZARD__CACHE__ENABLED=false`
/// 3. `<repo>/.commit-wizard.toml`
/// 4. the user config file (`~/.config/commit-wizard/config.toml`)
/// 5. defaults
pub fn load_config(project_root: Option<&Path>) -> Result<AppConfig> {
    let project_path = project_root.map(|root| root.join(PROJECT_CONFIG_FILE));
    load_config_from(get_config_path().as_deref(), project_path.as_deref())
}

/// [`load_config`] with explicit file locations.
///
/// A file that does not exist is ignored. A file that cannot be parsed is
/// skipped with a warning and the remaining sources still apply.
pub fn load_config_from(global: Option<&Path>, project: Option<&Path>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    for path in [global, project].into_iter().flatten() {
        if path.exists() && is_usable_config_file(path) {
            builder = builder.add_source(File::from(path));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("COMMIT_WIZARD")
            .separator("__")
            .try_parsing(true),
    );

    let mut app_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides(&mut app_config);

    Ok(app_config)
}

/// Whether `path` parses on its own into an [`AppConfig`].
fn is_usable_config_file(path: &Path) -> bool {
    let parsed = Config::builder()
        .add_source(File::from(path))
        .build()
        .and_then(|c| c.try_deserialize::<AppConfig>());

    match parsed {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(
                "Ignoring malformed config file {}: {}",
                path.display(),
                e
            );
            false
        }
    }
}

/// Applies the plain environment variables the tool has always honoured.
fn apply_env_overrides(config: &mut AppConfig) {
    use std::env;

    config.openai.api_key = env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());

    if env::var("COMMIT_WIZARD_DRY_RUN").ok().as_deref() == Some("true") {
        config.dry_run = true;
    }

    if env::var("COMMIT_WIZARD_DEBUG").ok().as_deref() == Some("true") {
        config.debug = true;
    }
}

/// `~/.config/commit-wizard/config.toml` on Linux.
fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Platform config directory of the tool.
pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "commit-wizard").map(|dirs| dirs.config_dir().to_path_buf())
}
