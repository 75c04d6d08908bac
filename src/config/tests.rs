// Configuration module tests.

use super::*;
use crate::error::WizardError;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

/// Sets an environment variable for the lifetime of the guard.
struct EnvGuard {
    key: String,
    original: Option<String>,
}

impl EnvGuard {
    fn set(key: &str, value: &str) -> Self {
        let original = env::var(key).ok();
        // SAFETY: env mutation is serialised with serial_test
        unsafe { env::set_var(key, value) };
        Self {
            key: key.to_string(),
            original,
        }
    }

    fn remove(key: &str) -> Self {
        let original = env::var(key).ok();
        // SAFETY: env mutation is serialised with serial_test
        unsafe { env::remove_var(key) };
        Self {
            key: key.to_string(),
            original,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: env mutation is serialised with serial_test
        match &self.original {
            Some(v) => unsafe { env::set_var(&self.key, v) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

fn valid_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.openai.api_key = Some("sk-test".to_string());
    config
}

// === defaults ===

#[test]
fn test_default_openai() {
    let config = AppConfig::default();
    assert_eq!(config.openai.model, "gpt-4o");
    assert_eq!(config.openai.max_tokens, 150);
    assert_eq!(config.openai.temperature, 0.7);
    assert_eq!(config.openai.timeout, 30_000);
    assert_eq!(config.openai.retries, 2);
    assert_eq!(config.openai.max_attempts(), 3);
    assert_eq!(config.openai.api_key, None);
}

#[test]
fn test_default_general() {
    let config = AppConfig::default();
    assert_eq!(config.language, "pt");
    assert_eq!(config.style(), CommitStyle::Conventional);
    assert!(!config.split_commits);
    assert!(!config.dry_run);
    assert_eq!(config.prompt.max_diff_size, 8000);
}

#[test]
fn test_default_smart_split_and_cache() {
    let config = AppConfig::default();
    assert!(config.smart_split.enabled);
    assert_eq!(config.smart_split.min_group_size, 1);
    assert_eq!(config.smart_split.max_groups, 5);
    assert_eq!(config.smart_split.confidence_threshold, 0.7);
    assert!(config.cache.enabled);
    assert_eq!(config.cache.ttl, 60);
    assert_eq!(config.cache.max_size, 100);
}

#[test]
fn test_api_key_masked_in_debug() {
    let mut config = AppConfig::default();
    config.openai.api_key = Some("sk-1234567890abcdef".to_string());
    let debug = format!("{:?}", config.openai);
    assert!(!debug.contains("1234567890abcdef"));
}

// === validation ===

#[test]
fn test_validate_default_with_key() {
    assert!(valid_config().validate().is_ok());
}

#[test]
fn test_validate_collects_every_violation() {
    let mut config = AppConfig::default();
    config.openai.max_tokens = 5;
    config.openai.temperature = 2.5;
    config.openai.timeout = 10;
    config.language = "xx".to_string();
    config.commit_style = "fancy".to_string();
    config.smart_split.max_groups = 11;
    config.smart_split.min_group_size = 0;
    config.smart_split.confidence_threshold = 1.5;
    config.cache.ttl = 0;
    config.cache.max_size = 0;

    match config.validate() {
        Err(WizardError::InvalidConfig(errors)) => {
            assert_eq!(errors.len(), 11);
            assert!(errors[0].contains("OPENAI_API_KEY"));
            assert!(errors.iter().any(|e| e.contains("max_tokens")));
            assert!(errors.iter().any(|e| e.contains("temperature")));
            assert!(errors.iter().any(|e| e.contains("timeout")));
            assert!(errors.iter().any(|e| e.contains("language 'xx'")));
            assert!(errors.iter().any(|e| e.contains("commit_style 'fancy'")));
            assert!(errors.iter().any(|e| e.contains("max_groups")));
            assert!(errors.iter().any(|e| e.contains("min_group_size")));
            assert!(errors.iter().any(|e| e.contains("confidence_threshold")));
            assert!(errors.iter().any(|e| e.contains("cache.ttl")));
            assert!(errors.iter().any(|e| e.contains("cache.max_size")));
        }
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn test_validate_range_bounds_are_inclusive() {
    let mut config = valid_config();
    config.openai.max_tokens = 4000;
    config.openai.temperature = 0.0;
    config.openai.timeout = 120_000;
    config.smart_split.max_groups = 10;
    config.smart_split.confidence_threshold = 1.0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_every_supported_language_validates() {
    for lang in SUPPORTED_LANGUAGES {
        let mut config = valid_config();
        config.language = lang.to_string();
        assert!(config.validate().is_ok(), "language {lang}");
    }
}

#[test]
fn test_commit_style_parse() {
    assert_eq!("simple".parse::<CommitStyle>(), Ok(CommitStyle::Simple));
    assert_eq!("Detailed".parse::<CommitStyle>(), Ok(CommitStyle::Detailed));
    assert!("gitmoji".parse::<CommitStyle>().is_err());
}

// === loading ===

#[test]
#[serial]
fn test_load_without_files_uses_defaults() {
    let _key = EnvGuard::remove("OPENAI_API_KEY");
    let _dry = EnvGuard::remove("COMMIT_WIZARD_DRY_RUN");

    let config = load_config_from(None, None).unwrap();
    assert_eq!(config.openai.model, "gpt-4o");
    assert_eq!(config.openai.api_key, None);
    assert!(!config.dry_run);
}

#[test]
#[serial]
fn test_project_file_overrides_global_file() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("config.toml");
    let project = dir.path().join(PROJECT_CONFIG_FILE);
    fs::write(
        &global,
        "language = \"en\"\n[openai]\nmodel = \"gpt-4o-mini\"\n[cache]\nttl = 5\n",
    )
    .unwrap();
    fs::write(&project, "[openai]\nmodel = \"gpt-4.1\"\n").unwrap();

    let config = load_config_from(Some(&global), Some(&project)).unwrap();
    assert_eq!(config.language, "en");
    assert_eq!(config.openai.model, "gpt-4.1");
    assert_eq!(config.cache.ttl, 5);
    assert_eq!(config.cache.max_size, 100);
}

#[test]
#[serial]
fn test_malformed_file_is_ignored() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("config.toml");
    let project = dir.path().join(PROJECT_CONFIG_FILE);
    fs::write(&global, "language = \"es\"\n").unwrap();
    fs::write(&project, "this is = = not toml [").unwrap();

    let config = load_config_from(Some(&global), Some(&project)).unwrap();
    assert_eq!(config.language, "es");
}

/// In-memory log sink for a scoped tracing subscriber.
#[derive(Clone, Default)]
struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
#[serial]
fn test_malformed_file_is_logged_as_warning() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join(PROJECT_CONFIG_FILE);
    fs::write(&project, "this is = = not toml [").unwrap();

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let config = tracing::subscriber::with_default(subscriber, || {
        load_config_from(None, Some(&project)).unwrap()
    });
    assert_eq!(config.language, "pt");

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("WARN"));
    assert!(output.contains("Ignoring malformed config file"));
    assert!(output.contains(PROJECT_CONFIG_FILE));
}

#[test]
#[serial]
fn test_wrongly_typed_file_is_ignored() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join(PROJECT_CONFIG_FILE);
    fs::write(&project, "[smart_split]\nmax_groups = \"many\"\n").unwrap();

    let config = load_config_from(None, Some(&project)).unwrap();
    assert_eq!(config.smart_split.max_groups, 5);
}

#[test]
#[serial]
fn test_missing_files_are_ignored() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let config = load_config_from(Some(&missing), Some(&missing)).unwrap();
    assert_eq!(config.language, "pt");
}

#[test]
#[serial]
fn test_plain_env_overrides() {
    let _key = EnvGuard::set("OPENAI_API_KEY", "sk-env");
    let _dry = EnvGuard::set("COMMIT_WIZARD_DRY_RUN", "true");
    let _debug = EnvGuard::set("COMMIT_WIZARD_DEBUG", "true");

    let config = load_config_from(None, None).unwrap();
    assert_eq!(config.openai.api_key, Some("sk-env".to_string()));
    assert!(config.dry_run);
    assert!(config.debug);
}

#[test]
#[serial]
fn test_dry_run_env_requires_literal_true() {
    let _dry = EnvGuard::set("COMMIT_WIZARD_DRY_RUN", "1");
    let config = load_config_from(None, None).unwrap();
    assert!(!config.dry_run);
}

#[test]
#[serial]
fn test_nested_env_override() {
    let _model = EnvGuard::set("COMMIT_WIZARD__OPENAI__MODEL", "gpt-env");
    let _cache = EnvGuard::set("COMMIT_WIZARD__CACHE__ENABLED", "false");

    let config = load_config_from(None, None).unwrap();
    assert_eq!(config.openai.model, "gpt-env");
    assert!(!config.cache.enabled);
}

#[test]
fn test_get_config_dir_names_the_tool() {
    let dir = get_config_dir().unwrap();
    assert!(dir.to_string_lossy().contains("commit-wizard"));
}
