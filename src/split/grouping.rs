//! LLM-driven partition of staged files into commit groups.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::cache::{AnalysisCache, fingerprint};
use super::{FileGroup, GroupIdAllocator, dedup_paths};
use crate::config::{AppConfig, SmartSplitConfig};
use crate::constants::grouping::{
    CLASSIFY_MAX_TOKENS, CLASSIFY_TEMPERATURE, DEFAULT_GROUP_CONFIDENCE,
    DEFAULT_GROUP_DESCRIPTION, DEFAULT_GROUP_NAME, FALLBACK_PROMPT_THRESHOLD,
};
use crate::error::{GroupingError, WizardError};
use crate::llm::prompt::{build_context_analysis_prompt, build_fallback_prompt};
use crate::llm::provider::base::extract_first_json_object;
use crate::llm::{LLMProvider, SamplingParams};

impl From<WizardError> for GroupingError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::MissingApiKey => GroupingError::MissingApiKey,
            WizardError::LlmApi { status, message } => GroupingError::Status { status, message },
            WizardError::EmptyResponse(_) => GroupingError::EmptyResponse,
            other => GroupingError::Transport(other.to_string()),
        }
    }
}

/// One group as the classifier wrote it; every field may be missing.
#[derive(Debug, Default, Deserialize)]
struct RawGroup {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    files: Option<Vec<String>>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Parses the classifier reply into raw groups.
fn parse_classifier_reply(content: &str) -> Result<Vec<RawGroup>, GroupingError> {
    if content.trim().is_empty() {
        return Err(GroupingError::EmptyResponse);
    }

    let object = extract_first_json_object(content)
        .ok_or_else(|| GroupingError::Malformed("no JSON object in response".to_string()))?;

    let groups = match object.get("groups") {
        Some(Value::Array(groups)) => groups,
        Some(_) => {
            return Err(GroupingError::Malformed(
                "\"groups\" is not a list".to_string(),
            ));
        }
        None => {
            return Err(GroupingError::Malformed(
                "\"groups\" field is missing".to_string(),
            ));
        }
    };

    groups
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            RawGroup::deserialize(value)
                .map_err(|e| GroupingError::Malformed(format!("group {}: {}", idx + 1, e)))
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Turns classifier groups into a partition of exactly `files`.
///
/// Unknown paths and repeats are dropped (first occurrence wins), empty
/// groups vanish, and input files nobody claimed join the first group.
fn repair_groups(raw: Vec<RawGroup>, files: &[String]) -> Result<Vec<FileGroup>, GroupingError> {
    if raw.is_empty() {
        return Err(GroupingError::Malformed(
            "classifier returned no groups".to_string(),
        ));
    }

    let input: HashSet<&str> = files.iter().map(String::as_str).collect();
    let mut assigned: HashSet<String> = HashSet::new();

    let mut kept: Vec<(Option<String>, FileGroup)> = Vec::new();
    for group in raw {
        let group_files: Vec<String> = group
            .files
            .unwrap_or_default()
            .into_iter()
            .filter(|f| input.contains(f.as_str()))
            .filter(|f| assigned.insert(f.clone()))
            .collect();

        if group_files.is_empty() {
            continue;
        }

        let confidence = group
            .confidence
            .filter(|c| c.is_finite())
            .map_or(DEFAULT_GROUP_CONFIDENCE, |c| c.clamp(0.0, 1.0));

        kept.push((
            non_blank(group.id),
            FileGroup {
                id: String::new(),
                name: non_blank(group.name).unwrap_or_else(|| DEFAULT_GROUP_NAME.to_string()),
                description: non_blank(group.description)
                    .unwrap_or_else(|| DEFAULT_GROUP_DESCRIPTION.to_string()),
                files: group_files,
                diff: String::new(),
                confidence,
            },
        ));
    }

    // classifier ids first, so generated ones never collide with them
    let mut ids = GroupIdAllocator::default();
    let mut pending = Vec::new();
    for (idx, (wanted, group)) in kept.iter_mut().enumerate() {
        match wanted.as_deref() {
            Some(id) if ids.claim(id) => group.id = id.to_string(),
            _ => pending.push(idx),
        }
    }
    for idx in pending {
        kept[idx].1.id = ids.next_id();
    }

    let mut groups: Vec<FileGroup> = kept.into_iter().map(|(_, g)| g).collect();

    let missing: Vec<String> = files
        .iter()
        .filter(|f| !assigned.contains(f.as_str()))
        .cloned()
        .collect();

    if !missing.is_empty() {
        tracing::debug!(
            "Classifier left {} file(s) ungrouped, adding them to the first group",
            missing.len()
        );
        match groups.first_mut() {
            Some(first) => first.files.extend(missing),
            None => {
                let mut group = FileGroup::new(ids.next_id(), DEFAULT_GROUP_NAME, missing);
                group.description = DEFAULT_GROUP_DESCRIPTION.to_string();
                group.confidence = DEFAULT_GROUP_CONFIDENCE;
                groups.push(group);
            }
        }
    }

    Ok(groups)
}

/// Folds the smallest group into the next smallest one.
///
/// The donor is the group with the fewest files (the latest one on ties),
/// the receiver the smallest of the rest (the earliest on ties). The
/// receiver keeps its id, name and position.
fn merge_smallest(groups: &mut Vec<FileGroup>) {
    if groups.len() < 2 {
        return;
    }

    let mut donor_idx = 0;
    for (idx, group) in groups.iter().enumerate() {
        if group.files.len() <= groups[donor_idx].files.len() {
            donor_idx = idx;
        }
    }
    let donor = groups.remove(donor_idx);

    let mut receiver_idx = 0;
    for (idx, group) in groups.iter().enumerate() {
        if group.files.len() < groups[receiver_idx].files.len() {
            receiver_idx = idx;
        }
    }

    let receiver = &mut groups[receiver_idx];
    tracing::debug!("Merging group '{}' into '{}'", donor.name, receiver.name);
    receiver.files.extend(donor.files);
    receiver.description = format!("{} (merged with {})", receiver.description, donor.name);
    receiver.confidence = receiver.confidence.min(donor.confidence);
}

/// Applies the `max_groups` ceiling and the `min_group_size` floor.
fn enforce_limits(groups: &mut Vec<FileGroup>, config: &SmartSplitConfig) {
    let max_groups = config.max_groups.max(1);
    while groups.len() > max_groups {
        merge_smallest(groups);
    }

    while groups.len() > 1
        && groups
            .iter()
            .any(|group| group.files.len() < config.min_group_size)
    {
        merge_smallest(groups);
    }
}

/// Groups staged files through the LLM classifier.
pub struct GroupingEngine {
    provider: Arc<dyn LLMProvider>,
    split: SmartSplitConfig,
    temperature: f32,
}

impl GroupingEngine {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &AppConfig) -> Self {
        Self {
            provider,
            split: config.smart_split.clone(),
            temperature: config.openai.temperature,
        }
    }

    /// Partitions `files` into commit groups.
    ///
    /// Identical requests within the cache TTL reuse the stored result and
    /// never reach the classifier. No file is dropped: the union of the
    /// returned groups equals the de-duplicated input.
    ///
    /// # Errors
    /// Returns a [`GroupingError`] when the classifier cannot be reached,
    /// answers with a non-2xx status, or replies without a usable `groups`
    /// list. Nothing is cached in that case.
    pub async fn group(
        &self,
        files: &[String],
        diff: &str,
        cache: &mut AnalysisCache,
    ) -> Result<Vec<FileGroup>, GroupingError> {
        let files = dedup_paths(files);
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let key = fingerprint(&files, diff, self.provider.model(), self.temperature);
        if let Some(groups) = cache.get(&key) {
            tracing::debug!("Analysis cache hit for {} file(s)", files.len());
            return Ok(groups);
        }
        tracing::debug!("Analysis cache miss for {} file(s)", files.len());

        let diff_len = diff.chars().count();
        let prompt = if diff_len > FALLBACK_PROMPT_THRESHOLD {
            tracing::warn!(
                "Diff too large ({} chars), grouping by file names only",
                diff_len
            );
            build_fallback_prompt(&files, self.split.max_groups)
        } else {
            build_context_analysis_prompt(&files, diff, self.split.max_groups)
        };

        let params = SamplingParams {
            temperature: CLASSIFY_TEMPERATURE,
            max_tokens: CLASSIFY_MAX_TOKENS,
        };
        let content = self.provider.send_prompt(&prompt, params).await?;

        let raw = parse_classifier_reply(&content)?;
        let mut groups = repair_groups(raw, &files)?;
        enforce_limits(&mut groups, &self.split);

        cache.set(&key, groups.clone());
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::llm::MockLLMProvider;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn files(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn cache() -> AnalysisCache {
        AnalysisCache::new(&CacheConfig::default())
    }

    fn provider_replying(reply: &'static str, times: usize) -> MockLLMProvider {
        let mut provider = MockLLMProvider::new();
        provider.expect_model().return_const("gpt-4o".to_string());
        provider
            .expect_send_prompt()
            .times(times)
            .returning(move |_, _| Ok(reply.to_string()));
        provider
    }

    fn engine(provider: MockLLMProvider) -> GroupingEngine {
        GroupingEngine::new(Arc::new(provider), &AppConfig::default())
    }

    fn engine_with(provider: MockLLMProvider, split: SmartSplitConfig) -> GroupingEngine {
        let config = AppConfig {
            smart_split: split,
            ..AppConfig::default()
        };
        GroupingEngine::new(Arc::new(provider), &config)
    }

    fn assert_partition(groups: &[FileGroup], input: &[String]) {
        let mut seen = HashSet::new();
        for group in groups {
            assert!(!group.files.is_empty(), "empty group {}", group.id);
            for file in &group.files {
                assert!(seen.insert(file.clone()), "{} appears twice", file);
            }
        }
        let expected: HashSet<String> = input.iter().cloned().collect();
        assert_eq!(seen, expected);
    }

    const AUTH_AND_DOCS: &str = r#"Here is the grouping:
```json
{"groups": [
  {"id": "auth", "name": "Auth", "description": "Login flow", "files": ["src/auth.ts", "src/user.ts"], "confidence": 0.9},
  {"id": "docs", "name": "Docs", "files": ["README.md"], "confidence": 0.8}
]}
```"#;

    #[tokio::test]
    async fn test_groups_from_classifier() {
        let input = files(&["src/auth.ts", "src/user.ts", "README.md"]);
        let engine = engine(provider_replying(AUTH_AND_DOCS, 1));

        let groups = engine.group(&input, "+login", &mut cache()).await.unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "auth");
        assert_eq!(groups[0].files, files(&["src/auth.ts", "src/user.ts"]));
        assert_eq!(groups[1].description, DEFAULT_GROUP_DESCRIPTION);
        assert_eq!(groups[1].diff, "");
        assert_partition(&groups, &input);
    }

    #[tokio::test]
    async fn test_empty_input_skips_classifier() {
        let mut provider = MockLLMProvider::new();
        provider.expect_send_prompt().never();
        let groups = engine(provider).group(&[], "", &mut cache()).await.unwrap();
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn test_cache_hit_avoids_second_call() {
        let input = files(&["src/auth.ts", "src/user.ts", "README.md"]);
        let engine = engine(provider_replying(AUTH_AND_DOCS, 1));
        let mut cache = cache();

        let first = engine.group(&input, "+login", &mut cache).await.unwrap();
        let reordered = files(&["README.md", "src/user.ts", "src/auth.ts"]);
        let second = engine.group(&reordered, "+login", &mut cache).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.stats().size, 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_calls_every_time() {
        let input = files(&["README.md"]);
        let engine = engine(provider_replying(
            r#"{"groups": [{"files": ["README.md"]}]}"#,
            2,
        ));
        let mut cache = AnalysisCache::new(&CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        });

        engine.group(&input, "d", &mut cache).await.unwrap();
        engine.group(&input, "d", &mut cache).await.unwrap();
    }

    #[tokio::test]
    async fn test_large_diff_uses_fallback_prompt() {
        let input = files(&["src/a.rs", "src/b.rs"]);
        let diff = format!("+{}", "secret-line\n".repeat(1000));

        let mut provider = MockLLMProvider::new();
        provider.expect_model().return_const("gpt-4o".to_string());
        provider
            .expect_send_prompt()
            .withf(|prompt, params| {
                prompt.contains("FILES BY DIRECTORY")
                    && !prompt.contains("secret-line")
                    && params.max_tokens == CLASSIFY_MAX_TOKENS
                    && (params.temperature - CLASSIFY_TEMPERATURE).abs() < f32::EPSILON
            })
            .times(1)
            .returning(|_, _| Ok(r#"{"groups": [{"files": ["src/a.rs", "src/b.rs"]}]}"#.to_string()));

        let groups = engine(provider).group(&input, &diff, &mut cache()).await.unwrap();
        assert_eq!(groups.len(), 1);
    }

    #[tokio::test]
    async fn test_small_diff_uses_context_prompt() {
        let mut provider = MockLLMProvider::new();
        provider.expect_model().return_const("gpt-4o".to_string());
        provider
            .expect_send_prompt()
            .withf(|prompt, _| prompt.contains("DIFF SUMMARY") && prompt.contains("+visible"))
            .times(1)
            .returning(|_, _| Ok(r#"{"groups": [{"files": ["a.rs"]}]}"#.to_string()));

        engine(provider)
            .group(&files(&["a.rs"]), "+visible", &mut cache())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_repairs_missing_unknown_and_duplicate_files() {
        let input = files(&["a.rs", "b.rs", "c.rs", "d.rs"]);
        let reply = r#"{"groups": [
            {"id": "one", "files": ["a.rs", "ghost.rs"]},
            {"id": "two", "files": ["a.rs", "b.rs"]},
            {"id": "three", "files": ["nowhere.rs"]}
        ]}"#;

        let groups = engine(provider_replying(reply, 1))
            .group(&input, "d", &mut cache())
            .await
            .unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].files, files(&["a.rs", "c.rs", "d.rs"]));
        assert_eq!(groups[1].files, files(&["b.rs"]));
        assert_partition(&groups, &input);
    }

    #[tokio::test]
    async fn test_duplicate_input_paths_are_collapsed() {
        let input = files(&["a.rs", "a.rs", "b.rs"]);
        let groups = engine(provider_replying(r#"{"groups": [{"files": ["b.rs"]}]}"#, 1))
            .group(&input, "d", &mut cache())
            .await
            .unwrap();

        assert_eq!(groups[0].files, files(&["b.rs", "a.rs"]));
    }

    #[tokio::test]
    async fn test_all_groups_unknown_creates_catch_all_group() {
        let input = files(&["a.rs"]);
        let groups = engine(provider_replying(r#"{"groups": [{"files": ["zzz"]}]}"#, 1))
            .group(&input, "d", &mut cache())
            .await
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "group-1");
        assert_eq!(groups[0].name, DEFAULT_GROUP_NAME);
        assert_eq!(groups[0].files, input);
    }

    #[tokio::test]
    async fn test_ids_and_defaults() {
        let input = files(&["a.rs", "b.rs", "c.rs"]);
        let reply = r#"{"groups": [
            {"files": ["a.rs"]},
            {"id": "group-1", "name": "  ", "files": ["b.rs"], "confidence": 7},
            {"id": "group-1", "files": ["c.rs"]}
        ]}"#;

        let groups = engine(provider_replying(reply, 1))
            .group(&input, "d", &mut cache())
            .await
            .unwrap();

        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["group-2", "group-1", "group-3"]);
        assert_eq!(groups[0].confidence, DEFAULT_GROUP_CONFIDENCE);
        assert_eq!(groups[1].name, DEFAULT_GROUP_NAME);
        assert_eq!(groups[1].confidence, 1.0);
    }

    #[tokio::test]
    async fn test_max_groups_merges_smallest() {
        let input = files(&["a1", "a2", "a3", "b1", "b2", "c1", "d1"]);
        let reply = r#"{"groups": [
            {"id": "a", "name": "A", "files": ["a1", "a2", "a3"], "confidence": 0.9},
            {"id": "b", "name": "B", "files": ["b1", "b2"], "confidence": 0.9},
            {"id": "c", "name": "C", "files": ["c1"], "confidence": 0.6},
            {"id": "d", "name": "D", "files": ["d1"], "confidence": 0.4}
        ]}"#;
        let split = SmartSplitConfig {
            max_groups: 2,
            ..SmartSplitConfig::default()
        };

        let groups = engine_with(provider_replying(reply, 1), split)
            .group(&input, "d", &mut cache())
            .await
            .unwrap();

        // d folds into c, then c (now 2 files, later) folds into b
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "a");
        assert_eq!(groups[1].id, "b");
        assert_eq!(groups[1].files, files(&["b1", "b2", "c1", "d1"]));
        assert_eq!(groups[1].confidence, 0.4);
        assert!(groups[1].description.contains("C"));
        assert_partition(&groups, &input);
    }

    #[tokio::test]
    async fn test_min_group_size_folds_small_groups() {
        let input = files(&["a1", "a2", "b1"]);
        let reply = r#"{"groups": [
            {"id": "a", "files": ["a1", "a2"]},
            {"id": "b", "files": ["b1"]}
        ]}"#;
        let split = SmartSplitConfig {
            min_group_size: 2,
            ..SmartSplitConfig::default()
        };

        let groups = engine_with(provider_replying(reply, 1), split)
            .group(&input, "d", &mut cache())
            .await
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].files, input);
    }

    #[tokio::test]
    async fn test_single_small_group_survives_min_size() {
        let split = SmartSplitConfig {
            min_group_size: 5,
            ..SmartSplitConfig::default()
        };
        let groups = engine_with(provider_replying(r#"{"groups": [{"files": ["a"]}]}"#, 1), split)
            .group(&files(&["a"]), "d", &mut cache())
            .await
            .unwrap();
        assert_eq!(groups.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_replies() {
        for reply in [
            "I cannot help with that",
            r#"{"groups": "auth"}"#,
            r#"{"result": []}"#,
            r#"{"groups": []}"#,
            r#"{"groups": [{"files": "a.rs"}]}"#,
        ] {
            let mut cache = cache();
            let err = engine(provider_replying(reply, 1))
                .group(&files(&["a.rs"]), "d", &mut cache)
                .await
                .unwrap_err();
            assert!(matches!(err, GroupingError::Malformed(_)), "{reply}: {err:?}");
            assert_eq!(cache.stats().size, 0);
        }
    }

    #[tokio::test]
    async fn test_provider_errors_map_to_grouping_errors() {
        let cases: Vec<(WizardError, GroupingError)> = vec![
            (WizardError::MissingApiKey, GroupingError::MissingApiKey),
            (
                WizardError::LlmApi {
                    status: 500,
                    message: "down".into(),
                },
                GroupingError::Status {
                    status: 500,
                    message: "down".into(),
                },
            ),
            (
                WizardError::EmptyResponse("OpenAI".into()),
                GroupingError::EmptyResponse,
            ),
        ];

        for (source, expected) in cases {
            let mut provider = MockLLMProvider::new();
            provider.expect_model().return_const("gpt-4o".to_string());
            let mut source = Some(source);
            provider
                .expect_send_prompt()
                .times(1)
                .returning(move |_, _| Err(source.take().unwrap_or(WizardError::NoStagedChanges)));

            let err = engine(provider)
                .group(&files(&["a.rs"]), "d", &mut cache())
                .await
                .unwrap_err();
            assert_eq!(err, expected);
        }
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let mut provider = MockLLMProvider::new();
        provider.expect_model().return_const("gpt-4o".to_string());
        provider
            .expect_send_prompt()
            .returning(|_, _| Err(WizardError::Timeout(30_000)));

        let err = engine(provider)
            .group(&files(&["a.rs"]), "d", &mut cache())
            .await
            .unwrap_err();
        assert!(matches!(err, GroupingError::Transport(msg) if msg.contains("30000")));
    }
}
