use std::collections::BTreeMap;

use crate::config::{AppConfig, CommitStyle};
use crate::constants::diff::TRUNCATED_MARKER;
use crate::constants::grouping::CONTEXT_DIFF_LIMIT;
use crate::git::diff::truncate_with_marker;

/// JSON shape the classifier must answer with
const GROUPS_JSON_EXAMPLE: &str = r#"{
  "groups": [
    {
      "id": "group-1",
      "name": "Group name",
      "description": "Short description",
      "files": ["src/file1.rs", "src/file2.rs"],
      "confidence": 0.8
    }
  ]
}"#;

/// Human-readable name of a configured language code.
pub fn language_name(code: &str) -> &'static str {
    match code {
        "pt" => "português",
        "es" => "español",
        "fr" => "français",
        "de" => "deutsch",
        "it" => "italiano",
        "ja" => "日本語",
        "ko" => "한국어",
        "zh" => "中文",
        _ => "english",
    }
}

/// Style rules in Portuguese when the target language is `pt`, English otherwise.
fn style_instructions(style: CommitStyle, language: &str) -> &'static str {
    match (language == "pt", style) {
        (true, CommitStyle::Conventional) => {
            "- Use formato: tipo(escopo): descrição\n\
             - Tipos válidos: feat, fix, docs, style, refactor, test, chore, build, ci\n\
             - Exemplo: \"feat(auth): adicionar validação de email\"\n\
             - Mantenha a primeira linha com até 50 caracteres"
        }
        (true, CommitStyle::Simple) => {
            "- Use formato simples e direto\n\
             - Comece com verbo no infinitivo\n\
             - Exemplo: \"corrigir validação de formulário\"\n\
             - Máximo 50 caracteres"
        }
        (true, CommitStyle::Detailed) => {
            "- Primeira linha: resumo em até 50 caracteres\n\
             - Se necessário, adicione corpo explicativo\n\
             - Use presente do indicativo\n\
             - Seja descritivo mas conciso"
        }
        (false, CommitStyle::Conventional) => {
            "- Use format: type(scope): description\n\
             - Valid types: feat, fix, docs, style, refactor, test, chore, build, ci\n\
             - Example: \"feat(auth): add email validation\"\n\
             - Keep first line under 50 characters"
        }
        (false, CommitStyle::Simple) => {
            "- Use simple and direct format\n\
             - Start with imperative verb\n\
             - Example: \"fix form validation\"\n\
             - Maximum 50 characters"
        }
        (false, CommitStyle::Detailed) => {
            "- First line: summary under 50 characters\n\
             - Add explanatory body if needed\n\
             - Use imperative mood\n\
             - Be descriptive but concise"
        }
    }
}

/// Builds the commit message prompt for one diff.
pub fn build_commit_prompt(diff: &str, filenames: &[String], config: &AppConfig) -> String {
    let language = language_name(&config.language);
    let style = config.style();

    let mut prompt = String::from(
        "You are an assistant specialized in writing Git commit messages.\n\nCONTEXT:\n",
    );
    prompt.push_str(&format!("- Language: {}\n", language));
    prompt.push_str(&format!("- Style: {}\n", style));
    let custom = config.prompt.custom_instructions.trim();
    if !custom.is_empty() {
        prompt.push_str(&format!("- Custom instructions: {}\n", custom));
    }

    prompt.push_str("\nCHANGED FILES:\n");
    for file in filenames {
        prompt.push_str(&format!("- {}\n", file));
    }

    prompt.push_str("\nINSTRUCTIONS:\n");
    prompt.push_str(style_instructions(style, &config.language));

    prompt.push_str(&format!(
        "\n\nAnalyze the diff below and write ONE commit message that:\n\
         1. Is clear and concise\n\
         2. Describes what changed\n\
         3. Follows the {style} style\n\
         4. Is written in {language}\n\
         5. Contains ONLY the commit message, without explanations or formatting\n\n\
         DIFF:\n```\n{diff}\n```\n\nCommit message:"
    ));

    prompt
}

/// Counts files per extension; files without one count as `no-extension`.
fn extension_stats(files: &[String]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for file in files {
        let name = file.rsplit('/').next().unwrap_or(file);
        let ext = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext,
            _ => "no-extension",
        };
        *counts.entry(ext).or_default() += 1;
    }
    counts
        .iter()
        .map(|(ext, count)| format!("{}: {}", ext, count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Classifier prompt carrying file statistics and a diff excerpt.
pub fn build_context_analysis_prompt(files: &[String], diff: &str, max_groups: usize) -> String {
    let excerpt = truncate_with_marker(diff, CONTEXT_DIFF_LIMIT, TRUNCATED_MARKER);

    format!(
        "Analyze the changed files and group them into logical commits.\n\n\
         FILES ({count}): {list}\n\
         TYPES: {stats}\n\n\
         DIFF SUMMARY:\n```\n{excerpt}\n```\n\n\
         Group related files. At most {max_groups} groups. Every file must appear in exactly one group. Answer in JSON:\n\
         {GROUPS_JSON_EXAMPLE}",
        count = files.len(),
        list = files.join(", "),
        stats = extension_stats(files),
    )
}

/// Classifier prompt built from paths only, for diffs too large to send.
pub fn build_fallback_prompt(files: &[String], max_groups: usize) -> String {
    // directories in first-seen order
    let mut dirs: Vec<(String, usize)> = Vec::new();
    for file in files {
        let dir = match file.rsplit_once('/') {
            Some((dir, _)) if !dir.is_empty() => dir.to_string(),
            _ => "root".to_string(),
        };
        match dirs.iter_mut().find(|(d, _)| *d == dir) {
            Some((_, count)) => *count += 1,
            None => dirs.push((dir, 1)),
        }
    }

    let dir_stats = dirs
        .iter()
        .map(|(dir, count)| format!("{}: {} file(s)", dir, count))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Group these files into logical commits based on their directories:\n\n\
         FILES BY DIRECTORY:\n{dir_stats}\n\n\
         FULL LIST: {list}\n\n\
         Group by related functionality. At most {max_groups} groups. Every file must appear in exactly one group. JSON:\n\
         {GROUPS_JSON_EXAMPLE}",
        list = files.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn files(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_commit_prompt_portuguese_conventional() {
        let config = AppConfig::default();
        let prompt = build_commit_prompt("+fn main() {}", &files(&["src/main.rs"]), &config);

        assert!(prompt.contains("- Language: português"));
        assert!(prompt.contains("- Style: conventional"));
        assert!(prompt.contains("Tipos válidos: feat, fix"));
        assert!(prompt.contains("- src/main.rs\n"));
        assert!(prompt.contains("```\n+fn main() {}\n```"));
        assert!(!prompt.contains("Custom instructions"));
    }

    #[test]
    fn test_commit_prompt_english_simple_with_custom_instructions() {
        let mut config = AppConfig::default();
        config.language = "en".to_string();
        config.commit_style = "simple".to_string();
        config.prompt.custom_instructions = "mention the ticket".to_string();

        let prompt = build_commit_prompt("diff", &files(&["a.rs", "b.rs"]), &config);

        assert!(prompt.contains("- Language: english"));
        assert!(prompt.contains("Start with imperative verb"));
        assert!(prompt.contains("- Custom instructions: mention the ticket"));
        assert!(prompt.contains("- a.rs\n- b.rs\n"));
    }

    #[test]
    fn test_commit_prompt_other_language_uses_english_rules() {
        let mut config = AppConfig::default();
        config.language = "fr".to_string();
        config.commit_style = "detailed".to_string();

        let prompt = build_commit_prompt("diff", &files(&["a.rs"]), &config);
        assert!(prompt.contains("Is written in français"));
        assert!(prompt.contains("Use imperative mood"));
    }

    #[test]
    fn test_extension_stats() {
        let stats = extension_stats(&files(&["src/a.rs", "src/b.rs", "README.md", "Makefile", ".env"]));
        assert_eq!(stats, "md: 1, no-extension: 2, rs: 2");
    }

    #[test]
    fn test_context_prompt_truncates_diff() {
        let diff = "x".repeat(CONTEXT_DIFF_LIMIT + 50);
        let prompt = build_context_analysis_prompt(&files(&["a.rs"]), &diff, 5);

        assert!(prompt.contains(TRUNCATED_MARKER));
        assert!(prompt.contains("FILES (1): a.rs"));
        assert!(prompt.contains("At most 5 groups"));
        assert!(prompt.contains("\"groups\""));
        assert!(!prompt.contains(&"x".repeat(CONTEXT_DIFF_LIMIT + 1)));
    }

    #[test]
    fn test_context_prompt_keeps_short_diff() {
        let prompt = build_context_analysis_prompt(&files(&["a.rs"]), "+short", 3);
        assert!(prompt.contains("```\n+short\n```"));
        assert!(!prompt.contains(TRUNCATED_MARKER));
    }

    #[test]
    fn test_fallback_prompt_groups_by_directory() {
        let prompt = build_fallback_prompt(
            &files(&["src/auth.rs", "README.md", "src/user.rs", "docs/guide.md"]),
            4,
        );

        assert!(prompt.contains("src: 2 file(s)\nroot: 1 file(s)\ndocs: 1 file(s)"));
        assert!(prompt.contains("FULL LIST: src/auth.rs, README.md, src/user.rs, docs/guide.md"));
        assert!(prompt.contains("At most 4 groups"));
        assert!(!prompt.contains("DIFF"));
    }
}
