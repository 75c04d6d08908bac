use crate::git::DiffStats;

/// Extracts the `a/` path from a `diff --git` header.
fn extract_filename_from_diff_header(line: &str) -> Option<String> {
    let rest = line.strip_prefix("diff --git ")?;

    // locate the a/ b/ boundary via " b/" so paths with spaces survive
    if let Some(b_pos) = rest.find(" b/") {
        return rest[..b_pos].strip_prefix("a/").map(str::to_string);
    }

    // quoted form: diff --git "a/with space.rs" "b/with space.rs"
    if let Some(stripped) = rest.strip_prefix('"')
        && let Some(end) = stripped.find('"')
    {
        return stripped[..end].strip_prefix("a/").map(str::to_string);
    }

    rest.split_whitespace()
        .next()
        .and_then(|s| s.strip_prefix("a/"))
        .map(str::to_string)
}

/// Counts files, added and removed lines in a unified diff.
pub fn parse_diff_stats(diff: &str) -> DiffStats {
    let mut stats = DiffStats::default();

    for line in diff.lines() {
        if line.starts_with("diff --git") {
            if let Some(filename) = extract_filename_from_diff_header(line) {
                stats.files_changed.push(filename);
            }
        } else if line.starts_with('+') && !line.starts_with("+++") {
            stats.insertions += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            stats.deletions += 1;
        }
    }

    stats
}

/// Cuts `text` to at most `max_chars` characters and appends `marker` when
/// something was cut. Never splits a UTF-8 sequence.
pub fn truncate_with_marker(text: &str, max_chars: usize, marker: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], marker),
        None => text.to_string(),
    }
}

/// Prefixes every content line with `+`, returning the body and its line count.
fn added_lines(content: &str) -> (String, usize) {
    let content = content.strip_suffix('\n').unwrap_or(content);
    let lines: Vec<String> = content.split('\n').map(|line| format!("+{line}")).collect();
    (lines.join("\n"), lines.len())
}

/// Unified-diff-like block presenting `content` as a brand new file.
///
/// The block is context for the message generator, not a patch git can apply.
pub fn synthesize_new_file_diff(path: &str, content: &str) -> String {
    let (body, count) = added_lines(content);
    format!(
        "diff --git a/{path} b/{path}\nnew file mode 100644\n--- /dev/null\n+++ b/{path}\n@@ -0,0 +1,{count} @@\n{body}"
    )
}

/// Block presenting `content` as replacing a one-line placeholder original.
///
/// Used for staged files whose real diff came back empty, such as a file
/// deleted and then restored.
pub fn synthesize_recreated_file_diff(path: &str, content: &str) -> String {
    let (body, count) = added_lines(content);
    format!("diff --git a/{path} b/{path}\n--- a/{path}\n+++ b/{path}\n@@ -1 +1,{count} @@\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_diff_stats() {
        let diff = r#"diff --git a/src/main.rs b/src/main.rs
index 1234567..abcdefg 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,3 +1,5 @@
 fn main() {
+    println!("Hello");
+    println!("World");
-    println!("Old");
 }
"#;

        let stats = parse_diff_stats(diff);
        assert_eq!(stats.files_changed, vec!["src/main.rs"]);
        assert_eq!(stats.insertions, 2);
        assert_eq!(stats.deletions, 1);
    }

    #[test]
    fn test_parse_diff_stats_empty_diff() {
        assert_eq!(parse_diff_stats(""), DiffStats::default());
    }

    #[test]
    fn test_parse_diff_stats_path_with_spaces() {
        let diff = "diff --git a/docs/my notes.md b/docs/my notes.md\n+hello\n";
        let stats = parse_diff_stats(diff);
        assert_eq!(stats.files_changed, vec!["docs/my notes.md"]);
        assert_eq!(stats.insertions, 1);
    }

    #[test]
    fn test_parse_diff_stats_quoted_path() {
        let diff = "diff --git \"a/weird\tname.rs\" \"b/weird\tname.rs\"\n-gone\n";
        let stats = parse_diff_stats(diff);
        assert_eq!(stats.files_changed, vec!["weird\tname.rs"]);
        assert_eq!(stats.deletions, 1);
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_with_marker("abc", 3, "…"), "abc");
        assert_eq!(truncate_with_marker("", 0, "…"), "");
    }

    #[test]
    fn test_truncate_long_text_gets_marker() {
        assert_eq!(truncate_with_marker("abcdef", 4, "[cut]"), "abcd[cut]");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "日本語テキスト";
        assert_eq!(truncate_with_marker(text, 2, "…"), "日本…");
    }

    #[test]
    fn test_synthesize_new_file_diff() {
        let diff = synthesize_new_file_diff("src/new.rs", "fn a() {}\nfn b() {}\n");
        assert_eq!(
            diff,
            "diff --git a/src/new.rs b/src/new.rs\n\
             new file mode 100644\n\
             --- /dev/null\n\
             +++ b/src/new.rs\n\
             @@ -0,0 +1,2 @@\n\
             +fn a() {}\n\
             +fn b() {}"
        );
    }

    #[test]
    fn test_synthesize_recreated_file_diff() {
        let diff = synthesize_recreated_file_diff("a.txt", "only line");
        assert_eq!(
            diff,
            "diff --git a/a.txt b/a.txt\n--- a/a.txt\n+++ b/a.txt\n@@ -1 +1,1 @@\n+only line"
        );
    }

    #[test]
    fn test_synthesized_stats_count_every_line_as_insertion() {
        let diff = synthesize_new_file_diff("x.txt", "1\n2\n3");
        let stats = parse_diff_stats(&diff);
        assert_eq!(stats.files_changed, vec!["x.txt"]);
        assert_eq!(stats.insertions, 3);
        assert_eq!(stats.deletions, 0);
    }
}
