//! Response cleanup and JSON extraction.

use serde_json::Value;

use crate::constants::ui::ERROR_PREVIEW_LENGTH;

/// Returns the first well-formed JSON object embedded in free text.
///
/// Models often wrap JSON in prose or code fences; every `{` is tried as a
/// starting point until one parses into an object.
pub fn extract_first_json_object(text: &str) -> Option<serde_json::Map<String, Value>> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Object(map))) => Some(map),
            _ => None,
        }
    })
}

/// Truncates a response for log and error previews.
pub fn truncate_for_preview(s: &str) -> String {
    match s.char_indices().nth(ERROR_PREVIEW_LENGTH) {
        Some((boundary, _)) => format!("{}...", &s[..boundary]),
        None => s.to_string(),
    }
}

/// Strips code fences and stray backticks around a commit message.
pub fn clean_commit_response(response: &str) -> String {
    let trimmed = response.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        // optional language tag on the fence line
        let after_lang = match rest.find('\n') {
            Some(pos) if rest[..pos].trim().len() <= 20 && !rest[..pos].contains(' ') => {
                &rest[pos + 1..]
            }
            _ => rest,
        };
        let inner = after_lang.strip_suffix("```").unwrap_or(after_lang);
        return inner.trim().to_string();
    }

    trimmed
        .trim_start_matches('`')
        .trim_end_matches('`')
        .trim()
        .to_string()
}
