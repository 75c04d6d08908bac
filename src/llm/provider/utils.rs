//! Endpoint and credential helpers.

pub const OPENAI_API_SUFFIX: &str = "/v1/chat/completions";

pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com";

/// Completes a configured base URL into the chat completions endpoint.
///
/// - `https://api.openai.com` gains `/v1/chat/completions`
/// - `https://proxy.local/v1` only gains `/chat/completions`
/// - a URL that already ends with the suffix is kept as is
pub fn complete_endpoint(base_url: &str, expected_suffix: &str) -> String {
    let url = base_url.trim_end_matches('/');
    let suffix = expected_suffix.trim_start_matches('/');

    if url.ends_with(suffix) {
        return url.to_string();
    }

    // the URL may already carry a leading part of the suffix, e.g. ".../v1"
    let parts: Vec<&str> = suffix.split('/').collect();
    for i in (0..parts.len()).rev() {
        let partial = parts[..=i].join("/");
        if url.ends_with(&format!("/{partial}")) {
            let remaining = parts[i + 1..].join("/");
            if remaining.is_empty() {
                return url.to_string();
            }
            return format!("{}/{}", url, remaining);
        }
    }

    format!("{}/{}", url, suffix)
}

/// Shows the first and last four characters of a key.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}
