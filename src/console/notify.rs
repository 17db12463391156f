//! Turning failed responses into a single user-visible message.

use serde_json::Value;

/// Message to show the user for a failed generation.
///
/// A JSON body with an `error` field yields that field. Anything else is
/// cleaned of JSON punctuation and `error:` markers.
///
/// # Examples
///
/// ```
/// use fluxtogether::console::user_message;
///
/// assert_eq!(user_message(r#"{"error":"rate limited"}"#), "rate limited");
/// assert_eq!(user_message("Error: upstream unavailable"), "upstream unavailable");
/// ```
pub fn user_message(raw: &str) -> String {
    if let Some(message) = structured_error(raw) {
        return message;
    }
    clean_raw_message(raw)
}

fn structured_error(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw).ok()?;
    match value.get("error")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn clean_raw_message(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '"' | '\\'))
        .collect();
    remove_ignore_ascii_case(&stripped, "error:")
        .trim()
        .to_string()
}

/// Remove every occurrence of an ASCII `needle`, ignoring case.
fn remove_ignore_ascii_case(haystack: &str, needle: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `haystack`
    let lowered = haystack.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for (idx, _) in lowered.match_indices(needle) {
        out.push_str(&haystack[last..idx]);
        last = idx + needle.len();
    }
    out.push_str(&haystack[last..]);
    out
}
