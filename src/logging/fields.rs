//! Field helpers for structured logging

/// Longest prompt preview written to logs, in characters.
const PROMPT_PREVIEW_CHARS: usize = 100;

/// Prompt preview for logging, or `None` when content logging is disabled.
///
/// # Examples
///
/// ```
/// use fluxtogether::logging::truncate_prompt;
///
/// assert_eq!(truncate_prompt("a red fox", true).as_deref(), Some("a red fox"));
/// assert!(truncate_prompt("a red fox", false).is_none());
/// ```
pub fn truncate_prompt(prompt: &str, enable_content_logging: bool) -> Option<String> {
    if !enable_content_logging || prompt.is_empty() {
        return None;
    }

    Some(truncate_chars(prompt, PROMPT_PREVIEW_CHARS))
}

/// Truncate on a character boundary, appending an ellipsis when shortened.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
        None => s.to_string(),
    }
}
