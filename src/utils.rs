//! Shared text helpers used by both report renderers.

/// Character limit for content previews.
pub const PREVIEW_CHAR_LIMIT: usize = 500;

/// First 500 characters of the content, with a trailing `...` only when
/// something was actually cut off. Counts characters, not bytes, so
/// multi-byte content is never split mid-character.
pub fn truncate_preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHAR_LIMIT) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// Uppercase the first character of a label; the rest is untouched.
pub fn capitalize_label(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
