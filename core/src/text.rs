//! Small text helpers shared by the dispatcher.

/// Truncates `s` to at most `max` characters, on a character boundary.
///
/// Comment bodies and commit-message excerpts have platform length limits;
/// byte-indexed slicing could split a multi-byte character, so the cut is
/// counted in chars.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
