//! Small text helpers shared by output channels and answer cleaning.

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Truncate to at most `max_chars` characters, appending `...` when cut.
///
/// Counts `char`s, not bytes, so multi-byte text is never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{ELLIPSIS}", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Lower-case and trim, the form every matcher works on.
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_untouched() {
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn long_text_gets_ellipsis() {
        assert_eq!(truncate_chars("hello world", 5), "hello...");
    }

    #[test]
    fn multibyte_boundary_respected() {
        assert_eq!(truncate_chars("22°C today", 3), "22°...");
    }

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize("  HeLLo There \n"), "hello there");
    }
}
