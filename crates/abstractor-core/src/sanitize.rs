//! Control-character sanitizing.
//!
//! PDF text layers (and OCR output to a lesser degree) routinely carry
//! control characters that are illegal in the places the extracted abstract
//! ends up: JSON request bodies and generated report text. Everything else,
//! including non-ASCII and multibyte characters, passes through untouched.

/// The characters stripped by [`sanitize`]: U+0000–U+0008, U+000B, U+000C,
/// U+000E–U+001F and U+007F. Tab, LF and CR survive.
fn is_illegal(c: char) -> bool {
    matches!(
        c,
        '\u{0000}'..='\u{0008}' | '\u{000B}' | '\u{000C}' | '\u{000E}'..='\u{001F}' | '\u{007F}'
    )
}

/// Remove illegal control characters from `text`.
///
/// Pure and total: never fails, preserves character order, and the output is
/// never longer than the input.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| !is_illegal(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(sanitize("a\u{0000}b\u{0007}c"), "abc");
        assert_eq!(sanitize("x\u{000B}y\u{000C}z"), "xyz");
        assert_eq!(sanitize("del\u{007F}eted"), "deleted");
    }

    #[test]
    fn test_keeps_whitespace_controls() {
        // Tab, LF and CR are structural for the locator and must survive.
        assert_eq!(sanitize("a\tb\nc\rd"), "a\tb\nc\rd");
    }

    #[test]
    fn test_keeps_non_ascii() {
        assert_eq!(sanitize("résumé — ключевые слова"), "résumé — ключевые слова");
    }

    #[test]
    fn test_idempotent() {
        let input = "a\u{0001}b\u{001F}c plain text\n";
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_output_never_longer() {
        let inputs = ["", "abc", "\u{0000}\u{0001}", "mixed\u{000E}text"];
        for input in inputs {
            assert!(sanitize(input).chars().count() <= input.chars().count());
        }
    }

    #[test]
    fn test_output_contains_no_illegal_chars() {
        let input: String = (0u32..0x80).filter_map(char::from_u32).collect();
        assert!(!sanitize(&input).chars().any(is_illegal));
    }
}
