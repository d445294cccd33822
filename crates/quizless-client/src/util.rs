/// Render an untrusted player name as inert text. Control characters
/// (notably ESC, which would let a name smuggle terminal escape
/// sequences into the UI) are replaced with U+FFFD. Everything printable
/// passes through unchanged.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect()
}

/// The only client-side validation on join: the quiz code must parse as
/// a number.
pub fn parse_quiz_code(input: &str) -> Option<u32> {
    input.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_neutralizes_escape_sequences() {
        assert_eq!(sanitize_name("\x1b[31mevil"), "\u{FFFD}[31mevil");
        assert_eq!(sanitize_name("a\nb\tc"), "a\u{FFFD}b\u{FFFD}c");
    }

    #[test]
    fn test_sanitize_leaves_plain_text_alone() {
        // markup is inert in a terminal, it stays as-is
        assert_eq!(sanitize_name("<script>alert(1)</script>"), "<script>alert(1)</script>");
        assert_eq!(sanitize_name("Žofia"), "Žofia");
    }

    #[test]
    fn test_parse_quiz_code() {
        assert_eq!(parse_quiz_code("48213"), Some(48213));
        assert_eq!(parse_quiz_code("  7 "), Some(7));
        assert_eq!(parse_quiz_code("abc"), None);
        assert_eq!(parse_quiz_code("-1"), None);
        assert_eq!(parse_quiz_code(""), None);
    }
}
