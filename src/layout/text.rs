const TABSIZE: usize = 4;

/// Collapses every run of whitespace, line breaks included, into a single space. Hidden text
/// goes through this so that line breaks in cover material never move the cursor.
///
/// ```
/// use pdf_mixer::layout::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("a\n\n  b"), "a b");
/// assert_eq!(collapse_whitespace(" x\t"), " x ");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                collapsed.push(' ');
            }
            in_whitespace = true;
        } else {
            collapsed.push(ch);
            in_whitespace = false;
        }
    }
    collapsed
}

/// Normalizes newlines to `\n` and replaces tabs with spaces. Line breaks in visible text
/// are kept.
pub fn normalize_visible(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', &" ".repeat(TABSIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_line_breaks_and_spaces() {
        assert_eq!(collapse_whitespace("a\n\n  b"), "a b");
        assert_eq!(collapse_whitespace("a\r\n\tb  c"), "a b c");
        assert_eq!(collapse_whitespace(""), "");
        assert_eq!(collapse_whitespace("\n\n"), " ");
    }

    #[test]
    fn visible_text_keeps_line_breaks() {
        assert_eq!(normalize_visible("a\n\nb"), "a\n\nb");
        assert_eq!(normalize_visible("a\r\nb\rc"), "a\nb\nc");
        assert_eq!(normalize_visible("\tx"), "    x");
    }
}
