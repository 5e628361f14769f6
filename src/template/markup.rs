//! Helpers for the Javadoc comment syntax itself.

/// Opening delimiter of a Javadoc comment
pub const DOC_OPEN: &str = "/**";

/// Closing delimiter of a block comment
pub const DOC_CLOSE: &str = "*/";

/// Whether a line carries nothing but comment decoration (`*` and whitespace).
pub fn is_decoration(line: &str) -> bool {
    line.chars().all(|c| c.is_whitespace() || c == '*')
}

/// The decoration a comment line starts with, e.g. `" * "` for `" * text"`.
///
/// Lines that do not start with decoration yield their leading whitespace.
pub fn line_prefix(line: &str) -> &str {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();
    match trimmed.strip_prefix('*') {
        Some(rest) if !rest.starts_with('/') => {
            let gap = rest.len() - rest.trim_start_matches([' ', '\t']).len();
            &line[..indent + 1 + gap]
        }
        _ => &line[..indent],
    }
}

/// Reduces a comment to its plain description text.
///
/// Delimiters and leading `*` are removed, the block tag section (`@param`, `@return`, ...)
/// is dropped and the remaining lines are joined with single spaces.
///
/// # Examples
///
/// ```
/// use javadocky::strip_markup;
///
/// assert_eq!(strip_markup("/**\n * the full name\n */"), "the full name");
/// assert_eq!(strip_markup("/** count */"), "count");
/// assert_eq!(strip_markup("/**\n * first\n * second\n *\n * @since 1.0\n */"), "first second");
/// ```
pub fn strip_markup(comment: &str) -> String {
    let mut body = comment.trim();
    body = body
        .strip_prefix(DOC_OPEN)
        .or_else(|| body.strip_prefix("/*"))
        .unwrap_or(body);
    body = body.strip_suffix(DOC_CLOSE).unwrap_or(body);

    let mut parts = Vec::new();
    for line in body.lines() {
        let text = line.trim().trim_start_matches('*').trim();
        if text.starts_with('@') {
            break;
        }
        if !text.is_empty() {
            parts.push(text);
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_decoration() {
        assert!(is_decoration(" * "));
        assert!(is_decoration("   "));
        assert!(is_decoration(""));
        assert!(!is_decoration("/**"));
        assert!(!is_decoration(" */"));
        assert!(!is_decoration(" * x"));
    }

    #[test]
    fn test_line_prefix() {
        assert_eq!(line_prefix(" * <params>"), " * ");
        assert_eq!(line_prefix("     *   text"), "     *   ");
        assert_eq!(line_prefix("<params>"), "");
        assert_eq!(line_prefix("  text"), "  ");
        assert_eq!(line_prefix(" */"), " ");
    }

    #[test]
    fn test_strip_markup_plain_text() {
        assert_eq!(strip_markup("count"), "count");
        assert_eq!(strip_markup("/**\n *\n */"), "");
    }

    #[test]
    fn test_strip_markup_keeps_inline_tags() {
        assert_eq!(
            strip_markup("/**\n * the {@code name} of the person\n */"),
            "the {@code name} of the person"
        );
    }
}
