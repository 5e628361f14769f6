//! The tag vocabulary of templates and the primitive edits performed with it.

use super::markup::{DOC_CLOSE, DOC_OPEN, is_decoration};
use std::fmt;

/// Block tag whose line depends entirely on the value it documents
const RETURN_BLOCK_TAG: &str = "@return";

/// A placeholder recognised inside templates, written as `<name>`.
///
/// # Examples
///
/// ```
/// use javadocky::Tag;
///
/// assert_eq!(Tag::ReturnType.marker(), "<returnType>");
/// assert_eq!(Tag::from_name("hasP"), Some(Tag::HasP));
/// assert!(Tag::NameContains.is_predicate());
/// assert!(!Tag::Params.is_predicate());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Replaced with the class (or declaration) name
    ClassName,
    /// Replaced with the field name, the returned expression or the assigned field
    Instance,
    /// Expanded into one `@param` line per parameter
    Params,
    /// Replaced with the formatted return type
    ReturnType,
    /// Predicate: the parameter list contains every listed token
    HasP,
    /// Predicate: the return type equals the argument
    ReturnTypeIs,
    /// Predicate: the method name contains the argument
    NameContains,
}

impl Tag {
    /// Every known tag
    pub const ALL: [Tag; 7] = [
        Tag::ClassName,
        Tag::Instance,
        Tag::Params,
        Tag::ReturnType,
        Tag::HasP,
        Tag::ReturnTypeIs,
        Tag::NameContains,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Tag::ClassName => "className",
            Tag::Instance => "instance",
            Tag::Params => "params",
            Tag::ReturnType => "returnType",
            Tag::HasP => "hasP",
            Tag::ReturnTypeIs => "returnTypeIs",
            Tag::NameContains => "nameContains",
        }
    }

    /// The textual form found in templates
    pub const fn marker(self) -> &'static str {
        match self {
            Tag::ClassName => "<className>",
            Tag::Instance => "<instance>",
            Tag::Params => "<params>",
            Tag::ReturnType => "<returnType>",
            Tag::HasP => "<hasP>",
            Tag::ReturnTypeIs => "<returnTypeIs>",
            Tag::NameContains => "<nameContains>",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }

    /// Predicate tags gate custom templates and never reach the output
    pub const fn is_predicate(self) -> bool {
        matches!(self, Tag::HasP | Tag::ReturnTypeIs | Tag::NameContains)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Replaces every occurrence of `tag` with `value`.
pub fn substitute(template: &str, tag: Tag, value: &str) -> String {
    template.replace(tag.marker(), value)
}

/// Deletes `tag` together with the fragment that depends on it.
///
/// An `@return` line holding the tag goes away entirely. Elsewhere the tag is removed along
/// with an enclosing inline tag such as `{@link <tag>}`. A line left with decoration only is
/// dropped.
///
/// # Examples
///
/// ```
/// use javadocky::{Tag, delete_fragment};
///
/// let template = "/**\n * Reads {@code <instance>} from disk\n * @return <instance>\n */";
/// assert_eq!(delete_fragment(template, Tag::Instance), "/**\n * Reads from disk\n */");
/// ```
pub fn delete_fragment(template: &str, tag: Tag) -> String {
    let marker = tag.marker();
    if !template.contains(marker) {
        return template.to_string();
    }

    let mut lines = Vec::new();
    for line in template.split('\n') {
        if !line.contains(marker) {
            lines.push(line.to_string());
            continue;
        }
        let delimits = line.contains(DOC_OPEN) || line.contains(DOC_CLOSE);
        if line.contains(RETURN_BLOCK_TAG) && !delimits {
            continue;
        }
        let stripped = remove_with_markup(line, marker);
        if is_decoration(&stripped) {
            continue;
        }
        lines.push(stripped.trim_end().to_string());
    }
    lines.join("\n")
}

/// Removes `<tag> argument` directives, dropping lines left with decoration only.
///
/// A closing `*/` after the directive stays in place.
///
/// # Examples
///
/// ```
/// use javadocky::{Tag, strip_directive};
///
/// assert_eq!(strip_directive("/** Sums <hasP> a, b */", Tag::HasP), "/** Sums */");
/// assert_eq!(strip_directive("/**\n * Sums\n * <hasP> a, b\n */", Tag::HasP), "/**\n * Sums\n */");
/// ```
pub fn strip_directive(template: &str, tag: Tag) -> String {
    let marker = tag.marker();
    let mut lines = Vec::new();
    for line in template.split('\n') {
        match line.find(marker) {
            Some(pos) => lines.extend(split_directive_line(line, pos).1),
            None => lines.push(line.to_string()),
        }
    }
    lines.join("\n")
}

/// Splits a line whose first directive starts at `first`.
///
/// Returns where directive arguments end, which is the closing delimiter or the line end, and
/// the line with its directives removed. The line is `None` when only decoration is left.
pub(crate) fn split_directive_line(line: &str, first: usize) -> (usize, Option<String>) {
    let close = line.rfind(DOC_CLOSE).filter(|&c| c > first);
    let kept = line[..first].trim_end();
    let kept = match close {
        Some(close) if is_decoration(kept) => {
            let indent = &line[..line.len() - line.trim_start().len()];
            Some(format!("{}{}", indent, &line[close..]))
        }
        Some(close) => Some(format!("{} {}", kept, &line[close..])),
        None if is_decoration(kept) => None,
        None if line.ends_with('\r') => Some(format!("{}\r", kept)),
        None => Some(kept.to_string()),
    };
    (close.unwrap_or(line.len()), kept)
}

/// Removes every occurrence of `marker` from one line, with its enclosing inline tag.
fn remove_with_markup(line: &str, marker: &str) -> String {
    let mut out = line.to_string();
    while let Some(pos) = out.find(marker) {
        let end = pos + marker.len();
        let (start, stop) = enclosing_inline_tag(&out, pos, end).unwrap_or((pos, end));
        out.replace_range(start..stop, "");
        if out[..start].ends_with(' ') && out[start..].starts_with(' ') {
            out.remove(start);
        }
    }
    out
}

/// Byte span of a `{@... marker ...}` construct wrapping `pos..end`, if any.
fn enclosing_inline_tag(line: &str, pos: usize, end: usize) -> Option<(usize, usize)> {
    let open = line[..pos].rfind("{@")?;
    if line[open..pos].contains('}') {
        return None;
    }
    let close = end + line[end..].find('}')?;
    if line[end..close].contains('{') {
        return None;
    }
    Some((open, close + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tag_round_trips_through_its_name() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_name(tag.name()), Some(tag));
            assert_eq!(tag.marker(), format!("<{}>", tag.name()));
            assert_eq!(tag.to_string(), tag.marker());
        }
        assert_eq!(Tag::from_name("unknown"), None);
    }

    #[test]
    fn test_substitute_replaces_all_occurrences() {
        let template = "/**\n * <instance> and <instance>\n */";
        assert_eq!(
            substitute(template, Tag::Instance, "count"),
            "/**\n * count and count\n */"
        );
    }

    #[test]
    fn test_delete_fragment_removes_link_wrapper() {
        let template = "/**\n * Value as {@link <returnType>} instance\n */";
        assert_eq!(
            delete_fragment(template, Tag::ReturnType),
            "/**\n * Value as instance\n */"
        );
    }

    #[test]
    fn test_delete_fragment_drops_emptied_lines() {
        let template = "/**\n * Method to run\n * <instance>\n */";
        assert_eq!(
            delete_fragment(template, Tag::Instance),
            "/**\n * Method to run\n */"
        );
    }

    #[test]
    fn test_delete_fragment_keeps_comment_delimiters() {
        let template = "/** @return <instance> */";
        assert_eq!(delete_fragment(template, Tag::Instance), "/** @return */");
    }

    #[test]
    fn test_delete_fragment_without_tag_is_identity() {
        let template = "/**\n * nothing here\n */";
        assert_eq!(delete_fragment(template, Tag::Params), template);
    }

    #[test]
    fn test_strip_directive() {
        let template = "/**\n * <nameContains> Value\n * Docs <hasP> a, b\n */";
        let stripped = strip_directive(template, Tag::NameContains);
        assert_eq!(stripped, "/**\n * Docs <hasP> a, b\n */");
        assert_eq!(strip_directive(&stripped, Tag::HasP), "/**\n * Docs\n */");
    }

    #[test]
    fn test_strip_directive_keeps_closing_delimiter() {
        assert_eq!(
            strip_directive("/** The A <hasP> x */", Tag::HasP),
            "/** The A */"
        );
        assert_eq!(
            strip_directive("/**\n * The A\n * <returnTypeIs> int */", Tag::ReturnTypeIs),
            "/**\n * The A\n */"
        );
        assert_eq!(
            strip_directive("/**\r\n * The A <nameContains> a\r\n */", Tag::NameContains),
            "/**\r\n * The A\r\n */"
        );
    }
}
