//! Rendering of return types as readable, optionally cross-referenced text.

use crate::template::Tag;

/// Types that are never wrapped in a cross-reference
pub const PRIMITIVE_TYPES: [&str; 9] = [
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

const OF_KEYWORD: &str = " of ";
const AND_KEYWORD: &str = " and ";

/// A parsed type expression such as `Map<String, List<Integer>>[]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNode {
    pub name: String,
    pub args: Vec<TypeNode>,
    /// Array dimensions, e.g. `[][]`
    pub suffix: String,
}

impl TypeNode {
    fn is_linkable(&self) -> bool {
        !PRIMITIVE_TYPES.contains(&self.name.as_str()) && !self.name.starts_with('?')
    }

    /// Renders the type as `Outer of A and B`, wrapping reference types in `{@link }` when
    /// `linked` is set.
    pub fn render(&self, linked: bool) -> String {
        let mut out = if linked && self.is_linkable() {
            format!("{{@link {}}}", self.name)
        } else {
            self.name.clone()
        };
        out.push_str(&self.suffix);

        if !self.args.is_empty() {
            let args = self
                .args
                .iter()
                .map(|arg| arg.render(linked))
                .collect::<Vec<_>>();
            out.push_str(OF_KEYWORD);
            out.push_str(&args.join(AND_KEYWORD));
        }
        out
    }
}

/// Parses a Java type expression, `None` when its brackets do not balance.
pub fn parse_type(text: &str) -> Option<TypeNode> {
    let mut cursor = Cursor { text, pos: 0 };
    let node = cursor.parse_node()?;
    cursor.skip_whitespace();
    (cursor.pos == text.len()).then_some(node)
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn parse_node(&mut self) -> Option<TypeNode> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest.find(['<', '>', ',', '[']).unwrap_or(rest.len());
        let name = rest[..len].trim().to_string();
        if name.is_empty() {
            return None;
        }
        self.pos += len;

        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_node()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return None;
            }
        }

        let mut suffix = String::new();
        while self.eat('[') {
            if !self.eat(']') {
                return None;
            }
            suffix.push_str("[]");
        }
        Some(TypeNode { name, args, suffix })
    }
}

/// Substitutes `<returnType>` in `template` with the formatted `return_type`.
///
/// Occurrences written as `{@link <returnType>}` get the cross-referenced rendering, the
/// others the plain one.
///
/// # Examples
///
/// ```
/// use javadocky::format_return_type;
///
/// assert_eq!(
///     format_return_type("@return {@link <returnType>}", "List<String>"),
///     "@return {@link List} of {@link String}"
/// );
/// assert_eq!(format_return_type("@return {@link <returnType>}", "int"), "@return int");
/// assert_eq!(format_return_type("as <returnType>", "Map<K, V>"), "as Map of K and V");
/// ```
pub fn format_return_type(template: &str, return_type: &str) -> String {
    let marker = Tag::ReturnType.marker();
    if !template.contains(marker) {
        return template.to_string();
    }
    let node = parse_type(return_type);
    let render = |linked: bool| match &node {
        Some(node) => node.render(linked),
        None => return_type.trim().to_string(),
    };

    let link_form = format!("{{@link {marker}}}");
    let mut out = template.to_string();
    if out.contains(&link_form) {
        out = out.replace(&link_form, &render(true));
    }
    if out.contains(marker) {
        out = out.replace(marker, &render(false));
    }
    out
}
