use super::{ClassUnit, Declaration, DocComment, FieldUnit, JavaFile, MethodUnit, ParameterUnit};
use crate::classify::{MethodRole, classify};
use std::fmt;
use std::path::PathBuf;

/// Implementation of JavaFile.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use javadocky::JavaFile;
///
/// let file = JavaFile::new(PathBuf::from("src/Person.java"), String::new());
///
/// assert_eq!(file.path, PathBuf::from("src/Person.java"));
/// assert!(file.classes.is_empty());
/// assert!(file.primary_class().is_none());
/// ```
impl JavaFile {
    /// Creates a new file unit with no declarations.
    pub fn new(path: PathBuf, source: String) -> Self {
        Self {
            path,
            source,
            classes: Vec::new(),
        }
    }

    /// The first top-level type, the one a change notification is attributed to.
    pub fn primary_class(&self) -> Option<&ClassUnit> {
        self.classes.first()
    }
}

impl ClassUnit {
    /// Looks up a field of this class by name, ignoring case.
    ///
    /// Returns the field's own spelling of the name.
    pub fn find_field_ignore_case(&self, name: &str) -> Option<&FieldUnit> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    /// Visits this class and every nested class, depth first, together with its dotted path.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&str, &'a ClassUnit)) {
        self.walk_with_prefix("", visit);
    }

    fn walk_with_prefix<'a>(&'a self, prefix: &str, visit: &mut dyn FnMut(&str, &'a ClassUnit)) {
        let path = if prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", prefix, self.name)
        };
        visit(&path, self);
        for inner in &self.classes {
            inner.walk_with_prefix(&path, visit);
        }
    }
}

impl MethodUnit {
    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// The role this method plays, derived from its name and signature.
    pub fn role(&self) -> MethodRole {
        classify(&self.name, self.arity(), self.is_constructor)
    }

    /// Whether the method declares a parameter named `name`.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    /// Parameters rendered as `Type name, Type name`.
    pub fn parameter_list(&self) -> String {
        self.parameters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Body text with every whitespace run collapsed to a single space.
    ///
    /// Used to pair a declaration from a re-parsed text with its live counterpart.
    pub fn normalized_body(&self) -> Option<String> {
        self.body
            .as_deref()
            .map(|body| body.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

impl fmt::Display for ParameterUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.parameter_type, self.name)
    }
}

impl Declaration for ClassUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> Option<&DocComment> {
        self.doc.as_ref()
    }

    fn is_commented(&self) -> bool {
        self.commented
    }

    fn start(&self) -> usize {
        self.range.start
    }
}

impl Declaration for FieldUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> Option<&DocComment> {
        self.doc.as_ref()
    }

    fn is_commented(&self) -> bool {
        self.commented
    }

    fn start(&self) -> usize {
        self.start
    }
}

impl Declaration for MethodUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> Option<&DocComment> {
        self.doc.as_ref()
    }

    fn is_commented(&self) -> bool {
        self.commented
    }

    fn start(&self) -> usize {
        self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClassKind;

    fn method(name: &str, params: &[(&str, &str)], body: Option<&str>) -> MethodUnit {
        MethodUnit {
            name: name.to_string(),
            is_constructor: false,
            parameters: params
                .iter()
                .map(|(ty, name)| ParameterUnit {
                    name: name.to_string(),
                    parameter_type: ty.to_string(),
                })
                .collect(),
            return_type: Some("void".to_string()),
            body: body.map(String::from),
            returned: None,
            doc: None,
            commented: false,
            start: 0,
        }
    }

    fn class(name: &str, classes: Vec<ClassUnit>) -> ClassUnit {
        ClassUnit {
            name: name.to_string(),
            kind: ClassKind::Class,
            doc: None,
            commented: false,
            range: 0..0,
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            classes,
        }
    }

    #[test]
    fn test_parameter_list_rendering() {
        let m = method("setName", &[("String", "name"), ("int", "age")], None);
        assert_eq!(m.parameter_list(), "String name, int age");
        assert_eq!(m.arity(), 2);
        assert!(m.has_parameter("age"));
        assert!(!m.has_parameter("Age"));
    }

    #[test]
    fn test_normalized_body_collapses_whitespace() {
        let m = method("run", &[], Some("{\n    this.a =   b;\n}"));
        assert_eq!(m.normalized_body().as_deref(), Some("{ this.a = b; }"));
    }

    #[test]
    fn test_walk_visits_nested_classes_with_paths() {
        let outer = class("Outer", vec![class("Inner", vec![class("Deep", vec![])])]);
        let mut seen = Vec::new();
        outer.walk(&mut |path, _| seen.push(path.to_string()));
        assert_eq!(seen, vec!["Outer", "Outer.Inner", "Outer.Inner.Deep"]);
    }
}
