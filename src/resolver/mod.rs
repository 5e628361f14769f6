mod params;
mod return_type;

use crate::classify::MethodRole;
use crate::matcher::CustomTemplateMatcher;
use crate::template::{DocItem, Tag, Templates, delete_fragment, strip_directive, substitute};
use crate::{ClassUnit, FieldUnit, MethodUnit};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

pub use params::{expand_params, field_description};
pub use return_type::{PRIMITIVE_TYPES, TypeNode, format_return_type, parse_type};

static THIS_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bthis\s*\.\s*(\w+)\s*=[^=]").unwrap());
static PLAIN_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w.])(\w+)\s*=[^=]").unwrap());

/// The declaration a template is resolved for
#[derive(Debug, Clone, Copy)]
pub enum DocTarget<'a> {
    Class(&'a ClassUnit),
    Field(&'a FieldUnit),
    Constructor(&'a MethodUnit),
    Method {
        method: &'a MethodUnit,
        /// The enclosing class, consulted to find the field a setter assigns
        container: Option<&'a ClassUnit>,
    },
}

/// Turns templates into comment text for concrete declarations
#[derive(Debug, Clone, Copy)]
pub struct DocuResolver<'a> {
    templates: &'a Templates,
}

impl<'a> DocuResolver<'a> {
    pub fn new(templates: &'a Templates) -> Self {
        Self { templates }
    }

    pub fn class_docu(&self, class: &ClassUnit) -> Option<String> {
        let template = self.templates.item(DocItem::Classes)?;
        self.resolve(template, DocTarget::Class(class))
    }

    pub fn field_docu(&self, field: &FieldUnit) -> Option<String> {
        let template = self.templates.item(DocItem::Fields)?;
        self.resolve(template, DocTarget::Field(field))
    }

    pub fn constructor_docu(&self, constructor: &MethodUnit) -> Option<String> {
        let template = self.templates.item(DocItem::Constructors)?;
        self.resolve(template, DocTarget::Constructor(constructor))
    }

    /// Documents a method with the template of its role, or the first matching custom
    /// template when it plays no built-in role.
    pub fn method_docu(&self, method: &MethodUnit, container: Option<&ClassUnit>) -> Option<String> {
        if !self.templates.is_enabled(DocItem::Methods) {
            return None;
        }
        let target = DocTarget::Method { method, container };
        match method.role() {
            MethodRole::Custom => {
                let selected =
                    CustomTemplateMatcher::new(self.templates.custom_templates()).select(method)?;
                self.resolve(&selected.body, target)
            }
            role => {
                let Some(template) = self.templates.role_template(role) else {
                    debug!("no {} template for {}", role, method.name);
                    return None;
                };
                self.resolve(template, target)
            }
        }
    }

    /// Resolves every tag of `template` for `target`.
    ///
    /// Returns `None` when nothing but whitespace is left.
    ///
    /// # Examples
    ///
    /// ```
    /// use javadocky::{DocTarget, DocuResolver, FieldUnit, Templates};
    ///
    /// let templates = Templates::default();
    /// let field = FieldUnit {
    ///     name: "count".to_string(),
    ///     field_type: "int".to_string(),
    ///     doc: None,
    ///     commented: false,
    ///     start: 0,
    /// };
    /// let resolver = DocuResolver::new(&templates);
    /// assert_eq!(
    ///     resolver.resolve("/**\n * <instance>\n */", DocTarget::Field(&field)).as_deref(),
    ///     Some("/**\n * count\n */")
    /// );
    /// ```
    pub fn resolve(&self, template: &str, target: DocTarget<'_>) -> Option<String> {
        let text = match target {
            DocTarget::Class(class) => substitute_name(template, &class.name),
            DocTarget::Field(field) => substitute_name(template, &field.name),
            DocTarget::Constructor(constructor) => {
                let text = substitute(template, Tag::ClassName, &constructor.name);
                self.expand(&text, constructor)
            }
            DocTarget::Method { method, container } => {
                self.method_text(template, method, container)
            }
        };
        let text = scrub(&text);
        (!text.trim().is_empty()).then_some(text)
    }

    fn method_text(&self, template: &str, method: &MethodUnit, container: Option<&ClassUnit>) -> String {
        let text = match method_instance(method, container) {
            Some(instance) => substitute(template, Tag::Instance, &instance),
            None => {
                let text = delete_fragment(template, Tag::Instance);
                delete_fragment(&text, Tag::ReturnType)
            }
        };
        let text = match method.return_type.as_deref() {
            Some(return_type) => format_return_type(&text, return_type),
            None => text,
        };
        self.expand(&text, method)
    }

    fn expand(&self, text: &str, method: &MethodUnit) -> String {
        expand_params(
            text,
            &method.parameters,
            self.templates.item(DocItem::Fields),
        )
    }
}

fn substitute_name(template: &str, name: &str) -> String {
    let text = substitute(template, Tag::ClassName, name);
    substitute(&text, Tag::Instance, name)
}

/// Removes every tag left after substitution so no placeholder reaches the output.
pub(crate) fn scrub(text: &str) -> String {
    Tag::ALL.into_iter().fold(text.to_string(), |text, tag| {
        if tag.is_predicate() {
            strip_directive(&text, tag)
        } else {
            delete_fragment(&text, tag)
        }
    })
}

/// What `<instance>` stands for in a method comment.
///
/// Setters name the field they assign; other methods their returned expression.
fn method_instance(method: &MethodUnit, container: Option<&ClassUnit>) -> Option<String> {
    if method.role() == MethodRole::Mutator {
        if let Some(field) = setter_target(method, container) {
            return Some(field);
        }
    }
    method.returned.clone()
}

/// The field a setter assigns.
pub fn setter_target(method: &MethodUnit, container: Option<&ClassUnit>) -> Option<String> {
    let body = method.body.as_deref().unwrap_or_default();
    if let Some(captures) = THIS_ASSIGN.captures(body) {
        return Some(captures[1].to_string());
    }

    let container = container?;
    let assigned = PLAIN_ASSIGN
        .captures_iter(body)
        .map(|captures| captures[1].to_string())
        .filter(|id| !method.has_parameter(id))
        .find_map(|id| container.find_field_ignore_case(&id));
    if let Some(field) = assigned {
        return Some(field.name.clone());
    }

    let stem = method.name.get(3..).filter(|_| {
        method
            .name
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("set"))
    })?;
    container
        .find_field_ignore_case(stem)
        .map(|field| field.name.clone())
}
