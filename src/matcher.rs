use crate::MethodUnit;
use crate::template::{CustomTemplateEntry, ParsedTemplate};
use tracing::debug;

/// A custom template chosen for a method, predicates already removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected<'a> {
    pub name: &'a str,
    pub body: String,
}

/// Picks the custom template for methods outside the built-in roles.
///
/// Templates are parsed once and tried in stored order.
#[derive(Debug, Clone)]
pub struct CustomTemplateMatcher<'a> {
    candidates: Vec<(&'a str, ParsedTemplate)>,
}

impl<'a> CustomTemplateMatcher<'a> {
    pub fn new(entries: &'a [CustomTemplateEntry]) -> Self {
        let candidates = entries
            .iter()
            .map(|entry| (entry.name.as_str(), ParsedTemplate::parse(&entry.template)))
            .collect();
        Self { candidates }
    }

    /// The first template whose predicates all pass for `method`.
    ///
    /// # Examples
    ///
    /// ```
    /// use javadocky::{CustomTemplateEntry, CustomTemplateMatcher, MethodUnit};
    ///
    /// let entries = vec![CustomTemplateEntry {
    ///     name: "value".to_string(),
    ///     template: "/**\n * <nameContains> Value\n * Reads the value\n */".to_string(),
    /// }];
    /// let method = MethodUnit {
    ///     name: "getValue".to_string(),
    ///     is_constructor: false,
    ///     parameters: vec![],
    ///     return_type: Some("int".to_string()),
    ///     body: Some("{ return value; }".to_string()),
    ///     returned: Some("value".to_string()),
    ///     doc: None,
    ///     commented: false,
    ///     start: 0,
    /// };
    ///
    /// let selected = CustomTemplateMatcher::new(&entries).select(&method).unwrap();
    /// assert_eq!(selected.name, "value");
    /// assert_eq!(selected.body, "/**\n * Reads the value\n */");
    /// ```
    pub fn select(&self, method: &MethodUnit) -> Option<Selected<'a>> {
        let selected = self
            .candidates
            .iter()
            .find(|(name, parsed)| parsed.matches(name, method))
            .map(|(name, parsed)| Selected {
                name: *name,
                body: parsed.body.clone(),
            });
        match &selected {
            Some(selected) => debug!("custom template {} selected for {}", selected.name, method.name),
            None => debug!("no custom template matches {}", method.name),
        }
        selected
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParameterUnit;

    fn entry(name: &str, template: &str) -> CustomTemplateEntry {
        CustomTemplateEntry {
            name: name.to_string(),
            template: template.to_string(),
        }
    }

    fn method(name: &str, params: &[&str]) -> MethodUnit {
        MethodUnit {
            name: name.to_string(),
            is_constructor: false,
            parameters: params
                .iter()
                .map(|p| ParameterUnit {
                    name: p.to_string(),
                    parameter_type: "int".to_string(),
                })
                .collect(),
            return_type: Some("void".to_string()),
            body: Some("{}".to_string()),
            returned: None,
            doc: None,
            commented: false,
            start: 0,
        }
    }

    #[test]
    fn test_first_match_in_stored_order_wins() {
        let entries = vec![
            entry("move", "/**\n * <hasP> x, y\n * Moves\n */"),
            entry("any", "/**\n * Anything\n */"),
        ];
        let matcher = CustomTemplateMatcher::new(&entries);
        assert_eq!(matcher.len(), 2);
        assert_eq!(matcher.select(&method("go", &["x", "y"])).unwrap().name, "move");
        assert_eq!(matcher.select(&method("go", &["x"])).unwrap().name, "any");
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let entries = vec![entry("value", "/**\n * <nameContains> Value\n */")];
        let matcher = CustomTemplateMatcher::new(&entries);
        assert_eq!(matcher.select(&method("compute", &[])), None);
        assert!(CustomTemplateMatcher::new(&[]).is_empty());
    }

    #[test]
    fn test_predicate_lines_removed_from_body() {
        let entries = vec![entry(
            "sum",
            "/**\n * <returnTypeIs> void\n * <hasP> a\n * Sums <instance>\n */",
        )];
        let selected = CustomTemplateMatcher::new(&entries)
            .select(&method("add", &["a"]))
            .unwrap();
        assert_eq!(selected.body, "/**\n * Sums <instance>\n */");
    }
}
