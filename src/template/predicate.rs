//! Parsing and evaluation of the predicate directives carried by custom templates.

use super::tag::{Tag, split_directive_line};
use crate::MethodUnit;

/// The condition a predicate directive expresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    /// `<nameContains> substr`
    NameContains,
    /// `<returnTypeIs> Type`
    ReturnTypeIs,
    /// `<hasP> a, b`
    HasParams,
}

impl PredicateKind {
    pub const ALL: [PredicateKind; 3] = [
        PredicateKind::NameContains,
        PredicateKind::ReturnTypeIs,
        PredicateKind::HasParams,
    ];

    pub const fn tag(self) -> Tag {
        match self {
            PredicateKind::NameContains => Tag::NameContains,
            PredicateKind::ReturnTypeIs => Tag::ReturnTypeIs,
            PredicateKind::HasParams => Tag::HasP,
        }
    }
}

/// One directive found in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub kind: PredicateKind,
    /// The argument as written, spacing preserved
    pub argument: String,
}

impl Predicate {
    /// Evaluates the predicate for `method`.
    ///
    /// `template_name` is the registered name of the custom template, used when a
    /// `nameContains` directive has no argument. Malformed arguments never pass.
    pub fn evaluate(&self, template_name: &str, method: &MethodUnit) -> bool {
        let argument = compact(&self.argument);
        match self.kind {
            PredicateKind::NameContains => {
                let needle = if argument.is_empty() {
                    compact(template_name)
                } else {
                    argument
                };
                !needle.is_empty() && method.name.contains(&needle)
            }
            PredicateKind::ReturnTypeIs => {
                !argument.is_empty()
                    && method
                        .return_type
                        .as_deref()
                        .is_some_and(|ty| compact(ty) == argument)
            }
            PredicateKind::HasParams => {
                let rendered = compact(&method.parameter_list());
                let mut tokens = argument.split(',').filter(|t| !t.is_empty()).peekable();
                tokens.peek().is_some() && tokens.all(|token| rendered.contains(token))
            }
        }
    }
}

/// A custom template split into its predicate list and the body left to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    pub predicates: Vec<Predicate>,
    pub body: String,
}

impl ParsedTemplate {
    /// Splits `template` into directives and body.
    ///
    /// A directive's argument runs to the next directive on the same line or to the end of
    /// the line. Lines that only held directives are removed from the body.
    ///
    /// # Examples
    ///
    /// ```
    /// use javadocky::{ParsedTemplate, PredicateKind};
    ///
    /// let parsed = ParsedTemplate::parse("/**\n * <nameContains> Value\n * Gets it\n */");
    /// assert_eq!(parsed.predicates.len(), 1);
    /// assert_eq!(parsed.predicates[0].kind, PredicateKind::NameContains);
    /// assert_eq!(parsed.predicates[0].argument, " Value");
    /// assert_eq!(parsed.body, "/**\n * Gets it\n */");
    /// ```
    pub fn parse(template: &str) -> Self {
        let mut predicates = Vec::new();
        let mut body = Vec::new();

        for line in template.split('\n') {
            let mut hits: Vec<(usize, PredicateKind)> = PredicateKind::ALL
                .into_iter()
                .flat_map(|kind| {
                    line.match_indices(kind.tag().marker())
                        .map(move |(pos, _)| (pos, kind))
                })
                .collect();
            let Some(first) = hits.iter().map(|(pos, _)| *pos).min() else {
                body.push(line.to_string());
                continue;
            };
            hits.sort_by_key(|(pos, _)| *pos);

            let (line_end, kept) = split_directive_line(line, first);
            for (n, (pos, kind)) in hits.iter().enumerate() {
                let arg_start = pos + kind.tag().marker().len();
                let arg_end = hits.get(n + 1).map_or(line_end, |(next, _)| *next);
                predicates.push(Predicate {
                    kind: *kind,
                    argument: line[arg_start..arg_end.max(arg_start)]
                        .trim_end_matches('\r')
                        .to_string(),
                });
            }

            body.extend(kept);
        }

        Self {
            predicates,
            body: body.join("\n"),
        }
    }

    /// Whether every predicate passes for `method`; a template without predicates always does.
    pub fn matches(&self, template_name: &str, method: &MethodUnit) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.evaluate(template_name, method))
    }
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
