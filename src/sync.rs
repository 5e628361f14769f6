//! Keeps `@param` descriptions in constructor and setter comments in step with the
//! documentation of the fields they were generated from.

use crate::classify::MethodRole;
use crate::template::strip_markup;
use crate::{ClassUnit, Edit, Error, JavaFile, LanguageParser, MethodUnit, Result};
use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashSet};
use std::ops::Range;
use std::path::PathBuf;
use tracing::{debug, info};

/// Identity of the top-level class a snapshot belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId {
    pub path: PathBuf,
    pub name: String,
}

impl ContainerId {
    pub fn of(file: &JavaFile) -> Result<Self> {
        let class = file
            .primary_class()
            .ok_or_else(|| Error::NoContainer(file.path.clone()))?;
        Ok(Self {
            path: file.path.clone(),
            name: class.name.clone(),
        })
    }
}

/// Field descriptions of a class and its nested classes, keyed by (class path, field name)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDocSnapshot {
    descriptions: BTreeMap<(String, String), String>,
}

/// One field whose description changed between two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Dotted path of the class declaring the field, e.g. `Outer.Inner`
    pub container: String,
    pub field: String,
    pub old: String,
    pub new: String,
}

impl FieldDocSnapshot {
    /// Records the description of every field of `class`, recursing into nested classes.
    ///
    /// Fields without a Javadoc comment are recorded with an empty description.
    pub fn capture(class: &ClassUnit) -> Self {
        let mut descriptions = BTreeMap::new();
        class.walk(&mut |path, class| {
            for field in &class.fields {
                let description = field
                    .doc
                    .as_ref()
                    .map(|doc| strip_markup(&doc.text))
                    .unwrap_or_default();
                descriptions.insert((path.to_string(), field.name.clone()), description);
            }
        });
        Self { descriptions }
    }

    pub fn get(&self, container: &str, field: &str) -> Option<&str> {
        self.descriptions
            .get(&(container.to_string(), field.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    /// Fields present in both snapshots whose description differs.
    pub fn changes(&self, fresh: &FieldDocSnapshot) -> Vec<FieldChange> {
        fresh
            .descriptions
            .iter()
            .filter_map(|((container, field), new)| {
                let old = self.descriptions.get(&(container.clone(), field.clone()))?;
                (old != new).then(|| FieldChange {
                    container: container.clone(),
                    field: field.clone(),
                    old: old.clone(),
                    new: new.clone(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Uninitialized,
    Tracking(ContainerId),
}

/// Propagates field description changes into the `@param` entries derived from them.
///
/// The first observation of a class only records its field descriptions. Every later
/// observation of the same class diffs against them and produces the comment replacements.
///
/// # Examples
///
/// ```
/// use javadocky::{FieldSynchronizer, JavaParser, LanguageParser, apply_edits};
/// use std::path::Path;
///
/// # fn main() -> javadocky::Result<()> {
/// let before = "class A {\n    /** the x */\n    int x;\n\n    /**\n     * @param x: the x\n     */\n    A(int x) { this.x = x; }\n}\n";
/// let after = before.replacen("/** the x */", "/** the new x */", 1);
///
/// let mut parser = JavaParser::try_new()?;
/// let mut sync = FieldSynchronizer::new();
/// sync.observe(&parser.parse_source(Path::new("A.java"), before.to_string())?, &mut parser)?;
///
/// let file = parser.parse_source(Path::new("A.java"), after.clone())?;
/// let edits = sync.observe(&file, &mut parser)?;
/// assert!(apply_edits(&after, &edits)?.contains("@param x: the new x"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FieldSynchronizer {
    state: SyncState,
    snapshot: FieldDocSnapshot,
}

impl FieldSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn snapshot(&self) -> &FieldDocSnapshot {
        &self.snapshot
    }

    /// Forgets the tracked class and its snapshot.
    pub fn reset(&mut self) {
        self.state = SyncState::Uninitialized;
        self.snapshot = FieldDocSnapshot::default();
    }

    /// Handles a change notification for `file`, returning the comment edits to apply to it.
    ///
    /// `parser` re-parses the rewritten class text. The snapshot is only replaced once the
    /// whole pass succeeded.
    pub fn observe(&mut self, file: &JavaFile, parser: &mut impl LanguageParser) -> Result<Vec<Edit>> {
        let id = ContainerId::of(file)?;
        let class = file
            .primary_class()
            .ok_or_else(|| Error::NoContainer(file.path.clone()))?;
        let fresh = FieldDocSnapshot::capture(class);

        if self.state != SyncState::Tracking(id.clone()) {
            debug!(
                "tracking {} in {} with {} fields",
                id.name,
                id.path.display(),
                fresh.len()
            );
            self.state = SyncState::Tracking(id);
            self.snapshot = fresh;
            return Ok(Vec::new());
        }

        if fresh == self.snapshot {
            return Ok(Vec::new());
        }

        let changes = self.snapshot.changes(&fresh);
        let edits = if changes.is_empty() {
            Vec::new()
        } else {
            propagate(file, class, &changes, parser)?
        };
        if !edits.is_empty() {
            info!(
                "updated {} comments in {} after {} field changes",
                edits.len(),
                file.path.display(),
                changes.len()
            );
        }
        self.snapshot = fresh;
        Ok(edits)
    }
}

/// Rewrites the class text, re-parses it and replaces the comments that changed.
fn propagate(
    file: &JavaFile,
    class: &ClassUnit,
    changes: &[FieldChange],
    parser: &mut impl LanguageParser,
) -> Result<Vec<Edit>> {
    let text = file
        .source
        .get(class.range.clone())
        .ok_or_else(|| Error::InvalidEdit(format!("class range out of {}", file.path.display())))?;

    // each class only sees the changes of its own fields
    let offset = class.range.start;
    let mut rewritten = String::with_capacity(text.len());
    for (range, path) in class_segments(class) {
        let scoped: Vec<FieldChange> = changes
            .iter()
            .filter(|change| change.container == path)
            .cloned()
            .collect();
        let segment = &text[range.start - offset..range.end - offset];
        if scoped.is_empty() {
            rewritten.push_str(segment);
        } else {
            rewritten.push_str(&rewrite_params(segment, &scoped));
        }
    }
    if rewritten == text {
        return Ok(Vec::new());
    }

    let reparsed = parser.parse_source(&file.path, rewritten)?;
    let temp = reparsed
        .primary_class()
        .ok_or_else(|| Error::NoContainer(file.path.clone()))?;

    let live = param_owners(class);
    let mut seen = HashSet::new();
    let mut edits = Vec::new();
    for (path, candidate) in param_owners(temp) {
        let (Some(body), Some(new_doc)) = (candidate.normalized_body(), candidate.doc.as_ref()) else {
            continue;
        };
        let matches = live.iter().filter(|(live_path, method)| {
            *live_path == path && method.normalized_body().as_deref() == Some(body.as_str())
        });
        for (_, method) in matches {
            let Some(doc) = method.doc.as_ref() else {
                continue;
            };
            if doc.text != new_doc.text && seen.insert(doc.range.start) {
                edits.push(Edit::Replace {
                    range: doc.range.clone(),
                    text: new_doc.text.clone(),
                });
            }
        }
    }
    Ok(edits)
}

/// Splits the range of `class` into the pieces owned by each class, nested classes cut out
/// of their parent, in source order and tagged with the owner's dotted path.
fn class_segments(class: &ClassUnit) -> Vec<(Range<usize>, String)> {
    fn collect(class: &ClassUnit, path: String, out: &mut Vec<(Range<usize>, String)>) {
        let mut cursor = class.range.start;
        for inner in &class.classes {
            out.push((cursor..inner.range.start, path.clone()));
            collect(inner, format!("{}.{}", path, inner.name), out);
            cursor = inner.range.end;
        }
        out.push((cursor..class.range.end, path));
    }

    let mut segments = Vec::new();
    collect(class, class.name.clone(), &mut segments);
    segments
}

/// Constructors and setters of `class` and its nested classes, with their class path
fn param_owners(class: &ClassUnit) -> Vec<(String, &MethodUnit)> {
    let mut owners = Vec::new();
    class.walk(&mut |path, class| {
        owners.extend(
            class
                .constructors
                .iter()
                .chain(
                    class
                        .methods
                        .iter()
                        .filter(|method| method.role() == MethodRole::Mutator),
                )
                .map(|method| (path.to_string(), method)),
        );
    });
    owners
}

/// Replaces `@param field: old` with `@param field: new` for every change.
pub fn rewrite_params(text: &str, changes: &[FieldChange]) -> String {
    let mut encoded = escape::encode(text);
    for change in changes {
        let pattern = format!(
            r"(?m)^(?P<lead>[ \t]*(?:{star}[ \t]*)?@param[ \t]+{field}:)[ \t]*{old}[ \t]*(?P<tail>\r?)$",
            star = regex::escape(&escape::encode("*")),
            field = regex::escape(&change.field),
            old = regex::escape(&escape::encode(&change.old)),
        );
        let Ok(re) = Regex::new(&pattern) else {
            debug!("skipping unusable pattern for field {}", change.field);
            continue;
        };
        let new = escape::encode(&change.new);
        encoded = re
            .replace_all(&encoded, |caps: &Captures| {
                if new.is_empty() {
                    format!("{}{}", &caps["lead"], &caps["tail"])
                } else {
                    format!("{} {}{}", &caps["lead"], new, &caps["tail"])
                }
            })
            .into_owned();
    }
    escape::decode(&encoded)
}

/// Maps the comment markup characters to placeholder tokens and back.
mod escape {
    const TOKENS: [(char, &str); 3] = [
        ('{', "\u{F8FF}OCBR\u{F8FF}"),
        ('}', "\u{F8FF}CCBR\u{F8FF}"),
        ('*', "\u{F8FF}STRX\u{F8FF}"),
    ];

    pub fn encode(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match TOKENS.iter().find(|(from, _)| *from == c) {
                Some((_, token)) => out.push_str(token),
                None => out.push(c),
            }
        }
        out
    }

    pub fn decode(text: &str) -> String {
        TOKENS.iter().fold(text.to_string(), |text, (to, token)| {
            text.replace(token, &to.to_string())
        })
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_encode_hides_markup_characters() {
            let encoded = encode("/** {@code x} */");
            assert!(!encoded.contains(['{', '}', '*']));
            assert_eq!(decode(&encoded), "/** {@code x} */");
        }
    }
}
