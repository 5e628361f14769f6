//! Method role classification.
//!
//! The role of a method depends only on its name, its arity and whether it is a constructor.
//! Rules are checked in table order and the first match wins.

use std::fmt;

/// The role a method plays, selecting the template used to document it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodRole {
    ConstructorLike,
    IdentityHash,
    IdentityEquals,
    IdentityClone,
    IdentityToString,
    Accessor,
    Mutator,
    Custom,
}

impl MethodRole {
    pub const ALL: [MethodRole; 8] = [
        MethodRole::ConstructorLike,
        MethodRole::IdentityHash,
        MethodRole::IdentityEquals,
        MethodRole::IdentityClone,
        MethodRole::IdentityToString,
        MethodRole::Accessor,
        MethodRole::Mutator,
        MethodRole::Custom,
    ];

    /// Template store key of the role, for roles owning a single template
    pub const fn store_key(self) -> Option<&'static str> {
        match self {
            MethodRole::IdentityHash => Some("HASH_CODE"),
            MethodRole::IdentityEquals => Some("EQUALS"),
            MethodRole::IdentityClone => Some("CLONE"),
            MethodRole::IdentityToString => Some("TO_STRING"),
            MethodRole::Accessor => Some("GETTER"),
            MethodRole::Mutator => Some("SETTER"),
            MethodRole::ConstructorLike | MethodRole::Custom => None,
        }
    }

    pub fn from_store_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.store_key() == Some(key))
    }
}

impl fmt::Display for MethodRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MethodRole::ConstructorLike => "constructor",
            MethodRole::IdentityHash => "hashCode",
            MethodRole::IdentityEquals => "equals",
            MethodRole::IdentityClone => "clone",
            MethodRole::IdentityToString => "toString",
            MethodRole::Accessor => "getter",
            MethodRole::Mutator => "setter",
            MethodRole::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// How a rule recognises a method
enum Matcher {
    Constructor,
    /// Normalized name equals the given upper-case name, whatever the signature
    ExactName(&'static str),
    /// Normalized name starts with one of the prefixes and the arity matches
    Prefix {
        prefixes: &'static [&'static str],
        arity: usize,
    },
}

struct Rule {
    matcher: Matcher,
    role: MethodRole,
}

const ACCESSOR_PREFIXES: &[&str] = &["GET", "IS", "ARE", "CAN", "HAS", "HAVE"];
const MUTATOR_PREFIXES: &[&str] = &["SET"];

const RULES: &[Rule] = &[
    Rule {
        matcher: Matcher::Constructor,
        role: MethodRole::ConstructorLike,
    },
    Rule {
        matcher: Matcher::ExactName("HASHCODE"),
        role: MethodRole::IdentityHash,
    },
    Rule {
        matcher: Matcher::ExactName("EQUALS"),
        role: MethodRole::IdentityEquals,
    },
    Rule {
        matcher: Matcher::ExactName("CLONE"),
        role: MethodRole::IdentityClone,
    },
    Rule {
        matcher: Matcher::ExactName("TOSTRING"),
        role: MethodRole::IdentityToString,
    },
    Rule {
        matcher: Matcher::Prefix {
            prefixes: ACCESSOR_PREFIXES,
            arity: 0,
        },
        role: MethodRole::Accessor,
    },
    Rule {
        matcher: Matcher::Prefix {
            prefixes: MUTATOR_PREFIXES,
            arity: 1,
        },
        role: MethodRole::Mutator,
    },
];

impl Matcher {
    fn matches(&self, normalized: &str, arity: usize, is_constructor: bool) -> bool {
        match self {
            Matcher::Constructor => is_constructor,
            Matcher::ExactName(name) => normalized == *name,
            Matcher::Prefix {
                prefixes,
                arity: expected,
            } => arity == *expected && prefixes.iter().any(|p| normalized.starts_with(p)),
        }
    }
}

/// Classifies a method by name, arity and constructor flag.
///
/// Names are compared case-insensitively with underscores removed.
///
/// # Examples
///
/// ```
/// use javadocky::{MethodRole, classify};
///
/// assert_eq!(classify("getName", 0, false), MethodRole::Accessor);
/// assert_eq!(classify("setup", 0, false), MethodRole::Custom);
/// assert_eq!(classify("to_string", 0, false), MethodRole::IdentityToString);
/// assert_eq!(classify("Person", 2, true), MethodRole::ConstructorLike);
/// ```
pub fn classify(name: &str, arity: usize, is_constructor: bool) -> MethodRole {
    let normalized: String = name
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_uppercase)
        .collect();
    RULES
        .iter()
        .find(|rule| rule.matcher.matches(&normalized, arity, is_constructor))
        .map_or(MethodRole::Custom, |rule| rule.role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_methods_ignore_signature() {
        assert_eq!(classify("hashCode", 0, false), MethodRole::IdentityHash);
        assert_eq!(classify("HASH_CODE", 3, false), MethodRole::IdentityHash);
        assert_eq!(classify("equals", 1, false), MethodRole::IdentityEquals);
        assert_eq!(classify("clone", 0, false), MethodRole::IdentityClone);
        assert_eq!(classify("toString", 0, false), MethodRole::IdentityToString);
    }

    #[test]
    fn test_accessor_prefixes_need_zero_arity() {
        for name in ["getName", "isAdult", "areEqual", "canRun", "hasNext", "haveAll"] {
            assert_eq!(classify(name, 0, false), MethodRole::Accessor, "{name}");
            assert_eq!(classify(name, 1, false), MethodRole::Custom, "{name}");
        }
        // prefix match, not a whole word
        assert_eq!(classify("issue", 0, false), MethodRole::Accessor);
    }

    #[test]
    fn test_mutator_needs_exactly_one_parameter() {
        assert_eq!(classify("setAge", 1, false), MethodRole::Mutator);
        assert_eq!(classify("settle", 1, false), MethodRole::Mutator);
        assert_eq!(classify("setup", 0, false), MethodRole::Custom);
        assert_eq!(classify("setBoth", 2, false), MethodRole::Custom);
    }

    #[test]
    fn test_constructor_wins_over_name() {
        assert_eq!(classify("getThing", 0, true), MethodRole::ConstructorLike);
        assert_eq!(classify("Clone", 0, true), MethodRole::ConstructorLike);
    }

    #[test]
    fn test_classify_is_deterministic() {
        for name in ["run", "getX", "set_value", "equals", "compute"] {
            for arity in 0..3 {
                for ctor in [false, true] {
                    assert_eq!(classify(name, arity, ctor), classify(name, arity, ctor));
                }
            }
        }
    }

    #[test]
    fn test_store_keys_round_trip() {
        for role in MethodRole::ALL {
            if let Some(key) = role.store_key() {
                assert_eq!(MethodRole::from_store_key(key), Some(role));
            }
        }
        assert_eq!(MethodRole::from_store_key("CUSTOM"), None);
    }
}
