mod lang;
mod units;

use crate::Result;
use std::ops::Range;
use std::path::{Path, PathBuf};

pub use lang::JavaParser;

/// Base trait for every declaration a comment can be attached to
pub trait Declaration {
    /// Get the name of the declaration
    fn name(&self) -> &str;

    /// Get the Javadoc comment directly preceding the declaration, if any
    fn doc(&self) -> Option<&DocComment>;

    /// Whether any comment (Javadoc or not) directly precedes the declaration
    fn is_commented(&self) -> bool;

    /// Byte offset where the declaration (including its modifiers) starts
    fn start(&self) -> usize;
}

/// Trait for language-specific parsers
pub trait LanguageParser {
    /// Parse a file into a JavaFile
    fn parse_file(&mut self, file_path: &Path) -> Result<JavaFile>;

    /// Parse in-memory source text, recording `file_path` as its origin
    fn parse_source(&mut self, file_path: &Path, source: String) -> Result<JavaFile>;
}

/// The flavour of a class-like container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// A comment node and its location in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    /// The raw comment text, delimiters included
    pub text: String,

    /// Byte range of the comment in the source it was parsed from
    pub range: Range<usize>,
}

/// Represents a parsed Java source file
#[derive(Debug, Clone)]
pub struct JavaFile {
    /// The path to the file
    pub path: PathBuf,

    /// Source code of the entire file
    pub source: String,

    /// Top-level type declarations in source order
    pub classes: Vec<ClassUnit>,
}

/// Represents a class, interface, enum or record
#[derive(Debug, Clone)]
pub struct ClassUnit {
    /// The simple name of the type
    pub name: String,

    /// What kind of type declaration this is
    pub kind: ClassKind,

    /// The Javadoc comment of the type
    pub doc: Option<DocComment>,

    /// Whether a comment directly precedes the declaration
    pub commented: bool,

    /// Byte range of the whole declaration
    pub range: Range<usize>,

    /// Fields in source order
    pub fields: Vec<FieldUnit>,

    /// Constructors in source order
    pub constructors: Vec<MethodUnit>,

    /// Methods in source order
    pub methods: Vec<MethodUnit>,

    /// Nested type declarations
    pub classes: Vec<ClassUnit>,
}

/// Represents a single field declarator
///
/// `int a, b;` yields two field units sharing the same start and comment.
#[derive(Debug, Clone)]
pub struct FieldUnit {
    /// The name of the field
    pub name: String,

    /// The declared type of the field
    pub field_type: String,

    /// The Javadoc comment of the field declaration
    pub doc: Option<DocComment>,

    /// Whether a comment directly precedes the declaration
    pub commented: bool,

    /// Byte offset of the enclosing field declaration
    pub start: usize,
}

/// Represents a method or constructor
#[derive(Debug, Clone)]
pub struct MethodUnit {
    /// The name of the method
    pub name: String,

    /// Whether this is a constructor
    pub is_constructor: bool,

    /// The parameters in declaration order
    pub parameters: Vec<ParameterUnit>,

    /// The return type text, `None` for constructors
    pub return_type: Option<String>,

    /// The body text including braces, `None` for abstract and interface methods
    pub body: Option<String>,

    /// Expression of the first `return` statement in the body, whitespace removed
    pub returned: Option<String>,

    /// The Javadoc comment of the method
    pub doc: Option<DocComment>,

    /// Whether a comment directly precedes the declaration
    pub commented: bool,

    /// Byte offset where the declaration starts
    pub start: usize,
}

/// Represents a parameter of a method or constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterUnit {
    /// The name of the parameter
    pub name: String,

    /// The type of the parameter
    pub parameter_type: String,
}
