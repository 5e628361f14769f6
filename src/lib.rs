//! # JavaDocky
//!
//! `javadocky` writes Javadoc comments for Java sources from configurable templates and keeps
//! the `@param` entries it generated in step with the field documentation they came from.
//!
//! ## Features
//!
//! - **Templates per scope**: classes, fields, constructors and methods each have their own
//!   template, with dedicated templates for getters, setters and the identity methods
//! - **Custom method templates**: selected by `<nameContains>`, `<returnTypeIs>` and `<hasP>`
//!   predicates, first match wins
//! - **Tags**: `<className>`, `<instance>`, `<returnType>` and `<params>` are substituted;
//!   generic return types render as `Map of String and Integer`
//! - **Field synchronization**: editing a field's comment rewrites the matching
//!   `@param field: description` lines of constructors and setters
//! - **Tree-sitter parsing**: declarations and comments are located with `tree-sitter-java`
//!
//! ## Quick Start
//!
//! ```rust
//! use javadocky::{Docky, SourceDocument, Templates, Result};
//!
//! fn main() -> Result<()> {
//!     let templates = Templates::from_toml_str(r#"
//! classes = "/**\n * The {@code <className>} class\n */"
//! fields = "/**\n * the <instance>\n */"
//! "#)?;
//!     let mut docky = Docky::try_new(templates)?;
//!
//!     let mut document = SourceDocument::new("Point.java", "class Point {\n    int x;\n}\n");
//!     let added = docky.apply_to_document(&mut document)?;
//!
//!     assert_eq!(added, 2);
//!     assert!(document.text().starts_with("/**\n * The {@code Point} class\n */\nclass Point"));
//!     Ok(())
//! }
//! ```
//!
//! ## Keeping `@param` entries in sync
//!
//! ```rust
//! use javadocky::{FieldSynchronizer, JavaParser, LanguageParser, Result, apply_edits};
//! use std::path::Path;
//!
//! # fn main() -> Result<()> {
//! let before = "class A {\n    /** the x */\n    int x;\n\n    /**\n     * @param x: the x\n     */\n    void setX(int x) { this.x = x; }\n}\n";
//! let after = before.replace("/** the x */", "/** the new x */");
//!
//! let mut parser = JavaParser::try_new()?;
//! let mut sync = FieldSynchronizer::new();
//! sync.observe(&parser.parse_source(Path::new("A.java"), before.to_string())?, &mut parser)?;
//!
//! let edits = sync.observe(&parser.parse_source(Path::new("A.java"), after.clone())?, &mut parser)?;
//! assert!(apply_edits(&after, &edits)?.contains("@param x: the new x"));
//! # Ok(())
//! # }
//! ```

mod classify;
mod docky;
mod edit;
mod error;
mod matcher;
#[cfg(feature = "mcp")]
pub mod mcp;
mod parser;
mod resolver;
mod sync;
mod template;
mod watch;

use std::path::{Path, PathBuf};
use tracing::debug;

pub use classify::{MethodRole, classify};
pub use docky::Docky;
pub use edit::{Edit, SourceDocument, WriteTransaction, apply_edits};
pub use error::{Error, Result};
pub use matcher::{CustomTemplateMatcher, Selected};
pub use parser::*;
pub use resolver::{
    DocTarget, DocuResolver, PRIMITIVE_TYPES, TypeNode, expand_params, field_description,
    format_return_type, parse_type, setter_target,
};
pub use sync::{
    ContainerId, FieldChange, FieldDocSnapshot, FieldSynchronizer, SyncState, rewrite_params,
};
pub use template::{
    CONFIG_FILE_NAME, CUSTOM_PREFIX, CustomTemplateEntry, DEFAULT_TEMPLATE, DocItem,
    ParsedTemplate, Predicate, PredicateKind, RoleTemplates, Tag, TemplateOptions,
    TemplateStore, Templates, delete_fragment, strip_directive, strip_markup, substitute,
};
pub use watch::{DocumentWatcher, sync_file};

/// Whether an apply pass writes its results back to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    #[default]
    Write,
    /// Compute and report the comments without touching any file
    DryRun,
}

/// Configuration of an apply pass.
///
/// # Examples
///
/// ```
/// use javadocky::{ApplyMode, DockyConfig};
/// use std::path::PathBuf;
///
/// let config = DockyConfig::new("src/main/java");
/// assert_eq!(config.root, PathBuf::from("src/main/java"));
/// assert_eq!(config.templates_path, None);
/// assert_eq!(config.mode, ApplyMode::Write);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockyConfig {
    /// A Java source file or a directory searched recursively
    pub root: PathBuf,
    /// Explicit template configuration; searched next to `root` when absent
    pub templates_path: Option<PathBuf>,
    pub mode: ApplyMode,
}

impl DockyConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            templates_path: None,
            mode: ApplyMode::default(),
        }
    }

    /// Loads the templates for this pass.
    ///
    /// Uses `templates_path` when set, then a [`CONFIG_FILE_NAME`] found from `root` upwards,
    /// and finally [`Templates::standard`].
    pub fn load_templates(&self) -> Result<Templates> {
        if let Some(path) = &self.templates_path {
            return Templates::load(path);
        }
        match Templates::discover(&self.root) {
            Some(path) => Templates::load(&path),
            None => {
                debug!("no {} found, using standard templates", CONFIG_FILE_NAME);
                Ok(Templates::standard())
            }
        }
    }
}

/// Outcome of an apply pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub comments_added: usize,
    /// Files that received at least one comment, in walk order
    pub changed: Vec<PathBuf>,
}

/// Trait to document the Java sources a configuration points at.
///
/// # Custom Implementation
///
/// ```
/// use javadocky::{ApplyReport, DockyConfig, Documenter, Result};
///
/// struct CountOnly;
///
/// impl Documenter for CountOnly {
///     fn apply(&mut self, _config: &DockyConfig) -> Result<ApplyReport> {
///         Ok(ApplyReport { files_scanned: 1, ..Default::default() })
///     }
/// }
///
/// # fn main() -> Result<()> {
/// let report = CountOnly.apply(&DockyConfig::new("."))?;
/// assert_eq!(report.files_scanned, 1);
/// # Ok(())
/// # }
/// ```
pub trait Documenter {
    /// Applies templates to every undocumented declaration under `config.root`.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    ///
    /// * The root does not exist
    /// * The root is a file that is not a Java source
    /// * A file cannot be read, parsed or written
    fn apply(&mut self, config: &DockyConfig) -> Result<ApplyReport>;
}

/// Whether `path` names a Java source file
pub fn is_java_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "java")
}
