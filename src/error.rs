use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for the javadocky library.
///
/// Unresolvable tags and methods without a matching custom template are not errors: the
/// resolver recovers from them locally. The variants below are the hard failures that abort
/// an apply or sync pass.
///
/// # Examples
///
/// ```
/// use javadocky::Error;
/// use std::path::PathBuf;
///
/// let error = Error::NoContainer(PathBuf::from("package-info.java"));
/// assert!(matches!(error, Error::NoContainer(_)));
///
/// let error = Error::InvalidConfig("duplicate custom template name: find".to_string());
/// assert_eq!(error.to_string(), "Invalid configuration: duplicate custom template name: find");
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Tree-sitter error for tree-sitter specific failures
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    /// File not found error
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Directory not found error
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The source file declares no class, interface, enum or record
    #[error("No class declaration found in {0}")]
    NoContainer(PathBuf),

    /// An edit could not be applied to the source text
    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    /// File watcher failure
    #[error("Watcher error: {0}")]
    Watcher(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Watcher(err.to_string())
    }
}

/// Result type alias for javadocky operations.
///
/// # Examples
///
/// ```
/// use javadocky::{Error, Result};
/// use std::path::PathBuf;
///
/// fn load() -> Result<String> {
///     Err(Error::FileNotFound(PathBuf::from("Missing.java")))
/// }
///
/// assert!(load().is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;
