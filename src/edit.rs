use crate::{Error, Result};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A change to the source text, in byte offsets of the text it was computed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Insert `text` at `offset`
    Insert { offset: usize, text: String },
    /// Replace the bytes in `range` with `text`
    Replace { range: Range<usize>, text: String },
}

impl Edit {
    /// The span of the original text the edit touches
    pub fn range(&self) -> Range<usize> {
        match self {
            Edit::Insert { offset, .. } => *offset..*offset,
            Edit::Replace { range, .. } => range.clone(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Edit::Insert { text, .. } | Edit::Replace { text, .. } => text,
        }
    }
}

/// Applies `edits` to `source` as one batch.
///
/// Every edit refers to offsets in `source`. Edits must fall on character boundaries and must
/// not overlap; otherwise nothing is applied.
///
/// # Examples
///
/// ```
/// use javadocky::{Edit, apply_edits};
///
/// let source = "class A { int x; }";
/// let edits = vec![
///     Edit::Insert { offset: 10, text: "/** x */ ".to_string() },
///     Edit::Insert { offset: 0, text: "/** A */\n".to_string() },
/// ];
/// assert_eq!(apply_edits(source, &edits).unwrap(), "/** A */\nclass A { /** x */ int x; }");
/// ```
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String> {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by_key(|edit| (edit.range().start, edit.range().end));

    let mut previous_end = 0;
    for edit in &ordered {
        let range = edit.range();
        if range.start > range.end || range.end > source.len() {
            return Err(Error::InvalidEdit(format!(
                "range {}..{} outside of source of length {}",
                range.start,
                range.end,
                source.len()
            )));
        }
        if !source.is_char_boundary(range.start) || !source.is_char_boundary(range.end) {
            return Err(Error::InvalidEdit(format!(
                "range {}..{} splits a character",
                range.start, range.end
            )));
        }
        if range.start < previous_end {
            return Err(Error::InvalidEdit(format!(
                "range {}..{} overlaps a previous edit",
                range.start, range.end
            )));
        }
        previous_end = range.end;
    }

    let mut out = source.to_string();
    for edit in ordered.into_iter().rev() {
        out.replace_range(edit.range(), edit.text());
    }
    Ok(out)
}

/// Source text of one Java file, the target of write transactions
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    text: String,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        Ok(Self::new(path, fs::read_to_string(path)?))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, &self.text)?;
        Ok(())
    }

    /// Starts a transaction. Its edits reach the document only on commit.
    pub fn transaction(&mut self) -> WriteTransaction<'_> {
        WriteTransaction {
            document: self,
            edits: Vec::new(),
            committed: false,
        }
    }
}

/// Buffered edits against a [`SourceDocument`].
///
/// Dropping the transaction without committing discards every edit.
///
/// # Examples
///
/// ```
/// use javadocky::SourceDocument;
///
/// let mut document = SourceDocument::new("A.java", "class A {}");
/// {
///     let mut tx = document.transaction();
///     tx.insert(0, "/** gone */\n");
/// }
/// assert_eq!(document.text(), "class A {}");
///
/// let mut tx = document.transaction();
/// tx.insert(0, "/** A */\n");
/// assert_eq!(tx.commit().unwrap(), 1);
/// assert_eq!(document.text(), "/** A */\nclass A {}");
/// ```
#[derive(Debug)]
pub struct WriteTransaction<'a> {
    document: &'a mut SourceDocument,
    edits: Vec<Edit>,
    committed: bool,
}

impl WriteTransaction<'_> {
    pub fn insert(&mut self, offset: usize, text: impl Into<String>) {
        self.edits.push(Edit::Insert {
            offset,
            text: text.into(),
        });
    }

    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        self.edits.push(Edit::Replace {
            range,
            text: text.into(),
        });
    }

    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Applies every buffered edit at once and returns how many were applied.
    ///
    /// On error the document is left untouched.
    pub fn commit(mut self) -> Result<usize> {
        let text = apply_edits(&self.document.text, &self.edits)?;
        self.document.text = text;
        self.committed = true;
        Ok(self.edits.len())
    }
}

impl Extend<Edit> for WriteTransaction<'_> {
    fn extend<I: IntoIterator<Item = Edit>>(&mut self, iter: I) {
        self.edits.extend(iter);
    }
}

impl Drop for WriteTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed && !self.edits.is_empty() {
            debug!(
                "discarding {} uncommitted edits to {}",
                self.edits.len(),
                self.document.path.display()
            );
        }
    }
}
