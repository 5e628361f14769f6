use crate::{
    Error, FieldSynchronizer, JavaParser, LanguageParser, Result, SourceDocument, is_java_source,
};
use ignore::Walk;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::{debug, info, warn};

/// Watches a source tree and keeps `@param` descriptions in sync as files change.
///
/// Each file gets its own [`FieldSynchronizer`].
pub struct DocumentWatcher {
    root: PathBuf,
    parser: JavaParser,
    synchronizers: HashMap<PathBuf, FieldSynchronizer>,
}

impl DocumentWatcher {
    pub fn try_new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::DirectoryNotFound(root));
        }
        Ok(Self {
            root,
            parser: JavaParser::try_new()?,
            synchronizers: HashMap::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Records the current field descriptions of every Java file under the root.
    ///
    /// Returns how many files are tracked afterwards.
    pub fn prime(&mut self) -> Result<usize> {
        let files: Vec<PathBuf> = Walk::new(&self.root)
            .filter_map(|e| e.ok())
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && is_java_source(path))
            .collect();
        for path in files {
            if let Err(e) = self.handle_change(&path) {
                warn!("skipping {}: {}", path.display(), e);
            }
        }
        Ok(self.tracked())
    }

    /// Feeds the current content of `path` to its synchronizer and writes back the result.
    ///
    /// Returns the number of comments rewritten.
    pub fn handle_change(&mut self, path: &Path) -> Result<usize> {
        let synchronizer = self
            .synchronizers
            .entry(path.to_path_buf())
            .or_default();
        let result = sync_file(path, synchronizer, &mut self.parser);
        if let Err(Error::NoContainer(_)) = result {
            self.synchronizers.remove(path);
        }
        result
    }

    /// Blocks, synchronizing every modified or created Java file until the watcher stops.
    pub fn run(&mut self) -> Result<()> {
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(&self.root, RecursiveMode::Recursive)?;
        info!("watching {}", self.root.display());

        for res in rx {
            match res {
                Ok(event) => self.handle_event(&event),
                Err(e) => warn!("watch error: {}", e),
            }
        }
        Ok(())
    }

    /// Number of files with a recorded snapshot
    pub fn tracked(&self) -> usize {
        self.synchronizers.len()
    }

    /// Dispatches one file system event.
    ///
    /// Java files that are gone, after a removal or a rename, lose their snapshot.
    pub fn handle_event(&mut self, event: &Event) {
        if !matches!(
            event.kind,
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
        ) {
            return;
        }
        for path in event.paths.iter().filter(|p| is_java_source(p)) {
            if !path.is_file() {
                if self.synchronizers.remove(path).is_some() {
                    debug!("forgetting {}", path.display());
                }
                continue;
            }
            if matches!(event.kind, EventKind::Remove(_)) {
                continue;
            }
            debug!("change in {}", path.display());
            if let Err(e) = self.handle_change(path) {
                warn!("failed to synchronize {}: {}", path.display(), e);
            }
        }
    }
}

/// Runs one observation of the file at `path` and saves any rewritten `@param` entries.
///
/// The first call for a synchronizer only records the baseline.
pub fn sync_file(
    path: &Path,
    synchronizer: &mut FieldSynchronizer,
    parser: &mut JavaParser,
) -> Result<usize> {
    let mut document = SourceDocument::open(path)?;
    let file = parser.parse_source(path, document.text().to_string())?;
    if file.primary_class().is_none() {
        return Err(Error::NoContainer(path.to_path_buf()));
    }
    let edits = synchronizer.observe(&file, parser)?;
    if edits.is_empty() {
        return Ok(0);
    }

    let mut tx = document.transaction();
    tx.extend(edits);
    let count = tx.commit()?;
    document.save()?;
    info!("rewrote {} comments in {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{ModifyKind, RemoveKind, RenameMode};
    use std::fs;
    use tempfile::TempDir;

    const SOURCE: &str = "class A {\n    /** the x */\n    int x;\n\n    /**\n     * @param x: the x\n     */\n    void setX(int x) { this.x = x; }\n}\n";

    #[test]
    fn test_prime_then_change_rewrites_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, SOURCE).unwrap();
        fs::write(dir.path().join("package-info.java"), "package a;\n").unwrap();

        let mut watcher = DocumentWatcher::try_new(dir.path()).unwrap();
        assert_eq!(watcher.prime().unwrap(), 1);

        fs::write(&path, SOURCE.replace("/** the x */", "/** the new x */")).unwrap();
        assert_eq!(watcher.handle_change(&path).unwrap(), 1);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("     * @param x: the new x\n"));

        // our own write converges without further edits
        assert_eq!(watcher.handle_change(&path).unwrap(), 0);
    }

    #[test]
    fn test_removed_files_are_forgotten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, SOURCE).unwrap();

        let mut watcher = DocumentWatcher::try_new(dir.path()).unwrap();
        assert_eq!(watcher.prime().unwrap(), 1);

        fs::remove_file(&path).unwrap();
        watcher.handle_event(&Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.clone()));
        assert_eq!(watcher.tracked(), 0);

        // a file renamed into place starts from a fresh baseline
        fs::write(&path, SOURCE.replace("/** the x */", "/** the new x */")).unwrap();
        watcher.handle_event(
            &Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::To))).add_path(path.clone()),
        );
        assert_eq!(watcher.tracked(), 1);
        assert!(fs::read_to_string(&path).unwrap().contains("     * @param x: the x\n"));
    }

    #[test]
    fn test_sync_file_without_class() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package-info.java");
        fs::write(&path, "package a;\n").unwrap();

        let mut parser = JavaParser::try_new().unwrap();
        let mut sync = FieldSynchronizer::new();
        assert!(matches!(
            sync_file(&path, &mut sync, &mut parser),
            Err(Error::NoContainer(_))
        ));
    }

    #[test]
    fn test_missing_root() {
        assert!(matches!(
            DocumentWatcher::try_new("does/not/exist"),
            Err(Error::DirectoryNotFound(_))
        ));
    }
}
