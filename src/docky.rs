use crate::resolver::DocuResolver;
use crate::template::Templates;
use crate::{
    ApplyMode, ApplyReport, ClassUnit, Declaration, DockyConfig, Documenter, Edit, Error,
    JavaFile, JavaParser, LanguageParser, Result, SourceDocument, is_java_source,
};
use ignore::Walk;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Applies documentation templates to Java sources
pub struct Docky {
    parser: JavaParser,
    templates: Templates,
}

impl Docky {
    /// Create a new documenter for the given templates
    pub fn try_new(templates: Templates) -> Result<Self> {
        templates.validate()?;
        Ok(Self {
            parser: JavaParser::try_new()?,
            templates,
        })
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Computes the comment insertions for every undocumented declaration of `file`.
    ///
    /// Declarations already preceded by any comment are left alone, so planning a file this
    /// method already documented yields nothing.
    pub fn plan(&self, file: &JavaFile) -> Vec<Edit> {
        let mut planner = Planner {
            resolver: DocuResolver::new(&self.templates),
            source: &file.source,
            seen: HashSet::new(),
            edits: Vec::new(),
        };
        for class in &file.classes {
            planner.class(class);
        }
        planner.edits
    }

    /// Documents an in-memory document in one write transaction.
    ///
    /// Returns the number of comments inserted.
    pub fn apply_to_document(&mut self, document: &mut SourceDocument) -> Result<usize> {
        let file = self
            .parser
            .parse_source(document.path(), document.text().to_string())?;
        let edits = self.plan(&file);
        if edits.is_empty() {
            return Ok(0);
        }
        let mut tx = document.transaction();
        tx.extend(edits);
        tx.commit()
    }

    /// Documents one file, writing it back unless `mode` is a dry run.
    pub fn apply_file(&mut self, path: &Path, mode: ApplyMode) -> Result<usize> {
        let mut document = SourceDocument::open(path)?;
        let added = self.apply_to_document(&mut document)?;
        if added > 0 && mode == ApplyMode::Write {
            document.save()?;
        }
        debug!("{} comments for {}", added, path.display());
        Ok(added)
    }

    fn java_files(root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = Walk::new(root)
            .filter_map(|e| e.ok())
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && is_java_source(path))
            .collect();
        files.sort();
        files
    }
}

impl Documenter for Docky {
    fn apply(&mut self, config: &DockyConfig) -> Result<ApplyReport> {
        let root = &config.root;
        if !root.exists() {
            return Err(Error::DirectoryNotFound(root.to_path_buf()));
        }

        let files = if root.is_file() {
            if !is_java_source(root) {
                return Err(Error::InvalidConfig(format!(
                    "{} is not a Java source file",
                    root.display()
                )));
            }
            vec![root.to_path_buf()]
        } else {
            Self::java_files(root)
        };

        let mut report = ApplyReport::default();
        for path in files {
            report.files_scanned += 1;
            let added = self.apply_file(&path, config.mode)?;
            if added > 0 {
                report.files_changed += 1;
                report.comments_added += added;
                report.changed.push(path);
            }
        }

        info!(
            "{} comments added to {} of {} files",
            report.comments_added, report.files_changed, report.files_scanned
        );
        Ok(report)
    }
}

struct Planner<'a> {
    resolver: DocuResolver<'a>,
    source: &'a str,
    /// Declaration starts already handled; declarators of one field share theirs
    seen: HashSet<usize>,
    edits: Vec<Edit>,
}

impl Planner<'_> {
    fn class(&mut self, class: &ClassUnit) {
        let docu = self.resolver.class_docu(class);
        self.insert(class, docu);

        for field in &class.fields {
            let docu = self.resolver.field_docu(field);
            self.insert(field, docu);
        }
        for constructor in &class.constructors {
            let docu = self.resolver.constructor_docu(constructor);
            self.insert(constructor, docu);
        }
        for method in &class.methods {
            let docu = self.resolver.method_docu(method, Some(class));
            self.insert(method, docu);
        }
        for inner in &class.classes {
            self.class(inner);
        }
    }

    fn insert(&mut self, declaration: &impl Declaration, docu: Option<String>) {
        if declaration.is_commented() || !self.seen.insert(declaration.start()) {
            return;
        }
        if let Some(docu) = docu {
            let offset = declaration.start();
            self.edits.push(Edit::Insert {
                offset,
                text: indent_comment(self.source, offset, &docu),
            });
        }
    }
}

/// Lays out `docu` to sit on its own lines right before the declaration at `offset`.
fn indent_comment(source: &str, offset: usize, docu: &str) -> String {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let lead = &source[line_start..offset];
    let indent = if lead.chars().all(char::is_whitespace) {
        lead
    } else {
        ""
    };
    let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };

    let mut text = String::new();
    for (n, line) in docu.lines().enumerate() {
        if n > 0 {
            text.push_str(newline);
            text.push_str(indent);
        }
        text.push_str(line);
    }
    text.push_str(newline);
    text.push_str(indent);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply_edits;
    use crate::template::{DEFAULT_TEMPLATE, RoleTemplates};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn templates() -> Templates {
        Templates {
            classes: Some("/**\n * The {@code <className>} class\n */".to_string()),
            fields: Some("/**\n * the <instance>\n */".to_string()),
            constructors: Some("/**\n * Creates a <className>\n *\n * <params>\n */".to_string()),
            methods: Some(DEFAULT_TEMPLATE.to_string()),
            roles: RoleTemplates {
                getter: Some("/**\n * @return <instance>\n */".to_string()),
                setter: Some("/**\n * Sets <instance>\n *\n * <params>\n */".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_plan_documents_every_declaration() {
        let mut docky = Docky::try_new(templates()).unwrap();
        let mut document = SourceDocument::new(
            "Point.java",
            "class Point {\n    private int x;\n\n    Point(int x) {\n        this.x = x;\n    }\n\n    int getX() {\n        return x;\n    }\n\n    void setX(int x) {\n        this.x = x;\n    }\n}\n",
        );
        assert_eq!(docky.apply_to_document(&mut document).unwrap(), 5);
        assert_eq!(
            document.text(),
            r#"/**
 * The {@code Point} class
 */
class Point {
    /**
     * the x
     */
    private int x;

    /**
     * Creates a Point
     *
     * @param x: the x
     */
    Point(int x) {
        this.x = x;
    }

    /**
     * @return x
     */
    int getX() {
        return x;
    }

    /**
     * Sets x
     *
     * @param x: the x
     */
    void setX(int x) {
        this.x = x;
    }
}
"#
        );
    }

    #[test]
    fn test_second_apply_writes_nothing() {
        let mut docky = Docky::try_new(templates()).unwrap();
        let mut document = SourceDocument::new("A.java", "class A {\n    int a, b;\n}\n");
        assert_eq!(docky.apply_to_document(&mut document).unwrap(), 2);
        let once = document.text().to_string();
        assert_eq!(docky.apply_to_document(&mut document).unwrap(), 0);
        assert_eq!(document.text(), once);
    }

    #[test]
    fn test_commented_declarations_are_skipped() {
        let docky = Docky::try_new(templates()).unwrap();
        let mut parser = JavaParser::try_new().unwrap();
        let file = parser
            .parse_source(
                Path::new("A.java"),
                "// keep\nclass A {\n    /* plain */\n    int a;\n    // line\n    int b;\n}\n".to_string(),
            )
            .unwrap();
        assert_eq!(docky.plan(&file), vec![]);
    }

    #[test]
    fn test_custom_methods_without_match_stay_undocumented() {
        let docky = Docky::try_new(templates()).unwrap();
        let mut parser = JavaParser::try_new().unwrap();
        let source = "/** A */\nclass A {\n    void run() {}\n}\n";
        let file = parser
            .parse_source(Path::new("A.java"), source.to_string())
            .unwrap();
        assert_eq!(docky.plan(&file), vec![]);
    }

    #[test]
    fn test_nested_classes_and_fixture() {
        let mut parser = JavaParser::try_new().unwrap();
        let file = parser.parse_file(&fixture("Person.java")).unwrap();
        let docky = Docky::try_new(templates()).unwrap();
        let updated = apply_edits(&file.source, &docky.plan(&file)).unwrap();

        assert!(updated.contains(
            "        /**\n         * Sets street\n         *\n         * @param value: the value\n         */\n        public void setStreet"
        ));
        assert!(updated.contains("    /**\n     * The {@code Address} class\n     */\n    public static class Address"));
        assert!(updated.contains("    /**\n     * @return name\n     */\n    public String getName()"));
        // greet has no role template and no custom template
        assert!(updated.contains("    }\n\n    public void greet()"));
    }

    #[test]
    fn test_crlf_sources_keep_crlf() {
        assert_eq!(
            indent_comment("class A {\r\n    int a;", 15, "/**\n * a\n */"),
            "/**\r\n     * a\r\n     */\r\n    "
        );
    }

    #[test]
    fn test_apply_walks_directory() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("A.java"), "class A {}\n").unwrap();
        fs::write(src.join("B.java"), "/** B */\nclass B {}\n").unwrap();
        fs::write(src.join("notes.txt"), "class C {}\n").unwrap();

        let mut docky = Docky::try_new(templates()).unwrap();
        let report = docky.apply(&DockyConfig::new(dir.path())).unwrap();
        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.files_changed, 1);
        assert_eq!(report.comments_added, 1);
        assert_eq!(report.changed, vec![src.join("A.java")]);
        assert_eq!(
            fs::read_to_string(src.join("A.java")).unwrap(),
            "/**\n * The {@code A} class\n */\nclass A {}\n"
        );
    }

    #[test]
    fn test_dry_run_leaves_files_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, "class A {}\n").unwrap();

        let mut docky = Docky::try_new(templates()).unwrap();
        let mut config = DockyConfig::new(&path);
        config.mode = ApplyMode::DryRun;
        let report = docky.apply(&config).unwrap();
        assert_eq!(report.comments_added, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "class A {}\n");
    }

    #[test]
    fn test_missing_root() {
        let mut docky = Docky::try_new(templates()).unwrap();
        let result = docky.apply(&DockyConfig::new("does/not/exist"));
        assert!(matches!(result, Err(Error::DirectoryNotFound(_))));
    }
}
