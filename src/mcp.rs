use crate::{
    ApplyMode, Docky, DockyConfig, Documenter, Error, FieldSynchronizer, JavaParser, sync_file,
};
use rmcp::{
    Error as McpError, ServerHandler,
    model::{CallToolResult, Content, ErrorCode, ServerCapabilities, ServerInfo},
    schemars, tool,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// JavaDocky MCP server implementation
#[derive(Debug, Clone, Default)]
pub struct DockyMcp {
    synchronizers: Arc<Mutex<HashMap<PathBuf, FieldSynchronizer>>>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ApplyTemplatesRequest {
    #[schemars(description = "Java source file or directory. Please provide the absolute path.")]
    pub path: String,

    #[schemars(
        description = "Optional template configuration (.javadocky.toml). Discovered from the path when omitted."
    )]
    pub config: Option<String>,

    #[schemars(description = "Report the comments that would be added without writing files")]
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DocumentChangedRequest {
    #[schemars(description = "Java source file that changed. Please provide the absolute path.")]
    pub path: String,
}

/// Helper function to create an invalid argument error
fn invalid_argument_error(message: impl Into<String>) -> McpError {
    McpError::new(ErrorCode::INVALID_PARAMS, message.into(), None)
}

/// Helper function to create an internal error
fn internal_error(message: impl Into<String>) -> McpError {
    McpError::new(ErrorCode::INTERNAL_ERROR, message.into(), None)
}

#[tool(tool_box)]
impl DockyMcp {
    pub fn new() -> Self {
        Self::default()
    }

    #[tool(
        description = "Add Javadoc comments to every undocumented class, field, constructor and method of a Java file or source tree, using the project's templates."
    )]
    async fn apply_templates(
        &self,
        #[tool(aggr)] req: ApplyTemplatesRequest,
    ) -> Result<CallToolResult, McpError> {
        let path = PathBuf::from(&req.path);
        if !path.exists() {
            return Err(invalid_argument_error(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }

        let mut config = DockyConfig::new(path);
        config.templates_path = req.config.map(PathBuf::from);
        if req.dry_run {
            config.mode = ApplyMode::DryRun;
        }

        let templates = config
            .load_templates()
            .map_err(|e| invalid_argument_error(format!("Failed to load templates: {}", e)))?;
        let mut docky = Docky::try_new(templates).map_err(|e| match e {
            Error::InvalidConfig(_) => invalid_argument_error(e.to_string()),
            _ => internal_error(format!("Failed to initialize JavaDocky: {}", e)),
        })?;
        let report = docky
            .apply(&config)
            .map_err(|e| internal_error(format!("Failed to apply templates: {}", e)))?;

        let mut text = format!(
            "Added {} comments to {} of {} files",
            report.comments_added, report.files_changed, report.files_scanned
        );
        for path in &report.changed {
            text.push_str(&format!("\n{}", path.display()));
        }
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Notify that a Java file changed. Field comment edits since the previous notification are propagated into the matching @param lines of constructors and setters. The first notification for a file only records its state."
    )]
    async fn document_changed(
        &self,
        #[tool(aggr)] req: DocumentChangedRequest,
    ) -> Result<CallToolResult, McpError> {
        let path = PathBuf::from(&req.path);
        if !path.is_file() {
            return Err(invalid_argument_error(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        // the lock only guards the map, the file work runs on the blocking pool
        let taken = self
            .synchronizers
            .lock()
            .map_err(|_| internal_error("Synchronizer state is poisoned"))?
            .remove(&path);
        let primed = taken.is_some();
        let file = path.clone();
        let (synchronizer, result) = tokio::task::spawn_blocking(move || {
            let mut synchronizer = taken.unwrap_or_default();
            let result = JavaParser::try_new()
                .and_then(|mut parser| sync_file(&file, &mut synchronizer, &mut parser));
            (synchronizer, result)
        })
        .await
        .map_err(|e| internal_error(format!("Synchronization task failed: {}", e)))?;

        let tracked = synchronizer.snapshot().len();
        if !matches!(result, Err(Error::NoContainer(_))) {
            self.synchronizers
                .lock()
                .map_err(|_| internal_error("Synchronizer state is poisoned"))?
                .insert(path.clone(), synchronizer);
        }

        match result {
            Ok(_) if !primed => Ok(CallToolResult::success(vec![Content::text(format!(
                "Tracking {} ({} field comments)",
                path.display(),
                tracked
            ))])),
            Ok(count) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Rewrote {} comments in {}",
                count,
                path.display()
            ))])),
            Err(e @ Error::NoContainer(_)) => Err(invalid_argument_error(e.to_string())),
            Err(e) => Err(internal_error(format!(
                "Failed to synchronize {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[tool(tool_box)]
impl ServerHandler for DockyMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "A JavaDocky MCP server that documents Java sources from templates and keeps @param descriptions in sync with field comments".into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SOURCE: &str = "class A {\n    /** the x */\n    int x;\n\n    /**\n     * @param x: the x\n     */\n    void setX(int x) { this.x = x; }\n}\n";

    fn request(path: &std::path::Path) -> DocumentChangedRequest {
        DocumentChangedRequest {
            path: path.display().to_string(),
        }
    }

    #[tokio::test]
    async fn test_document_changed_keeps_state_between_calls() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, SOURCE).unwrap();

        let server = DockyMcp::new();
        server.document_changed(request(&path)).await.unwrap();
        assert!(server.synchronizers.lock().unwrap().contains_key(&path));

        fs::write(&path, SOURCE.replace("/** the x */", "/** the new x */")).unwrap();
        server.document_changed(request(&path)).await.unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("     * @param x: the new x\n"));
    }

    #[tokio::test]
    async fn test_document_changed_without_class_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package-info.java");
        fs::write(&path, "package a;\n").unwrap();

        let server = DockyMcp::new();
        assert!(server.document_changed(request(&path)).await.is_err());
        assert!(server.synchronizers.lock().unwrap().is_empty());
    }
}
