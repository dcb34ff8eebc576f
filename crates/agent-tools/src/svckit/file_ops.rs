//! File Tools
//!
//! `read_file` and `multi_edit`. Edits are applied in memory and written
//! once, so a failing edit leaves the file untouched.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use agent_core::{
    Arguments, ParamType, ParameterSchema, Tool, ToolBuilder, ToolDescriptor, ToolSchema,
};

const BINARY_SNIFF_LEN: usize = 1024;
const PREVIEW_LEN: usize = 100;

#[derive(Error, Debug)]
pub enum FileOpError {
    #[error("At least one edit is required")]
    NoEdits,

    #[error("Editing Jupyter notebooks is not supported")]
    Notebook,

    #[error("Cannot edit binary file {0}")]
    Binary(PathBuf),

    #[error("For a new file the first edit's old_string must be empty")]
    NewFileNeedsEmptyOldString,

    #[error("Edit {index}: old_string and new_string must differ")]
    NoOpEdit { index: usize },

    #[error("Edit {index}: string to replace not found in file: \"{preview}\"")]
    NotFound { index: usize, preview: String },

    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// read_file
// ============================================================================

/// Read the contents of a text file
#[derive(Clone, Debug, Deserialize, JsonSchema)]
pub struct ReadFileArgs {
    /// Path of the file to read
    pub file_path: String,
}

/// Read a file. Failures are reported in the returned text so the model can
/// react to them.
pub async fn read_file(args: ReadFileArgs) -> anyhow::Result<String> {
    match tokio::fs::read_to_string(&args.file_path).await {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(format!("Error: file {} does not exist", args.file_path))
        }
        Err(e) => Ok(format!("Error: failed to read file - {e}")),
    }
}

pub fn read_file_tool() -> ToolDescriptor {
    ToolBuilder::new().async_fn(read_file)
}

// ============================================================================
// multi_edit
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
pub struct Edit {
    #[serde(default)]
    pub old_string: String,
    #[serde(default)]
    pub new_string: String,
    #[serde(default)]
    pub replace_all: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct MultiEditArgs {
    file_path: String,
    edits: Vec<Edit>,
}

/// Applies several find/replace edits to one file atomically
#[derive(Clone, Copy, Debug, Default)]
pub struct MultiEditTool;

#[async_trait]
impl Tool for MultiEditTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "multi_edit".into(),
            description: "Apply several find/replace edits to a single file atomically. \
                          To create a file, give an empty old_string in the first edit."
                .into(),
            parameters: vec![
                ParameterSchema::required("file_path", ParamType::String)
                    .describe("Path of the file to modify"),
                ParameterSchema::required("edits", ParamType::Array).describe(
                    "Edits applied in order; each has old_string, new_string and an \
                     optional replace_all flag (default false)",
                ),
            ],
        }
    }

    async fn execute(&self, arguments: Arguments) -> anyhow::Result<Value> {
        let args: MultiEditArgs = serde_json::from_value(Value::Object(arguments))
            .map_err(|e| anyhow::anyhow!("invalid arguments: {e}"))?;

        let summary = multi_edit(Path::new(&args.file_path), &args.edits).await?;
        Ok(json!(summary))
    }
}

/// Apply `edits` in order to the file at `path` and write the result once.
///
/// Returns a human-readable summary of what changed.
pub async fn multi_edit(path: &Path, edits: &[Edit]) -> Result<String, FileOpError> {
    if edits.is_empty() {
        return Err(FileOpError::NoEdits);
    }

    let path = absolute(path);
    if path.extension().is_some_and(|ext| ext == "ipynb") {
        return Err(FileOpError::Notebook);
    }

    let existing = match tokio::fs::read(&path).await {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(source) => return Err(FileOpError::Read { path, source }),
    };

    let original = match existing {
        Some(bytes) => {
            if looks_binary(&bytes) {
                return Err(FileOpError::Binary(path));
            }
            let text = String::from_utf8(bytes).map_err(|_| FileOpError::Binary(path.clone()))?;
            Some(text)
        }
        None => None,
    };

    validate(original.as_deref(), edits)?;

    let created = original.is_none();
    let mut content = original.unwrap_or_default();
    let mut occurrences = Vec::with_capacity(edits.len());

    for (i, edit) in edits.iter().enumerate() {
        let (updated, count) = apply_edit(&content, edit, i + 1)?;
        content = updated;
        occurrences.push(count);
    }

    if created {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| FileOpError::Write {
                    path: path.clone(),
                    source,
                })?;
        }
    }

    tokio::fs::write(&path, &content)
        .await
        .map_err(|source| FileOpError::Write {
            path: path.clone(),
            source,
        })?;

    tracing::debug!(path = %path.display(), edits = edits.len(), created, "multi_edit applied");

    let mut summary = format!(
        "{} {} with {} edit(s)",
        if created { "Created" } else { "Updated" },
        path.display(),
        edits.len()
    );
    for (i, count) in occurrences.iter().enumerate() {
        summary.push_str(&format!("\nEdit {}: replaced {count} occurrence(s)", i + 1));
    }

    Ok(summary)
}

/// Reject the whole batch before touching anything
fn validate(original: Option<&str>, edits: &[Edit]) -> Result<(), FileOpError> {
    match original {
        None => {
            if edits.first().is_some_and(|edit| !edit.old_string.is_empty()) {
                return Err(FileOpError::NewFileNeedsEmptyOldString);
            }
        }
        Some(content) => {
            for (i, edit) in edits.iter().enumerate() {
                if !edit.old_string.is_empty() && !content.contains(&edit.old_string) {
                    return Err(FileOpError::NotFound {
                        index: i + 1,
                        preview: preview(&edit.old_string),
                    });
                }
            }
        }
    }

    for (i, edit) in edits.iter().enumerate() {
        if edit.old_string == edit.new_string {
            return Err(FileOpError::NoOpEdit { index: i + 1 });
        }
    }

    Ok(())
}

/// An empty `old_string` inserts `new_string` at the start of the content
fn apply_edit(content: &str, edit: &Edit, index: usize) -> Result<(String, usize), FileOpError> {
    if edit.old_string.is_empty() {
        return Ok((format!("{}{content}", edit.new_string), 1));
    }

    if !content.contains(&edit.old_string) {
        return Err(FileOpError::NotFound {
            index,
            preview: preview(&edit.old_string),
        });
    }

    if edit.replace_all {
        let count = content.matches(&edit.old_string).count();
        Ok((content.replace(&edit.old_string, &edit.new_string), count))
    } else {
        Ok((content.replacen(&edit.old_string, &edit.new_string, 1), 1))
    }
}

fn looks_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_LEN {
        let head: String = text.chars().take(PREVIEW_LEN).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use agent_core::{AgentError, ToolRegistry};
    use tempfile::TempDir;

    use super::*;

    fn edit(old: &str, new: &str) -> Edit {
        Edit {
            old_string: old.into(),
            new_string: new.into(),
            replace_all: false,
        }
    }

    #[tokio::test]
    async fn test_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let contents = read_file(ReadFileArgs {
            file_path: path.display().to_string(),
        })
        .await
        .unwrap();
        assert_eq!(contents, "hello");
    }

    #[tokio::test]
    async fn test_read_missing_file_returns_error_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");

        let contents = read_file(ReadFileArgs {
            file_path: path.display().to_string(),
        })
        .await
        .unwrap();
        assert!(contents.starts_with("Error: file"));
        assert!(contents.ends_with("does not exist"));
    }

    #[tokio::test]
    async fn test_edits_applied_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lib.rs");
        std::fs::write(&path, "let a = 1;\nlet b = a;\nlet c = a;\n").unwrap();

        let edits = [
            edit("let a = 1;", "let x = 1;"),
            Edit {
                replace_all: true,
                ..edit("= a;", "= x;")
            },
        ];
        let summary = multi_edit(&path, &edits).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "let x = 1;\nlet b = x;\nlet c = x;\n"
        );
        assert!(summary.starts_with("Updated"));
        assert!(summary.contains("Edit 2: replaced 2 occurrence(s)"));
    }

    #[tokio::test]
    async fn test_creates_new_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("new.txt");

        let summary = multi_edit(&path, &[edit("", "fresh\n"), edit("fresh", "brand new")])
            .await
            .unwrap();

        assert!(summary.starts_with("Created"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "brand new\n");
    }

    #[tokio::test]
    async fn test_new_file_requires_empty_old_string() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.txt");

        let err = multi_edit(&path, &[edit("x", "y")]).await.unwrap_err();
        assert!(matches!(err, FileOpError::NewFileNeedsEmptyOldString));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_failed_edit_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "one two").unwrap();

        // second edit depends on text removed by the first
        let err = multi_edit(&path, &[edit("one", "1"), edit("one two", "x")])
            .await
            .unwrap_err();

        assert!(matches!(err, FileOpError::NotFound { index: 2, .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one two");
    }

    #[tokio::test]
    async fn test_rejections() {
        let dir = TempDir::new().unwrap();
        let text = dir.path().join("a.txt");
        std::fs::write(&text, "same").unwrap();
        let binary = dir.path().join("a.bin");
        std::fs::write(&binary, [0x7f, 0x00, 0x01]).unwrap();

        assert!(matches!(
            multi_edit(&text, &[]).await.unwrap_err(),
            FileOpError::NoEdits
        ));
        assert!(matches!(
            multi_edit(&text, &[edit("same", "same")]).await.unwrap_err(),
            FileOpError::NoOpEdit { index: 1 }
        ));
        assert!(matches!(
            multi_edit(&text, &[edit("missing", "x")]).await.unwrap_err(),
            FileOpError::NotFound { index: 1, .. }
        ));
        assert!(matches!(
            multi_edit(&binary, &[edit("a", "b")]).await.unwrap_err(),
            FileOpError::Binary(_)
        ));
        assert!(matches!(
            multi_edit(&dir.path().join("n.ipynb"), &[edit("", "{}")])
                .await
                .unwrap_err(),
            FileOpError::Notebook
        ));
    }

    #[tokio::test]
    async fn test_through_registry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(&path, "debug = false\n").unwrap();

        let mut registry = ToolRegistry::new();
        registry.register_tool(MultiEditTool).unwrap();

        let args = json!({
            "file_path": path.display().to_string(),
            "edits": [{"old_string": "false", "new_string": "true"}],
        });
        let result = registry
            .execute("multi_edit", args.as_object().unwrap().clone())
            .await
            .unwrap();
        assert!(result.as_str().unwrap().starts_with("Updated"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "debug = true\n");

        let err = registry
            .execute(
                "multi_edit",
                json!({"file_path": path.display().to_string(), "edits": []})
                    .as_object()
                    .unwrap()
                    .clone(),
            )
            .await
            .unwrap_err();
        match err {
            AgentError::ToolInvocation { message, .. } => {
                assert_eq!(message, "At least one edit is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
