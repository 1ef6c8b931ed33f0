//! Schema linting - static checks of compiled schema documents.
//!
//! Checks schema files for:
//! - JSON syntax errors
//! - `required` entries missing from `properties`
//! - nullable fields written as `type` unions instead of the `oneOf` wrapper
//! - duplicate `required` entries and untyped property fragments

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::loader::load_schema;
use crate::types::json_type_name;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// JSON path to the issue (e.g., "/properties/address/required/0")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, files with warnings count as failed.
pub fn lint(path: &Path, strict: bool) -> LintResult {
    let files = collect_schema_files(path);
    let mut results = Vec::new();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        let file_result = lint_file(file, path);
        total_errors += count(&file_result.diagnostics, Severity::Error);
        total_warnings += count(&file_result.diagnostics, Severity::Warning);
        results.push(file_result);
    }

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    tracing::debug!(files = files.len(), failed, "lint finished");
    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors: total_errors,
        warnings: total_warnings,
        results,
    }
}

/// Lint a single schema file.
pub fn lint_file(file: &Path, base_path: &Path) -> FileResult {
    let display_path = file.strip_prefix(base_path).unwrap_or(file).to_path_buf();

    let schema = match load_schema(file) {
        Ok(s) => s,
        Err(e) => {
            return FileResult {
                file: display_path,
                status: FileStatus::Error,
                diagnostics: vec![Diagnostic {
                    severity: Severity::Error,
                    code: "E001".to_string(),
                    file: file.to_path_buf(),
                    path: "/".to_string(),
                    message: format!("syntax error: {}", e),
                }],
            };
        }
    };

    let diagnostics = lint_document(&schema, file);
    let status = if count(&diagnostics, Severity::Error) > 0 {
        FileStatus::Error
    } else if count(&diagnostics, Severity::Warning) > 0 {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file: display_path,
        status,
        diagnostics,
    }
}

/// Lint an in-memory document. `file` is only used to label diagnostics.
pub fn lint_document(schema: &Value, file: &Path) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    check_schema(schema, file, "", &mut diagnostics);
    diagnostics
}

fn count(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}

/// Recursively check a schema node and the schemas nested in it.
fn check_schema(value: &Value, file: &Path, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    let Value::Object(map) = value else {
        return;
    };

    check_type_union(map, file, path, diagnostics);

    if let Some(props) = map.get("properties").and_then(Value::as_object) {
        check_required(map, props, file, path, diagnostics);

        for (name, fragment) in props {
            let child_path = format!("{}/properties/{}", path, name);
            if !is_described(fragment) {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    code: "W003".to_string(),
                    file: file.to_path_buf(),
                    path: child_path.clone(),
                    message: format!(
                        "property \"{}\" has no type, const, enum, or oneOf",
                        name
                    ),
                });
            }
            check_schema(fragment, file, &child_path, diagnostics);
        }
    }

    if let Some(items) = map.get("items") {
        check_schema(items, file, &format!("{}/items", path), diagnostics);
    }

    if let Some(Value::Array(branches)) = map.get("oneOf") {
        for (i, branch) in branches.iter().enumerate() {
            check_schema(branch, file, &format!("{}/oneOf/{}", path, i), diagnostics);
        }
    }
}

/// Check `required` against `properties`.
fn check_required(
    map: &Map<String, Value>,
    props: &Map<String, Value>,
    file: &Path,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(required) = map.get("required") else {
        return;
    };
    let required_path = format!("{}/required", path);

    let Value::Array(entries) = required else {
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            code: "E003".to_string(),
            file: file.to_path_buf(),
            path: required_path,
            message: format!(
                "required must be an array of strings, got {}",
                json_type_name(required)
            ),
        });
        return;
    };

    let mut seen = HashSet::new();
    for (i, entry) in entries.iter().enumerate() {
        let entry_path = format!("{}/{}", required_path, i);
        let Some(name) = entry.as_str() else {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                code: "E003".to_string(),
                file: file.to_path_buf(),
                path: entry_path,
                message: format!(
                    "required entries must be strings, got {}",
                    json_type_name(entry)
                ),
            });
            continue;
        };

        if !seen.insert(name) {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                code: "W002".to_string(),
                file: file.to_path_buf(),
                path: entry_path,
                message: format!("duplicate required entry \"{}\"", name),
            });
        } else if !props.contains_key(name) {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                code: "E002".to_string(),
                file: file.to_path_buf(),
                path: entry_path,
                message: format!("required field \"{}\" is not defined in properties", name),
            });
        }
    }
}

/// Warn on `type: [T, "null"]`; nullable fields use the `oneOf` wrapper.
fn check_type_union(
    map: &Map<String, Value>,
    file: &Path,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(Value::Array(types)) = map.get("type") else {
        return;
    };
    if types.iter().any(|t| t.as_str() == Some("null")) {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            code: "W001".to_string(),
            file: file.to_path_buf(),
            path: format!("{}/type", path),
            message: "nullable type union; use oneOf [<fragment>, {\"type\": \"null\"}]"
                .to_string(),
        });
    }
}

fn is_described(fragment: &Value) -> bool {
    ["type", "const", "enum", "oneOf"]
        .iter()
        .any(|key| fragment.get(key).is_some())
}

/// Collect all .json files in a path (file or directory).
fn collect_schema_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, ToJsonSchema};
    use crate::types::FieldOptions;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn codes(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn built_schema_is_clean() {
        let address = Schema::new().string("city", FieldOptions::new());
        let schema = Schema::new()
            .string("name", FieldOptions::new().nullable(true))
            .object("address", &address, FieldOptions::new())
            .constant("kind", "person", FieldOptions::new());

        let diagnostics = lint_document(&schema.to_json_schema(), Path::new("mem.json"));
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn required_not_in_properties() {
        let schema = json!({
            "type": "object",
            "properties": { "a": { "type": "string" } },
            "required": ["a", "b"]
        });
        let diagnostics = lint_document(&schema, Path::new("mem.json"));
        assert_eq!(codes(&diagnostics), ["E002"]);
        assert_eq!(diagnostics[0].path, "/required/1");
    }

    #[test]
    fn duplicate_required_and_type_union() {
        let schema = json!({
            "type": "object",
            "properties": { "a": { "type": ["string", "null"] } },
            "required": ["a", "a"]
        });
        let diagnostics = lint_document(&schema, Path::new("mem.json"));
        assert_eq!(codes(&diagnostics), ["W002", "W001"]);
    }

    #[test]
    fn nested_checks_reach_items_and_one_of() {
        let schema = json!({
            "type": "object",
            "properties": {
                "list": { "type": "array", "items": {
                    "type": "object", "properties": {}, "required": ["x"]
                } },
                "maybe": { "oneOf": [
                    { "type": "object", "properties": { "y": {} } },
                    { "type": "null" }
                ] }
            }
        });
        let diagnostics = lint_document(&schema, Path::new("mem.json"));
        assert_eq!(codes(&diagnostics), ["E002", "W003"]);
        assert_eq!(diagnostics[0].path, "/properties/list/items/required/0");
        assert_eq!(diagnostics[1].path, "/properties/maybe/oneOf/0/properties/y");
    }

    #[test]
    fn lint_directory_counts() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("good.json"),
            r#"{"type":"object","properties":{"a":{"type":"string"}},"required":["a"]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("bad.json"), "{ nope").unwrap();
        fs::write(
            dir.path().join("warn.json"),
            r#"{"type":"object","properties":{"a":{}}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let result = lint(dir.path(), false);
        assert_eq!(result.files_checked, 3);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors, 1);
        assert_eq!(result.warnings, 1);
        assert!(!result.is_ok());

        let strict = lint(dir.path(), true);
        assert_eq!(strict.failed, 2);
    }
}
