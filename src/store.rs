//! Filesystem persistence for generated spec files.
//!
//! Test names become filenames by folding anything outside word
//! characters and CJK to underscores, collapsing runs, and appending a
//! Unix timestamp so repeated generations of the same case never
//! collide.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::warn;

static UNSAFE_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\x{4e00}-\x{9fff}-]").unwrap());
static UNDERSCORE_RUNS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to save script {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to list output directory {path}: {source}")]
    List {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Fold a test name into a filesystem-safe stem.
fn sanitize_test_name(name: &str) -> String {
    let replaced = UNSAFE_CHARS_RE.replace_all(name, "_");
    let collapsed = UNDERSCORE_RUNS_RE.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// Output-directory store for generated spec files.
#[derive(Debug)]
pub struct ScriptStore {
    output_dir: PathBuf,
}

impl ScriptStore {
    /// Open a store, creating the output directory if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|source| StoreError::CreateDir {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Unique spec filename for a test name.
    pub fn spec_filename(&self, test_name: &str) -> String {
        let timestamp = chrono::Utc::now().timestamp();
        format!("{}_{}.spec.ts", sanitize_test_name(test_name), timestamp)
    }

    /// Write a script under the output directory.
    pub fn save(&self, filename: &str, script: &str) -> Result<PathBuf, StoreError> {
        let path = self.output_dir.join(filename);
        std::fs::write(&path, script).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Paths of every generated spec file, sorted by name.
    pub fn list(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = std::fs::read_dir(&self.output_dir).map_err(|source| StoreError::List {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map_or(false, |name| name.ends_with(".spec.ts"))
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// Delete every generated spec file, returning how many went away.
    pub fn clean(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for path in self.list()? {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "could not remove spec file"),
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_folds_and_collapses() {
        assert_eq!(sanitize_test_name("example search test"), "example_search_test");
        assert_eq!(sanitize_test_name("login: happy path!"), "login_happy_path");
        assert_eq!(sanitize_test_name("搜索测试 (smoke)"), "搜索测试_smoke");
        assert_eq!(sanitize_test_name("__already__safe__"), "already_safe");
    }

    #[test]
    fn test_spec_filename_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScriptStore::new(dir.path()).unwrap();
        let filename = store.spec_filename("example search");
        assert!(filename.starts_with("example_search_"));
        assert!(filename.ends_with(".spec.ts"));
    }

    #[test]
    fn test_save_list_clean() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScriptStore::new(dir.path()).unwrap();

        store.save("a_1.spec.ts", "// a").unwrap();
        store.save("b_2.spec.ts", "// b").unwrap();
        store.save("notes.txt", "ignored").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].ends_with("a_1.spec.ts"));

        assert_eq!(store.clean().unwrap(), 2);
        assert!(store.list().unwrap().is_empty());
    }
}
