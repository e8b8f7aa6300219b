#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use colmap::{ColumnPair, Document};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Builds documents from a JSON array of objects.
pub fn documents(json: serde_json::Value) -> Vec<Document> {
    match json {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::Object(map) => Document::from(map),
                other => panic!("expected an object, found {other}"),
            })
            .collect(),
        other => panic!("expected an array, found {other}"),
    }
}

pub fn pair<'a>(pairs: &'a [ColumnPair], name: &str) -> &'a ColumnPair {
    pairs
        .iter()
        .find(|pair| pair.name() == name)
        .unwrap_or_else(|| panic!("column '{name}' present"))
}
