//! Project layout and dependency metadata.
//!
//! The layout is a nested JSON mapping mirroring the project's directories.
//! Directory entries are objects; file entries are either a description
//! string or an object with a `description` field. A top-level
//! `ExternalLibraryDependencies` entry lists third-party packages whose
//! references are never validated:
//!
//! ```json
//! {
//!   "src": { "ball.ibc": "弹跳的小球", "utils": { "math": "数学工具" } },
//!   "ExternalLibraryDependencies": { "numpy": "数值计算", "pygame": "" }
//! }
//! ```

use indexmap::IndexMap;
use serde_json::Value;

use crate::loader::{normalize_file_path, path_segments};
use crate::SOURCE_EXTENSION;

/// Key of the external-library allow-list in the layout document.
pub const EXTERNAL_LIBRARIES_KEY: &str = "ExternalLibraryDependencies";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectLayout {
    root: Value,
}

impl ProjectLayout {
    pub fn from_value(root: Value) -> Self {
        ProjectLayout { root }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json).map(Self::from_value)
    }

    /// Top-level package names exempt from reference checking.
    ///
    /// The entry may be an object (names are its keys) or an array of names.
    pub fn external_libraries(&self) -> Vec<String> {
        match self.root.get(EXTERNAL_LIBRARIES_KEY) {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(name)) if !name.is_empty() => vec![name.clone()],
            _ => Vec::new(),
        }
    }

    /// Description text for a file, looked up by its path.
    pub fn file_description(&self, path: &str) -> Option<String> {
        let segments = path_segments(path);
        let (file, dirs) = segments.split_last()?;

        let mut node = &self.root;
        for dir in dirs {
            node = node.get(dir.as_str())?;
        }
        let entry = node
            .get(file.as_str())
            .or_else(|| node.get(format!("{file}{SOURCE_EXTENSION}").as_str()))?;

        let text = match entry {
            Value::String(s) => s.as_str(),
            Value::Object(map) => map.get("description")?.as_str()?,
            _ => return None,
        };
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Declared dependency file paths per file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyMap {
    files: IndexMap<String, Vec<String>>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{"file": ["dep", ...], ...}`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let raw: IndexMap<String, Vec<String>> = serde_json::from_str(json)?;
        Ok(raw.into_iter().collect())
    }

    pub fn insert(&mut self, file: &str, dependencies: Vec<String>) {
        self.files.insert(normalize_file_path(file), dependencies);
    }

    /// Dependencies of `file`; empty when the file is unknown.
    pub fn dependencies_of(&self, file: &str) -> &[String] {
        self.files
            .get(&normalize_file_path(file))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Vec<String>)> for DependencyMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut map = DependencyMap::new();
        for (file, deps) in iter {
            map.insert(&file, deps);
        }
        map
    }
}
