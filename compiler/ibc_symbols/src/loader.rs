//! Dependency symbol loading.

use ibc_ir::FileSymbols;
use rustc_hash::FxHashMap;

use crate::SOURCE_EXTENSION;

/// Source of previously built symbol tables, keyed by file path.
///
/// Returning `None` means "not found"; callers skip such dependencies.
pub trait SymbolTableLoader {
    fn load(&self, path: &str) -> Option<FileSymbols>;
}

impl<F> SymbolTableLoader for F
where
    F: Fn(&str) -> Option<FileSymbols>,
{
    fn load(&self, path: &str) -> Option<FileSymbols> {
        self(path)
    }
}

/// In-memory loader used by the project driver and tests.
#[derive(Clone, Default, Debug)]
pub struct MemorySymbolLoader {
    tables: FxHashMap<String, FileSymbols>,
}

impl MemorySymbolLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file's table. The path is normalized first.
    pub fn insert(&mut self, path: &str, symbols: FileSymbols) -> Option<FileSymbols> {
        self.tables.insert(normalize_file_path(path), symbols)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.tables.contains_key(&normalize_file_path(path))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl SymbolTableLoader for MemorySymbolLoader {
    fn load(&self, path: &str) -> Option<FileSymbols> {
        self.tables.get(&normalize_file_path(path)).cloned()
    }
}

impl FromIterator<(String, FileSymbols)> for MemorySymbolLoader {
    fn from_iter<I: IntoIterator<Item = (String, FileSymbols)>>(iter: I) -> Self {
        let mut loader = MemorySymbolLoader::new();
        for (path, symbols) in iter {
            loader.insert(&path, symbols);
        }
        loader
    }
}

/// Canonical form of a file path: `/` separators, no leading `./`, no
/// source extension.
///
/// ```
/// # use ibc_symbols::normalize_file_path;
/// assert_eq!(normalize_file_path(".\\src\\ball.ibc"), "src/ball");
/// ```
pub fn normalize_file_path(path: &str) -> String {
    let unified = path.trim().replace('\\', "/");
    let trimmed = unified.trim_start_matches("./");
    let stem = trimmed.strip_suffix(SOURCE_EXTENSION).unwrap_or(trimmed);
    stem.trim_matches('/').to_string()
}

/// Non-empty segments of a normalized file path.
pub fn path_segments(path: &str) -> Vec<String> {
    normalize_file_path(path)
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .map(str::to_string)
        .collect()
}
