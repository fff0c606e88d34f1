//! Symbol tables for the IBC front end.
//!
//! Two passes live here:
//!
//! - [`build_symbol_tree`] walks one file's AST and produces its local
//!   [`FileSymbols`]: a nested name tree plus flat metadata keyed by dotted path.
//! - [`VisibleSymbolBuilder`] merges the public symbols of a file's
//!   dependencies under their directory/file path segments and splices the
//!   file's own symbols in at the root, local entries winning on collision.
//!
//! Dependency tables are obtained through the [`SymbolTableLoader`] trait;
//! nothing in this crate touches the filesystem.
//!
//! [`FileSymbols`]: ibc_ir::FileSymbols

mod builder;
mod loader;
mod project;
mod visible;

pub use builder::{build_symbol_tree, infer_visibility, symbol_path};
pub use loader::{normalize_file_path, path_segments, MemorySymbolLoader, SymbolTableLoader};
pub use project::{DependencyMap, ProjectLayout, EXTERNAL_LIBRARIES_KEY};
pub use visible::{VisibleSymbolBuilder, VisibleSymbols};

/// Source file extension, stripped when turning file paths into symbol paths.
pub const SOURCE_EXTENSION: &str = ".ibc";
