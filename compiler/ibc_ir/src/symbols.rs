//! Symbol trees and symbol metadata.
//!
//! A [`SymbolTree`] is a pure nested mapping mirroring declaration nesting.
//! Metadata lives beside it in a flat [`SymbolMetadataMap`] keyed by the
//! dot-joined path of each entry (`Ball.move`), never inline in the tree.
//! The same shapes describe one file's local symbols and the merged
//! multi-file view built for resolution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::PATH_SEPARATOR;

/// Nested name → subtree mapping.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTree(IndexMap<String, SymbolTree>);

impl SymbolTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&SymbolTree> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Insert (or replace) the subtree under `name`, returning the old one.
    pub fn insert(&mut self, name: impl Into<String>, subtree: SymbolTree) -> Option<SymbolTree> {
        self.0.insert(name.into(), subtree)
    }

    /// Child under `name`, created empty if missing.
    pub fn child_mut(&mut self, name: &str) -> &mut SymbolTree {
        self.0.entry(name.to_string()).or_default()
    }

    pub fn remove(&mut self, name: &str) -> Option<SymbolTree> {
        self.0.shift_remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolTree)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Subtree at a path of segments.
    pub fn get_path<S: AsRef<str>>(&self, segments: &[S]) -> Option<&SymbolTree> {
        segments
            .iter()
            .try_fold(self, |tree, seg| tree.get(seg.as_ref()))
    }

    /// Subtree at a path, creating intermediate nodes.
    pub fn ensure_path<S: AsRef<str>>(&mut self, segments: &[S]) -> &mut SymbolTree {
        let mut tree = self;
        for seg in segments {
            tree = tree.child_mut(seg.as_ref());
        }
        tree
    }

    /// Every dotted path in the tree, parents before children.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths("", &mut out);
        out
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (name, subtree) in &self.0 {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}{PATH_SEPARATOR}{name}")
            };
            out.push(path.clone());
            subtree.collect_paths(&path, out);
        }
    }
}

/// Symbol visibility.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
    #[default]
    Default,
}

impl Visibility {
    /// Whether dependents may see the symbol.
    pub fn is_exported(self) -> bool {
        self != Visibility::Private
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::Default => "default",
        }
    }
}

/// Where a variable is declared.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableScope {
    Global,
    Field,
    Local,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Tags added to the current file's own symbols in a visible view.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct SymbolOrigin {
    #[serde(rename = "__is_local__", default, skip_serializing_if = "is_false")]
    pub is_local: bool,
    #[serde(rename = "__local_file__", default, skip_serializing_if = "Option::is_none")]
    pub local_file: Option<String>,
}

#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct ClassMetadata {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub normalized_name: String,
    /// Constructor parameters, filled by constructor validation.
    #[serde(default)]
    pub init_parameters: IndexMap<String, String>,
    #[serde(flatten)]
    pub origin: SymbolOrigin,
}

#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct FunctionMetadata {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub normalized_name: String,
    #[serde(default)]
    pub parameters: IndexMap<String, String>,
    #[serde(flatten)]
    pub origin: SymbolOrigin,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct VariableMetadata {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub normalized_name: String,
    pub scope: VariableScope,
    #[serde(flatten)]
    pub origin: SymbolOrigin,
}

/// Metadata for one symbol path.
///
/// Folder and file entries are path scaffolding created by the visible
/// symbol builder; the other variants describe declarations.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SymbolMetadata {
    Folder {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    File {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Class(ClassMetadata),
    Function(FunctionMetadata),
    Variable(VariableMetadata),
}

impl SymbolMetadata {
    /// Declared visibility; `None` for folder and file scaffolding.
    pub fn visibility(&self) -> Option<Visibility> {
        match self {
            SymbolMetadata::Class(c) => Some(c.visibility),
            SymbolMetadata::Function(f) => Some(f.visibility),
            SymbolMetadata::Variable(v) => Some(v.visibility),
            SymbolMetadata::Folder { .. } | SymbolMetadata::File { .. } => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        let desc = match self {
            SymbolMetadata::Class(c) => Some(c.description.as_str()),
            SymbolMetadata::Function(f) => Some(f.description.as_str()),
            SymbolMetadata::Variable(v) => Some(v.description.as_str()),
            SymbolMetadata::Folder { description } | SymbolMetadata::File { description } => {
                description.as_deref()
            }
        };
        desc.filter(|d| !d.is_empty())
    }

    pub fn normalized_name(&self) -> Option<&str> {
        match self {
            SymbolMetadata::Class(c) => Some(&c.normalized_name),
            SymbolMetadata::Function(f) => Some(&f.normalized_name),
            SymbolMetadata::Variable(v) => Some(&v.normalized_name),
            SymbolMetadata::Folder { .. } | SymbolMetadata::File { .. } => None,
        }
    }

    pub fn origin(&self) -> Option<&SymbolOrigin> {
        match self {
            SymbolMetadata::Class(c) => Some(&c.origin),
            SymbolMetadata::Function(f) => Some(&f.origin),
            SymbolMetadata::Variable(v) => Some(&v.origin),
            SymbolMetadata::Folder { .. } | SymbolMetadata::File { .. } => None,
        }
    }

    /// Tag a declaration as belonging to the file being resolved.
    pub fn mark_local(&mut self, file: &str) {
        let origin = match self {
            SymbolMetadata::Class(c) => &mut c.origin,
            SymbolMetadata::Function(f) => &mut f.origin,
            SymbolMetadata::Variable(v) => &mut v.origin,
            SymbolMetadata::Folder { .. } | SymbolMetadata::File { .. } => return,
        };
        origin.is_local = true;
        origin.local_file = Some(file.to_string());
    }

    pub fn is_local(&self) -> bool {
        self.origin().is_some_and(|o| o.is_local)
    }

    /// Short kind name for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SymbolMetadata::Folder { .. } => "folder",
            SymbolMetadata::File { .. } => "file",
            SymbolMetadata::Class(_) => "class",
            SymbolMetadata::Function(_) => "function",
            SymbolMetadata::Variable(_) => "variable",
        }
    }
}

/// Flat metadata keyed by dotted path.
pub type SymbolMetadataMap = IndexMap<String, SymbolMetadata>;

/// One file's symbol table: tree plus metadata.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct FileSymbols {
    pub tree: SymbolTree,
    pub metadata: SymbolMetadataMap,
}

impl FileSymbols {
    pub fn new(tree: SymbolTree, metadata: SymbolMetadataMap) -> Self {
        FileSymbols { tree, metadata }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<FileSymbols> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests;
