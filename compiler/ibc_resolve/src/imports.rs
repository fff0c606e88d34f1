//! Module import table.

use ibc_ir::{AstTable, NodeKind, PATH_SEPARATOR};
use indexmap::IndexMap;

/// One `module` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleImport {
    /// Full dotted path (`src.utils.math`).
    pub path: String,
    /// Text after the colon, if any.
    pub description: String,
    pub line: u32,
}

impl ModuleImport {
    /// First path segment (`src` for `src.utils.math`).
    pub fn top_level_package(&self) -> &str {
        self.path
            .split(PATH_SEPARATOR)
            .next()
            .unwrap_or(&self.path)
    }
}

/// Alias → import, where the alias is the last path segment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleImports {
    aliases: IndexMap<String, ModuleImport>,
}

impl ModuleImports {
    /// Collect every module node of the file. A later import with the same
    /// alias replaces an earlier one.
    pub fn collect(ast: &AstTable) -> Self {
        let mut imports = ModuleImports::default();
        for node in ast.iter() {
            if let NodeKind::Module(module) = &node.kind {
                imports.insert(ModuleImport {
                    path: module.identifier.clone(),
                    description: module.content.clone(),
                    line: node.line_number,
                });
            }
        }
        imports
    }

    pub fn insert(&mut self, import: ModuleImport) {
        let alias = import
            .path
            .rsplit(PATH_SEPARATOR)
            .next()
            .unwrap_or(&import.path)
            .to_string();
        self.aliases.insert(alias, import);
    }

    pub fn get(&self, alias: &str) -> Option<&ModuleImport> {
        self.aliases.get(alias)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
