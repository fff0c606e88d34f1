//! Visible symbol builder.
//!
//! Produces the symbol view a file resolves against:
//!
//! ```text
//! dependency src/utils/math ──► src ─ utils ─ math ─ <public symbols>
//! dependency src/ball        ──► src ─ ball ─ <public symbols>
//! current file               ──► <all local symbols at the root>
//! ```
//!
//! Directory segments get `folder` metadata, the file segment gets `file`
//! metadata. Private dependency entries are dropped together with their
//! subtrees. Local entries are tagged with `__is_local__`/`__local_file__`
//! and overwrite any dependency entry at the same root name.

use ibc_ir::{
    join_path, FileSymbols, SymbolMetadata, SymbolMetadataMap, SymbolTree, Visibility,
    PATH_SEPARATOR,
};

use crate::loader::{normalize_file_path, path_segments, SymbolTableLoader};
use crate::project::ProjectLayout;

/// Merged tree and metadata visible from one file.
pub type VisibleSymbols = FileSymbols;

pub struct VisibleSymbolBuilder<'a, L: ?Sized> {
    loader: &'a L,
    layout: Option<&'a ProjectLayout>,
}

impl<'a, L: SymbolTableLoader + ?Sized> VisibleSymbolBuilder<'a, L> {
    pub fn new(loader: &'a L) -> Self {
        VisibleSymbolBuilder {
            loader,
            layout: None,
        }
    }

    /// Use `layout` for file descriptions.
    #[must_use]
    pub fn with_layout(mut self, layout: &'a ProjectLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Build the visible view for `current_file`.
    ///
    /// Dependencies whose tables cannot be loaded are skipped.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(file = current_file, dependencies = dependency_paths.len())
    )]
    pub fn build<S: AsRef<str>>(
        &self,
        current_file: &str,
        dependency_paths: &[S],
        local_tree: &SymbolTree,
        local_metadata: &SymbolMetadataMap,
    ) -> VisibleSymbols {
        let mut visible = VisibleSymbols::default();

        for dep in dependency_paths {
            self.merge_dependency(dep.as_ref(), &mut visible);
        }

        splice_local(
            &normalize_file_path(current_file),
            local_tree,
            local_metadata,
            &mut visible,
        );

        tracing::debug!(entries = visible.metadata.len(), "built visible symbols");
        visible
    }

    fn merge_dependency(&self, dep_path: &str, visible: &mut VisibleSymbols) {
        let segments = path_segments(dep_path);
        if segments.is_empty() {
            return;
        }
        let Some(symbols) = self.loader.load(dep_path) else {
            tracing::debug!(dependency = dep_path, "dependency symbols not found, skipped");
            return;
        };

        for depth in 1..segments.len() {
            visible
                .metadata
                .entry(join_path(&segments[..depth]))
                .or_insert(SymbolMetadata::Folder { description: None });
        }
        let file_path = join_path(&segments);
        let description = self
            .layout
            .and_then(|layout| layout.file_description(dep_path));
        visible
            .metadata
            .insert(file_path.clone(), SymbolMetadata::File { description });

        let file_tree = visible.tree.ensure_path(&segments);
        splice_public(
            &symbols.tree,
            &symbols.metadata,
            "",
            file_tree,
            &file_path,
            &mut visible.metadata,
        );
    }
}

fn child_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{PATH_SEPARATOR}{name}")
    }
}

/// Copy every non-private entry of `source` under `target`.
fn splice_public(
    source: &SymbolTree,
    source_metadata: &SymbolMetadataMap,
    source_prefix: &str,
    target: &mut SymbolTree,
    target_prefix: &str,
    target_metadata: &mut SymbolMetadataMap,
) {
    for (name, subtree) in source.iter() {
        let source_path = child_path(source_prefix, name);
        let meta = source_metadata.get(&source_path);
        if meta.and_then(SymbolMetadata::visibility) == Some(Visibility::Private) {
            continue;
        }

        let target_path = child_path(target_prefix, name);
        if let Some(meta) = meta {
            target_metadata.insert(target_path.clone(), meta.clone());
        }
        splice_public(
            subtree,
            source_metadata,
            &source_path,
            target.child_mut(name),
            &target_path,
            target_metadata,
        );
    }
}

/// Insert the file's own symbols at the root, replacing colliding entries.
fn splice_local(
    current_file: &str,
    local_tree: &SymbolTree,
    local_metadata: &SymbolMetadataMap,
    visible: &mut VisibleSymbols,
) {
    for (name, subtree) in local_tree.iter() {
        if visible.tree.insert(name, subtree.clone()).is_some() {
            let nested = format!("{name}{PATH_SEPARATOR}");
            visible
                .metadata
                .retain(|path, _| path != name && !path.starts_with(&nested));
            tracing::trace!(symbol = name, "local symbol overrides dependency entry");
        }
    }

    for (path, meta) in local_metadata {
        let mut meta = meta.clone();
        meta.mark_local(current_file);
        visible.metadata.insert(path.clone(), meta);
    }
}
