//! Constructor validation.
//!
//! A class may declare its constructor as a method named after the class or
//! as the conventional initializer, never both.

use ibc_diagnostic::{Diagnostic, ErrorCode, IssueSink};
use ibc_fmt::node_line;
use ibc_ir::{AstTable, FunctionNode, NodeKind, SymbolMetadata, SymbolMetadataMap, Uid};
use ibc_symbols::symbol_path;

use crate::config::ResolveConfig;

/// Check every class and copy constructor parameters into its metadata.
///
/// Both forms present is one issue per class. Exactly one form sets the
/// class's `init_parameters`; neither leaves them empty.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = ast.len()))]
pub fn validate_constructors(
    ast: &AstTable,
    metadata: &mut SymbolMetadataMap,
    config: &ResolveConfig,
    sink: &mut impl IssueSink,
) {
    for node in ast.iter() {
        let NodeKind::Class(class) = &node.kind else {
            continue;
        };

        let methods: Vec<(Uid, &FunctionNode)> = ast
            .children(node.uid)
            .filter_map(|child| match &child.kind {
                NodeKind::Function(func) => Some((child.uid, func)),
                _ => None,
            })
            .collect();
        let named_after_class = methods.iter().find(|(_, f)| f.identifier == class.identifier);
        let initializer = methods
            .iter()
            .find(|(_, f)| f.identifier == config.initializer_name);

        let constructor = match (named_after_class, initializer) {
            (Some((a, _)), Some((b, _))) if a != b => {
                sink.record(
                    Diagnostic::error(ErrorCode::E2006)
                        .with_message(format!(
                            "class `{}` declares two constructors: `{}` and `{}`",
                            class.identifier, class.identifier, config.initializer_name
                        ))
                        .at_line(node.line_number, node_line(ast, node.uid).unwrap_or_default())
                        .with_note("keep only one of them"),
                );
                continue;
            }
            (Some((_, func)), _) | (None, Some((_, func))) => *func,
            (None, None) => continue,
        };

        let Some(path) = symbol_path(ast, node.uid) else {
            continue;
        };
        if let Some(SymbolMetadata::Class(meta)) = metadata.get_mut(&path) {
            meta.init_parameters = constructor.params.clone();
            tracing::trace!(
                class = %path,
                params = meta.init_parameters.len(),
                "recorded constructor parameters"
            );
        }
    }
}
