//! Symbol tree builder.
//!
//! Module nodes are transparent. Classes, functions and variables each get a
//! tree entry and a metadata entry keyed by their dotted path from the file
//! root (`Ball.move`). Only class and function bodies are searched for nested
//! declarations; behavior steps never declare symbols.

use ibc_ir::{
    join_path, AstNode, AstTable, ClassMetadata, FileSymbols, FunctionMetadata, NodeKind,
    NodeType, SymbolMetadata, SymbolMetadataMap, SymbolOrigin, SymbolTree, Uid,
    VariableMetadata, VariableScope, Visibility, ROOT_UID,
};

/// Build the local symbol table of one file.
///
/// An empty AST yields empty outputs.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = ast.len()))]
pub fn build_symbol_tree(ast: &AstTable) -> FileSymbols {
    let mut builder = Builder {
        ast,
        metadata: SymbolMetadataMap::new(),
    };
    let mut tree = SymbolTree::new();
    let mut path = Vec::new();
    builder.visit_children(ROOT_UID, &mut path, &mut tree);

    tracing::debug!(symbols = builder.metadata.len(), "built symbol tree");
    FileSymbols::new(tree, builder.metadata)
}

/// Visibility implied by a symbol's name and, for variables, its scope.
pub fn infer_visibility(name: &str, scope: Option<VariableScope>) -> Visibility {
    if scope == Some(VariableScope::Local) {
        return Visibility::Private;
    }
    if let Some(rest) = name.strip_prefix("__") {
        if !rest.is_empty() && rest.ends_with("__") {
            Visibility::Public
        } else {
            Visibility::Private
        }
    } else if name.starts_with('_') {
        Visibility::Protected
    } else {
        Visibility::Public
    }
}

/// Dotted symbol path of a declaration (`Ball.move.speed`).
///
/// Returns `None` for nodes that declare nothing (root, modules, steps).
pub fn symbol_path(ast: &AstTable, uid: Uid) -> Option<String> {
    let node = ast.get(uid)?;
    if !node.is_declaration() {
        return None;
    }
    let mut segments: Vec<&str> = ast
        .ancestors(uid)
        .filter(|a| matches!(a.node_type(), NodeType::Class | NodeType::Function))
        .filter_map(AstNode::identifier)
        .collect();
    segments.reverse();
    segments.push(node.identifier()?);
    Some(join_path(&segments))
}

struct Builder<'a> {
    ast: &'a AstTable,
    metadata: SymbolMetadataMap,
}

impl<'a> Builder<'a> {
    fn visit_children(&mut self, uid: Uid, path: &mut Vec<&'a str>, tree: &mut SymbolTree) {
        let ast = self.ast;
        let parent_type = ast.get(uid).map_or(NodeType::Root, AstNode::node_type);

        for child in ast.children(uid) {
            match &child.kind {
                NodeKind::Module(_) => self.visit_children(child.uid, path, tree),
                NodeKind::Class(class) => {
                    path.push(&class.identifier);
                    self.metadata.insert(
                        join_path(path),
                        SymbolMetadata::Class(ClassMetadata {
                            visibility: infer_visibility(&class.identifier, None),
                            description: class.external_desc.clone(),
                            ..ClassMetadata::default()
                        }),
                    );
                    let subtree = tree.child_mut(&class.identifier);
                    self.visit_children(child.uid, path, subtree);
                    path.pop();
                }
                NodeKind::Function(func) => {
                    path.push(&func.identifier);
                    self.metadata.insert(
                        join_path(path),
                        SymbolMetadata::Function(FunctionMetadata {
                            visibility: infer_visibility(&func.identifier, None),
                            description: func.external_desc.clone(),
                            parameters: func.params.clone(),
                            ..FunctionMetadata::default()
                        }),
                    );
                    let subtree = tree.child_mut(&func.identifier);
                    self.visit_children(child.uid, path, subtree);
                    path.pop();
                }
                NodeKind::Variable(var) => {
                    let scope = match parent_type {
                        NodeType::Function => VariableScope::Local,
                        NodeType::Class => VariableScope::Field,
                        _ => VariableScope::Global,
                    };
                    path.push(&var.identifier);
                    self.metadata.insert(
                        join_path(path),
                        SymbolMetadata::Variable(VariableMetadata {
                            visibility: infer_visibility(&var.identifier, Some(scope)),
                            description: var.external_desc.clone(),
                            normalized_name: String::new(),
                            scope,
                            origin: SymbolOrigin::default(),
                        }),
                    );
                    tree.child_mut(&var.identifier);
                    path.pop();
                }
                NodeKind::BehaviorStep(_) | NodeKind::Root => {}
            }
        }
    }
}

#[cfg(test)]
mod tests;
