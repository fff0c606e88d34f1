#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use ibc_ir::{
    AstTable, ClassNode, FunctionNode, ModuleNode, NodeKind, SymbolMetadata, VariableNode,
    VariableScope, Visibility, ROOT_UID,
};
use pretty_assertions::assert_eq;

use super::*;

fn sample_ast() -> AstTable {
    let mut ast = AstTable::new();
    ast.push(
        ROOT_UID,
        1,
        NodeKind::Module(ModuleNode {
            identifier: "numpy".into(),
            content: String::new(),
        }),
    );
    let class = ast.push(
        ROOT_UID,
        2,
        NodeKind::Class(ClassNode {
            identifier: "Ball".into(),
            external_desc: "小球".into(),
            ..ClassNode::default()
        }),
    );
    ast.push(
        class,
        3,
        NodeKind::Variable(VariableNode {
            identifier: "_speed".into(),
            ..VariableNode::default()
        }),
    );
    let method = ast.push(
        class,
        4,
        NodeKind::Function(FunctionNode {
            identifier: "move".into(),
            params: [("dx".to_string(), "位移".to_string())].into_iter().collect(),
            ..FunctionNode::default()
        }),
    );
    ast.push(
        method,
        5,
        NodeKind::Variable(VariableNode {
            identifier: "step".into(),
            ..VariableNode::default()
        }),
    );
    ast.push(
        ROOT_UID,
        6,
        NodeKind::Variable(VariableNode {
            identifier: "count".into(),
            ..VariableNode::default()
        }),
    );
    ast
}

#[test]
fn test_tree_mirrors_declarations() {
    let symbols = build_symbol_tree(&sample_ast());
    assert_eq!(
        symbols.tree.paths(),
        vec!["Ball", "Ball._speed", "Ball.move", "Ball.move.step", "count"]
    );
    assert_eq!(
        symbols.metadata.keys().collect::<Vec<_>>(),
        vec!["Ball", "Ball._speed", "Ball.move", "Ball.move.step", "count"]
    );
}

#[test]
fn test_variable_scope_from_parent() {
    let symbols = build_symbol_tree(&sample_ast());
    let scope = |path: &str| match &symbols.metadata[path] {
        SymbolMetadata::Variable(v) => v.scope,
        other => panic!("expected variable, got {other:?}"),
    };
    assert_eq!(scope("Ball._speed"), VariableScope::Field);
    assert_eq!(scope("Ball.move.step"), VariableScope::Local);
    assert_eq!(scope("count"), VariableScope::Global);
}

#[test]
fn test_metadata_fields() {
    let symbols = build_symbol_tree(&sample_ast());
    let SymbolMetadata::Class(class) = &symbols.metadata["Ball"] else {
        panic!("expected class");
    };
    assert_eq!(class.description, "小球");
    assert!(class.init_parameters.is_empty());

    let SymbolMetadata::Function(func) = &symbols.metadata["Ball.move"] else {
        panic!("expected function");
    };
    assert_eq!(func.parameters.get("dx").map(String::as_str), Some("位移"));
    assert_eq!(
        symbols.metadata["Ball._speed"].visibility(),
        Some(Visibility::Protected)
    );
    assert_eq!(
        symbols.metadata["Ball.move.step"].visibility(),
        Some(Visibility::Private)
    );
}

#[test]
fn test_infer_visibility() {
    assert_eq!(infer_visibility("__init__", None), Visibility::Public);
    assert_eq!(infer_visibility("__secret", None), Visibility::Private);
    assert_eq!(infer_visibility("__", None), Visibility::Private);
    assert_eq!(infer_visibility("_helper", None), Visibility::Protected);
    assert_eq!(infer_visibility("run", None), Visibility::Public);
    assert_eq!(
        infer_visibility("total", Some(VariableScope::Local)),
        Visibility::Private
    );
    assert_eq!(
        infer_visibility("total", Some(VariableScope::Field)),
        Visibility::Public
    );
}

#[test]
fn test_symbol_path() {
    let ast = sample_ast();
    assert_eq!(symbol_path(&ast, 2).as_deref(), Some("Ball"));
    assert_eq!(symbol_path(&ast, 5).as_deref(), Some("Ball.move.step"));
    assert_eq!(symbol_path(&ast, 1), None);
    assert_eq!(symbol_path(&ast, ROOT_UID), None);
}

#[test]
fn test_empty_ast_gives_empty_outputs() {
    let symbols = build_symbol_tree(&AstTable::new());
    assert!(symbols.tree.is_empty());
    assert!(symbols.metadata.is_empty());
}
