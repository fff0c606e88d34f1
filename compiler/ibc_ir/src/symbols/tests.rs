#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use pretty_assertions::assert_eq;

fn class_meta(visibility: Visibility) -> SymbolMetadata {
    SymbolMetadata::Class(ClassMetadata {
        visibility,
        description: "球体".into(),
        ..ClassMetadata::default()
    })
}

#[test]
fn test_ensure_path_and_get_path() {
    let mut tree = SymbolTree::new();
    tree.ensure_path(&["src", "ball", "Ball"]);
    assert!(tree.get_path(&["src", "ball", "Ball"]).is_some());
    assert!(tree.get_path(&["src", "Ball"]).is_none());
    assert_eq!(
        tree.paths(),
        vec!["src", "src.ball", "src.ball.Ball"]
    );
}

#[test]
fn test_insert_replaces_subtree() {
    let mut tree = SymbolTree::new();
    tree.ensure_path(&["X", "old_member"]);
    let old = tree.insert("X", SymbolTree::new());
    assert!(old.unwrap().contains("old_member"));
    assert!(tree.get("X").unwrap().is_empty());
}

#[test]
fn test_visibility_exported() {
    assert!(Visibility::Public.is_exported());
    assert!(Visibility::Protected.is_exported());
    assert!(Visibility::Default.is_exported());
    assert!(!Visibility::Private.is_exported());
}

#[test]
fn test_mark_local_sets_tags() {
    let mut meta = class_meta(Visibility::Public);
    assert!(!meta.is_local());
    meta.mark_local("src/main");
    assert!(meta.is_local());
    assert_eq!(
        meta.origin().unwrap().local_file.as_deref(),
        Some("src/main")
    );

    let mut folder = SymbolMetadata::Folder { description: None };
    folder.mark_local("src/main");
    assert!(!folder.is_local());
}

#[test]
fn test_metadata_json_shape() {
    let mut meta = class_meta(Visibility::Public);
    meta.mark_local("main");
    let value = serde_json::to_value(&meta).unwrap();
    assert_eq!(value["type"], "class");
    assert_eq!(value["visibility"], "public");
    assert_eq!(value["__is_local__"], true);
    assert_eq!(value["__local_file__"], "main");

    let folder = serde_json::to_value(SymbolMetadata::Folder { description: None }).unwrap();
    assert_eq!(folder, serde_json::json!({ "type": "folder" }));
}

#[test]
fn test_metadata_defaults_when_fields_missing() {
    let meta: SymbolMetadata =
        serde_json::from_str(r#"{ "type": "function", "description": "移动" }"#).unwrap();
    assert_eq!(meta.visibility(), Some(Visibility::Default));
    assert_eq!(meta.description(), Some("移动"));
    assert!(!meta.is_local());
}

#[test]
fn test_file_symbols_json_reload() {
    let mut tree = SymbolTree::new();
    tree.ensure_path(&["Ball", "move"]);
    let mut metadata = SymbolMetadataMap::new();
    metadata.insert("Ball".into(), class_meta(Visibility::Public));
    metadata.insert(
        "Ball.move".into(),
        SymbolMetadata::Function(FunctionMetadata::default()),
    );
    let symbols = FileSymbols::new(tree, metadata);

    let reloaded = FileSymbols::from_json(&symbols.to_json().unwrap()).unwrap();
    assert_eq!(reloaded, symbols);
}
