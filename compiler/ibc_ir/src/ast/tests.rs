#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use pretty_assertions::assert_eq;

fn sample_table() -> AstTable {
    let mut table = AstTable::new();
    table.push(
        ROOT_UID,
        1,
        NodeKind::Module(ModuleNode {
            identifier: "src.ball".into(),
            content: "球体模块".into(),
        }),
    );
    let class = table.push(
        ROOT_UID,
        3,
        NodeKind::Class(ClassNode {
            identifier: "Ball".into(),
            ..ClassNode::default()
        }),
    );
    let func = table.push(
        class,
        4,
        NodeKind::Function(FunctionNode {
            identifier: "move".into(),
            params: IndexMap::from([("dt".to_string(), "时间步长".to_string())]),
            ..FunctionNode::default()
        }),
    );
    table.push(
        func,
        5,
        NodeKind::BehaviorStep(BehaviorStepNode {
            content: "更新 $self.position_x$".into(),
            symbol_refs: vec!["self.position_x".into()],
            new_block_flag: false,
        }),
    );
    table
}

#[test]
fn test_push_links_parent_and_child() {
    let table = sample_table();
    assert_eq!(table.len(), 5);
    assert_eq!(table.root().children_uids, vec![1, 2]);
    assert_eq!(table.get(3).unwrap().parent_uid, Some(2));
    assert_eq!(table.get(2).unwrap().children_uids, vec![3]);
    table.validate().unwrap();
}

#[test]
fn test_enclosing_class_and_depth() {
    let table = sample_table();
    assert_eq!(table.enclosing_class(4).unwrap().uid, 2);
    assert!(table.enclosing_class(2).is_none());
    assert_eq!(table.depth(2), 0);
    assert_eq!(table.depth(4), 2);
}

#[test]
fn test_is_empty_with_only_root() {
    assert!(AstTable::new().is_empty());
    assert!(!sample_table().is_empty());
}

#[test]
fn test_json_is_keyed_by_string_uid_and_tagged() {
    let table = sample_table();
    let json = table.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["0"]["node_type"], "Root");
    assert_eq!(value["2"]["node_type"], "Class");
    assert_eq!(value["2"]["identifier"], "Ball");
    assert_eq!(value["3"]["params"]["dt"], "时间步长");
    assert_eq!(value["4"]["parent_uid"], 3);
}

#[test]
fn test_json_reload_preserves_table() {
    let table = sample_table();
    let reloaded = AstTable::from_json(&table.to_json().unwrap()).unwrap();
    assert_eq!(reloaded, table);
}

#[test]
fn test_from_json_rejects_broken_link() {
    let mut table = sample_table();
    table.get_mut(3).unwrap().parent_uid = Some(1);
    let json = table.to_json().unwrap();
    assert!(matches!(
        AstTable::from_json(&json),
        Err(AstError::BrokenLink { parent: 2, child: 3, .. })
    ));
}

#[test]
fn test_same_structure_ignores_lines() {
    let a = sample_table();
    let mut b = sample_table();
    for uid in 1..5 {
        b.get_mut(uid).unwrap().line_number += 10;
    }
    assert!(a.same_structure(&b));

    if let NodeKind::Function(f) = &mut b.get_mut(3).unwrap().kind {
        f.params.insert("extra".into(), String::new());
    }
    assert!(!a.same_structure(&b));
}

#[test]
fn test_node_type_set_allows() {
    let set = NodeTypeSet::CLASS | NodeTypeSet::FUNCTION;
    assert!(set.allows(NodeType::Class));
    assert!(!set.allows(NodeType::Module));
    assert!(!set.allows(NodeType::Root));
    assert_eq!(set.describe(), "class, function");
    assert_eq!(NodeTypeSet::empty().describe(), "nothing");
}
