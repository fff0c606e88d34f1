#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use ibc_ir::{BehaviorStepNode, ClassNode, FunctionNode, ModuleNode, ParamMap, VariableNode};
use pretty_assertions::assert_eq;

fn sample() -> AstTable {
    let mut ast = AstTable::new();
    ast.push(
        ROOT_UID,
        1,
        NodeKind::Module(ModuleNode {
            identifier: "src.ball".into(),
            content: String::new(),
        }),
    );
    let class = ast.push(
        ROOT_UID,
        2,
        NodeKind::Class(ClassNode {
            identifier: "Game".into(),
            external_desc: "游戏".into(),
            ..ClassNode::default()
        }),
    );
    let params = param_map(&[("dt", "时间步长"), ("debug", "")]);
    let func = ast.push(
        class,
        3,
        NodeKind::Function(FunctionNode {
            identifier: "tick".into(),
            params,
            ..FunctionNode::default()
        }),
    );
    let step = ast.push(
        func,
        4,
        NodeKind::BehaviorStep(BehaviorStepNode {
            content: "如果 $self.running$".into(),
            symbol_refs: vec!["self.running".into()],
            new_block_flag: true,
        }),
    );
    ast.push(
        step,
        5,
        NodeKind::BehaviorStep(BehaviorStepNode {
            content: "更新".into(),
            ..BehaviorStepNode::default()
        }),
    );
    ast.push(
        ROOT_UID,
        6,
        NodeKind::Variable(VariableNode {
            identifier: "count".into(),
            content: "计数".into(),
            intent_comment: "全局".into(),
            ..VariableNode::default()
        }),
    );
    ast
}

fn param_map(pairs: &[(&str, &str)]) -> ParamMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn test_reconstruct_sample() {
    let expected = "\
module src.ball

class Game:
    func tick(dt: 时间步长, debug):
        如果 $self.running$:
            更新
description: 游戏

var count: 计数
@ 全局
";
    assert_eq!(reconstruct(&sample()), expected);
}

#[test]
fn test_no_blank_lines_when_disabled() {
    let config = FormatConfig {
        separate_top_level: false,
        ..FormatConfig::default()
    };
    let out = reconstruct_with_config(&sample(), config);
    assert!(!out.contains("\n\n"));
}

#[test]
fn test_node_line() {
    let ast = sample();
    assert_eq!(node_line(&ast, 2).as_deref(), Some("class Game:"));
    assert_eq!(node_line(&ast, 4).as_deref(), Some("如果 $self.running$:"));
    assert_eq!(node_line(&ast, 5).as_deref(), Some("更新"));
    assert_eq!(node_line(&ast, ROOT_UID), None);
    assert_eq!(node_line(&ast, 99), None);
}

#[test]
fn test_empty_ast() {
    assert_eq!(reconstruct(&AstTable::new()), "");
}
