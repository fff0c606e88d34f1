#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use pretty_assertions::assert_eq;

fn line(source: &str) -> Vec<Token> {
    let out = ibc_lexer::tokenize(source).unwrap();
    out.tokens
        .into_vec()
        .into_iter()
        .filter(|t| !t.kind.is_layout())
        .collect()
}

fn build(source: &str) -> Result<LineNode, String> {
    let mut diagnostics = Vec::new();
    build_line(&line(source), 1, &mut diagnostics)
}

#[test]
fn test_root_tables() {
    let first = expected_child(NodeType::Root);
    assert!(first.allows(NodeType::Module));
    assert!(!first.allows(NodeType::BehaviorStep));

    assert!(expected_next(NodeType::Root, NodeType::Module).allows(NodeType::Module));
    assert!(!expected_next(NodeType::Root, NodeType::Class).allows(NodeType::Module));
    assert!(expected_next(NodeType::Root, NodeType::Variable).allows(NodeType::Function));
}

#[test]
fn test_body_tables() {
    assert!(!expected_child(NodeType::Class).allows(NodeType::BehaviorStep));
    assert!(expected_child(NodeType::Function).allows(NodeType::BehaviorStep));
    assert!(!expected_child(NodeType::Function).allows(NodeType::Function));
    assert_eq!(
        expected_child(NodeType::BehaviorStep),
        NodeTypeSet::BEHAVIOR_STEP
    );
    assert!(expected_child(NodeType::Variable).is_empty());
}

#[test]
fn test_module_line() {
    let node = build("module src.utils.ball: 小球工具").unwrap();
    let NodeKind::Module(module) = node.kind else {
        panic!("expected module");
    };
    assert_eq!(module.identifier, "src.utils.ball");
    assert_eq!(module.content, "小球工具");
    assert!(!node.explicit_block);
}

#[test]
fn test_class_with_bases() {
    let node = build("class Ball(Sprite: 可绘制, $shapes.Circle$):").unwrap();
    assert!(node.explicit_block);
    let NodeKind::Class(class) = node.kind else {
        panic!("expected class");
    };
    assert_eq!(class.identifier, "Ball");
    let bases: Vec<(&str, &str)> = class
        .inh_params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(bases, vec![("Sprite", "可绘制"), ("$shapes.Circle$", "")]);
}

#[test]
fn test_function_params_and_type_refs() {
    let node = build("func 移动(dx: 横向 $math.Vector$ 分量, dy, opts: 选项(默认, 空)):").unwrap();
    let NodeKind::Function(func) = node.kind else {
        panic!("expected function");
    };
    assert_eq!(func.identifier, "移动");
    let names: Vec<&str> = func.params.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["dx", "dy", "opts"]);
    assert_eq!(func.params["dx"], "横向 $math.Vector$ 分量");
    assert_eq!(func.params["opts"], "选项(默认, 空)");
    assert_eq!(func.param_type_refs.len(), 1);
    assert_eq!(func.param_type_refs["dx"], "math.Vector");
}

#[test]
fn test_function_without_colon_still_accepts_block() {
    let node = build("func tick").unwrap();
    assert!(!node.explicit_block);
    assert!(node.accepts_block());
}

#[test]
fn test_duplicate_param_reported_and_kept_once() {
    let mut diagnostics = Vec::new();
    let node = build_line(&line("func f(a: 一, a: 二)"), 3, &mut diagnostics).unwrap();
    let NodeKind::Function(func) = node.kind else {
        panic!("expected function");
    };
    assert_eq!(func.params.len(), 1);
    assert_eq!(func.params["a"], "一");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line_num, 3);
}

#[test]
fn test_variable_refs() {
    let node = build("var pos: $geo.Point$ 或 $geo.Vec$").unwrap();
    let NodeKind::Variable(var) = node.kind else {
        panic!("expected variable");
    };
    assert_eq!(var.content, "$geo.Point$ 或 $geo.Vec$");
    assert_eq!(var.type_ref, vec!["geo.Point", "geo.Vec"]);
}

#[test]
fn test_behavior_step_with_block() {
    let node = build("如果 $self.speed$ 大于 0:").unwrap();
    assert!(node.explicit_block);
    let NodeKind::BehaviorStep(step) = node.kind else {
        panic!("expected step");
    };
    assert_eq!(step.content, "如果 $self.speed$ 大于 0");
    assert_eq!(step.symbol_refs, vec!["self.speed"]);
    assert!(step.new_block_flag);
}

#[test]
fn test_malformed_declarations() {
    assert!(build("class").is_err());
    assert!(build("class My Ball:").is_err());
    assert!(build("func f(a b)").is_err());
    assert!(build("func f(a").is_err());
    assert!(build("func f(a) extra").is_err());
    assert!(build("var").is_err());
}
