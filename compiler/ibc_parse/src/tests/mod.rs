//! Parser tests.
//!
//! - `parser`: node construction, nesting and annotations
//! - `recovery`: structural diagnostics and dropped lines


use ibc_ir::NodeType;

use crate::{parse, ParseOutput};

#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
fn parse_source(source: &str) -> ParseOutput {
    let lexed = ibc_lexer::tokenize(source).unwrap();
    parse(&lexed.tokens).unwrap()
}

/// `(depth, node type, identifier or content)` for every node in uid order.
fn outline(output: &ParseOutput) -> Vec<(usize, NodeType, String)> {
    output
        .ast
        .iter()
        .skip(1)
        .map(|node| {
            let label = match &node.kind {
                ibc_ir::NodeKind::BehaviorStep(step) => step.content.clone(),
                _ => node.identifier().unwrap_or_default().to_string(),
            };
            (output.ast.depth(node.uid), node.node_type(), label)
        })
        .collect()
}
