//! Code reconstructor for IBC.
//!
//! Regenerates source text from an [`AstTable`]. The output is canonical
//! rather than byte-identical to the original: indentation is normalized,
//! continuations are folded, comments and blank lines are not preserved.
//! Re-lexing and re-parsing the output yields a structurally identical AST.
//!
//! Annotations are written after the node they belong to, at the node's own
//! indentation, which is where the parser attaches them back:
//!
//! ```text
//! class Ball:
//!     var x: 横坐标
//!     description: 水平位置
//! description: 小球
//! ```

mod emitter;

pub use emitter::{Emitter, StringEmitter};

use ibc_ir::{AstNode, AstTable, NodeKind, NodeType, Uid, ROOT_UID};
use std::fmt::Write as _;

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Configuration for the reconstructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Indentation size in spaces.
    pub indent_size: usize,
    /// Put a blank line between top-level classes and functions.
    pub separate_top_level: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            indent_size: INDENT_WIDTH,
            separate_top_level: true,
        }
    }
}

/// Reconstruct source text with the default configuration.
pub fn reconstruct(ast: &AstTable) -> String {
    reconstruct_with_config(ast, FormatConfig::default())
}

/// Reconstruct source text.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = ast.len()))]
pub fn reconstruct_with_config(ast: &AstTable, config: FormatConfig) -> String {
    let mut emitter = StringEmitter::new(config.indent_size);
    let mut previous: Option<NodeType> = None;

    for child in ast.children(ROOT_UID) {
        let node_type = child.node_type();
        let block = matches!(node_type, NodeType::Class | NodeType::Function);
        if config.separate_top_level
            && previous.is_some_and(|prev| block || prev != node_type)
        {
            emitter.emit_newline();
        }
        emit_node(ast, child, 0, &mut emitter);
        previous = Some(node_type);
    }

    emitter.ensure_trailing_newline();
    emitter.output()
}

/// The single source line of a node, without indentation or annotations.
///
/// Returns `None` for the root and unknown uids.
pub fn node_line(ast: &AstTable, uid: Uid) -> Option<String> {
    let node = ast.get(uid)?;
    if node.node_type() == NodeType::Root {
        return None;
    }
    Some(header(node))
}

fn emit_node(ast: &AstTable, node: &AstNode, level: usize, emitter: &mut impl Emitter) {
    emitter.emit_indent(level);
    emitter.emit(&header(node));
    emitter.emit_newline();

    for child in ast.children(node.uid) {
        emit_node(ast, child, level + 1, emitter);
    }

    if let Some((desc, intent)) = annotations(node) {
        for line in desc.lines().filter(|l| !l.is_empty()) {
            emitter.emit_indent(level);
            emitter.emit("description: ");
            emitter.emit(line);
            emitter.emit_newline();
        }
        for line in intent.lines().filter(|l| !l.is_empty()) {
            emitter.emit_indent(level);
            emitter.emit("@ ");
            emitter.emit(line);
            emitter.emit_newline();
        }
    }
}

fn annotations(node: &AstNode) -> Option<(&str, &str)> {
    match &node.kind {
        NodeKind::Class(c) => Some((&c.external_desc, &c.intent_comment)),
        NodeKind::Function(f) => Some((&f.external_desc, &f.intent_comment)),
        NodeKind::Variable(v) => Some((&v.external_desc, &v.intent_comment)),
        NodeKind::Root | NodeKind::Module(_) | NodeKind::BehaviorStep(_) => None,
    }
}

fn entry_list<'a>(entries: impl Iterator<Item = (&'a String, &'a String)>) -> String {
    let mut out = String::from("(");
    for (i, (name, desc)) in entries.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(name);
        if !desc.is_empty() {
            let _ = write!(out, ": {desc}");
        }
    }
    out.push(')');
    out
}

fn header(node: &AstNode) -> String {
    let has_body = !node.children_uids.is_empty();
    let colon = if has_body { ":" } else { "" };

    match &node.kind {
        NodeKind::Root => String::new(),
        NodeKind::Module(m) if m.content.is_empty() => format!("module {}", m.identifier),
        NodeKind::Module(m) => format!("module {}: {}", m.identifier, m.content),
        NodeKind::Class(c) => {
            let bases = if c.inh_params.is_empty() {
                String::new()
            } else {
                entry_list(c.inh_params.iter())
            };
            format!("class {}{bases}{colon}", c.identifier)
        }
        NodeKind::Function(f) => {
            let params = if f.params.is_empty() {
                String::new()
            } else {
                entry_list(f.params.iter())
            };
            format!("func {}{params}{colon}", f.identifier)
        }
        NodeKind::Variable(v) if v.content.is_empty() => format!("var {}", v.identifier),
        NodeKind::Variable(v) => format!("var {}: {}", v.identifier, v.content),
        NodeKind::BehaviorStep(s) if s.new_block_flag => format!("{}:", s.content),
        NodeKind::BehaviorStep(s) => s.content.clone(),
    }
}

#[cfg(test)]
mod tests;
