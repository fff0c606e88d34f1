//! Grammar tables and per-line node builders.
//!
//! | scope          | first child          | following children               |
//! |----------------|----------------------|----------------------------------|
//! | root           | module class func var | after a module: the same set;   |
//! |                |                      | after anything else: class func var |
//! | class          | func var             | func var                         |
//! | func           | var step             | var step                         |
//! | behavior block | step                 | step                             |

use ibc_diagnostic::Diagnostic;
use ibc_ir::{
    render_tokens, BehaviorStepNode, ClassNode, FunctionNode, ModuleNode, NodeKind, NodeType,
    NodeTypeSet, Token, TokenKind, VariableNode,
};
use indexmap::IndexMap;

use crate::error;

const DECLARATIONS: NodeTypeSet = NodeTypeSet::CLASS
    .union(NodeTypeSet::FUNCTION)
    .union(NodeTypeSet::VARIABLE);

/// Node types allowed as the first child of `parent`.
pub fn expected_child(parent: NodeType) -> NodeTypeSet {
    match parent {
        NodeType::Root => DECLARATIONS.union(NodeTypeSet::MODULE),
        NodeType::Class => NodeTypeSet::FUNCTION.union(NodeTypeSet::VARIABLE),
        NodeType::Function => NodeTypeSet::VARIABLE.union(NodeTypeSet::BEHAVIOR_STEP),
        NodeType::BehaviorStep => NodeTypeSet::BEHAVIOR_STEP,
        NodeType::Module | NodeType::Variable => NodeTypeSet::empty(),
    }
}

/// Node types allowed after a `previous` child of `parent`.
pub fn expected_next(parent: NodeType, previous: NodeType) -> NodeTypeSet {
    match (parent, previous) {
        (NodeType::Root, NodeType::Module) => expected_child(NodeType::Root),
        (NodeType::Root, _) => DECLARATIONS,
        _ => expected_child(parent),
    }
}

/// A successfully built line.
#[derive(Debug)]
pub struct LineNode {
    pub kind: NodeKind,
    /// The line ended with `:`.
    pub explicit_block: bool,
}

impl LineNode {
    /// Whether an indented body may follow.
    pub fn accepts_block(&self) -> bool {
        self.explicit_block || matches!(self.kind, NodeKind::Class(_) | NodeKind::Function(_))
    }
}

/// Whether the line ends with `:`.
pub fn ends_with_colon(tokens: &[Token]) -> bool {
    tokens.last().is_some_and(|t| t.kind == TokenKind::Colon)
}

fn strip_colon(tokens: &[Token]) -> (&[Token], bool) {
    match tokens.split_last() {
        Some((last, rest)) if last.kind == TokenKind::Colon => (rest, true),
        _ => (tokens, false),
    }
}

fn references(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| t.kind == TokenKind::RefIdentifier)
        .map(|t| t.text.clone())
        .collect()
}

/// A declared name: a single identifier without whitespace.
fn expect_name<'t>(tokens: &'t [Token], what: &str) -> Result<(&'t str, &'t [Token]), String> {
    match tokens.split_first() {
        Some((first, rest)) if first.kind == TokenKind::Identifier => {
            if first.text.chars().any(char::is_whitespace) {
                Err(format!("{what} name `{}` cannot contain whitespace", first.text))
            } else {
                Ok((&first.text, rest))
            }
        }
        Some((first, _)) => Err(format!("expected {what} name, found {}", first.kind)),
        None => Err(format!("expected {what} name")),
    }
}

/// One `name[: description]` entry of a parenthesized list.
struct Entry<'t> {
    name: String,
    desc: &'t [Token],
}

/// Split `( ... )` at depth-0 commas.
///
/// Returns the entries and the tokens following the closing paren.
fn paren_entries<'t>(
    tokens: &'t [Token],
    allow_ref_names: bool,
) -> Result<(Vec<Entry<'t>>, &'t [Token]), String> {
    let Some((open, _)) = tokens.split_first() else {
        return Ok((Vec::new(), tokens));
    };
    if open.kind != TokenKind::LParen {
        return Ok((Vec::new(), tokens));
    }

    let mut depth = 0usize;
    let mut close = None;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close.ok_or_else(|| "unclosed `(`".to_string())?;
    let inner = &tokens[1..close];
    let after = &tokens[close + 1..];

    if inner.is_empty() {
        return Ok((Vec::new(), after));
    }

    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for i in 0..=inner.len() {
        let at_split = match inner.get(i) {
            None => true,
            Some(t) => {
                match t.kind {
                    TokenKind::LParen => depth += 1,
                    TokenKind::RParen => depth = depth.saturating_sub(1),
                    _ => {}
                }
                t.kind == TokenKind::Comma && depth == 0
            }
        };
        if at_split {
            entries.push(parse_entry(&inner[start..i], allow_ref_names)?);
            start = i + 1;
        }
    }
    Ok((entries, after))
}

fn parse_entry(tokens: &[Token], allow_ref_names: bool) -> Result<Entry<'_>, String> {
    let Some((first, rest)) = tokens.split_first() else {
        return Err("empty entry in parameter list".to_string());
    };
    let name = match first.kind {
        TokenKind::Identifier if !first.text.chars().any(char::is_whitespace) => {
            first.text.clone()
        }
        TokenKind::Identifier => {
            return Err(format!("parameter name `{}` cannot contain whitespace", first.text))
        }
        TokenKind::RefIdentifier if allow_ref_names => first.to_string(),
        other => return Err(format!("expected a name in parameter list, found {other}")),
    };
    let desc = match rest.split_first() {
        None => &[][..],
        Some((colon, desc)) if colon.kind == TokenKind::Colon => desc,
        Some((other, _)) => {
            return Err(format!(
                "expected `:` or `,` after `{name}`, found {}",
                other.kind
            ))
        }
    };
    Ok(Entry { name, desc })
}

fn reject_trailing(tokens: &[Token], what: &str) -> Result<(), String> {
    match tokens.first() {
        None => Ok(()),
        Some(t) => Err(format!("unexpected {} after {what} header", t.kind)),
    }
}

fn build_module(rest: &[Token]) -> Result<NodeKind, String> {
    let (path, rest) = expect_name(rest, "module")?;
    let content = match rest.split_first() {
        None => String::new(),
        Some((colon, desc)) if colon.kind == TokenKind::Colon => render_tokens(desc),
        Some((other, _)) => return Err(format!("expected `:` after module path, found {}", other.kind)),
    };
    Ok(NodeKind::Module(ModuleNode {
        identifier: path.to_string(),
        content,
    }))
}

fn build_class(
    rest: &[Token],
    line: u32,
    content: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<NodeKind, String> {
    let (name, rest) = expect_name(rest, "class")?;
    let (entries, rest) = paren_entries(rest, true)?;
    reject_trailing(rest, "class")?;

    let mut inh_params = IndexMap::new();
    for entry in entries {
        if inh_params.contains_key(&entry.name) {
            diagnostics.push(error::duplicate_name(
                "base class",
                &entry.name,
                line,
                content.to_string(),
            ));
            continue;
        }
        inh_params.insert(entry.name, render_tokens(entry.desc));
    }

    Ok(NodeKind::Class(ClassNode {
        identifier: name.to_string(),
        inh_params,
        ..ClassNode::default()
    }))
}

fn build_function(
    rest: &[Token],
    line: u32,
    content: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<NodeKind, String> {
    let (name, rest) = expect_name(rest, "function")?;
    let (entries, rest) = paren_entries(rest, false)?;
    reject_trailing(rest, "function")?;

    let mut params = IndexMap::new();
    let mut param_type_refs = IndexMap::new();
    for entry in entries {
        if params.contains_key(&entry.name) {
            diagnostics.push(error::duplicate_name(
                "parameter",
                &entry.name,
                line,
                content.to_string(),
            ));
            continue;
        }
        if let Some(type_ref) = entry
            .desc
            .iter()
            .find(|t| t.kind == TokenKind::RefIdentifier)
        {
            param_type_refs.insert(entry.name.clone(), type_ref.text.clone());
        }
        params.insert(entry.name, render_tokens(entry.desc));
    }

    Ok(NodeKind::Function(FunctionNode {
        identifier: name.to_string(),
        params,
        param_type_refs,
        ..FunctionNode::default()
    }))
}

fn build_variable(rest: &[Token]) -> Result<NodeKind, String> {
    let (name, rest) = expect_name(rest, "variable")?;
    let value = match rest.split_first() {
        None => &[][..],
        Some((colon, value)) if colon.kind == TokenKind::Colon => value,
        Some((other, _)) => {
            return Err(format!("expected `:` after variable name, found {}", other.kind))
        }
    };
    Ok(NodeKind::Variable(VariableNode {
        identifier: name.to_string(),
        content: render_tokens(value),
        type_ref: references(value),
        ..VariableNode::default()
    }))
}

fn build_step(tokens: &[Token], new_block_flag: bool) -> NodeKind {
    NodeKind::BehaviorStep(BehaviorStepNode {
        content: render_tokens(tokens),
        symbol_refs: references(tokens),
        new_block_flag,
    })
}

/// Build the node for one non-annotation line.
///
/// `Err` carries the message of a malformed declaration; the caller drops
/// the line. Duplicate names are reported into `diagnostics` and the node
/// is still built.
pub fn build_line(
    tokens: &[Token],
    line: u32,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<LineNode, String> {
    let content = render_tokens(tokens);
    let keyword = tokens
        .first()
        .filter(|t| t.kind == TokenKind::Keyword)
        .map(|t| t.text.as_str());

    let Some(keyword) = keyword else {
        let (body, explicit_block) = strip_colon(tokens);
        return Ok(LineNode {
            kind: build_step(body, explicit_block),
            explicit_block,
        });
    };

    let rest = &tokens[1..];
    match keyword {
        "module" => Ok(LineNode {
            kind: build_module(rest)?,
            explicit_block: false,
        }),
        "var" => Ok(LineNode {
            kind: build_variable(rest)?,
            explicit_block: false,
        }),
        "class" => {
            let (header, explicit_block) = strip_colon(rest);
            Ok(LineNode {
                kind: build_class(header, line, &content, diagnostics)?,
                explicit_block,
            })
        }
        "func" => {
            let (header, explicit_block) = strip_colon(rest);
            Ok(LineNode {
                kind: build_function(header, line, &content, diagnostics)?,
                explicit_block,
            })
        }
        other => Err(format!("`{other}` cannot start a declaration here")),
    }
}

#[cfg(test)]
mod tests;
