//! Intermediate representation types for the IBC front end.
//!
//! Every phase of the pipeline speaks in terms of these types:
//!
//! ```text
//! source ──► TokenList ──► AstTable ──► FileSymbols ──► VisibleSymbols
//!  (lexer)     (parser)     (symbols)     (visible builder / resolver)
//! ```
//!
//! - [`token`]: tokens produced by the lexer
//! - [`ast`]: the uid-indexed AST arena and per-variant node payloads
//! - [`symbols`]: symbol trees and the flat per-path metadata map
//!
//! Nothing here performs I/O; the JSON helpers only convert between
//! in-memory values and strings.

pub mod ast;
pub mod symbols;
pub mod token;

pub use ast::{
    AstError, AstNode, AstTable, BehaviorStepNode, ClassNode, FunctionNode, ModuleNode, NodeKind,
    NodeType, NodeTypeSet, ParamMap, Uid, VariableNode, ROOT_UID,
};
pub use symbols::{
    ClassMetadata, FileSymbols, FunctionMetadata, SymbolMetadata, SymbolMetadataMap, SymbolOrigin,
    SymbolTree, VariableMetadata, VariableScope, Visibility,
};
pub use token::{render_tokens, Token, TokenKind, TokenList};

/// Separator between segments of a symbol path (`file.Class.method`).
pub const PATH_SEPARATOR: char = '.';

/// Join path segments with [`PATH_SEPARATOR`].
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            out.push(PATH_SEPARATOR);
        }
        out.push_str(seg.as_ref());
    }
    out
}
