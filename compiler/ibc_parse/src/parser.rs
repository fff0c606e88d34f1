//! Block-stack state machine.
//!
//! Each open block is a [`Frame`] holding the grammar sets for its children
//! and any annotations still waiting for a declaration. INDENT pushes the
//! node opened by the previous line; DEDENT pops. A frame also remembers the
//! names declared directly in it, so a second declaration of the same name
//! is reported. Lines under a dropped
//! opener (or under an unexpected INDENT) are skipped by counting depth in
//! `orphan_depth`.

use std::collections::HashSet;

use ibc_diagnostic::Diagnostic;
use ibc_ir::{
    render_tokens, AstTable, NodeKind, NodeType, NodeTypeSet, Token, TokenKind, Uid, ROOT_UID,
};

use crate::error::{self, AnnotationKind, ParseError};
use crate::grammar::{self, LineNode};
use crate::Cursor;

/// A `description:` or `@` line waiting for a declaration.
struct PendingAnnotation {
    kind: AnnotationKind,
    text: String,
    line: u32,
    content: String,
}

struct Frame {
    uid: Uid,
    node_type: NodeType,
    expected_child: NodeTypeSet,
    expected_next: NodeTypeSet,
    has_child: bool,
    last_decl: Option<Uid>,
    declared: HashSet<String>,
    pending: Vec<PendingAnnotation>,
}

impl Frame {
    fn new(uid: Uid, node_type: NodeType) -> Self {
        Frame {
            uid,
            node_type,
            expected_child: grammar::expected_child(node_type),
            expected_next: NodeTypeSet::all(),
            has_child: false,
            last_decl: None,
            declared: HashSet::new(),
            pending: Vec::new(),
        }
    }

    fn allowed(&self) -> NodeTypeSet {
        if self.has_child {
            self.expected_next
        } else {
            self.expected_child.intersection(self.expected_next)
        }
    }
}

/// The node opened by the previous line, waiting for its INDENT.
struct OpenBlock {
    uid: Uid,
    explicit: bool,
    line: u32,
    content: String,
}

pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    ast: AstTable,
    frames: Vec<Frame>,
    diagnostics: Vec<Diagnostic>,
    open_block: Option<OpenBlock>,
    dropped_opener: bool,
    orphan_depth: usize,
}

fn append_annotation(slot: &mut String, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    if !slot.is_empty() {
        slot.push('\n');
    }
    slot.push_str(text);
}

/// Kind and name of a declaration; classes, functions and variables share
/// one namespace per scope.
fn declared_name(kind: &NodeKind) -> Option<(&'static str, &str)> {
    match kind {
        NodeKind::Class(class) => Some(("class", &class.identifier)),
        NodeKind::Function(function) => Some(("function", &function.identifier)),
        NodeKind::Variable(variable) => Some(("variable", &variable.identifier)),
        _ => None,
    }
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            ast: AstTable::new(),
            frames: vec![Frame::new(ROOT_UID, NodeType::Root)],
            diagnostics: Vec::new(),
            open_block: None,
            dropped_opener: false,
            orphan_depth: 0,
        }
    }

    pub(crate) fn run(mut self) -> Result<(AstTable, Vec<Diagnostic>), ParseError> {
        while !self.cursor.is_at_end() {
            self.layout()?;
            if self.cursor.is_at_end() {
                break;
            }
            let line_number = self.cursor.current().line_number;
            let Some(tokens) = self.cursor.take_line() else {
                return Err(ParseError::Corrupted {
                    line: line_number,
                    detail: "layout token inside a line",
                });
            };
            if self.orphan_depth > 0 {
                tracing::trace!(line = line_number, "skipping line in dropped block");
                continue;
            }
            self.line(tokens);
        }

        self.expect_no_block();
        while self.frames.len() > 1 {
            if let Some(frame) = self.frames.pop() {
                self.finish_frame(frame);
            }
        }
        if let Some(root) = self.frames.pop() {
            self.finish_frame(root);
        }

        Ok((self.ast, self.diagnostics))
    }

    /// Consume the INDENT/DEDENT tokens that start a line.
    fn layout(&mut self) -> Result<(), ParseError> {
        let token = self.cursor.current();
        if token.kind == TokenKind::Indent {
            self.cursor.advance();
            self.indent(token.line_number);
            if self.cursor.current_kind() == TokenKind::Indent {
                return Err(ParseError::Corrupted {
                    line: token.line_number,
                    detail: "more than one INDENT for a line",
                });
            }
            return Ok(());
        }

        self.expect_no_block();
        while self.cursor.current_kind() == TokenKind::Dedent {
            let dedent = self.cursor.advance();
            self.dedent(dedent.line_number)?;
        }
        if self.cursor.current_kind() == TokenKind::Indent {
            return Err(ParseError::Corrupted {
                line: self.cursor.current().line_number,
                detail: "INDENT after DEDENT",
            });
        }
        Ok(())
    }

    /// No INDENT followed the previous line.
    fn expect_no_block(&mut self) {
        self.dropped_opener = false;
        if let Some(open) = self.open_block.take() {
            if open.explicit {
                self.diagnostics
                    .push(error::expected_block(open.line, open.content));
            }
        }
    }

    fn indent(&mut self, line: u32) {
        if self.orphan_depth > 0 {
            self.orphan_depth += 1;
            return;
        }
        if let Some(open) = self.open_block.take() {
            let node_type = self
                .ast
                .get(open.uid)
                .map_or(NodeType::Root, |n| n.node_type());
            tracing::trace!(uid = open.uid, %node_type, "open block");
            self.frames.push(Frame::new(open.uid, node_type));
            return;
        }
        if !std::mem::take(&mut self.dropped_opener) {
            let content = render_tokens(self.cursor.peek_line());
            self.diagnostics
                .push(error::unexpected_indent(line, content));
        }
        self.orphan_depth = 1;
    }

    fn dedent(&mut self, line: u32) -> Result<(), ParseError> {
        if self.orphan_depth > 0 {
            self.orphan_depth -= 1;
            return Ok(());
        }
        if self.frames.len() <= 1 {
            return Err(ParseError::Corrupted {
                line,
                detail: "DEDENT below top level",
            });
        }
        if let Some(frame) = self.frames.pop() {
            self.finish_frame(frame);
        }
        Ok(())
    }

    fn finish_frame(&mut self, frame: Frame) {
        for pending in frame.pending {
            self.diagnostics.push(error::detached_annotation(
                pending.kind,
                pending.line,
                pending.content,
            ));
        }
    }

    fn line(&mut self, tokens: &[Token]) {
        let Some(first) = tokens.first() else {
            return;
        };
        let line = first.line_number;

        if first.kind == TokenKind::IntentComment {
            self.annotate(AnnotationKind::Intent, first.text.clone(), line, tokens);
            return;
        }
        if first.kind == TokenKind::Keyword && first.text == "description" {
            match tokens.get(1) {
                Some(colon) if colon.kind == TokenKind::Colon => {
                    let text = render_tokens(&tokens[2..]);
                    self.annotate(AnnotationKind::Description, text, line, tokens);
                }
                _ => self.drop_line(
                    error::malformed(
                        "expected `:` after `description`".to_string(),
                        line,
                        render_tokens(tokens),
                    ),
                    tokens,
                ),
            }
            return;
        }

        match grammar::build_line(tokens, line, &mut self.diagnostics) {
            Ok(node) => self.accept(node, line, tokens),
            Err(message) => {
                let diag = error::malformed(message, line, render_tokens(tokens));
                self.drop_line(diag, tokens);
            }
        }
    }

    fn drop_line(&mut self, diagnostic: Diagnostic, tokens: &[Token]) {
        tracing::debug!(line = diagnostic.line_num, code = %diagnostic.code, "dropping line");
        self.diagnostics.push(diagnostic);
        self.dropped_opener = grammar::ends_with_colon(tokens)
            || tokens.first().is_some_and(|t| {
                t.kind == TokenKind::Keyword && matches!(t.text.as_str(), "class" | "func")
            });
    }

    fn accept(&mut self, node: LineNode, line: u32, tokens: &[Token]) {
        let Some(frame) = self.frames.last_mut() else {
            return;
        };
        let node_type = node.kind.node_type();
        let allowed = frame.allowed();

        if !allowed.allows(node_type) {
            let content = render_tokens(tokens);
            let diag = if node_type == NodeType::Module && frame.node_type == NodeType::Root {
                error::module_after_declarations(line, content)
            } else {
                error::not_allowed(node_type, frame.node_type, allowed, line, content)
            };
            self.drop_line(diag, tokens);
            self.dropped_opener |= node.accepts_block();
            return;
        }

        if let Some((what, name)) = declared_name(&node.kind) {
            if !frame.declared.insert(name.to_string()) {
                self.diagnostics.push(error::duplicate_declaration(
                    what,
                    name,
                    line,
                    render_tokens(tokens),
                ));
            }
        }

        let accepts_block = node.accepts_block();
        let explicit = node.explicit_block;
        let uid = self.ast.push(frame.uid, line, node.kind);
        frame.has_child = true;
        frame.expected_next = grammar::expected_next(frame.node_type, node_type);

        if matches!(
            node_type,
            NodeType::Class | NodeType::Function | NodeType::Variable
        ) {
            frame.last_decl = Some(uid);
            let pending = std::mem::take(&mut frame.pending);
            for annotation in pending {
                self.attach(uid, annotation.kind, &annotation.text);
            }
        }

        if accepts_block {
            self.open_block = Some(OpenBlock {
                uid,
                explicit,
                line,
                content: render_tokens(tokens),
            });
        }
    }

    fn annotate(&mut self, kind: AnnotationKind, text: String, line: u32, tokens: &[Token]) {
        let Some(frame) = self.frames.last_mut() else {
            return;
        };
        match frame.last_decl {
            Some(target) => self.attach(target, kind, &text),
            None => frame.pending.push(PendingAnnotation {
                kind,
                text,
                line,
                content: render_tokens(tokens),
            }),
        }
    }

    fn attach(&mut self, uid: Uid, kind: AnnotationKind, text: &str) {
        let Some((desc, intent)) = self.ast.get_mut(uid).and_then(|n| n.annotations_mut()) else {
            return;
        };
        match kind {
            AnnotationKind::Description => append_annotation(desc, text),
            AnnotationKind::Intent => append_annotation(intent, text),
        }
    }
}
