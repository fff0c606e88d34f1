//! Uid-indexed AST arena.
//!
//! Nodes live in a flat table indexed by [`Uid`]; parent/child links are
//! uids, never references. Uid 0 is the synthetic root. Uids are assigned in
//! insertion order, which is also source order, so iterating the table visits
//! nodes the way the parser produced them.
//!
//! # Invariant
//!
//! The parent/child relation is bidirectional and acyclic: for every child
//! uid listed by a node, that child exists and names the node as its parent.
//! [`AstTable::push`] maintains this by construction; [`AstTable::validate`]
//! re-checks it for tables loaded from JSON.

use std::fmt;

use bitflags::bitflags;
use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Node identifier, an index into [`AstTable`].
pub type Uid = u32;

/// Uid of the synthetic root node.
pub const ROOT_UID: Uid = 0;

/// Node type discriminant.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum NodeType {
    Root,
    Module,
    Class,
    Function,
    Variable,
    BehaviorStep,
}

impl NodeType {
    /// The grammar-table flag for this node type (empty for the root).
    pub fn flag(self) -> NodeTypeSet {
        match self {
            NodeType::Root => NodeTypeSet::empty(),
            NodeType::Module => NodeTypeSet::MODULE,
            NodeType::Class => NodeTypeSet::CLASS,
            NodeType::Function => NodeTypeSet::FUNCTION,
            NodeType::Variable => NodeTypeSet::VARIABLE,
            NodeType::BehaviorStep => NodeTypeSet::BEHAVIOR_STEP,
        }
    }

    /// Leading keyword that introduces this node type, if any.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            NodeType::Module => Some("module"),
            NodeType::Class => Some("class"),
            NodeType::Function => Some("func"),
            NodeType::Variable => Some("var"),
            NodeType::Root | NodeType::BehaviorStep => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::Module => "module",
            NodeType::Class => "class",
            NodeType::Function => "function",
            NodeType::Variable => "variable",
            NodeType::BehaviorStep => "behavior step",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// A set of node types, used for the parser's grammar tables.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct NodeTypeSet: u8 {
        const MODULE = 1 << 0;
        const CLASS = 1 << 1;
        const FUNCTION = 1 << 2;
        const VARIABLE = 1 << 3;
        const BEHAVIOR_STEP = 1 << 4;
    }
}

impl NodeTypeSet {
    pub fn allows(self, node_type: NodeType) -> bool {
        let flag = node_type.flag();
        !flag.is_empty() && self.contains(flag)
    }

    /// Comma-separated names, for diagnostics.
    pub fn describe(self) -> String {
        let names: Vec<&str> = [
            (NodeTypeSet::MODULE, "module"),
            (NodeTypeSet::CLASS, "class"),
            (NodeTypeSet::FUNCTION, "function"),
            (NodeTypeSet::VARIABLE, "variable"),
            (NodeTypeSet::BEHAVIOR_STEP, "behavior step"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();

        if names.is_empty() {
            "nothing".to_string()
        } else {
            names.join(", ")
        }
    }
}

/// Ordered name → text mapping used for parameters and base classes.
pub type ParamMap = IndexMap<String, String>;

/// `module a.b.c: description`
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct ModuleNode {
    /// Dotted import path.
    pub identifier: String,
    pub content: String,
}

/// `class Name(Base: note, ...):`
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct ClassNode {
    pub identifier: String,
    #[serde(default)]
    pub external_desc: String,
    #[serde(default)]
    pub intent_comment: String,
    /// Base name → inheritance note.
    #[serde(default)]
    pub inh_params: ParamMap,
}

/// `func name(param: description, ...):`
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct FunctionNode {
    pub identifier: String,
    #[serde(default)]
    pub external_desc: String,
    #[serde(default)]
    pub intent_comment: String,
    /// Parameter name → description (with `$` markers kept).
    #[serde(default)]
    pub params: ParamMap,
    /// Parameter name → `$`-reference string.
    #[serde(default)]
    pub param_type_refs: ParamMap,
}

/// `var name: content`
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct VariableNode {
    pub identifier: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub external_desc: String,
    #[serde(default)]
    pub intent_comment: String,
    /// `$`-reference strings found in the content.
    #[serde(default)]
    pub type_ref: Vec<String>,
}

/// Any line that is not a declaration.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct BehaviorStepNode {
    pub content: String,
    /// Raw `$`-reference strings found in the content.
    #[serde(default)]
    pub symbol_refs: Vec<String>,
    /// The step ended with `:` and opens a nested block.
    #[serde(default)]
    pub new_block_flag: bool,
}

/// Variant payload of an [`AstNode`].
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "node_type")]
pub enum NodeKind {
    Root,
    Module(ModuleNode),
    Class(ClassNode),
    Function(FunctionNode),
    Variable(VariableNode),
    BehaviorStep(BehaviorStepNode),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Root => NodeType::Root,
            NodeKind::Module(_) => NodeType::Module,
            NodeKind::Class(_) => NodeType::Class,
            NodeKind::Function(_) => NodeType::Function,
            NodeKind::Variable(_) => NodeType::Variable,
            NodeKind::BehaviorStep(_) => NodeType::BehaviorStep,
        }
    }
}

/// One AST node: common header plus variant payload.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct AstNode {
    pub uid: Uid,
    /// `None` only for the root.
    pub parent_uid: Option<Uid>,
    #[serde(default)]
    pub children_uids: Vec<Uid>,
    pub line_number: u32,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl AstNode {
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Declared name of a module, class, function or variable.
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Module(m) => Some(&m.identifier),
            NodeKind::Class(c) => Some(&c.identifier),
            NodeKind::Function(f) => Some(&f.identifier),
            NodeKind::Variable(v) => Some(&v.identifier),
            NodeKind::Root | NodeKind::BehaviorStep(_) => None,
        }
    }

    /// Classes, functions and variables accept `description:` and `@` lines.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Class(_) | NodeKind::Function(_) | NodeKind::Variable(_)
        )
    }

    /// External description of a declaration.
    pub fn external_desc(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Class(c) => Some(&c.external_desc),
            NodeKind::Function(f) => Some(&f.external_desc),
            NodeKind::Variable(v) => Some(&v.external_desc),
            _ => None,
        }
    }

    /// Mutable access to `(external_desc, intent_comment)` of a declaration.
    pub fn annotations_mut(&mut self) -> Option<(&mut String, &mut String)> {
        match &mut self.kind {
            NodeKind::Class(c) => Some((&mut c.external_desc, &mut c.intent_comment)),
            NodeKind::Function(f) => Some((&mut f.external_desc, &mut f.intent_comment)),
            NodeKind::Variable(v) => Some((&mut v.external_desc, &mut v.intent_comment)),
            _ => None,
        }
    }

    /// Whether this node's body may contain children.
    pub fn opens_block(&self) -> bool {
        match &self.kind {
            NodeKind::Root | NodeKind::Class(_) | NodeKind::Function(_) => true,
            NodeKind::BehaviorStep(step) => step.new_block_flag,
            NodeKind::Module(_) | NodeKind::Variable(_) => false,
        }
    }
}

/// Errors raised when loading or validating an [`AstTable`].
#[derive(Debug, thiserror::Error)]
pub enum AstError {
    #[error("invalid AST document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node keyed `{key}` declares uid {uid}")]
    UidMismatch { key: String, uid: Uid },
    #[error("AST has no node with uid {0}")]
    MissingNode(Uid),
    #[error("node {child} is listed under {parent} but names {actual:?} as parent")]
    BrokenLink {
        parent: Uid,
        child: Uid,
        actual: Option<Uid>,
    },
    #[error("node {0} is not reachable from the root exactly once")]
    Unreachable(Uid),
    #[error("node 0 must be the root")]
    BadRoot,
}

/// Flat node table indexed by uid.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AstTable {
    nodes: Vec<AstNode>,
}

impl Default for AstTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AstTable {
    /// A table holding only the root.
    pub fn new() -> Self {
        AstTable {
            nodes: vec![AstNode {
                uid: ROOT_UID,
                parent_uid: None,
                children_uids: Vec::new(),
                line_number: 0,
                kind: NodeKind::Root,
            }],
        }
    }

    /// Append a node under `parent` and return its uid.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not in the table, which would be a parser bug.
    pub fn push(&mut self, parent: Uid, line_number: u32, kind: NodeKind) -> Uid {
        let uid = Uid::try_from(self.nodes.len()).unwrap_or(Uid::MAX);
        self.nodes.push(AstNode {
            uid,
            parent_uid: Some(parent),
            children_uids: Vec::new(),
            line_number,
            kind,
        });
        self.nodes[parent as usize].children_uids.push(uid);
        uid
    }

    pub fn root(&self) -> &AstNode {
        &self.nodes[ROOT_UID as usize]
    }

    pub fn get(&self, uid: Uid) -> Option<&AstNode> {
        self.nodes.get(uid as usize)
    }

    pub fn get_mut(&mut self, uid: Uid) -> Option<&mut AstNode> {
        self.nodes.get_mut(uid as usize)
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// All nodes in uid order, root first.
    pub fn iter(&self) -> std::slice::Iter<'_, AstNode> {
        self.nodes.iter()
    }

    pub fn children(&self, uid: Uid) -> impl Iterator<Item = &AstNode> + '_ {
        self.get(uid)
            .into_iter()
            .flat_map(|node| node.children_uids.iter())
            .filter_map(|child| self.get(*child))
    }

    pub fn parent(&self, uid: Uid) -> Option<&AstNode> {
        self.get(uid)?.parent_uid.and_then(|p| self.get(p))
    }

    /// Ancestors of `uid`, nearest first, ending at the root.
    pub fn ancestors(&self, uid: Uid) -> impl Iterator<Item = &AstNode> + '_ {
        std::iter::successors(self.parent(uid), |node| self.parent(node.uid))
    }

    /// Nearest enclosing class of `uid`, if any.
    pub fn enclosing_class(&self, uid: Uid) -> Option<&AstNode> {
        self.ancestors(uid)
            .find(|node| node.node_type() == NodeType::Class)
    }

    /// Depth below the root (top-level declarations are at depth 0).
    pub fn depth(&self, uid: Uid) -> usize {
        self.ancestors(uid).count().saturating_sub(1)
    }

    /// Check the parent/child invariant over the whole table.
    pub fn validate(&self) -> Result<(), AstError> {
        let root = self.nodes.first().ok_or(AstError::BadRoot)?;
        if root.uid != ROOT_UID || root.parent_uid.is_some() || root.kind != NodeKind::Root {
            return Err(AstError::BadRoot);
        }

        let mut seen = vec![false; self.nodes.len()];
        seen[0] = true;
        let mut stack = vec![ROOT_UID];

        while let Some(uid) = stack.pop() {
            let node = self.get(uid).ok_or(AstError::MissingNode(uid))?;
            for &child in &node.children_uids {
                let child_node = self.get(child).ok_or(AstError::MissingNode(child))?;
                if child_node.parent_uid != Some(uid) {
                    return Err(AstError::BrokenLink {
                        parent: uid,
                        child,
                        actual: child_node.parent_uid,
                    });
                }
                if seen[child as usize] {
                    return Err(AstError::Unreachable(child));
                }
                seen[child as usize] = true;
                stack.push(child);
            }
        }

        match seen.iter().position(|reached| !reached) {
            Some(idx) => Err(AstError::Unreachable(Uid::try_from(idx).unwrap_or(Uid::MAX))),
            None => Ok(()),
        }
    }

    /// Compare shape and payloads, ignoring uids and line numbers.
    ///
    /// Two tables are structurally identical when their roots have the same
    /// children, recursively, with equal node payloads.
    pub fn same_structure(&self, other: &AstTable) -> bool {
        self.subtree_eq(ROOT_UID, other, ROOT_UID)
    }

    fn subtree_eq(&self, uid: Uid, other: &AstTable, other_uid: Uid) -> bool {
        let (Some(a), Some(b)) = (self.get(uid), other.get(other_uid)) else {
            return false;
        };
        a.kind == b.kind
            && a.children_uids.len() == b.children_uids.len()
            && a.children_uids
                .iter()
                .zip(&b.children_uids)
                .all(|(x, y)| self.subtree_eq(*x, other, *y))
    }

    /// Serialize to the JSON interchange format.
    pub fn to_json(&self) -> Result<String, AstError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from the JSON interchange format and validate links.
    pub fn from_json(json: &str) -> Result<AstTable, AstError> {
        let table: AstTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }
}

impl Serialize for AstTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.nodes.iter().map(|node| (node.uid.to_string(), node)))
    }
}

impl<'de> Deserialize<'de> for AstTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let raw = IndexMap::<String, AstNode>::deserialize(deserializer)?;
        let mut nodes: Vec<AstNode> = raw
            .into_iter()
            .map(|(key, node)| {
                if key == node.uid.to_string() {
                    Ok(node)
                } else {
                    Err(D::Error::custom(AstError::UidMismatch { key, uid: node.uid }))
                }
            })
            .collect::<Result<_, _>>()?;

        nodes.sort_by_key(|node| node.uid);
        for (idx, node) in nodes.iter().enumerate() {
            if node.uid as usize != idx {
                return Err(D::Error::custom(AstError::MissingNode(
                    Uid::try_from(idx).unwrap_or(Uid::MAX),
                )));
            }
        }

        Ok(AstTable { nodes })
    }
}

#[cfg(test)]
mod tests;
