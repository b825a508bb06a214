//! Tree representation of privacy-annotated contract source.
//!
//! The tree lives in an arena ([`Ast`]) and nodes refer to each other through stable
//! [`NodeId`] handles. Every node records its parent handle and source position;
//! everything later passes compute about a node (types, resolved targets, dataflow
//! sets, analysis snapshots, function metadata) is kept in the side tables of
//! [`Facts`], keyed by handle.
//!
//! # Architecture
//!
//! ```text
//! front end ──► AstBuilder ──► Ast (arena of Node { kind, parent, position })
//!                                │
//!                                ├── traverse ──── children, ancestors, rewrite
//!                                ├── definitions ─ function/contract/unit helpers
//!                                ├── target ────── InstanceTarget canonicalization
//!                                ├── facts ─────── per-pass decorations
//!                                └── diagnostics ─ positional error excerpts
//! ```
//!
//! Nodes are built bottom-up: a node's children exist before the node itself, and
//! adding a node links each child's parent handle to it. Nodes are never removed from
//! the arena; rewriting replaces the handles a parent holds.
//!
//! # Examples
//!
//! ```rust
//! use privir::{ast::{Ast, AstBuilder}, codegen::render};
//!
//! let mut ast = Ast::default();
//! let mut b = AstBuilder::new(&mut ast);
//! let x = b.identifier("x")?;
//! let one = b.number(1);
//! let stmt = b.compound_assignment(x, "+", one)?;
//!
//! assert_eq!(render(&ast, stmt)?, "x += 1;");
//! # Ok::<(), privir::Error>(())
//! ```

pub mod builder;
pub mod definitions;
pub mod diagnostics;
pub mod facts;
pub mod kind;
pub mod ops;
pub mod target;
pub mod traverse;

pub use builder::AstBuilder;
pub use diagnostics::{code_error_message, WarningKind};
pub use facts::{Facts, FunctionInfo, FunctionPrivacy};
pub use kind::{
    AssignOp, FunctionKind, FunctionModifier, Keywords, NodeKind, NumberLiteral, StorageLocation,
};
pub use ops::{BuiltinOp, OpCategory, Value};
pub use target::{InstanceTarget, TargetKey};
pub use traverse::Rewrite;

use std::fmt;

use crate::config::Config;

/// Handle of a node inside an [`Ast`].
///
/// Handles are only meaningful for the arena that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 1-based source position; `-1` marks an unknown coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number
    pub line: i32,
    /// Column number
    pub column: i32,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(line: i32, column: i32) -> Self {
        Self { line, column }
    }

    /// True if both coordinates are known.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.line > 0 && self.column > 0
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(-1, -1)
    }
}

/// A node stored in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// Variant and fields
    pub kind: NodeKind,
    /// Enclosing node; `None` for roots and detached nodes
    pub parent: Option<NodeId>,
    /// Source position
    pub position: Position,
}

/// Arena holding a tree, its decorations and the compiler configuration.
#[derive(Debug)]
pub struct Ast {
    nodes: Vec<Node>,
    facts: Facts,
    config: Config,
    epoch: u64,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Ast {
    /// Creates an empty arena.
    ///
    /// ## Arguments
    /// * `config` - Configuration consulted while building and rendering
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            nodes: Vec::new(),
            facts: Facts::default(),
            config,
            epoch: 0,
        }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of nodes ever added.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node was added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node with unknown position and links its children to it.
    ///
    /// ## Arguments
    /// * `kind` - The node's variant and fields
    pub fn add(&mut self, kind: NodeKind) -> NodeId {
        self.add_at(kind, Position::default())
    }

    /// Adds a node at `position` and links its children to it.
    ///
    /// ## Arguments
    /// * `kind` - The node's variant and fields
    /// * `position` - Source position of the node
    pub fn add_at(&mut self, kind: NodeKind, position: Position) -> NodeId {
        let id = NodeId(self.nodes.len());
        let children = traverse::child_ids(&kind);
        self.nodes.push(Node {
            kind,
            parent: None,
            position,
        });
        for child in children {
            self.link(child, id);
        }
        id
    }

    /// The node behind a handle.
    ///
    /// # Panics
    /// Panics if `id` was issued by a different arena.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The node behind a handle, if it exists in this arena.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// The variant and fields of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Replaces the variant and fields of a node and links the new children to it.
    ///
    /// Children that are no longer referenced keep their stale parent handle; they are
    /// unreachable from the tree.
    ///
    /// ## Arguments
    /// * `id` - Node to update
    /// * `kind` - New variant and fields
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        let children = traverse::child_ids(&kind);
        self.nodes[id.0].kind = kind;
        for child in children {
            self.link(child, id);
        }
    }

    /// Mutable access to a node's fields.
    ///
    /// Callers that change child handles must relink them with [`Ast::set_kind`]
    /// instead; this accessor is meant for value fields (names, types, flags).
    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Source position of a node.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Position {
        self.node(id).position
    }

    /// Sets the source position of a node.
    pub fn set_position(&mut self, id: NodeId, position: Position) {
        self.nodes[id.0].position = position;
    }

    /// Sets the parent handle of `child`.
    pub(crate) fn link(&mut self, child: NodeId, parent: NodeId) {
        self.nodes[child.0].parent = Some(parent);
    }

    /// Decorations computed by compiler passes.
    #[must_use]
    pub fn facts(&self) -> &Facts {
        &self.facts
    }

    /// Mutable decorations.
    pub fn facts_mut(&mut self) -> &mut Facts {
        &mut self.facts
    }

    /// Clone epoch, advanced each time a subtree is cloned by reparsing.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn bump_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_links_children() {
        let mut ast = Ast::default();
        let a = ast.add(NodeKind::Identifier { name: "a".into() });
        let b = ast.add(NodeKind::Identifier { name: "b".into() });
        let tuple = ast.add(NodeKind::Tuple {
            elements: vec![a, b],
        });

        assert_eq!(ast.parent(a), Some(tuple));
        assert_eq!(ast.parent(b), Some(tuple));
        assert_eq!(ast.parent(tuple), None);
        assert_eq!(ast.len(), 3);
    }

    #[test]
    fn test_set_kind_relinks() {
        let mut ast = Ast::default();
        let a = ast.add(NodeKind::Identifier { name: "a".into() });
        let stmt = ast.add(NodeKind::Return { expr: None });
        ast.set_kind(stmt, NodeKind::Return { expr: Some(a) });
        assert_eq!(ast.parent(a), Some(stmt));
    }

    #[test]
    fn test_position_default_unknown() {
        let mut ast = Ast::default();
        let id = ast.add(NodeKind::Break);
        assert!(!ast.position(id).is_known());
        ast.set_position(id, Position::new(3, 5));
        assert_eq!(ast.position(id), Position::new(3, 5));
        assert!(ast.position(id).is_known());
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(7).to_string(), "#7");
        assert_eq!(NodeId(7).index(), 7);
    }
}
