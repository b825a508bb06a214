//! Structural cloning by print-then-reparse.
//!
//! A clone is produced by rendering a subtree and handing the text back to the front
//! end. The copy is behaviorally equal to its source but shares no node handles with
//! it, so every clone advances the arena epoch. Caches keyed by node identity wrap
//! their map in an [`IdentityCache`], which drops its entries as soon as it observes
//! a newer epoch.

use rustc_hash::FxHashMap;
use strum::{Display, EnumIter};
use tracing::debug;

use crate::{
    ast::{Ast, NodeId, NodeKind},
    codegen::render,
    Error, Result,
};

/// Grammar entry point the front end parses rendered text with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Fragment {
    /// A single expression
    Expression,
    /// A single statement, block or statement group
    Statement,
    /// A declaration or definition inside a contract or source unit
    Definition,
    /// A complete source file
    SourceUnit,
}

impl Fragment {
    /// The entry point that parses nodes of `kind`.
    #[must_use]
    pub fn of(kind: &NodeKind) -> Self {
        if kind.is_expression() || matches!(kind, NodeKind::ArgumentList { .. } | NodeKind::NamedArgument { .. }) {
            Fragment::Expression
        } else if kind.is_statement() || matches!(kind, NodeKind::CatchClause { .. }) {
            Fragment::Statement
        } else if matches!(kind, NodeKind::SourceUnit { .. }) {
            Fragment::SourceUnit
        } else {
            Fragment::Definition
        }
    }
}

/// Parser collaborator that turns rendered text back into nodes.
pub trait FrontEnd {
    /// Parses `text` as `fragment` and adds the resulting nodes to `ast`.
    ///
    /// ## Arguments
    /// * `ast` - Arena receiving the parsed nodes
    /// * `fragment` - Grammar entry point
    /// * `text` - Rendered source
    ///
    /// # Errors
    /// Returns an error if `text` does not parse as `fragment`.
    fn parse_fragment(&self, ast: &mut Ast, fragment: Fragment, text: &str) -> Result<NodeId>;
}

/// Clones the subtree at `root` by rendering it and reparsing the text.
///
/// The copy is detached and carries no facts. The arena epoch is advanced, which
/// invalidates every [`IdentityCache`] built against the previous epoch.
///
/// # Errors
/// Returns [`Error::Reparse`] if the front end rejects the rendered text, or the
/// rendering error if `root` cannot be rendered.
pub fn clone_subtree(ast: &mut Ast, front_end: &dyn FrontEnd, root: NodeId) -> Result<NodeId> {
    let text = render(ast, root)?;
    let fragment = Fragment::of(ast.kind(root));
    let copy = front_end
        .parse_fragment(ast, fragment, &text)
        .map_err(|e| match e {
            Error::Reparse(_) => e,
            other => Error::Reparse(other.to_string()),
        })?;
    let epoch = ast.bump_epoch();
    debug!(source = %root, copy = %copy, %fragment, epoch, "cloned subtree by reparse");
    Ok(copy)
}

/// A map keyed by node identity that empties itself across clones.
#[derive(Debug, Clone)]
pub struct IdentityCache<V> {
    epoch: u64,
    entries: FxHashMap<NodeId, V>,
}

impl<V> IdentityCache<V> {
    /// An empty cache valid for the current epoch of `ast`.
    #[must_use]
    pub fn new(ast: &Ast) -> Self {
        Self {
            epoch: ast.epoch(),
            entries: FxHashMap::default(),
        }
    }

    fn sync(&mut self, ast: &Ast) {
        if self.epoch != ast.epoch() {
            debug!(
                from = self.epoch,
                to = ast.epoch(),
                dropped = self.entries.len(),
                "invalidating identity cache"
            );
            self.entries.clear();
            self.epoch = ast.epoch();
        }
    }

    /// The cached value for `id`, if it was stored during the current epoch.
    pub fn get(&mut self, ast: &Ast, id: NodeId) -> Option<&V> {
        self.sync(ast);
        self.entries.get(&id)
    }

    /// Stores `value` for `id`, returning the value it replaces.
    pub fn insert(&mut self, ast: &Ast, id: NodeId, value: V) -> Option<V> {
        self.sync(ast);
        self.entries.insert(id, value)
    }

    /// The cached value for `id`, computing and storing it if absent.
    pub fn get_or_insert_with<F>(&mut self, ast: &Ast, id: NodeId, f: F) -> &V
    where
        F: FnOnce() -> V,
    {
        self.sync(ast);
        self.entries.entry(id).or_insert_with(f)
    }

    /// Number of entries, including ones a newer epoch would drop.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Epoch the entries belong to.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::AstBuilder, test::TemplateFrontEnd};

    #[test]
    fn test_fragment_of() {
        assert_eq!(Fragment::of(&NodeKind::Me), Fragment::Expression);
        assert_eq!(Fragment::of(&NodeKind::Break), Fragment::Statement);
        assert_eq!(
            Fragment::of(&NodeKind::EnumValue { name: "A".into() }),
            Fragment::Definition
        );
        assert_eq!(
            Fragment::of(&NodeKind::SourceUnit {
                units: vec![],
                extra_head: vec![],
                original_code: vec![],
            }),
            Fragment::SourceUnit
        );
    }

    #[test]
    fn test_clone_renders_identically() {
        let mut ast = Ast::default();
        let mut b = AstBuilder::new(&mut ast);
        let x = b.identifier("x").unwrap();
        let one = b.number(1);
        let sum = b.binary(x, "+", one).unwrap();

        let mut front_end = TemplateFrontEnd::default();
        front_end.register(&ast, sum).unwrap();

        let copy = clone_subtree(&mut ast, &front_end, sum).unwrap();
        assert_ne!(copy, sum);
        assert_eq!(render(&ast, copy).unwrap(), "x + 1");
        assert_eq!(ast.parent(copy), None);
        assert_eq!(ast.epoch(), 1);
    }

    #[test]
    fn test_rejected_text_is_reparse_error() {
        let mut ast = Ast::default();
        let stmt = AstBuilder::new(&mut ast).break_stmt();
        let front_end = TemplateFrontEnd::default();

        assert!(matches!(
            clone_subtree(&mut ast, &front_end, stmt),
            Err(Error::Reparse(_))
        ));
        assert_eq!(ast.epoch(), 0);
    }

    #[test]
    fn test_identity_cache_invalidated_by_clone() {
        let mut ast = Ast::default();
        let stmt = AstBuilder::new(&mut ast).continue_stmt();
        let mut front_end = TemplateFrontEnd::default();
        front_end.register(&ast, stmt).unwrap();

        let mut cache = IdentityCache::new(&ast);
        cache.insert(&ast, stmt, "seen");
        assert_eq!(cache.get(&ast, stmt), Some(&"seen"));

        clone_subtree(&mut ast, &front_end, stmt).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&ast, stmt), None);
        assert!(cache.is_empty());
        assert_eq!(cache.epoch(), 1);

        let computed = *cache.get_or_insert_with(&ast, stmt, || "again");
        assert_eq!(computed, "again");
    }
}
