//! Child enumeration, parent-chain queries and generic rewriting.
//!
//! Children are listed in declaration order, exactly the node-valued fields of each
//! variant. Rewriting applies a transform to every child slot of one node and stores
//! the results back:
//!
//! | Result | Single slot | Optional slot | Statement list | Other list |
//! |---|---|---|---|---|
//! | [`Rewrite::Keep`] | kept | kept | kept | kept |
//! | [`Rewrite::Replace`] | replaced | replaced | replaced | replaced |
//! | [`Rewrite::Splice`] | error | error | inlined | error |
//! | [`Rewrite::Remove`] | error | cleared | dropped | error |

use tracing::debug;

use crate::{
    ast::{Ast, FunctionModifier, NodeId, NodeKind},
    Error, Result,
};

/// Result of a rewrite transform for one child slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Leave the child in place
    Keep,
    /// Put another node in the slot
    Replace(NodeId),
    /// Replace a statement with a sequence of statements
    Splice(Vec<NodeId>),
    /// Drop a statement or clear an optional slot
    Remove,
}

/// Node-valued fields of `kind`, in declaration order.
#[must_use]
pub fn child_ids(kind: &NodeKind) -> Vec<NodeId> {
    let mut out = Vec::new();
    match kind {
        NodeKind::BooleanLiteral(_)
        | NodeKind::NumberLiteral(_)
        | NodeKind::StringLiteral(_)
        | NodeKind::Identifier { .. }
        | NodeKind::Me
        | NodeKind::All
        | NodeKind::Tee
        | NodeKind::Builtin(_)
        | NodeKind::MetaType(_)
        | NodeKind::New(_)
        | NodeKind::TypeExpr(_)
        | NodeKind::Break
        | NodeKind::Continue
        | NodeKind::Assembly { .. }
        | NodeKind::Comment { .. }
        | NodeKind::VariableDeclaration { .. }
        | NodeKind::Parameter { .. }
        | NodeKind::EventParameter { .. }
        | NodeKind::ErrorParameter { .. }
        | NodeKind::EnumValue { .. }
        | NodeKind::OverrideSpecifier { .. }
        | NodeKind::UserDefinedValueType { .. }
        | NodeKind::UsingDirective { .. }
        | NodeKind::Pragma { .. }
        | NodeKind::Import { .. } => {}

        NodeKind::ArrayLiteral { values: list }
        | NodeKind::Tuple { elements: list }
        | NodeKind::InlineArray { exprs: list }
        | NodeKind::ArgumentList { args: list, .. }
        | NodeKind::Block {
            statements: list, ..
        }
        | NodeKind::IndentBlock { statements: list }
        | NodeKind::StatementList { statements: list }
        | NodeKind::Struct { members: list, .. }
        | NodeKind::Enum { values: list, .. }
        | NodeKind::Event { params: list, .. }
        | NodeKind::Error { params: list, .. }
        | NodeKind::Library { body: list, .. } => out.extend(list),

        NodeKind::MemberAccess { expr, .. }
        | NodeKind::NamedArgument { value: expr, .. }
        | NodeKind::PrimitiveCast { expr, .. }
        | NodeKind::ExpressionStatement { expr } => out.push(*expr),

        NodeKind::Index { arr, key } => {
            out.push(*arr);
            out.extend(key);
        }
        NodeKind::RangeIndex { arr, start, end } => {
            out.push(*arr);
            out.extend(start);
            out.extend(end);
        }
        NodeKind::Slice { arr, base, .. } => {
            out.push(*arr);
            out.extend(base);
        }
        NodeKind::Reclassify { expr, privacy } => out.extend([*expr, *privacy]),
        NodeKind::Call { func, args, .. } => out.extend([*func, *args]),
        NodeKind::Require { condition, .. } => out.push(*condition),
        NodeKind::Revert { expr, args } | NodeKind::Emit { expr, args } => {
            out.extend([*expr, *args]);
        }
        NodeKind::VariableDeclarationStatement { decl, expr } => {
            out.push(*decl);
            out.extend(expr);
        }
        NodeKind::TupleVariableDeclarationStatement { decls, expr } => {
            out.extend(decls.iter().flatten());
            out.push(*expr);
        }
        NodeKind::Assignment { lhs, rhs, .. } => out.extend([*lhs, *rhs]),
        NodeKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            out.extend([*condition, *then_branch]);
            out.extend(else_branch);
        }
        NodeKind::While { condition, body } => out.extend([*condition, *body]),
        NodeKind::DoWhile { body, condition } => out.extend([*body, *condition]),
        NodeKind::For {
            init,
            condition,
            update,
            body,
        } => {
            out.extend(init);
            out.extend(condition);
            out.extend(update);
            out.push(*body);
        }
        NodeKind::Return { expr } => out.extend(expr),
        NodeKind::Try {
            expr,
            returns,
            body,
            catches,
        } => {
            out.push(*expr);
            out.extend(returns);
            out.push(*body);
            out.extend(catches);
        }
        NodeKind::CatchClause { params, body, .. } => {
            out.extend(params);
            out.push(*body);
        }
        NodeKind::StateVariableDeclaration {
            expr,
            override_spec,
            ..
        } => {
            out.extend(override_spec);
            out.extend(expr);
        }
        NodeKind::Function {
            params,
            modifiers,
            returns,
            body,
            ..
        } => {
            out.extend(params);
            out.extend(modifiers.iter().filter_map(|m| match m {
                FunctionModifier::Node(id) => Some(*id),
                FunctionModifier::Keyword(_) => None,
            }));
            out.extend(returns);
            out.extend(body);
        }
        NodeKind::ModifierInvocation { args, .. } | NodeKind::InheritanceSpecifier { args, .. } => {
            out.extend(args);
        }
        NodeKind::ModifierDefinition {
            params,
            overrides,
            body,
            ..
        } => {
            out.extend(params);
            out.extend(overrides);
            out.extend(body);
        }
        NodeKind::Contract {
            units,
            extra_head,
            extra_tail,
            ..
        } => {
            out.extend(extra_head);
            out.extend(units);
            out.extend(extra_tail);
        }
        NodeKind::Interface {
            inheritance, body, ..
        } => {
            out.extend(inheritance);
            out.extend(body);
        }
        NodeKind::SourceUnit {
            units, extra_head, ..
        } => {
            out.extend(extra_head);
            out.extend(units);
        }
    }
    out
}

struct Slots<'a, F> {
    ast: &'a mut Ast,
    f: &'a mut F,
    owner: NodeId,
}

impl<F> Slots<'_, F>
where
    F: FnMut(&mut Ast, NodeId) -> Result<Rewrite>,
{
    fn apply(&mut self, child: NodeId) -> Result<Rewrite> {
        (self.f)(self.ast, child)
    }

    fn invalid(&self, child: NodeId, what: &str) -> Error {
        Error::InvalidRewrite(format!(
            "{what} for child {child} of {}, which is not a statement list entry",
            self.owner
        ))
    }

    fn one(&mut self, slot: &mut NodeId) -> Result<()> {
        match self.apply(*slot)? {
            Rewrite::Keep => Ok(()),
            Rewrite::Replace(id) => {
                *slot = id;
                Ok(())
            }
            Rewrite::Splice(_) => Err(self.invalid(*slot, "sequence")),
            Rewrite::Remove => Err(self.invalid(*slot, "removal")),
        }
    }

    fn opt(&mut self, slot: &mut Option<NodeId>) -> Result<()> {
        let Some(child) = *slot else {
            return Ok(());
        };
        match self.apply(child)? {
            Rewrite::Keep => {}
            Rewrite::Replace(id) => *slot = Some(id),
            Rewrite::Remove => *slot = None,
            Rewrite::Splice(_) => return Err(self.invalid(child, "sequence")),
        }
        Ok(())
    }

    fn many(&mut self, list: &mut [NodeId]) -> Result<()> {
        for slot in list {
            self.one(slot)?;
        }
        Ok(())
    }

    fn opt_many(&mut self, list: &mut [Option<NodeId>]) -> Result<()> {
        for slot in list {
            self.opt(slot)?;
        }
        Ok(())
    }

    fn statements(&mut self, list: &mut Vec<NodeId>) -> Result<()> {
        let mut out = Vec::with_capacity(list.len());
        for &stmt in list.iter() {
            match self.apply(stmt)? {
                Rewrite::Keep => out.push(stmt),
                Rewrite::Replace(id) => out.push(id),
                Rewrite::Splice(ids) => {
                    debug!(statement = %stmt, count = ids.len(), "splicing statement");
                    out.extend(ids);
                }
                Rewrite::Remove => debug!(statement = %stmt, "dropping statement"),
            }
        }
        *list = out;
        Ok(())
    }

    fn modifiers(&mut self, list: &mut [FunctionModifier]) -> Result<()> {
        for modifier in list {
            if let FunctionModifier::Node(id) = modifier {
                self.one(id)?;
            }
        }
        Ok(())
    }

    fn visit(&mut self, kind: &mut NodeKind) -> Result<()> {
        match kind {
            NodeKind::BooleanLiteral(_)
            | NodeKind::NumberLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::Identifier { .. }
            | NodeKind::Me
            | NodeKind::All
            | NodeKind::Tee
            | NodeKind::Builtin(_)
            | NodeKind::MetaType(_)
            | NodeKind::New(_)
            | NodeKind::TypeExpr(_)
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Assembly { .. }
            | NodeKind::Comment { .. }
            | NodeKind::VariableDeclaration { .. }
            | NodeKind::Parameter { .. }
            | NodeKind::EventParameter { .. }
            | NodeKind::ErrorParameter { .. }
            | NodeKind::EnumValue { .. }
            | NodeKind::OverrideSpecifier { .. }
            | NodeKind::UserDefinedValueType { .. }
            | NodeKind::UsingDirective { .. }
            | NodeKind::Pragma { .. }
            | NodeKind::Import { .. } => Ok(()),

            NodeKind::Block { statements, .. }
            | NodeKind::IndentBlock { statements }
            | NodeKind::StatementList { statements } => self.statements(statements),

            NodeKind::ArrayLiteral { values: list }
            | NodeKind::Tuple { elements: list }
            | NodeKind::InlineArray { exprs: list }
            | NodeKind::ArgumentList { args: list, .. }
            | NodeKind::Struct { members: list, .. }
            | NodeKind::Enum { values: list, .. }
            | NodeKind::Event { params: list, .. }
            | NodeKind::Error { params: list, .. }
            | NodeKind::Library { body: list, .. } => self.many(list),

            NodeKind::MemberAccess { expr, .. }
            | NodeKind::NamedArgument { value: expr, .. }
            | NodeKind::PrimitiveCast { expr, .. }
            | NodeKind::ExpressionStatement { expr } => self.one(expr),

            NodeKind::Index { arr, key } => {
                self.one(arr)?;
                self.opt(key)
            }
            NodeKind::RangeIndex { arr, start, end } => {
                self.one(arr)?;
                self.opt(start)?;
                self.opt(end)
            }
            NodeKind::Slice { arr, base, .. } => {
                self.one(arr)?;
                self.opt(base)
            }
            NodeKind::Reclassify { expr, privacy } => {
                self.one(expr)?;
                self.one(privacy)
            }
            NodeKind::Call { func, args, .. } => {
                self.one(func)?;
                self.one(args)
            }
            NodeKind::Require { condition, .. } => self.one(condition),
            NodeKind::Revert { expr, args } | NodeKind::Emit { expr, args } => {
                self.one(expr)?;
                self.one(args)
            }
            NodeKind::VariableDeclarationStatement { decl, expr } => {
                self.one(decl)?;
                self.opt(expr)
            }
            NodeKind::TupleVariableDeclarationStatement { decls, expr } => {
                self.opt_many(decls)?;
                self.one(expr)
            }
            NodeKind::Assignment { lhs, rhs, .. } => {
                self.one(lhs)?;
                self.one(rhs)
            }
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.one(condition)?;
                self.one(then_branch)?;
                self.opt(else_branch)
            }
            NodeKind::While { condition, body } => {
                self.one(condition)?;
                self.one(body)
            }
            NodeKind::DoWhile { body, condition } => {
                self.one(body)?;
                self.one(condition)
            }
            NodeKind::For {
                init,
                condition,
                update,
                body,
            } => {
                self.opt(init)?;
                self.opt(condition)?;
                self.opt(update)?;
                self.one(body)
            }
            NodeKind::Return { expr } => self.opt(expr),
            NodeKind::Try {
                expr,
                returns,
                body,
                catches,
            } => {
                self.one(expr)?;
                self.many(returns)?;
                self.one(body)?;
                self.many(catches)
            }
            NodeKind::CatchClause { params, body, .. } => {
                self.many(params)?;
                self.one(body)
            }
            NodeKind::StateVariableDeclaration {
                expr,
                override_spec,
                ..
            } => {
                self.opt(override_spec)?;
                self.opt(expr)
            }
            NodeKind::Function {
                params,
                modifiers,
                returns,
                body,
                ..
            } => {
                self.many(params)?;
                self.modifiers(modifiers)?;
                self.many(returns)?;
                self.opt(body)
            }
            NodeKind::ModifierInvocation { args, .. }
            | NodeKind::InheritanceSpecifier { args, .. } => self.opt(args),
            NodeKind::ModifierDefinition {
                params,
                overrides,
                body,
                ..
            } => {
                self.many(params)?;
                self.many(overrides)?;
                self.opt(body)
            }
            NodeKind::Contract {
                units,
                extra_head,
                extra_tail,
                ..
            } => {
                self.many(extra_head)?;
                self.many(units)?;
                self.many(extra_tail)
            }
            NodeKind::Interface {
                inheritance, body, ..
            } => {
                self.many(inheritance)?;
                self.many(body)
            }
            NodeKind::SourceUnit {
                units, extra_head, ..
            } => {
                self.many(extra_head)?;
                self.many(units)
            }
        }
    }
}

impl Ast {
    /// Direct children of a node in declaration order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        child_ids(self.kind(id))
    }

    /// All nodes of the subtree rooted at `root`, in pre-order.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut children = self.children(id);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Iterates from `id` (inclusive) up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&n| self.parent(n))
    }

    /// True if `ancestor` is `child` or lies on its parent chain.
    ///
    /// ## Arguments
    /// * `ancestor` - Candidate ancestor
    /// * `child` - Node whose parent chain is walked
    #[must_use]
    pub fn is_parent_of(&self, ancestor: NodeId, child: NodeId) -> bool {
        self.ancestors(child).any(|n| n == ancestor)
    }

    /// Nearest enclosing function definition, not crossing a contract boundary.
    #[must_use]
    pub fn related_function(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .take_while(|&n| !matches!(self.kind(n), NodeKind::Contract { .. }))
            .find(|&n| matches!(self.kind(n), NodeKind::Function { .. }))
    }

    /// Nearest enclosing contract definition, not crossing a source unit.
    #[must_use]
    pub fn related_contract(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .take_while(|&n| !matches!(self.kind(n), NodeKind::SourceUnit { .. }))
            .find(|&n| matches!(self.kind(n), NodeKind::Contract { .. }))
    }

    /// Enclosing source unit.
    #[must_use]
    pub fn related_source_unit(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|&n| matches!(self.kind(n), NodeKind::SourceUnit { .. }))
    }

    /// Nearest enclosing node that is a statement (the node itself included).
    #[must_use]
    pub fn related_statement(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).find(|&n| self.kind(n).is_statement())
    }

    /// True if `id` lies within the left-hand side of its enclosing assignment.
    #[must_use]
    pub fn is_in_assignment_lhs(&self, id: NodeId) -> bool {
        let mut child = id;
        for node in self.ancestors(id).skip(1) {
            match self.kind(node) {
                NodeKind::Assignment { lhs, .. } => return *lhs == child,
                NodeKind::SourceUnit { .. } => return false,
                _ => child = node,
            }
        }
        false
    }

    /// True if the expression is assigned to.
    ///
    /// An expression is an lvalue when it is the left side of an assignment, or the
    /// base of an index or member access, or an element of a tuple, that is itself an
    /// lvalue.
    #[must_use]
    pub fn is_lvalue(&self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        match self.kind(parent) {
            NodeKind::Assignment { lhs, .. } => *lhs == id,
            NodeKind::Index { arr, .. } if *arr == id => self.is_lvalue(parent),
            NodeKind::MemberAccess { expr, .. } if *expr == id => self.is_lvalue(parent),
            NodeKind::Tuple { .. } => self.is_lvalue(parent),
            _ => false,
        }
    }

    /// Negation of [`Ast::is_lvalue`].
    #[must_use]
    pub fn is_rvalue(&self, id: NodeId) -> bool {
        !self.is_lvalue(id)
    }

    /// True if `stmt` is an entry of the statement list `list`, directly or through
    /// nested statement groups.
    #[must_use]
    pub fn list_contains(&self, list: NodeId, stmt: NodeId) -> bool {
        let Some(statements) = self.kind(list).statements() else {
            return false;
        };
        statements
            .iter()
            .any(|&s| s == stmt || self.list_contains(s, stmt))
    }

    /// Applies `f` to every child slot of `id` and stores the results.
    ///
    /// The transform receives the arena and the current child. Children of the
    /// rewritten node are relinked to it.
    ///
    /// ## Arguments
    /// * `id` - Node whose children are rewritten
    /// * `f` - Transform producing a [`Rewrite`] per child
    ///
    /// # Errors
    /// Returns [`Error::InvalidRewrite`] if a slot cannot hold the result, or any error
    /// raised by `f`. The node is left unchanged on error.
    pub fn rewrite_children<F>(&mut self, id: NodeId, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Ast, NodeId) -> Result<Rewrite>,
    {
        let mut kind = self.kind(id).clone();
        Slots {
            ast: self,
            f: &mut f,
            owner: id,
        }
        .visit(&mut kind)?;
        self.set_kind(id, kind);
        Ok(())
    }

    /// Copies the subtree rooted at `root` into fresh nodes.
    ///
    /// Positions are copied; decorations in [`crate::ast::Facts`] are not. The copy is
    /// detached (it has no parent).
    ///
    /// # Errors
    /// Propagates rewrite errors; copying itself never produces one.
    pub fn deep_copy(&mut self, root: NodeId) -> Result<NodeId> {
        let mut kind = self.kind(root).clone();
        let mut copy = |ast: &mut Ast, child: NodeId| -> Result<Rewrite> {
            Ok(Rewrite::Replace(ast.deep_copy(child)?))
        };
        Slots {
            ast: self,
            f: &mut copy,
            owner: root,
        }
        .visit(&mut kind)?;
        let position = self.position(root);
        Ok(self.add_at(kind, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AssignOp, BuiltinOp, NumberLiteral};

    fn ident(ast: &mut Ast, name: &str) -> NodeId {
        ast.add(NodeKind::Identifier { name: name.into() })
    }

    fn assign(ast: &mut Ast, name: &str, value: i64) -> NodeId {
        let lhs = ident(ast, name);
        let rhs = ast.add(NodeKind::NumberLiteral(NumberLiteral::new(value)));
        ast.add(NodeKind::Assignment {
            lhs,
            rhs,
            op: AssignOp::Plain,
        })
    }

    #[test]
    fn test_deep_copy_is_detached() {
        let mut ast = Ast::default();
        let s = assign(&mut ast, "a", 1);
        let block = ast.add(NodeKind::Block {
            statements: vec![s],
            was_single_statement: false,
        });
        let copy = ast.deep_copy(s).unwrap();
        assert_ne!(copy, s);
        assert_eq!(ast.parent(copy), None);
        assert_eq!(ast.parent(s), Some(block));
        assert_eq!(ast.descendants(copy).len(), 3);
        let lhs = ast.children(copy)[0];
        assert_eq!(ast.parent(lhs), Some(copy));
        assert_eq!(ast.kind(lhs), &NodeKind::Identifier { name: "a".into() });
    }

    #[test]
    fn test_children_in_declaration_order() {
        let mut ast = Ast::default();
        let c = ident(&mut ast, "c");
        let t = ast.add(NodeKind::Block {
            statements: vec![],
            was_single_statement: false,
        });
        let e = ast.add(NodeKind::Block {
            statements: vec![],
            was_single_statement: false,
        });
        let stmt = ast.add(NodeKind::If {
            condition: c,
            then_branch: t,
            else_branch: Some(e),
        });
        assert_eq!(ast.children(stmt), vec![c, t, e]);
    }

    #[test]
    fn test_descendants_preorder() {
        let mut ast = Ast::default();
        let s1 = assign(&mut ast, "a", 1);
        let s2 = assign(&mut ast, "b", 2);
        let block = ast.add(NodeKind::Block {
            statements: vec![s1, s2],
            was_single_statement: false,
        });
        let all = ast.descendants(block);
        assert_eq!(all.len(), 7);
        assert_eq!(all[0], block);
        assert_eq!(all[1], s1);
        assert_eq!(all[4], s2);
    }

    #[test]
    fn test_is_parent_of() {
        let mut ast = Ast::default();
        let s = assign(&mut ast, "a", 1);
        let block = ast.add(NodeKind::Block {
            statements: vec![s],
            was_single_statement: false,
        });
        let lhs = ast.children(s)[0];
        assert!(ast.is_parent_of(block, lhs));
        assert!(ast.is_parent_of(lhs, lhs));
        assert!(!ast.is_parent_of(lhs, block));
    }

    #[test]
    fn test_lvalue_classification() {
        let mut ast = Ast::default();
        let m = ident(&mut ast, "m");
        let k = ident(&mut ast, "k");
        let index = ast.add(NodeKind::Index { arr: m, key: Some(k) });
        let one = ast.add(NodeKind::NumberLiteral(NumberLiteral::new(1)));
        let stmt = ast.add(NodeKind::Assignment {
            lhs: index,
            rhs: one,
            op: AssignOp::Plain,
        });

        assert!(ast.is_lvalue(index));
        assert!(ast.is_lvalue(m));
        assert!(!ast.is_lvalue(k));
        assert!(ast.is_rvalue(one));
        assert!(ast.is_in_assignment_lhs(k));
        assert!(!ast.is_in_assignment_lhs(one));
        assert_eq!(ast.related_statement(k), Some(stmt));
    }

    #[test]
    fn test_rewrite_splices_and_drops_statements() {
        let mut ast = Ast::default();
        let s1 = assign(&mut ast, "a", 1);
        let s2 = assign(&mut ast, "b", 2);
        let s3 = assign(&mut ast, "c", 3);
        let block = ast.add(NodeKind::Block {
            statements: vec![s1, s2, s3],
            was_single_statement: false,
        });
        let extra1 = assign(&mut ast, "x", 4);
        let extra2 = assign(&mut ast, "y", 5);

        ast.rewrite_children(block, |_, child| {
            Ok(if child == s1 {
                Rewrite::Splice(vec![extra1, extra2])
            } else if child == s2 {
                Rewrite::Remove
            } else {
                Rewrite::Keep
            })
        })
        .unwrap();

        assert_eq!(ast.children(block), vec![extra1, extra2, s3]);
        assert_eq!(ast.parent(extra1), Some(block));
        assert!(ast.list_contains(block, extra2));
        assert!(!ast.list_contains(block, s2));
    }

    #[test]
    fn test_rewrite_rejects_splice_in_single_slot() {
        let mut ast = Ast::default();
        let s1 = assign(&mut ast, "a", 1);
        let body = ast.add(NodeKind::Block {
            statements: vec![s1],
            was_single_statement: false,
        });
        let cond = ast.add(NodeKind::BooleanLiteral(true));
        let stmt = ast.add(NodeKind::While {
            condition: cond,
            body,
        });
        let before = ast.kind(stmt).clone();

        let result = ast.rewrite_children(stmt, |_, child| {
            Ok(if child == body {
                Rewrite::Splice(vec![])
            } else {
                Rewrite::Keep
            })
        });
        assert!(matches!(result, Err(Error::InvalidRewrite(_))));
        assert_eq!(ast.kind(stmt), &before);

        let result = ast.rewrite_children(stmt, |_, _| Ok(Rewrite::Remove));
        assert!(matches!(result, Err(Error::InvalidRewrite(_))));
    }

    #[test]
    fn test_rewrite_clears_optional_slot() {
        let mut ast = Ast::default();
        let value = ident(&mut ast, "v");
        let ret = ast.add(NodeKind::Return { expr: Some(value) });
        ast.rewrite_children(ret, |_, _| Ok(Rewrite::Remove)).unwrap();
        assert_eq!(ast.kind(ret), &NodeKind::Return { expr: None });
    }

    #[test]
    fn test_rewrite_replace_with_new_node() {
        let mut ast = Ast::default();
        let a = ident(&mut ast, "a");
        let b = ident(&mut ast, "b");
        let plus = ast.add(NodeKind::Builtin(BuiltinOp::Add));
        let args = ast.add(NodeKind::ArgumentList {
            args: vec![a, b],
            named: false,
        });
        let call = ast.add(NodeKind::Call {
            func: plus,
            args,
            call_options: false,
        });

        ast.rewrite_children(args, |ast, child| {
            Ok(if child == b {
                Rewrite::Replace(ast.add(NodeKind::Identifier { name: "z".into() }))
            } else {
                Rewrite::Keep
            })
        })
        .unwrap();

        let replaced = ast.children(args)[1];
        assert_ne!(replaced, b);
        assert_eq!(ast.parent(replaced), Some(args));
        assert_eq!(ast.parent(args), Some(call));
    }

    #[test]
    fn test_related_nodes_in_contract() {
        let mut ast = Ast::default();
        let token = crate::test::token_contract(&mut ast);

        assert_eq!(
            ast.children(token.contract),
            vec![token.owner, token.balances, token.transfer]
        );
        assert_eq!(ast.related_function(token.debit_target), Some(token.transfer));
        assert_eq!(ast.related_contract(token.debit_target), Some(token.contract));
        assert_eq!(ast.related_source_unit(token.debit_target), Some(token.unit));
        assert_eq!(ast.related_statement(token.debit_target), Some(token.debit));
        assert!(ast.is_in_assignment_lhs(token.debit_target));
        assert!(ast.is_lvalue(token.debit_target));
        assert_eq!(ast.related_function(token.owner), None);
        assert!(ast.is_parent_of(token.unit, token.debit));
    }
}
