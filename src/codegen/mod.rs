//! Source generation from the tree.
//!
//! The generator is a total function from nodes to text: one rule per [`NodeKind`]
//! variant, selected by an exhaustive match. Output is reproduced exactly, since it is
//! parsed again when subtrees are cloned (see [`clone`]).
//!
//! Two switches in [`RenderOptions`] select the dialect:
//!
//! | Switch | Effect |
//! |---|---|
//! | `backend` | privacy annotations, mapping key labels and `final` are dropped; `me` renders as the platform caller builtin; `reveal(e, p)` renders as `e`; pragmas render the backend version |
//! | `display_final` | `final` keywords are printed; always off under `backend` |
//!
//! Statements print their pre-statements (see [`crate::ast::Facts::pre_statements`])
//! first, one per line.
//!
//! # Examples
//!
//! ```rust
//! use privir::{ast::{Ast, AstBuilder}, codegen::{render_with, RenderOptions}};
//!
//! let mut ast = Ast::default();
//! let mut b = AstBuilder::new(&mut ast);
//! let secret = b.identifier("secret")?;
//! let all = b.all();
//! let revealed = b.reclassify(secret, all);
//!
//! assert_eq!(render_with(&ast, revealed, RenderOptions::default())?, "reveal(secret, all)");
//! assert_eq!(render_with(&ast, revealed, RenderOptions::backend())?, "secret");
//! # Ok::<(), privir::Error>(())
//! ```

pub mod clone;
mod definitions;
mod expressions;
mod statements;
mod types;

pub use clone::{clone_subtree, Fragment, FrontEnd, IdentityCache};

use crate::{
    ast::{Ast, NodeId, NodeKind},
    types::{AnnotatedTypeName, TypeName},
    Result,
};

/// Output dialect switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit code for the target platform instead of annotated source
    pub backend: bool,
    /// Print `final` keywords; ignored under `backend`
    pub display_final: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            backend: false,
            display_final: true,
        }
    }
}

impl RenderOptions {
    /// Options for backend output.
    #[must_use]
    pub fn backend() -> Self {
        Self {
            backend: true,
            display_final: false,
        }
    }

    fn normalized(self) -> Self {
        Self {
            backend: self.backend,
            display_final: self.display_final && !self.backend,
        }
    }
}

/// Renders a node as annotated source.
///
/// # Errors
/// Returns [`crate::Error::Internal`] for nodes without a standalone rendering: a bare
/// builtin callee, or a slice outside a slice-to-slice assignment.
pub fn render(ast: &Ast, id: NodeId) -> Result<String> {
    render_with(ast, id, RenderOptions::default())
}

/// Renders a node in the dialect selected by `options`.
///
/// # Errors
/// See [`render`].
pub fn render_with(ast: &Ast, id: NodeId, options: RenderOptions) -> Result<String> {
    Renderer::new(ast, options).node(id)
}

/// Renders a type as annotated source.
#[must_use]
pub fn render_type(ast: &Ast, type_name: &TypeName, options: RenderOptions) -> String {
    Renderer::new(ast, options).type_name(type_name)
}

/// Renders an annotated type; the label is printed only if it was written.
#[must_use]
pub fn render_annotated_type(ast: &Ast, t: &AnnotatedTypeName, options: RenderOptions) -> String {
    Renderer::new(ast, options).annotated_type(t)
}

/// Prefixes every non-blank line of `text` with `indentation`.
#[must_use]
pub fn indent(text: &str, indentation: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{indentation}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) struct Renderer<'a> {
    ast: &'a Ast,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(ast: &'a Ast, options: RenderOptions) -> Self {
        Self {
            ast,
            options: options.normalized(),
        }
    }

    fn indent(&self, text: &str) -> String {
        indent(text, &self.ast.config().indentation)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<String> {
        let body = self.kind(id)?;
        let pre = self.ast.facts().pre_statements(id);
        if pre.is_empty() {
            return Ok(body);
        }
        let mut parts = self.list(pre)?;
        parts.push(body);
        Ok(parts.join("\n"))
    }

    fn list(&self, ids: &[NodeId]) -> Result<Vec<String>> {
        ids.iter().map(|&id| self.node(id)).collect()
    }

    fn join(&self, ids: &[NodeId], sep: &str) -> Result<String> {
        Ok(self.list(ids)?.join(sep))
    }

    fn opt(&self, id: Option<NodeId>) -> Result<String> {
        id.map_or_else(|| Ok(String::new()), |id| self.node(id))
    }

    fn kind(&self, id: NodeId) -> Result<String> {
        let kind = self.ast.kind(id);
        match kind {
            NodeKind::BooleanLiteral(_)
            | NodeKind::NumberLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::ArrayLiteral { .. }
            | NodeKind::Tuple { .. }
            | NodeKind::InlineArray { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::MemberAccess { .. }
            | NodeKind::Index { .. }
            | NodeKind::RangeIndex { .. }
            | NodeKind::Slice { .. }
            | NodeKind::Me
            | NodeKind::All
            | NodeKind::Tee
            | NodeKind::Reclassify { .. }
            | NodeKind::Builtin(_)
            | NodeKind::Call { .. }
            | NodeKind::ArgumentList { .. }
            | NodeKind::NamedArgument { .. }
            | NodeKind::MetaType(_)
            | NodeKind::New(_)
            | NodeKind::PrimitiveCast { .. }
            | NodeKind::TypeExpr(_) => self.expression(id, kind),

            NodeKind::ExpressionStatement { .. }
            | NodeKind::Require { .. }
            | NodeKind::Revert { .. }
            | NodeKind::Emit { .. }
            | NodeKind::VariableDeclarationStatement { .. }
            | NodeKind::TupleVariableDeclarationStatement { .. }
            | NodeKind::Assignment { .. }
            | NodeKind::If { .. }
            | NodeKind::While { .. }
            | NodeKind::DoWhile { .. }
            | NodeKind::For { .. }
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Return { .. }
            | NodeKind::Try { .. }
            | NodeKind::CatchClause { .. }
            | NodeKind::Assembly { .. }
            | NodeKind::Block { .. }
            | NodeKind::IndentBlock { .. }
            | NodeKind::StatementList { .. }
            | NodeKind::Comment { .. } => self.statement(kind),

            NodeKind::VariableDeclaration { .. }
            | NodeKind::Parameter { .. }
            | NodeKind::StateVariableDeclaration { .. }
            | NodeKind::EventParameter { .. }
            | NodeKind::ErrorParameter { .. }
            | NodeKind::EnumValue { .. }
            | NodeKind::Function { .. }
            | NodeKind::ModifierInvocation { .. }
            | NodeKind::OverrideSpecifier { .. }
            | NodeKind::ModifierDefinition { .. }
            | NodeKind::Struct { .. }
            | NodeKind::Enum { .. }
            | NodeKind::UserDefinedValueType { .. }
            | NodeKind::Event { .. }
            | NodeKind::Error { .. }
            | NodeKind::UsingDirective { .. }
            | NodeKind::Contract { .. }
            | NodeKind::Interface { .. }
            | NodeKind::Library { .. }
            | NodeKind::InheritanceSpecifier { .. }
            | NodeKind::Pragma { .. }
            | NodeKind::Import { .. }
            | NodeKind::SourceUnit { .. } => self.definition(kind),
        }
    }
}
