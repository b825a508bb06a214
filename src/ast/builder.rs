//! Typed construction of tree nodes.
//!
//! [`AstBuilder`] is the only entry point a front end needs: one function per
//! production, each taking already built children and returning the new node's
//! handle. Builders enforce the construction-time rules of the language:
//!
//! - identifiers must not use the reserved prefix or suffix of the [`crate::config::Config`]
//! - operator symbols resolve through the closed [`BuiltinOp`] catalog
//! - compound assignments and increments are normalized into a plain assignment whose
//!   right side is the builtin call, tagged with the [`AssignOp`] shorthand
//! - function definitions get their [`crate::ast::FunctionInfo`], including one return
//!   binding per return parameter
//! - literals get their intrinsic literal type recorded in [`crate::ast::Facts`]
//!
//! # Examples
//!
//! ```rust
//! use privir::{ast::{Ast, AstBuilder}, codegen::render, types::AnnotatedTypeName};
//!
//! let mut ast = Ast::default();
//! let mut b = AstBuilder::new(&mut ast);
//! let decl = b.variable_declaration(&[], AnnotatedTypeName::uint_all(), "x", None)?;
//! let one = b.number(1);
//! let two = b.number(2);
//! let sum = b.binary(one, "+", two)?;
//! let stmt = b.var_decl_statement(decl, Some(sum));
//!
//! assert_eq!(render(&ast, stmt)?, "uint x = 1 + 2;");
//! # Ok::<(), privir::Error>(())
//! ```

use num_bigint::BigInt;

use crate::{
    ast::{
        AssignOp, Ast, BuiltinOp, FunctionKind, FunctionModifier, Keywords, NodeId, NodeKind,
        NumberLiteral, OpCategory, Position, StorageLocation,
    },
    types::{AnnotatedTypeName, TypeName},
    Error, Result,
};

/// Builds nodes into an [`Ast`].
pub struct AstBuilder<'a> {
    ast: &'a mut Ast,
    position: Position,
}

impl<'a> AstBuilder<'a> {
    /// Creates a builder adding to `ast`.
    pub fn new(ast: &'a mut Ast) -> Self {
        Self {
            ast,
            position: Position::default(),
        }
    }

    /// Read access to the arena being built.
    #[must_use]
    pub fn ast(&self) -> &Ast {
        self.ast
    }

    /// Sets the source position recorded for subsequently built nodes.
    ///
    /// ## Arguments
    /// * `line` - 1-based line
    /// * `column` - 1-based column
    pub fn at(&mut self, line: i32, column: i32) -> &mut Self {
        self.position = Position::new(line, column);
        self
    }

    fn add(&mut self, kind: NodeKind) -> NodeId {
        self.ast.add_at(kind, self.position)
    }

    fn check_name(&self, name: &str) -> Result<()> {
        match self.ast.config().reserved_reason(name) {
            Some(reason) => Err(Error::ReservedIdentifier {
                name: name.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    fn typed(&mut self, kind: NodeKind, type_name: TypeName) -> NodeId {
        let id = self.add(kind);
        self.ast
            .facts_mut()
            .set_annotated_type(id, AnnotatedTypeName::new(type_name, None));
        id
    }

    // Literals and markers

    /// An identifier expression.
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for reserved names.
    pub fn identifier(&mut self, name: &str) -> Result<NodeId> {
        self.check_name(name)?;
        Ok(self.add(NodeKind::Identifier {
            name: name.to_string(),
        }))
    }

    /// `true` or `false`.
    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.typed(NodeKind::BooleanLiteral(value), TypeName::BooleanLiteral(value))
    }

    /// A decimal number literal.
    pub fn number(&mut self, value: impl Into<BigInt>) -> NodeId {
        self.number_literal(NumberLiteral::new(value))
    }

    /// A hexadecimal number literal, rendered as `0x..`.
    pub fn hex_number(&mut self, value: impl Into<BigInt>) -> NodeId {
        self.number_literal(NumberLiteral {
            was_hex: true,
            ..NumberLiteral::new(value)
        })
    }

    /// A number literal with all source details.
    pub fn number_literal(&mut self, literal: NumberLiteral) -> NodeId {
        let type_name = TypeName::NumberLiteral(literal.value.clone());
        self.typed(NodeKind::NumberLiteral(literal), type_name)
    }

    /// A string literal.
    pub fn string(&mut self, value: &str) -> NodeId {
        self.typed(NodeKind::StringLiteral(value.to_string()), TypeName::String)
    }

    /// `[a, b]` in literal position.
    pub fn array_literal(&mut self, values: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::ArrayLiteral { values })
    }

    /// `(a, b)`
    pub fn tuple(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::Tuple { elements })
    }

    /// `[a, b]` as an inline array expression.
    pub fn inline_array(&mut self, exprs: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::InlineArray { exprs })
    }

    /// The caller-private label.
    pub fn me(&mut self) -> NodeId {
        self.add(NodeKind::Me)
    }

    /// The public label.
    pub fn all(&mut self) -> NodeId {
        self.add(NodeKind::All)
    }

    /// The trusted-execution label.
    pub fn tee(&mut self) -> NodeId {
        self.add(NodeKind::Tee)
    }

    // Locations

    /// `expr.member`
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved member name.
    pub fn member_access(&mut self, expr: NodeId, member: &str) -> Result<NodeId> {
        self.check_name(member)?;
        Ok(self.add(NodeKind::MemberAccess {
            expr,
            member: member.to_string(),
        }))
    }

    /// `arr[key]`, or `arr[]` without a key.
    pub fn index(&mut self, arr: NodeId, key: Option<NodeId>) -> NodeId {
        self.add(NodeKind::Index { arr, key })
    }

    /// `arr[start:end]`
    pub fn range_index(&mut self, arr: NodeId, start: Option<NodeId>, end: Option<NodeId>) -> NodeId {
        self.add(NodeKind::RangeIndex { arr, start, end })
    }

    /// A compiler generated window of `size` elements starting at `base + offset`.
    pub fn slice(&mut self, arr: NodeId, base: Option<NodeId>, offset: u64, size: u64) -> NodeId {
        self.add(NodeKind::Slice {
            arr,
            base,
            offset,
            size,
        })
    }

    // Calls and operators

    /// A positional argument list.
    pub fn arguments(&mut self, args: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::ArgumentList { args, named: false })
    }

    /// A named argument list, `{a: 1, b: 2}`.
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved argument name.
    pub fn named_arguments(&mut self, args: Vec<(&str, NodeId)>) -> Result<NodeId> {
        let mut entries = Vec::with_capacity(args.len());
        for (key, value) in args {
            self.check_name(key)?;
            entries.push(self.add(NodeKind::NamedArgument {
                key: key.to_string(),
                value,
            }));
        }
        Ok(self.add(NodeKind::ArgumentList {
            args: entries,
            named: true,
        }))
    }

    /// `func(args)`
    pub fn call(&mut self, func: NodeId, args: Vec<NodeId>) -> NodeId {
        let args = self.arguments(args);
        self.add(NodeKind::Call {
            func,
            args,
            call_options: false,
        })
    }

    /// `func(args)` with a prebuilt argument list, e.g. a named one.
    pub fn call_with(&mut self, func: NodeId, args: NodeId, call_options: bool) -> NodeId {
        self.add(NodeKind::Call {
            func,
            args,
            call_options,
        })
    }

    /// A call of a builtin operator.
    pub fn builtin_call(&mut self, op: BuiltinOp, args: Vec<NodeId>) -> NodeId {
        let func = self.add(NodeKind::Builtin(op));
        self.call(func, args)
    }

    /// `lhs op rhs`
    ///
    /// # Errors
    /// Returns [`Error::UnknownOperator`] if `symbol` is not a binary operator.
    pub fn binary(&mut self, lhs: NodeId, symbol: &str, rhs: NodeId) -> Result<NodeId> {
        let op = BuiltinOp::from_symbol(symbol)?;
        if op.arity() != 2 {
            return Err(Error::UnknownOperator(symbol.to_string()));
        }
        Ok(self.builtin_call(op, vec![lhs, rhs]))
    }

    /// `op expr`; `+` and `-` denote the unary signs.
    ///
    /// # Errors
    /// Returns [`Error::UnknownOperator`] if `symbol` is not a unary operator.
    pub fn unary(&mut self, symbol: &str, expr: NodeId) -> Result<NodeId> {
        let op = match symbol {
            "+" => BuiltinOp::SignPlus,
            "-" => BuiltinOp::SignMinus,
            other => BuiltinOp::from_symbol(other)?,
        };
        if op.arity() != 1 || op.is_parenthesis() {
            return Err(Error::UnknownOperator(symbol.to_string()));
        }
        Ok(self.builtin_call(op, vec![expr]))
    }

    /// `condition ? then : otherwise`
    pub fn ite(&mut self, condition: NodeId, then: NodeId, otherwise: NodeId) -> NodeId {
        self.builtin_call(BuiltinOp::Ite, vec![condition, then, otherwise])
    }

    /// `(expr)`
    pub fn parenthesized(&mut self, expr: NodeId) -> NodeId {
        self.builtin_call(BuiltinOp::Parenthesis, vec![expr])
    }

    /// `reveal(expr, privacy)`
    pub fn reclassify(&mut self, expr: NodeId, privacy: NodeId) -> NodeId {
        self.add(NodeKind::Reclassify { expr, privacy })
    }

    /// `T(expr)`
    pub fn cast(&mut self, elem_type: TypeName, expr: NodeId) -> NodeId {
        self.add(NodeKind::PrimitiveCast {
            elem_type,
            expr,
            implicit: false,
        })
    }

    /// A conversion inserted by the compiler; renders as its operand.
    pub fn implicit_cast(&mut self, elem_type: TypeName, expr: NodeId) -> NodeId {
        self.add(NodeKind::PrimitiveCast {
            elem_type,
            expr,
            implicit: true,
        })
    }

    /// `new T`
    pub fn new_expr(&mut self, type_name: TypeName) -> NodeId {
        self.add(NodeKind::New(type_name))
    }

    /// `type(T)`
    pub fn meta_type(&mut self, type_name: TypeName) -> NodeId {
        self.add(NodeKind::MetaType(type_name))
    }

    /// An elementary type name in expression position.
    pub fn type_expr(&mut self, type_name: TypeName) -> NodeId {
        self.add(NodeKind::TypeExpr(type_name))
    }

    // Statements

    /// `expr;`
    pub fn expression_statement(&mut self, expr: NodeId) -> NodeId {
        self.add(NodeKind::ExpressionStatement { expr })
    }

    /// `require(condition[, comment]);`
    pub fn require(&mut self, condition: NodeId, comment: Option<&str>) -> NodeId {
        self.add(NodeKind::Require {
            condition,
            comment: comment.map(str::to_string),
        })
    }

    /// `revert expr(args);`
    pub fn revert(&mut self, expr: NodeId, args: Vec<NodeId>) -> NodeId {
        let args = self.arguments(args);
        self.add(NodeKind::Revert { expr, args })
    }

    /// `emit expr(args);`
    pub fn emit(&mut self, expr: NodeId, args: Vec<NodeId>) -> NodeId {
        let args = self.arguments(args);
        self.add(NodeKind::Emit { expr, args })
    }

    /// `decl [= expr];`
    pub fn var_decl_statement(&mut self, decl: NodeId, expr: Option<NodeId>) -> NodeId {
        self.add(NodeKind::VariableDeclarationStatement { decl, expr })
    }

    /// `(a, , b) = expr;`
    pub fn tuple_var_decl_statement(&mut self, decls: Vec<Option<NodeId>>, expr: NodeId) -> NodeId {
        self.add(NodeKind::TupleVariableDeclarationStatement { decls, expr })
    }

    /// `lhs = rhs;`
    pub fn assignment(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.add(NodeKind::Assignment {
            lhs,
            rhs,
            op: AssignOp::Plain,
        })
    }

    /// `lhs op= rhs;`, normalized to `lhs = op(lhs, rhs)`.
    ///
    /// The right side receives a structural copy of `lhs`.
    ///
    /// ## Arguments
    /// * `lhs` - Assigned location
    /// * `symbol` - The operator without `=`, e.g. `+` for `+=`
    /// * `rhs` - Right operand
    ///
    /// # Errors
    /// Returns [`Error::UnknownOperator`] if `symbol` has no compound form.
    pub fn compound_assignment(&mut self, lhs: NodeId, symbol: &str, rhs: NodeId) -> Result<NodeId> {
        let op = BuiltinOp::from_symbol(symbol)?;
        let compoundable = matches!(
            op.category(),
            OpCategory::Arithmetic | OpCategory::Bitwise | OpCategory::Shift
        ) && op.arity() == 2
            && op != BuiltinOp::Pow;
        if !compoundable {
            return Err(Error::UnknownOperator(format!("{symbol}=")));
        }
        self.normalized(lhs, rhs, op, AssignOp::Compound(op))
    }

    /// `++lhs;`
    ///
    /// # Errors
    /// Propagates failures to copy `lhs`.
    pub fn pre_increment(&mut self, lhs: NodeId) -> Result<NodeId> {
        self.increment(lhs, AssignOp::PreIncrement)
    }

    /// `--lhs;`
    ///
    /// # Errors
    /// Propagates failures to copy `lhs`.
    pub fn pre_decrement(&mut self, lhs: NodeId) -> Result<NodeId> {
        self.increment(lhs, AssignOp::PreDecrement)
    }

    /// `lhs++;`
    ///
    /// # Errors
    /// Propagates failures to copy `lhs`.
    pub fn post_increment(&mut self, lhs: NodeId) -> Result<NodeId> {
        self.increment(lhs, AssignOp::PostIncrement)
    }

    /// `lhs--;`
    ///
    /// # Errors
    /// Propagates failures to copy `lhs`.
    pub fn post_decrement(&mut self, lhs: NodeId) -> Result<NodeId> {
        self.increment(lhs, AssignOp::PostDecrement)
    }

    fn increment(&mut self, lhs: NodeId, op: AssignOp) -> Result<NodeId> {
        let Some(builtin) = op.builtin() else {
            return Err(internal_error!("{op:?} is not an increment form"));
        };
        let one = self.number(1);
        self.normalized(lhs, one, builtin, op)
    }

    fn normalized(&mut self, lhs: NodeId, rhs: NodeId, builtin: BuiltinOp, op: AssignOp) -> Result<NodeId> {
        let operand = self.ast.deep_copy(lhs)?;
        let rhs = self.builtin_call(builtin, vec![operand, rhs]);
        Ok(self.add(NodeKind::Assignment { lhs, rhs, op }))
    }

    /// `if (condition) then_branch [else else_branch]`
    pub fn if_stmt(&mut self, condition: NodeId, then_branch: NodeId, else_branch: Option<NodeId>) -> NodeId {
        self.add(NodeKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// `while (condition) body`
    pub fn while_loop(&mut self, condition: NodeId, body: NodeId) -> NodeId {
        self.add(NodeKind::While { condition, body })
    }

    /// `do body while (condition);`
    pub fn do_while(&mut self, body: NodeId, condition: NodeId) -> NodeId {
        self.add(NodeKind::DoWhile { body, condition })
    }

    /// `for (init; condition; update) body`
    pub fn for_loop(
        &mut self,
        init: Option<NodeId>,
        condition: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.add(NodeKind::For {
            init,
            condition,
            update,
            body,
        })
    }

    /// `break;`
    pub fn break_stmt(&mut self) -> NodeId {
        self.add(NodeKind::Break)
    }

    /// `continue;`
    pub fn continue_stmt(&mut self) -> NodeId {
        self.add(NodeKind::Continue)
    }

    /// `return [expr];`
    pub fn return_stmt(&mut self, expr: Option<NodeId>) -> NodeId {
        self.add(NodeKind::Return { expr })
    }

    /// `try expr [returns (..)] body catches`
    pub fn try_stmt(&mut self, expr: NodeId, returns: Vec<NodeId>, body: NodeId, catches: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::Try {
            expr,
            returns,
            body,
            catches,
        })
    }

    /// `catch [name][(params)] body`
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn catch_clause(&mut self, name: Option<&str>, params: Vec<NodeId>, body: NodeId) -> Result<NodeId> {
        if let Some(name) = name {
            self.check_name(name)?;
        }
        Ok(self.add(NodeKind::CatchClause {
            name: name.map(str::to_string),
            params,
            body,
        }))
    }

    /// Inline assembly captured as text.
    pub fn assembly(&mut self, text: &str) -> NodeId {
        self.add(NodeKind::Assembly {
            text: text.to_string(),
        })
    }

    /// `{ statements }`
    pub fn block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::Block {
            statements,
            was_single_statement: false,
        })
    }

    /// A block around a statement that was written without braces.
    pub fn single_statement_block(&mut self, statement: NodeId) -> NodeId {
        self.add(NodeKind::Block {
            statements: vec![statement],
            was_single_statement: true,
        })
    }

    /// Generated statements printed indented, without braces.
    pub fn indent_block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::IndentBlock { statements })
    }

    /// Generated statements printed in place.
    pub fn statement_list(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::StatementList { statements })
    }

    /// A line comment, or a block comment for multi-line text.
    pub fn comment(&mut self, text: &str) -> NodeId {
        self.add(NodeKind::Comment {
            text: text.to_string(),
        })
    }

    /// An empty line.
    pub fn blank_line(&mut self) -> NodeId {
        self.comment("")
    }

    /// `statements` headed by a comment and followed by an empty line.
    ///
    /// An empty `statements` list yields no nodes.
    pub fn comment_list(&mut self, text: &str, statements: Vec<NodeId>) -> Vec<NodeId> {
        if statements.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(statements.len() + 2);
        out.push(self.comment(text));
        out.extend(statements);
        out.push(self.blank_line());
        out
    }

    /// `statements` headed by a comment and wrapped in commented braces:
    ///
    /// ```text
    /// // text
    /// // {
    ///     statements
    /// // }
    /// ```
    pub fn wrap_block(&mut self, text: &str, statements: Vec<NodeId>) -> Vec<NodeId> {
        let header = self.comment(text);
        let open = self.comment("{");
        let body = self.indent_block(statements);
        let close = self.comment("}");
        let blank = self.blank_line();
        vec![header, open, body, close, blank]
    }

    // Declarations

    /// A local variable or struct member declaration.
    ///
    /// # Errors
    /// Returns [`Error::UnknownKeyword`] or [`Error::ReservedIdentifier`].
    pub fn variable_declaration(
        &mut self,
        keywords: &[&str],
        annotated_type: AnnotatedTypeName,
        name: &str,
        storage: Option<StorageLocation>,
    ) -> Result<NodeId> {
        let keywords = Keywords::from_keywords(keywords.iter().copied())?;
        self.check_name(name)?;
        Ok(self.add(NodeKind::VariableDeclaration {
            keywords,
            annotated_type,
            name: name.to_string(),
            storage,
        }))
    }

    /// A function, modifier or catch parameter.
    ///
    /// # Errors
    /// Returns [`Error::UnknownKeyword`] or [`Error::ReservedIdentifier`].
    pub fn parameter(
        &mut self,
        keywords: &[&str],
        annotated_type: AnnotatedTypeName,
        name: Option<&str>,
        storage: Option<StorageLocation>,
    ) -> Result<NodeId> {
        let keywords = Keywords::from_keywords(keywords.iter().copied())?;
        if let Some(name) = name {
            self.check_name(name)?;
        }
        Ok(self.add(NodeKind::Parameter {
            keywords,
            annotated_type,
            name: name.map(str::to_string),
            storage,
        }))
    }

    /// A contract-level variable.
    ///
    /// # Errors
    /// Returns [`Error::UnknownKeyword`] or [`Error::ReservedIdentifier`].
    pub fn state_variable(
        &mut self,
        keywords: &[&str],
        annotated_type: AnnotatedTypeName,
        name: &str,
        expr: Option<NodeId>,
        override_spec: Option<NodeId>,
    ) -> Result<NodeId> {
        let keywords = Keywords::from_keywords(keywords.iter().copied())?;
        self.check_name(name)?;
        Ok(self.add(NodeKind::StateVariableDeclaration {
            annotated_type,
            keywords,
            name: name.to_string(),
            expr,
            override_spec,
        }))
    }

    /// An event parameter.
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn event_parameter(
        &mut self,
        annotated_type: AnnotatedTypeName,
        indexed: bool,
        name: Option<&str>,
    ) -> Result<NodeId> {
        if let Some(name) = name {
            self.check_name(name)?;
        }
        Ok(self.add(NodeKind::EventParameter {
            annotated_type,
            indexed,
            name: name.map(str::to_string),
        }))
    }

    /// An error parameter.
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn error_parameter(&mut self, annotated_type: AnnotatedTypeName, name: Option<&str>) -> Result<NodeId> {
        if let Some(name) = name {
            self.check_name(name)?;
        }
        Ok(self.add(NodeKind::ErrorParameter {
            annotated_type,
            name: name.map(str::to_string),
        }))
    }

    /// A value of an enum definition.
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn enum_value(&mut self, name: &str) -> Result<NodeId> {
        self.check_name(name)?;
        Ok(self.add(NodeKind::EnumValue {
            name: name.to_string(),
        }))
    }

    // Definitions

    /// A function-like definition.
    ///
    /// Registers the function's [`crate::ast::FunctionInfo`]: its synthesized function
    /// type and one return binding per return parameter. The bindings take the
    /// function as parent without being listed among its children.
    ///
    /// ## Arguments
    /// * `kind` - Function, constructor, fallback or receive
    /// * `name` - Function name; ignored for kinds other than [`FunctionKind::Function`]
    /// * `params` - [`NodeKind::Parameter`] nodes
    /// * `modifiers` - Keywords and modifier nodes in source order
    /// * `returns` - Return [`NodeKind::Parameter`] nodes
    /// * `body` - Body block, absent for declarations
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved function name.
    pub fn function(
        &mut self,
        kind: FunctionKind,
        name: &str,
        params: Vec<NodeId>,
        modifiers: Vec<FunctionModifier>,
        returns: Vec<NodeId>,
        body: Option<NodeId>,
    ) -> Result<NodeId> {
        let name = if kind == FunctionKind::Function {
            self.check_name(name)?;
            name.to_string()
        } else {
            String::new()
        };

        let function = self.add(NodeKind::Function {
            name,
            params,
            modifiers,
            returns: returns.clone(),
            body,
            kind,
        });

        let mut bindings = Vec::with_capacity(returns.len());
        for (index, &ret) in returns.iter().enumerate() {
            let (annotated_type, storage) = match self.ast.kind(ret) {
                NodeKind::Parameter {
                    annotated_type,
                    storage,
                    ..
                } => (annotated_type.clone(), *storage),
                other => {
                    return Err(internal_error!(
                        "return list entry {ret} is not a parameter: {other:?}"
                    ))
                }
            };
            let name = self.ast.config().return_var_name(false, index);
            let binding = self.add(NodeKind::VariableDeclaration {
                keywords: Keywords::empty(),
                annotated_type,
                name,
                storage,
            });
            self.ast.link(binding, function);
            bindings.push(binding);
        }

        self.ast.facts_mut().function_mut(function).return_var_decls = bindings;
        self.ast.refresh_function_type(function);
        Ok(function)
    }

    /// `path(args)` in a modifier list.
    pub fn modifier_invocation(&mut self, path: &[&str], args: Option<Vec<NodeId>>) -> NodeId {
        let args = args.map(|args| self.arguments(args));
        self.add(NodeKind::ModifierInvocation {
            path: path.iter().map(|s| (*s).to_string()).collect(),
            args,
        })
    }

    /// `override` or `override(A, B.C)`.
    pub fn override_specifier(&mut self, paths: &[&[&str]]) -> NodeId {
        self.add(NodeKind::OverrideSpecifier {
            paths: paths
                .iter()
                .map(|p| p.iter().map(|s| (*s).to_string()).collect())
                .collect(),
        })
    }

    /// `modifier name(params) [virtual] [overrides] body`
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn modifier_definition(
        &mut self,
        name: &str,
        params: Vec<NodeId>,
        is_virtual: bool,
        overrides: Vec<NodeId>,
        body: Option<NodeId>,
    ) -> Result<NodeId> {
        self.check_name(name)?;
        Ok(self.add(NodeKind::ModifierDefinition {
            name: name.to_string(),
            params,
            is_virtual,
            overrides,
            body,
        }))
    }

    /// `struct name { members }`
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn struct_def(&mut self, name: &str, members: Vec<NodeId>) -> Result<NodeId> {
        self.check_name(name)?;
        Ok(self.add(NodeKind::Struct {
            name: name.to_string(),
            members,
        }))
    }

    /// `enum name { values }`
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn enum_def(&mut self, name: &str, values: Vec<NodeId>) -> Result<NodeId> {
        self.check_name(name)?;
        Ok(self.add(NodeKind::Enum {
            name: name.to_string(),
            values,
        }))
    }

    /// `type name is underlying;`
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn user_defined_value_type(&mut self, name: &str, underlying: TypeName) -> Result<NodeId> {
        self.check_name(name)?;
        Ok(self.add(NodeKind::UserDefinedValueType {
            name: name.to_string(),
            underlying,
        }))
    }

    /// `event name(params) [anonymous];`
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn event(&mut self, name: &str, params: Vec<NodeId>, anonymous: bool) -> Result<NodeId> {
        self.check_name(name)?;
        Ok(self.add(NodeKind::Event {
            name: name.to_string(),
            params,
            anonymous,
        }))
    }

    /// `error name(params);`
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn error_def(&mut self, name: &str, params: Vec<NodeId>) -> Result<NodeId> {
        self.check_name(name)?;
        Ok(self.add(NodeKind::Error {
            name: name.to_string(),
            params,
        }))
    }

    /// `using path for type_name;`, `*` when no type is given.
    pub fn using_directive(&mut self, path: &[&str], type_name: Option<TypeName>) -> NodeId {
        self.add(NodeKind::UsingDirective {
            path: path.iter().map(|s| (*s).to_string()).collect(),
            type_name,
        })
    }

    /// `contract name { units }`
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn contract(&mut self, name: &str, units: Vec<NodeId>) -> Result<NodeId> {
        self.check_name(name)?;
        Ok(self.add(NodeKind::Contract {
            name: name.to_string(),
            units,
            extra_head: Vec::new(),
            extra_tail: Vec::new(),
        }))
    }

    /// `interface name is inheritance { body }`
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn interface(&mut self, name: &str, inheritance: Vec<NodeId>, body: Vec<NodeId>) -> Result<NodeId> {
        self.check_name(name)?;
        Ok(self.add(NodeKind::Interface {
            name: name.to_string(),
            inheritance,
            body,
        }))
    }

    /// `library name { body }`
    ///
    /// # Errors
    /// Returns [`Error::ReservedIdentifier`] for a reserved name.
    pub fn library(&mut self, name: &str, body: Vec<NodeId>) -> Result<NodeId> {
        self.check_name(name)?;
        Ok(self.add(NodeKind::Library {
            name: name.to_string(),
            body,
        }))
    }

    /// `Base(args)` in an inheritance list.
    pub fn inheritance_specifier(&mut self, path: &[&str], args: Option<Vec<NodeId>>) -> NodeId {
        let args = args.map(|args| self.arguments(args));
        self.add(NodeKind::InheritanceSpecifier {
            path: path.iter().map(|s| (*s).to_string()).collect(),
            args,
        })
    }

    /// `pragma name version;`
    pub fn pragma(&mut self, name: &str, version: &str) -> NodeId {
        self.add(NodeKind::Pragma {
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    /// `import "path" [as alias];`
    pub fn import(&mut self, path: &str, unit_alias: Option<&str>) -> NodeId {
        self.add(NodeKind::Import {
            path: path.to_string(),
            unit_alias: unit_alias.map(str::to_string),
            aliases: Vec::new(),
        })
    }

    /// `import {a as b, c} from "path";`
    pub fn import_symbols(&mut self, path: &str, aliases: &[(&str, Option<&str>)]) -> NodeId {
        self.add(NodeKind::Import {
            path: path.to_string(),
            unit_alias: None,
            aliases: aliases
                .iter()
                .map(|(symbol, alias)| ((*symbol).to_string(), alias.map(str::to_string)))
                .collect(),
        })
    }

    /// Root of a source file; `code` is kept line by line for diagnostics.
    pub fn source_unit(&mut self, units: Vec<NodeId>, code: &str) -> NodeId {
        self.add(NodeKind::SourceUnit {
            units,
            extra_head: Vec::new(),
            original_code: code.lines().map(str::to_string).collect(),
        })
    }
}
