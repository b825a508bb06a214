//! The closed set of node variants.
//!
//! Each variant declares exactly its substantive fields. Child nodes are referenced by
//! [`NodeId`]; types, names and keywords are stored inline as values. Children are
//! enumerated, rewritten and rendered by exhaustive matches over [`NodeKind`].

use bitflags::bitflags;
use num_bigint::BigInt;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{
    ast::{ops::BuiltinOp, NodeId},
    types::{AnnotatedTypeName, TypeName},
    Error, Result,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Declaration keywords
    pub struct Keywords: u16 {
        /// Value is assigned exactly once
        const FINAL = 0x0001;
        /// Compile-time constant
        const CONSTANT = 0x0002;
        /// Assigned once during construction
        const IMMUTABLE = 0x0004;
        /// Externally readable state variable
        const PUBLIC = 0x0008;
        /// Visible to derived contracts
        const INTERNAL = 0x0010;
        /// Visible to the declaring contract only
        const PRIVATE = 0x0020;
    }
}

impl Keywords {
    /// Parses a single keyword.
    ///
    /// ## Arguments
    /// * `keyword` - The keyword as written in source
    ///
    /// # Errors
    /// Returns [`Error::UnknownKeyword`] for keywords outside the supported set.
    pub fn from_keyword(keyword: &str) -> Result<Self> {
        match keyword {
            "final" => Ok(Keywords::FINAL),
            "constant" => Ok(Keywords::CONSTANT),
            "immutable" => Ok(Keywords::IMMUTABLE),
            "public" => Ok(Keywords::PUBLIC),
            "internal" => Ok(Keywords::INTERNAL),
            "private" => Ok(Keywords::PRIVATE),
            other => Err(Error::UnknownKeyword(other.to_string())),
        }
    }

    /// Parses a keyword list, merging all entries.
    ///
    /// # Errors
    /// Returns [`Error::UnknownKeyword`] for the first unsupported keyword.
    pub fn from_keywords<'a>(keywords: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        keywords
            .into_iter()
            .try_fold(Keywords::empty(), |acc, k| Keywords::from_keyword(k).map(|flag| acc | flag))
    }

    /// Source spellings in canonical order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        const ORDER: [(Keywords, &str); 6] = [
            (Keywords::FINAL, "final"),
            (Keywords::CONSTANT, "constant"),
            (Keywords::IMMUTABLE, "immutable"),
            (Keywords::PUBLIC, "public"),
            (Keywords::INTERNAL, "internal"),
            (Keywords::PRIVATE, "private"),
        ];
        ORDER
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

/// Data location of a reference-typed declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum StorageLocation {
    /// `memory`
    Memory,
    /// `storage`
    Storage,
    /// `calldata`
    Calldata,
}

/// Kind of a function-like definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FunctionKind {
    /// A named function
    Function,
    /// The contract constructor
    Constructor,
    /// The fallback function
    Fallback,
    /// The plain-transfer receive function
    Receive,
}

/// Entry of a function's modifier list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionModifier {
    /// Bare keyword such as `public`, `view` or `payable`
    Keyword(String),
    /// A modifier invocation or override specifier node
    Node(NodeId),
}

/// Assignment operator marker.
///
/// Compound and increment forms are normalized into a plain assignment whose right
/// side is the corresponding builtin call; the marker lets the generator print the
/// shorthand again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `a = b`
    Plain,
    /// `a op= b`
    Compound(BuiltinOp),
    /// `++a`
    PreIncrement,
    /// `--a`
    PreDecrement,
    /// `a++`
    PostIncrement,
    /// `a--`
    PostDecrement,
}

impl AssignOp {
    /// The operator text printed by the generator.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            AssignOp::Plain => "",
            AssignOp::Compound(op) => op.symbol(),
            AssignOp::PreIncrement | AssignOp::PostIncrement => "++",
            AssignOp::PreDecrement | AssignOp::PostDecrement => "--",
        }
    }

    /// The builtin the desugared right side applies, if any.
    #[must_use]
    pub fn builtin(&self) -> Option<BuiltinOp> {
        match self {
            AssignOp::Plain => None,
            AssignOp::Compound(op) => Some(*op),
            AssignOp::PreIncrement | AssignOp::PostIncrement => Some(BuiltinOp::Add),
            AssignOp::PreDecrement | AssignOp::PostDecrement => Some(BuiltinOp::Sub),
        }
    }
}

/// A number literal as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLiteral {
    /// Literal value; the unit is not applied
    pub value: BigInt,
    /// Whether the literal was written in hexadecimal
    pub was_hex: bool,
    /// Verbatim source text, printed in preference to the value
    pub source_text: Option<String>,
    /// Denomination suffix (`ether`, `days`, ...)
    pub unit: Option<String>,
}

impl NumberLiteral {
    /// A decimal literal with no source text.
    #[must_use]
    pub fn new(value: impl Into<BigInt>) -> Self {
        Self {
            value: value.into(),
            was_hex: false,
            source_text: None,
            unit: None,
        }
    }
}

/// A tree node's variant and fields.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Expressions
    /// `true` / `false`
    BooleanLiteral(bool),
    /// `42`, `0x2a`, `1 ether`
    NumberLiteral(NumberLiteral),
    /// `'text'`
    StringLiteral(String),
    /// `[a, b]` in literal position
    ArrayLiteral {
        /// Elements
        values: Vec<NodeId>,
    },
    /// `(a, b)`
    Tuple {
        /// Elements
        elements: Vec<NodeId>,
    },
    /// `[a, b]` as an inline array expression
    InlineArray {
        /// Elements
        exprs: Vec<NodeId>,
    },
    /// A name used as an expression
    Identifier {
        /// The name
        name: String,
    },
    /// `expr.member`
    MemberAccess {
        /// Accessed expression
        expr: NodeId,
        /// Member name
        member: String,
    },
    /// `arr[key]`; the key may be absent in type positions (`uint[]`)
    Index {
        /// Indexed expression
        arr: NodeId,
        /// Key expression
        key: Option<NodeId>,
    },
    /// `arr[start:end]`
    RangeIndex {
        /// Indexed expression
        arr: NodeId,
        /// Start bound
        start: Option<NodeId>,
        /// End bound
        end: Option<NodeId>,
    },
    /// Fixed-size window `arr[base + offset .. base + offset + size]`, compiler generated
    Slice {
        /// Indexed expression
        arr: NodeId,
        /// Dynamic base added to every element index
        base: Option<NodeId>,
        /// First element offset
        offset: u64,
        /// Number of elements
        size: u64,
    },
    /// `me`
    Me,
    /// `all`
    All,
    /// `tee`
    Tee,
    /// `reveal(expr, privacy)`
    Reclassify {
        /// Reclassified expression
        expr: NodeId,
        /// Target label expression
        privacy: NodeId,
    },
    /// A builtin operator in callee position
    Builtin(BuiltinOp),
    /// `func(args)` or `func{options}`
    Call {
        /// Callee
        func: NodeId,
        /// An [`NodeKind::ArgumentList`]
        args: NodeId,
        /// The arguments are call options (`f{value: 1}`)
        call_options: bool,
    },
    /// Call arguments
    ArgumentList {
        /// Positional expressions or [`NodeKind::NamedArgument`]s
        args: Vec<NodeId>,
        /// Printed in braces (`{a: 1}`)
        named: bool,
    },
    /// `key: value`
    NamedArgument {
        /// Argument name
        key: String,
        /// Argument value
        value: NodeId,
    },
    /// `type(T)`
    MetaType(TypeName),
    /// `new T`
    New(TypeName),
    /// `T(expr)`; implicit casts print as their operand
    PrimitiveCast {
        /// Target type
        elem_type: TypeName,
        /// Converted expression
        expr: NodeId,
        /// Inserted by the compiler rather than written
        implicit: bool,
    },
    /// An elementary type name in expression position, e.g. the callee of `uint8(x)`
    TypeExpr(TypeName),

    // Statements
    /// `expr;`
    ExpressionStatement {
        /// The expression
        expr: NodeId,
    },
    /// `require(condition[, comment]);`
    Require {
        /// Checked condition
        condition: NodeId,
        /// Message expression, printed verbatim
        comment: Option<String>,
    },
    /// `revert expr(args);`
    Revert {
        /// Error expression
        expr: NodeId,
        /// An [`NodeKind::ArgumentList`]
        args: NodeId,
    },
    /// `emit expr(args);`
    Emit {
        /// Event expression
        expr: NodeId,
        /// An [`NodeKind::ArgumentList`]
        args: NodeId,
    },
    /// `T x [= expr];`
    VariableDeclarationStatement {
        /// A [`NodeKind::VariableDeclaration`]
        decl: NodeId,
        /// Initializer
        expr: Option<NodeId>,
    },
    /// `(T a, , T b) = expr;`
    TupleVariableDeclarationStatement {
        /// Declarations; `None` marks a skipped component
        decls: Vec<Option<NodeId>>,
        /// Initializer
        expr: NodeId,
    },
    /// `lhs = rhs;` and its compound and increment forms
    Assignment {
        /// Assigned location or tuple
        lhs: NodeId,
        /// Assigned value; a builtin call for normalized forms
        rhs: NodeId,
        /// Shorthand marker
        op: AssignOp,
    },
    /// `if (c) T [else E]`
    If {
        /// Condition
        condition: NodeId,
        /// Then branch
        then_branch: NodeId,
        /// Else branch
        else_branch: Option<NodeId>,
    },
    /// `while (c) B`
    While {
        /// Condition
        condition: NodeId,
        /// Body
        body: NodeId,
    },
    /// `do B while (c);`
    DoWhile {
        /// Body
        body: NodeId,
        /// Condition
        condition: NodeId,
    },
    /// `for (init; c; update) B`
    For {
        /// Initializer statement
        init: Option<NodeId>,
        /// Loop condition
        condition: Option<NodeId>,
        /// Update statement
        update: Option<NodeId>,
        /// Body
        body: NodeId,
    },
    /// `break;`
    Break,
    /// `continue;`
    Continue,
    /// `return [expr];`
    Return {
        /// Returned value
        expr: Option<NodeId>,
    },
    /// `try expr returns (...) { } catch ...`
    Try {
        /// Guarded external call
        expr: NodeId,
        /// Return parameters
        returns: Vec<NodeId>,
        /// Success block
        body: NodeId,
        /// [`NodeKind::CatchClause`]s
        catches: Vec<NodeId>,
    },
    /// `catch [name](params) { }`
    CatchClause {
        /// Error selector name
        name: Option<String>,
        /// Parameters
        params: Vec<NodeId>,
        /// Handler block
        body: NodeId,
    },
    /// Inline assembly, kept as captured source text
    Assembly {
        /// The captured text
        text: String,
    },
    /// `{ ... }`; `was_single_statement` marks an unbraced single statement in source
    Block {
        /// Statements
        statements: Vec<NodeId>,
        /// Printed without braces when it still holds exactly one statement
        was_single_statement: bool,
    },
    /// Indented group of generated statements, printed without braces
    IndentBlock {
        /// Statements
        statements: Vec<NodeId>,
    },
    /// Unindented group of generated statements
    StatementList {
        /// Statements
        statements: Vec<NodeId>,
    },
    /// `// text`, `/* text */`, or a blank line when empty
    Comment {
        /// Comment text
        text: String,
    },

    // Declarations
    /// Local variable or struct member
    VariableDeclaration {
        /// Keywords
        keywords: Keywords,
        /// Declared type
        annotated_type: AnnotatedTypeName,
        /// Variable name
        name: String,
        /// Data location
        storage: Option<StorageLocation>,
    },
    /// Function, modifier, catch or try-return parameter
    Parameter {
        /// Keywords
        keywords: Keywords,
        /// Declared type
        annotated_type: AnnotatedTypeName,
        /// Parameter name, absent for unnamed parameters
        name: Option<String>,
        /// Data location
        storage: Option<StorageLocation>,
    },
    /// Contract-level variable
    StateVariableDeclaration {
        /// Declared type
        annotated_type: AnnotatedTypeName,
        /// Keywords
        keywords: Keywords,
        /// Variable name
        name: String,
        /// Initializer
        expr: Option<NodeId>,
        /// An [`NodeKind::OverrideSpecifier`]
        override_spec: Option<NodeId>,
    },
    /// Event parameter
    EventParameter {
        /// Declared type
        annotated_type: AnnotatedTypeName,
        /// Indexed for log filtering
        indexed: bool,
        /// Parameter name
        name: Option<String>,
    },
    /// Error parameter
    ErrorParameter {
        /// Declared type
        annotated_type: AnnotatedTypeName,
        /// Parameter name
        name: Option<String>,
    },
    /// A member of an enum definition
    EnumValue {
        /// Value name
        name: String,
    },

    // Definitions
    /// Function, constructor, fallback or receive definition
    Function {
        /// Function name; empty for constructors
        name: String,
        /// [`NodeKind::Parameter`]s
        params: Vec<NodeId>,
        /// Keywords mixed with modifier invocations and override specifiers
        modifiers: Vec<FunctionModifier>,
        /// Return [`NodeKind::Parameter`]s
        returns: Vec<NodeId>,
        /// Body block; absent for declarations
        body: Option<NodeId>,
        /// Function kind
        kind: FunctionKind,
    },
    /// `path(args)` in a modifier list
    ModifierInvocation {
        /// Qualified modifier name
        path: Vec<String>,
        /// An [`NodeKind::ArgumentList`]
        args: Option<NodeId>,
    },
    /// `override` or `override(A, B.C)`
    OverrideSpecifier {
        /// Qualified base names
        paths: Vec<Vec<String>>,
    },
    /// `modifier name(params) [virtual] [override] { }`
    ModifierDefinition {
        /// Modifier name
        name: String,
        /// [`NodeKind::Parameter`]s
        params: Vec<NodeId>,
        /// Declared `virtual`
        is_virtual: bool,
        /// [`NodeKind::OverrideSpecifier`]s
        overrides: Vec<NodeId>,
        /// Body block
        body: Option<NodeId>,
    },
    /// `struct Name { members }`
    Struct {
        /// Struct name
        name: String,
        /// [`NodeKind::VariableDeclaration`]s
        members: Vec<NodeId>,
    },
    /// `enum Name { values }`
    Enum {
        /// Enum name
        name: String,
        /// [`NodeKind::EnumValue`]s
        values: Vec<NodeId>,
    },
    /// `type Name is T;`
    UserDefinedValueType {
        /// Type name
        name: String,
        /// Elementary underlying type
        underlying: TypeName,
    },
    /// `event Name(params) [anonymous];`
    Event {
        /// Event name
        name: String,
        /// [`NodeKind::EventParameter`]s
        params: Vec<NodeId>,
        /// Declared `anonymous`
        anonymous: bool,
    },
    /// `error Name(params);`
    Error {
        /// Error name
        name: String,
        /// [`NodeKind::ErrorParameter`]s
        params: Vec<NodeId>,
    },
    /// `using Lib for T;`
    UsingDirective {
        /// Qualified library name
        path: Vec<String>,
        /// Bound type; `*` when absent
        type_name: Option<TypeName>,
    },
    /// `contract Name { ... }`
    Contract {
        /// Contract name
        name: String,
        /// Members in source order
        units: Vec<NodeId>,
        /// Generated members printed before `units`
        extra_head: Vec<NodeId>,
        /// Generated members printed after `units`
        extra_tail: Vec<NodeId>,
    },
    /// `interface Name is A, B { ... }`
    Interface {
        /// Interface name
        name: String,
        /// [`NodeKind::InheritanceSpecifier`]s
        inheritance: Vec<NodeId>,
        /// Members
        body: Vec<NodeId>,
    },
    /// `library Name { ... }`
    Library {
        /// Library name
        name: String,
        /// Members
        body: Vec<NodeId>,
    },
    /// `Base(args)` in an inheritance list
    InheritanceSpecifier {
        /// Qualified base name
        path: Vec<String>,
        /// An [`NodeKind::ArgumentList`]
        args: Option<NodeId>,
    },
    /// `pragma name version;`
    Pragma {
        /// Pragma name
        name: String,
        /// Version expression
        version: String,
    },
    /// `import "path" [as alias];` or `import {a as b} from "path";`
    Import {
        /// Imported path
        path: String,
        /// Alias for the whole unit
        unit_alias: Option<String>,
        /// Imported symbols with optional aliases
        aliases: Vec<(String, Option<String>)>,
    },
    /// Root of a source file
    SourceUnit {
        /// Top-level members
        units: Vec<NodeId>,
        /// Generated members printed before `units`
        extra_head: Vec<NodeId>,
        /// Original source split into lines, for diagnostics
        original_code: Vec<String>,
    },
}

impl NodeKind {
    /// True for expression variants.
    #[must_use]
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
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
                | NodeKind::MetaType(_)
                | NodeKind::New(_)
                | NodeKind::PrimitiveCast { .. }
                | NodeKind::TypeExpr(_)
        )
    }

    /// True for statement variants, including statement groups and comments.
    #[must_use]
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
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
                | NodeKind::Assembly { .. }
                | NodeKind::Block { .. }
                | NodeKind::IndentBlock { .. }
                | NodeKind::StatementList { .. }
                | NodeKind::Comment { .. }
        )
    }

    /// True for location expressions: identifiers, member accesses and index forms.
    #[must_use]
    pub fn is_location(&self) -> bool {
        matches!(
            self,
            NodeKind::Identifier { .. }
                | NodeKind::MemberAccess { .. }
                | NodeKind::Index { .. }
                | NodeKind::RangeIndex { .. }
                | NodeKind::Slice { .. }
        )
    }

    /// True for declarations that can be the target of a location expression.
    #[must_use]
    pub fn is_variable_declaration(&self) -> bool {
        matches!(
            self,
            NodeKind::VariableDeclaration { .. }
                | NodeKind::Parameter { .. }
                | NodeKind::StateVariableDeclaration { .. }
        )
    }

    /// The statement list of a block-like node.
    #[must_use]
    pub fn statements(&self) -> Option<&[NodeId]> {
        match self {
            NodeKind::Block { statements, .. }
            | NodeKind::IndentBlock { statements }
            | NodeKind::StatementList { statements } => Some(statements),
            _ => None,
        }
    }

    /// Declared name of a named declaration or definition.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::VariableDeclaration { name, .. }
            | NodeKind::StateVariableDeclaration { name, .. }
            | NodeKind::EnumValue { name }
            | NodeKind::Function { name, .. }
            | NodeKind::ModifierDefinition { name, .. }
            | NodeKind::Struct { name, .. }
            | NodeKind::Enum { name, .. }
            | NodeKind::UserDefinedValueType { name, .. }
            | NodeKind::Event { name, .. }
            | NodeKind::Error { name, .. }
            | NodeKind::Contract { name, .. }
            | NodeKind::Interface { name, .. }
            | NodeKind::Library { name, .. }
            | NodeKind::Identifier { name } => Some(name),
            NodeKind::Parameter { name, .. }
            | NodeKind::EventParameter { name, .. }
            | NodeKind::ErrorParameter { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    /// Declared type of a declaration.
    #[must_use]
    pub fn declared_type(&self) -> Option<&AnnotatedTypeName> {
        match self {
            NodeKind::VariableDeclaration { annotated_type, .. }
            | NodeKind::Parameter { annotated_type, .. }
            | NodeKind::StateVariableDeclaration { annotated_type, .. }
            | NodeKind::EventParameter { annotated_type, .. }
            | NodeKind::ErrorParameter { annotated_type, .. } => Some(annotated_type),
            _ => None,
        }
    }

    /// Keywords of a variable-like declaration.
    #[must_use]
    pub fn keywords(&self) -> Option<Keywords> {
        match self {
            NodeKind::VariableDeclaration { keywords, .. }
            | NodeKind::Parameter { keywords, .. }
            | NodeKind::StateVariableDeclaration { keywords, .. } => Some(*keywords),
            _ => None,
        }
    }

    /// True if the declaration carries the `final` keyword.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.keywords().is_some_and(|k| k.contains(Keywords::FINAL))
    }

    /// True if the declaration carries the `constant` keyword.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.keywords().is_some_and(|k| k.contains(Keywords::CONSTANT))
    }
}
