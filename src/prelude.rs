//! # privir Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the privir library. Import this module to get quick access to the essential
//! types for building, inspecting and rendering trees.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all privir operations
pub use crate::Error;

/// The result type used throughout privir
pub use crate::Result;

/// Configuration consulted while building and rendering
pub use crate::Config;

// ================================================================================================
// Tree
// ================================================================================================

/// Arena, handles and positions
pub use crate::ast::{Ast, Node, NodeId, Position};

/// Node variants and their field types
pub use crate::ast::{
    AssignOp, FunctionKind, FunctionModifier, Keywords, NodeKind, NumberLiteral, StorageLocation,
};

/// Typed construction
pub use crate::ast::AstBuilder;

/// Builtin operators
pub use crate::ast::{BuiltinOp, OpCategory};

/// Pass decorations
pub use crate::ast::{Facts, FunctionInfo, FunctionPrivacy};

/// Rewriting and instance targets
pub use crate::ast::{InstanceTarget, Rewrite, TargetKey};

/// Diagnostics
pub use crate::ast::{code_error_message, WarningKind};

// ================================================================================================
// Types
// ================================================================================================

/// Data types
pub use crate::types::{
    ArrayLength, ArrayType, CombinedType, FunctionType, MappingType, NumericType, TupleType,
    TypeName, UserDefinedType,
};

/// Privacy layer
pub use crate::types::{
    AnnotatedTypeName, CombinedPrivacy, Conformance, LabelKey, PartitionOracle,
    PrivacyAnnotation,
};

// ================================================================================================
// Generation
// ================================================================================================

/// Rendering entry points
pub use crate::codegen::{render, render_with, RenderOptions};

/// Clone-by-reparse protocol
pub use crate::codegen::{clone_subtree, Fragment, FrontEnd, IdentityCache};
