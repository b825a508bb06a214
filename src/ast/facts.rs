//! Side tables for decorations computed by compiler passes.
//!
//! Passes never write into nodes. Each decoration lives in its own table keyed by
//! [`NodeId`], and each table has a clear operation so that a pass can be re-run
//! from a clean slate.

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use strum::{Display, EnumIter};

use crate::{
    ast::{InstanceTarget, NodeId},
    types::{AnnotatedTypeName, FunctionType, PartitionOracle},
};

/// Privacy classification of a function.
///
/// Functions start out public; the checker raises the classification when the body
/// needs verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum FunctionPrivacy {
    /// Plain public execution
    #[default]
    Public,
    /// Verified by a zero-knowledge proof
    Zkp,
    /// Computed by multi-party computation
    Mpc,
    /// Executed inside a trusted execution environment
    Tee,
}

/// Metadata the compiler attaches to a function definition.
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    /// Callees in first-call order
    pub called_functions: Vec<NodeId>,
    /// Part of a call cycle
    pub is_recursive: bool,
    /// Control flow does not depend on private values
    pub has_static_body: bool,
    /// No construct forbids running this function privately
    pub can_be_private: bool,
    /// Privacy classification
    pub privacy: FunctionPrivacy,
    /// One synthesized return binding per return parameter
    pub return_var_decls: Vec<NodeId>,
    /// Synthesized function type, kept in sync with the parameter list
    pub fn_type: FunctionType,
}

impl Default for FunctionInfo {
    fn default() -> Self {
        Self {
            called_functions: Vec::new(),
            is_recursive: false,
            has_static_body: true,
            can_be_private: true,
            privacy: FunctionPrivacy::Public,
            return_var_decls: Vec::new(),
            fn_type: FunctionType::default(),
        }
    }
}

impl FunctionInfo {
    /// Records a call edge; repeated callees keep their first position.
    pub fn add_callee(&mut self, callee: NodeId) {
        if !self.called_functions.contains(&callee) {
            self.called_functions.push(callee);
        }
    }

    /// True if the function needs a zero-knowledge proof.
    #[must_use]
    pub fn requires_verification(&self) -> bool {
        self.privacy == FunctionPrivacy::Zkp
    }

    /// Raises the classification to [`FunctionPrivacy::Zkp`] when `required`.
    ///
    /// Clearing the requirement leaves the classification untouched.
    pub fn set_requires_verification(&mut self, required: bool) {
        if required {
            self.privacy = FunctionPrivacy::Zkp;
        }
    }

    /// Public classification.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.privacy == FunctionPrivacy::Public
    }

    /// Zero-knowledge classification.
    #[must_use]
    pub fn is_zkp(&self) -> bool {
        self.privacy == FunctionPrivacy::Zkp
    }

    /// Trusted-execution classification.
    #[must_use]
    pub fn is_tee(&self) -> bool {
        self.privacy == FunctionPrivacy::Tee
    }
}

/// Decoration tables of an [`crate::ast::Ast`].
#[derive(Default)]
pub struct Facts {
    annotated_types: FxHashMap<NodeId, AnnotatedTypeName>,
    targets: FxHashMap<NodeId, NodeId>,
    modified: FxHashMap<NodeId, Vec<InstanceTarget>>,
    read: FxHashMap<NodeId, FxHashSet<InstanceTarget>>,
    before_analysis: FxHashMap<NodeId, Rc<dyn PartitionOracle>>,
    after_analysis: FxHashMap<NodeId, Rc<dyn PartitionOracle>>,
    pre_statements: FxHashMap<NodeId, Vec<NodeId>>,
    functions: FxHashMap<NodeId, FunctionInfo>,
    implicit_constructors: FxHashMap<NodeId, NodeId>,
}

impl std::fmt::Debug for Facts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Facts")
            .field("annotated_types", &self.annotated_types.len())
            .field("targets", &self.targets.len())
            .field("modified", &self.modified.len())
            .field("read", &self.read.len())
            .field("before_analysis", &self.before_analysis.len())
            .field("after_analysis", &self.after_analysis.len())
            .field("pre_statements", &self.pre_statements.len())
            .field("functions", &self.functions.len())
            .field("implicit_constructors", &self.implicit_constructors.len())
            .finish()
    }
}

impl Facts {
    /// Type of an expression, as assigned by the checker.
    #[must_use]
    pub fn annotated_type(&self, expr: NodeId) -> Option<&AnnotatedTypeName> {
        self.annotated_types.get(&expr)
    }

    /// Sets the type of an expression.
    pub fn set_annotated_type(&mut self, expr: NodeId, t: AnnotatedTypeName) {
        self.annotated_types.insert(expr, t);
    }

    /// Forgets all expression types.
    pub fn clear_annotated_types(&mut self) {
        self.annotated_types.clear();
    }

    /// Declaration or definition a location expression resolves to.
    #[must_use]
    pub fn target(&self, expr: NodeId) -> Option<NodeId> {
        self.targets.get(&expr).copied()
    }

    /// Records the resolution of a location expression.
    pub fn set_target(&mut self, expr: NodeId, target: NodeId) {
        self.targets.insert(expr, target);
    }

    /// Forgets all resolutions.
    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    /// Locations written by a node, in first-write order.
    #[must_use]
    pub fn modified_values(&self, node: NodeId) -> &[InstanceTarget] {
        self.modified.get(&node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Adds a written location; returns false if it was already recorded.
    pub fn add_modified(&mut self, node: NodeId, target: InstanceTarget) -> bool {
        let entry = self.modified.entry(node).or_default();
        if entry.contains(&target) {
            false
        } else {
            entry.push(target);
            true
        }
    }

    /// Locations read by a node.
    #[must_use]
    pub fn read_values(&self, node: NodeId) -> Option<&FxHashSet<InstanceTarget>> {
        self.read.get(&node)
    }

    /// Adds a read location; returns false if it was already recorded.
    pub fn add_read(&mut self, node: NodeId, target: InstanceTarget) -> bool {
        self.read.entry(node).or_default().insert(target)
    }

    /// Forgets all read and write sets.
    pub fn clear_dataflow(&mut self) {
        self.modified.clear();
        self.read.clear();
    }

    /// Co-ownership facts holding before a statement executes.
    #[must_use]
    pub fn before_analysis(&self, stmt: NodeId) -> Option<&dyn PartitionOracle> {
        self.before_analysis.get(&stmt).map(|oracle| &**oracle)
    }

    /// Co-ownership facts holding after a statement executes.
    #[must_use]
    pub fn after_analysis(&self, stmt: NodeId) -> Option<&dyn PartitionOracle> {
        self.after_analysis.get(&stmt).map(|oracle| &**oracle)
    }

    /// Stores the analysis snapshots of a statement.
    pub fn set_analysis(
        &mut self,
        stmt: NodeId,
        before: Rc<dyn PartitionOracle>,
        after: Rc<dyn PartitionOracle>,
    ) {
        self.before_analysis.insert(stmt, before);
        self.after_analysis.insert(stmt, after);
    }

    /// Forgets all analysis snapshots.
    pub fn clear_analysis(&mut self) {
        self.before_analysis.clear();
        self.after_analysis.clear();
    }

    /// Statements a lowering pass placed before `stmt`.
    #[must_use]
    pub fn pre_statements(&self, stmt: NodeId) -> &[NodeId] {
        self.pre_statements.get(&stmt).map(Vec::as_slice).unwrap_or_default()
    }

    /// Appends a statement to emit before `stmt`.
    pub fn push_pre_statement(&mut self, stmt: NodeId, pre: NodeId) {
        self.pre_statements.entry(stmt).or_default().push(pre);
    }

    /// Removes and returns the pre-statements of `stmt`.
    pub fn take_pre_statements(&mut self, stmt: NodeId) -> Vec<NodeId> {
        self.pre_statements.remove(&stmt).unwrap_or_default()
    }

    /// Metadata of a function definition.
    #[must_use]
    pub fn function(&self, function: NodeId) -> Option<&FunctionInfo> {
        self.functions.get(&function)
    }

    /// Mutable metadata of a function definition, created on first access.
    pub fn function_mut(&mut self, function: NodeId) -> &mut FunctionInfo {
        self.functions.entry(function).or_default()
    }

    /// Constructor synthesized for a contract that declares none.
    #[must_use]
    pub fn implicit_constructor(&self, contract: NodeId) -> Option<NodeId> {
        self.implicit_constructors.get(&contract).copied()
    }

    /// Records the constructor synthesized for `contract`.
    pub fn set_implicit_constructor(&mut self, contract: NodeId, constructor: NodeId) {
        self.implicit_constructors.insert(contract, constructor);
    }

    /// Forgets all per-statement and per-expression decorations.
    ///
    /// Function metadata and implicit constructors created at construction time are
    /// kept.
    pub fn clear_pass_results(&mut self) {
        self.clear_annotated_types();
        self.clear_targets();
        self.clear_dataflow();
        self.clear_analysis();
        self.pre_statements.clear();
    }
}
