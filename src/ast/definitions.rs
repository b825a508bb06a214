//! Queries and updates on function, contract and source-unit definitions.
//!
//! Function predicates are derived from the bare keywords in the modifier list.
//! Contract views list members of one kind in source order, generated head and tail
//! members excluded.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    ast::{
        Ast, FunctionKind, FunctionModifier, FunctionPrivacy, Keywords, NodeId, NodeKind,
        StorageLocation,
    },
    types::{AnnotatedTypeName, FunctionType, TupleType},
    Error, Result,
};

impl Ast {
    fn function_parts(&self, function: NodeId) -> Result<(&[NodeId], &[FunctionModifier], &[NodeId])> {
        match self.kind(function) {
            NodeKind::Function {
                params,
                modifiers,
                returns,
                ..
            } => Ok((params, modifiers, returns)),
            other => Err(internal_error!("{function} is not a function: {other:?}")),
        }
    }

    fn contract_units(&self, contract: NodeId) -> &[NodeId] {
        match self.kind(contract) {
            NodeKind::Contract { units, .. } => units,
            _ => &[],
        }
    }

    /// Bare modifier keywords of a function in source order; empty for other nodes.
    #[must_use]
    pub fn function_keywords(&self, function: NodeId) -> Vec<&str> {
        let NodeKind::Function { modifiers, .. } = self.kind(function) else {
            return Vec::new();
        };
        modifiers
            .iter()
            .filter_map(|m| match m {
                FunctionModifier::Keyword(k) => Some(k.as_str()),
                FunctionModifier::Node(_) => None,
            })
            .collect()
    }

    fn has_keyword(&self, function: NodeId, keyword: &str) -> bool {
        self.function_keywords(function).contains(&keyword)
    }

    /// True unless the function is declared `pure` or `view`.
    #[must_use]
    pub fn has_side_effects(&self, function: NodeId) -> bool {
        !(self.has_keyword(function, "pure") || self.has_keyword(function, "view"))
    }

    /// True unless the function is declared `private` or `internal`.
    #[must_use]
    pub fn can_be_external(&self, function: NodeId) -> bool {
        !(self.has_keyword(function, "private") || self.has_keyword(function, "internal"))
    }

    /// True if the function is declared `external`.
    #[must_use]
    pub fn is_external(&self, function: NodeId) -> bool {
        self.has_keyword(function, "external")
    }

    /// True if the function is declared `payable`.
    #[must_use]
    pub fn is_payable(&self, function: NodeId) -> bool {
        self.has_keyword(function, "payable")
    }

    /// True for constructor definitions.
    #[must_use]
    pub fn is_constructor(&self, function: NodeId) -> bool {
        matches!(
            self.kind(function),
            NodeKind::Function {
                kind: FunctionKind::Constructor,
                ..
            }
        )
    }

    /// Declared types of a function's parameters.
    ///
    /// # Errors
    /// Returns [`Error::Internal`] if `function` is not a function definition.
    pub fn parameter_types(&self, function: NodeId) -> Result<Vec<AnnotatedTypeName>> {
        let (params, _, _) = self.function_parts(function)?;
        Ok(self.declared_types(params))
    }

    /// Declared types of a function's return parameters, as a tuple.
    ///
    /// # Errors
    /// Returns [`Error::Internal`] if `function` is not a function definition.
    pub fn return_type(&self, function: NodeId) -> Result<TupleType> {
        let (_, _, returns) = self.function_parts(function)?;
        Ok(TupleType::new(self.declared_types(returns)))
    }

    fn declared_types(&self, decls: &[NodeId]) -> Vec<AnnotatedTypeName> {
        decls
            .iter()
            .filter_map(|&d| self.kind(d).declared_type().cloned())
            .collect()
    }

    /// Recomputes the synthesized function type from the parameter, keyword and
    /// return lists.
    pub fn refresh_function_type(&mut self, function: NodeId) {
        let Ok((params, _, returns)) = self.function_parts(function) else {
            return;
        };
        let fn_type = FunctionType {
            parameters: self.declared_types(params),
            modifiers: self
                .function_keywords(function)
                .into_iter()
                .map(str::to_string)
                .collect(),
            returns: self.declared_types(returns),
        };
        self.facts_mut().function_mut(function).fn_type = fn_type;
    }

    /// Appends a compiler generated parameter to a function.
    ///
    /// Primitive types take no storage location; all others take `storage`. The
    /// synthesized function type is refreshed. Reserved names are allowed here, since
    /// generated parameters use them.
    ///
    /// ## Arguments
    /// * `function` - The function definition
    /// * `annotated_type` - Parameter type
    /// * `name` - Parameter name
    /// * `storage` - Location for non-primitive types, usually `memory`
    ///
    /// # Errors
    /// Returns [`Error::Internal`] if `function` is not a function definition.
    pub fn add_param(
        &mut self,
        function: NodeId,
        annotated_type: AnnotatedTypeName,
        name: &str,
        storage: StorageLocation,
    ) -> Result<NodeId> {
        let mut kind = self.kind(function).clone();
        let NodeKind::Function { params, .. } = &mut kind else {
            return Err(internal_error!("{function} is not a function"));
        };
        let storage = (!annotated_type.type_name.is_primitive_type()).then_some(storage);
        let param = self.add(NodeKind::Parameter {
            keywords: Keywords::empty(),
            annotated_type,
            name: Some(name.to_string()),
            storage,
        });
        params.push(param);
        self.set_kind(function, kind);
        self.refresh_function_type(function);
        Ok(param)
    }

    /// Replaces a parameter's storage location `from` by `to` in place.
    ///
    /// Returns false, leaving the parameter untouched, if its storage location is
    /// not `from`.
    ///
    /// # Errors
    /// Returns [`Error::Internal`] if `param` is not a parameter.
    pub fn set_param_storage(
        &mut self,
        param: NodeId,
        from: Option<StorageLocation>,
        to: Option<StorageLocation>,
    ) -> Result<bool> {
        let NodeKind::Parameter { storage, .. } = self.kind_mut(param) else {
            return Err(internal_error!("{param} is not a parameter"));
        };
        if *storage != from {
            return Ok(false);
        }
        *storage = to;
        Ok(true)
    }

    /// Copies a parameter, replacing the copy's storage location `from` by `to`.
    ///
    /// Parameters with another storage location are copied unchanged.
    ///
    /// # Errors
    /// Returns [`Error::Internal`] if `param` is not a parameter.
    pub fn param_with_storage(
        &mut self,
        param: NodeId,
        from: Option<StorageLocation>,
        to: Option<StorageLocation>,
    ) -> Result<NodeId> {
        if !matches!(self.kind(param), NodeKind::Parameter { .. }) {
            return Err(internal_error!("{param} is not a parameter"));
        }
        let copy = self.deep_copy(param)?;
        self.set_param_storage(copy, from, to)?;
        Ok(copy)
    }

    /// Sets a function's privacy classification and renames its return bindings to
    /// match it.
    pub fn set_function_privacy(&mut self, function: NodeId, privacy: FunctionPrivacy) {
        let info = self.facts_mut().function_mut(function);
        info.privacy = privacy;
        let zkp = info.is_zkp();
        let bindings = info.return_var_decls.clone();
        for (index, binding) in bindings.into_iter().enumerate() {
            let new_name = self.config().return_var_name(zkp, index);
            if let NodeKind::VariableDeclaration { name, .. } = self.kind_mut(binding) {
                *name = new_name;
            }
        }
    }

    /// Plain function definitions of a contract.
    ///
    /// Constructors, `fallback` and `receive` are not included.
    #[must_use]
    pub fn contract_functions(&self, contract: NodeId) -> Vec<NodeId> {
        self.contract_units(contract)
            .iter()
            .copied()
            .filter(|&u| {
                matches!(
                    self.kind(u),
                    NodeKind::Function {
                        kind: FunctionKind::Function,
                        ..
                    }
                )
            })
            .collect()
    }

    /// Declared constructors of a contract.
    #[must_use]
    pub fn contract_constructors(&self, contract: NodeId) -> Vec<NodeId> {
        self.contract_units(contract)
            .iter()
            .copied()
            .filter(|&u| self.is_constructor(u))
            .collect()
    }

    /// State variable declarations of a contract.
    #[must_use]
    pub fn state_variables(&self, contract: NodeId) -> Vec<NodeId> {
        self.contract_units(contract)
            .iter()
            .copied()
            .filter(|&u| matches!(self.kind(u), NodeKind::StateVariableDeclaration { .. }))
            .collect()
    }

    /// Struct definitions of a contract.
    #[must_use]
    pub fn contract_structs(&self, contract: NodeId) -> Vec<NodeId> {
        self.contract_units(contract)
            .iter()
            .copied()
            .filter(|&u| matches!(self.kind(u), NodeKind::Struct { .. }))
            .collect()
    }

    /// Enum definitions of a contract.
    #[must_use]
    pub fn contract_enums(&self, contract: NodeId) -> Vec<NodeId> {
        self.contract_units(contract)
            .iter()
            .copied()
            .filter(|&u| matches!(self.kind(u), NodeKind::Enum { .. }))
            .collect()
    }

    /// Declared types of a contract's state variables, by name.
    #[must_use]
    pub fn state_variable_types(&self, contract: NodeId) -> FxHashMap<String, AnnotatedTypeName> {
        self.state_variables(contract)
            .into_iter()
            .filter_map(|decl| match self.kind(decl) {
                NodeKind::StateVariableDeclaration {
                    name,
                    annotated_type,
                    ..
                } => Some((name.clone(), annotated_type.clone())),
                _ => None,
            })
            .collect()
    }

    /// The contract's constructor.
    ///
    /// A contract without a declared constructor gets an implicit empty one. The
    /// implicit constructor takes the contract as parent but is not added to its
    /// members. It is synthesized once; later calls return the same node.
    ///
    /// # Errors
    /// Returns [`Error::MultipleConstructors`] if more than one is declared.
    pub fn constructor(&mut self, contract: NodeId) -> Result<NodeId> {
        let declared = self.contract_constructors(contract);
        match declared.as_slice() {
            [] => {
                if let Some(ctor) = self.facts().implicit_constructor(contract) {
                    return Ok(ctor);
                }
                let body = self.add(NodeKind::Block {
                    statements: Vec::new(),
                    was_single_statement: false,
                });
                let ctor = self.add(NodeKind::Function {
                    name: String::new(),
                    params: Vec::new(),
                    modifiers: vec![FunctionModifier::Keyword("public".to_string())],
                    returns: Vec::new(),
                    body: Some(body),
                    kind: FunctionKind::Constructor,
                });
                self.link(ctor, contract);
                self.refresh_function_type(ctor);
                self.facts_mut().set_implicit_constructor(contract, ctor);
                debug!(contract = %contract, constructor = %ctor, "synthesized implicit constructor");
                Ok(ctor)
            }
            [single] => Ok(*single),
            _ => {
                let name = self.kind(contract).name().unwrap_or_default().to_string();
                Err(Error::MultipleConstructors(name))
            }
        }
    }

    /// Looks up a contract member by name; `constructor` resolves through
    /// [`Ast::constructor`].
    ///
    /// # Errors
    /// Returns [`Error::MultipleConstructors`] when looking up an overloaded constructor.
    pub fn contract_member(&mut self, contract: NodeId, name: &str) -> Result<Option<NodeId>> {
        if name == "constructor" {
            return self.constructor(contract).map(Some);
        }
        Ok(self
            .contract_units(contract)
            .iter()
            .copied()
            .find(|&u| self.kind(u).name() == Some(name)))
    }

    /// Contracts defined in a source unit.
    #[must_use]
    pub fn source_unit_contracts(&self, unit: NodeId) -> Vec<NodeId> {
        let NodeKind::SourceUnit { units, .. } = self.kind(unit) else {
            return Vec::new();
        };
        units
            .iter()
            .copied()
            .filter(|&u| matches!(self.kind(u), NodeKind::Contract { .. }))
            .collect()
    }

    /// Original source lines of a source unit.
    #[must_use]
    pub fn original_code(&self, unit: NodeId) -> &[String] {
        match self.kind(unit) {
            NodeKind::SourceUnit { original_code, .. } => original_code,
            _ => &[],
        }
    }
}
