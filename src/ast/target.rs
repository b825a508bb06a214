//! Instance targets and resolution of location expressions.
//!
//! An [`InstanceTarget`] identifies an assignable location independently of the
//! expression node that mentions it, and keys the read and write sets of the
//! dataflow analysis:
//!
//! | Expression | Declaration | Key | Index |
//! |---|---|---|---|
//! | `x` | `x` | none | none |
//! | `x.m` | `x` | member `m` | none |
//! | `x[k]`, `x[j][k]` | `x` | key expression `k` | the index expression |
//!
//! Index expressions on the same declaration are told apart only by their key
//! expression node and the index node itself; no symbolic range analysis happens.

use crate::{
    ast::{Ast, NodeId, NodeKind},
    types::{AnnotatedTypeName, Conformance, LabelKey, PrivacyAnnotation, TypeName},
    Error, Result,
};

/// Second component of an [`InstanceTarget`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetKey {
    /// The whole declaration
    None,
    /// A member of a struct-typed declaration
    Member(String),
    /// An entry of a mapping or array, selected by this key expression
    Expr(NodeId),
}

/// Canonical identity of an assignable location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceTarget {
    /// The variable, parameter or state variable holding the location
    pub declaration: NodeId,
    /// Member or key within the declaration
    pub key: TargetKey,
    /// The full index expression for indexed locations
    pub index: Option<NodeId>,
}

impl InstanceTarget {
    /// Target for a whole declaration.
    ///
    /// ## Arguments
    /// * `ast` - The arena holding `decl`
    /// * `decl` - A variable, parameter or state variable declaration
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedLocation`] if `decl` is not a variable-like declaration.
    pub fn from_declaration(ast: &Ast, decl: NodeId) -> Result<Self> {
        check_declaration(ast, decl)?;
        Ok(Self {
            declaration: decl,
            key: TargetKey::None,
            index: None,
        })
    }

    /// Canonicalizes a location expression.
    ///
    /// Identifiers and member accesses must be resolved (see
    /// [`crate::ast::Facts::set_target`]); index expressions resolve through their
    /// left-most identifier.
    ///
    /// ## Arguments
    /// * `ast` - The arena holding `expr`
    /// * `expr` - An identifier, member access on an identifier, or index expression
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedLocation`] for any other expression shape and for
    /// unresolved identifiers.
    pub fn from_expr(ast: &Ast, expr: NodeId) -> Result<Self> {
        match ast.kind(expr) {
            NodeKind::Identifier { .. } => Self::from_declaration(ast, resolved(ast, expr)?),
            NodeKind::MemberAccess { expr: base, member } => {
                if !matches!(ast.kind(*base), NodeKind::Identifier { .. }) {
                    return Err(unsupported(ast, expr));
                }
                let declaration = resolved(ast, *base)?;
                check_declaration(ast, declaration)?;
                Ok(Self {
                    declaration,
                    key: TargetKey::Member(member.clone()),
                    index: None,
                })
            }
            NodeKind::Index { key, .. } => {
                let base = ast
                    .leftmost_identifier(expr)
                    .ok_or_else(|| unsupported(ast, expr))?;
                let declaration = resolved(ast, base)?;
                check_declaration(ast, declaration)?;
                Ok(Self {
                    declaration,
                    key: key.map_or(TargetKey::None, TargetKey::Expr),
                    index: Some(expr),
                })
            }
            _ => Err(unsupported(ast, expr)),
        }
    }

    /// Canonicalizes either a declaration or a location expression.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedLocation`] if `node` is neither.
    pub fn new(ast: &Ast, node: NodeId) -> Result<Self> {
        if ast.kind(node).is_variable_declaration() {
            Self::from_declaration(ast, node)
        } else {
            Self::from_expr(ast, node)
        }
    }
}

fn resolved(ast: &Ast, expr: NodeId) -> Result<NodeId> {
    ast.facts().target(expr).ok_or_else(|| {
        Error::UnsupportedLocation(format!("unresolved identifier at {expr}"))
    })
}

fn check_declaration(ast: &Ast, decl: NodeId) -> Result<()> {
    if ast.kind(decl).is_variable_declaration() {
        Ok(())
    } else {
        Err(Error::UnsupportedLocation(format!(
            "{decl} is not a variable declaration"
        )))
    }
}

fn unsupported(ast: &Ast, expr: NodeId) -> Error {
    let shape = match ast.kind(expr) {
        NodeKind::MemberAccess { .. } => "member access on a non-identifier",
        NodeKind::Index { .. } => "index expression without an identifier base",
        NodeKind::Call { .. } => "function call",
        NodeKind::Tuple { .. } => "tuple expression",
        NodeKind::RangeIndex { .. } | NodeKind::Slice { .. } => "range expression",
        _ => "expression",
    };
    Error::UnsupportedLocation(format!("{shape} at {expr}"))
}

impl Ast {
    /// The identifier at the bottom of a chain of index expressions.
    ///
    /// Returns `None` if the chain ends in anything but an identifier.
    #[must_use]
    pub fn leftmost_identifier(&self, index: NodeId) -> Option<NodeId> {
        let mut current = index;
        while let NodeKind::Index { arr, .. } = self.kind(current) {
            current = *arr;
        }
        matches!(self.kind(current), NodeKind::Identifier { .. }).then_some(current)
    }

    /// The privacy label an expression denotes when used as an annotation.
    ///
    /// `me`, `all` and `tee` denote themselves; a resolved identifier denotes the
    /// owner held by its declaration. Other expressions denote no label.
    #[must_use]
    pub fn privacy_label(&self, expr: NodeId) -> Option<LabelKey> {
        match self.kind(expr) {
            NodeKind::All => Some(LabelKey::Public),
            NodeKind::Me => Some(LabelKey::Caller),
            NodeKind::Tee => Some(LabelKey::Tee),
            NodeKind::Identifier { .. } => self.facts().target(expr).map(LabelKey::Owner),
            _ => None,
        }
    }

    /// Converts a label expression into a [`PrivacyAnnotation`] value.
    #[must_use]
    pub fn privacy_annotation(&self, expr: NodeId) -> Option<PrivacyAnnotation> {
        match self.kind(expr) {
            NodeKind::All => Some(PrivacyAnnotation::All),
            NodeKind::Me => Some(PrivacyAnnotation::Me),
            NodeKind::Tee => Some(PrivacyAnnotation::Tee),
            NodeKind::Identifier { name } => Some(PrivacyAnnotation::Named {
                name: name.clone(),
                target: self.facts().target(expr),
            }),
            _ => None,
        }
    }

    /// Checks an expression's type against `expected`.
    ///
    /// Uses the expression's annotated type and the co-ownership facts holding before
    /// its enclosing statement. Returns `None` if the expression has not been typed.
    ///
    /// ## Arguments
    /// * `expr` - A typed expression
    /// * `expected` - The type required at the use site
    #[must_use]
    pub fn instance_of(&self, expr: NodeId, expected: &AnnotatedTypeName) -> Option<Conformance> {
        let actual = self.facts().annotated_type(expr)?;
        let oracle = self
            .related_statement(expr)
            .and_then(|stmt| self.facts().before_analysis(stmt));
        Some(actual.conforms_to(expected, oracle))
    }

    /// True if the call is a type conversion: its callee resolves to a contract or
    /// enum definition, or names a contract, enum or array type.
    #[must_use]
    pub fn is_cast(&self, call: NodeId) -> bool {
        let NodeKind::Call { func, .. } = self.kind(call) else {
            return false;
        };
        match self.kind(*func) {
            NodeKind::TypeExpr(t) => matches!(
                t,
                TypeName::Array(_) | TypeName::Contract(_) | TypeName::Enum(_)
            ),
            kind if kind.is_location() => self.facts().target(*func).is_some_and(|t| {
                matches!(
                    self.kind(t),
                    NodeKind::Contract { .. } | NodeKind::Enum { .. }
                )
            }),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, Keywords, NumberLiteral};
    use crate::types::{ArrayType, UserDefinedType};

    struct Fixture {
        ast: Ast,
        map_decl: NodeId,
        var_decl: NodeId,
    }

    fn fixture() -> Fixture {
        let mut ast = Ast::default();
        let map_decl = ast.add(NodeKind::StateVariableDeclaration {
            annotated_type: AnnotatedTypeName::uint_all(),
            keywords: Keywords::empty(),
            name: "balances".into(),
            expr: None,
            override_spec: None,
        });
        let var_decl = ast.add(NodeKind::VariableDeclaration {
            keywords: Keywords::empty(),
            annotated_type: AnnotatedTypeName::uint_all(),
            name: "x".into(),
            storage: None,
        });
        Fixture {
            ast,
            map_decl,
            var_decl,
        }
    }

    fn ident(f: &mut Fixture, name: &str, target: NodeId) -> NodeId {
        let id = f.ast.add(NodeKind::Identifier { name: name.into() });
        f.ast.facts_mut().set_target(id, target);
        id
    }

    fn index(f: &mut Fixture, key: NodeId) -> NodeId {
        let base = ident(f, "balances", f.map_decl);
        f.ast.add(NodeKind::Index {
            arr: base,
            key: Some(key),
        })
    }

    #[test]
    fn test_identifiers_share_target() {
        let mut f = fixture();
        let var_decl = f.var_decl;
        let a = ident(&mut f, "x", var_decl);
        let var_decl = f.var_decl;
        let b = ident(&mut f, "x", var_decl);
        let ta = InstanceTarget::from_expr(&f.ast, a).unwrap();
        let tb = InstanceTarget::from_expr(&f.ast, b).unwrap();
        assert_eq!(ta, tb);
        assert_eq!(ta, InstanceTarget::new(&f.ast, f.var_decl).unwrap());
    }

    #[test]
    fn test_index_keys_differ() {
        let mut f = fixture();
        let var_decl = f.var_decl;
        let k1 = ident(&mut f, "x", var_decl);
        let k2 = f.ast.add(NodeKind::NumberLiteral(NumberLiteral::new(0)));
        let i1 = index(&mut f, k1);
        let i2 = index(&mut f, k2);

        let t1 = InstanceTarget::from_expr(&f.ast, i1).unwrap();
        let t2 = InstanceTarget::from_expr(&f.ast, i2).unwrap();
        assert_ne!(t1, t2);
        assert_eq!(t1.declaration, f.map_decl);
        assert_eq!(t2.declaration, f.map_decl);
        assert_eq!(t1.key, TargetKey::Expr(k1));
        assert_eq!(t1.index, Some(i1));
    }

    #[test]
    fn test_nested_index_resolves_leftmost() {
        let mut f = fixture();
        let k1 = f.ast.add(NodeKind::NumberLiteral(NumberLiteral::new(1)));
        let inner = index(&mut f, k1);
        let k2 = f.ast.add(NodeKind::NumberLiteral(NumberLiteral::new(2)));
        let outer = f.ast.add(NodeKind::Index {
            arr: inner,
            key: Some(k2),
        });
        let t = InstanceTarget::from_expr(&f.ast, outer).unwrap();
        assert_eq!(t.declaration, f.map_decl);
        assert_eq!(t.key, TargetKey::Expr(k2));
    }

    #[test]
    fn test_member_access() {
        let mut f = fixture();
        let var_decl = f.var_decl;
        let base = ident(&mut f, "x", var_decl);
        let access = f.ast.add(NodeKind::MemberAccess {
            expr: base,
            member: "owner".into(),
        });
        let t = InstanceTarget::from_expr(&f.ast, access).unwrap();
        assert_eq!(t.key, TargetKey::Member("owner".into()));

        let nested = f.ast.add(NodeKind::MemberAccess {
            expr: access,
            member: "id".into(),
        });
        assert!(matches!(
            InstanceTarget::from_expr(&f.ast, nested),
            Err(Error::UnsupportedLocation(_))
        ));
    }

    #[test]
    fn test_unsupported_shapes() {
        let mut f = fixture();
        let lit = f.ast.add(NodeKind::NumberLiteral(NumberLiteral::new(1)));
        assert!(matches!(
            InstanceTarget::from_expr(&f.ast, lit),
            Err(Error::UnsupportedLocation(_))
        ));

        let unresolved = f.ast.add(NodeKind::Identifier { name: "y".into() });
        assert!(matches!(
            InstanceTarget::from_expr(&f.ast, unresolved),
            Err(Error::UnsupportedLocation(_))
        ));
    }

    #[test]
    fn test_privacy_label() {
        let mut f = fixture();
        let me = f.ast.add(NodeKind::Me);
        let var_decl = f.var_decl;
        let owner = ident(&mut f, "x", var_decl);
        assert_eq!(f.ast.privacy_label(me), Some(LabelKey::Caller));
        assert_eq!(f.ast.privacy_label(owner), Some(LabelKey::Owner(f.var_decl)));
        assert_eq!(
            f.ast.privacy_annotation(owner).and_then(|p| p.label()),
            Some(LabelKey::Owner(f.var_decl))
        );
        let lit = f.ast.add(NodeKind::BooleanLiteral(true));
        assert_eq!(f.ast.privacy_label(lit), None);
    }

    #[test]
    fn test_instance_of_uses_expression_type() {
        let mut f = fixture();
        let var_decl = f.var_decl;
        let x = ident(&mut f, "x", var_decl);
        assert_eq!(f.ast.instance_of(x, &AnnotatedTypeName::uint_all()), None);

        f.ast
            .facts_mut()
            .set_annotated_type(x, AnnotatedTypeName::uint_all());
        assert_eq!(
            f.ast.instance_of(x, &AnnotatedTypeName::uint_all()),
            Some(Conformance::Yes)
        );
        assert_eq!(
            f.ast.instance_of(x, &AnnotatedTypeName::me(TypeName::uint())),
            Some(Conformance::MakePrivate)
        );
    }

    #[test]
    fn test_is_cast() {
        let mut ast = Ast::default();
        let mut b = AstBuilder::new(&mut ast);
        let token = b.contract("Token", vec![]).unwrap();
        let red = b.enum_value("Red").unwrap();
        let color = b.enum_def("Color", vec![red]).unwrap();
        let decl = b
            .variable_declaration(&[], AnnotatedTypeName::address_all(), "a", None)
            .unwrap();

        let to_token = b.identifier("Token").unwrap();
        let a = b.identifier("a").unwrap();
        let contract_cast = b.call(to_token, vec![a]);

        let to_color = b.identifier("Color").unwrap();
        let zero = b.number(0);
        let enum_cast = b.call(to_color, vec![zero]);

        let uints = b.type_expr(TypeName::dyn_uint_array());
        let data = b.identifier("data").unwrap();
        let array_cast = b.call(uints, vec![data]);

        let token_type = b.type_expr(TypeName::Contract(UserDefinedType::new(
            vec!["Token".into()],
            Some(token),
        )));
        let a2 = b.identifier("a").unwrap();
        let typed_contract_cast = b.call(token_type, vec![a2]);

        let f = b.identifier("f").unwrap();
        let a3 = b.identifier("a").unwrap();
        let plain_call = b.call(f, vec![a3]);

        let address = b.type_expr(TypeName::Address);
        let a4 = b.identifier("a").unwrap();
        let address_call = b.call(address, vec![a4]);

        let nested = TypeName::Array(Box::new(ArrayType::new(
            AnnotatedTypeName::new(TypeName::dyn_uint_array(), None),
            None,
        )));
        let nested = b.type_expr(nested);
        let data2 = b.identifier("data").unwrap();
        let nested_cast = b.call(nested, vec![data2]);

        ast.facts_mut().set_target(to_token, token);
        ast.facts_mut().set_target(to_color, color);
        ast.facts_mut().set_target(f, decl);

        assert!(ast.is_cast(contract_cast));
        assert!(ast.is_cast(enum_cast));
        assert!(ast.is_cast(array_cast));
        assert!(ast.is_cast(typed_contract_cast));
        assert!(ast.is_cast(nested_cast));
        assert!(!ast.is_cast(plain_call));
        assert!(!ast.is_cast(address_call));
        assert!(!ast.is_cast(a));
    }
}
