//! Integration tests for the type system, privacy labels and instance targets.
//!
//! These tests drive the public API the way the checker and the dataflow analysis
//! use it: types are attached to expressions through the facts, co-ownership is
//! answered by an oracle stored per statement, and locations are canonicalized into
//! hashable instance targets.

use std::rc::Rc;

use num_bigint::BigInt;
use privir::{prelude::*, Result};

fn uint(bits: u16) -> TypeName {
    TypeName::Numeric(NumericType::uint(Some(bits)))
}

fn owned_by(name: &str, decl: NodeId) -> PrivacyAnnotation {
    PrivacyAnnotation::Named {
        name: name.to_string(),
        target: Some(decl),
    }
}

#[test]
fn test_literal_conversion_and_combination() {
    let lit = |v: i64| TypeName::NumberLiteral(BigInt::from(v));
    let int8 = TypeName::Numeric(NumericType::int(Some(8)));

    assert!(lit(255).implicitly_convertible_to(&uint(8)));
    assert!(!lit(256).implicitly_convertible_to(&uint(8)));
    assert!(lit(-1).implicitly_convertible_to(&int8));
    assert!(!lit(-1).implicitly_convertible_to(&TypeName::uint()));
    assert!(uint(8).implicitly_convertible_to(&uint(16)));
    assert!(!uint(16).implicitly_convertible_to(&uint(8)));

    assert_eq!(
        uint(8).combined_type(&uint(16), false),
        CombinedType::Type(uint(16))
    );
    assert_eq!(lit(1).combined_type(&lit(2), false), CombinedType::Literal);
    assert_eq!(
        TypeName::Bool.combined_type(&TypeName::Address, false),
        CombinedType::NoCommonType
    );
}

#[test]
fn test_type_equality_rules() {
    assert_eq!(TypeName::uint(), uint(256));
    assert_ne!(uint(128), uint(256));

    let value = AnnotatedTypeName::new(TypeName::uint(), Some(PrivacyAnnotation::named("x")));
    let labelled = TypeName::Mapping(Box::new(MappingType::new(
        TypeName::Address,
        Some("x".into()),
        value.clone(),
    )));
    let unlabelled = TypeName::Mapping(Box::new(MappingType::new(TypeName::Address, None, value)));
    assert_eq!(labelled, unlabelled);
    assert_eq!(labelled.to_string(), "mapping(address!x => uint@x)");
    assert_eq!(unlabelled.to_string(), "mapping(address => uint@x)");
}

#[test]
fn test_public_value_joins_private_expectation() -> Result<()> {
    let mut ast = Ast::default();
    let mut b = AstBuilder::new(&mut ast);
    let amount = b.identifier("amount")?;
    b.expression_statement(amount);

    ast.facts_mut()
        .set_annotated_type(amount, AnnotatedTypeName::uint_all());

    let private = AnnotatedTypeName::me(TypeName::uint());
    assert_eq!(ast.instance_of(amount, &private), Some(Conformance::MakePrivate));
    assert_eq!(
        ast.instance_of(amount, &AnnotatedTypeName::uint_all()),
        Some(Conformance::Yes)
    );
    assert_eq!(
        ast.instance_of(amount, &AnnotatedTypeName::bool_all()),
        Some(Conformance::No)
    );
    Ok(())
}

#[test]
fn test_co_ownership_from_statement_snapshot() -> Result<()> {
    let mut ast = Ast::default();
    let mut b = AstBuilder::new(&mut ast);
    let alice = b.variable_declaration(&["final"], AnnotatedTypeName::address_all(), "alice", None)?;
    let bob = b.variable_declaration(&["final"], AnnotatedTypeName::address_all(), "bob", None)?;
    let value = b.identifier("v")?;
    let stmt = b.expression_statement(value);

    let actual = AnnotatedTypeName::new(TypeName::uint(), Some(owned_by("alice", alice)));
    let expected = AnnotatedTypeName::new(TypeName::uint(), Some(owned_by("bob", bob)));
    ast.facts_mut().set_annotated_type(value, actual.clone());

    assert_eq!(actual.combined_privacy(None, &expected), None);
    assert_eq!(ast.instance_of(value, &expected), Some(Conformance::No));

    let aliased: Rc<dyn PartitionOracle> = Rc::new(move |a: &LabelKey, b: &LabelKey| {
        let pair = [LabelKey::Owner(alice), LabelKey::Owner(bob)];
        pair.contains(a) && pair.contains(b)
    });
    ast.facts_mut().set_analysis(stmt, aliased.clone(), aliased);

    assert_eq!(ast.instance_of(value, &expected), Some(Conformance::Yes));
    Ok(())
}

#[test]
fn test_tuple_privacy_is_component_wise() {
    let pair = |a: PrivacyAnnotation, b: PrivacyAnnotation| {
        AnnotatedTypeName::new(
            TypeName::Tuple(TupleType::new(vec![
                AnnotatedTypeName::new(TypeName::uint(), Some(a)),
                AnnotatedTypeName::new(TypeName::Bool, Some(b)),
            ])),
            None,
        )
    };
    let actual = pair(PrivacyAnnotation::All, PrivacyAnnotation::Me);
    let expected = pair(PrivacyAnnotation::Me, PrivacyAnnotation::Me);

    assert_eq!(
        actual.combined_privacy(None, &expected),
        Some(CombinedPrivacy::Components(vec![
            Some(CombinedPrivacy::Label(PrivacyAnnotation::Me)),
            Some(CombinedPrivacy::Label(PrivacyAnnotation::Me)),
        ]))
    );
    assert_eq!(actual.conforms_to(&expected, None), Conformance::No);
    assert_eq!(expected.conforms_to(&expected, None), Conformance::Yes);
}

#[test]
fn test_instance_targets_key_dataflow_sets() -> Result<()> {
    let mut ast = Ast::default();
    let mut b = AstBuilder::new(&mut ast);
    let balances = b.state_variable(&[], AnnotatedTypeName::uint_all(), "balances", None, None)?;
    let point = b.variable_declaration(&[], AnnotatedTypeName::uint_all(), "p", None)?;

    let first = b.identifier("balances")?;
    let second = b.identifier("balances")?;
    let map = b.identifier("balances")?;
    let key = b.identifier("k")?;
    let entry = b.index(map, Some(key));
    let base = b.identifier("p")?;
    let field = b.member_access(base, "x")?;
    let unresolved = b.identifier("q")?;
    let f = b.identifier("f")?;
    let call = b.call(f, vec![]);
    let stmt = b.expression_statement(first);

    for id in [first, second, map] {
        ast.facts_mut().set_target(id, balances);
    }
    ast.facts_mut().set_target(base, point);

    let whole = InstanceTarget::new(&ast, first)?;
    assert_eq!(whole, InstanceTarget::new(&ast, second)?);
    assert_eq!(whole, InstanceTarget::from_declaration(&ast, balances)?);

    let indexed = InstanceTarget::new(&ast, entry)?;
    assert_eq!(indexed.declaration, balances);
    assert_eq!(indexed.key, TargetKey::Expr(key));
    assert_eq!(indexed.index, Some(entry));
    assert_ne!(indexed, whole);

    let member = InstanceTarget::new(&ast, field)?;
    assert_eq!(member.key, TargetKey::Member("x".into()));

    for bad in [unresolved, call] {
        assert!(matches!(
            InstanceTarget::new(&ast, bad),
            Err(Error::UnsupportedLocation(_))
        ));
    }

    let facts = ast.facts_mut();
    assert!(facts.add_modified(stmt, whole.clone()));
    assert!(!facts.add_modified(stmt, whole.clone()));
    assert!(facts.add_modified(stmt, indexed.clone()));
    assert!(facts.add_read(stmt, member.clone()));
    assert_eq!(facts.modified_values(stmt), &[whole, indexed]);
    assert!(facts.read_values(stmt).is_some_and(|r| r.contains(&member)));

    facts.clear_dataflow();
    assert!(ast.facts().modified_values(stmt).is_empty());
    Ok(())
}

#[test]
fn test_label_expressions() -> Result<()> {
    let mut ast = Ast::default();
    let mut b = AstBuilder::new(&mut ast);
    let owner = b.state_variable(&["final"], AnnotatedTypeName::address_all(), "owner", None, None)?;
    let me = b.me();
    let all = b.all();
    let named = b.identifier("owner")?;
    let dangling = b.identifier("nobody")?;
    ast.facts_mut().set_target(named, owner);

    assert_eq!(ast.privacy_label(me), Some(LabelKey::Caller));
    assert_eq!(ast.privacy_label(all), Some(LabelKey::Public));
    assert_eq!(ast.privacy_label(named), Some(LabelKey::Owner(owner)));
    assert_eq!(ast.privacy_label(dangling), None);
    assert_eq!(
        ast.privacy_annotation(named),
        Some(owned_by("owner", owner))
    );
    Ok(())
}
