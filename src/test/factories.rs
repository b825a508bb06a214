use crate::{
    ast::{Ast, AstBuilder, FunctionKind, FunctionModifier, NodeId},
    types::{AnnotatedTypeName, MappingType, PrivacyAnnotation, TypeName},
};

/// Handles into the tree built by [`token_contract`].
pub struct TokenContract {
    pub unit: NodeId,
    pub contract: NodeId,
    pub owner: NodeId,
    pub balances: NodeId,
    pub transfer: NodeId,
    /// `balances[me] -= amount;`
    pub debit: NodeId,
    /// The `balances[me]` location of `debit`
    pub debit_target: NodeId,
}

/// Source the factory tree was built from, kept for diagnostics.
pub const TOKEN_SOURCE: &str = "\
contract Token {
    final address owner = me;
    mapping(address!x => uint@x) balances;
    function transfer(address to, uint@me amount) public {
        balances[me] -= amount;
    }
}";

/// Builds a small token contract with positions matching [`TOKEN_SOURCE`].
///
/// Identifiers that refer to declarations have their targets recorded in the facts.
pub fn token_contract(ast: &mut Ast) -> TokenContract {
    let mut b = AstBuilder::new(ast);

    let me = b.at(2, 27).me();
    let owner = b
        .at(2, 5)
        .state_variable(&["final"], AnnotatedTypeName::address_all(), "owner", Some(me), None)
        .unwrap();

    let balances_type = TypeName::Mapping(Box::new(MappingType::new(
        TypeName::Address,
        Some("x".into()),
        AnnotatedTypeName::new(TypeName::uint(), Some(PrivacyAnnotation::named("x"))),
    )));
    let balances = b
        .at(3, 5)
        .state_variable(&[], AnnotatedTypeName::new(balances_type, None), "balances", None, None)
        .unwrap();

    let to = b
        .at(4, 23)
        .parameter(&[], AnnotatedTypeName::address_all(), Some("to"), None)
        .unwrap();
    let amount = b
        .at(4, 35)
        .parameter(&[], AnnotatedTypeName::me(TypeName::uint()), Some("amount"), None)
        .unwrap();

    let map = b.at(5, 9).identifier("balances").unwrap();
    let sender = b.at(5, 18).me();
    let debit_target = b.at(5, 9).index(map, Some(sender));
    let value = b.at(5, 26).identifier("amount").unwrap();
    let debit = b.at(5, 9).compound_assignment(debit_target, "-", value).unwrap();
    let body = b.at(4, 58).block(vec![debit]);

    let transfer = b
        .at(4, 5)
        .function(
            FunctionKind::Function,
            "transfer",
            vec![to, amount],
            vec![FunctionModifier::Keyword("public".into())],
            vec![],
            Some(body),
        )
        .unwrap();

    let contract = b
        .at(1, 1)
        .contract("Token", vec![owner, balances, transfer])
        .unwrap();
    let unit = b.at(1, 1).source_unit(vec![contract], TOKEN_SOURCE);

    ast.facts_mut().set_target(map, balances);
    ast.facts_mut().set_target(value, amount);

    TokenContract {
        unit,
        contract,
        owner,
        balances,
        transfer,
        debit,
        debit_target,
    }
}
