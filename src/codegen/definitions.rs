use crate::{
    ast::{FunctionKind, FunctionModifier, Keywords, NodeId, NodeKind, StorageLocation},
    codegen::Renderer,
    types::AnnotatedTypeName,
    Result,
};

impl Renderer<'_> {
    pub(super) fn definition(&self, kind: &NodeKind) -> Result<String> {
        Ok(match kind {
            NodeKind::VariableDeclaration {
                keywords,
                annotated_type,
                name,
                storage,
            } => {
                let keywords = self.visible_keywords(*keywords).join(" ");
                format!(
                    "{keywords} {}{} {name}",
                    self.annotated_type(annotated_type),
                    storage_suffix(*storage)
                )
                .trim()
                .to_string()
            }
            NodeKind::Parameter {
                keywords,
                annotated_type,
                name,
                storage,
            } => self.parameter(*keywords, annotated_type, name.as_deref(), *storage),
            NodeKind::StateVariableDeclaration {
                annotated_type,
                keywords,
                name,
                expr,
                override_spec,
            } => {
                let visible = self.visible_keywords(*keywords);
                let is_final = visible.first() == Some(&"final");
                let others: Vec<&str> = visible.into_iter().filter(|k| *k != "final").collect();
                let f = if is_final { "final " } else { "" };
                let k = if others.is_empty() {
                    String::new()
                } else {
                    format!("{} ", others.join(" "))
                };
                let o = match override_spec {
                    Some(spec) => format!("{} ", self.node(*spec)?),
                    None => String::new(),
                };
                let decl = format!("{f}{} {k}{o}{name}", self.annotated_type(annotated_type));
                match expr {
                    Some(expr) => format!("{} = {};", decl.trim(), self.node(*expr)?),
                    None => format!("{};", decl.trim()),
                }
            }
            NodeKind::EventParameter {
                annotated_type,
                indexed,
                name,
            } => {
                let mut out = self.annotated_type(annotated_type);
                if *indexed {
                    out.push_str(" indexed");
                }
                if let Some(name) = name {
                    out.push(' ');
                    out.push_str(name);
                }
                out
            }
            NodeKind::ErrorParameter {
                annotated_type,
                name,
            } => match name {
                Some(name) => format!("{} {name}", self.annotated_type(annotated_type)),
                None => self.annotated_type(annotated_type),
            },
            NodeKind::EnumValue { name } => name.clone(),
            NodeKind::Function {
                name,
                params,
                modifiers,
                returns,
                body,
                kind,
            } => self.function(*kind, name, params, modifiers, returns, *body)?,
            NodeKind::ModifierInvocation { path, args } => match args {
                Some(args) => format!("{}({})", path.join("."), self.node(*args)?),
                None => path.join("."),
            },
            NodeKind::OverrideSpecifier { paths } => {
                if paths.is_empty() {
                    "override".to_string()
                } else {
                    let paths: Vec<String> = paths.iter().map(|p| p.join(".")).collect();
                    format!("override({})", paths.join(", "))
                }
            }
            NodeKind::ModifierDefinition {
                name,
                params,
                is_virtual,
                overrides,
                body,
            } => {
                let mut out = format!("modifier {name}({})", self.join(params, ", ")?);
                if *is_virtual {
                    out.push_str(" virtual");
                }
                if !overrides.is_empty() {
                    out.push(' ');
                    out.push_str(&self.join(overrides, " ")?);
                }
                format!("{out} {}", self.body(*body)?)
            }
            NodeKind::Struct { name, members } => {
                let members = self.list(members)?;
                let body = if members.is_empty() {
                    String::new()
                } else {
                    format!("{};", members.join(";\n"))
                };
                format!("struct {name} {{\n{}\n}}", self.indent(&body))
            }
            NodeKind::Enum { name, values } => {
                format!("enum {name} {{\n{}\n}}", self.indent(&self.join(values, ", ")?))
            }
            NodeKind::UserDefinedValueType { name, underlying } => {
                format!("type {name} is {};", self.type_name(underlying))
            }
            NodeKind::Event {
                name,
                params,
                anonymous,
            } => {
                let anonymous = if *anonymous { " anonymous" } else { "" };
                format!("event {name}({}){anonymous};", self.join(params, ", ")?)
            }
            NodeKind::Error { name, params } => {
                format!("error {name}({});", self.join(params, ", ")?)
            }
            NodeKind::UsingDirective { path, type_name } => {
                let target = match type_name {
                    Some(t) => self.type_name(t),
                    None => "*".to_string(),
                };
                format!("using {} for {target};", path.join("."))
            }
            NodeKind::Contract {
                name,
                units,
                extra_head,
                extra_tail,
            } => format!(
                "contract {name} {{\n{}\n\n{}\n\n{}\n}}",
                self.indent(&self.join(extra_head, "\n")?),
                self.indent(&self.join(units, "\n")?),
                self.indent(&self.join(extra_tail, "\n")?)
            ),
            NodeKind::Interface {
                name,
                inheritance,
                body,
            } => {
                let is = if inheritance.is_empty() {
                    String::new()
                } else {
                    format!(" is {}", self.join(inheritance, ", ")?)
                };
                format!(
                    "interface {name}{is} {{\n{}\n}}",
                    self.indent(&self.join(body, "\n")?)
                )
            }
            NodeKind::Library { name, body } => {
                format!("library {name} {{\n{}\n}}", self.indent(&self.join(body, "\n")?))
            }
            NodeKind::InheritanceSpecifier { path, args } => match args {
                Some(args) => format!("{}({})", path.join("."), self.node(*args)?),
                None => path.join("."),
            },
            NodeKind::Pragma { name, version } => {
                if self.options.backend && name == "solidity" {
                    format!("pragma solidity {};", self.ast.config().backend_version_pragma)
                } else {
                    format!("pragma {name} {version};")
                }
            }
            NodeKind::Import {
                path,
                unit_alias,
                aliases,
            } => {
                if !aliases.is_empty() {
                    let symbols: Vec<String> = aliases
                        .iter()
                        .map(|(symbol, alias)| match alias {
                            Some(alias) => format!("{symbol} as {alias}"),
                            None => symbol.clone(),
                        })
                        .collect();
                    format!("import {{{}}} from \"{path}\";", symbols.join(", "))
                } else if let Some(alias) = unit_alias {
                    format!("import \"{path}\" as {alias};")
                } else {
                    format!("import \"{path}\";")
                }
            }
            NodeKind::SourceUnit {
                units, extra_head, ..
            } => format!(
                "{}\n\n{}",
                self.join(extra_head, "\n")?,
                self.join(units, "\n\n")?
            ),
            other => return Err(internal_error!("{other:?} is not a definition")),
        })
    }

    /// Keyword spellings to print; `final` only when enabled.
    fn visible_keywords(&self, keywords: Keywords) -> Vec<&'static str> {
        let keywords = if self.options.display_final {
            keywords
        } else {
            keywords.difference(Keywords::FINAL)
        };
        keywords.names()
    }

    fn parameter(
        &self,
        keywords: Keywords,
        annotated_type: &AnnotatedTypeName,
        name: Option<&str>,
        storage: Option<StorageLocation>,
    ) -> String {
        let f = if self.options.display_final && keywords.contains(Keywords::FINAL) {
            "final "
        } else {
            ""
        };
        let mut out = format!(
            "{f}{}{}",
            self.annotated_type(annotated_type),
            storage_suffix(storage)
        );
        if let Some(name) = name {
            out.push(' ');
            out.push_str(name);
        }
        out
    }

    fn function(
        &self,
        kind: FunctionKind,
        name: &str,
        params: &[NodeId],
        modifiers: &[FunctionModifier],
        returns: &[NodeId],
        body: Option<NodeId>,
    ) -> Result<String> {
        let head = match kind {
            FunctionKind::Function => format!("function {name}"),
            other => other.to_string(),
        };
        let mut out = format!("{head}({})", self.join(params, ", ")?);
        if !modifiers.is_empty() {
            let modifiers = modifiers
                .iter()
                .map(|m| match m {
                    FunctionModifier::Keyword(k) => Ok(k.clone()),
                    FunctionModifier::Node(id) => self.node(*id),
                })
                .collect::<Result<Vec<_>>>()?;
            out.push(' ');
            out.push_str(&modifiers.join(" "));
        }
        if !returns.is_empty() {
            out.push_str(&format!(" returns ({})", self.join(returns, ", ")?));
        }
        Ok(format!("{out} {}", self.body(body)?))
    }

    fn body(&self, body: Option<NodeId>) -> Result<String> {
        match body {
            Some(body) => self.node(body),
            None => Ok(";".to_string()),
        }
    }
}

fn storage_suffix(storage: Option<StorageLocation>) -> String {
    storage.map(|s| format!(" {s}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{Ast, AstBuilder, FunctionKind, FunctionModifier, StorageLocation},
        codegen::{render, render_with, RenderOptions},
        types::{AnnotatedTypeName, MappingType, PrivacyAnnotation, TypeName},
    };

    fn public() -> FunctionModifier {
        FunctionModifier::Keyword("public".into())
    }

    #[test]
    fn test_declarations() {
        let mut ast = Ast::default();
        let mut b = AstBuilder::new(&mut ast);
        let local = b
            .variable_declaration(
                &["final"],
                AnnotatedTypeName::me(TypeName::uint()),
                "x",
                None,
            )
            .unwrap();
        let param = b
            .parameter(
                &[],
                AnnotatedTypeName::new(TypeName::String, None),
                Some("s"),
                Some(StorageLocation::Memory),
            )
            .unwrap();
        let unnamed = b
            .parameter(&[], AnnotatedTypeName::bool_all(), None, None)
            .unwrap();

        assert_eq!(render(&ast, local).unwrap(), "final uint@me x");
        assert_eq!(
            render_with(&ast, local, RenderOptions::backend()).unwrap(),
            "uint x"
        );
        assert_eq!(render(&ast, param).unwrap(), "string memory s");
        assert_eq!(render(&ast, unnamed).unwrap(), "bool");
    }

    #[test]
    fn test_state_variables() {
        let mut ast = Ast::default();
        let mut b = AstBuilder::new(&mut ast);
        let balances_type = TypeName::Mapping(Box::new(MappingType::new(
            TypeName::Address,
            Some("owner".into()),
            AnnotatedTypeName::new(TypeName::uint(), Some(PrivacyAnnotation::named("owner"))),
        )));
        let balances = b
            .state_variable(
                &[],
                AnnotatedTypeName::new(balances_type, None),
                "balances",
                None,
                None,
            )
            .unwrap();
        let me = b.me();
        let owner = b
            .state_variable(
                &["final", "public"],
                AnnotatedTypeName::address_all(),
                "owner",
                Some(me),
                None,
            )
            .unwrap();

        assert_eq!(
            render(&ast, balances).unwrap(),
            "mapping(address!owner => uint@owner) balances;"
        );
        assert_eq!(
            render(&ast, owner).unwrap(),
            "final address public owner = me;"
        );
        assert_eq!(
            render_with(&ast, owner, RenderOptions::backend()).unwrap(),
            "address public owner = msg.sender;"
        );
    }

    #[test]
    fn test_function_signature() {
        let mut ast = Ast::default();
        let mut b = AstBuilder::new(&mut ast);
        let v = b
            .parameter(&[], AnnotatedTypeName::uint_all(), Some("v"), None)
            .unwrap();
        let only_owner = b.modifier_invocation(&["onlyOwner"], None);
        let ret = b
            .parameter(&[], AnnotatedTypeName::bool_all(), None, None)
            .unwrap();
        let body = b.block(vec![]);
        let f = b
            .function(
                FunctionKind::Function,
                "set",
                vec![v],
                vec![public(), FunctionModifier::Node(only_owner)],
                vec![ret],
                Some(body),
            )
            .unwrap();
        let declared = b
            .function(FunctionKind::Receive, "", vec![], vec![], vec![], None)
            .unwrap();

        assert_eq!(
            render(&ast, f).unwrap(),
            "function set(uint v) public onlyOwner returns (bool) {\n\n}"
        );
        assert_eq!(render(&ast, declared).unwrap(), "receive() ;");
    }

    #[test]
    fn test_contract_layout() {
        let mut ast = Ast::default();
        let mut b = AstBuilder::new(&mut ast);
        let member = b
            .variable_declaration(&[], AnnotatedTypeName::uint_all(), "x", None)
            .unwrap();
        let point = b.struct_def("Point", vec![member]).unwrap();
        let red = b.enum_value("Red").unwrap();
        let blue = b.enum_value("Blue").unwrap();
        let color = b.enum_def("Color", vec![red, blue]).unwrap();
        let contract = b.contract("C", vec![point, color]).unwrap();
        let pragma = b.pragma("solidity", "^0.8.0");
        let unit = b.source_unit(vec![pragma, contract], "");

        assert_eq!(
            render(&ast, contract).unwrap(),
            "contract C {\n\n\n    struct Point {\n        uint x;\n    }\n    enum Color {\n        Red, Blue\n    }\n\n\n}"
        );
        assert!(render(&ast, unit)
            .unwrap()
            .starts_with("\n\npragma solidity ^0.8.0;\n\ncontract C {"));
    }

    #[test]
    fn test_directives() {
        let mut ast = Ast::default();
        let mut b = AstBuilder::new(&mut ast);
        let plain = b.import("lib.sol", None);
        let aliased = b.import("lib.sol", Some("L"));
        let symbols = b.import_symbols("lib.sol", &[("A", Some("B")), ("C", None)]);
        let pragma = b.pragma("solidity", ">=0.7.0");
        let using = b.using_directive(&["SafeMath"], Some(TypeName::uint()));
        let any = b.using_directive(&["Lib", "Ext"], None);

        assert_eq!(render(&ast, plain).unwrap(), "import \"lib.sol\";");
        assert_eq!(render(&ast, aliased).unwrap(), "import \"lib.sol\" as L;");
        assert_eq!(
            render(&ast, symbols).unwrap(),
            "import {A as B, C} from \"lib.sol\";"
        );
        assert_eq!(
            render_with(&ast, pragma, RenderOptions::backend()).unwrap(),
            "pragma solidity ^0.8.0;"
        );
        assert_eq!(render(&ast, using).unwrap(), "using SafeMath for uint;");
        assert_eq!(render(&ast, any).unwrap(), "using Lib.Ext for *;");
    }

    #[test]
    fn test_events_errors_and_modifiers() {
        let mut ast = Ast::default();
        let mut b = AstBuilder::new(&mut ast);
        let from = b
            .event_parameter(AnnotatedTypeName::address_all(), true, Some("from"))
            .unwrap();
        let event = b.event("Sent", vec![from], false).unwrap();
        let code = b
            .error_parameter(AnnotatedTypeName::uint_all(), Some("code"))
            .unwrap();
        let error = b.error_def("Failed", vec![code]).unwrap();
        let spec = b.override_specifier(&[&["A"], &["B", "C"]]);
        let underscore = b.identifier("_").unwrap();
        let placeholder = b.expression_statement(underscore);
        let body = b.block(vec![placeholder]);
        let modifier = b
            .modifier_definition("guarded", vec![], true, vec![spec], Some(body))
            .unwrap();
        let udvt = b.user_defined_value_type("Price", TypeName::uint()).unwrap();

        assert_eq!(
            render(&ast, event).unwrap(),
            "event Sent(address indexed from);"
        );
        assert_eq!(render(&ast, error).unwrap(), "error Failed(uint code);");
        assert_eq!(
            render(&ast, modifier).unwrap(),
            "modifier guarded() virtual override(A, B.C) {\n    _;\n}"
        );
        assert_eq!(render(&ast, udvt).unwrap(), "type Price is uint;");
    }
}
