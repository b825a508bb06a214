use crate::{
    ast::{NodeId, NodeKind, NumberLiteral},
    codegen::Renderer,
    Result,
};

impl Renderer<'_> {
    pub(super) fn expression(&self, id: NodeId, kind: &NodeKind) -> Result<String> {
        Ok(match kind {
            NodeKind::BooleanLiteral(value) => value.to_string(),
            NodeKind::NumberLiteral(literal) => number_literal(literal),
            NodeKind::StringLiteral(value) => format!("'{value}'"),
            NodeKind::ArrayLiteral { values } => format!("[{}]", self.join(values, ", ")?),
            NodeKind::Tuple { elements } => format!("({})", self.join(elements, ", ")?),
            NodeKind::InlineArray { exprs } => format!("[{}]", self.join(exprs, ", ")?),
            NodeKind::Identifier { name } => name.clone(),
            NodeKind::MemberAccess { expr, member } => format!("{}.{member}", self.node(*expr)?),
            NodeKind::Index { arr, key } => format!("{}[{}]", self.node(*arr)?, self.opt(*key)?),
            NodeKind::RangeIndex { arr, start, end } => format!(
                "{}[{}:{}]",
                self.node(*arr)?,
                self.opt(*start)?,
                self.opt(*end)?
            ),
            NodeKind::Slice { .. } => {
                return Err(internal_error!(
                    "slice {id} has no rendering outside a slice assignment"
                ))
            }
            NodeKind::Me => {
                if self.options.backend {
                    self.ast.config().caller_builtin.clone()
                } else {
                    "me".to_string()
                }
            }
            NodeKind::All => "all".to_string(),
            NodeKind::Tee => "tee".to_string(),
            NodeKind::Reclassify { expr, privacy } => {
                let e = self.node(*expr)?;
                if self.options.backend {
                    e
                } else {
                    format!("reveal({e}, {})", self.node(*privacy)?)
                }
            }
            NodeKind::Builtin(op) => {
                return Err(internal_error!(
                    "builtin {op} at {id} is only rendered as a callee"
                ))
            }
            NodeKind::Call {
                func,
                args,
                call_options,
            } => self.call(*func, *args, *call_options)?,
            NodeKind::ArgumentList { args, named } => {
                let joined = self.join(args, ", ")?;
                if *named {
                    format!("{{{joined}}}")
                } else {
                    joined
                }
            }
            NodeKind::NamedArgument { key, value } => format!("{key}: {}", self.node(*value)?),
            NodeKind::MetaType(t) => format!("type({})", self.type_name(t)),
            NodeKind::New(t) => format!("new {}", self.type_name(t)),
            NodeKind::PrimitiveCast {
                elem_type,
                expr,
                implicit,
            } => {
                if *implicit {
                    self.node(*expr)?
                } else {
                    format!("{}({})", self.type_name(elem_type), self.node(*expr)?)
                }
            }
            NodeKind::TypeExpr(t) => self.type_name(t),
            other => {
                return Err(internal_error!("{other:?} at {id} is not an expression"));
            }
        })
    }

    fn call(&self, func: NodeId, args: NodeId, call_options: bool) -> Result<String> {
        if let NodeKind::Builtin(op) = self.ast.kind(func) {
            let operands = match self.ast.kind(args) {
                NodeKind::ArgumentList { args, .. } => self.list(args)?,
                _ => vec![self.node(args)?],
            };
            return op.format(&operands).ok_or_else(|| {
                internal_error!(
                    "builtin {op} expects {} operands, got {}",
                    op.arity(),
                    operands.len()
                )
            });
        }

        let f = self.node(func)?;
        let a = self.node(args)?;
        Ok(if call_options {
            format!("{f}{a}")
        } else {
            format!("{f}({a})")
        })
    }
}

/// Verbatim source text when known, else the value in its original base plus unit.
fn number_literal(literal: &NumberLiteral) -> String {
    if let Some(text) = &literal.source_text {
        return text.clone();
    }
    let value = if literal.was_hex {
        if literal.value.sign() == num_bigint::Sign::Minus {
            format!("-0x{:x}", literal.value.magnitude())
        } else {
            format!("0x{:x}", literal.value)
        }
    } else {
        literal.value.to_string()
    };
    match &literal.unit {
        Some(unit) => format!("{value} {unit}"),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{Ast, AstBuilder, BuiltinOp},
        codegen::{render, render_with, RenderOptions},
        types::TypeName,
        Error,
    };

    #[test]
    fn test_number_literal_forms() {
        assert_eq!(number_literal(&NumberLiteral::new(42)), "42");
        let hex = NumberLiteral {
            was_hex: true,
            ..NumberLiteral::new(255)
        };
        assert_eq!(number_literal(&hex), "0xff");
        let unit = NumberLiteral {
            unit: Some("ether".into()),
            ..NumberLiteral::new(2)
        };
        assert_eq!(number_literal(&unit), "2 ether");
        let verbatim = NumberLiteral {
            source_text: Some("1_000".into()),
            ..NumberLiteral::new(1000)
        };
        assert_eq!(number_literal(&verbatim), "1_000");
    }

    #[test]
    fn test_operator_templates() {
        let mut ast = Ast::default();
        let mut b = AstBuilder::new(&mut ast);
        let c = b.identifier("c").unwrap();
        let x = b.identifier("x").unwrap();
        let y = b.identifier("y").unwrap();
        let ite = b.ite(c, x, y);
        let z = b.identifier("z").unwrap();
        let neg = b.unary("-", z).unwrap();
        let paren = b.parenthesized(neg);
        let w = b.identifier("w").unwrap();
        let not = b.unary("!", w).unwrap();

        assert_eq!(render(&ast, ite).unwrap(), "c ? x : y");
        assert_eq!(render(&ast, paren).unwrap(), "(-z)");
        assert_eq!(render(&ast, not).unwrap(), "!w");
    }

    #[test]
    fn test_calls_and_arguments() {
        let mut ast = Ast::default();
        let mut b = AstBuilder::new(&mut ast);
        let f = b.identifier("transfer").unwrap();
        let to = b.identifier("to").unwrap();
        let amount = b.number(5);
        let call = b.call(f, vec![to, amount]);

        let g = b.identifier("pay").unwrap();
        let v = b.number(1);
        let options = b.named_arguments(vec![("value", v)]).unwrap();
        let with_options = b.call_with(g, options, true);

        let addr = b.identifier("a").unwrap();
        let cast = b.cast(TypeName::Address, addr);
        let hidden = b.identifier("h").unwrap();
        let implicit = b.implicit_cast(TypeName::uint(), hidden);

        assert_eq!(render(&ast, call).unwrap(), "transfer(to, 5)");
        assert_eq!(render(&ast, with_options).unwrap(), "pay{value: 1}");
        assert_eq!(render(&ast, cast).unwrap(), "address(a)");
        assert_eq!(render(&ast, implicit).unwrap(), "h");
    }

    #[test]
    fn test_locations() {
        let mut ast = Ast::default();
        let mut b = AstBuilder::new(&mut ast);
        let m = b.identifier("m").unwrap();
        let k = b.identifier("k").unwrap();
        let index = b.index(m, Some(k));
        let member = b.member_access(index, "owner").unwrap();
        let arr = b.identifier("arr").unwrap();
        let one = b.number(1);
        let range = b.range_index(arr, Some(one), None);
        let meta = b.meta_type(TypeName::uint());

        assert_eq!(render(&ast, member).unwrap(), "m[k].owner");
        assert_eq!(render(&ast, range).unwrap(), "arr[1:]");
        assert_eq!(render(&ast, meta).unwrap(), "type(uint)");
    }

    #[test]
    fn test_me_under_backend() {
        let mut ast = Ast::default();
        let me = AstBuilder::new(&mut ast).me();
        assert_eq!(render(&ast, me).unwrap(), "me");
        assert_eq!(render_with(&ast, me, RenderOptions::backend()).unwrap(), "msg.sender");
    }

    #[test]
    fn test_bare_builtin_is_internal_error() {
        let mut ast = Ast::default();
        let op = ast.add(NodeKind::Builtin(BuiltinOp::Add));
        assert!(matches!(render(&ast, op), Err(Error::Internal { .. })));

        let arr = ast.add(NodeKind::Identifier { name: "a".into() });
        let slice = ast.add(NodeKind::Slice {
            arr,
            base: None,
            offset: 0,
            size: 2,
        });
        assert!(matches!(render(&ast, slice), Err(Error::Internal { .. })));
    }
}
