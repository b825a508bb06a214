use crate::{
    ast::{AssignOp, NodeId, NodeKind},
    codegen::Renderer,
    Result,
};

impl Renderer<'_> {
    pub(super) fn statement(&self, kind: &NodeKind) -> Result<String> {
        Ok(match kind {
            NodeKind::ExpressionStatement { expr } => format!("{};", self.node(*expr)?),
            NodeKind::Require { condition, comment } => match comment {
                Some(comment) => format!("require({}, {comment});", self.node(*condition)?),
                None => format!("require({});", self.node(*condition)?),
            },
            NodeKind::Revert { expr, args } => {
                format!("revert {}({});", self.node(*expr)?, self.node(*args)?)
            }
            NodeKind::Emit { expr, args } => {
                format!("emit {}({});", self.node(*expr)?, self.node(*args)?)
            }
            NodeKind::VariableDeclarationStatement { decl, expr } => {
                let decl = self.node(*decl)?;
                match expr {
                    Some(expr) => format!("{decl} = {};", self.node(*expr)?),
                    None => format!("{decl};"),
                }
            }
            NodeKind::TupleVariableDeclarationStatement { decls, expr } => {
                let decls = decls
                    .iter()
                    .map(|decl| self.opt(*decl))
                    .collect::<Result<Vec<_>>>()?;
                format!("({}) = {};", decls.join(", "), self.node(*expr)?)
            }
            NodeKind::Assignment { lhs, rhs, op } => self.assignment(*lhs, *rhs, *op)?,
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut out = format!("if ({}) {}", self.node(*condition)?, self.node(*then_branch)?);
                if let Some(else_branch) = else_branch {
                    out.push_str(&format!("\n else {}", self.node(*else_branch)?));
                }
                out
            }
            NodeKind::While { condition, body } => {
                format!("while ({}) {}", self.node(*condition)?, self.node(*body)?)
            }
            NodeKind::DoWhile { body, condition } => {
                format!("do {} while ({});", self.node(*body)?, self.node(*condition)?)
            }
            NodeKind::For {
                init,
                condition,
                update,
                body,
            } => {
                let init = match init {
                    Some(init) => self.node(*init)?,
                    None => ";".to_string(),
                };
                let update = match update {
                    Some(update) => format!(" {}", self.node(*update)?.replace(';', "")),
                    None => String::new(),
                };
                format!(
                    "for ({init} {};{update}) {}",
                    self.opt(*condition)?,
                    self.node(*body)?
                )
            }
            NodeKind::Break => "break;".to_string(),
            NodeKind::Continue => "continue;".to_string(),
            NodeKind::Return { expr } => match expr {
                Some(expr) => format!("return {};", self.node(*expr)?),
                None => "return;".to_string(),
            },
            NodeKind::Try {
                expr,
                returns,
                body,
                catches,
            } => {
                let mut out = format!("try {} ", self.node(*expr)?);
                if !returns.is_empty() {
                    out.push_str(&format!("returns ({}) ", self.join(returns, ", ")?));
                }
                out.push_str(&self.node(*body)?);
                if !catches.is_empty() {
                    out.push(' ');
                    out.push_str(&self.join(catches, " ")?);
                }
                out
            }
            NodeKind::CatchClause { name, params, body } => {
                let mut out = "catch".to_string();
                if let Some(name) = name {
                    out.push(' ');
                    out.push_str(name);
                }
                if !params.is_empty() {
                    out.push_str(&format!("({})", self.join(params, ", ")?));
                }
                format!("{out} {}", self.node(*body)?)
            }
            NodeKind::Assembly { text } => text.clone(),
            NodeKind::Block {
                statements,
                was_single_statement,
            } => {
                if let ([statement], true) = (statements.as_slice(), *was_single_statement) {
                    return self.node(*statement);
                }
                let body = self.indent(&self.join(statements, "\n")?);
                format!("{{\n{}\n}}", body.trim_end())
            }
            NodeKind::IndentBlock { statements } => self.indent(&self.join(statements, "\n")?),
            NodeKind::StatementList { statements } => self.join(statements, "\n")?,
            NodeKind::Comment { text } => {
                if text.is_empty() {
                    String::new()
                } else if text.contains('\n') {
                    format!("/* {text} */")
                } else {
                    format!("// {text}")
                }
            }
            other => return Err(internal_error!("{other:?} is not a statement")),
        })
    }

    fn assignment(&self, lhs: NodeId, rhs: NodeId, op: AssignOp) -> Result<String> {
        // Private targets are rewritten to explicit evaluations; the shorthand no longer applies
        let private = self
            .ast
            .facts()
            .annotated_type(lhs)
            .is_some_and(|t| t.is_private());
        let op = if private { AssignOp::Plain } else { op };

        let rhs = if op == AssignOp::Plain {
            rhs
        } else {
            self.shorthand_operand(rhs)?
        };

        if let (
            NodeKind::Slice {
                arr: l_arr,
                base: l_base,
                offset: l_offset,
                size: l_size,
            },
            NodeKind::Slice {
                arr: r_arr,
                base: r_base,
                offset: r_offset,
                size: r_size,
            },
        ) = (self.ast.kind(lhs), self.ast.kind(rhs))
        {
            if l_size != r_size {
                return Err(internal_error!(
                    "slice assignment with mismatched sizes {l_size} and {r_size}"
                ));
            }
            let (l, r) = (self.node(*l_arr)?, self.node(*r_arr)?);
            let l_base = self.slice_base(*l_base)?;
            let r_base = self.slice_base(*r_base)?;
            let lines: Vec<String> = (0..*l_size)
                .map(|i| {
                    let l = format!("{l}[{l_base}{}]", l_offset + i);
                    let r = format!("{r}[{r_base}{}]", r_offset + i);
                    shorthand(op, &l, &r)
                })
                .collect();
            return Ok(lines.join("\n"));
        }

        Ok(shorthand(op, &self.node(lhs)?, &self.node(rhs)?))
    }

    /// The right operand of a normalized `lhs = op(lhs, rhs)` call.
    fn shorthand_operand(&self, rhs: NodeId) -> Result<NodeId> {
        if let NodeKind::Call { args, .. } = self.ast.kind(rhs) {
            if let NodeKind::ArgumentList { args, .. } = self.ast.kind(*args) {
                if let Some(&operand) = args.get(1) {
                    return Ok(operand);
                }
            }
        }
        Err(internal_error!(
            "shorthand assignment {rhs} does not hold a binary builtin call"
        ))
    }

    fn slice_base(&self, base: Option<NodeId>) -> Result<String> {
        Ok(match base {
            Some(base) => format!("{} + ", self.node(base)?),
            None => String::new(),
        })
    }
}

fn shorthand(op: AssignOp, lhs: &str, rhs: &str) -> String {
    match op {
        AssignOp::PreIncrement | AssignOp::PreDecrement => format!("{}{lhs};", op.symbol()),
        AssignOp::PostIncrement | AssignOp::PostDecrement => format!("{lhs}{};", op.symbol()),
        AssignOp::Plain | AssignOp::Compound(_) => format!("{lhs} {}= {rhs};", op.symbol()),
    }
}
