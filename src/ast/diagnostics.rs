//! Positional excerpts for errors and warnings attached to nodes.
//!
//! An excerpt names the location, the enclosing contract and function, repeats the
//! source lines from the start of the enclosing statement down to the error line,
//! and marks the column:
//!
//! ```text
//! At line: 3;9, in function 'set' of contract 'Token'
//!         x = y;
//! --------/
//! ```
//!
//! Excerpts are omitted when [`crate::config::Config::suppress_diagnostics`] is set.

use strum::{Display, EnumIter};
use tracing::warn;

use crate::{
    ast::{Ast, FunctionKind, NodeId, NodeKind, Position},
    Error,
};

/// Category of a compiler warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum WarningKind {
    /// A value is declared or computed but never used
    UnusedValue,
    /// A private value may become observable
    PrivacyLeak,
    /// A construct is accepted but discouraged
    Deprecated,
    /// Anything else
    Other,
}

/// Renders the excerpt for `position` within `code`.
///
/// ## Arguments
/// * `position` - Error position
/// * `code` - Source lines
/// * `contract` - Name of the enclosing contract
/// * `function` - Name of the enclosing function
/// * `start_line` - First line to print; `None` prints only the error line, a negative
///   line prints no source
#[must_use]
pub fn code_error_message(
    position: Position,
    code: &[String],
    contract: Option<&str>,
    function: Option<&str>,
    start_line: Option<i32>,
) -> String {
    let Position { line, column } = position;
    let mut out = format!("At line: {line};{column}");
    let Some(affected) = usize::try_from(line)
        .ok()
        .filter(|&l| l > 0 && column > 0)
        .and_then(|l| code.get(l - 1))
    else {
        return out;
    };

    match (function, contract) {
        (Some(function), Some(contract)) => {
            out.push_str(&format!(", in function '{function}' of contract '{contract}'"));
        }
        (None, Some(contract)) => out.push_str(&format!(", in contract '{contract}'")),
        _ => {}
    }
    out.push('\n');

    let start = start_line.unwrap_or(line);
    if start > 0 {
        for number in start..=line {
            let Some(text) = usize::try_from(number).ok().and_then(|n| code.get(n - 1)) else {
                continue;
            };
            out.push_str(&text.replace('\t', "    "));
            out.push('\n');
        }
    }

    let marker_len = usize::try_from(column - 1).unwrap_or_default();
    for c in affected.chars().take(marker_len) {
        out.push_str(if c == '\t' { "----" } else { "-" });
    }
    out.push('/');
    out
}

impl Ast {
    fn display_name(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Function {
                kind: FunctionKind::Function,
                name,
                ..
            } => name.clone(),
            NodeKind::Function { kind, .. } => kind.to_string(),
            other => other.name().unwrap_or_default().to_string(),
        }
    }

    /// Formats `msg` with the excerpt locating `node`.
    ///
    /// Returns `msg` alone under `suppress_diagnostics`. Nodes outside a source unit
    /// are located as `error`.
    #[must_use]
    pub fn exception_message(&self, node: NodeId, msg: &str) -> String {
        if self.config().suppress_diagnostics {
            return msg.to_string();
        }
        let excerpt = match self.related_source_unit(node) {
            None => "error".to_string(),
            Some(unit) => {
                let contract = self.related_contract(node).map(|c| self.display_name(c));
                let function = self.related_function(node).map(|f| self.display_name(f));
                let start_line = self
                    .related_statement(node)
                    .map(|stmt| self.position(stmt).line);
                code_error_message(
                    self.position(node),
                    self.original_code(unit),
                    contract.as_deref(),
                    function.as_deref(),
                    start_line,
                )
            }
        };
        format!("\n{excerpt}\n\n{msg}")
    }

    /// An [`Error::Ast`] carrying `msg` and the excerpt for `node`.
    #[must_use]
    pub fn ast_error(&self, node: NodeId, msg: &str) -> Error {
        Error::Ast(self.exception_message(node, msg))
    }

    /// Emits a compiler warning for `node` and returns the formatted message.
    ///
    /// Returns `None` without emitting anything under `suppress_diagnostics`.
    pub fn issue_warning(&self, node: NodeId, kind: WarningKind, msg: &str) -> Option<String> {
        if self.config().suppress_diagnostics {
            return None;
        }
        let message = self.exception_message(node, msg);
        warn!(node = %node, kind = %kind, "{message}");
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{AstBuilder, FunctionModifier},
        config::Config,
    };

    fn lines(code: &str) -> Vec<String> {
        code.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_excerpt_marks_column() {
        let code = lines("contract C {\n    uint x;\n}");
        let msg = code_error_message(Position::new(2, 10), &code, Some("C"), None, None);
        assert_eq!(msg, "At line: 2;10, in contract 'C'\n    uint x;\n---------/");
    }

    #[test]
    fn test_excerpt_expands_tabs() {
        let code = lines("a\n\tb = c;");
        let msg = code_error_message(Position::new(2, 3), &code, Some("C"), Some("f"), Some(1));
        assert_eq!(
            msg,
            "At line: 2;3, in function 'f' of contract 'C'\na\n    b = c;\n-----/"
        );
    }

    #[test]
    fn test_excerpt_out_of_range() {
        let code = lines("a");
        assert_eq!(
            code_error_message(Position::new(5, 1), &code, None, None, None),
            "At line: 5;1"
        );
        assert_eq!(
            code_error_message(Position::default(), &code, None, None, None),
            "At line: -1;-1"
        );
    }

    #[test]
    fn test_exception_message_from_tree() {
        let code = "contract Token {\n  function set() public {\n    x = 1;\n  }\n}";
        let mut ast = Ast::default();
        let mut b = AstBuilder::new(&mut ast);
        let x = b.at(3, 5).identifier("x").unwrap();
        let one = b.number(1);
        let stmt = b.assignment(x, one);
        let body = b.at(2, 25).block(vec![stmt]);
        let f = b
            .at(2, 3)
            .function(
                crate::ast::FunctionKind::Function,
                "set",
                vec![],
                vec![FunctionModifier::Keyword("public".into())],
                vec![],
                Some(body),
            )
            .unwrap();
        let contract = b.at(1, 1).contract("Token", vec![f]).unwrap();
        b.source_unit(vec![contract], code);

        let msg = ast.exception_message(x, "bad assignment");
        assert_eq!(
            msg,
            "\nAt line: 3;5, in function 'set' of contract 'Token'\n    x = 1;\n----/\n\nbad assignment"
        );
        assert!(matches!(ast.ast_error(x, "e"), Error::Ast(_)));
    }

    #[test]
    fn test_suppressed_diagnostics() {
        let mut ast = Ast::new(Config::testing());
        let id = AstBuilder::new(&mut ast).break_stmt();
        assert_eq!(ast.exception_message(id, "oops"), "oops");
        assert_eq!(ast.issue_warning(id, WarningKind::Other, "careful"), None);
    }

    #[test]
    fn test_detached_node_message() {
        let mut ast = Ast::default();
        let id = AstBuilder::new(&mut ast).break_stmt();
        assert_eq!(ast.exception_message(id, "oops"), "\nerror\n\noops");
        assert!(ast
            .issue_warning(id, WarningKind::UnusedValue, "unused")
            .is_some());
    }
}
