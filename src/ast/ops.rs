//! Builtin operator catalog.
//!
//! Every operator the source language offers on primitive values is one variant of
//! [`BuiltinOp`]. A variant knows its source symbol, its rendering template, its
//! arity, how to fold constant operands and whether it may run inside a private
//! circuit. Operator symbols coming from the front end are resolved through
//! [`BuiltinOp::from_symbol`]; unknown symbols are rejected.

use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

use crate::{
    types::{literal::MAX_BITWIDTH, TypeName},
    Error, Result,
};

/// Operator category, used for type rules and eligibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCategory {
    /// `** * / % + -` and the unary signs
    Arithmetic,
    /// `< > <= >=`
    Comparison,
    /// `== !=`
    Equality,
    /// `&& || !`
    Boolean,
    /// `| & ^ ~`
    Bitwise,
    /// `<< >>`
    Shift,
    /// `c ? t : f`
    Conditional,
    /// `(x)`
    Parenthesis,
}

/// A builtin operator.
///
/// The string form (`Display`, `AsRef<str>`) is the operator symbol used by the front
/// end; unary signs are spelled `sign+`/`sign-`, the conditional `ite`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, EnumString, AsRefStr, Display,
)]
pub enum BuiltinOp {
    /// `a ** b`
    #[strum(serialize = "**")]
    Pow,
    /// `a * b`
    #[strum(serialize = "*")]
    Mul,
    /// `a / b`
    #[strum(serialize = "/")]
    Div,
    /// `a % b`
    #[strum(serialize = "%")]
    Mod,
    /// `a + b`
    #[strum(serialize = "+")]
    Add,
    /// `a - b`
    #[strum(serialize = "-")]
    Sub,
    /// `+a`
    #[strum(serialize = "sign+")]
    SignPlus,
    /// `-a`
    #[strum(serialize = "sign-")]
    SignMinus,
    /// `a << b`
    #[strum(serialize = "<<")]
    Shl,
    /// `a >> b`
    #[strum(serialize = ">>")]
    Shr,
    /// `a | b`
    #[strum(serialize = "|")]
    BitOr,
    /// `a & b`
    #[strum(serialize = "&")]
    BitAnd,
    /// `a ^ b`
    #[strum(serialize = "^")]
    BitXor,
    /// `~a`
    #[strum(serialize = "~")]
    BitNot,
    /// `a < b`
    #[strum(serialize = "<")]
    Lt,
    /// `a > b`
    #[strum(serialize = ">")]
    Gt,
    /// `a <= b`
    #[strum(serialize = "<=")]
    Le,
    /// `a >= b`
    #[strum(serialize = ">=")]
    Ge,
    /// `a == b`
    #[strum(serialize = "==")]
    Eq,
    /// `a != b`
    #[strum(serialize = "!=")]
    Ne,
    /// `a && b`
    #[strum(serialize = "&&")]
    And,
    /// `a || b`
    #[strum(serialize = "||")]
    Or,
    /// `!a`
    #[strum(serialize = "!")]
    Not,
    /// `c ? t : f`
    #[strum(serialize = "ite")]
    Ite,
    /// `(a)`
    #[strum(serialize = "parenthesis")]
    Parenthesis,
}

/// A constant operand or result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Boolean constant
    Bool(bool),
    /// Integer constant
    Number(BigInt),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(BigInt::from(value))
    }
}

impl BuiltinOp {
    /// Resolves an operator symbol.
    ///
    /// ## Arguments
    /// * `symbol` - The symbol as delivered by the front end (`+`, `sign-`, `ite`, ...)
    ///
    /// # Errors
    /// Returns [`Error::UnknownOperator`] if the symbol is not in the catalog.
    pub fn from_symbol(symbol: &str) -> Result<Self> {
        BuiltinOp::from_str(symbol).map_err(|_| Error::UnknownOperator(symbol.to_string()))
    }

    /// The operator symbol.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            BuiltinOp::Pow => "**",
            BuiltinOp::Mul => "*",
            BuiltinOp::Div => "/",
            BuiltinOp::Mod => "%",
            BuiltinOp::Add => "+",
            BuiltinOp::Sub => "-",
            BuiltinOp::SignPlus => "sign+",
            BuiltinOp::SignMinus => "sign-",
            BuiltinOp::Shl => "<<",
            BuiltinOp::Shr => ">>",
            BuiltinOp::BitOr => "|",
            BuiltinOp::BitAnd => "&",
            BuiltinOp::BitXor => "^",
            BuiltinOp::BitNot => "~",
            BuiltinOp::Lt => "<",
            BuiltinOp::Gt => ">",
            BuiltinOp::Le => "<=",
            BuiltinOp::Ge => ">=",
            BuiltinOp::Eq => "==",
            BuiltinOp::Ne => "!=",
            BuiltinOp::And => "&&",
            BuiltinOp::Or => "||",
            BuiltinOp::Not => "!",
            BuiltinOp::Ite => "ite",
            BuiltinOp::Parenthesis => "parenthesis",
        }
    }

    /// The operator's category.
    #[must_use]
    pub fn category(&self) -> OpCategory {
        match self {
            BuiltinOp::Pow
            | BuiltinOp::Mul
            | BuiltinOp::Div
            | BuiltinOp::Mod
            | BuiltinOp::Add
            | BuiltinOp::Sub
            | BuiltinOp::SignPlus
            | BuiltinOp::SignMinus => OpCategory::Arithmetic,
            BuiltinOp::Lt | BuiltinOp::Gt | BuiltinOp::Le | BuiltinOp::Ge => OpCategory::Comparison,
            BuiltinOp::Eq | BuiltinOp::Ne => OpCategory::Equality,
            BuiltinOp::And | BuiltinOp::Or | BuiltinOp::Not => OpCategory::Boolean,
            BuiltinOp::BitOr | BuiltinOp::BitAnd | BuiltinOp::BitXor | BuiltinOp::BitNot => {
                OpCategory::Bitwise
            }
            BuiltinOp::Shl | BuiltinOp::Shr => OpCategory::Shift,
            BuiltinOp::Ite => OpCategory::Conditional,
            BuiltinOp::Parenthesis => OpCategory::Parenthesis,
        }
    }

    /// Number of operands.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            BuiltinOp::SignPlus
            | BuiltinOp::SignMinus
            | BuiltinOp::BitNot
            | BuiltinOp::Not
            | BuiltinOp::Parenthesis => 1,
            BuiltinOp::Ite => 3,
            _ => 2,
        }
    }

    /// Renders the operator applied to already rendered operands.
    ///
    /// Returns `None` if the operand count does not match [`BuiltinOp::arity`].
    ///
    /// ## Arguments
    /// * `args` - Rendered operands in order
    #[must_use]
    pub fn format(&self, args: &[String]) -> Option<String> {
        if args.len() != self.arity() {
            return None;
        }
        Some(match self {
            BuiltinOp::SignPlus => format!("+{}", args[0]),
            BuiltinOp::SignMinus => format!("-{}", args[0]),
            BuiltinOp::BitNot => format!("~{}", args[0]),
            BuiltinOp::Not => format!("!{}", args[0]),
            BuiltinOp::Parenthesis => format!("({})", args[0]),
            BuiltinOp::Ite => format!("{} ? {} : {}", args[0], args[1], args[2]),
            binary => format!("{} {} {}", args[0], binary.symbol(), args[1]),
        })
    }

    /// True for `** * / % + -` and the unary signs.
    #[must_use]
    pub fn is_arithmetic(&self) -> bool {
        self.category() == OpCategory::Arithmetic
    }

    /// True for unary minus.
    #[must_use]
    pub fn is_neg_sign(&self) -> bool {
        *self == BuiltinOp::SignMinus
    }

    /// True for `< > <= >=`.
    #[must_use]
    pub fn is_comparison(&self) -> bool {
        self.category() == OpCategory::Comparison
    }

    /// True for `==` and `!=`.
    #[must_use]
    pub fn is_equality(&self) -> bool {
        self.category() == OpCategory::Equality
    }

    /// True for `&& || !`.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        self.category() == OpCategory::Boolean
    }

    /// True for `| & ^ ~`.
    #[must_use]
    pub fn is_bitwise(&self) -> bool {
        self.category() == OpCategory::Bitwise
    }

    /// True for `<<` and `>>`.
    #[must_use]
    pub fn is_shift(&self) -> bool {
        self.category() == OpCategory::Shift
    }

    /// True for the conditional operator.
    #[must_use]
    pub fn is_ite(&self) -> bool {
        *self == BuiltinOp::Ite
    }

    /// True for explicit parentheses.
    #[must_use]
    pub fn is_parenthesis(&self) -> bool {
        *self == BuiltinOp::Parenthesis
    }

    /// True for operators that may skip evaluating some operands.
    #[must_use]
    pub fn has_short_circuiting(&self) -> bool {
        matches!(self, BuiltinOp::Ite | BuiltinOp::And | BuiltinOp::Or)
    }

    /// Whether the operation itself can run inside a private circuit.
    ///
    /// For `==` and `ite` the operand types must be checked separately.
    #[must_use]
    pub fn can_be_private(&self) -> bool {
        !matches!(self, BuiltinOp::Pow | BuiltinOp::Mod | BuiltinOp::Div)
    }

    /// Operand types, `None` if the operator is generic (equality, `ite`, parentheses).
    #[must_use]
    pub fn input_types(&self) -> Option<Vec<TypeName>> {
        let t = match self.category() {
            OpCategory::Arithmetic
            | OpCategory::Comparison
            | OpCategory::Bitwise
            | OpCategory::Shift => TypeName::AnyNumber,
            OpCategory::Boolean => TypeName::Bool,
            OpCategory::Equality | OpCategory::Conditional | OpCategory::Parenthesis => {
                return None
            }
        };
        Some(vec![t; self.arity()])
    }

    /// Result type, `None` if it depends on the operands (`ite`, parentheses).
    #[must_use]
    pub fn output_type(&self) -> Option<TypeName> {
        match self.category() {
            OpCategory::Arithmetic | OpCategory::Bitwise | OpCategory::Shift => {
                Some(TypeName::AnyNumber)
            }
            OpCategory::Comparison | OpCategory::Boolean | OpCategory::Equality => {
                Some(TypeName::Bool)
            }
            OpCategory::Conditional | OpCategory::Parenthesis => None,
        }
    }

    /// Folds constant operands.
    ///
    /// Division and modulo round towards negative infinity. Returns `None` when the
    /// operands do not fit the operator (wrong count or kind), on division by zero and
    /// for exponents or shift amounts that are negative or too large.
    ///
    /// ## Arguments
    /// * `args` - Constant operands in order
    #[must_use]
    pub fn evaluate(&self, args: &[Value]) -> Option<Value> {
        use Value::{Bool, Number};

        if args.len() != self.arity() {
            return None;
        }

        let result = match (self, args) {
            (BuiltinOp::Parenthesis | BuiltinOp::SignPlus, [v]) => v.clone(),
            (BuiltinOp::SignMinus, [Number(a)]) => Number(-a),
            (BuiltinOp::BitNot, [Number(a)]) => Number(-a - 1),
            (BuiltinOp::Not, [Bool(a)]) => Bool(!a),
            (BuiltinOp::Ite, [Bool(c), t, f]) => {
                if *c {
                    t.clone()
                } else {
                    f.clone()
                }
            }
            (BuiltinOp::And, [Bool(a), Bool(b)]) => Bool(*a && *b),
            (BuiltinOp::Or, [Bool(a), Bool(b)]) => Bool(*a || *b),
            (BuiltinOp::Eq, [a, b]) => Bool(a == b),
            (BuiltinOp::Ne, [a, b]) => Bool(a != b),
            (op, [Number(a), Number(b)]) => return op.evaluate_numbers(a, b),
            _ => return None,
        };
        Some(result)
    }

    fn evaluate_numbers(&self, a: &BigInt, b: &BigInt) -> Option<Value> {
        let value = match self {
            BuiltinOp::Add => Value::Number(a + b),
            BuiltinOp::Sub => Value::Number(a - b),
            BuiltinOp::Mul => Value::Number(a * b),
            BuiltinOp::Div | BuiltinOp::Mod if b.is_zero() => return None,
            BuiltinOp::Div => Value::Number(a.div_floor(b)),
            BuiltinOp::Mod => Value::Number(a.mod_floor(b)),
            BuiltinOp::Pow => return fold_pow(a, b.to_u32()?),
            BuiltinOp::Shl => return fold_shl(a, b.to_u64()?),
            BuiltinOp::Shr => Value::Number(a >> b.to_usize()?),
            BuiltinOp::BitOr => Value::Number(a | b),
            BuiltinOp::BitAnd => Value::Number(a & b),
            BuiltinOp::BitXor => Value::Number(a ^ b),
            BuiltinOp::Lt => Value::Bool(a < b),
            BuiltinOp::Gt => Value::Bool(a > b),
            BuiltinOp::Le => Value::Bool(a <= b),
            BuiltinOp::Ge => Value::Bool(a >= b),
            _ => return None,
        };
        Some(value)
    }
}

/// Widest folded constant, in bits; wider results are left unfolded.
const MAX_FOLD_BITS: u64 = MAX_BITWIDTH as u64;

fn fold_pow(a: &BigInt, exp: u32) -> Option<Value> {
    // |a| >= 2 means |a|^exp >= 2^((bits - 1) * exp)
    if a.bits() > 1 && (a.bits() - 1).saturating_mul(u64::from(exp)) >= MAX_FOLD_BITS {
        return None;
    }
    let value = a.pow(exp);
    (value.bits() <= MAX_FOLD_BITS).then_some(Value::Number(value))
}

fn fold_shl(a: &BigInt, shift: u64) -> Option<Value> {
    if a.is_zero() {
        return Some(Value::Number(BigInt::zero()));
    }
    if a.bits().saturating_add(shift) > MAX_FOLD_BITS {
        return None;
    }
    Some(Value::Number(a << usize::try_from(shift).ok()?))
}
