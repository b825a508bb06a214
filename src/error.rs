use thiserror::Error;

macro_rules! internal_error {
    // Format string, possibly capturing variables inline
    ($msg:literal) => {
        crate::Error::Internal {
            message: format!($msg),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:literal, $($arg:tt)*) => {
        crate::Error::Internal {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Faults raised here are synchronous and local: the surrounding pipeline decides whether to
/// abort the run or continue with the next unit. Type conversion and privacy-label combination
/// never produce an [`Error`]; they report failure through their return values and leave the
/// decision to surface a user-facing error to the checker.
///
/// # Error Categories
///
/// ## Construction Errors
/// - [`Error::UnknownOperator`] - Operator symbol outside the builtin catalog
/// - [`Error::UnknownKeyword`] - Declaration keyword outside the supported set
/// - [`Error::ReservedIdentifier`] - Identifier collides with compiler-reserved names
/// - [`Error::MultipleConstructors`] - Constructor overloading is not supported
///
/// ## Analysis Errors
/// - [`Error::UnsupportedLocation`] - Expression shape has no instance-target identity
/// - [`Error::InvalidRewrite`] - A rewrite result does not fit the rewritten field
/// - [`Error::Ast`] - Fault attached to a node, carrying a positional source excerpt
///
/// ## Generation Errors
/// - [`Error::Internal`] - Programming error inside the compiler core
/// - [`Error::Reparse`] - The front end rejected rendered text during a clone
///
/// # Examples
///
/// ```rust
/// use privir::{ast::BuiltinOp, Error};
///
/// match BuiltinOp::from_symbol("<>") {
///     Ok(op) => println!("operator {op}"),
///     Err(Error::UnknownOperator(symbol)) => assert_eq!(symbol, "<>"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An internal invariant of the compiler core was violated.
    ///
    /// This is always a programming error (for example a node that has no standalone
    /// rendering rule was handed to the generator) and is never caused by user input.
    ///
    /// # Fields
    ///
    /// * `message` - Description of the violated invariant
    /// * `file` - Source file where the fault was detected
    /// * `line` - Source line where the fault was detected
    #[error("Internal - {file}:{line}: {message}")]
    Internal {
        /// The message to be printed for the Internal error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The operator symbol is not part of the builtin operator catalog.
    #[error("{0} is not a known built-in operator")]
    UnknownOperator(String),

    /// The declaration keyword is not supported.
    #[error("{0} is not a supported declaration keyword")]
    UnknownKeyword(String),

    /// An identifier uses a reserved prefix or suffix.
    #[error("Identifier '{name}' {reason}")]
    ReservedIdentifier {
        /// The offending identifier
        name: String,
        /// Which reservation it collides with
        reason: String,
    },

    /// A contract declares more than one constructor.
    ///
    /// Constructor overloading is unsupported; the associated value is the contract name.
    #[error("Multiple constructors exist in contract '{0}'")]
    MultipleConstructors(String),

    /// The expression cannot be canonicalized into an instance target.
    ///
    /// Only identifiers, member accesses on identifiers and index expressions whose
    /// left-most base is an identifier denote assignable locations.
    #[error("Not a supported location - {0}")]
    UnsupportedLocation(String),

    /// A rewrite transform returned a result the rewritten field cannot hold.
    ///
    /// Sequences and deletions are only meaningful inside statement lists and
    /// optional fields.
    #[error("Invalid rewrite - {0}")]
    InvalidRewrite(String),

    /// Error attached to a specific node.
    ///
    /// The message already contains the positional excerpt produced by
    /// [`crate::ast::Ast::exception_message`].
    #[error("{0}")]
    Ast(String),

    /// The front end failed to reparse rendered text while cloning a subtree.
    #[error("Failed to reparse rendered code - {0}")]
    Reparse(String),
}

