//! Type names, implicit conversion and type combination.
//!
//! This module implements the closed variant set of data types the compiler reasons
//! about, together with the privacy-annotation layer that pairs every type with an
//! owner label.
//!
//! # Architecture
//!
//! ```text
//! TypeName ───────────── value enum, never mutated after construction
//!   ├── literal ──────── NumericType, literal widths and range tests
//!   ├── compound ─────── Mapping, Array, Tuple, Function, user-defined names
//!   └── annotated ────── AnnotatedTypeName = (TypeName, PrivacyAnnotation)
//!                        label combination against a PartitionOracle
//! ```
//!
//! Conversion and combination never fail with an [`crate::Error`]. They answer with
//! `bool`, [`CombinedType`] or [`annotated::Conformance`] and leave the decision to
//! report a user-facing error to the type checker.
//!
//! # Conversion rules
//!
//! - Every type converts to itself.
//! - A number literal converts to any numeric type that can represent its value, and
//!   to `address` when it is non-negative and exactly 160 bits wide.
//! - Signed widens to signed of at least the same width, unsigned to unsigned.
//! - `address payable` converts to `address`.
//! - Boolean literals convert to `bool`; enum values convert to their enum.
//! - Tuples convert component-wise when their lengths match.
//!
//! # Examples
//!
//! ```rust
//! use num_bigint::BigInt;
//! use privir::types::{NumericType, TypeName};
//!
//! let int8 = TypeName::Numeric(NumericType::int(Some(8)));
//! assert!(TypeName::NumberLiteral(BigInt::from(127)).implicitly_convertible_to(&int8));
//! assert!(!TypeName::NumberLiteral(BigInt::from(128)).implicitly_convertible_to(&int8));
//! ```

pub mod annotated;
pub mod compound;
pub mod literal;

pub use annotated::{
    AnnotatedTypeName, CombinedPrivacy, Conformance, LabelKey, PartitionOracle,
    PrivacyAnnotation,
};
pub use compound::{ArrayLength, ArrayType, FunctionType, MappingType, TupleType, UserDefinedType};
pub use literal::{literal_bitwidth, NumericType};

use num_bigint::BigInt;
use num_traits::Signed;

/// Size reported by [`TypeName::size_in_uints`] for arrays of unknown length.
pub const UNKNOWN_SIZE: i64 = -1;

/// A data type.
///
/// Equality is structural, except for the rules documented on the compound types:
/// mapping equality ignores the key label, array equality requires equal lengths or
/// both lengths unknown, and user-defined types compare by resolved definition.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeName {
    /// `bool`
    Bool,
    /// `address`
    Address,
    /// `address payable`
    AddressPayable,
    /// `bytes` (dynamic, `None`) or `bytesN`
    Bytes(Option<u8>),
    /// `string`
    String,
    /// `int`, `intN`, `uint`, `uintN`
    Numeric(NumericType),
    /// Generic operand type of builtin operators; every numeric type converts into it
    AnyNumber,
    /// Type of a `true`/`false` literal
    BooleanLiteral(bool),
    /// Type of a number literal, carrying its value
    NumberLiteral(BigInt),
    /// A declared enum
    Enum(UserDefinedType),
    /// A single value of a declared enum; its names end with the value name
    EnumValue(UserDefinedType),
    /// A declared struct
    Struct(UserDefinedType),
    /// A declared contract
    Contract(UserDefinedType),
    /// `mapping(K => V)`
    Mapping(Box<MappingType>),
    /// `T[]` or `T[n]`
    Array(Box<ArrayType>),
    /// Multi-value type, never written in source
    Tuple(TupleType),
    /// Type of a function symbol
    Function(Box<FunctionType>),
}

/// Outcome of [`TypeName::combined_type`].
#[derive(Debug, Clone, PartialEq)]
pub enum CombinedType {
    /// The common type both operands convert into
    Type(TypeName),
    /// Both operands are literals and the caller asked to defer widening
    Literal,
    /// Component-wise result for two tuples of equal length
    Tuple(Vec<CombinedType>),
    /// Neither operand converts into the other
    NoCommonType,
}

impl CombinedType {
    /// The common type, if one was found.
    #[must_use]
    pub fn into_type(self) -> Option<TypeName> {
        match self {
            CombinedType::Type(t) => Some(t),
            _ => None,
        }
    }
}

impl TypeName {
    /// `uint`
    #[must_use]
    pub const fn uint() -> Self {
        TypeName::Numeric(NumericType::uint(None))
    }

    /// `int`
    #[must_use]
    pub const fn int() -> Self {
        TypeName::Numeric(NumericType::int(None))
    }

    /// Resolves an elementary type spelling such as `uint8`, `bytes32` or `address payable`.
    ///
    /// ## Arguments
    /// * `name` - The source spelling
    #[must_use]
    pub fn from_elementary(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(TypeName::Bool),
            "address" => Some(TypeName::Address),
            "address payable" => Some(TypeName::AddressPayable),
            "string" => Some(TypeName::String),
            "bytes" => Some(TypeName::Bytes(None)),
            _ => {
                if let Some(digits) = name.strip_prefix("bytes") {
                    let width: u8 = digits.parse().ok()?;
                    return (1..=32).contains(&width).then_some(TypeName::Bytes(Some(width)));
                }
                NumericType::from_name(name).map(TypeName::Numeric)
            }
        }
    }

    /// `uint[]`, a dynamic array of public unsigned integers.
    #[must_use]
    pub fn dyn_uint_array() -> Self {
        TypeName::Array(Box::new(ArrayType::new(AnnotatedTypeName::uint_all(), None)))
    }

    /// Pairs this type with a privacy annotation.
    ///
    /// Tuples distribute the annotation: a [`PrivacyAnnotation::Components`] list is
    /// applied element by element, any other label is applied to every component.
    ///
    /// ## Arguments
    /// * `privacy` - The annotation to attach
    #[must_use]
    pub fn annotate(self, privacy: PrivacyAnnotation) -> AnnotatedTypeName {
        match self {
            TypeName::Tuple(tuple) => {
                let types = match privacy {
                    PrivacyAnnotation::Components(labels) => tuple
                        .types
                        .into_iter()
                        .zip(labels)
                        .map(|(t, p)| t.type_name.annotate(p))
                        .collect(),
                    label => tuple
                        .types
                        .into_iter()
                        .map(|t| t.type_name.annotate(label.clone()))
                        .collect(),
                };
                AnnotatedTypeName::new(TypeName::Tuple(TupleType::new(types)), None)
            }
            other => AnnotatedTypeName::new(other, Some(privacy)),
        }
    }

    /// Number of field elements this type occupies when serialized.
    ///
    /// Arrays of unknown length report [`UNKNOWN_SIZE`].
    #[must_use]
    pub fn size_in_uints(&self) -> i64 {
        match self {
            TypeName::Array(array) => match &array.length {
                Some(ArrayLength::Fixed(n)) => i64::try_from(*n).unwrap_or(i64::MAX),
                _ => UNKNOWN_SIZE,
            },
            _ => 1,
        }
    }

    /// Bit width of a primitive type, or of an array's element type.
    ///
    /// Returns `None` for types without a defined width (`string`, dynamic `bytes`,
    /// structs, mappings, ...).
    #[must_use]
    pub fn elem_bitwidth(&self) -> Option<u16> {
        match self {
            TypeName::Bool | TypeName::BooleanLiteral(_) => Some(1),
            TypeName::Numeric(n) => Some(n.elem_bitwidth()),
            TypeName::AnyNumber | TypeName::Enum(_) | TypeName::EnumValue(_) => {
                Some(literal::MAX_BITWIDTH)
            }
            TypeName::NumberLiteral(v) => Some(literal_bitwidth(v)),
            TypeName::Address | TypeName::AddressPayable => Some(160),
            TypeName::Bytes(Some(n)) => Some(u16::from(*n) * 8),
            TypeName::Array(array) => array.value_type.type_name.elem_bitwidth(),
            _ => None,
        }
    }

    /// Literal types: number literals, boolean literals and enum values.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TypeName::NumberLiteral(_) | TypeName::BooleanLiteral(_) | TypeName::EnumValue(_)
        )
    }

    /// `address` or `address payable`.
    #[must_use]
    pub fn is_address(&self) -> bool {
        matches!(self, TypeName::Address | TypeName::AddressPayable)
    }

    /// Elementary types, enums, enum values and addresses.
    #[must_use]
    pub fn is_primitive_type(&self) -> bool {
        matches!(
            self,
            TypeName::Bool
                | TypeName::Address
                | TypeName::AddressPayable
                | TypeName::Bytes(_)
                | TypeName::String
                | TypeName::Numeric(_)
                | TypeName::AnyNumber
                | TypeName::BooleanLiteral(_)
                | TypeName::NumberLiteral(_)
                | TypeName::Enum(_)
                | TypeName::EnumValue(_)
        )
    }

    /// Integer types, the generic number type and number literals.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeName::Numeric(_) | TypeName::AnyNumber | TypeName::NumberLiteral(_)
        )
    }

    /// `bool` or a boolean literal.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, TypeName::Bool | TypeName::BooleanLiteral(_))
    }

    /// Signed integer types and negative number literals.
    #[must_use]
    pub fn is_signed_numeric(&self) -> bool {
        match self {
            TypeName::Numeric(n) => n.signed,
            TypeName::AnyNumber => true,
            TypeName::NumberLiteral(v) => v.is_negative(),
            _ => false,
        }
    }

    /// `mapping(...)`
    #[must_use]
    pub fn is_mapping(&self) -> bool {
        matches!(self, TypeName::Mapping(_))
    }

    /// Whether values of this type may carry a private label.
    ///
    /// Only primitive types qualify, and full-width signed integers are excluded since
    /// they cannot be embedded in the proof field.
    #[must_use]
    pub fn can_be_private(&self) -> bool {
        self.is_primitive_type()
            && !(self.is_signed_numeric() && self.elem_bitwidth() == Some(literal::MAX_BITWIDTH))
    }

    /// Widens a literal type to the smallest concrete type able to represent it.
    ///
    /// Non-literal types are returned unchanged.
    #[must_use]
    pub fn to_abstract_type(&self) -> TypeName {
        match self {
            TypeName::NumberLiteral(v) => TypeName::Numeric(literal::literal_abstract_type(v)),
            TypeName::BooleanLiteral(_) => TypeName::Bool,
            TypeName::EnumValue(value) => TypeName::Enum(value.owner()),
            other => other.clone(),
        }
    }

    /// Implicit conversion test.
    ///
    /// ## Arguments
    /// * `expected` - The type a value of this type is used as
    #[must_use]
    pub fn implicitly_convertible_to(&self, expected: &TypeName) -> bool {
        match (self, expected) {
            (TypeName::Tuple(actual), _) => actual.check_component_wise(expected, |x, y| {
                x.type_name.implicitly_convertible_to(&y.type_name)
            }),
            (TypeName::NumberLiteral(value), _) => {
                if self == expected {
                    return true;
                }
                match expected {
                    TypeName::Numeric(n) => n.can_represent(value),
                    TypeName::AnyNumber => literal::can_represent(true, literal::MAX_BITWIDTH, value),
                    TypeName::Address | TypeName::AddressPayable => {
                        !value.is_negative() && literal_bitwidth(value) == 160
                    }
                    _ => false,
                }
            }
            (TypeName::BooleanLiteral(_), TypeName::Bool) => true,
            (TypeName::EnumValue(value), TypeName::Enum(owner)) => value.is_value_of(owner),
            (TypeName::AddressPayable, TypeName::Address) => true,
            (TypeName::Numeric(actual), TypeName::Numeric(target)) => {
                actual == target
                    || (actual.signed == target.signed
                        && target.elem_bitwidth() >= actual.elem_bitwidth())
            }
            (TypeName::Numeric(_), TypeName::AnyNumber) => true,
            _ => self == expected,
        }
    }

    /// True if either type converts into the other.
    ///
    /// ## Arguments
    /// * `other` - The type to compare against
    #[must_use]
    pub fn compatible_with(&self, other: &TypeName) -> bool {
        match (self, other) {
            (TypeName::Tuple(a), _) => {
                a.check_component_wise(other, |x, y| x.type_name.compatible_with(&y.type_name))
            }
            _ => self.implicitly_convertible_to(other) || other.implicitly_convertible_to(self),
        }
    }

    /// The type both operands convert into.
    ///
    /// Two literals of the same kind either stay literal ([`CombinedType::Literal`],
    /// when `convert_literals` is false) or are widened to their abstract types first.
    ///
    /// ## Arguments
    /// * `other` - The second operand's type
    /// * `convert_literals` - Whether to widen two literal operands before combining
    #[must_use]
    pub fn combined_type(&self, other: &TypeName, convert_literals: bool) -> CombinedType {
        match (self, other) {
            (TypeName::Tuple(a), TypeName::Tuple(b)) => {
                if a.len() != b.len() {
                    return CombinedType::NoCommonType;
                }
                CombinedType::Tuple(
                    a.types
                        .iter()
                        .zip(&b.types)
                        .map(|(x, y)| x.type_name.combined_type(&y.type_name, convert_literals))
                        .collect(),
                )
            }
            (TypeName::Tuple(_), _) => CombinedType::NoCommonType,
            (TypeName::NumberLiteral(_), TypeName::NumberLiteral(_))
            | (TypeName::BooleanLiteral(_), TypeName::BooleanLiteral(_)) => {
                if convert_literals {
                    self.to_abstract_type()
                        .combined_type(&other.to_abstract_type(), convert_literals)
                } else {
                    CombinedType::Literal
                }
            }
            _ => {
                if other.implicitly_convertible_to(self) {
                    CombinedType::Type(self.clone())
                } else if self.implicitly_convertible_to(other) {
                    CombinedType::Type(other.clone())
                } else {
                    CombinedType::NoCommonType
                }
            }
        }
    }

    /// Source spelling of an elementary type, `None` for other variants.
    #[must_use]
    pub fn elementary_name(&self) -> Option<String> {
        match self {
            TypeName::Bool => Some("bool".to_string()),
            TypeName::Address => Some("address".to_string()),
            TypeName::AddressPayable => Some("address payable".to_string()),
            TypeName::String => Some("string".to_string()),
            TypeName::Bytes(None) => Some("bytes".to_string()),
            TypeName::Bytes(Some(n)) => Some(format!("bytes{n}")),
            TypeName::Numeric(n) => Some(n.to_string()),
            TypeName::AnyNumber => Some("uint".to_string()),
            TypeName::BooleanLiteral(b) => Some(b.to_string()),
            TypeName::NumberLiteral(v) => Some(v.to_string()),
            _ => None,
        }
    }
}
