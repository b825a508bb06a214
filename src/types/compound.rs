//! Compound and user-defined type names.

use crate::{
    ast::NodeId,
    types::{AnnotatedTypeName, TypeName},
};

/// A possibly qualified reference to a declared enum, struct or contract.
///
/// `target` is filled in by symbol resolution. Two resolved references are equal
/// when they resolve to the same definition; otherwise the qualified names decide.
///
/// Equality is therefore not transitive across resolution states: an unresolved
/// `Token` equals every resolved `Token`, even when those resolve to different
/// definitions. Compare references from the same resolution state, or compare
/// `target` directly, when that matters.
#[derive(Debug, Clone)]
pub struct UserDefinedType {
    /// Qualified name segments, outermost first
    pub names: Vec<String>,
    /// The definition node this name resolves to
    pub target: Option<NodeId>,
}

impl UserDefinedType {
    /// Creates a reference from its name segments.
    #[must_use]
    pub fn new(names: Vec<String>, target: Option<NodeId>) -> Self {
        Self { names, target }
    }

    /// The enum that owns this enum value: all segments but the last.
    #[must_use]
    pub fn owner(&self) -> UserDefinedType {
        let len = self.names.len().saturating_sub(1);
        UserDefinedType::new(self.names[..len].to_vec(), None)
    }

    /// True if `self`, read as an enum value, belongs to `owner`.
    #[must_use]
    pub fn is_value_of(&self, owner: &UserDefinedType) -> bool {
        !self.names.is_empty() && self.names[..self.names.len() - 1] == owner.names[..]
    }
}

impl PartialEq for UserDefinedType {
    fn eq(&self, other: &Self) -> bool {
        match (self.target, other.target) {
            (Some(a), Some(b)) => a == b,
            _ => self.names == other.names,
        }
    }
}

/// `mapping(K!label => V)`
#[derive(Debug, Clone)]
pub struct MappingType {
    /// Elementary key type
    pub key_type: TypeName,
    /// Optional ownership hint naming the key
    pub key_label: Option<String>,
    /// Value type, possibly another mapping
    pub value_type: AnnotatedTypeName,
}

impl MappingType {
    /// Creates a mapping type.
    #[must_use]
    pub fn new(key_type: TypeName, key_label: Option<String>, value_type: AnnotatedTypeName) -> Self {
        Self {
            key_type,
            key_label,
            value_type,
        }
    }

    /// True if the key carries an ownership hint.
    #[must_use]
    pub fn has_key_label(&self) -> bool {
        self.key_label.is_some()
    }

    /// Number of directly nested mappings, counting this one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.split().0
    }

    /// Flattens nested mappings into `(depth, key types, innermost value type)`.
    ///
    /// For `mapping(address => mapping(uint => bool))` this yields
    /// `(2, [address, uint], bool)`.
    #[must_use]
    pub fn split(&self) -> (usize, Vec<&TypeName>, &AnnotatedTypeName) {
        let mut keys = vec![&self.key_type];
        let mut value = &self.value_type;
        while let TypeName::Mapping(inner) = &value.type_name {
            keys.push(&inner.key_type);
            value = &inner.value_type;
        }
        (keys.len(), keys, value)
    }
}

impl PartialEq for MappingType {
    fn eq(&self, other: &Self) -> bool {
        self.key_type == other.key_type && self.value_type == other.value_type
    }
}

/// Static array length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayLength {
    /// Literal length
    Fixed(u64),
    /// Length given by a named constant, rendered verbatim
    Named(String),
}

/// `T[]` or `T[n]`
#[derive(Debug, Clone)]
pub struct ArrayType {
    /// Element type
    pub value_type: AnnotatedTypeName,
    /// Static length, `None` for dynamic arrays
    pub length: Option<ArrayLength>,
}

impl ArrayType {
    /// Creates an array type.
    #[must_use]
    pub fn new(value_type: AnnotatedTypeName, length: Option<ArrayLength>) -> Self {
        Self { value_type, length }
    }
}

impl PartialEq for ArrayType {
    fn eq(&self, other: &Self) -> bool {
        if self.value_type != other.value_type {
            return false;
        }
        match (&self.length, &other.length) {
            (None, None) => true,
            (Some(ArrayLength::Fixed(a)), Some(ArrayLength::Fixed(b))) => a == b,
            _ => false,
        }
    }
}

/// Ordered list of annotated types used for multi-value expressions.
#[derive(Debug, Clone, Default)]
pub struct TupleType {
    /// Component types
    pub types: Vec<AnnotatedTypeName>,
}

impl TupleType {
    /// Creates a tuple from its components.
    #[must_use]
    pub fn new(types: Vec<AnnotatedTypeName>) -> Self {
        Self { types }
    }

    /// The zero-component tuple.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True for the empty tuple.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Wraps a non-tuple type into a one-element tuple; `None` becomes the empty tuple.
    ///
    /// ## Arguments
    /// * `t` - The type to wrap
    #[must_use]
    pub fn ensure_tuple(t: Option<AnnotatedTypeName>) -> AnnotatedTypeName {
        match t {
            None => AnnotatedTypeName::new(TypeName::Tuple(TupleType::empty()), None),
            Some(t) if matches!(t.type_name, TypeName::Tuple(_)) => t,
            Some(t) => AnnotatedTypeName::new(TypeName::Tuple(TupleType::new(vec![t])), None),
        }
    }

    /// Applies `f` to each component pair; false if `other` is not a tuple of equal length.
    ///
    /// ## Arguments
    /// * `other` - The type to compare against
    /// * `f` - Pairwise predicate
    pub fn check_component_wise<F>(&self, other: &TypeName, f: F) -> bool
    where
        F: Fn(&AnnotatedTypeName, &AnnotatedTypeName) -> bool,
    {
        match other {
            TypeName::Tuple(other) => {
                self.len() == other.len()
                    && self.types.iter().zip(&other.types).all(|(a, b)| f(a, b))
            }
            _ => false,
        }
    }

    /// True if every component carries exactly the same privacy annotation as its
    /// counterpart in `other`.
    #[must_use]
    pub fn perfect_privacy_match(&self, other: &TypeName) -> bool {
        self.check_component_wise(other, |a, b| a.privacy == b.privacy)
    }
}

impl PartialEq for TupleType {
    fn eq(&self, other: &Self) -> bool {
        self.types == other.types
    }
}

/// Type of a function symbol.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionType {
    /// Parameter types in declaration order
    pub parameters: Vec<AnnotatedTypeName>,
    /// Bare modifier keywords (`view`, `payable`, ...)
    pub modifiers: Vec<String>,
    /// Return parameter types
    pub returns: Vec<AnnotatedTypeName>,
}
