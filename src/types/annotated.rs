//! Privacy-annotated types and label combination.
//!
//! Every value type is paired with a privacy label naming who may see the plain
//! value. Four labels exist:
//!
//! - `all`: public
//! - `me`: private to the caller
//! - `tee`: private to the trusted execution environment
//! - a named identifier: private to the address held by that declaration
//!
//! Label combination consults a [`PartitionOracle`] supplied by the alias analysis,
//! which knows whether two distinct labels are provably owned by the same party at
//! the current program point.

use crate::{
    ast::NodeId,
    types::{ArrayLength, ArrayType, TypeName},
};

/// A privacy label as written in source.
///
/// `All`, `Me` and `Tee` are context-free tags. `Named` labels compare by the
/// declaration they resolve to; unresolved labels fall back to their name.
#[derive(Debug, Clone)]
pub enum PrivacyAnnotation {
    /// Public
    All,
    /// Private to the caller
    Me,
    /// Private to the trusted execution environment
    Tee,
    /// Private to the owner named by a declaration
    Named {
        /// Identifier as written
        name: String,
        /// Declaration the identifier resolves to
        target: Option<NodeId>,
    },
    /// Per-component labels of a tuple, only present while type checking
    Components(Vec<PrivacyAnnotation>),
}

impl PartialEq for PrivacyAnnotation {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PrivacyAnnotation::All, PrivacyAnnotation::All)
            | (PrivacyAnnotation::Me, PrivacyAnnotation::Me)
            | (PrivacyAnnotation::Tee, PrivacyAnnotation::Tee) => true,
            (
                PrivacyAnnotation::Named { name: a, target: ta },
                PrivacyAnnotation::Named { name: b, target: tb },
            ) => match (ta, tb) {
                (Some(ta), Some(tb)) => ta == tb,
                _ => a == b,
            },
            (PrivacyAnnotation::Components(a), PrivacyAnnotation::Components(b)) => a == b,
            _ => false,
        }
    }
}

impl PrivacyAnnotation {
    /// Named label that has not been resolved yet.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        PrivacyAnnotation::Named {
            name: name.into(),
            target: None,
        }
    }

    /// Canonical key of this label, `None` if it does not denote a concrete owner.
    #[must_use]
    pub fn label(&self) -> Option<LabelKey> {
        match self {
            PrivacyAnnotation::All => Some(LabelKey::Public),
            PrivacyAnnotation::Me => Some(LabelKey::Caller),
            PrivacyAnnotation::Tee => Some(LabelKey::Tee),
            PrivacyAnnotation::Named { target, .. } => target.map(LabelKey::Owner),
            PrivacyAnnotation::Components(_) => None,
        }
    }

    /// `all`
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, PrivacyAnnotation::All)
    }

    /// `me`
    #[must_use]
    pub fn is_me(&self) -> bool {
        matches!(self, PrivacyAnnotation::Me)
    }

    /// `tee`
    #[must_use]
    pub fn is_tee(&self) -> bool {
        matches!(self, PrivacyAnnotation::Tee)
    }
}

/// Hashable identity of a resolved privacy label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKey {
    /// `all`
    Public,
    /// `me`
    Caller,
    /// `tee`
    Tee,
    /// Owner named by the declaration
    Owner(NodeId),
}

/// Answers whether two labels are provably co-owned in the current context.
///
/// Implemented by the alias analysis. The oracle is read-only for the duration of
/// a single combination query.
pub trait PartitionOracle {
    /// True if `a` and `b` are known to denote the same owner.
    fn same_partition(&self, a: &LabelKey, b: &LabelKey) -> bool;
}

impl<F> PartitionOracle for F
where
    F: Fn(&LabelKey, &LabelKey) -> bool,
{
    fn same_partition(&self, a: &LabelKey, b: &LabelKey) -> bool {
        self(a, b)
    }
}

/// Result of [`AnnotatedTypeName::combined_privacy`].
#[derive(Debug, Clone, PartialEq)]
pub enum CombinedPrivacy {
    /// The label of the combination
    Label(PrivacyAnnotation),
    /// Component-wise results for tuple types; `None` marks a failed component
    Components(Vec<Option<CombinedPrivacy>>),
}

/// Outcome of checking an expression's type against an expected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conformance {
    /// The value may be used as is
    Yes,
    /// The data types or the labels are incompatible
    No,
    /// The value is public but expected private and needs a reclassification
    MakePrivate,
}

/// A type paired with its privacy label.
///
/// `had_annotation` records whether the label was written in source; the generator
/// only prints labels that were. Equality ignores it.
#[derive(Debug, Clone)]
pub struct AnnotatedTypeName {
    /// The data type
    pub type_name: TypeName,
    /// The privacy label, `all` unless given
    pub privacy: PrivacyAnnotation,
    /// Whether the label was written explicitly
    pub had_annotation: bool,
}

impl PartialEq for AnnotatedTypeName {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.privacy == other.privacy
    }
}

impl AnnotatedTypeName {
    /// Creates an annotated type; a missing label defaults to public.
    ///
    /// ## Arguments
    /// * `type_name` - The data type
    /// * `privacy` - The explicitly written label, if any
    #[must_use]
    pub fn new(type_name: TypeName, privacy: Option<PrivacyAnnotation>) -> Self {
        let had_annotation = privacy.is_some();
        Self {
            type_name,
            privacy: privacy.unwrap_or(PrivacyAnnotation::All),
            had_annotation,
        }
    }

    /// `T@all`
    #[must_use]
    pub fn all(type_name: TypeName) -> Self {
        Self::new(type_name, Some(PrivacyAnnotation::All))
    }

    /// `T@me`
    #[must_use]
    pub fn me(type_name: TypeName) -> Self {
        Self::new(type_name, Some(PrivacyAnnotation::Me))
    }

    /// Public `uint` without a written label.
    #[must_use]
    pub fn uint_all() -> Self {
        Self::new(TypeName::uint(), None)
    }

    /// Public `bool` without a written label.
    #[must_use]
    pub fn bool_all() -> Self {
        Self::new(TypeName::Bool, None)
    }

    /// Public `address` without a written label.
    #[must_use]
    pub fn address_all() -> Self {
        Self::new(TypeName::Address, None)
    }

    /// Wraps `value_type` into nested public fixed-size arrays, innermost length first.
    ///
    /// ## Arguments
    /// * `value_type` - Element type
    /// * `lengths` - Array lengths
    #[must_use]
    pub fn array_all(value_type: AnnotatedTypeName, lengths: &[u64]) -> Self {
        lengths.iter().fold(value_type, |inner, &len| {
            Self::new(
                TypeName::Array(Box::new(ArrayType::new(inner, Some(ArrayLength::Fixed(len))))),
                None,
            )
        })
    }

    /// True if the label is `all`.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.privacy.is_all()
    }

    /// True if the label is anything but `all`.
    #[must_use]
    pub fn is_private(&self) -> bool {
        !self.is_public()
    }

    /// True for `address` and `address payable`.
    #[must_use]
    pub fn is_address(&self) -> bool {
        self.type_name.is_address()
    }

    /// Label under which a value of this type may be used where `other` is expected.
    ///
    /// Tuples combine component-wise. Scalars succeed with this label when both
    /// labels are equal or co-owned according to `oracle`. A public value adopts
    /// `other`'s label. Everything else fails with `None`.
    ///
    /// ## Arguments
    /// * `oracle` - Co-ownership facts for the current program point, if available
    /// * `other` - The expected type
    #[must_use]
    pub fn combined_privacy(
        &self,
        oracle: Option<&dyn PartitionOracle>,
        other: &AnnotatedTypeName,
    ) -> Option<CombinedPrivacy> {
        if let TypeName::Tuple(own) = &self.type_name {
            let TypeName::Tuple(theirs) = &other.type_name else {
                return None;
            };
            if own.len() != theirs.len() {
                return None;
            }
            return Some(CombinedPrivacy::Components(
                own.types
                    .iter()
                    .zip(&theirs.types)
                    .map(|(a, b)| a.combined_privacy(oracle, b))
                    .collect(),
            ));
        }

        let expected = other.privacy.label()?;
        let actual = self.privacy.label()?;
        let co_owned = oracle.is_some_and(|o| o.same_partition(&expected, &actual));

        if expected == actual || co_owned {
            Some(CombinedPrivacy::Label(self.privacy.clone()))
        } else if self.privacy.is_all() {
            Some(CombinedPrivacy::Label(other.privacy.clone()))
        } else {
            None
        }
    }

    /// Checks a value of this type against `expected`.
    ///
    /// Unlike [`AnnotatedTypeName::combined_privacy`], a public value expected to be
    /// private is reported as [`Conformance::MakePrivate`] rather than silently
    /// adopting the stricter label.
    ///
    /// ## Arguments
    /// * `expected` - The expected type
    /// * `oracle` - Co-ownership facts for the current program point, if available
    #[must_use]
    pub fn conforms_to(
        &self,
        expected: &AnnotatedTypeName,
        oracle: Option<&dyn PartitionOracle>,
    ) -> Conformance {
        if !self.type_name.implicitly_convertible_to(&expected.type_name) {
            return Conformance::No;
        }

        match self.combined_privacy(oracle, expected) {
            None => Conformance::No,
            Some(CombinedPrivacy::Components(components)) => {
                let TypeName::Tuple(own) = &self.type_name else {
                    return Conformance::No;
                };
                let exact = components.len() == own.len()
                    && components.iter().zip(&own.types).all(|(c, t)| {
                        matches!(c, Some(CombinedPrivacy::Label(p)) if *p == t.privacy)
                    });
                if exact {
                    Conformance::Yes
                } else {
                    Conformance::No
                }
            }
            Some(CombinedPrivacy::Label(label)) => {
                if label.label() == self.privacy.label() {
                    Conformance::Yes
                } else {
                    Conformance::MakePrivate
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TupleType;

    fn owned_by(id: usize) -> PrivacyAnnotation {
        PrivacyAnnotation::Named {
            name: format!("owner{id}"),
            target: Some(NodeId(id)),
        }
    }

    fn never(_: &LabelKey, _: &LabelKey) -> bool {
        false
    }

    fn always(_: &LabelKey, _: &LabelKey) -> bool {
        true
    }

    #[test]
    fn test_default_label_is_public() {
        let t = AnnotatedTypeName::new(TypeName::uint(), None);
        assert!(t.is_public());
        assert!(!t.had_annotation);
        assert!(AnnotatedTypeName::all(TypeName::uint()).had_annotation);
        assert_eq!(t, AnnotatedTypeName::all(TypeName::uint()));
    }

    #[test]
    fn test_label_equality() {
        assert_eq!(owned_by(3), owned_by(3));
        assert_ne!(owned_by(3), owned_by(4));
        assert_eq!(PrivacyAnnotation::named("x"), PrivacyAnnotation::named("x"));
        assert_ne!(PrivacyAnnotation::Me, PrivacyAnnotation::Tee);
        assert_eq!(PrivacyAnnotation::named("x").label(), None);
        assert_eq!(owned_by(3).label(), Some(LabelKey::Owner(NodeId(3))));
    }

    #[test]
    fn test_public_yields_to_caller() {
        let public = AnnotatedTypeName::uint_all();
        let caller = AnnotatedTypeName::me(TypeName::uint());
        assert_eq!(
            public.combined_privacy(None, &caller),
            Some(CombinedPrivacy::Label(PrivacyAnnotation::Me))
        );
        assert_eq!(caller.combined_privacy(None, &public), None);
    }

    #[test]
    fn test_equal_labels_combine() {
        let a = AnnotatedTypeName::new(TypeName::uint(), Some(owned_by(1)));
        let b = AnnotatedTypeName::new(TypeName::Bool, Some(owned_by(1)));
        assert_eq!(
            a.combined_privacy(Some(&never), &b),
            Some(CombinedPrivacy::Label(owned_by(1)))
        );
    }

    #[test]
    fn test_distinct_owners_need_oracle() {
        let a = AnnotatedTypeName::new(TypeName::uint(), Some(owned_by(1)));
        let b = AnnotatedTypeName::new(TypeName::uint(), Some(owned_by(2)));
        assert_eq!(a.combined_privacy(Some(&never), &b), None);
        assert_eq!(a.combined_privacy(None, &b), None);
        assert_eq!(
            a.combined_privacy(Some(&always), &b),
            Some(CombinedPrivacy::Label(owned_by(1)))
        );
    }

    #[test]
    fn test_unresolved_label_fails() {
        let a = AnnotatedTypeName::new(TypeName::uint(), Some(PrivacyAnnotation::named("x")));
        let b = AnnotatedTypeName::uint_all();
        assert_eq!(a.combined_privacy(None, &b), None);
        assert_eq!(b.combined_privacy(None, &a), None);
    }

    #[test]
    fn test_tuple_combination_is_component_wise() {
        let actual = AnnotatedTypeName::new(
            TypeName::Tuple(TupleType::new(vec![
                AnnotatedTypeName::uint_all(),
                AnnotatedTypeName::me(TypeName::uint()),
            ])),
            None,
        );
        let expected = AnnotatedTypeName::new(
            TypeName::Tuple(TupleType::new(vec![
                AnnotatedTypeName::me(TypeName::uint()),
                AnnotatedTypeName::uint_all(),
            ])),
            None,
        );
        assert_eq!(
            actual.combined_privacy(None, &expected),
            Some(CombinedPrivacy::Components(vec![
                Some(CombinedPrivacy::Label(PrivacyAnnotation::Me)),
                None,
            ]))
        );
    }

    #[test]
    fn test_conformance() {
        let public = AnnotatedTypeName::uint_all();
        let caller = AnnotatedTypeName::me(TypeName::uint());
        assert_eq!(public.conforms_to(&public, None), Conformance::Yes);
        assert_eq!(public.conforms_to(&caller, None), Conformance::MakePrivate);
        assert_eq!(caller.conforms_to(&public, None), Conformance::No);
        assert_eq!(
            AnnotatedTypeName::bool_all().conforms_to(&public, None),
            Conformance::No
        );
    }

    #[test]
    fn test_tuple_conformance() {
        let mixed = AnnotatedTypeName::new(
            TypeName::Tuple(TupleType::new(vec![
                AnnotatedTypeName::uint_all(),
                AnnotatedTypeName::me(TypeName::uint()),
            ])),
            None,
        );
        assert_eq!(mixed.conforms_to(&mixed.clone(), None), Conformance::Yes);

        let private = AnnotatedTypeName::new(
            TypeName::Tuple(TupleType::new(vec![
                AnnotatedTypeName::me(TypeName::uint()),
                AnnotatedTypeName::me(TypeName::uint()),
            ])),
            None,
        );
        assert_eq!(mixed.conforms_to(&private, None), Conformance::No);
    }

    #[test]
    fn test_array_all_nests() {
        let t = AnnotatedTypeName::array_all(AnnotatedTypeName::uint_all(), &[2, 3]);
        let TypeName::Array(outer) = &t.type_name else {
            panic!("expected array");
        };
        assert_eq!(outer.length, Some(ArrayLength::Fixed(3)));
        let TypeName::Array(inner) = &outer.value_type.type_name else {
            panic!("expected nested array");
        };
        assert_eq!(inner.length, Some(ArrayLength::Fixed(2)));
    }
}
