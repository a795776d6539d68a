use core::cmp::Ordering;

use crate::accessor::{AttributeAccessor, ChoiceIdentifierAccessor, ElementAccessor};
use crate::accessor::{TextAccessor, XmlSchemaForm, XmlnsAccessor};
use crate::meta::TypeRef;
use crate::model::SpecifiedMode;

// -----------------------------------------------------------------------------
// MemberMapping

/// Binds one struct member to its XML surface points.
///
/// A member is exactly one of {attribute, text, particle, capture}: the
/// classification is derived from which accessor slots are non-empty, and
/// the resolver never fills conflicting slots. Particle members may carry
/// several element accessors, forming a choice set for polymorphic or
/// union-typed members.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberMapping {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) elements: Vec<ElementAccessor>,
    pub(crate) attribute: Option<AttributeAccessor>,
    pub(crate) text: Option<TextAccessor>,
    pub(crate) choice: Option<ChoiceIdentifierAccessor>,
    pub(crate) xmlns: Option<XmlnsAccessor>,
    pub(crate) sequence_id: Option<u32>,
    pub(crate) specified: SpecifiedMode,
    pub(crate) should_persist: bool,
}

impl MemberMapping {
    /// Returns the member name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared member type.
    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    /// Returns the element accessors (the choice set), most-derived
    /// alternatives first.
    #[inline]
    pub fn elements(&self) -> &[ElementAccessor] {
        &self.elements
    }

    /// Returns the attribute accessor.
    #[inline]
    pub const fn attribute(&self) -> Option<&AttributeAccessor> {
        self.attribute.as_ref()
    }

    /// Returns the text accessor.
    #[inline]
    pub const fn text(&self) -> Option<&TextAccessor> {
        self.text.as_ref()
    }

    /// Returns the choice-discriminator accessor.
    #[inline]
    pub const fn choice(&self) -> Option<&ChoiceIdentifierAccessor> {
        self.choice.as_ref()
    }

    /// Returns the namespace-declarations capture accessor.
    #[inline]
    pub const fn xmlns(&self) -> Option<&XmlnsAccessor> {
        self.xmlns.as_ref()
    }

    /// Explicit sequence position, when one was requested.
    #[inline]
    pub const fn sequence_id(&self) -> Option<u32> {
        self.sequence_id
    }

    /// The specified-companion mode carried over from the field model.
    #[inline]
    pub const fn specified(&self) -> SpecifiedMode {
        self.specified
    }

    /// Whether a should-persist predicate guards the member.
    #[inline]
    pub const fn should_persist(&self) -> bool {
        self.should_persist
    }

    /// Whether the member serializes as an attribute.
    #[inline]
    pub const fn is_attribute(&self) -> bool {
        self.attribute.is_some()
    }

    /// Whether the member serializes as character content.
    #[inline]
    pub const fn is_text(&self) -> bool {
        self.text.is_some()
    }

    /// Whether the member contributes child elements.
    #[inline]
    pub fn is_particle(&self) -> bool {
        !self.elements.is_empty()
    }

    /// Equivalence for inheritance-hiding purposes: the element accessor
    /// sets agree pairwise on (name, namespace, form, nullability), the
    /// text slots agree on presence, and attribute accessors (if any)
    /// agree on (name, namespace, form).
    pub fn matches(&self, other: &Self) -> bool {
        if self.elements.len() != other.elements.len() {
            return false;
        }
        if self
            .elements
            .iter()
            .zip(other.elements.iter())
            .any(|(a, b)| !a.matches_shape(b))
        {
            return false;
        }
        if self.text.is_some() != other.text.is_some() {
            return false;
        }
        match (&self.attribute, &other.attribute) {
            (Some(a), Some(b)) => a.matches_shape(b),
            (None, None) => true,
            _ => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Member ordering

// Comparator rank: explicitly-ordered members sort first (ascending by
// sequence id), unordered members follow, text comes last. Equal ranks
// return Equal so a stable sort preserves declaration order.
pub(crate) fn compare_members(a: &MemberMapping, b: &MemberMapping) -> Ordering {
    fn rank(member: &MemberMapping) -> u8 {
        if member.is_text() {
            2
        } else if member.sequence_id.is_none() {
            1
        } else {
            0
        }
    }

    match rank(a).cmp(&rank(b)) {
        Ordering::Equal => match (a.sequence_id, b.sequence_id) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => Ordering::Equal,
        },
        unequal => unequal,
    }
}

// -----------------------------------------------------------------------------
// Scope entries

/// The definition a struct scope stores per local element name; shape
/// comparison decides sharing vs collision.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalElement {
    pub(crate) member: String,
    pub(crate) form: XmlSchemaForm,
    pub(crate) nullable: bool,
}

/// The definition a struct scope stores per local attribute name.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalAttribute {
    pub(crate) member: String,
    pub(crate) form: XmlSchemaForm,
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::builtin;

    fn member(name: &str, sequence_id: Option<u32>, text: bool) -> MemberMapping {
        MemberMapping {
            name: name.into(),
            ty: builtin::STRING,
            elements: if text {
                vec![]
            } else {
                vec![ElementAccessor::new(name)]
            },
            attribute: None,
            text: text.then(|| TextAccessor::new(name)),
            choice: None,
            xmlns: None,
            sequence_id,
            specified: SpecifiedMode::None,
            should_persist: false,
        }
    }

    #[test]
    fn ordered_then_unordered_then_text() {
        let mut members = vec![
            member("t", None, true),
            member("late", Some(2), false),
            member("free", None, false),
            member("first", Some(0), false),
        ];
        members.sort_by(compare_members);
        let names: Vec<_> = members.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["first", "late", "free", "t"]);
    }

    #[test]
    fn ties_preserve_declaration_order() {
        let mut members = vec![
            member("a", None, false),
            member("b", None, false),
            member("c", Some(1), false),
            member("d", Some(1), false),
        ];
        members.sort_by(compare_members);
        let names: Vec<_> = members.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["c", "d", "a", "b"]);
    }

    #[test]
    fn matching_ignores_sequence_and_defaults() {
        let mut a = member("value", Some(3), false);
        let b = member("value", None, false);
        assert!(a.matches(&b));

        a.elements[0].nullable = true;
        assert!(!a.matches(&b));
    }

    #[test]
    fn classification_is_mutually_exclusive() {
        let particle = member("p", None, false);
        assert!(particle.is_particle() && !particle.is_text() && !particle.is_attribute());

        let text = member("t", None, true);
        assert!(text.is_text() && !text.is_particle() && !text.is_attribute());
    }
}
