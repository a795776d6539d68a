use crate::accessor::{impl_accessor_fns, DefaultValue, XmlSchemaForm};
use crate::mapping::MappingId;

// -----------------------------------------------------------------------------
// ElementAccessor

/// Describes one element surface point: a named child element carrying a
/// member or array item.
///
/// Cloning produces a structurally independent accessor that still refers
/// to the same mapping node, used when one logical element appears with
/// different occurrence or nullability in different contexts.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementAccessor {
    pub(crate) name: String,
    pub(crate) namespace: Option<String>,
    pub(crate) form: XmlSchemaForm,
    pub(crate) default: DefaultValue,
    pub(crate) is_any: bool,
    pub(crate) any_namespace: Option<String>,
    pub(crate) top_level_in_schema: bool,
    pub(crate) nullable: bool,
    pub(crate) unbounded: bool,
    pub(crate) mapping: Option<MappingId>,
}

impl ElementAccessor {
    impl_accessor_fns!();

    /// Creates a minimal element accessor with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            form: XmlSchemaForm::None,
            default: DefaultValue::Unset,
            is_any: false,
            any_namespace: None,
            top_level_in_schema: false,
            nullable: false,
            unbounded: false,
            mapping: None,
        }
    }

    /// Whether the element accepts arbitrary content ("any").
    #[inline]
    pub const fn is_any(&self) -> bool {
        self.is_any
    }

    /// Allowed-namespace pattern for "any" content.
    #[inline]
    pub fn any_namespace(&self) -> Option<&str> {
        self.any_namespace.as_deref()
    }

    /// Whether the element is a top-level schema particle.
    #[inline]
    pub const fn top_level_in_schema(&self) -> bool {
        self.top_level_in_schema
    }

    /// Whether an absent value serializes as an explicit nil element.
    #[inline]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether the element may repeat.
    #[inline]
    pub const fn is_unbounded(&self) -> bool {
        self.unbounded
    }

    /// Shape equality used for duplicate detection and override matching:
    /// name, namespace, form, and nullability. Defaults and ordering do
    /// not participate.
    pub fn matches_shape(&self, other: &Self) -> bool {
        self.name == other.name
            && self.namespace == other.namespace
            && self.form == other.form
            && self.nullable == other.nullable
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_the_mapping_reference() {
        let mut element = ElementAccessor::new("item");
        element.mapping = Some(MappingId(7));
        element.unbounded = true;

        let mut copy = element.clone();
        copy.unbounded = false;
        assert_eq!(copy.mapping(), element.mapping());
        assert!(element.is_unbounded());
        assert!(!copy.is_unbounded());
    }

    #[test]
    fn shape_matching_ignores_defaults() {
        let mut a = ElementAccessor::new("value");
        let mut b = ElementAccessor::new("value");
        a.default = DefaultValue::Value("1".into());
        b.default = DefaultValue::Unset;
        assert!(a.matches_shape(&b));

        b.nullable = true;
        assert!(!a.matches_shape(&b));
    }
}
