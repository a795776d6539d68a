use core::fmt;

// -----------------------------------------------------------------------------
// TypeKind

/// An enumeration of the "kinds" of a described type.
///
/// The kind is the single dispatch signal for the model classifier: every
/// downstream decision (which model wraps the type, which mapping node the
/// resolver builds) starts here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// The synthetic ur-type (`anyType`).
    Root,
    /// Primitive with a known XML built-in mapping.
    Primitive,
    /// Enumeration of named constants.
    Enum,
    /// Aggregate with value semantics.
    Struct,
    /// Aggregate with reference semantics.
    Class,
    /// Native array.
    Array,
    /// Indexable collection.
    Collection,
    /// Iterate-only collection.
    Enumerable,
    /// No value.
    Void,
    /// Host-provided schema logic.
    Special,
}

impl TypeKind {
    /// Whether this kind maps to an array-like (repeating) surface.
    #[inline]
    pub const fn is_array_like(self) -> bool {
        matches!(self, Self::Array | Self::Collection | Self::Enumerable)
    }

    /// Whether this kind is a member-bearing aggregate.
    #[inline]
    pub const fn is_aggregate(self) -> bool {
        matches!(self, Self::Struct | Self::Class)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.pad("Root"),
            Self::Primitive => f.pad("Primitive"),
            Self::Enum => f.pad("Enum"),
            Self::Struct => f.pad("Struct"),
            Self::Class => f.pad("Class"),
            Self::Array => f.pad("Array"),
            Self::Collection => f.pad("Collection"),
            Self::Enumerable => f.pad("Enumerable"),
            Self::Void => f.pad("Void"),
            Self::Special => f.pad("Special"),
        }
    }
}
