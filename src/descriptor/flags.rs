use bitflags::bitflags;

// -----------------------------------------------------------------------------
// TypeFlags

bitflags! {
    /// Capability flags of a described type.
    ///
    /// Computed once from the host facts and the shape when the descriptor
    /// is built; never mutated afterwards.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u16 {
        /// The type has value (copy) semantics.
        const VALUE_TYPE = 1 << 0;
        /// Values can appear as an attribute value.
        const CAN_BE_ATTRIBUTE_VALUE = 1 << 1;
        /// Values can appear as character content.
        const CAN_BE_TEXT_VALUE = 1 << 2;
        /// Values can appear as element content.
        const CAN_BE_ELEMENT_VALUE = 1 << 3;
        /// A parameterless constructor exists.
        const HAS_DEFAULT_CONSTRUCTOR = 1 << 4;
        /// The parameterless constructor exists but is unreachable.
        const CTOR_INACCESSIBLE = 1 << 5;
        /// The type cannot be instantiated directly.
        const ABSTRACT = 1 << 6;
        /// The host falls back to generic (uncompiled) access paths.
        const GENERIC_FALLBACK = 1 << 7;
        /// The shape cannot be mapped; the descriptor carries a deferred
        /// error raised on first materialization.
        const UNSUPPORTED = 1 << 8;
        /// Surrounding whitespace collapses in the lexical space.
        const COLLAPSE_WHITESPACE = 1 << 9;
        /// Values equal to the declared default are not written.
        const IGNORE_DEFAULT = 1 << 10;
        /// The type is an optional wrapper around a value type.
        const OPTIONAL_VALUE = 1 << 11;
        /// The type implements the custom schema/serialization contract.
        const XML_SERIALIZABLE = 1 << 12;
        /// The primitive borrows another built-in's lexical space.
        const AMBIGUOUS_DATA_TYPE = 1 << 13;
    }
}

impl TypeFlags {
    /// The flag set shared by every simple (attribute/text-capable) value.
    pub(crate) const SIMPLE_VALUE: Self = Self::VALUE_TYPE
        .union(Self::CAN_BE_ATTRIBUTE_VALUE)
        .union(Self::CAN_BE_TEXT_VALUE)
        .union(Self::CAN_BE_ELEMENT_VALUE)
        .union(Self::HAS_DEFAULT_CONSTRUCTOR);
}
