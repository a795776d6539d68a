use crate::mapping::MappingId;

// -----------------------------------------------------------------------------
// ChoiceIdentifierAccessor

/// Describes the discriminator of a choice member: a sibling enum member
/// whose value records which element alternative was read or should be
/// written.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceIdentifierAccessor {
    pub(crate) member_name: String,
    pub(crate) mapping: Option<MappingId>,
}

impl ChoiceIdentifierAccessor {
    /// Returns the discriminating sibling's member name.
    #[inline]
    pub fn member_name(&self) -> &str {
        &self.member_name
    }

    /// Returns the discriminator's enum mapping, once wired.
    #[inline]
    pub const fn mapping(&self) -> Option<MappingId> {
        self.mapping
    }
}

// -----------------------------------------------------------------------------
// XmlnsAccessor

/// Describes a namespace-declarations capture: the member soaks up the
/// prefix declarations in scope instead of carrying data.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlnsAccessor {
    pub(crate) member_name: String,
}

impl XmlnsAccessor {
    /// Returns the capturing member's name.
    #[inline]
    pub fn member_name(&self) -> &str {
        &self.member_name
    }
}
