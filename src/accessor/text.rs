use crate::accessor::{impl_accessor_fns, DefaultValue, XmlSchemaForm};
use crate::mapping::MappingId;

// -----------------------------------------------------------------------------
// TextAccessor

/// Describes a character-content surface point: the member's value is the
/// owning element's text rather than a child node.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAccessor {
    pub(crate) name: String,
    pub(crate) namespace: Option<String>,
    pub(crate) form: XmlSchemaForm,
    pub(crate) default: DefaultValue,
    pub(crate) mapping: Option<MappingId>,
}

impl TextAccessor {
    impl_accessor_fns!();

    /// Creates a text accessor named after its member.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            form: XmlSchemaForm::None,
            default: DefaultValue::Unset,
            mapping: None,
        }
    }
}
