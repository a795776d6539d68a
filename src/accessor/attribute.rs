use crate::accessor::{impl_accessor_fns, DefaultValue, XmlSchemaForm, XML_NAMESPACE};
use crate::error::{ResolveError, Result};
use crate::mapping::MappingId;

// -----------------------------------------------------------------------------
// AttributeAccessor

/// Describes one attribute surface point.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeAccessor {
    pub(crate) name: String,
    pub(crate) namespace: Option<String>,
    pub(crate) form: XmlSchemaForm,
    pub(crate) default: DefaultValue,
    pub(crate) is_any: bool,
    pub(crate) top_level_in_schema: bool,
    pub(crate) mapping: Option<MappingId>,
}

impl AttributeAccessor {
    impl_accessor_fns!();

    /// Creates a minimal attribute accessor with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            form: XmlSchemaForm::None,
            default: DefaultValue::Unset,
            is_any: false,
            top_level_in_schema: false,
            mapping: None,
        }
    }

    /// Whether the accessor captures arbitrary attributes.
    #[inline]
    pub const fn is_any(&self) -> bool {
        self.is_any
    }

    /// Whether the attribute is a top-level schema declaration.
    #[inline]
    pub const fn top_level_in_schema(&self) -> bool {
        self.top_level_in_schema
    }

    /// Rewrites a `prefix:local` name.
    ///
    /// Only the reserved `xml:` prefix is legal: it maps onto the fixed
    /// XML namespace and forces the qualified form. Any other
    /// colon-qualified name is rejected as
    /// [`InvalidAccessorName`](ResolveError::InvalidAccessorName).
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlbind::accessor::{AttributeAccessor, XmlSchemaForm, XML_NAMESPACE};
    ///
    /// let mut lang = AttributeAccessor::new("xml:lang");
    /// lang.normalize().unwrap();
    /// assert_eq!(lang.name(), "lang");
    /// assert_eq!(lang.namespace(), Some(XML_NAMESPACE));
    /// assert_eq!(lang.form(), XmlSchemaForm::Qualified);
    ///
    /// let mut bad = AttributeAccessor::new("soap:id");
    /// assert!(bad.normalize().is_err());
    /// ```
    pub fn normalize(&mut self) -> Result<()> {
        let Some(colon) = self.name.find(':') else {
            return Ok(());
        };
        let (prefix, rest) = self.name.split_at(colon);
        if prefix != "xml" {
            return Err(ResolveError::InvalidAccessorName {
                name: self.name.clone(),
            });
        }
        self.name = rest[1..].to_owned();
        self.namespace = Some(XML_NAMESPACE.to_owned());
        self.form = XmlSchemaForm::Qualified;
        Ok(())
    }

    /// Shape equality used for duplicate detection and override matching:
    /// name, namespace, and form.
    pub fn matches_shape(&self, other: &Self) -> bool {
        self.name == other.name && self.namespace == other.namespace && self.form == other.form
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through_normalize() {
        let mut id = AttributeAccessor::new("id");
        id.normalize().unwrap();
        assert_eq!(id.name(), "id");
        assert_eq!(id.namespace(), None);
        assert_eq!(id.form(), XmlSchemaForm::None);
    }

    #[test]
    fn only_the_reserved_prefix_is_accepted() {
        let mut space = AttributeAccessor::new("xml:space");
        space.normalize().unwrap();
        assert_eq!(space.name(), "space");

        let mut other = AttributeAccessor::new("xsi:type");
        match other.normalize().unwrap_err() {
            ResolveError::InvalidAccessorName { name } => assert_eq!(name, "xsi:type"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
