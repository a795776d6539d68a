// -----------------------------------------------------------------------------
// Well-known namespaces

/// The reserved `xml:` prefix namespace.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The namespace of namespace declarations themselves.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// The XML Schema namespace carrying the built-in simple types.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

// -----------------------------------------------------------------------------
// XmlSchemaForm

/// Qualification form of an element or attribute name.
///
/// `None` means "not specified here, fall back to the scope default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum XmlSchemaForm {
    /// Form not declared; the surrounding scope decides.
    #[default]
    None,
    /// The name is emitted with a namespace prefix.
    Qualified,
    /// The name is emitted without a namespace prefix.
    Unqualified,
}

impl core::fmt::Display for XmlSchemaForm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::None => f.pad("none"),
            Self::Qualified => f.pad("qualified"),
            Self::Unqualified => f.pad("unqualified"),
        }
    }
}

// -----------------------------------------------------------------------------
// DefaultValue

/// Declared default value of an accessor.
///
/// The three states keep "has a default" distinct from "the default is
/// null": `Unset` means no default was declared at all, `Null` means a
/// default was declared and it is explicitly null.
///
/// # Examples
///
/// ```
/// use xmlbind::accessor::DefaultValue;
///
/// assert!(!DefaultValue::Unset.is_set());
/// assert!(DefaultValue::Null.is_set());
/// assert!(DefaultValue::Value("10".into()).is_set());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefaultValue {
    /// No default declared.
    #[default]
    Unset,
    /// A default was declared, and it is null.
    Null,
    /// A default was declared with the given lexical value.
    Value(String),
}

impl DefaultValue {
    /// Whether any default was declared (including an explicit null).
    #[inline]
    pub const fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}
