use crate::accessor::{DefaultValue, XmlSchemaForm};
use crate::meta::TypeRef;

// -----------------------------------------------------------------------------
// XmlTypeOptions

/// Declarative XML options attached to a type by the (out-of-scope)
/// annotation-discovery step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XmlTypeOptions {
    /// Declared XML type name; `None` falls back to the host name.
    pub name: Option<String>,
    /// Declared XML namespace; `None` falls back to the resolve-time
    /// default namespace.
    pub namespace: Option<String>,
    /// An anonymous type has no name of its own and is always inlined.
    pub anonymous: bool,
    /// Whether the type participates in schema output.
    pub include_in_schema: bool,
    /// Declared substitution types: derived types that may appear wherever
    /// this type is expected. Imported right after the type itself so the
    /// derived-mapping lists are populated.
    pub includes: Vec<TypeRef>,
}

impl Default for XmlTypeOptions {
    fn default() -> Self {
        Self {
            name: None,
            namespace: None,
            anonymous: false,
            include_in_schema: true,
            includes: Vec::new(),
        }
    }
}

impl XmlTypeOptions {
    /// Sets the declared XML type name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the declared XML namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Marks the type anonymous (inline-only).
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// Excludes the type from schema output.
    pub fn skip_schema(mut self) -> Self {
        self.include_in_schema = false;
        self
    }

    /// Declares a substitution type.
    pub fn with_include(mut self, ty: TypeRef) -> Self {
        self.includes.push(ty);
        self
    }
}

// -----------------------------------------------------------------------------
// XmlNodeKind

/// Declared XML classification of a member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum XmlNodeKind {
    /// Nothing declared; the member serializes as an element.
    #[default]
    Default,
    /// The member serializes as one or more child elements.
    Element,
    /// The member serializes as an attribute.
    Attribute,
    /// The member serializes as character content.
    Text,
    /// The member captures arbitrary child elements.
    AnyElement,
    /// The member is skipped entirely.
    Ignore,
}

// -----------------------------------------------------------------------------
// XmlElementOptions

/// Per-element overrides for a member. A member may carry several of
/// these: one per alternative for polymorphic or union-typed members.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XmlElementOptions {
    /// Element name; `None` falls back to the member name.
    pub name: Option<String>,
    /// Element namespace; `None` falls back to the scope default.
    pub namespace: Option<String>,
    /// Qualification form.
    pub form: Option<XmlSchemaForm>,
    /// Declared type for this alternative; `None` uses the member type.
    pub ty: Option<TypeRef>,
    /// Nullability override.
    pub nullable: Option<bool>,
}

impl XmlElementOptions {
    /// Creates element options carrying only a name override.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the element namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the qualification form.
    pub fn with_form(mut self, form: XmlSchemaForm) -> Self {
        self.form = Some(form);
        self
    }

    /// Declares the alternative's type.
    pub fn with_type(mut self, ty: TypeRef) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Overrides nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }
}

// -----------------------------------------------------------------------------
// XmlAttributeOptions

/// Attribute overrides for a member.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XmlAttributeOptions {
    /// Attribute name; `None` falls back to the member name. A
    /// colon-qualified name is only legal with the reserved `xml:` prefix.
    pub name: Option<String>,
    /// Attribute namespace.
    pub namespace: Option<String>,
    /// Qualification form.
    pub form: Option<XmlSchemaForm>,
}

impl XmlAttributeOptions {
    /// Creates attribute options carrying only a name override.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the attribute namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the qualification form.
    pub fn with_form(mut self, form: XmlSchemaForm) -> Self {
        self.form = Some(form);
        self
    }
}

// -----------------------------------------------------------------------------
// XmlMemberOptions

/// Declarative XML options attached to a member.
///
/// # Examples
///
/// ```
/// use xmlbind::meta::{XmlMemberOptions, XmlNodeKind};
///
/// let attr = XmlMemberOptions::attribute();
/// assert_eq!(attr.node, XmlNodeKind::Attribute);
///
/// let ordered = XmlMemberOptions::element().with_order(2);
/// assert_eq!(ordered.order, Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XmlMemberOptions {
    /// Declared classification.
    pub node: XmlNodeKind,
    /// Element alternatives (union/polymorphic members declare several).
    pub elements: Vec<XmlElementOptions>,
    /// Attribute overrides, for attribute-classified members.
    pub attribute: Option<XmlAttributeOptions>,
    /// Allowed-namespace pattern for "any" content.
    pub any_namespace: Option<String>,
    /// Name of the sibling member discriminating a choice.
    pub choice_member: Option<String>,
    /// Explicit sequence position; `None` means unordered.
    pub order: Option<u32>,
    /// Nullability override applied to every element alternative that has
    /// none of its own.
    pub nullable: Option<bool>,
    /// Declared default value.
    pub default: DefaultValue,
    /// The member captures namespace declarations rather than data.
    pub namespace_declarations: bool,
}

impl XmlMemberOptions {
    /// Element classification with no overrides.
    pub fn element() -> Self {
        Self {
            node: XmlNodeKind::Element,
            ..Self::default()
        }
    }

    /// Attribute classification with no overrides.
    pub fn attribute() -> Self {
        Self {
            node: XmlNodeKind::Attribute,
            ..Self::default()
        }
    }

    /// Text classification.
    pub fn text() -> Self {
        Self {
            node: XmlNodeKind::Text,
            ..Self::default()
        }
    }

    /// Any-element classification.
    pub fn any_element() -> Self {
        Self {
            node: XmlNodeKind::AnyElement,
            ..Self::default()
        }
    }

    /// The member is skipped entirely.
    pub fn ignored() -> Self {
        Self {
            node: XmlNodeKind::Ignore,
            ..Self::default()
        }
    }

    /// Marks the member a namespace-declarations capture.
    pub fn namespace_declarations() -> Self {
        Self {
            namespace_declarations: true,
            ..Self::default()
        }
    }

    /// Adds an element alternative.
    pub fn with_element(mut self, element: XmlElementOptions) -> Self {
        self.elements.push(element);
        self
    }

    /// Sets the attribute overrides.
    pub fn with_attribute(mut self, attribute: XmlAttributeOptions) -> Self {
        self.attribute = Some(attribute);
        self
    }

    /// Restricts "any" content to a namespace pattern.
    pub fn with_any_namespace(mut self, pattern: impl Into<String>) -> Self {
        self.any_namespace = Some(pattern.into());
        self
    }

    /// Names the choice-discriminator sibling.
    pub fn with_choice(mut self, member: impl Into<String>) -> Self {
        self.choice_member = Some(member.into());
        self
    }

    /// Requests an explicit sequence position.
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    /// Overrides nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Declares a default value.
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = default;
        self
    }
}
