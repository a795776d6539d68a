use crate::meta::{TypeRef, XmlMemberOptions};

// -----------------------------------------------------------------------------
// MemberKind

/// Whether a member is a plain field or a property (accessor pair).
///
/// The distinction matters for enumeration order: all fields come before
/// all properties, each group in declaration order, so that two runs over
/// the same type always produce the same mapping graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemberKind {
    Field,
    Property,
}

// -----------------------------------------------------------------------------
// MemberRecord

/// One field or property of a struct shape, described as plain data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberRecord {
    /// Host member name.
    pub name: String,
    /// Declared member type.
    pub ty: TypeRef,
    /// Field or property.
    pub kind: MemberKind,
    /// Static members never serialize.
    pub is_static: bool,
    /// The member cannot be written back (readonly field, getter-only
    /// property).
    pub read_only: bool,
    /// Indexer properties never serialize.
    pub is_indexer: bool,
    /// Declarative XML options attached to the member.
    pub xml: XmlMemberOptions,
}

impl MemberRecord {
    /// Creates a field record with default options.
    pub fn field(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: MemberKind::Field,
            is_static: false,
            read_only: false,
            is_indexer: false,
            xml: XmlMemberOptions::default(),
        }
    }

    /// Creates a property record with default options.
    pub fn property(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            kind: MemberKind::Property,
            ..Self::field(name, ty)
        }
    }

    /// Marks the member static.
    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Marks the member read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Marks the property an indexer.
    pub fn indexer(mut self) -> Self {
        self.is_indexer = true;
        self
    }

    /// Attaches declarative XML options.
    pub fn with_xml(mut self, xml: XmlMemberOptions) -> Self {
        self.xml = xml;
        self
    }
}
