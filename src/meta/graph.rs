use core::fmt;
use std::collections::HashMap;

use crate::meta::{MemberRecord, XmlTypeOptions};

// -----------------------------------------------------------------------------
// TypeRef

/// A handle to one [`TypeRecord`] inside a [`HostGraph`].
///
/// Handles are minted by [`HostGraph::push`] and are only meaningful for
/// the graph that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeRef(pub(crate) u32);

impl TypeRef {
    /// Returns the dense index of this handle.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// -----------------------------------------------------------------------------
// XsdPrimitive

/// The XML Schema built-in simple type a host primitive maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum XsdPrimitive {
    String,
    Boolean,
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    Float,
    Double,
    Decimal,
    DateTime,
    Date,
    Time,
    Duration,
    Base64Binary,
    HexBinary,
    AnyUri,
    QName,
    /// A single character; carried on the wire as `unsignedShort`.
    Char,
    /// A UUID; carried on the wire as `string`.
    Guid,
}

impl XsdPrimitive {
    /// Returns the XSD built-in name this primitive serializes as.
    pub const fn xsd_name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::UnsignedByte => "unsignedByte",
            Self::Short => "short",
            Self::UnsignedShort => "unsignedShort",
            Self::Int => "int",
            Self::UnsignedInt => "unsignedInt",
            Self::Long => "long",
            Self::UnsignedLong => "unsignedLong",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::DateTime => "dateTime",
            Self::Date => "date",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Base64Binary => "base64Binary",
            Self::HexBinary => "hexBinary",
            Self::AnyUri => "anyURI",
            Self::QName => "QName",
            Self::Char => "unsignedShort",
            Self::Guid => "string",
        }
    }

    /// Whether surrounding whitespace is collapsed by the lexical space.
    /// Only `string` preserves it.
    #[inline]
    pub const fn collapses_whitespace(self) -> bool {
        !matches!(self, Self::String)
    }

    /// Whether this primitive borrows another built-in's lexical space
    /// instead of owning one (so its data type is ambiguous in schemas).
    #[inline]
    pub const fn is_ambiguous(self) -> bool {
        matches!(self, Self::Char | Self::Guid)
    }
}

// -----------------------------------------------------------------------------
// SpecialShape

/// A type whose XML surface is provided by the host instead of being
/// derived from its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum SpecialShape {
    /// Captures an arbitrary element subtree ("any" content).
    AnyElement,
    /// The host type implements a custom schema/serialization contract
    /// and handles its own reading and writing.
    CustomSerializable,
}

// -----------------------------------------------------------------------------
// TypeShape

/// The structural shape of a host type, as reported by the adapter that
/// walked the host's own metadata. The resolver never inspects live host
/// types; this record is all it sees.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum TypeShape {
    /// The synthetic ur-type every unbased aggregate derives from.
    /// Seeded once by [`HostGraph::new`]; adapters never push this.
    Root,
    /// A primitive with a known XML built-in mapping.
    Primitive(XsdPrimitive),
    /// An enumeration of named constants.
    Enum {
        constants: Vec<EnumConstantRecord>,
        /// Multiple constants may be combined into one value.
        is_flags: bool,
    },
    /// A plain aggregate of fields and properties.
    Struct {
        members: Vec<MemberRecord>,
        /// Names of parameterless `bool` predicate methods, consulted for
        /// `should_serialize_*` detection.
        predicates: Vec<String>,
    },
    /// A native array.
    Array { element: TypeRef },
    /// An indexable collection.
    Collection { element: TypeRef },
    /// An iterate-only collection.
    Enumerable { element: TypeRef },
    /// An optional wrapper around a value type.
    Nullable { inner: TypeRef },
    /// The absence of a value (return type of one-way operations).
    Void,
    /// Host-provided schema logic.
    Special(SpecialShape),
    /// A shape the adapter could not express (open generic interfaces and
    /// the like). Recorded, not rejected: the error is raised only if the
    /// mapping graph actually needs the type.
    Unsupported { reason: String },
}

// -----------------------------------------------------------------------------
// HostFacts

/// Host-level capability facts about a type, gathered by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostFacts {
    /// The type has value (copy) semantics.
    pub value_type: bool,
    /// A parameterless constructor exists.
    pub has_default_ctor: bool,
    /// The parameterless constructor exists but is not reachable.
    pub ctor_inaccessible: bool,
    /// The type cannot be instantiated directly.
    pub is_abstract: bool,
    /// The host must fall back to generic (uncompiled) access paths for
    /// this type.
    pub generic_fallback: bool,
}

impl Default for HostFacts {
    fn default() -> Self {
        Self {
            value_type: false,
            has_default_ctor: true,
            ctor_inaccessible: false,
            is_abstract: false,
            generic_fallback: false,
        }
    }
}

// -----------------------------------------------------------------------------
// TypeRecord

/// One host type, described as plain data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeRecord {
    /// Short host name.
    pub name: String,
    /// Stable fully-qualified host name; unique within a graph.
    pub full_name: String,
    /// Structural shape.
    pub shape: TypeShape,
    /// Base-type link, if the host type derives from another mapped type.
    pub base: Option<TypeRef>,
    /// Capability facts.
    pub facts: HostFacts,
    /// Declarative XML options attached to the type.
    pub xml: XmlTypeOptions,
}

impl TypeRecord {
    /// Creates a record whose full name equals its short name.
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            name,
            shape,
            base: None,
            facts: HostFacts::default(),
            xml: XmlTypeOptions::default(),
        }
    }

    /// Sets the fully-qualified name.
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Sets the base-type link.
    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    /// Sets the capability facts.
    pub fn with_facts(mut self, facts: HostFacts) -> Self {
        self.facts = facts;
        self
    }

    /// Sets the declarative XML options.
    pub fn with_xml(mut self, xml: XmlTypeOptions) -> Self {
        self.xml = xml;
        self
    }
}

// -----------------------------------------------------------------------------
// EnumConstantRecord

/// One named constant of an enum shape.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumConstantRecord {
    /// Host constant name.
    pub name: String,
    /// Underlying numeric value.
    pub value: i64,
    /// Declared XML spelling, when it differs from `name`.
    pub xml_name: Option<String>,
}

impl EnumConstantRecord {
    /// Creates a constant record without an XML override.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            xml_name: None,
        }
    }

    /// Sets the declared XML spelling.
    pub fn with_xml_name(mut self, xml_name: impl Into<String>) -> Self {
        self.xml_name = Some(xml_name.into());
        self
    }
}

// -----------------------------------------------------------------------------
// Built-in handles

/// Handles to the records pre-seeded by [`HostGraph::new`], in seeding
/// order. Stable across sessions, so adapters and tests may refer to them
/// directly.
pub mod builtin {
    use super::TypeRef;

    pub const ANY_TYPE: TypeRef = TypeRef(0);
    pub const STRING: TypeRef = TypeRef(1);
    pub const BOOLEAN: TypeRef = TypeRef(2);
    pub const BYTE: TypeRef = TypeRef(3);
    pub const UNSIGNED_BYTE: TypeRef = TypeRef(4);
    pub const SHORT: TypeRef = TypeRef(5);
    pub const UNSIGNED_SHORT: TypeRef = TypeRef(6);
    pub const INT: TypeRef = TypeRef(7);
    pub const UNSIGNED_INT: TypeRef = TypeRef(8);
    pub const LONG: TypeRef = TypeRef(9);
    pub const UNSIGNED_LONG: TypeRef = TypeRef(10);
    pub const FLOAT: TypeRef = TypeRef(11);
    pub const DOUBLE: TypeRef = TypeRef(12);
    pub const DECIMAL: TypeRef = TypeRef(13);
    pub const DATE_TIME: TypeRef = TypeRef(14);
    pub const DATE: TypeRef = TypeRef(15);
    pub const TIME: TypeRef = TypeRef(16);
    pub const DURATION: TypeRef = TypeRef(17);
    pub const BASE64_BINARY: TypeRef = TypeRef(18);
    pub const HEX_BINARY: TypeRef = TypeRef(19);
    pub const ANY_URI: TypeRef = TypeRef(20);
    pub const QNAME: TypeRef = TypeRef(21);
    pub const CHAR: TypeRef = TypeRef(22);
    pub const GUID: TypeRef = TypeRef(23);
}

// Seeding order backing the `builtin` handles. Do not reorder.
const BUILTIN_PRIMITIVES: &[XsdPrimitive] = &[
    XsdPrimitive::String,
    XsdPrimitive::Boolean,
    XsdPrimitive::Byte,
    XsdPrimitive::UnsignedByte,
    XsdPrimitive::Short,
    XsdPrimitive::UnsignedShort,
    XsdPrimitive::Int,
    XsdPrimitive::UnsignedInt,
    XsdPrimitive::Long,
    XsdPrimitive::UnsignedLong,
    XsdPrimitive::Float,
    XsdPrimitive::Double,
    XsdPrimitive::Decimal,
    XsdPrimitive::DateTime,
    XsdPrimitive::Date,
    XsdPrimitive::Time,
    XsdPrimitive::Duration,
    XsdPrimitive::Base64Binary,
    XsdPrimitive::HexBinary,
    XsdPrimitive::AnyUri,
    XsdPrimitive::QName,
    XsdPrimitive::Char,
    XsdPrimitive::Guid,
];

// -----------------------------------------------------------------------------
// HostGraph

/// The host type graph: an append-only table of [`TypeRecord`]s.
///
/// A graph starts with the synthetic ur-type and the XSD built-ins
/// pre-seeded; the adapter then pushes one record per host type in the
/// closure of the roots it wants mapped.
///
/// # Examples
///
/// ```
/// use xmlbind::meta::{builtin, HostGraph, MemberRecord, TypeRecord, TypeShape};
///
/// let mut graph = HostGraph::new();
/// let point = graph.push(TypeRecord::new(
///     "Point",
///     TypeShape::Struct {
///         members: vec![
///             MemberRecord::field("x", builtin::INT),
///             MemberRecord::field("y", builtin::INT),
///         ],
///         predicates: vec![],
///     },
/// ));
///
/// assert_eq!(graph.find("Point"), Some(point));
/// assert_eq!(graph.get(point).unwrap().name, "Point");
/// ```
#[derive(Debug, Clone, Default)]
pub struct HostGraph {
    records: Vec<TypeRecord>,
    full_name_to_ref: HashMap<String, TypeRef>,
}

impl HostGraph {
    /// Creates a graph with the ur-type and XSD built-ins pre-seeded.
    pub fn new() -> Self {
        let mut graph = Self {
            records: Vec::with_capacity(BUILTIN_PRIMITIVES.len() + 1),
            full_name_to_ref: HashMap::new(),
        };
        graph.push(TypeRecord::new("anyType", TypeShape::Root));
        for &primitive in BUILTIN_PRIMITIVES {
            graph.push(TypeRecord::new(
                primitive.xsd_name(),
                TypeShape::Primitive(primitive),
            ));
        }
        graph
    }

    /// Appends a record and returns its handle.
    ///
    /// Full names index the graph for [`find`](Self::find); a re-pushed
    /// full name keeps the first handle as the lookup result.
    pub fn push(&mut self, record: TypeRecord) -> TypeRef {
        let handle = TypeRef(self.records.len() as u32);
        self.full_name_to_ref
            .entry(record.full_name.clone())
            .or_insert(handle);
        self.records.push(record);
        handle
    }

    /// Returns the record for `handle`, if it belongs to this graph.
    #[inline]
    pub fn get(&self, handle: TypeRef) -> Option<&TypeRecord> {
        self.records.get(handle.index())
    }

    /// Looks a record up by its fully-qualified name.
    #[inline]
    pub fn find(&self, full_name: &str) -> Option<TypeRef> {
        self.full_name_to_ref.get(full_name).copied()
    }

    /// Number of records, built-ins included.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the graph holds no records at all (only true for
    /// [`Default`]-constructed graphs, which skip seeding).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates all records in push order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (TypeRef, &TypeRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| (TypeRef(index as u32), record))
    }

    // Handles are minted by `push`, so in-crate callers index directly.
    #[inline]
    pub(crate) fn record(&self, handle: TypeRef) -> &TypeRecord {
        &self.records[handle.index()]
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_seeded_in_handle_order() {
        let graph = HostGraph::new();
        assert_eq!(graph.record(builtin::ANY_TYPE).name, "anyType");
        assert_eq!(graph.record(builtin::STRING).name, "string");
        assert_eq!(graph.record(builtin::BOOLEAN).name, "boolean");
        assert_eq!(graph.record(builtin::QNAME).name, "QName");
        assert_eq!(
            graph.record(builtin::GUID).shape,
            TypeShape::Primitive(XsdPrimitive::Guid)
        );
    }

    #[test]
    fn find_prefers_first_push() {
        let mut graph = HostGraph::new();
        let first = graph.push(TypeRecord::new("Dup", TypeShape::Void));
        let _second = graph.push(TypeRecord::new("Dup", TypeShape::Void));
        assert_eq!(graph.find("Dup"), Some(first));
    }

    #[test]
    fn ambiguous_primitives_borrow_lexical_spaces() {
        assert_eq!(XsdPrimitive::Char.xsd_name(), "unsignedShort");
        assert_eq!(XsdPrimitive::Guid.xsd_name(), "string");
        assert!(XsdPrimitive::Char.is_ambiguous());
        assert!(!XsdPrimitive::Int.is_ambiguous());
    }
}
