//! Input records: the host type graph and the declarative XML options.
//!
//! The resolver never inspects live host metadata. An adapter (outside
//! this crate) walks the host's own reflection facility once and feeds
//! plain records in:
//!
//! - [`HostGraph`]: append-only table of [`TypeRecord`]s, addressed by
//!   [`TypeRef`] handles, pre-seeded with the XSD built-ins ([`builtin`]).
//! - [`TypeShape`] / [`HostFacts`]: structural shape and capability facts
//!   per type.
//! - [`MemberRecord`]: one field or property of a struct shape.
//! - [`XmlTypeOptions`] / [`XmlMemberOptions`]: the declarative XML
//!   options the annotation-discovery collaborator produced.

// -----------------------------------------------------------------------------
// Modules

mod graph;
mod member;
mod options;

// -----------------------------------------------------------------------------
// Exports

pub use graph::builtin;
pub use graph::{EnumConstantRecord, HostFacts, HostGraph, SpecialShape};
pub use graph::{TypeRecord, TypeRef, TypeShape, XsdPrimitive};
pub use member::{MemberKind, MemberRecord};
pub use options::{XmlAttributeOptions, XmlElementOptions, XmlMemberOptions};
pub use options::{XmlNodeKind, XmlTypeOptions};
