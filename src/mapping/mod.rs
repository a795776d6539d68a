//! The mapping graph: resolved nodes, member bindings, name tables, and
//! the builder.
//!
//! - [`Mapping`] / [`MappingKind`]: one arena node per resolved (type,
//!   namespace) pair, with struct, array, enum, primitive, nullable,
//!   special, serializable, or member-bag payloads.
//! - [`MappingArena`] / [`MappingId`]: integer-addressed node storage
//!   with explicit base/derived links and `Building | Complete` states.
//! - [`MemberMapping`]: one struct member bound to its accessor slots,
//!   with the sequence comparator and the override-matching rules.
//! - [`NameTable`] / [`NameKey`]: qualified-name scopes doubling as
//!   duplicate-definition detectors.
//! - The builder itself is implemented on
//!   [`Session`](crate::Session): `resolve`, `resolve_members`,
//!   `elements_sorted_by_derivation`.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod member;
mod name_table;
mod node;
pub(crate) mod worklist;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use member::compare_members;

pub use member::{LocalAttribute, LocalElement, MemberMapping};
pub use name_table::{NameKey, NameTable};
pub use node::{ArrayMapping, ConstantMapping, EnumMapping, Mapping};
pub use node::{MappingArena, MappingId, MappingKind, MappingState};
pub use node::{MembersMapping, NullableMapping, PrimitiveMapping};
pub use node::{SerializableMapping, SpecialMapping, StructMapping};
