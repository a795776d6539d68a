//! The descriptor table: one canonical, deduplicated description per
//! distinct host type.
//!
//! - [`TypeKind`]: the classification every later dispatch starts from.
//! - [`TypeFlags`]: capability flags (value semantics, attribute/text
//!   capability, constructor accessibility, whitespace handling, ...).
//! - [`TypeDesc`]: kind + flags + derivation links + weight, immutable
//!   once built, carrying a deferred error for unsupported shapes.
//! - [`DescTable`]: the idempotent `describe` cache.

// -----------------------------------------------------------------------------
// Modules

mod flags;
mod kind;
mod table;
mod type_desc;

// -----------------------------------------------------------------------------
// Exports

pub use flags::TypeFlags;
pub use kind::TypeKind;
pub use table::DescTable;
pub use type_desc::TypeDesc;
