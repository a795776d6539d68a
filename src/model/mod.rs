//! Type models: kind-specific behavior wrapped around described types.
//!
//! - [`TypeModel`]: one of [`PrimitiveModel`], [`EnumModel`],
//!   [`ArrayModel`], [`StructModel`], [`SpecialModel`], with
//!   `as_struct()`-style casts and a [`ModelKindError`] on mismatch.
//! - [`StructModel::members`]: the member enumerator (fields before
//!   properties, specified-companion and should-persist detection).
//! - [`FieldModel`] / [`SpecifiedMode`]: its output.

// -----------------------------------------------------------------------------
// Modules

mod field_model;
mod type_model;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use type_model::ModelCache;

pub use field_model::{FieldModel, SpecifiedMode};
pub use type_model::{ArrayModel, EnumModel, ModelKind, ModelKindError};
pub use type_model::{PrimitiveModel, SpecialModel, StructModel, TypeModel};
