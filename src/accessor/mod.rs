//! Accessors: value objects describing one XML surface point each.
//!
//! - [`ElementAccessor`]: a named child element (nullability, occurrence).
//! - [`AttributeAccessor`]: an attribute, with the reserved-prefix
//!   [`normalize`](AttributeAccessor::normalize) rule.
//! - [`TextAccessor`]: character content.
//! - [`ChoiceIdentifierAccessor`]: a choice discriminator.
//! - [`XmlnsAccessor`]: a namespace-declarations capture.
//! - [`XmlSchemaForm`] / [`DefaultValue`]: shared metadata.
//!
//! Accessors are pure values; the resolver wires their mapping references
//! and the name tables check their shapes for collisions.

// -----------------------------------------------------------------------------
// Shared getters

// Helper macro implementing the getters every accessor carries.
macro_rules! impl_accessor_fns {
    () => {
        /// Returns the local name. Never null in external form; the empty
        /// string substitutes.
        #[inline]
        pub fn name(&self) -> &str {
            &self.name
        }

        /// Returns the declared namespace.
        #[inline]
        pub fn namespace(&self) -> Option<&str> {
            self.namespace.as_deref()
        }

        /// Returns the qualification form.
        #[inline]
        pub const fn form(&self) -> XmlSchemaForm {
            self.form
        }

        /// Returns the declared default value.
        #[inline]
        pub const fn default_value(&self) -> &DefaultValue {
            &self.default
        }

        /// Returns the resolved mapping node, once wired.
        #[inline]
        pub const fn mapping(&self) -> Option<MappingId> {
            self.mapping
        }

        /// Compares the declared namespace against a scope default to
        /// decide whether a prefix must be emitted.
        pub fn is_in_namespace(&self, scope_default: Option<&str>) -> bool {
            self.namespace.as_deref() == scope_default
        }
    };
}

pub(crate) use impl_accessor_fns;

// -----------------------------------------------------------------------------
// Modules

mod attribute;
mod element;
mod form;
mod special;
mod text;

// -----------------------------------------------------------------------------
// Exports

pub use attribute::AttributeAccessor;
pub use element::ElementAccessor;
pub use form::{DefaultValue, XmlSchemaForm};
pub use form::{XMLNS_NAMESPACE, XML_NAMESPACE, XSD_NAMESPACE};
pub use special::{ChoiceIdentifierAccessor, XmlnsAccessor};
pub use text::TextAccessor;
