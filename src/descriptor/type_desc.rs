use crate::descriptor::{TypeFlags, TypeKind};
use crate::error::{ResolveError, Result};
use crate::meta::TypeRef;

// -----------------------------------------------------------------------------
// TypeDesc

/// The canonical description of one host type.
///
/// Exactly one descriptor exists per [`TypeRef`] in a session; the
/// [`DescTable`](crate::descriptor::DescTable) never allocates a second
/// one for the same type. Descriptors are immutable once built.
///
/// `weight` is the derivation depth from the ur-type: the ur-type itself
/// is −1, primitives and enums get fixed synthetic weights, everything
/// else is its parent's weight plus one. Weight strictly increases along
/// any base chain (outside the synthetic cases) and is the sole tie-break
/// signal for most-derived-first ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDesc {
    pub(crate) ty: TypeRef,
    pub(crate) name: String,
    pub(crate) full_name: String,
    pub(crate) kind: TypeKind,
    pub(crate) flags: TypeFlags,
    pub(crate) base: Option<TypeRef>,
    pub(crate) element: Option<TypeRef>,
    pub(crate) optional_inner: Option<TypeRef>,
    pub(crate) weight: i32,
    pub(crate) unsupported: Option<String>,
}

impl TypeDesc {
    /// Returns the described type's handle.
    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    /// Returns the short name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stable fully-qualified name.
    #[inline]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the kind.
    #[inline]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns the capability flags.
    #[inline]
    pub const fn flags(&self) -> TypeFlags {
        self.flags
    }

    /// Returns the base-type link.
    #[inline]
    pub const fn base(&self) -> Option<TypeRef> {
        self.base
    }

    /// Returns the array-element-type link.
    #[inline]
    pub const fn element(&self) -> Option<TypeRef> {
        self.element
    }

    /// For optional wrappers, the wrapped value type.
    #[inline]
    pub const fn optional_inner(&self) -> Option<TypeRef> {
        self.optional_inner
    }

    /// Returns the derivation weight.
    #[inline]
    pub const fn weight(&self) -> i32 {
        self.weight
    }

    /// Whether values can appear as an attribute value.
    #[inline]
    pub const fn can_be_attribute_value(&self) -> bool {
        self.flags.contains(TypeFlags::CAN_BE_ATTRIBUTE_VALUE)
    }

    /// Whether values can appear as character content.
    #[inline]
    pub const fn can_be_text_value(&self) -> bool {
        self.flags.contains(TypeFlags::CAN_BE_TEXT_VALUE)
    }

    /// Whether the type has value semantics.
    #[inline]
    pub const fn is_value_type(&self) -> bool {
        self.flags.contains(TypeFlags::VALUE_TYPE)
    }

    /// Whether the type is an optional wrapper.
    #[inline]
    pub const fn is_optional_value(&self) -> bool {
        self.flags.contains(TypeFlags::OPTIONAL_VALUE)
    }

    /// Whether the shape cannot be mapped.
    #[inline]
    pub const fn is_unsupported(&self) -> bool {
        self.flags.contains(TypeFlags::UNSUPPORTED)
    }

    /// Raises the deferred unsupported error, if the descriptor carries
    /// one. Called at the point a mapping would actually materialize the
    /// type, never earlier.
    pub fn check_supported(&self) -> Result<()> {
        match &self.unsupported {
            Some(reason) => Err(ResolveError::UnsupportedType {
                type_name: self.name.clone(),
                reason: reason.clone(),
                trail: Vec::new(),
            }),
            None => Ok(()),
        }
    }
}
