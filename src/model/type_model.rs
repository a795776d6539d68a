use core::{error, fmt};
use std::collections::HashMap;
use std::rc::Rc;

use crate::descriptor::DescTable;
use crate::error::{ResolveError, Result};
use crate::meta::{EnumConstantRecord, HostGraph, MemberRecord, SpecialShape};
use crate::meta::{TypeRef, TypeShape, XsdPrimitive};

// -----------------------------------------------------------------------------
// ModelKind

/// An enumeration of the "kinds" of a type model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Primitive,
    Enum,
    Array,
    Struct,
    Special,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.pad("Primitive"),
            Self::Enum => f.pad("Enum"),
            Self::Array => f.pad("Array"),
            Self::Struct => f.pad("Struct"),
            Self::Special => f.pad("Special"),
        }
    }
}

/// Error returned when a [`TypeModel`] value is not the expected
/// [`ModelKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelKindError {
    pub expected: ModelKind,
    pub received: ModelKind,
}

impl fmt::Display for ModelKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "model kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for ModelKindError {}

// -----------------------------------------------------------------------------
// Per-kind models

/// Model for a primitive with a known XML built-in mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveModel {
    pub(crate) ty: TypeRef,
    pub(crate) primitive: XsdPrimitive,
}

impl PrimitiveModel {
    /// The modeled type.
    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    /// The XSD built-in the primitive maps onto.
    #[inline]
    pub const fn primitive(&self) -> XsdPrimitive {
        self.primitive
    }
}

/// Model for an enumeration of named constants.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumModel {
    pub(crate) ty: TypeRef,
    pub(crate) constants: Vec<EnumConstantRecord>,
    pub(crate) is_flags: bool,
}

impl EnumModel {
    /// The modeled type.
    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    /// The constants in declaration order.
    #[inline]
    pub fn constants(&self) -> &[EnumConstantRecord] {
        &self.constants
    }

    /// Whether constants combine into one value.
    #[inline]
    pub const fn is_flags(&self) -> bool {
        self.is_flags
    }
}

/// Model for arrays, collections, and iterate-only collections.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayModel {
    pub(crate) ty: TypeRef,
    pub(crate) element: TypeRef,
}

impl ArrayModel {
    /// The modeled type.
    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    /// The element type.
    #[inline]
    pub const fn element(&self) -> TypeRef {
        self.element
    }
}

/// Model for member-bearing aggregates.
///
/// Member enumeration lives in
/// [`StructModel::members`](crate::model::StructModel::members).
#[derive(Debug, Clone, PartialEq)]
pub struct StructModel {
    pub(crate) ty: TypeRef,
    pub(crate) members: Vec<MemberRecord>,
    pub(crate) predicates: Vec<String>,
}

impl StructModel {
    /// The modeled type.
    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    /// The raw member records, before enumeration rules apply.
    #[inline]
    pub fn raw_members(&self) -> &[MemberRecord] {
        &self.members
    }
}

/// Model for types with host-provided schema logic.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialModel {
    pub(crate) ty: TypeRef,
    pub(crate) shape: SpecialShape,
}

impl SpecialModel {
    /// The modeled type.
    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    /// Which special surface the host provides.
    #[inline]
    pub const fn shape(&self) -> SpecialShape {
        self.shape
    }
}

// -----------------------------------------------------------------------------
// TypeModel

// Helper macro that implements type-safe accessor methods like `as_struct`.
macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $model:ident) => {
        /// Convert [`TypeModel`] to the specific model, or report which
        /// kind was found instead.
        pub const fn $name(&self) -> Result<&$model, ModelKindError> {
            match self {
                Self::$kind(model) => Ok(model),
                _ => Err(ModelKindError {
                    expected: ModelKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

/// Kind-specific behavior wrapped around one described type.
///
/// Models are memoized per [`TypeRef`] by the session, so asking twice
/// returns the identical shared model and self-referential type graphs
/// never descend infinitely.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeModel {
    Primitive(PrimitiveModel),
    Enum(EnumModel),
    Array(ArrayModel),
    Struct(StructModel),
    Special(SpecialModel),
}

impl TypeModel {
    impl_cast_method!(as_primitive: Primitive => PrimitiveModel);
    impl_cast_method!(as_enum: Enum => EnumModel);
    impl_cast_method!(as_array: Array => ArrayModel);
    impl_cast_method!(as_struct: Struct => StructModel);
    impl_cast_method!(as_special: Special => SpecialModel);

    /// Returns the [`ModelKind`] (a fast discriminator).
    pub const fn kind(&self) -> ModelKind {
        match self {
            Self::Primitive(_) => ModelKind::Primitive,
            Self::Enum(_) => ModelKind::Enum,
            Self::Array(_) => ModelKind::Array,
            Self::Struct(_) => ModelKind::Struct,
            Self::Special(_) => ModelKind::Special,
        }
    }

    /// Returns the modeled type.
    pub const fn ty(&self) -> TypeRef {
        match self {
            Self::Primitive(model) => model.ty,
            Self::Enum(model) => model.ty,
            Self::Array(model) => model.ty,
            Self::Struct(model) => model.ty,
            Self::Special(model) => model.ty,
        }
    }
}

// -----------------------------------------------------------------------------
// ModelCache

/// The session's memoized classifier.
#[derive(Debug, Default)]
pub(crate) struct ModelCache {
    cache: HashMap<TypeRef, Rc<TypeModel>>,
}

impl ModelCache {
    pub(crate) fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Classifies `ty`, returning the shared model built on first use.
    ///
    /// Optional wrappers classify as their wrapped type's model; the
    /// resolver peels the wrapper before dispatching here.
    pub(crate) fn classify(
        &mut self,
        graph: &HostGraph,
        descs: &mut DescTable,
        ty: TypeRef,
    ) -> Result<Rc<TypeModel>> {
        if let Some(model) = self.cache.get(&ty) {
            return Ok(model.clone());
        }
        let optional_inner = descs.describe(graph, ty).optional_inner();
        let model = match optional_inner {
            Some(inner) => self.classify(graph, descs, inner)?,
            None => Rc::new(Self::build(graph, ty)?),
        };
        self.cache.insert(ty, model.clone());
        Ok(model)
    }

    fn build(graph: &HostGraph, ty: TypeRef) -> Result<TypeModel> {
        let record = graph.record(ty);
        let model = match &record.shape {
            TypeShape::Root => TypeModel::Struct(StructModel {
                ty,
                members: Vec::new(),
                predicates: Vec::new(),
            }),
            TypeShape::Primitive(primitive) => TypeModel::Primitive(PrimitiveModel {
                ty,
                primitive: *primitive,
            }),
            TypeShape::Enum {
                constants,
                is_flags,
            } => TypeModel::Enum(EnumModel {
                ty,
                constants: constants.clone(),
                is_flags: *is_flags,
            }),
            TypeShape::Struct {
                members,
                predicates,
            } => TypeModel::Struct(StructModel {
                ty,
                members: members.clone(),
                predicates: predicates.clone(),
            }),
            TypeShape::Array { element }
            | TypeShape::Collection { element }
            | TypeShape::Enumerable { element } => TypeModel::Array(ArrayModel {
                ty,
                element: *element,
            }),
            TypeShape::Special(shape) => TypeModel::Special(SpecialModel { ty, shape: *shape }),
            TypeShape::Nullable { .. } => {
                // Peeled by `classify`; reaching here means the wrapper
                // wraps itself.
                return Err(ResolveError::UnsupportedType {
                    type_name: record.name.clone(),
                    reason: "cyclic optional wrapper".into(),
                    trail: Vec::new(),
                });
            }
            TypeShape::Void => {
                return Err(ResolveError::UnsupportedType {
                    type_name: record.name.clone(),
                    reason: "void has no XML model".into(),
                    trail: Vec::new(),
                });
            }
            TypeShape::Unsupported { reason } => {
                return Err(ResolveError::UnsupportedType {
                    type_name: record.name.clone(),
                    reason: reason.clone(),
                    trail: Vec::new(),
                });
            }
        };
        Ok(model)
    }
}

// -----------------------------------------------------------------------------
// Tests
