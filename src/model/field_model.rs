use crate::error::{ResolveError, Result};
use crate::meta::{HostGraph, MemberKind, TypeRef, TypeShape, XmlMemberOptions};
use crate::meta::{XmlNodeKind, XsdPrimitive};
use crate::model::StructModel;

// -----------------------------------------------------------------------------
// SpecifiedMode

/// How a member's "specified" companion can be driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpecifiedMode {
    /// No companion exists.
    #[default]
    None,
    /// A companion exists but cannot be written back.
    ReadOnly,
    /// A companion exists and round-trips.
    ReadWrite,
}

// -----------------------------------------------------------------------------
// FieldModel

/// One serializable member of a struct model, after the enumeration rules
/// have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldModel {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) kind: MemberKind,
    pub(crate) read_only: bool,
    pub(crate) specified: SpecifiedMode,
    pub(crate) should_persist: bool,
    pub(crate) xml: XmlMemberOptions,
}

impl FieldModel {
    /// Returns the member name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared member type.
    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    /// Field or property.
    #[inline]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Whether the member cannot be written back.
    #[inline]
    pub const fn read_only(&self) -> bool {
        self.read_only
    }

    /// The specified-companion mode.
    #[inline]
    pub const fn specified(&self) -> SpecifiedMode {
        self.specified
    }

    /// Whether a `should_serialize_*` predicate exists for the member.
    #[inline]
    pub const fn should_persist(&self) -> bool {
        self.should_persist
    }

    /// The member's declarative XML options.
    #[inline]
    pub const fn xml(&self) -> &XmlMemberOptions {
        &self.xml
    }
}

// -----------------------------------------------------------------------------
// Member enumeration

fn is_boolean(graph: &HostGraph, ty: TypeRef) -> bool {
    matches!(
        graph.record(ty).shape,
        TypeShape::Primitive(XsdPrimitive::Boolean)
    )
}

fn is_collection_like(graph: &HostGraph, ty: TypeRef) -> bool {
    matches!(
        graph.record(ty).shape,
        TypeShape::Array { .. } | TypeShape::Collection { .. } | TypeShape::Enumerable { .. }
    )
}

impl StructModel {
    /// Enumerates the serializable members.
    ///
    /// All fields come first, then all properties, each group in
    /// declaration order, so that two runs over the same type produce
    /// identical mapping graphs. Static members, indexers, and ignored
    /// members are skipped; read-only members are skipped unless their
    /// declared type is a collection (read-only collections are still
    /// walked, read-only scalars are not). `<name>_specified` boolean
    /// companions are consumed into [`SpecifiedMode`] rather than emitted
    /// as members of their own, and `should_serialize_<name>` predicate
    /// methods toggle [`FieldModel::should_persist`].
    pub fn members(&self, graph: &HostGraph) -> Result<Vec<FieldModel>> {
        let owner = &graph.record(self.ty).name;
        let mut out = Vec::new();

        for pass in [MemberKind::Field, MemberKind::Property] {
            for record in self.members.iter().filter(|m| m.kind == pass) {
                if record.is_static || record.is_indexer {
                    continue;
                }
                if record.xml.node == XmlNodeKind::Ignore {
                    continue;
                }
                if self.is_companion_name(&record.name) {
                    continue;
                }
                if record.read_only && !is_collection_like(graph, record.ty) {
                    continue;
                }

                let specified = match self.find_companion(&record.name) {
                    Some(companion) => {
                        if !is_boolean(graph, companion.ty) {
                            return Err(ResolveError::UnsupportedType {
                                type_name: owner.clone(),
                                reason: format!(
                                    "specified companion `{}` of member `{}` must be `boolean`",
                                    companion.name, record.name
                                ),
                                trail: vec![format!("{owner}.{}", record.name)],
                            });
                        }
                        if companion.read_only {
                            SpecifiedMode::ReadOnly
                        } else {
                            SpecifiedMode::ReadWrite
                        }
                    }
                    None => SpecifiedMode::None,
                };

                let predicate = format!("should_serialize_{}", record.name);
                out.push(FieldModel {
                    name: record.name.clone(),
                    ty: record.ty,
                    kind: record.kind,
                    read_only: record.read_only,
                    specified,
                    should_persist: self.predicates.iter().any(|p| *p == predicate),
                    xml: record.xml.clone(),
                });
            }
        }
        Ok(out)
    }

    // The companion for `name`, if declared: a non-static sibling named
    // `<name>_specified`.
    fn find_companion(&self, name: &str) -> Option<&crate::meta::MemberRecord> {
        let want = format!("{name}_specified");
        self.members.iter().find(|m| m.name == want && !m.is_static)
    }

    // Whether `name` is itself a companion of some other member.
    fn is_companion_name(&self, name: &str) -> bool {
        name.strip_suffix("_specified")
            .is_some_and(|stem| self.members.iter().any(|m| m.name == stem))
    }
}

// -----------------------------------------------------------------------------
// Tests
