use crate::descriptor::{TypeDesc, TypeFlags, TypeKind};
use crate::meta::{HostGraph, SpecialShape, TypeRef, TypeShape};

// -----------------------------------------------------------------------------
// DescTable

// Descriptor construction states, per record slot.
#[derive(Debug, Clone)]
enum Slot {
    Unseen,
    Building,
    Done(TypeDesc),
}

/// The descriptor table: one lazily-built, immutable [`TypeDesc`] per
/// [`TypeRef`].
///
/// `describe` is idempotent: the first call for a type classifies it and
/// caches the descriptor, later calls return the cached one. Unsupported
/// shapes are *recorded*, not rejected: the descriptor carries a deferred
/// reason and [`TypeDesc::check_supported`] raises it only when a mapping
/// actually materializes the type.
#[derive(Debug, Default)]
pub struct DescTable {
    slots: Vec<Slot>,
}

impl DescTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Returns the descriptor for `ty`, building it on first use.
    pub fn describe(&mut self, graph: &HostGraph, ty: TypeRef) -> &TypeDesc {
        self.ensure(graph, ty);
        match &self.slots[ty.index()] {
            Slot::Done(desc) => desc,
            // `ensure` leaves `Building` in place only while a base-chain
            // walk is in flight, never across the public call boundary.
            _ => unreachable!("descriptor slot filled by ensure"),
        }
    }

    /// Returns the descriptor for `ty` if it has already been built.
    #[inline]
    pub fn get(&self, ty: TypeRef) -> Option<&TypeDesc> {
        match self.slots.get(ty.index()) {
            Some(Slot::Done(desc)) => Some(desc),
            _ => None,
        }
    }

    /// Derivation weight of an already-described type.
    #[inline]
    pub(crate) fn weight_of(&self, ty: TypeRef) -> i32 {
        self.get(ty).map_or(0, |desc| desc.weight)
    }

    fn ensure(&mut self, graph: &HostGraph, ty: TypeRef) {
        if ty.index() >= self.slots.len() {
            let len = graph.len().max(ty.index() + 1);
            self.slots.resize_with(len, || Slot::Unseen);
        }
        match self.slots[ty.index()] {
            Slot::Done(_) | Slot::Building => return,
            Slot::Unseen => {}
        }
        self.slots[ty.index()] = Slot::Building;
        let desc = self.build(graph, ty);
        self.slots[ty.index()] = Slot::Done(desc);
    }

    // Classifies one record. Base and inner links are described first so
    // weights can be derived; a link that loops back onto a type still
    // being built marks the descriptor unsupported instead of recursing.
    fn build(&mut self, graph: &HostGraph, ty: TypeRef) -> TypeDesc {
        let record = graph.record(ty);
        let mut desc = TypeDesc {
            ty,
            name: record.name.clone(),
            full_name: record.full_name.clone(),
            kind: TypeKind::Void,
            flags: TypeFlags::default(),
            base: None,
            element: None,
            optional_inner: None,
            weight: 0,
            unsupported: None,
        };

        match &record.shape {
            TypeShape::Root => {
                desc.kind = TypeKind::Root;
                desc.weight = -1;
                desc.flags = TypeFlags::CAN_BE_ELEMENT_VALUE;
            }
            TypeShape::Primitive(primitive) => {
                desc.kind = TypeKind::Primitive;
                desc.weight = 1;
                desc.flags = TypeFlags::SIMPLE_VALUE | TypeFlags::IGNORE_DEFAULT;
                if primitive.collapses_whitespace() {
                    desc.flags |= TypeFlags::COLLAPSE_WHITESPACE;
                }
                if primitive.is_ambiguous() {
                    desc.flags |= TypeFlags::AMBIGUOUS_DATA_TYPE;
                }
            }
            TypeShape::Enum { .. } => {
                desc.kind = TypeKind::Enum;
                desc.weight = 2;
                desc.flags =
                    TypeFlags::SIMPLE_VALUE | TypeFlags::IGNORE_DEFAULT | TypeFlags::COLLAPSE_WHITESPACE;
            }
            TypeShape::Struct { .. } => {
                let facts = record.facts;
                desc.kind = if facts.value_type {
                    TypeKind::Struct
                } else {
                    TypeKind::Class
                };
                desc.flags = TypeFlags::CAN_BE_ELEMENT_VALUE;
                if facts.value_type {
                    desc.flags |= TypeFlags::VALUE_TYPE | TypeFlags::HAS_DEFAULT_CONSTRUCTOR;
                }
                if facts.has_default_ctor {
                    desc.flags |= TypeFlags::HAS_DEFAULT_CONSTRUCTOR;
                }
                if facts.ctor_inaccessible {
                    desc.flags |= TypeFlags::CTOR_INACCESSIBLE;
                }
                if facts.is_abstract {
                    desc.flags |= TypeFlags::ABSTRACT;
                }
                if facts.generic_fallback {
                    desc.flags |= TypeFlags::GENERIC_FALLBACK;
                }
                if let Some(base) = record.base {
                    desc.base = Some(base);
                    self.ensure(graph, base);
                    match self.get(base) {
                        Some(base_desc) => desc.weight = base_desc.weight + 1,
                        None => {
                            desc.unsupported = Some("cyclic base-type chain".into());
                        }
                    }
                }
                let constructible =
                    facts.value_type || (facts.has_default_ctor && !facts.ctor_inaccessible);
                if !constructible && !facts.is_abstract {
                    desc.unsupported =
                        Some("no accessible parameterless constructor".into());
                }
            }
            TypeShape::Array { element } => {
                desc.kind = TypeKind::Array;
                desc.element = Some(*element);
                desc.flags = TypeFlags::HAS_DEFAULT_CONSTRUCTOR | TypeFlags::CAN_BE_ELEMENT_VALUE;
            }
            TypeShape::Collection { element } => {
                desc.kind = TypeKind::Collection;
                desc.element = Some(*element);
                desc.flags = TypeFlags::HAS_DEFAULT_CONSTRUCTOR | TypeFlags::CAN_BE_ELEMENT_VALUE;
            }
            TypeShape::Enumerable { element } => {
                desc.kind = TypeKind::Enumerable;
                desc.element = Some(*element);
                desc.flags = TypeFlags::HAS_DEFAULT_CONSTRUCTOR | TypeFlags::CAN_BE_ELEMENT_VALUE;
            }
            TypeShape::Nullable { inner } => {
                desc.optional_inner = Some(*inner);
                self.ensure(graph, *inner);
                match self.get(*inner) {
                    Some(inner_desc) => {
                        desc.kind = inner_desc.kind;
                        desc.flags = inner_desc.flags | TypeFlags::OPTIONAL_VALUE;
                        desc.base = inner_desc.base;
                        desc.element = inner_desc.element;
                        desc.weight = inner_desc.weight;
                        desc.unsupported = inner_desc.unsupported.clone();
                    }
                    None => {
                        desc.unsupported = Some("cyclic optional wrapper".into());
                    }
                }
            }
            TypeShape::Void => {
                desc.kind = TypeKind::Void;
            }
            TypeShape::Special(shape) => {
                desc.kind = TypeKind::Special;
                desc.flags = TypeFlags::CAN_BE_ELEMENT_VALUE;
                if matches!(shape, SpecialShape::CustomSerializable) {
                    desc.flags |= TypeFlags::XML_SERIALIZABLE | TypeFlags::HAS_DEFAULT_CONSTRUCTOR;
                }
            }
            TypeShape::Unsupported { reason } => {
                desc.kind = TypeKind::Class;
                desc.unsupported = Some(reason.clone());
            }
        }

        if desc.unsupported.is_some() {
            desc.flags |= TypeFlags::UNSUPPORTED;
        }
        desc
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{builtin, HostFacts, MemberRecord, TypeRecord};

    fn struct_record(name: &str) -> TypeRecord {
        TypeRecord::new(
            name,
            TypeShape::Struct {
                members: vec![MemberRecord::field("value", builtin::INT)],
                predicates: vec![],
            },
        )
    }

    #[test]
    fn weight_increases_along_base_chains() {
        let mut graph = HostGraph::new();
        let c = graph.push(struct_record("C"));
        let b = graph.push(struct_record("B").with_base(c));
        let a = graph.push(struct_record("A").with_base(b));

        let mut table = DescTable::new();
        assert_eq!(table.describe(&graph, builtin::ANY_TYPE).weight(), -1);
        assert_eq!(table.describe(&graph, c).weight(), 0);
        assert_eq!(table.describe(&graph, b).weight(), 1);
        assert_eq!(table.describe(&graph, a).weight(), 2);
    }

    #[test]
    fn primitives_and_enums_use_synthetic_weights() {
        let mut graph = HostGraph::new();
        let color = graph.push(TypeRecord::new(
            "Color",
            TypeShape::Enum {
                constants: vec![],
                is_flags: false,
            },
        ));

        let mut table = DescTable::new();
        assert_eq!(table.describe(&graph, builtin::STRING).weight(), 1);
        assert_eq!(table.describe(&graph, color).weight(), 2);
        assert!(table.describe(&graph, color).can_be_attribute_value());
    }

    #[test]
    fn describe_is_idempotent() {
        let mut graph = HostGraph::new();
        let s = graph.push(struct_record("S"));
        let mut table = DescTable::new();
        let first = table.describe(&graph, s).clone();
        let second = table.describe(&graph, s).clone();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_constructor_defers_instead_of_failing() {
        let mut graph = HostGraph::new();
        let bad = graph.push(struct_record("NoCtor").with_facts(HostFacts {
            has_default_ctor: false,
            ..HostFacts::default()
        }));

        let mut table = DescTable::new();
        let desc = table.describe(&graph, bad);
        assert!(desc.is_unsupported());
        assert!(desc.check_supported().is_err());
    }

    #[test]
    fn abstract_types_without_constructor_stay_supported() {
        let mut graph = HostGraph::new();
        let shape = graph.push(struct_record("Shape").with_facts(HostFacts {
            has_default_ctor: false,
            is_abstract: true,
            ..HostFacts::default()
        }));

        let mut table = DescTable::new();
        assert!(table.describe(&graph, shape).check_supported().is_ok());
    }

    #[test]
    fn cyclic_base_chain_is_flagged_not_looped() {
        let mut graph = HostGraph::new();
        // Forward handles let the two records name each other as base.
        let a_handle = TypeRef(graph.len() as u32);
        let b_handle = TypeRef(graph.len() as u32 + 1);
        let a = graph.push(struct_record("A").with_base(b_handle));
        let b = graph.push(struct_record("B").with_base(a_handle));
        assert_eq!((a, b), (a_handle, b_handle));

        let mut table = DescTable::new();
        // Building A walks into B, which finds A mid-build and gives up.
        assert_eq!(table.describe(&graph, a).weight(), 1);
        assert!(table.describe(&graph, b).is_unsupported());
    }

    #[test]
    fn nullable_mirrors_inner_and_marks_optional() {
        let mut graph = HostGraph::new();
        let opt_int = graph.push(TypeRecord::new(
            "int?",
            TypeShape::Nullable {
                inner: builtin::INT,
            },
        ));

        let mut table = DescTable::new();
        let desc = table.describe(&graph, opt_int);
        assert_eq!(desc.kind(), TypeKind::Primitive);
        assert!(desc.is_optional_value());
        assert_eq!(desc.optional_inner(), Some(builtin::INT));
        assert_eq!(desc.weight(), 1);
    }
}
