use core::fmt;

use crate::accessor::ElementAccessor;
use crate::mapping::{LocalAttribute, LocalElement, MemberMapping, NameTable};
use crate::meta::{TypeRef, XsdPrimitive};

// -----------------------------------------------------------------------------
// MappingId

/// A handle to one [`Mapping`] node inside a [`MappingArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MappingId(pub(crate) u32);

impl MappingId {
    /// Returns the dense index of this handle.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MappingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

// -----------------------------------------------------------------------------
// MappingState

/// Construction state of a mapping node.
///
/// A node is pushed as `Building` and registered before its payload is
/// resolved, so recursive references find the half-built node instead of
/// descending again. Whether a struct node is *fully* initialized is a
/// derived property (see [`MappingArena::is_fully_initialized`]), not a
/// third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingState {
    Building,
    Complete,
}

// -----------------------------------------------------------------------------
// Payloads

/// Payload of a primitive mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveMapping {
    pub(crate) primitive: XsdPrimitive,
}

impl PrimitiveMapping {
    /// The XSD built-in the value serializes as.
    #[inline]
    pub const fn primitive(&self) -> XsdPrimitive {
        self.primitive
    }
}

/// One resolved enum constant.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantMapping {
    pub(crate) name: String,
    pub(crate) xml_name: String,
    pub(crate) value: i64,
}

impl ConstantMapping {
    /// Host constant name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// XML spelling.
    #[inline]
    pub fn xml_name(&self) -> &str {
        &self.xml_name
    }

    /// Underlying numeric value.
    #[inline]
    pub const fn value(&self) -> i64 {
        self.value
    }
}

/// Payload of an enum mapping. Extends the primitive payload: the wire
/// value is the constant spelling carried as the underlying built-in.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMapping {
    pub(crate) primitive: PrimitiveMapping,
    pub(crate) constants: Vec<ConstantMapping>,
    pub(crate) is_flags: bool,
}

impl EnumMapping {
    /// The carrier primitive payload.
    #[inline]
    pub const fn primitive(&self) -> &PrimitiveMapping {
        &self.primitive
    }

    /// The constants in declaration order.
    #[inline]
    pub fn constants(&self) -> &[ConstantMapping] {
        &self.constants
    }

    /// Whether constants combine (space-joined value lists downstream).
    #[inline]
    pub const fn is_flags(&self) -> bool {
        self.is_flags
    }
}

/// Payload of an optional-wrapper mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct NullableMapping {
    pub(crate) base: MappingId,
}

impl NullableMapping {
    /// The wrapped value's mapping.
    #[inline]
    pub const fn base(&self) -> MappingId {
        self.base
    }
}

/// Payload of an array-like mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayMapping {
    pub(crate) elements: Vec<ElementAccessor>,
}

impl ArrayMapping {
    /// Item element alternatives, most-derived first.
    #[inline]
    pub fn elements(&self) -> &[ElementAccessor] {
        &self.elements
    }
}

/// Payload of a struct mapping.
///
/// `members` stays `None` while member resolution is deferred by the
/// recursion limiter. `derived` is the explicit children list every
/// derived mapping threads itself onto when its base is assigned.
#[derive(Debug, Clone, Default)]
pub struct StructMapping {
    pub(crate) members: Option<Vec<MemberMapping>>,
    pub(crate) base: Option<MappingId>,
    pub(crate) derived: Vec<MappingId>,
    pub(crate) local_elements: NameTable<LocalElement>,
    pub(crate) local_attributes: NameTable<LocalAttribute>,
    pub(crate) has_simple_content: bool,
    pub(crate) has_explicit_sequence: bool,
}

impl StructMapping {
    /// The ordered members, once resolved.
    #[inline]
    pub fn members(&self) -> Option<&[MemberMapping]> {
        self.members.as_deref()
    }

    /// The base mapping, if the type derives from a mapped base.
    #[inline]
    pub const fn base(&self) -> Option<MappingId> {
        self.base
    }

    /// Mappings derived from this one, in link order.
    #[inline]
    pub fn derived(&self) -> &[MappingId] {
        &self.derived
    }

    /// The scope's local element definitions.
    #[inline]
    pub const fn local_elements(&self) -> &NameTable<LocalElement> {
        &self.local_elements
    }

    /// The scope's local attribute definitions.
    #[inline]
    pub const fn local_attributes(&self) -> &NameTable<LocalAttribute> {
        &self.local_attributes
    }

    /// Whether the content model is a single text value.
    #[inline]
    pub const fn has_simple_content(&self) -> bool {
        self.has_simple_content
    }

    /// Whether members use explicit sequencing (inherited down the
    /// derived chain).
    #[inline]
    pub const fn has_explicit_sequence(&self) -> bool {
        self.has_explicit_sequence
    }

    /// The attribute member, if one exists.
    pub fn attribute_members(&self) -> impl Iterator<Item = &MemberMapping> {
        self.members().unwrap_or_default().iter().filter(|m| m.is_attribute())
    }

    /// The text member, if one exists.
    pub fn text_member(&self) -> Option<&MemberMapping> {
        self.members()?.iter().find(|m| m.is_text())
    }

    /// The namespace-declarations member, if one exists.
    pub fn xmlns_member(&self) -> Option<&MemberMapping> {
        self.members()?.iter().find(|m| m.xmlns().is_some())
    }
}

/// Payload of a special mapping (arbitrary element capture).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecialMapping {}

/// Payload of a custom-contract mapping: the host type reads and writes
/// its own XML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SerializableMapping {}

/// Payload of a top-level member-bag mapping: a virtual type whose
/// members were supplied directly instead of coming from a struct shape.
#[derive(Debug, Clone, Default)]
pub struct MembersMapping {
    pub(crate) members: Vec<MemberMapping>,
    pub(crate) local_elements: NameTable<LocalElement>,
    pub(crate) local_attributes: NameTable<LocalAttribute>,
}

impl MembersMapping {
    /// The ordered members.
    #[inline]
    pub fn members(&self) -> &[MemberMapping] {
        &self.members
    }
}

// -----------------------------------------------------------------------------
// MappingKind

/// The payload of a mapping node.
#[derive(Debug, Clone)]
pub enum MappingKind {
    Primitive(PrimitiveMapping),
    Enum(EnumMapping),
    Nullable(NullableMapping),
    Array(ArrayMapping),
    Struct(StructMapping),
    Special(SpecialMapping),
    Serializable(SerializableMapping),
    Members(MembersMapping),
}

// -----------------------------------------------------------------------------
// Mapping

/// One resolved node of the mapping graph.
#[derive(Debug, Clone)]
pub struct Mapping {
    pub(crate) ty: TypeRef,
    pub(crate) type_name: String,
    pub(crate) namespace: Option<String>,
    pub(crate) state: MappingState,
    pub(crate) referenced_by_top_level_element: bool,
    pub(crate) referenced_by_element: bool,
    pub(crate) include_in_schema: bool,
    pub(crate) kind: MappingKind,
}

impl Mapping {
    /// The described host type.
    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    /// The XML type name ("" for anonymous types).
    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The XML namespace.
    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Construction state.
    #[inline]
    pub const fn state(&self) -> MappingState {
        self.state
    }

    /// An anonymous (inline) type has an empty type name.
    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.type_name.is_empty()
    }

    /// Whether a top-level element refers to this mapping.
    #[inline]
    pub const fn referenced_by_top_level_element(&self) -> bool {
        self.referenced_by_top_level_element
    }

    /// Whether any element anywhere refers to this mapping.
    #[inline]
    pub const fn referenced_by_element(&self) -> bool {
        self.referenced_by_element
    }

    /// Whether the type participates in schema output.
    #[inline]
    pub const fn include_in_schema(&self) -> bool {
        self.include_in_schema
    }

    /// The payload.
    #[inline]
    pub const fn kind(&self) -> &MappingKind {
        &self.kind
    }

    /// The struct payload, if this is a struct mapping.
    #[inline]
    pub const fn as_struct(&self) -> Option<&StructMapping> {
        match &self.kind {
            MappingKind::Struct(payload) => Some(payload),
            _ => None,
        }
    }

    /// The array payload, if this is an array mapping.
    #[inline]
    pub const fn as_array(&self) -> Option<&ArrayMapping> {
        match &self.kind {
            MappingKind::Array(payload) => Some(payload),
            _ => None,
        }
    }

    /// The enum payload, if this is an enum mapping.
    #[inline]
    pub const fn as_enum(&self) -> Option<&EnumMapping> {
        match &self.kind {
            MappingKind::Enum(payload) => Some(payload),
            _ => None,
        }
    }

    /// The members payload, if this is a member-bag mapping.
    #[inline]
    pub const fn as_members(&self) -> Option<&MembersMapping> {
        match &self.kind {
            MappingKind::Members(payload) => Some(payload),
            _ => None,
        }
    }

    /// The nullable payload, if this is an optional-wrapper mapping.
    #[inline]
    pub const fn as_nullable(&self) -> Option<&NullableMapping> {
        match &self.kind {
            MappingKind::Nullable(payload) => Some(payload),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// MappingArena

/// Owns every mapping node of a session, addressed by [`MappingId`].
///
/// Base/derived relations are held as explicit id lists rather than
/// back-pointers, so the whole graph is cloneable and inspectable without
/// reference cycles.
#[derive(Debug, Clone, Default)]
pub struct MappingArena {
    nodes: Vec<Mapping>,
}

impl MappingArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Appends a node and returns its handle.
    pub(crate) fn push(&mut self, node: Mapping) -> MappingId {
        let id = MappingId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Returns the node for `id`.
    #[inline]
    pub fn node(&self, id: MappingId) -> &Mapping {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: MappingId) -> &mut Mapping {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates nodes in creation order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (MappingId, &Mapping)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (MappingId(index as u32), node))
    }

    /// Assigns `base` to `child` and threads `child` onto the base's
    /// derived list. Irreversible bookkeeping: if the base already uses
    /// explicit sequencing, the requirement propagates down `child`'s
    /// whole derived subtree immediately.
    pub(crate) fn set_base(&mut self, child: MappingId, base: MappingId) {
        if let MappingKind::Struct(payload) = &mut self.node_mut(child).kind {
            payload.base = Some(base);
        }
        let base_has_sequence = match &mut self.node_mut(base).kind {
            MappingKind::Struct(payload) => {
                payload.derived.push(child);
                payload.has_explicit_sequence
            }
            _ => false,
        };
        if base_has_sequence {
            self.set_explicit_sequence(child);
        }
    }

    /// Marks `id` explicitly sequenced and pushes the requirement down
    /// every mapping already linked below it. Mappings linked later pick
    /// the flag up in [`set_base`].
    pub(crate) fn set_explicit_sequence(&mut self, id: MappingId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let MappingKind::Struct(payload) = &mut self.node_mut(current).kind {
                if !payload.has_explicit_sequence {
                    payload.has_explicit_sequence = true;
                    stack.extend(payload.derived.iter().copied());
                }
            }
        }
    }

    /// Collects the derived subtree below `id` in link order (pre-order).
    pub fn collect_derived(&self, id: MappingId) -> Vec<MappingId> {
        let mut out = Vec::new();
        let mut stack = match self.node(id).as_struct() {
            Some(payload) => payload.derived.iter().rev().copied().collect::<Vec<_>>(),
            None => Vec::new(),
        };
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(payload) = self.node(current).as_struct() {
                stack.extend(payload.derived.iter().rev().copied());
            }
        }
        out
    }

    /// Whether `id` is fully initialized: its own members are resolved
    /// and, transitively, so is its whole base chain. Derived from the
    /// node contents, never stored.
    pub fn is_fully_initialized(&self, id: MappingId) -> bool {
        let mut current = id;
        loop {
            match &self.node(current).kind {
                MappingKind::Struct(payload) => {
                    if payload.members.is_none() {
                        return false;
                    }
                    match payload.base {
                        Some(base) => current = base,
                        None => return true,
                    }
                }
                _ => return matches!(self.node(current).state, MappingState::Complete),
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::builtin;

    fn struct_node(name: &str) -> Mapping {
        Mapping {
            ty: builtin::ANY_TYPE,
            type_name: name.into(),
            namespace: None,
            state: MappingState::Building,
            referenced_by_top_level_element: false,
            referenced_by_element: false,
            include_in_schema: true,
            kind: MappingKind::Struct(StructMapping::default()),
        }
    }

    #[test]
    fn set_base_threads_the_derived_list() {
        let mut arena = MappingArena::new();
        let base = arena.push(struct_node("Base"));
        let child_a = arena.push(struct_node("A"));
        let child_b = arena.push(struct_node("B"));
        arena.set_base(child_a, base);
        arena.set_base(child_b, base);

        let payload = arena.node(base).as_struct().unwrap();
        assert_eq!(payload.derived(), [child_a, child_b]);
        assert_eq!(arena.node(child_a).as_struct().unwrap().base(), Some(base));
    }

    #[test]
    fn explicit_sequence_propagates_to_existing_and_later_children() {
        let mut arena = MappingArena::new();
        let base = arena.push(struct_node("Base"));
        let early = arena.push(struct_node("Early"));
        arena.set_base(early, base);

        arena.set_explicit_sequence(base);
        assert!(arena.node(early).as_struct().unwrap().has_explicit_sequence());

        let late = arena.push(struct_node("Late"));
        arena.set_base(late, base);
        assert!(arena.node(late).as_struct().unwrap().has_explicit_sequence());
    }

    #[test]
    fn full_initialization_requires_the_whole_base_chain() {
        let mut arena = MappingArena::new();
        let base = arena.push(struct_node("Base"));
        let child = arena.push(struct_node("Child"));
        arena.set_base(child, base);

        if let MappingKind::Struct(payload) = &mut arena.node_mut(child).kind {
            payload.members = Some(Vec::new());
        }
        assert!(!arena.is_fully_initialized(child));

        if let MappingKind::Struct(payload) = &mut arena.node_mut(base).kind {
            payload.members = Some(Vec::new());
        }
        assert!(arena.is_fully_initialized(child));
    }

    #[test]
    fn derived_subtrees_collect_in_link_order() {
        let mut arena = MappingArena::new();
        let root = arena.push(struct_node("Root"));
        let a = arena.push(struct_node("A"));
        let b = arena.push(struct_node("B"));
        let aa = arena.push(struct_node("AA"));
        arena.set_base(a, root);
        arena.set_base(b, root);
        arena.set_base(aa, a);

        assert_eq!(arena.collect_derived(root), [a, aa, b]);
    }
}
