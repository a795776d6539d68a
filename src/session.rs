use std::rc::Rc;

use indexmap::IndexMap;

use crate::accessor::ElementAccessor;
use crate::descriptor::{DescTable, TypeDesc};
use crate::error::{Result, Warning};
use crate::mapping::worklist::RecursionLimiter;
use crate::mapping::{Mapping, MappingArena, MappingId, NameTable};
use crate::meta::{HostGraph, TypeRef};
use crate::model::{ModelCache, TypeModel};

// -----------------------------------------------------------------------------
// Session

// Mapping cache key: one mapping node per (type, namespace context).
pub(crate) type MappingKey = (TypeRef, Option<String>);

/// One resolution session: the single owner of every cache the resolver
/// uses.
///
/// All lookup state (descriptors, models, the mapping arena, the name
/// tables, warnings) lives here, so independent sessions can resolve
/// unrelated type graphs concurrently without shared mutable state. A
/// session itself is single-threaded and synchronous: each public
/// operation runs to completion (deferring at most through the internal
/// worklist) and the caches are append-only and never evicted. Do not
/// share one session across threads without external locking; the
/// insert-then-read pattern used for self-reference detection assumes one
/// writer.
///
/// # Examples
///
/// ```
/// use xmlbind::meta::{builtin, HostGraph, MemberRecord, TypeRecord, TypeShape};
/// use xmlbind::meta::XmlMemberOptions;
/// use xmlbind::Session;
///
/// let mut graph = HostGraph::new();
/// let address = graph.push(TypeRecord::new(
///     "Address",
///     TypeShape::Struct {
///         members: vec![
///             MemberRecord::field("city", builtin::STRING),
///             MemberRecord::field("zip", builtin::STRING)
///                 .with_xml(XmlMemberOptions::attribute()),
///         ],
///         predicates: vec![],
///     },
/// ));
///
/// let mut session = Session::new(graph);
/// let id = session.resolve(address, None).unwrap();
///
/// let mapping = session.mapping(id);
/// assert_eq!(mapping.type_name(), "Address");
/// let members = mapping.as_struct().unwrap().members().unwrap();
/// assert_eq!(members.len(), 2);
/// assert!(members[1].is_attribute());
/// ```
#[derive(Debug)]
pub struct Session {
    pub(crate) graph: HostGraph,
    pub(crate) descs: DescTable,
    pub(crate) models: ModelCache,
    pub(crate) arena: MappingArena,
    pub(crate) mappings: IndexMap<MappingKey, MappingId>,
    pub(crate) types: NameTable<MappingId>,
    pub(crate) top_level_elements: NameTable<ElementAccessor>,
    pub(crate) warnings: Vec<Warning>,
    pub(crate) limiter: RecursionLimiter,
    pub(crate) trail: Vec<String>,
}

impl Session {
    /// Creates a session over `graph` with effectively unbounded descent.
    pub fn new(graph: HostGraph) -> Self {
        Self::with_max_depth(graph, usize::MAX)
    }

    /// Creates a session with a reduced descent bound.
    ///
    /// The bound never changes *what* resolves, only whether member
    /// resolution happens inline or through the deferred worklist; a
    /// bound of 1 is the diagnostic/stress mode that forces every nested
    /// struct through the worklist.
    pub fn with_max_depth(graph: HostGraph, max_depth: usize) -> Self {
        Self {
            graph,
            descs: DescTable::new(),
            models: ModelCache::new(),
            arena: MappingArena::new(),
            mappings: IndexMap::new(),
            types: NameTable::new(),
            top_level_elements: NameTable::new(),
            warnings: Vec::new(),
            limiter: RecursionLimiter::new(max_depth),
            trail: Vec::new(),
        }
    }

    /// The host graph the session resolves against.
    #[inline]
    pub fn graph(&self) -> &HostGraph {
        &self.graph
    }

    /// Describes a type (idempotent; see
    /// [`DescTable::describe`](crate::descriptor::DescTable::describe)).
    #[inline]
    pub fn describe(&mut self, ty: TypeRef) -> &TypeDesc {
        self.descs.describe(&self.graph, ty)
    }

    /// Classifies a type into its memoized [`TypeModel`].
    #[inline]
    pub fn classify(&mut self, ty: TypeRef) -> Result<Rc<TypeModel>> {
        self.models.classify(&self.graph, &mut self.descs, ty)
    }

    /// The mapping node for `id`.
    #[inline]
    pub fn mapping(&self, id: MappingId) -> &Mapping {
        self.arena.node(id)
    }

    /// The arena holding every resolved mapping node.
    #[inline]
    pub fn arena(&self) -> &MappingArena {
        &self.arena
    }

    /// All top-level (type name, namespace) definitions.
    #[inline]
    pub fn types(&self) -> &NameTable<MappingId> {
        &self.types
    }

    /// The root element accessors registered by
    /// [`resolve`](Self::resolve) and
    /// [`resolve_members`](Self::resolve_members), each carrying its
    /// mapping reference and the top-level-in-schema flag.
    #[inline]
    pub fn top_level_elements(&self) -> &NameTable<ElementAccessor> {
        &self.top_level_elements
    }

    /// Non-fatal anomalies recorded so far.
    #[inline]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}
