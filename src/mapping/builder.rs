//! The mapping graph builder: turns (type, namespace context) pairs into
//! arena nodes.
//!
//! Each node moves `Building → Complete`. A node is pushed, cached, and
//! name-checked *before* its payload resolves, so recursive references
//! find the half-built node instead of descending again; member
//! resolution past the descent bound goes through the deferred worklist
//! and is drained before any public resolve call returns.

use log::trace;

use crate::accessor::{AttributeAccessor, ChoiceIdentifierAccessor, ElementAccessor};
use crate::accessor::{TextAccessor, XmlnsAccessor, XSD_NAMESPACE};
use crate::descriptor::{TypeDesc, TypeFlags, TypeKind};
use crate::error::{ResolveError, Result, Warning, WarningKind};
use crate::mapping::worklist::WorkItem;
use crate::mapping::{compare_members, ArrayMapping, ConstantMapping, EnumMapping};
use crate::mapping::{LocalAttribute, LocalElement, Mapping, MappingId, MappingKind};
use crate::mapping::{MappingState, MemberMapping, MembersMapping, NameKey, NameTable};
use crate::mapping::{NullableMapping, PrimitiveMapping, SerializableMapping};
use crate::mapping::{SpecialMapping, StructMapping};
use crate::meta::{MemberRecord, SpecialShape, TypeRecord, TypeRef, TypeShape};
use crate::meta::{XmlElementOptions, XmlNodeKind, XmlTypeOptions, XsdPrimitive};
use crate::model::FieldModel;
use crate::session::{MappingKey, Session};

// -----------------------------------------------------------------------------
// Public operations

impl Session {
    /// Resolves the mapping graph rooted at `ty`.
    ///
    /// The returned node is marked as referenced by a top-level element
    /// and its element name is registered in
    /// [`top_level_elements`](Self::top_level_elements). Requesting an
    /// already-complete type returns the same node, never a new one.
    pub fn resolve(&mut self, ty: TypeRef, default_ns: Option<&str>) -> Result<MappingId> {
        trace!("resolving mapping for {ty}");
        let id = self.import_type(ty, default_ns)?;
        self.arena.node_mut(id).referenced_by_top_level_element = true;
        let (element_name, element_ns) = {
            let node = self.arena.node(id);
            let name = if node.type_name().is_empty() {
                self.graph.record(node.ty()).name.clone()
            } else {
                node.type_name().to_owned()
            };
            (name, node.namespace().map(str::to_owned))
        };
        let desc = self.descs.describe(&self.graph, ty).clone();
        let mut root = ElementAccessor::new(element_name.clone());
        root.namespace = element_ns.clone();
        root.nullable =
            desc.is_optional_value() || (desc.kind().is_aggregate() && !desc.is_value_type());
        root.top_level_in_schema = true;
        root.mapping = Some(id);
        self.top_level_elements
            .insert(NameKey::new(element_name, element_ns.as_deref()), root)?;
        self.drain()?;
        Ok(id)
    }

    /// Resolves a top-level bag of members into a
    /// [`MembersMapping`](crate::mapping::MembersMapping): a virtual
    /// type whose members are supplied directly instead of coming from a
    /// struct shape.
    pub fn resolve_members(
        &mut self,
        name: &str,
        default_ns: Option<&str>,
        members: &[MemberRecord],
    ) -> Result<MappingId> {
        trace!("resolving member bag `{name}`");
        let virtual_ty = self.graph.push(
            TypeRecord::new(
                name,
                TypeShape::Struct {
                    members: members.to_vec(),
                    predicates: Vec::new(),
                },
            )
            .with_xml(XmlTypeOptions::default().skip_schema()),
        );
        let model = self.classify(virtual_ty)?;
        let struct_model = model.as_struct().map_err(|mismatch| {
            ResolveError::UnsupportedType {
                type_name: name.to_owned(),
                reason: mismatch.to_string(),
                trail: self.trail.clone(),
            }
        })?;
        let fields = struct_model.members(&self.graph)?;
        let siblings: Vec<(String, TypeRef)> =
            members.iter().map(|m| (m.name.clone(), m.ty)).collect();

        let mut mapped = Vec::with_capacity(fields.len());
        let mut local_elements = NameTable::new();
        let mut local_attributes = NameTable::new();
        for field in &fields {
            self.trail.push(format!("{name}.{}", field.name()));
            let result = self.import_accessor_mapping(field, default_ns, &siblings);
            self.trail.pop();
            let member = result?;
            Self::register_member_scope(&mut local_elements, &mut local_attributes, &member)?;
            mapped.push(member);
        }
        mapped.sort_by(compare_members);

        let id = self.arena.push(Mapping {
            ty: virtual_ty,
            type_name: name.to_owned(),
            namespace: default_ns.map(str::to_owned),
            state: MappingState::Complete,
            referenced_by_top_level_element: true,
            referenced_by_element: false,
            include_in_schema: false,
            kind: MappingKind::Members(MembersMapping {
                members: mapped,
                local_elements,
                local_attributes,
            }),
        });
        let mut root = ElementAccessor::new(name);
        root.namespace = default_ns.map(str::to_owned);
        root.top_level_in_schema = true;
        root.mapping = Some(id);
        self.top_level_elements
            .insert(NameKey::new(name.to_owned(), default_ns), root)?;
        self.drain()?;
        Ok(id)
    }

    /// Stable-sorts element alternatives most-derived-first: descending
    /// by the derivation weight of each accessor's mapped type, equal
    /// weights keeping their original relative order. The most specific
    /// alternative is therefore tried first when dispatching a value's
    /// runtime type or an incoming element name.
    pub fn elements_sorted_by_derivation(
        &self,
        elements: &[ElementAccessor],
    ) -> Vec<ElementAccessor> {
        let mut sorted = elements.to_vec();
        self.sort_by_derivation(&mut sorted);
        sorted
    }
}

// -----------------------------------------------------------------------------
// Import machinery

impl Session {
    // Runs the deferred worklist to empty. Every popped item resolves at
    // the surface depth and may enqueue further items behind it; the
    // graph is final only once the queue is dry.
    fn drain(&mut self) -> Result<()> {
        while let Some(item) = self.limiter.pop() {
            trace!("draining deferred members for {}", item.mapping);
            self.import_members_limited(item.mapping, item.ty, item.namespace.as_deref())?;
        }
        debug_assert!(!self.limiter.has_pending());
        Ok(())
    }

    fn import_type(&mut self, ty: TypeRef, ns: Option<&str>) -> Result<MappingId> {
        let desc = self.descs.describe(&self.graph, ty).clone();
        // Primitives are context-free; everything else keys on the
        // namespace it resolves into.
        let key: MappingKey = if desc.kind() == TypeKind::Primitive && !desc.is_optional_value() {
            (ty, None)
        } else {
            (ty, self.xml_namespace(ty, ns))
        };
        if let Some(&id) = self.mappings.get(&key) {
            return Ok(id);
        }
        if let Some(reason) = desc.unsupported.clone() {
            return Err(ResolveError::UnsupportedType {
                type_name: desc.name().to_owned(),
                reason,
                trail: self.trail.clone(),
            });
        }
        trace!("importing {} `{}`", desc.kind(), desc.full_name());
        if let Some(inner) = desc.optional_inner() {
            return self.import_nullable(ty, inner, ns, key);
        }
        match desc.kind() {
            TypeKind::Primitive => self.import_primitive(ty, key),
            TypeKind::Enum => self.import_enum(ty, ns, key),
            TypeKind::Array | TypeKind::Collection | TypeKind::Enumerable => {
                self.import_array_like(ty, &desc, ns, key)
            }
            TypeKind::Root | TypeKind::Struct | TypeKind::Class => {
                self.import_struct_like(ty, &desc, ns, key)
            }
            TypeKind::Special => self.import_special(ty, ns, key),
            TypeKind::Void => Err(ResolveError::UnsupportedType {
                type_name: desc.name().to_owned(),
                reason: "void cannot appear in a mapping graph".into(),
                trail: self.trail.clone(),
            }),
        }
    }

    fn import_nullable(
        &mut self,
        ty: TypeRef,
        inner: TypeRef,
        ns: Option<&str>,
        key: MappingKey,
    ) -> Result<MappingId> {
        let base = self.import_type(inner, ns)?;
        let (type_name, namespace, include_in_schema) = {
            let node = self.arena.node(base);
            (
                node.type_name().to_owned(),
                node.namespace().map(str::to_owned),
                node.include_in_schema(),
            )
        };
        let id = self.arena.push(Mapping {
            ty,
            type_name,
            namespace,
            state: MappingState::Complete,
            referenced_by_top_level_element: false,
            referenced_by_element: false,
            include_in_schema,
            kind: MappingKind::Nullable(NullableMapping { base }),
        });
        self.mappings.insert(key, id);
        Ok(id)
    }

    fn import_primitive(&mut self, ty: TypeRef, key: MappingKey) -> Result<MappingId> {
        let primitive = match &self.graph.record(ty).shape {
            TypeShape::Primitive(primitive) => *primitive,
            _ => return Err(self.shape_mismatch(ty, "a primitive shape")),
        };
        let id = self.arena.push(Mapping {
            ty,
            type_name: primitive.xsd_name().to_owned(),
            namespace: Some(XSD_NAMESPACE.to_owned()),
            state: MappingState::Complete,
            referenced_by_top_level_element: false,
            referenced_by_element: false,
            include_in_schema: false,
            kind: MappingKind::Primitive(PrimitiveMapping { primitive }),
        });
        self.mappings.insert(key, id);
        Ok(id)
    }

    fn import_enum(&mut self, ty: TypeRef, ns: Option<&str>, key: MappingKey) -> Result<MappingId> {
        let (constants, is_flags) = match &self.graph.record(ty).shape {
            TypeShape::Enum {
                constants,
                is_flags,
            } => (constants.clone(), *is_flags),
            _ => return Err(self.shape_mismatch(ty, "an enum shape")),
        };
        let type_name = self.xml_type_name(ty);
        let namespace = self.xml_namespace(ty, ns);
        let include_in_schema = self.graph.record(ty).xml.include_in_schema;

        let constants: Vec<ConstantMapping> = constants
            .iter()
            .map(|constant| ConstantMapping {
                name: constant.name.clone(),
                xml_name: constant
                    .xml_name
                    .clone()
                    .unwrap_or_else(|| constant.name.clone()),
                value: constant.value,
            })
            .collect();
        {
            let mut seen = std::collections::HashSet::new();
            for constant in &constants {
                if !seen.insert(constant.xml_name.as_str()) {
                    return Err(ResolveError::DuplicateDefinition {
                        name: constant.xml_name.clone(),
                        namespace: namespace.clone().unwrap_or_default(),
                    });
                }
            }
        }

        let id = self.arena.push(Mapping {
            ty,
            type_name: type_name.clone(),
            namespace: namespace.clone(),
            state: MappingState::Complete,
            referenced_by_top_level_element: false,
            referenced_by_element: false,
            include_in_schema,
            kind: MappingKind::Enum(EnumMapping {
                primitive: PrimitiveMapping {
                    primitive: XsdPrimitive::String,
                },
                constants,
                is_flags,
            }),
        });
        self.mappings.insert(key, id);
        if !type_name.is_empty() && include_in_schema {
            self.types
                .insert(NameKey::new(type_name, namespace.as_deref()), id)?;
        }
        Ok(id)
    }

    fn import_array_like(
        &mut self,
        ty: TypeRef,
        desc: &TypeDesc,
        ns: Option<&str>,
        key: MappingKey,
    ) -> Result<MappingId> {
        let Some(element_ty) = desc.element() else {
            return Err(self.shape_mismatch(ty, "an array-like shape"));
        };
        let namespace = self.xml_namespace(ty, ns);
        let (declared_name, anonymous, include_in_schema) = {
            let record = self.graph.record(ty);
            (
                record.xml.name.clone(),
                record.xml.anonymous,
                record.xml.include_in_schema,
            )
        };

        // Cached before the item type imports, so an item that loops back
        // through this collection finds the half-built node.
        let id = self.arena.push(Mapping {
            ty,
            type_name: declared_name.clone().unwrap_or_default(),
            namespace: namespace.clone(),
            state: MappingState::Building,
            referenced_by_top_level_element: false,
            referenced_by_element: false,
            include_in_schema,
            kind: MappingKind::Array(ArrayMapping {
                elements: Vec::new(),
            }),
        });
        self.mappings.insert(key, id);

        let element_id = self.import_type(element_ty, ns)?;
        self.arena.node_mut(element_id).referenced_by_element = true;
        let (item_name, item_nullable) = {
            let element_node = self.arena.node(element_id);
            let name = if element_node.type_name().is_empty() {
                self.graph.record(element_node.ty()).name.clone()
            } else {
                element_node.type_name().to_owned()
            };
            let nullable = !self.descs.describe(&self.graph, element_ty).is_value_type();
            (name, nullable)
        };
        let synthesized = format!("ArrayOf{}", upper_first(&item_name));

        let mut item = ElementAccessor::new(item_name);
        item.namespace = namespace.clone();
        item.nullable = item_nullable;
        item.mapping = Some(element_id);
        let mut elements = vec![item];
        if self.descs.describe(&self.graph, element_ty).kind().is_aggregate() {
            self.push_substitutions(&mut elements, element_id, namespace.as_deref(), item_nullable);
        }
        self.sort_by_derivation(&mut elements);

        let type_name = match declared_name {
            Some(name) => name,
            None if anonymous => String::new(),
            None => synthesized,
        };
        {
            let node = self.arena.node_mut(id);
            node.type_name = type_name.clone();
            if let MappingKind::Array(payload) = &mut node.kind {
                payload.elements = elements;
            }
            node.state = MappingState::Complete;
        }
        if !type_name.is_empty() && include_in_schema {
            self.types
                .insert(NameKey::new(type_name, namespace.as_deref()), id)?;
        }
        Ok(id)
    }

    fn import_special(
        &mut self,
        ty: TypeRef,
        ns: Option<&str>,
        key: MappingKey,
    ) -> Result<MappingId> {
        let shape = match &self.graph.record(ty).shape {
            TypeShape::Special(shape) => *shape,
            _ => return Err(self.shape_mismatch(ty, "a special shape")),
        };
        let type_name = self.xml_type_name(ty);
        let namespace = self.xml_namespace(ty, ns);
        let include_in_schema = self.graph.record(ty).xml.include_in_schema;
        let kind = match shape {
            SpecialShape::AnyElement => MappingKind::Special(SpecialMapping::default()),
            SpecialShape::CustomSerializable => {
                MappingKind::Serializable(SerializableMapping::default())
            }
        };
        let id = self.arena.push(Mapping {
            ty,
            type_name: type_name.clone(),
            namespace: namespace.clone(),
            state: MappingState::Complete,
            referenced_by_top_level_element: false,
            referenced_by_element: false,
            include_in_schema,
            kind,
        });
        self.mappings.insert(key, id);
        if matches!(shape, SpecialShape::CustomSerializable)
            && !type_name.is_empty()
            && include_in_schema
        {
            self.types
                .insert(NameKey::new(type_name, namespace.as_deref()), id)?;
        }
        Ok(id)
    }

    fn import_struct_like(
        &mut self,
        ty: TypeRef,
        desc: &TypeDesc,
        ns: Option<&str>,
        key: MappingKey,
    ) -> Result<MappingId> {
        let is_root = desc.kind() == TypeKind::Root;
        let type_name = self.xml_type_name(ty);
        let namespace = self.xml_namespace(ty, ns);
        let (include_in_schema, includes, base_ref) = {
            let record = self.graph.record(ty);
            (
                record.xml.include_in_schema && !is_root,
                record.xml.includes.clone(),
                record.base,
            )
        };

        let id = self.arena.push(Mapping {
            ty,
            type_name: type_name.clone(),
            namespace: namespace.clone(),
            state: MappingState::Building,
            referenced_by_top_level_element: false,
            referenced_by_element: false,
            include_in_schema,
            kind: MappingKind::Struct(StructMapping::default()),
        });
        self.mappings.insert(key, id);
        // The half-built node is registered (and name-checked) before any
        // member resolves, so self-references land on it.
        if !type_name.is_empty() && include_in_schema {
            self.types
                .insert(NameKey::new(type_name, namespace.as_deref()), id)?;
        }

        if let Some(base_ty) = base_ref {
            if !is_root && self.descs.describe(&self.graph, base_ty).kind().is_aggregate() {
                let base_id = self.import_type(base_ty, ns)?;
                self.arena.set_base(id, base_id);
            }
        }

        self.import_members_limited(id, ty, ns)?;

        // Substitution types import after the type itself so they thread
        // onto its derived list.
        for include in includes {
            self.import_type(include, ns)?;
        }
        Ok(id)
    }

    fn import_members_limited(&mut self, id: MappingId, ty: TypeRef, ns: Option<&str>) -> Result<()> {
        if self.limiter.try_descend() {
            let result = self.import_members(id, ty, ns);
            self.limiter.ascend();
            result
        } else {
            self.limiter.defer(WorkItem {
                mapping: id,
                ty,
                namespace: ns.map(str::to_owned),
            });
            Ok(())
        }
    }

    fn import_members(&mut self, id: MappingId, ty: TypeRef, ns: Option<&str>) -> Result<()> {
        let model = self.models.classify(&self.graph, &mut self.descs, ty)?;
        let owner_name = self.graph.record(ty).name.clone();
        let struct_model = model.as_struct().map_err(|mismatch| {
            ResolveError::UnsupportedType {
                type_name: owner_name.clone(),
                reason: mismatch.to_string(),
                trail: self.trail.clone(),
            }
        })?;
        let fields = struct_model.members(&self.graph)?;
        let siblings: Vec<(String, TypeRef)> = struct_model
            .raw_members()
            .iter()
            .map(|m| (m.name.clone(), m.ty))
            .collect();

        let mut members: Vec<MemberMapping> = Vec::with_capacity(fields.len());
        let mut local_elements = NameTable::new();
        let mut local_attributes = NameTable::new();
        for field in &fields {
            self.trail.push(format!("{owner_name}.{}", field.name()));
            let result = self.import_accessor_mapping(field, ns, &siblings);
            self.trail.pop();
            let mapped = result?;

            if let Some((base_owner, declared)) = self.find_declaring(id, mapped.name()) {
                if declared.ty() != mapped.ty() || !declared.matches(&mapped) {
                    return Err(ResolveError::InvalidOverride {
                        derived: owner_name.clone(),
                        base: base_owner,
                        member: mapped.name().to_owned(),
                    });
                }
                self.warnings.push(Warning::new(
                    WarningKind::MemberHidden,
                    format!(
                        "member `{}` of `{owner_name}` reuses the mapping declared by `{base_owner}`",
                        mapped.name()
                    ),
                ));
                continue;
            }

            Self::register_member_scope(&mut local_elements, &mut local_attributes, &mapped)?;
            members.push(mapped);
        }
        members.sort_by(compare_members);

        let has_explicit_sequence = members.iter().any(|m| m.sequence_id().is_some());
        let has_text = members.iter().any(MemberMapping::is_text);
        let has_particles = members.iter().any(MemberMapping::is_particle);
        {
            let node = self.arena.node_mut(id);
            if let MappingKind::Struct(payload) = &mut node.kind {
                payload.members = Some(members);
                payload.local_elements = local_elements;
                payload.local_attributes = local_attributes;
                payload.has_simple_content = has_text && !has_particles;
            }
            node.state = MappingState::Complete;
        }
        if has_explicit_sequence {
            self.arena.set_explicit_sequence(id);
        }
        Ok(())
    }

    // Walks the base chain for a member with the same name. The caller
    // decides between reuse (shapes match) and an invalid override.
    fn find_declaring(&self, id: MappingId, member_name: &str) -> Option<(String, MemberMapping)> {
        let mut next = self.arena.node(id).as_struct().and_then(|payload| payload.base());
        while let Some(ancestor) = next {
            let node = self.arena.node(ancestor);
            let payload = node.as_struct()?;
            if let Some(found) = payload
                .members()
                .unwrap_or_default()
                .iter()
                .find(|member| member.name() == member_name)
            {
                return Some((self.graph.record(node.ty()).name.clone(), found.clone()));
            }
            next = payload.base();
        }
        None
    }

    fn register_member_scope(
        elements: &mut NameTable<LocalElement>,
        attributes: &mut NameTable<LocalAttribute>,
        member: &MemberMapping,
    ) -> Result<()> {
        for element in member.elements() {
            if element.is_any() {
                continue;
            }
            elements.insert(
                NameKey::new(element.name().to_owned(), element.namespace()),
                LocalElement {
                    member: member.name().to_owned(),
                    form: element.form(),
                    nullable: element.is_nullable(),
                },
            )?;
        }
        if let Some(attribute) = member.attribute() {
            attributes.insert(
                NameKey::new(attribute.name().to_owned(), attribute.namespace()),
                LocalAttribute {
                    member: member.name().to_owned(),
                    form: attribute.form(),
                },
            )?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Member accessors

impl Session {
    // Builds the MemberMapping for one field: exactly one of the accessor
    // slot families gets filled, chosen by the declared classification
    // and the member's model kind.
    fn import_accessor_mapping(
        &mut self,
        field: &FieldModel,
        ns: Option<&str>,
        siblings: &[(String, TypeRef)],
    ) -> Result<MemberMapping> {
        let mut member = MemberMapping {
            name: field.name().to_owned(),
            ty: field.ty(),
            elements: Vec::new(),
            attribute: None,
            text: None,
            choice: None,
            xmlns: None,
            sequence_id: field.xml().order,
            specified: field.specified(),
            should_persist: field.should_persist(),
        };
        if field.xml().namespace_declarations {
            member.xmlns = Some(XmlnsAccessor {
                member_name: member.name.clone(),
            });
            return Ok(member);
        }

        let desc = self.descs.describe(&self.graph, field.ty()).clone();
        if field.xml().default.is_set() && !desc.flags().contains(TypeFlags::IGNORE_DEFAULT) {
            self.warnings.push(Warning::new(
                WarningKind::DefaultIgnored,
                format!(
                    "default value on member `{}` of type `{}` will not round-trip",
                    field.name(),
                    desc.name()
                ),
            ));
        }

        match field.xml().node {
            // Unreachable through the enumerator; an accessor-less member
            // is the "none" classification.
            XmlNodeKind::Ignore => Ok(member),
            XmlNodeKind::Text => {
                self.import_text_member(field, &desc, ns, &mut member)?;
                Ok(member)
            }
            XmlNodeKind::Attribute => {
                self.import_attribute_member(field, &desc, ns, &mut member)?;
                Ok(member)
            }
            XmlNodeKind::AnyElement => {
                self.import_any_member(field, &desc, ns, &mut member)?;
                Ok(member)
            }
            XmlNodeKind::Default | XmlNodeKind::Element => {
                if desc.kind() == TypeKind::Special {
                    self.import_any_member(field, &desc, ns, &mut member)?;
                } else {
                    self.import_element_member(field, &desc, ns, siblings, &mut member)?;
                }
                Ok(member)
            }
        }
    }

    fn import_text_member(
        &mut self,
        field: &FieldModel,
        desc: &TypeDesc,
        ns: Option<&str>,
        member: &mut MemberMapping,
    ) -> Result<()> {
        if !desc.can_be_text_value() {
            return Err(ResolveError::UnsupportedType {
                type_name: desc.name().to_owned(),
                reason: format!(
                    "member `{}` cannot serialize as character content",
                    field.name()
                ),
                trail: self.trail.clone(),
            });
        }
        let mapping = self.import_type(field.ty(), ns)?;
        let mut text = TextAccessor::new(field.name());
        text.default = field.xml().default.clone();
        text.mapping = Some(mapping);
        member.text = Some(text);
        Ok(())
    }

    fn import_attribute_member(
        &mut self,
        field: &FieldModel,
        desc: &TypeDesc,
        ns: Option<&str>,
        member: &mut MemberMapping,
    ) -> Result<()> {
        let item_capable = match desc.element() {
            Some(element) => self
                .descs
                .describe(&self.graph, element)
                .can_be_attribute_value(),
            None => false,
        };
        if !(desc.can_be_attribute_value() || (desc.kind().is_array_like() && item_capable)) {
            return Err(ResolveError::UnsupportedType {
                type_name: desc.name().to_owned(),
                reason: format!(
                    "member `{}` cannot serialize as an attribute value",
                    field.name()
                ),
                trail: self.trail.clone(),
            });
        }
        let mapping = self.import_type(field.ty(), ns)?;
        let options = field.xml().attribute.clone().unwrap_or_default();
        let mut attribute =
            AttributeAccessor::new(options.name.unwrap_or_else(|| field.name().to_owned()));
        attribute.namespace = options.namespace;
        attribute.form = options.form.unwrap_or_default();
        attribute.default = field.xml().default.clone();
        attribute.normalize()?;
        attribute.mapping = Some(mapping);
        member.attribute = Some(attribute);
        Ok(())
    }

    fn import_any_member(
        &mut self,
        field: &FieldModel,
        desc: &TypeDesc,
        ns: Option<&str>,
        member: &mut MemberMapping,
    ) -> Result<()> {
        let repeating = desc.kind().is_array_like();
        let payload_is_special = if repeating {
            match desc.element() {
                Some(element) => {
                    self.descs.describe(&self.graph, element).kind() == TypeKind::Special
                }
                None => false,
            }
        } else {
            desc.kind() == TypeKind::Special
        };
        if !payload_is_special {
            return Err(ResolveError::UnsupportedType {
                type_name: desc.name().to_owned(),
                reason: format!(
                    "member `{}` must use a node-capture type for \"any\" content",
                    field.name()
                ),
                trail: self.trail.clone(),
            });
        }
        let mapping = self.import_type(field.ty(), ns)?;
        let mut accessor = ElementAccessor::new("");
        accessor.is_any = true;
        accessor.any_namespace = field.xml().any_namespace.clone();
        accessor.unbounded = repeating;
        accessor.mapping = Some(mapping);
        member.elements.push(accessor);
        Ok(())
    }

    fn import_element_member(
        &mut self,
        field: &FieldModel,
        desc: &TypeDesc,
        ns: Option<&str>,
        siblings: &[(String, TypeRef)],
        member: &mut MemberMapping,
    ) -> Result<()> {
        if desc.kind().is_array_like() && field.xml().elements.len() <= 1 {
            // Repeating member: one unbounded accessor onto the array
            // mapping.
            let mapping = self.import_type(field.ty(), ns)?;
            self.arena.node_mut(mapping).referenced_by_element = true;
            let options = field.xml().elements.first().cloned().unwrap_or_default();
            let mut accessor = ElementAccessor::new(
                options.name.clone().unwrap_or_else(|| field.name().to_owned()),
            );
            accessor.namespace = options.namespace.clone().or_else(|| ns.map(str::to_owned));
            accessor.form = options.form.unwrap_or_default();
            accessor.nullable = options.nullable.or(field.xml().nullable).unwrap_or(false);
            accessor.unbounded = true;
            accessor.mapping = Some(mapping);
            member.elements.push(accessor);
        } else {
            let alternatives: Vec<XmlElementOptions> = if field.xml().elements.is_empty() {
                vec![XmlElementOptions::default()]
            } else {
                field.xml().elements.clone()
            };
            for options in alternatives {
                let target = options.ty.unwrap_or(field.ty());
                let target_desc = self.descs.describe(&self.graph, target).clone();
                let mapping = self.import_type(target, ns)?;
                self.arena.node_mut(mapping).referenced_by_element = true;
                let default_nullable = target_desc.is_optional_value()
                    || (target_desc.kind().is_aggregate() && !target_desc.is_value_type());
                let nullable = options
                    .nullable
                    .or(field.xml().nullable)
                    .unwrap_or(default_nullable);
                let mut accessor = ElementAccessor::new(
                    options.name.clone().unwrap_or_else(|| field.name().to_owned()),
                );
                accessor.namespace = options.namespace.clone().or_else(|| ns.map(str::to_owned));
                accessor.form = options.form.unwrap_or_default();
                accessor.nullable = nullable;
                accessor.default = field.xml().default.clone();
                accessor.mapping = Some(mapping);
                member.elements.push(accessor);
                // The declared type's substitution set joins the choice
                // unless the alternative pinned a type explicitly.
                if options.ty.is_none() && target_desc.kind().is_aggregate() {
                    self.push_substitutions(&mut member.elements, mapping, ns, nullable);
                }
            }
            self.sort_by_derivation(&mut member.elements);
        }

        if let Some(choice_name) = field.xml().choice_member.clone() {
            member.choice = Some(self.import_choice(&choice_name, siblings, ns, field)?);
        }
        Ok(())
    }

    fn import_choice(
        &mut self,
        choice_name: &str,
        siblings: &[(String, TypeRef)],
        ns: Option<&str>,
        field: &FieldModel,
    ) -> Result<ChoiceIdentifierAccessor> {
        let Some((_, sibling_ty)) = siblings.iter().find(|(name, _)| name == choice_name) else {
            return Err(ResolveError::UnsupportedType {
                type_name: choice_name.to_owned(),
                reason: format!(
                    "choice identifier for member `{}` was not found among its siblings",
                    field.name()
                ),
                trail: self.trail.clone(),
            });
        };
        let sibling_ty = *sibling_ty;
        let desc = self.descs.describe(&self.graph, sibling_ty).clone();
        let enum_ty = if desc.kind() == TypeKind::Enum {
            sibling_ty
        } else {
            let item = desc.element().filter(|_| desc.kind().is_array_like());
            match item {
                Some(element)
                    if self.descs.describe(&self.graph, element).kind() == TypeKind::Enum =>
                {
                    element
                }
                _ => {
                    return Err(ResolveError::UnsupportedType {
                        type_name: desc.name().to_owned(),
                        reason: format!(
                            "choice identifier `{choice_name}` must be an enum or enum collection"
                        ),
                        trail: self.trail.clone(),
                    });
                }
            }
        };
        let mapping = self.import_type(enum_ty, ns)?;
        Ok(ChoiceIdentifierAccessor {
            member_name: choice_name.to_owned(),
            mapping: Some(mapping),
        })
    }

    // Appends one accessor per mapping derived from `base_mapping`, in
    // link order; the caller sorts most-derived-first afterwards.
    fn push_substitutions(
        &mut self,
        elements: &mut Vec<ElementAccessor>,
        base_mapping: MappingId,
        ns: Option<&str>,
        nullable: bool,
    ) {
        for derived_id in self.arena.collect_derived(base_mapping) {
            let (name, namespace) = {
                let node = self.arena.node(derived_id);
                let name = if node.type_name().is_empty() {
                    self.graph.record(node.ty()).name.clone()
                } else {
                    node.type_name().to_owned()
                };
                (name, node.namespace().map(str::to_owned))
            };
            self.arena.node_mut(derived_id).referenced_by_element = true;
            let mut accessor = ElementAccessor::new(name);
            accessor.namespace = namespace.or_else(|| ns.map(str::to_owned));
            accessor.nullable = nullable;
            accessor.mapping = Some(derived_id);
            elements.push(accessor);
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers

impl Session {
    fn xml_type_name(&self, ty: TypeRef) -> String {
        let record = self.graph.record(ty);
        if record.xml.anonymous {
            String::new()
        } else {
            record.xml.name.clone().unwrap_or_else(|| record.name.clone())
        }
    }

    fn xml_namespace(&self, ty: TypeRef, default_ns: Option<&str>) -> Option<String> {
        let record = self.graph.record(ty);
        record
            .xml
            .namespace
            .clone()
            .or_else(|| default_ns.map(str::to_owned))
    }

    fn shape_mismatch(&self, ty: TypeRef, expected: &str) -> ResolveError {
        ResolveError::UnsupportedType {
            type_name: self.graph.record(ty).name.clone(),
            reason: format!("record shape does not match its descriptor ({expected} was expected)"),
            trail: self.trail.clone(),
        }
    }

    fn sort_by_derivation(&self, elements: &mut [ElementAccessor]) {
        elements.sort_by(|a, b| self.derivation_weight(b).cmp(&self.derivation_weight(a)));
    }

    fn derivation_weight(&self, accessor: &ElementAccessor) -> i32 {
        accessor
            .mapping()
            .map_or(i32::MIN, |id| self.descs.weight_of(self.arena.node(id).ty()))
    }
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::XML_NAMESPACE;
    use crate::meta::{builtin, EnumConstantRecord, HostGraph};
    use crate::meta::{XmlAttributeOptions, XmlMemberOptions};

    fn struct_shape(members: Vec<MemberRecord>) -> TypeShape {
        TypeShape::Struct {
            members,
            predicates: vec![],
        }
    }

    fn sample_graph() -> (HostGraph, TypeRef) {
        let mut graph = HostGraph::new();
        let item = graph.push(TypeRecord::new(
            "Item",
            struct_shape(vec![
                MemberRecord::field("sku", builtin::STRING),
                MemberRecord::field("qty", builtin::INT),
            ]),
        ));
        let items = graph.push(TypeRecord::new(
            "Item[]",
            TypeShape::Array { element: item },
        ));
        let order = graph.push(TypeRecord::new(
            "Order",
            struct_shape(vec![
                MemberRecord::field("id", builtin::STRING).with_xml(XmlMemberOptions::attribute()),
                MemberRecord::field("items", items),
                MemberRecord::field("total", builtin::DECIMAL),
            ]),
        ));
        (graph, order)
    }

    #[test]
    fn re_resolving_a_complete_type_returns_the_same_node() {
        let (graph, order) = sample_graph();
        let mut session = Session::new(graph);
        let first = session.resolve(order, None).unwrap();
        let second = session.resolve(order, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            session
                .arena()
                .iter()
                .filter(|(_, node)| node.ty() == order)
                .count(),
            1
        );
    }

    #[test]
    fn resolution_is_deterministic_across_fresh_sessions() {
        let (graph_a, order_a) = sample_graph();
        let (graph_b, order_b) = sample_graph();
        let mut first = Session::new(graph_a);
        let mut second = Session::new(graph_b);
        let id_a = first.resolve(order_a, Some("urn:shop")).unwrap();
        let id_b = second.resolve(order_b, Some("urn:shop")).unwrap();

        assert_eq!(id_a, id_b);
        assert_eq!(first.arena().len(), second.arena().len());
        let names_a: Vec<_> = first
            .arena()
            .iter()
            .map(|(_, node)| node.type_name().to_owned())
            .collect();
        let names_b: Vec<_> = second
            .arena()
            .iter()
            .map(|(_, node)| node.type_name().to_owned())
            .collect();
        assert_eq!(names_a, names_b);

        let member_names = |session: &Session, id: MappingId| -> Vec<String> {
            session
                .mapping(id)
                .as_struct()
                .unwrap()
                .members()
                .unwrap()
                .iter()
                .map(|member| member.name().to_owned())
                .collect()
        };
        assert_eq!(member_names(&first, id_a), member_names(&second, id_b));
    }

    #[test]
    fn self_referential_structs_resolve_to_one_node() {
        let mut graph = HostGraph::new();
        let node_handle = TypeRef(graph.len() as u32);
        let node = graph.push(TypeRecord::new(
            "Node",
            struct_shape(vec![
                MemberRecord::field("value", builtin::INT),
                MemberRecord::field("next", node_handle),
            ]),
        ));
        assert_eq!(node, node_handle);

        let mut session = Session::new(graph);
        let id = session.resolve(node, None).unwrap();
        let members = session.mapping(id).as_struct().unwrap().members().unwrap();
        let next = members.iter().find(|m| m.name() == "next").unwrap();
        assert_eq!(next.elements()[0].mapping(), Some(id));
        assert!(session.arena().is_fully_initialized(id));
    }

    #[test]
    fn self_reference_via_a_collection_resolves() {
        let mut graph = HostGraph::new();
        let tree_handle = TypeRef(graph.len() as u32 + 1);
        let children = graph.push(TypeRecord::new(
            "TreeList",
            TypeShape::Collection {
                element: tree_handle,
            },
        ));
        let tree = graph.push(TypeRecord::new(
            "Tree",
            struct_shape(vec![
                MemberRecord::field("name", builtin::STRING),
                MemberRecord::field("children", children),
            ]),
        ));
        assert_eq!(tree, tree_handle);

        let mut session = Session::new(graph);
        let id = session.resolve(tree, None).unwrap();
        let members = session.mapping(id).as_struct().unwrap().members().unwrap();
        let children_member = members.iter().find(|m| m.name() == "children").unwrap();
        assert!(children_member.elements()[0].is_unbounded());

        let array_id = children_member.elements()[0].mapping().unwrap();
        let item = &session.mapping(array_id).as_array().unwrap().elements()[0];
        assert_eq!(item.mapping(), Some(id));
    }

    #[test]
    fn elements_sort_descending_by_weight_with_stable_ties() {
        let mut graph = HostGraph::new();
        let a = graph.push(TypeRecord::new("A", struct_shape(vec![])));
        let b = graph.push(TypeRecord::new("B", struct_shape(vec![])).with_base(a));
        let c = graph.push(TypeRecord::new("C", struct_shape(vec![])).with_base(b));
        let d = graph.push(TypeRecord::new("D", struct_shape(vec![])).with_base(c));

        let mut session = Session::new(graph);
        let d_id = session.resolve(d, None).unwrap();
        let c_id = session.resolve(c, None).unwrap();
        let b_id = session.resolve(b, None).unwrap();

        let accessor = |name: &str, id: MappingId| {
            let mut element = ElementAccessor::new(name);
            element.mapping = Some(id);
            element
        };
        // Weights [3, 1, 2] come back [3, 2, 1].
        let sorted = session.elements_sorted_by_derivation(&[
            accessor("deep", d_id),
            accessor("shallow", b_id),
            accessor("middle", c_id),
        ]);
        let names: Vec<_> = sorted.iter().map(|e| e.name().to_owned()).collect();
        assert_eq!(names, ["deep", "middle", "shallow"]);

        // Equal weights keep their original relative order.
        let sorted = session.elements_sorted_by_derivation(&[
            accessor("tie_one", c_id),
            accessor("deep", d_id),
            accessor("tie_two", c_id),
        ]);
        let names: Vec<_> = sorted.iter().map(|e| e.name().to_owned()).collect();
        assert_eq!(names, ["deep", "tie_one", "tie_two"]);
    }

    #[test]
    fn substitution_sets_sort_most_derived_first() {
        let mut graph = HostGraph::new();
        let shape_handle = TypeRef(graph.len() as u32);
        let circle_handle = TypeRef(graph.len() as u32 + 1);
        let square_handle = TypeRef(graph.len() as u32 + 2);
        let shape = graph.push(
            TypeRecord::new(
                "Shape",
                struct_shape(vec![
                    MemberRecord::field("id", builtin::STRING)
                        .with_xml(XmlMemberOptions::attribute()),
                    MemberRecord::field("kind", builtin::STRING),
                ]),
            )
            .with_xml(
                XmlTypeOptions::default()
                    .with_include(circle_handle)
                    .with_include(square_handle),
            ),
        );
        let circle = graph.push(TypeRecord::new("Circle", struct_shape(vec![])).with_base(shape));
        let square = graph.push(TypeRecord::new("Square", struct_shape(vec![])).with_base(shape));
        let holder = graph.push(TypeRecord::new(
            "Holder",
            struct_shape(vec![MemberRecord::field("shape", shape)]),
        ));
        assert_eq!(
            (shape, circle, square),
            (shape_handle, circle_handle, square_handle)
        );

        let mut session = Session::new(graph);
        let holder_id = session.resolve(holder, None).unwrap();
        assert_eq!(session.describe(shape).weight(), 0);
        assert_eq!(session.describe(circle).weight(), 1);
        assert_eq!(session.describe(square).weight(), 1);

        let members = session
            .mapping(holder_id)
            .as_struct()
            .unwrap()
            .members()
            .unwrap();
        let names: Vec<_> = members[0]
            .elements()
            .iter()
            .map(|e| e.name().to_owned())
            .collect();
        assert_eq!(names, ["Circle", "Square", "shape"]);
    }

    #[test]
    fn explicit_sequencing_orders_members_and_propagates_down() {
        let mut graph = HostGraph::new();
        let base = graph.push(TypeRecord::new(
            "Ordered",
            struct_shape(vec![
                MemberRecord::field("note", builtin::STRING).with_xml(XmlMemberOptions::text()),
                MemberRecord::field("second", builtin::INT)
                    .with_xml(XmlMemberOptions::element().with_order(2)),
                MemberRecord::field("loose", builtin::INT),
                MemberRecord::field("first", builtin::INT)
                    .with_xml(XmlMemberOptions::element().with_order(0)),
            ]),
        ));
        let derived = graph.push(
            TypeRecord::new(
                "FollowsOrder",
                struct_shape(vec![MemberRecord::field("extra", builtin::INT)]),
            )
            .with_base(base),
        );

        let mut session = Session::new(graph);
        let derived_id = session.resolve(derived, None).unwrap();
        let base_id = session.resolve(base, None).unwrap();

        let names: Vec<_> = session
            .mapping(base_id)
            .as_struct()
            .unwrap()
            .members()
            .unwrap()
            .iter()
            .map(|member| member.name().to_owned())
            .collect();
        assert_eq!(names, ["first", "second", "loose", "note"]);
        assert!(session
            .mapping(base_id)
            .as_struct()
            .unwrap()
            .has_explicit_sequence());
        assert!(session
            .mapping(derived_id)
            .as_struct()
            .unwrap()
            .has_explicit_sequence());
    }

    #[test]
    fn conflicting_type_names_collide_in_one_namespace() {
        let mut graph = HostGraph::new();
        let first = graph.push(
            TypeRecord::new(
                "Price",
                struct_shape(vec![MemberRecord::field("value", builtin::INT)]),
            )
            .with_xml(XmlTypeOptions::default().with_namespace("urn:x")),
        );
        let second = graph.push(
            TypeRecord::new("PriceAlias", struct_shape(vec![])).with_xml(
                XmlTypeOptions::default()
                    .named("Price")
                    .with_namespace("urn:x"),
            ),
        );

        let mut session = Session::new(graph);
        session.resolve(first, None).unwrap();
        match session.resolve(second, None).unwrap_err() {
            ResolveError::DuplicateDefinition { name, namespace } => {
                assert_eq!(name, "Price");
                assert_eq!(namespace, "urn:x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn depth_bound_defers_members_but_the_worklist_completes_them() {
        let mut graph = HostGraph::new();
        let c = graph.push(TypeRecord::new(
            "C",
            struct_shape(vec![MemberRecord::field("x", builtin::INT)]),
        ));
        let b = graph.push(TypeRecord::new(
            "B",
            struct_shape(vec![MemberRecord::field("c", c)]),
        ));
        let a = graph.push(TypeRecord::new(
            "A",
            struct_shape(vec![MemberRecord::field("b", b)]),
        ));

        let mut session = Session::with_max_depth(graph, 1);
        let id = session.resolve(a, None).unwrap();
        for (node_id, node) in session.arena().iter() {
            assert_eq!(node.state(), MappingState::Complete, "{node_id} incomplete");
        }
        assert!(session.arena().is_fully_initialized(id));
    }

    #[test]
    fn stress_mode_handles_self_reference_too() {
        let mut graph = HostGraph::new();
        let node_handle = TypeRef(graph.len() as u32);
        let node = graph.push(TypeRecord::new(
            "Linked",
            struct_shape(vec![MemberRecord::field("next", node_handle)]),
        ));

        let mut session = Session::with_max_depth(graph, 1);
        let id = session.resolve(node, None).unwrap();
        assert!(session.arena().is_fully_initialized(id));
    }

    #[test]
    fn unsupported_member_types_fail_lazily_with_a_trail() {
        let mut graph = HostGraph::new();
        let weird = graph.push(TypeRecord::new(
            "OpenGeneric",
            TypeShape::Unsupported {
                reason: "open generic interface".into(),
            },
        ));
        let holder = graph.push(TypeRecord::new(
            "Holder",
            struct_shape(vec![MemberRecord::field("weird", weird)]),
        ));

        let mut session = Session::new(graph);
        assert!(session.describe(weird).is_unsupported());
        match session.resolve(holder, None).unwrap_err() {
            ResolveError::UnsupportedType {
                type_name, trail, ..
            } => {
                assert_eq!(type_name, "OpenGeneric");
                assert_eq!(trail, ["Holder.weird"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn incompatible_redeclaration_is_an_invalid_override() {
        let mut graph = HostGraph::new();
        let base = graph.push(TypeRecord::new(
            "Base",
            struct_shape(vec![MemberRecord::field("value", builtin::STRING)]),
        ));
        let derived = graph.push(
            TypeRecord::new(
                "Derived",
                struct_shape(vec![MemberRecord::field("value", builtin::INT)]),
            )
            .with_base(base),
        );

        let mut session = Session::new(graph);
        match session.resolve(derived, None).unwrap_err() {
            ResolveError::InvalidOverride {
                derived: derived_name,
                base: base_name,
                member,
            } => {
                assert_eq!(derived_name, "Derived");
                assert_eq!(base_name, "Base");
                assert_eq!(member, "value");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn identical_redeclaration_reuses_the_declaring_member() {
        let mut graph = HostGraph::new();
        let base = graph.push(TypeRecord::new(
            "Base",
            struct_shape(vec![MemberRecord::field("value", builtin::STRING)]),
        ));
        let derived = graph.push(
            TypeRecord::new(
                "Derived",
                struct_shape(vec![
                    MemberRecord::field("value", builtin::STRING),
                    MemberRecord::field("extra", builtin::INT),
                ]),
            )
            .with_base(base),
        );

        let mut session = Session::new(graph);
        let id = session.resolve(derived, None).unwrap();
        let members = session.mapping(id).as_struct().unwrap().members().unwrap();
        let names: Vec<_> = members.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["extra"]);
        assert!(session
            .warnings()
            .iter()
            .any(|warning| warning.kind() == WarningKind::MemberHidden));
    }

    #[test]
    fn reserved_attribute_prefix_normalizes_and_others_fail() {
        let mut graph = HostGraph::new();
        let good = graph.push(TypeRecord::new(
            "Localized",
            struct_shape(vec![MemberRecord::field("lang", builtin::STRING).with_xml(
                XmlMemberOptions::attribute()
                    .with_attribute(XmlAttributeOptions::named("xml:lang")),
            )]),
        ));
        let bad = graph.push(TypeRecord::new(
            "Typed",
            struct_shape(vec![MemberRecord::field("ty", builtin::STRING).with_xml(
                XmlMemberOptions::attribute()
                    .with_attribute(XmlAttributeOptions::named("xsi:type")),
            )]),
        ));

        let mut session = Session::new(graph);
        let id = session.resolve(good, None).unwrap();
        let members = session.mapping(id).as_struct().unwrap().members().unwrap();
        let attribute = members[0].attribute().unwrap();
        assert_eq!(attribute.name(), "lang");
        assert_eq!(attribute.namespace(), Some(XML_NAMESPACE));

        match session.resolve(bad, None).unwrap_err() {
            ResolveError::InvalidAccessorName { name } => assert_eq!(name, "xsi:type"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn text_members_make_simple_content() {
        let mut graph = HostGraph::new();
        let price = graph.push(TypeRecord::new(
            "Price",
            struct_shape(vec![
                MemberRecord::field("currency", builtin::STRING)
                    .with_xml(XmlMemberOptions::attribute()),
                MemberRecord::field("amount", builtin::DECIMAL)
                    .with_xml(XmlMemberOptions::text()),
            ]),
        ));

        let mut session = Session::new(graph);
        let id = session.resolve(price, None).unwrap();
        let payload = session.mapping(id).as_struct().unwrap();
        assert!(payload.has_simple_content());
        assert_eq!(payload.text_member().unwrap().name(), "amount");
        // Text sorts last.
        let members = payload.members().unwrap();
        assert_eq!(members.last().unwrap().name(), "amount");
    }

    #[test]
    fn xmlns_capture_members_are_wired() {
        let mut graph = HostGraph::new();
        let envelope = graph.push(TypeRecord::new(
            "Envelope",
            struct_shape(vec![
                MemberRecord::field("prefixes", builtin::STRING)
                    .with_xml(XmlMemberOptions::namespace_declarations()),
                MemberRecord::field("body", builtin::STRING),
            ]),
        ));

        let mut session = Session::new(graph);
        let id = session.resolve(envelope, None).unwrap();
        let payload = session.mapping(id).as_struct().unwrap();
        let capture = payload.xmlns_member().unwrap();
        assert_eq!(capture.xmlns().unwrap().member_name(), "prefixes");
        assert!(!capture.is_particle() && !capture.is_attribute() && !capture.is_text());
    }

    #[test]
    fn choice_members_wire_the_discriminator_enum() {
        let mut graph = HostGraph::new();
        let pick = graph.push(TypeRecord::new(
            "UnionChoice",
            TypeShape::Enum {
                constants: vec![
                    EnumConstantRecord::new("Text", 0),
                    EnumConstantRecord::new("Number", 1),
                ],
                is_flags: false,
            },
        ));
        let union = graph.push(TypeRecord::new(
            "Union",
            struct_shape(vec![
                MemberRecord::field("pick", pick),
                MemberRecord::field("value", builtin::STRING).with_xml(
                    XmlMemberOptions::element()
                        .with_element(XmlElementOptions::named("Text"))
                        .with_element(
                            XmlElementOptions::named("Number").with_type(builtin::INT),
                        )
                        .with_choice("pick"),
                ),
            ]),
        ));

        let mut session = Session::new(graph);
        let id = session.resolve(union, None).unwrap();
        let members = session.mapping(id).as_struct().unwrap().members().unwrap();
        let value = members.iter().find(|m| m.name() == "value").unwrap();
        assert_eq!(value.elements().len(), 2);
        let choice = value.choice().unwrap();
        assert_eq!(choice.member_name(), "pick");
        let choice_mapping = session.mapping(choice.mapping().unwrap());
        assert!(choice_mapping.as_enum().is_some());
    }

    #[test]
    fn optional_wrappers_produce_nullable_elements() {
        let mut graph = HostGraph::new();
        let opt_int = graph.push(TypeRecord::new(
            "int?",
            TypeShape::Nullable {
                inner: builtin::INT,
            },
        ));
        let holder = graph.push(TypeRecord::new(
            "Counter",
            struct_shape(vec![MemberRecord::field("count", opt_int)]),
        ));

        let mut session = Session::new(graph);
        let id = session.resolve(holder, None).unwrap();
        let members = session.mapping(id).as_struct().unwrap().members().unwrap();
        let element = &members[0].elements()[0];
        assert!(element.is_nullable());

        let wrapper = session.mapping(element.mapping().unwrap());
        let base = wrapper.as_nullable().unwrap().base();
        assert!(matches!(
            session.mapping(base).kind(),
            MappingKind::Primitive(_)
        ));
    }

    #[test]
    fn member_bags_resolve_to_members_mappings() {
        let graph = HostGraph::new();
        let records = vec![
            MemberRecord::field("id", builtin::INT).with_xml(XmlMemberOptions::attribute()),
            MemberRecord::field("body", builtin::STRING),
        ];

        let mut session = Session::new(graph);
        let id = session
            .resolve_members("SubmitOrder", Some("urn:svc"), &records)
            .unwrap();
        let payload = session.mapping(id).as_members().unwrap();
        assert_eq!(payload.members().len(), 2);
        assert!(session
            .top_level_elements()
            .get(&NameKey::new("SubmitOrder", Some("urn:svc")))
            .is_some());
    }

    #[test]
    fn duplicate_enum_spellings_collide() {
        let mut graph = HostGraph::new();
        let color = graph.push(TypeRecord::new(
            "Color",
            TypeShape::Enum {
                constants: vec![
                    EnumConstantRecord::new("Red", 0).with_xml_name("red"),
                    EnumConstantRecord::new("Crimson", 1).with_xml_name("red"),
                ],
                is_flags: false,
            },
        ));

        let mut session = Session::new(graph);
        match session.resolve(color, None).unwrap_err() {
            ResolveError::DuplicateDefinition { name, .. } => assert_eq!(name, "red"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn enum_constants_keep_declaration_order() {
        let mut graph = HostGraph::new();
        let flags = graph.push(TypeRecord::new(
            "Access",
            TypeShape::Enum {
                constants: vec![
                    EnumConstantRecord::new("Read", 1),
                    EnumConstantRecord::new("Write", 2),
                ],
                is_flags: true,
            },
        ));

        let mut session = Session::new(graph);
        let id = session.resolve(flags, None).unwrap();
        let payload = session.mapping(id).as_enum().unwrap();
        let names: Vec<_> = payload.constants().iter().map(|c| c.xml_name()).collect();
        assert_eq!(names, ["Read", "Write"]);
        assert!(payload.is_flags());
    }

    #[test]
    fn arrays_synthesize_names_from_their_item_type() {
        let mut graph = HostGraph::new();
        let ints = graph.push(TypeRecord::new(
            "int[]",
            TypeShape::Array {
                element: builtin::INT,
            },
        ));

        let mut session = Session::new(graph);
        let id = session.resolve(ints, None).unwrap();
        let mapping = session.mapping(id);
        assert_eq!(mapping.type_name(), "ArrayOfInt");
        let item = &mapping.as_array().unwrap().elements()[0];
        assert_eq!(item.name(), "int");
        assert!(!item.is_nullable());
    }

    #[test]
    fn anonymous_types_never_register_type_names() {
        let mut graph = HostGraph::new();
        let inline = graph.push(
            TypeRecord::new(
                "Inline",
                struct_shape(vec![MemberRecord::field("x", builtin::INT)]),
            )
            .with_xml(XmlTypeOptions::default().anonymous()),
        );

        let mut session = Session::new(graph);
        let id = session.resolve(inline, None).unwrap();
        assert!(session.mapping(id).is_anonymous());
        assert!(!session.types().contains(&NameKey::new("Inline", None)));
        // The top-level element still needs a name; the host name steps in.
        assert!(session
            .top_level_elements()
            .get(&NameKey::new("Inline", None))
            .is_some());
    }
}
