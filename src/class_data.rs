use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

use log::warn;

use crate::{
    callbacks::{CallbackResolver, OnChangeCallback, RemoteCallHandler},
    dirty_mask::DirtyMask,
    error::SchemaError,
    flags::SyncFlags,
    interpolation::{InterpolationFn, InterpolationRegistry},
    registration::{ClassRegistration, FieldType, RemoteCallRegistration},
    types::{
        ClassId, EntityId, FilterId, RemoteCallId, ENTITY_REF_SIZE, MAX_REMOTE_CALLS,
        REMOTE_CALL_TABLE_SIZE,
    },
};

/// Layout and change-tracking description of one synchronized field
#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Byte offset within the entity's synchronized region
    pub offset: usize,
    /// Byte size within the fixed sync buffer (0 for syncable fields)
    pub size: usize,
    /// Stored as a 2-byte foreign entity id rather than raw value bytes
    pub is_entity_ref: bool,
    pub flags: SyncFlags,
    /// Invoked with the previous value's bytes when an incoming update
    /// changes this field
    pub on_change: Option<OnChangeCallback>,
}

/// One registered remote call: its assigned id and payload shape
#[derive(Clone)]
pub struct RemoteCallDescriptor {
    pub id: RemoteCallId,
    pub name: &'static str,
    /// Size of the single argument, or of one element for array payloads
    pub payload_size: usize,
    pub is_array: bool,
}

/// Remote calls of one namespace: ordered descriptors plus a fixed handler
/// table indexed by call id
pub struct RemoteCallTable {
    descriptors: Vec<RemoteCallDescriptor>,
    handlers: Vec<Option<RemoteCallHandler>>,
}

impl RemoteCallTable {
    fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            handlers: vec![None; REMOTE_CALL_TABLE_SIZE],
        }
    }

    /// Assign the next sequential id to a declared call. Ids start at 0; a
    /// namespace holds at most [`MAX_REMOTE_CALLS`] of them
    fn assign(
        &mut self,
        registration: &RemoteCallRegistration,
        handler: Option<RemoteCallHandler>,
        class_name: &'static str,
        namespace: &'static str,
    ) -> Result<RemoteCallId, SchemaError> {
        if self.descriptors.len() >= MAX_REMOTE_CALLS {
            return Err(SchemaError::RemoteCallOverflow {
                class_name,
                namespace,
            });
        }
        let id = self.descriptors.len() as RemoteCallId;
        self.descriptors.push(RemoteCallDescriptor {
            id,
            name: registration.name,
            payload_size: registration.payload_size,
            is_array: registration.is_array,
        });
        self.handlers[id as usize] = handler;
        Ok(id)
    }

    /// Descriptor of the call with the given id
    pub fn call(&self, id: RemoteCallId) -> Option<&RemoteCallDescriptor> {
        self.descriptors.get(id as usize)
    }

    /// Invocation handler of the call with the given id, if one resolved
    pub fn handler(&self, id: RemoteCallId) -> Option<&RemoteCallHandler> {
        self.handlers.get(id as usize)?.as_ref()
    }

    /// All descriptors, in id order
    pub fn descriptors(&self) -> &[RemoteCallDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Complete synchronization schema of one concrete entity class.
///
/// Built once when the class is registered and never mutated afterwards, so
/// it can be read concurrently from simulation and network threads without
/// synchronization.
///
/// Field ordering invariant: all interpolated fields occupy a contiguous
/// prefix of `fields`, whose byte sizes sum to `interpolated_fields_size`,
/// with `interpolation_fns` parallel to that prefix. The remaining fields
/// follow in hierarchy-then-declaration order.
pub struct EntityClassData {
    type_id: TypeId,
    name: &'static str,
    class_id: ClassId,
    filter_id: FilterId,
    is_singleton: bool,
    is_updateable: bool,
    is_server_only: bool,
    base_class_ids: Vec<ClassId>,
    fields: Vec<FieldDescriptor>,
    syncable_fields: Vec<FieldDescriptor>,
    interpolated_fields_size: usize,
    fixed_fields_size: usize,
    fields_flags_size: usize,
    interpolation_fns: Vec<InterpolationFn>,
    remote_calls: RemoteCallTable,
    syncable_remote_calls: HashMap<TypeId, RemoteCallTable>,
    constructor: crate::registration::EntityConstructor,
}

impl std::fmt::Debug for EntityClassData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityClassData")
            .field("name", &self.name)
            .field("class_id", &self.class_id)
            .finish_non_exhaustive()
    }
}

impl EntityClassData {
    pub(crate) fn build(
        registration: &ClassRegistration,
        base_class_ids: Vec<ClassId>,
        interpolations: &InterpolationRegistry,
        resolver: &CallbackResolver,
    ) -> Result<Self, SchemaError> {
        let class_name = registration.name;

        let mut fields: Vec<FieldDescriptor> = Vec::new();
        let mut syncable_fields: Vec<FieldDescriptor> = Vec::new();
        let mut interpolation_fns: Vec<InterpolationFn> = Vec::new();
        let mut interpolated_fields_size = 0;
        let mut fixed_fields_size = 0;
        let mut remote_calls = RemoteCallTable::new();
        let mut syncable_remote_calls: HashMap<TypeId, RemoteCallTable> = HashMap::new();

        // Scan root level first, then ancestors furthest-to-nearest, then
        // the concrete level. Each level contributes only members declared
        // at that level.
        for level in registration.scan_order() {
            for call in &level.remote_calls {
                let handler = resolver.resolve_remote_call(
                    level.type_id,
                    level.type_name,
                    call.payload_type,
                    call.is_array,
                    call.name,
                );
                remote_calls.assign(call, handler, class_name, level.type_name)?;
            }

            for field in &level.fields {
                match &field.field_type {
                    FieldType::Value { type_id, size } => {
                        let on_change = resolver.resolve_on_change(
                            level.type_id,
                            level.type_name,
                            *type_id,
                            field.on_change,
                        );
                        let descriptor = FieldDescriptor {
                            name: field.name,
                            offset: field.offset,
                            size: *size,
                            is_entity_ref: false,
                            flags: field.flags,
                            on_change,
                        };
                        if field.flags.contains(SyncFlags::INTERPOLATED) {
                            let Some(lerp) = interpolations.lookup(*type_id) else {
                                return Err(SchemaError::MissingInterpolation {
                                    class_name,
                                    field_name: field.name,
                                });
                            };
                            // Each interpolated field goes to the front of
                            // the list, with its function at the matching
                            // position, keeping the prefix contiguous.
                            fields.insert(0, descriptor);
                            interpolation_fns.insert(0, lerp.clone());
                            interpolated_fields_size += *size;
                        } else {
                            fields.push(descriptor);
                        }
                        fixed_fields_size += *size;
                    }
                    FieldType::Flag => {
                        // no interpolation function can exist for booleans,
                        // and an interpolated field outside the prefix would
                        // break the prefix invariant
                        if field.flags.contains(SyncFlags::INTERPOLATED) {
                            return Err(SchemaError::MissingInterpolation {
                                class_name,
                                field_name: field.name,
                            });
                        }
                        let on_change = resolver.resolve_on_change(
                            level.type_id,
                            level.type_name,
                            TypeId::of::<bool>(),
                            field.on_change,
                        );
                        // booleans always occupy exactly 1 byte
                        fields.push(FieldDescriptor {
                            name: field.name,
                            offset: field.offset,
                            size: 1,
                            is_entity_ref: false,
                            flags: field.flags,
                            on_change,
                        });
                        fixed_fields_size += 1;
                    }
                    FieldType::EntityRef => {
                        // entity references hold foreign ids, which cannot
                        // be interpolated
                        if field.flags.contains(SyncFlags::INTERPOLATED) {
                            return Err(SchemaError::MissingInterpolation {
                                class_name,
                                field_name: field.name,
                            });
                        }
                        let on_change = resolver.resolve_on_change(
                            level.type_id,
                            level.type_name,
                            TypeId::of::<EntityId>(),
                            field.on_change,
                        );
                        fields.push(FieldDescriptor {
                            name: field.name,
                            offset: field.offset,
                            size: ENTITY_REF_SIZE,
                            is_entity_ref: true,
                            flags: field.flags,
                            on_change,
                        });
                        fixed_fields_size += ENTITY_REF_SIZE;
                    }
                    FieldType::Syncable {
                        descriptor,
                        mutable,
                    } => {
                        // The runtime mutates syncable state in place and
                        // never replaces the reference.
                        if *mutable {
                            return Err(SchemaError::MutableSyncable {
                                class_name,
                                field_name: field.name,
                            });
                        }

                        syncable_fields.push(FieldDescriptor {
                            name: field.name,
                            offset: field.offset,
                            size: 0,
                            is_entity_ref: false,
                            flags: field.flags,
                            on_change: None,
                        });

                        // Each syncable type gets its own private id
                        // namespace; a type reused across fields of this
                        // class keeps its already-assigned ids.
                        if !syncable_remote_calls.contains_key(&descriptor.type_id) {
                            let mut table = RemoteCallTable::new();
                            for syncable_level in &descriptor.levels {
                                for call in &syncable_level.remote_calls {
                                    let handler = resolver.resolve_remote_call(
                                        syncable_level.type_id,
                                        syncable_level.type_name,
                                        call.payload_type,
                                        call.is_array,
                                        call.name,
                                    );
                                    table.assign(
                                        call,
                                        handler,
                                        class_name,
                                        descriptor.type_name,
                                    )?;
                                }
                            }
                            syncable_remote_calls.insert(descriptor.type_id, table);
                        }
                    }
                    FieldType::Opaque { type_name } => {
                        warn!(
                            "class '{class_name}' field '{}' has unsupported type '{type_name}', excluded from sync",
                            field.name
                        );
                    }
                }
            }
        }

        let field_count = fields.len();
        let fields_flags_size = if field_count > 0 {
            (field_count - 1) / 8 + 1
        } else {
            0
        };

        Ok(Self {
            type_id: registration.type_id,
            name: class_name,
            class_id: registration.class_id,
            filter_id: registration.filter_id,
            is_singleton: registration.is_singleton,
            is_updateable: registration.is_updateable,
            is_server_only: registration.is_server_only,
            base_class_ids,
            fields,
            syncable_fields,
            interpolated_fields_size,
            fixed_fields_size,
            fields_flags_size,
            interpolation_fns,
            remote_calls,
            syncable_remote_calls,
            constructor: registration.constructor.clone(),
        })
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    pub fn filter_id(&self) -> FilterId {
        self.filter_id
    }

    pub fn is_singleton(&self) -> bool {
        self.is_singleton
    }

    pub fn is_updateable(&self) -> bool {
        self.is_updateable
    }

    pub fn is_server_only(&self) -> bool {
        self.is_server_only
    }

    /// Numeric ids of every ancestor class, root-most first. Length equals
    /// the hierarchy depth below the root entity type
    pub fn base_class_ids(&self) -> &[ClassId] {
        &self.base_class_ids
    }

    /// All fixed-layout fields. Interpolated fields form a contiguous
    /// prefix; a field's index here is its notify id and its bit position in
    /// the dirty mask
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Composite fields owning their own sync state; not part of the fixed
    /// buffer
    pub fn syncable_fields(&self) -> &[FieldDescriptor] {
        &self.syncable_fields
    }

    /// Total bytes of the interpolated prefix
    pub fn interpolated_fields_size(&self) -> usize {
        self.interpolated_fields_size
    }

    /// Total bytes of the per-entity fixed synchronization buffer
    pub fn fixed_fields_size(&self) -> usize {
        self.fixed_fields_size
    }

    /// Byte length of the changed-fields bitmask companion to the buffer
    pub fn fields_flags_size(&self) -> usize {
        self.fields_flags_size
    }

    /// Interpolation functions, parallel to the interpolated field prefix
    pub fn interpolation_fns(&self) -> &[InterpolationFn] {
        &self.interpolation_fns
    }

    /// Entity-level remote calls, ids 0 upwards
    pub fn remote_calls(&self) -> &RemoteCallTable {
        &self.remote_calls
    }

    /// Remote calls of one syncable type's private namespace
    pub fn syncable_remote_calls(&self, syncable_type: TypeId) -> Option<&RemoteCallTable> {
        self.syncable_remote_calls.get(&syncable_type)
    }

    /// A fresh dirty mask sized for this class's field count
    pub fn new_dirty_mask(&self) -> DirtyMask {
        DirtyMask::with_len(self.fields_flags_size)
    }

    /// Construct a fresh, untyped instance of this class
    pub fn construct(&self) -> Box<dyn Any + Send + Sync> {
        (self.constructor)()
    }
}
