use std::{
    any::{Any, TypeId},
    sync::Arc,
};

use bytemuck::Pod;

use crate::{
    flags::SyncFlags,
    types::{ClassId, FilterId},
};

/// Produces a fresh, untyped instance of a registered entity class
pub type EntityConstructor = Arc<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// One remote-callable method declared at some hierarchy level.
///
/// Ids are not carried here: the schema builder hands out fresh ids per
/// class (or per syncable type) during registration, so declared metadata
/// stays immutable and shareable
#[derive(Clone)]
pub struct RemoteCallRegistration {
    pub name: &'static str,
    pub payload_type: TypeId,
    /// Size of the single argument, or of one element for array payloads
    pub payload_size: usize,
    pub is_array: bool,
}

impl RemoteCallRegistration {
    /// A remote call taking a single argument of type `T`
    pub fn new<T: Pod + 'static>(name: &'static str) -> Self {
        Self {
            name,
            payload_type: TypeId::of::<T>(),
            payload_size: std::mem::size_of::<T>(),
            is_array: false,
        }
    }

    /// A remote call taking a run of `T` elements, applied over a
    /// caller-specified range. Records the size of one element
    pub fn array<T: Pod + 'static>(name: &'static str) -> Self {
        Self {
            name,
            payload_type: TypeId::of::<T>(),
            payload_size: std::mem::size_of::<T>(),
            is_array: true,
        }
    }
}

/// A syncable (composite) type's own declaration surface: its hierarchy
/// levels, furthest ancestor first and itself last, each carrying the remote
/// calls declared at that level. Remote-call ids for these live in a
/// namespace private to the syncable type
#[derive(Clone)]
pub struct SyncableTypeDescriptor {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub levels: Vec<SyncableLevel>,
}

impl SyncableTypeDescriptor {
    pub fn of<S: Any>(type_name: &'static str) -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            type_name,
            levels: Vec::new(),
        }
    }

    /// Append the next hierarchy level. Call in furthest-first order,
    /// finishing with the syncable type itself
    pub fn level(mut self, level: SyncableLevel) -> Self {
        self.levels.push(level);
        self
    }
}

/// One hierarchy level of a syncable type
#[derive(Clone)]
pub struct SyncableLevel {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub remote_calls: Vec<RemoteCallRegistration>,
}

impl SyncableLevel {
    pub fn of<S: Any>(type_name: &'static str) -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            type_name,
            remote_calls: Vec::new(),
        }
    }

    pub fn remote_call(mut self, call: RemoteCallRegistration) -> Self {
        self.remote_calls.push(call);
        self
    }
}

/// What kind of member a synchronized field is, driving its layout treatment
#[derive(Clone)]
pub enum FieldType {
    /// Fixed-size plain value; occupies its native size in the sync buffer
    Value { type_id: TypeId, size: usize },
    /// Boolean; always occupies exactly 1 byte
    Flag,
    /// Reference to another live entity; stored as a fixed 2-byte foreign id
    EntityRef,
    /// Nested composite owning its own change tracking and remote calls;
    /// contributes nothing to the fixed buffer
    Syncable {
        descriptor: SyncableTypeDescriptor,
        mutable: bool,
    },
    /// Not representable in the sync buffer; dropped from the schema with a
    /// warning
    Opaque { type_name: &'static str },
}

/// One synchronized field declared at some hierarchy level.
///
/// `offset` is the field's byte offset within the entity's synchronized
/// region, supplied by the declaring code via `core::mem::offset_of!` so the
/// schema never guesses at layout
#[derive(Clone)]
pub struct FieldRegistration {
    pub name: &'static str,
    pub offset: usize,
    pub field_type: FieldType,
    pub flags: SyncFlags,
    /// Name of a change-notification method on the declaring type, or empty
    pub on_change: &'static str,
}

impl FieldRegistration {
    /// A fixed-size plain value field of type `T`
    pub fn value<T: Pod + 'static>(name: &'static str, offset: usize) -> Self {
        Self {
            name,
            offset,
            field_type: FieldType::Value {
                type_id: TypeId::of::<T>(),
                size: std::mem::size_of::<T>(),
            },
            flags: SyncFlags::empty(),
            on_change: "",
        }
    }

    /// A boolean field, always 1 byte
    pub fn flag(name: &'static str, offset: usize) -> Self {
        Self {
            name,
            offset,
            field_type: FieldType::Flag,
            flags: SyncFlags::empty(),
            on_change: "",
        }
    }

    /// A reference to another entity, stored as a 2-byte foreign id slot
    pub fn entity_ref(name: &'static str, offset: usize) -> Self {
        Self {
            name,
            offset,
            field_type: FieldType::EntityRef,
            flags: SyncFlags::empty(),
            on_change: "",
        }
    }

    /// An immutable syncable (composite) field
    pub fn syncable(
        name: &'static str,
        offset: usize,
        descriptor: SyncableTypeDescriptor,
    ) -> Self {
        Self {
            name,
            offset,
            field_type: FieldType::Syncable {
                descriptor,
                mutable: false,
            },
            flags: SyncFlags::empty(),
            on_change: "",
        }
    }

    /// A mutable syncable field. Always rejected at build time: syncable
    /// state is mutated in place through a stable reference, never replaced
    pub fn syncable_mut(
        name: &'static str,
        offset: usize,
        descriptor: SyncableTypeDescriptor,
    ) -> Self {
        Self {
            name,
            offset,
            field_type: FieldType::Syncable {
                descriptor,
                mutable: true,
            },
            flags: SyncFlags::empty(),
            on_change: "",
        }
    }

    /// A field of a type the sync buffer cannot represent
    pub fn opaque(name: &'static str, offset: usize, type_name: &'static str) -> Self {
        Self {
            name,
            offset,
            field_type: FieldType::Opaque { type_name },
            flags: SyncFlags::empty(),
            on_change: "",
        }
    }

    pub fn with_flags(mut self, flags: SyncFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_on_change(mut self, method: &'static str) -> Self {
        self.on_change = method;
        self
    }
}

/// Members declared at one level of an entity hierarchy, not including
/// anything inherited from levels above it
#[derive(Clone)]
pub struct ClassLevel {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub fields: Vec<FieldRegistration>,
    pub remote_calls: Vec<RemoteCallRegistration>,
}

impl ClassLevel {
    pub fn of<E: Any>(type_name: &'static str) -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name,
            fields: Vec::new(),
            remote_calls: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldRegistration) -> Self {
        self.fields.push(field);
        self
    }

    pub fn remote_call(mut self, call: RemoteCallRegistration) -> Self {
        self.remote_calls.push(call);
        self
    }
}

/// Everything the schema builder needs to know about one concrete entity
/// class: identity, class-level markers, constructor, and the declared
/// members of every level of its hierarchy.
///
/// Scan order during the build is: the root entity level (if it declares
/// members), then ancestor levels furthest-to-nearest, then the concrete
/// level itself
pub struct ClassRegistration {
    pub(crate) type_id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) class_id: ClassId,
    pub(crate) filter_id: FilterId,
    pub(crate) is_singleton: bool,
    pub(crate) is_updateable: bool,
    pub(crate) is_server_only: bool,
    pub(crate) constructor: EntityConstructor,
    pub(crate) root_level: Option<ClassLevel>,
    pub(crate) ancestor_levels: Vec<ClassLevel>,
    pub(crate) concrete_level: ClassLevel,
}

impl ClassRegistration {
    pub fn new<E: Any + Send + Sync>(
        name: &'static str,
        class_id: ClassId,
        filter_id: FilterId,
        constructor: fn() -> E,
    ) -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            name,
            class_id,
            filter_id,
            is_singleton: false,
            is_updateable: false,
            is_server_only: false,
            constructor: Arc::new(move || Box::new(constructor()) as Box<dyn Any + Send + Sync>),
            root_level: None,
            ancestor_levels: Vec::new(),
            concrete_level: ClassLevel::of::<E>(name),
        }
    }

    /// Mark the class as a singleton (one instance process-wide)
    pub fn singleton(mut self) -> Self {
        self.is_singleton = true;
        self
    }

    /// Mark the class as receiving per-tick updates
    pub fn updateable(mut self) -> Self {
        self.is_updateable = true;
        self
    }

    /// Mark the class as existing only on the server
    pub fn server_only(mut self) -> Self {
        self.is_server_only = true;
        self
    }

    /// Members declared by the framework's root entity type itself. Scanned
    /// first; the root carries no class id of its own
    pub fn root_level(mut self, level: ClassLevel) -> Self {
        self.root_level = Some(level);
        self
    }

    /// Append the next ancestor level. Call in furthest-first order. Each
    /// ancestor must itself already be registered when this class is built
    pub fn ancestor_level(mut self, level: ClassLevel) -> Self {
        self.ancestor_levels.push(level);
        self
    }

    /// Declare a field at the concrete level
    pub fn field(mut self, field: FieldRegistration) -> Self {
        self.concrete_level = self.concrete_level.field(field);
        self
    }

    /// Declare a remote call at the concrete level
    pub fn remote_call(mut self, call: RemoteCallRegistration) -> Self {
        self.concrete_level = self.concrete_level.remote_call(call);
        self
    }

    pub(crate) fn scan_order(&self) -> impl Iterator<Item = &ClassLevel> {
        self.root_level
            .iter()
            .chain(self.ancestor_levels.iter())
            .chain(std::iter::once(&self.concrete_level))
    }

    pub(crate) fn ancestor_levels(&self) -> &[ClassLevel] {
        &self.ancestor_levels
    }
}
