//! # Entity Schema
//! Schema-construction core of a networked entity-state replication
//! framework: builds, once per entity class, the immutable binary layout and
//! synchronization contract (field offsets and sizes, change detection,
//! remote-call id tables, interpolation and visibility policy) that the
//! delta/apply engine and remote-call dispatcher operate against.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod callbacks;
mod class_data;
mod dirty_mask;
mod error;
mod flags;
mod interpolation;
mod registration;
mod registry;
mod sync_var;
mod types;

pub use callbacks::{CallbackResolver, OnChangeCallback, RemoteCallHandler};
pub use class_data::{EntityClassData, FieldDescriptor, RemoteCallDescriptor, RemoteCallTable};
pub use dirty_mask::DirtyMask;
pub use error::SchemaError;
pub use flags::SyncFlags;
pub use interpolation::{InterpolationFn, InterpolationRegistry};
pub use registration::{
    ClassLevel, ClassRegistration, EntityConstructor, FieldRegistration, FieldType,
    RemoteCallRegistration, SyncableLevel, SyncableTypeDescriptor,
};
pub use registry::SchemaRegistry;
pub use sync_var::{SyncVar, SyncVarWithNotify};
pub use types::{
    ClassId, EntityId, FilterId, NotifyId, RemoteCallId, ENTITY_REF_SIZE, MAX_REMOTE_CALLS,
    REMOTE_CALL_TABLE_SIZE,
};
