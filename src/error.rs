use thiserror::Error;

use crate::types::ClassId;

/// Errors that can occur while building or registering an entity class schema
///
/// Every variant is fatal for the class being registered: the schema cannot
/// be produced, so registration of that class is aborted. Recoverable
/// conditions (an unsupported field type, an unresolvable notification
/// method) are logged and skipped instead of surfacing here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field was marked interpolated but its value type has no registered
    /// interpolation function
    #[error("Class '{class_name}' field '{field_name}' is marked interpolated, but no interpolation function is registered for its type. Register one via `InterpolationRegistry::register()` before registering the class")]
    MissingInterpolation {
        class_name: &'static str,
        field_name: &'static str,
    },

    /// A syncable field was registered as mutable. Syncable state is mutated
    /// in place through a stable reference, so the declaring field must be
    /// immutable
    #[error("Class '{class_name}' field '{field_name}' is a mutable syncable field. Syncable fields must be immutable after construction")]
    MutableSyncable {
        class_name: &'static str,
        field_name: &'static str,
    },

    /// A remote-call namespace ran out of single-byte ids
    #[error("Class '{class_name}' declares too many remote calls in namespace '{namespace}'. A namespace holds at most 254 calls")]
    RemoteCallOverflow {
        class_name: &'static str,
        namespace: &'static str,
    },

    /// Registry is locked and no further classes may be registered
    #[error("SchemaRegistry is already locked and cannot be modified. SchemaRegistry.lock() has been called and no further registrations are allowed")]
    AlreadyLocked,

    /// Registry lookups require the registration phase to be over
    #[error("SchemaRegistry is not yet locked. Call SchemaRegistry.lock() after registering all classes, before looking up schemas")]
    NotLocked,

    /// A class id was registered twice
    #[error("Class id {class_id} is already registered to another class")]
    DuplicateClassId { class_id: ClassId },

    /// A concrete entity type was registered twice
    #[error("Class '{class_name}' is already registered")]
    DuplicateClass { class_name: &'static str },

    /// An ancestor level names a type that has not been registered yet.
    /// Classes must be registered base-most first
    #[error("Class '{class_name}' lists ancestor '{ancestor_name}' which is not registered. Register ancestor classes before their descendants")]
    UnknownAncestor {
        class_name: &'static str,
        ancestor_name: &'static str,
    },

    /// Class id lookup failed
    #[error("Class id {class_id} not found in registry. Class must be registered via `register_class()` before lock")]
    ClassIdNotFound { class_id: ClassId },

    /// Class type lookup failed
    #[error("Class type not found in registry. Class must be registered via `register_class()` before lock")]
    ClassNotFound,
}
