//! Tests for SchemaRegistry registration-phase discipline: the lock, lookup
//! gating, and duplicate/ancestor validation.

use entity_schema::{ClassLevel, ClassRegistration, SchemaError, SchemaRegistry};

#[derive(Default)]
struct Crate;
#[derive(Default)]
struct Barrel;

#[test]
fn registration_after_lock_fails() {
    let mut registry = SchemaRegistry::new();
    registry.register_class(ClassRegistration::new::<Crate>("Crate", 1, 0, Crate::default));
    registry.lock();

    let result = registry
        .try_register_class(ClassRegistration::new::<Barrel>("Barrel", 2, 0, Barrel::default));
    assert_eq!(result.unwrap_err(), SchemaError::AlreadyLocked);
}

#[test]
fn double_lock_fails() {
    let mut registry = SchemaRegistry::new();
    registry.lock();
    assert_eq!(registry.try_lock().unwrap_err(), SchemaError::AlreadyLocked);
}

#[test]
fn lookups_before_lock_fail() {
    let mut registry = SchemaRegistry::new();
    registry.register_class(ClassRegistration::new::<Crate>("Crate", 1, 0, Crate::default));

    assert_eq!(
        registry.class_by_id(1).unwrap_err(),
        SchemaError::NotLocked
    );
    assert_eq!(
        registry.class_by_type::<Crate>().unwrap_err(),
        SchemaError::NotLocked
    );
}

#[test]
fn lookups_after_lock_succeed() {
    let mut registry = SchemaRegistry::new();
    registry.register_class(ClassRegistration::new::<Crate>("Crate", 1, 0, Crate::default));
    registry.lock();

    assert_eq!(registry.class_id_of::<Crate>().unwrap(), 1);
    let by_id = registry.class_by_id(1).unwrap();
    let by_type = registry.class_by_type::<Crate>().unwrap();
    assert_eq!(by_id.name(), "Crate");
    assert_eq!(by_type.class_id(), 1);
}

#[test]
fn unknown_class_lookups_fail() {
    let mut registry = SchemaRegistry::new();
    registry.register_class(ClassRegistration::new::<Crate>("Crate", 1, 0, Crate::default));
    registry.lock();

    assert_eq!(
        registry.class_by_id(99).unwrap_err(),
        SchemaError::ClassIdNotFound { class_id: 99 }
    );
    assert_eq!(
        registry.class_by_type::<Barrel>().unwrap_err(),
        SchemaError::ClassNotFound
    );
}

#[test]
fn duplicate_class_id_fails() {
    let mut registry = SchemaRegistry::new();
    registry.register_class(ClassRegistration::new::<Crate>("Crate", 1, 0, Crate::default));

    let result = registry
        .try_register_class(ClassRegistration::new::<Barrel>("Barrel", 1, 0, Barrel::default));
    assert_eq!(
        result.unwrap_err(),
        SchemaError::DuplicateClassId { class_id: 1 }
    );
}

#[test]
fn duplicate_class_type_fails() {
    let mut registry = SchemaRegistry::new();
    registry.register_class(ClassRegistration::new::<Crate>("Crate", 1, 0, Crate::default));

    let result = registry
        .try_register_class(ClassRegistration::new::<Crate>("Crate", 2, 0, Crate::default));
    assert_eq!(
        result.unwrap_err(),
        SchemaError::DuplicateClass {
            class_name: "Crate"
        }
    );
}

#[test]
fn unregistered_ancestor_fails() {
    struct Container;

    let mut registry = SchemaRegistry::new();
    let result = registry.try_register_class(
        ClassRegistration::new::<Barrel>("Barrel", 2, 0, Barrel::default)
            .ancestor_level(ClassLevel::of::<Container>("Container")),
    );
    assert_eq!(
        result.unwrap_err(),
        SchemaError::UnknownAncestor {
            class_name: "Barrel",
            ancestor_name: "Container",
        }
    );
}

#[test]
fn failed_registration_leaves_registry_unchanged() {
    struct Container;

    let mut registry = SchemaRegistry::new();
    let _ = registry.try_register_class(
        ClassRegistration::new::<Barrel>("Barrel", 2, 0, Barrel::default)
            .ancestor_level(ClassLevel::of::<Container>("Container")),
    );
    assert!(registry.is_empty());

    // the type and id stay free for a corrected registration
    registry.register_class(ClassRegistration::new::<Barrel>("Barrel", 2, 0, Barrel::default));
    registry.lock();
    assert_eq!(registry.class_id_of::<Barrel>().unwrap(), 2);
}
