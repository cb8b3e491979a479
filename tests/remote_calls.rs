//! Tests for remote-call registration: sequential id assignment, the
//! single-byte capacity ceiling, and the independence of syncable-type
//! namespaces.

use std::any::{Any, TypeId};

use entity_schema::{
    ClassRegistration, FieldRegistration, RemoteCallRegistration, SchemaError, SchemaRegistry,
    SyncableLevel, SyncableTypeDescriptor, MAX_REMOTE_CALLS,
};

#[test]
fn entity_level_ids_are_sequential_from_zero() {
    #[derive(Default)]
    struct Soldier;

    let mut registry = SchemaRegistry::new();
    registry.register_class(
        ClassRegistration::new::<Soldier>("Soldier", 1, 0, Soldier::default)
            .remote_call(RemoteCallRegistration::new::<u16>("set_weapon"))
            .remote_call(RemoteCallRegistration::new::<f32>("set_speed"))
            .remote_call(RemoteCallRegistration::array::<u8>("apply_path")),
    );
    registry.lock();

    let schema = registry.class_by_type::<Soldier>().unwrap();
    let calls = schema.remote_calls();
    assert_eq!(calls.len(), 3);

    let set_weapon = calls.call(0).unwrap();
    assert_eq!(set_weapon.name, "set_weapon");
    assert_eq!(set_weapon.payload_size, 2);
    assert!(!set_weapon.is_array);

    let set_speed = calls.call(1).unwrap();
    assert_eq!(set_speed.name, "set_speed");
    assert_eq!(set_speed.payload_size, 4);

    // array payload records the size of one element
    let apply_path = calls.call(2).unwrap();
    assert_eq!(apply_path.payload_size, 1);
    assert!(apply_path.is_array);

    assert!(calls.call(3).is_none());
}

#[test]
fn ids_continue_across_hierarchy_levels() {
    use entity_schema::ClassLevel;

    struct Vehicle;
    #[derive(Default)]
    struct Tank;

    let mut registry = SchemaRegistry::new();
    registry.register_class(
        ClassRegistration::new::<Vehicle>("Vehicle", 1, 0, || Vehicle)
            .remote_call(RemoteCallRegistration::new::<f32>("set_throttle")),
    );
    registry.register_class(
        ClassRegistration::new::<Tank>("Tank", 2, 0, Tank::default)
            .ancestor_level(
                ClassLevel::of::<Vehicle>("Vehicle")
                    .remote_call(RemoteCallRegistration::new::<f32>("set_throttle")),
            )
            .remote_call(RemoteCallRegistration::new::<u16>("fire_at")),
    );
    registry.lock();

    let schema = registry.class_by_type::<Tank>().unwrap();
    let calls = schema.remote_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls.call(0).unwrap().name, "set_throttle");
    assert_eq!(calls.call(1).unwrap().name, "fire_at");
}

#[test]
fn namespace_overflows_at_255th_call() {
    struct Chatterbox;

    fn registration_with_n_calls(n: usize) -> ClassRegistration {
        let mut registration =
            ClassRegistration::new::<Chatterbox>("Chatterbox", 1, 0, || Chatterbox);
        for index in 0..n {
            let name: &'static str = Box::leak(format!("call_{index}").into_boxed_str());
            registration = registration.remote_call(RemoteCallRegistration::new::<u8>(name));
        }
        registration
    }

    // 254 calls fit, with ids 0..=253
    let mut registry = SchemaRegistry::new();
    registry.register_class(registration_with_n_calls(MAX_REMOTE_CALLS));
    registry.lock();
    let schema = registry.class_by_type::<Chatterbox>().unwrap();
    assert_eq!(schema.remote_calls().len(), 254);
    assert_eq!(schema.remote_calls().call(253).unwrap().id, 253);

    // the 255th assignment fails the whole class
    let mut registry = SchemaRegistry::new();
    let result = registry.try_register_class(registration_with_n_calls(MAX_REMOTE_CALLS + 1));
    assert_eq!(
        result.unwrap_err(),
        SchemaError::RemoteCallOverflow {
            class_name: "Chatterbox",
            namespace: "Chatterbox",
        }
    );
}

#[test]
fn syncable_namespace_is_independent_of_entity_namespace() {
    struct Inventory;
    #[derive(Default)]
    struct Merchant;

    let descriptor = SyncableTypeDescriptor::of::<Inventory>("Inventory").level(
        SyncableLevel::of::<Inventory>("Inventory")
            .remote_call(RemoteCallRegistration::new::<u32>("add_item"))
            .remote_call(RemoteCallRegistration::new::<u32>("remove_item")),
    );

    let mut registry = SchemaRegistry::new();
    registry.register_class(
        ClassRegistration::new::<Merchant>("Merchant", 1, 0, Merchant::default)
            .remote_call(RemoteCallRegistration::new::<u16>("greet"))
            .field(FieldRegistration::syncable("inventory", 0, descriptor)),
    );
    registry.lock();

    let schema = registry.class_by_type::<Merchant>().unwrap();

    // both namespaces start at 0
    assert_eq!(schema.remote_calls().call(0).unwrap().name, "greet");

    let inventory_calls = schema
        .syncable_remote_calls(TypeId::of::<Inventory>())
        .unwrap();
    assert_eq!(inventory_calls.len(), 2);
    assert_eq!(inventory_calls.call(0).unwrap().name, "add_item");
    assert_eq!(inventory_calls.call(1).unwrap().name, "remove_item");
}

#[test]
fn same_syncable_type_used_twice_shares_one_namespace() {
    struct Inventory;
    #[derive(Default)]
    struct Smuggler;

    let descriptor = SyncableTypeDescriptor::of::<Inventory>("Inventory").level(
        SyncableLevel::of::<Inventory>("Inventory")
            .remote_call(RemoteCallRegistration::new::<u32>("add_item")),
    );

    let mut registry = SchemaRegistry::new();
    registry.register_class(
        ClassRegistration::new::<Smuggler>("Smuggler", 1, 0, Smuggler::default)
            .field(FieldRegistration::syncable("visible_goods", 0, descriptor.clone()))
            .field(FieldRegistration::syncable("hidden_goods", 0, descriptor)),
    );
    registry.lock();

    let schema = registry.class_by_type::<Smuggler>().unwrap();
    assert_eq!(schema.syncable_fields().len(), 2);

    // one namespace for the type, not one per occurrence
    let inventory_calls = schema
        .syncable_remote_calls(TypeId::of::<Inventory>())
        .unwrap();
    assert_eq!(inventory_calls.len(), 1);
}

#[test]
fn distinct_syncable_types_get_distinct_namespaces() {
    struct Inventory;
    struct QuestLog;
    #[derive(Default)]
    struct Adventurer;

    let inventory = SyncableTypeDescriptor::of::<Inventory>("Inventory").level(
        SyncableLevel::of::<Inventory>("Inventory")
            .remote_call(RemoteCallRegistration::new::<u32>("add_item")),
    );
    let quest_log = SyncableTypeDescriptor::of::<QuestLog>("QuestLog").level(
        SyncableLevel::of::<QuestLog>("QuestLog")
            .remote_call(RemoteCallRegistration::new::<u16>("start_quest")),
    );

    let mut registry = SchemaRegistry::new();
    registry.register_class(
        ClassRegistration::new::<Adventurer>("Adventurer", 1, 0, Adventurer::default)
            .field(FieldRegistration::syncable("inventory", 0, inventory))
            .field(FieldRegistration::syncable("quests", 0, quest_log)),
    );
    registry.lock();

    let schema = registry.class_by_type::<Adventurer>().unwrap();
    let inventory_calls = schema
        .syncable_remote_calls(TypeId::of::<Inventory>())
        .unwrap();
    let quest_calls = schema
        .syncable_remote_calls(TypeId::of::<QuestLog>())
        .unwrap();

    // both namespaces number from 0 independently
    assert_eq!(inventory_calls.call(0).unwrap().name, "add_item");
    assert_eq!(quest_calls.call(0).unwrap().name, "start_quest");
}

#[test]
fn resolved_handler_is_stored_in_the_table() {
    #[derive(Default)]
    struct Soldier {
        weapon: u16,
    }
    fn set_weapon(soldier: &mut Soldier, weapon: u16) {
        soldier.weapon = weapon;
    }

    let mut registry = SchemaRegistry::new();
    registry
        .callbacks
        .register_remote_call::<Soldier, u16>("set_weapon", set_weapon);
    registry.register_class(
        ClassRegistration::new::<Soldier>("Soldier", 1, 0, Soldier::default)
            .remote_call(RemoteCallRegistration::new::<u16>("set_weapon")),
    );
    registry.lock();

    let schema = registry.class_by_type::<Soldier>().unwrap();
    let handler = schema.remote_calls().handler(0).unwrap();

    let mut soldier = Soldier::default();
    handler(&mut soldier as &mut dyn Any, &9u16.to_ne_bytes());
    assert_eq!(soldier.weapon, 9);
}

#[test]
fn unresolved_handler_still_gets_an_id() {
    #[derive(Default)]
    struct Soldier;

    let mut registry = SchemaRegistry::new();
    registry.register_class(
        ClassRegistration::new::<Soldier>("Soldier", 1, 0, Soldier::default)
            .remote_call(RemoteCallRegistration::new::<u16>("set_weapon")),
    );
    registry.lock();

    let schema = registry.class_by_type::<Soldier>().unwrap();
    assert!(schema.remote_calls().call(0).is_some());
    assert!(schema.remote_calls().handler(0).is_none());
}
