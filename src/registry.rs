use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use crate::{
    callbacks::CallbackResolver,
    class_data::EntityClassData,
    error::SchemaError,
    interpolation::InterpolationRegistry,
    registration::ClassRegistration,
    types::ClassId,
};

/// Process-wide store of built class schemas.
///
/// Population happens during an explicit single-threaded registration phase:
/// register interpolation functions and callback methods, then every class
/// (base-most first), then call `lock()`. After lock, no registration is
/// possible and lookups hand out `Arc`-shared immutable schemas safe for
/// concurrent readers. A class's schema is built exactly once, at
/// registration.
pub struct SchemaRegistry {
    /// Interpolation functions consulted for interpolated fields
    pub interpolations: InterpolationRegistry,
    /// Change-notification and remote-call methods, resolved during builds
    pub callbacks: CallbackResolver,
    classes_by_id: HashMap<ClassId, Arc<EntityClassData>>,
    class_ids_by_type: HashMap<TypeId, ClassId>,
    locked: bool,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self {
            interpolations: InterpolationRegistry::new(),
            callbacks: CallbackResolver::new(),
            classes_by_id: HashMap::new(),
            class_ids_by_type: HashMap::new(),
            locked: false,
        }
    }
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and store the schema for one entity class.
    ///
    /// # Panics
    ///
    /// Panics on any registration failure. Use `try_register_class` for
    /// non-panicking error handling
    pub fn register_class(&mut self, registration: ClassRegistration) -> &mut Self {
        if let Err(error) = self.try_register_class(registration) {
            panic!("{}", error);
        }
        self
    }

    /// Try to build and store the schema for one entity class.
    ///
    /// Ancestor classes must already be registered, since their assigned ids
    /// become this class's `base_class_ids`. Fatal configuration errors
    /// abort this class's registration and leave the registry unchanged
    pub fn try_register_class(
        &mut self,
        registration: ClassRegistration,
    ) -> Result<(), SchemaError> {
        self.try_check_lock()?;

        if self.classes_by_id.contains_key(&registration.class_id) {
            return Err(SchemaError::DuplicateClassId {
                class_id: registration.class_id,
            });
        }
        if self.class_ids_by_type.contains_key(&registration.type_id) {
            return Err(SchemaError::DuplicateClass {
                class_name: registration.name,
            });
        }

        let mut base_class_ids = Vec::with_capacity(registration.ancestor_levels().len());
        for ancestor in registration.ancestor_levels() {
            let Some(class_id) = self.class_ids_by_type.get(&ancestor.type_id) else {
                return Err(SchemaError::UnknownAncestor {
                    class_name: registration.name,
                    ancestor_name: ancestor.type_name,
                });
            };
            base_class_ids.push(*class_id);
        }

        let class_data = EntityClassData::build(
            &registration,
            base_class_ids,
            &self.interpolations,
            &self.callbacks,
        )?;

        self.class_ids_by_type
            .insert(registration.type_id, registration.class_id);
        self.classes_by_id
            .insert(registration.class_id, Arc::new(class_data));
        Ok(())
    }

    /// End the registration phase. Lookups become available and further
    /// registration fails
    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    pub fn try_lock(&mut self) -> Result<(), SchemaError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    /// Checks that the registration phase is still open, panicking otherwise
    pub fn check_lock(&self) {
        if self.locked {
            panic!("SchemaRegistry already locked!");
        }
    }

    /// Checks that the registration phase is still open.
    /// Returns Err if the registry is locked
    pub fn try_check_lock(&self) -> Result<(), SchemaError> {
        if self.locked {
            Err(SchemaError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Schema of the class with the given id. Requires the registry to be
    /// locked
    pub fn class_by_id(&self, class_id: ClassId) -> Result<Arc<EntityClassData>, SchemaError> {
        if !self.locked {
            return Err(SchemaError::NotLocked);
        }
        self.classes_by_id
            .get(&class_id)
            .cloned()
            .ok_or(SchemaError::ClassIdNotFound { class_id })
    }

    /// Schema of concrete entity type `E`. Requires the registry to be
    /// locked
    pub fn class_by_type<E: Any>(&self) -> Result<Arc<EntityClassData>, SchemaError> {
        let class_id = self.class_id_of::<E>()?;
        self.class_by_id(class_id)
    }

    /// Assigned class id of concrete entity type `E`. Requires the registry
    /// to be locked
    pub fn class_id_of<E: Any>(&self) -> Result<ClassId, SchemaError> {
        if !self.locked {
            return Err(SchemaError::NotLocked);
        }
        self.class_ids_by_type
            .get(&TypeId::of::<E>())
            .copied()
            .ok_or(SchemaError::ClassNotFound)
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes_by_id.is_empty()
    }
}
