use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use bytemuck::Pod;
use log::warn;

/// Type-erased change-notification callback: applies the previous value (as
/// raw bytes) to an entity after an incoming update changed the field
pub type OnChangeCallback = Arc<dyn Fn(&mut dyn Any, &[u8]) + Send + Sync>;

/// Type-erased remote-call invocation callback: applies a received payload
/// (one argument, or a run of elements for array calls) to an entity
pub type RemoteCallHandler = Arc<dyn Fn(&mut dyn Any, &[u8]) + Send + Sync>;

struct OnChangeEntry {
    value_type: TypeId,
    callback: OnChangeCallback,
}

struct RemoteCallEntry {
    payload_type: TypeId,
    is_array: bool,
    handler: RemoteCallHandler,
}

/// Resolves a typed instance method, by declaring type and name, into an
/// untyped "apply bytes to entity" callback.
///
/// Methods are registered up front from concrete, statically-known functions;
/// the erasure happens once here, at registration, and resolution is a plain
/// table lookup. Failed resolution is never fatal: the builder logs it and
/// proceeds with no callback.
pub struct CallbackResolver {
    on_change: HashMap<(TypeId, &'static str), OnChangeEntry>,
    remote_calls: HashMap<(TypeId, &'static str), RemoteCallEntry>,
}

impl CallbackResolver {
    pub fn new() -> Self {
        Self {
            on_change: HashMap::new(),
            remote_calls: HashMap::new(),
        }
    }

    /// Register a change-notification method declared by entity or syncable
    /// type `E`, taking the field's previous value
    pub fn register_on_change<E: Any, T: Pod>(
        &mut self,
        method: &'static str,
        func: fn(&mut E, T),
    ) {
        let callback: OnChangeCallback = Arc::new(move |target, previous_bytes| {
            let Some(target) = target.downcast_mut::<E>() else {
                warn!("on-change callback invoked with wrong target type");
                return;
            };
            let previous: T = bytemuck::pod_read_unaligned(previous_bytes);
            func(target, previous);
        });
        self.on_change.insert(
            (TypeId::of::<E>(), method),
            OnChangeEntry {
                value_type: TypeId::of::<T>(),
                callback,
            },
        );
    }

    /// Register a remote-callable method declared by type `E`, taking a
    /// single argument of type `T`
    pub fn register_remote_call<E: Any, T: Pod>(
        &mut self,
        method: &'static str,
        func: fn(&mut E, T),
    ) {
        let handler: RemoteCallHandler = Arc::new(move |target, payload| {
            let Some(target) = target.downcast_mut::<E>() else {
                warn!("remote call invoked with wrong target type");
                return;
            };
            let argument: T = bytemuck::pod_read_unaligned(payload);
            func(target, argument);
        });
        self.remote_calls.insert(
            (TypeId::of::<E>(), method),
            RemoteCallEntry {
                payload_type: TypeId::of::<T>(),
                is_array: false,
                handler,
            },
        );
    }

    /// Register a remote-callable method declared by type `E`, taking a run
    /// of `T` elements. The payload carries whole elements back to back
    pub fn register_remote_call_array<E: Any, T: Pod>(
        &mut self,
        method: &'static str,
        func: fn(&mut E, &[T]),
    ) {
        let handler: RemoteCallHandler = Arc::new(move |target, payload| {
            let Some(target) = target.downcast_mut::<E>() else {
                warn!("remote call invoked with wrong target type");
                return;
            };
            let element_size = std::mem::size_of::<T>();
            if element_size == 0 || payload.len() % element_size != 0 {
                warn!("remote call payload is not a whole number of elements");
                return;
            }
            // payload buffers carry no alignment guarantee
            let elements: Vec<T> = payload
                .chunks_exact(element_size)
                .map(bytemuck::pod_read_unaligned)
                .collect();
            func(target, &elements);
        });
        self.remote_calls.insert(
            (TypeId::of::<E>(), method),
            RemoteCallEntry {
                payload_type: TypeId::of::<T>(),
                is_array: true,
                handler,
            },
        );
    }

    /// Resolve a change-notification method. An empty name means no callback
    /// was requested and resolves silently to `None`; a missing or
    /// mismatched entry is logged and also resolves to `None`
    pub fn resolve_on_change(
        &self,
        declaring_type: TypeId,
        declaring_name: &'static str,
        value_type: TypeId,
        method: &str,
    ) -> Option<OnChangeCallback> {
        if method.is_empty() {
            return None;
        }
        let Some(entry) = self.on_change.get(&(declaring_type, method)) else {
            warn!("no on-change method '{method}' registered for '{declaring_name}', field will have no callback");
            return None;
        };
        if entry.value_type != value_type {
            warn!("on-change method '{method}' on '{declaring_name}' takes a different value type than the field, field will have no callback");
            return None;
        }
        Some(entry.callback.clone())
    }

    /// Resolve a remote-callable method. Missing or mismatched entries are
    /// logged and resolve to `None` (the call id is still assigned)
    pub fn resolve_remote_call(
        &self,
        declaring_type: TypeId,
        declaring_name: &'static str,
        payload_type: TypeId,
        is_array: bool,
        method: &str,
    ) -> Option<RemoteCallHandler> {
        let Some(entry) = self.remote_calls.get(&(declaring_type, method)) else {
            warn!("no remote-call method '{method}' registered for '{declaring_name}', call will have no handler");
            return None;
        };
        if entry.payload_type != payload_type || entry.is_array != is_array {
            warn!("remote-call method '{method}' on '{declaring_name}' takes a different payload than declared, call will have no handler");
            return None;
        }
        Some(entry.handler.clone())
    }
}

impl Default for CallbackResolver {
    fn default() -> Self {
        Self::new()
    }
}
