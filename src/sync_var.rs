use std::ops::{Deref, DerefMut};

use bytemuck::Pod;

use crate::types::NotifyId;

/// A synchronized value of a fixed-size type, change-detected by raw bytes.
///
/// Equality compares the underlying byte representation exactly, bypassing
/// whatever equality `T` itself defines. Change detection stays exact and
/// branch-free for any `T`, at the cost of treating bit-distinct but
/// semantically equal values (two NaN encodings, for instance) as unequal.
/// The `Pod` bound rules out padding bytes, so every byte compared is a
/// value byte.
#[derive(Clone, Copy, Debug)]
pub struct SyncVar<T: Pod> {
    inner: T,
}

impl<T: Pod> SyncVar<T> {
    /// Create a new SyncVar containing the given value
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Gets a reference to the contained value
    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Set the contained value
    pub fn set(&mut self, value: T) {
        self.inner = value;
    }

    /// Unwraps into the contained value
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// The raw bytes backing the contained value
    pub fn bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.inner)
    }
}

impl<T: Pod> From<T> for SyncVar<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Pod> PartialEq for SyncVar<T> {
    fn eq(&self, other: &Self) -> bool {
        bytemuck::bytes_of(&self.inner) == bytemuck::bytes_of(&other.inner)
    }
}

// Byte comparison is reflexive even for floats, so full Eq holds
impl<T: Pod> Eq for SyncVar<T> {}

impl<T: Pod> Deref for SyncVar<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Pod> DerefMut for SyncVar<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T: Pod + Default> Default for SyncVar<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A [`SyncVar`] that additionally routes change notifications.
///
/// Carries a small notify id, assigned during schema wiring (the field's
/// index in the class's field list), used by the runtime to look up the
/// registered on-change callback when an incoming update changes the value.
/// The notify id does not participate in equality.
#[derive(Clone, Copy, Debug)]
pub struct SyncVarWithNotify<T: Pod> {
    inner: T,
    notify_id: NotifyId,
}

impl<T: Pod> SyncVarWithNotify<T> {
    /// Create a new SyncVarWithNotify containing the given value.
    /// The notify id starts at 0 until wiring assigns the real one
    pub fn new(value: T) -> Self {
        Self {
            inner: value,
            notify_id: 0,
        }
    }

    /// Gets a reference to the contained value
    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Set the contained value
    pub fn set(&mut self, value: T) {
        self.inner = value;
    }

    /// Unwraps into the contained value
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// The raw bytes backing the contained value
    pub fn bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.inner)
    }

    /// The notify id routing this field's change notifications
    pub fn notify_id(&self) -> NotifyId {
        self.notify_id
    }

    /// Assign the notify id. Called during schema wiring, not by users
    pub fn set_notify_id(&mut self, notify_id: NotifyId) {
        self.notify_id = notify_id;
    }
}

impl<T: Pod> From<T> for SyncVarWithNotify<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Pod> PartialEq for SyncVarWithNotify<T> {
    fn eq(&self, other: &Self) -> bool {
        bytemuck::bytes_of(&self.inner) == bytemuck::bytes_of(&other.inner)
    }
}

impl<T: Pod> Eq for SyncVarWithNotify<T> {}

impl<T: Pod> Deref for SyncVarWithNotify<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Pod> DerefMut for SyncVarWithNotify<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T: Pod + Default> Default for SyncVarWithNotify<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
