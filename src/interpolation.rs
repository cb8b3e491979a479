use std::{any::TypeId, collections::HashMap, sync::Arc};

use bytemuck::Pod;

/// Type-erased interpolation function. Reads `from` and `to` as the value
/// type it was registered for, blends by `t`, and writes the result into
/// `out`. All three slices are exactly the field's size in bytes
pub type InterpolationFn = Arc<dyn Fn(&[u8], &[u8], f32, &mut [u8]) + Send + Sync>;

/// Registry mapping a value type to its interpolation function.
///
/// The schema builder consults this when a field is marked interpolated;
/// a field whose type has no entry here fails class registration. The
/// interpolation math itself lives with the caller, this only stores and
/// hands out the erased functions.
pub struct InterpolationRegistry {
    fns: HashMap<TypeId, InterpolationFn>,
}

impl InterpolationRegistry {
    pub fn new() -> Self {
        Self {
            fns: HashMap::new(),
        }
    }

    /// Register an interpolation function for value type `T`.
    /// Replaces any previous entry for the same type
    pub fn register<T: Pod + 'static>(&mut self, lerp: fn(T, T, f32) -> T) {
        let erased: InterpolationFn = Arc::new(move |from, to, t, out| {
            let a: T = bytemuck::pod_read_unaligned(from);
            let b: T = bytemuck::pod_read_unaligned(to);
            let blended = lerp(a, b, t);
            out.copy_from_slice(bytemuck::bytes_of(&blended));
        });
        self.fns.insert(TypeId::of::<T>(), erased);
    }

    /// Look up the interpolation function registered for a value type
    pub fn lookup(&self, type_id: TypeId) -> Option<&InterpolationFn> {
        self.fns.get(&type_id)
    }

    /// Whether value type `T` has a registered interpolation function
    pub fn has<T: 'static>(&self) -> bool {
        self.fns.contains_key(&TypeId::of::<T>())
    }
}

impl Default for InterpolationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
