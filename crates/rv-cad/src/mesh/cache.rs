//! Per-shape tessellation cache
//!
//! Meshes are keyed by the shape id and the exact bit patterns of the
//! deflection parameters, so a mesh produced under one set of tolerances is
//! never handed out for another.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use super::{MeshParams, TessellatedMesh};
use crate::kernel::KernelResult;

/// Cache key: one shape under one set of tessellation controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TessellationKey {
    pub shape_id: Uuid,
    linear_bits: u64,
    angular_bits: u64,
}

impl TessellationKey {
    pub fn new(shape_id: Uuid, params: &MeshParams) -> Self {
        Self {
            shape_id,
            linear_bits: params.linear_deflection.to_bits(),
            angular_bits: params.angular_deflection.to_bits(),
        }
    }
}

/// Thread-safe store of finished tessellations
#[derive(Debug, Default)]
pub struct TessellationCache {
    entries: Mutex<HashMap<TessellationKey, Arc<TessellatedMesh>>>,
}

impl TessellationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TessellationKey) -> Option<Arc<TessellatedMesh>> {
        self.entries.lock().get(key).cloned()
    }

    /// Return the cached mesh for `key`, building it with `build` on a miss.
    ///
    /// The lock is not held while building; if two callers race on the same
    /// key the first stored mesh wins and both receive it.
    pub fn get_or_try_insert_with(
        &self,
        key: TessellationKey,
        build: impl FnOnce() -> KernelResult<TessellatedMesh>,
    ) -> KernelResult<Arc<TessellatedMesh>> {
        if let Some(mesh) = self.get(&key) {
            return Ok(mesh);
        }
        let mesh = Arc::new(build()?);
        let mut entries = self.entries.lock();
        Ok(entries.entry(key).or_insert(mesh).clone())
    }

    /// Remove every entry belonging to a shape
    pub fn clear_shape(&self, shape_id: Uuid) {
        self.entries.lock().retain(|key, _| key.shape_id != shape_id);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_with(count: usize) -> TessellatedMesh {
        TessellatedMesh {
            vertices: vec![[0.0; 3]; 3],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: [0, 1, 2].repeat(count),
        }
    }

    #[test]
    fn test_distinct_params_get_distinct_entries() {
        let cache = TessellationCache::new();
        let id = Uuid::new_v4();
        let coarse = MeshParams::new(0.1, 0.5).unwrap();
        let fine = MeshParams::new(0.1, 0.1).unwrap();

        let a = cache
            .get_or_try_insert_with(TessellationKey::new(id, &coarse), || Ok(mesh_with(1)))
            .unwrap();
        let b = cache
            .get_or_try_insert_with(TessellationKey::new(id, &fine), || Ok(mesh_with(5)))
            .unwrap();

        assert_eq!(a.triangle_count(), 1);
        assert_eq!(b.triangle_count(), 5);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_hit_skips_builder() {
        let cache = TessellationCache::new();
        let key = TessellationKey::new(Uuid::new_v4(), &MeshParams::new(1.0, 1.0).unwrap());
        let first = cache
            .get_or_try_insert_with(key, || Ok(mesh_with(2)))
            .unwrap();
        let second = cache
            .get_or_try_insert_with(key, || panic!("builder must not run on a hit"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_clear_shape_only_removes_that_shape() {
        let cache = TessellationCache::new();
        let params = MeshParams::new(1.0, 1.0).unwrap();
        let kept = Uuid::new_v4();
        let dropped = Uuid::new_v4();
        for id in [kept, dropped] {
            cache
                .get_or_try_insert_with(TessellationKey::new(id, &params), || Ok(mesh_with(1)))
                .unwrap();
        }
        cache.clear_shape(dropped);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&TessellationKey::new(kept, &params)).is_some());
    }
}
