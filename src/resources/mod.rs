//! GPU-side resource bookkeeping.
//!
//! [`GpuResources`] is the single owner of every live geometry, material and
//! texture clone in a visualization. Scene nodes hold copyable handles; a
//! handle stays valid until [`dispose`](dispose::dispose) (or an explicit
//! release) removes the entry. The live counts make leaks observable: after
//! a scene rebuild they must return to what the new scene needs.
//!
//! Backends resolve handles to descriptors when they upload or draw.

pub mod descriptors;
pub mod dispose;
pub mod pool;

use rustc_hash::FxHashMap;
use serde::Serialize;

pub use descriptors::{
    Blending, GeometryDesc, MaterialDesc, Shading, TextureDesc,
};

/// Handle to a live geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GeometryHandle(u64);

/// Handle to a live material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MaterialHandle(u64);

/// Handle to a live texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TextureHandle(u64);

/// A live material and the textures attached to it.
#[derive(Debug, Clone)]
pub struct MaterialEntry {
    /// The material description.
    pub desc: MaterialDesc,
    /// Texture created for `desc.map`, if any.
    pub map: Option<TextureHandle>,
}

/// Number of live resources per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ResourceCounts {
    /// Live geometries.
    pub geometries: usize,
    /// Live materials.
    pub materials: usize,
    /// Live textures.
    pub textures: usize,
}

impl ResourceCounts {
    /// Sum over all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.geometries + self.materials + self.textures
    }
}

/// Store of live resource clones.
#[derive(Debug, Default)]
pub struct GpuResources {
    next_id: u64,
    geometries: FxHashMap<u64, GeometryDesc>,
    materials: FxHashMap<u64, MaterialEntry>,
    textures: FxHashMap<u64, TextureDesc>,
    /// Lifetime allocation count across all kinds.
    allocated: u64,
    /// Lifetime release count across all kinds.
    released: u64,
}

impl GpuResources {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.allocated += 1;
        self.next_id
    }

    /// Create a live geometry from a descriptor.
    pub fn create_geometry(&mut self, desc: GeometryDesc) -> GeometryHandle {
        let id = self.next();
        let _ = self.geometries.insert(id, desc);
        GeometryHandle(id)
    }

    /// Create a live material. A `map` descriptor also creates its texture.
    pub fn create_material(&mut self, desc: MaterialDesc) -> MaterialHandle {
        let map = desc.map.clone().map(|tex| self.create_texture(tex));
        let id = self.next();
        let _ = self.materials.insert(id, MaterialEntry { desc, map });
        MaterialHandle(id)
    }

    /// Create a live texture.
    pub fn create_texture(&mut self, desc: TextureDesc) -> TextureHandle {
        let id = self.next();
        let _ = self.textures.insert(id, desc);
        TextureHandle(id)
    }

    /// Look up a live geometry.
    #[must_use]
    pub fn geometry(&self, handle: GeometryHandle) -> Option<&GeometryDesc> {
        self.geometries.get(&handle.0)
    }

    /// Look up a live material.
    #[must_use]
    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialEntry> {
        self.materials.get(&handle.0)
    }

    /// Look up a live texture.
    #[must_use]
    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureDesc> {
        self.textures.get(&handle.0)
    }

    /// Release a geometry. Returns `false` if it was already released.
    pub fn release_geometry(&mut self, handle: GeometryHandle) -> bool {
        self.release(|s| s.geometries.remove(&handle.0).is_some())
    }

    /// Release a material without touching its textures. Returns `false`
    /// if it was already released.
    pub fn release_material(&mut self, handle: MaterialHandle) -> bool {
        self.release(|s| s.materials.remove(&handle.0).is_some())
    }

    /// Release a texture. Returns `false` if it was already released.
    pub fn release_texture(&mut self, handle: TextureHandle) -> bool {
        self.release(|s| s.textures.remove(&handle.0).is_some())
    }

    fn release(&mut self, remove: impl FnOnce(&mut Self) -> bool) -> bool {
        let removed = remove(self);
        if removed {
            self.released += 1;
        }
        removed
    }

    /// Current live counts.
    #[must_use]
    pub fn live(&self) -> ResourceCounts {
        ResourceCounts {
            geometries: self.geometries.len(),
            materials: self.materials.len(),
            textures: self.textures.len(),
        }
    }

    /// Lifetime `(allocated, released)` totals.
    #[must_use]
    pub fn lifetime(&self) -> (u64, u64) {
        (self.allocated, self.released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::color::Color;

    #[test]
    fn material_map_creates_texture() {
        let mut res = GpuResources::new();
        let mat = res.create_material(MaterialDesc::sprite(
            TextureDesc::glow(Color(0x00aa55)),
        ));
        assert_eq!(
            res.live(),
            ResourceCounts {
                geometries: 0,
                materials: 1,
                textures: 1
            }
        );
        assert!(res.material(mat).unwrap().map.is_some());
    }

    #[test]
    fn release_is_idempotent() {
        let mut res = GpuResources::new();
        let geo = res.create_geometry(GeometryDesc::Quad);
        assert!(res.release_geometry(geo));
        assert!(!res.release_geometry(geo));
        assert_eq!(res.live().total(), 0);
        assert_eq!(res.lifetime(), (1, 1));
    }
}
