//! Dynamic light set
//!
//! Lights are owned by the scene and addressed through stable handles.
//! The owner flags a light dirty whenever anything relevant to it changes
//! (moved, spawned, recolored, or static geometry mutated within its
//! radius); the lighting subsystem clears the flags at end of frame.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::Vec3;

new_key_type! {
    /// Stable handle to a light in a [`LightSet`]
    pub struct LightId;
}

/// How a light resolves visibility during direct injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Occlusion is ray-tested against the static geometry index
    Lamp,
    /// Visibility comes from a pre-rendered cubemap; the injection pass
    /// performs no ray test for it
    CubemapLit,
}

/// A dynamic point light
#[derive(Debug, Clone)]
pub struct Light {
    /// World position
    pub position: Vec3,
    /// Emitted color
    pub color: Vec3,
    /// Influence radius; samples beyond it receive nothing
    pub radius: f32,
    /// Intensity multiplier
    pub strength: f32,
    /// Visibility mode
    pub kind: LightKind,
    /// Set by the owner on any relevant change; cleared by the subsystem
    pub dirty: bool,
}

impl Light {
    /// Warm incandescent default color
    pub fn default_color() -> Vec3 {
        Vec3::new(1.0, 0.78, 0.529)
    }

    /// Create a lamp light, born dirty so it takes effect on the next frame
    pub fn new(position: Vec3, color: Vec3, radius: f32, strength: f32) -> Self {
        Self {
            position,
            color,
            radius,
            strength,
            kind: LightKind::Lamp,
            dirty: true,
        }
    }

    /// Switch the visibility mode
    pub fn with_kind(mut self, kind: LightKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Self::default_color(), 6.0, 1.0)
    }
}

/// Externally owned collection of lights with stable ids
#[derive(Debug, Default)]
pub struct LightSet {
    lights: SlotMap<LightId, Light>,
}

impl LightSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a light, returning its stable handle
    pub fn insert(&mut self, light: Light) -> LightId {
        self.lights.insert(light)
    }

    /// Remove a light
    ///
    /// Removal alone does not re-light the area the light covered; the
    /// owner marks a remaining or temporary light dirty to trigger the
    /// recompute, the same contract as for geometry changes.
    pub fn remove(&mut self, id: LightId) -> Option<Light> {
        self.lights.remove(id)
    }

    /// Shared access to a light
    pub fn get(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id)
    }

    /// Mutable access to a light; the owner sets `dirty` itself
    pub fn get_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights.get_mut(id)
    }

    /// Mark a light dirty
    pub fn touch(&mut self, id: LightId) {
        if let Some(light) = self.lights.get_mut(id) {
            light.dirty = true;
        }
    }

    /// Number of lights
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// Whether the set holds no lights
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Iterate over handles and lights
    pub fn iter(&self) -> impl Iterator<Item = (LightId, &Light)> {
        self.lights.iter()
    }

    /// Iterate over lights
    pub fn values(&self) -> impl Iterator<Item = &Light> {
        self.lights.values()
    }

    /// Whether any light is currently flagged dirty
    pub fn any_dirty(&self) -> bool {
        self.lights.values().any(|light| light.dirty)
    }

    /// Clear every dirty flag; called once all frame stages have read them
    pub fn clear_dirty(&mut self) {
        for light in self.lights.values_mut() {
            light.dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_light_is_dirty() {
        let light = Light::new(Vec3::zeros(), Light::default_color(), 6.0, 1.0);
        assert!(light.dirty);
        assert_eq!(light.kind, LightKind::Lamp);
    }

    #[test]
    fn test_touch_and_clear_dirty() {
        let mut lights = LightSet::new();
        let id = lights.insert(Light::default());
        lights.clear_dirty();
        assert!(!lights.any_dirty());

        lights.touch(id);
        assert!(lights.any_dirty());

        lights.clear_dirty();
        assert!(!lights.any_dirty());
    }

    #[test]
    fn test_handles_stay_valid_after_removal() {
        let mut lights = LightSet::new();
        let a = lights.insert(Light::default());
        let b = lights.insert(Light::default());
        lights.remove(a);
        assert!(lights.get(a).is_none());
        assert!(lights.get(b).is_some());
        assert_eq!(lights.len(), 1);
    }
}
