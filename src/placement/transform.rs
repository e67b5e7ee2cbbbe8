use bevy::prelude::*;

use crate::constants::gestures::SCALE_MIN;

// Repeated fine steps accumulate float error around the floor.
const SCALE_TOLERANCE: f32 = 1e-4;

/// Live transform of the placement preview, applied on top of the template's own scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementTransform {
    /// World x/y of the last projected pointer
    pub position: Vec2,
    pub rotation_degrees: f32,
    /// Multiplier on the template root scale
    pub scale: f32,
    /// Horizontal flip
    pub mirrored: bool,
}

impl Default for PlacementTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation_degrees: 0.0,
            scale: 1.0,
            mirrored: false,
        }
    }
}

impl PlacementTransform {
    /// -1 when mirrored, +1 otherwise.
    pub fn mirror_sign(&self) -> f32 {
        if self.mirrored { -1.0 } else { 1.0 }
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.rotation_degrees += degrees;
    }

    /// Add to the scale multiplier. A step that would take it below [`SCALE_MIN`] is refused,
    /// so opposite steps always cancel out. Returns whether the step was applied.
    pub fn add_scale(&mut self, delta: f32) -> bool {
        let scale = self.scale + delta;
        if scale < SCALE_MIN - SCALE_TOLERANCE {
            return false;
        }
        self.scale = scale;
        true
    }

    pub fn toggle_mirror(&mut self) {
        self.mirrored = !self.mirrored;
    }

    /// Back to no mirror, unit scale and zero rotation. Position is kept.
    pub fn reset(&mut self) {
        self.rotation_degrees = 0.0;
        self.scale = 1.0;
        self.mirrored = false;
    }

    pub fn to_transform(&self, base_scale: Vec3, depth: f32) -> Transform {
        let mut scale = base_scale * self.scale;
        scale.x *= self.mirror_sign();
        Transform {
            translation: self.position.extend(depth),
            rotation: Quat::from_rotation_z(self.rotation_degrees.to_radians()),
            scale,
        }
    }
}
