use bevy::prelude::*;

use super::ScreenProjection;

/// Screen-to-world projection captured from a camera for one dispatch pass.
#[derive(Debug, Clone, Copy)]
pub struct CameraProjection {
    world_from_clip: Mat4,
    viewport_size: Vec2,
}

impl CameraProjection {
    /// `None` while the camera has no viewport yet.
    pub fn new(camera: &Camera, camera_transform: &GlobalTransform) -> Option<Self> {
        let viewport_size = camera.logical_viewport_size()?;
        let world_from_clip = Mat4::from(camera_transform.affine()) * camera.clip_from_view().inverse();
        Some(Self::from_parts(world_from_clip, viewport_size))
    }

    pub fn from_parts(world_from_clip: Mat4, viewport_size: Vec2) -> Self {
        Self {
            world_from_clip,
            viewport_size,
        }
    }
}

impl ScreenProjection for CameraProjection {
    fn pixel_height(&self) -> f32 {
        self.viewport_size.y
    }

    fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let ndc = screen / self.viewport_size * 2.0 - Vec2::ONE;
        self.world_from_clip.project_point3(ndc.extend(0.0)).truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_screen_corners_through_ndc() {
        // One world unit per pixel, camera centred on the origin.
        let projection = CameraProjection::from_parts(
            Mat4::from_scale(Vec3::new(400.0, 300.0, 1.0)),
            Vec2::new(800.0, 600.0),
        );
        assert_eq!(projection.pixel_height(), 600.0);
        assert_eq!(projection.screen_to_world(Vec2::new(400.0, 300.0)), Vec2::ZERO);
        assert_eq!(projection.screen_to_world(Vec2::new(800.0, 600.0)), Vec2::new(400.0, 300.0));
        assert_eq!(projection.screen_to_world(Vec2::ZERO), Vec2::new(-400.0, -300.0));
    }
}
