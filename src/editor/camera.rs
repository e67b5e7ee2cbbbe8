use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::ClaimedButtons;
use crate::constants::camera::{MAX_ZOOM, MIN_ZOOM, PIXELS_PER_LINE, ZOOM_STEP};

/// Marker and zoom state for the 2D scene view camera.
///
/// Placement projects the pointer through this camera. Add it to your own camera to use
/// that one instead of the camera the plugin spawns.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlacerCamera {
    /// Orthographic scale, world units per logical pixel
    pub zoom: f32,
}

impl Default for PlacerCamera {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

pub(crate) fn spawn_placer_camera(mut commands: Commands) {
    commands.spawn((Name::new("Placer Camera"), PlacerCamera::default(), Camera2d));
}

/// Pan with right mouse button drag, unless the placer claimed the button
pub(crate) fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    claimed: Res<ClaimedButtons>,
    mut query: Query<(&PlacerCamera, &mut Transform)>,
    mut contexts: EguiContexts,
) {
    if !mouse_button.pressed(MouseButton::Right) || claimed.contains(MouseButton::Right) {
        return;
    }

    // Don't drag the view from inside a panel
    if let Ok(ctx) = contexts.ctx_mut()
        && (ctx.wants_pointer_input() || ctx.is_pointer_over_area())
    {
        return;
    }

    let delta = mouse_motion.delta;
    if delta == Vec2::ZERO {
        return;
    }

    for (camera, mut transform) in &mut query {
        // Screen y grows downward
        transform.translation.x -= delta.x * camera.zoom;
        transform.translation.y += delta.y * camera.zoom;
    }
}

/// Zoom with the scroll wheel. Scroll the placer consumed never reaches this system.
pub(crate) fn camera_zoom(
    scroll: Res<AccumulatedMouseScroll>,
    mut query: Query<(&mut PlacerCamera, &mut Projection)>,
    mut contexts: EguiContexts,
) {
    if let Ok(ctx) = contexts.ctx_mut()
        && (ctx.wants_pointer_input() || ctx.is_pointer_over_area())
    {
        return;
    }

    let scroll_y = match scroll.unit {
        MouseScrollUnit::Line => scroll.delta.y,
        MouseScrollUnit::Pixel => scroll.delta.y / PIXELS_PER_LINE,
    };
    if scroll_y == 0.0 {
        return;
    }

    for (mut camera, mut projection) in &mut query {
        // Scroll up = zoom in (smaller scale)
        camera.zoom = (camera.zoom * (1.0 - scroll_y * ZOOM_STEP)).clamp(MIN_ZOOM, MAX_ZOOM);
        if let Projection::Orthographic(ortho) = &mut *projection {
            ortho.scale = camera.zoom;
        }
    }
}
