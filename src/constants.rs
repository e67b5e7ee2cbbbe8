//! Centralized constants for the placer
//!
//! Gesture step sizes, camera limits and file locations shared by the input router,
//! the view camera and the UI.

use bevy::prelude::*;

/// Step sizes of the placement gestures
pub mod gestures {
    /// Rotation per scroll notch, in degrees
    pub const ROTATE_STEP_DEGREES: f32 = 10.0;
    /// Scale multiplier change per scroll notch
    pub const SCALE_STEP: f32 = 1.0;
    /// Factor applied to both steps while Alt is held
    pub const PRECISE_ROTATE_FACTOR: f32 = 0.2;
    pub const PRECISE_SCALE_FACTOR: f32 = 0.1;
    /// Smallest scale multiplier the preview accepts
    pub const SCALE_MIN: f32 = 0.1;
}

/// 2D view camera
pub mod camera {
    /// Zoom factor per scroll line
    pub const ZOOM_STEP: f32 = 0.1;
    pub const MIN_ZOOM: f32 = 0.05;
    pub const MAX_ZOOM: f32 = 20.0;
    /// Scroll pixels treated as one line
    pub const PIXELS_PER_LINE: f32 = 16.0;
}

/// UI colors
pub mod colors {
    use super::*;

    /// Swatch drawn for entries without a template or sprite
    pub const EMPTY_SWATCH: Color = Color::srgb(0.25, 0.25, 0.25);
    pub const PLACE_MODE_ON: Color = Color::srgb(0.4, 0.9, 0.4);
}

/// File locations
pub mod paths {
    /// Catalog loaded by the standalone binary, relative to the working directory
    pub const DEMO_CATALOG: &str = "assets/placer/catalog.ron";
    /// Directory name under the platform config dir
    pub const CONFIG_DIR: &str = "bevy_prefab_placer";
    pub const PREFERENCES_FILE: &str = "preferences.ron";
}

/// Preference key of the panel's light layout toggle
pub const LIGHT_LAYOUT_PREF_KEY: &str = "placer.light_layout";
