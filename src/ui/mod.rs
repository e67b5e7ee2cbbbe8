mod panel;
mod settings;

pub use settings::*;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use panel::draw_placer_panel;

/// The "Object Placer" window and the preferences it persists
pub struct PlacerUiPlugin;

impl Plugin for PlacerUiPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<PlacerPreferences>() {
            app.insert_resource(PlacerPreferences::load());
        }
        app.add_systems(EguiPrimaryContextPass, draw_placer_panel);
    }
}
