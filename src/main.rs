//! Standalone placer over the bundled demo catalog.

use bevy::prelude::*;
use bevy_prefab_placer::PlacerPlugin;
use bevy_prefab_placer::constants::paths::DEMO_CATALOG;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bevy Prefab Placer".to_string(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.16, 0.18, 0.2)))
        .add_plugins(PlacerPlugin::with_catalog(DEMO_CATALOG))
        .run();
}
