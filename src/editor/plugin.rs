use std::path::PathBuf;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use super::camera::{camera_pan, camera_zoom, spawn_placer_camera};
use super::requests::{CatalogSource, PlacerRequest};
use super::scene::{SceneClosing, SceneOpened, forward_scene_events};
use super::view::{ClaimedButtons, SceneViewEvents, collect_view_events, dispatch_view_events};
use crate::catalog::{PrefabCatalog, load_catalog};
use crate::commands::HistoryPlugin;
use crate::host::{SortingLayer, SortingLayers};
use crate::input::{InputRouter, KeyBindings};
use crate::placement::ObjectPlacer;
use crate::ui::PlacerUiPlugin;

/// Configuration for [`PlacerPlugin`]
#[derive(Debug, Clone)]
pub struct PlacerPluginConfig {
    /// Catalog file loaded at startup; `None` starts with an empty catalog
    pub catalog_path: Option<PathBuf>,
    pub key_bindings: KeyBindings,
    /// Layers offered for the sorting overwrite; `None` keeps the defaults
    pub sorting_layers: Option<Vec<SortingLayer>>,
    /// Seed for the random selection modes
    pub seed: Option<u64>,
    /// Spawn a 2D camera for the scene view
    pub spawn_camera: bool,
    /// Add the egui panel
    pub ui: bool,
}

impl Default for PlacerPluginConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            key_bindings: KeyBindings::default(),
            sorting_layers: None,
            seed: None,
            spawn_camera: true,
            ui: true,
        }
    }
}

/// System sets of the scene view pipeline, run in this order in `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlacerSystems {
    /// Turn Bevy input into view events
    Collect,
    /// Route view events to the placer
    Dispatch,
    /// View navigation, seeing only unconsumed input
    Navigate,
}

/// Main placer plugin that bundles placement, undo, the view camera and the UI
#[derive(Default)]
pub struct PlacerPlugin {
    pub config: PlacerPluginConfig,
}

impl PlacerPlugin {
    pub fn new(config: PlacerPluginConfig) -> Self {
        Self { config }
    }

    pub fn with_catalog(path: impl Into<PathBuf>) -> Self {
        Self::new(PlacerPluginConfig {
            catalog_path: Some(path.into()),
            ..default()
        })
    }
}

impl Plugin for PlacerPlugin {
    fn build(&self, app: &mut App) {
        let config = &self.config;
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin::default());
        }

        app.add_plugins(HistoryPlugin)
            .insert_resource(ObjectPlacer::new(PrefabCatalog::new(), config.seed))
            .insert_resource(InputRouter::new(config.key_bindings))
            .insert_resource(CatalogSource {
                path: config.catalog_path.clone(),
            })
            .insert_resource(
                config
                    .sorting_layers
                    .clone()
                    .map(SortingLayers)
                    .unwrap_or_default(),
            )
            .init_resource::<SceneViewEvents>()
            .init_resource::<ClaimedButtons>()
            .add_message::<SceneClosing>()
            .add_message::<SceneOpened>()
            .configure_sets(
                Update,
                (
                    PlacerSystems::Collect,
                    PlacerSystems::Dispatch,
                    PlacerSystems::Navigate,
                )
                    .chain(),
            )
            .add_systems(Startup, (load_startup_catalog, start_router))
            .add_systems(
                Update,
                (
                    collect_view_events.in_set(PlacerSystems::Collect),
                    dispatch_view_events.in_set(PlacerSystems::Dispatch),
                    forward_scene_events.in_set(PlacerSystems::Dispatch),
                    (camera_pan, camera_zoom).in_set(PlacerSystems::Navigate),
                ),
            )
            .add_systems(Last, shutdown_on_exit);

        if config.spawn_camera {
            app.add_systems(Startup, spawn_placer_camera);
        }
        if config.ui {
            app.add_plugins(PlacerUiPlugin);
        }
    }
}

fn load_startup_catalog(source: Res<CatalogSource>, mut commands: Commands) {
    let Some(path) = &source.path else {
        return;
    };
    match load_catalog(path) {
        Ok(catalog) => commands.queue(PlacerRequest::ReplaceCatalog(catalog)),
        Err(e) => error!("{e}"),
    }
}

fn start_router(mut router: ResMut<InputRouter>, mut events: ResMut<SceneViewEvents>) {
    router.start(&mut *events);
}

/// Stop listening and drop the preview when the app is exiting
fn shutdown_on_exit(mut exit: MessageReader<AppExit>, mut commands: Commands) {
    if exit.read().last().is_none() {
        return;
    }
    commands.queue(|world: &mut World| {
        world.resource_scope(|world, mut router: Mut<InputRouter>| {
            router.stop(&mut *world.resource_mut::<SceneViewEvents>());
        });
    });
    commands.queue(PlacerRequest::Shutdown);
}
