//! # Bevy Prefab Placer
//!
//! Interactive placement of 2D prefabs for Bevy level editing: a live preview follows the
//! cursor and can be rotated, scaled and mirrored before it is stamped into the scene.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_prefab_placer::PlacerPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(PlacerPlugin::with_catalog("assets/placer/catalog.ron"))
//!         .run();
//! }
//! ```
//!
//! ## Catalogs
//!
//! A catalog is a RON file listing groups of template files, relative to the catalog:
//!
//! ```ron
//! (groups: [(name: "Rocks", templates: ["templates/rock.ron"])])
//! ```
//!
//! Each template is a hierarchy of nodes with optional sprites and sorting.
//!
//! ## Gestures
//!
//! - `P`: toggle place mode, `Escape`: leave it
//! - Left click: place a copy of the preview
//! - `Ctrl`+scroll: rotate, `Shift`+scroll: scale (`Alt` for finer steps)
//! - `Ctrl`+middle click: mirror, `R`: reset rotation, scale and mirror
//! - Hold right button + scroll or middle click: change the selected prefab
//! - `Ctrl+Z` / `Ctrl+Shift+Z`: undo / redo placements
//!
//! The placement core is independent of Bevy's schedule: [`ObjectPlacer`] and
//! [`InputRouter`] talk to their host through the traits in [`host`], and [`WorldHost`]
//! implements them over a [`bevy::prelude::World`].

pub mod catalog;
pub mod commands;
pub mod constants;
pub mod editor;
pub mod error;
pub mod host;
pub mod input;
pub mod placement;
pub mod selection;
pub mod ui;

#[cfg(test)]
mod test_support;

// Re-export the main plugin and configuration
pub use editor::{PlacerPlugin, PlacerPluginConfig, PlacerRequest, SceneClosing, SceneOpened};

// Re-export the placement core
pub use catalog::{EntryId, PrefabCatalog, PrefabTemplate, load_catalog};
pub use error::{PlacerError, PlacerResult};
pub use host::{PlacementHost, ScreenProjection, WorldHost};
pub use input::{InputRouter, KeyBindings, ViewEvent};
pub use placement::{ObjectPlacer, PlacementCommitter};
pub use selection::{Selected, SelectionMode};

// Re-export command/history types
pub use commands::{CommandHistory, RedoEvent, UndoEvent};
