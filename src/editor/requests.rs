use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy::prelude::*;

use crate::catalog::{EntryId, PrefabCatalog, load_catalog, load_template};
use crate::host::WorldHost;
use crate::placement::ObjectPlacer;
use crate::selection::SelectionMode;

/// Catalog file the placer loads at startup and on reload.
#[derive(Resource, Debug, Clone, Default)]
pub struct CatalogSource {
    pub path: Option<PathBuf>,
}

/// A change to the [`ObjectPlacer`], applied with exclusive world access.
///
/// Systems queue these with `commands.queue(...)`; they are the only way non-exclusive
/// systems mutate the placer.
#[derive(Debug)]
pub enum PlacerRequest {
    SetPlaceMode(bool),
    TogglePlaceMode,
    SetSelectedIndex(isize),
    StepSelection(isize),
    SelectEntry(Option<EntryId>),
    SetSelectionMode(SelectionMode),
    SetParent(Option<Entity>),
    SetOverwriteLayer(bool),
    SetSortingLayer(u32),
    SetSortingOrder(i32),
    ReplaceCatalog(PrefabCatalog),
    /// Reload the catalog from its [`CatalogSource`]
    ReloadCatalog,
    AddGroup(String),
    RemoveGroup(usize),
    /// Append an empty entry to a group
    AddEntry(usize),
    RemoveEntry(EntryId),
    MoveEntry {
        group: usize,
        from: usize,
        to: usize,
    },
    /// Load a template file into an entry. Relative paths resolve against the catalog file.
    AssignTemplate {
        entry: EntryId,
        path: PathBuf,
    },
    SceneClosing,
    SceneOpened,
    Shutdown,
}

impl Command for PlacerRequest {
    fn apply(self, world: &mut World) {
        match self {
            PlacerRequest::ReloadCatalog => {
                reload_catalog(world);
                return;
            }
            PlacerRequest::AssignTemplate { entry, path } => {
                assign_template(world, entry, &path);
                return;
            }
            _ => {}
        }

        let applied = with_placer(world, |placer, host| match self {
            PlacerRequest::SetPlaceMode(on) => placer.set_place_mode(on, host),
            PlacerRequest::TogglePlaceMode => placer.toggle_place_mode(host),
            PlacerRequest::SetSelectedIndex(index) => placer.set_selected_index(index, host),
            PlacerRequest::StepSelection(delta) => placer.step_selection(delta, host),
            PlacerRequest::SelectEntry(id) => placer.select_entry(id, host),
            PlacerRequest::SetSelectionMode(mode) => placer.set_selection_mode(mode),
            PlacerRequest::SetParent(parent) => {
                placer.set_parent(parent);
            }
            PlacerRequest::SetOverwriteLayer(on) => placer.set_overwrite_layer(on),
            PlacerRequest::SetSortingLayer(layer) => placer.set_sorting_layer(layer),
            PlacerRequest::SetSortingOrder(order) => placer.set_sorting_order(order),
            PlacerRequest::ReplaceCatalog(catalog) => placer.replace_catalog(catalog, host),
            PlacerRequest::SceneClosing => placer.on_scene_closing(host),
            PlacerRequest::SceneOpened => placer.on_scene_opened(host),
            PlacerRequest::Shutdown => placer.shutdown(host),
            PlacerRequest::AddGroup(name) => {
                placer.edit_catalog(host, |catalog| catalog.add_group(name));
            }
            PlacerRequest::RemoveGroup(index) => {
                if let Some(group) = placer.edit_catalog(host, |catalog| catalog.remove_group(index)) {
                    info!("Removed group '{}' ({} prefabs)", group.name, group.len());
                }
            }
            PlacerRequest::AddEntry(group) => {
                placer.edit_catalog(host, |catalog| catalog.push_entry(group, None));
            }
            PlacerRequest::RemoveEntry(id) => {
                placer.edit_catalog(host, |catalog| catalog.remove_entry(id));
            }
            PlacerRequest::MoveEntry { group, from, to } => {
                placer.edit_catalog(host, |catalog| catalog.move_entry(group, from, to));
            }
            PlacerRequest::ReloadCatalog | PlacerRequest::AssignTemplate { .. } => {}
        });
        if applied.is_none() {
            warn!("Placer request ignored: no ObjectPlacer resource");
        }
    }
}

/// Run `f` with the placer taken out of the world and a host over the rest of it.
pub fn with_placer<R>(
    world: &mut World,
    f: impl FnOnce(&mut ObjectPlacer, &mut WorldHost<'_>) -> R,
) -> Option<R> {
    if !world.contains_resource::<ObjectPlacer>() {
        return None;
    }
    Some(world.resource_scope(|world, mut placer: Mut<ObjectPlacer>| {
        let mut host = WorldHost::new(world);
        f(&mut placer, &mut host)
    }))
}

fn reload_catalog(world: &mut World) {
    let Some(path) = world
        .get_resource::<CatalogSource>()
        .and_then(|source| source.path.clone())
    else {
        warn!("No catalog file configured");
        return;
    };
    match load_catalog(&path) {
        Ok(catalog) => {
            with_placer(world, |placer, host| placer.replace_catalog(catalog, host));
        }
        Err(e) => error!("{e}"),
    }
}

fn assign_template(world: &mut World, entry: EntryId, path: &Path) {
    let path = match world
        .get_resource::<CatalogSource>()
        .and_then(|source| source.path.as_deref())
        .and_then(Path::parent)
    {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    };
    let template = match load_template(&path) {
        Ok(template) => Arc::new(template),
        Err(e) => {
            error!("{e}");
            return;
        }
    };
    let assigned = with_placer(world, |placer, host| {
        placer.edit_catalog(host, |catalog| catalog.set_template(entry, Some(template)))
    });
    if assigned != Some(true) {
        warn!("Cannot assign {:?}: entry {entry} is not in the catalog", path);
    }
}
