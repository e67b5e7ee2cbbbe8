use bevy::prelude::*;

use super::{PlacementCommitter, PlacementSettings, PlacementState, PlacementTransform};
use crate::catalog::{EntryId, PrefabCatalog, PrefabEntry};
use crate::host::PlacementHost;
use crate::selection::{SelectionCursor, SelectionMode};

/// The placement controller: catalog, selection, preview and commit settings.
///
/// Every mutating entry point re-validates what depends on it before returning, so the
/// selection always names a catalog entry (or nothing) and the preview always matches the
/// selection and place mode.
#[derive(Resource, Debug, Default)]
pub struct ObjectPlacer {
    catalog: PrefabCatalog,
    cursor: SelectionCursor,
    state: PlacementState,
    settings: PlacementSettings,
}

impl ObjectPlacer {
    pub fn new(catalog: PrefabCatalog, seed: Option<u64>) -> Self {
        Self {
            catalog,
            cursor: seed.map(SelectionCursor::with_seed).unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn catalog(&self) -> &PrefabCatalog {
        &self.catalog
    }

    pub fn cursor(&self) -> &SelectionCursor {
        &self.cursor
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn settings(&self) -> &PlacementSettings {
        &self.settings
    }

    pub fn place_mode(&self) -> bool {
        self.state.place_mode()
    }

    pub fn has_preview(&self) -> bool {
        self.state.has_preview()
    }

    pub fn preview_entity(&self) -> Option<Entity> {
        self.state.preview().map(|p| p.entity)
    }

    pub fn transform(&self) -> &PlacementTransform {
        self.state.transform()
    }

    pub fn selected(&self) -> Option<EntryId> {
        self.cursor.selected()
    }

    pub fn selected_entry(&self) -> Option<&PrefabEntry> {
        self.cursor.selected_entry(&self.catalog)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.cursor.index_in(&self.catalog)
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.cursor.mode()
    }

    // Place mode

    pub fn set_place_mode(&mut self, on: bool, host: &mut (impl PlacementHost + ?Sized)) {
        if self.state.place_mode() == on {
            return;
        }
        info!("Place mode {}", if on { "on" } else { "off" });
        let entry = self.cursor.selected_entry(&self.catalog);
        self.state.set_place_mode(on, entry, host);
    }

    pub fn toggle_place_mode(&mut self, host: &mut (impl PlacementHost + ?Sized)) {
        self.set_place_mode(!self.place_mode(), host);
    }

    // Selection

    /// Select by flattened index, wrapping out-of-range values.
    pub fn set_selected_index(&mut self, index: isize, host: &mut (impl PlacementHost + ?Sized)) {
        self.cursor.set_index(&self.catalog, index);
        self.sync_preview(host);
    }

    /// Move the selection by `delta` entries, ignoring the selection mode.
    pub fn step_selection(&mut self, delta: isize, host: &mut (impl PlacementHost + ?Sized)) {
        self.cursor.step(&self.catalog, delta);
        self.sync_preview(host);
    }

    pub fn select_entry(&mut self, id: Option<EntryId>, host: &mut (impl PlacementHost + ?Sized)) {
        self.cursor.select(&self.catalog, id);
        self.sync_preview(host);
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        if self.cursor.mode() != mode {
            info!("Selection mode: {}", mode.label());
            self.cursor.set_mode(mode);
        }
    }

    /// Apply the selection mode, as after a placement.
    pub fn advance_selection(&mut self, host: &mut (impl PlacementHost + ?Sized)) {
        self.cursor.advance(&self.catalog);
        self.sync_preview(host);
    }

    // Settings

    /// Parent placed objects under `parent`. The preview cannot be a parent; returns false
    /// and leaves the setting unchanged when it is.
    pub fn set_parent(&mut self, parent: Option<Entity>) -> bool {
        if parent.is_some() && parent == self.preview_entity() {
            warn!("The placement preview cannot be used as parent");
            return false;
        }
        self.settings.set_parent(parent);
        true
    }

    pub fn set_overwrite_layer(&mut self, overwrite: bool) {
        self.settings.set_overwrite_layer(overwrite);
    }

    pub fn set_sorting_layer(&mut self, layer: u32) {
        self.settings.set_sorting_layer(layer);
    }

    pub fn set_sorting_order(&mut self, order: i32) {
        self.settings.set_sorting_order(order);
    }

    // Catalog

    /// Mutate the catalog, then drop a stale selection and resync the preview.
    pub fn edit_catalog<R>(
        &mut self,
        host: &mut (impl PlacementHost + ?Sized),
        edit: impl FnOnce(&mut PrefabCatalog) -> R,
    ) -> R {
        let result = edit(&mut self.catalog);
        if self.cursor.revalidate(&self.catalog) {
            debug!("Selected entry left the catalog");
        }
        self.sync_preview(host);
        result
    }

    pub fn replace_catalog(
        &mut self,
        catalog: PrefabCatalog,
        host: &mut (impl PlacementHost + ?Sized),
    ) {
        self.edit_catalog(host, |current| *current = catalog);
    }

    // Preview

    /// Commit the preview as a permanent object, then advance the selection.
    ///
    /// # Panics
    ///
    /// Panics when there is no preview.
    pub fn place_object(&mut self, host: &mut (impl PlacementHost + ?Sized)) -> Entity {
        let placed = PlacementCommitter::commit(&self.state, &self.settings, host);
        self.advance_selection(host);
        placed
    }

    pub fn move_preview(&mut self, position: Vec2, host: &mut (impl PlacementHost + ?Sized)) {
        self.state.move_to(position, host);
    }

    pub fn rotate_preview(&mut self, degrees: f32, host: &mut (impl PlacementHost + ?Sized)) {
        self.state.rotate(degrees, host);
    }

    pub fn scale_preview(&mut self, delta: f32, host: &mut (impl PlacementHost + ?Sized)) {
        self.state.add_scale(delta, host);
    }

    pub fn mirror_preview(&mut self, host: &mut (impl PlacementHost + ?Sized)) {
        self.state.toggle_mirror(host);
    }

    pub fn reset_preview(&mut self, host: &mut (impl PlacementHost + ?Sized)) {
        self.state.reset(host);
    }

    // Lifecycle

    /// The scene is about to be torn down: drop the preview and the parent, which belongs
    /// to the old scene.
    pub fn on_scene_closing(&mut self, host: &mut (impl PlacementHost + ?Sized)) {
        self.state.destroy_preview(host);
        self.settings.set_parent(None);
    }

    pub fn on_scene_opened(&mut self, host: &mut (impl PlacementHost + ?Sized)) {
        let entry = self.cursor.selected_entry(&self.catalog);
        self.state.refresh_preview(entry, host);
    }

    /// Remove every trace of the placer from the scene.
    pub fn shutdown(&mut self, host: &mut (impl PlacementHost + ?Sized)) {
        self.state.destroy_preview(host);
    }

    fn sync_preview(&mut self, host: &mut (impl PlacementHost + ?Sized)) {
        let entry = self.cursor.selected_entry(&self.catalog);
        self.state.sync_preview(entry, host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{PreviewNode, WorldHost};
    use crate::test_support::{rocks, template};

    fn placer() -> (ObjectPlacer, Vec<EntryId>) {
        let (catalog, ids) = rocks();
        (ObjectPlacer::new(catalog, Some(7)), ids)
    }

    fn preview_roots(world: &mut World) -> usize {
        world
            .query_filtered::<Entity, (With<PreviewNode>, Without<ChildOf>)>()
            .iter(world)
            .count()
    }

    #[test]
    fn place_mode_controls_preview() {
        let (mut placer, _) = placer();
        let mut world = World::new();

        placer.set_selected_index(0, &mut WorldHost::new(&mut world));
        assert_eq!(preview_roots(&mut world), 0);

        placer.set_place_mode(true, &mut WorldHost::new(&mut world));
        assert_eq!(preview_roots(&mut world), 1);

        placer.toggle_place_mode(&mut WorldHost::new(&mut world));
        assert_eq!(preview_roots(&mut world), 0);
        assert!(!placer.has_preview());
    }

    #[test]
    fn go_to_next_after_placing() {
        let (mut placer, ids) = placer();
        let mut world = World::new();
        let mut host = WorldHost::new(&mut world);
        placer.set_selection_mode(SelectionMode::GoToNext);
        placer.set_place_mode(true, &mut host);

        placer.set_selected_index(1, &mut host);
        placer.place_object(&mut host);
        assert_eq!(placer.selected(), Some(ids[2]));

        placer.place_object(&mut host);
        assert_eq!(placer.selected(), Some(ids[0]));
        assert_eq!(placer.selected_index(), Some(0));
    }

    #[test]
    fn placing_keeps_transform_across_preview_swap() {
        let (mut placer, _) = placer();
        let mut world = World::new();
        let mut host = WorldHost::new(&mut world);
        placer.set_selection_mode(SelectionMode::GoToNext);
        placer.set_selected_index(0, &mut host);
        placer.set_place_mode(true, &mut host);
        placer.move_preview(Vec2::new(5.0, 6.0), &mut host);
        placer.rotate_preview(20.0, &mut host);
        let first_preview = placer.preview_entity().unwrap();

        placer.place_object(&mut host);
        let second_preview = placer.preview_entity().unwrap();
        assert_ne!(first_preview, second_preview);
        let transform = host.transform(second_preview);
        assert_eq!(transform.translation.truncate(), Vec2::new(5.0, 6.0));
        assert_eq!(placer.transform().rotation_degrees, 20.0);
    }

    #[test]
    fn preview_cannot_be_parent() {
        let (mut placer, _) = placer();
        let mut world = World::new();
        let mut host = WorldHost::new(&mut world);
        placer.set_selected_index(0, &mut host);
        placer.set_place_mode(true, &mut host);

        let preview = placer.preview_entity();
        assert!(!placer.set_parent(preview));
        assert_eq!(placer.settings().parent(), None);

        let other = host.world().spawn_empty().id();
        assert!(placer.set_parent(Some(other)));
        assert_eq!(placer.settings().parent(), Some(other));
    }

    #[test]
    fn removing_selected_entry_clears_selection_and_preview() {
        let (mut placer, ids) = placer();
        let mut world = World::new();
        let mut host = WorldHost::new(&mut world);
        placer.set_selected_index(2, &mut host);
        placer.set_place_mode(true, &mut host);
        let preview = placer.preview_entity().unwrap();

        placer.edit_catalog(&mut host, |catalog| catalog.remove_entry(ids[2]));
        assert_eq!(placer.selected(), None);
        assert!(!placer.has_preview());
        assert!(!host.exists(preview));
    }

    #[test]
    fn replacing_catalog_drops_old_selection() {
        let (mut placer, _) = placer();
        let mut world = World::new();
        let mut host = WorldHost::new(&mut world);
        placer.set_selected_index(0, &mut host);

        let mut catalog = PrefabCatalog::new();
        let group = catalog.add_group("Bushes");
        catalog.push_entry(group, Some(template("bush")));
        placer.replace_catalog(catalog, &mut host);
        assert_eq!(placer.selected(), None);
        placer.set_selected_index(0, &mut host);
        assert_eq!(placer.selected_entry().unwrap().display_name(), "bush");
    }

    #[test]
    fn scene_reopen_recreates_preview() {
        let (mut placer, _) = placer();
        let mut world = World::new();
        let mut host = WorldHost::new(&mut world);
        placer.set_selected_index(0, &mut host);
        placer.set_place_mode(true, &mut host);

        placer.on_scene_closing(&mut host);
        assert!(!placer.has_preview());
        placer.on_scene_opened(&mut host);
        assert!(placer.has_preview());

        placer.shutdown(&mut host);
        drop(host);
        assert_eq!(preview_roots(&mut world), 0);
    }
}
