use bevy::prelude::*;

use super::{PlacementSettings, PlacementState};
use crate::host::PlacementHost;

/// Undo group label of a placement.
pub const PLACED_OBJECT_UNDO: &str = "Placed object";

/// Turns the current preview into a permanent scene object.
pub struct PlacementCommitter;

impl PlacementCommitter {
    /// Spawn a fresh copy of the preview's template at the preview's transform.
    ///
    /// The preview itself is never promoted, so the new object carries none of its
    /// transient markers.
    ///
    /// # Panics
    ///
    /// Panics when there is no preview. The input router only commits while one exists.
    pub fn commit(
        state: &PlacementState,
        settings: &PlacementSettings,
        host: &mut (impl PlacementHost + ?Sized),
    ) -> Entity {
        let Some(preview) = state.preview() else {
            panic!("placement committed without a preview");
        };

        let instance = host.instantiate(&preview.template);
        let transform = host.transform(preview.entity);
        host.set_transform(instance, transform);

        if settings.overwrite_layer() {
            overwrite_sorting(
                host,
                instance,
                settings.sorting_layer(),
                settings.sorting_order(),
            );
        }

        host.register_created_object(instance);
        match settings.parent() {
            Some(parent) if host.exists(parent) => host.set_parent(instance, parent),
            Some(parent) => warn!("Placement parent {parent} no longer exists, placing at root"),
            None => {}
        }
        host.close_undo_group(PLACED_OBJECT_UNDO);
        host.mark_active_selection(instance);

        info!(
            "Placed {} at ({:.1}, {:.1})",
            preview.template.name, transform.translation.x, transform.translation.y
        );
        instance
    }
}

/// Set sorting on the first renderables found along each branch, stopping there.
fn overwrite_sorting(
    host: &mut (impl PlacementHost + ?Sized),
    node: Entity,
    layer: u32,
    order: i32,
) {
    if host.has_renderables(node) {
        host.set_sorting(node, layer, order);
        return;
    }
    for child in host.children(node) {
        overwrite_sorting(host, child, layer, order);
    }
}
