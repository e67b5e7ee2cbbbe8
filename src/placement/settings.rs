use bevy::prelude::*;

/// Options read by the committer. Changed only through the setters on
/// [`ObjectPlacer`](super::ObjectPlacer), which validate them first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementSettings {
    overwrite_layer: bool,
    sorting_layer: u32,
    sorting_order: i32,
    parent: Option<Entity>,
}

impl PlacementSettings {
    pub fn overwrite_layer(&self) -> bool {
        self.overwrite_layer
    }

    pub fn sorting_layer(&self) -> u32 {
        self.sorting_layer
    }

    pub fn sorting_order(&self) -> i32 {
        self.sorting_order
    }

    /// Object placed instances are parented under, if any.
    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    pub(crate) fn set_overwrite_layer(&mut self, overwrite: bool) {
        self.overwrite_layer = overwrite;
    }

    pub(crate) fn set_sorting_layer(&mut self, layer: u32) {
        self.sorting_layer = layer;
    }

    pub(crate) fn set_sorting_order(&mut self, order: i32) {
        self.sorting_order = order;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Entity>) {
        self.parent = parent;
    }
}
