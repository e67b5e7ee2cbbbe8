use bevy::prelude::*;

use crate::catalog::PrefabTemplate;

/// Scene services the placement core needs from its host.
///
/// Instances are addressed by [`Entity`]; the host decides what an instance is made of.
/// Every operation is assumed to succeed: host failures are fatal, not recoverable here.
pub trait PlacementHost {
    /// Spawn a fresh copy of `template` and return its root.
    fn instantiate(&mut self, template: &PrefabTemplate) -> Entity;

    /// Whether `node` still exists in the scene.
    fn exists(&self, node: Entity) -> bool;

    /// Remove an instance and all of its descendants.
    fn destroy(&mut self, instance: Entity);

    /// Flag every node of `instance` as transient: hidden from scene tools and never saved.
    fn mark_transient(&mut self, instance: Entity);

    fn transform(&self, node: Entity) -> Transform;

    fn set_transform(&mut self, node: Entity, transform: Transform);

    fn children(&self, node: Entity) -> Vec<Entity>;

    /// Whether `node` itself carries renderable or sorting-group components.
    fn has_renderables(&self, node: Entity) -> bool;

    /// Overwrite sorting layer and order on the renderables attached to `node`.
    fn set_sorting(&mut self, node: Entity, layer: u32, order: i32);

    /// Record the creation of `instance` in the current undo group.
    fn register_created_object(&mut self, instance: Entity);

    /// Reparent `instance` under `parent` keeping its world placement, recorded for undo.
    fn set_parent(&mut self, instance: Entity, parent: Entity);

    /// Close the current undo group under `label`.
    fn close_undo_group(&mut self, label: &str);

    /// Make `instance` the host's active selection.
    fn mark_active_selection(&mut self, instance: Entity);
}

/// Projection from view pixels to world space.
pub trait ScreenProjection {
    /// Height of the view in logical pixels.
    fn pixel_height(&self) -> f32;

    /// World position under `screen`, given in pixels with the origin at the bottom-left.
    fn screen_to_world(&self, screen: Vec2) -> Vec2;
}

/// Handle returned by a [`ViewEventSource`] subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// Source of scene view events that a single router subscribes to.
pub trait ViewEventSource {
    fn subscribe(&mut self) -> ListenerId;

    /// Returns false when `id` was not subscribed.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;
}

/// Persistent boolean preferences keyed by name.
pub trait PreferenceStore {
    fn get_bool(&self, key: &str, default: bool) -> bool;

    fn set_bool(&mut self, key: &str, value: bool);
}
