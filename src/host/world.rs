use bevy::prelude::*;

use super::{PlacementHost, PreviewNode, SortingGroup, SpriteSorting, TemplateInstance};
use crate::catalog::{PrefabTemplate, SpriteNode, TemplateNode};
use crate::commands::{
    CommandGroup, CommandHistory, CreateObjectCommand, EditorCommand, SetParentCommand, hierarchy_of,
};
use crate::selection::select_only;

/// [`PlacementHost`] backed by a Bevy [`World`].
///
/// Undo records are buffered until [`PlacementHost::close_undo_group`] pushes them as a
/// single [`CommandGroup`] into the [`CommandHistory`] resource (when present).
pub struct WorldHost<'w> {
    world: &'w mut World,
    pending_undo: Vec<Box<dyn EditorCommand>>,
}

impl<'w> WorldHost<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self {
            world,
            pending_undo: Vec::new(),
        }
    }

    pub fn world(&mut self) -> &mut World {
        self.world
    }
}

impl Drop for WorldHost<'_> {
    fn drop(&mut self) {
        if !self.pending_undo.is_empty() {
            warn!("{} undo records dropped without an undo group", self.pending_undo.len());
        }
    }
}

impl PlacementHost for WorldHost<'_> {
    fn instantiate(&mut self, template: &PrefabTemplate) -> Entity {
        let assets = self.world.get_resource::<AssetServer>().cloned();
        let root = spawn_node(self.world, &template.root, None, assets.as_ref());
        self.world.entity_mut(root).insert(TemplateInstance {
            template: template.name.clone(),
        });
        root
    }

    fn exists(&self, node: Entity) -> bool {
        self.world.get_entity(node).is_ok()
    }

    fn destroy(&mut self, instance: Entity) {
        if let Ok(entity) = self.world.get_entity_mut(instance) {
            entity.despawn();
        }
    }

    fn mark_transient(&mut self, instance: Entity) {
        for entity in hierarchy_of(self.world, instance) {
            if let Ok(mut entity_mut) = self.world.get_entity_mut(entity) {
                entity_mut.insert(PreviewNode);
            }
        }
    }

    fn transform(&self, node: Entity) -> Transform {
        self.world.get::<Transform>(node).copied().unwrap_or_default()
    }

    fn set_transform(&mut self, node: Entity, transform: Transform) {
        if let Some(mut current) = self.world.get_mut::<Transform>(node) {
            *current = transform;
        }
    }

    fn children(&self, node: Entity) -> Vec<Entity> {
        self.world
            .get::<Children>(node)
            .map(|children| children.to_vec())
            .unwrap_or_default()
    }

    fn has_renderables(&self, node: Entity) -> bool {
        self.world.get::<Sprite>(node).is_some() || self.world.get::<SortingGroup>(node).is_some()
    }

    fn set_sorting(&mut self, node: Entity, layer: u32, order: i32) {
        let Ok(mut entity) = self.world.get_entity_mut(node) else {
            return;
        };
        if let Some(mut group) = entity.get_mut::<SortingGroup>() {
            group.layer = layer;
            group.order = order;
        }
        if entity.contains::<Sprite>() {
            entity.insert(SpriteSorting { layer, order });
        }
    }

    fn register_created_object(&mut self, instance: Entity) {
        self.pending_undo
            .push(Box::new(CreateObjectCommand { root: instance }));
    }

    fn set_parent(&mut self, instance: Entity, parent: Entity) {
        let previous_transform = self.transform(instance);
        let previous_parent = self.world.get::<ChildOf>(instance).map(|c| c.parent());
        let parent_global = self
            .world
            .get::<GlobalTransform>(parent)
            .copied()
            .unwrap_or_default();
        // The instance is a fresh root, so its local transform is its world transform.
        let transform = GlobalTransform::from(previous_transform).reparented_to(&parent_global);

        let command = SetParentCommand {
            child: instance,
            previous_parent,
            parent,
            previous_transform,
            transform,
        };
        command.redo(self.world);
        self.pending_undo.push(Box::new(command));
    }

    fn close_undo_group(&mut self, label: &str) {
        if self.pending_undo.is_empty() {
            return;
        }
        let commands = std::mem::take(&mut self.pending_undo);
        if !self.world.contains_resource::<CommandHistory>() {
            return;
        }
        CommandHistory::record(
            self.world,
            Box::new(CommandGroup {
                label: label.to_string(),
                commands,
            }),
        );
    }

    fn mark_active_selection(&mut self, instance: Entity) {
        select_only(self.world, instance);
    }
}

fn spawn_node(
    world: &mut World,
    node: &TemplateNode,
    parent: Option<Entity>,
    assets: Option<&AssetServer>,
) -> Entity {
    let mut entity = world.spawn((
        Name::new(node.name.clone()),
        node.local_transform(),
        Visibility::default(),
    ));
    if let Some(sprite) = &node.sprite {
        entity.insert((
            build_sprite(sprite, assets),
            SpriteSorting {
                layer: sprite.sorting.layer,
                order: sprite.sorting.order,
            },
        ));
    }
    if let Some(group) = node.sorting_group {
        entity.insert(SortingGroup {
            layer: group.layer,
            order: group.order,
        });
    }
    if let Some(parent) = parent {
        entity.insert(ChildOf(parent));
    }
    let id = entity.id();

    for child in &node.children {
        spawn_node(world, child, Some(id), assets);
    }
    id
}

fn build_sprite(node: &SpriteNode, assets: Option<&AssetServer>) -> Sprite {
    let mut sprite = match (&node.image, assets) {
        (Some(path), Some(server)) => Sprite::from_image(server.load(path.clone())),
        _ => Sprite::default(),
    };
    let [r, g, b, a] = node.color;
    sprite.color = Color::srgba(r, g, b, a);
    sprite.custom_size = node.size.map(Vec2::from_array);
    sprite
}
