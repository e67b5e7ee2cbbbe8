use bevy::prelude::*;

/// Marker component for the active scene selection
#[derive(Component, Default)]
pub struct Selected;

/// Make `entity` the only selected entity.
pub fn select_only(world: &mut World, entity: Entity) {
    let previous: Vec<Entity> = {
        let mut query = world.query_filtered::<Entity, With<Selected>>();
        query.iter(world).collect()
    };
    for other in previous {
        if other != entity {
            if let Ok(mut entity_mut) = world.get_entity_mut(other) {
                entity_mut.remove::<Selected>();
            }
        }
    }
    if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
        entity_mut.insert(Selected);
    }
}
