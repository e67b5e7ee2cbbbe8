use bevy::prelude::*;

use super::{PlacerRequest, with_placer};
use crate::commands::CommandHistory;
use crate::host::{PreviewNode, TemplateInstance};

/// Write before tearing down the scene the placer works in.
#[derive(Message, Debug, Clone, Copy)]
pub struct SceneClosing;

/// Write once a scene is ready for placement again.
#[derive(Message, Debug, Clone, Copy)]
pub struct SceneOpened;

/// Forward scene lifecycle messages to the placer
pub(crate) fn forward_scene_events(
    mut closing: MessageReader<SceneClosing>,
    mut opened: MessageReader<SceneOpened>,
    mut commands: Commands,
) {
    for _ in closing.read() {
        commands.queue(PlacerRequest::SceneClosing);
    }
    for _ in opened.read() {
        commands.queue(PlacerRequest::SceneOpened);
    }
}

/// Remove every placed object and start over with an empty scene and history.
pub struct ClearSceneCommand;

impl Command for ClearSceneCommand {
    fn apply(self, world: &mut World) {
        with_placer(world, |placer, host| placer.on_scene_closing(host));

        // Undone placements are disabled and only reachable through the history.
        if world.contains_resource::<CommandHistory>() {
            CommandHistory::clear(world);
        }

        let placed: Vec<Entity> = {
            let mut query =
                world.query_filtered::<Entity, (With<TemplateInstance>, Without<PreviewNode>)>();
            query.iter(world).collect()
        };
        let count = placed.len();
        for entity in placed {
            if let Ok(entity_mut) = world.get_entity_mut(entity) {
                entity_mut.despawn();
            }
        }
        info!("Cleared {count} placed objects");

        with_placer(world, |placer, host| placer.on_scene_opened(host));
    }
}
