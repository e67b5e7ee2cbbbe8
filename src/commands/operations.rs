use bevy::ecs::entity_disabling::Disabled;
use bevy::prelude::*;

use super::EditorCommand;

/// Several commands undone and redone as one step.
pub struct CommandGroup {
    pub label: String,
    pub commands: Vec<Box<dyn EditorCommand>>,
}

impl EditorCommand for CommandGroup {
    fn undo(&self, world: &mut World) {
        for command in self.commands.iter().rev() {
            command.undo(world);
        }
    }

    fn redo(&self, world: &mut World) {
        for command in &self.commands {
            command.redo(world);
        }
    }

    fn discard(&self, world: &mut World) {
        for command in &self.commands {
            command.discard(world);
        }
    }

    fn description(&self) -> &str {
        &self.label
    }
}

/// Creation of a placed object. Undo disables the hierarchy so redo restores it exactly;
/// discarding an undone creation despawns it.
pub struct CreateObjectCommand {
    pub root: Entity,
}

impl EditorCommand for CreateObjectCommand {
    fn undo(&self, world: &mut World) {
        set_hierarchy_disabled(world, self.root, true);
    }

    fn redo(&self, world: &mut World) {
        set_hierarchy_disabled(world, self.root, false);
    }

    fn discard(&self, world: &mut World) {
        if let Ok(entity) = world.get_entity_mut(self.root) {
            entity.despawn();
        }
    }

    fn description(&self) -> &str {
        "Create object"
    }
}

/// Reparenting with the child's local transform before and after.
pub struct SetParentCommand {
    pub child: Entity,
    pub previous_parent: Option<Entity>,
    pub parent: Entity,
    pub previous_transform: Transform,
    pub transform: Transform,
}

impl EditorCommand for SetParentCommand {
    fn undo(&self, world: &mut World) {
        let Ok(mut entity) = world.get_entity_mut(self.child) else {
            return;
        };
        match self.previous_parent {
            Some(parent) => {
                entity.insert(ChildOf(parent));
            }
            None => {
                entity.remove::<ChildOf>();
            }
        }
        entity.insert(self.previous_transform);
    }

    fn redo(&self, world: &mut World) {
        if let Ok(mut entity) = world.get_entity_mut(self.child) {
            entity.insert((ChildOf(self.parent), self.transform));
        }
    }

    fn description(&self) -> &str {
        "Set parent"
    }
}

/// Root followed by all of its descendants.
pub(crate) fn hierarchy_of(world: &World, root: Entity) -> Vec<Entity> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(entity) = stack.pop() {
        out.push(entity);
        if let Some(children) = world.get::<Children>(entity) {
            stack.extend(children.iter());
        }
    }
    out
}

fn set_hierarchy_disabled(world: &mut World, root: Entity, disabled: bool) {
    for entity in hierarchy_of(world, root) {
        let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
            continue;
        };
        if disabled {
            entity_mut.insert(Disabled);
        } else {
            entity_mut.remove::<Disabled>();
        }
    }
}
