use bevy::prelude::*;
use std::collections::VecDeque;

/// Maximum number of undo/redo entries to keep
const MAX_HISTORY: usize = 100;

/// Trait for reversible commands
pub trait EditorCommand: Send + Sync {
    fn undo(&self, world: &mut World);
    fn redo(&self, world: &mut World);
    /// Called once the command can no longer be redone (its redo branch was dropped).
    fn discard(&self, _world: &mut World) {}
    fn description(&self) -> &str;
}

/// Resource to manage undo/redo history
#[derive(Resource)]
pub struct CommandHistory {
    undo_stack: VecDeque<Box<dyn EditorCommand>>,
    redo_stack: VecDeque<Box<dyn EditorCommand>>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(MAX_HISTORY),
            redo_stack: VecDeque::with_capacity(MAX_HISTORY),
        }
    }
}

impl CommandHistory {
    /// Push an already-executed command. Returns the redo entries it invalidates so the
    /// caller can discard them with world access.
    #[must_use]
    pub fn push(&mut self, command: Box<dyn EditorCommand>) -> Vec<Box<dyn EditorCommand>> {
        let dropped = self.redo_stack.drain(..).collect();

        if self.undo_stack.len() >= MAX_HISTORY {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(command);
        dropped
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.description())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|c| c.description())
    }

    /// Push `command` and discard the redo branch it replaces.
    pub fn record(world: &mut World, command: Box<dyn EditorCommand>) {
        let dropped = world.resource_mut::<CommandHistory>().push(command);
        for command in dropped {
            command.discard(world);
        }
    }

    pub fn undo(world: &mut World) {
        let Some(command) = world.resource_mut::<CommandHistory>().undo_stack.pop_back() else {
            return;
        };
        command.undo(world);
        info!("Undo: {}", command.description());
        world.resource_mut::<CommandHistory>().redo_stack.push_back(command);
    }

    pub fn redo(world: &mut World) {
        let Some(command) = world.resource_mut::<CommandHistory>().redo_stack.pop_back() else {
            return;
        };
        command.redo(world);
        info!("Redo: {}", command.description());
        world.resource_mut::<CommandHistory>().undo_stack.push_back(command);
    }

    /// Forget everything, discarding commands whose effects are currently undone.
    pub fn clear(world: &mut World) {
        let mut history = world.resource_mut::<CommandHistory>();
        history.undo_stack.clear();
        let dropped: Vec<_> = history.redo_stack.drain(..).collect();
        for command in dropped {
            command.discard(world);
        }
    }
}

/// Event to trigger undo
#[derive(Message)]
pub struct UndoEvent;

/// Event to trigger redo
#[derive(Message)]
pub struct RedoEvent;

pub struct HistoryPlugin;

impl Plugin for HistoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CommandHistory>()
            .add_message::<UndoEvent>()
            .add_message::<RedoEvent>()
            .add_systems(Update, (handle_undo_redo_input, apply_undo_redo).chain());
    }
}

fn handle_undo_redo_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut undo_events: MessageWriter<UndoEvent>,
    mut redo_events: MessageWriter<RedoEvent>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);

    if ctrl && keyboard.just_pressed(KeyCode::KeyZ) {
        if keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight) {
            redo_events.write(RedoEvent);
        } else {
            undo_events.write(UndoEvent);
        }
    }

    // Alternative: Ctrl+Y for redo
    if ctrl && keyboard.just_pressed(KeyCode::KeyY) {
        redo_events.write(RedoEvent);
    }
}

fn apply_undo_redo(
    mut undo_events: MessageReader<UndoEvent>,
    mut redo_events: MessageReader<RedoEvent>,
    mut commands: Commands,
) {
    for _ in undo_events.read() {
        commands.queue(|world: &mut World| CommandHistory::undo(world));
    }
    for _ in redo_events.read() {
        commands.queue(|world: &mut World| CommandHistory::redo(world));
    }
}
