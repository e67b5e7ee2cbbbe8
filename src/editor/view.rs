use bevy::input::mouse::{AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use super::PlacerCamera;
use crate::constants::camera::PIXELS_PER_LINE;
use crate::host::{CameraProjection, ListenerId, ViewEventSource, WorldHost};
use crate::input::{InputRouter, Modifiers, ViewEvent};
use crate::placement::ObjectPlacer;

/// Scene view events collected this frame, plus the listeners subscribed to them.
#[derive(Resource, Debug, Default)]
pub struct SceneViewEvents {
    next_listener: u32,
    listeners: Vec<ListenerId>,
    pending: Vec<ViewEvent>,
    last_cursor: Option<Vec2>,
    /// Buttons whose press was reported to the view and whose release is still due
    pressed: Vec<MouseButton>,
}

impl SceneViewEvents {
    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn push(&mut self, event: ViewEvent) {
        if self.has_listeners() {
            self.pending.push(event);
        }
    }

    pub fn drain(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Translate one frame of input into pending events.
    ///
    /// A release is only reported when its press was, so clicks that start over the UI never
    /// reach the view. The secondary button is the exception: its release always goes through
    /// so a held state cannot get stuck.
    pub fn collect(&mut self, input: &FrameInput<'_>) {
        if !self.has_listeners() {
            return;
        }
        let modifiers = Modifiers::from_keyboard(input.keyboard);

        if !input.pointer_blocked {
            if let Some(position) = input.cursor
                && self.last_cursor != Some(position)
            {
                self.last_cursor = Some(position);
                self.push(ViewEvent::PointerMove {
                    position,
                    modifiers,
                });
            }

            for button in input.mouse.get_just_pressed() {
                if !self.pressed.contains(button) {
                    self.pressed.push(*button);
                }
                self.push(ViewEvent::PointerDown {
                    button: *button,
                    modifiers,
                });
            }

            let delta = scroll_lines(input.scroll);
            if delta != Vec2::ZERO {
                self.push(ViewEvent::Scroll { delta, modifiers });
            }
        }

        for button in input.mouse.get_just_released() {
            let seen = self.pressed.contains(button);
            self.pressed.retain(|b| b != button);
            if seen || *button == MouseButton::Right {
                self.push(ViewEvent::PointerUp {
                    button: *button,
                    modifiers,
                });
            }
        }

        // Control chords belong to editor shortcuts such as undo.
        if !input.keyboard_blocked && !modifiers.control {
            for key in input.keyboard.get_just_pressed() {
                self.push(ViewEvent::KeyDown {
                    key: *key,
                    modifiers,
                });
            }
        }
    }
}

impl ViewEventSource for SceneViewEvents {
    fn subscribe(&mut self) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push(id);
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| *listener != id);
        if self.listeners.is_empty() {
            self.pressed.clear();
        }
        self.listeners.len() != before
    }
}

/// One frame of Bevy input, with what egui has claimed.
pub struct FrameInput<'a> {
    pub mouse: &'a ButtonInput<MouseButton>,
    pub keyboard: &'a ButtonInput<KeyCode>,
    pub scroll: &'a AccumulatedMouseScroll,
    pub cursor: Option<Vec2>,
    pub pointer_blocked: bool,
    pub keyboard_blocked: bool,
}

/// Scroll in lines, y positive downward. Bevy reports scrolling up as positive y.
fn scroll_lines(scroll: &AccumulatedMouseScroll) -> Vec2 {
    let lines = match scroll.unit {
        MouseScrollUnit::Line => scroll.delta,
        MouseScrollUnit::Pixel => scroll.delta / PIXELS_PER_LINE,
    };
    Vec2::new(lines.x, -lines.y)
}

/// Mouse buttons whose press was claimed by the router, held until release.
/// View navigation ignores these buttons.
#[derive(Resource, Debug, Default)]
pub struct ClaimedButtons(Vec<MouseButton>);

impl ClaimedButtons {
    pub fn contains(&self, button: MouseButton) -> bool {
        self.0.contains(&button)
    }
}

/// Translate this frame's Bevy input into [`ViewEvent`]s.
pub fn collect_view_events(
    mut events: ResMut<SceneViewEvents>,
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    scroll: Res<AccumulatedMouseScroll>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut contexts: EguiContexts,
) {
    if !events.has_listeners() {
        return;
    }
    let (pointer_blocked, keyboard_blocked) = match contexts.ctx_mut() {
        Ok(ctx) => (
            ctx.wants_pointer_input() || ctx.is_pointer_over_area(),
            ctx.wants_keyboard_input(),
        ),
        Err(_) => (false, false),
    };
    events.collect(&FrameInput {
        mouse: &mouse,
        keyboard: &keyboard,
        scroll: &scroll,
        cursor: windows.single().ok().and_then(Window::cursor_position),
        pointer_blocked,
        keyboard_blocked,
    });
}

/// Route pending view events through the [`InputRouter`] and strip consumed ones from
/// Bevy's input so later view systems never see them.
pub fn dispatch_view_events(world: &mut World) {
    let events = world.resource_mut::<SceneViewEvents>().drain();
    if events.is_empty() {
        return;
    }
    let projection = active_projection(world);

    world.resource_scope(|world, mut placer: Mut<ObjectPlacer>| {
        world.resource_scope(|world, mut router: Mut<InputRouter>| {
            for event in &events {
                let response = {
                    let mut host = WorldHost::new(world);
                    router.handle(event, &mut placer, &mut host, projection.as_ref())
                };
                debug!("{event:?} -> {response:?}");
                release_claims(world, event);
                if response.is_consumed() {
                    consume(world, event);
                }
            }
        });
    });
}

/// Projection of the placer camera, if one is rendering.
pub fn active_projection(world: &mut World) -> Option<CameraProjection> {
    let mut cameras = world.query_filtered::<(&Camera, &GlobalTransform), With<PlacerCamera>>();
    cameras
        .iter(world)
        .find(|(camera, _)| camera.is_active)
        .and_then(|(camera, transform)| CameraProjection::new(camera, transform))
}

fn release_claims(world: &mut World, event: &ViewEvent) {
    if let ViewEvent::PointerUp { button, .. } = event {
        world.resource_mut::<ClaimedButtons>().0.retain(|b| b != button);
    }
}

fn consume(world: &mut World, event: &ViewEvent) {
    match *event {
        ViewEvent::PointerDown { button, .. } => {
            world
                .resource_mut::<ButtonInput<MouseButton>>()
                .clear_just_pressed(button);
            let mut claimed = world.resource_mut::<ClaimedButtons>();
            if !claimed.contains(button) {
                claimed.0.push(button);
            }
        }
        ViewEvent::PointerUp { button, .. } => {
            world
                .resource_mut::<ButtonInput<MouseButton>>()
                .clear_just_released(button);
        }
        ViewEvent::Scroll { .. } => {
            world.resource_mut::<AccumulatedMouseScroll>().delta = Vec2::ZERO;
        }
        ViewEvent::KeyDown { key, .. } => {
            world
                .resource_mut::<ButtonInput<KeyCode>>()
                .clear_just_pressed(key);
        }
        ViewEvent::PointerMove { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyBindings;
    use crate::test_support::rocks;

    fn world() -> World {
        let mut world = World::new();
        let (catalog, _) = rocks();
        world.insert_resource(ObjectPlacer::new(catalog, Some(1)));
        world.insert_resource(InputRouter::new(KeyBindings::default()));
        world.init_resource::<SceneViewEvents>();
        world.init_resource::<ClaimedButtons>();
        world.init_resource::<ButtonInput<MouseButton>>();
        world.init_resource::<ButtonInput<KeyCode>>();
        world.init_resource::<AccumulatedMouseScroll>();
        world.resource_scope(|world, mut router: Mut<InputRouter>| {
            router.start(&mut *world.resource_mut::<SceneViewEvents>());
        });
        world
    }

    #[test]
    fn events_without_listeners_are_dropped() {
        let mut events = SceneViewEvents::default();
        events.push(ViewEvent::KeyDown {
            key: KeyCode::KeyP,
            modifiers: Modifiers::NONE,
        });
        assert!(events.drain().is_empty());

        let id = events.subscribe();
        events.push(ViewEvent::KeyDown {
            key: KeyCode::KeyP,
            modifiers: Modifiers::NONE,
        });
        assert_eq!(events.drain().len(), 1);
        assert!(events.unsubscribe(id));
        assert!(!events.unsubscribe(id));
    }

    struct Frame {
        mouse: ButtonInput<MouseButton>,
        keyboard: ButtonInput<KeyCode>,
        scroll: AccumulatedMouseScroll,
        cursor: Option<Vec2>,
        pointer_blocked: bool,
        keyboard_blocked: bool,
    }

    impl Frame {
        fn new() -> Self {
            Self {
                mouse: ButtonInput::default(),
                keyboard: ButtonInput::default(),
                scroll: AccumulatedMouseScroll::default(),
                cursor: None,
                pointer_blocked: false,
                keyboard_blocked: false,
            }
        }

        fn collect(&self, events: &mut SceneViewEvents) -> Vec<ViewEvent> {
            events.collect(&FrameInput {
                mouse: &self.mouse,
                keyboard: &self.keyboard,
                scroll: &self.scroll,
                cursor: self.cursor,
                pointer_blocked: self.pointer_blocked,
                keyboard_blocked: self.keyboard_blocked,
            });
            events.drain()
        }

        /// Start a new frame: held buttons stay held, edges are cleared.
        fn next(&mut self) {
            self.mouse.clear();
            self.keyboard.clear();
            self.scroll.delta = Vec2::ZERO;
        }
    }

    fn listening() -> SceneViewEvents {
        let mut events = SceneViewEvents::default();
        events.subscribe();
        events
    }

    fn has_up(events: &[ViewEvent], button: MouseButton) -> bool {
        events
            .iter()
            .any(|e| matches!(e, ViewEvent::PointerUp { button: b, .. } if *b == button))
    }

    #[test]
    fn click_over_ui_never_reaches_the_view() {
        let mut events = listening();
        let mut frame = Frame::new();
        frame.pointer_blocked = true;

        frame.mouse.press(MouseButton::Left);
        assert!(frame.collect(&mut events).is_empty());

        frame.next();
        frame.mouse.release(MouseButton::Left);
        assert!(!has_up(&frame.collect(&mut events), MouseButton::Left));
    }

    #[test]
    fn click_in_view_is_reported_even_if_released_over_ui() {
        let mut events = listening();
        let mut frame = Frame::new();

        frame.mouse.press(MouseButton::Left);
        let pressed = frame.collect(&mut events);
        assert!(matches!(
            pressed.as_slice(),
            [ViewEvent::PointerDown {
                button: MouseButton::Left,
                ..
            }]
        ));

        frame.next();
        frame.pointer_blocked = true;
        frame.mouse.release(MouseButton::Left);
        assert!(has_up(&frame.collect(&mut events), MouseButton::Left));

        // The press was matched; a second stray release is not.
        frame.next();
        frame.mouse.press(MouseButton::Left);
        frame.collect(&mut events);
        frame.next();
        frame.mouse.release(MouseButton::Left);
        assert!(!has_up(&frame.collect(&mut events), MouseButton::Left));
    }

    #[test]
    fn secondary_release_always_goes_through() {
        let mut events = listening();
        let mut frame = Frame::new();
        frame.pointer_blocked = true;
        frame.mouse.press(MouseButton::Right);
        frame.collect(&mut events);

        frame.next();
        frame.mouse.release(MouseButton::Right);
        assert!(has_up(&frame.collect(&mut events), MouseButton::Right));
    }

    #[test]
    fn wheel_up_is_negative_lines() {
        let mut events = listening();
        let mut frame = Frame::new();
        frame.scroll = AccumulatedMouseScroll {
            unit: MouseScrollUnit::Line,
            delta: Vec2::new(0.0, 2.0),
        };
        assert_eq!(
            frame.collect(&mut events),
            vec![ViewEvent::Scroll {
                delta: Vec2::new(0.0, -2.0),
                modifiers: Modifiers::NONE,
            }]
        );

        frame.scroll = AccumulatedMouseScroll {
            unit: MouseScrollUnit::Pixel,
            delta: Vec2::new(0.0, -2.0 * PIXELS_PER_LINE),
        };
        assert_eq!(
            frame.collect(&mut events),
            vec![ViewEvent::Scroll {
                delta: Vec2::new(0.0, 2.0),
                modifiers: Modifiers::NONE,
            }]
        );

        frame.pointer_blocked = true;
        assert!(frame.collect(&mut events).is_empty());
    }

    #[test]
    fn keys_skip_control_chords_and_focused_ui() {
        let mut events = listening();
        let mut frame = Frame::new();
        frame.keyboard.press(KeyCode::KeyR);
        assert_eq!(
            frame.collect(&mut events),
            vec![ViewEvent::KeyDown {
                key: KeyCode::KeyR,
                modifiers: Modifiers::NONE,
            }]
        );

        frame.next();
        frame.keyboard_blocked = true;
        frame.keyboard.press(KeyCode::KeyP);
        assert!(frame.collect(&mut events).is_empty());

        frame.next();
        frame.keyboard_blocked = false;
        frame.keyboard.press(KeyCode::ControlLeft);
        frame.keyboard.press(KeyCode::KeyZ);
        assert!(frame.collect(&mut events).is_empty());
    }

    #[test]
    fn cursor_moves_are_reported_once() {
        let mut events = listening();
        let mut frame = Frame::new();
        frame.cursor = Some(Vec2::new(10.0, 20.0));
        assert_eq!(frame.collect(&mut events).len(), 1);
        assert!(frame.collect(&mut events).is_empty());
    }

    #[test]
    fn consumed_input_is_cleared() {
        let mut world = world();
        world.resource_scope(|world, mut placer: Mut<ObjectPlacer>| {
            placer.set_selected_index(0, &mut WorldHost::new(world));
        });
        world.resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Right);
        world.resource_mut::<AccumulatedMouseScroll>().delta = Vec2::new(0.0, 1.0);
        world.resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::KeyP);

        {
            let mut events = world.resource_mut::<SceneViewEvents>();
            events.push(ViewEvent::KeyDown {
                key: KeyCode::KeyP,
                modifiers: Modifiers::NONE,
            });
            events.push(ViewEvent::PointerDown {
                button: MouseButton::Right,
                modifiers: Modifiers::NONE,
            });
            events.push(ViewEvent::Scroll {
                delta: Vec2::new(0.0, -1.0),
                modifiers: Modifiers::NONE,
            });
        }
        dispatch_view_events(&mut world);

        assert!(world.resource::<ObjectPlacer>().place_mode());
        assert!(!world.resource::<ButtonInput<KeyCode>>().just_pressed(KeyCode::KeyP));
        assert!(!world.resource::<ButtonInput<MouseButton>>().just_pressed(MouseButton::Right));
        assert!(world.resource::<ClaimedButtons>().contains(MouseButton::Right));
        assert_eq!(world.resource::<AccumulatedMouseScroll>().delta, Vec2::ZERO);
        // Right held while placing steps back from the first entry to the last.
        assert_eq!(world.resource::<ObjectPlacer>().selected_index(), Some(2));

        world.resource_mut::<SceneViewEvents>().push(ViewEvent::PointerUp {
            button: MouseButton::Right,
            modifiers: Modifiers::NONE,
        });
        dispatch_view_events(&mut world);
        assert!(!world.resource::<ClaimedButtons>().contains(MouseButton::Right));
    }
}
