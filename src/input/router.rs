use bevy::prelude::*;

use super::{EventResponse, KeyBindings, Modifiers, ViewEvent};
use crate::constants::gestures::{
    PRECISE_ROTATE_FACTOR, PRECISE_SCALE_FACTOR, ROTATE_STEP_DEGREES, SCALE_STEP,
};
use crate::host::{ListenerId, PlacementHost, ScreenProjection, ViewEventSource};
use crate::placement::ObjectPlacer;

/// Interaction state, derived from place mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Idle,
    Placing,
}

/// Turns scene view events into placement operations.
///
/// The router only reacts while subscribed to a [`ViewEventSource`] through
/// [`InputRouter::start`]. Every event it acts on is reported as consumed so the view's
/// own navigation never sees it.
#[derive(Resource, Debug, Default)]
pub struct InputRouter {
    listener: Option<ListenerId>,
    secondary_held: bool,
    bindings: KeyBindings,
}

impl InputRouter {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    pub fn secondary_held(&self) -> bool {
        self.secondary_held
    }

    pub fn state(&self, placer: &ObjectPlacer) -> RouterState {
        if placer.place_mode() {
            RouterState::Placing
        } else {
            RouterState::Idle
        }
    }

    /// Subscribe to `source`. A router holds at most one subscription.
    pub fn start(&mut self, source: &mut (impl ViewEventSource + ?Sized)) {
        if self.listener.is_some() {
            return;
        }
        self.listener = Some(source.subscribe());
    }

    pub fn stop(&mut self, source: &mut (impl ViewEventSource + ?Sized)) {
        if let Some(id) = self.listener.take()
            && !source.unsubscribe(id)
        {
            warn!("Input router listener {id:?} was not subscribed");
        }
        self.secondary_held = false;
    }

    pub fn handle(
        &mut self,
        event: &ViewEvent,
        placer: &mut ObjectPlacer,
        host: &mut (impl PlacementHost + ?Sized),
        projection: Option<&(impl ScreenProjection + ?Sized)>,
    ) -> EventResponse {
        if self.listener.is_none() {
            return EventResponse::Ignored;
        }
        let placing = self.state(placer) == RouterState::Placing;

        match *event {
            ViewEvent::PointerDown {
                button: MouseButton::Right,
                ..
            } => {
                self.secondary_held = true;
                claim(placing)
            }
            ViewEvent::PointerUp {
                button: MouseButton::Right,
                ..
            } => {
                self.secondary_held = false;
                claim(placing)
            }
            ViewEvent::PointerUp {
                button: MouseButton::Left,
                ..
            } if placer.has_preview() => {
                placer.place_object(host);
                EventResponse::Consumed
            }
            ViewEvent::PointerUp {
                button: MouseButton::Middle,
                modifiers,
            } if placer.has_preview() => {
                if modifiers.control {
                    placer.mirror_preview(host);
                    EventResponse::Consumed
                } else if self.secondary_held {
                    placer.step_selection(1, host);
                    EventResponse::Consumed
                } else {
                    EventResponse::Ignored
                }
            }
            ViewEvent::PointerMove { position, .. } => {
                if placer.has_preview()
                    && let Some(projection) = projection
                {
                    let screen = Vec2::new(position.x, projection.pixel_height() - position.y);
                    placer.move_preview(projection.screen_to_world(screen), host);
                }
                EventResponse::Ignored
            }
            ViewEvent::Scroll { delta, modifiers } => {
                self.handle_scroll(delta, modifiers, placing, placer, host)
            }
            ViewEvent::KeyDown { key, .. } => self.handle_key(key, placing, placer, host),
            _ => EventResponse::Ignored,
        }
    }

    fn handle_scroll(
        &mut self,
        delta: Vec2,
        modifiers: Modifiers,
        placing: bool,
        placer: &mut ObjectPlacer,
        host: &mut (impl PlacementHost + ?Sized),
    ) -> EventResponse {
        if delta.y == 0.0 {
            return EventResponse::Ignored;
        }
        let direction = -delta.y.signum();

        if modifiers.control {
            if !placer.has_preview() {
                return EventResponse::Ignored;
            }
            let factor = if modifiers.alt { PRECISE_ROTATE_FACTOR } else { 1.0 };
            placer.rotate_preview(direction * ROTATE_STEP_DEGREES * factor, host);
            EventResponse::Consumed
        } else if modifiers.shift {
            if !placer.has_preview() {
                return EventResponse::Ignored;
            }
            let factor = if modifiers.alt { PRECISE_SCALE_FACTOR } else { 1.0 };
            placer.scale_preview(direction * SCALE_STEP * factor, host);
            EventResponse::Consumed
        } else if self.secondary_held {
            if placing {
                let step = if delta.y < 0.0 { -1 } else { 1 };
                placer.step_selection(step, host);
            }
            EventResponse::Consumed
        } else {
            EventResponse::Ignored
        }
    }

    fn handle_key(
        &mut self,
        key: KeyCode,
        placing: bool,
        placer: &mut ObjectPlacer,
        host: &mut (impl PlacementHost + ?Sized),
    ) -> EventResponse {
        if key == self.bindings.reset && placer.has_preview() {
            placer.reset_preview(host);
            EventResponse::Consumed
        } else if key == self.bindings.toggle_place_mode {
            placer.toggle_place_mode(host);
            EventResponse::Consumed
        } else if key == self.bindings.cancel && placing {
            placer.set_place_mode(false, host);
            EventResponse::Consumed
        } else {
            EventResponse::Ignored
        }
    }
}

fn claim(placing: bool) -> EventResponse {
    if placing {
        EventResponse::Consumed
    } else {
        EventResponse::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EntryId;
    use crate::host::{PreviewNode, WorldHost};
    use crate::selection::SelectionMode;
    use crate::test_support::rocks;

    /// Pixels map to world units one to one, origin bottom-left.
    struct FlatProjection {
        height: f32,
    }

    impl ScreenProjection for FlatProjection {
        fn pixel_height(&self) -> f32 {
            self.height
        }

        fn screen_to_world(&self, screen: Vec2) -> Vec2 {
            screen
        }
    }

    #[derive(Default)]
    struct Source {
        next: u32,
        live: Vec<ListenerId>,
    }

    impl ViewEventSource for Source {
        fn subscribe(&mut self) -> ListenerId {
            self.next += 1;
            let id = ListenerId(self.next);
            self.live.push(id);
            id
        }

        fn unsubscribe(&mut self, id: ListenerId) -> bool {
            let before = self.live.len();
            self.live.retain(|l| *l != id);
            self.live.len() != before
        }
    }

    struct Fixture {
        world: World,
        router: InputRouter,
        placer: ObjectPlacer,
        ids: Vec<EntryId>,
        source: Source,
    }

    impl Fixture {
        fn new() -> Self {
            let (catalog, ids) = rocks();
            let mut fixture = Self {
                world: World::new(),
                router: InputRouter::default(),
                placer: ObjectPlacer::new(catalog, Some(3)),
                ids,
                source: Source::default(),
            };
            fixture.router.start(&mut fixture.source);
            fixture
        }

        fn placing(mut self, index: isize) -> Self {
            let mut host = WorldHost::new(&mut self.world);
            self.placer.set_selected_index(index, &mut host);
            self.placer.set_place_mode(true, &mut host);
            drop(host);
            self
        }

        fn send(&mut self, event: ViewEvent) -> EventResponse {
            let projection = FlatProjection { height: 600.0 };
            self.router.handle(
                &event,
                &mut self.placer,
                &mut WorldHost::new(&mut self.world),
                Some(&projection),
            )
        }

        fn preview_roots(&mut self) -> usize {
            self.world
                .query_filtered::<Entity, (With<PreviewNode>, Without<ChildOf>)>()
                .iter(&self.world)
                .count()
        }
    }

    fn scroll(dy: f32, modifiers: Modifiers) -> ViewEvent {
        ViewEvent::Scroll {
            delta: Vec2::new(0.0, dy),
            modifiers,
        }
    }

    fn key(key: KeyCode) -> ViewEvent {
        ViewEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    fn up(button: MouseButton, modifiers: Modifiers) -> ViewEvent {
        ViewEvent::PointerUp { button, modifiers }
    }

    fn down(button: MouseButton) -> ViewEvent {
        ViewEvent::PointerDown {
            button,
            modifiers: Modifiers::NONE,
        }
    }

    const CONTROL: Modifiers = Modifiers {
        control: true,
        shift: false,
        alt: false,
    };

    #[test]
    fn control_scroll_rotates_against_scroll_direction() {
        let mut f = Fixture::new().placing(0);
        assert_eq!(f.send(scroll(-1.0, CONTROL)), EventResponse::Consumed);
        assert_eq!(f.placer.transform().rotation_degrees, 10.0);

        let precise = Modifiers { alt: true, ..CONTROL };
        f.send(scroll(-3.0, precise));
        assert!((f.placer.transform().rotation_degrees - 12.0).abs() < 1e-5);

        f.send(scroll(1.0, CONTROL));
        assert!((f.placer.transform().rotation_degrees - 2.0).abs() < 1e-5);
    }

    #[test]
    fn shift_scroll_scales() {
        let mut f = Fixture::new().placing(0);
        let shift = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        f.send(scroll(-1.0, shift));
        assert_eq!(f.placer.transform().scale, 2.0);
        f.send(scroll(1.0, Modifiers { alt: true, ..shift }));
        assert!((f.placer.transform().scale - 1.9).abs() < 1e-5);
    }

    #[test]
    fn plain_scroll_is_left_to_the_view() {
        let mut f = Fixture::new().placing(0);
        assert_eq!(f.send(scroll(-1.0, Modifiers::NONE)), EventResponse::Ignored);
    }

    #[test]
    fn secondary_scroll_steps_selection() {
        let mut f = Fixture::new().placing(0);
        assert_eq!(f.send(down(MouseButton::Right)), EventResponse::Consumed);
        assert_eq!(f.send(scroll(-1.0, Modifiers::NONE)), EventResponse::Consumed);
        assert_eq!(f.placer.selected(), Some(f.ids[2]));
        f.send(scroll(1.0, Modifiers::NONE));
        assert_eq!(f.placer.selected(), Some(f.ids[0]));
        assert_eq!(f.send(up(MouseButton::Right, Modifiers::NONE)), EventResponse::Consumed);
        assert!(!f.router.secondary_held());
    }

    #[test]
    fn middle_click_mirrors_or_steps_once() {
        let mut f = Fixture::new().placing(0);
        f.placer.set_selection_mode(SelectionMode::GetRandom);

        assert_eq!(f.send(up(MouseButton::Middle, CONTROL)), EventResponse::Consumed);
        assert!(f.placer.transform().mirrored);

        assert_eq!(
            f.send(up(MouseButton::Middle, Modifiers::NONE)),
            EventResponse::Ignored
        );
        f.send(down(MouseButton::Right));
        f.send(up(MouseButton::Middle, Modifiers::NONE));
        assert_eq!(f.placer.selected(), Some(f.ids[1]));
    }

    #[test]
    fn primary_release_commits_and_advances() {
        let mut f = Fixture::new().placing(1);
        f.placer.set_selection_mode(SelectionMode::GoToNext);
        f.send(ViewEvent::PointerMove {
            position: Vec2::new(100.0, 200.0),
            modifiers: Modifiers::NONE,
        });

        assert_eq!(f.send(up(MouseButton::Left, Modifiers::NONE)), EventResponse::Consumed);
        assert_eq!(f.placer.selected(), Some(f.ids[2]));
        assert_eq!(f.router.state(&f.placer), RouterState::Placing);
        assert_eq!(f.preview_roots(), 1);

        let mut placed = f
            .world
            .query_filtered::<&Transform, (With<crate::host::TemplateInstance>, Without<PreviewNode>)>();
        let transforms: Vec<Transform> = placed.iter(&f.world).copied().collect();
        assert_eq!(transforms.len(), 1);
        assert_eq!(transforms[0].translation.truncate(), Vec2::new(100.0, 400.0));
    }

    #[test]
    fn pointer_move_flips_y_and_keeps_depth() {
        let mut f = Fixture::new().placing(0);
        let entity = f.placer.preview_entity().unwrap();
        f.world.get_mut::<Transform>(entity).unwrap().translation.z = 3.0;

        let response = f.send(ViewEvent::PointerMove {
            position: Vec2::new(10.0, 50.0),
            modifiers: Modifiers::NONE,
        });
        assert_eq!(response, EventResponse::Ignored);
        assert_eq!(
            f.world.get::<Transform>(entity).unwrap().translation,
            Vec3::new(10.0, 550.0, 3.0)
        );
    }

    #[test]
    fn keys_toggle_cancel_and_reset() {
        let mut f = Fixture::new();
        f.placer.set_selected_index(0, &mut WorldHost::new(&mut f.world));

        assert_eq!(f.send(key(KeyCode::Escape)), EventResponse::Ignored);
        assert_eq!(f.send(key(KeyCode::KeyP)), EventResponse::Consumed);
        assert_eq!(f.router.state(&f.placer), RouterState::Placing);
        assert_eq!(f.preview_roots(), 1);

        f.send(scroll(-1.0, CONTROL));
        f.send(up(MouseButton::Middle, CONTROL));
        assert_eq!(f.send(key(KeyCode::KeyR)), EventResponse::Consumed);
        assert_eq!(f.placer.transform().rotation_degrees, 0.0);
        assert!(!f.placer.transform().mirrored);

        assert_eq!(f.send(key(KeyCode::Escape)), EventResponse::Consumed);
        assert_eq!(f.router.state(&f.placer), RouterState::Idle);
        assert_eq!(f.preview_roots(), 0);
    }

    #[test]
    fn stopped_router_ignores_everything() {
        let mut f = Fixture::new().placing(0);
        f.router.stop(&mut f.source);
        assert!(f.source.live.is_empty());
        assert_eq!(f.send(key(KeyCode::KeyP)), EventResponse::Ignored);
        assert!(f.placer.place_mode());
    }

    #[test]
    fn idle_router_lets_pointer_through() {
        let mut f = Fixture::new();
        assert_eq!(f.send(down(MouseButton::Right)), EventResponse::Ignored);
        assert_eq!(f.send(up(MouseButton::Left, Modifiers::NONE)), EventResponse::Ignored);
        assert_eq!(f.send(scroll(1.0, Modifiers::NONE)), EventResponse::Consumed);
        assert!(f.placer.selected().is_none());
    }
}
