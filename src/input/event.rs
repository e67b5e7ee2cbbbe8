use bevy::prelude::*;

/// Modifier keys held while an event happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        shift: false,
        alt: false,
    };

    pub fn from_keyboard(keyboard: &ButtonInput<KeyCode>) -> Self {
        Self {
            control: keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]),
            shift: keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
            alt: keyboard.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]),
        }
    }
}

/// A raw scene view event, as the router sees it.
///
/// Pointer positions are in logical pixels with the origin at the top-left of the view,
/// y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    PointerDown {
        button: MouseButton,
        modifiers: Modifiers,
    },
    PointerUp {
        button: MouseButton,
        modifiers: Modifiers,
    },
    PointerMove {
        position: Vec2,
        modifiers: Modifiers,
    },
    /// Scroll delta in lines; positive y scrolls down
    Scroll {
        delta: Vec2,
        modifiers: Modifiers,
    },
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },
}

/// Whether the router claimed an event. Consumed events must not reach the view's own
/// camera controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Consumed,
    Ignored,
}

impl EventResponse {
    pub fn is_consumed(self) -> bool {
        self == EventResponse::Consumed
    }
}

/// Keys of the keyboard gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    /// Reset rotation, scale and mirror of the preview
    pub reset: KeyCode,
    pub toggle_place_mode: KeyCode,
    /// Leave place mode
    pub cancel: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            reset: KeyCode::KeyR,
            toggle_place_mode: KeyCode::KeyP,
            cancel: KeyCode::Escape,
        }
    }
}
