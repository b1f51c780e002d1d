use crate::coords::Vec2;

/// Keyboard key identifier.
///
/// The platform layer maps its key codes into these variants; anything else
/// arrives as `Key::Other` with a stable platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    Other(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Platform-agnostic input events, fed to
/// [`InputSnapshot::apply_event`](super::InputSnapshot::apply_event).
///
/// Positions are in logical pixels, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),

    PointerMoved(Vec2),
    /// Pointer left the surface.
    PointerLeft,

    ButtonDown { button: MouseButton, at: Vec2 },
    ButtonUp { button: MouseButton, at: Vec2 },

    /// Scroll delta in lines, +Y away from the user.
    Wheel(Vec2),

    /// Committed text.
    Text(String),

    /// Focus loss releases everything held.
    FocusLost,
}
