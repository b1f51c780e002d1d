use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{InputEvent, Key, MouseButton};

/// Current input state plus this frame's transitions.
///
/// Call [`begin_frame`](Self::begin_frame) once per frame before applying the
/// frame's events; it clears the edge sets but keeps held keys/buttons and the
/// pointer position.
#[derive(Debug, Default, Clone)]
pub struct InputSnapshot {
    pointer: Option<Vec2>,
    keys_down: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,

    keys_pressed: HashSet<Key>,
    keys_released: HashSet<Key>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    wheel: Vec2,
    text: String,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-frame edges, wheel and text.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel = Vec2::zero();
        self.text.clear();
    }

    /// Folds one event into the snapshot.
    ///
    /// Repeated downs of an already-held key or button do not produce a new
    /// pressed edge.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::KeyDown(key) => {
                if self.keys_down.insert(*key) {
                    self.keys_pressed.insert(*key);
                }
            }
            InputEvent::KeyUp(key) => {
                if self.keys_down.remove(key) {
                    self.keys_released.insert(*key);
                }
            }
            InputEvent::PointerMoved(p) => self.pointer = Some(*p),
            InputEvent::PointerLeft => self.pointer = None,
            InputEvent::ButtonDown { button, at } => {
                self.pointer = Some(*at);
                if self.buttons_down.insert(*button) {
                    self.buttons_pressed.insert(*button);
                }
            }
            InputEvent::ButtonUp { button, at } => {
                self.pointer = Some(*at);
                if self.buttons_down.remove(button) {
                    self.buttons_released.insert(*button);
                }
            }
            InputEvent::Wheel(delta) => self.wheel += *delta,
            InputEvent::Text(t) => self.text.push_str(t),
            InputEvent::FocusLost => {
                // Release everything so nothing stays stuck after refocus.
                self.keys_released.extend(self.keys_down.drain());
                self.buttons_released.extend(self.buttons_down.drain());
            }
        }
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Went down since the last `begin_frame`.
    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    #[inline]
    pub fn key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    #[inline]
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    #[inline]
    pub fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    #[inline]
    pub fn button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Pointer position, `None` while outside the surface.
    #[inline]
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    #[inline]
    pub fn wheel(&self) -> Vec2 {
        self.wheel
    }

    /// Text committed this frame.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_edge_only_on_first_down() {
        let mut input = InputSnapshot::new();
        input.apply_event(&InputEvent::KeyDown(Key::Space));
        input.apply_event(&InputEvent::KeyDown(Key::Space));
        assert!(input.key_down(Key::Space));
        assert!(input.key_pressed(Key::Space));

        input.begin_frame();
        input.apply_event(&InputEvent::KeyDown(Key::Space));
        assert!(input.key_down(Key::Space));
        assert!(!input.key_pressed(Key::Space));
    }

    #[test]
    fn button_events_track_pointer() {
        let mut input = InputSnapshot::new();
        input.apply_event(&InputEvent::ButtonDown { button: MouseButton::Left, at: Vec2::new(3.0, 4.0) });
        assert_eq!(input.pointer(), Some(Vec2::new(3.0, 4.0)));
        assert!(input.button_pressed(MouseButton::Left));

        input.begin_frame();
        input.apply_event(&InputEvent::ButtonUp { button: MouseButton::Left, at: Vec2::new(5.0, 6.0) });
        assert!(!input.button_down(MouseButton::Left));
        assert!(input.button_released(MouseButton::Left));
        assert_eq!(input.pointer(), Some(Vec2::new(5.0, 6.0)));

        input.apply_event(&InputEvent::PointerLeft);
        assert_eq!(input.pointer(), None);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut input = InputSnapshot::new();
        input.apply_event(&InputEvent::KeyDown(Key::W));
        input.apply_event(&InputEvent::ButtonDown { button: MouseButton::Right, at: Vec2::zero() });
        input.begin_frame();

        input.apply_event(&InputEvent::FocusLost);
        assert!(!input.key_down(Key::W));
        assert!(input.key_released(Key::W));
        assert!(input.button_released(MouseButton::Right));
    }

    #[test]
    fn wheel_and_text_accumulate_per_frame() {
        let mut input = InputSnapshot::new();
        input.apply_event(&InputEvent::Wheel(Vec2::new(0.0, 1.0)));
        input.apply_event(&InputEvent::Wheel(Vec2::new(0.0, 2.0)));
        input.apply_event(&InputEvent::Text("ab".into()));
        input.apply_event(&InputEvent::Text("c".into()));
        assert_eq!(input.wheel(), Vec2::new(0.0, 3.0));
        assert_eq!(input.text(), "abc");

        input.begin_frame();
        assert_eq!(input.wheel(), Vec2::zero());
        assert!(input.text().is_empty());
    }
}
