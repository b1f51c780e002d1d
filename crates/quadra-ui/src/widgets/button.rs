use quadra_engine::batch::SpriteBatch;
use quadra_engine::coords::{Rect, Vec2};
use quadra_engine::input::MouseButton;
use quadra_engine::paint::Color;

use crate::context::UiContext;
use crate::element::ElementBehavior;

use super::label::Label;
use super::panel::fill_rect;

/// Visual state of a [`Button`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    /// Pointer over the button, no press being tracked.
    Hovered,
    /// A press that started inside is still held.
    Pressed,
}

/// A clickable rectangle with an optional centered caption.
///
/// A click is a primary press that starts inside the button followed by a
/// release inside it. Releasing outside cancels without firing. Hover is
/// independent of the press, and a button covered by another element (a
/// higher layer, a later sibling, or a screen above) is never hovered.
///
/// # Example
/// ```rust,ignore
/// Button::new()
///     .caption(Label::new("Play", font))
///     .background(Color::rgb(0.2, 0.2, 0.25))
///     .hover_background(Color::rgb(0.3, 0.3, 0.35))
///     .on_click(|| log::info!("play"))
/// ```
pub struct Button {
    state: ButtonState,
    tracking: bool,
    clicks: u64,
    on_click: Option<Box<dyn FnMut()>>,

    background: Color,
    hover_background: Color,
    press_background: Color,
    caption: Option<Label>,
}

impl Button {
    pub fn new() -> Self {
        Self {
            state: ButtonState::Idle,
            tracking: false,
            clicks: 0,
            on_click: None,
            background: Color::rgb(0.25, 0.25, 0.25),
            hover_background: Color::rgb(0.35, 0.35, 0.35),
            press_background: Color::rgb(0.15, 0.15, 0.15),
            caption: None,
        }
    }

    /// Callback invoked when the button is clicked.
    pub fn on_click(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Background color when the cursor is over the button.
    pub fn hover_background(mut self, color: Color) -> Self {
        self.hover_background = color;
        self
    }

    /// Background color while a press is held.
    pub fn press_background(mut self, color: Color) -> Self {
        self.press_background = color;
        self
    }

    /// Text drawn centered on the button. Its auto-size flag is ignored.
    pub fn caption(mut self, label: Label) -> Self {
        self.caption = Some(label);
        self
    }

    #[inline]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Clicks fired so far.
    #[inline]
    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    pub fn caption_mut(&mut self) -> Option<&mut Label> {
        self.caption.as_mut()
    }

    fn current_background(&self) -> Color {
        match self.state {
            ButtonState::Idle => self.background,
            ButtonState::Hovered => self.hover_background,
            ButtonState::Pressed => self.press_background,
        }
    }

    fn click(&mut self) {
        self.clicks += 1;
        log::trace!("button: click #{}", self.clicks);
        if let Some(f) = self.on_click.as_mut() {
            f();
        }
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementBehavior for Button {
    fn on_update(&mut self, rect: Rect, ctx: &UiContext<'_>) -> Option<Vec2> {
        let input = ctx.input;
        let inside = ctx.is_hovered(rect);

        if inside && input.button_pressed(MouseButton::Left) {
            self.tracking = true;
        }

        // A press and release within one frame still counts as a click.
        if self.tracking && !input.button_down(MouseButton::Left) {
            self.tracking = false;
            if inside && input.button_released(MouseButton::Left) {
                self.click();
            }
        }

        self.state = if self.tracking {
            ButtonState::Pressed
        } else if inside {
            ButtonState::Hovered
        } else {
            ButtonState::Idle
        };
        None
    }

    fn on_render(&self, rect: Rect, layer: i32, ctx: &UiContext<'_>, batch: &mut SpriteBatch) {
        fill_rect(batch, ctx, rect, self.current_background(), layer);

        if let Some(caption) = &self.caption {
            let size = caption.measure(ctx);
            let origin = rect.center() - size * 0.5;
            caption.draw_at(origin, layer, ctx, batch);
        }
    }
}
