//! One full frame: scene sprites and UI share a batch and a flush.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use quadra_engine::batch::{BatchConfig, SpriteBatch};
use quadra_engine::camera::Camera;
use quadra_engine::core::FrameContext;
use quadra_engine::input::{InputEvent, InputSnapshot, MouseButton};
use quadra_engine::render::{RecordingDevice, TextureId};
use quadra_engine::scene::{Scene, Sprite, Transform};
use quadra_engine::text::{Font, FontSystem, Glyph, LineMetrics};
use quadra_engine::time::FrameClock;
use quadra_ui::prelude::*;

const SCREEN: Vec2 = Vec2::new(640.0, 480.0);

struct Blocky {
    texture: TextureId,
}

impl Font for Blocky {
    fn glyph(&self, ch: char) -> Option<Glyph> {
        let size = if ch == ' ' { Vec2::zero() } else { Vec2::new(6.0, 10.0) };
        (ch == ' ' || ch.is_ascii_graphic()).then(|| Glyph {
            uv: Rect::new(0.0, 0.0, 0.25, 0.25),
            size,
            bearing: Vec2::new(0.0, -10.0),
            advance: 8.0,
        })
    }

    fn line_metrics(&self) -> LineMetrics {
        LineMetrics { line_height: 14.0, ascent: 11.0, descent: 3.0 }
    }

    fn texture(&self) -> TextureId {
        self.texture
    }
}

struct World {
    device: RecordingDevice,
    batch: SpriteBatch,
    camera: Camera,
    clock: FrameClock,
    input: InputSnapshot,
    fonts: FontSystem,
    scene: Scene,
    ui: UiSystem,
    sheet: TextureId,
    white: TextureId,
    glyphs: TextureId,
    clicks: Rc<Cell<u32>>,
}

impl World {
    fn new() -> Self {
        let mut device = RecordingDevice::new();
        let sheet = device.create_texture(64, 64).id;
        let white = device.create_texture(1, 1).id;
        let glyphs = device.create_texture(128, 128).id;
        let batch = SpriteBatch::with_device(&mut device, BatchConfig::default()).unwrap();

        let mut fonts = FontSystem::new();
        let font = fonts.add(Box::new(Blocky { texture: glyphs }));

        let mut scene = Scene::new();
        for x in [100.0, 200.0] {
            let e = scene.create_entity();
            e.transform = Transform::from_position(Vec2::new(x, 240.0));
            e.sprite = Some(Sprite::new(sheet, Vec2::new(32.0, 32.0)));
        }

        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        let mut ui = UiSystem::new();
        ui.push_screen(
            "hud",
            UiElement::container("root")
                .child(
                    UiElement::new("bar", Panel::new(Color::rgb(0.1, 0.1, 0.1)))
                        .with_size(Vec2::new(640.0, 24.0)),
                )
                .child(UiElement::new("score", Label::new("42", font)).with_anchor(Anchor::TopRight))
                .child(
                    UiElement::new("icon", Image::new(sheet).uv(Rect::new(0.5, 0.0, 0.5, 0.5)))
                        .with_size(Vec2::new(16.0, 16.0))
                        .with_position(Vec2::new(4.0, 4.0)),
                )
                .child(
                    UiElement::new("quit", Button::new().on_click(move || counter.set(counter.get() + 1)))
                        .with_size(Vec2::new(80.0, 30.0))
                        .with_anchor(Anchor::BottomRight),
                ),
        );

        Self {
            device,
            batch,
            camera: Camera::screen_space(SCREEN),
            clock: FrameClock::new(),
            input: InputSnapshot::new(),
            fonts,
            scene,
            ui,
            sheet,
            white,
            glyphs,
            clicks,
        }
    }

    fn frame(&mut self, events: &[InputEvent]) -> quadra_engine::batch::FlushStats {
        self.input.begin_frame();
        for ev in events {
            self.input.apply_event(ev);
        }
        let time = self.clock.advance(Duration::from_millis(16));

        let ctx = FrameContext::new(time, &self.input);
        self.scene.update(&ctx, |e, ctx| e.transform.position.x += 60.0 * ctx.dt());

        let ui_ctx = UiContext::new(SCREEN, &self.input, &self.fonts)
            .with_dt(time.dt)
            .with_white_texture(self.white);
        self.ui.update(&ui_ctx);

        self.batch.begin(self.camera.view_projection());
        self.scene.render(&mut self.batch, &self.device);
        self.ui.render(&ui_ctx, &mut self.batch);
        self.batch.end(&mut self.device).unwrap()
    }
}

#[test]
fn scene_and_ui_share_one_submission() {
    let mut world = World::new();
    let stats = world.frame(&[]);

    // 2 sprites + icon on the sheet, bar + button on white, 2 glyphs.
    assert_eq!(stats.quads, 7);
    assert_eq!(stats.dropped, 0);
    assert_eq!(stats.submissions, 3);

    assert_eq!(world.device.submissions().len(), 1);
    let draws = &world.device.submissions()[0].draws;
    let textures: Vec<TextureId> = draws.iter().map(|d| d.texture).collect();
    assert_eq!(textures, [world.sheet, world.white, world.glyphs]);
    assert_eq!(draws.iter().map(|d| d.index_count).collect::<Vec<_>>(), [18, 12, 12]);
}

#[test]
fn ui_quads_follow_layout() {
    let mut world = World::new();
    world.frame(&[]);
    let v = world.device.vertices();

    // Sheet bucket: two sprites then the icon.
    assert_eq!(v[8].position, [4.0, 4.0]);
    // White bucket starts with the bar, then the button in the bottom-right corner.
    assert_eq!(v[12].position, [0.0, 0.0]);
    assert_eq!(v[16].position, [560.0, 450.0]);
    // The label auto-sized to 16x14 and sits against the right edge.
    assert_eq!(v[20].position, [624.0, 1.0]);
}

#[test]
fn destroyed_texture_drops_only_its_quads() {
    let mut world = World::new();
    world.device.destroy_texture(world.sheet);
    let stats = world.frame(&[]);

    // Scene skips invalid sprites itself; the icon reaches the batch and is dropped.
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.quads, 4);
    assert_eq!(world.device.draw_count(), 2);
}

#[test]
fn button_click_through_the_frame_loop() {
    let mut world = World::new();
    let at = Vec2::new(600.0, 460.0);
    world.frame(&[InputEvent::ButtonDown { button: MouseButton::Left, at }]);
    assert_eq!(world.clicks.get(), 0);
    world.frame(&[InputEvent::ButtonUp { button: MouseButton::Left, at }]);
    assert_eq!(world.clicks.get(), 1);

    let hud = world.ui.screen("hud").unwrap();
    let quit = hud.find("quit").unwrap();
    assert_eq!(world.ui.hit_test(at, SCREEN), Some(("hud", quit)));
}

#[test]
fn paused_clock_freezes_the_scene() {
    let mut world = World::new();
    world.frame(&[]);
    let before: Vec<f32> = world.scene.iter().map(|e| e.transform.position.x).collect();

    world.clock.set_paused(true);
    world.frame(&[]);
    let after: Vec<f32> = world.scene.iter().map(|e| e.transform.position.x).collect();
    assert_eq!(before, after);
}
