//! Growth failures surface through the `log` facade at `warn`.
//!
//! Lives in its own test binary because it installs the process-wide logger.

use std::sync::Mutex;

use glam::Mat4;
use log::{Level, Log, Metadata, Record};
use quadra_engine::batch::{BatchConfig, BatchError, DrawCommand, SpriteBatch};
use quadra_engine::coords::Rect;
use quadra_engine::render::RecordingDevice;

struct Recorder {
    lines: Mutex<Vec<(Level, String)>>,
}

impl Log for Recorder {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static RECORDER: Recorder = Recorder { lines: Mutex::new(Vec::new()) };

#[test]
fn failed_growth_logs_a_warning() {
    log::set_logger(&RECORDER).unwrap();
    log::set_max_level(log::LevelFilter::Trace);

    // Room for exactly four quads of vertices.
    let mut dev = RecordingDevice::with_buffer_limit(4 * 4 * 32);
    let mut batch =
        SpriteBatch::with_device(&mut dev, BatchConfig { initial_quads: 4, ..Default::default() }).unwrap();
    let tex = dev.create_texture(8, 8).id;

    batch.begin(Mat4::IDENTITY);
    for i in 0..5 {
        batch.push(DrawCommand::new(tex, Rect::new(i as f32, 0.0, 4.0, 4.0)));
    }
    assert!(matches!(batch.end(&mut dev), Err(BatchError::Capacity(_))));

    let lines = RECORDER.lines.lock().unwrap();
    let warnings: Vec<&String> = lines
        .iter()
        .filter(|(level, _)| *level == Level::Warn)
        .map(|(_, msg)| msg)
        .collect();
    assert_eq!(warnings.len(), 1, "{lines:?}");
    assert!(warnings[0].contains("cannot grow to 5 quads"), "{}", warnings[0]);
}
