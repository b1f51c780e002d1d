use std::collections::HashMap;

use glam::Mat4;

use crate::coords::Rect;
use crate::paint::Color;
use crate::render::{BufferKind, DeviceError, FrameUniforms, GraphicsDevice, TextureId};

use super::vertex::{extend_quad_indices, quad_vertices, INDICES_PER_QUAD, VERTICES_PER_QUAD};
use super::{BatchConfig, BatchError, DrawCommand, SpriteVertex};

/// What one `end` call did.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Indexed draws issued; one per distinct valid texture.
    pub submissions: usize,
    /// Quads uploaded.
    pub quads: usize,
    /// Commands skipped because their texture was not valid.
    pub dropped: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Recording,
}

struct Bucket {
    texture: TextureId,
    first_quad: usize,
    quads: usize,
}

/// Accumulates quads between `begin` and `end` and flushes them grouped by texture.
///
/// Lifecycle:
/// - `begin` while recording is ignored; the first `begin` wins.
/// - `push` while idle is ignored.
/// - `end` while idle does nothing and returns empty stats.
/// - `end` always returns the batch to idle with an empty queue, even on error.
///
/// Ordering:
/// - buckets follow the first appearance of each texture in the frame
/// - inside a bucket, lower `layer` draws first; equal layers keep push order
/// - there is no sort across buckets
pub struct SpriteBatch {
    config: BatchConfig,
    state: State,
    view_proj: Mat4,
    commands: Vec<DrawCommand>,

    // CPU staging, reused between frames.
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    capacity_quads: usize,
    indices_dirty: bool,
}

impl SpriteBatch {
    /// Creates a batch with no device storage yet; the first flush allocates.
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            view_proj: Mat4::IDENTITY,
            commands: Vec::new(),
            vertices: Vec::new(),
            indices: Vec::new(),
            capacity_quads: 0,
            indices_dirty: true,
        }
    }

    /// Creates a batch and asks `device` for the initial vertex/index storage.
    ///
    /// Fails with [`BatchError::Init`] if the device refuses the allocation.
    pub fn with_device(device: &mut dyn GraphicsDevice, config: BatchConfig) -> Result<Self, BatchError> {
        let capacity = config.initial_quads.max(1);
        allocate(device, capacity).map_err(BatchError::Init)?;

        let mut batch = Self::new(config);
        extend_quad_indices(&mut batch.indices, 0, capacity);
        batch.capacity_quads = capacity;
        batch.commands.reserve(capacity);
        batch.vertices.reserve(capacity * VERTICES_PER_QUAD);

        log::debug!("sprite batch: initial capacity {capacity} quads");
        Ok(batch)
    }

    #[inline]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Mutable access to flush-wide settings; changes apply from the next `end`.
    #[inline]
    pub fn config_mut(&mut self) -> &mut BatchConfig {
        &mut self.config
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.state == State::Recording
    }

    /// Number of commands queued in the current recording.
    #[inline]
    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    /// Quads the device buffers can hold without growing.
    #[inline]
    pub fn capacity_quads(&self) -> usize {
        self.capacity_quads
    }

    // ── recording ─────────────────────────────────────────────────────────

    /// Starts recording with the given view-projection.
    pub fn begin(&mut self, view_proj: Mat4) {
        if self.state == State::Recording {
            log::debug!("sprite batch: begin while recording ignored");
            return;
        }
        self.view_proj = view_proj;
        self.commands.clear();
        self.state = State::Recording;
    }

    /// Queues one quad. Ignored unless recording.
    pub fn push(&mut self, cmd: DrawCommand) {
        if self.state != State::Recording {
            return;
        }
        self.commands.push(cmd);
    }

    /// Queues `src` (UV space) of `texture` into `dst` with a tint.
    pub fn draw(&mut self, texture: TextureId, dst: Rect, src: Rect, color: Color) {
        self.push(DrawCommand::new(texture, dst).src(src).color(color));
    }

    /// [`draw`](Self::draw) with rotation about the destination center and a layer.
    pub fn draw_ex(
        &mut self,
        texture: TextureId,
        dst: Rect,
        src: Rect,
        color: Color,
        rotation: f32,
        layer: i32,
    ) {
        self.push(
            DrawCommand::new(texture, dst)
                .src(src)
                .color(color)
                .rotation(rotation)
                .layer(layer),
        );
    }

    // ── flush ─────────────────────────────────────────────────────────────

    /// Flushes every queued quad to `device` and returns to idle.
    pub fn end(&mut self, device: &mut dyn GraphicsDevice) -> Result<FlushStats, BatchError> {
        if self.state != State::Recording {
            log::debug!("sprite batch: end while idle ignored");
            return Ok(FlushStats::default());
        }
        self.state = State::Idle;

        let result = self.flush(device);
        self.commands.clear();
        result
    }

    fn flush(&mut self, device: &mut dyn GraphicsDevice) -> Result<FlushStats, BatchError> {
        let mut stats = FlushStats::default();

        // Bucket by texture in first-seen order, dropping invalid handles.
        let mut slot_of: HashMap<TextureId, usize> = HashMap::new();
        let mut order: Vec<(usize, i32, usize)> = Vec::with_capacity(self.commands.len());
        for (i, cmd) in self.commands.iter().enumerate() {
            if cmd.texture.is_none() || !device.texture_valid(cmd.texture) {
                stats.dropped += 1;
                continue;
            }
            let next = slot_of.len();
            let slot = *slot_of.entry(cmd.texture).or_insert(next);
            order.push((slot, cmd.layer, i));
        }

        if stats.dropped > 0 {
            log::debug!("sprite batch: dropped {} command(s) with invalid texture", stats.dropped);
        }
        if order.is_empty() {
            return Ok(stats);
        }

        // Stable: equal (bucket, layer) keeps push order.
        order.sort_by_key(|&(slot, layer, _)| (slot, layer));

        let quads = order.len();
        if quads > self.capacity_quads {
            if let Err(e) = self.grow(device, quads) {
                log::warn!("sprite batch: cannot grow to {quads} quads: {e}");
                return Err(BatchError::Capacity(e));
            }
        }

        self.vertices.clear();
        let mut buckets: Vec<Bucket> = Vec::with_capacity(slot_of.len());
        for (n, &(slot, _, i)) in order.iter().enumerate() {
            let cmd = &self.commands[i];
            if buckets.len() == slot + 1 {
                if let Some(b) = buckets.last_mut() {
                    b.quads += 1;
                }
            } else {
                buckets.push(Bucket { texture: cmd.texture, first_quad: n, quads: 1 });
            }
            self.vertices.extend_from_slice(&quad_vertices(cmd, self.config.pixel_snap));
        }

        device.begin_submission(&FrameUniforms {
            view_proj: self.view_proj,
            sampling: self.config.sampling,
            monochrome: self.config.monochrome.clamp(0.0, 1.0),
        });

        device.upload_dynamic(BufferKind::Vertex, bytemuck::cast_slice(&self.vertices));
        if self.indices_dirty {
            device.upload_dynamic(BufferKind::Index, bytemuck::cast_slice(&self.indices));
            self.indices_dirty = false;
        }

        for b in &buckets {
            device.draw_indexed(
                b.texture,
                (b.first_quad * INDICES_PER_QUAD) as u32,
                (b.quads * INDICES_PER_QUAD) as u32,
            );
        }

        device.end_submission();

        stats.submissions = buckets.len();
        stats.quads = quads;
        log::trace!("sprite batch: {} quads in {} draw(s)", stats.quads, stats.submissions);
        Ok(stats)
    }

    /// Doubles capacity until `required` quads fit.
    fn grow(&mut self, device: &mut dyn GraphicsDevice, required: usize) -> Result<(), DeviceError> {
        let mut capacity = self.capacity_quads.max(self.config.initial_quads).max(1);
        while capacity < required {
            capacity = capacity.saturating_mul(2);
        }

        allocate(device, capacity)?;

        extend_quad_indices(&mut self.indices, self.capacity_quads, capacity);
        self.capacity_quads = capacity;
        self.indices_dirty = true;

        log::debug!("sprite batch: grew to {capacity} quads");
        Ok(())
    }
}

fn allocate(device: &mut dyn GraphicsDevice, quads: usize) -> Result<(), DeviceError> {
    let vertex_bytes = (quads * VERTICES_PER_QUAD * std::mem::size_of::<SpriteVertex>()) as u64;
    let index_bytes = (quads * INDICES_PER_QUAD * std::mem::size_of::<u32>()) as u64;
    device.create_or_grow_buffer(BufferKind::Vertex, vertex_bytes)?;
    device.create_or_grow_buffer(BufferKind::Index, index_bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCall, RecordingDevice, Sampling};

    fn setup(initial_quads: usize) -> (RecordingDevice, SpriteBatch) {
        let mut dev = RecordingDevice::new();
        let batch = SpriteBatch::with_device(
            &mut dev,
            BatchConfig { initial_quads, ..Default::default() },
        )
        .unwrap();
        (dev, batch)
    }

    fn quad(tex: TextureId, x: f32) -> DrawCommand {
        DrawCommand::new(tex, Rect::new(x, 0.0, 10.0, 10.0))
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn push_while_idle_is_ignored() {
        let (mut dev, mut batch) = setup(4);
        let tex = dev.create_texture(8, 8).id;
        batch.push(quad(tex, 0.0));
        assert_eq!(batch.pending(), 0);
        assert_eq!(batch.end(&mut dev).unwrap(), FlushStats::default());
        assert!(dev.submissions().is_empty());

        // The stray command must not leak into the next real frame.
        batch.begin(Mat4::IDENTITY);
        batch.push(quad(tex, 20.0));
        let stats = batch.end(&mut dev).unwrap();
        assert_eq!(stats.quads, 1);
        assert_eq!(dev.submissions().len(), 1);
        assert_eq!(dev.submissions()[0].draws.len(), 1);
        assert_eq!(dev.submissions()[0].draws[0].index_count, 6);
        assert_eq!(dev.vertices().len(), 4);
        assert_eq!(dev.vertices()[0].position, [20.0, 0.0]);
    }

    #[test]
    fn second_begin_keeps_first_matrix_and_commands() {
        let (mut dev, mut batch) = setup(4);
        let tex = dev.create_texture(8, 8).id;
        let first = Mat4::from_scale(glam::Vec3::splat(2.0));

        batch.begin(first);
        batch.push(quad(tex, 0.0));
        batch.begin(Mat4::IDENTITY);
        assert_eq!(batch.pending(), 1);

        batch.end(&mut dev).unwrap();
        assert_eq!(dev.submissions()[0].uniforms.view_proj, first);
    }

    #[test]
    fn empty_recording_submits_nothing() {
        let (mut dev, mut batch) = setup(4);
        batch.begin(Mat4::IDENTITY);
        let stats = batch.end(&mut dev).unwrap();
        assert_eq!(stats, FlushStats::default());
        assert!(dev.submissions().is_empty());
        assert!(!batch.is_recording());
    }

    // ── bucketing ─────────────────────────────────────────────────────────

    #[test]
    fn one_draw_per_texture_in_first_seen_order() {
        let (mut dev, mut batch) = setup(16);
        let a = dev.create_texture(8, 8).id;
        let b = dev.create_texture(8, 8).id;

        batch.begin(Mat4::IDENTITY);
        batch.push(quad(a, 0.0));
        batch.push(quad(b, 1.0));
        batch.push(quad(a, 2.0));
        batch.push(quad(b, 3.0));
        batch.push(quad(a, 4.0));
        let stats = batch.end(&mut dev).unwrap();

        assert_eq!(stats.submissions, 2);
        assert_eq!(stats.quads, 5);
        let draws = &dev.submissions()[0].draws;
        assert_eq!(
            draws,
            &vec![
                DrawCall { texture: a, first_index: 0, index_count: 18 },
                DrawCall { texture: b, first_index: 18, index_count: 12 },
            ]
        );

        // Bucket A holds quads at x = 0, 2, 4 in push order.
        let xs: Vec<f32> = dev.vertices().chunks(4).map(|q| q[0].position[0]).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0, 1.0, 3.0]);
    }

    #[test]
    fn layers_sort_within_bucket_and_ties_keep_push_order() {
        let (mut dev, mut batch) = setup(16);
        let a = dev.create_texture(8, 8).id;

        batch.begin(Mat4::IDENTITY);
        batch.push(quad(a, 0.0).layer(2));
        batch.push(quad(a, 1.0).layer(-1));
        batch.push(quad(a, 2.0).layer(2));
        batch.push(quad(a, 3.0).layer(0));
        batch.end(&mut dev).unwrap();

        let xs: Vec<f32> = dev.vertices().chunks(4).map(|q| q[0].position[0]).collect();
        assert_eq!(xs, vec![1.0, 3.0, 0.0, 2.0]);
    }

    #[test]
    fn layers_do_not_reorder_buckets() {
        let (mut dev, mut batch) = setup(16);
        let a = dev.create_texture(8, 8).id;
        let b = dev.create_texture(8, 8).id;

        batch.begin(Mat4::IDENTITY);
        batch.push(quad(a, 0.0).layer(10));
        batch.push(quad(b, 1.0).layer(-10));
        batch.end(&mut dev).unwrap();

        let draws = &dev.submissions()[0].draws;
        assert_eq!(draws[0].texture, a);
        assert_eq!(draws[1].texture, b);
    }

    #[test]
    fn invalid_textures_are_dropped() {
        let (mut dev, mut batch) = setup(4);
        let a = dev.create_texture(8, 8).id;
        let gone = dev.create_texture(8, 8).id;
        dev.destroy_texture(gone);

        batch.begin(Mat4::IDENTITY);
        batch.push(quad(TextureId::NONE, 0.0));
        batch.push(quad(gone, 1.0));
        batch.push(quad(a, 2.0));
        let stats = batch.end(&mut dev).unwrap();

        assert_eq!(stats, FlushStats { submissions: 1, quads: 1, dropped: 2 });
        assert_eq!(dev.submissions()[0].draws.len(), 1);
    }

    #[test]
    fn only_invalid_textures_submit_nothing() {
        let (mut dev, mut batch) = setup(4);
        batch.begin(Mat4::IDENTITY);
        batch.push(quad(TextureId::from_raw(99), 0.0));
        let stats = batch.end(&mut dev).unwrap();
        assert_eq!(stats.dropped, 1);
        assert!(dev.submissions().is_empty());
    }

    // ── capacity ──────────────────────────────────────────────────────────

    #[test]
    fn growth_doubles_and_covers_all_quads() {
        let (mut dev, mut batch) = setup(2);
        let a = dev.create_texture(8, 8).id;

        batch.begin(Mat4::IDENTITY);
        for i in 0..5 {
            batch.push(quad(a, i as f32));
        }
        let stats = batch.end(&mut dev).unwrap();

        assert_eq!(batch.capacity_quads(), 8);
        assert_eq!(stats.quads, 5);
        assert_eq!(dev.vertices().len(), 20);
        assert!(dev.buffer_capacity(BufferKind::Vertex) >= 8 * 4 * 32);
        assert_eq!(dev.indices().len(), 8 * 6);
        assert_eq!(&dev.indices()[42..48], &[28, 29, 30, 28, 30, 31]);
    }

    #[test]
    fn indices_upload_once_until_growth() {
        let (mut dev, mut batch) = setup(4);
        let a = dev.create_texture(8, 8).id;

        for _ in 0..2 {
            batch.begin(Mat4::IDENTITY);
            batch.push(quad(a, 0.0));
            batch.end(&mut dev).unwrap();
        }
        assert_eq!(dev.index_uploads(), 1);

        batch.begin(Mat4::IDENTITY);
        for i in 0..6 {
            batch.push(quad(a, i as f32));
        }
        batch.end(&mut dev).unwrap();
        assert_eq!(dev.index_uploads(), 2);
    }

    #[test]
    fn failed_growth_aborts_flush_and_resets() {
        let mut dev = RecordingDevice::with_buffer_limit(4 * 4 * 32);
        let mut batch =
            SpriteBatch::with_device(&mut dev, BatchConfig { initial_quads: 4, ..Default::default() })
                .unwrap();
        let a = dev.create_texture(8, 8).id;

        batch.begin(Mat4::IDENTITY);
        for i in 0..5 {
            batch.push(quad(a, i as f32));
        }
        let err = batch.end(&mut dev).unwrap_err();
        assert!(matches!(err, BatchError::Capacity(DeviceError::CapacityExceeded { .. })));
        assert!(dev.submissions().is_empty());
        assert!(!batch.is_recording());
        assert_eq!(batch.pending(), 0);
        assert_eq!(batch.capacity_quads(), 4);

        // The batch stays usable at its old capacity.
        batch.begin(Mat4::IDENTITY);
        batch.push(quad(a, 0.0));
        assert_eq!(batch.end(&mut dev).unwrap().quads, 1);
    }

    #[test]
    fn init_failure_is_reported() {
        let mut dev = RecordingDevice::with_buffer_limit(64);
        let err = SpriteBatch::with_device(&mut dev, BatchConfig::default()).err();
        assert!(matches!(err, Some(BatchError::Init(_))));
    }

    // ── flush state ───────────────────────────────────────────────────────

    #[test]
    fn config_applies_to_submission_state() {
        let (mut dev, mut batch) = setup(4);
        let a = dev.create_texture(8, 8).id;
        batch.config_mut().sampling = Sampling::Point;
        batch.config_mut().monochrome = 3.0;

        batch.begin(Mat4::IDENTITY);
        batch.push(quad(a, 0.0));
        batch.end(&mut dev).unwrap();

        let uniforms = dev.submissions()[0].uniforms;
        assert_eq!(uniforms.sampling, Sampling::Point);
        assert_eq!(uniforms.monochrome, 1.0);
    }

    #[test]
    fn draw_ex_uses_texel_region_as_uv() {
        let (mut dev, mut batch) = setup(4);
        let tex = dev.create_texture(64, 32);

        batch.begin(Mat4::IDENTITY);
        batch.draw_ex(
            tex.id,
            Rect::new(0.0, 0.0, 16.0, 16.0),
            tex.uv_rect(Rect::new(16.0, 0.0, 16.0, 16.0)),
            Color::WHITE,
            0.0,
            0,
        );
        batch.end(&mut dev).unwrap();

        let v = dev.vertices();
        assert_eq!(v[0].uv, [0.25, 0.0]);
        assert_eq!(v[2].uv, [0.5, 0.5]);
    }

    #[test]
    fn unallocated_batch_allocates_on_first_flush() {
        let mut dev = RecordingDevice::new();
        let mut batch = SpriteBatch::new(BatchConfig { initial_quads: 2, ..Default::default() });
        let a = dev.create_texture(8, 8).id;
        assert_eq!(batch.capacity_quads(), 0);

        batch.begin(Mat4::IDENTITY);
        batch.draw(a, Rect::new(0.0, 0.0, 4.0, 4.0), Rect::UNIT, Color::WHITE);
        batch.end(&mut dev).unwrap();

        assert_eq!(batch.capacity_quads(), 2);
        assert_eq!(dev.indices().len(), 12);
    }
}
