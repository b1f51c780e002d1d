use std::collections::HashSet;

use crate::batch::SpriteVertex;

use super::device::{
    BufferKind, DeviceError, FrameUniforms, GraphicsDevice, Texture, TextureId, TextureRegistry,
};

/// One `draw_indexed` call as seen by the device.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub texture: TextureId,
    pub first_index: u32,
    pub index_count: u32,
}

/// One completed `begin_submission` .. `end_submission` span.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub uniforms: FrameUniforms,
    pub draws: Vec<DrawCall>,
}

/// Headless [`GraphicsDevice`] that records every call.
///
/// Used for tests and tools that need the batch output without a GPU.
/// An optional per-buffer byte limit makes growth failures reproducible.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    next_texture: u32,
    textures: HashSet<TextureId>,

    buffer_limit: Option<u64>,
    vertex_capacity: u64,
    index_capacity: u64,

    vertex_bytes: Vec<u8>,
    index_bytes: Vec<u8>,
    index_uploads: usize,

    open: Option<Submission>,
    submissions: Vec<Submission>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device that refuses any buffer larger than `bytes`.
    pub fn with_buffer_limit(bytes: u64) -> Self {
        Self { buffer_limit: Some(bytes), ..Self::default() }
    }

    /// Registers a texture of the given size and returns its handle.
    pub fn create_texture(&mut self, width: u32, height: u32) -> Texture {
        self.next_texture += 1;
        let id = TextureId::from_raw(self.next_texture);
        self.textures.insert(id);
        Texture { id, width, height }
    }

    /// Invalidates `id`; later draws referencing it are dropped by the batch.
    pub fn destroy_texture(&mut self, id: TextureId) {
        self.textures.remove(&id);
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Total indexed draws across all submissions.
    pub fn draw_count(&self) -> usize {
        self.submissions.iter().map(|s| s.draws.len()).sum()
    }

    pub fn clear_submissions(&mut self) {
        self.submissions.clear();
    }

    pub fn buffer_capacity(&self, kind: BufferKind) -> u64 {
        match kind {
            BufferKind::Vertex => self.vertex_capacity,
            BufferKind::Index => self.index_capacity,
        }
    }

    /// Vertices from the most recent vertex upload.
    pub fn vertices(&self) -> Vec<SpriteVertex> {
        bytemuck::pod_collect_to_vec(&self.vertex_bytes)
    }

    /// Indices from the most recent index upload.
    pub fn indices(&self) -> Vec<u32> {
        bytemuck::pod_collect_to_vec(&self.index_bytes)
    }

    /// Number of index uploads so far.
    pub fn index_uploads(&self) -> usize {
        self.index_uploads
    }
}

impl TextureRegistry for RecordingDevice {
    fn texture_valid(&self, texture: TextureId) -> bool {
        self.textures.contains(&texture)
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_or_grow_buffer(&mut self, kind: BufferKind, size_bytes: u64) -> Result<(), DeviceError> {
        if let Some(limit) = self.buffer_limit {
            if size_bytes > limit {
                return Err(DeviceError::CapacityExceeded { kind, requested: size_bytes, limit });
            }
        }
        let cap = match kind {
            BufferKind::Vertex => &mut self.vertex_capacity,
            BufferKind::Index => &mut self.index_capacity,
        };
        if size_bytes > *cap {
            *cap = size_bytes;
        }
        Ok(())
    }

    fn begin_submission(&mut self, uniforms: &FrameUniforms) {
        if self.open.is_some() {
            log::warn!("recording device: begin_submission while a submission is open");
        }
        self.open = Some(Submission { uniforms: *uniforms, draws: Vec::new() });
    }

    fn upload_dynamic(&mut self, kind: BufferKind, bytes: &[u8]) {
        debug_assert!(
            bytes.len() as u64 <= self.buffer_capacity(kind),
            "{kind:?} upload of {} bytes exceeds capacity",
            bytes.len()
        );
        match kind {
            BufferKind::Vertex => self.vertex_bytes = bytes.to_vec(),
            BufferKind::Index => {
                self.index_bytes = bytes.to_vec();
                self.index_uploads += 1;
            }
        }
    }

    fn draw_indexed(&mut self, texture: TextureId, first_index: u32, index_count: u32) {
        match self.open.as_mut() {
            Some(s) => s.draws.push(DrawCall { texture, first_index, index_count }),
            None => log::warn!("recording device: draw outside a submission ignored"),
        }
    }

    fn end_submission(&mut self) {
        if let Some(s) = self.open.take() {
            self.submissions.push(s);
        }
    }
}
