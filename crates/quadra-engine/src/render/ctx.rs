/// Renderer-facing context (device/queue + surface format).
///
/// Device bring-up lives outside this crate; callers build this from the
/// objects they already own.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue, surface_format: wgpu::TextureFormat) -> Self {
        Self { device, queue, surface_format }
    }
}
