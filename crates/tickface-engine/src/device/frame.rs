/// One acquired swapchain image plus the encoder recording into it.
///
/// Hold it only for the duration of a frame; the next acquisition waits on it.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
