/// Drawable size of a window in logical pixels.
///
/// Shaders map logical positions to NDC against this size; scissor rects are
/// derived from it through [`physical_size`](Self::physical_size).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Size in device pixels at `scale`, never smaller than 1x1.
    #[inline]
    pub fn physical_size(self, scale: f32) -> (u32, u32) {
        (
            (self.width * scale).max(1.0) as u32,
            (self.height * scale).max(1.0) as u32,
        )
    }
}
