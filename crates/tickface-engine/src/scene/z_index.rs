/// Z-ordering key for draw items. Higher values paint over lower ones.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Background fills of a layer.
    pub const BACKGROUND: ZIndex = ZIndex(0);
    /// Strokes drawn over the background.
    pub const FOREGROUND: ZIndex = ZIndex(1);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}
