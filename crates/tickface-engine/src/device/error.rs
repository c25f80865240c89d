/// What the runtime does after a surface acquisition error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; the next frame can be acquired.
    Reconfigured,
    /// Transient (timeout, occlusion); drop this frame only.
    SkipFrame,
    /// Out of memory or a lost device; the watch window closes.
    Fatal,
}

impl SurfaceErrorAction {
    #[inline]
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}
