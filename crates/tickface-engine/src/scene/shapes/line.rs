use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// End cap style of a stroked segment.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LineCap {
    /// Flat end exactly at the endpoint.
    Butt,
    /// Half-disc of radius `width / 2` centered on the endpoint.
    #[default]
    Round,
}

/// Stroked line segment payload.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub from: Vec2,
    pub to: Vec2,
    /// Stroke width in logical pixels.
    pub width: f32,
    pub color: Color,
    pub cap: LineCap,
}

impl LineCmd {
    #[inline]
    pub fn new(from: Vec2, to: Vec2, width: f32, color: Color, cap: LineCap) -> Self {
        Self { from, to, width, color, cap }
    }
}

impl DrawList {
    /// Records a stroked segment from `from` to `to`.
    #[inline]
    pub fn push_line(
        &mut self,
        z: ZIndex,
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
        cap: LineCap,
    ) {
        self.push(z, DrawCmd::Line(LineCmd::new(from, to, width, color, cap)));
    }
}
