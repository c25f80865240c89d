use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::shapes::{LineCap, LineCmd};
use crate::scene::{DrawCmd, DrawList};

use super::common::{QuadBatch, QuadPipelineDesc};

/// Renderer for `DrawCmd::Line`.
///
/// Segments are drawn as anti-aliased capsules; `LineCap::Round` adds a
/// half-disc at each end, `LineCap::Butt` ends flush with the endpoints.
/// Zero-length segments with round caps render as a dot.
#[derive(Default)]
pub struct LineRenderer {
    batch: QuadBatch,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every `DrawCmd::Line` in `draw_list` into `target`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let instances: Vec<(LineInstance, Option<Rect>)> = draw_list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Line(cmd) => LineInstance::from_cmd(cmd).map(|i| (i, item.clip_rect)),
                _ => None,
            })
            .collect();

        self.batch.draw(&PIPELINE, ctx, target, &instances);
    }
}

/// Instance data layout (48 bytes):
///
///  offset  0  p0      [f32; 2]   loc 1
///  offset  8  p1      [f32; 2]   loc 2
///  offset 16  params  [f32; 2]   loc 3  (.x = half width, .y = round cap flag)
///  offset 24  _pad    [f32; 2]
///  offset 32  color   [f32; 4]   loc 4
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct LineInstance {
    p0: [f32; 2],
    p1: [f32; 2],
    params: [f32; 2],
    _pad: [f32; 2],
    color: [f32; 4],
}

impl LineInstance {
    /// Returns `None` for strokes that cannot produce coverage.
    fn from_cmd(cmd: &LineCmd) -> Option<Self> {
        if !(cmd.width > 0.0) || !cmd.from.is_finite() || !cmd.to.is_finite() {
            return None;
        }
        if cmd.cap == LineCap::Butt && cmd.from == cmd.to {
            return None;
        }

        let round = match cmd.cap {
            LineCap::Round => 1.0,
            LineCap::Butt => 0.0,
        };

        Some(Self {
            p0: [cmd.from.x, cmd.from.y],
            p1: [cmd.to.x, cmd.to.y],
            params: [cmd.width * 0.5, round],
            _pad: [0.0; 2],
            color: cmd.color.to_array(),
        })
    }
}

const LINE_ATTRS: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x2, offset: 0, shader_location: 1 },
    wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x2, offset: 8, shader_location: 2 },
    wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x2, offset: 16, shader_location: 3 },
    wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 32, shader_location: 4 },
];

const PIPELINE: QuadPipelineDesc = QuadPipelineDesc {
    name: "line",
    shader_src: include_str!("shaders/line.wgsl"),
    instance_stride: std::mem::size_of::<LineInstance>() as u64,
    instance_attrs: &LINE_ATTRS,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;

    fn cmd(from: Vec2, to: Vec2, width: f32, cap: LineCap) -> LineCmd {
        LineCmd::new(from, to, width, Color::picton_blue(), cap)
    }

    #[test]
    fn instance_carries_half_width_and_cap() {
        let inst = LineInstance::from_cmd(&cmd(
            Vec2::new(1.0, 2.0),
            Vec2::new(3.0, 4.0),
            4.0,
            LineCap::Round,
        ))
        .unwrap();
        assert_eq!(inst.p0, [1.0, 2.0]);
        assert_eq!(inst.p1, [3.0, 4.0]);
        assert_eq!(inst.params, [2.0, 1.0]);
    }

    #[test]
    fn non_positive_width_is_skipped() {
        let p = Vec2::new(1.0, 1.0);
        assert!(LineInstance::from_cmd(&cmd(Vec2::zero(), p, 0.0, LineCap::Round)).is_none());
        assert!(LineInstance::from_cmd(&cmd(Vec2::zero(), p, f32::NAN, LineCap::Round)).is_none());
    }

    #[test]
    fn degenerate_segment_only_draws_with_round_caps() {
        let p = Vec2::new(5.0, 5.0);
        assert!(LineInstance::from_cmd(&cmd(p, p, 4.0, LineCap::Round)).is_some());
        assert!(LineInstance::from_cmd(&cmd(p, p, 4.0, LineCap::Butt)).is_none());
    }

    #[test]
    fn non_finite_endpoint_is_skipped() {
        let bad = Vec2::new(f32::INFINITY, 0.0);
        assert!(LineInstance::from_cmd(&cmd(bad, Vec2::zero(), 4.0, LineCap::Round)).is_none());
    }

    #[test]
    fn attribute_offsets_match_struct_layout() {
        assert_eq!(std::mem::size_of::<LineInstance>(), 48);
        assert_eq!(LINE_ATTRS[3].offset, 32);
    }
}
