use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{QuadBatch, QuadPipelineDesc};

/// Filled rectangle renderer.
///
/// Geometry is provided as logical pixels, converted to NDC in the vertex shader.
/// Color is expected to be premultiplied RGBA (`paint::Color`).
#[derive(Default)]
pub struct RectRenderer {
    batch: QuadBatch,
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every `DrawCmd::Rect` in `draw_list` into `target`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let instances: Vec<(RectInstance, Option<Rect>)> = draw_list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Rect(cmd) => {
                    let r = cmd.rect.normalized();
                    (!r.is_empty() && r.is_finite()).then(|| {
                        let inst = RectInstance {
                            origin: [r.origin.x, r.origin.y],
                            size: [r.size.x, r.size.y],
                            color: cmd.color.to_array(),
                        };
                        (inst, item.clip_rect)
                    })
                }
                _ => None,
            })
            .collect();

        self.batch.draw(&PIPELINE, ctx, target, &instances);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

const RECT_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    1 => Float32x2, // origin
    2 => Float32x2, // size
    3 => Float32x4  // color
];

const PIPELINE: QuadPipelineDesc = QuadPipelineDesc {
    name: "rect",
    shader_src: include_str!("shaders/rect.wgsl"),
    instance_stride: std::mem::size_of::<RectInstance>() as u64,
    instance_attrs: &RECT_ATTRS,
};
