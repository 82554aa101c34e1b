use crate::depth::create_depth;
use crate::mesh::{GpuMesh, Mesh};
use crate::pipeline::{Layouts, create_bind_group_layouts, create_pipeline};
use crate::uniform::FrameUniform;
use wgpu::*;

/// One mesh plus its own uniform block; drawn with a single indexed call.
pub struct DrawItem {
    pub mesh: GpuMesh,
    pub frame_buf: Buffer,
    pub frame_bg: BindGroup,
}

impl DrawItem {
    fn new(device: &Device, layouts: &Layouts, label: &str, mesh: &Mesh) -> Self {
        let mesh = GpuMesh::upload(device, label, mesh);
        let frame_buf = device.create_buffer(&BufferDescriptor {
            label: Some("frame_ubo"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bg = device.create_bind_group(&BindGroupDescriptor {
            label: Some("frame_bg"),
            layout: &layouts.frame_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: frame_buf.as_entire_binding(),
            }],
        });

        Self {
            mesh,
            frame_buf,
            frame_bg,
        }
    }
}

/// Renders the canvas contents into an offscreen color target.
pub struct CanvasRenderer {
    pub render_pipeline: RenderPipeline,
    pub depth_view: TextureView,
    pub depth_tex: Texture,
    pub items: Vec<DrawItem>,
}

impl CanvasRenderer {
    /// `meshes` are expected to be validated; each becomes one draw item in order.
    pub fn new(
        device: &Device,
        target_format: TextureFormat,
        width: u32,
        height: u32,
        meshes: &[(&str, &Mesh)],
    ) -> Self {
        let layouts = create_bind_group_layouts(device);
        let render_pipeline = create_pipeline(device, target_format, &layouts);
        let (depth_view, depth_tex) = create_depth(device, width, height);

        let items = meshes
            .iter()
            .map(|(label, mesh)| DrawItem::new(device, &layouts, label, mesh))
            .collect();

        Self {
            render_pipeline,
            depth_view,
            depth_tex,
            items,
        }
    }

    /// Writes one uniform block per item. Extra uniforms are ignored, missing
    /// ones leave the item's previous contents in place.
    pub fn prepare(&self, queue: &Queue, uniforms: &[FrameUniform]) {
        for (item, uniform) in self.items.iter().zip(uniforms) {
            queue.write_buffer(&item.frame_buf, 0, bytemuck::bytes_of(uniform));
        }
    }

    pub fn render(&self, encoder: &mut CommandEncoder, target_view: &TextureView, clear: Color) {
        let mut r_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("canvas_pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: target_view,
                depth_slice: None,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(clear),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        r_pass.set_pipeline(&self.render_pipeline);
        for item in &self.items {
            r_pass.set_bind_group(0, &item.frame_bg, &[]);
            r_pass.set_vertex_buffer(0, item.mesh.vbuf.slice(..));
            r_pass.set_index_buffer(item.mesh.ibuf.slice(..), IndexFormat::Uint32);
            r_pass.draw_indexed(0..item.mesh.index_count, 0, 0..1);
        }
    }
}

/// Clears `target_view` without drawing; used while the canvas is disabled.
pub fn clear_target(encoder: &mut CommandEncoder, target_view: &TextureView, clear: Color) {
    let _ = encoder.begin_render_pass(&RenderPassDescriptor {
        label: Some("canvas_clear_pass"),
        color_attachments: &[Some(RenderPassColorAttachment {
            view: target_view,
            depth_slice: None,
            resolve_target: None,
            ops: Operations {
                load: LoadOp::Clear(clear),
                store: StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
}
