//! Fills convex polygons with flat colors.
//!
//! Polygons are queued with [`Renderer::fill_polygon`], triangulated as fans
//! on the CPU and drawn in one pass by [`Renderer::render`].

use crate::config::Color;
use bytemuck::{bytes_of, cast_slice, Pod, Zeroable};
use sat_core::P2;

#[derive(Debug)]
pub struct Renderer {
    /// Width of the scene, in scene units.
    area_width: f32,
    /// Height of the scene, in scene units.
    area_height: f32,
    background: Color,
    render_pipeline: wgpu::RenderPipeline,
    viewport_layout: wgpu::BindGroupLayout,
    viewport_buffer: wgpu::Buffer,
    vertex_capacity: u32,
    vertex_buffer: wgpu::Buffer,
    /// Triangle vertices queued for the next frame.
    queued: FrameVertices,
}

impl Renderer {
    /// Creates a new `Renderer`.
    ///
    /// # Parameters
    ///
    /// - `device`: WGPU Device for rendering.
    /// - `texture_format`: Format of the surface texture rendered into.
    /// - `area_width`: Width of the scene that maps onto the surface.
    /// - `area_height`: Height of the scene that maps onto the surface.
    /// - `background`: Clear color.
    pub fn new(
        device: &wgpu::Device,
        texture_format: wgpu::TextureFormat,
        area_width: u32,
        area_height: u32,
        background: Color,
    ) -> Self {
        const DEFAULT_VERTEX_CAPACITY: u32 = 64;

        let viewport_layout = create_viewport_layout(device);
        let render_pipeline = create_render_pipeline(device, texture_format, &viewport_layout);

        assert!(area_width > 0);
        assert!(area_height > 0);

        Renderer {
            area_width: area_width as f32,
            area_height: area_height as f32,
            background,
            render_pipeline,
            viewport_layout,
            viewport_buffer: create_viewport_buffer(device),
            vertex_capacity: DEFAULT_VERTEX_CAPACITY,
            vertex_buffer: create_vertex_buffer(device, DEFAULT_VERTEX_CAPACITY),
            queued: FrameVertices::default(),
        }
    }

    /// Starts a new frame, dropping anything queued for a frame that was
    /// never rendered.
    pub fn begin_frame(&mut self) {
        self.queued.clear();
    }

    /// Queues a convex polygon to be filled.
    ///
    /// Fewer than three vertices cover no area and draw nothing.
    pub fn fill_polygon(&mut self, vertices: &[P2], color: Color) {
        self.queued.fill_polygon(vertices, color);
    }

    /// Clears the output and draws every queued polygon, emptying the queue.
    ///
    /// # Parameters
    ///
    /// - `device`: WGPU Device to use.
    /// - `encoder`: Command encoder to which commands should be submitted.
    /// - `queue`: WGPU Queue to use.
    /// - `output_texture`: Texture view to write the output.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        output_texture: &wgpu::TextureView,
    ) {
        let viewport = Viewport {
            size: [self.area_width, self.area_height],
            _padding: [0.0, 0.0],
        };
        queue.write_buffer(&self.viewport_buffer, 0, bytes_of(&viewport));

        let vertices = self.queued.take();
        let n_vertices = vertices.len() as u32;
        if n_vertices > self.vertex_capacity {
            self.grow_vertices(device, n_vertices.next_power_of_two());
        }
        if n_vertices > 0 {
            queue.write_buffer(&self.vertex_buffer, 0, cast_slice(&vertices));
        }

        let viewport_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("SAT: Viewport bind group."),
            layout: &self.viewport_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: self.viewport_buffer.as_entire_binding(),
            }],
        });

        let color_attachment = wgpu::RenderPassColorAttachment {
            view: output_texture,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.background.into()),
                store: wgpu::StoreOp::Store,
            },
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("SAT: Polygon render pass"),
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if n_vertices > 0 {
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &viewport_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..n_vertices, 0..1);
        }
    }

    /// Grow the vertex buffer to a new size.
    fn grow_vertices(&mut self, device: &wgpu::Device, new_capacity: u32) {
        assert!(new_capacity > self.vertex_capacity);
        self.vertex_buffer = create_vertex_buffer(device, new_capacity);
        self.vertex_capacity = new_capacity;
    }
}

/// Triangle vertices queued for one frame.
#[derive(Debug, Default)]
struct FrameVertices {
    vertices: Vec<GpuVertex>,
}
impl FrameVertices {
    fn clear(&mut self) {
        self.vertices.clear();
    }

    fn fill_polygon(&mut self, vertices: &[P2], color: Color) {
        self.vertices.extend(fan_triangles(vertices, color));
    }

    /// Removes and returns everything queued.
    fn take(&mut self) -> Vec<GpuVertex> {
        std::mem::take(&mut self.vertices)
    }
}

/// Splits a convex polygon into a triangle fan around its first vertex.
fn fan_triangles(vertices: &[P2], color: Color) -> Vec<GpuVertex> {
    let color = color.as_array();
    let vertex = |p: &P2| GpuVertex {
        position: [p.x as f32, p.y as f32],
        color,
    };
    match vertices.split_first() {
        Some((first, rest)) if rest.len() >= 2 => rest
            .windows(2)
            .flat_map(|pair| [vertex(first), vertex(&pair[0]), vertex(&pair[1])])
            .collect(),
        _ => Vec::new(),
    }
}

/// Create the render pipeline.
fn create_render_pipeline(
    device: &wgpu::Device,
    texture_format: wgpu::TextureFormat,
    viewport_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::include_wgsl!("polygon_fill.wgsl"));

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("SAT: Polygon render pipeline layout."),
        bind_group_layouts: &[viewport_layout],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("SAT: Polygon render pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[GpuVertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: texture_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Fans keep the winding of their polygon, which may be either.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

/// Create the bind group layout for the viewport uniform.
fn create_viewport_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("SAT: Viewport bind group layout."),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            count: None,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
        }],
    })
}

/// Create the viewport uniform buffer.
fn create_viewport_buffer(device: &wgpu::Device) -> wgpu::Buffer {
    use wgpu::util::DeviceExt;
    let viewport: Viewport = Default::default();
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("SAT: Viewport uniform"),
        contents: bytes_of(&viewport),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Create the vertex buffer.
///
/// # Parameters
///
/// - `device`: WGPU Device.
/// - `capacity`: Number of `GpuVertex` structs that the buffer can store.
fn create_vertex_buffer(device: &wgpu::Device, capacity: u32) -> wgpu::Buffer {
    use wgpu::BufferAddress;
    let struct_sz = std::mem::size_of::<GpuVertex>() as BufferAddress;

    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("SAT: Polygon vertex buffer"),
        size: struct_sz * capacity as BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// GPU version of the viewport information, for the viewport uniform buffer.
#[repr(C)]
#[derive(Default, Debug, Copy, Clone, Pod, Zeroable)]
struct Viewport {
    size: [f32; 2],
    _padding: [f32; 2],
}

/// One corner of a filled triangle.
#[repr(C)]
#[derive(Default, Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct GpuVertex {
    position: [f32; 2], // 8 bytes
    color: [f32; 4],    // 16 bytes
}
impl GpuVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_fans_into_two_triangles() {
        let rect = [
            P2::new(0.0, 0.0),
            P2::new(2.0, 0.0),
            P2::new(2.0, 1.0),
            P2::new(0.0, 1.0),
        ];
        let triangles = fan_triangles(&rect, Color::RED);
        let positions: Vec<[f32; 2]> = triangles.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![
                [0.0, 0.0],
                [2.0, 0.0],
                [2.0, 1.0],
                [0.0, 0.0],
                [2.0, 1.0],
                [0.0, 1.0],
            ]
        );
        assert!(triangles.iter().all(|v| v.color == [1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_degenerate_polygons_draw_nothing() {
        assert!(fan_triangles(&[], Color::WHITE).is_empty());
        assert!(fan_triangles(&[P2::new(1.0, 1.0)], Color::WHITE).is_empty());
        assert!(fan_triangles(&[P2::new(1.0, 1.0), P2::new(2.0, 2.0)], Color::WHITE).is_empty());
    }

    fn rect() -> [P2; 4] {
        [
            P2::new(0.0, 0.0),
            P2::new(2.0, 0.0),
            P2::new(2.0, 1.0),
            P2::new(0.0, 1.0),
        ]
    }

    /// Frames that were queued but never rendered are not carried into the
    /// next one.
    #[test]
    fn test_unrendered_frames_do_not_accumulate() {
        let mut queued = FrameVertices::default();
        for _ in 0..3 {
            queued.clear();
            queued.fill_polygon(&rect(), Color::WHITE);
            queued.fill_polygon(&rect(), Color::CYAN);
        }
        assert_eq!(queued.vertices.len(), 12);

        let drawn = queued.take();
        assert_eq!(drawn.len(), 12);
        assert!(queued.vertices.is_empty());
    }

    #[test]
    fn test_gpu_vertex_layout_size() {
        assert_eq!(std::mem::size_of::<GpuVertex>(), 24);
        assert_eq!(std::mem::size_of::<Viewport>(), 16);
    }
}
