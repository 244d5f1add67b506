//! Vertex types for presenting the frame

use bytemuck::{Pod, Zeroable};

/// 2D vertex with texture coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// NDC half-extents that fit a `frame` aspect ratio inside a `surface`
pub fn letterbox(frame: (u32, u32), surface: (u32, u32)) -> (f32, f32) {
    let frame_aspect = frame.0 as f32 / frame.1 as f32;
    let surface_aspect = surface.0 as f32 / surface.1.max(1) as f32;
    if surface_aspect > frame_aspect {
        // Surface is wider: bars left and right
        (frame_aspect / surface_aspect, 1.0)
    } else {
        (1.0, surface_aspect / frame_aspect)
    }
}

/// Two triangles covering `[-sx, sx] x [-sy, sy]`; texture v runs top to bottom
pub fn quad(sx: f32, sy: f32) -> [Vertex; 6] {
    let top_left = Vertex::new(-sx, sy, 0.0, 0.0);
    let top_right = Vertex::new(sx, sy, 1.0, 0.0);
    let bottom_left = Vertex::new(-sx, -sy, 0.0, 1.0);
    let bottom_right = Vertex::new(sx, -sy, 1.0, 1.0);
    [top_left, bottom_left, bottom_right, top_left, bottom_right, top_right]
}
