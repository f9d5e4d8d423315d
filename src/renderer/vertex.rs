//! Vertex types for 2D sprite rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with texture coordinates, tint and a desaturate factor
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    /// 0 = full colour, 1 = greyscale
    pub desaturate: f32,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4], desaturate: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
            desaturate,
        }
    }

    /// Untextured vertex (samples the white texel)
    pub const fn flat(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self::new(x, y, 0.0, 0.0, color, 0.0)
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4, 3 => Float32];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for game elements and sprite fallbacks
pub mod colors {
    pub const SKY: [f32; 4] = [0.80, 0.90, 1.0, 1.0];
    pub const SNOW: [f32; 4] = [0.96, 0.97, 1.0, 1.0];
    pub const TRAIL: [f32; 4] = [0.55, 0.65, 0.80, 1.0];
    pub const TREE: [f32; 4] = [0.10, 0.45, 0.20, 1.0];
    pub const SNOWMAN: [f32; 4] = [0.92, 0.94, 0.98, 1.0];
    pub const AVALANCHE_WALL: [f32; 4] = [0.93, 0.95, 1.0, 0.85];
    pub const AVALANCHE_GLOW: [f32; 4] = [1.0, 0.30, 0.25, 1.0];
    pub const HEART: [f32; 4] = [0.90, 0.15, 0.20, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
