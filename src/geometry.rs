//! Flat vertex arrays for the renderer.

use bytemuck::{Pod, Zeroable};
use ultraviolet::{Vec2, Vec3};

use crate::layout::LayoutOutput;

/// Facing direction shared by every text vertex.
pub const TEXT_NORMAL: Vec3 = Vec3 {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

/// Parallel point/normal/uv arrays plus one four-index polygon per glyph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub points: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub polygons: Vec<[u32; 4]>,
}

/// Appends every quad in layout order.
pub fn emit(layout: &LayoutOutput) -> Geometry {
    let n = layout.quads.len();
    let mut geometry = Geometry {
        points: Vec::with_capacity(n * 4),
        normals: Vec::with_capacity(n * 4),
        uvs: Vec::with_capacity(n * 4),
        polygons: Vec::with_capacity(n),
    };
    for quad in &layout.quads {
        let base = geometry.points.len() as u32;
        geometry.points.extend_from_slice(&quad.positions);
        geometry.normals.extend_from_slice(&[TEXT_NORMAL; 4]);
        geometry.uvs.extend_from_slice(&quad.uvs);
        geometry.polygons.push([base, base + 1, base + 2, base + 3]);
    }
    geometry
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GlyphVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[cfg(feature = "gpu")]
impl GlyphVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2, // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Interleaved vertices, ready for `bytemuck::cast_slice`.
    pub fn vertices(&self) -> Vec<GlyphVertex> {
        self.points
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| GlyphVertex {
                position: [p.x, p.y, p.z],
                normal: [n.x, n.y, n.z],
                uv: [uv.x, uv.y],
            })
            .collect()
    }

    /// Two counter-clockwise triangles per polygon.
    pub fn indices(&self) -> Vec<u32> {
        self.polygons
            .iter()
            .flat_map(|&[a, b, c, d]| [a, b, c, a, c, d])
            .collect()
    }
}
