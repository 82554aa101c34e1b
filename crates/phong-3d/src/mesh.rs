use bytemuck::{Pod, Zeroable};
use std::fmt;
use wgpu::util::DeviceExt;
use wgpu::{Buffer, BufferUsages, Device};

/// Cube corners, front face (z = +1) first, then the back face.
pub const CUBE_POSITIONS: [[f32; 3]; 8] = [
    [-1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
];

pub const CUBE_COLORS: [[f32; 3]; 8] = [
    [0.0, 1.0, 1.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
];

/// Six faces, two triangles each.
pub const CUBE_INDICES: [u32; 36] = [
    3, 2, 6, 6, 7, 3, //
    4, 5, 1, 1, 0, 4, //
    4, 0, 3, 3, 7, 4, //
    1, 5, 6, 6, 2, 1, //
    0, 1, 2, 2, 3, 0, //
    7, 6, 5, 5, 4, 7,
];

/// Corners of the small cube marking the light, spanning [1.5, 2] on every axis.
pub const LIGHT_MARKER_POSITIONS: [[f32; 3]; 8] = [
    [1.5, 2.0, 2.0],
    [1.5, 1.5, 2.0],
    [2.0, 1.5, 2.0],
    [2.0, 2.0, 2.0],
    [1.5, 2.0, 1.5],
    [1.5, 1.5, 1.5],
    [2.0, 1.5, 1.5],
    [2.0, 2.0, 1.5],
];

pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    Empty,
    LengthMismatch {
        positions: usize,
        normals: usize,
        colors: usize,
    },
    PartialTriangle {
        indices: usize,
    },
    IndexOutOfRange {
        slot: usize,
        index: u32,
        vertex_count: usize,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::Empty => write!(f, "mesh has no triangles"),
            MeshError::LengthMismatch {
                positions,
                normals,
                colors,
            } => write!(
                f,
                "attribute length mismatch: {positions} positions, {normals} normals, {colors} colors"
            ),
            MeshError::PartialTriangle { indices } => {
                write!(f, "{indices} indices do not form whole triangles")
            }
            MeshError::IndexOutOfRange {
                slot,
                index,
                vertex_count,
            } => write!(
                f,
                "index {index} at slot {slot} is out of range for {vertex_count} vertices"
            ),
        }
    }
}

impl std::error::Error for MeshError {}

/// CPU-side indexed triangle mesh. Attribute arrays are parallel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// The colored unit cube. Normals point from the center through each corner.
    pub fn cube() -> Self {
        Self {
            positions: CUBE_POSITIONS.to_vec(),
            normals: CUBE_POSITIONS.to_vec(),
            colors: CUBE_COLORS.to_vec(),
            indices: CUBE_INDICES.to_vec(),
        }
    }

    pub fn light_marker() -> Self {
        let center = glam::Vec3::splat(1.75);
        let normals = LIGHT_MARKER_POSITIONS
            .iter()
            .map(|p| (glam::Vec3::from_array(*p) - center).to_array())
            .collect();

        Self {
            positions: LIGHT_MARKER_POSITIONS.to_vec(),
            normals,
            colors: vec![WHITE; LIGHT_MARKER_POSITIONS.len()],
            indices: CUBE_INDICES.to_vec(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn with_uniform_color(mut self, color: [f32; 3]) -> Self {
        self.colors = vec![color; self.positions.len()];
        self
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.is_empty() {
            return Err(MeshError::Empty);
        }
        let n = self.positions.len();
        if self.normals.len() != n || self.colors.len() != n {
            return Err(MeshError::LengthMismatch {
                positions: n,
                normals: self.normals.len(),
                colors: self.colors.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle {
                indices: self.indices.len(),
            });
        }
        if let Some((slot, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= n)
        {
            return Err(MeshError::IndexOutOfRange {
                slot,
                index,
                vertex_count: n,
            });
        }
        Ok(())
    }

    /// Interleaves the attribute arrays into GPU vertices.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.colors)
            .map(|((position, normal), color)| Vertex {
                position: *position,
                normal: *normal,
                color: *color,
            })
            .collect()
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x3  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub struct GpuMesh {
    pub vbuf: Buffer,
    pub ibuf: Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &Device, label: &str, mesh: &Mesh) -> Self {
        let vertices = mesh.vertices();
        let vbuf_label = format!("{label}_vbuf");
        let ibuf_label = format!("{label}_ibuf");
        let vbuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(vbuf_label.as_str()),
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::VERTEX,
        });
        let ibuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(ibuf_label.as_str()),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: BufferUsages::INDEX,
        });

        Self {
            vbuf,
            ibuf,
            index_count: mesh.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_indices_stay_within_eight_vertices() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.indices.iter().all(|&i| i <= 7));
        assert!(cube.validate().is_ok());
    }

    #[test]
    fn cube_uses_every_corner() {
        let cube = Mesh::cube();
        for corner in 0..8u32 {
            assert!(cube.indices.contains(&corner), "corner {corner} unused");
        }
    }

    #[test]
    fn light_marker_is_white_and_valid() {
        let marker = Mesh::light_marker();
        assert!(marker.validate().is_ok());
        assert!(marker.colors.iter().all(|c| *c == WHITE));
        for p in &marker.positions {
            assert!(p.iter().all(|v| (1.5..=2.0).contains(v)));
        }
    }

    #[test]
    fn validate_rejects_out_of_range_index() {
        let mut cube = Mesh::cube();
        cube.indices[5] = 8;
        assert_eq!(
            cube.validate(),
            Err(MeshError::IndexOutOfRange {
                slot: 5,
                index: 8,
                vertex_count: 8
            })
        );
    }

    #[test]
    fn validate_rejects_mismatched_attributes() {
        let mut cube = Mesh::cube();
        cube.colors.pop();
        assert!(matches!(
            cube.validate(),
            Err(MeshError::LengthMismatch { colors: 7, .. })
        ));
    }

    #[test]
    fn validate_rejects_partial_triangle() {
        let mut cube = Mesh::cube();
        cube.indices.pop();
        assert_eq!(
            cube.validate(),
            Err(MeshError::PartialTriangle { indices: 35 })
        );
    }

    #[test]
    fn validate_rejects_empty() {
        assert_eq!(Mesh::default().validate(), Err(MeshError::Empty));
    }

    #[test]
    fn uniform_color_covers_every_vertex() {
        let mesh = Mesh::cube().with_uniform_color(WHITE);
        assert_eq!(mesh.colors.len(), 8);
        assert!(mesh.colors.iter().all(|c| *c == WHITE));
    }

    #[test]
    fn vertices_interleave_attributes() {
        let cube = Mesh::cube();
        let vertices = cube.vertices();
        assert_eq!(vertices.len(), 8);
        assert_eq!(vertices[6].position, [1.0, -1.0, -1.0]);
        assert_eq!(vertices[6].color, [1.0, 0.0, 0.0]);
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
    }
}
