use crate::parse::ObjData;
use glam::Vec3;
use phong_3d::{Mesh, WHITE};

/// Where the per-vertex normals of a converted mesh came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalSource {
    /// One `vn` per `v`, taken in file order.
    Parallel,
    /// Remapped from the `vn` referenced by each face corner.
    FaceCorners,
    /// Area-weighted average of adjacent face normals.
    Computed,
}

impl ObjData {
    /// Fan-triangulates the faces into an indexed mesh colored `WHITE`.
    pub fn to_mesh(&self) -> (Mesh, NormalSource) {
        let mut indices = Vec::new();
        for face in &self.faces {
            let first = face.corners[0].v as u32;
            for pair in face.corners[1..].windows(2) {
                indices.extend_from_slice(&[first, pair[0].v as u32, pair[1].v as u32]);
            }
        }

        let (normals, source) = self.vertex_normals(&indices);
        let mesh = Mesh {
            positions: self.positions.clone(),
            normals,
            colors: Vec::new(),
            indices,
        }
        .with_uniform_color(WHITE);

        (mesh, source)
    }

    fn vertex_normals(&self, indices: &[u32]) -> (Vec<[f32; 3]>, NormalSource) {
        if !self.normals.is_empty() && self.normals.len() == self.positions.len() {
            return (self.normals.clone(), NormalSource::Parallel);
        }

        let has_corner_normals = self
            .faces
            .iter()
            .flat_map(|f| &f.corners)
            .all(|c| c.vn.is_some());
        if has_corner_normals && !self.faces.is_empty() {
            let mut normals = vec![[0.0; 3]; self.positions.len()];
            for c in self.faces.iter().flat_map(|f| &f.corners) {
                if let Some(vn) = c.vn {
                    normals[c.v] = self.normals[vn];
                }
            }
            // vertices no face references keep a zero normal
            return (normals, NormalSource::FaceCorners);
        }

        (
            smooth_normals(&self.positions, indices),
            NormalSource::Computed,
        )
    }
}

pub fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let p0 = Vec3::from_array(positions[a]);
        let p1 = Vec3::from_array(positions[b]);
        let p2 = Vec3::from_array(positions[c]);
        // cross product length is twice the triangle area
        let n = (p1 - p0).cross(p2 - p0);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| n.normalize_or_zero().to_array())
        .collect()
}
