mod mesh;
mod parse;

pub use mesh::{NormalSource, smooth_normals};
pub use parse::{Corner, Face, ObjData, ObjError, parse_obj};

use anyhow::Context;
use phong_3d::Mesh;
use std::path::Path;

/// Reads an OBJ file into a validated white mesh.
pub fn load_obj(path: &Path) -> anyhow::Result<Mesh> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("reading OBJ file {}", path.display()))?;
    let data = parse_obj(&src).with_context(|| format!("parsing {}", path.display()))?;
    let (mesh, normals) = data.to_mesh();
    mesh.validate()
        .with_context(|| format!("invalid mesh in {}", path.display()))?;

    log::info!(
        "loaded {}: {} vertices, {} triangles, {} tex coords, normals {:?}",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count(),
        data.tex_coords.len(),
        normals
    );
    Ok(mesh)
}
