use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoKind {
    /// Colored cube turning about Y over time, ambient shading.
    SpinningCube,
    /// Colored cube with a white marker at the light position.
    LitCube,
    /// OBJ mesh with full Blinn-Phong shading.
    #[default]
    BlinnPhongMesh,
}

impl DemoKind {
    pub const ALL: [DemoKind; 3] = [
        DemoKind::SpinningCube,
        DemoKind::LitCube,
        DemoKind::BlinnPhongMesh,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DemoKind::SpinningCube => "spinning_cube",
            DemoKind::LitCube => "lit_cube",
            DemoKind::BlinnPhongMesh => "blinn_phong_mesh",
        }
    }

    /// Geometry for the main draw item. `mesh` is only used by the mesh demo;
    /// without one it falls back to the cube, drawn white.
    pub fn mesh_source(self, mesh: Option<PathBuf>) -> MeshSource {
        match (self, mesh) {
            (DemoKind::BlinnPhongMesh, Some(path)) => MeshSource::Obj(path),
            _ => MeshSource::Cube,
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DemoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        DemoKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = DemoKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown demo `{s}`, expected one of {}", names.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshSource {
    Cube,
    Obj(PathBuf),
}
