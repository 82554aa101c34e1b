pub mod depth;
pub mod mesh;
pub mod pipeline;
pub mod render;
pub mod uniform;

pub use depth::create_depth;
pub use mesh::{GpuMesh, Mesh, MeshError, Vertex, WHITE};
pub use pipeline::{Layouts, create_bind_group_layouts, create_pipeline};
pub use render::{CanvasRenderer, DrawItem, clear_target};
pub use uniform::{FrameUniform, Light, Material};
