//! Render layer
//!
//! Concrete geometry resources and the draw commands they record. No GPU
//! submission happens here; a backend consumes the recorded commands.

mod commands;
mod mesh;

pub use commands::DrawCommand;
pub use mesh::{MeshGeometry, Vertex};
