//! Asset loading/parsers.
//! Wavefront OBJ meshes flattened into non-indexed, render-ready vertex buffers.

pub mod corners;
pub mod mesh;
pub mod model;
pub mod obj;

pub use corners::{Corner, CornerReport};
pub use mesh::{MeshBuffer, Vertex};
pub use model::Model;
pub use obj::{LoadedMesh, load_obj_from_path, load_obj_from_reader, load_obj_from_str};
