//! Core types: math re-exports, mesh attribute aliases, load errors.

pub use glam::{Vec2, Vec3};

pub mod error;

pub use error::{Attribute, LoadError, LoadResult};

/// Vertex position in object space.
pub type Position = Vec3;
/// Vertex normal. Not normalised by the loader.
pub type Normal = Vec3;
/// Texture coordinate (u, v).
pub type TexCoord = Vec2;

/// Normal used when a face corner has no normal reference.
pub const DEFAULT_NORMAL: Normal = Vec3::Z;
/// Texture coordinate used when a face corner has no texcoord reference.
pub const DEFAULT_TEXCOORD: TexCoord = Vec2::ZERO;
