//! Parsed OBJ tables, before any index is resolved.

use corelib::{Normal, Position, TexCoord};

/// One corner of a face. Indices are already 0-based but not yet bounds-checked,
/// so `0` or negative values in the file show up here as negative numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CornerIndex {
    pub vertex: i64,
    pub texcoord: Option<i64>,
    pub normal: Option<i64>,
}

impl CornerIndex {
    pub fn new(vertex: i64, texcoord: Option<i64>, normal: Option<i64>) -> Self {
        Self {
            vertex,
            texcoord,
            normal,
        }
    }
}

/// Triangle or quad. The fourth corner is the only arity branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub corners: [CornerIndex; 3],
    pub fourth: Option<CornerIndex>,
}

impl Face {
    pub fn triangle(a: CornerIndex, b: CornerIndex, c: CornerIndex) -> Self {
        Self {
            corners: [a, b, c],
            fourth: None,
        }
    }

    pub fn quad(a: CornerIndex, b: CornerIndex, c: CornerIndex, d: CornerIndex) -> Self {
        Self {
            corners: [a, b, c],
            fourth: Some(d),
        }
    }

    #[inline]
    pub fn is_quad(&self) -> bool {
        self.fourth.is_some()
    }

    /// Number of triangles this face emits (1 or 2).
    #[inline]
    pub fn triangle_count(&self) -> usize {
        if self.is_quad() { 2 } else { 1 }
    }
}

/// A line whose leading token was not recognised. Kept for reporting only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownToken {
    /// 1-based.
    pub line_no: usize,
    pub token: String,
}

/// Attribute tables in file order. Faces refer into them by position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub positions: Vec<Position>,
    pub normals: Vec<Normal>,
    pub texcoords: Vec<TexCoord>,
    pub faces: Vec<Face>,
    pub unknown_tokens: Vec<UnknownToken>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices [`crate::mesh::build`] will emit for this model.
    pub fn emitted_vertex_count(&self) -> usize {
        self.faces.iter().map(|f| f.triangle_count() * 3).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitted_count_counts_quads_twice() {
        let c = CornerIndex::new(0, None, None);
        let mut model = Model::new();
        model.faces.push(Face::triangle(c, c, c));
        model.faces.push(Face::quad(c, c, c, c));
        assert_eq!(model.emitted_vertex_count(), 9);
    }

    #[test]
    fn absent_is_not_zero() {
        let absent = CornerIndex::new(0, None, None);
        let zero = CornerIndex::new(0, Some(0), Some(0));
        assert_ne!(absent, zero);
    }
}
