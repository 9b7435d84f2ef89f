//! Flat, render-ready vertex buffers and the face resolver that produces them.

use bytemuck::{Pod, Zeroable};
use corelib::{Attribute, DEFAULT_NORMAL, DEFAULT_TEXCOORD, LoadError, LoadResult, Position};

use crate::{
    corners::CornerReport,
    model::{CornerIndex, Model},
};

/// Vertex with position/normal/uv. Values are in object space.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
    pub const POSITION_OFFSET: usize = std::mem::offset_of!(Vertex, position);
    pub const NORMAL_OFFSET: usize = std::mem::offset_of!(Vertex, normal);
    pub const UV_OFFSET: usize = std::mem::offset_of!(Vertex, uv);

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

impl Default for Vertex {
    /// Origin with the loader's default normal and texcoord.
    fn default() -> Self {
        Self::new(
            Position::ZERO.to_array(),
            DEFAULT_NORMAL.to_array(),
            DEFAULT_TEXCOORD.to_array(),
        )
    }
}

/// Non-indexed triangle list: every three vertices form one triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<Vertex>,
}

impl MeshBuffer {
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
        }
    }

    fn push_triangle(&mut self, tri: [Vertex; 3]) {
        self.vertices.extend_from_slice(&tri);
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }

    /// Number of vertices to draw.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex; 3]> {
        self.vertices
            .chunks_exact(3)
            .filter_map(|tri| <&[Vertex; 3]>::try_from(tri).ok())
    }

    /// Raw bytes for a GPU upload, `Vertex::STRIDE` bytes per vertex.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Resolve every face of `model` into a flat vertex list.
///
/// Triangles keep their declared winding. Quads are fanned from the first
/// corner into (0, 1, 2) and (0, 2, 3). Vertices are never shared between faces.
/// When `diagnostics` is set, the texcoord corner scan runs over the result.
pub fn build(model: Model, diagnostics: bool) -> LoadResult<(MeshBuffer, Option<CornerReport>)> {
    let mut buffer = MeshBuffer::with_capacity(model.emitted_vertex_count());

    for face in &model.faces {
        let [a, b, c] = face.corners;
        let a = resolve(&model, a)?;
        let b = resolve(&model, b)?;
        let c = resolve(&model, c)?;
        buffer.push_triangle([a, b, c]);

        if let Some(d) = face.fourth {
            let d = resolve(&model, d)?;
            buffer.push_triangle([a, c, d]);
        }
    }

    log::debug!(
        "Built mesh: {} faces -> {} vertices",
        model.faces.len(),
        buffer.vertex_count()
    );

    let corners = diagnostics.then(|| CornerReport::scan(buffer.vertices()));
    Ok((buffer, corners))
}

/// Look up one face corner in the model's tables.
pub fn resolve(model: &Model, corner: CornerIndex) -> LoadResult<Vertex> {
    let position = lookup(&model.positions, corner.vertex, Attribute::Position)?;
    let normal = match corner.normal {
        Some(i) => lookup(&model.normals, i, Attribute::Normal)?,
        None => DEFAULT_NORMAL,
    };
    let uv = match corner.texcoord {
        Some(i) => lookup(&model.texcoords, i, Attribute::TexCoord)?,
        None => DEFAULT_TEXCOORD,
    };
    Ok(Vertex::new(
        position.to_array(),
        normal.to_array(),
        uv.to_array(),
    ))
}

fn lookup<T: Copy>(table: &[T], index: i64, attribute: Attribute) -> LoadResult<T> {
    usize::try_from(index)
        .ok()
        .and_then(|i| table.get(i))
        .copied()
        .ok_or(LoadError::IndexOutOfRange {
            attribute,
            index: index.saturating_add(1),
            len: table.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::load_model_from_str;

    fn build_str(src: &str) -> LoadResult<MeshBuffer> {
        let model = load_model_from_str(src)?;
        build(model, false).map(|(buffer, _)| buffer)
    }

    #[test]
    fn vertex_layout() {
        assert_eq!(Vertex::STRIDE, 32);
        assert_eq!(Vertex::POSITION_OFFSET, 0);
        assert_eq!(Vertex::NORMAL_OFFSET, 12);
        assert_eq!(Vertex::UV_OFFSET, 24);
    }

    #[test]
    fn single_triangle_with_defaults() {
        let buffer = build_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let expected = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        assert_eq!(buffer.vertex_count(), 3);
        for (v, pos) in buffer.vertices().iter().zip(expected) {
            assert_eq!(v.position, pos);
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.uv, [0.0, 0.0]);
        }
    }

    #[test]
    fn quad_fans_from_first_corner() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let buffer = build_str(src).unwrap();
        let xs: Vec<[f32; 3]> = buffer.vertices().iter().map(|v| v.position).collect();
        let p = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        assert_eq!(xs, vec![p[0], p[1], p[2], p[0], p[2], p[3]]);
        assert_eq!(buffer.triangle_count(), 2);
    }

    #[test]
    fn winding_is_not_reoriented() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 3 2 1\n";
        let buffer = build_str(src).unwrap();
        let tri = buffer.triangles().next().unwrap();
        assert_eq!(tri[0].position, [0.0, 1.0, 0.0]);
        assert_eq!(tri[2].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn vertex_counts_follow_face_counts() {
        let mut tris = String::from("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\n");
        let mut quads = tris.clone();
        for i in 0..5 {
            tris.push_str("f 1 2 3\n");
            if i % 2 == 0 {
                tris.push_str("# filler\n");
            }
            quads.push_str("f 1 2 4 3\n");
        }
        assert_eq!(build_str(&tris).unwrap().vertex_count(), 15);
        assert_eq!(build_str(&quads).unwrap().vertex_count(), 30);
    }

    #[test]
    fn texcoord_reference_resolves() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.5 0.5\nf 1/1 2/1 3/1\n";
        let buffer = build_str(src).unwrap();
        assert_eq!(buffer.vertices()[0].uv, [0.5, 0.5]);
        assert_eq!(buffer.vertices()[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn normal_only_reference_resolves() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 1 0\nf 1//1 2//1 3//1\n";
        let buffer = build_str(src).unwrap();
        assert!(buffer.vertices().iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(buffer.vertices().iter().all(|v| v.uv == [0.0, 0.0]));
    }

    #[test]
    fn full_corner_round_trip() {
        let src = "v 1 2 3\nv 4 5 6\nv 7 8 9\nvt 0.1 0.2\nvt 0.3 0.4\nvn 1 0 0\nvn 0 1 0\n\
                   f 2/2/1 3/1/2 1/2/2\n";
        let buffer = build_str(src).unwrap();
        let first = buffer.vertices()[0];
        assert_eq!(first.position, [4.0, 5.0, 6.0]);
        assert_eq!(first.uv, [0.3, 0.4]);
        assert_eq!(first.normal, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_and_negative_indices_are_out_of_range() {
        let base = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";
        for face in [
            "f 0 1 2",
            "f -1 1 2",
            "f 1 2 4",
            "f -3000000000 1 2",
            "f 3000000000 1 2",
            "f 99999999999999999999999 1 2",
        ] {
            let err = build_str(&format!("{base}{face}\n")).unwrap_err();
            assert!(
                matches!(
                    err,
                    LoadError::IndexOutOfRange {
                        attribute: Attribute::Position,
                        len: 3,
                        ..
                    }
                ),
                "{face}: {err:?}"
            );
        }
    }

    #[test]
    fn huge_indices_report_without_overflow() {
        let base = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";
        let err = build_str(&format!("{base}f 1 2 -3000000000\n")).unwrap_err();
        assert!(matches!(
            err,
            LoadError::IndexOutOfRange {
                attribute: Attribute::Position,
                index: -3_000_000_000,
                len: 3
            }
        ));

        let err = build_str(&format!("{base}vt 0 0\nf 1/-99999999999999999999 2 3\n")).unwrap_err();
        assert!(matches!(
            err,
            LoadError::IndexOutOfRange {
                attribute: Attribute::TexCoord,
                len: 1,
                ..
            }
        ));

        let err = build_str(&format!("{base}f 1//99999999999999999999 2 3\n")).unwrap_err();
        assert!(matches!(
            err,
            LoadError::IndexOutOfRange {
                attribute: Attribute::Normal,
                index: i64::MAX,
                len: 0
            }
        ));
    }

    #[test]
    fn out_of_range_reports_written_index() {
        let err = build_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/1 3/2\n").unwrap_err();
        match err {
            LoadError::IndexOutOfRange {
                attribute,
                index,
                len,
            } => {
                assert_eq!(attribute, Attribute::TexCoord);
                assert_eq!(index, 2);
                assert_eq!(len, 1);
            }
            other => panic!("unexpected {other:?}"),
        }

        let err = build_str("v 0 0 0\nf 1//1 1//1 1//1\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::IndexOutOfRange {
                attribute: Attribute::Normal,
                index: 1,
                len: 0
            }
        ));
    }

    #[test]
    fn unknown_tokens_do_not_change_output() {
        let plain = build_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let noisy = build_str("v 0 0 0\nfoo bar\nv 1 0 0\nv 0 1 0\ncstype bezier\nf 1 2 3\n").unwrap();
        assert_eq!(plain, noisy);
    }

    #[test]
    fn bytes_match_vertex_count() {
        let buffer = build_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(buffer.as_bytes().len(), 3 * Vertex::STRIDE);
        assert_eq!(buffer.into_vertices().len(), 3);
    }

    #[test]
    fn empty_model_builds_empty_buffer() {
        let (buffer, corners) = build(Model::new(), false).unwrap();
        assert!(buffer.is_empty());
        assert!(corners.is_none());
    }
}
