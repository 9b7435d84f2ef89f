//! Wavefront OBJ parser: positions, normals, texture coordinates and tri/quad faces.
//!
//! Only the geometry records are decoded. `mtllib`, `o`, `usemtl` and `s` lines are
//! skipped silently; any other unrecognised token is logged and skipped.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    num::IntErrorKind,
    path::Path,
};

use corelib::{LoadError, LoadResult, Vec2, Vec3};

use crate::{
    corners::CornerReport,
    mesh::{self, MeshBuffer},
    model::{CornerIndex, Face, Model, UnknownToken},
};

const IGNORED_TOKENS: [&str; 4] = ["mtllib", "o", "usemtl", "s"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token {
    Position,
    Normal,
    TexCoord,
    Face,
    Ignored,
    Unknown,
}

fn classify(tag: &str) -> Token {
    match tag {
        "v" => Token::Position,
        "vn" => Token::Normal,
        "vt" => Token::TexCoord,
        "f" => Token::Face,
        _ if IGNORED_TOKENS.contains(&tag) => Token::Ignored,
        _ => Token::Unknown,
    }
}

/// Result of a full load: the flat vertex buffer plus the optional corner scan.
#[derive(Clone, Debug)]
pub struct LoadedMesh {
    pub buffer: MeshBuffer,
    pub corners: Option<CornerReport>,
}

/// Load an OBJ file and flatten it into a vertex buffer.
pub fn load_obj_from_path(path: impl AsRef<Path>, diagnostics: bool) -> LoadResult<LoadedMesh> {
    finish(load_model_from_path(path)?, diagnostics)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R, diagnostics: bool) -> LoadResult<LoadedMesh> {
    finish(parse_obj(reader)?, diagnostics)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str, diagnostics: bool) -> LoadResult<LoadedMesh> {
    finish(load_model_from_str(contents)?, diagnostics)
}

fn finish(model: Model, diagnostics: bool) -> LoadResult<LoadedMesh> {
    let (buffer, corners) = mesh::build(model, diagnostics)?;
    Ok(LoadedMesh { buffer, corners })
}

/// Parse an OBJ file into its attribute tables without resolving faces.
pub fn load_model_from_path(path: impl AsRef<Path>) -> LoadResult<Model> {
    let path = path.as_ref();
    log::info!("Loading OBJ file {}", path.display());
    let file = File::open(path).map_err(|source| LoadError::StreamUnavailable {
        path: path.to_path_buf(),
        line_no: None,
        source,
    })?;
    read_model(BufReader::new(file), path)
}

/// Parse an OBJ string literal into its attribute tables.
pub fn load_model_from_str(contents: &str) -> LoadResult<Model> {
    parse_obj(io::Cursor::new(contents))
}

/// Parse OBJ text from any buffered reader.
pub fn parse_obj<R: BufRead>(reader: R) -> LoadResult<Model> {
    read_model(reader, Path::new("<stream>"))
}

fn read_model<R: BufRead>(reader: R, origin: &Path) -> LoadResult<Model> {
    let mut model = Model::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| LoadError::StreamUnavailable {
            path: origin.to_path_buf(),
            line_no: Some(line_no),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (tag, rest) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));

        match classify(tag) {
            Token::Position => {
                let xyz = read_floats::<3>(rest, line_no, &line)?;
                model.positions.push(Vec3::from_array(xyz));
            }
            Token::Normal => {
                let n = read_floats::<3>(rest, line_no, &line)?;
                model.normals.push(Vec3::from_array(n));
            }
            Token::TexCoord => {
                let uv = read_floats::<2>(rest, line_no, &line)?;
                model.texcoords.push(Vec2::from_array(uv));
            }
            Token::Face => {
                let face =
                    read_face(rest).map_err(|reason| LoadError::parse(line_no, &line, reason))?;
                model.faces.push(face);
            }
            Token::Ignored => {}
            Token::Unknown => {
                log::warn!("Unknown OBJ token '{}' on line {}, skipping", tag, line_no);
                model.unknown_tokens.push(UnknownToken {
                    line_no,
                    token: tag.to_owned(),
                });
            }
        }
    }

    log::debug!(
        "Parsed OBJ: {} positions, {} normals, {} texcoords, {} faces",
        model.positions.len(),
        model.normals.len(),
        model.texcoords.len(),
        model.faces.len()
    );

    Ok(model)
}

/// Reads exactly `N` whitespace-separated floats.
fn read_floats<const N: usize>(rest: &str, line_no: usize, line: &str) -> LoadResult<[f32; N]> {
    let mut out = [0.0; N];
    let mut fields = rest.split_whitespace();

    for (i, slot) in out.iter_mut().enumerate() {
        let field = fields.next().ok_or_else(|| {
            LoadError::parse(line_no, line, format!("expected {N} numbers, found {i}"))
        })?;
        *slot = parse_float(field)
            .ok_or_else(|| LoadError::parse(line_no, line, format!("invalid number '{field}'")))?;
    }

    if fields.next().is_some() {
        return Err(LoadError::parse(
            line_no,
            line,
            format!("expected {N} numbers, found more"),
        ));
    }

    Ok(out)
}

/// Plain decimal notation only: `inf`/`nan` spellings and values that overflow `f32`
/// are refused. `str::parse` is locale independent and rejects trailing garbage.
fn parse_float(field: &str) -> Option<f32> {
    let unsigned = field.strip_prefix(['+', '-']).unwrap_or(field);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    field.parse::<f32>().ok().filter(|f| f.is_finite())
}

fn read_face(rest: &str) -> Result<Face, String> {
    let specs: Vec<&str> = rest.split_whitespace().collect();
    match specs.as_slice() {
        [a, b, c] => Ok(Face::triangle(
            read_corner(a)?,
            read_corner(b)?,
            read_corner(c)?,
        )),
        [a, b, c, d] => Ok(Face::quad(
            read_corner(a)?,
            read_corner(b)?,
            read_corner(c)?,
            read_corner(d)?,
        )),
        other => Err(format!("face needs 3 or 4 corners, found {}", other.len())),
    }
}

/// Decodes `a`, `a/b`, `a/b/c` or `a//c` into 0-based indices.
fn read_corner(corner: &str) -> Result<CornerIndex, String> {
    let (vertex, rest, more) = take_index(corner, corner)?;
    let vertex = vertex.ok_or_else(|| format!("missing vertex index in '{corner}'"))?;

    let (texcoord, rest, more) = if more {
        take_index(rest, corner)?
    } else {
        (None, rest, false)
    };
    let (normal, _, more) = if more {
        take_index(rest, corner)?
    } else {
        (None, rest, false)
    };
    if more {
        return Err(format!("too many '/' fields in '{corner}'"));
    }

    // Presence is settled above; only now shift from 1-based.
    Ok(CornerIndex::new(
        vertex.saturating_sub(1),
        texcoord.map(|i| i.saturating_sub(1)),
        normal.map(|i| i.saturating_sub(1)),
    ))
}

/// Consumes one `/`-separated field of `input`.
///
/// Returns the parsed 1-based index (`None` for an empty field), the unconsumed
/// remainder, and whether another field follows.
fn take_index<'a>(input: &'a str, corner: &str) -> Result<(Option<i64>, &'a str, bool), String> {
    let (field, rest, more) = match input.split_once('/') {
        Some((head, tail)) => (head, tail, true),
        None => (input, "", false),
    };
    if field.is_empty() {
        return Ok((None, rest, more));
    }
    // Integers too large for i64 are clamped; they are out of range either way.
    let index = match field.parse::<i64>() {
        Ok(index) => index,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => return Err(format!("invalid index '{field}' in '{corner}'")),
        },
    };
    Ok((Some(index), rest, more))
}
