//! Wavefront OBJ subset parser.
//!
//! Recognized statements, one per line:
//!
//! ```text
//! v x y z        vertex position
//! vt u v         texture coordinate
//! vn x y z       vertex normal
//! f a b c        triangular face; each corner is i, i/j, i/j/k or i//k
//!                with 1-indexed references into the lists above
//! ```
//!
//! Any other leading token is a [`LoadError::MalformedFormat`]. Corner
//! components that are omitted leave the vertex attribute zero-valued.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::LoadError;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::mesh::{Face, Mesh, Vertex};

/// Loads a mesh from an OBJ file.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, LoadError> {
    let file = File::open(path)?;
    parse_obj(BufReader::new(file))
}

/// Parses OBJ text from any buffered reader.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<Mesh, LoadError> {
    let mut mesh = Mesh::new();

    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let cols: Vec<&str> = line.split(' ').collect();

        match cols[0] {
            "v" => positions.push(parse_vec3(&cols, line_no)?),
            "vt" => uvs.push(parse_uv(&cols, line_no)?),
            "vn" => normals.push(parse_vec3(&cols, line_no)?),
            "f" => {
                let v1 = parse_corner(&cols, 1, &positions, &uvs, &normals, line_no)?;
                let v2 = parse_corner(&cols, 2, &positions, &uvs, &normals, line_no)?;
                let v3 = parse_corner(&cols, 3, &positions, &uvs, &normals, line_no)?;
                mesh.faces.push(Face::new(v1, v2, v3));
            }
            other => {
                return Err(LoadError::malformed(
                    line_no,
                    format!("unexpected token `{other}`"),
                ))
            }
        }
    }

    Ok(mesh)
}

fn parse_float(cols: &[&str], pos: usize, line_no: usize) -> Result<f64, LoadError> {
    let col = cols
        .get(pos)
        .ok_or_else(|| LoadError::malformed(line_no, "missing field"))?;
    col.parse()
        .map_err(|_| LoadError::malformed(line_no, format!("invalid number `{col}`")))
}

fn parse_vec3(cols: &[&str], line_no: usize) -> Result<Vec3, LoadError> {
    Ok(Vec3::new(
        parse_float(cols, 1, line_no)?,
        parse_float(cols, 2, line_no)?,
        parse_float(cols, 3, line_no)?,
    ))
}

fn parse_uv(cols: &[&str], line_no: usize) -> Result<Vec2, LoadError> {
    Ok(Vec2::new(
        parse_float(cols, 1, line_no)?,
        parse_float(cols, 2, line_no)?,
    ))
}

/// Resolves one `f` corner spec into a vertex.
fn parse_corner(
    cols: &[&str],
    pos: usize,
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
    line_no: usize,
) -> Result<Vertex, LoadError> {
    let spec = cols
        .get(pos)
        .ok_or_else(|| LoadError::malformed(line_no, "face needs three corners"))?;
    let indices: Vec<&str> = spec.split('/').collect();

    let coordinates = *resolve(&indices, 0, positions, line_no)?
        .ok_or_else(|| LoadError::malformed(line_no, "face corner has no vertex index"))?;
    let uv = resolve(&indices, 1, uvs, line_no)?.copied().unwrap_or(Vec2::ZERO);
    let normal = resolve(&indices, 2, normals, line_no)?
        .copied()
        .unwrap_or(Vec3::ZERO);

    Ok(Vertex::new(coordinates, uv, normal))
}

/// Looks up a 1-indexed reference, or `None` when the component is absent.
fn resolve<'a, T>(
    indices: &[&str],
    pos: usize,
    list: &'a [T],
    line_no: usize,
) -> Result<Option<&'a T>, LoadError> {
    let raw = match indices.get(pos) {
        None | Some(&"") => return Ok(None),
        Some(raw) => raw,
    };
    let index: usize = raw
        .parse()
        .map_err(|_| LoadError::malformed(line_no, format!("invalid index `{raw}`")))?;
    index
        .checked_sub(1)
        .and_then(|i| list.get(i))
        .ok_or_else(|| LoadError::malformed(line_no, format!("index {index} out of range")))
        .map(Some)
}
