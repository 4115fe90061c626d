//! ASCII PLY parser.
//!
//! The header declares `element vertex N` and `element face M` and ends
//! with `end_header`; the body holds N `x y z` position lines followed by
//! M `3 i j k` face lines with 0-indexed corner references.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::LoadError;
use crate::math::vec3::Vec3;
use crate::mesh::{Face, Mesh, Vertex};

/// Loads a mesh from an ASCII PLY file.
pub fn load_ply<P: AsRef<Path>>(path: P) -> Result<Mesh, LoadError> {
    let file = File::open(path)?;
    parse_ply(BufReader::new(file))
}

/// Parses ASCII PLY text from any buffered reader.
pub fn parse_ply<R: BufRead>(reader: R) -> Result<Mesh, LoadError> {
    let mut lines = reader.lines().enumerate();

    let (num_vertices, num_faces) = parse_header(&mut lines)?;

    let mut positions: Vec<Vec3> = Vec::with_capacity(num_vertices);
    for _ in 0..num_vertices {
        let (line_no, line) = next_line(&mut lines, "vertex")?;
        let cols: Vec<&str> = line.split(' ').collect();
        positions.push(Vec3::new(
            parse_float(&cols, 0, line_no)?,
            parse_float(&cols, 1, line_no)?,
            parse_float(&cols, 2, line_no)?,
        ));
    }

    let mut mesh = Mesh::new();
    mesh.faces.reserve(num_faces);
    for _ in 0..num_faces {
        let (line_no, line) = next_line(&mut lines, "face")?;
        let cols: Vec<&str> = line.split(' ').collect();
        let v1 = parse_corner(&cols, 1, &positions, line_no)?;
        let v2 = parse_corner(&cols, 2, &positions, line_no)?;
        let v3 = parse_corner(&cols, 3, &positions, line_no)?;
        mesh.faces.push(Face::new(v1, v2, v3));
    }

    Ok(mesh)
}

type Lines<R> = std::iter::Enumerate<std::io::Lines<R>>;

fn next_line<R: BufRead>(lines: &mut Lines<R>, expected: &str) -> Result<(usize, String), LoadError> {
    match lines.next() {
        Some((index, line)) => Ok((index + 1, line?)),
        None => Err(LoadError::malformed(0, format!("missing {expected} line"))),
    }
}

/// Reads header lines until `end_header`, collecting element counts.
fn parse_header<R: BufRead>(lines: &mut Lines<R>) -> Result<(usize, usize), LoadError> {
    let mut num_vertices = 0;
    let mut num_faces = 0;

    loop {
        let (line_no, line) = next_line(lines, "header")?;
        if line == "end_header" {
            return Ok((num_vertices, num_faces));
        }

        let cols: Vec<&str> = line.split(' ').collect();
        if cols[0] == "element" {
            let count = cols
                .get(2)
                .ok_or_else(|| LoadError::malformed(line_no, "element needs a count"))?;
            let count: usize = count.parse().map_err(|_| {
                LoadError::malformed(line_no, format!("invalid element count `{count}`"))
            })?;
            match cols.get(1) {
                Some(&"vertex") => num_vertices = count,
                Some(&"face") => num_faces = count,
                _ => {}
            }
        }
    }
}

fn parse_float(cols: &[&str], pos: usize, line_no: usize) -> Result<f64, LoadError> {
    let col = cols
        .get(pos)
        .ok_or_else(|| LoadError::malformed(line_no, "missing field"))?;
    col.parse()
        .map_err(|_| LoadError::malformed(line_no, format!("invalid number `{col}`")))
}

fn parse_corner(
    cols: &[&str],
    pos: usize,
    positions: &[Vec3],
    line_no: usize,
) -> Result<Vertex, LoadError> {
    let col = cols
        .get(pos)
        .ok_or_else(|| LoadError::malformed(line_no, "face needs three corners"))?;
    let index: usize = col
        .parse()
        .map_err(|_| LoadError::malformed(line_no, format!("invalid index `{col}`")))?;
    let position = positions
        .get(index)
        .ok_or_else(|| LoadError::malformed(line_no, format!("index {index} out of range")))?;
    Ok(Vertex::from_coordinates(*position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_header_counts_and_body() {
        let src = "\
ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
3 0 1 2";
        let mesh = parse_ply(Cursor::new(src)).unwrap();
        assert_eq!(mesh.faces.len(), 1);
        assert_eq!(mesh.faces[0].v2.coordinates, Vec3::UNIT_X);
        assert_eq!(mesh.faces[0].v3.coordinates, Vec3::UNIT_Y);
    }

    #[test]
    fn truncated_body_is_malformed() {
        let src = "\
element vertex 2
end_header
0.0 0.0 0.0";
        assert!(matches!(
            parse_ply(Cursor::new(src)),
            Err(LoadError::MalformedFormat { .. })
        ));
    }

    #[test]
    fn bad_element_count_is_malformed() {
        let src = "element vertex many\nend_header";
        assert!(matches!(
            parse_ply(Cursor::new(src)),
            Err(LoadError::MalformedFormat { line: 1, .. })
        ));
    }

    #[test]
    fn face_index_out_of_range_is_malformed() {
        let src = "\
element vertex 1
element face 1
end_header
0.0 0.0 0.0
3 0 1 2";
        assert!(matches!(
            parse_ply(Cursor::new(src)),
            Err(LoadError::MalformedFormat { line: 5, .. })
        ));
    }
}
