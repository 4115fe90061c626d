//! Scene data model: vertices, triangular faces, and meshes.

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// A single mesh vertex.
///
/// `coordinates` holds the object-space position while the vertex lives in
/// a [`Mesh`]. The pipeline transforms *copies* of each face's vertices, so
/// drawing never mutates mesh data and repeated draws under different
/// cameras stay independent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub coordinates: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub const fn new(coordinates: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            coordinates,
            uv,
            normal,
        }
    }

    /// A vertex with only a position; uv and normal are zero.
    pub const fn from_coordinates(coordinates: Vec3) -> Self {
        Self {
            coordinates,
            uv: Vec2::ZERO,
            normal: Vec3::ZERO,
        }
    }
}

/// A triangle of three vertices, held by value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Face {
    pub v1: Vertex,
    pub v2: Vertex,
    pub v3: Vertex,
}

impl Face {
    pub const fn new(v1: Vertex, v2: Vertex, v3: Vertex) -> Self {
        Self { v1, v2, v3 }
    }

    /// Computes the flat face normal from the winding of the coordinates
    /// and stores it on all three vertices.
    pub fn calc_normal(&mut self) {
        let d1 = self.v2.coordinates - self.v1.coordinates;
        let d2 = self.v3.coordinates - self.v1.coordinates;
        let n = d1.cross(d2).normalize();

        self.v1.normal = n;
        self.v2.normal = n;
        self.v3.normal = n;
    }
}

/// An ordered collection of faces plus the mesh's scene transform.
///
/// `rotation` is Euler XYZ angles in radians. The transform fields are
/// mutable scene state set by the caller between draws; the model matrix is
/// composed as `translate * rotate_x * rotate_y * rotate_z * scale`.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub faces: Vec<Face>,

    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            faces: Vec::new(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Recomputes flat normals for every face.
    pub fn calc_normals(&mut self) {
        for face in &mut self.faces {
            face.calc_normal();
        }
    }

    /// A unit plane in the XZ plane, split into two triangles, with flat
    /// normals and per-corner texture coordinates.
    pub fn plane() -> Self {
        let p1 = Vec3::new(-1.0, 0.0, 1.0);
        let p2 = Vec3::new(1.0, 0.0, 1.0);
        let p3 = Vec3::new(-1.0, 0.0, -1.0);
        let p4 = Vec3::new(1.0, 0.0, -1.0);

        let t1 = Vec2::new(1.0, 0.0);
        let t2 = Vec2::new(0.0, 1.0);
        let t3 = Vec2::new(0.0, 0.0);
        let t4 = Vec2::new(1.0, 1.0);

        let mut mesh = Mesh::new();
        mesh.faces = vec![
            Face::new(
                Vertex::new(p2, t1, Vec3::ZERO),
                Vertex::new(p3, t2, Vec3::ZERO),
                Vertex::new(p1, t3, Vec3::ZERO),
            ),
            Face::new(
                Vertex::new(p2, t1, Vec3::ZERO),
                Vertex::new(p4, t4, Vec3::ZERO),
                Vertex::new(p3, t2, Vec3::ZERO),
            ),
        ];
        mesh.calc_normals();
        mesh
    }
}
