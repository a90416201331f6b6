//! Geometry primitives: axes, cube faces, polygon clip regions and meshes
use std::fmt;

use nalgebra::{Matrix4, Point3, Vector3};

use crate::transform::{TransformDescription, TransformOp};

/// Edge length of every primitive face, in CSS pixels
pub const FACE_SIZE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Axis of a 2D percentage point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanarAxis {
    X,
    Y,
}

impl PlanarAxis {
    pub const ALL: [PlanarAxis; 2] = [PlanarAxis::X, PlanarAxis::Y];

    pub fn name(self) -> &'static str {
        match self {
            PlanarAxis::X => "x",
            PlanarAxis::Y => "y",
        }
    }
}

/// Point in percentage coordinates (0–100) of a face's local bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentPoint {
    pub x: f32,
    pub y: f32,
}

impl PercentPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn get(&self, axis: PlanarAxis) -> f32 {
        match axis {
            PlanarAxis::X => self.x,
            PlanarAxis::Y => self.y,
        }
    }

    pub fn set(&mut self, axis: PlanarAxis, value: f32) {
        match axis {
            PlanarAxis::X => self.x = value,
            PlanarAxis::Y => self.y = value,
        }
    }

    /// Map onto a face of the given size centred on the origin
    pub fn to_local(&self, size: f32) -> Point3<f32> {
        Point3::new(
            (self.x / 100.0 - 0.5) * size,
            (self.y / 100.0 - 0.5) * size,
            0.0,
        )
    }
}

/// One side of a cuboid: a fixed offset from the centre plus a rotation pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub offset: Vector3<f32>,
    pub rotate_x: f32,
    pub rotate_y: f32,
}

impl Face {
    pub fn new(x: f32, y: f32, z: f32, rotate_x: f32, rotate_y: f32) -> Self {
        Self {
            offset: Vector3::new(x, y, z),
            rotate_x,
            rotate_y,
        }
    }

    /// Face transform: translate3d(offset) rotateX rotateY
    pub fn transform(&self) -> TransformDescription {
        TransformDescription::new(vec![
            TransformOp::Translate3d(self.offset),
            TransformOp::RotateX(self.rotate_x),
            TransformOp::RotateY(self.rotate_y),
        ])
    }
}

/// The six outward-facing sides of a cube with the given edge length
///
/// Order: front, right, back, left, top, bottom.
pub fn cuboid_faces(size: f32) -> [Face; 6] {
    let half = size / 2.0;
    [
        Face::new(0.0, 0.0, half, 0.0, 0.0),
        Face::new(half, 0.0, 0.0, 0.0, 90.0),
        Face::new(0.0, 0.0, -half, 0.0, 180.0),
        Face::new(-half, 0.0, 0.0, 0.0, -90.0),
        Face::new(0.0, -half, 0.0, 90.0, 0.0),
        Face::new(0.0, half, 0.0, -90.0, 0.0),
    ]
}

/// Visible area of a polygon face, in vertex order
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRegion {
    pub points: Vec<PercentPoint>,
}

impl ClipRegion {
    pub fn from_vertices(vertices: &[PercentPoint]) -> Self {
        Self {
            points: vertices.to_vec(),
        }
    }
}

impl fmt::Display for ClipRegion {
    /// CSS `polygon()` shape
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("polygon(")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}% {}%", p.x, p.y)?;
        }
        f.write_str(")")
    }
}

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Triangle in the z=0 plane facing +z
    fn flat(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let v = |p: Point3<f32>| Vertex::new(p.x, p.y, p.z, 0.0, 0.0, 1.0);
        Self::new(v(a), v(b), v(c))
    }

    /// Calculate the face normal from the triangle's vertices
    ///
    /// Returns `None` for degenerate triangles.
    pub fn calculate_normal(&self) -> Option<Vector3<f32>> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).try_normalize(1e-6)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Square of the given size centred on the origin, split into two triangles
    pub fn square(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(2);
        let tl = Point3::new(-half, -half, 0.0);
        let tr = Point3::new(half, -half, 0.0);
        let br = Point3::new(half, half, 0.0);
        let bl = Point3::new(-half, half, 0.0);
        mesh.add_triangle(Triangle::flat(tl, tr, br));
        mesh.add_triangle(Triangle::flat(tl, br, bl));
        mesh
    }

    /// Triangle fan over a polygon's percentage vertices
    pub fn fan(vertices: &[PercentPoint], size: f32) -> Self {
        let points: Vec<Point3<f32>> = vertices.iter().map(|v| v.to_local(size)).collect();
        let mut mesh = Self::with_capacity(points.len().saturating_sub(2));
        if let Some((first, rest)) = points.split_first() {
            for pair in rest.windows(2) {
                mesh.add_triangle(Triangle::flat(*first, pair[0], pair[1]));
            }
        }
        mesh
    }

    /// Apply a transform to every vertex, recomputing normals
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let mut mesh = Self::with_capacity(self.triangles.len());
        for triangle in &self.triangles {
            let [a, b, c] = triangle.vertices.map(|v| matrix.transform_point(&v.position));
            let mut moved = Triangle::flat(a, b, c);
            let normal = moved.calculate_normal().unwrap_or_else(Vector3::z);
            for v in &mut moved.vertices {
                v.normal = normal;
            }
            mesh.add_triangle(moved);
        }
        mesh
    }

    pub fn extend(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
