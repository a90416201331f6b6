//! Primitive factory: cuboids and single-face polygons
use crate::geometry::{cuboid_faces, ClipRegion, Face, Mesh, PercentPoint, FACE_SIZE};
use crate::transform::Pose;

/// Where new primitives appear, in CSS pixels
pub const SPAWN_POSITION: (f32, f32, f32) = (200.0, 200.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Cuboid,
    Polygon,
}

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Cuboid { faces: [Face; 6] },
    Polygon { vertices: Vec<PercentPoint> },
}

/// A posed primitive with its local geometry
///
/// Cuboid faces are fixed at creation. Polygon vertices can be edited in place
/// but never added or removed, so a polygon keeps at least three of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub pose: Pose,
    shape: Shape,
}

/// Build a cube of edge [`FACE_SIZE`] at the spawn position
pub fn create_cuboid() -> Primitive {
    Primitive {
        pose: spawn_pose(),
        shape: Shape::Cuboid {
            faces: cuboid_faces(FACE_SIZE),
        },
    }
}

/// Build the default triangle at the spawn position
pub fn create_polygon() -> Primitive {
    Primitive {
        pose: spawn_pose(),
        shape: Shape::Polygon {
            vertices: vec![
                PercentPoint::new(0.0, 0.0),
                PercentPoint::new(100.0, 0.0),
                PercentPoint::new(50.0, 100.0),
            ],
        },
    }
}

fn spawn_pose() -> Pose {
    let (x, y, z) = SPAWN_POSITION;
    Pose::at(x, y, z)
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self.shape {
            Shape::Cuboid { .. } => PrimitiveKind::Cuboid,
            Shape::Polygon { .. } => PrimitiveKind::Polygon,
        }
    }

    pub fn faces(&self) -> Option<&[Face]> {
        match &self.shape {
            Shape::Cuboid { faces } => Some(faces),
            Shape::Polygon { .. } => None,
        }
    }

    pub fn vertices(&self) -> Option<&[PercentPoint]> {
        match &self.shape {
            Shape::Polygon { vertices } => Some(vertices),
            Shape::Cuboid { .. } => None,
        }
    }

    /// Vertices as a fixed-length slice, so edits cannot change the count
    pub fn vertices_mut(&mut self) -> Option<&mut [PercentPoint]> {
        match &mut self.shape {
            Shape::Polygon { vertices } => Some(vertices.as_mut_slice()),
            Shape::Cuboid { .. } => None,
        }
    }

    /// Clip region of a polygon's face, rebuilt from the current vertices
    pub fn clip_region(&self) -> Option<ClipRegion> {
        self.vertices().map(ClipRegion::from_vertices)
    }

    /// Local geometry as triangles, before the pose is applied
    pub fn local_mesh(&self) -> Mesh {
        match &self.shape {
            Shape::Cuboid { faces } => {
                let square = Mesh::square(FACE_SIZE);
                let mut mesh = Mesh::with_capacity(faces.len() * 2);
                for face in faces {
                    mesh.extend(square.transformed(&face.transform().to_matrix()));
                }
                mesh
            }
            Shape::Polygon { vertices } => Mesh::fan(vertices, FACE_SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::RotationState;
    use nalgebra::Vector3;

    #[test]
    fn test_cuboid_defaults() {
        let cube = create_cuboid();
        assert_eq!(cube.kind(), PrimitiveKind::Cuboid);
        assert_eq!(cube.pose.position, Vector3::new(200.0, 200.0, 0.0));
        assert_eq!(cube.pose.rotation, RotationState::zero());
        assert_eq!(cube.faces().map(<[Face]>::len), Some(6));
        assert!(cube.vertices().is_none());
        assert!(cube.clip_region().is_none());
    }

    #[test]
    fn test_faces_survive_pose_changes() {
        let mut cube = create_cuboid();
        let before = cube.faces().map(<[Face]>::to_vec);
        cube.pose.position = Vector3::new(-30.0, 12.0, 80.0);
        cube.pose.rotation = RotationState::new(10.0, 20.0, 30.0);
        assert_eq!(cube.faces().map(<[Face]>::to_vec), before);
        assert_eq!(before.as_deref(), Some(&cuboid_faces(FACE_SIZE)[..]));
    }

    #[test]
    fn test_polygon_defaults() {
        let polygon = create_polygon();
        assert_eq!(polygon.kind(), PrimitiveKind::Polygon);
        assert_eq!(polygon.pose, create_cuboid().pose);
        assert_eq!(
            polygon.vertices(),
            Some(
                &[
                    PercentPoint::new(0.0, 0.0),
                    PercentPoint::new(100.0, 0.0),
                    PercentPoint::new(50.0, 100.0),
                ][..]
            )
        );
        assert!(polygon.faces().is_none());
    }

    #[test]
    fn test_local_mesh_sizes() {
        assert_eq!(create_cuboid().local_mesh().triangles.len(), 12);
        assert_eq!(create_polygon().local_mesh().triangles.len(), 1);
    }
}
