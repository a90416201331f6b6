//! Poses, rotation state and the transform compositor
use std::fmt;

use nalgebra::{Matrix4, Vector3};

use crate::geometry::Axis;

/// Rotation state around three axes (in degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, degrees: f32) {
        match axis {
            Axis::X => self.x = degrees,
            Axis::Y => self.y = degrees,
            Axis::Z => self.z = degrees,
        }
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Position and rotation of a primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Offset in CSS pixels (x right, y down, z toward the viewer)
    pub position: Vector3<f32>,
    pub rotation: RotationState,
}

impl Pose {
    pub fn new(position: Vector3<f32>, rotation: RotationState) -> Self {
        Self { position, rotation }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vector3::new(x, y, z), RotationState::zero())
    }
}

/// A single step of a CSS transform list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    Translate3d(Vector3<f32>),
    RotateX(f32),
    RotateY(f32),
    RotateZ(f32),
}

impl TransformOp {
    pub fn matrix(&self) -> Matrix4<f32> {
        match *self {
            TransformOp::Translate3d(offset) => Transform::translation_matrix(offset.x, offset.y, offset.z),
            TransformOp::RotateX(deg) => Matrix4::new_rotation(Vector3::new(deg.to_radians(), 0.0, 0.0)),
            TransformOp::RotateY(deg) => Matrix4::new_rotation(Vector3::new(0.0, deg.to_radians(), 0.0)),
            TransformOp::RotateZ(deg) => Matrix4::new_rotation(Vector3::new(0.0, 0.0, deg.to_radians())),
        }
    }
}

impl fmt::Display for TransformOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformOp::Translate3d(v) => write!(f, "translate3d({}px,{}px,{}px)", v.x, v.y, v.z),
            TransformOp::RotateX(deg) => write!(f, "rotateX({}deg)", deg),
            TransformOp::RotateY(deg) => write!(f, "rotateY({}deg)", deg),
            TransformOp::RotateZ(deg) => write!(f, "rotateZ({}deg)", deg),
        }
    }
}

/// Ordered transform list handed to a visual projector
///
/// Renders as CSS text through `Display` and as a homogeneous matrix through
/// [`TransformDescription::to_matrix`]. Operations apply left to right, so the
/// matrix is the product of the operations in list order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformDescription {
    ops: Vec<TransformOp>,
}

impl TransformDescription {
    pub fn new(ops: Vec<TransformOp>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &[TransformOp] {
        &self.ops
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        self.ops
            .iter()
            .fold(Matrix4::identity(), |acc, op| acc * op.matrix())
    }
}

impl fmt::Display for TransformDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

/// Compose a primitive's transform: translate, then rotateX, rotateY, rotateZ
pub fn compose_object_transform(pose: &Pose) -> TransformDescription {
    let mut ops = Vec::with_capacity(4);
    ops.push(TransformOp::Translate3d(pose.position));
    ops.extend(rotation_ops(&pose.rotation));
    TransformDescription::new(ops)
}

/// Compose the camera container's transform (rotation only)
pub fn compose_camera_transform(rotation: &RotationState) -> TransformDescription {
    TransformDescription::new(rotation_ops(rotation).to_vec())
}

fn rotation_ops(rotation: &RotationState) -> [TransformOp; 3] {
    [
        TransformOp::RotateX(rotation.x),
        TransformOp::RotateY(rotation.y),
        TransformOp::RotateZ(rotation.z),
    ]
}

/// Matrix helpers for the compositor
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.set(Axis::X, 10.0);
        state.set(Axis::Z, 30.0);
        state.set(Axis::Y, 45.0);
        assert_eq!(state.get(Axis::X), 10.0);
        assert_eq!(state.get(Axis::Y), 45.0);
        assert_eq!(state.get(Axis::Z), 30.0);
    }

    #[test]
    fn test_identity_rotation() {
        let rotation = RotationState::zero();
        let matrix = compose_camera_transform(&rotation).to_matrix();
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_object_transform_text() {
        let mut pose = Pose::at(200.0, 200.0, 0.0);
        pose.rotation.y = 45.0;
        assert_eq!(
            compose_object_transform(&pose).to_string(),
            "translate3d(200px,200px,0px) rotateX(0deg) rotateY(45deg) rotateZ(0deg)"
        );
    }

    #[test]
    fn test_camera_transform_has_no_translation() {
        let description = compose_camera_transform(&RotationState::new(30.0, 0.0, 0.0));
        assert_eq!(description.to_string(), "rotateX(30deg) rotateY(0deg) rotateZ(0deg)");
        assert!(description
            .ops()
            .iter()
            .all(|op| !matches!(op, TransformOp::Translate3d(_))));
    }

    #[test]
    fn test_compose_is_pure() {
        let pose = Pose::new(Vector3::new(12.5, -4.0, 30.0), RotationState::new(15.0, 30.0, 45.0));
        assert_eq!(compose_object_transform(&pose), compose_object_transform(&pose));
    }

    #[test]
    fn test_translate_applies_before_rotation() {
        let mut pose = Pose::at(100.0, 0.0, 0.0);
        pose.rotation.z = 90.0;
        let local = Point3::new(10.0, 0.0, 0.0);

        let composed = compose_object_transform(&pose).to_matrix().transform_point(&local);
        assert_relative_eq!(composed, Point3::new(100.0, 10.0, 0.0), epsilon = 1e-4);

        let swapped = (Matrix4::new_rotation(Vector3::new(0.0, 0.0, 90f32.to_radians()))
            * Transform::translation_matrix(100.0, 0.0, 0.0))
        .transform_point(&local);
        assert_relative_eq!(swapped, Point3::new(0.0, 110.0, 0.0), epsilon = 1e-4);
        assert!((composed - swapped).norm() > 1.0);
    }

    #[test]
    fn test_rotation_order_x_then_y() {
        let rotation = RotationState::new(90.0, 90.0, 0.0);
        let point = Point3::new(0.0, 0.0, 1.0);
        // Rx·Ry applied to +z: Ry sends it to +x, Rx leaves +x alone
        let rotated = compose_camera_transform(&rotation).to_matrix().transform_point(&point);
        assert_relative_eq!(rotated, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }
}
