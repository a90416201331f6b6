//! Property binder: field descriptors for the property panel and edit parsing
//!
//! Field names follow a small grammar:
//!
//! ```text
//! position.{x,y,z}  rotation.{x,y,z}  camera.rotation.{x,y,z}  v{n}.{x,y}
//! ```
//!
//! Vertex fields are numbered from 1. Values must parse completely as a finite
//! number; surrounding whitespace is allowed.
use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, value},
    number::complete::float,
    sequence::{delimited, preceded, separated_pair},
    IResult,
};

use crate::error::EditError;
use crate::geometry::{Axis, PlanarAxis};
use crate::primitive::Primitive;
use crate::scene::Camera;

/// Parsed property field name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Position(Axis),
    Rotation(Axis),
    CameraRotation(Axis),
    /// 1-based vertex index
    Vertex { index: usize, axis: PlanarAxis },
}

impl FieldKey {
    pub fn parse(name: &str) -> Result<Self, EditError> {
        match all_consuming(field_key)(name.trim()) {
            Ok((_, key)) => Ok(key),
            Err(_) => Err(EditError::UnknownField(name.to_string())),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Position(axis) => write!(f, "position.{}", axis.name()),
            FieldKey::Rotation(axis) => write!(f, "rotation.{}", axis.name()),
            FieldKey::CameraRotation(axis) => write!(f, "camera.rotation.{}", axis.name()),
            FieldKey::Vertex { index, axis } => write!(f, "v{}.{}", index, axis.name()),
        }
    }
}

fn axis(input: &str) -> IResult<&str, Axis> {
    alt((
        value(Axis::X, char('x')),
        value(Axis::Y, char('y')),
        value(Axis::Z, char('z')),
    ))(input)
}

fn planar_axis(input: &str) -> IResult<&str, PlanarAxis> {
    alt((value(PlanarAxis::X, char('x')), value(PlanarAxis::Y, char('y'))))(input)
}

fn vertex_index(input: &str) -> IResult<&str, usize> {
    preceded(char('v'), map_res(digit1, str::parse::<usize>))(input)
}

fn field_key(input: &str) -> IResult<&str, FieldKey> {
    alt((
        map(preceded(tag("position."), axis), FieldKey::Position),
        map(preceded(tag("rotation."), axis), FieldKey::Rotation),
        map(preceded(tag("camera.rotation."), axis), FieldKey::CameraRotation),
        map(
            separated_pair(vertex_index, char('.'), planar_axis),
            |(index, axis)| FieldKey::Vertex { index, axis },
        ),
    ))(input)
}

/// Parse a raw field value, rejecting anything that is not a finite number
pub fn parse_number(field: &str, raw: &str) -> Result<f32, EditError> {
    let parsed: IResult<&str, f32> = all_consuming(delimited(multispace0, float, multispace0))(raw);
    match parsed {
        Ok((_, number)) if number.is_finite() => Ok(number),
        _ => Err(EditError::InvalidNumber {
            field: field.to_string(),
            raw: raw.to_string(),
        }),
    }
}

/// One editable value as shown in the property panel
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub label: String,
    pub value: f32,
}

impl FieldDescriptor {
    pub fn new(key: FieldKey, value: f32) -> Self {
        Self {
            label: key.to_string(),
            value,
        }
    }
}

/// What an applied edit touched, so the caller knows what to push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Pose,
    Vertex,
}

/// Pose fields for any primitive, then `v{i}.x`/`v{i}.y` for polygons
pub fn render_fields_for(primitive: &Primitive) -> Vec<FieldDescriptor> {
    let pose = &primitive.pose;
    let mut fields = Vec::with_capacity(6);
    for axis in Axis::ALL {
        let value = match axis {
            Axis::X => pose.position.x,
            Axis::Y => pose.position.y,
            Axis::Z => pose.position.z,
        };
        fields.push(FieldDescriptor::new(FieldKey::Position(axis), value));
    }
    for axis in Axis::ALL {
        fields.push(FieldDescriptor::new(FieldKey::Rotation(axis), pose.rotation.get(axis)));
    }
    if let Some(vertices) = primitive.vertices() {
        for (i, vertex) in vertices.iter().enumerate() {
            for axis in PlanarAxis::ALL {
                let key = FieldKey::Vertex { index: i + 1, axis };
                fields.push(FieldDescriptor::new(key, vertex.get(axis)));
            }
        }
    }
    fields
}

pub fn camera_fields(camera: &Camera) -> Vec<FieldDescriptor> {
    Axis::ALL
        .iter()
        .map(|&axis| FieldDescriptor::new(FieldKey::CameraRotation(axis), camera.rotation.get(axis)))
        .collect()
}

/// Write an already-validated value onto a primitive
///
/// Nothing is written unless the key applies to this primitive.
pub fn apply_edit(primitive: &mut Primitive, key: FieldKey, number: f32) -> Result<EditKind, EditError> {
    match key {
        FieldKey::Position(axis) => {
            let position = &mut primitive.pose.position;
            match axis {
                Axis::X => position.x = number,
                Axis::Y => position.y = number,
                Axis::Z => position.z = number,
            }
            Ok(EditKind::Pose)
        }
        FieldKey::Rotation(axis) => {
            primitive.pose.rotation.set(axis, number);
            Ok(EditKind::Pose)
        }
        FieldKey::Vertex { index, axis } => {
            let vertices = primitive
                .vertices_mut()
                .ok_or_else(|| EditError::NotAPolygon(key.to_string()))?;
            let count = vertices.len();
            if index == 0 || index > count {
                return Err(EditError::VertexOutOfRange { index, count });
            }
            vertices[index - 1].set(axis, number);
            Ok(EditKind::Vertex)
        }
        FieldKey::CameraRotation(_) => Err(EditError::UnknownField(key.to_string())),
    }
}
