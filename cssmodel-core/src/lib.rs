//! cssmodel Core Library - Scene model for the 3D CSS model editor
//!
//! This library holds everything except pixels: primitive geometry, transform
//! composition, the scene graph, property binding, drag handling and HTML
//! export. Rendering, the property panel and file saving are supplied by the
//! front-end through the traits in [`projector`].

pub mod binder;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod primitive;
pub mod projection;
pub mod projector;
pub mod scene;
pub mod serializer;
pub mod session;
pub mod transform;

// Re-export commonly used types
pub use binder::{FieldDescriptor, FieldKey};
pub use error::{EditError, EditorError, ExportError};
pub use geometry::{Axis, ClipRegion, Face, Mesh, PercentPoint, PlanarAxis, Triangle, Vertex};
pub use primitive::{create_cuboid, create_polygon, Primitive, PrimitiveKind};
pub use projection::Viewport;
pub use projector::{ExportSink, FormGenerator, VisualProjector};
pub use scene::{Camera, EntityId, ObjectId, Scene};
pub use session::{EditOutcome, EditorSession};
pub use transform::{
    compose_camera_transform, compose_object_transform, Pose, RotationState, Transform,
    TransformDescription,
};
