//! Interfaces to the editor's external collaborators
use crate::binder::FieldDescriptor;
use crate::error::ExportError;
use crate::geometry::ClipRegion;
use crate::primitive::Primitive;
use crate::scene::EntityId;
use crate::transform::TransformDescription;

/// Rendering substrate that turns composed transforms into pixels
pub trait VisualProjector {
    /// A primitive was added to the camera container
    fn spawn(&mut self, _entity: EntityId, _primitive: &Primitive) {}

    fn push_transform(&mut self, entity: EntityId, transform: &TransformDescription);

    fn push_clip_region(&mut self, entity: EntityId, clip: &ClipRegion);

    /// Attach the global pointer move/release listeners for a drag session
    fn capture_pointer(&mut self) {}

    /// Detach the listeners attached by [`VisualProjector::capture_pointer`]
    fn release_pointer(&mut self) {}
}

/// Property panel renderer
pub trait FormGenerator {
    fn render_fields(&mut self, fields: &[FieldDescriptor]);
}

/// Destination for exported documents
pub trait ExportSink {
    fn save(&mut self, filename: &str, markup: &str) -> Result<(), ExportError>;
}
