//! Terminal implementations of the editor's collaborators
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cssmodel_core::geometry::FACE_SIZE;
use cssmodel_core::{
    ClipRegion, EntityId, ExportError, ExportSink, FieldDescriptor, FormGenerator, Mesh, ObjectId,
    Primitive, TransformDescription, Viewport, VisualProjector,
};
use log::debug;
use nalgebra::Matrix4;

use crate::renderer::AsciiRenderer;

struct ObjectView {
    local: Mesh,
    model: Matrix4<f32>,
}

/// Holds the last pushed transform and geometry of every entity
pub struct TerminalProjector {
    camera: Matrix4<f32>,
    objects: BTreeMap<ObjectId, ObjectView>,
    pointer_captured: bool,
}

impl TerminalProjector {
    pub fn new() -> Self {
        Self {
            camera: Matrix4::identity(),
            objects: BTreeMap::new(),
            pointer_captured: false,
        }
    }

    /// Whether drag move/release events should be forwarded
    pub fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    /// Draw every object into the renderer, camera container outermost
    pub fn render(&self, renderer: &mut AsciiRenderer, viewport: &Viewport) {
        let container = viewport.pivot(&self.camera);
        for (id, view) in &self.objects {
            renderer.render_mesh(&view.local, &(container * view.model), viewport, *id);
        }
    }
}

impl Default for TerminalProjector {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualProjector for TerminalProjector {
    fn spawn(&mut self, entity: EntityId, primitive: &Primitive) {
        if let EntityId::Object(id) = entity {
            self.objects.insert(
                id,
                ObjectView {
                    local: primitive.local_mesh(),
                    model: Matrix4::identity(),
                },
            );
        }
    }

    fn push_transform(&mut self, entity: EntityId, transform: &TransformDescription) {
        let matrix = transform.to_matrix();
        match entity {
            EntityId::Camera => self.camera = matrix,
            EntityId::Object(id) => {
                if let Some(view) = self.objects.get_mut(&id) {
                    view.model = matrix;
                }
            }
        }
    }

    fn push_clip_region(&mut self, entity: EntityId, clip: &ClipRegion) {
        if let EntityId::Object(id) = entity {
            if let Some(view) = self.objects.get_mut(&id) {
                view.local = Mesh::fan(&clip.points, FACE_SIZE);
            }
        }
    }

    fn capture_pointer(&mut self) {
        self.pointer_captured = true;
    }

    fn release_pointer(&mut self) {
        self.pointer_captured = false;
    }
}

/// Property panel contents as last rendered by the session
#[derive(Debug, Default)]
pub struct PanelForm {
    fields: Vec<FieldDescriptor>,
}

impl PanelForm {
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

impl FormGenerator for PanelForm {
    fn render_fields(&mut self, fields: &[FieldDescriptor]) {
        self.fields = fields.to_vec();
    }
}

/// Writes exported documents into a directory
///
/// Only plain file names are accepted, so every document lands directly in `dir`.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for FileSink {
    fn save(&mut self, filename: &str, markup: &str) -> Result<(), ExportError> {
        if Path::new(filename).file_name() != Some(filename.as_ref()) {
            return Err(ExportError::InvalidName(filename.to_string()));
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, markup)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
