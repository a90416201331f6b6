//! Editor session: scene, binder and drag controller wired to the collaborators
//!
//! Every pose or vertex change, whether it comes from a property edit or a
//! drag, goes through [`EditorSession::commit`]. That call recomposes and pushes
//! to the projector, then regenerates the property view. This keeps the panel
//! and the rendered scene in step.
use log::{debug, info, trace, warn};
use nalgebra::Point2;

use crate::binder::{self, EditKind, FieldDescriptor, FieldKey};
use crate::drag::{DragController, DragUpdate};
use crate::error::{EditError, EditorError, ExportError};
use crate::geometry::Axis;
use crate::primitive::{create_cuboid, create_polygon, Primitive};
use crate::projector::{ExportSink, FormGenerator, VisualProjector};
use crate::scene::{EntityId, ObjectId, Scene};
use crate::serializer::{self, Export};
use crate::transform::compose_object_transform;

/// Result of a property edit that was not rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied(EditKind),
    Camera,
    /// Nothing is selected
    Ignored,
}

pub struct EditorSession<P, F, S> {
    scene: Scene,
    drag: DragController,
    projector: P,
    form: F,
    sink: S,
}

impl<P, F, S> EditorSession<P, F, S>
where
    P: VisualProjector,
    F: FormGenerator,
    S: ExportSink,
{
    pub fn new(projector: P, form: F, sink: S) -> Self {
        let mut session = Self {
            scene: Scene::new(),
            drag: DragController::new(),
            projector,
            form,
            sink,
        };
        let camera = session.scene.camera().transform();
        session.projector.push_transform(EntityId::Camera, &camera);
        session
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn projector(&self) -> &P {
        &self.projector
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn add_cuboid(&mut self) -> ObjectId {
        self.add(create_cuboid())
    }

    pub fn add_polygon(&mut self) -> ObjectId {
        self.add(create_polygon())
    }

    fn add(&mut self, primitive: Primitive) -> ObjectId {
        let kind = primitive.kind();
        let id = self.scene.insert(primitive);
        debug!("Added {:?} {}", kind, id);

        if let Some(primitive) = self.scene.get(id) {
            self.projector.spawn(EntityId::Object(id), primitive);
        }
        self.drag.make_draggable(id);
        self.push_object(id, EditKind::Pose);
        self.push_object(id, EditKind::Vertex);
        self.refresh_fields();
        id
    }

    pub fn select(&mut self, id: ObjectId) -> Result<(), EditorError> {
        if !self.scene.select(id) {
            return Err(EditorError::UnknownObject(id));
        }
        debug!("Selected {}", id);
        self.refresh_fields();
        Ok(())
    }

    pub fn update_camera_rotation(&mut self, axis: Axis, degrees: f32) {
        let transform = self.scene.update_camera_rotation(axis, degrees);
        self.projector.push_transform(EntityId::Camera, &transform);
        self.refresh_fields();
    }

    pub fn camera_fields(&self) -> Vec<FieldDescriptor> {
        binder::camera_fields(self.scene.camera())
    }

    /// Field descriptors for the current selection, empty when nothing is selected
    pub fn selected_fields(&self) -> Vec<FieldDescriptor> {
        self.scene
            .selected_primitive()
            .map(|(_, primitive)| binder::render_fields_for(primitive))
            .unwrap_or_default()
    }

    /// Apply a raw value from the property panel
    ///
    /// Rejected edits are logged and leave every entity untouched.
    pub fn apply_edit(&mut self, field: &str, raw: &str) -> Result<EditOutcome, EditError> {
        let result = self.try_apply_edit(field, raw);
        if let Err(err) = &result {
            warn!("Rejected edit of {}: {}", field, err);
        }
        result
    }

    fn try_apply_edit(&mut self, field: &str, raw: &str) -> Result<EditOutcome, EditError> {
        let key = FieldKey::parse(field)?;
        if let FieldKey::CameraRotation(axis) = key {
            let degrees = binder::parse_number(field, raw)?;
            self.update_camera_rotation(axis, degrees);
            return Ok(EditOutcome::Camera);
        }

        let Some(id) = self.scene.selected() else {
            debug!("Ignoring edit of {} with nothing selected", field);
            return Ok(EditOutcome::Ignored);
        };
        let number = binder::parse_number(field, raw)?;
        let kind = match self.scene.get_mut(id) {
            Some(primitive) => binder::apply_edit(primitive, key, number)?,
            None => return Ok(EditOutcome::Ignored),
        };
        self.commit(id, kind);
        Ok(EditOutcome::Applied(kind))
    }

    /// Pointer pressed on a primitive's surface; starts a drag and selects it
    pub fn pointer_down(&mut self, id: ObjectId, pointer: Point2<f32>) -> bool {
        self.end_drag();

        let Some(position) = self.scene.get(id).map(|primitive| primitive.pose.position) else {
            return false;
        };
        if !self.drag.press(id, pointer, position) {
            return false;
        }
        self.projector.capture_pointer();
        self.scene.select(id);
        self.refresh_fields();
        true
    }

    pub fn pointer_move(&mut self, pointer: Point2<f32>) -> Option<DragUpdate> {
        let update = self.drag.pointer_move(pointer)?;
        trace!("Dragging {} to ({}, {})", update.object, update.x, update.y);
        if let Some(primitive) = self.scene.get_mut(update.object) {
            primitive.pose.position.x = update.x;
            primitive.pose.position.y = update.y;
        }
        self.commit(update.object, EditKind::Pose);
        Some(update)
    }

    /// Pointer released anywhere
    pub fn pointer_up(&mut self) {
        self.end_drag();
    }

    fn end_drag(&mut self) {
        if let Some(id) = self.drag.release() {
            debug!("Finished dragging {}", id);
            self.projector.release_pointer();
        }
    }

    /// Snapshot the scene and hand it to the export sink
    ///
    /// Returns `Ok(None)` when the name is missing or blank; nothing is saved.
    pub fn export(&mut self, name: Option<&str>) -> Result<Option<Export>, ExportError> {
        let Some(export) = serializer::export(&self.scene, name) else {
            debug!("Export aborted: no file name");
            return Ok(None);
        };
        self.sink.save(&export.filename, &export.document)?;
        info!("Exported {} objects to {}", self.scene.len(), export.filename);
        Ok(Some(export))
    }

    fn commit(&mut self, id: ObjectId, kind: EditKind) {
        self.push_object(id, kind);
        self.refresh_fields();
    }

    fn push_object(&mut self, id: ObjectId, kind: EditKind) {
        let Some(primitive) = self.scene.get(id) else {
            return;
        };
        let entity = EntityId::Object(id);
        match kind {
            EditKind::Pose => {
                let transform = compose_object_transform(&primitive.pose);
                self.projector.push_transform(entity, &transform);
            }
            EditKind::Vertex => {
                if let Some(clip) = primitive.clip_region() {
                    self.projector.push_clip_region(entity, &clip);
                }
            }
        }
    }

    fn refresh_fields(&mut self) {
        if let Some((_, primitive)) = self.scene.selected_primitive() {
            let fields = binder::render_fields_for(primitive);
            self.form.render_fields(&fields);
        }
    }
}
