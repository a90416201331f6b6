use cssmodel_core::binder::EditKind;
use cssmodel_core::error::EditError;
use cssmodel_core::{
    Axis, ClipRegion, EditOutcome, EditorError, EditorSession, EntityId, ExportError, ExportSink,
    FieldDescriptor, FormGenerator, PercentPoint, Primitive, PrimitiveKind, RotationState,
    TransformDescription, VisualProjector,
};
use nalgebra::{Point2, Vector3};

#[derive(Debug, Default)]
struct RecordingProjector {
    spawned: Vec<(EntityId, PrimitiveKind)>,
    transforms: Vec<(EntityId, String)>,
    clips: Vec<(EntityId, String)>,
    captures: usize,
    releases: usize,
}

impl RecordingProjector {
    fn last_transform(&self, entity: EntityId) -> Option<&str> {
        self.transforms
            .iter()
            .rev()
            .find(|(e, _)| *e == entity)
            .map(|(_, t)| t.as_str())
    }
}

impl VisualProjector for RecordingProjector {
    fn spawn(&mut self, entity: EntityId, primitive: &Primitive) {
        self.spawned.push((entity, primitive.kind()));
    }

    fn push_transform(&mut self, entity: EntityId, transform: &TransformDescription) {
        self.transforms.push((entity, transform.to_string()));
    }

    fn push_clip_region(&mut self, entity: EntityId, clip: &ClipRegion) {
        self.clips.push((entity, clip.to_string()));
    }

    fn capture_pointer(&mut self) {
        self.captures += 1;
    }

    fn release_pointer(&mut self) {
        self.releases += 1;
    }
}

#[derive(Debug, Default)]
struct RecordingForm {
    renders: usize,
    fields: Vec<FieldDescriptor>,
}

impl RecordingForm {
    fn value(&self, label: &str) -> Option<f32> {
        self.fields.iter().find(|f| f.label == label).map(|f| f.value)
    }
}

impl FormGenerator for RecordingForm {
    fn render_fields(&mut self, fields: &[FieldDescriptor]) {
        self.renders += 1;
        self.fields = fields.to_vec();
    }
}

#[derive(Debug, Default)]
struct RecordingSink {
    saved: Vec<(String, String)>,
    fail: bool,
}

impl ExportSink for RecordingSink {
    fn save(&mut self, filename: &str, markup: &str) -> Result<(), ExportError> {
        if self.fail {
            return Err(ExportError::Unavailable("disk full".to_string()));
        }
        self.saved.push((filename.to_string(), markup.to_string()));
        Ok(())
    }
}

type Session = EditorSession<RecordingProjector, RecordingForm, RecordingSink>;

fn session() -> Session {
    EditorSession::new(
        RecordingProjector::default(),
        RecordingForm::default(),
        RecordingSink::default(),
    )
}

#[test]
fn camera_transform_pushed_at_startup() {
    let session = session();
    assert_eq!(
        session.projector().last_transform(EntityId::Camera),
        Some("rotateX(0deg) rotateY(0deg) rotateZ(0deg)")
    );
}

#[test]
fn add_cuboid_then_rotate_y() {
    let mut session = session();
    let cube = session.add_cuboid();
    let primitive = session.scene().get(cube).unwrap();
    assert_eq!(primitive.pose.position, Vector3::new(200.0, 200.0, 0.0));
    assert_eq!(primitive.pose.rotation, RotationState::zero());
    assert_eq!(session.scene().selected(), Some(cube));
    assert!(session.drag().is_draggable(cube));
    assert_eq!(
        session.projector().spawned,
        vec![(EntityId::Object(cube), PrimitiveKind::Cuboid)]
    );

    let outcome = session.apply_edit("rotation.y", "45").unwrap();
    assert_eq!(outcome, EditOutcome::Applied(EditKind::Pose));
    assert_eq!(
        session.projector().last_transform(EntityId::Object(cube)),
        Some("translate3d(200px,200px,0px) rotateX(0deg) rotateY(45deg) rotateZ(0deg)")
    );
    assert_eq!(session.form().value("rotation.y"), Some(45.0));
}

#[test]
fn camera_rotation_leaves_polygon_alone() {
    let mut session = session();
    let polygon = session.add_polygon();
    let before = session
        .projector()
        .last_transform(EntityId::Object(polygon))
        .map(str::to_string);

    assert_eq!(
        session.apply_edit("camera.rotation.x", "30"),
        Ok(EditOutcome::Camera)
    );
    assert_eq!(
        session.projector().last_transform(EntityId::Camera),
        Some("rotateX(30deg) rotateY(0deg) rotateZ(0deg)")
    );
    assert_eq!(
        session
            .projector()
            .last_transform(EntityId::Object(polygon))
            .map(str::to_string),
        before
    );
    assert_eq!(session.scene().get(polygon).unwrap().pose.rotation, RotationState::zero());

    session.update_camera_rotation(Axis::Z, -15.0);
    assert_eq!(
        session.projector().last_transform(EntityId::Camera),
        Some("rotateX(30deg) rotateY(0deg) rotateZ(-15deg)")
    );
    assert_eq!(session.camera_fields()[2].value, -15.0);
}

#[test]
fn camera_edit_refreshes_property_view() {
    let mut session = session();
    session.add_cuboid();
    let renders = session.form().renders;

    session.apply_edit("camera.rotation.y", "10").unwrap();
    assert_eq!(session.form().renders, renders + 1);
    session.update_camera_rotation(Axis::X, 5.0);
    assert_eq!(session.form().renders, renders + 2);

    // Rejected camera edits leave the view alone
    assert!(session.apply_edit("camera.rotation.z", "x").is_err());
    assert_eq!(session.form().renders, renders + 2);
    assert_eq!(session.form().value("position.x"), Some(200.0));
}

#[test]
fn invalid_numbers_are_rejected() {
    let mut session = session();
    let cube = session.add_cuboid();
    let pushes = session.projector().transforms.len();
    let pose = session.scene().get(cube).unwrap().pose;

    for raw in ["abc", "12px", "NaN", ""] {
        assert!(matches!(
            session.apply_edit("position.x", raw),
            Err(EditError::InvalidNumber { .. })
        ));
    }
    assert!(matches!(
        session.apply_edit("camera.rotation.y", "ten"),
        Err(EditError::InvalidNumber { .. })
    ));
    assert!(matches!(
        session.apply_edit("scale.x", "2"),
        Err(EditError::UnknownField(_))
    ));

    assert_eq!(session.scene().get(cube).unwrap().pose, pose);
    assert_eq!(session.projector().transforms.len(), pushes);
    assert_eq!(session.scene().camera().rotation, RotationState::zero());
}

#[test]
fn edit_without_selection_is_ignored() {
    let mut session = session();
    assert_eq!(session.apply_edit("position.x", "10"), Ok(EditOutcome::Ignored));
    assert_eq!(session.form().renders, 0);
    assert!(session.selected_fields().is_empty());
}

#[test]
fn vertex_edit_recomputes_clip() {
    let mut session = session();
    let polygon = session.add_polygon();
    assert_eq!(
        session.projector().clips,
        vec![(EntityId::Object(polygon), "polygon(0% 0%,100% 0%,50% 100%)".to_string())]
    );

    assert_eq!(
        session.apply_edit("v3.x", "75"),
        Ok(EditOutcome::Applied(EditKind::Vertex))
    );
    let vertices = session.scene().get(polygon).unwrap().vertices().unwrap();
    assert_eq!(vertices.len(), 3);
    assert_eq!(vertices[2], PercentPoint::new(75.0, 100.0));
    assert_eq!(
        session.projector().clips.last().map(|(_, c)| c.as_str()),
        Some("polygon(0% 0%,100% 0%,75% 100%)")
    );
    assert_eq!(session.form().value("v3.x"), Some(75.0));

    assert_eq!(
        session.apply_edit("v4.x", "10"),
        Err(EditError::VertexOutOfRange { index: 4, count: 3 })
    );
    assert_eq!(session.scene().get(polygon).unwrap().vertices().unwrap().len(), 3);
}

#[test]
fn vertex_field_on_cuboid_is_rejected() {
    let mut session = session();
    session.add_cuboid();
    assert!(matches!(
        session.apply_edit("v1.x", "10"),
        Err(EditError::NotAPolygon(_))
    ));
    assert!(session.projector().clips.is_empty());
}

#[test]
fn drag_moves_x_and_y_only() {
    let mut session = session();
    let cube = session.add_cuboid();
    session.apply_edit("position.z", "40").unwrap();
    session.apply_edit("rotation.x", "10").unwrap();

    assert!(session.pointer_down(cube, Point2::new(50.0, 60.0)));
    session.pointer_move(Point2::new(80.0, 50.0));
    session.pointer_move(Point2::new(65.0, 95.0));

    let pose = session.scene().get(cube).unwrap().pose;
    assert_eq!(pose.position, Vector3::new(215.0, 235.0, 40.0));
    assert_eq!(pose.rotation, RotationState::new(10.0, 0.0, 0.0));

    // The panel tracks the drag live
    assert_eq!(session.form().value("position.x"), Some(215.0));
    assert_eq!(session.form().value("position.y"), Some(235.0));
    assert_eq!(
        session.projector().last_transform(EntityId::Object(cube)),
        Some("translate3d(215px,235px,40px) rotateX(10deg) rotateY(0deg) rotateZ(0deg)")
    );

    session.pointer_up();
    assert!(session.pointer_move(Point2::new(0.0, 0.0)).is_none());
    assert_eq!(session.scene().get(cube).unwrap().pose.position.x, 215.0);
}

#[test]
fn drag_and_field_edits_stay_consistent() {
    let mut session = session();
    let cube = session.add_cuboid();
    session.pointer_down(cube, Point2::new(0.0, 0.0));
    session.pointer_move(Point2::new(10.0, 0.0));
    session.pointer_up();

    session.apply_edit("position.x", "300").unwrap();
    assert_eq!(session.form().value("position.x"), Some(300.0));

    // A fresh press anchors at the edited position
    session.pointer_down(cube, Point2::new(0.0, 0.0));
    session.pointer_move(Point2::new(5.0, 5.0));
    session.pointer_up();
    assert_eq!(session.form().value("position.x"), Some(305.0));
    assert_eq!(session.form().value("position.y"), Some(205.0));
}

#[test]
fn pointer_capture_released_exactly_once() {
    let mut session = session();
    let first = session.add_cuboid();
    let second = session.add_polygon();

    session.pointer_down(first, Point2::new(0.0, 0.0));
    assert_eq!(session.projector().captures, 1);
    assert_eq!(session.scene().selected(), Some(first));

    // A new press closes the running session before opening another
    session.pointer_down(second, Point2::new(0.0, 0.0));
    assert_eq!(session.projector().captures, 2);
    assert_eq!(session.projector().releases, 1);
    assert_eq!(session.drag().dragged(), Some(second));

    session.pointer_up();
    session.pointer_up();
    assert_eq!(session.projector().releases, 2);
    assert!(!session.drag().is_dragging());
}

#[test]
fn select_switches_property_view() {
    let mut session = session();
    let cube = session.add_cuboid();
    session.apply_edit("position.x", "10").unwrap();
    let polygon = session.add_polygon();
    assert_eq!(session.form().fields.len(), 12);

    session.select(cube).unwrap();
    assert_eq!(session.form().fields.len(), 6);
    assert_eq!(session.form().value("position.x"), Some(10.0));

    session.select(polygon).unwrap();
    assert_eq!(session.form().value("position.x"), Some(200.0));
}

#[test]
fn select_unknown_object_fails() {
    let mut other = session();
    other.add_cuboid();
    let foreign = other.add_cuboid();

    let mut session = session();
    session.add_cuboid();
    assert!(matches!(
        session.select(foreign),
        Err(EditorError::UnknownObject(_))
    ));
    assert!(!session.pointer_down(foreign, Point2::new(0.0, 0.0)));
}

#[test]
fn foreign_handle_with_matching_index_is_rejected() {
    let mut other = session();
    let foreign = other.add_polygon();

    let mut session = session();
    let own = session.add_cuboid();
    assert_eq!(foreign.index(), own.index());
    assert!(matches!(
        session.select(foreign),
        Err(EditorError::UnknownObject(_))
    ));
    assert!(!session.pointer_down(foreign, Point2::new(200.0, 200.0)));
    assert_eq!(session.scene().selected(), Some(own));
}

#[test]
fn export_with_empty_name_does_nothing() {
    let mut session = session();
    session.add_cuboid();
    assert!(session.export(Some("")).unwrap().is_none());
    assert!(session.export(None).unwrap().is_none());
    assert!(session.sink().saved.is_empty());
}

#[test]
fn export_hands_document_to_sink() {
    let mut session = session();
    session.add_cuboid();
    session.apply_edit("camera.rotation.y", "20").unwrap();
    let export = session.export(Some("scene")).unwrap().unwrap();

    let saved = &session.sink().saved;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, "scene.html");
    assert_eq!(saved[0].1, export.document);
    assert!(export
        .document
        .contains("<div id=\"camera\" style=\"transform: rotateX(0deg) rotateY(20deg) rotateZ(0deg);\">"));
}

#[test]
fn export_sink_failure_is_reported() {
    let mut session = EditorSession::new(
        RecordingProjector::default(),
        RecordingForm::default(),
        RecordingSink {
            fail: true,
            ..Default::default()
        },
    );
    assert!(matches!(
        session.export(Some("scene")),
        Err(ExportError::Unavailable(_))
    ));
}
