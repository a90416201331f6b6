//! Scene graph: the camera container, its primitives and the selection
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::geometry::Axis;
use crate::primitive::Primitive;
use crate::transform::{compose_camera_transform, RotationState, TransformDescription};

static NEXT_SCENE: AtomicU32 = AtomicU32::new(0);

/// Handle to a primitive in a [`Scene`]
///
/// Primitives are never removed, so a handle issued by a scene stays valid
/// for that scene's lifetime. Handles carry their scene's tag and are
/// rejected by every other scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    scene: u32,
    index: usize,
}

impl ObjectId {
    pub fn index(self) -> usize {
        self.index
    }

    /// Element id used in markup, 1-based
    pub fn element_id(self) -> String {
        format!("object-{}", self.index + 1)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index + 1)
    }
}

/// Anything a visual projector can be told about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    Camera,
    Object(ObjectId),
}

/// The rotatable container every primitive sits in; it is never translated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Camera {
    pub rotation: RotationState,
}

impl Camera {
    pub fn transform(&self) -> TransformDescription {
        compose_camera_transform(&self.rotation)
    }
}

#[derive(Debug)]
pub struct Scene {
    tag: u32,
    camera: Camera,
    objects: Vec<Primitive>,
    selected: Option<ObjectId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            tag: NEXT_SCENE.fetch_add(1, Ordering::Relaxed),
            camera: Camera::default(),
            objects: Vec::new(),
            selected: None,
        }
    }

    fn id(&self, index: usize) -> ObjectId {
        ObjectId { scene: self.tag, index }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Append a primitive and select it
    pub fn insert(&mut self, primitive: Primitive) -> ObjectId {
        let id = self.id(self.objects.len());
        self.objects.push(primitive);
        self.selected = Some(id);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&Primitive> {
        if id.scene != self.tag {
            return None;
        }
        self.objects.get(id.index)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Primitive> {
        if id.scene != self.tag {
            return None;
        }
        self.objects.get_mut(id.index)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        id.scene == self.tag && id.index < self.objects.len()
    }

    /// Primitives in creation order
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Primitive)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, primitive)| (self.id(i), primitive))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn selected_primitive(&self) -> Option<(ObjectId, &Primitive)> {
        let id = self.selected?;
        self.get(id).map(|primitive| (id, primitive))
    }

    /// Select a primitive already in the scene; returns false for foreign ids
    pub fn select(&mut self, id: ObjectId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Set one camera rotation component and recompose the camera transform
    pub fn update_camera_rotation(&mut self, axis: Axis, degrees: f32) -> TransformDescription {
        self.camera.rotation.set(axis, degrees);
        self.camera.transform()
    }
}
