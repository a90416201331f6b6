//! Pointer-drag state machine
//!
//! A press on a draggable primitive opens a drag session anchored at the
//! pointer and the primitive's position. Moves are measured from that anchor.
//! A release anywhere closes the session. The global move/release listeners
//! live exactly as long as the session does.
use std::collections::HashSet;

use nalgebra::{Point2, Vector3};

use crate::scene::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    object: ObjectId,
    anchor_pointer: Point2<f32>,
    anchor_position: Vector3<f32>,
}

/// New x/y position for the dragged primitive; z is never part of a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub object: ObjectId,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Default)]
pub struct DragController {
    draggable: HashSet<ObjectId>,
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire a primitive's surface to the press handler
    pub fn make_draggable(&mut self, object: ObjectId) {
        self.draggable.insert(object);
    }

    pub fn is_draggable(&self, object: ObjectId) -> bool {
        self.draggable.contains(&object)
    }

    pub fn state(&self, object: ObjectId) -> DragState {
        match self.session {
            Some(session) if session.object == object => DragState::Dragging,
            _ => DragState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn dragged(&self) -> Option<ObjectId> {
        self.session.map(|session| session.object)
    }

    /// Open a session; returns false if the primitive was never made draggable
    ///
    /// Callers close any running session through [`DragController::release`]
    /// first so its listeners are detached; a leftover session is discarded.
    pub fn press(&mut self, object: ObjectId, pointer: Point2<f32>, position: Vector3<f32>) -> bool {
        if !self.is_draggable(object) {
            return false;
        }
        self.session = Some(DragSession {
            object,
            anchor_pointer: pointer,
            anchor_position: position,
        });
        true
    }

    /// Position for the pointer's current location, or `None` while idle
    pub fn pointer_move(&self, pointer: Point2<f32>) -> Option<DragUpdate> {
        let session = self.session?;
        let delta = pointer - session.anchor_pointer;
        Some(DragUpdate {
            object: session.object,
            x: session.anchor_position.x + delta.x,
            y: session.anchor_position.y + delta.y,
        })
    }

    /// Close the session; the only way back to idle
    ///
    /// Returns the object that was being dragged, at most once per session.
    pub fn release(&mut self) -> Option<ObjectId> {
        self.session.take().map(|session| session.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::create_cuboid;
    use crate::scene::Scene;

    fn scene_with_cube() -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let id = scene.insert(create_cuboid());
        (scene, id)
    }

    #[test]
    fn test_press_requires_registration() {
        let (_, id) = scene_with_cube();
        let mut drag = DragController::new();
        assert!(!drag.press(id, Point2::new(0.0, 0.0), Vector3::zeros()));
        assert_eq!(drag.state(id), DragState::Idle);

        drag.make_draggable(id);
        assert!(drag.press(id, Point2::new(0.0, 0.0), Vector3::zeros()));
        assert_eq!(drag.state(id), DragState::Dragging);
    }

    #[test]
    fn test_move_is_relative_to_anchor() {
        let (_, id) = scene_with_cube();
        let mut drag = DragController::new();
        drag.make_draggable(id);
        drag.press(id, Point2::new(10.0, 10.0), Vector3::new(200.0, 200.0, 40.0));

        let first = drag.pointer_move(Point2::new(20.0, 30.0)).unwrap();
        assert_eq!((first.x, first.y), (210.0, 220.0));
        // Later moves do not accumulate on earlier ones
        let second = drag.pointer_move(Point2::new(35.0, -5.0)).unwrap();
        assert_eq!(second, DragUpdate { object: id, x: 225.0, y: 185.0 });
    }

    #[test]
    fn test_release_closes_once() {
        let (_, id) = scene_with_cube();
        let mut drag = DragController::new();
        drag.make_draggable(id);
        drag.press(id, Point2::new(0.0, 0.0), Vector3::zeros());

        assert_eq!(drag.release(), Some(id));
        assert_eq!(drag.release(), None);
        assert!(!drag.is_dragging());
        assert_eq!(drag.pointer_move(Point2::new(5.0, 5.0)), None);
    }
}
