//! cssmodel Web - DOM front-end for the 3D CSS model editor
//!
//! Primitives become nested `div`s under the page's `#camera` element. Pushed
//! transforms and clip regions are written straight into inline styles, so the
//! browser's CSS 3D transforms do the rendering.
//!
//! The page forwards `mousedown` on an object to [`WebEditor::pointer_down`].
//! While a drag is active the editor listens for `mousemove` and `mouseup` on
//! the whole document and removes both listeners when the drag ends.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use cssmodel_core::geometry::FACE_SIZE;
use cssmodel_core::{
    ClipRegion, EditorSession, EntityId, ExportError, ExportSink, FieldDescriptor, FormGenerator, ObjectId,
    Primitive, TransformDescription, VisualProjector,
};
use nalgebra::Point2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

type WebSession = EditorSession<DomProjector, FieldCache, DownloadSink>;

/// Holds the active listener set and the one most recently detached
///
/// A detached set is kept alive until the next attach, since detaching can
/// happen from inside one of its own callbacks.
struct ListenerSlot<T> {
    active: Option<T>,
    retired: Option<T>,
}

impl<T> ListenerSlot<T> {
    fn new() -> Self {
        Self {
            active: None,
            retired: None,
        }
    }

    /// Store a new active set, dropping the retired one
    fn attach(&mut self, listeners: T) {
        self.retired = None;
        self.active = Some(listeners);
    }

    /// Move the active set to retirement; returns it for unregistering
    fn detach(&mut self) -> Option<&T> {
        let listeners = self.active.take()?;
        self.retired = Some(listeners);
        self.retired.as_ref()
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

struct DragListeners {
    on_move: Closure<dyn FnMut(MouseEvent)>,
    on_up: Closure<dyn FnMut(MouseEvent)>,
}

impl DragListeners {
    fn new(session: Weak<RefCell<WebSession>>) -> Self {
        let move_target = session.clone();
        let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            with_session(&move_target, |session| {
                session.pointer_move(Point2::new(event.client_x() as f32, event.client_y() as f32));
            });
        }) as Box<dyn FnMut(MouseEvent)>);
        let on_up = Closure::wrap(Box::new(move |_event: MouseEvent| {
            with_session(&session, |session| session.pointer_up());
        }) as Box<dyn FnMut(MouseEvent)>);
        Self { on_move, on_up }
    }

    fn callbacks(&self) -> [(&'static str, &JsValue); 2] {
        [("mousemove", self.on_move.as_ref()), ("mouseup", self.on_up.as_ref())]
    }
}

fn with_session(session: &Weak<RefCell<WebSession>>, f: impl FnOnce(&mut WebSession)) {
    let Some(session) = session.upgrade() else {
        return;
    };
    match session.try_borrow_mut() {
        Ok(mut session) => f(&mut session),
        Err(_) => log::warn!("Pointer event arrived while the editor was busy"),
    };
}

struct ObjectNodes {
    root: HtmlElement,
    polygon_face: Option<HtmlElement>,
}

/// Writes transforms and clip paths onto DOM nodes and owns the drag listeners
pub struct DomProjector {
    document: Document,
    camera: HtmlElement,
    objects: HashMap<ObjectId, ObjectNodes>,
    session: Weak<RefCell<WebSession>>,
    listeners: ListenerSlot<DragListeners>,
}

impl DomProjector {
    fn new(document: Document, camera: HtmlElement, session: Weak<RefCell<WebSession>>) -> Self {
        Self {
            document,
            camera,
            objects: HashMap::new(),
            session,
            listeners: ListenerSlot::new(),
        }
    }

    fn div(&self, class: &str) -> Result<HtmlElement, JsValue> {
        let element: Element = self.document.create_element("div")?;
        element.set_class_name(class);
        element.dyn_into::<HtmlElement>().map_err(JsValue::from)
    }

    fn face(&self, class: &str) -> Result<HtmlElement, JsValue> {
        let face = self.div(class)?;
        let style = face.style();
        style.set_property("width", &format!("{FACE_SIZE}px"))?;
        style.set_property("height", &format!("{FACE_SIZE}px"))?;
        Ok(face)
    }

    fn build(&self, id: ObjectId, primitive: &Primitive) -> Result<ObjectNodes, JsValue> {
        let root = self.div("object3d")?;
        root.set_id(&id.element_id());
        let mut polygon_face = None;
        if let Some(faces) = primitive.faces() {
            for face in faces {
                let node = self.face("face")?;
                node.style().set_property("transform", &face.transform().to_string())?;
                root.append_child(&node)?;
            }
        }
        if primitive.vertices().is_some() {
            let node = self.face("face polygon")?;
            root.append_child(&node)?;
            polygon_face = Some(node);
        }
        self.camera.append_child(&root)?;
        Ok(ObjectNodes { root, polygon_face })
    }
}

impl VisualProjector for DomProjector {
    fn spawn(&mut self, entity: EntityId, primitive: &Primitive) {
        let EntityId::Object(id) = entity else {
            return;
        };
        match self.build(id, primitive) {
            Ok(nodes) => {
                self.objects.insert(id, nodes);
            }
            Err(err) => log::error!("Failed to build nodes for {}: {:?}", id, err),
        }
    }

    fn push_transform(&mut self, entity: EntityId, transform: &TransformDescription) {
        let node = match entity {
            EntityId::Camera => Some(&self.camera),
            EntityId::Object(id) => self.objects.get(&id).map(|nodes| &nodes.root),
        };
        if let Some(node) = node {
            if let Err(err) = node.style().set_property("transform", &transform.to_string()) {
                log::error!("Failed to set transform: {:?}", err);
            }
        }
    }

    fn push_clip_region(&mut self, entity: EntityId, clip: &ClipRegion) {
        let EntityId::Object(id) = entity else {
            return;
        };
        if let Some(face) = self.objects.get(&id).and_then(|nodes| nodes.polygon_face.as_ref()) {
            if let Err(err) = face.style().set_property("clip-path", &clip.to_string()) {
                log::error!("Failed to set clip-path: {:?}", err);
            }
        }
    }

    fn capture_pointer(&mut self) {
        let listeners = DragListeners::new(self.session.clone());
        for (kind, callback) in listeners.callbacks() {
            if let Err(err) = self
                .document
                .add_event_listener_with_callback(kind, callback.unchecked_ref())
            {
                log::error!("Failed to listen for {}: {:?}", kind, err);
            }
        }
        self.listeners.attach(listeners);
    }

    fn release_pointer(&mut self) {
        let Some(listeners) = self.listeners.detach() else {
            return;
        };
        for (kind, callback) in listeners.callbacks() {
            if let Err(err) = self
                .document
                .remove_event_listener_with_callback(kind, callback.unchecked_ref())
            {
                log::error!("Failed to stop listening for {}: {:?}", kind, err);
            }
        }
    }
}

impl Drop for DomProjector {
    fn drop(&mut self) {
        self.release_pointer();
    }
}

/// Field descriptors kept for the page to read back
#[derive(Default)]
pub struct FieldCache {
    fields: Vec<FieldDescriptor>,
}

impl FormGenerator for FieldCache {
    fn render_fields(&mut self, fields: &[FieldDescriptor]) {
        self.fields = fields.to_vec();
    }
}

/// Keeps the last exported document for the page to download
#[derive(Default)]
pub struct DownloadSink {
    last: Option<(String, String)>,
}

impl ExportSink for DownloadSink {
    fn save(&mut self, filename: &str, markup: &str) -> Result<(), ExportError> {
        self.last = Some((filename.to_string(), markup.to_string()));
        Ok(())
    }
}

#[wasm_bindgen]
pub struct WebEditor {
    session: Rc<RefCell<WebSession>>,
    objects: Vec<ObjectId>,
}

#[wasm_bindgen]
impl WebEditor {
    /// Attach to the element with the given id, usually `camera`
    #[wasm_bindgen(constructor)]
    pub fn new(camera_id: &str) -> Result<WebEditor, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("No document available"))?;
        let camera = document
            .get_element_by_id(camera_id)
            .ok_or_else(|| JsValue::from_str(&format!("No element with id {camera_id}")))?
            .dyn_into::<HtmlElement>()
            .map_err(JsValue::from)?;
        let session = Rc::new_cyclic(|weak| {
            RefCell::new(EditorSession::new(
                DomProjector::new(document, camera, weak.clone()),
                FieldCache::default(),
                DownloadSink::default(),
            ))
        });
        Ok(WebEditor {
            session,
            objects: Vec::new(),
        })
    }

    /// Add a cube and return its index
    pub fn add_cube(&mut self) -> usize {
        let id = self.session.borrow_mut().add_cuboid();
        self.objects.push(id);
        id.index()
    }

    /// Add a triangle and return its index
    pub fn add_triangle(&mut self) -> usize {
        let id = self.session.borrow_mut().add_polygon();
        self.objects.push(id);
        id.index()
    }

    pub fn select(&mut self, index: usize) -> Result<(), JsValue> {
        let id = self.object(index)?;
        self.session
            .borrow_mut()
            .select(id)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Apply a raw input value; returns false when the edit was rejected
    pub fn apply_edit(&mut self, field: &str, value: &str) -> bool {
        self.session.borrow_mut().apply_edit(field, value).is_ok()
    }

    pub fn field_count(&self) -> usize {
        self.session.borrow().form().fields.len()
    }

    pub fn field_label(&self, index: usize) -> Option<String> {
        self.session.borrow().form().fields.get(index).map(|f| f.label.clone())
    }

    pub fn field_value(&self, index: usize) -> Option<f32> {
        self.session.borrow().form().fields.get(index).map(|f| f.value)
    }

    /// Start dragging an object from a `mousedown` at client coordinates
    pub fn pointer_down(&mut self, index: usize, x: f32, y: f32) -> bool {
        match self.object(index) {
            Ok(id) => self.session.borrow_mut().pointer_down(id, Point2::new(x, y)),
            Err(_) => false,
        }
    }

    /// Whether document-level drag listeners are attached
    pub fn is_dragging(&self) -> bool {
        self.session.borrow().projector().listeners.is_active()
    }

    /// Export the scene; `None` when the name is blank
    pub fn export(&mut self, name: &str) -> Option<String> {
        let result = self.session.borrow_mut().export(Some(name));
        match result {
            Ok(Some(export)) => Some(export.document),
            Ok(None) => None,
            Err(err) => {
                log::warn!("Export failed: {}", err);
                None
            }
        }
    }

    /// File name of the most recent export
    pub fn last_export_name(&self) -> Option<String> {
        self.session.borrow().sink().last.as_ref().map(|(name, _)| name.clone())
    }

    fn object(&self, index: usize) -> Result<ObjectId, JsValue> {
        self.objects
            .get(index)
            .copied()
            .ok_or_else(|| JsValue::from_str(&format!("No object at index {index}")))
    }
}
