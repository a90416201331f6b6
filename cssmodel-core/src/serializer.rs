//! Static HTML snapshot of the camera container
use crate::geometry::FACE_SIZE;
use crate::primitive::Primitive;
use crate::scene::{ObjectId, Scene};
use crate::transform::compose_object_transform;

pub const STYLESHEET_HREF: &str = "css/style.css";
pub const ATTRIBUTION: &str = "<!-- Created with cssmodel 3D CSS model editor -->";

/// A named, ready-to-save document
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub filename: String,
    pub document: String,
}

/// Snapshot the scene under `name`; a missing or blank name aborts
pub fn export(scene: &Scene, name: Option<&str>) -> Option<Export> {
    let name = name.map(str::trim).filter(|name| !name.is_empty())?;
    Some(Export {
        filename: format!("{name}.html"),
        document: document(scene),
    })
}

/// Full standalone document wrapping the camera markup
pub fn document(scene: &Scene) -> String {
    format!(
        "{ATTRIBUTION}
<!DOCTYPE html>
<html lang=\"en\">
<head>
  <meta charset=\"UTF-8\">
  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
  <link rel=\"stylesheet\" href=\"{STYLESHEET_HREF}\">
</head>
<body>
  <div id=\"viewport\">
    {camera}
  </div>
</body>
</html>",
        camera = camera_markup(scene)
    )
}

/// The camera container with every primitive as currently composed
pub fn camera_markup(scene: &Scene) -> String {
    let mut out = format!(
        "<div id=\"camera\" style=\"transform: {};\">\n",
        scene.camera().transform()
    );
    for (id, primitive) in scene.objects() {
        object_markup(&mut out, id, primitive);
    }
    out.push_str("    </div>");
    out
}

fn object_markup(out: &mut String, id: ObjectId, primitive: &Primitive) {
    out.push_str(&format!(
        "      <div id=\"{}\" class=\"object3d\" style=\"transform: {};\">\n",
        id.element_id(),
        compose_object_transform(&primitive.pose)
    ));
    if let Some(faces) = primitive.faces() {
        for face in faces {
            out.push_str(&format!(
                "        <div class=\"face\" style=\"width: {size}px; height: {size}px; transform: {};\"></div>\n",
                face.transform(),
                size = FACE_SIZE
            ));
        }
    }
    if let Some(clip) = primitive.clip_region() {
        out.push_str(&format!(
            "        <div class=\"face polygon\" style=\"width: {size}px; height: {size}px; clip-path: {clip};\"></div>\n",
            size = FACE_SIZE
        ));
    }
    out.push_str("      </div>\n");
}
