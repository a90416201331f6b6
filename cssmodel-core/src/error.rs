//! Error types for editing and exporting
use thiserror::Error;

use crate::scene::ObjectId;

/// Rejected property edits; the target is left untouched
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {field} expects a number, got {raw:?}")]
    InvalidNumber { field: String, raw: String },

    #[error("Vertex {index} out of range (polygon has {count})")]
    VertexOutOfRange { index: usize, count: usize },

    #[error("Field {0} only applies to polygons")]
    NotAPolygon(String),
}

/// Editor session errors
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Object {0} is not part of this scene")]
    UnknownObject(ObjectId),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

/// Failures reported by an export sink
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a plain file name: {0:?}")]
    InvalidName(String),

    #[error("Export sink unavailable: {0}")]
    Unavailable(String),
}
