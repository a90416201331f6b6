//! Orthographic mapping between CSS pixels and a character grid
use nalgebra::{Matrix4, Point2, Point3};

/// Grid of character cells laid over the CSS pixel plane
///
/// Pixel (0, 0) is the top-left corner of cell (0, 0). Depth grows away from
/// the viewer, so CSS z (toward the viewer) maps to `-z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub px_per_column: f32,
    pub px_per_row: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, px_per_column: f32, px_per_row: f32) -> Self {
        Self {
            width,
            height,
            px_per_column,
            px_per_row,
        }
    }

    /// Centre of the grid in CSS pixels
    pub fn centre(&self) -> Point3<f32> {
        Point3::new(
            self.width as f32 * self.px_per_column / 2.0,
            self.height as f32 * self.px_per_row / 2.0,
            0.0,
        )
    }

    /// Re-centre a container transform so it pivots about the grid centre
    pub fn pivot(&self, container: &Matrix4<f32>) -> Matrix4<f32> {
        let c = self.centre().coords;
        Matrix4::new_translation(&c) * container * Matrix4::new_translation(&-c)
    }

    /// Project a point to (column, row, depth); `None` for non-finite input
    pub fn project_to_screen(&self, point: &Point3<f32>, model_matrix: &Matrix4<f32>) -> Option<(f32, f32, f32)> {
        let p = model_matrix.transform_point(point);
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            return None;
        }
        Some((p.x / self.px_per_column, p.y / self.px_per_row, -p.z))
    }

    /// Centre of a cell in CSS pixels
    pub fn cell_to_screen(&self, column: u16, row: u16) -> Point2<f32> {
        Point2::new(
            (column as f32 + 0.5) * self.px_per_column,
            (row as f32 + 0.5) * self.px_per_row,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24, 8.0, 16.0)
    }
}
