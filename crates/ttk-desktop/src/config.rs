//! Desktop backend configuration.

use crate::error::DesktopError;
use ttk_core::CellMetrics;

/// Advance of a monospace glyph relative to the point size.
const WIDTH_PER_POINT: f32 = 0.6;
/// Line height relative to the point size, without extra leading so box glyphs connect.
const HEIGHT_PER_POINT: f32 = 1.2;

/// Configuration for [`CanvasBackend`](crate::CanvasBackend) and the GPU backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DesktopConfig {
    /// Window title.
    pub window_title: String,
    /// Monospace font family.
    pub font_name: String,
    /// Font size in points.
    pub font_size: f32,
    /// Initial grid rows.
    pub rows: u16,
    /// Initial grid columns.
    pub cols: u16,
    /// Cell width in pixels.
    pub cell_width_px: f32,
    /// Cell height in pixels.
    pub cell_height_px: f32,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self::with_font("Menlo", 12.0)
    }
}

impl DesktopConfig {
    /// Default window with the given font; cell size follows the font size.
    #[must_use]
    pub fn with_font(font_name: impl Into<String>, font_size: f32) -> Self {
        let (cell_width_px, cell_height_px) = cell_size_for(font_size);
        Self {
            window_title: "TTK".to_string(),
            font_name: font_name.into(),
            font_size,
            rows: 24,
            cols: 80,
            cell_width_px,
            cell_height_px,
        }
    }

    /// Builder: window title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    /// Builder: initial grid size.
    #[must_use]
    pub fn grid(mut self, rows: u16, cols: u16) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Cell metrics, rejecting sizes below one pixel.
    pub fn cell_metrics(&self) -> Result<CellMetrics, DesktopError> {
        let (w, h) = (self.cell_width_px, self.cell_height_px);
        if !(w >= 1.0 && h >= 1.0) {
            return Err(DesktopError::InvalidMetrics {
                font: self.font_name.clone(),
                width: w,
                height: h,
            });
        }
        Ok(CellMetrics::new(w, h))
    }

    /// Initial window content size in pixels.
    #[must_use]
    pub fn window_size(&self) -> (f32, f32) {
        (
            f32::from(self.cols) * self.cell_width_px,
            f32::from(self.rows) * self.cell_height_px,
        )
    }
}

/// Whole-pixel cell size for a font size.
fn cell_size_for(font_size: f32) -> (f32, f32) {
    (
        (font_size * WIDTH_PER_POINT).round(),
        (font_size * HEIGHT_PER_POINT).round(),
    )
}
