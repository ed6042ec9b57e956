//! Conversion between pixel damage rectangles and cell ranges.

use crate::surface::{PixelRect, SurfaceOrigin};
use ttk_core::CellMetrics;

/// Half-open cell range `rows.0..rows.1`, `cols.0..cols.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRegion {
    /// First row.
    pub row_start: i32,
    /// One past the last row.
    pub row_end: i32,
    /// First column.
    pub col_start: i32,
    /// One past the last column.
    pub col_end: i32,
}

impl DirtyRegion {
    /// The whole grid.
    #[must_use]
    pub const fn full(rows: i32, cols: i32) -> Self {
        Self {
            row_start: 0,
            row_end: rows,
            col_start: 0,
            col_end: cols,
        }
    }

    /// Check if the range covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.row_start >= self.row_end || self.col_start >= self.col_end
    }

    /// Check if a cell is inside the range.
    #[must_use]
    pub const fn contains(&self, row: i32, col: i32) -> bool {
        row >= self.row_start && row < self.row_end && col >= self.col_start && col < self.col_end
    }

    /// Cells touched by a pixel rectangle, clamped to the grid.
    ///
    /// Partially covered cells count. On a bottom-left surface the top edge
    /// of the rectangle (its highest y) maps to the first row.
    #[must_use]
    pub fn from_pixels(
        rect: PixelRect,
        rows: i32,
        cols: i32,
        metrics: CellMetrics,
        origin: SurfaceOrigin,
    ) -> Self {
        let (cw, ch) = (metrics.cell_width, metrics.cell_height);
        let col_start = ((rect.x / cw).floor() as i32).clamp(0, cols);
        let col_end = (((rect.x + rect.width) / cw).ceil() as i32).clamp(0, cols);

        let (row_start, row_end) = match origin {
            SurfaceOrigin::TopLeft => (
                (rect.y / ch).floor() as i32,
                ((rect.y + rect.height) / ch).ceil() as i32,
            ),
            SurfaceOrigin::BottomLeft => (
                rows - ((rect.y + rect.height) / ch).ceil() as i32,
                rows - (rect.y / ch).floor() as i32,
            ),
        };
        let row_start = row_start.clamp(0, rows);
        let row_end = row_end.clamp(0, rows);

        Self {
            row_start: row_start.min(row_end),
            row_end,
            col_start: col_start.min(col_end),
            col_end,
        }
    }

    /// Pixel rectangle covering the range.
    #[must_use]
    pub fn to_pixels(&self, rows: i32, metrics: CellMetrics, origin: SurfaceOrigin) -> PixelRect {
        let (cw, ch) = (metrics.cell_width, metrics.cell_height);
        let height = (self.row_end - self.row_start) as f32 * ch;
        let y = match origin {
            SurfaceOrigin::TopLeft => self.row_start as f32 * ch,
            SurfaceOrigin::BottomLeft => (rows - self.row_end) as f32 * ch,
        };
        PixelRect {
            x: self.col_start as f32 * cw,
            y,
            width: (self.col_end - self.col_start) as f32 * cw,
            height,
        }
    }
}

/// Pixel edge of a row: its top on top-left surfaces, its bottom otherwise.
#[must_use]
pub fn row_edge(row: i32, rows: i32, metrics: CellMetrics, origin: SurfaceOrigin) -> f32 {
    match origin {
        SurfaceOrigin::TopLeft => row as f32 * metrics.cell_height,
        SurfaceOrigin::BottomLeft => (rows - row - 1) as f32 * metrics.cell_height,
    }
}
