//! Cell grid geometry shared by pixel-addressed substrates.

/// Size of one character cell in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Cell width in pixels.
    pub cell_width: f32,
    /// Cell height in pixels.
    pub cell_height: f32,
}

/// A screen point resolved to a cell plus the offset inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPosition {
    /// Cell row.
    pub row: i32,
    /// Cell column.
    pub col: i32,
    /// Horizontal offset inside the cell, in `[0, 1)`.
    pub sub_x: f32,
    /// Vertical offset inside the cell, in `[0, 1)`.
    pub sub_y: f32,
}

/// Largest sub-cell offset; keeps a point on a cell's far edge inside that cell.
pub const MAX_SUB_CELL: f32 = 0.999_999;

impl CellMetrics {
    /// Create metrics. Non-positive sizes are raised to one pixel.
    #[must_use]
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width: cell_width.max(1.0),
            cell_height: cell_height.max(1.0),
        }
    }

    /// Resolve a top-left-origin pixel position to a cell.
    #[must_use]
    pub fn screen_to_grid(&self, x: f32, y: f32) -> GridPosition {
        let col_f = x / self.cell_width;
        let row_f = y / self.cell_height;
        let col = col_f.floor();
        let row = row_f.floor();
        GridPosition {
            row: row as i32,
            col: col as i32,
            sub_x: (col_f - col).clamp(0.0, MAX_SUB_CELL),
            sub_y: (row_f - row).clamp(0.0, MAX_SUB_CELL),
        }
    }

    /// Top-left pixel of a cell.
    #[must_use]
    pub fn grid_to_screen(&self, row: i32, col: i32) -> (f32, f32) {
        (col as f32 * self.cell_width, row as f32 * self.cell_height)
    }

    /// Number of whole cells that fit in a pixel area, as `(rows, cols)`.
    #[must_use]
    pub fn grid_size(&self, width_px: f32, height_px: f32) -> (i32, i32) {
        let rows = (height_px / self.cell_height).floor().max(0.0) as i32;
        let cols = (width_px / self.cell_width).floor().max(0.0) as i32;
        (rows, cols)
    }
}

/// Clamp a cell coordinate into a `rows` x `cols` grid.
///
/// Returns `(0, 0)` for an empty grid.
#[must_use]
pub fn clamp_to_grid(row: i32, col: i32, rows: i32, cols: i32) -> (i32, i32) {
    (
        row.clamp(0, (rows - 1).max(0)),
        col.clamp(0, (cols - 1).max(0)),
    )
}

/// Intersect a region with a `rows` x `cols` grid.
///
/// Returns half-open `(row_start, row_end, col_start, col_end)`, or `None`
/// when nothing of the region is visible.
#[must_use]
pub fn clip_region(
    row: i32,
    col: i32,
    height: i32,
    width: i32,
    rows: i32,
    cols: i32,
) -> Option<(i32, i32, i32, i32)> {
    let row_start = row.max(0);
    let col_start = col.max(0);
    let row_end = row.saturating_add(height).min(rows);
    let col_end = col.saturating_add(width).min(cols);
    (row_start < row_end && col_start < col_end).then_some((row_start, row_end, col_start, col_end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_screen_to_grid() {
        let m = CellMetrics::new(8.0, 16.0);
        let pos = m.screen_to_grid(20.0, 40.0);
        assert_eq!(pos.col, 2);
        assert_eq!(pos.row, 2);
        assert!((pos.sub_x - 0.5).abs() < 1e-6);
        assert!((pos.sub_y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_screen_to_grid_origin() {
        let m = CellMetrics::new(10.0, 20.0);
        let pos = m.screen_to_grid(0.0, 0.0);
        assert_eq!((pos.row, pos.col), (0, 0));
        assert_eq!(pos.sub_x, 0.0);
    }

    #[test]
    fn test_grid_to_screen() {
        let m = CellMetrics::new(8.0, 16.0);
        assert_eq!(m.grid_to_screen(3, 5), (40.0, 48.0));
    }

    #[test]
    fn test_metrics_floor() {
        let m = CellMetrics::new(0.0, -3.0);
        assert_eq!(m.cell_width, 1.0);
        assert_eq!(m.cell_height, 1.0);
    }

    #[test]
    fn test_grid_size() {
        let m = CellMetrics::new(8.0, 16.0);
        assert_eq!(m.grid_size(800.0, 400.0), (25, 100));
        assert_eq!(m.grid_size(7.0, 15.0), (0, 0));
    }

    #[test]
    fn test_clamp_to_grid() {
        assert_eq!(clamp_to_grid(-3, 100, 24, 80), (0, 79));
        assert_eq!(clamp_to_grid(5, 5, 0, 0), (0, 0));
    }

    #[test]
    fn test_clip_region() {
        assert_eq!(clip_region(-2, -2, 5, 5, 10, 10), Some((0, 3, 0, 3)));
        assert_eq!(clip_region(8, 8, 5, 5, 10, 10), Some((8, 10, 8, 10)));
        assert_eq!(clip_region(12, 0, 5, 5, 10, 10), None);
        assert_eq!(clip_region(0, 0, 0, 5, 10, 10), None);
    }

    proptest! {
        #[test]
        fn prop_sub_cell_in_unit_interval(x in 0.0f32..10_000.0, y in 0.0f32..10_000.0) {
            let pos = CellMetrics::new(7.0, 13.0).screen_to_grid(x, y);
            prop_assert!(pos.sub_x >= 0.0 && pos.sub_x < 1.0);
            prop_assert!(pos.sub_y >= 0.0 && pos.sub_y < 1.0);
        }

        #[test]
        fn prop_cell_origin_maps_back(row in 0i32..500, col in 0i32..500) {
            let m = CellMetrics::new(8.0, 16.0);
            let (x, y) = m.grid_to_screen(row, col);
            let pos = m.screen_to_grid(x, y);
            prop_assert_eq!((pos.row, pos.col), (row, col));
        }
    }
}
