//! Character grid shared by the pixel backends.

use ttk_core::{clip_region, TextAttribute};

/// One cell: a glyph, the pair it is drawn with, and its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    /// Glyph.
    pub ch: char,
    /// Color pair id.
    pub pair: u8,
    /// Style bits.
    pub attributes: TextAttribute,
}

impl Default for GridCell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl GridCell {
    /// Space in the default pair.
    pub const BLANK: Self = Self {
        ch: ' ',
        pair: 0,
        attributes: TextAttribute::NORMAL,
    };
}

/// Row-major cell storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    rows: i32,
    cols: i32,
    cells: Vec<GridCell>,
}

impl CellGrid {
    /// Blank grid. Negative sizes give an empty grid.
    #[must_use]
    pub fn new(rows: i32, cols: i32) -> Self {
        let rows = rows.max(0);
        let cols = cols.max(0);
        Self {
            rows,
            cols,
            cells: vec![GridCell::BLANK; (rows * cols) as usize],
        }
    }

    /// Rows.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Columns.
    #[must_use]
    pub const fn cols(&self) -> i32 {
        self.cols
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        (row >= 0 && row < self.rows && col >= 0 && col < self.cols)
            .then(|| (row * self.cols + col) as usize)
    }

    /// Cell at a position.
    #[must_use]
    pub fn get(&self, row: i32, col: i32) -> Option<&GridCell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    /// Write one cell. Off-grid writes are ignored.
    pub fn put(&mut self, row: i32, col: i32, cell: GridCell) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = cell;
        }
    }

    /// Write text from `(row, col)`, one glyph per cell, clipped at both edges.
    ///
    /// Control characters are skipped without taking a cell.
    pub fn put_text(&mut self, row: i32, col: i32, text: &str, pair: u8, attributes: TextAttribute) {
        if row < 0 || row >= self.rows {
            return;
        }
        let mut c = col;
        for ch in text.chars().filter(|c| !c.is_control()) {
            if c >= self.cols {
                break;
            }
            self.put(row, c, GridCell { ch, pair, attributes });
            c += 1;
        }
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.cells.fill(GridCell::BLANK);
    }

    /// Fill a region, clipped to the grid.
    pub fn fill_region(&mut self, row: i32, col: i32, height: i32, width: i32, cell: GridCell) {
        let Some((r0, r1, c0, c1)) = clip_region(row, col, height, width, self.rows, self.cols) else {
            return;
        };
        for r in r0..r1 {
            let start = (r * self.cols + c0) as usize;
            let end = (r * self.cols + c1) as usize;
            self.cells[start..end].fill(cell);
        }
    }

    /// Blank a region, clipped to the grid.
    pub fn clear_region(&mut self, row: i32, col: i32, height: i32, width: i32) {
        self.fill_region(row, col, height, width, GridCell::BLANK);
    }

    /// Change size, keeping the overlapping top-left content.
    pub fn resize(&mut self, rows: i32, cols: i32) {
        let mut next = Self::new(rows, cols);
        for r in 0..self.rows.min(next.rows) {
            for c in 0..self.cols.min(next.cols) {
                if let Some(cell) = self.get(r, c) {
                    next.put(r, c, *cell);
                }
            }
        }
        *self = next;
    }

    /// Cells of one row.
    #[must_use]
    pub fn row(&self, row: i32) -> &[GridCell] {
        match self.index(row, 0) {
            Some(start) => &self.cells[start..start + self.cols as usize],
            None => &[],
        }
    }

    /// Glyphs of one row.
    #[must_use]
    pub fn row_text(&self, row: i32) -> String {
        self.row(row).iter().map(|cell| cell.ch).collect()
    }
}
