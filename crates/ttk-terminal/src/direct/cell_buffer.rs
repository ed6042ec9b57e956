//! Cell buffer with zero-allocation steady state.
//!
//! Uses `CompactString` to inline small strings (≤24 bytes), avoiding
//! heap allocations for typical terminal content. Colors are stored already
//! resolved against the backend's color registry.

use bitvec::prelude::*;
use compact_str::CompactString;
use ttk_core::{BasicColor, ResolvedColor, TextAttribute};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A single terminal cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// The grapheme displayed in this cell (inlined for ≤24 bytes).
    pub symbol: CompactString,
    /// Foreground color.
    pub fg: ResolvedColor,
    /// Background color.
    pub bg: ResolvedColor,
    /// Text attributes.
    pub attributes: TextAttribute,
    /// Display width of the symbol (1 for normal, 2 for wide chars, 0 for continuation).
    width: u8,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(
            ResolvedColor::Basic(BasicColor::White),
            ResolvedColor::Basic(BasicColor::Black),
        )
    }
}

impl Cell {
    /// Create a new cell with the given content.
    #[must_use]
    pub fn new(symbol: &str, fg: ResolvedColor, bg: ResolvedColor, attributes: TextAttribute) -> Self {
        let width = UnicodeWidthStr::width(symbol).clamp(1, 255) as u8;
        Self {
            symbol: CompactString::new(symbol),
            fg,
            bg,
            attributes,
            width,
        }
    }

    /// A space in the given colors.
    #[must_use]
    pub fn blank(fg: ResolvedColor, bg: ResolvedColor) -> Self {
        Self {
            symbol: CompactString::const_new(" "),
            fg,
            bg,
            attributes: TextAttribute::NORMAL,
            width: 1,
        }
    }

    /// Update the cell content (zero-allocation for small strings).
    pub fn update(&mut self, symbol: &str, fg: ResolvedColor, bg: ResolvedColor, attributes: TextAttribute) {
        self.symbol.clear();
        self.symbol.push_str(symbol);
        self.fg = fg;
        self.bg = bg;
        self.attributes = attributes;
        self.width = UnicodeWidthStr::width(symbol).clamp(1, 255) as u8;
    }

    /// Mark this cell as a continuation of a wide character.
    pub fn make_continuation(&mut self, bg: ResolvedColor) {
        self.symbol.clear();
        self.bg = bg;
        self.width = 0;
    }

    /// Check if this is a continuation cell.
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.width == 0
    }

    /// Get the display width of this cell.
    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Reset to a blank in the given colors.
    pub fn reset(&mut self, fg: ResolvedColor, bg: ResolvedColor) {
        self.symbol.clear();
        self.symbol.push(' ');
        self.fg = fg;
        self.bg = bg;
        self.attributes = TextAttribute::NORMAL;
        self.width = 1;
    }
}

/// Buffer of terminal cells with dirty tracking.
///
/// Coordinates are `(x, y)` = `(col, row)`, matching crossterm's `MoveTo`.
#[derive(Debug)]
pub struct CellBuffer {
    /// The cell storage.
    cells: Vec<Cell>,
    /// Terminal width.
    width: u16,
    /// Terminal height.
    height: u16,
    /// Dirty bit per cell (1 bit per cell).
    dirty: BitVec,
}

impl CellBuffer {
    /// Create a new buffer with the given dimensions.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![Cell::default(); size],
            width,
            height,
            dirty: bitvec![0; size],
        }
    }

    /// Get the buffer width.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get total cell count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert (x, y) to linear index.
    #[must_use]
    pub fn index(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Convert linear index to (x, y).
    #[must_use]
    pub fn coords(&self, idx: usize) -> (u16, u16) {
        let x = (idx % (self.width as usize)) as u16;
        let y = (idx / (self.width as usize)) as u16;
        (x, y)
    }

    /// Get a cell reference.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x < self.width && y < self.height {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Update a cell's content and mark it dirty.
    pub fn update(
        &mut self,
        x: u16,
        y: u16,
        symbol: &str,
        fg: ResolvedColor,
        bg: ResolvedColor,
        attributes: TextAttribute,
    ) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells[idx].update(symbol, fg, bg, attributes);
            self.dirty.set(idx, true);
        }
    }

    /// Put one character, handling wide glyphs.
    ///
    /// Returns the number of columns consumed: 0 when nothing was written
    /// (off-screen, zero-width, or a wide glyph that does not fit).
    pub fn put_char(
        &mut self,
        x: u16,
        y: u16,
        ch: char,
        fg: ResolvedColor,
        bg: ResolvedColor,
        attributes: TextAttribute,
    ) -> u16 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let width = match UnicodeWidthChar::width(ch) {
            Some(w @ 1..=2) => w as u16,
            _ => return 0,
        };
        if width == 2 && x + 1 >= self.width {
            return 0;
        }

        self.split_wide_at(x, y, fg, bg);
        if width == 2 {
            self.split_wide_at(x + 1, y, fg, bg);
        }

        let mut buf = [0u8; 4];
        self.update(x, y, ch.encode_utf8(&mut buf), fg, bg, attributes);
        if width == 2 {
            let idx = self.index(x + 1, y);
            self.cells[idx].make_continuation(bg);
            self.dirty.set(idx, true);
        }
        width
    }

    /// Attach a combining mark to the glyph left of `x`.
    pub fn append_combining(&mut self, x: u16, y: u16, ch: char) {
        if y >= self.height || x == 0 || x > self.width {
            return;
        }
        let mut lead = x - 1;
        while lead > 0 && self.cells[self.index(lead, y)].is_continuation() {
            lead -= 1;
        }
        let idx = self.index(lead, y);
        self.cells[idx].symbol.push(ch);
        self.dirty.set(idx, true);
    }

    /// Before overwriting `(x, y)`, blank the other half of any wide glyph it belongs to.
    fn split_wide_at(&mut self, x: u16, y: u16, fg: ResolvedColor, bg: ResolvedColor) {
        let idx = self.index(x, y);
        if self.cells[idx].is_continuation() && x > 0 {
            let lead = idx - 1;
            self.cells[lead].reset(fg, bg);
            self.dirty.set(lead, true);
        } else if self.cells[idx].width() == 2 && x + 1 < self.width {
            let tail = idx + 1;
            self.cells[tail].reset(fg, bg);
            self.dirty.set(tail, true);
        }
    }

    /// Mark a cell as dirty.
    pub fn mark_dirty(&mut self, x: u16, y: u16) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.dirty.set(idx, true);
        }
    }

    /// Mark all cells as dirty (for full redraw).
    pub fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
    }

    /// Clear dirty flags.
    pub fn clear_dirty(&mut self) {
        self.dirty.fill(false);
    }

    /// Clear the dirty flag of one cell.
    pub fn clear_dirty_at(&mut self, idx: usize) {
        if idx < self.dirty.len() {
            self.dirty.set(idx, false);
        }
    }

    /// Check if one cell is dirty.
    #[must_use]
    pub fn is_dirty(&self, idx: usize) -> bool {
        self.dirty.get(idx).is_some_and(|bit| *bit)
    }

    /// Count dirty cells.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty.count_ones()
    }

    /// Iterate over dirty cell indices.
    pub fn iter_dirty(&self) -> impl Iterator<Item = usize> + '_ {
        self.dirty.iter_ones()
    }

    /// Get cells slice.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Resize the buffer (clears all content).
    pub fn resize(&mut self, width: u16, height: u16) {
        let size = (width as usize) * (height as usize);
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(size, Cell::default());
        self.dirty = bitvec![0; size];
        self.mark_all_dirty();
    }

    /// Reset all cells to blanks in the given colors.
    pub fn clear(&mut self, fg: ResolvedColor, bg: ResolvedColor) {
        for cell in &mut self.cells {
            cell.reset(fg, bg);
        }
        self.mark_all_dirty();
    }

    /// Fill a rectangular region with blanks. The region is clipped to the buffer.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, fg: ResolvedColor, bg: ResolvedColor) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);

        for cy in y..y_end {
            if x < x_end {
                self.split_wide_at(x, cy, fg, bg);
                self.split_wide_at(x_end - 1, cy, fg, bg);
            }
            for cx in x..x_end {
                self.update(cx, cy, " ", fg, bg, TextAttribute::NORMAL);
            }
        }
    }

    /// Text of one row, continuation cells skipped.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = self.index(0, y);
        self.cells[start..start + self.width as usize]
            .iter()
            .map(|cell| cell.symbol.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttk_core::Rgb;

    const RED: ResolvedColor = ResolvedColor::Basic(BasicColor::Red);
    const BLUE: ResolvedColor = ResolvedColor::Basic(BasicColor::Blue);
    const WHITE: ResolvedColor = ResolvedColor::Basic(BasicColor::White);
    const BLACK: ResolvedColor = ResolvedColor::Basic(BasicColor::Black);

    #[test]
    fn test_cell_default() {
        let cell = Cell::default();
        assert_eq!(cell.symbol.as_str(), " ");
        assert_eq!(cell.fg, WHITE);
        assert_eq!(cell.bg, BLACK);
        assert!(cell.attributes.is_empty());
        assert_eq!(cell.width(), 1);
    }

    #[test]
    fn test_cell_new() {
        let cell = Cell::new("A", RED, BLUE, TextAttribute::BOLD);
        assert_eq!(cell.symbol.as_str(), "A");
        assert_eq!(cell.fg, RED);
        assert_eq!(cell.bg, BLUE);
        assert!(cell.attributes.contains(TextAttribute::BOLD));
        assert_eq!(cell.width(), 1);
    }

    #[test]
    fn test_cell_wide_char() {
        let cell = Cell::new("日", WHITE, BLACK, TextAttribute::NORMAL);
        assert_eq!(cell.width(), 2);
    }

    #[test]
    fn test_cell_reset_uses_given_colors() {
        let custom = ResolvedColor::Custom {
            slot: 16,
            rgb: Rgb::new(0, 0, 40),
        };
        let mut cell = Cell::new("X", RED, BLUE, TextAttribute::BOLD);
        cell.reset(WHITE, custom);
        assert_eq!(cell.symbol.as_str(), " ");
        assert_eq!(cell.bg, custom);
        assert!(cell.attributes.is_empty());
    }

    #[test]
    fn test_buffer_creation() {
        let buf = CellBuffer::new(80, 24);
        assert_eq!(buf.width(), 80);
        assert_eq!(buf.height(), 24);
        assert_eq!(buf.len(), 1920);
        assert!(!buf.is_empty());
        assert!(CellBuffer::new(0, 0).is_empty());
    }

    #[test]
    fn test_buffer_index_coords() {
        let buf = CellBuffer::new(10, 5);
        assert_eq!(buf.index(5, 2), 25);
        assert_eq!(buf.coords(25), (5, 2));
    }

    #[test]
    fn test_update_marks_dirty() {
        let mut buf = CellBuffer::new(10, 5);
        buf.update(3, 1, "Q", RED, BLACK, TextAttribute::NORMAL);
        assert_eq!(buf.dirty_count(), 1);
        assert!(buf.is_dirty(buf.index(3, 1)));
        buf.update(30, 1, "Q", RED, BLACK, TextAttribute::NORMAL);
        assert_eq!(buf.dirty_count(), 1);
    }

    #[test]
    fn test_put_wide_char_sets_continuation() {
        let mut buf = CellBuffer::new(10, 1);
        assert_eq!(buf.put_char(2, 0, '日', WHITE, BLACK, TextAttribute::NORMAL), 2);
        assert!(buf.get(3, 0).unwrap().is_continuation());
        assert_eq!(buf.row_text(0), "  日      ");
    }

    #[test]
    fn test_wide_char_at_edge_not_written() {
        let mut buf = CellBuffer::new(3, 1);
        assert_eq!(buf.put_char(2, 0, '日', WHITE, BLACK, TextAttribute::NORMAL), 0);
        assert_eq!(buf.row_text(0), "   ");
    }

    #[test]
    fn test_overwrite_half_of_wide_char() {
        let mut buf = CellBuffer::new(4, 1);
        buf.put_char(0, 0, '日', WHITE, BLACK, TextAttribute::NORMAL);
        buf.put_char(1, 0, 'x', WHITE, BLACK, TextAttribute::NORMAL);
        assert_eq!(buf.row_text(0), " x  ");
        assert!(!buf.get(1, 0).unwrap().is_continuation());
    }

    #[test]
    fn test_combining_mark_joins_previous() {
        let mut buf = CellBuffer::new(4, 1);
        buf.put_char(0, 0, 'e', WHITE, BLACK, TextAttribute::NORMAL);
        buf.append_combining(1, 0, '\u{301}');
        assert_eq!(buf.get(0, 0).unwrap().symbol.as_str(), "e\u{301}");
    }

    #[test]
    fn test_control_char_not_written() {
        let mut buf = CellBuffer::new(4, 1);
        assert_eq!(buf.put_char(0, 0, '\n', WHITE, BLACK, TextAttribute::NORMAL), 0);
        assert_eq!(buf.dirty_count(), 0);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut buf = CellBuffer::new(5, 5);
        buf.fill_rect(3, 3, 10, 10, WHITE, RED);
        assert_eq!(buf.dirty_count(), 4);
        assert_eq!(buf.get(4, 4).unwrap().bg, RED);
    }

    #[test]
    fn test_resize_and_clear() {
        let mut buf = CellBuffer::new(5, 5);
        buf.resize(8, 3);
        assert_eq!(buf.len(), 24);
        assert_eq!(buf.dirty_count(), 24);
        buf.clear_dirty();
        buf.clear(WHITE, BLUE);
        assert_eq!(buf.dirty_count(), 24);
        assert!(buf.cells().iter().all(|c| c.bg == BLUE));
    }

    #[test]
    fn test_clear_dirty_at() {
        let mut buf = CellBuffer::new(2, 2);
        buf.mark_all_dirty();
        buf.clear_dirty_at(0);
        buf.clear_dirty_at(99);
        assert_eq!(buf.dirty_count(), 3);
    }
}
