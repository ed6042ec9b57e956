//! Differential renderer for optimized terminal I/O.
//!
//! Minimizes terminal escape sequences and syscalls by:
//! - Only rendering dirty cells
//! - Batching output to a buffer
//! - Skipping redundant cursor moves
//! - Caching current style state
//!
//! In 256-color mode, palette slots allocated since the last flush are
//! redefined (OSC 4) before any cell that uses them is written.

use super::cell_buffer::CellBuffer;
use crate::color::{palette_definition, ColorMode};
use crossterm::cursor::MoveTo;
use crossterm::style::{
    Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::{queue, QueueableCommand};
use std::io::{self, BufWriter, Write};
use ttk_core::{ResolvedColor, Rgb, TextAttribute};

/// Current terminal style state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StyleState {
    fg: ResolvedColor,
    bg: ResolvedColor,
    attributes: TextAttribute,
}

/// Half-open cell rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRegion {
    /// First column.
    pub x0: u16,
    /// First row.
    pub y0: u16,
    /// One past the last column.
    pub x1: u16,
    /// One past the last row.
    pub y1: u16,
}

impl CellRegion {
    /// Check if a cell lies inside.
    #[must_use]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Differential renderer that minimizes terminal I/O.
///
/// Tracks the current cursor position and style state to avoid
/// redundant escape sequences.
#[derive(Debug)]
pub struct DiffRenderer {
    /// Color mode for conversion.
    color_mode: ColorMode,
    /// Last known cursor position (`u16::MAX` = unknown).
    cursor_x: u16,
    cursor_y: u16,
    /// Last emitted style; `None` after a reset.
    last_style: Option<StyleState>,
    /// Palette entries to define at the next flush.
    pending_palette: Vec<(u16, Rgb)>,
    /// Statistics: number of cells written.
    cells_written: usize,
    /// Statistics: number of cursor moves.
    cursor_moves: usize,
    /// Statistics: number of style changes.
    style_changes: usize,
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::with_color_mode(ColorMode::default())
    }
}

impl DiffRenderer {
    /// Create a renderer with the detected color mode.
    #[must_use]
    pub fn new() -> Self {
        Self::with_color_mode(ColorMode::detect())
    }

    /// Create a renderer with specific color mode.
    #[must_use]
    pub fn with_color_mode(color_mode: ColorMode) -> Self {
        Self {
            color_mode,
            cursor_x: u16::MAX,
            cursor_y: u16::MAX,
            last_style: None,
            pending_palette: Vec::new(),
            cells_written: 0,
            cursor_moves: 0,
            style_changes: 0,
        }
    }

    /// Set the color mode.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }

    /// Get the color mode.
    #[must_use]
    pub const fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Reset renderer state (call after terminal resize or clear).
    pub fn reset(&mut self) {
        self.cursor_x = u16::MAX;
        self.cursor_y = u16::MAX;
        self.last_style = None;
        self.cells_written = 0;
        self.cursor_moves = 0;
        self.style_changes = 0;
    }

    /// Queue palette slots to define before the next flush writes cells.
    pub fn queue_palette(&mut self, slots: impl IntoIterator<Item = (u16, Rgb)>) {
        self.pending_palette.extend(slots);
    }

    /// Number of palette definitions waiting.
    #[must_use]
    pub fn pending_palette(&self) -> usize {
        self.pending_palette.len()
    }

    /// Get cells written in last flush.
    #[must_use]
    pub const fn cells_written(&self) -> usize {
        self.cells_written
    }

    /// Get cursor moves in last flush.
    #[must_use]
    pub const fn cursor_moves(&self) -> usize {
        self.cursor_moves
    }

    /// Get style changes in last flush.
    #[must_use]
    pub const fn style_changes(&self) -> usize {
        self.style_changes
    }

    /// Flush dirty cells to the writer.
    ///
    /// Returns the number of cells written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the writer fails.
    pub fn flush<W: Write>(&mut self, buffer: &mut CellBuffer, writer: &mut W) -> io::Result<usize> {
        self.flush_region(buffer, writer, None)
    }

    /// Flush dirty cells, restricted to `region` when given.
    ///
    /// Dirty cells outside the region stay dirty for a later flush.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the writer fails.
    pub fn flush_region<W: Write>(
        &mut self,
        buffer: &mut CellBuffer,
        writer: &mut W,
        region: Option<CellRegion>,
    ) -> io::Result<usize> {
        self.cells_written = 0;
        self.cursor_moves = 0;
        self.style_changes = 0;

        // Use buffered writer to batch syscalls
        let mut buf_writer = BufWriter::with_capacity(8192, writer);

        self.write_palette(&mut buf_writer)?;

        if buffer.is_empty() {
            buf_writer.flush()?;
            return Ok(0);
        }

        queue!(buf_writer, ResetColor)?;
        self.last_style = None;

        let mut flushed = Vec::new();
        for idx in buffer.iter_dirty() {
            let (x, y) = buffer.coords(idx);
            if region.is_some_and(|r| !r.contains(x, y)) {
                continue;
            }
            flushed.push(idx);
            self.write_cell(&mut buf_writer, buffer, idx, x, y)?;
        }

        match region {
            None => buffer.clear_dirty(),
            Some(_) => {
                for idx in flushed {
                    buffer.clear_dirty_at(idx);
                }
            }
        }

        buf_writer.flush()?;
        tracing::trace!(
            cells = self.cells_written,
            moves = self.cursor_moves,
            styles = self.style_changes,
            "flushed dirty cells"
        );

        Ok(self.cells_written)
    }

    fn write_palette<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.pending_palette.is_empty() {
            return Ok(());
        }
        if self.color_mode == ColorMode::Color256 {
            for (slot, rgb) in &self.pending_palette {
                writer.write_all(palette_definition(*slot, *rgb).as_bytes())?;
            }
        }
        self.pending_palette.clear();
        Ok(())
    }

    fn write_cell<W: Write>(
        &mut self,
        writer: &mut W,
        buffer: &CellBuffer,
        idx: usize,
        x: u16,
        y: u16,
    ) -> io::Result<()> {
        let cell = &buffer.cells()[idx];

        // Skip continuation cells
        if cell.is_continuation() {
            return Ok(());
        }

        if self.cursor_x != x || self.cursor_y != y {
            queue!(writer, MoveTo(x, y))?;
            self.cursor_x = x;
            self.cursor_y = y;
            self.cursor_moves += 1;
        }

        let new_style = StyleState {
            fg: cell.fg,
            bg: cell.bg,
            attributes: cell.attributes,
        };
        if self.last_style != Some(new_style) {
            self.apply_style(writer, new_style)?;
            self.last_style = Some(new_style);
            self.style_changes += 1;
        }

        queue!(writer, Print(&cell.symbol))?;

        self.cursor_x = self.cursor_x.saturating_add(u16::from(cell.width()));
        if self.cursor_x >= buffer.width() {
            self.cursor_x = u16::MAX; // Unknown after wrap
        }

        self.cells_written += 1;
        Ok(())
    }

    /// Apply style changes to the writer.
    fn apply_style<W: Write>(&self, writer: &mut W, style: StyleState) -> io::Result<()> {
        // Reset attributes FIRST (before setting colors!)
        writer.queue(SetAttribute(Attribute::Reset))?;

        writer.queue(SetForegroundColor(self.color_mode.to_crossterm(style.fg)))?;
        writer.queue(SetBackgroundColor(self.color_mode.to_crossterm(style.bg)))?;

        if style.attributes.contains(TextAttribute::BOLD) {
            writer.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.attributes.contains(TextAttribute::UNDERLINE) {
            writer.queue(SetAttribute(Attribute::Underlined))?;
        }
        if style.attributes.contains(TextAttribute::REVERSE) {
            writer.queue(SetAttribute(Attribute::Reverse))?;
        }

        Ok(())
    }

    /// Render a full frame (marks all dirty then flushes).
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn render_full<W: Write>(&mut self, buffer: &mut CellBuffer, writer: &mut W) -> io::Result<usize> {
        buffer.mark_all_dirty();
        self.flush(buffer, writer)
    }
}
