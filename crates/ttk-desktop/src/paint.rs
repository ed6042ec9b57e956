//! Turning grid cells into frames.

use crate::batch::RectBatcher;
use crate::dirty::{row_edge, DirtyRegion};
use crate::grid::CellGrid;
use crate::surface::{CursorMark, Frame, SurfaceOrigin, TextRun};
use ttk_core::{CellMetrics, ColorRegistry, Rgb, TextAttribute};

/// Everything a painter needs to draw part of the grid.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Cell contents.
    pub grid: &'a CellGrid,
    /// Pair colors.
    pub colors: &'a ColorRegistry,
    /// Cell size.
    pub metrics: CellMetrics,
    /// Surface orientation.
    pub origin: SurfaceOrigin,
    /// Visible cursor cell.
    pub cursor: Option<(i32, i32)>,
}

impl Scene<'_> {
    /// Foreground and background of a cell after REVERSE.
    #[must_use]
    pub fn cell_colors(&self, pair: u8, attributes: TextAttribute) -> (Rgb, Rgb) {
        let (fg, bg) = self.colors.colors(pair);
        let (fg, bg) = (fg.rgb(), bg.rgb());
        if attributes.contains(TextAttribute::REVERSE) {
            (bg, fg)
        } else {
            (fg, bg)
        }
    }
}

/// Produces a [`Frame`] for a region of the grid.
pub trait FramePainter {
    /// Paint the cells in `region`.
    fn paint(&mut self, scene: &Scene<'_>, region: DirtyRegion) -> Frame;
}

/// 2D painter: background fills plus glyph runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanvasPainter;

impl FramePainter for CanvasPainter {
    fn paint(&mut self, scene: &Scene<'_>, region: DirtyRegion) -> Frame {
        paint_runs(scene, region)
    }
}

/// Fills merged per row, glyphs merged into runs of equal style.
///
/// Blank cells end a run unless they are underlined.
#[must_use]
pub fn paint_runs(scene: &Scene<'_>, region: DirtyRegion) -> Frame {
    let rows = scene.grid.rows();
    let (cw, ch) = (scene.metrics.cell_width, scene.metrics.cell_height);
    let mut batcher = RectBatcher::new();
    let mut text = Vec::new();

    for row in region.row_start..region.row_end {
        let y = row_edge(row, rows, scene.metrics, scene.origin);
        let mut run: Option<(TextRun, i32)> = None;
        for col in region.col_start..region.col_end {
            let Some(cell) = scene.grid.get(row, col) else {
                continue;
            };
            let (fg, bg) = scene.cell_colors(cell.pair, cell.attributes);
            let x = col as f32 * cw;
            batcher.add_cell(x, y, cw, ch, bg);

            let bold = cell.attributes.contains(TextAttribute::BOLD);
            let underline = cell.attributes.contains(TextAttribute::UNDERLINE);
            if cell.ch == ' ' && !underline {
                text.extend(run.take().map(|(r, _)| r));
                continue;
            }
            match &mut run {
                Some((r, next))
                    if *next == col && r.fg == fg && r.bold == bold && r.underline == underline =>
                {
                    r.text.push(cell.ch);
                    *next += 1;
                }
                _ => {
                    text.extend(run.take().map(|(r, _)| r));
                    run = Some((
                        TextRun {
                            x,
                            y,
                            text: cell.ch.to_string(),
                            fg,
                            bold,
                            underline,
                        },
                        col + 1,
                    ));
                }
            }
        }
        text.extend(run.map(|(r, _)| r));
        batcher.finish_row();
    }

    let cursor = scene
        .cursor
        .filter(|&(r, c)| region.contains(r, c))
        .map(|(r, c)| CursorMark {
            x: c as f32 * cw,
            y: row_edge(r, rows, scene.metrics, scene.origin),
            width: cw,
            height: ch,
        });

    Frame {
        damage: region.to_pixels(rows, scene.metrics, scene.origin),
        fills: batcher.take_batches(),
        text,
        cursor,
        ..Frame::default()
    }
}
