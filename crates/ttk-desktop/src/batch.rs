//! Background fill batching.
//!
//! Adjacent cells in a row with the same background become one rectangle,
//! so a blank 80-column row costs one fill instead of eighty.

use ttk_core::Rgb;

/// Horizontal adjacency tolerance in pixels.
const ADJACENT_EPSILON: f32 = 0.1;

/// A horizontal run of same-colored cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectBatch {
    /// Left edge.
    pub x: f32,
    /// Row edge.
    pub y: f32,
    /// Total width.
    pub width: f32,
    /// Cell height.
    pub height: f32,
    /// Fill color.
    pub bg: Rgb,
}

impl RectBatch {
    /// Right edge.
    #[must_use]
    pub fn right_edge(&self) -> f32 {
        self.x + self.width
    }
}

/// Accumulates cells into [`RectBatch`]es.
#[derive(Debug, Default)]
pub struct RectBatcher {
    current: Option<RectBatch>,
    batches: Vec<RectBatch>,
}

impl RectBatcher {
    /// Empty batcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one cell, extending the current run when it continues it.
    pub fn add_cell(&mut self, x: f32, y: f32, width: f32, height: f32, bg: Rgb) {
        match &mut self.current {
            Some(run)
                if run.y == y && run.bg == bg && (run.right_edge() - x).abs() < ADJACENT_EPSILON =>
            {
                run.width += width;
            }
            slot => {
                if let Some(done) = slot.take() {
                    self.batches.push(done);
                }
                *slot = Some(RectBatch {
                    x,
                    y,
                    width,
                    height,
                    bg,
                });
            }
        }
    }

    /// Close the current run at the end of a row.
    pub fn finish_row(&mut self) {
        if let Some(done) = self.current.take() {
            self.batches.push(done);
        }
    }

    /// All runs so far; the batcher starts over.
    pub fn take_batches(&mut self) -> Vec<RectBatch> {
        self.finish_row();
        std::mem::take(&mut self.batches)
    }
}
