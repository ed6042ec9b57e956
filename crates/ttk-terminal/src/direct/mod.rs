//! Direct terminal output.
//!
//! # Architecture
//!
//! ```text
//! Renderer calls → CellBuffer → DiffRenderer → crossterm
//!                  (dirty bits)   (changed cells only)
//! ```
//!
//! - **Zero-allocation steady state**: Uses `CompactString` for inline strings
//! - **Smart diffing**: Only renders changed cells
//! - **Batched I/O**: Single `write()` syscall per frame

mod cell_buffer;
mod diff_renderer;

pub use cell_buffer::{Cell, CellBuffer};
pub use diff_renderer::{CellRegion, DiffRenderer};
