//! Pixel-addressed window backends for TTK.
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::use_self)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::suboptimal_flops)] // "consider using mul_add"
//!
//! Both backends keep a [`CellGrid`] in memory and paint it into a [`Frame`]
//! on `refresh()`. The frame goes to a [`WindowSurface`], the seam where a
//! platform window (or the in-memory [`HeadlessSurface`]) plugs in.
//!
//! | Backend | Painter | Frame contents |
//! |---------|---------|----------------|
//! | [`CanvasBackend`] | [`CanvasPainter`] | merged background rects and glyph runs |
//! | `GpuBackend` (feature `gpu`) | `GpuPainter` | the same, plus packed `CellInstance` quads |
//!
//! Colors are exact RGB by default. Mouse events carry the position inside
//! the cell as `sub_cell`.
//!
//! ```
//! use ttk_core::{Renderer, Rgb, TextAttribute};
//! use ttk_desktop::{CanvasBackend, DesktopConfig, HeadlessSurface};
//!
//! let mut backend = CanvasBackend::new(HeadlessSurface::new(), DesktopConfig::default());
//! backend.initialize()?;
//! backend.init_color_pair(1, Rgb::new(0, 255, 0), Rgb::BLACK)?;
//! backend.draw_text(0, 0, "ok", 1, TextAttribute::NORMAL)?;
//! backend.refresh()?;
//! assert_eq!(backend.surface().frames().len(), 1);
//! # Ok::<(), ttk_core::TtkError>(())
//! ```

mod backend;
mod batch;
mod config;
mod dirty;
mod error;
#[cfg(feature = "gpu")]
mod gpu;
mod grid;
mod headless;
mod keymap;
mod paint;
mod surface;

pub use backend::{CanvasBackend, PixelBackend};
#[cfg(feature = "gpu")]
pub use backend::GpuBackend;
pub use batch::{RectBatch, RectBatcher};
pub use config::DesktopConfig;
pub use dirty::{row_edge, DirtyRegion};
pub use error::DesktopError;
#[cfg(feature = "gpu")]
pub use gpu::{
    CellInstance, GpuPainter, FLAG_BOLD, FLAG_UNDERLINE, KIND_CURSOR, KIND_FILL, KIND_GLYPH,
};
pub use grid::{CellGrid, GridCell};
pub use headless::HeadlessSurface;
pub use keymap::{
    modifiers_from_flags, special_key, translate_key, FLAG_COMMAND, FLAG_CONTROL, FLAG_OPTION,
    FLAG_SHIFT,
};
pub use paint::{paint_runs, CanvasPainter, FramePainter, Scene};
pub use surface::{
    CursorMark, Frame, PixelRect, RawButton, SurfaceOrigin, TextRun, WindowEvent, WindowSurface,
};
