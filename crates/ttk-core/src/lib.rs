//! Core types for the TTK rendering toolkit.
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::missing_errors_doc)] // errors documented on the trait
#![allow(clippy::too_many_arguments)] // draw_rect mirrors the wire form
#![allow(clippy::too_many_lines)]
#![allow(clippy::doc_markdown)]
//!
//! This crate holds everything that does not touch a display:
//!
//! - The [`Renderer`] contract every backend implements
//! - Colors: [`Rgb`], [`BasicColor`], and the per-backend [`ColorRegistry`]
//! - Input: [`InputEvent`], [`KeyCode`], [`Modifiers`], [`MouseEvent`]
//! - The [`Command`] model and its map/JSON serializer
//! - [`PerformanceMonitor`] for host loops
//! - [`RecordingRenderer`], a null backend for display-free tests
//!
//! # Example
//!
//! ```rust
//! use ttk_core::{Command, RecordingRenderer, Renderer, Rgb, TextAttribute};
//!
//! let mut renderer = RecordingRenderer::new(24, 80);
//! renderer.initialize().unwrap();
//! renderer.init_color_pair(1, Rgb::new(255, 0, 0), Rgb::BLACK).unwrap();
//! renderer.draw_text(0, 0, "hello", 1, TextAttribute::BOLD).unwrap();
//! renderer.refresh().unwrap();
//!
//! let json = renderer.commands()[1].to_json_string();
//! assert_eq!(Command::from_json_str(&json).unwrap(), renderer.commands()[1]);
//! ```

pub mod color;
pub mod command;
pub mod error;
pub mod geometry;
pub mod input;
pub mod palette;
pub mod perf;
pub mod recording;
pub mod renderer;
pub mod style;

pub use color::{approximate_basic_color, clamp_component, BasicColor, ColorParseError, Rgb};
pub use command::{pretty_print, pretty_print_map, Command, CommandMap, CommandRef, COMMAND_TYPES};
pub use error::{CommandError, Result, TtkError, ValidationError};
pub use geometry::{clamp_to_grid, clip_region, CellMetrics, GridPosition};
pub use input::{InputEvent, KeyCode, Modifiers, MouseButton, MouseEvent, MouseEventKind};
pub use palette::{
    validate_color_pair, validate_pair_id, ColorPair, ColorRegistry, RegisteredPair,
    ResolvedColor, CUSTOM_SLOT_BASE, MAX_COLOR_PAIR,
};
pub use perf::{Clock, ManualClock, PerfSummary, PerformanceMonitor, SystemClock};
pub use recording::RecordingRenderer;
pub use renderer::{
    dispatch_event, rect_outline, validate_dimension, BoxGlyphs, EventHandler, Menu, MenuBar,
    MenuItem, Renderer, BOX_GLYPHS,
};
pub use style::TextAttribute;
