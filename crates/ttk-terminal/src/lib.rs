//! Character-cell terminal backend for TTK.
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::use_self)] // "unnecessary structure name repetition"
#![allow(clippy::uninlined_format_args)] // "variables can be used directly in format!"
#![allow(clippy::match_same_arms)] // "match arms have identical bodies" (intentional for readability)
#![allow(clippy::struct_excessive_bools)] // "more than 3 bools in struct"
#![allow(clippy::too_many_arguments)] // cell writes carry glyph, colors and attributes
#![allow(clippy::needless_pass_by_value)] // "argument passed by value but not consumed"
#![allow(clippy::doc_markdown)] // "item in documentation missing backticks"
//!
//! Implements [`ttk_core::Renderer`] on top of `crossterm`. Drawing goes to an
//! in-memory [`direct::CellBuffer`]; `refresh()` writes only the cells that
//! changed since the last flush.
//!
//! # Color modes
//!
//! | Mode | Custom pair colors |
//! |------|--------------------|
//! | `TrueColor` | exact 24-bit SGR |
//! | `Color256` | palette slots from 16 up, defined with OSC 4 |
//! | `Color16` | nearest of the 8 basic colors |
//! | `Mono` | terminal defaults |
//!
//! # Example
//!
//! ```no_run
//! use ttk_core::{Renderer, Rgb, TextAttribute};
//! use ttk_terminal::{TerminalConfig, TerminalRenderer};
//!
//! let mut renderer = TerminalRenderer::new(TerminalConfig::default());
//! renderer.initialize()?;
//! renderer.init_color_pair(1, Rgb::new(255, 200, 0), Rgb::BLACK)?;
//! renderer.draw_text(0, 0, "hello", 1, TextAttribute::BOLD)?;
//! renderer.refresh()?;
//! renderer.shutdown();
//! # Ok::<(), ttk_core::TtkError>(())
//! ```
//!
//! # Testing without a TTY
//!
//! [`TestableBackend`] records terminal state changes and writes escape
//! sequences into any `Write`, so the renderer can run against a `Vec<u8>`.

mod backend;
mod color;
mod config;
pub mod direct;
mod error;
mod input;
mod renderer;

pub use backend::{CrosstermBackend, TerminalBackend, TestableBackend};
pub use color::{palette_definition, ColorMode};
pub use config::TerminalConfig;
pub use error::TerminalError;
pub use input::{convert_key_code, convert_modifiers, translate_event};
pub use renderer::TerminalRenderer;
