//! TTK: one drawing API for text UIs, on a terminal or in a desktop window.
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
//!
//! Programs draw through the [`Renderer`] trait and never name a backend
//! outside startup:
//!
//! ```
//! use ttk::{BackendKind, Renderer, Rgb, TextAttribute};
//!
//! let mut renderer = BackendKind::Recording.create()?;
//! renderer.initialize()?;
//! renderer.init_color_pair(1, Rgb::new(255, 255, 0), Rgb::new(0, 0, 255))?;
//! renderer.draw_text(0, 0, "Hello", 1, TextAttribute::BOLD)?;
//! renderer.refresh()?;
//! renderer.shutdown();
//! # Ok::<(), ttk::TtkError>(())
//! ```
//!
//! # Features
//!
//! - `terminal` (default): [`terminal::TerminalRenderer`] over crossterm
//! - `desktop`: pixel backends in [`desktop`]; `gpu` adds the instanced backend
//! - `demo`: the `ttk-demo` binary

pub use ttk_core::*;

#[cfg(feature = "desktop")]
pub use ttk_desktop as desktop;
#[cfg(feature = "terminal")]
pub use ttk_terminal as terminal;

pub mod logging;
mod select;

pub use select::{BackendKind, ParseBackendError, BACKEND_ENV};
