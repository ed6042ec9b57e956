//! Error types for ttk-desktop.

use thiserror::Error;
use ttk_core::TtkError;

/// Errors from a window surface.
#[derive(Debug, Error)]
pub enum DesktopError {
    /// The platform could not create the window.
    #[error("window unavailable: {0}")]
    WindowUnavailable(String),

    /// A surface operation needed an open window.
    #[error("window is not open")]
    NotOpen,

    /// Presenting a frame failed.
    #[error("present failed: {0}")]
    Present(String),

    /// Font metrics cannot produce a usable cell size.
    #[error("invalid cell metrics {width}x{height} for font {font:?}")]
    InvalidMetrics {
        /// Font name.
        font: String,
        /// Cell width in pixels.
        width: f32,
        /// Cell height in pixels.
        height: f32,
    },
}

impl From<DesktopError> for TtkError {
    fn from(err: DesktopError) -> Self {
        Self::Init(err.to_string())
    }
}
