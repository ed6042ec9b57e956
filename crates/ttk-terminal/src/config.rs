//! Terminal backend configuration.

use crate::color::ColorMode;

/// Configuration for [`TerminalRenderer`](crate::TerminalRenderer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalConfig {
    /// Color mode (auto-detected if not specified).
    pub color_mode: Option<ColorMode>,
    /// Enable mouse reporting.
    pub enable_mouse: bool,
    /// Draw on the alternate screen and restore the shell contents on exit.
    pub alternate_screen: bool,
    /// Force exact colors on or off. `None` derives it from the color mode.
    pub fullcolor: Option<bool>,
    /// Palette entries available in 256-color mode.
    pub palette_size: u16,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            color_mode: None,
            enable_mouse: true,
            alternate_screen: true,
            fullcolor: None,
            palette_size: 256,
        }
    }
}

impl TerminalConfig {
    /// Plain 8-color output without mouse reporting.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            color_mode: Some(ColorMode::Color16),
            enable_mouse: false,
            fullcolor: Some(false),
            ..Default::default()
        }
    }

    /// True color with mouse reporting.
    #[must_use]
    pub fn rich() -> Self {
        Self {
            color_mode: Some(ColorMode::TrueColor),
            enable_mouse: true,
            fullcolor: Some(true),
            ..Default::default()
        }
    }

    /// The configured mode, or the detected one.
    #[must_use]
    pub fn resolve_color_mode(&self) -> ColorMode {
        self.color_mode.unwrap_or_else(ColorMode::detect)
    }
}
