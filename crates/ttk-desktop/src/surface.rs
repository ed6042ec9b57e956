//! The platform seam: a window that shows frames and reports raw events.
//!
//! Everything platform-specific lives behind [`WindowSurface`]. Backends in
//! this crate only build [`Frame`]s and translate [`WindowEvent`]s, so the
//! same code drives a native window or the in-memory
//! [`HeadlessSurface`](crate::HeadlessSurface).

use crate::batch::RectBatch;
use crate::error::DesktopError;
use std::time::Duration;
use ttk_core::{MenuBar, Rgb};

/// Where the surface puts pixel `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceOrigin {
    /// Y grows downward.
    #[default]
    TopLeft,
    /// Y grows upward (Cocoa, Core Graphics).
    BottomLeft,
}

/// Raw mouse button number as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Other,
}

/// Untranslated window input. Positions are in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// Key press.
    KeyDown {
        /// Platform virtual keycode.
        keycode: u16,
        /// Characters the key produced, possibly empty.
        characters: String,
        /// Platform modifier flag word.
        modifier_flags: u64,
    },
    /// Button press.
    MouseDown {
        /// X in pixels.
        x: f32,
        /// Y in pixels.
        y: f32,
        /// Button.
        button: RawButton,
        /// 2 for a double click.
        click_count: u32,
        /// Platform modifier flag word.
        modifier_flags: u64,
    },
    /// Button release.
    MouseUp {
        /// X in pixels.
        x: f32,
        /// Y in pixels.
        y: f32,
        /// Button.
        button: RawButton,
        /// Platform modifier flag word.
        modifier_flags: u64,
    },
    /// Pointer motion with no button held.
    MouseMoved {
        /// X in pixels.
        x: f32,
        /// Y in pixels.
        y: f32,
    },
    /// Pointer motion with a button held.
    MouseDragged {
        /// X in pixels.
        x: f32,
        /// Y in pixels.
        y: f32,
        /// Button.
        button: RawButton,
    },
    /// Scroll wheel.
    ScrollWheel {
        /// X in pixels.
        x: f32,
        /// Y in pixels.
        y: f32,
        /// Vertical delta, positive away from the user.
        delta_y: f32,
    },
    /// Content area changed size.
    Resized {
        /// New width in pixels.
        width: f32,
        /// New height in pixels.
        height: f32,
    },
    /// The user asked to close the window.
    CloseRequested,
    /// A menu item was chosen.
    MenuSelected(String),
    /// Window gained or lost key focus.
    Focus(bool),
}

/// A run of glyphs sharing color and style, one glyph per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Left edge in surface pixels.
    pub x: f32,
    /// Cell edge in surface pixels (top for top-left origin, bottom otherwise).
    pub y: f32,
    /// Glyphs.
    pub text: String,
    /// Foreground color.
    pub fg: Rgb,
    /// Bold face.
    pub bold: bool,
    /// Underline.
    pub underline: bool,
}

/// Block cursor position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorMark {
    /// Left edge in pixels.
    pub x: f32,
    /// Cell edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

/// Pixel rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    /// Left edge.
    pub x: f32,
    /// Top edge (bottom edge on bottom-left surfaces).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// One presentation: what changed and where.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    /// Area the frame repaints.
    pub damage: PixelRect,
    /// Background fills, already merged per row.
    pub fills: Vec<RectBatch>,
    /// Glyph runs.
    pub text: Vec<TextRun>,
    /// Cursor block, if visible inside the damage.
    pub cursor: Option<CursorMark>,
    /// Packed per-instance data for instanced GPU drawing; empty for 2D.
    pub instance_data: Vec<u8>,
    /// Number of instances in `instance_data`.
    pub instance_count: u32,
}

/// A native window as seen by the pixel backends.
pub trait WindowSurface {
    /// Create and show the window.
    fn open(&mut self, title: &str, width: f32, height: f32) -> Result<(), DesktopError>;
    /// Destroy the window.
    fn close(&mut self) -> Result<(), DesktopError>;
    /// Current content size in pixels.
    fn content_size(&self) -> (f32, f32);
    /// Where pixel `(0, 0)` is.
    fn origin(&self) -> SurfaceOrigin {
        SurfaceOrigin::TopLeft
    }
    /// Show a frame.
    fn present(&mut self, frame: Frame) -> Result<(), DesktopError>;
    /// Next raw event. `None` timeout blocks.
    fn poll_event(&mut self, timeout: Option<Duration>) -> Option<WindowEvent>;
    /// Text-input caret position in pixels, for input methods.
    fn set_caret(&mut self, _x: f32, _y: f32) {}
    /// Install a menu bar.
    fn set_menu_bar(&mut self, _menu: &MenuBar) {}
    /// Enable or disable one menu item.
    fn set_menu_item_enabled(&mut self, _item_id: &str, _enabled: bool) {}
}
