//! Color mode detection and conversion for terminals.

use crossterm::style::Color as CrosstermColor;
use ttk_core::{BasicColor, ColorRegistry, ResolvedColor, Rgb};

/// Terminal color capability mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// 24-bit true color (COLORTERM=truecolor or 24bit).
    #[default]
    TrueColor,
    /// 256 color palette with redefinable entries.
    Color256,
    /// 16 ANSI colors.
    Color16,
    /// Monochrome (no color).
    Mono,
}

impl ColorMode {
    /// Auto-detect terminal color capabilities.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with_env(std::env::var("COLORTERM").ok(), std::env::var("TERM").ok())
    }

    /// Detect color mode from environment variable values.
    /// This is the testable core of `detect()`.
    #[must_use]
    #[allow(clippy::needless_pass_by_value)]
    pub fn detect_with_env(colorterm: Option<String>, term: Option<String>) -> Self {
        if let Some(ref ct) = colorterm {
            if ct == "truecolor" || ct == "24bit" {
                return Self::TrueColor;
            }
        }

        match term.as_deref() {
            Some(t) if t.contains("256color") => Self::Color256,
            Some(t) if t.contains("color") || t.contains("xterm") => Self::Color16,
            Some("dumb") | None => Self::Mono,
            _ => Self::Color16,
        }
    }

    /// Whether exact colors can be shown, so pairs should get custom slots.
    #[must_use]
    pub const fn supports_custom_colors(self) -> bool {
        matches!(self, Self::TrueColor | Self::Color256)
    }

    /// Exclusive upper bound on custom slots. `None` when any RGB can be emitted.
    #[must_use]
    pub fn slot_limit(self, palette_size: u16) -> Option<u16> {
        match self {
            Self::TrueColor => None,
            // AnsiValue is a u8, so the palette never exceeds 256 entries.
            Self::Color256 => Some(palette_size.min(256)),
            Self::Color16 | Self::Mono => Some(ttk_core::CUSTOM_SLOT_BASE),
        }
    }

    /// Registry configured for this mode.
    #[must_use]
    pub fn registry(self, fullcolor: Option<bool>, palette_size: u16) -> ColorRegistry {
        let fullcolor = fullcolor.unwrap_or_else(|| self.supports_custom_colors());
        ColorRegistry::new(fullcolor, self.slot_limit(palette_size))
    }

    /// Convert a resolved color to the crossterm color emitted in this mode.
    #[must_use]
    pub fn to_crossterm(self, color: ResolvedColor) -> CrosstermColor {
        match (self, color) {
            (Self::Mono, _) => CrosstermColor::Reset,
            (_, ResolvedColor::Basic(basic)) => basic_to_crossterm(basic),
            (Self::TrueColor, ResolvedColor::Custom { rgb, .. }) => CrosstermColor::Rgb {
                r: rgb.r,
                g: rgb.g,
                b: rgb.b,
            },
            (Self::Color256, ResolvedColor::Custom { slot, rgb }) => {
                u8::try_from(slot).map_or_else(|_| Self::rgb_to_16(rgb), CrosstermColor::AnsiValue)
            }
            (Self::Color16, ResolvedColor::Custom { rgb, .. }) => Self::rgb_to_16(rgb),
        }
    }

    /// Convert RGB to 16-color ANSI.
    fn rgb_to_16(rgb: Rgb) -> CrosstermColor {
        let Rgb { r, g, b } = rgb;
        let luminance = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
        let bright = luminance > 127;

        let max = r.max(g).max(b);
        let threshold = max / 2;

        let has_r = r > threshold;
        let has_g = g > threshold;
        let has_b = b > threshold;

        match (has_r, has_g, has_b, bright) {
            (false, false, false, false) => CrosstermColor::Black,
            (false, false, false, true) => CrosstermColor::DarkGrey,
            (true, false, false, false) => CrosstermColor::DarkRed,
            (true, false, false, true) => CrosstermColor::Red,
            (false, true, false, false) => CrosstermColor::DarkGreen,
            (false, true, false, true) => CrosstermColor::Green,
            (true, true, false, false) => CrosstermColor::DarkYellow,
            (true, true, false, true) => CrosstermColor::Yellow,
            (false, false, true, false) => CrosstermColor::DarkBlue,
            (false, false, true, true) => CrosstermColor::Blue,
            (true, false, true, false) => CrosstermColor::DarkMagenta,
            (true, false, true, true) => CrosstermColor::Magenta,
            (false, true, true, false) => CrosstermColor::DarkCyan,
            (false, true, true, true) => CrosstermColor::Cyan,
            (true, true, true, false) => CrosstermColor::Grey,
            (true, true, true, true) => CrosstermColor::White,
        }
    }
}

/// The eight basic colors are the low half of the ANSI palette.
const fn basic_to_crossterm(basic: BasicColor) -> CrosstermColor {
    match basic {
        BasicColor::Black => CrosstermColor::Black,
        BasicColor::Red => CrosstermColor::DarkRed,
        BasicColor::Green => CrosstermColor::DarkGreen,
        BasicColor::Yellow => CrosstermColor::DarkYellow,
        BasicColor::Blue => CrosstermColor::DarkBlue,
        BasicColor::Magenta => CrosstermColor::DarkMagenta,
        BasicColor::Cyan => CrosstermColor::DarkCyan,
        BasicColor::White => CrosstermColor::Grey,
    }
}

/// OSC 4 sequence redefining one palette entry.
#[must_use]
pub fn palette_definition(slot: u16, rgb: Rgb) -> String {
    format!(
        "\x1b]4;{slot};rgb:{:02x}/{:02x}/{:02x}\x1b\\",
        rgb.r, rgb.g, rgb.b
    )
}
