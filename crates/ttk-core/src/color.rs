//! RGB values, the fixed 8-color palette, and the approximation between them.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 24-bit color. Serialized as a `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from wide integer channels, rejecting anything outside 0..=255.
    ///
    /// `field` names the parameter in the error message.
    pub fn from_components(field: &'static str, components: [i64; 3]) -> Result<Self, ValidationError> {
        let mut out = [0u8; 3];
        for (index, (&value, slot)) in components.iter().zip(out.iter_mut()).enumerate() {
            *slot = u8::try_from(value).map_err(|_| ValidationError::RgbComponentOutOfRange {
                field,
                index,
                value,
            })?;
        }
        Ok(Self::from(out))
    }

    /// Channels as an array.
    #[must_use]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return Err(ColorParseError::InvalidLength);
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or(ColorParseError::InvalidHex)
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to `0.0..=1.0`.
    #[must_use]
    pub fn to_normalized(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }

    /// Inverse of [`Rgb::to_normalized`]; out-of-range inputs are clamped.
    #[must_use]
    pub fn from_normalized(rgb: [f32; 3]) -> Self {
        let scale = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(scale(rgb[0]), scale(rgb[1]), scale(rgb[2]))
    }

    /// Channels scaled to the 0..=1000 range curses-style palettes use.
    #[must_use]
    pub fn to_permille(self) -> [u16; 3] {
        let scale = |v: u8| (u32::from(v) * 1000 / 255) as u16;
        [scale(self.r), scale(self.g), scale(self.b)]
    }

    /// Mean of the three channels.
    #[must_use]
    pub fn brightness(self) -> u8 {
        ((u16::from(self.r) + u16::from(self.g) + u16::from(self.b)) / 3) as u8
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Clamp an arbitrary integer into a color channel.
#[must_use]
pub fn clamp_component(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

/// Error type for hex color parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    /// Invalid hex characters
    #[error("invalid hex characters")]
    InvalidHex,
    /// Invalid string length
    #[error("invalid hex string length (expected 6)")]
    InvalidLength,
}

/// The fixed palette every terminal supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicColor {
    /// Palette index 0.
    Black,
    /// Palette index 1.
    Red,
    /// Palette index 2.
    Green,
    /// Palette index 3.
    Yellow,
    /// Palette index 4.
    Blue,
    /// Palette index 5.
    Magenta,
    /// Palette index 6.
    Cyan,
    /// Palette index 7.
    White,
}

impl BasicColor {
    /// All eight colors in palette order.
    pub const ALL: [Self; 8] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// ANSI palette index (0..=7).
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Canonical RGB for the palette entry.
    #[must_use]
    pub const fn to_rgb(self) -> Rgb {
        match self {
            Self::Black => Rgb::new(0, 0, 0),
            Self::Red => Rgb::new(255, 0, 0),
            Self::Green => Rgb::new(0, 255, 0),
            Self::Yellow => Rgb::new(255, 255, 0),
            Self::Blue => Rgb::new(0, 0, 255),
            Self::Magenta => Rgb::new(255, 0, 255),
            Self::Cyan => Rgb::new(0, 255, 255),
            Self::White => Rgb::new(255, 255, 255),
        }
    }
}

/// Map an RGB triple to the closest of the eight basic colors.
///
/// Pure: the result depends only on the input. Checks run in a fixed order,
/// so a color matching several rules takes the first.
#[must_use]
pub fn approximate_basic_color(rgb: Rgb) -> BasicColor {
    let (r, g, b) = (i32::from(rgb.r), i32::from(rgb.g), i32::from(rgb.b));

    // Mean brightness below 30 or above 200, compared on the sum so that
    // fractional means are not truncated.
    let sum = r + g + b;
    if sum < 90 {
        return BasicColor::Black;
    }
    if sum > 600 {
        return BasicColor::White;
    }

    // Grays carry no hue worth keeping.
    let saturation = r.max(g).max(b) - r.min(g).min(b);
    if saturation < 40 {
        return BasicColor::White;
    }

    if r > 180 && g > 180 && b < 150 {
        return BasicColor::Yellow;
    }
    if g > r.max(b) + 50 {
        return BasicColor::Green;
    }
    if b > r.max(g) + 30 {
        return BasicColor::Blue;
    }
    if g > 180 && b > 180 && r < 100 {
        return BasicColor::Cyan;
    }
    if r > 180 && b > 180 && g < 100 {
        return BasicColor::Magenta;
    }
    if r > g.max(b) + 50 {
        return BasicColor::Red;
    }
    if r > 180 && g > 180 {
        return BasicColor::Yellow;
    }
    BasicColor::White
}
