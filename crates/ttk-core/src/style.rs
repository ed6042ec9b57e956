//! Text attributes.

use serde::{Deserialize, Serialize};

/// Text attribute bitmask, combinable with `|`.
///
/// Serialized as its raw integer. Bits outside the named flags are carried
/// through unchanged and ignored by backends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextAttribute(u32);

impl TextAttribute {
    /// Plain text.
    pub const NORMAL: Self = Self(0);
    /// Bold text.
    pub const BOLD: Self = Self(1 << 0);
    /// Underlined text.
    pub const UNDERLINE: Self = Self(1 << 1);
    /// Reversed colors.
    pub const REVERSE: Self = Self(1 << 2);

    /// Check if no attribute is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if all bits of `other` are set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Add an attribute.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove an attribute.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Get raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Create from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }
}

impl std::ops::BitOr for TextAttribute {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TextAttribute {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for TextAttribute {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl From<u32> for TextAttribute {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}
