//! Unified input events.
//!
//! Every backend translates its raw input into [`InputEvent`]. Named keys
//! carry stable integer codes so recorded input can be compared across
//! substrates:
//!
//! | key | code |
//! |---|---|
//! | TAB, ENTER, ESCAPE, BACKSPACE | 9, 10, 27, 127 |
//! | UP, DOWN, LEFT, RIGHT | 1000..=1003 |
//! | F1..F12 | 1100..=1111 |
//! | INSERT, DELETE, HOME, END, PAGE_UP, PAGE_DOWN | 1200..=1205 |
//! | RESIZE | 3000 |
//!
//! Printable keys use their code point.

use serde::{Deserialize, Serialize};

/// Keyboard key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key producing a character.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Backspace.
    Backspace,
    /// Tab.
    Tab,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Function key F1..=F12.
    F(u8),
    /// Insert.
    Insert,
    /// Forward delete.
    Delete,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Window or terminal size changed.
    Resize,
    /// Raw substrate code with no shared name.
    Other(u32),
}

impl KeyCode {
    const ARROW_BASE: u32 = 1000;
    const FUNCTION_BASE: u32 = 1100;
    const EDIT_BASE: u32 = 1200;
    const RESIZE_CODE: u32 = 3000;

    /// Function key `n` (1-based), if `n` is in 1..=12.
    #[must_use]
    pub const fn function(n: u8) -> Option<Self> {
        if n >= 1 && n <= 12 {
            Some(Self::F(n))
        } else {
            None
        }
    }

    /// Stable integer code.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Char(c) => c as u32,
            Self::Tab => 9,
            Self::Enter => 10,
            Self::Escape => 27,
            Self::Backspace => 127,
            Self::Up => Self::ARROW_BASE,
            Self::Down => Self::ARROW_BASE + 1,
            Self::Left => Self::ARROW_BASE + 2,
            Self::Right => Self::ARROW_BASE + 3,
            Self::F(n) => Self::FUNCTION_BASE + n.saturating_sub(1) as u32,
            Self::Insert => Self::EDIT_BASE,
            Self::Delete => Self::EDIT_BASE + 1,
            Self::Home => Self::EDIT_BASE + 2,
            Self::End => Self::EDIT_BASE + 3,
            Self::PageUp => Self::EDIT_BASE + 4,
            Self::PageDown => Self::EDIT_BASE + 5,
            Self::Resize => Self::RESIZE_CODE,
            Self::Other(code) => code,
        }
    }

    /// Inverse of [`KeyCode::code`].
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        match code {
            9 => Self::Tab,
            10 | 13 => Self::Enter,
            27 => Self::Escape,
            8 | 127 => Self::Backspace,
            1000 => Self::Up,
            1001 => Self::Down,
            1002 => Self::Left,
            1003 => Self::Right,
            1100..=1111 => Self::F((code - Self::FUNCTION_BASE + 1) as u8),
            1200 => Self::Insert,
            1201 => Self::Delete,
            1202 => Self::Home,
            1203 => Self::End,
            1204 => Self::PageUp,
            1205 => Self::PageDown,
            3000 => Self::Resize,
            _ => match char::from_u32(code) {
                Some(c) if !c.is_control() => Self::Char(c),
                _ => Self::Other(code),
            },
        }
    }

    /// Check if this is a named non-printable key.
    #[must_use]
    pub const fn is_special(self) -> bool {
        !matches!(self, Self::Char(_) | Self::Other(_))
    }

    /// The character this key types, if it types one.
    #[must_use]
    pub fn printable_char(self) -> Option<char> {
        match self {
            Self::Char(c) if !c.is_control() => Some(c),
            _ => None,
        }
    }

    /// Upper-case name used in logs and debug output.
    #[must_use]
    pub fn name(self) -> String {
        match self {
            Self::Char(' ') => "SPACE".into(),
            Self::Char(c) => c.to_uppercase().collect(),
            Self::Enter => "ENTER".into(),
            Self::Escape => "ESCAPE".into(),
            Self::Backspace => "BACKSPACE".into(),
            Self::Tab => "TAB".into(),
            Self::Up => "UP".into(),
            Self::Down => "DOWN".into(),
            Self::Left => "LEFT".into(),
            Self::Right => "RIGHT".into(),
            Self::F(n) => format!("F{n}"),
            Self::Insert => "INSERT".into(),
            Self::Delete => "DELETE".into(),
            Self::Home => "HOME".into(),
            Self::End => "END".into(),
            Self::PageUp => "PAGE_UP".into(),
            Self::PageDown => "PAGE_DOWN".into(),
            Self::Resize => "RESIZE".into(),
            Self::Other(code) => format!("KEY_{code}"),
        }
    }
}

/// Modifier key bitmask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// Shift.
    pub const SHIFT: Self = Self(1 << 0);
    /// Control.
    pub const CONTROL: Self = Self(1 << 1);
    /// Alt / Option.
    pub const ALT: Self = Self(1 << 2);
    /// Command / Super.
    pub const COMMAND: Self = Self(1 << 3);

    /// Check if no modifier is held.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if all bits of `other` are set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Get raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Create from raw bits; unknown bits are dropped.
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0x0f)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Mouse button; discriminants match the wire values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// No button (moves, wheel).
    #[default]
    None = 0,
    /// Primary button.
    Left = 1,
    /// Middle button / wheel click.
    Middle = 2,
    /// Secondary button.
    Right = 3,
}

/// What the mouse did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseEventKind {
    /// Button pressed.
    #[default]
    ButtonDown,
    /// Button released.
    ButtonUp,
    /// Second click within the substrate's double-click interval.
    DoubleClick,
    /// Pointer moved with no button held.
    Move,
    /// Scroll wheel; `scroll_delta` carries the direction.
    Wheel,
    /// Pointer moved with a button held.
    Drag,
}

/// A mouse action in cell coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MouseEvent {
    /// Cell row.
    pub row: i32,
    /// Cell column.
    pub col: i32,
    /// Button involved.
    pub button: MouseButton,
    /// Action.
    pub kind: MouseEventKind,
    /// Position inside the cell, each axis in `[0, 1)`, when the substrate knows it.
    pub sub_cell: Option<(f32, f32)>,
    /// Wheel delta (positive is up).
    pub scroll_delta: i32,
    /// Modifiers held during the action.
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// A button press at a cell.
    #[must_use]
    pub fn press(row: i32, col: i32, button: MouseButton) -> Self {
        Self {
            row,
            col,
            button,
            ..Self::default()
        }
    }

    /// Builder: set the action kind.
    #[must_use]
    pub fn with_kind(mut self, kind: MouseEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder: set modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// One piece of input, in substrate-neutral form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Key press. `ch` is set only for printable keys.
    Key {
        /// Key identity.
        code: KeyCode,
        /// Modifiers held.
        modifiers: Modifiers,
        /// Typed character.
        ch: Option<char>,
    },
    /// Committed text input (one character).
    Char(char),
    /// Mouse action.
    Mouse(MouseEvent),
    /// The surface changed size; query `get_dimensions()` again.
    Resize,
    /// A menu item was chosen.
    Menu(String),
    /// The user asked to close the window.
    Close,
}

impl InputEvent {
    /// Key event with `ch` derived from the code.
    #[must_use]
    pub fn key(code: KeyCode, modifiers: Modifiers) -> Self {
        Self::Key {
            code,
            modifiers,
            ch: code.printable_char(),
        }
    }

    /// Check if the event carries a visible character.
    #[must_use]
    pub fn is_printable(&self) -> bool {
        match self {
            Self::Key { ch: Some(c), .. } | Self::Char(c) => !c.is_control(),
            _ => false,
        }
    }

    /// Check if the event is a named non-printable key or a resize.
    #[must_use]
    pub fn is_special_key(&self) -> bool {
        match self {
            Self::Key { code, .. } => code.is_special(),
            Self::Resize => true,
            _ => false,
        }
    }

    /// Check if all bits of `modifier` were held.
    #[must_use]
    pub fn has_modifier(&self, modifier: Modifiers) -> bool {
        match self {
            Self::Key { modifiers, .. } => modifiers.contains(modifier),
            Self::Mouse(mouse) => mouse.modifiers.contains(modifier),
            _ => false,
        }
    }

    /// Modifiers held, or none for events that carry no modifier state.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::Key { modifiers, .. } => *modifiers,
            Self::Mouse(mouse) => mouse.modifiers,
            _ => Modifiers::NONE,
        }
    }

    /// Promote a printable key typed without a command modifier to text input.
    ///
    /// Shift alone still counts as typing.
    #[must_use]
    pub fn to_char_event(&self) -> Option<Self> {
        match self {
            Self::Key {
                modifiers,
                ch: Some(c),
                ..
            } if !c.is_control()
                && !modifiers.intersects(Modifiers::CONTROL | Modifiers::ALT | Modifiers::COMMAND) =>
            {
                Some(Self::Char(*c))
            }
            _ => None,
        }
    }
}
