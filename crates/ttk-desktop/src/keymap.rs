//! macOS virtual keycode and modifier translation.

use ttk_core::{InputEvent, KeyCode, Modifiers};

/// `NSEventModifierFlagShift`.
pub const FLAG_SHIFT: u64 = 1 << 17;
/// `NSEventModifierFlagControl`.
pub const FLAG_CONTROL: u64 = 1 << 18;
/// `NSEventModifierFlagOption`.
pub const FLAG_OPTION: u64 = 1 << 19;
/// `NSEventModifierFlagCommand`.
pub const FLAG_COMMAND: u64 = 1 << 20;

/// Map a platform modifier word. Option becomes ALT.
#[must_use]
pub fn modifiers_from_flags(flags: u64) -> Modifiers {
    let mut out = Modifiers::NONE;
    if flags & FLAG_SHIFT != 0 {
        out |= Modifiers::SHIFT;
    }
    if flags & FLAG_CONTROL != 0 {
        out |= Modifiers::CONTROL;
    }
    if flags & FLAG_OPTION != 0 {
        out |= Modifiers::ALT;
    }
    if flags & FLAG_COMMAND != 0 {
        out |= Modifiers::COMMAND;
    }
    out
}

/// Named key for a virtual keycode, if it has one.
#[must_use]
pub const fn special_key(keycode: u16) -> Option<KeyCode> {
    let key = match keycode {
        123 => KeyCode::Left,
        124 => KeyCode::Right,
        125 => KeyCode::Down,
        126 => KeyCode::Up,
        122 => KeyCode::F(1),
        120 => KeyCode::F(2),
        99 => KeyCode::F(3),
        118 => KeyCode::F(4),
        96 => KeyCode::F(5),
        97 => KeyCode::F(6),
        98 => KeyCode::F(7),
        100 => KeyCode::F(8),
        101 => KeyCode::F(9),
        109 => KeyCode::F(10),
        103 => KeyCode::F(11),
        111 => KeyCode::F(12),
        51 => KeyCode::Backspace,
        117 => KeyCode::Delete,
        115 => KeyCode::Home,
        119 => KeyCode::End,
        116 => KeyCode::PageUp,
        121 => KeyCode::PageDown,
        36 | 76 => KeyCode::Enter,
        53 => KeyCode::Escape,
        48 => KeyCode::Tab,
        _ => return None,
    };
    Some(key)
}

/// Translate a key press.
///
/// Named keys win over the produced characters. Otherwise the first
/// character decides; control characters map to their named keys and
/// anything else unnamed is dropped.
#[must_use]
pub fn translate_key(keycode: u16, characters: &str, modifier_flags: u64) -> Option<InputEvent> {
    let modifiers = modifiers_from_flags(modifier_flags);
    if let Some(code) = special_key(keycode) {
        return Some(InputEvent::Key {
            code,
            modifiers,
            ch: None,
        });
    }
    let ch = characters.chars().next()?;
    let code = match ch {
        '\r' | '\n' => KeyCode::Enter,
        '\t' => KeyCode::Tab,
        '\u{1b}' => KeyCode::Escape,
        '\u{7f}' => KeyCode::Backspace,
        c if c.is_control() => return None,
        c => {
            return Some(InputEvent::Key {
                code: KeyCode::Char(c),
                modifiers,
                ch: Some(c),
            })
        }
    };
    Some(InputEvent::Key {
        code,
        modifiers,
        ch: None,
    })
}
