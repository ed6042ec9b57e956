//! Translation of crossterm events into [`InputEvent`]s.

use crossterm::event::{
    Event as CrosstermEvent, KeyCode as CtKeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton as CtMouseButton, MouseEvent as CtMouseEvent, MouseEventKind as CtMouseKind,
};
use std::collections::VecDeque;
use ttk_core::{InputEvent, KeyCode, Modifiers, MouseButton, MouseEvent, MouseEventKind};

/// Convert crossterm modifier flags.
#[must_use]
pub fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if mods.contains(KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        out |= Modifiers::CONTROL;
    }
    if mods.contains(KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if mods.contains(KeyModifiers::SUPER) || mods.contains(KeyModifiers::META) {
        out |= Modifiers::COMMAND;
    }
    out
}

/// Map a crossterm key code. Keys with no shared name return `None`.
#[must_use]
pub fn convert_key_code(code: CtKeyCode) -> Option<KeyCode> {
    let key = match code {
        CtKeyCode::Char(c) => KeyCode::Char(c),
        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Esc => KeyCode::Escape,
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::Tab | CtKeyCode::BackTab => KeyCode::Tab,
        CtKeyCode::Up => KeyCode::Up,
        CtKeyCode::Down => KeyCode::Down,
        CtKeyCode::Left => KeyCode::Left,
        CtKeyCode::Right => KeyCode::Right,
        CtKeyCode::Insert => KeyCode::Insert,
        CtKeyCode::Delete => KeyCode::Delete,
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::PageUp => KeyCode::PageUp,
        CtKeyCode::PageDown => KeyCode::PageDown,
        CtKeyCode::F(n) => return KeyCode::function(n),
        _ => return None,
    };
    Some(key)
}

fn convert_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let code = convert_key_code(key.code)?;
    let mut modifiers = convert_modifiers(key.modifiers);
    if key.code == CtKeyCode::BackTab {
        modifiers |= Modifiers::SHIFT;
    }
    Some(InputEvent::key(code, modifiers))
}

const fn convert_button(button: CtMouseButton) -> MouseButton {
    match button {
        CtMouseButton::Left => MouseButton::Left,
        CtMouseButton::Middle => MouseButton::Middle,
        CtMouseButton::Right => MouseButton::Right,
    }
}

fn convert_mouse(mouse: CtMouseEvent) -> Option<InputEvent> {
    let (button, kind, scroll_delta) = match mouse.kind {
        CtMouseKind::Down(b) => (convert_button(b), MouseEventKind::ButtonDown, 0),
        CtMouseKind::Up(b) => (convert_button(b), MouseEventKind::ButtonUp, 0),
        CtMouseKind::Drag(b) => (convert_button(b), MouseEventKind::Drag, 0),
        CtMouseKind::Moved => (MouseButton::None, MouseEventKind::Move, 0),
        CtMouseKind::ScrollUp => (MouseButton::None, MouseEventKind::Wheel, 1),
        CtMouseKind::ScrollDown => (MouseButton::None, MouseEventKind::Wheel, -1),
        CtMouseKind::ScrollLeft | CtMouseKind::ScrollRight => return None,
    };
    Some(InputEvent::Mouse(MouseEvent {
        row: i32::from(mouse.row),
        col: i32::from(mouse.column),
        button,
        kind,
        sub_cell: None,
        scroll_delta,
        modifiers: convert_modifiers(mouse.modifiers),
    }))
}

/// Translate one crossterm event, appending the results to `out`.
///
/// A paste becomes one `Char` per character; focus changes are dropped.
/// Returns the number of events appended. `TerminalRenderer` does not pass
/// resizes through here; it compares sizes itself so each change is
/// reported once.
pub fn translate_event(event: CrosstermEvent, out: &mut VecDeque<InputEvent>) -> usize {
    let before = out.len();
    match event {
        CrosstermEvent::Key(key) => out.extend(convert_key(key)),
        CrosstermEvent::Mouse(mouse) => out.extend(convert_mouse(mouse)),
        CrosstermEvent::Resize(..) => out.push_back(InputEvent::Resize),
        CrosstermEvent::Paste(text) => out.extend(
            text.chars()
                .filter(|c| !c.is_control())
                .map(InputEvent::Char),
        ),
        CrosstermEvent::FocusGained | CrosstermEvent::FocusLost => {}
    }
    out.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: CtKeyCode, mods: KeyModifiers) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent::new(code, mods))
    }

    fn one(event: CrosstermEvent) -> Option<InputEvent> {
        let mut out = VecDeque::new();
        translate_event(event, &mut out);
        assert!(out.len() <= 1);
        out.pop_front()
    }

    #[test]
    fn test_char_key() {
        let ev = one(key(CtKeyCode::Char('a'), KeyModifiers::NONE)).unwrap();
        assert_eq!(ev, InputEvent::key(KeyCode::Char('a'), Modifiers::NONE));
        assert!(ev.is_printable());
    }

    #[test]
    fn test_named_keys() {
        let cases = [
            (CtKeyCode::Enter, KeyCode::Enter),
            (CtKeyCode::Esc, KeyCode::Escape),
            (CtKeyCode::Backspace, KeyCode::Backspace),
            (CtKeyCode::Up, KeyCode::Up),
            (CtKeyCode::PageDown, KeyCode::PageDown),
            (CtKeyCode::F(12), KeyCode::F(12)),
        ];
        for (ct, expected) in cases {
            assert_eq!(convert_key_code(ct), Some(expected), "{ct:?}");
        }
        assert_eq!(convert_key_code(CtKeyCode::F(13)), None);
        assert_eq!(convert_key_code(CtKeyCode::CapsLock), None);
    }

    #[test]
    fn test_modifiers() {
        let ev = one(key(
            CtKeyCode::Char('c'),
            KeyModifiers::CONTROL | KeyModifiers::ALT,
        ))
        .unwrap();
        assert!(ev.has_modifier(Modifiers::CONTROL));
        assert!(ev.has_modifier(Modifiers::ALT));
        assert!(!ev.has_modifier(Modifiers::SHIFT));
    }

    #[test]
    fn test_backtab_is_shift_tab() {
        let ev = one(key(CtKeyCode::BackTab, KeyModifiers::NONE)).unwrap();
        assert_eq!(ev, InputEvent::key(KeyCode::Tab, Modifiers::SHIFT));
    }

    #[test]
    fn test_release_ignored() {
        let ev = CrosstermEvent::Key(KeyEvent {
            code: CtKeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(one(ev), None);
    }

    #[test]
    fn test_mouse_down() {
        let ev = one(CrosstermEvent::Mouse(CtMouseEvent {
            kind: CtMouseKind::Down(CtMouseButton::Left),
            column: 7,
            row: 3,
            modifiers: KeyModifiers::SHIFT,
        }))
        .unwrap();
        match ev {
            InputEvent::Mouse(m) => {
                assert_eq!((m.row, m.col), (3, 7));
                assert_eq!(m.button, MouseButton::Left);
                assert_eq!(m.kind, MouseEventKind::ButtonDown);
                assert!(m.modifiers.contains(Modifiers::SHIFT));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_scroll() {
        let ev = one(CrosstermEvent::Mouse(CtMouseEvent {
            kind: CtMouseKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }))
        .unwrap();
        assert!(matches!(
            ev,
            InputEvent::Mouse(MouseEvent {
                kind: MouseEventKind::Wheel,
                scroll_delta: -1,
                ..
            })
        ));
    }

    #[test]
    fn test_resize() {
        assert_eq!(one(CrosstermEvent::Resize(100, 40)), Some(InputEvent::Resize));
    }

    #[test]
    fn test_paste_expands_to_chars() {
        let mut out = VecDeque::new();
        assert_eq!(translate_event(CrosstermEvent::Paste("hi\n!".into()), &mut out), 3);
        assert_eq!(
            out.into_iter().collect::<Vec<_>>(),
            vec![InputEvent::Char('h'), InputEvent::Char('i'), InputEvent::Char('!')]
        );
    }

    #[test]
    fn test_focus_dropped() {
        assert_eq!(one(CrosstermEvent::FocusGained), None);
    }
}
