//! The Renderer contract every backend implements.
//!
//! Coordinates are `(row, col)` cells with the origin at the top-left.
//! Drawing outside the surface is clipped silently: a resize can land
//! between a size query and a draw call, and that must never fail the
//! caller. Arguments that break the contract (negative sizes, color pair
//! ids out of range) fail fast with [`ValidationError`].
//!
//! Drawing becomes visible at the next [`Renderer::refresh`] or
//! [`Renderer::refresh_region`].

use crate::color::Rgb;
use crate::error::{Result, ValidationError};
use crate::input::{InputEvent, MouseEvent};
use crate::style::TextAttribute;

/// Abstract drawing surface. Applications are written against this trait only.
pub trait Renderer {
    /// Acquire the display resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot be opened.
    fn initialize(&mut self) -> Result<()>;

    /// Release the display resource. Safe after a failed or partial
    /// `initialize()`; never fails.
    fn shutdown(&mut self);

    /// Live `(rows, cols)`.
    fn get_dimensions(&mut self) -> (i32, i32);

    /// Blank the whole surface.
    fn clear(&mut self);

    /// Blank a region; out-of-bounds parts are ignored.
    fn clear_region(&mut self, row: i32, col: i32, height: i32, width: i32) -> Result<()>;

    /// Write text starting at a cell. Clipped at the right edge, never wrapped.
    fn draw_text(
        &mut self,
        row: i32,
        col: i32,
        text: &str,
        color_pair: i32,
        attributes: TextAttribute,
    ) -> Result<()>;

    /// Draw `length` copies of `ch` to the right of `(row, col)`.
    fn draw_hline(&mut self, row: i32, col: i32, ch: char, length: i32, color_pair: i32)
        -> Result<()>;

    /// Draw `length` copies of `ch` below `(row, col)`.
    fn draw_vline(&mut self, row: i32, col: i32, ch: char, length: i32, color_pair: i32)
        -> Result<()>;

    /// Draw a box outline with [`BOX_GLYPHS`], or fill the area with blanks.
    fn draw_rect(
        &mut self,
        row: i32,
        col: i32,
        height: i32,
        width: i32,
        color_pair: i32,
        filled: bool,
    ) -> Result<()>;

    /// Make buffered drawing visible.
    fn refresh(&mut self) -> Result<()>;

    /// Make a region visible. Substrates without partial repaint may refresh everything.
    fn refresh_region(&mut self, row: i32, col: i32, height: i32, width: i32) -> Result<()>;

    /// Register a color pair (1..=255). Re-registering an id is a silent no-op.
    fn init_color_pair(&mut self, pair_id: i32, fg: Rgb, bg: Rgb) -> Result<()>;

    /// Wait for input.
    ///
    /// `timeout_ms < 0` blocks, `0` polls, `> 0` waits up to that many
    /// milliseconds. `Ok(None)` means the timeout expired.
    fn get_input(&mut self, timeout_ms: i32) -> Result<Option<InputEvent>>;

    /// Show or hide the cursor. Best effort.
    fn set_cursor_visibility(&mut self, visible: bool);

    /// Move the cursor. Best effort; out-of-bounds positions are ignored.
    fn move_cursor(&mut self, row: i32, col: i32);

    /// Same as [`Renderer::get_input`].
    fn get_event(&mut self, timeout_ms: i32) -> Result<Option<InputEvent>> {
        self.get_input(timeout_ms)
    }

    /// Install a native menu bar. Substrates without menus ignore it.
    fn set_menu_bar(&mut self, _menu: &MenuBar) {}

    /// Enable or disable one menu item.
    fn update_menu_item_state(&mut self, _item_id: &str, _enabled: bool) {}

    /// Position the text-input caret (used by input methods).
    fn set_caret_position(&mut self, _row: i32, _col: i32) {}

    /// Hand the display back temporarily (e.g. to run an external program).
    fn suspend(&mut self) -> Result<()> {
        Ok(())
    }

    /// Take the display back after [`Renderer::suspend`] and repaint.
    fn resume(&mut self) -> Result<()> {
        Ok(())
    }

    /// Whether colors get exact custom slots.
    fn is_fullcolor(&self) -> bool {
        false
    }

    /// Force fullcolor on or off for colors registered from now on.
    fn set_fullcolor_mode(&mut self, _enabled: bool) {}

    /// Forget every color pair except pair 1 so a new scheme can be loaded.
    fn clear_color_cache(&mut self) {}

    /// Change the background behind blank cells and pair 0.
    fn update_background(&mut self, _bg: Rgb) {}

    /// Deliver events to `handler` until it asks to stop or a Close goes unconsumed.
    fn run_event_loop(&mut self, handler: &mut dyn EventHandler) -> Result<()> {
        loop {
            if handler.should_exit() {
                return Ok(());
            }
            let Some(event) = self.get_input(-1)? else {
                continue;
            };
            let consumed = dispatch_event(handler, &event);
            if matches!(event, InputEvent::Close) && !consumed {
                return Ok(());
            }
        }
    }
}

/// Callback interface for [`Renderer::run_event_loop`].
///
/// Each method returns `true` when it consumed the event.
pub trait EventHandler {
    /// Key press (`InputEvent::Key`).
    fn on_key(&mut self, _event: &InputEvent) -> bool {
        false
    }

    /// Text input, including keys promoted from an unconsumed `on_key`.
    fn on_char(&mut self, _ch: char) -> bool {
        false
    }

    /// Mouse action.
    fn on_mouse(&mut self, _event: &MouseEvent) -> bool {
        false
    }

    /// Resize or Close.
    fn on_system(&mut self, _event: &InputEvent) -> bool {
        false
    }

    /// Menu selection.
    fn on_menu(&mut self, _item_id: &str) -> bool {
        false
    }

    /// Checked before each wait; `true` ends the loop.
    fn should_exit(&self) -> bool {
        false
    }
}

/// Route one event to the matching handler method.
///
/// An unconsumed printable key is offered again as text.
pub fn dispatch_event(handler: &mut dyn EventHandler, event: &InputEvent) -> bool {
    match event {
        InputEvent::Key { .. } => {
            handler.on_key(event)
                || event
                    .to_char_event()
                    .is_some_and(|ch| matches!(ch, InputEvent::Char(c) if handler.on_char(c)))
        }
        InputEvent::Char(c) => handler.on_char(*c),
        InputEvent::Mouse(mouse) => handler.on_mouse(mouse),
        InputEvent::Menu(item) => handler.on_menu(item),
        InputEvent::Resize | InputEvent::Close => handler.on_system(event),
    }
}

/// One entry of a native menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Id delivered in `InputEvent::Menu`.
    pub id: String,
    /// Label.
    pub label: String,
    /// Keyboard shortcut hint, e.g. `"Cmd+O"`.
    pub shortcut: Option<String>,
    /// Whether the item can be chosen.
    pub enabled: bool,
}

impl MenuItem {
    /// Enabled item without a shortcut.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shortcut: None,
            enabled: true,
        }
    }

    /// Builder: set the shortcut hint.
    #[must_use]
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }
}

/// A titled menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    /// Title shown in the bar.
    pub title: String,
    /// Items in order.
    pub items: Vec<MenuItem>,
}

/// The full menu bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuBar {
    /// Menus left to right.
    pub menus: Vec<Menu>,
}

impl MenuBar {
    /// Find an item by id.
    #[must_use]
    pub fn item_mut(&mut self, id: &str) -> Option<&mut MenuItem> {
        self.menus
            .iter_mut()
            .flat_map(|m| m.items.iter_mut())
            .find(|item| item.id == id)
    }
}

/// The box-drawing set shared by rectangles and lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxGlyphs {
    /// `┌`
    pub top_left: char,
    /// `┐`
    pub top_right: char,
    /// `└`
    pub bottom_left: char,
    /// `┘`
    pub bottom_right: char,
    /// `─`
    pub horizontal: char,
    /// `│`
    pub vertical: char,
}

/// Light single-line box drawing.
pub const BOX_GLYPHS: BoxGlyphs = BoxGlyphs {
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    horizontal: '─',
    vertical: '│',
};

/// Reject a negative size argument.
pub fn validate_dimension(field: &'static str, value: i32) -> Result<i32, ValidationError> {
    if value < 0 {
        Err(ValidationError::NegativeDimension {
            field,
            value: i64::from(value),
        })
    } else {
        Ok(value)
    }
}

/// Cells of a rectangle outline that fall on a `rows` x `cols` grid, in
/// row-major order.
///
/// A one-row rectangle is `┌──┐`; a one-column rectangle is `┌`, `│`..., `└`.
/// Corner glyphs come from the rectangle's real edges, so a rectangle that
/// runs off the grid keeps its visible corners and loses the rest. Edges are
/// computed in `i64` and only visible cells are produced.
#[must_use]
pub fn rect_outline(
    row: i32,
    col: i32,
    height: i32,
    width: i32,
    rows: i32,
    cols: i32,
) -> Vec<(i32, i32, char)> {
    let mut cells = Vec::new();
    if height <= 0 || width <= 0 || rows <= 0 || cols <= 0 {
        return cells;
    }
    let (top, left) = (i64::from(row), i64::from(col));
    let bottom = top + i64::from(height) - 1;
    let right = left + i64::from(width) - 1;

    let r0 = top.max(0);
    let r1 = bottom.min(i64::from(rows) - 1);
    let c0 = left.max(0);
    let c1 = right.min(i64::from(cols) - 1);
    if r0 > r1 || c0 > c1 {
        return cells;
    }

    let glyph = |r: i64, c: i64| -> char {
        let g = BOX_GLYPHS;
        if height == 1 {
            return if c == left {
                g.top_left
            } else if c == right {
                g.top_right
            } else {
                g.horizontal
            };
        }
        if width == 1 {
            return if r == top {
                g.top_left
            } else if r == bottom {
                g.bottom_left
            } else {
                g.vertical
            };
        }
        match (r == top, r == bottom, c == left, c == right) {
            (true, _, true, _) => g.top_left,
            (true, _, _, true) => g.top_right,
            (_, true, true, _) => g.bottom_left,
            (_, true, _, true) => g.bottom_right,
            (true, _, _, _) | (_, true, _, _) => g.horizontal,
            _ => g.vertical,
        }
    };

    // Every visible coordinate lies in 0..rows and 0..cols, so it fits an i32.
    let mut push = |r: i64, c: i64| {
        if let (Ok(ri), Ok(ci)) = (i32::try_from(r), i32::try_from(c)) {
            cells.push((ri, ci, glyph(r, c)));
        }
    };
    for r in r0..=r1 {
        if r == top || r == bottom {
            for c in c0..=c1 {
                push(r, c);
            }
        } else {
            if (c0..=c1).contains(&left) {
                push(r, left);
            }
            if right != left && (c0..=c1).contains(&right) {
                push(r, right);
            }
        }
    }
    cells
}
