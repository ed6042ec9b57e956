//! Null backend that records every Renderer call as a [`Command`].
//!
//! Arguments are validated exactly as a real backend validates them, so a
//! test against [`RecordingRenderer`] fails where a terminal would. Only
//! successful calls are recorded. Input comes from a scripted queue.

use crate::color::Rgb;
use crate::command::Command;
use crate::error::Result;
use crate::input::InputEvent;
use crate::palette::{validate_color_pair, ColorRegistry};
use crate::renderer::{validate_dimension, MenuBar, Renderer};
use crate::style::TextAttribute;
use std::collections::VecDeque;

/// Renderer that draws nothing and remembers everything.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    rows: i32,
    cols: i32,
    initialized: bool,
    suspended: bool,
    colors: ColorRegistry,
    commands: Vec<Command>,
    input: VecDeque<InputEvent>,
    cursor_visible: bool,
    cursor: (i32, i32),
    caret: Option<(i32, i32)>,
    menu_bar: Option<MenuBar>,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new(24, 80)
    }
}

impl RecordingRenderer {
    /// Recorder reporting a `rows` x `cols` surface.
    #[must_use]
    pub fn new(rows: i32, cols: i32) -> Self {
        Self {
            rows: rows.max(0),
            cols: cols.max(0),
            initialized: false,
            suspended: false,
            colors: ColorRegistry::unbounded(),
            commands: Vec::new(),
            input: VecDeque::new(),
            cursor_visible: true,
            cursor: (0, 0),
            caret: None,
            menu_bar: None,
        }
    }

    /// Builder: queue scripted input.
    #[must_use]
    pub fn with_input(mut self, events: impl IntoIterator<Item = InputEvent>) -> Self {
        self.input.extend(events);
        self
    }

    /// Append one scripted event.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push_back(event);
    }

    /// Change the reported size and queue a Resize event.
    pub fn resize(&mut self, rows: i32, cols: i32) {
        self.rows = rows.max(0);
        self.cols = cols.max(0);
        self.input.push_back(InputEvent::Resize);
    }

    /// Recorded commands in call order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Take ownership of the recording, leaving it empty.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Forget the recording. Colors and input are kept.
    pub fn clear_recording(&mut self) {
        self.commands.clear();
    }

    /// Run the recording against another renderer, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first command the target rejects.
    pub fn replay_into(&self, target: &mut dyn Renderer) -> Result<()> {
        for command in &self.commands {
            command.apply(target)?;
        }
        Ok(())
    }

    /// The color registry.
    #[must_use]
    pub const fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    /// Whether `initialize()` has run without a later `shutdown()`.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the display is handed back.
    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Last cursor visibility.
    #[must_use]
    pub const fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Last cursor position.
    #[must_use]
    pub const fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    /// Last caret position.
    #[must_use]
    pub const fn caret(&self) -> Option<(i32, i32)> {
        self.caret
    }

    /// Installed menu bar.
    #[must_use]
    pub const fn menu_bar(&self) -> Option<&MenuBar> {
        self.menu_bar.as_ref()
    }
}

impl Renderer for RecordingRenderer {
    fn initialize(&mut self) -> Result<()> {
        self.initialized = true;
        tracing::debug!(rows = self.rows, cols = self.cols, "recording renderer initialized");
        Ok(())
    }

    fn shutdown(&mut self) {
        self.initialized = false;
    }

    fn get_dimensions(&mut self) -> (i32, i32) {
        (self.rows, self.cols)
    }

    fn clear(&mut self) {
        self.commands.push(Command::Clear);
    }

    fn clear_region(&mut self, row: i32, col: i32, height: i32, width: i32) -> Result<()> {
        validate_dimension("height", height)?;
        validate_dimension("width", width)?;
        self.commands.push(Command::clear_region(row, col, height, width));
        Ok(())
    }

    fn draw_text(
        &mut self,
        row: i32,
        col: i32,
        text: &str,
        color_pair: i32,
        attributes: TextAttribute,
    ) -> Result<()> {
        validate_color_pair(color_pair)?;
        self.commands.push(Command::DrawText {
            row,
            col,
            text: text.to_owned(),
            color_pair,
            attributes,
        });
        Ok(())
    }

    fn draw_hline(&mut self, row: i32, col: i32, ch: char, length: i32, color_pair: i32) -> Result<()> {
        validate_dimension("length", length)?;
        validate_color_pair(color_pair)?;
        self.commands
            .push(Command::draw_hline(row, col, ch, length).with_color_pair(color_pair));
        Ok(())
    }

    fn draw_vline(&mut self, row: i32, col: i32, ch: char, length: i32, color_pair: i32) -> Result<()> {
        validate_dimension("length", length)?;
        validate_color_pair(color_pair)?;
        self.commands
            .push(Command::draw_vline(row, col, ch, length).with_color_pair(color_pair));
        Ok(())
    }

    fn draw_rect(
        &mut self,
        row: i32,
        col: i32,
        height: i32,
        width: i32,
        color_pair: i32,
        filled: bool,
    ) -> Result<()> {
        validate_dimension("height", height)?;
        validate_dimension("width", width)?;
        validate_color_pair(color_pair)?;
        self.commands.push(
            Command::draw_rect(row, col, height, width)
                .with_color_pair(color_pair)
                .with_filled(filled),
        );
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        self.commands.push(Command::Refresh);
        Ok(())
    }

    fn refresh_region(&mut self, row: i32, col: i32, height: i32, width: i32) -> Result<()> {
        validate_dimension("height", height)?;
        validate_dimension("width", width)?;
        self.commands
            .push(Command::refresh_region(row, col, height, width));
        Ok(())
    }

    fn init_color_pair(&mut self, pair_id: i32, fg: Rgb, bg: Rgb) -> Result<()> {
        self.colors.register(pair_id, fg, bg)?;
        self.commands.push(Command::init_color_pair(pair_id, fg, bg));
        Ok(())
    }

    fn get_input(&mut self, timeout_ms: i32) -> Result<Option<InputEvent>> {
        match self.input.pop_front() {
            Some(event) => Ok(Some(event)),
            // A blocking wait on an exhausted script would never return.
            None if timeout_ms < 0 => Ok(Some(InputEvent::Close)),
            None => Ok(None),
        }
    }

    fn set_cursor_visibility(&mut self, visible: bool) {
        self.cursor_visible = visible;
        self.commands.push(Command::set_cursor_visibility(visible));
    }

    fn move_cursor(&mut self, row: i32, col: i32) {
        self.cursor = (row, col);
        self.commands.push(Command::move_cursor(row, col));
    }

    fn set_menu_bar(&mut self, menu: &MenuBar) {
        self.menu_bar = Some(menu.clone());
    }

    fn update_menu_item_state(&mut self, item_id: &str, enabled: bool) {
        if let Some(item) = self.menu_bar.as_mut().and_then(|bar| bar.item_mut(item_id)) {
            item.enabled = enabled;
        }
    }

    fn set_caret_position(&mut self, row: i32, col: i32) {
        self.caret = Some((row, col));
    }

    fn suspend(&mut self) -> Result<()> {
        self.suspended = true;
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        self.suspended = false;
        Ok(())
    }

    fn is_fullcolor(&self) -> bool {
        self.colors.is_fullcolor()
    }

    fn set_fullcolor_mode(&mut self, enabled: bool) {
        self.colors.set_fullcolor(enabled);
    }

    fn clear_color_cache(&mut self) {
        self.colors.clear_cache();
    }

    fn update_background(&mut self, bg: Rgb) {
        self.colors.set_default_background(bg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TtkError, ValidationError};
    use crate::input::{KeyCode, Modifiers};
    use crate::renderer::{EventHandler, Menu, MenuItem};

    #[test]
    fn test_new_is_empty() {
        let mut rec = RecordingRenderer::new(10, 40);
        assert!(rec.is_empty());
        assert_eq!(rec.command_count(), 0);
        assert_eq!(rec.get_dimensions(), (10, 40));
    }

    #[test]
    fn test_records_in_order() {
        let mut rec = RecordingRenderer::default();
        rec.initialize().unwrap();
        rec.clear();
        rec.draw_text(1, 2, "hi", 0, TextAttribute::BOLD).unwrap();
        rec.draw_rect(0, 0, 3, 4, 1, true).unwrap();
        rec.refresh().unwrap();
        let types: Vec<_> = rec.commands().iter().map(Command::command_type).collect();
        assert_eq!(types, vec!["clear", "draw_text", "draw_rect", "refresh"]);
        assert_eq!(
            rec.commands()[2],
            Command::draw_rect(0, 0, 3, 4).with_color_pair(1).with_filled(true)
        );
    }

    #[test]
    fn test_validation_matches_backend() {
        let mut rec = RecordingRenderer::default();
        let err = rec.draw_text(0, 0, "x", 300, TextAttribute::NORMAL).unwrap_err();
        assert!(matches!(
            err,
            TtkError::Validation(ValidationError::ColorPairOutOfRange { value: 300 })
        ));
        assert!(rec.draw_hline(0, 0, '-', -1, 0).is_err());
        assert!(rec.draw_rect(0, 0, -2, 3, 0, false).is_err());
        assert!(rec.clear_region(0, 0, 1, -1).is_err());
        assert!(rec.init_color_pair(0, Rgb::WHITE, Rgb::BLACK).is_err());
        assert!(rec.is_empty());
    }

    #[test]
    fn test_out_of_bounds_draw_is_recorded() {
        let mut rec = RecordingRenderer::new(5, 5);
        rec.draw_text(100, 100, "off", 0, TextAttribute::NORMAL).unwrap();
        assert_eq!(rec.command_count(), 1);
    }

    #[test]
    fn test_color_pair_first_wins() {
        let mut rec = RecordingRenderer::default();
        rec.init_color_pair(1, Rgb::new(255, 0, 0), Rgb::BLACK).unwrap();
        rec.init_color_pair(1, Rgb::new(0, 255, 0), Rgb::WHITE).unwrap();
        let pair = rec.colors().get(1).unwrap();
        assert_eq!(pair.pair.fg, Rgb::new(255, 0, 0));
        assert_eq!(rec.command_count(), 2);
    }

    #[test]
    fn test_scripted_input() {
        let key = InputEvent::key(KeyCode::Char('q'), Modifiers::NONE);
        let mut rec = RecordingRenderer::default().with_input([key.clone()]);
        assert_eq!(rec.get_input(0).unwrap(), Some(key));
        assert_eq!(rec.get_input(0).unwrap(), None);
        assert_eq!(rec.get_input(-1).unwrap(), Some(InputEvent::Close));
    }

    #[test]
    fn test_resize_queues_event() {
        let mut rec = RecordingRenderer::new(24, 80);
        rec.resize(30, 100);
        assert_eq!(rec.get_dimensions(), (30, 100));
        assert_eq!(rec.get_input(0).unwrap(), Some(InputEvent::Resize));
    }

    #[test]
    fn test_take_and_clear() {
        let mut rec = RecordingRenderer::default();
        rec.clear();
        rec.move_cursor(3, 4);
        assert_eq!(rec.take_commands().len(), 2);
        assert!(rec.is_empty());
        rec.set_cursor_visibility(false);
        rec.clear_recording();
        assert!(rec.is_empty());
        assert!(!rec.cursor_visible());
        assert_eq!(rec.cursor(), (3, 4));
    }

    #[test]
    fn test_replay_into() {
        let mut source = RecordingRenderer::default();
        source.init_color_pair(2, Rgb::new(1, 2, 3), Rgb::BLACK).unwrap();
        source.draw_vline(0, 0, '|', 4, 2).unwrap();
        source.refresh().unwrap();

        let mut target = RecordingRenderer::default();
        source.replay_into(&mut target).unwrap();
        assert_eq!(source.commands(), target.commands());
        assert!(target.colors().is_registered(2));
    }

    #[test]
    fn test_menu_state() {
        let mut rec = RecordingRenderer::default();
        let bar = MenuBar {
            menus: vec![Menu {
                title: "File".into(),
                items: vec![MenuItem::new("quit", "Quit")],
            }],
        };
        rec.set_menu_bar(&bar);
        rec.update_menu_item_state("quit", false);
        assert!(!rec.menu_bar().unwrap().menus[0].items[0].enabled);
    }

    #[test]
    fn test_event_loop_ends_on_exhausted_script() {
        struct Counter(usize);
        impl EventHandler for Counter {
            fn on_char(&mut self, _ch: char) -> bool {
                self.0 += 1;
                true
            }
        }
        let mut rec = RecordingRenderer::default().with_input([
            InputEvent::Char('a'),
            InputEvent::key(KeyCode::Char('b'), Modifiers::NONE),
        ]);
        let mut handler = Counter(0);
        rec.run_event_loop(&mut handler).unwrap();
        assert_eq!(handler.0, 2);
    }

    #[test]
    fn test_color_hooks() {
        let mut rec = RecordingRenderer::default();
        assert!(rec.is_fullcolor());
        rec.set_fullcolor_mode(false);
        assert!(!rec.is_fullcolor());
        rec.update_background(Rgb::new(0, 0, 0));
        rec.init_color_pair(1, Rgb::WHITE, Rgb::BLACK).unwrap();
        rec.init_color_pair(2, Rgb::WHITE, Rgb::BLACK).unwrap();
        rec.clear_color_cache();
        assert!(rec.colors().is_registered(1));
        assert!(!rec.colors().is_registered(2));
    }
}
