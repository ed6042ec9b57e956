//! Raw terminal operations behind a trait, so the renderer can run
//! against a real TTY or an in-memory writer.

use crate::direct::{CellBuffer, CellRegion, DiffRenderer};
use crate::error::TerminalError;
use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, IsTerminal, Stdout, Write};
use std::time::Duration;

/// Backend trait for raw terminal operations (crossterm calls).
pub trait TerminalBackend {
    /// Enter raw mode.
    fn enable_raw_mode(&mut self) -> Result<(), TerminalError>;
    /// Leave raw mode.
    fn disable_raw_mode(&mut self) -> Result<(), TerminalError>;
    /// Switch to the alternate screen.
    fn enter_alternate_screen(&mut self) -> Result<(), TerminalError>;
    /// Switch back to the main screen.
    fn leave_alternate_screen(&mut self) -> Result<(), TerminalError>;
    /// Hide the cursor.
    fn hide_cursor(&mut self) -> Result<(), TerminalError>;
    /// Show the cursor.
    fn show_cursor(&mut self) -> Result<(), TerminalError>;
    /// Move the cursor to column `x`, row `y`.
    fn move_cursor(&mut self, x: u16, y: u16) -> Result<(), TerminalError>;
    /// Erase the whole screen.
    fn clear_screen(&mut self) -> Result<(), TerminalError>;
    /// Terminal size `(width, height)`.
    fn size(&self) -> Result<(u16, u16), TerminalError>;
    /// Wait up to `timeout` for an event to be readable.
    fn poll(&self, timeout: Duration) -> Result<bool, TerminalError>;
    /// Read the next event, blocking.
    fn read_event(&self) -> Result<CrosstermEvent, TerminalError>;
    /// Write dirty cells (optionally only inside `region`) and flush.
    fn write_flush(
        &mut self,
        buffer: &mut CellBuffer,
        renderer: &mut DiffRenderer,
        region: Option<CellRegion>,
    ) -> Result<(), TerminalError>;
    /// Start mouse reporting.
    fn enable_mouse_capture(&mut self) -> Result<(), TerminalError>;
    /// Stop mouse reporting.
    fn disable_mouse_capture(&mut self) -> Result<(), TerminalError>;
}

/// Real crossterm backend on stdout.
pub struct CrosstermBackend {
    stdout: Stdout,
}

impl CrosstermBackend {
    /// Backend writing to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CrosstermBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrosstermBackend").finish_non_exhaustive()
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enable_raw_mode(&mut self) -> Result<(), TerminalError> {
        if !self.stdout.is_terminal() {
            return Err(TerminalError::TerminalNotAvailable);
        }
        enable_raw_mode()?;
        Ok(())
    }
    fn disable_raw_mode(&mut self) -> Result<(), TerminalError> {
        disable_raw_mode()?;
        Ok(())
    }
    fn enter_alternate_screen(&mut self) -> Result<(), TerminalError> {
        execute!(self.stdout, EnterAlternateScreen)?;
        Ok(())
    }
    fn leave_alternate_screen(&mut self) -> Result<(), TerminalError> {
        execute!(self.stdout, LeaveAlternateScreen)?;
        Ok(())
    }
    fn hide_cursor(&mut self) -> Result<(), TerminalError> {
        execute!(self.stdout, cursor::Hide)?;
        Ok(())
    }
    fn show_cursor(&mut self) -> Result<(), TerminalError> {
        execute!(self.stdout, cursor::Show)?;
        Ok(())
    }
    fn move_cursor(&mut self, x: u16, y: u16) -> Result<(), TerminalError> {
        execute!(self.stdout, cursor::MoveTo(x, y))?;
        Ok(())
    }
    fn clear_screen(&mut self) -> Result<(), TerminalError> {
        execute!(self.stdout, Clear(ClearType::All))?;
        Ok(())
    }
    fn size(&self) -> Result<(u16, u16), TerminalError> {
        Ok(crossterm::terminal::size()?)
    }
    fn poll(&self, timeout: Duration) -> Result<bool, TerminalError> {
        Ok(event::poll(timeout)?)
    }
    fn read_event(&self) -> Result<CrosstermEvent, TerminalError> {
        Ok(event::read()?)
    }
    fn write_flush(
        &mut self,
        buffer: &mut CellBuffer,
        renderer: &mut DiffRenderer,
        region: Option<CellRegion>,
    ) -> Result<(), TerminalError> {
        renderer.flush_region(buffer, &mut self.stdout, region)?;
        self.stdout.flush()?;
        Ok(())
    }
    fn enable_mouse_capture(&mut self) -> Result<(), TerminalError> {
        execute!(self.stdout, event::EnableMouseCapture)?;
        Ok(())
    }
    fn disable_mouse_capture(&mut self) -> Result<(), TerminalError> {
        execute!(self.stdout, event::DisableMouseCapture)?;
        Ok(())
    }
}

/// Testable backend with generic writer for capturing escape sequences.
/// This backend allows testing terminal output without a real TTY.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug)]
pub struct TestableBackend<W: Write> {
    writer: W,
    size: (u16, u16),
    raw_mode: bool,
    alternate_screen: bool,
    cursor_hidden: bool,
    mouse_captured: bool,
    cursor: (u16, u16),
    flushes: usize,
    events: RefCell<VecDeque<CrosstermEvent>>,
    poll_results: RefCell<VecDeque<bool>>,
}

impl<W: Write> TestableBackend<W> {
    /// Create a new testable backend with the given writer and size.
    pub fn new(writer: W, width: u16, height: u16) -> Self {
        Self {
            writer,
            size: (width, height),
            raw_mode: false,
            alternate_screen: false,
            cursor_hidden: false,
            mouse_captured: false,
            cursor: (0, 0),
            flushes: 0,
            events: RefCell::new(VecDeque::new()),
            poll_results: RefCell::new(VecDeque::new()),
        }
    }

    /// Queue events to be returned by `read_event`.
    #[must_use]
    pub fn with_events(self, events: Vec<CrosstermEvent>) -> Self {
        *self.events.borrow_mut() = events.into_iter().collect();
        self
    }

    /// Queue poll results. Once exhausted, `poll` reports whether events are queued.
    #[must_use]
    pub fn with_polls(self, polls: Vec<bool>) -> Self {
        *self.poll_results.borrow_mut() = polls.into_iter().collect();
        self
    }

    /// Append one event.
    pub fn push_event(&self, event: CrosstermEvent) {
        self.events.borrow_mut().push_back(event);
    }

    /// Change the reported size, as a terminal resize would.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    /// Check if raw mode was enabled.
    pub const fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    /// Check if alternate screen was entered.
    pub const fn is_alternate_screen(&self) -> bool {
        self.alternate_screen
    }

    /// Check if cursor is hidden.
    pub const fn is_cursor_hidden(&self) -> bool {
        self.cursor_hidden
    }

    /// Check if mouse is captured.
    pub const fn is_mouse_captured(&self) -> bool {
        self.mouse_captured
    }

    /// Last cursor position `(x, y)`.
    pub const fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    /// Number of `write_flush` calls.
    pub const fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Borrow the writer.
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Get the underlying writer (consumes self).
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TerminalBackend for TestableBackend<W> {
    fn enable_raw_mode(&mut self) -> Result<(), TerminalError> {
        self.raw_mode = true;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<(), TerminalError> {
        self.raw_mode = false;
        Ok(())
    }

    fn enter_alternate_screen(&mut self) -> Result<(), TerminalError> {
        self.alternate_screen = true;
        execute!(self.writer, EnterAlternateScreen)?;
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<(), TerminalError> {
        self.alternate_screen = false;
        execute!(self.writer, LeaveAlternateScreen)?;
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<(), TerminalError> {
        self.cursor_hidden = true;
        execute!(self.writer, cursor::Hide)?;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<(), TerminalError> {
        self.cursor_hidden = false;
        execute!(self.writer, cursor::Show)?;
        Ok(())
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> Result<(), TerminalError> {
        self.cursor = (x, y);
        execute!(self.writer, cursor::MoveTo(x, y))?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), TerminalError> {
        execute!(self.writer, Clear(ClearType::All))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16), TerminalError> {
        Ok(self.size)
    }

    fn poll(&self, _timeout: Duration) -> Result<bool, TerminalError> {
        let scripted = self.poll_results.borrow_mut().pop_front();
        Ok(scripted.unwrap_or_else(|| !self.events.borrow().is_empty()))
    }

    fn read_event(&self) -> Result<CrosstermEvent, TerminalError> {
        self.events.borrow_mut().pop_front().ok_or_else(|| {
            TerminalError::Io(io::Error::new(io::ErrorKind::WouldBlock, "no events"))
        })
    }

    fn write_flush(
        &mut self,
        buffer: &mut CellBuffer,
        renderer: &mut DiffRenderer,
        region: Option<CellRegion>,
    ) -> Result<(), TerminalError> {
        renderer.flush_region(buffer, &mut self.writer, region)?;
        self.writer.flush()?;
        self.flushes += 1;
        Ok(())
    }

    fn enable_mouse_capture(&mut self) -> Result<(), TerminalError> {
        self.mouse_captured = true;
        execute!(self.writer, event::EnableMouseCapture)?;
        Ok(())
    }

    fn disable_mouse_capture(&mut self) -> Result<(), TerminalError> {
        self.mouse_captured = false;
        execute!(self.writer, event::DisableMouseCapture)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMode;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_testable_backend_state() {
        let mut backend = TestableBackend::new(Vec::new(), 80, 24);
        backend.enable_raw_mode().unwrap();
        backend.enter_alternate_screen().unwrap();
        backend.hide_cursor().unwrap();
        backend.enable_mouse_capture().unwrap();
        assert!(backend.is_raw_mode());
        assert!(backend.is_alternate_screen());
        assert!(backend.is_cursor_hidden());
        assert!(backend.is_mouse_captured());

        backend.disable_mouse_capture().unwrap();
        backend.show_cursor().unwrap();
        backend.leave_alternate_screen().unwrap();
        backend.disable_raw_mode().unwrap();
        assert!(!backend.is_raw_mode());
        assert!(!backend.is_alternate_screen());
        assert!(!backend.into_writer().is_empty());
    }

    #[test]
    fn test_poll_follows_queue() {
        let backend = TestableBackend::new(Vec::new(), 10, 10).with_events(vec![
            CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
        ]);
        assert!(backend.poll(Duration::ZERO).unwrap());
        backend.read_event().unwrap();
        assert!(!backend.poll(Duration::ZERO).unwrap());
        assert!(backend.read_event().is_err());
    }

    #[test]
    fn test_scripted_polls_take_priority() {
        let backend = TestableBackend::new(Vec::new(), 10, 10).with_polls(vec![true]);
        assert!(backend.poll(Duration::ZERO).unwrap());
        assert!(!backend.poll(Duration::ZERO).unwrap());
    }

    #[test]
    fn test_write_flush_counts() {
        let mut backend = TestableBackend::new(Vec::new(), 4, 2);
        let mut buffer = CellBuffer::new(4, 2);
        let mut renderer = DiffRenderer::with_color_mode(ColorMode::TrueColor);
        buffer.mark_all_dirty();
        backend.write_flush(&mut buffer, &mut renderer, None).unwrap();
        assert_eq!(backend.flush_count(), 1);
        assert_eq!(buffer.dirty_count(), 0);
    }

    #[test]
    fn test_resize_and_cursor() {
        let mut backend = TestableBackend::new(Vec::new(), 80, 24);
        backend.set_size(100, 30);
        assert_eq!(backend.size().unwrap(), (100, 30));
        backend.move_cursor(5, 6).unwrap();
        assert_eq!(backend.cursor(), (5, 6));
    }
}
