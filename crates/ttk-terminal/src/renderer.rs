//! [`Renderer`] implementation for character-cell terminals.
//!
//! Drawing lands in a [`CellBuffer`]; `refresh()` hands the dirty cells to
//! the [`DiffRenderer`]. The buffer always matches the live terminal size:
//! every size query and input wait first checks the substrate, and a change
//! resizes the buffer and queues a Resize event.

use crate::backend::{CrosstermBackend, TerminalBackend};
use crate::color::ColorMode;
use crate::config::TerminalConfig;
use crate::direct::{CellBuffer, CellRegion, DiffRenderer};
use crate::error::TerminalError;
use crate::input::translate_event;
use crossterm::event::Event as CrosstermEvent;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use ttk_core::{
    clip_region, rect_outline, validate_color_pair, validate_dimension, ColorRegistry,
    InputEvent, Renderer, Result, Rgb, TextAttribute, TtkError,
};
use unicode_width::UnicodeWidthChar;

/// Terminal renderer over a [`TerminalBackend`].
#[derive(Debug)]
pub struct TerminalRenderer<B: TerminalBackend = CrosstermBackend> {
    backend: B,
    config: TerminalConfig,
    mode: ColorMode,
    buffer: CellBuffer,
    diff: DiffRenderer,
    colors: ColorRegistry,
    pending: VecDeque<InputEvent>,
    initialized: bool,
    suspended: bool,
    raw_mode: bool,
    alternate_screen: bool,
    mouse_captured: bool,
    cursor_visible: bool,
    cursor: (u16, u16),
}

impl TerminalRenderer<CrosstermBackend> {
    /// Renderer on stdout.
    #[must_use]
    pub fn new(config: TerminalConfig) -> Self {
        Self::with_backend(CrosstermBackend::new(), config)
    }
}

impl<B: TerminalBackend> TerminalRenderer<B> {
    /// Renderer over a caller-supplied backend.
    pub fn with_backend(backend: B, config: TerminalConfig) -> Self {
        let mode = config.color_mode.unwrap_or_default();
        Self {
            backend,
            mode,
            buffer: CellBuffer::new(0, 0),
            diff: DiffRenderer::with_color_mode(mode),
            colors: mode.registry(config.fullcolor, config.palette_size),
            config,
            pending: VecDeque::new(),
            initialized: false,
            suspended: false,
            raw_mode: false,
            alternate_screen: false,
            mouse_captured: false,
            cursor_visible: false,
            cursor: (0, 0),
        }
    }

    /// The substrate.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The substrate, mutably (tests use it to script resizes).
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Cell contents.
    pub const fn buffer(&self) -> &CellBuffer {
        &self.buffer
    }

    /// Active color mode.
    pub const fn color_mode(&self) -> ColorMode {
        self.mode
    }

    /// The color registry.
    pub const fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    /// Whether `initialize()` has succeeded and `shutdown()` has not run.
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Consume the renderer, returning the substrate.
    pub fn into_backend(self) -> B {
        self.backend
    }

    fn acquire(&mut self) -> std::result::Result<(), TerminalError> {
        self.backend.enable_raw_mode()?;
        self.raw_mode = true;
        if self.config.alternate_screen {
            self.backend.enter_alternate_screen()?;
            self.alternate_screen = true;
        }
        if self.config.enable_mouse {
            self.backend.enable_mouse_capture()?;
            self.mouse_captured = true;
        }
        self.backend.hide_cursor()?;
        self.cursor_visible = false;
        Ok(())
    }

    /// Undo whatever `acquire` managed to do. Errors are logged, never returned.
    fn release(&mut self) {
        if self.mouse_captured {
            if let Err(err) = self.backend.disable_mouse_capture() {
                tracing::warn!(%err, "failed to disable mouse capture");
            }
            self.mouse_captured = false;
        }
        if let Err(err) = self.backend.show_cursor() {
            tracing::warn!(%err, "failed to show cursor");
        }
        if self.alternate_screen {
            if let Err(err) = self.backend.leave_alternate_screen() {
                tracing::warn!(%err, "failed to leave alternate screen");
            }
            self.alternate_screen = false;
        }
        if self.raw_mode {
            if let Err(err) = self.backend.disable_raw_mode() {
                tracing::warn!(%err, "failed to disable raw mode");
            }
            self.raw_mode = false;
        }
    }

    /// Resize the buffer if the terminal size changed. Returns `true` on change.
    fn sync_size(&mut self) -> bool {
        let Ok((width, height)) = self.backend.size() else {
            return false;
        };
        if (width, height) == (self.buffer.width(), self.buffer.height()) {
            return false;
        }
        tracing::debug!(cols = width, rows = height, "terminal resized");
        self.buffer.resize(width, height);
        let (fg, bg) = self.colors.defaults();
        self.buffer.clear(fg, bg);
        self.diff.reset();
        self.cursor.0 = self.cursor.0.min(width.saturating_sub(1));
        self.cursor.1 = self.cursor.1.min(height.saturating_sub(1));
        if !self.pending.contains(&InputEvent::Resize) {
            self.pending.push_back(InputEvent::Resize);
        }
        true
    }

    fn dims(&self) -> (i32, i32) {
        (i32::from(self.buffer.height()), i32::from(self.buffer.width()))
    }

    /// Buffer coordinates of a cell, if on screen.
    fn cell_xy(&self, row: i32, col: i32) -> Option<(u16, u16)> {
        let x = u16::try_from(col).ok()?;
        let y = u16::try_from(row).ok()?;
        (x < self.buffer.width() && y < self.buffer.height()).then_some((x, y))
    }

    fn region(&self, row: i32, col: i32, height: i32, width: i32) -> Option<CellRegion> {
        let (rows, cols) = self.dims();
        clip_region(row, col, height, width, rows, cols).map(|(r0, r1, c0, c1)| CellRegion {
            x0: c0 as u16,
            y0: r0 as u16,
            x1: c1 as u16,
            y1: r1 as u16,
        })
    }

    fn put(&mut self, row: i32, col: i32, ch: char, color_pair: u8, attributes: TextAttribute) {
        if let Some((x, y)) = self.cell_xy(row, col) {
            let (fg, bg) = self.colors.colors(color_pair);
            self.buffer.put_char(x, y, ch, fg, bg, attributes);
        }
    }

    fn flush(&mut self, region: Option<CellRegion>) -> Result<()> {
        if !self.initialized || self.suspended {
            return Ok(());
        }
        self.diff.queue_palette(self.colors.drain_pending_slots());
        self.backend
            .write_flush(&mut self.buffer, &mut self.diff, region)?;
        if self.cursor_visible {
            self.backend.move_cursor(self.cursor.0, self.cursor.1)?;
        }
        Ok(())
    }

    /// Queue the events `event` translates to. Returns how many were queued.
    ///
    /// A substrate resize goes through [`sync_size`](Self::sync_size), so it
    /// is reported only if the buffer size actually changes and no `Resize`
    /// is already waiting.
    fn accept_event(&mut self, event: CrosstermEvent) -> usize {
        if matches!(event, CrosstermEvent::Resize(..)) {
            let before = self.pending.len();
            self.sync_size();
            return self.pending.len() - before;
        }
        translate_event(event, &mut self.pending)
    }

    /// Wait for the next substrate event that translates to something.
    fn wait_for_event(&mut self, timeout_ms: i32) -> Result<()> {
        if timeout_ms < 0 {
            while self.pending.is_empty() {
                let event = self.backend.read_event()?;
                self.accept_event(event);
            }
            return Ok(());
        }

        let deadline = Instant::now() + Duration::from_millis(u64::from(timeout_ms.unsigned_abs()));
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !self.backend.poll(remaining)? {
                return Ok(());
            }
            let event = self.backend.read_event()?;
            if self.accept_event(event) > 0 || remaining.is_zero() {
                return Ok(());
            }
        }
    }
}

impl<B: TerminalBackend> Renderer for TerminalRenderer<B> {
    fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.mode = self.config.resolve_color_mode();
        self.diff = DiffRenderer::with_color_mode(self.mode);
        self.colors = self.mode.registry(self.config.fullcolor, self.config.palette_size);

        let (width, height) = match self.backend.size() {
            Ok(size) => size,
            Err(err) => return Err(err.into()),
        };
        if width == 0 || height == 0 {
            return Err(TerminalError::EmptyScreen {
                cols: width,
                rows: height,
            }
            .into());
        }

        if let Err(err) = self.acquire() {
            self.release();
            return Err(err.into());
        }

        self.buffer = CellBuffer::new(width, height);
        let (fg, bg) = self.colors.defaults();
        self.buffer.clear(fg, bg);
        self.pending.clear();
        self.initialized = true;
        tracing::debug!(
            mode = ?self.mode,
            fullcolor = self.colors.is_fullcolor(),
            rows = height,
            cols = width,
            "terminal renderer initialized"
        );
        Ok(())
    }

    fn shutdown(&mut self) {
        self.release();
        self.initialized = false;
        self.suspended = false;
        self.pending.clear();
        tracing::debug!("terminal renderer shut down");
    }

    fn get_dimensions(&mut self) -> (i32, i32) {
        if self.initialized {
            self.sync_size();
        }
        self.dims()
    }

    fn clear(&mut self) {
        let (fg, bg) = self.colors.defaults();
        self.buffer.clear(fg, bg);
    }

    fn clear_region(&mut self, row: i32, col: i32, height: i32, width: i32) -> Result<()> {
        validate_dimension("height", height)?;
        validate_dimension("width", width)?;
        if let Some(r) = self.region(row, col, height, width) {
            let (fg, bg) = self.colors.defaults();
            self.buffer
                .fill_rect(r.x0, r.y0, r.x1 - r.x0, r.y1 - r.y0, fg, bg);
        }
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
        let pair = validate_color_pair(color_pair)?;
        let (rows, cols) = self.dims();
        if row < 0 || row >= rows {
            return Ok(());
        }
        let (fg, bg) = self.colors.colors(pair);
        let y = row as u16;
        let mut c = col;
        for ch in text.chars() {
            if c >= cols {
                break;
            }
            match UnicodeWidthChar::width(ch) {
                Some(0) => {
                    if c > 0 {
                        self.buffer.append_combining(c as u16, y, ch);
                    }
                }
                Some(w) => {
                    if c >= 0 {
                        self.buffer.put_char(c as u16, y, ch, fg, bg, attributes);
                    }
                    c += w as i32;
                }
                None => {}
            }
        }
        Ok(())
    }

    fn draw_hline(&mut self, row: i32, col: i32, ch: char, length: i32, color_pair: i32) -> Result<()> {
        validate_dimension("length", length)?;
        let pair = validate_color_pair(color_pair)?;
        let (_, cols) = self.dims();
        for c in col.max(0)..col.saturating_add(length).min(cols) {
            self.put(row, c, ch, pair, TextAttribute::NORMAL);
        }
        Ok(())
    }

    fn draw_vline(&mut self, row: i32, col: i32, ch: char, length: i32, color_pair: i32) -> Result<()> {
        validate_dimension("length", length)?;
        let pair = validate_color_pair(color_pair)?;
        let (rows, _) = self.dims();
        for r in row.max(0)..row.saturating_add(length).min(rows) {
            self.put(r, col, ch, pair, TextAttribute::NORMAL);
        }
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
        let pair = validate_color_pair(color_pair)?;
        if filled {
            if let Some(r) = self.region(row, col, height, width) {
                let (fg, bg) = self.colors.colors(pair);
                self.buffer
                    .fill_rect(r.x0, r.y0, r.x1 - r.x0, r.y1 - r.y0, fg, bg);
            }
        } else {
            let (rows, cols) = self.dims();
            for (r, c, ch) in rect_outline(row, col, height, width, rows, cols) {
                self.put(r, c, ch, pair, TextAttribute::NORMAL);
            }
        }
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        self.flush(None)
    }

    fn refresh_region(&mut self, row: i32, col: i32, height: i32, width: i32) -> Result<()> {
        validate_dimension("height", height)?;
        validate_dimension("width", width)?;
        match self.region(row, col, height, width) {
            Some(region) => self.flush(Some(region)),
            None => Ok(()),
        }
    }

    fn init_color_pair(&mut self, pair_id: i32, fg: Rgb, bg: Rgb) -> Result<()> {
        if self.colors.register(pair_id, fg, bg)? {
            tracing::trace!(pair_id, %fg, %bg, "color pair registered");
        }
        Ok(())
    }

    fn get_input(&mut self, timeout_ms: i32) -> Result<Option<InputEvent>> {
        if !self.initialized {
            return Err(TtkError::NotInitialized);
        }
        self.sync_size();
        if self.pending.is_empty() {
            self.wait_for_event(timeout_ms)?;
        }
        Ok(self.pending.pop_front())
    }

    fn set_cursor_visibility(&mut self, visible: bool) {
        self.cursor_visible = visible;
        if !self.initialized {
            return;
        }
        let result = if visible {
            self.backend.show_cursor()
        } else {
            self.backend.hide_cursor()
        };
        if let Err(err) = result {
            tracing::debug!(%err, visible, "cursor visibility not changed");
        }
    }

    fn move_cursor(&mut self, row: i32, col: i32) {
        let Some((x, y)) = self.cell_xy(row, col) else {
            return;
        };
        self.cursor = (x, y);
        if self.initialized {
            if let Err(err) = self.backend.move_cursor(x, y) {
                tracing::debug!(%err, "cursor not moved");
            }
        }
    }

    fn suspend(&mut self) -> Result<()> {
        if !self.initialized || self.suspended {
            return Ok(());
        }
        self.release();
        self.suspended = true;
        tracing::debug!("terminal suspended");
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        if !self.suspended {
            return Ok(());
        }
        if let Err(err) = self.acquire() {
            self.release();
            return Err(err.into());
        }
        self.suspended = false;
        self.sync_size();
        self.backend.clear_screen()?;
        self.diff.reset();
        self.buffer.mark_all_dirty();
        tracing::debug!("terminal resumed");
        self.flush(None)
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
    use crate::backend::TestableBackend;
    use crossterm::event::{KeyCode as CtKeyCode, KeyEvent, KeyModifiers};
    use ttk_core::{BasicColor, KeyCode, Modifiers, ResolvedColor, ValidationError};

    type TestRenderer = TerminalRenderer<TestableBackend<Vec<u8>>>;

    fn renderer(cols: u16, rows: u16) -> TestRenderer {
        let mut r = TerminalRenderer::with_backend(
            TestableBackend::new(Vec::new(), cols, rows),
            TerminalConfig::rich(),
        );
        r.initialize().unwrap();
        r
    }

    fn row(r: &TestRenderer, y: u16) -> String {
        r.buffer().row_text(y)
    }

    #[test]
    fn test_initialize_acquires_terminal() {
        let r = renderer(20, 5);
        assert!(r.backend().is_raw_mode());
        assert!(r.backend().is_alternate_screen());
        assert!(r.backend().is_mouse_captured());
        assert!(r.backend().is_cursor_hidden());
        assert_eq!(r.color_mode(), ColorMode::TrueColor);
    }

    #[test]
    fn test_shutdown_restores_terminal() {
        let mut r = renderer(20, 5);
        r.shutdown();
        assert!(!r.backend().is_raw_mode());
        assert!(!r.backend().is_alternate_screen());
        assert!(!r.backend().is_mouse_captured());
        assert!(!r.is_initialized());
        // Twice is harmless.
        r.shutdown();
    }

    #[test]
    fn test_shutdown_without_initialize() {
        let mut r = TerminalRenderer::with_backend(
            TestableBackend::new(Vec::new(), 20, 5),
            TerminalConfig::default(),
        );
        r.shutdown();
        assert!(!r.backend().is_raw_mode());
    }

    #[test]
    fn test_empty_screen_fails_init() {
        let mut r = TerminalRenderer::with_backend(
            TestableBackend::new(Vec::new(), 0, 0),
            TerminalConfig::rich(),
        );
        assert!(matches!(r.initialize(), Err(TtkError::Init(_))));
        assert!(!r.backend().is_raw_mode());
    }

    #[test]
    fn test_draw_text_clips_right_edge() {
        let mut r = renderer(5, 2);
        r.draw_text(0, 2, "hello", 0, TextAttribute::NORMAL).unwrap();
        assert_eq!(row(&r, 0), "  hel");
    }

    #[test]
    fn test_draw_text_negative_col() {
        let mut r = renderer(5, 1);
        r.draw_text(0, -2, "hello", 0, TextAttribute::NORMAL).unwrap();
        assert_eq!(row(&r, 0), "llo  ");
    }

    #[test]
    fn test_draw_offscreen_is_silent() {
        let mut r = renderer(5, 2);
        r.draw_text(10, 0, "x", 0, TextAttribute::NORMAL).unwrap();
        r.draw_text(-1, 0, "x", 0, TextAttribute::NORMAL).unwrap();
        r.draw_hline(1, 10, '-', 3, 0).unwrap();
        r.draw_rect(50, 50, 3, 3, 0, true).unwrap();
        r.clear_region(-10, -10, 2, 2).unwrap();
        assert_eq!(row(&r, 0), "     ");
    }

    #[test]
    fn test_validation_errors() {
        let mut r = renderer(5, 2);
        assert!(matches!(
            r.draw_text(0, 0, "x", 256, TextAttribute::NORMAL),
            Err(TtkError::Validation(ValidationError::ColorPairOutOfRange { value: 256 }))
        ));
        assert!(r.draw_rect(0, 0, -1, 2, 0, false).is_err());
        assert!(r.draw_vline(0, 0, '|', -3, 0).is_err());
        assert!(r.refresh_region(0, 0, 1, -1).is_err());
        assert!(matches!(
            r.init_color_pair(0, Rgb::WHITE, Rgb::BLACK),
            Err(TtkError::Validation(ValidationError::ColorPairReserved))
        ));
    }

    #[test]
    fn test_lines_and_rect() {
        let mut r = renderer(6, 4);
        r.draw_rect(0, 0, 3, 4, 0, false).unwrap();
        r.draw_hline(3, 0, '=', 10, 0).unwrap();
        assert_eq!(row(&r, 0), "┌──┐  ");
        assert_eq!(row(&r, 1), "│  │  ");
        assert_eq!(row(&r, 2), "└──┘  ");
        assert_eq!(row(&r, 3), "======");
    }

    #[test]
    fn test_filled_rect_uses_pair_background() {
        let mut r = renderer(6, 4);
        r.init_color_pair(2, Rgb::WHITE, Rgb::new(0, 0, 200)).unwrap();
        r.draw_rect(1, 1, 2, 2, 2, true).unwrap();
        let cell = r.buffer().get(1, 1).unwrap();
        assert_eq!(cell.bg.rgb(), Rgb::new(0, 0, 200));
    }

    #[test]
    fn test_refresh_writes_text() {
        let mut r = renderer(10, 2);
        r.draw_text(0, 0, "hi", 0, TextAttribute::NORMAL).unwrap();
        r.refresh().unwrap();
        assert_eq!(r.backend().flush_count(), 1);
        assert_eq!(r.buffer().dirty_count(), 0);
        assert!(String::from_utf8_lossy(r.backend().writer()).contains("hi"));
    }

    #[test]
    fn test_refresh_region_only_flushes_region() {
        let mut r = renderer(10, 4);
        r.refresh().unwrap();
        r.draw_text(0, 0, "a", 0, TextAttribute::NORMAL).unwrap();
        r.draw_text(3, 9, "b", 0, TextAttribute::NORMAL).unwrap();
        r.refresh_region(0, 0, 1, 1).unwrap();
        assert_eq!(r.buffer().dirty_count(), 1);
    }

    #[test]
    fn test_first_pair_registration_wins() {
        let mut r = renderer(4, 1);
        r.init_color_pair(1, Rgb::new(255, 0, 0), Rgb::BLACK).unwrap();
        r.init_color_pair(1, Rgb::new(0, 255, 0), Rgb::WHITE).unwrap();
        assert_eq!(r.colors().get(1).unwrap().pair.fg, Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_basic_mode_approximates() {
        let mut r = TerminalRenderer::with_backend(
            TestableBackend::new(Vec::new(), 4, 1),
            TerminalConfig::minimal(),
        );
        r.initialize().unwrap();
        assert!(!r.is_fullcolor());
        r.init_color_pair(1, Rgb::new(255, 255, 0), Rgb::new(10, 10, 10)).unwrap();
        assert_eq!(
            r.colors().colors(1),
            (
                ResolvedColor::Basic(BasicColor::Yellow),
                ResolvedColor::Basic(BasicColor::Black)
            )
        );
    }

    #[test]
    fn test_256_mode_defines_palette_on_refresh() {
        let config = TerminalConfig {
            color_mode: Some(ColorMode::Color256),
            ..TerminalConfig::default()
        };
        let mut r = TerminalRenderer::with_backend(TestableBackend::new(Vec::new(), 4, 1), config);
        r.initialize().unwrap();
        r.init_color_pair(1, Rgb::new(255, 128, 0), Rgb::BLACK).unwrap();
        r.refresh().unwrap();
        let out = String::from_utf8_lossy(r.backend().writer()).into_owned();
        assert!(out.contains("\x1b]4;16;rgb:ff/80/00"));
        assert!(out.contains("\x1b]4;17;rgb:00/00/00"));
    }

    #[test]
    fn test_poll_without_input_returns_none() {
        let mut r = renderer(4, 1);
        assert_eq!(r.get_input(0).unwrap(), None);
    }

    #[test]
    fn test_get_input_translates_keys() {
        let mut r = renderer(4, 1);
        r.backend()
            .push_event(CrosstermEvent::Key(KeyEvent::new(CtKeyCode::Up, KeyModifiers::NONE)));
        assert_eq!(
            r.get_input(10).unwrap(),
            Some(InputEvent::key(KeyCode::Up, Modifiers::NONE))
        );
    }

    #[test]
    fn test_resize_is_next_event_and_dimensions_follow() {
        let mut r = renderer(10, 5);
        r.backend_mut().set_size(20, 8);
        assert_eq!(r.get_dimensions(), (8, 20));
        assert_eq!(r.get_input(0).unwrap(), Some(InputEvent::Resize));
        assert_eq!(r.get_input(0).unwrap(), None);
    }

    #[test]
    fn test_substrate_resize_event_syncs_buffer() {
        let mut r = renderer(10, 5);
        r.backend_mut().set_size(12, 6);
        r.backend().push_event(CrosstermEvent::Resize(12, 6));
        assert_eq!(r.get_input(0).unwrap(), Some(InputEvent::Resize));
        assert_eq!((r.buffer().width(), r.buffer().height()), (12, 6));
        // The substrate's own notice describes a size already applied.
        assert_eq!(r.get_input(0).unwrap(), None);
    }

    #[test]
    fn test_one_resize_is_reported_once() {
        let mut r = renderer(10, 5);
        r.backend_mut().set_size(14, 7);
        r.backend().push_event(CrosstermEvent::Resize(14, 7));
        r.backend()
            .push_event(CrosstermEvent::Key(KeyEvent::new(CtKeyCode::Up, KeyModifiers::NONE)));
        assert_eq!(r.get_input(0).unwrap(), Some(InputEvent::Resize));
        // The duplicate notice is skipped while waiting for the key.
        assert_eq!(
            r.get_input(50).unwrap(),
            Some(InputEvent::key(KeyCode::Up, Modifiers::NONE))
        );
        assert_eq!(r.get_input(0).unwrap(), None);
    }

    #[test]
    fn test_get_input_requires_initialize() {
        let mut r = TerminalRenderer::with_backend(
            TestableBackend::new(Vec::new(), 4, 1),
            TerminalConfig::default(),
        );
        assert!(matches!(r.get_input(0), Err(TtkError::NotInitialized)));
    }

    #[test]
    fn test_suspend_resume() {
        let mut r = renderer(6, 2);
        r.suspend().unwrap();
        assert!(!r.backend().is_raw_mode());
        r.draw_text(0, 0, "x", 0, TextAttribute::NORMAL).unwrap();
        r.refresh().unwrap();
        assert_eq!(r.backend().flush_count(), 0);
        r.resume().unwrap();
        assert!(r.backend().is_raw_mode());
        assert_eq!(r.backend().flush_count(), 1);
        assert_eq!(r.buffer().dirty_count(), 0);
    }

    #[test]
    fn test_cursor() {
        let mut r = renderer(6, 2);
        r.set_cursor_visibility(true);
        assert!(!r.backend().is_cursor_hidden());
        r.move_cursor(1, 3);
        assert_eq!(r.backend().cursor(), (3, 1));
        r.move_cursor(10, 10);
        assert_eq!(r.backend().cursor(), (3, 1));
    }

    #[test]
    fn test_wide_text() {
        let mut r = renderer(6, 1);
        r.draw_text(0, 0, "日本x", 0, TextAttribute::NORMAL).unwrap();
        assert_eq!(row(&r, 0), "日本x ");
    }
}
