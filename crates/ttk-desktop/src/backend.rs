//! [`Renderer`] implementation for pixel-addressed windows.
//!
//! The grid lives in memory; `refresh()` paints it into a [`Frame`] and hands
//! that to the [`WindowSurface`]. Color pairs keep exact RGB. Input arrives
//! as raw [`WindowEvent`]s and is translated here, with a pending resize
//! always delivered before anything else and a close request repeated until
//! the host stops asking.

use crate::config::DesktopConfig;
use crate::dirty::{row_edge, DirtyRegion};
use crate::grid::{CellGrid, GridCell};
use crate::keymap::{modifiers_from_flags, translate_key};
use crate::paint::{CanvasPainter, FramePainter, Scene};
use crate::surface::{RawButton, SurfaceOrigin, WindowEvent, WindowSurface};
use std::time::{Duration, Instant};
use ttk_core::{
    clamp_to_grid, clip_region, rect_outline, validate_color_pair, validate_dimension, CellMetrics,
    ColorRegistry, InputEvent, MenuBar, Modifiers, MouseButton, MouseEvent, MouseEventKind,
    PerformanceMonitor, Renderer, Result, Rgb, TextAttribute, TtkError,
};

/// Backend drawing fills and glyph runs through a 2D API.
pub type CanvasBackend<S> = PixelBackend<S, CanvasPainter>;

/// Backend drawing instanced quads.
#[cfg(feature = "gpu")]
pub type GpuBackend<S> = PixelBackend<S, crate::gpu::GpuPainter>;

/// A cell grid shown in a window.
#[derive(Debug)]
pub struct PixelBackend<S: WindowSurface, P: FramePainter> {
    surface: S,
    painter: P,
    config: DesktopConfig,
    metrics: CellMetrics,
    grid: CellGrid,
    colors: ColorRegistry,
    perf: PerformanceMonitor,
    menu_bar: Option<MenuBar>,
    initialized: bool,
    resize_pending: bool,
    close_requested: bool,
    cursor_visible: bool,
    cursor: (i32, i32),
}

impl<S: WindowSurface, P: FramePainter + Default> PixelBackend<S, P> {
    /// Backend over `surface`. Nothing is created until `initialize()`.
    pub fn new(surface: S, config: DesktopConfig) -> Self {
        Self::with_painter(surface, P::default(), config)
    }
}

impl<S: WindowSurface, P: FramePainter> PixelBackend<S, P> {
    /// Backend with an explicit painter.
    pub fn with_painter(surface: S, painter: P, config: DesktopConfig) -> Self {
        let metrics = CellMetrics::new(config.cell_width_px, config.cell_height_px);
        let grid = CellGrid::new(i32::from(config.rows), i32::from(config.cols));
        Self {
            surface,
            painter,
            config,
            metrics,
            grid,
            colors: ColorRegistry::unbounded(),
            perf: PerformanceMonitor::default(),
            menu_bar: None,
            initialized: false,
            resize_pending: false,
            close_requested: false,
            cursor_visible: false,
            cursor: (0, 0),
        }
    }

    /// The window.
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// The window, mutably (tests use it to script events).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The painter.
    pub const fn painter(&self) -> &P {
        &self.painter
    }

    /// Cell contents.
    pub const fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Pair colors.
    pub const fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    /// Cell size in pixels.
    pub const fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Frame timing.
    pub const fn perf(&self) -> &PerformanceMonitor {
        &self.perf
    }

    /// Configuration.
    pub const fn config(&self) -> &DesktopConfig {
        &self.config
    }

    /// The installed menu bar.
    pub const fn menu_bar(&self) -> Option<&MenuBar> {
        self.menu_bar.as_ref()
    }

    /// Consume the backend, returning the window.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Resize the grid to fit `width` x `height` pixels. Returns `true` on change.
    fn apply_size(&mut self, width: f32, height: f32) -> bool {
        let (rows, cols) = self.metrics.grid_size(width, height);
        let (rows, cols) = (rows.max(1), cols.max(1));
        if (rows, cols) == (self.grid.rows(), self.grid.cols()) {
            return false;
        }
        tracing::debug!(rows, cols, width, height, "window resized");
        self.grid.resize(rows, cols);
        self.cursor = clamp_to_grid(self.cursor.0, self.cursor.1, rows, cols);
        true
    }

    /// Follow the live content size; a change queues a Resize event.
    fn sync_size(&mut self) {
        let (width, height) = self.surface.content_size();
        if self.apply_size(width, height) {
            self.resize_pending = true;
        }
    }

    fn pixel_to_cell(&self, x: f32, y: f32) -> (i32, i32, (f32, f32)) {
        let y = match self.surface.origin() {
            SurfaceOrigin::TopLeft => y,
            SurfaceOrigin::BottomLeft => self.grid.rows() as f32 * self.metrics.cell_height - y,
        };
        let pos = self.metrics.screen_to_grid(x, y);
        let (row, col) = clamp_to_grid(pos.row, pos.col, self.grid.rows(), self.grid.cols());
        (row, col, (pos.sub_x, pos.sub_y))
    }

    fn mouse(
        &self,
        x: f32,
        y: f32,
        button: MouseButton,
        kind: MouseEventKind,
        scroll_delta: i32,
        modifiers: Modifiers,
    ) -> InputEvent {
        let (row, col, sub_cell) = self.pixel_to_cell(x, y);
        InputEvent::Mouse(MouseEvent {
            row,
            col,
            button,
            kind,
            sub_cell: Some(sub_cell),
            scroll_delta,
            modifiers,
        })
    }

    /// Translate one raw event. Events with no shared meaning return `None`.
    fn translate(&mut self, event: WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyDown {
                keycode,
                characters,
                modifier_flags,
            } => translate_key(keycode, &characters, modifier_flags),
            WindowEvent::MouseDown {
                x,
                y,
                button,
                click_count,
                modifier_flags,
            } => {
                let kind = if click_count >= 2 {
                    MouseEventKind::DoubleClick
                } else {
                    MouseEventKind::ButtonDown
                };
                let mods = modifiers_from_flags(modifier_flags);
                Some(self.mouse(x, y, convert_button(button), kind, 0, mods))
            }
            WindowEvent::MouseUp {
                x,
                y,
                button,
                modifier_flags,
            } => {
                let mods = modifiers_from_flags(modifier_flags);
                Some(self.mouse(x, y, convert_button(button), MouseEventKind::ButtonUp, 0, mods))
            }
            WindowEvent::MouseMoved { x, y } => Some(self.mouse(
                x,
                y,
                MouseButton::None,
                MouseEventKind::Move,
                0,
                Modifiers::NONE,
            )),
            WindowEvent::MouseDragged { x, y, button } => Some(self.mouse(
                x,
                y,
                convert_button(button),
                MouseEventKind::Drag,
                0,
                Modifiers::NONE,
            )),
            WindowEvent::ScrollWheel { x, y, delta_y } => {
                let delta = if delta_y > 0.0 {
                    1
                } else if delta_y < 0.0 {
                    -1
                } else {
                    return None;
                };
                Some(self.mouse(
                    x,
                    y,
                    MouseButton::None,
                    MouseEventKind::Wheel,
                    delta,
                    Modifiers::NONE,
                ))
            }
            WindowEvent::Resized { width, height } => {
                let changed = self.apply_size(width, height);
                self.resize_pending = false;
                changed.then_some(InputEvent::Resize)
            }
            WindowEvent::CloseRequested => {
                self.close_requested = true;
                Some(InputEvent::Close)
            }
            WindowEvent::MenuSelected(id) => Some(InputEvent::Menu(id)),
            WindowEvent::Focus(_) => None,
        }
    }

    fn present(&mut self, region: DirtyRegion) -> Result<()> {
        if !self.initialized || region.is_empty() {
            return Ok(());
        }
        // Windows take RGB directly; slot definitions are only for palettes.
        self.colors.discard_pending_slots();
        self.perf.start_frame();
        self.perf.start_render();
        let scene = Scene {
            grid: &self.grid,
            colors: &self.colors,
            metrics: self.metrics,
            origin: self.surface.origin(),
            cursor: self.cursor_visible.then_some(self.cursor),
        };
        let frame = self.painter.paint(&scene, region);
        tracing::trace!(
            fills = frame.fills.len(),
            runs = frame.text.len(),
            instances = frame.instance_count,
            "presenting frame"
        );
        self.surface.present(frame)?;
        self.perf.end_render();
        Ok(())
    }

    fn put(&mut self, row: i32, col: i32, ch: char, pair: u8) {
        self.grid.put(
            row,
            col,
            GridCell {
                ch,
                pair,
                attributes: TextAttribute::NORMAL,
            },
        );
    }
}

const fn convert_button(button: RawButton) -> MouseButton {
    match button {
        RawButton::Left => MouseButton::Left,
        RawButton::Right => MouseButton::Right,
        RawButton::Other => MouseButton::Middle,
    }
}

impl<S: WindowSurface, P: FramePainter> Renderer for PixelBackend<S, P> {
    fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.metrics = self.config.cell_metrics()?;
        let (width, height) = self.config.window_size();
        self.surface.open(&self.config.window_title, width, height)?;

        let (width, height) = self.surface.content_size();
        self.grid = CellGrid::new(i32::from(self.config.rows), i32::from(self.config.cols));
        self.apply_size(width, height);
        self.resize_pending = false;
        self.close_requested = false;
        self.initialized = true;
        tracing::debug!(
            title = %self.config.window_title,
            font = %self.config.font_name,
            rows = self.grid.rows(),
            cols = self.grid.cols(),
            "desktop renderer initialized"
        );
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        if let Err(err) = self.surface.close() {
            tracing::warn!(%err, "failed to close window");
        }
        self.initialized = false;
        tracing::debug!("desktop renderer shut down");
    }

    fn get_dimensions(&mut self) -> (i32, i32) {
        if self.initialized {
            self.sync_size();
        }
        (self.grid.rows(), self.grid.cols())
    }

    fn clear(&mut self) {
        self.grid.clear();
    }

    fn clear_region(&mut self, row: i32, col: i32, height: i32, width: i32) -> Result<()> {
        validate_dimension("height", height)?;
        validate_dimension("width", width)?;
        self.grid.clear_region(row, col, height, width);
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
        self.grid.put_text(row, col, text, pair, attributes);
        Ok(())
    }

    fn draw_hline(&mut self, row: i32, col: i32, ch: char, length: i32, color_pair: i32) -> Result<()> {
        validate_dimension("length", length)?;
        let pair = validate_color_pair(color_pair)?;
        if let Some((_, _, c0, c1)) = clip_region(row, col, 1, length, self.grid.rows(), self.grid.cols()) {
            for c in c0..c1 {
                self.put(row, c, ch, pair);
            }
        }
        Ok(())
    }

    fn draw_vline(&mut self, row: i32, col: i32, ch: char, length: i32, color_pair: i32) -> Result<()> {
        validate_dimension("length", length)?;
        let pair = validate_color_pair(color_pair)?;
        if let Some((r0, r1, _, _)) = clip_region(row, col, length, 1, self.grid.rows(), self.grid.cols()) {
            for r in r0..r1 {
                self.put(r, col, ch, pair);
            }
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
            let cell = GridCell {
                ch: ' ',
                pair,
                attributes: TextAttribute::NORMAL,
            };
            self.grid.fill_region(row, col, height, width, cell);
        } else {
            let (rows, cols) = (self.grid.rows(), self.grid.cols());
            for (r, c, ch) in rect_outline(row, col, height, width, rows, cols) {
                self.put(r, c, ch, pair);
            }
        }
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        self.present(DirtyRegion::full(self.grid.rows(), self.grid.cols()))
    }

    fn refresh_region(&mut self, row: i32, col: i32, height: i32, width: i32) -> Result<()> {
        validate_dimension("height", height)?;
        validate_dimension("width", width)?;
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        let Some((r0, r1, c0, c1)) = clip_region(row, col, height, width, rows, cols) else {
            return Ok(());
        };
        // The damage travels as pixels, the way a window system reports it.
        let origin = self.surface.origin();
        let cells = DirtyRegion {
            row_start: r0,
            row_end: r1,
            col_start: c0,
            col_end: c1,
        };
        let damage = cells.to_pixels(rows, self.metrics, origin);
        self.present(DirtyRegion::from_pixels(damage, rows, cols, self.metrics, origin))
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
        if self.resize_pending {
            self.resize_pending = false;
            return Ok(Some(InputEvent::Resize));
        }
        if self.close_requested {
            return Ok(Some(InputEvent::Close));
        }

        if timeout_ms < 0 {
            loop {
                if let Some(event) = self.surface.poll_event(None) {
                    if let Some(translated) = self.translate(event) {
                        return Ok(Some(translated));
                    }
                }
            }
        }

        let deadline = Instant::now() + Duration::from_millis(u64::from(timeout_ms.unsigned_abs()));
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let Some(event) = self.surface.poll_event(Some(remaining)) else {
                return Ok(None);
            };
            if let Some(translated) = self.translate(event) {
                return Ok(Some(translated));
            }
        }
    }

    fn set_cursor_visibility(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn move_cursor(&mut self, row: i32, col: i32) {
        self.cursor = clamp_to_grid(row, col, self.grid.rows(), self.grid.cols());
    }

    fn set_menu_bar(&mut self, menu: &MenuBar) {
        self.surface.set_menu_bar(menu);
        self.menu_bar = Some(menu.clone());
    }

    fn update_menu_item_state(&mut self, item_id: &str, enabled: bool) {
        let Some(item) = self.menu_bar.as_mut().and_then(|m| m.item_mut(item_id)) else {
            tracing::debug!(item_id, "no such menu item");
            return;
        };
        item.enabled = enabled;
        self.surface.set_menu_item_enabled(item_id, enabled);
    }

    fn set_caret_position(&mut self, row: i32, col: i32) {
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        let (row, col) = clamp_to_grid(row, col, rows, cols);
        let x = col as f32 * self.metrics.cell_width;
        let y = row_edge(row, rows, self.metrics, self.surface.origin());
        self.surface.set_caret(x, y);
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
    use crate::headless::HeadlessSurface;
    use crate::keymap::FLAG_COMMAND;
    use ttk_core::{KeyCode, ValidationError};

    fn backend() -> CanvasBackend<HeadlessSurface> {
        // 7x14 cells; 10 rows by 20 cols.
        let config = DesktopConfig::default().grid(10, 20);
        let mut b = CanvasBackend::new(HeadlessSurface::new(), config);
        b.initialize().unwrap();
        b
    }

    #[test]
    fn test_initialize_opens_window() {
        let b = backend();
        assert!(b.surface().is_open());
        assert_eq!(b.surface().title(), "TTK");
        assert_eq!(b.surface().content_size(), (140.0, 140.0));
        assert!(b.is_fullcolor());
    }

    #[test]
    fn test_grid_follows_window_size() {
        let config = DesktopConfig::default();
        let mut b = CanvasBackend::new(HeadlessSurface::with_size(70.0, 28.0), config);
        b.initialize().unwrap();
        assert_eq!(b.get_dimensions(), (2, 10));
    }

    #[test]
    fn test_open_failure_is_init_error() {
        let mut b = CanvasBackend::new(HeadlessSurface::new().failing(), DesktopConfig::default());
        assert!(matches!(b.initialize(), Err(TtkError::Init(_))));
    }

    #[test]
    fn test_shutdown_closes() {
        let mut b = backend();
        b.shutdown();
        assert!(!b.surface().is_open());
        b.shutdown();
    }

    #[test]
    fn test_exact_rgb_pairs() {
        let mut b = backend();
        b.init_color_pair(1, Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)).unwrap();
        b.draw_text(0, 0, "x", 1, TextAttribute::NORMAL).unwrap();
        b.refresh().unwrap();
        let frame = b.surface().last_frame().unwrap();
        assert_eq!(frame.fills[0].bg, Rgb::new(4, 5, 6));
        assert_eq!(frame.text[0].fg, Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_present_discards_palette_slots() {
        let mut b = backend();
        b.init_color_pair(1, Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)).unwrap();
        assert_eq!(b.colors().pending_slot_count(), 2);
        b.refresh().unwrap();
        assert_eq!(b.colors().pending_slot_count(), 0);
    }

    #[test]
    fn test_validation() {
        let mut b = backend();
        assert!(matches!(
            b.draw_hline(0, 0, '-', 1, -1),
            Err(TtkError::Validation(ValidationError::ColorPairOutOfRange { value: -1 }))
        ));
        assert!(b.clear_region(0, 0, -1, 0).is_err());
        assert!(b.init_color_pair(256, Rgb::BLACK, Rgb::BLACK).is_err());
    }

    #[test]
    fn test_refresh_region_damage() {
        let mut b = backend();
        b.refresh_region(2, 3, 2, 4).unwrap();
        let frame = b.surface().last_frame().unwrap();
        assert_eq!(frame.damage.x, 21.0);
        assert_eq!(frame.damage.y, 28.0);
        assert_eq!(frame.damage.width, 28.0);
        assert_eq!(frame.fills.len(), 2);
    }

    #[test]
    fn test_refresh_region_offscreen_presents_nothing() {
        let mut b = backend();
        b.refresh_region(50, 50, 2, 2).unwrap();
        assert!(b.surface().frames().is_empty());
    }

    #[test]
    fn test_key_translation() {
        let mut b = backend();
        b.surface_mut().push_event(WindowEvent::KeyDown {
            keycode: 126,
            characters: String::new(),
            modifier_flags: FLAG_COMMAND,
        });
        let ev = b.get_input(0).unwrap().unwrap();
        assert!(matches!(ev, InputEvent::Key { code: KeyCode::Up, .. }));
        assert!(ev.has_modifier(Modifiers::COMMAND));
    }

    #[test]
    fn test_mouse_sub_cell() {
        let mut b = backend();
        b.surface_mut().push_event(WindowEvent::MouseDown {
            x: 24.5,
            y: 21.0,
            button: RawButton::Left,
            click_count: 2,
            modifier_flags: 0,
        });
        match b.get_input(0).unwrap() {
            Some(InputEvent::Mouse(m)) => {
                assert_eq!((m.row, m.col), (1, 3));
                assert_eq!(m.kind, MouseEventKind::DoubleClick);
                let (sx, sy) = m.sub_cell.unwrap();
                assert!((sx - 0.5).abs() < 1e-4);
                assert!((sy - 0.5).abs() < 1e-4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bottom_left_mouse_flip() {
        let config = DesktopConfig::default().grid(10, 20);
        let mut b = CanvasBackend::new(HeadlessSurface::new().bottom_left(), config);
        b.initialize().unwrap();
        b.surface_mut().push_event(WindowEvent::MouseMoved { x: 0.0, y: 139.0 });
        match b.get_input(0).unwrap() {
            Some(InputEvent::Mouse(m)) => assert_eq!(m.row, 0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_resize_before_close() {
        let mut b = backend();
        b.surface_mut().resize(280.0, 140.0);
        b.surface_mut().push_event(WindowEvent::CloseRequested);
        assert_eq!(b.get_input(0).unwrap(), Some(InputEvent::Resize));
        assert_eq!(b.get_dimensions(), (10, 40));
        assert_eq!(b.get_input(0).unwrap(), Some(InputEvent::Close));
        assert_eq!(b.get_input(0).unwrap(), Some(InputEvent::Close));
    }

    #[test]
    fn test_silent_resize_is_next_event() {
        let mut b = backend();
        b.surface_mut().set_content_size(70.0, 70.0);
        assert_eq!(b.get_dimensions(), (5, 10));
        assert_eq!(b.get_input(0).unwrap(), Some(InputEvent::Resize));
        assert_eq!(b.get_input(0).unwrap(), None);
    }

    #[test]
    fn test_menu_round_trip() {
        let mut b = backend();
        let menu = MenuBar {
            menus: vec![ttk_core::Menu {
                title: "File".into(),
                items: vec![ttk_core::MenuItem::new("file.open", "Open").with_shortcut("Cmd+O")],
            }],
        };
        b.set_menu_bar(&menu);
        b.update_menu_item_state("file.open", false);
        b.update_menu_item_state("missing", false);
        assert_eq!(b.surface().menu_states(), &[("file.open".to_string(), false)]);
        assert!(!b.menu_bar().unwrap().menus[0].items[0].enabled);

        b.surface_mut()
            .push_event(WindowEvent::MenuSelected("file.open".into()));
        assert_eq!(
            b.get_input(0).unwrap(),
            Some(InputEvent::Menu("file.open".into()))
        );
    }

    #[test]
    fn test_caret_and_cursor() {
        let mut b = backend();
        b.set_caret_position(2, 3);
        assert_eq!(b.surface().caret(), Some((21.0, 28.0)));
        b.set_cursor_visibility(true);
        b.move_cursor(100, 100);
        b.refresh().unwrap();
        let cursor = b.surface().last_frame().unwrap().cursor.unwrap();
        assert_eq!((cursor.x, cursor.y), (133.0, 126.0));
    }

    #[test]
    fn test_perf_counts_frames() {
        let mut b = backend();
        for _ in 0..3 {
            b.refresh().unwrap();
        }
        assert_eq!(b.surface().frames().len(), 3);
        assert!(b.perf().total_frames() >= 2);
    }

    #[test]
    fn test_fullcolor_off_approximates() {
        let mut b = backend();
        b.set_fullcolor_mode(false);
        b.init_color_pair(1, Rgb::new(250, 10, 10), Rgb::new(5, 5, 5)).unwrap();
        assert!(matches!(
            b.colors().colors(1).0,
            ttk_core::ResolvedColor::Basic(ttk_core::BasicColor::Red)
        ));
    }
}
