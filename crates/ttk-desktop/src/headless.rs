//! In-memory window surface for tests.

use crate::error::DesktopError;
use crate::surface::{Frame, SurfaceOrigin, WindowEvent, WindowSurface};
use std::collections::VecDeque;
use std::time::Duration;
use ttk_core::MenuBar;

/// A window that keeps presented frames and replays scripted events.
///
/// A blocking poll on an empty script reports `CloseRequested`, so event
/// loops over a headless window always end.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    open: bool,
    fail_open: bool,
    title: String,
    size: (f32, f32),
    fixed_size: Option<(f32, f32)>,
    origin: SurfaceOrigin,
    frames: Vec<Frame>,
    events: VecDeque<WindowEvent>,
    caret: Option<(f32, f32)>,
    menu_bar: Option<MenuBar>,
    menu_states: Vec<(String, bool)>,
}

impl HeadlessSurface {
    /// Surface that accepts whatever size the backend opens it at.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface whose content area is always `width` x `height`.
    #[must_use]
    pub fn with_size(width: f32, height: f32) -> Self {
        Self {
            fixed_size: Some((width, height)),
            size: (width, height),
            ..Self::default()
        }
    }

    /// Builder: bottom-left pixel origin.
    #[must_use]
    pub fn bottom_left(mut self) -> Self {
        self.origin = SurfaceOrigin::BottomLeft;
        self
    }

    /// Builder: `open` fails.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Builder: scripted events.
    #[must_use]
    pub fn with_events(mut self, events: impl IntoIterator<Item = WindowEvent>) -> Self {
        self.events.extend(events);
        self
    }

    /// Append one event.
    pub fn push_event(&mut self, event: WindowEvent) {
        self.events.push_back(event);
    }

    /// Resize the content area and queue the matching `Resized` event.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = (width, height);
        self.fixed_size = Some((width, height));
        self.events.push_back(WindowEvent::Resized { width, height });
    }

    /// Change the content area silently, as a resize the platform has not reported yet.
    pub fn set_content_size(&mut self, width: f32, height: f32) {
        self.size = (width, height);
        self.fixed_size = Some((width, height));
    }

    /// Whether the window is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Title given to `open`.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Every presented frame.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Most recent frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Take presented frames.
    pub fn take_frames(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }

    /// Last caret hint.
    #[must_use]
    pub const fn caret(&self) -> Option<(f32, f32)> {
        self.caret
    }

    /// Installed menu bar.
    #[must_use]
    pub const fn menu_bar(&self) -> Option<&MenuBar> {
        self.menu_bar.as_ref()
    }

    /// Menu item enable/disable calls, in order.
    #[must_use]
    pub fn menu_states(&self) -> &[(String, bool)] {
        &self.menu_states
    }

    /// Events not yet polled.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

impl WindowSurface for HeadlessSurface {
    fn open(&mut self, title: &str, width: f32, height: f32) -> Result<(), DesktopError> {
        if self.fail_open {
            return Err(DesktopError::WindowUnavailable("headless surface set to fail".into()));
        }
        self.open = true;
        self.title = title.to_string();
        self.size = self.fixed_size.unwrap_or((width, height));
        Ok(())
    }

    fn close(&mut self) -> Result<(), DesktopError> {
        self.open = false;
        Ok(())
    }

    fn content_size(&self) -> (f32, f32) {
        self.size
    }

    fn origin(&self) -> SurfaceOrigin {
        self.origin
    }

    fn present(&mut self, frame: Frame) -> Result<(), DesktopError> {
        if !self.open {
            return Err(DesktopError::NotOpen);
        }
        self.frames.push(frame);
        Ok(())
    }

    fn poll_event(&mut self, timeout: Option<Duration>) -> Option<WindowEvent> {
        match (self.events.pop_front(), timeout) {
            (Some(event), _) => Some(event),
            (None, None) => Some(WindowEvent::CloseRequested),
            (None, Some(_)) => None,
        }
    }

    fn set_caret(&mut self, x: f32, y: f32) {
        self.caret = Some((x, y));
    }

    fn set_menu_bar(&mut self, menu: &MenuBar) {
        self.menu_bar = Some(menu.clone());
    }

    fn set_menu_item_enabled(&mut self, item_id: &str, enabled: bool) {
        self.menu_states.push((item_id.to_string(), enabled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_uses_requested_size() {
        let mut s = HeadlessSurface::new();
        s.open("demo", 560.0, 336.0).unwrap();
        assert!(s.is_open());
        assert_eq!(s.title(), "demo");
        assert_eq!(s.content_size(), (560.0, 336.0));
    }

    #[test]
    fn test_fixed_size_wins() {
        let mut s = HeadlessSurface::with_size(100.0, 50.0);
        s.open("demo", 560.0, 336.0).unwrap();
        assert_eq!(s.content_size(), (100.0, 50.0));
    }

    #[test]
    fn test_failing_open() {
        let mut s = HeadlessSurface::new().failing();
        assert!(matches!(
            s.open("x", 1.0, 1.0),
            Err(DesktopError::WindowUnavailable(_))
        ));
    }

    #[test]
    fn test_present_requires_open() {
        let mut s = HeadlessSurface::new();
        assert!(matches!(s.present(Frame::default()), Err(DesktopError::NotOpen)));
    }

    #[test]
    fn test_poll_script_then_close() {
        let mut s = HeadlessSurface::new().with_events([WindowEvent::Focus(true)]);
        assert_eq!(s.poll_event(Some(Duration::ZERO)), Some(WindowEvent::Focus(true)));
        assert_eq!(s.poll_event(Some(Duration::ZERO)), None);
        assert_eq!(s.poll_event(None), Some(WindowEvent::CloseRequested));
    }

    #[test]
    fn test_resize_queues_event() {
        let mut s = HeadlessSurface::new();
        s.resize(300.0, 200.0);
        assert_eq!(s.content_size(), (300.0, 200.0));
        assert_eq!(s.pending_events(), 1);
    }
}
