//! Viewport sampling and work-area derivation.
//!
//! The host reports the raw viewport size; fixed desktop chrome (top bar,
//! dock) is subtracted here to get the work area windows live in.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::geometry::{clamp, Point, Rect};

/// Raw viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Parse `"1440x900"`.
    pub fn parse(s: &str) -> Option<Self> {
        let (w, h) = s.trim().split_once(['x', 'X'])?;
        Some(Self::new(w.trim().parse().ok()?, h.trim().parse().ok()?))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1440, 900)
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Source of the current viewport. Sampled on every geometry operation.
pub trait ViewportProvider {
    fn viewport(&self) -> Viewport;
}

impl ViewportProvider for Viewport {
    fn viewport(&self) -> Viewport {
        *self
    }
}

/// Shared handle the host updates on resize/rotation.
impl ViewportProvider for Rc<Cell<Viewport>> {
    fn viewport(&self) -> Viewport {
        self.get()
    }
}

/// Fixed desktop chrome around the work area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chrome {
    /// Height of the menu bar at the top of the screen.
    pub top_bar_height: i32,
    /// Space reserved above the bottom edge for the dock.
    pub dock_safe_margin: i32,
    /// How much of a window must stay on screen horizontally to be grabbable.
    pub titlebar_grab_margin: i32,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            top_bar_height: 32,
            dock_safe_margin: 60,
            titlebar_grab_margin: 40,
        }
    }
}

impl Chrome {
    /// Viewport with degenerate dimensions bumped to the smallest usable size.
    pub fn sanitize(&self, viewport: Viewport) -> Viewport {
        Viewport::new(
            viewport.width.max(1),
            viewport.height.max(self.top_bar_height + 1),
        )
    }

    /// Usable rectangle below the top bar and above the dock.
    pub fn work_area(&self, viewport: Viewport) -> Rect {
        let viewport = self.sanitize(viewport);
        Rect::new(
            0,
            self.top_bar_height,
            viewport.width,
            (viewport.height - self.top_bar_height - self.dock_safe_margin).max(1),
        )
    }

    /// Clamp a window origin so its titlebar stays reachable.
    pub fn clamp_titlebar(&self, viewport: Viewport, point: Point) -> Point {
        let viewport = self.sanitize(viewport);
        let max_x = (viewport.width - self.titlebar_grab_margin).max(0);
        let min_y = self.top_bar_height;
        let max_y = (viewport.height - self.dock_safe_margin).max(min_y);
        Point::new(clamp(point.x, 0, max_x), clamp(point.y, min_y, max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_area_excludes_chrome() {
        let chrome = Chrome::default();
        assert_eq!(
            chrome.work_area(Viewport::new(1440, 900)),
            Rect::new(0, 32, 1440, 808)
        );
    }

    #[test]
    fn test_work_area_degenerate_viewport() {
        let chrome = Chrome::default();
        assert_eq!(chrome.work_area(Viewport::new(0, 0)), Rect::new(0, 32, 1, 1));
    }

    #[test]
    fn test_titlebar_clamp() {
        let chrome = Chrome::default();
        let viewport = Viewport::new(1000, 800);
        assert_eq!(chrome.clamp_titlebar(viewport, Point::new(-50, 0)), Point::new(0, 32));
        assert_eq!(
            chrome.clamp_titlebar(viewport, Point::new(5000, 5000)),
            Point::new(960, 740)
        );
        assert_eq!(chrome.clamp_titlebar(viewport, Point::new(300, 200)), Point::new(300, 200));
    }

    #[test]
    fn test_shared_provider_tracks_updates() {
        let shared = Rc::new(Cell::new(Viewport::new(800, 600)));
        let provider: Box<dyn ViewportProvider> = Box::new(Rc::clone(&shared));
        assert_eq!(provider.viewport(), Viewport::new(800, 600));
        shared.set(Viewport::new(1280, 720));
        assert_eq!(provider.viewport(), Viewport::new(1280, 720));
    }

    #[test]
    fn test_parse_viewport() {
        assert_eq!(Viewport::parse("1440x900"), Some(Viewport::new(1440, 900)));
        assert_eq!(Viewport::parse(" 800 X 600 "), Some(Viewport::new(800, 600)));
        assert_eq!(Viewport::parse("wide"), None);
    }
}
