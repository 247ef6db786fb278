//! Integer pixel geometry in viewport coordinates.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset both axes by the same amount (used for cascading).
    pub const fn offset(self, delta: i32) -> Self {
        Self::new(self.x + delta, self.y + delta)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(self.w.min(other.w), self.h.min(other.h))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.w.max(other.w), self.h.max(other.h))
    }

    /// Clamp both components into `[lo, hi]`. `lo` wins if the bounds cross.
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        Self::new(clamp(self.w, lo.w, hi.w), clamp(self.h, lo.h, hi.h))
    }

    /// Whether `lo <= self <= hi` holds on both axes.
    pub const fn fits_within(self, lo: Self, hi: Self) -> bool {
        self.w >= lo.w && self.w <= hi.w && self.h >= lo.h && self.h <= hi.h
    }
}

/// A rectangle: position plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.w, size.h)
    }

    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(self) -> Size {
        Size::new(self.w, self.h)
    }

    pub const fn right(self) -> i32 {
        self.x + self.w
    }

    pub const fn bottom(self) -> i32 {
        self.y + self.h
    }

    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Top-left point that centers `size` inside this rect. Never left of / above the origin.
    pub const fn centered(self, size: Size) -> Point {
        let dx = (self.w - size.w) / 2;
        let dy = (self.h - size.h) / 2;
        Point::new(
            self.x + if dx > 0 { dx } else { 0 },
            self.y + if dy > 0 { dy } else { 0 },
        )
    }
}

/// `value` clamped into `[lo, hi]`. Unlike `Ord::clamp` this never panics: if
/// the bounds cross, `lo` wins.
pub fn clamp(value: i32, lo: i32, hi: i32) -> i32 {
    value.min(hi).max(lo)
}

bitflags! {
    /// Edges moved by a resize drag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResizeEdges: u8 {
        const TOP    = 0b0001;
        const BOTTOM = 0b0010;
        const LEFT   = 0b0100;
        const RIGHT  = 0b1000;
    }
}

/// One of the eight resize handles drawn around a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    #[default]
    Se,
    Sw,
}

impl ResizeHandle {
    /// Convert to `ResizeEdges` bitflags.
    pub const fn edges(self) -> ResizeEdges {
        match self {
            Self::N => ResizeEdges::TOP,
            Self::S => ResizeEdges::BOTTOM,
            Self::E => ResizeEdges::RIGHT,
            Self::W => ResizeEdges::LEFT,
            Self::Ne => ResizeEdges::TOP.union(ResizeEdges::RIGHT),
            Self::Nw => ResizeEdges::TOP.union(ResizeEdges::LEFT),
            Self::Se => ResizeEdges::BOTTOM.union(ResizeEdges::RIGHT),
            Self::Sw => ResizeEdges::BOTTOM.union(ResizeEdges::LEFT),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "n" | "top" => Some(Self::N),
            "s" | "bottom" => Some(Self::S),
            "e" | "right" => Some(Self::E),
            "w" | "left" => Some(Self::W),
            "ne" => Some(Self::Ne),
            "nw" => Some(Self::Nw),
            "se" => Some(Self::Se),
            "sw" => Some(Self::Sw),
            _ => None,
        }
    }

    /// Requested rect for a drag of `(dx, dy)` from `start`, before any clamping.
    ///
    /// Left/top edges move the origin so the opposite edge stays put.
    pub fn apply(self, start: Rect, dx: i32, dy: i32) -> Rect {
        let edges = self.edges();
        let mut rect = start;
        if edges.contains(ResizeEdges::RIGHT) {
            rect.w = start.w + dx;
        }
        if edges.contains(ResizeEdges::BOTTOM) {
            rect.h = start.h + dy;
        }
        if edges.contains(ResizeEdges::LEFT) {
            rect.w = start.w - dx;
            rect.x = start.x + dx;
        }
        if edges.contains(ResizeEdges::TOP) {
            rect.h = start.h - dy;
            rect.y = start.y + dy;
        }
        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds_cross() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-5, 0, 10), 0);
        assert_eq!(clamp(50, 0, 10), 10);
        // Crossed bounds resolve to the lower bound.
        assert_eq!(clamp(50, 20, 10), 20);
    }

    #[test]
    fn test_rect_contains_and_intersects() {
        let a = Rect::new(0, 0, 100, 100);
        assert!(a.contains(0, 0));
        assert!(!a.contains(100, 50));
        assert!(a.intersects(Rect::new(50, 50, 100, 100)));
        assert!(!a.intersects(Rect::new(100, 0, 10, 10)));
    }

    #[test]
    fn test_centered_never_negative() {
        let work = Rect::new(0, 32, 1000, 600);
        assert_eq!(work.centered(Size::new(400, 200)), Point::new(300, 232));
        assert_eq!(work.centered(Size::new(2000, 2000)), Point::new(0, 32));
    }

    #[test]
    fn test_handle_apply_anchors_opposite_edge() {
        let start = Rect::new(100, 100, 400, 300);
        assert_eq!(ResizeHandle::Se.apply(start, 10, 20), Rect::new(100, 100, 410, 320));
        assert_eq!(ResizeHandle::Nw.apply(start, 10, 20), Rect::new(110, 120, 390, 280));
        assert_eq!(ResizeHandle::E.apply(start, 10, 20), Rect::new(100, 100, 410, 300));
    }

    #[test]
    fn test_handle_names() {
        assert_eq!(ResizeHandle::from_name("NE"), Some(ResizeHandle::Ne));
        assert_eq!(ResizeHandle::from_name("left"), Some(ResizeHandle::W));
        assert_eq!(ResizeHandle::from_name("middle"), None);
    }
}
