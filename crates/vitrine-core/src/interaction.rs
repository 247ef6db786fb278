//! Titlebar drags and frame resizes.
//!
//! The host forwards raw pointer coordinates; the tracker remembers where a
//! drag started and turns every motion into a `move_to` or
//! `resize_from_handle` on the manager, so all clamping stays in one place.

use crate::geometry::{Point, Rect, ResizeHandle};
use crate::window::WindowId;
use crate::WindowManager;

/// A drag in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Titlebar drag. `offset` is the pointer position relative to the window origin.
    Move { window: WindowId, offset: Point },
    /// Frame drag from `handle`, relative to the pointer position at `origin`.
    Resize {
        window: WindowId,
        handle: ResizeHandle,
        origin: Point,
        start_rect: Rect,
    },
}

impl Interaction {
    pub const fn window(&self) -> WindowId {
        match *self {
            Self::Move { window, .. } | Self::Resize { window, .. } => window,
        }
    }
}

/// Tracks at most one pointer drag.
#[derive(Debug, Default)]
pub struct PointerTracker {
    active: Option<Interaction>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn active(&self) -> Option<&Interaction> {
        self.active.as_ref()
    }

    /// Pointer pressed on a titlebar. Focuses the window; starts a drag if it can move.
    pub fn begin_move(&mut self, wm: &mut WindowManager, id: WindowId, x: i32, y: i32) -> bool {
        wm.focus(id);
        if !wm.capabilities(id).can_move {
            return false;
        }
        let Some(window) = wm.window(id) else {
            return false;
        };
        self.active = Some(Interaction::Move {
            window: id,
            offset: Point::new(x - window.rect.x, y - window.rect.y),
        });
        true
    }

    /// Pointer pressed on a resize handle.
    pub fn begin_resize(
        &mut self,
        wm: &mut WindowManager,
        id: WindowId,
        handle: ResizeHandle,
        x: i32,
        y: i32,
    ) -> bool {
        wm.focus(id);
        if !wm.capabilities(id).can_resize {
            return false;
        }
        let Some(window) = wm.window(id) else {
            return false;
        };
        self.active = Some(Interaction::Resize {
            window: id,
            handle,
            origin: Point::new(x, y),
            start_rect: window.rect,
        });
        true
    }

    /// Apply a pointer motion. The drag ends if the manager refuses it
    /// (window closed, minimized or maximized meanwhile).
    pub fn pointer_moved(&mut self, wm: &mut WindowManager, x: i32, y: i32) -> bool {
        let Some(interaction) = self.active else {
            return false;
        };
        let applied = match interaction {
            Interaction::Move { window, offset } => wm.move_to(window, x - offset.x, y - offset.y),
            Interaction::Resize {
                window,
                handle,
                origin,
                start_rect,
            } => wm.resize_from_handle(window, handle, start_rect, x - origin.x, y - origin.y),
        };
        if !applied {
            self.active = None;
        }
        applied
    }

    /// Pointer released. Returns the interaction that ended.
    pub fn pointer_released(&mut self) -> Option<Interaction> {
        self.active.take()
    }

    /// Pointer capture lost. The window keeps its last applied geometry.
    pub fn pointer_cancelled(&mut self) {
        self.active = None;
    }
}
