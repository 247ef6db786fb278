//! Window types.
//!
//! Renderer-agnostic window representation. Nothing here knows how a window
//! is painted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Rect;

/// Unique identifier of one open window instance.
///
/// Distinct from the application id: a multi-instance app may have several
/// windows open at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub Uuid);

impl WindowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "win:{}", self.0)
    }
}

/// Visibility/size state of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

/// Mode a minimized window returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestoreMode {
    #[default]
    Normal,
    Maximized,
}

impl From<RestoreMode> for WindowMode {
    fn from(mode: RestoreMode) -> Self {
        match mode {
            RestoreMode::Normal => Self::Normal,
            RestoreMode::Maximized => Self::Maximized,
        }
    }
}

/// A managed window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Window {
    pub id: WindowId,
    pub app_id: String,
    pub title: String,
    pub rect: Rect,
    pub mode: WindowMode,
    /// Rect to return to when leaving `Maximized`.
    pub restore_bounds: Option<Rect>,
    /// Mode to return to when leaving `Minimized`.
    pub restore_mode: Option<RestoreMode>,
    pub z_index: u64,
}

impl Window {
    pub fn new(id: WindowId, app_id: String, title: String, rect: Rect, z_index: u64) -> Self {
        Self {
            id,
            app_id,
            title,
            rect,
            mode: WindowMode::Normal,
            restore_bounds: None,
            restore_mode: None,
            z_index,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.mode != WindowMode::Minimized
    }

    pub fn is_normal(&self) -> bool {
        self.mode == WindowMode::Normal
    }

    pub fn is_maximized(&self) -> bool {
        self.mode == WindowMode::Maximized
    }

    pub fn is_minimized(&self) -> bool {
        self.mode == WindowMode::Minimized
    }

    /// Drop out of `Maximized` into `Normal` without touching the rect.
    pub(crate) fn demote_to_normal(&mut self) {
        if self.mode == WindowMode::Maximized {
            self.mode = WindowMode::Normal;
            self.restore_bounds = None;
            self.restore_mode = None;
        }
    }
}

/// What the chrome should offer for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WindowCapabilities {
    pub can_minimize: bool,
    pub can_maximize: bool,
    pub can_resize: bool,
    pub can_move: bool,
}
