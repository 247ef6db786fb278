//! Persisted session schema.
//!
//! The window manager serializes its state into a [`SessionSnapshot`] and
//! accepts one back on restore. Storage is the host's business; this module
//! only fixes the shape and the version check.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::window::{RestoreMode, Window, WindowId, WindowMode};

/// Bumped whenever the persisted shape changes. Any mismatch discards the session.
pub const SESSION_SCHEMA_VERSION: u32 = 1;

/// Errors reading a persisted session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("malformed session data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("session schema version {found} does not match {expected}")]
    SchemaMismatch { found: u32, expected: u32 },
}

/// One persisted window.
///
/// Everything except `id` and `app_id` is optional; missing fields are
/// recomputed on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub z_index: Option<u64>,
    #[serde(default)]
    pub mode: WindowMode,
    #[serde(default)]
    pub restore_bounds: Option<Rect>,
    #[serde(default)]
    pub restore_mode: Option<RestoreMode>,
}

impl WindowRecord {
    /// Record for `window`. Geometry is left out when the app opts out of persisting it.
    pub fn from_window(window: &Window, persist_geometry: bool) -> Self {
        Self {
            id: window.id,
            app_id: window.app_id.clone(),
            title: window.title.clone(),
            rect: persist_geometry.then_some(window.rect),
            z_index: Some(window.z_index),
            mode: window.mode,
            restore_bounds: if persist_geometry {
                window.restore_bounds
            } else {
                None
            },
            restore_mode: window.restore_mode,
        }
    }
}

/// Everything the manager persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    #[serde(default)]
    pub focused_window_id: Option<WindowId>,
    #[serde(default)]
    pub next_z_index: u64,
    #[serde(default)]
    pub windows: Vec<WindowRecord>,
}

#[derive(Deserialize)]
struct VersionTag {
    version: u32,
}

impl SessionSnapshot {
    pub const fn new(
        windows: Vec<WindowRecord>,
        focused_window_id: Option<WindowId>,
        next_z_index: u64,
    ) -> Self {
        Self {
            version: SESSION_SCHEMA_VERSION,
            focused_window_id,
            next_z_index,
            windows,
        }
    }

    /// Parse persisted JSON. The version tag is checked before the body so a
    /// schema change is reported as such rather than as a parse failure.
    pub fn from_json(raw: &str) -> Result<Self, SessionError> {
        let tag: VersionTag = serde_json::from_str(raw)?;
        if tag.version != SESSION_SCHEMA_VERSION {
            return Err(SessionError::SchemaMismatch {
                found: tag.version,
                expected: SESSION_SCHEMA_VERSION,
            });
        }
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_mismatch_is_reported() {
        let raw = r#"{ "version": 99, "windows": "whatever" }"#;
        assert!(matches!(
            SessionSnapshot::from_json(raw),
            Err(SessionError::SchemaMismatch {
                found: 99,
                expected: SESSION_SCHEMA_VERSION
            })
        ));
    }

    #[test]
    fn test_missing_version_is_malformed() {
        assert!(matches!(
            SessionSnapshot::from_json(r#"{ "windows": [] }"#),
            Err(SessionError::Parse(_))
        ));
        assert!(matches!(
            SessionSnapshot::from_json("not json"),
            Err(SessionError::Parse(_))
        ));
    }

    #[test]
    fn test_sparse_record_fills_defaults() {
        let raw = r#"{
            "version": 1,
            "windows": [
                { "id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "app_id": "about" }
            ]
        }"#;
        let snapshot = SessionSnapshot::from_json(raw).unwrap();
        let record = &snapshot.windows[0];
        assert_eq!(record.app_id, "about");
        assert_eq!(record.mode, WindowMode::Normal);
        assert_eq!(record.rect, None);
        assert_eq!(record.z_index, None);
        assert_eq!(snapshot.focused_window_id, None);
    }

    #[test]
    fn test_record_without_geometry() {
        let window = Window::new(
            WindowId::new(),
            "music".into(),
            "Music".into(),
            Rect::new(672, 580, 388, 203),
            110,
        );
        let record = WindowRecord::from_window(&window, false);
        assert_eq!(record.rect, None);
        assert_eq!(record.z_index, Some(110));

        let record = WindowRecord::from_window(&window, true);
        assert_eq!(record.rect, Some(Rect::new(672, 580, 388, 203)));
    }
}
